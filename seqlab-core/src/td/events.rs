//! Discrete TD Sequential events derived from the per-bar readings.
//!
//! These are the markers a chart draws: completed (and perfected) Setups,
//! deferred and completed Countdowns, and Countdown cancellations. Indices are
//! positions in the caller's raw input.

use serde::{Deserialize, Serialize};

use crate::domain::Direction;
use crate::td::countdown::{CancelReason, CountdownMark};
use crate::td::sequential::TdReading;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TdEvent {
    SetupComplete {
        index: usize,
        direction: Direction,
        perfected: bool,
    },
    CountdownDeferred {
        index: usize,
        direction: Direction,
    },
    CountdownComplete {
        index: usize,
        direction: Direction,
    },
    CountdownCancelled {
        index: usize,
        direction: Direction,
        reason: CancelReason,
    },
}

/// Extract events, in bar order, from `(raw index, reading)` pairs.
pub fn td_events<'a>(
    readings: impl IntoIterator<Item = (usize, &'a TdReading)>,
    setup_max: u32,
) -> Vec<TdEvent> {
    let mut events = Vec::new();
    // Countdown direction entering the current bar.
    let mut running: Option<Direction> = None;

    for (index, reading) in readings {
        if let Some(cancel) = reading.cancelled {
            events.push(TdEvent::CountdownCancelled {
                index,
                direction: cancel.direction,
                reason: cancel.reason,
            });
        }

        if reading.setup_completed(setup_max) {
            if let Some(direction) = reading.setup_type {
                events.push(TdEvent::SetupComplete {
                    index,
                    direction,
                    perfected: reading.perfected,
                });
            }
        }

        match reading.countdown {
            CountdownMark::Deferred => {
                if let Some(direction) = reading.countdown_type {
                    events.push(TdEvent::CountdownDeferred { index, direction });
                }
            }
            // The completion bar already reports no Countdown direction.
            CountdownMark::Complete => {
                if let Some(direction) = running {
                    events.push(TdEvent::CountdownComplete { index, direction });
                }
            }
            CountdownMark::Idle | CountdownMark::Counting(_) => {}
        }

        running = reading.countdown_type;
    }

    events
}

//! Countdown phase.
//!
//! Per bar, in order:
//! 1. cancellation by an opposite Setup completing (applied by the caller
//!    through [`CountdownState::cancel_for_opposite_setup`] before the new
//!    Setup arms its own Countdown);
//! 2. cancellation when price clears the opposing TDST level;
//! 3. counting, with the bar-8 close captured as the completion reference.
//!
//! Reaching `countdown_max` completes the Countdown only when the bar's low
//! (buy) or high (sell) reaches the bar-8 close. Otherwise the count is held at
//! `countdown_max - 1`, the bar is marked [`CountdownMark::Deferred`], and the
//! check repeats on the next qualifying bar.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Direction};
use crate::indicators::TrueRangeBounds;
use crate::td::completion::TdstLevels;

/// Count at which the completion reference close is captured.
pub const REFERENCE_BAR: u32 = 8;

/// Countdown output for one bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "count", rename_all = "snake_case")]
pub enum CountdownMark {
    /// No qualifying bar (or no active Countdown).
    #[default]
    Idle,
    /// Qualifying bar number `n`, below `countdown_max`.
    Counting(u32),
    /// `countdown_max` reached but the completion qualifier failed.
    Deferred,
    /// Countdown completed on this bar.
    Complete,
}

impl CountdownMark {
    /// Numeric encoding used by older consumers: 0, n, `countdown_max - 0.5`
    /// for a deferred bar, `countdown_max` on completion.
    pub fn legacy_value(self, countdown_max: u32) -> f64 {
        match self {
            CountdownMark::Idle => 0.0,
            CountdownMark::Counting(n) => f64::from(n),
            CountdownMark::Deferred => f64::from(countdown_max) - 0.5,
            CountdownMark::Complete => f64::from(countdown_max),
        }
    }

    pub fn is_idle(self) -> bool {
        matches!(self, CountdownMark::Idle)
    }
}

/// Why a Countdown was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// A Setup of the opposite direction completed.
    OppositeSetup,
    /// Price moved entirely beyond the opposing TDST level.
    TdstBreach,
}

/// A Countdown cancellation, recorded on the bar where it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancellation {
    pub direction: Direction,
    pub reason: CancelReason,
}

/// Countdown progress carried from bar to bar.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CountdownState {
    pub count: u32,
    pub direction: Option<Direction>,
    /// Close of the bar that brought the count to [`REFERENCE_BAR`].
    pub reference_close: Option<f64>,
}

impl CountdownState {
    /// Start a fresh Countdown after a Setup of `direction` completed.
    pub fn arm(&mut self, direction: Direction) {
        *self = Self {
            count: 0,
            direction: Some(direction),
            reference_close: None,
        };
    }

    fn cancel(&mut self, reason: CancelReason) -> Option<Cancellation> {
        let direction = self.direction?;
        *self = Self::default();
        Some(Cancellation { direction, reason })
    }

    /// Direction of the Countdown if it belongs to the last completed Setup.
    pub fn active(&self, last_completed: Option<Direction>) -> Option<Direction> {
        self.direction.filter(|d| Some(*d) == last_completed)
    }

    /// Rule 1: a Setup of the opposite direction completed on this bar.
    pub fn cancel_for_opposite_setup(
        &mut self,
        completed: Direction,
        last_completed: Option<Direction>,
    ) -> Option<Cancellation> {
        match self.active(last_completed) {
            Some(direction) if direction != completed => self.cancel(CancelReason::OppositeSetup),
            _ => None,
        }
    }

    /// Rules 2 and 3 for bar `i`.
    ///
    /// Returns the mark to report and the cancellation, if the TDST rule fired.
    pub fn step(
        &mut self,
        bars: &[Bar],
        tr: &TrueRangeBounds,
        i: usize,
        levels: &TdstLevels,
        last_completed: Option<Direction>,
        countdown_max: u32,
    ) -> (CountdownMark, Option<Cancellation>) {
        let Some(direction) = self.active(last_completed) else {
            return (CountdownMark::Idle, None);
        };

        let breached = match direction {
            Direction::Buy => levels.resistance.is_some_and(|r| tr.low[i] > r),
            Direction::Sell => levels.support.is_some_and(|s| tr.high[i] < s),
        };
        if breached {
            return (CountdownMark::Idle, self.cancel(CancelReason::TdstBreach));
        }

        if i < 2 {
            return (CountdownMark::Idle, None);
        }

        let bar = &bars[i];
        let qualifies = match direction {
            Direction::Buy => bar.close <= bars[i - 2].low,
            Direction::Sell => bar.close >= bars[i - 2].high,
        };
        if !qualifies {
            return (CountdownMark::Idle, None);
        }

        self.count += 1;
        if self.count == REFERENCE_BAR {
            self.reference_close = Some(bar.close);
        }

        if self.count < countdown_max {
            return (CountdownMark::Counting(self.count), None);
        }

        // Without a captured reference (countdown_max below REFERENCE_BAR)
        // the qualifier is vacuous.
        let confirmed = match (direction, self.reference_close) {
            (_, None) => true,
            (Direction::Buy, Some(reference)) => bar.low <= reference,
            (Direction::Sell, Some(reference)) => bar.high >= reference,
        };
        if confirmed {
            *self = Self::default();
            (CountdownMark::Complete, None)
        } else {
            self.count = countdown_max - 1;
            (CountdownMark::Deferred, None)
        }
    }
}

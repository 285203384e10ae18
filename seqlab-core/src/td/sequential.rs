//! TD Sequential forward pass.
//!
//! All carried state lives in one [`TdState`] value that is threaded through a
//! fold over the bars. Each bar applies, in order: Setup transition, opposite
//! Setup cancellation, Setup completion (TDST, perfection, arming) or TDST
//! expansion, then the Countdown step.

use serde::{Deserialize, Serialize};

use crate::config::TdSequentialConfig;
use crate::domain::{Bar, Direction};
use crate::indicators::TrueRangeBounds;
use crate::td::completion::{is_perfected, TdstLevels};
use crate::td::countdown::{Cancellation, CountdownMark, CountdownState};
use crate::td::setup::SetupState;

/// Complete TD Sequential state between two bars.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TdState {
    pub setup: SetupState,
    pub countdown: CountdownState,
    pub tdst: TdstLevels,
}

/// TD Sequential output for one bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TdReading {
    /// 0 when no Setup is reported, otherwise `1..=setup_max`.
    pub setup_count: u32,
    pub setup_type: Option<Direction>,
    /// Set on the completion bar of a perfected Setup.
    pub perfected: bool,
    pub countdown: CountdownMark,
    pub countdown_type: Option<Direction>,
    pub tdst_resistance: Option<f64>,
    pub tdst_support: Option<f64>,
    /// Countdown cancelled on this bar.
    pub cancelled: Option<Cancellation>,
}

impl TdReading {
    /// True on the bar a Setup reaches `setup_max`.
    pub fn setup_completed(&self, setup_max: u32) -> bool {
        self.setup_type.is_some() && self.setup_count == setup_max
    }
}

/// TD Sequential calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TdSequential {
    lookback: usize,
    setup_max: u32,
    countdown_max: u32,
}

impl TdSequential {
    pub fn new(lookback: usize, setup_max: u32, countdown_max: u32) -> Self {
        Self {
            lookback,
            setup_max,
            countdown_max,
        }
    }

    pub fn from_config(config: &TdSequentialConfig) -> Self {
        Self::new(config.lookback, config.setup_max, config.countdown_max)
    }

    /// Bars before the first possible Setup transition.
    pub fn lookback(&self) -> usize {
        self.lookback + 1
    }

    /// Advance `state` by bar `i`.
    pub fn step(
        &self,
        state: &mut TdState,
        bars: &[Bar],
        closes: &[f64],
        tr: &TrueRangeBounds,
        i: usize,
    ) -> TdReading {
        state.setup.advance(closes, i, self.lookback);

        let mut perfected = false;
        let mut cancelled = None;

        if let Some(direction) = state.setup.completing(self.setup_max) {
            cancelled = state
                .countdown
                .cancel_for_opposite_setup(direction, state.setup.last_completed);

            state.setup.last_completed = Some(direction);
            state.tdst.on_setup_complete(direction, tr, i, self.setup_max);
            perfected = is_perfected(bars, i, direction);
            state.countdown.arm(direction);
        } else if let Some(direction) = state.setup.extending(self.setup_max) {
            state.tdst.expand(direction, tr, i);
        }

        let (countdown, breach) = state.countdown.step(
            bars,
            tr,
            i,
            &state.tdst,
            state.setup.last_completed,
            self.countdown_max,
        );
        let (setup_count, setup_type) = state.setup.display(self.setup_max);

        TdReading {
            setup_count,
            setup_type,
            perfected,
            countdown,
            countdown_type: state.countdown.active(state.setup.last_completed),
            tdst_resistance: state.tdst.resistance,
            tdst_support: state.tdst.support,
            cancelled: breach.or(cancelled),
        }
    }

    /// Run the forward pass over the whole series.
    pub fn compute(&self, bars: &[Bar], tr: &TrueRangeBounds) -> Vec<TdReading> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        (0..bars.len())
            .scan(TdState::default(), |state, i| {
                Some(self.step(state, bars, &closes, tr, i))
            })
            .collect()
    }
}

//! TD Sequential: Price Flip, Setup, TDST levels, perfection and Countdown.
//!
//! The computation is a single forward pass with carried state; see
//! [`sequential`] for the per-bar ordering.

pub mod completion;
pub mod countdown;
pub mod events;
pub mod sequential;
pub mod setup;

pub use completion::{is_perfected, TdstLevels};
pub use countdown::{CancelReason, Cancellation, CountdownMark, CountdownState, REFERENCE_BAR};
pub use events::{td_events, TdEvent};
pub use sequential::{TdReading, TdSequential, TdState};
pub use setup::{detect_flip, SetupState};

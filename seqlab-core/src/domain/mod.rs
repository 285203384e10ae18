//! Domain types for seqlab

pub mod bar;
pub mod direction;

pub use bar::{Bar, RawBar};
pub use direction::Direction;

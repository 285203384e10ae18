//! Setup / Countdown direction.

use serde::{Deserialize, Serialize};

/// Direction of a Setup or Countdown.
///
/// A buy Setup counts down-closes (exhaustion of a decline), a sell Setup
/// counts up-closes. The absence of a direction is `Option<Direction>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Buy => "buy",
            Direction::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

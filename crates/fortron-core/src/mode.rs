//! Balancing policies.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// How a source node balances energy with its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TransferMode {
    /// Equal amount per member, pulling or pushing through the source.
    Distribute,
    /// Pull into the source until it is full, then ladder-equalize the rest.
    Fill,
    /// Push out of the source, or ladder-equalize once it runs low.
    Drain,
    /// Share proportional to each member's capacity.
    #[default]
    Equalize,
}

impl TransferMode {
    /// All modes in index order.
    pub const ALL: [TransferMode; 4] = [
        TransferMode::Distribute,
        TransferMode::Fill,
        TransferMode::Drain,
        TransferMode::Equalize,
    ];

    /// Stable index, suitable for packing into an atomic.
    pub const fn index(self) -> u8 {
        match self {
            TransferMode::Distribute => 0,
            TransferMode::Fill => 1,
            TransferMode::Drain => 2,
            TransferMode::Equalize => 3,
        }
    }

    /// Inverse of [`TransferMode::index`].
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(TransferMode::Distribute),
            1 => Some(TransferMode::Fill),
            2 => Some(TransferMode::Drain),
            3 => Some(TransferMode::Equalize),
            _ => None,
        }
    }

    /// The mode a player toggles to next.
    pub const fn next(self) -> Self {
        match self {
            TransferMode::Distribute => TransferMode::Fill,
            TransferMode::Fill => TransferMode::Drain,
            TransferMode::Drain => TransferMode::Equalize,
            TransferMode::Equalize => TransferMode::Distribute,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            TransferMode::Distribute => "distribute",
            TransferMode::Fill => "fill",
            TransferMode::Drain => "drain",
            TransferMode::Equalize => "equalize",
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown transfer mode name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transfer mode: {0:?}")]
pub struct ParseModeError(pub String);

impl FromStr for TransferMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransferMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}

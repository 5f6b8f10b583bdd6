//! Frequency identifiers.

use std::fmt;

use fortron_core::{FortronStorage, Locatable};

/// The identifier nodes tune to in order to share energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frequency(pub u32);

impl Frequency {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Frequency {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fortron node that is tuned to a frequency.
pub trait FrequencyNode: FortronStorage + Locatable {
    fn frequency(&self) -> Frequency;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_conversions() {
        let f = Frequency::from(1234);
        assert_eq!(f, Frequency::new(1234));
        assert_eq!(f.value(), 1234);
        assert_eq!(f.to_string(), "1234");
    }

    #[test]
    fn frequencies_order_by_value() {
        let mut fs = vec![Frequency(3), Frequency(1), Frequency(2)];
        fs.sort();
        assert_eq!(fs, vec![Frequency(1), Frequency(2), Frequency(3)]);
    }
}

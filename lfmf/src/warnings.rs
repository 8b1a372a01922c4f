use std::{
    fmt,
    ops::{BitOr, BitOrAssign},
};

/// Advisory conditions attached to a prediction.
///
/// A warning never changes the predicted value, it only flags that the
/// value was computed outside of the model's validated envelope or with
/// reduced numerical accuracy.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Warnings(u16);

impl Warnings {
    pub const NONE: Self = Self(0);
    /// TX terminal is above the 50 m validated ceiling.
    pub const TX_HEIGHT: Self = Self(0x0001);
    /// RX terminal is above the 50 m validated ceiling.
    pub const RX_HEIGHT: Self = Self(0x0002);
    /// Frequency is below 0.01 MHz.
    pub const FREQUENCY_LOW: Self = Self(0x0004);
    /// Frequency is above 30 MHz.
    pub const FREQUENCY_HIGH: Self = Self(0x0008);
    /// Surface refractivity is outside 250..=400 N-units.
    pub const REFRACTIVITY: Self = Self(0x0010);
    /// Distance is beyond 10 000 km.
    pub const DISTANCE: Self = Self(0x0020);
    /// Distance is shorter than one wavelength.
    pub const NEAR_FIELD: Self = Self(0x0040);
    /// Residue series was cut off before reaching its threshold.
    pub const SERIES_TRUNCATED: Self = Self(0x0080);
    /// Flat earth and residue series disagree inside the transition window.
    pub const TRANSITION_MISMATCH: Self = Self(0x0100);

    const NAMED: [(Self, &'static str); 9] = [
        (Self::TX_HEIGHT, "TX terminal height above validated ceiling"),
        (Self::RX_HEIGHT, "RX terminal height above validated ceiling"),
        (Self::FREQUENCY_LOW, "frequency below validated floor"),
        (Self::FREQUENCY_HIGH, "frequency above validated ceiling"),
        (Self::REFRACTIVITY, "surface refractivity outside validated range"),
        (Self::DISTANCE, "distance beyond validated range"),
        (Self::NEAR_FIELD, "distance inside the near field"),
        (Self::SERIES_TRUNCATED, "residue series truncated"),
        (Self::TRANSITION_MISMATCH, "flat earth and residue series disagree"),
    ];

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Sets `other` when `cond` holds.
    #[must_use]
    pub fn with(mut self, other: Self, cond: bool) -> Self {
        if cond {
            self.insert(other);
        }
        self
    }

    /// Human readable descriptions of every set flag.
    pub fn descriptions(self) -> impl Iterator<Item = &'static str> {
        Self::NAMED
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

impl BitOr for Warnings {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Warnings {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl fmt::Display for Warnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)?;
        if self.is_empty() {
            return write!(f, " [No Warnings]");
        }
        for (i, name) in self.descriptions().enumerate() {
            let sep = if i == 0 { " [" } else { ", " };
            write!(f, "{sep}{name}")?;
        }
        write!(f, "]")
    }
}

//! Waqf types and three-way percentage splits.

use core::fmt;
use core::ops::{Index, IndexMut};
use core::str::FromStr;
use std::collections::BTreeSet;

use crate::errors::CoreError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Absolute tolerance used everywhere a split is compared against 100.
pub const SUM_TOLERANCE: f64 = 0.01;

/// Fallback split for the all-zero case; the literals sum to exactly 100.00.
pub const EQUAL_SPLIT_FALLBACK: WaqfTypeSplit = WaqfTypeSplit {
    permanent: 33.33,
    temporary_consumable: 33.33,
    temporary_revolving: 33.34,
};

/// The three waqf variants. `Ord` follows enumeration order, which is also the
/// tie-break order used by the slider rebalance.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WaqfType {
    /// Principal preserved, only returns distributed.
    Permanent,
    /// Principal spent down over time.
    TemporaryConsumable,
    /// Principal returned to the donor after the lock period.
    TemporaryRevolving,
}

impl WaqfType {
    pub const ALL: [WaqfType; 3] = [
        WaqfType::Permanent,
        WaqfType::TemporaryConsumable,
        WaqfType::TemporaryRevolving,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WaqfType::Permanent => "permanent",
            WaqfType::TemporaryConsumable => "temporary_consumable",
            WaqfType::TemporaryRevolving => "temporary_revolving",
        }
    }

    /// The two other types, in enumeration order.
    pub fn others(self) -> [WaqfType; 2] {
        match self {
            WaqfType::Permanent => [WaqfType::TemporaryConsumable, WaqfType::TemporaryRevolving],
            WaqfType::TemporaryConsumable => [WaqfType::Permanent, WaqfType::TemporaryRevolving],
            WaqfType::TemporaryRevolving => [WaqfType::Permanent, WaqfType::TemporaryConsumable],
        }
    }
}

impl fmt::Display for WaqfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WaqfType {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "permanent" => Ok(WaqfType::Permanent),
            "temporary_consumable" => Ok(WaqfType::TemporaryConsumable),
            "temporary_revolving" => Ok(WaqfType::TemporaryRevolving),
            _ => Err(CoreError::InvalidWaqfType),
        }
    }
}

/// Set of waqf types a cause accepts.
pub type WaqfTypeSet = BTreeSet<WaqfType>;

/// Three percentages keyed by waqf type.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WaqfTypeSplit {
    pub permanent: f64,
    pub temporary_consumable: f64,
    pub temporary_revolving: f64,
}

impl WaqfTypeSplit {
    pub const ZERO: WaqfTypeSplit = WaqfTypeSplit {
        permanent: 0.0,
        temporary_consumable: 0.0,
        temporary_revolving: 0.0,
    };

    pub const fn new(permanent: f64, temporary_consumable: f64, temporary_revolving: f64) -> Self {
        Self { permanent, temporary_consumable, temporary_revolving }
    }

    /// 100% on `t`, 0 elsewhere.
    pub fn only(t: WaqfType) -> Self {
        let mut s = Self::ZERO;
        s[t] = 100.0;
        s
    }

    pub fn total(&self) -> f64 {
        self.permanent + self.temporary_consumable + self.temporary_revolving
    }

    /// True when the components sum to 100 within [`SUM_TOLERANCE`].
    pub fn sums_to_100(&self) -> bool {
        (self.total() - 100.0).abs() <= SUM_TOLERANCE
    }

    /// Copy with every component outside `supported` forced to 0.
    pub fn masked(&self, supported: &WaqfTypeSet) -> Self {
        let mut out = *self;
        for t in WaqfType::ALL {
            if !supported.contains(&t) {
                out[t] = 0.0;
            }
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (WaqfType, f64)> + '_ {
        WaqfType::ALL.into_iter().map(move |t| (t, self[t]))
    }
}

impl Index<WaqfType> for WaqfTypeSplit {
    type Output = f64;
    fn index(&self, t: WaqfType) -> &f64 {
        match t {
            WaqfType::Permanent => &self.permanent,
            WaqfType::TemporaryConsumable => &self.temporary_consumable,
            WaqfType::TemporaryRevolving => &self.temporary_revolving,
        }
    }
}

impl IndexMut<WaqfType> for WaqfTypeSplit {
    fn index_mut(&mut self, t: WaqfType) -> &mut f64 {
        match t {
            WaqfType::Permanent => &mut self.permanent,
            WaqfType::TemporaryConsumable => &mut self.temporary_consumable,
            WaqfType::TemporaryRevolving => &mut self.temporary_revolving,
        }
    }
}

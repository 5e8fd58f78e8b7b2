//! Risk/attention tags raised by rules, and the ordered set that holds them.

use serde::{Deserialize, Serialize};

/// Closed set of risk/attention tags.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flag {
    LowStock,
    #[serde(rename = "MOQBreached")]
    MoqBreached,
    ExpiryRisk,
    AllergenRisk,
    #[serde(rename = "QAHold")]
    QaHold,
    CostVariance,
    CapacityOverload,
}

impl Flag {
    pub const ALL: [Flag; 7] = [
        Flag::LowStock,
        Flag::MoqBreached,
        Flag::ExpiryRisk,
        Flag::AllergenRisk,
        Flag::QaHold,
        Flag::CostVariance,
        Flag::CapacityOverload,
    ];

    /// Wire name, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Flag::LowStock => "LowStock",
            Flag::MoqBreached => "MOQBreached",
            Flag::ExpiryRisk => "ExpiryRisk",
            Flag::AllergenRisk => "AllergenRisk",
            Flag::QaHold => "QAHold",
            Flag::CostVariance => "CostVariance",
            Flag::CapacityOverload => "CapacityOverload",
        }
    }
}

impl core::fmt::Display for Flag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Duplicate-free flag collection that keeps first-insertion order.
///
/// There are only seven flags, so a `Vec` with a linear membership check is
/// both the simplest and the fastest representation. Serialized as a JSON array;
/// duplicates in the input are dropped on deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Flag>", into = "Vec<Flag>")]
pub struct FlagSet(Vec<Flag>);

impl FlagSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add `flag` if absent. Returns `true` if the set changed.
    pub fn insert(&mut self, flag: Flag) -> bool {
        if self.contains(flag) {
            return false;
        }
        self.0.push(flag);
        true
    }

    pub fn contains(&self, flag: Flag) -> bool {
        self.0.contains(&flag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Flag] {
        &self.0
    }

    /// Rules never remove flags; callers reset between passes if they need to.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<Vec<Flag>> for FlagSet {
    fn from(flags: Vec<Flag>) -> Self {
        flags.into_iter().collect()
    }
}

impl From<FlagSet> for Vec<Flag> {
    fn from(set: FlagSet) -> Self {
        set.0
    }
}

impl FromIterator<Flag> for FlagSet {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut set = FlagSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<Flag> for FlagSet {
    fn extend<I: IntoIterator<Item = Flag>>(&mut self, iter: I) {
        for flag in iter {
            self.insert(flag);
        }
    }
}

impl<'a> IntoIterator for &'a FlagSet {
    type Item = Flag;
    type IntoIter = core::iter::Copied<core::slice::Iter<'a, Flag>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

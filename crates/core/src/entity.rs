//! Entity traits: identity, and the flag capability rules write to.

use crate::flag::{Flag, FlagSet};

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Anything that carries a [`FlagSet`].
///
/// Rule actions raise flags through [`Flagged::raise`] so every rule set gets
/// the same add-if-absent semantics.
pub trait Flagged {
    fn flags(&self) -> &FlagSet;

    fn flags_mut(&mut self) -> &mut FlagSet;

    /// Add `flag` unless it is already present. Returns `true` if it was added.
    fn raise(&mut self, flag: Flag) -> bool {
        self.flags_mut().insert(flag)
    }

    fn has_flag(&self, flag: Flag) -> bool {
        self.flags().contains(flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Tagged {
        flags: FlagSet,
    }

    impl Flagged for Tagged {
        fn flags(&self) -> &FlagSet {
            &self.flags
        }

        fn flags_mut(&mut self) -> &mut FlagSet {
            &mut self.flags
        }
    }

    #[test]
    fn raise_is_add_if_absent() {
        let mut p = Tagged::default();
        assert!(p.raise(Flag::QaHold));
        assert!(!p.raise(Flag::QaHold));
        assert!(p.has_flag(Flag::QaHold));
        assert_eq!(p.flags().len(), 1);
    }
}

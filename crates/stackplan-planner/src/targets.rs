//! Environment target policy.

use stackplan_core::Stack;
use stackplan_core::variable::{EnvironmentTargets, Target};
use std::collections::BTreeSet;

/// Targets receiving sensitive and standard variables for a stack.
///
/// Fixed policy: secrets never reach `development`, and production stacks
/// only ever write to `production`.
pub fn targets_for(stack: &Stack) -> EnvironmentTargets {
    if stack.is_production() {
        EnvironmentTargets {
            sensitive: BTreeSet::from([Target::Production]),
            standard: BTreeSet::from([Target::Production]),
        }
    } else {
        EnvironmentTargets {
            sensitive: BTreeSet::from([Target::Preview]),
            standard: BTreeSet::from([Target::Preview, Target::Development]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_targets() {
        for name in ["prod", "production"] {
            let targets = targets_for(&Stack::new(name));
            assert_eq!(targets.sensitive, BTreeSet::from([Target::Production]));
            assert_eq!(targets.standard, BTreeSet::from([Target::Production]));
        }
    }

    #[test]
    fn test_non_production_targets() {
        for name in ["preview", "dev", "staging", "feature-x"] {
            let targets = targets_for(&Stack::new(name));
            assert_eq!(targets.sensitive, BTreeSet::from([Target::Preview]));
            assert_eq!(
                targets.standard,
                BTreeSet::from([Target::Preview, Target::Development])
            );
            assert!(!targets.sensitive.contains(&Target::Development));
        }
    }
}

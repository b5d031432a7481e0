//! Property-based tests for version resolution.
//!
//! These tests use proptest to generate arbitrary signal values and project
//! sets and check that the resolution rules hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::policy::VersionPolicy;
    use crate::project::ProjectSet;
    use crate::resolver::{Channel, VersionResolver};
    use crate::signal::ConfigSignal;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn resolver() -> VersionResolver {
        VersionResolver::new(VersionPolicy::default())
    }

    proptest! {
        /// Property: any value other than exactly "true" resolves to alpha
        #[test]
        fn non_true_values_resolve_to_alpha(value in ".*") {
            prop_assume!(value != "true");
            let resolved = resolver().resolve(&ConfigSignal::present(value)).unwrap();
            prop_assert_eq!(resolved.channel(), Channel::Alpha);
            prop_assert_eq!(resolved.version(), "1.48.0-alpha-SNAPSHOT");
        }

        /// Property: padding "true" with whitespace never selects stable
        #[test]
        fn padded_true_resolves_to_alpha(prefix in "[ \t\r\n]*", suffix in "[ \t\r\n]*") {
            prop_assume!(!prefix.is_empty() || !suffix.is_empty());
            let value = format!("{}true{}", prefix, suffix);
            let resolved = resolver().resolve(&ConfigSignal::present(value)).unwrap();
            prop_assert_eq!(resolved.channel(), Channel::Alpha);
        }

        /// Property: other casings of "true" never select stable
        #[test]
        fn other_casings_resolve_to_alpha(value in "[tT][rR][uU][eE]") {
            let resolved = resolver().resolve(&ConfigSignal::present(value.clone())).unwrap();
            if value == "true" {
                prop_assert_eq!(resolved.channel(), Channel::Stable);
            } else {
                prop_assert_eq!(resolved.channel(), Channel::Alpha);
            }
        }

        /// Property: resolution is deterministic for the same signal
        #[test]
        fn resolution_is_idempotent(value in proptest::option::of(".*")) {
            let signal = ConfigSignal::from(value);
            let first = resolver().resolve(&signal).unwrap();
            let second = resolver().resolve(&signal).unwrap();
            prop_assert_eq!(first, second);
        }

        /// Property: every subproject receives the same version
        #[test]
        fn all_subprojects_get_identical_version(
            names in proptest::collection::btree_set("[a-z][a-z0-9-]{0,12}", 1..20),
            stable in any::<bool>(),
        ) {
            let names: BTreeSet<String> = names;
            let mut projects = ProjectSet::from_names(names.iter().cloned()).unwrap();
            let signal = if stable {
                ConfigSignal::present("true")
            } else {
                ConfigSignal::absent()
            };

            let resolved = resolver().apply(&signal, &mut projects).unwrap();
            prop_assert_eq!(projects.len(), names.len());
            prop_assert_eq!(projects.common_version(), Some(resolved.version()));
            for project in projects.iter() {
                prop_assert_eq!(project.version(), Some(resolved.version()));
            }
        }
    }
}

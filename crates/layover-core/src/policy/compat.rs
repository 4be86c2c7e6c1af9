//! Version compatibility checker for policy import/export.
//!
//! Policy bundles travel between deployments that may run different
//! engine builds. The semver check here decides whether an import is
//! safe, needs a warning, or must be rejected.

use std::fmt;

/// Result of comparing the engine's policy format against a bundle's.
#[derive(Debug, Clone, PartialEq)]
pub enum Compatibility {
    /// Versions are fully compatible.
    Compatible,
    /// Bundle version is newer but still compatible (minor difference).
    /// Shows a warning to the user.
    MinorNewer {
        /// Policy format version of the running engine.
        engine: String,
        /// Version recorded in the bundle.
        bundle: String,
    },
    /// Versions are incompatible (major difference).
    /// Import should be rejected or require migration.
    Incompatible {
        /// Policy format version of the running engine.
        engine: String,
        /// Version recorded in the bundle.
        bundle: String,
        /// Hints for migrating or resolving the incompatibility.
        hints: Vec<String>,
    },
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compatibility::Compatible => write!(f, "Versions are compatible"),
            Compatibility::MinorNewer { engine, bundle } => {
                write!(
                    f,
                    "Bundle version ({}) is newer than this engine ({}). \
                     Some fields may be ignored, but import should work.",
                    bundle, engine
                )
            }
            Compatibility::Incompatible {
                engine,
                bundle,
                hints,
            } => {
                writeln!(
                    f,
                    "Incompatible versions: engine={}, bundle={}",
                    engine, bundle
                )?;
                if !hints.is_empty() {
                    writeln!(f, "Migration hints:")?;
                    for hint in hints {
                        writeln!(f, "  - {}", hint)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Parse a semver version string into (major, minor, patch).
pub fn parse_version(version: &str) -> Option<(u32, u32, u32)> {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let major = parts[0].parse::<u32>().ok()?;
    let minor = parts[1].parse::<u32>().ok()?;
    let patch = parts[2].parse::<u32>().ok()?;

    Some((major, minor, patch))
}

/// Check compatibility between the engine's policy format and a bundle.
///
/// # Compatibility Rules
/// - **Major mismatch** -> Incompatible with migration hints
/// - **Minor newer bundle** -> MinorNewer (warning, but import works)
/// - **Same major, older/same minor** -> Compatible
/// - **Patch differences** -> Compatible (ignored)
pub fn check_compatibility(engine: &str, bundle: &str) -> Compatibility {
    let engine_ver = match parse_version(engine) {
        Some(v) => v,
        None => {
            return Compatibility::Incompatible {
                engine: engine.to_string(),
                bundle: bundle.to_string(),
                hints: vec!["Invalid engine version format".to_string()],
            }
        }
    };

    let bundle_ver = match parse_version(bundle) {
        Some(v) => v,
        None => {
            return Compatibility::Incompatible {
                engine: engine.to_string(),
                bundle: bundle.to_string(),
                hints: vec!["Invalid bundle version format".to_string()],
            }
        }
    };

    if engine_ver.0 != bundle_ver.0 {
        return Compatibility::Incompatible {
            engine: engine.to_string(),
            bundle: bundle.to_string(),
            hints: migration_hints(engine_ver.0, bundle_ver.0),
        };
    }

    if bundle_ver.1 > engine_ver.1 {
        return Compatibility::MinorNewer {
            engine: engine.to_string(),
            bundle: bundle.to_string(),
        };
    }

    Compatibility::Compatible
}

/// Generate migration hints for a major version incompatibility.
fn migration_hints(engine_major: u32, bundle_major: u32) -> Vec<String> {
    let mut hints = Vec::new();

    if bundle_major > engine_major {
        hints.push(format!(
            "The policy was exported from a newer engine (v{}.x.x). \
             Update this deployment before importing it.",
            bundle_major
        ));
        hints.push(
            "Alternatively, review the policy JSON and copy the values into the config by hand."
                .to_string(),
        );
    } else {
        hints.push(format!(
            "The policy predates this engine's format (v{}.x.x). \
             Some fields may be missing or carry different defaults.",
            bundle_major
        ));
        hints.push(
            "Re-export the policy from a current deployment with similar settings.".to_string(),
        );
    }

    hints.push("Check the release notes for breaking policy format changes.".to_string());

    hints
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_version_valid_semver() {
        assert_eq!(parse_version("1.2.3"), Some((1, 2, 3)));
        assert_eq!(parse_version("0.0.0"), Some((0, 0, 0)));
        assert_eq!(parse_version("10.20.30"), Some((10, 20, 30)));
    }

    #[test]
    fn parse_version_invalid_format() {
        assert_eq!(parse_version("1.2"), None);
        assert_eq!(parse_version("1.2.3.4"), None);
        assert_eq!(parse_version(""), None);
        assert_eq!(parse_version("v1.2.3"), None);
    }

    #[test]
    fn parse_version_non_numeric() {
        assert_eq!(parse_version("a.b.c"), None);
        assert_eq!(parse_version("1.2.x"), None);
        assert_eq!(parse_version("1.-2.3"), None);
    }

    #[test]
    fn same_version_compatible() {
        assert_eq!(check_compatibility("1.0.0", "1.0.0"), Compatibility::Compatible);
    }

    #[test]
    fn patch_difference_compatible() {
        assert_eq!(check_compatibility("1.0.1", "1.0.0"), Compatibility::Compatible);
        assert_eq!(check_compatibility("1.0.0", "1.0.5"), Compatibility::Compatible);
    }

    #[test]
    fn older_minor_bundle_compatible() {
        assert_eq!(check_compatibility("1.2.0", "1.1.0"), Compatibility::Compatible);
        assert_eq!(check_compatibility("1.5.0", "1.0.0"), Compatibility::Compatible);
    }

    #[test]
    fn newer_minor_bundle_warns() {
        let result = check_compatibility("1.0.5", "1.2.0");
        match result {
            Compatibility::MinorNewer { engine, bundle } => {
                assert_eq!(engine, "1.0.5");
                assert_eq!(bundle, "1.2.0");
            }
            other => panic!("expected MinorNewer, got {:?}", other),
        }
    }

    #[test]
    fn major_mismatch_incompatible_both_directions() {
        let result = check_compatibility("1.0.0", "2.0.0");
        match result {
            Compatibility::Incompatible { hints, .. } => {
                assert!(hints.iter().any(|h| h.contains("newer engine")));
            }
            other => panic!("expected Incompatible, got {:?}", other),
        }

        let result = check_compatibility("2.0.0", "1.0.0");
        match result {
            Compatibility::Incompatible { hints, .. } => {
                assert!(hints.iter().any(|h| h.contains("predates")));
            }
            other => panic!("expected Incompatible, got {:?}", other),
        }
    }

    #[test]
    fn invalid_versions_incompatible() {
        let result = check_compatibility("garbage", "1.0.0");
        assert!(matches!(result, Compatibility::Incompatible { .. }));

        let result = check_compatibility("1.0.0", "not-a-version");
        if let Compatibility::Incompatible { hints, .. } = result {
            assert!(hints.iter().any(|h| h.contains("Invalid bundle version")));
        } else {
            panic!("expected Incompatible");
        }
    }

    #[test]
    fn hints_always_mention_release_notes() {
        assert!(migration_hints(1, 2).iter().any(|h| h.contains("release notes")));
        assert!(migration_hints(2, 1).iter().any(|h| h.contains("release notes")));
    }

    #[test]
    fn display_formats_each_variant() {
        assert_eq!(format!("{}", Compatibility::Compatible), "Versions are compatible");

        let warn = Compatibility::MinorNewer {
            engine: "1.0.0".to_string(),
            bundle: "1.1.0".to_string(),
        };
        let text = format!("{}", warn);
        assert!(text.contains("1.1.0"));
        assert!(text.contains("newer"));

        let reject = Compatibility::Incompatible {
            engine: "1.0.0".to_string(),
            bundle: "2.0.0".to_string(),
            hints: vec!["Do the thing".to_string()],
        };
        let text = format!("{}", reject);
        assert!(text.contains("engine=1.0.0"));
        assert!(text.contains("bundle=2.0.0"));
        assert!(text.contains("Do the thing"));
    }

    #[test]
    fn current_policy_version_is_self_compatible() {
        use crate::policy::POLICY_VERSION;

        let result = check_compatibility(POLICY_VERSION, POLICY_VERSION);
        assert_eq!(result, Compatibility::Compatible);

        let result = check_compatibility(POLICY_VERSION, "1.0.0");
        assert!(matches!(result, Compatibility::Compatible));
    }
}

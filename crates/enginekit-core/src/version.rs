//! Release ref validation.
//!
//! Publishing accepts either the trunk ref or a `v`-prefixed SemVer 2.0
//! version such as `v0.6.2` or `v1.0.0-rc.1+build.5`.

use crate::{Error, Result};

/// The ref that always passes the gate, published as the rolling trunk image.
pub const TRUNK_REF: &str = "main";

/// Accept [`TRUNK_REF`] unconditionally, otherwise require a `v`-prefixed
/// SemVer version.
pub fn validate_ref(tag: &str) -> Result<()> {
    if tag == TRUNK_REF || is_semver(tag) {
        Ok(())
    } else {
        Err(Error::InvalidVersion {
            tag: tag.to_owned(),
        })
    }
}

/// Whether `tag` is `v` followed by a full `MAJOR.MINOR.PATCH` version with
/// optional pre-release and build metadata.
pub fn is_semver(tag: &str) -> bool {
    tag.strip_prefix('v')
        .is_some_and(|rest| semver::Version::parse(rest).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trunk_is_accepted() {
        assert!(validate_ref("main").is_ok());
    }

    #[test]
    fn release_versions_are_accepted() {
        for tag in ["v0.6.2", "v1.0.0", "v1.0.0-rc.1", "v1.0.0+build.5", "v2.3.4-alpha.1+sha.abc"] {
            assert!(validate_ref(tag).is_ok(), "rejected {tag}");
        }
    }

    #[test]
    fn missing_prefix_is_rejected() {
        let err = validate_ref("1.2.3").unwrap_err();
        assert!(matches!(err, Error::InvalidVersion { ref tag } if tag == "1.2.3"));
    }

    #[test]
    fn shorthand_and_garbage_are_rejected() {
        for tag in ["", "v", "v1", "v1.2", "v01.2.3", "latest", "Main", "v1.2.3.4", "v1.2.3-"] {
            assert!(validate_ref(tag).is_err(), "accepted {tag:?}");
        }
    }

    #[test]
    fn error_message_names_the_tag() {
        let err = validate_ref("nightly").unwrap_err().to_string();
        assert_eq!(err, "invalid semver tag: nightly");
    }

    #[test]
    fn trunk_is_not_semver() {
        assert!(!is_semver(TRUNK_REF));
    }
}

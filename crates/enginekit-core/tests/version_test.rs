use enginekit_core::{Error, validate_ref};
use proptest::prelude::*;

fn numeric() -> impl Strategy<Value = String> {
    prop_oneof![Just("0".to_owned()), "[1-9][0-9]{0,5}"]
}

fn ident() -> impl Strategy<Value = String> {
    prop_oneof![numeric(), "[a-zA-Z-][a-zA-Z0-9-]{0,8}"]
}

fn dotted(parts: impl Strategy<Value = String>) -> impl Strategy<Value = String> {
    proptest::collection::vec(parts, 1..4).prop_map(|v| v.join("."))
}

fn semver_ref() -> impl Strategy<Value = String> {
    (
        numeric(),
        numeric(),
        numeric(),
        proptest::option::of(dotted(ident())),
        proptest::option::of(dotted("[a-zA-Z0-9-]{1,8}")),
    )
        .prop_map(|(major, minor, patch, pre, build)| {
            let mut tag = format!("v{major}.{minor}.{patch}");
            if let Some(pre) = pre {
                tag.push('-');
                tag.push_str(&pre);
            }
            if let Some(build) = build {
                tag.push('+');
                tag.push_str(&build);
            }
            tag
        })
}

proptest! {
    #[test]
    fn valid_semver_refs_pass(tag in semver_ref()) {
        prop_assert!(validate_ref(&tag).is_ok(), "rejected {}", tag);
    }

    #[test]
    fn unprefixed_versions_fail(tag in semver_ref()) {
        let bare = tag.trim_start_matches('v').to_owned();
        let result = validate_ref(&bare);
        prop_assert!(
            matches!(result, Err(Error::InvalidVersion { .. })),
            "accepted {}",
            bare
        );
    }

    #[test]
    fn words_without_digits_fail(tag in "[a-zA-Z_-]{1,16}") {
        prop_assume!(tag != "main");
        prop_assert!(
            matches!(validate_ref(&tag), Err(Error::InvalidVersion { .. })),
            "accepted {}",
            tag
        );
    }

    #[test]
    fn never_panics(tag in "\\PC*") {
        let _ = validate_ref(&tag);
    }
}

#[test]
fn main_always_passes() {
    assert!(validate_ref("main").is_ok());
}

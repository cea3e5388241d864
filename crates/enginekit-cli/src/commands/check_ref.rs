use enginekit_core::{is_semver, validate_ref};

pub fn check_ref(tag: &str) -> anyhow::Result<()> {
    validate_ref(tag)?;
    if is_semver(tag) {
        println!("{tag}: release version");
    } else {
        println!("{tag}: trunk");
    }
    Ok(())
}

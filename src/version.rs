//! Version reporting

/// Git commit the binary was built from, when the build environment set it.
pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");

/// Human-readable version string, e.g. `parse-nomad-config v0.2.0 (1a2b3c4)`.
pub fn full_version() -> String {
    let mut version = format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    if let Some(commit) = GIT_COMMIT.filter(|c| !c.is_empty()) {
        version.push_str(&format!(" ({})", commit));
    }
    version
}

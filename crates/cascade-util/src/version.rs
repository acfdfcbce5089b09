//! Version handling for cascade

/// Get the version string that should be reported by the CLI.
pub fn cli_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! Version information for sshmark

/// Get the current version string
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get the long version string with build information
///
/// Build metadata comes from `SSHMARK_GIT_HASH` and `SSHMARK_BUILD_DATE` at
/// compile time; parts that were not provided are left out.
pub fn get_version_long() -> String {
    let details: Vec<String> = [
        option_env!("SSHMARK_GIT_HASH").map(|hash| format!("git {}", short_hash(hash))),
        option_env!("SSHMARK_BUILD_DATE").map(|date| format!("built {date}")),
    ]
    .into_iter()
    .flatten()
    .collect();

    if details.is_empty() {
        get_version()
    } else {
        format!("{} ({})", get_version(), details.join(", "))
    }
}

fn short_hash(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}

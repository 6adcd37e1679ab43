/// Build identity reported by `--version`, the startup log and `/metrics`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_COMMIT_HASH: &str = env!("LIBRARY_GIT_COMMIT_HASH");
pub const VERSION_WITH_COMMIT: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "+",
    env!("LIBRARY_GIT_COMMIT_HASH")
);

/// First 12 characters of the commit, or `"unknown"` when git was unavailable.
pub fn short_commit_hash() -> &'static str {
    if GIT_COMMIT_HASH == "unknown" {
        return GIT_COMMIT_HASH;
    }

    let short_len = 12usize.min(GIT_COMMIT_HASH.len());
    &GIT_COMMIT_HASH[..short_len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_with_commit_is_semver_plus_hash() {
        assert!(VERSION_WITH_COMMIT.starts_with(VERSION));
        assert!(VERSION_WITH_COMMIT.ends_with(GIT_COMMIT_HASH));
    }

    #[test]
    fn short_hash_is_a_prefix() {
        assert!(!short_commit_hash().is_empty());
        assert!(GIT_COMMIT_HASH.starts_with(short_commit_hash()));
        assert!(short_commit_hash().len() <= 12 || short_commit_hash() == "unknown");
    }
}

use crate::build_info;
use clap::{Parser, ValueEnum};

/// Backing store for books and shelves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Storage {
    Postgres,
    /// Process-local; contents are lost on exit.
    Memory,
}

#[derive(Parser, Debug)]
#[command(
    about = "Library catalog service: books, shelves and shelf creation operations",
    version = build_info::VERSION_WITH_COMMIT,
    long_version = build_info::VERSION_WITH_COMMIT
)]
pub struct Cli {
    #[clap(long, value_enum, default_value_t = Storage::Postgres)]
    /// Where books and shelves are stored
    pub storage: Storage,

    #[clap(long)]
    /// Do not apply pending database migrations on startup
    pub skip_migrations: bool,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::{Cli, Storage};
    use crate::build_info;
    use clap::{error::ErrorKind, Parser};

    #[test]
    fn defaults_to_postgres_with_migrations() {
        let cli = Cli::try_parse_from(["library"]).expect("no flags is valid");
        assert_eq!(cli.storage, Storage::Postgres);
        assert!(!cli.skip_migrations);
    }

    #[test]
    fn memory_storage_can_be_selected() {
        let cli = Cli::try_parse_from(["library", "--storage", "memory", "--skip-migrations"])
            .expect("valid flags");
        assert_eq!(cli.storage, Storage::Memory);
        assert!(cli.skip_migrations);
    }

    #[test]
    fn version_short_circuits_other_flags() {
        let err = Cli::try_parse_from(["library", "--version", "--this-flag-does-not-exist"])
            .expect_err("expected clap to stop parsing after --version");

        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
        assert!(
            err.to_string().contains(build_info::VERSION_WITH_COMMIT),
            "version output should include semver+commit hash"
        );
    }
}

use clap::Parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Download magazine issues from the Comic-Fuz store.
///
/// Credentials and paths come from the environment (or a .env loaded by the
/// shell) so that a bare `fuzdl <issue-id>` works once configured.
#[derive(Parser, Debug)]
#[command(name = "fuzdl", version)]
pub struct Cli {
    /// Issue id to download, or a comma-separated list (e.g. 4120,4121)
    pub issues: Option<String>,

    /// Root directory downloaded issues are written under
    #[arg(long, env = "OUTPUT_DIR", default_value = "downloads")]
    pub output_dir: String,

    /// Account email, required when no valid stored token exists
    #[arg(long, env = "USER_EMAIL")]
    pub email: Option<String>,

    /// Account password.
    /// WARNING: passing via --password is visible in process listings;
    /// prefer the PASSWORD environment variable.
    #[arg(long, env = "PASSWORD")]
    pub password: Option<String>,

    /// Plain-text file the session token is cached in between runs
    #[arg(long, env = "TOKEN_FILE")]
    pub token_file: Option<String>,

    /// HTTP proxy as host:port, applied to every request
    #[arg(long, env = "PROXY")]
    pub proxy: Option<String>,

    /// Zip each finished issue and delete the loose page files
    #[arg(long, env = "COMPRESS")]
    pub compress: bool,

    /// Check the store for issues newer than the recorded snapshot and
    /// download only those (first run records a baseline and downloads nothing)
    #[arg(long, env = "CHECK_UPDATE")]
    pub check_update: bool,

    /// Where the update snapshot is kept
    #[arg(long, env = "STATE_FILE", default_value = "store_data.json")]
    pub state_file: String,

    /// Substring a store entry's magazine name must contain to be considered
    #[arg(long, default_value = "まんがタイムきらら")]
    pub magazine_filter: String,

    /// Re-download pages even when the destination file already exists
    #[arg(long)]
    pub overwrite: bool,

    /// API endpoint override (testing)
    #[arg(long, env = "API_HOST", default_value = crate::api::DEFAULT_API_HOST, hide = true)]
    pub api_host: String,

    /// Image host override (testing)
    #[arg(long, env = "IMG_HOST", default_value = crate::api::DEFAULT_IMG_HOST, hide = true)]
    pub img_host: String,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_issue_list() {
        let cli = Cli::try_parse_from(["fuzdl", "4120,4121"]).unwrap();
        assert_eq!(cli.issues.as_deref(), Some("4120,4121"));
        assert!(!cli.check_update);
    }

    #[test]
    fn no_arguments_is_valid_parse() {
        // Mode validation happens later; `fuzdl --check-update` has no positional.
        let cli = Cli::try_parse_from(["fuzdl", "--check-update"]).unwrap();
        assert!(cli.issues.is_none());
        assert!(cli.check_update);
    }

    #[test]
    fn defaults_match_documented_layout() {
        let cli = Cli::try_parse_from(["fuzdl", "1"]).unwrap();
        assert_eq!(cli.output_dir, "downloads");
        assert_eq!(cli.state_file, "store_data.json");
        assert_eq!(cli.log_level, LogLevel::Info);
        assert_eq!(cli.api_host, crate::api::DEFAULT_API_HOST);
    }
}

use std::path::PathBuf;

use anyhow::Context;

use crate::cli::Cli;

/// Application configuration, built once from the CLI and passed explicitly
/// to every component — no process-wide state.
pub struct Config {
    pub output_dir: PathBuf,
    pub email: Option<String>,
    pub password: Option<String>,
    pub token_file: Option<PathBuf>,
    pub proxy: Option<String>,
    pub state_file: PathBuf,
    pub magazine_filter: String,
    pub api_host: String,
    pub img_host: String,
    pub issues: Vec<u32>,
    pub compress: bool,
    pub check_update: bool,
    pub overwrite: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("output_dir", &self.output_dir)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("token_file", &self.token_file)
            .field("issues", &self.issues)
            .field("compress", &self.compress)
            .field("check_update", &self.check_update)
            .finish_non_exhaustive()
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Config {
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let issues = cli
            .issues
            .as_deref()
            .map(parse_issue_list)
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            output_dir: expand_tilde(&cli.output_dir),
            email: cli.email,
            password: cli.password,
            token_file: cli.token_file.as_deref().map(expand_tilde),
            proxy: cli.proxy,
            state_file: expand_tilde(&cli.state_file),
            magazine_filter: cli.magazine_filter,
            api_host: cli.api_host,
            img_host: cli.img_host,
            issues,
            compress: cli.compress,
            check_update: cli.check_update,
            overwrite: cli.overwrite,
        })
    }
}

/// Parse `4120` or `4120,4121 , 4122` into issue ids.
pub(crate) fn parse_issue_list(s: &str) -> anyhow::Result<Vec<u32>> {
    s.split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<u32>()
                .with_context(|| format!("'{}' is not a valid issue id", part))
        })
        .collect()
}

/// Test fixture: a config pointing nowhere, with field overrides applied.
#[cfg(test)]
pub(crate) fn test_config(overrides: impl FnOnce(&mut Config)) -> Config {
    let mut config = Config {
        output_dir: std::env::temp_dir().join("fuzdl-tests"),
        email: Some("reader@example.com".into()),
        password: Some("hunter2".into()),
        token_file: None,
        proxy: None,
        state_file: PathBuf::from("store_data.json"),
        magazine_filter: "まんがタイムきらら".into(),
        api_host: "http://127.0.0.1:1".into(),
        img_host: "http://127.0.0.1:1".into(),
        issues: Vec::new(),
        compress: false,
        check_update: false,
        overwrite: false,
    };
    overrides(&mut config);
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_single_issue() {
        assert_eq!(parse_issue_list("4120").unwrap(), vec![4120]);
    }

    #[test]
    fn parse_issue_list_with_spaces() {
        assert_eq!(
            parse_issue_list("4120, 4121 ,4122").unwrap(),
            vec![4120, 4121, 4122]
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_issue_list("4120,abc").is_err());
        assert!(parse_issue_list("").is_err());
    }

    #[test]
    fn expand_tilde_with_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/tokens/fuz"), home.join("tokens/fuz"));
        }
    }

    #[test]
    fn expand_tilde_passthrough() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde("relative"), PathBuf::from("relative"));
    }

    #[test]
    fn from_cli_carries_mode_flags() {
        let cli = Cli::try_parse_from(["fuzdl", "7,8", "--compress", "--overwrite"]).unwrap();
        let config = Config::from_cli(cli).unwrap();
        assert_eq!(config.issues, vec![7, 8]);
        assert!(config.compress);
        assert!(config.overwrite);
        assert!(!config.check_update);
    }

    #[test]
    fn debug_redacts_password() {
        let config = test_config(|_| {});
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
    }
}

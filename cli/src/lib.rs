use clap::Parser;
use std::path::{Path, PathBuf};
use utils::app_config::AppConfig;
use utils::error::{Error, Result};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "rights-patcher", version)]
#[command(
    about = "Disable interactive deletion rights for every document and catalog in exported role files",
    long_about = None
)]
pub struct Cli {
    /// Root of the configuration export (contains Documents, Catalogs and Roles)
    #[arg(long = "dirPath", value_name = "PATH")]
    pub dir_path: Option<PathBuf>,

    /// Additional configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Set the logging level (debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Merge the command-line overrides into AppConfig; must run before logging is set up.
pub fn apply_overrides(cli: &Cli) -> Result<()> {
    AppConfig::merge_config(cli.config.as_deref())?;

    if let Some(level) = &cli.log_level {
        AppConfig::set("log.level", level)?;
    }

    Ok(())
}

/// The export root; checked before any file is opened, including the log file.
pub fn require_dir_path(cli: &Cli) -> Result<&Path> {
    cli.dir_path
        .as_deref()
        .ok_or_else(|| Error::new("dirPath is undefined"))
}

pub async fn cli_match(cli: Cli) -> Result<()> {
    let dir_path = require_dir_path(&cli)?.to_path_buf();

    commands::patch_cmd(dir_path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_dir_path() {
        let cli = Cli::try_parse_from(["rights-patcher"]).unwrap();
        assert_eq!(
            require_dir_path(&cli).unwrap_err().to_string(),
            "dirPath is undefined"
        );

        let cli = Cli::try_parse_from(["rights-patcher", "--dirPath=/tmp/export"]).unwrap();
        assert_eq!(require_dir_path(&cli).unwrap(), Path::new("/tmp/export"));
    }
}

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::import::{ImportOptions, MAX_REPORTED_ERRORS};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MatchlogConfig {
    pub database: Option<String>,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default = "default_max_errors")]
    pub max_errors: usize,
    /// Single-character field delimiter, e.g. "," or "\t"
    pub delimiter: Option<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_errors: default_max_errors(),
            delimiter: None,
        }
    }
}

fn default_max_errors() -> usize {
    MAX_REPORTED_ERRORS
}

impl ImportConfig {
    pub fn to_options(&self) -> anyhow::Result<ImportOptions> {
        let delimiter = match self.delimiter.as_deref() {
            None => None,
            Some(d) => Some(parse_delimiter(d)?),
        };
        Ok(ImportOptions {
            max_errors: self.max_errors,
            delimiter,
        })
    }
}

/// Accepts a single ASCII character or the escapes `\t` and `tab`
pub fn parse_delimiter(raw: &str) -> anyhow::Result<u8> {
    match raw {
        "\\t" | "tab" => Ok(b'\t'),
        s if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        other => anyhow::bail!("invalid delimiter {:?}: expected a single ASCII character", other),
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("matchlog.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("data").join("matchlog.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<MatchlogConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: MatchlogConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &MatchlogConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Database path from the command line, then the config file, then the default
pub fn resolve_database_path(cli: Option<&Path>, config: Option<&MatchlogConfig>) -> PathBuf {
    cli.map(Path::to_path_buf)
        .or_else(|| config.and_then(|c| c.database.as_ref()).map(PathBuf::from))
        .unwrap_or_else(default_database_path)
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

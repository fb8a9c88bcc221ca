use anyhow::{Context, Result};
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the accounting API.
    pub api_base: String,

    /// Administration (division) number used in API paths.
    #[serde(default)]
    pub division: Option<String>,

    /// OAuth2 access token. Obtaining it is out of scope here; paste one in
    /// via `incasso login --access-token <token>`.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Sender identity for outgoing dunning mail.
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,

    /// Balance at or below which the severe-debt mail template is used.
    #[serde(default = "default_extreme_threshold")]
    pub extreme_threshold: Decimal,

    /// Directory holding the `standard_email` / `extreme_email` templates.
    #[serde(default)]
    pub templates_dir: Option<String>,

    /// Directory where composed `.eml` files are written.
    #[serde(default)]
    pub outbox_dir: Option<String>,
}

fn default_extreme_threshold() -> Decimal {
    Decimal::from(-100)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: "https://start.exactonline.nl/api".to_string(),
            division: None,
            access_token: None,
            sender_name: "Treasurer-auto AEGEE-Delft".to_string(),
            sender_email: "invoice@aegee-delft.nl".to_string(),
            subject: "Incasso".to_string(),
            extreme_threshold: default_extreme_threshold(),
            templates_dir: None,
            outbox_dir: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

pub fn app_paths(override_home: Option<PathBuf>) -> Result<AppPaths> {
    if let Some(home) = override_home {
        return Ok(AppPaths {
            config_dir: home.join("config"),
            data_dir: home.join("data"),
        });
    }

    let proj = ProjectDirs::from("nl", "aegee-delft", "incasso")
        .context("Failed to resolve platform directories")?;

    Ok(AppPaths {
        config_dir: proj.config_dir().to_path_buf(),
        data_dir: proj.data_dir().to_path_buf(),
    })
}

pub fn load_or_init_config(paths: &AppPaths) -> Result<(AppConfig, PathBuf)> {
    fs::create_dir_all(&paths.config_dir)
        .with_context(|| format!("Failed to create config dir {}", paths.config_dir.display()))?;

    let cfg_path = paths.config_dir.join("config.json");
    if !cfg_path.exists() {
        let cfg = AppConfig::default();
        write_config(&cfg_path, &cfg)?;
        return Ok((cfg, cfg_path));
    }

    let raw = fs::read_to_string(&cfg_path)
        .with_context(|| format!("Failed to read {}", cfg_path.display()))?;
    let cfg: AppConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", cfg_path.display()))?;

    Ok((cfg, cfg_path))
}

pub fn write_config(path: &Path, cfg: &AppConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(cfg)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

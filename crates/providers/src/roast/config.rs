use directories::BaseDirs;
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::warn;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://ai4free-vortex-3b-roast-api.hf.space";
pub const GENERATE_PATH: &str = "generate-roasts/";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RoastFileConfig {
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub history_path: Option<PathBuf>,
    pub theme: Option<String>,
}

#[derive(Clone, Debug)]
pub struct RoastConfig {
    pub base_url: String,
    pub timeout: Option<Duration>, // None: transport default
    pub proxy: Option<String>,
    pub history_path: Option<PathBuf>,
    pub theme: Option<String>, // "dark" | "light"
}

impl Default for RoastConfig {
    fn default() -> Self {
        Self::resolve(None, |_| None)
    }
}

impl RoastConfig {
    pub fn from_env_and_file() -> Self {
        let file_cfg = Self::config_path()
            .filter(|p| p.exists())
            .and_then(|p| Self::load_file(&p));
        Self::resolve(file_cfg, |k| env::var(k).ok())
    }

    /// Reads a TOML config file; an unreadable or malformed file yields `None`.
    pub fn load_file(path: &Path) -> Option<RoastFileConfig> {
        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) => {
                warn!(target: "providers::roast", "cannot read {}: {}", path.display(), e);
                return None;
            }
        };
        match toml::from_str::<RoastFileConfig>(&text) {
            Ok(c) => Some(c),
            Err(e) => {
                warn!(target: "providers::roast", "ignoring malformed {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Defaults, then the file, then the environment.
    pub fn resolve(
        file_cfg: Option<RoastFileConfig>,
        var: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let file_cfg = file_cfg.unwrap_or_default();

        let base_url = var("ROAST_API_BASE_URL")
            .or(file_cfg.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_ms = match var("ROAST_TIMEOUT_MS") {
            Some(v) => match v.trim().parse::<u64>() {
                Ok(ms) => Some(ms),
                Err(_) => {
                    warn!(target: "providers::roast", "ROAST_TIMEOUT_MS is not a number: {:?}", v);
                    file_cfg.timeout_ms
                }
            },
            None => file_cfg.timeout_ms,
        };

        let history_path = var("ROAST_HISTORY_PATH")
            .map(PathBuf::from)
            .or(file_cfg.history_path);

        let proxy = var("HTTPS_PROXY").or_else(|| var("HTTP_PROXY"));

        RoastConfig {
            base_url,
            timeout: timeout_ms.filter(|ms| *ms > 0).map(Duration::from_millis),
            proxy,
            history_path,
            theme: file_cfg.theme,
        }
    }

    /// Full URL of the generate call.
    pub fn endpoint(&self) -> anyhow::Result<Url> {
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)
            .map_err(|e| anyhow::anyhow!("invalid base url {:?}: {}", self.base_url, e))?;
        Ok(base.join(GENERATE_PATH)?)
    }

    fn config_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        let p = if cfg!(target_os = "windows") {
            base.home_dir().join(".roast").join("config.toml")
        } else {
            base.config_dir().join("roast").join("config.toml")
        };
        Some(p)
    }
}

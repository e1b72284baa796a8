use anyhow::{Error, format_err};
use log::debug;
use serde::Deserialize;
use stack_string::StackString;
use std::{
    fs::File,
    io::BufReader,
    ops::Deref,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{language::Language, timezone::TimeZone};

const APP_DIR: &str = "absence_helper";

#[derive(Debug, Deserialize)]
pub struct ConfigInner {
    #[serde(default = "default_credentials_file")]
    pub credentials_file: PathBuf,
    #[serde(default = "default_calendar_config_file")]
    pub calendar_config_file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config(Arc<ConfigInner>);

fn default_credentials_file() -> PathBuf {
    find_config_file("credentials.json")
}
fn default_calendar_config_file() -> PathBuf {
    find_config_file("config.json")
}

/// Prefer the working directory, then the user config directory.
fn find_config_file(fname: &str) -> PathBuf {
    let local = Path::new(fname);
    if local.exists() {
        return local.to_path_buf();
    }
    dirs::config_dir()
        .map(|d| d.join(APP_DIR).join(fname))
        .filter(|p| p.exists())
        .unwrap_or_else(|| local.to_path_buf())
}

impl Config {
    pub fn init_config() -> Result<Self, Error> {
        let fname = Path::new("config.env");
        let env_file = if fname.exists() {
            Some(fname.to_path_buf())
        } else {
            dirs::config_dir().map(|d| d.join(APP_DIR).join("config.env"))
        };

        dotenvy::dotenv().ok();

        if let Some(env_file) = env_file.filter(|p| p.exists()) {
            dotenvy::from_path(env_file).ok();
        }

        let conf: ConfigInner = envy::from_env()?;

        Ok(Self(Arc::new(conf)))
    }
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Contents of `config.json`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CalendarConfig {
    pub calendar_id: StackString,
    #[serde(default)]
    pub time_zone: TimeZone,
    #[serde(default)]
    pub language: Language,
}

impl CalendarConfig {
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        debug!("reading calendar config {}", path.display());
        let f = File::open(path)
            .map_err(|e| format_err!("Unable to open {}: {e}", path.display()))?;
        serde_json::from_reader(BufReader::new(f))
            .map_err(|e| format_err!("Unable to parse {}: {e}", path.display()))
    }
}

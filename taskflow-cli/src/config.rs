use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use taskflow_core::SchedulerConfig;

/// Overrides the `~/.taskflow` directory.
pub const HOME_ENV: &str = "TASKFLOW_HOME";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scheduler: SchedulerConfig,
    pub clock: ClockSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockSection {
    /// IANA zone used to read "now" when `--now` is not given.
    pub timezone: String,
}

impl Default for ClockSection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// `EnvFilter` directive; `RUST_LOG` wins when set.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// `$TASKFLOW_HOME` when set and non-empty, else `$HOME/.taskflow`.
fn taskflow_dir(override_dir: Option<OsString>, home: Option<OsString>) -> Result<PathBuf> {
    match (override_dir, home) {
        (Some(dir), _) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        (_, Some(home)) if !home.is_empty() => Ok(PathBuf::from(home).join(".taskflow")),
        _ => bail!("cannot locate config: neither {HOME_ENV} nor HOME is set"),
    }
}

/// The `--config` path when given, else `config.toml` in the taskflow directory.
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => {
            let dir = taskflow_dir(std::env::var_os(HOME_ENV), std::env::var_os("HOME"))?;
            Ok(dir.join("config.toml"))
        }
    }
}

/// Missing file means defaults. A file that exists but does not parse is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = config_path(path)?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

/// Creates the parent directory as needed.
pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Writes defaults unless a file is already there. Returns the path and
/// whether it was written.
pub fn init_config(path: Option<&Path>) -> Result<(PathBuf, bool)> {
    let p = config_path(path)?;
    if p.exists() {
        return Ok((p, false));
    }
    save_config(&Config::default(), &p)?;
    Ok((p, true))
}

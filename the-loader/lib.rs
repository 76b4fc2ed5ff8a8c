//! Well-known locations of the picker's files.
//!
//! Directories follow the platform base strategy from `etcetera` and can be
//! moved with `THE_PICKER_CONFIG_DIR` and `THE_PICKER_CACHE_DIR`. The config
//! and log file paths are fixed once, either explicitly at startup or lazily
//! on first use.

use std::{
  borrow::Cow,
  fmt,
  path::{
    Path,
    PathBuf,
  },
  sync::OnceLock,
};

use etcetera::base_strategy::{
  BaseStrategy,
  choose_base_strategy,
};

const APP_DIR: &str = "the-picker";

static CONFIG_FILE: OnceLock<PathBuf> = OnceLock::new();

static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

pub fn initialize_config_file(specified_file: Option<PathBuf>) {
  let config_file = specified_file.unwrap_or_else(default_config_file);
  CONFIG_FILE.set(config_file).ok();
}

pub fn initialize_log_file(specified_file: Option<PathBuf>) {
  let log_file = specified_file.unwrap_or_else(default_log_file);
  ensure_parent_dir(&log_file);
  LOG_FILE.set(log_file).ok();
}

pub fn config_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("THE_PICKER_CONFIG_DIR") {
    return expand_tilde(Path::new(&dir)).into_owned();
  }
  match choose_base_strategy() {
    Ok(strategy) => strategy.config_dir().join(APP_DIR),
    Err(err) => fallback_dir(err),
  }
}

pub fn cache_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("THE_PICKER_CACHE_DIR") {
    return expand_tilde(Path::new(&dir)).into_owned();
  }
  match choose_base_strategy() {
    Ok(strategy) => strategy.cache_dir().join(APP_DIR),
    Err(err) => fallback_dir(err),
  }
}

fn fallback_dir(err: impl fmt::Display) -> PathBuf {
  let dir = std::env::temp_dir().join(APP_DIR);
  log::warn!("no home directory ({err}), using {}", dir.display());
  dir
}

pub fn config_file() -> PathBuf {
  CONFIG_FILE.get_or_init(default_config_file).clone()
}

pub fn log_file() -> PathBuf {
  LOG_FILE
    .get_or_init(|| {
      let path = default_log_file();
      ensure_parent_dir(&path);
      path
    })
    .clone()
}

pub fn default_config_file() -> PathBuf {
  config_dir().join("config.toml")
}

pub fn default_log_file() -> PathBuf {
  cache_dir().join("the-picker.log")
}

/// Replaces a leading `~` with the user's home directory.
pub fn expand_tilde(path: &Path) -> Cow<'_, Path> {
  expand_tilde_with(path, etcetera::home_dir().ok().as_deref())
}

fn expand_tilde_with<'a>(path: &'a Path, home: Option<&Path>) -> Cow<'a, Path> {
  let Some(home) = home else {
    return Cow::Borrowed(path);
  };
  let mut components = path.components();
  match components.next() {
    Some(first) if first.as_os_str() == "~" => Cow::Owned(home.join(components.as_path())),
    _ => Cow::Borrowed(path),
  }
}

fn ensure_parent_dir(path: &Path) {
  if let Some(parent) = path.parent()
    && !parent.exists()
    && let Err(err) = std::fs::create_dir_all(parent)
  {
    log::warn!("failed to create {}: {err}", parent.display());
  }
}

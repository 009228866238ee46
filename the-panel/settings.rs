//! `settings.toml` for the breadcrumb panel.
//!
//! ```toml
//! debug = false            # trace resolution decisions
//! max_scan_lines = 5000    # safety limit when walking upwards
//! update_delay_ms = 32     # debounce for bursts of caret moves
//! ```
//!
//! A workspace-local file (`.the-crumbs/settings.toml`) is merged over the
//! global one in the user config directory.

use std::{
  fs,
  io,
  path::PathBuf,
  time::Duration,
};

use etcetera::base_strategy::{
  BaseStrategy,
  choose_base_strategy,
};
use serde::{
  Deserialize,
  Serialize,
};
use the_crumbs_core::{
  ResolveOptions,
  ancestor::DEFAULT_MAX_SCAN_LINES,
};
use thiserror::Error;
use toml::Value;

const CONFIG_DIR: &str = "the-crumbs";
const WORKSPACE_DIR: &str = ".the-crumbs";
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
  #[error("bad settings: {0}")]
  BadConfig(#[from] toml::de::Error),
  #[error(transparent)]
  Io(#[from] io::Error),
  #[error("max_scan_lines must be at least 1")]
  ZeroScanLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
  pub debug:           bool,
  pub max_scan_lines:  usize,
  pub update_delay_ms: u64,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      debug:           false,
      max_scan_lines:  DEFAULT_MAX_SCAN_LINES,
      update_delay_ms: 32,
    }
  }
}

impl Settings {
  pub fn from_toml(text: &str) -> Result<Settings, SettingsError> {
    toml::from_str::<Settings>(text)?.validate()
  }

  /// Merge the workspace-local settings over the global ones. A missing file
  /// is only an error when both are missing; malformed files always are.
  pub fn load(
    global: Result<String, SettingsError>,
    local: Result<String, SettingsError>,
  ) -> Result<Settings, SettingsError> {
    let parse = |text: String| toml::from_str::<toml::Table>(&text).map(Value::Table);
    let global = global.and_then(|text| parse(text).map_err(SettingsError::BadConfig));
    let local = local.and_then(|text| parse(text).map_err(SettingsError::BadConfig));

    let merged = match (global, local) {
      (Ok(global), Ok(local)) => merge_toml_values(global, local, 3),
      (_, Err(SettingsError::BadConfig(err))) | (Err(SettingsError::BadConfig(err)), _) => {
        return Err(SettingsError::BadConfig(err));
      },
      (Ok(value), Err(_)) | (Err(_), Ok(value)) => value,
      (Err(err), Err(_)) => return Err(err),
    };

    let settings: Settings = merged.try_into()?;
    settings.validate()
  }

  /// Load from the user config directory and the current workspace.
  pub fn load_user() -> Result<Settings, SettingsError> {
    let global = fs::read_to_string(config_file()).map_err(SettingsError::Io);
    let local = fs::read_to_string(workspace_config_file()).map_err(SettingsError::Io);
    Self::load(global, local)
  }

  /// Like [`Settings::load_user`], falling back to the defaults. Missing
  /// files are expected; anything else is logged.
  pub fn load_user_or_default() -> Settings {
    match Self::load_user() {
      Ok(settings) => settings,
      Err(SettingsError::Io(err)) if err.kind() == io::ErrorKind::NotFound => Settings::default(),
      Err(err) => {
        log::warn!("falling back to default settings: {err}");
        Settings::default()
      },
    }
  }

  fn validate(self) -> Result<Settings, SettingsError> {
    if self.max_scan_lines == 0 {
      return Err(SettingsError::ZeroScanLimit);
    }
    Ok(self)
  }

  /// A per-view `debug` flag wins over the global one.
  pub fn with_debug_override(self, debug: Option<bool>) -> Settings {
    Settings {
      debug: debug.unwrap_or(self.debug),
      ..self
    }
  }

  pub fn update_delay(&self) -> Duration {
    Duration::from_millis(self.update_delay_ms)
  }

  pub fn resolve_options(&self, tab_width: u16) -> ResolveOptions {
    ResolveOptions {
      tab_width,
      max_scan_lines: self.max_scan_lines,
      debug: self.debug,
    }
  }
}

pub fn config_dir() -> PathBuf {
  match choose_base_strategy() {
    Ok(strategy) => strategy.config_dir().join(CONFIG_DIR),
    Err(err) => {
      log::warn!("no user config directory: {err}");
      PathBuf::from(CONFIG_DIR)
    },
  }
}

pub fn config_file() -> PathBuf {
  config_dir().join(SETTINGS_FILE)
}

pub fn workspace_config_file() -> PathBuf {
  PathBuf::from(WORKSPACE_DIR).join(SETTINGS_FILE)
}

/// Merge `right` into `left`, descending at most `merge_depth` levels into
/// nested tables. Everything else is taken from `right`.
pub fn merge_toml_values(left: Value, right: Value, merge_depth: usize) -> Value {
  match (left, right) {
    (Value::Table(mut left_map), Value::Table(right_map)) if merge_depth > 0 => {
      for (rname, rvalue) in right_map {
        let merged_value = match left_map.remove(&rname) {
          Some(lvalue) => merge_toml_values(lvalue, rvalue, merge_depth - 1),
          None => rvalue,
        };
        left_map.insert(rname, merged_value);
      }
      Value::Table(left_map)
    },
    (_, value) => value,
  }
}

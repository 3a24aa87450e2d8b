//! Layered configuration: defaults, then a TOML file, then `INTAKE_*`
//! environment variables. Command-line flags are applied on top by `main`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use intake_core::{store::DEFAULT_SLOT_KEY, validate::Rules};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// SQLite file holding the durable slot. A leading `~/` is expanded.
  pub store_path: PathBuf,
  /// Name of the slot key holding the record collection.
  pub slot_key:   String,
  /// Where log output goes; the terminal belongs to the UI.
  pub log_file:   PathBuf,
  pub rules:      Rules,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      store_path: PathBuf::from("intake.db"),
      slot_key:   DEFAULT_SLOT_KEY.to_owned(),
      log_file:   PathBuf::from("intake.log"),
      rules:      Rules::default(),
    }
  }
}

impl Settings {
  /// Load settings. An explicit `file` must exist; otherwise `intake.toml` in
  /// the working directory is used if present.
  pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
    let file_source = match file {
      Some(path) => config::File::from(path).required(true),
      None => config::File::with_name("intake").required(false),
    };

    let settings: Self = config::Config::builder()
      .add_source(file_source)
      .add_source(
        config::Environment::with_prefix("INTAKE")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise settings")?;

    Ok(Self {
      store_path: expand_tilde(&settings.store_path),
      log_file: expand_tilde(&settings.log_file),
      ..settings
    })
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

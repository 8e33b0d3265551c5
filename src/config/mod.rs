//! 設定ファイルの読み込み
//!
//! 優先順位: 既定値 → 設定ファイル → コマンドライン引数

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::settings::default_settings_path;
use crate::ui::DEFAULT_CELL_PIXELS;

/// 端末1セルのピクセル寸法の上限
pub const MAX_CELL_PIXELS: u32 = 64;

/// 設定読み込みのエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Invalid TOML in {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid value in {path}: {reason}")]
    InvalidValue { path: PathBuf, reason: String },
}

/// `~/.config/hexdump/config.toml` の内容（すべて省略可）
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// 端末1セルを何ピクセルとみなすか（幅）
    #[serde(default)]
    pub cell_pixel_width: Option<u32>,

    /// 端末1セルを何ピクセルとみなすか（高さ）
    #[serde(default)]
    pub cell_pixel_height: Option<u32>,

    /// コマンド履歴・配色の保存先
    #[serde(default)]
    pub settings_path: Option<PathBuf>,

    /// ログファイル
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// `help` コマンドで表示するファイル（未指定なら組み込みのヘルプ）
    #[serde(default)]
    pub help_file: Option<PathBuf>,
}

/// 優先順位を適用した後の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub cell_pixels: (u32, u32),
    pub settings_path: PathBuf,
    pub log_file_path: PathBuf,
    pub help_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            cell_pixels: DEFAULT_CELL_PIXELS,
            settings_path: default_settings_path(),
            log_file_path: default_log_path(),
            help_file: None,
        }
    }
}

impl ResolvedConfig {
    /// 設定ファイルの値で上書き
    pub fn merge(mut self, file: ConfigFile) -> Self {
        if let Some(width) = file.cell_pixel_width {
            self.cell_pixels.0 = width;
        }
        if let Some(height) = file.cell_pixel_height {
            self.cell_pixels.1 = height;
        }
        if let Some(path) = file.settings_path {
            self.settings_path = path;
        }
        if let Some(path) = file.log_file_path {
            self.log_file_path = path;
        }
        if file.help_file.is_some() {
            self.help_file = file.help_file;
        }
        self
    }
}

/// 既定のログファイル `~/.local/state/hexdump/hexdump.log`
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("hexdump").join("hexdump.log")
    } else {
        PathBuf::from("hexdump.log")
    }
}

/// 既定の設定ファイルパス
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hexdump").join("config.toml"))
}

/// 設定ファイルを読み込む。存在しなければ `Ok(None)`
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let in_range = |v: Option<u32>| v.is_none_or(|v| (1..=MAX_CELL_PIXELS).contains(&v));
    if !in_range(config.cell_pixel_width) || !in_range(config.cell_pixel_height) {
        return Err(ConfigError::InvalidValue {
            path,
            reason: format!("cell pixel size must be between 1 and {}", MAX_CELL_PIXELS),
        });
    }

    Ok(Some(config))
}

/// 明示パス（無ければ既定パス）から読み込んで既定値に重ねる
pub fn load_config(explicit: Option<PathBuf>) -> Result<ResolvedConfig, ConfigError> {
    let path = explicit.or_else(default_config_path);
    let file = match path {
        Some(path) => load_config_file(path)?,
        None => None,
    };
    Ok(match file {
        Some(file) => ResolvedConfig::default().merge(file),
        None => ResolvedConfig::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let result = load_config_file("/nonexistent/hexdump/config.toml");
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("hexdump/config.toml"));
        }
    }

    #[test]
    fn parses_and_merges_values() {
        let (_dir, path) = write_config(
            r#"
cell_pixel_width = 10
help_file = "/tmp/help.txt"
"#,
        );
        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.cell_pixels, (10, DEFAULT_CELL_PIXELS.1));
        assert_eq!(config.help_file, Some(PathBuf::from("/tmp/help.txt")));
        assert_eq!(config.settings_path, default_settings_path());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let (_dir, path) = write_config("zoom = 3\n");
        assert!(matches!(
            load_config_file(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn zero_cell_size_is_rejected() {
        let (_dir, path) = write_config("cell_pixel_height = 0\n");
        assert!(matches!(
            load_config_file(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn oversized_cell_size_is_rejected() {
        let (_dir, path) = write_config("cell_pixel_width = 4000000000\n");
        assert!(matches!(
            load_config_file(&path),
            Err(ConfigError::InvalidValue { .. })
        ));

        let (_dir, path) = write_config("cell_pixel_width = 64\ncell_pixel_height = 64\n");
        assert!(load_config_file(&path).unwrap().is_some());
    }

    #[test]
    fn merge_leaves_unset_fields_alone() {
        let merged = ResolvedConfig::default().merge(ConfigFile::default());
        assert_eq!(merged, ResolvedConfig::default());
    }
}

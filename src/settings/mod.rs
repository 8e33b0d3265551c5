//! コマンド履歴と配色の永続化
//!
//! 読み込みは全部か無しか: 3項目のどれかが欠けている・壊れている場合は
//! すべて既定値を使う。書き込みの失敗は呼び出し側でログに残すだけで、
//! 表示状態には影響させない。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::app::Rgb;

/// 永続化のエラー
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to write settings at {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// 起動時に復元する設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub commands: Vec<String>,
    pub fore_color: Rgb,
    pub back_color: Rgb,
}

/// 設定の保存先
pub trait SettingsStore {
    /// 3項目すべてが揃って正しい場合のみ `Some`
    fn load(&self) -> Option<Settings>;

    fn save_commands(&mut self, commands: &[String]) -> Result<(), SettingsError>;

    fn save_colors(&mut self, fore: Rgb, back: Rgb) -> Result<(), SettingsError>;
}

/// ファイル上の表現。各項目は独立に欠落・破損しうる
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    commands: Option<Value>,
    #[serde(rename = "fore-color", default, skip_serializing_if = "Option::is_none")]
    fore_color: Option<Value>,
    #[serde(rename = "back-color", default, skip_serializing_if = "Option::is_none")]
    back_color: Option<Value>,
}

impl StoredSettings {
    fn resolve(&self) -> Option<Settings> {
        let commands = serde_json::from_value(self.commands.clone()?).ok()?;
        let fore_color = serde_json::from_value(self.fore_color.clone()?).ok()?;
        let back_color = serde_json::from_value(self.back_color.clone()?).ok()?;
        Some(Settings {
            commands,
            fore_color,
            back_color,
        })
    }
}

/// 既定の保存先 `~/.local/share/hexdump/settings.json`
pub fn default_settings_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("hexdump").join("settings.json")
    } else {
        PathBuf::from("hexdump-settings.json")
    }
}

/// JSONファイルに保存するストア
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    stored: StoredSettings,
}

impl FileStore {
    /// 既存の内容を読み込んで開く。読めない・壊れている場合は空から始める
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let stored = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = ?path, error = %e, "settings file is corrupt, ignoring");
                StoredSettings::default()
            }),
            Err(e) => {
                debug!(path = ?path, error = %e, "no settings file");
                StoredSettings::default()
            }
        };
        Self { path, stored }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), SettingsError> {
        let write_err = |source| SettingsError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(&self.stored)?;
        std::fs::write(&self.path, json).map_err(write_err)
    }
}

impl SettingsStore for FileStore {
    fn load(&self) -> Option<Settings> {
        self.stored.resolve()
    }

    fn save_commands(&mut self, commands: &[String]) -> Result<(), SettingsError> {
        self.stored.commands = Some(serde_json::to_value(commands)?);
        self.flush()
    }

    fn save_colors(&mut self, fore: Rgb, back: Rgb) -> Result<(), SettingsError> {
        self.stored.fore_color = Some(serde_json::to_value(fore)?);
        self.stored.back_color = Some(serde_json::to_value(back)?);
        self.flush()
    }
}

/// メモリ上のストア（永続化しない起動やテスト用）
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub commands: Option<Vec<String>>,
    pub fore_color: Option<Rgb>,
    pub back_color: Option<Rgb>,
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Option<Settings> {
        Some(Settings {
            commands: self.commands.clone()?,
            fore_color: self.fore_color?,
            back_color: self.back_color?,
        })
    }

    fn save_commands(&mut self, commands: &[String]) -> Result<(), SettingsError> {
        self.commands = Some(commands.to_vec());
        Ok(())
    }

    fn save_colors(&mut self, fore: Rgb, back: Rgb) -> Result<(), SettingsError> {
        self.fore_color = Some(fore);
        self.back_color = Some(back);
        Ok(())
    }
}

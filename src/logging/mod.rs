//! tracingの初期化
//!
//! 画面を端末が占有するため、ログはファイルに書き出す。
//! 別の端末で `tail -f` して確認する。

use std::path::{Path, PathBuf};

use thiserror::Error;

/// ログ初期化のエラー
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// ファイル出力のsubscriberを登録する。`RUST_LOG` を尊重し、既定は "info"
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    let directory = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.to_path_buf(),
        source,
    })?;

    let file_name = log_path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file_appender)
        .with_ansi(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(tracing_init)]
    fn init_creates_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        let log_file = dir.path().join("logs").join("hexdump.log");

        // subscriberが既に登録済みでもディレクトリは作られる
        let _ = init(&log_file);
        assert!(dir.path().join("logs").exists());
    }

    #[test]
    #[serial(tracing_init)]
    fn second_init_reports_subscriber_already_set() {
        let dir = tempfile::tempdir().unwrap();
        let log_file = dir.path().join("hexdump.log");

        let _ = init(&log_file);
        assert!(matches!(
            init(&log_file),
            Err(LoggingError::SubscriberAlreadySet)
        ));
    }

    #[test]
    fn path_without_file_name_is_invalid() {
        assert!(matches!(
            init(Path::new("/")),
            Err(LoggingError::InvalidPath(_))
        ));
    }
}

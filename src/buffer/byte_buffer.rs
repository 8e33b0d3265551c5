use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::BufferError;

/// 読み込んだバイナリを保持する構造体（読み込み後は不変）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    /// 読み込み元（ファイル以外はNone）
    source: Option<PathBuf>,
    /// バッファデータ
    data: Vec<u8>,
}

impl ByteBuffer {
    /// 空のバッファを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// バイト列から作成
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { source: None, data }
    }

    /// ファイルから読み込み
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, BufferError> {
        let path = path.into();
        let mut file = File::open(&path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        Ok(Self {
            source: Some(path),
            data,
        })
    }

    /// 内容を丸ごと置き換える（長さ0も可）
    pub fn load(&mut self, data: Vec<u8>) {
        self.source = None;
        self.data = data;
    }

    /// 空を不正として扱う呼び出し元向けの読み込み
    pub fn load_non_empty(&mut self, data: Vec<u8>) -> Result<(), BufferError> {
        if data.is_empty() {
            return Err(BufferError::EmptySource);
        }
        self.load(data);
        Ok(())
    }

    /// 内容を破棄
    pub fn clear(&mut self) {
        self.source = None;
        self.data.clear();
    }

    /// データの長さを取得
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// データが空かどうか
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 指定位置のバイトを取得
    pub fn read_byte(&self, offset: usize) -> Result<u8, BufferError> {
        self.data
            .get(offset)
            .copied()
            .ok_or(BufferError::OutOfRange(offset))
    }

    /// 読み込み元のパス
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// ファイル名を取得
    pub fn filename(&self) -> Option<&str> {
        self.source
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
    }

    /// 生データへの参照を取得
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

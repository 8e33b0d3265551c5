mod byte_buffer;

pub use byte_buffer::ByteBuffer;

use thiserror::Error;

/// バッファ操作のエラー
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("offset {0:#x} is out of range")]
    OutOfRange(usize),

    #[error("source is empty")]
    EmptySource,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

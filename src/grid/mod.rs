//! グリッドのアドレッシングとナビゲーション

mod cursor;
mod layout;

pub use cursor::{CursorModel, FAST_SPEED, NORMAL_SPEED, WheelDirection, speed};
pub use layout::{COLUMNS_PER_ROW, PixelRect, ViewportLayout, ZOOM_FLOOR};

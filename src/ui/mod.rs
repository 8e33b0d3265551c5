mod canvas;
mod hex_view;
mod scene;

pub use canvas::{CanvasView, DEFAULT_CELL_PIXELS};
pub use hex_view::{GridRenderer, display_char};
pub use scene::{Align, DrawOp, Scene};

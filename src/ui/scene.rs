use crate::app::Rgb;
use crate::grid::PixelRect;

/// 文字列の水平方向の揃え
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// ピクセル座標での描画命令
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill {
        rect: PixelRect,
        color: Rgb,
    },
    /// `(x, y)` は揃え位置と行の縦中央
    Text {
        x: u32,
        y: u32,
        align: Align,
        color: Rgb,
        text: String,
    },
}

/// 1フレーム分の描画命令列
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub font_size: f32,
    pub ops: Vec<DrawOp>,
}

impl Scene {
    pub fn new(width: u32, height: u32, font_size: f32) -> Self {
        Self {
            width,
            height,
            font_size,
            ops: Vec::new(),
        }
    }

    pub fn fill(&mut self, rect: PixelRect, color: Rgb) {
        self.ops.push(DrawOp::Fill { rect, color });
    }

    pub fn text(&mut self, x: u32, y: u32, align: Align, color: Rgb, text: impl Into<String>) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            align,
            color,
            text: text.into(),
        });
    }

    /// 描画される文字列（テスト・デバッグ用）
    pub fn texts(&self) -> impl Iterator<Item = (u32, u32, &str)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { x, y, text, .. } => Some((*x, *y, text.as_str())),
            DrawOp::Fill { .. } => None,
        })
    }
}

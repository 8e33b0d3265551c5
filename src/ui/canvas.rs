use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use super::{Align, DrawOp, Scene};
use crate::grid::PixelRect;

/// 端末1セルあたりの既定ピクセル寸法
pub const DEFAULT_CELL_PIXELS: (u32, u32) = (8, 16);

/// `Scene` を端末セルにラスタライズするウィジェット
///
/// フォントサイズは端末側で変えられないため無視する。
pub struct CanvasView<'a> {
    scene: &'a Scene,
    /// 端末1セルのピクセル寸法 (幅, 高さ)
    cell_pixels: (u32, u32),
}

impl<'a> CanvasView<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            cell_pixels: DEFAULT_CELL_PIXELS,
        }
    }

    pub fn cell_pixels(mut self, width: u32, height: u32) -> Self {
        self.cell_pixels = (width.max(1), height.max(1));
        self
    }

    /// 中心が矩形内にある端末セルの背景を塗る
    fn fill(&self, rect: PixelRect, color: Color, area: Rect, buf: &mut Buffer) {
        let (pw, ph) = self.cell_pixels;
        let col_end = (rect.x + rect.width).div_ceil(pw).min(area.width as u32);
        let row_end = (rect.y + rect.height).div_ceil(ph).min(area.height as u32);

        for row in rect.y / ph..row_end {
            for col in rect.x / pw..col_end {
                if rect.contains(col * pw + pw / 2, row * ph + ph / 2) {
                    buf[(area.x + col as u16, area.y + row as u16)].set_bg(color);
                }
            }
        }
    }

    /// 文字列を置く。背景色は下に塗られたものを残す
    fn text(
        &self,
        (x, y): (u32, u32),
        align: Align,
        color: Color,
        text: &str,
        area: Rect,
        buf: &mut Buffer,
    ) {
        let (pw, ph) = self.cell_pixels;
        let row = y / ph;
        let width = text.width() as u32;
        let start = match align {
            Align::Left => x / pw,
            Align::Center => x.saturating_sub(width * pw / 2) / pw,
            Align::Right => x.saturating_sub(width * pw) / pw,
        };
        if row >= area.height as u32 || start >= area.width as u32 {
            return;
        }

        buf.set_stringn(
            area.x + start as u16,
            area.y + row as u16,
            text,
            (area.width as u32 - start) as usize,
            Style::default().fg(color),
        );
    }
}

impl Widget for CanvasView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for op in &self.scene.ops {
            match op {
                DrawOp::Fill { rect, color } => self.fill(*rect, (*color).into(), area, buf),
                DrawOp::Text {
                    x,
                    y,
                    align,
                    color,
                    text,
                } => self.text((*x, *y), *align, (*color).into(), text, area, buf),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Rgb;

    fn render(scene: &Scene, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        CanvasView::new(scene).render(area, &mut buf);
        buf
    }

    fn at(buf: &Buffer, x: u16, y: u16) -> &ratatui::buffer::Cell {
        &buf[(x, y)]
    }

    #[test]
    fn fill_covers_cells_whose_center_is_inside() {
        let mut scene = Scene::new(80, 64, 14.0);
        // 列 1..3、行 1..2
        scene.fill(PixelRect::new(8, 16, 16, 32), Rgb(9, 9, 9));
        let buf = render(&scene, 10, 4);

        assert_eq!(at(&buf, 1, 1).bg, Color::Rgb(9, 9, 9));
        assert_eq!(at(&buf, 2, 2).bg, Color::Rgb(9, 9, 9));
        assert_eq!(at(&buf, 0, 1).bg, Color::Reset);
        assert_eq!(at(&buf, 3, 1).bg, Color::Reset);
        assert_eq!(at(&buf, 1, 3).bg, Color::Reset);
    }

    #[test]
    fn text_alignment() {
        let mut scene = Scene::new(160, 64, 14.0);
        scene.text(80, 8, Align::Center, Rgb::WHITE, "ab");
        scene.text(48, 24, Align::Right, Rgb::WHITE, "10");
        scene.text(16, 40, Align::Left, Rgb::WHITE, "x");
        let buf = render(&scene, 20, 4);

        assert_eq!(at(&buf, 9, 0).symbol(), "a");
        assert_eq!(at(&buf, 10, 0).symbol(), "b");
        assert_eq!(at(&buf, 4, 1).symbol(), "1");
        assert_eq!(at(&buf, 5, 1).symbol(), "0");
        assert_eq!(at(&buf, 2, 2).symbol(), "x");
    }

    #[test]
    fn text_keeps_fill_background() {
        let mut scene = Scene::new(80, 16, 14.0);
        scene.fill(PixelRect::new(0, 0, 80, 16), Rgb(1, 2, 3));
        scene.text(0, 8, Align::Left, Rgb(4, 5, 6), "z");
        let buf = render(&scene, 10, 1);

        let cell = at(&buf, 0, 0);
        assert_eq!(cell.symbol(), "z");
        assert_eq!(cell.fg, Color::Rgb(4, 5, 6));
        assert_eq!(cell.bg, Color::Rgb(1, 2, 3));
    }

    #[test]
    fn out_of_area_ops_are_clipped() {
        let mut scene = Scene::new(1000, 1000, 14.0);
        scene.fill(PixelRect::new(0, 0, 1000, 1000), Rgb(1, 1, 1));
        scene.text(500, 500, Align::Center, Rgb::WHITE, "far");
        scene.text(70, 8, Align::Left, Rgb::WHITE, "clip");
        let buf = render(&scene, 10, 2);

        assert_eq!(at(&buf, 9, 1).bg, Color::Rgb(1, 1, 1));
        assert_eq!(at(&buf, 8, 0).symbol(), "c");
        assert_eq!(at(&buf, 9, 0).symbol(), "l");
    }
}

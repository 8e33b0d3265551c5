use crate::app::ThemeState;
use crate::buffer::ByteBuffer;
use crate::grid::{COLUMNS_PER_ROW, CursorModel, PixelRect, ViewportLayout};

use super::{Align, Scene};

/// 行番号の右端と行ヘッダ右端の間隔（px）
const ROW_LABEL_MARGIN: u32 = 16;
/// ASCII列ヘッダのラベル
const ASCII_LABEL: &str = "ascii";

/// ASCII列に表示する文字（Latin-1、制御文字は '.'）
pub fn display_char(byte: u8) -> char {
    match byte {
        0x00..=0x1F | 0x7F..=0x9F => '.',
        _ => char::from(byte),
    }
}

/// HEX/ASCIIグリッドの描画。状態を持たず、入力から `Scene` を作るだけ
pub struct GridRenderer<'a> {
    /// 表示するデータ
    buffer: &'a ByteBuffer,
    layout: &'a ViewportLayout,
    /// カーソル（非アクティブならデータ部は描かない）
    cursor: CursorModel,
    theme: ThemeState,
}

impl<'a> GridRenderer<'a> {
    pub fn new(buffer: &'a ByteBuffer, layout: &'a ViewportLayout) -> Self {
        Self {
            buffer,
            layout,
            cursor: CursorModel::Inactive,
            theme: ThemeState::default(),
        }
    }

    pub fn cursor(mut self, cursor: CursorModel) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn theme(mut self, theme: ThemeState) -> Self {
        self.theme = theme;
        self
    }

    pub fn render(&self) -> Scene {
        let layout = self.layout;
        let mut scene = Scene::new(
            layout.canvas_width(),
            layout.canvas_height(),
            layout.font_size(),
        );

        self.render_background(&mut scene);
        self.render_header(&mut scene);
        self.render_row_labels(&mut scene);
        if self.cursor.is_active() {
            self.render_cells(&mut scene);
        }
        scene
    }

    fn render_background(&self, scene: &mut Scene) {
        let layout = self.layout;
        let (width, height) = (layout.canvas_width(), layout.canvas_height());
        let (rhw, ch) = (layout.row_header_width(), layout.cell_height());
        let panel = self.theme.panel();

        scene.fill(PixelRect::new(0, 0, width, height), self.theme.background());
        // 列ヘッダ
        scene.fill(PixelRect::new(rhw, 0, width.saturating_sub(rhw), ch), panel);
        // 行サイドバー
        scene.fill(PixelRect::new(0, ch, rhw, height.saturating_sub(ch)), panel);
    }

    fn render_header(&self, scene: &mut Scene) {
        let layout = self.layout;
        let fg = self.theme.foreground();
        let (cw, mid) = (layout.cell_width(), layout.cell_height() / 2);

        // 左上に選択中のオフセット
        if let Some(selected) = self.cursor.selected() {
            let x = layout.row_header_width().saturating_sub(ROW_LABEL_MARGIN);
            scene.text(x, mid, Align::Right, fg, format!("{:x}", selected));
        }

        for col in 0..COLUMNS_PER_ROW as u32 {
            let x = layout.grid_origin_x() + col * cw + cw / 2;
            scene.text(x, mid, Align::Center, fg, format!("{:x}", col));
        }

        for (i, ch) in ASCII_LABEL.chars().enumerate() {
            let x = layout.ascii_origin_x() + i as u32 * cw + cw / 2;
            scene.text(x, mid, Align::Center, fg, ch.to_string());
        }
    }

    fn render_row_labels(&self, scene: &mut Scene) {
        let layout = self.layout;
        let fg = self.theme.foreground();
        let x = layout.row_header_width().saturating_sub(ROW_LABEL_MARGIN);
        let scroll_row = self.cursor.scroll_row();

        for row in 0..layout.rows_per_screen() {
            let (_, y) = layout.hex_cell_rect(row, 0).center();
            let offset = (scroll_row + row) * COLUMNS_PER_ROW;
            scene.text(x, y, Align::Right, fg, format!("{:x}", offset));
        }
    }

    fn render_cells(&self, scene: &mut Scene) {
        let layout = self.layout;
        let (fg, bg) = (self.theme.foreground(), self.theme.background());
        let selected = self.cursor.selected();
        let first = self.cursor.scroll_row() * COLUMNS_PER_ROW;

        for row in 0..layout.rows_per_screen() {
            for col in 0..COLUMNS_PER_ROW {
                let offset = first + row * COLUMNS_PER_ROW + col;
                // 範囲外は描かない（最終行の残りは空白）
                let Ok(byte) = self.buffer.read_byte(offset) else {
                    return;
                };

                let hex_rect = layout.hex_cell_rect(row, col);
                let ascii_rect = layout.ascii_cell_rect(row, col);

                let text_color = if selected == Some(offset) {
                    scene.fill(hex_rect, fg);
                    scene.fill(ascii_rect, fg);
                    bg
                } else {
                    fg
                };

                let (x, y) = hex_rect.center();
                scene.text(x, y, Align::Center, text_color, format!("{:02x}", byte));
                let (x, y) = ascii_rect.center();
                scene.text(x, y, Align::Center, text_color, display_char(byte).to_string());
            }
        }
    }
}

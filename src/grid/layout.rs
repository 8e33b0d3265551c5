//! キャンバスのピクセル寸法とズームからグリッドの幾何を導出する

/// 1行あたりのバイト数（固定）
pub const COLUMNS_PER_ROW: usize = 16;

/// ズームアウトの下限（セル幅がこの値以下にはならない）
pub const ZOOM_FLOOR: u32 = 16;

const INITIAL_CELL_WIDTH: u32 = 32;
const INITIAL_CELL_HEIGHT: u32 = 32;
const INITIAL_ROW_HEADER_WIDTH: u32 = 64;
const INITIAL_FONT_SIZE: f32 = 14.0;

/// ピクセル単位の矩形
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 点が矩形内か（右端・下端は含まない）
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// グリッドの表示レイアウト
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportLayout {
    cell_width: u32,
    cell_height: u32,
    row_header_width: u32,
    font_size: f32,
    canvas_width: u32,
    canvas_height: u32,
}

impl ViewportLayout {
    pub fn new(canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            cell_width: INITIAL_CELL_WIDTH,
            cell_height: INITIAL_CELL_HEIGHT,
            row_header_width: INITIAL_ROW_HEADER_WIDTH,
            font_size: INITIAL_FONT_SIZE,
            canvas_width,
            canvas_height,
        }
    }

    /// キャンバス寸法を更新（セル寸法は変えない）
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    /// 拡大。セル幅・セル高さ・行ヘッダ幅・フォントサイズを同時に動かす
    pub fn zoom_in(&mut self) -> bool {
        self.cell_width += 1;
        self.cell_height += 1;
        self.row_header_width += 1;
        self.font_size += 0.5;
        true
    }

    /// 縮小。下限に達する場合は何もしない
    pub fn zoom_out(&mut self) -> bool {
        if self.cell_width - 1 <= ZOOM_FLOOR {
            return false;
        }
        self.cell_width -= 1;
        self.cell_height -= 1;
        self.row_header_width -= 1;
        self.font_size -= 0.5;
        true
    }

    /// ズームを初期値に戻す
    pub fn reset_zoom(&mut self) {
        self.cell_width = INITIAL_CELL_WIDTH;
        self.cell_height = INITIAL_CELL_HEIGHT;
        self.row_header_width = INITIAL_ROW_HEADER_WIDTH;
        self.font_size = INITIAL_FONT_SIZE;
    }

    /// 1画面に表示する行数（常に1以上）
    pub fn rows_per_screen(&self) -> usize {
        (self.canvas_height.saturating_sub(self.cell_height) / self.cell_height) as usize + 1
    }

    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> u32 {
        self.cell_height
    }

    pub fn row_header_width(&self) -> u32 {
        self.row_header_width
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn canvas_width(&self) -> u32 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> u32 {
        self.canvas_height
    }

    /// HEX列の左端
    pub fn grid_origin_x(&self) -> u32 {
        self.row_header_width
    }

    /// ASCII列の左端（HEX16列 + 区切り1列の後ろ）
    pub fn ascii_origin_x(&self) -> u32 {
        self.row_header_width + self.cell_width * (COLUMNS_PER_ROW as u32 + 1)
    }

    /// 表示行 `row`・列 `col` のHEXセル
    pub fn hex_cell_rect(&self, row: usize, col: usize) -> PixelRect {
        PixelRect::new(
            self.grid_origin_x() + col as u32 * self.cell_width,
            self.row_top(row),
            self.cell_width,
            self.cell_height,
        )
    }

    /// 表示行 `row`・列 `col` のASCIIセル
    pub fn ascii_cell_rect(&self, row: usize, col: usize) -> PixelRect {
        PixelRect::new(
            self.ascii_origin_x() + col as u32 * self.cell_width,
            self.row_top(row),
            self.cell_width,
            self.cell_height,
        )
    }

    /// 表示行の上端（ヘッダ行の下から始まる）
    fn row_top(&self, row: usize) -> u32 {
        self.cell_height + row as u32 * self.cell_height
    }
}

impl Default for ViewportLayout {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_per_screen_counts_partial_last_row() {
        // (100 - 32) / 32 = 2, +1
        let layout = ViewportLayout::new(800, 100);
        assert_eq!(layout.rows_per_screen(), 3);

        let layout = ViewportLayout::new(800, 96);
        assert_eq!(layout.rows_per_screen(), 3);
    }

    #[test]
    fn rows_per_screen_is_at_least_one() {
        assert_eq!(ViewportLayout::new(800, 0).rows_per_screen(), 1);
        assert_eq!(ViewportLayout::new(800, 10).rows_per_screen(), 1);
    }

    #[test]
    fn resize_keeps_cell_size() {
        let mut layout = ViewportLayout::new(800, 600);
        layout.zoom_in();
        layout.resize(1024, 64);
        assert_eq!(layout.cell_width(), 33);
        assert_eq!(layout.canvas_width(), 1024);
        assert_eq!(layout.rows_per_screen(), 1);
    }

    #[test]
    fn zoom_moves_all_fields_in_lockstep() {
        let mut layout = ViewportLayout::new(800, 600);
        layout.zoom_in();
        layout.zoom_in();
        assert_eq!(layout.cell_width(), 34);
        assert_eq!(layout.cell_height(), 34);
        assert_eq!(layout.row_header_width(), 66);
        assert_eq!(layout.font_size(), 15.0);

        layout.zoom_out();
        assert_eq!(layout.cell_width(), 33);
        assert_eq!(layout.row_header_width(), 65);
        assert_eq!(layout.font_size(), 14.5);
    }

    #[test]
    fn zoom_out_stops_above_floor() {
        let mut layout = ViewportLayout::new(800, 600);
        for _ in 0..100 {
            layout.zoom_out();
        }
        assert_eq!(layout.cell_width(), ZOOM_FLOOR + 1);
        assert_eq!(layout.cell_height(), ZOOM_FLOOR + 1);
        assert_eq!(layout.row_header_width(), 64 - 15);
        assert!(!layout.zoom_out());
    }

    #[test]
    fn reset_zoom_restores_defaults_only() {
        let mut layout = ViewportLayout::new(800, 600);
        layout.zoom_in();
        layout.zoom_in();
        layout.reset_zoom();
        assert_eq!(layout, ViewportLayout::new(800, 600));
    }

    #[test]
    fn column_origins() {
        let layout = ViewportLayout::new(800, 600);
        assert_eq!(layout.grid_origin_x(), 64);
        assert_eq!(layout.ascii_origin_x(), 64 + 32 * 17);
        assert_eq!(layout.hex_cell_rect(0, 0), PixelRect::new(64, 32, 32, 32));
        assert_eq!(layout.hex_cell_rect(1, 2), PixelRect::new(128, 64, 32, 32));
        assert_eq!(layout.ascii_cell_rect(0, 1), PixelRect::new(64 + 32 * 18, 32, 32, 32));
    }
}

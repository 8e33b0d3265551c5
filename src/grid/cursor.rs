//! 選択オフセットとページ単位スクロールの状態機械
//!
//! カーソル移動に追従するスクロールは常に1画面単位でスナップする。
//! ホイールによるスクロールだけが1行単位で動き、カーソルは動かさない。

use super::COLUMNS_PER_ROW;

/// 通常の移動量倍率
pub const NORMAL_SPEED: usize = 1;
/// 高速修飾キー押下時の移動量倍率
pub const FAST_SPEED: usize = 4;

/// 修飾キーから倍率を決める
pub fn speed(fast: bool) -> usize {
    if fast { FAST_SPEED } else { NORMAL_SPEED }
}

/// ホイールの向き
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDirection {
    Up,
    Down,
}

/// カーソル状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorModel {
    /// バッファ未読み込み
    #[default]
    Inactive,
    Active {
        /// 選択中のバイトオフセット
        selected: usize,
        /// 表示先頭の行番号
        scroll_row: usize,
    },
}

impl CursorModel {
    /// バッファ読み込み時に先頭から開始
    pub fn activate(&mut self) {
        *self = CursorModel::Active {
            selected: 0,
            scroll_row: 0,
        };
    }

    pub fn deactivate(&mut self) {
        *self = CursorModel::Inactive;
    }

    pub fn is_active(&self) -> bool {
        matches!(self, CursorModel::Active { .. })
    }

    pub fn selected(&self) -> Option<usize> {
        match *self {
            CursorModel::Active { selected, .. } => Some(selected),
            CursorModel::Inactive => None,
        }
    }

    /// 非アクティブ時は0
    pub fn scroll_row(&self) -> usize {
        match *self {
            CursorModel::Active { scroll_row, .. } => scroll_row,
            CursorModel::Inactive => 0,
        }
    }

    /// 絶対位置へ移動（範囲外はクランプ）
    pub fn select_cell(&mut self, offset: usize, len: usize, rows: usize) {
        if len == 0 || !self.is_active() {
            return;
        }
        self.set_selected(offset.min(len - 1), rows);
    }

    /// 相対移動（左右キー）
    pub fn move_by(&mut self, delta: isize, len: usize, rows: usize) {
        let Some(selected) = self.selected() else {
            return;
        };
        if len == 0 {
            return;
        }
        let target = (selected as isize).saturating_add(delta).max(0) as usize;
        self.set_selected(target.min(len - 1), rows);
    }

    /// 行単位の移動（上下キー）
    ///
    /// 先頭行より上にはみ出した場合は先頭行の同じ列、最終行より下に
    /// はみ出した場合は最終行の同じ列に止まる。最終行が短くその列が
    /// 存在しなければ末尾バイトに止まる。
    pub fn move_by_row(&mut self, delta_rows: isize, speed: usize, len: usize, rows: usize) {
        let Some(selected) = self.selected() else {
            return;
        };
        if len == 0 {
            return;
        }
        let step = delta_rows.saturating_mul((COLUMNS_PER_ROW * speed) as isize);
        let target = (selected as isize).saturating_add(step);
        let column = selected % COLUMNS_PER_ROW;

        let next = if target < 0 {
            column
        } else if target as usize >= len {
            let last_row_start = (len - 1) / COLUMNS_PER_ROW * COLUMNS_PER_ROW;
            (last_row_start + column).min(len - 1)
        } else {
            target as usize
        };
        self.set_selected(next, rows);
    }

    /// 末尾バイトへ移動
    pub fn jump_to_end(&mut self, len: usize, rows: usize) {
        if len == 0 || !self.is_active() {
            return;
        }
        self.set_selected(len - 1, rows);
    }

    /// スクロールを先頭に戻してから先頭バイトを選択
    pub fn reset(&mut self, len: usize, rows: usize) {
        if let CursorModel::Active { scroll_row, .. } = self {
            *scroll_row = 0;
        }
        self.select_cell(0, len, rows);
    }

    /// 選択位置を含むページの先頭行にスクロールを合わせる
    pub fn recompute_scroll(&mut self, rows: usize) {
        if let CursorModel::Active {
            selected,
            scroll_row,
        } = self
        {
            let rows = rows.max(1);
            let page = *selected / (COLUMNS_PER_ROW * rows);
            *scroll_row = page * rows;
        }
    }

    /// ホイールで1行スクロール（カーソルは動かさない）
    pub fn scroll_wheel(&mut self, direction: WheelDirection, len: usize) {
        let CursorModel::Active { scroll_row, .. } = self else {
            return;
        };
        if len == 0 {
            return;
        }
        match direction {
            WheelDirection::Up => {
                if *scroll_row > 0 {
                    *scroll_row -= 1;
                }
            }
            WheelDirection::Down => {
                let last_row = (len - 1) / COLUMNS_PER_ROW;
                if *scroll_row < last_row {
                    *scroll_row += 1;
                }
            }
        }
    }

    fn set_selected(&mut self, offset: usize, rows: usize) {
        if let CursorModel::Active { selected, .. } = self {
            *selected = offset;
        }
        self.recompute_scroll(rows);
    }
}

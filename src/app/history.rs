/// 入力済みコマンドの履歴（重複なし、挿入順）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandHistory {
    entries: Vec<String>,
    /// 呼び出し位置。`entries.len()` は「何も呼び出していない」
    cursor: usize,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存済みの一覧から復元（重複は捨てる）
    pub fn from_entries(entries: impl IntoIterator<Item = String>) -> Self {
        let mut history = Self::new();
        for entry in entries {
            history.record(&entry);
        }
        history
    }

    /// 未登録なら末尾に追加し、呼び出し位置を末尾の次に戻す
    pub fn record(&mut self, command: &str) {
        if !self.entries.iter().any(|e| e == command) {
            self.entries.push(command.to_string());
        }
        self.cursor = self.entries.len();
    }

    /// ひとつ前の履歴（先頭で止まる）
    pub fn recall_previous(&mut self) -> Option<&str> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// ひとつ後の履歴（最後の項目で止まる）
    pub fn recall_next(&mut self) -> Option<&str> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// 入力欄に表示する空文字列を返す。
    /// 履歴がちょうど1件のときだけ呼び出し位置を末尾の次に戻す。
    pub fn cancel(&mut self) -> String {
        if self.entries.len() == 1 {
            self.cursor = self.entries.len();
        }
        String::new()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

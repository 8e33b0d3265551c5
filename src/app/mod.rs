mod history;
mod state;
mod theme;

pub use history::CommandHistory;
pub use state::App;
pub use theme::{ColorError, Rgb, ThemeState};

use crossterm::event::KeyCode;

/// キー入力の行き先
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// グリッド（カーソル移動・ズーム）
    #[default]
    Grid,
    /// コマンド入力欄
    Terminal,
}

/// 入力欄がファイル・色の選択を待っている状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Picker {
    #[default]
    Off,
    /// 開くファイルのパス
    OpenFile,
    /// 背景色
    BackColor,
    /// 前景色
    ForeColor,
}

impl Picker {
    /// 入力欄のプロンプト
    pub fn prompt(&self) -> &'static str {
        match self {
            Picker::Off => "> ",
            Picker::OpenFile => "open file: ",
            Picker::BackColor => "back color: ",
            Picker::ForeColor => "fore color: ",
        }
    }
}

/// 入力欄のコマンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Open,
    BackColor,
    ForeColor,
    ResetBackColor,
    ResetForeColor,
    ResetColors,
    Clear,
    Reset,
    ResetScale,
    Bottom,
}

/// コマンド名と種別の対応表
const COMMANDS: &[(&str, Command)] = &[
    ("help", Command::Help),
    ("open", Command::Open),
    ("back-color", Command::BackColor),
    ("fore-color", Command::ForeColor),
    ("reset-back-color", Command::ResetBackColor),
    ("reset-fore-color", Command::ResetForeColor),
    ("reset-colors", Command::ResetColors),
    ("clear", Command::Clear),
    ("cls", Command::Clear),
    ("reset", Command::Reset),
    ("reset-scale", Command::ResetScale),
    ("bottom", Command::Bottom),
];

impl Command {
    /// 完全一致のみ。未知の文字列は `None`
    pub fn parse(input: &str) -> Option<Command> {
        COMMANDS
            .iter()
            .find(|(name, _)| *name == input)
            .map(|(_, command)| *command)
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        COMMANDS.iter().map(|(name, _)| *name)
    }
}

/// グリッドにフォーカスがあるときのアクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,

    // カーソル移動（fast = 4倍速）
    CursorUp { fast: bool },
    CursorDown { fast: bool },
    CursorLeft { fast: bool },
    CursorRight { fast: bool },

    // 表示
    ZoomIn,
    ZoomOut,
    ResetZoom,

    // フォーカス
    FocusTerminal,
    ToggleFocus,

    None,
}

/// キー修飾子
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyMod {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Action {
    /// グリッド上のキーからアクションに変換
    pub fn from_key(key: KeyCode, mods: KeyMod) -> Self {
        let KeyMod { ctrl, shift, alt } = mods;

        match (key, ctrl, alt) {
            (KeyCode::Char('c'), true, _) => Action::Quit,

            // 矢印キー（Shiftで高速）
            (KeyCode::Up, false, false) => Action::CursorUp { fast: shift },
            (KeyCode::Down, false, false) => Action::CursorDown { fast: shift },
            (KeyCode::Left, false, false) => Action::CursorLeft { fast: shift },
            (KeyCode::Right, false, false) => Action::CursorRight { fast: shift },

            // ズーム（'+' は端末によってShift付きで届く）
            (KeyCode::Char('+'), false, false) => Action::ZoomIn,
            (KeyCode::Char('-'), false, false) => Action::ZoomOut,
            (KeyCode::Home, false, false) => Action::ResetZoom,

            (KeyCode::Char(':'), false, false) => Action::FocusTerminal,
            (KeyCode::Tab, false, false) => Action::ToggleFocus,

            _ => Action::None,
        }
    }
}

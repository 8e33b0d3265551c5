use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Paragraph,
};
use tracing::{debug, info, warn};

use super::{Action, Command, CommandHistory, Focus, KeyMod, Picker, Rgb, ThemeState};
use crate::buffer::ByteBuffer;
use crate::grid::{self, CursorModel, ViewportLayout, WheelDirection};
use crate::settings::SettingsStore;
use crate::ui::{CanvasView, DEFAULT_CELL_PIXELS, GridRenderer, Scene};

/// 組み込みのヘルプテキスト
const BUILTIN_HELP: &[u8] = include_bytes!("../../assets/help.txt");

/// アプリケーション状態（セッション全体を所有する）
pub struct App {
    /// 表示中のバッファ
    buffer: ByteBuffer,
    /// グリッドの幾何
    layout: ViewportLayout,
    /// 選択位置とスクロール
    cursor: CursorModel,
    /// 配色
    theme: ThemeState,
    /// コマンド履歴
    history: CommandHistory,
    /// 履歴・配色の保存先
    settings: Box<dyn SettingsStore>,
    /// `help` で表示する内容
    help_text: Vec<u8>,
    /// 端末1セルのピクセル寸法
    cell_pixels: (u32, u32),
    /// 端末の桁数・行数（最後に反映したもの）
    terminal_size: (u16, u16),
    /// キー入力の行き先
    focus: Focus,
    /// コマンド入力欄
    input: String,
    /// ファイル・色の選択待ち
    picker: Picker,
    /// ステータスメッセージ
    status_message: Option<String>,
    /// 終了フラグ
    should_quit: bool,
}

impl App {
    /// 保存済み設定を読み込んで作成（揃っていなければ既定値）
    pub fn new(settings: Box<dyn SettingsStore>) -> Self {
        let (history, theme) = match settings.load() {
            Some(saved) => (
                CommandHistory::from_entries(saved.commands),
                ThemeState::new(saved.fore_color, saved.back_color),
            ),
            None => {
                info!("no complete saved settings, using defaults");
                (CommandHistory::new(), ThemeState::default())
            }
        };

        Self {
            buffer: ByteBuffer::new(),
            layout: ViewportLayout::default(),
            cursor: CursorModel::Inactive,
            theme,
            history,
            settings,
            help_text: BUILTIN_HELP.to_vec(),
            cell_pixels: DEFAULT_CELL_PIXELS,
            terminal_size: (0, 0),
            focus: Focus::Grid,
            input: String::new(),
            picker: Picker::Off,
            status_message: None,
            should_quit: false,
        }
    }

    /// `help` で表示する内容を差し替える
    pub fn with_help_text(mut self, help_text: Vec<u8>) -> Self {
        self.help_text = help_text;
        self
    }

    /// 端末1セルのピクセル寸法を設定
    pub fn with_cell_pixels(mut self, width: u32, height: u32) -> Self {
        self.cell_pixels = (width.max(1), height.max(1));
        self
    }

    /// ファイルを開く
    pub fn open(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let buffer = ByteBuffer::open(path)?;
        info!(path = ?buffer.source(), len = buffer.len(), "opened file");
        self.buffer = buffer;
        self.cursor.activate();
        Ok(())
    }

    /// バイト列から読み込み（標準入力・ヘルプ用）
    pub fn load_bytes(&mut self, data: Vec<u8>) {
        info!(len = data.len(), "loaded buffer");
        self.buffer.load(data);
        self.cursor.activate();
    }

    /// 終了すべきかどうか
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn filename(&self) -> Option<&str> {
        self.buffer.filename()
    }

    /// 端末のウィンドウタイトル
    pub fn window_title(&self) -> String {
        format!("hexdump - {}", self.filename().unwrap_or("[no file]"))
    }

    pub fn buffer(&self) -> &ByteBuffer {
        &self.buffer
    }

    pub fn layout(&self) -> &ViewportLayout {
        &self.layout
    }

    pub fn cursor(&self) -> CursorModel {
        self.cursor
    }

    pub fn theme(&self) -> ThemeState {
        self.theme
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn picker(&self) -> Picker {
        self.picker
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// 端末サイズからキャンバスを決める。最下行は入力欄
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.terminal_size = (cols, rows);
        let (pw, ph) = self.cell_pixels;
        let width = (cols as u32).saturating_mul(pw);
        let height = (rows.saturating_sub(1) as u32).saturating_mul(ph);
        self.layout.resize(width, height);
        self.cursor.recompute_scroll(self.rows());
    }

    /// 現在の状態から描画命令を作る
    pub fn scene(&self) -> Scene {
        GridRenderer::new(&self.buffer, &self.layout)
            .cursor(self.cursor)
            .theme(self.theme)
            .render()
    }

    fn rows(&self) -> usize {
        self.layout.rows_per_screen()
    }

    /// イベントを1つ待って処理
    pub fn handle_event(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(100))? {
            self.dispatch(event::read()?);
        }
        Ok(())
    }

    /// イベントを状態に反映。1イベントは次の描画前に完全に処理される
    pub fn dispatch(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(cols, rows) => self.resize(cols, rows),
            _ => {}
        }
    }

    /// キー入力を処理
    pub fn handle_key(&mut self, key: KeyEvent) {
        let mods = KeyMod {
            ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
            shift: key.modifiers.contains(KeyModifiers::SHIFT),
            alt: key.modifiers.contains(KeyModifiers::ALT),
        };

        // C-c はどちらのフォーカスでも終了
        if mods.ctrl && key.code == KeyCode::Char('c') {
            self.execute(Action::Quit);
            return;
        }

        match self.focus {
            Focus::Terminal => self.handle_terminal_key(key.code, mods),
            Focus::Grid => self.execute(Action::from_key(key.code, mods)),
        }
    }

    /// ホイールはフォーカスに関係なくスクロール
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let direction = match mouse.kind {
            MouseEventKind::ScrollUp => WheelDirection::Up,
            MouseEventKind::ScrollDown => WheelDirection::Down,
            _ => return,
        };
        self.cursor.scroll_wheel(direction, self.buffer.len());
    }

    /// グリッドのアクションを実行
    pub fn execute(&mut self, action: Action) {
        let (len, rows) = (self.buffer.len(), self.rows());

        match action {
            Action::Quit => self.should_quit = true,
            Action::CursorUp { fast } => self.cursor.move_by_row(-1, grid::speed(fast), len, rows),
            Action::CursorDown { fast } => self.cursor.move_by_row(1, grid::speed(fast), len, rows),
            Action::CursorLeft { fast } => {
                self.cursor.move_by(-(grid::speed(fast) as isize), len, rows)
            }
            Action::CursorRight { fast } => {
                self.cursor.move_by(grid::speed(fast) as isize, len, rows)
            }
            Action::ZoomIn => {
                self.layout.zoom_in();
                self.after_zoom();
            }
            Action::ZoomOut => {
                if self.layout.zoom_out() {
                    self.after_zoom();
                }
            }
            Action::ResetZoom => {
                self.layout.reset_zoom();
                self.after_zoom();
            }
            Action::FocusTerminal => self.focus = Focus::Terminal,
            Action::ToggleFocus => {
                self.focus = match self.focus {
                    Focus::Grid => Focus::Terminal,
                    Focus::Terminal => Focus::Grid,
                }
            }
            Action::None => {}
        }
    }

    /// ズーム変更後、選択位置からスクロールを導き直す
    fn after_zoom(&mut self) {
        debug!(
            cell_width = self.layout.cell_width(),
            font_size = self.layout.font_size(),
            "zoom changed"
        );
        self.cursor.recompute_scroll(self.rows());
    }

    /// 入力欄のキー処理
    fn handle_terminal_key(&mut self, code: KeyCode, mods: KeyMod) {
        match code {
            KeyCode::Enter => self.submit(),
            KeyCode::Tab => self.focus = Focus::Grid,
            KeyCode::Up if self.picker == Picker::Off => {
                if let Some(entry) = self.history.recall_previous() {
                    self.input = entry.to_string();
                }
            }
            KeyCode::Down if self.picker == Picker::Off => {
                if let Some(entry) = self.history.recall_next() {
                    self.input = entry.to_string();
                }
            }
            KeyCode::Esc => {
                if self.picker != Picker::Off {
                    self.picker = Picker::Off;
                    self.input.clear();
                    self.status_message = Some("Cancelled".to_string());
                } else {
                    self.input = self.history.cancel();
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(ch) if !mods.ctrl && !mods.alt => self.input.push(ch),
            _ => {}
        }
    }

    /// Enter: 選択待ちなら値を確定、そうでなければコマンドとして解釈
    fn submit(&mut self) {
        if self.picker != Picker::Off {
            self.submit_picker();
            return;
        }

        let Some(command) = Command::parse(&self.input) else {
            // 未知のコマンドは履歴に残さず、入力欄もそのまま
            debug!(input = %self.input, "unrecognized command");
            return;
        };

        let text = std::mem::take(&mut self.input);
        debug!(command = %text, "running command");
        self.status_message = None;
        self.run_command(command);
        self.history.record(&text);
        self.persist_commands();
    }

    fn run_command(&mut self, command: Command) {
        let (len, rows) = (self.buffer.len(), self.rows());

        match command {
            Command::Help => self.load_bytes(self.help_text.clone()),
            Command::Open => self.picker = Picker::OpenFile,
            Command::BackColor => self.picker = Picker::BackColor,
            Command::ForeColor => self.picker = Picker::ForeColor,
            Command::ResetBackColor => {
                self.theme.reset_background();
                self.persist_colors();
            }
            Command::ResetForeColor => {
                self.theme.reset_foreground();
                self.persist_colors();
            }
            Command::ResetColors => {
                self.theme.reset_both();
                self.persist_colors();
            }
            Command::Clear => {
                self.buffer.clear();
                self.cursor.deactivate();
            }
            Command::Reset => self.cursor.reset(len, rows),
            Command::ResetScale => {
                self.layout.reset_zoom();
                self.after_zoom();
            }
            Command::Bottom => self.cursor.jump_to_end(len, rows),
        }
    }

    /// ファイル・色の選択を確定
    fn submit_picker(&mut self) {
        let value = std::mem::take(&mut self.input);
        let picker = std::mem::take(&mut self.picker);
        let value = value.trim();

        match picker {
            Picker::OpenFile => {
                if let Err(e) = self.open(value) {
                    warn!(path = value, error = %e, "failed to open file");
                    self.status_message = Some(format!("Cannot open {}: {}", value, e));
                }
            }
            Picker::BackColor | Picker::ForeColor => match value.parse::<Rgb>() {
                Ok(color) => {
                    if picker == Picker::BackColor {
                        self.theme.set_background(color);
                    } else {
                        self.theme.set_foreground(color);
                    }
                    self.persist_colors();
                }
                Err(e) => self.status_message = Some(e.to_string()),
            },
            Picker::Off => {}
        }
    }

    fn persist_colors(&mut self) {
        let (fore, back) = (self.theme.foreground(), self.theme.background());
        if let Err(e) = self.settings.save_colors(fore, back) {
            warn!(error = %e, "failed to persist colors");
        }
    }

    fn persist_commands(&mut self) {
        if let Err(e) = self.settings.save_commands(self.history.entries()) {
            warn!(error = %e, "failed to persist command history");
        }
    }

    /// 画面を描画
    pub fn draw(&mut self, frame: &mut Frame) {
        let size = frame.area();
        if (size.width, size.height) != self.terminal_size {
            self.resize(size.width, size.height);
        }

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // グリッド
                Constraint::Length(1), // 入力欄
            ])
            .split(size);

        let scene = self.scene();
        let (pw, ph) = self.cell_pixels;
        frame.render_widget(CanvasView::new(&scene).cell_pixels(pw, ph), layout[0]);

        let line = match (self.focus, self.picker) {
            (Focus::Terminal, picker) => format!("{}{}_", picker.prompt(), self.input),
            (Focus::Grid, Picker::Off) => match &self.status_message {
                Some(msg) => format!(" {}", msg),
                None => self.position_info(),
            },
            (Focus::Grid, picker) => format!("{}{}", picker.prompt(), self.input),
        };

        let style = Style::default()
            .fg(self.theme.foreground().into())
            .bg(self.theme.panel().into());
        frame.render_widget(Paragraph::new(line).style(style), layout[1]);
    }

    /// ステータス行の位置情報
    fn position_info(&self) -> String {
        let name = self.filename().unwrap_or("[buffer]");
        match self.cursor.selected() {
            Some(selected) => format!(
                " {} | {:08x}/{:08x} | x{}",
                name,
                selected,
                self.buffer.len(),
                self.layout.cell_width()
            ),
            None => " no buffer | type : then help".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemoryStore;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let mut app = App::new(Box::new(MemoryStore::default()));
        // 800x64 px → 2行
        app.resize(100, 5);
        app
    }

    fn type_line(app: &mut App, line: &str) {
        for ch in line.chars() {
            app.handle_key(key(KeyCode::Char(ch)));
        }
        app.handle_key(key(KeyCode::Enter));
    }

    #[test]
    fn resize_reserves_last_row_for_input() {
        let app = app();
        assert_eq!(app.layout().canvas_width(), 800);
        assert_eq!(app.layout().canvas_height(), 64);
        assert_eq!(app.layout().rows_per_screen(), 2);
    }

    #[test]
    fn huge_cell_pixels_saturate_canvas() {
        let mut app =
            App::new(Box::new(MemoryStore::default())).with_cell_pixels(4_000_000_000, 16);
        app.dispatch(Event::Resize(100, 5));
        assert_eq!(app.layout().canvas_width(), u32::MAX);
        assert_eq!(app.layout().canvas_height(), 64);
        assert_eq!(app.layout().rows_per_screen(), 2);
    }

    #[test]
    fn recognized_command_clears_input_and_is_recorded() {
        let mut app = app();
        app.handle_key(key(KeyCode::Tab));
        type_line(&mut app, "help");
        assert_eq!(app.input(), "");
        assert_eq!(app.history().entries(), ["help"]);
        assert_eq!(app.buffer().data(), BUILTIN_HELP);
        assert!(app.cursor().is_active());
    }

    #[test]
    fn unrecognized_command_is_kept_and_not_recorded() {
        let mut app = app();
        app.handle_key(key(KeyCode::Tab));
        type_line(&mut app, "hepl");
        assert_eq!(app.input(), "hepl");
        assert!(app.history().is_empty());
    }

    #[test]
    fn clear_deactivates_cursor() {
        let mut app = app();
        app.load_bytes(vec![1, 2, 3]);
        app.handle_key(key(KeyCode::Char(':')));
        type_line(&mut app, "cls");
        assert!(app.buffer().is_empty());
        assert_eq!(app.cursor(), CursorModel::Inactive);
    }

    #[test]
    fn color_picker_sets_and_persists_color() {
        let mut app = app();
        app.handle_key(key(KeyCode::Tab));
        type_line(&mut app, "back-color");
        assert_eq!(app.picker(), Picker::BackColor);
        type_line(&mut app, "#102030");
        assert_eq!(app.picker(), Picker::Off);
        assert_eq!(app.theme().background(), Rgb(0x10, 0x20, 0x30));
        assert_eq!(app.settings.load().map(|s| s.back_color), Some(Rgb(0x10, 0x20, 0x30)));
    }

    #[test]
    fn bad_color_leaves_theme_unchanged() {
        let mut app = app();
        app.handle_key(key(KeyCode::Tab));
        type_line(&mut app, "fore-color");
        type_line(&mut app, "blurple");
        assert_eq!(app.theme(), ThemeState::default());
        assert!(app.status_message().is_some());
    }

    #[test]
    fn escape_cancels_picker() {
        let mut app = app();
        app.handle_key(key(KeyCode::Tab));
        type_line(&mut app, "open");
        assert_eq!(app.picker(), Picker::OpenFile);
        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.picker(), Picker::Off);
        assert_eq!(app.input(), "");
    }

    #[test]
    fn grid_keys_are_ignored_while_typing() {
        let mut app = app();
        app.load_bytes(vec![0; 64]);
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('+')));
        assert_eq!(app.layout().cell_width(), 32);
        assert_eq!(app.input(), "+");
    }

    #[test]
    fn ctrl_c_quits_from_terminal() {
        let mut app = app();
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[test]
    fn saved_settings_are_restored() {
        let store = MemoryStore {
            commands: Some(vec!["open".into(), "help".into()]),
            fore_color: Some(Rgb(1, 1, 1)),
            back_color: Some(Rgb(2, 2, 2)),
        };
        let app = App::new(Box::new(store));
        assert_eq!(app.history().entries(), ["open", "help"]);
        assert_eq!(app.history().cursor(), 2);
        assert_eq!(app.theme(), ThemeState::new(Rgb(1, 1, 1), Rgb(2, 2, 2)));
    }

    #[test]
    fn partial_settings_fall_back_to_defaults() {
        let store = MemoryStore {
            commands: Some(vec!["open".into()]),
            fore_color: Some(Rgb(1, 1, 1)),
            back_color: None,
        };
        let app = App::new(Box::new(store));
        assert!(app.history().is_empty());
        assert_eq!(app.theme(), ThemeState::default());
    }
}

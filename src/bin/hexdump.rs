use std::io::{self, IsTerminal, Read, Write as _};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    terminal::{
        BeginSynchronizedUpdate, EndSynchronizedUpdate, EnterAlternateScreen,
        LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use hexdump::app::App;
use hexdump::config::{self, ResolvedConfig};
use hexdump::settings::FileStore;

/// Terminal hex/ASCII grid viewer
#[derive(Parser, Debug)]
#[command(name = "hexdump")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where command history and colors are saved
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = resolve_config(&args)?;
    // ログが使えなくても起動は続ける
    if let Err(e) = hexdump::logging::init(&config.log_file_path) {
        eprintln!("Warning: logging disabled: {}", e);
    }
    info!(?config, "starting");

    // 標準入力からデータを読み込む（パイプされている場合）
    let stdin_data = if !io::stdin().is_terminal() {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        Some(data)
    } else {
        None
    };

    let app = build_app(&config, args.file.as_ref(), stdin_data)?;

    // ホイールを受け取るためマウスキャプチャを有効にする
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app);

    // ターミナルの後処理
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// 既定値 → 設定ファイル → 引数
fn resolve_config(args: &Args) -> Result<ResolvedConfig> {
    let mut config = config::load_config(args.config.clone())?;
    if let Some(path) = &args.settings {
        config.settings_path = path.clone();
    }
    if let Some(path) = &args.log_file {
        config.log_file_path = path.clone();
    }
    Ok(config)
}

fn build_app(
    config: &ResolvedConfig,
    file: Option<&PathBuf>,
    stdin_data: Option<Vec<u8>>,
) -> Result<App> {
    let store = FileStore::open(&config.settings_path);
    info!(path = ?store.path(), "settings store");
    let (pw, ph) = config.cell_pixels;
    let mut app = App::new(Box::new(store)).with_cell_pixels(pw, ph);

    if let Some(path) = &config.help_file {
        match std::fs::read(path) {
            Ok(text) => app = app.with_help_text(text),
            Err(e) => warn!(path = ?path, error = %e, "cannot read help file, using built-in help"),
        }
    }

    // データを読み込む（優先順位: ファイル > 標準入力）
    if let Some(path) = file {
        app.open(path)
            .with_context(|| format!("cannot open {}", path.display()))?;
    } else if let Some(data) = stdin_data {
        app.load_bytes(data);
    }

    Ok(app)
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    let mut title = String::new();

    // メインループ: 描画 → イベント1つ → 描画
    loop {
        // open・help・cls でバッファが変わったらタイトルも追従
        if app.window_title() != title {
            title = app.window_title();
            execute!(terminal.backend_mut(), SetTitle(&title))?;
        }

        queue!(terminal.backend_mut(), BeginSynchronizedUpdate)?;
        terminal.draw(|f| app.draw(f))?;
        queue!(terminal.backend_mut(), EndSynchronizedUpdate)?;
        terminal.backend_mut().flush()?;

        app.handle_event()?;

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

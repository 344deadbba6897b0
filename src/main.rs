use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{Level, info};

use keyline::app::{self, App, AppScreen};
use keyline::config::Config;
use keyline::event::{AppEvent, EventHandler};
use keyline::generator::ContentSource;
use keyline::keyboard::hint::KeyHint;
use keyline::share;
use keyline::store::{JsonStore, ProgressStore};
use keyline::ui;
use keyline::ui::components::keyboard_hint::KeyboardHint;
use keyline::ui::components::results::{HistoryPanel, ResultPanel, SharedPanel};
use keyline::ui::components::stats_bar::StatsBar;
use keyline::ui::components::typing_area::TypingArea;
use keyline::ui::layout::AppLayout;

#[derive(Parser)]
#[command(name = "keyline", version, about = "Terminal typing practice with per-word speed tracking")]
struct Cli {
    #[arg(short, long, value_enum, help = "Where passages come from")]
    source: Option<ContentSource>,

    #[arg(short, long, help = "Type the contents of this file instead")]
    file: Option<PathBuf>,

    #[arg(short, long, help = "Keyboard layout (qwerty, dvorak, colemak)")]
    layout: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Do not record results")]
    no_track: bool,

    #[arg(long, help = "Hide the on-screen keyboard")]
    no_hint: bool,

    #[arg(long, help = "Print recent results and exit")]
    history: bool,

    #[arg(long, help = "Delete all recorded results and exit")]
    clear_history: bool,

    #[arg(long, value_name = "URL", help = "Show a shared result link")]
    shared: Option<String>,

    #[arg(short, long, help = "Log at debug level")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("Ignoring unreadable config: {e:#}");
        Config::default()
    });
    if let Some(source) = cli.source {
        config.source = source;
    }
    if let Some(layout) = cli.layout {
        config.keyboard_layout = layout;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if cli.no_track {
        config.tracking_enabled = false;
    }
    if cli.no_hint {
        config.keyboard_hint = false;
    }
    config.validate();

    init_logging(&config.data_dir(), cli.verbose)?;

    let backend = JsonStore::with_base_dir(config.data_dir())?;
    let mut store = ProgressStore::new(Box::new(backend));

    if cli.clear_history {
        store.clear_progress()?;
        println!("History cleared.");
        return Ok(());
    }
    if cli.history {
        return print_history(&mut store, config.history_limit);
    }

    let fixed_text = match &cli.file {
        Some(path) => Some(
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?,
        ),
        None => None,
    };

    let events = EventHandler::new(Duration::from_millis(100));
    let mut app = App::new(config, store, events.sender());
    app.fixed_text = fixed_text;
    app.request_passage();
    if let Some(url) = cli.shared.as_deref() {
        app.show_shared(url);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Shift only arrives as its own key event with enhancement enabled.
    let keyboard_enhanced = execute!(
        io::stdout(),
        PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS
        )
    )
    .is_ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    if keyboard_enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Log to a file in the data directory; the terminal belongs to the UI.
fn init_logging(data_dir: &Path, verbose: bool) -> Result<()> {
    fs::create_dir_all(data_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("keyline.log"))?;
    tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    info!(version = env!("CARGO_PKG_VERSION"), "starting");
    Ok(())
}

fn print_history(store: &mut ProgressStore, limit: usize) -> Result<()> {
    let record = store.get_progress()?;
    let overall = &record.overall_stats;
    println!(
        "{} attempts, best {} WPM, average {:.2} WPM, best accuracy {:.2}%, best score {}",
        overall.total_attempts,
        overall.best_wpm,
        overall.average_wpm,
        overall.best_accuracy,
        overall.best_score
    );
    for result in store.recent_history(limit)? {
        println!(
            "{}  {:>3} WPM  {:>6.2}%  score {:>3}  {}",
            result.timestamp.format("%Y-%m-%d %H:%M"),
            result.wpm,
            result.accuracy,
            result.score,
            share::encode(
                result.score,
                result.wpm,
                result.accuracy,
                result.timestamp.timestamp_millis()
            )
        );
    }
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::PassageLoaded { request, result } => app.on_passage_loaded(request, result),
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Only presses count; releases and repeats are ignored.
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Typing => handle_typing_key(app, key),
        AppScreen::Result => handle_result_key(app, key),
        AppScreen::History => handle_history_key(app, key),
        AppScreen::ConfirmClear => handle_confirm_key(app, key),
        AppScreen::Shared => handle_shared_key(app, key),
    }
}

fn handle_typing_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('r') => app.restart(),
            KeyCode::Char('n') => app.request_passage(),
            KeyCode::Char('s') => app.cycle_source(),
            KeyCode::Char('h') => app.go_to_history(),
            _ => {}
        }
        return;
    }
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Backspace => app.backspace(),
        _ => {
            if let Some((code, typed)) = app::translate_key(&app.keyboard, &key) {
                app.type_key(code, typed);
            }
        }
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('r') => app.restart(),
        KeyCode::Char('n') | KeyCode::Enter => app.request_passage(),
        KeyCode::Char('s') => app.cycle_source(),
        KeyCode::Char('h') => app.go_to_history(),
        _ => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('c') => app.request_clear(),
        KeyCode::Char('q') | KeyCode::Esc => app.leave_history(),
        _ => {}
    }
}

fn handle_confirm_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') => app.confirm_clear(),
        KeyCode::Char('n') | KeyCode::Esc => app.cancel_clear(),
        _ => {}
    }
}

fn handle_shared_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
        app.close_shared();
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let area = frame.area();
    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Typing => render_typing(frame, app),
        AppScreen::Result => render_result(frame, app),
        AppScreen::History | AppScreen::ConfirmClear => render_history(frame, app),
        AppScreen::Shared => render_shared(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let source = if app.fixed_text.is_some() {
        "file"
    } else {
        app.source.label()
    };
    let mut spans = vec![Span::styled(
        format!(" keyline | {source} | {} ", app.keyboard.name),
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!(" {status}"),
            Style::default().fg(colors.error()).bg(colors.header_bg()),
        ));
    }
    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, text: &str) {
    let footer = Paragraph::new(Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(app.theme.colors.text_pending()),
    )));
    frame.render_widget(footer, area);
}

fn render_typing(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area(), app.config.keyboard_hint);
    render_header(frame, app, layout.header);

    let stats = StatsBar {
        wpm: app.live_wpm(),
        word_wpm: app.session.last_word_wpm(),
        accuracy: app.session.live_accuracy(),
        snapshot: app.session.snapshot(),
        theme: app.theme,
    };
    frame.render_widget(stats, layout.stats);

    let title = if app.loading {
        " Loading... ".to_string()
    } else if app.last_step_error {
        " Typo ".to_string()
    } else {
        String::new()
    };
    frame.render_widget(TypingArea::new(&app.session, app.theme, title), layout.main);

    if let Some(area) = layout.keyboard {
        let hint = KeyHint::derive(&app.session, &app.keyboard);
        frame.render_widget(KeyboardHint::new(&app.keyboard, &hint, app.theme), area);
    }

    render_footer(
        frame,
        app,
        layout.footer,
        " [Ctrl-R] Restart  [Ctrl-N] New passage  [Ctrl-S] Source  [Ctrl-H] History  [Esc] Quit ",
    );
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let Some(result) = &app.last_result else {
        return;
    };
    let centered = ui::layout::centered_rect(60, 50, area);
    let panel = ResultPanel {
        result,
        share_link: app.share_link.as_deref(),
        passage_best: app.passage_best.as_ref(),
        theme: app.theme,
    };
    frame.render_widget(panel, centered);

    let footer = ratatui::layout::Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
    render_footer(
        frame,
        app,
        footer,
        " [r] Retry  [n/Enter] Next  [s] Source  [h] History  [q] Quit ",
    );
}

fn render_history(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let centered = ui::layout::centered_rect(80, 80, area);
    let panel = HistoryPanel {
        history: &app.history,
        overall: &app.overall,
        theme: app.theme,
    };
    frame.render_widget(panel, centered);

    let footer = ratatui::layout::Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
    let text = if app.screen == AppScreen::ConfirmClear {
        " Delete all recorded results? [y] Yes  [n] No "
    } else {
        " [c] Clear history  [Esc] Back "
    };
    render_footer(frame, app, footer, text);
}

fn render_shared(frame: &mut ratatui::Frame, app: &App) {
    let Some(shared) = &app.shared else {
        return;
    };
    let centered = ui::layout::centered_rect(50, 40, frame.area());
    frame.render_widget(
        SharedPanel {
            shared,
            theme: app.theme,
        },
        centered,
    );
}

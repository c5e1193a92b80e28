use anyhow::{Context, Result as AnyhowResult};
use bufed::bufed::panel::BufferList;
use bufed::bufed::sort::SharedSortOrder;
use bufed::config::Config;
use bufed::input::keymap::Keymap;
use bufed::model::buffer::{BufferFlags, WindowId};
use bufed::model::registry::{BufferRegistry, WindowHost};
use bufed::model::workbench::Workbench;
use bufed::view::buffer_list::{popup_area, render_buffer_list, visible_rows};
use bufed::view::help::render_help;
use bufed::view::theme::BufedTheme;
use clap::Parser;
use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, ClearType};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{DefaultTerminal, Frame};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Browse and manage open buffers
#[derive(Parser, Debug)]
#[command(name = "bufed")]
#[command(about = "A buffer list for terminal editors", long_about = None)]
#[command(version)]
struct Args {
    /// Files to open as buffers
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file for diagnostics (default: system temp dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Include system buffers when the list opens
    #[arg(long)]
    show_all: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Print the configuration JSON schema and exit
    #[arg(long)]
    dump_schema: bool,
}

fn init_tracing(log_file: &Path) -> AnyhowResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bufed=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

/// Ask on the bottom line whether a modified buffer may be killed
fn confirm_kill_prompt(name: &str) -> bool {
    let ask = || -> io::Result<bool> {
        let (_, rows) = terminal::size()?;
        let mut stdout = io::stdout();
        crossterm::execute!(
            stdout,
            MoveTo(0, rows.saturating_sub(1)),
            terminal::Clear(ClearType::CurrentLine),
            Print(format!("Buffer {name} modified; kill anyway? (y or n) "))
        )?;
        stdout.flush()?;
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => return Ok(true),
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => return Ok(false),
                    _ => {}
                }
            }
        }
    };
    match ask() {
        Ok(answer) => answer,
        Err(e) => {
            tracing::warn!("Kill confirmation failed: {}", e);
            false
        }
    }
}

struct App {
    bench: Workbench,
    origin: WindowId,
    config: Config,
    keymap: Keymap,
    theme: BufedTheme,
    sort_order: SharedSortOrder,
    show_all: bool,
    list: Option<BufferList>,
    status: String,
}

impl App {
    fn new(args: &Args, config: Config) -> AnyhowResult<Self> {
        let mut bench = Workbench::new();
        let scratch = bench.add_buffer("*scratch*");
        bench.add_buffer_with("*messages*", |info| {
            info.flags = BufferFlags::SYSTEM | BufferFlags::IS_LOG;
        });

        let mut first = None;
        for path in &args.files {
            let id = bench
                .add_file(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            first.get_or_insert(id);
        }
        let origin = bench.open_window(first.unwrap_or(scratch));
        bench.set_confirm_kill(|info| confirm_kill_prompt(&info.name));

        Ok(Self {
            bench,
            origin,
            keymap: Keymap::new(&config),
            theme: BufedTheme::default(),
            sort_order: config.buffer_list.shared_sort_order(),
            show_all: args.show_all || config.buffer_list.show_system_buffers,
            config,
            list: None,
            status: "C-b: buffer list  C-t: toggle modified  C-q: quit".to_string(),
        })
    }

    fn run(&mut self, terminal: &mut DefaultTerminal) -> AnyhowResult<()> {
        loop {
            let size = terminal.size()?;
            if let Some(list) = self.list.as_mut() {
                let screen = ratatui::layout::Rect::new(0, 0, size.width, size.height);
                list.scroll_to_cursor(visible_rows(popup_area(screen)));
            }
            terminal.draw(|frame| self.draw(frame))?;

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !self.handle_key(key) {
                    return Ok(());
                }
            }
        }
    }

    /// Returns false when the application should exit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('q') {
            return false;
        }

        if let Some(list) = self.list.as_mut() {
            match self.keymap.resolve(&key) {
                Some(action) => list.dispatch(&mut self.bench, action),
                None => tracing::debug!("Unbound key in buffer list: {:?}", key),
            }
            if list.is_closed() {
                self.list = None;
            }
            return true;
        }

        match key.code {
            KeyCode::Char('b') if ctrl => self.open_list(),
            KeyCode::Char('t') if ctrl => self.toggle_modified(),
            KeyCode::Char('q') => return false,
            _ => {}
        }
        true
    }

    fn open_list(&mut self) {
        self.list = BufferList::open(
            &mut self.bench,
            self.origin,
            self.show_all,
            self.sort_order.clone(),
            self.config.buffer_list.clone(),
        );
        if self.list.is_none() {
            self.status = "Cannot open the buffer list here".to_string();
        }
    }

    fn toggle_modified(&mut self) {
        let Some(id) = self.bench.buffer_of(self.origin) else {
            return;
        };
        let modified = self.bench.get(id).is_some_and(|b| b.is_modified());
        if let Err(e) = self.bench.set_flag(id, BufferFlags::MODIFIED, !modified) {
            tracing::warn!("Cannot toggle modified flag: {}", e);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let [main, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

        let current = self
            .bench
            .buffer_of(self.origin)
            .and_then(|id| self.bench.get(id));
        let mut lines = Vec::new();
        if let Some(info) = current {
            lines.push(Line::from(vec![
                Span::styled(info.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(if info.is_modified() { " (modified)" } else { "" }),
            ]));
            if let Some(path) = &info.filename {
                lines.push(Line::from(path.display().to_string()));
            }
            lines.push(Line::from(format!(
                "{} bytes, mode {}",
                info.size,
                info.primary_mode_name()
            )));
        }
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
            main,
        );
        frame.render_widget(Paragraph::new(self.status.as_str()), status);

        if let Some(list) = &self.list {
            let area = popup_area(frame.area());
            render_buffer_list(frame, area, list, &self.theme);
            if list.is_help_visible() {
                render_help(frame, area, &self.keymap.get_all_bindings(), &self.theme);
            }
        }
    }
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();

    if args.dump_schema {
        println!("{}", Config::json_schema()?);
        return Ok(());
    }

    let config = Config::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    if args.dump_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("bufed.log"));
    init_tracing(&log_file)?;
    tracing::info!("bufed starting");

    let mut app = App::new(&args, config).context("Failed to initialize application")?;

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    tracing::info!("bufed exiting");
    result
}

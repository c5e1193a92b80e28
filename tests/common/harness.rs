// BufedTestHarness - in-memory host plus a virtual terminal for testing the buffer list

use bufed::bufed::panel::BufferList;
use bufed::bufed::sort::SharedSortOrder;
use bufed::config::{BufferListConfig, Config};
use bufed::input::keymap::Keymap;
use bufed::model::buffer::{BufferFlags, BufferId, BufferInfo, WindowId};
use bufed::model::registry::{BufferRegistry, WindowHost};
use bufed::model::workbench::Workbench;
use bufed::view::buffer_list::render_buffer_list;
use bufed::view::help::render_help;
use bufed::view::theme::BufedTheme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::{backend::TestBackend, Terminal};

/// Test harness driving a buffer list through key events
pub struct BufedTestHarness {
    pub bench: Workbench,
    pub origin: WindowId,
    pub sort_order: SharedSortOrder,
    settings: BufferListConfig,
    keymap: Keymap,
    list: Option<BufferList>,
    terminal: Terminal<TestBackend>,
}

impl BufedTestHarness {
    /// Create a harness with one user buffer per name; the origin window
    /// shows the first one
    pub fn new(names: &[&str]) -> Self {
        Self::with_config(names, Config::default())
    }

    /// Create a harness with a custom configuration
    pub fn with_config(names: &[&str], config: Config) -> Self {
        init_tracing();

        let mut bench = Workbench::new();
        let ids: Vec<BufferId> = names.iter().map(|name| bench.add_buffer(name)).collect();
        let first = ids
            .first()
            .copied()
            .unwrap_or_else(|| bench.add_buffer("*scratch*"));
        let origin = bench.open_window(first);

        let backend = TestBackend::new(80, 24);
        let terminal = Terminal::new(backend).unwrap();

        Self {
            bench,
            origin,
            sort_order: config.buffer_list.shared_sort_order(),
            settings: config.buffer_list.clone(),
            keymap: Keymap::new(&config),
            list: None,
            terminal,
        }
    }

    /// Turn off previewing on cursor motion
    pub fn without_preview(mut self) -> Self {
        self.settings.preview_on_move = false;
        self
    }

    /// Add a system buffer such as `*messages*`
    pub fn add_system_buffer(&mut self, name: &str) -> BufferId {
        self.bench
            .add_buffer_with(name, |info| info.flags = BufferFlags::SYSTEM)
    }

    pub fn id(&self, name: &str) -> BufferId {
        self.bench.find_by_name(name).unwrap()
    }

    pub fn info(&self, name: &str) -> &BufferInfo {
        self.bench.get(self.id(name)).unwrap()
    }

    /// Open a buffer list from the origin window
    pub fn open(&mut self, show_all: bool) {
        self.list = BufferList::open(
            &mut self.bench,
            self.origin,
            show_all,
            self.sort_order.clone(),
            self.settings.clone(),
        );
        assert!(self.list.is_some(), "buffer list did not open");
    }

    pub fn list(&self) -> &BufferList {
        self.list.as_ref().unwrap()
    }

    pub fn is_open(&self) -> bool {
        self.list.as_ref().is_some_and(|list| !list.is_closed())
    }

    /// Send a key to the open list through the keymap
    pub fn send_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let event = KeyEvent::new(code, modifiers);
        let action = self.keymap.resolve(&event);
        let list = self.list.as_mut().unwrap();
        if let Some(action) = action {
            list.dispatch(&mut self.bench, action);
        }
    }

    /// Send a plain character key
    pub fn press(&mut self, c: char) {
        self.send_key(KeyCode::Char(c), KeyModifiers::NONE);
    }

    /// Row labels of the open list
    pub fn labels(&self) -> Vec<String> {
        self.list()
            .labels()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn cursor_row(&self) -> Option<usize> {
        self.list().current_index()
    }

    /// Label of the row under the cursor
    pub fn cursor_label(&self) -> Option<String> {
        let index = self.cursor_row()?;
        self.labels().get(index).cloned()
    }

    /// Name of the buffer the origin window shows
    pub fn origin_buffer_name(&self) -> Option<String> {
        let id = self.bench.buffer_of(self.origin)?;
        self.bench.get(id).map(|b| b.name.clone())
    }

    pub fn origin_last_buffer_name(&self) -> Option<String> {
        let id = self.bench.last_buffer_of(self.origin)?;
        self.bench.get(id).map(|b| b.name.clone())
    }

    /// Render the list and return the screen as text
    pub fn screen_text(&mut self) -> String {
        let list = self.list.as_ref().unwrap();
        let bindings = self.keymap.get_all_bindings();
        self.terminal
            .draw(|frame| {
                let area = Rect::new(0, 0, 80, 24);
                let theme = BufedTheme::default();
                render_buffer_list(frame, area, list, &theme);
                if list.is_help_visible() {
                    render_help(frame, area, &bindings, &theme);
                }
            })
            .unwrap();

        let buffer = self.terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bufed=warn")),
        )
        .with_test_writer()
        .try_init();
}

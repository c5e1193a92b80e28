//! In-memory host: a buffer registry plus a flat set of windows
//!
//! Used by the `bufed` binary and by tests. Buffer and window ids are handed
//! out from monotonically increasing counters and never reused, so a stale
//! id can never alias a newer object.

use std::io;
use std::path::Path;

use super::buffer::{BufferFlags, BufferId, BufferInfo, WindowId};
use super::registry::{BufferRegistry, RegistryError, WindowHost, WindowKind};

#[derive(Debug, Clone)]
struct Window {
    id: WindowId,
    kind: WindowKind,
    buffer: Option<BufferId>,
    last_buffer: Option<BufferId>,
    title: Option<String>,
}

/// Callback consulted before destroying a modified buffer
pub type ConfirmKill = Box<dyn FnMut(&BufferInfo) -> bool>;

pub struct Workbench {
    /// Live buffers in creation order
    buffers: Vec<BufferInfo>,
    next_buffer_id: usize,
    windows: Vec<Window>,
    next_window_id: usize,
    active_window: Option<WindowId>,
    confirm_kill: ConfirmKill,
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new()
    }
}

impl Workbench {
    pub fn new() -> Self {
        Self {
            buffers: Vec::new(),
            next_buffer_id: 1,
            windows: Vec::new(),
            next_window_id: 1,
            active_window: None,
            confirm_kill: Box::new(|_| true),
        }
    }

    /// Create a plain buffer
    pub fn add_buffer(&mut self, name: &str) -> BufferId {
        self.add_buffer_with(name, |_| {})
    }

    /// Create a buffer and let `init` fill in its attributes
    pub fn add_buffer_with(&mut self, name: &str, init: impl FnOnce(&mut BufferInfo)) -> BufferId {
        let id = BufferId(self.next_buffer_id);
        self.next_buffer_id += 1;
        let mut info = BufferInfo::new(id, name);
        init(&mut info);
        info.id = id;
        tracing::debug!("Created buffer {} ({:?})", info.name, id);
        self.buffers.push(info);
        id
    }

    /// Create a buffer describing a file on disk
    pub fn add_file(&mut self, path: &Path) -> io::Result<BufferId> {
        let metadata = std::fs::metadata(path)?;
        if metadata.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is a directory", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let name = self.unique_name(&name);
        let syntax_mode = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(mode_for_extension)
            .unwrap_or("text")
            .to_string();
        let filename = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let read_only = metadata.permissions().readonly();

        Ok(self.add_buffer_with(&name, |info| {
            info.size = metadata.len();
            info.mtime = metadata.modified().ok();
            info.filename = Some(filename);
            info.syntax_mode = Some(syntax_mode);
            if read_only {
                info.flags |= BufferFlags::READ_ONLY;
            }
        }))
    }

    /// `name`, or `name<2>`, `name<3>`... if already taken
    fn unique_name(&self, name: &str) -> String {
        if self.find_by_name(name).is_none() {
            return name.to_string();
        }
        (2..)
            .map(|n| format!("{name}<{n}>"))
            .find(|candidate| self.find_by_name(candidate).is_none())
            .unwrap_or_else(|| name.to_string())
    }

    pub fn find_by_name(&self, name: &str) -> Option<BufferId> {
        self.buffers.iter().find(|b| b.name == name).map(|b| b.id)
    }

    pub fn buffer_mut(&mut self, id: BufferId) -> Option<&mut BufferInfo> {
        self.buffers.iter_mut().find(|b| b.id == id)
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Install the prompt consulted before killing a modified buffer
    pub fn set_confirm_kill(&mut self, confirm: impl FnMut(&BufferInfo) -> bool + 'static) {
        self.confirm_kill = Box::new(confirm);
    }

    /// Destroy a buffer without confirmation, as another part of the host
    /// would do behind the list's back
    pub fn destroy_now(&mut self, id: BufferId) -> bool {
        let Some(pos) = self.buffers.iter().position(|b| b.id == id) else {
            return false;
        };
        let info = self.buffers.remove(pos);
        tracing::debug!("Destroyed buffer {} ({:?})", info.name, id);
        self.detach_from_windows(id);
        true
    }

    /// Windows that showed a destroyed buffer fall back to their previous
    /// buffer, or the first user buffer
    fn detach_from_windows(&mut self, id: BufferId) {
        let fallback = self
            .buffers
            .iter()
            .find(|b| !b.is_system())
            .or_else(|| self.buffers.first())
            .map(|b| b.id);
        let live: Vec<BufferId> = self.buffers.iter().map(|b| b.id).collect();

        for window in &mut self.windows {
            if window.last_buffer == Some(id) {
                window.last_buffer = None;
            }
            if window.buffer == Some(id) {
                window.buffer = window
                    .last_buffer
                    .filter(|b| live.contains(b))
                    .or(fallback);
                window.last_buffer = None;
            }
        }
    }

    /// Open a normal window showing `buffer` and make it active
    pub fn open_window(&mut self, buffer: BufferId) -> WindowId {
        self.push_window(WindowKind::Normal, buffer, None)
    }

    /// Open a window of any kind; does not change the active window
    pub fn open_window_of_kind(&mut self, kind: WindowKind, buffer: BufferId) -> WindowId {
        let active = self.active_window;
        let id = self.push_window(kind, buffer, None);
        if active.is_some() {
            self.active_window = active;
        }
        id
    }

    fn push_window(&mut self, kind: WindowKind, buffer: BufferId, title: Option<&str>) -> WindowId {
        let id = WindowId(self.next_window_id);
        self.next_window_id += 1;
        self.windows.push(Window {
            id,
            kind,
            buffer: Some(buffer),
            last_buffer: None,
            title: title.map(str::to_string),
        });
        self.active_window = Some(id);
        id
    }

    pub fn active_window(&self) -> Option<WindowId> {
        self.active_window
    }

    pub fn window_title(&self, window: WindowId) -> Option<&str> {
        self.window(window).and_then(|w| w.title.as_deref())
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id == id)
    }

    fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.id == id)
    }
}

fn mode_for_extension(ext: &str) -> &'static str {
    match ext {
        "rs" => "rust",
        "c" | "h" => "c",
        "cpp" | "cc" | "hpp" => "cpp",
        "py" => "python",
        "js" | "mjs" => "javascript",
        "ts" => "typescript",
        "md" => "markdown",
        "json" => "json",
        "toml" => "toml",
        "sh" => "shell",
        "html" | "htm" => "html",
        _ => "text",
    }
}

impl BufferRegistry for Workbench {
    fn enumerate(&self) -> Vec<&BufferInfo> {
        self.buffers.iter().collect()
    }

    fn get(&self, id: BufferId) -> Option<&BufferInfo> {
        self.buffers.iter().find(|b| b.id == id)
    }

    fn destroy(&mut self, id: BufferId) -> Result<(), RegistryError> {
        let info = self.get(id).ok_or(RegistryError::NotFound(id))?.clone();
        if info.is_modified() && !(self.confirm_kill)(&info) {
            return Err(RegistryError::Declined(info.name));
        }
        self.destroy_now(id);
        Ok(())
    }

    fn set_flag(
        &mut self,
        id: BufferId,
        flag: BufferFlags,
        value: bool,
    ) -> Result<(), RegistryError> {
        let info = self.buffer_mut(id).ok_or(RegistryError::NotFound(id))?;
        info.flags.set(flag, value);
        Ok(())
    }

    fn find_or_create_scratch(&mut self, name: &str, flags: BufferFlags) -> BufferId {
        if let Some(id) = self.find_by_name(name) {
            if let Some(info) = self.buffer_mut(id) {
                info.flags |= flags;
            }
            return id;
        }
        self.add_buffer_with(name, |info| info.flags = flags)
    }
}

impl WindowHost for Workbench {
    fn window_exists(&self, window: WindowId) -> bool {
        self.window(window).is_some()
    }

    fn window_kind(&self, window: WindowId) -> Option<WindowKind> {
        self.window(window).map(|w| w.kind)
    }

    fn buffer_of(&self, window: WindowId) -> Option<BufferId> {
        self.window(window).and_then(|w| w.buffer)
    }

    fn last_buffer_of(&self, window: WindowId) -> Option<BufferId> {
        self.window(window).and_then(|w| w.last_buffer)
    }

    fn switch_to_buffer(&mut self, window: WindowId, buffer: BufferId) {
        if !self.exists(buffer) {
            return;
        }
        if let Some(w) = self.window_mut(window) {
            if w.buffer != Some(buffer) {
                w.last_buffer = w.buffer;
                w.buffer = Some(buffer);
            }
        }
    }

    fn set_last_buffer(&mut self, window: WindowId, buffer: Option<BufferId>) {
        if let Some(w) = self.window_mut(window) {
            w.last_buffer = buffer;
        }
    }

    fn set_active_window(&mut self, window: WindowId) {
        if self.window_exists(window) {
            self.active_window = Some(window);
        }
    }

    fn show_popup(&mut self, buffer: BufferId, title: &str) -> Option<WindowId> {
        if !self.exists(buffer) {
            return None;
        }
        Some(self.push_window(WindowKind::Popup, buffer, Some(title)))
    }

    fn close_window(&mut self, window: WindowId) {
        self.windows.retain(|w| w.id != window);
        if self.active_window == Some(window) {
            self.active_window = self.windows.first().map(|w| w.id);
        }
    }
}

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::sync::FileSynchronizer;
use crate::model::todo::{Todo, next_id_seed};
use crate::model::tree::{NodeId, TodoForest};
use crate::parse::parse_content;

use super::input;
use super::render;
use super::theme::Theme;

/// Main application state
pub struct App {
    /// Flat record sequence, the source of truth for persistence.
    pub todos: Vec<Todo>,
    /// Derived tree view, rebuilt from `todos` on every refresh.
    pub forest: TodoForest,
    /// Visible rows: `(node, depth)` in display order, collapse-aware.
    pub flat: Vec<(NodeId, usize)>,
    /// Cursor index into `flat`
    pub cursor: usize,
    /// Ids of collapsed nodes (display-only, never persisted to the file)
    pub collapsed: HashSet<usize>,
    /// Warnings from the last load, replaced wholesale on each reload
    pub warnings: Vec<String>,
    /// Fatal read error; editing is suspended while set
    pub error: Option<String>,
    /// Edit buffer while editing the cursor row's text
    pub editing: Option<String>,
    pub show_help: bool,
    pub should_quit: bool,
    /// Session id counter for interactively created todos
    pub next_id: usize,
    pub theme: Theme,
    pub sync: FileSynchronizer,
}

impl App {
    pub fn new(todos: Vec<Todo>, warnings: Vec<String>, sync: FileSynchronizer) -> Self {
        let next_id = next_id_seed(&todos);
        let mut app = App {
            todos,
            forest: TodoForest::default(),
            flat: Vec::new(),
            cursor: 0,
            collapsed: HashSet::new(),
            warnings,
            error: None,
            editing: None,
            show_help: false,
            should_quit: false,
            next_id,
            theme: Theme::default(),
            sync,
        };
        app.refresh();
        app
    }

    /// Rebuild the derived forest and visible rows from `todos`, clamping
    /// the cursor to the new row count.
    pub fn refresh(&mut self) {
        self.forest = TodoForest::build(&self.todos);
        self.flat = self.forest.flatten_visible(&self.collapsed);
        if self.cursor >= self.flat.len() {
            self.cursor = self.flat.len().saturating_sub(1);
        }
    }

    /// Re-read the file and replace all in-memory state from it.
    /// A read failure becomes the error state; a success clears it.
    pub fn reload(&mut self) {
        match fs::read_to_string(self.sync.path()) {
            Err(e) => {
                self.error = Some(e.to_string());
            }
            Ok(content) => {
                let (todos, warnings) = parse_content(&content);
                self.next_id = self.next_id.max(next_id_seed(&todos));
                self.collapsed.retain(|id| todos.iter().any(|t| t.id == *id));
                self.todos = todos;
                self.warnings = warnings;
                self.error = None;
                self.refresh();
            }
        }
    }

    /// Flatten the forest for persistence, adopt it as the new flat record
    /// sequence, and hand the snapshot to the save loop.
    pub fn push_save(&mut self) {
        let snapshot = self.forest.flatten_for_save();
        self.todos = snapshot.clone();
        self.sync.request_save(snapshot);
        self.refresh();
    }

    /// Node under the cursor, if any.
    pub fn current(&self) -> Option<NodeId> {
        self.flat.get(self.cursor).map(|&(node, _)| node)
    }

    /// Claim the next session id.
    pub fn take_next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Move the cursor to the row showing the todo with `todo_id`, if that
    /// row is currently visible.
    pub fn focus_todo(&mut self, todo_id: usize) {
        if let Some(pos) = self
            .flat
            .iter()
            .position(|&(node, _)| self.forest.todo(node).id == todo_id)
        {
            self.cursor = pos;
        }
    }
}

/// Run the TUI over the given todo file.
pub fn run(
    path: &Path,
    todos: Vec<Todo>,
    warnings: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let sync = FileSynchronizer::start(path)?;
    let mut app = App::new(todos, warnings, sync);

    // Restore saved UI state (best-effort).
    let state_dir = config_io::config_path()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()));
    if let Some(dir) = &state_dir {
        if let Some(state) = read_ui_state(dir) {
            app.cursor = state.cursor;
            app.collapsed = state.collapsed;
            app.collapsed
                .retain(|id| app.todos.iter().any(|t| t.id == *id));
            app.refresh();
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Save UI state before exit
    if let Some(dir) = &state_dir {
        let _ = write_ui_state(
            dir,
            &UiState {
                cursor: app.cursor,
                collapsed: app.collapsed.clone(),
            },
        );
    }
    app.sync.stop();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if app.sync.take_reload() {
            app.reload();
        }

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    input::handle_key(app, key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

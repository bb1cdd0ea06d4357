use serde::{Deserialize, Serialize};

/// Checkbox state of a todo line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoState {
    Incomplete,
    Completed,
    Cancelled,
    Pushed,
}

impl TodoState {
    /// The character used inside the checkbox `[ ]`
    pub fn checkbox_char(self) -> char {
        match self {
            TodoState::Incomplete => ' ',
            TodoState::Completed => 'x',
            TodoState::Cancelled => '-',
            TodoState::Pushed => '>',
        }
    }

    /// Parse a checkbox character into a state
    pub fn from_checkbox_char(c: char) -> Option<TodoState> {
        match c {
            ' ' => Some(TodoState::Incomplete),
            'x' => Some(TodoState::Completed),
            '-' => Some(TodoState::Cancelled),
            '>' => Some(TodoState::Pushed),
            _ => None,
        }
    }
}

/// A single checklist item.
///
/// `highlighted` is only meaningful while `state` is [`TodoState::Incomplete`];
/// every mutation site clears it on a transition away from that state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique within a loaded session. Assigned from the line position at
    /// parse time, and from the session counter for interactive additions.
    pub id: usize,
    /// Display text, with any trailing highlight marker stripped.
    pub text: String,
    pub state: TodoState,
    /// Leading-space count; determines nesting when rebuilding the tree.
    pub indent_level: usize,
    pub highlighted: bool,
    /// Origin line within the managed blocks. Informational only.
    pub line_number: usize,
}

impl Todo {
    /// Create a fresh incomplete record (no source line).
    pub fn new(id: usize, text: impl Into<String>) -> Self {
        Todo {
            id,
            text: text.into(),
            state: TodoState::Incomplete,
            indent_level: 0,
            highlighted: false,
            line_number: 0,
        }
    }
}

/// Seed for the session's id counter: one past the largest id seen.
pub fn next_id_seed(todos: &[Todo]) -> usize {
    todos.iter().map(|t| t.id).max().unwrap_or(0) + 1
}

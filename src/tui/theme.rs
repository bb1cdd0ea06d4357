use ratatui::style::{Color, Modifier, Style};

use crate::model::todo::{Todo, TodoState};

/// Row styles for the todo list
#[derive(Debug, Clone)]
pub struct Theme {
    pub incomplete: Style,
    pub completed: Style,
    pub cancelled: Style,
    pub pushed: Style,
    pub highlight: Style,
    pub cursor: Style,
    pub warning: Style,
    pub error: Style,
    pub dim: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            incomplete: Style::default().fg(Color::White),
            completed: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::DIM),
            cancelled: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
            pushed: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
            highlight: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
            cursor: Style::default().bg(Color::White).fg(Color::Black),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::DarkGray),
        }
    }
}

impl Theme {
    /// Style for a todo row; highlight takes precedence while incomplete.
    pub fn todo_style(&self, todo: &Todo) -> Style {
        match todo.state {
            TodoState::Completed => self.completed,
            TodoState::Cancelled => self.cancelled,
            TodoState::Pushed => self.pushed,
            TodoState::Incomplete if todo.highlighted => self.highlight,
            TodoState::Incomplete => self.incomplete,
        }
    }
}

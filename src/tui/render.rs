use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};

use crate::model::todo::TodoState;

use super::app::App;

/// Render the whole frame: banners, list, footer — or the help overlay.
pub fn render(frame: &mut Frame, app: &App) {
    if app.show_help {
        frame.render_widget(Paragraph::new(help_lines(app)), frame.area());
        return;
    }

    let banner = banner_lines(app);
    let [banner_area, list_area, footer_area] = Layout::vertical([
        Constraint::Length(banner.len() as u16),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    if !banner.is_empty() {
        frame.render_widget(Paragraph::new(banner), banner_area);
    }

    if app.flat.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("No todos found.", app.theme.dim)),
            list_area,
        );
    } else {
        let items: Vec<ListItem> = app
            .flat
            .iter()
            .enumerate()
            .map(|(i, &(node, depth))| {
                let todo = app.forest.todo(node);
                let indent = "  ".repeat(depth);
                let chevron = if app.forest.has_children(node) {
                    if app.collapsed.contains(&todo.id) {
                        "▸ "
                    } else {
                        "▾ "
                    }
                } else {
                    "  "
                };
                let icon = match todo.state {
                    TodoState::Completed => "✔",
                    TodoState::Cancelled => "✗",
                    TodoState::Pushed => "➤",
                    TodoState::Incomplete => "○",
                };
                let text = match &app.editing {
                    Some(buffer) if i == app.cursor => format!("{}|", buffer),
                    _ if todo.highlighted => format!("{} *", todo.text),
                    _ => todo.text.clone(),
                };
                let row = format!("{}{}{} {}", indent, chevron, icon, text);
                ListItem::new(Line::from(Span::styled(row, app.theme.todo_style(todo))))
            })
            .collect();

        let list = List::new(items).highlight_style(app.theme.cursor);
        let mut state = ListState::default();
        state.select(Some(app.cursor));
        frame.render_stateful_widget(list, list_area, &mut state);
    }

    let footer = if app.editing.is_some() {
        Span::styled("editing: enter to save, esc to cancel", app.theme.dim)
    } else {
        Span::styled("press ? for help", app.theme.dim)
    };
    frame.render_widget(Paragraph::new(Line::from(footer)), footer_area);
}

fn banner_lines(app: &App) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    if let Some(error) = &app.error {
        lines.push(Line::from(Span::styled(
            format!("Error: {}", error),
            app.theme.error,
        )));
        lines.push(Line::from(Span::styled(
            "editing suspended until the file is readable again",
            app.theme.dim,
        )));
    }
    for warning in &app.warnings {
        lines.push(Line::from(Span::styled(
            format!("Warning: {}", warning),
            app.theme.warning,
        )));
    }
    lines
}

fn help_lines(app: &App) -> Vec<Line<'_>> {
    let rows = [
        "j / k / ↑ / ↓   move cursor",
        "enter           collapse/expand subtree",
        "x / - / >       toggle completed / cancelled / pushed",
        "space           mark incomplete",
        "*               toggle highlight (incomplete only)",
        "e               edit text",
        "a               add sibling todo",
        "A               add child todo",
        "d               delete todo (and its subtree)",
        "q / ctrl+c      quit",
        "? / esc         toggle this help",
    ];
    let mut lines = vec![
        Line::from(Span::styled("td — keys", app.theme.highlight)),
        Line::from(Span::styled("─".repeat(40), app.theme.dim)),
    ];
    lines.extend(
        rows.iter()
            .map(|row| Line::from(Span::styled(*row, app.theme.incomplete))),
    );
    lines
}

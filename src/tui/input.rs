use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::todo::{Todo, TodoState};
use crate::ops;

use super::app::App;

/// Handle a key press in the current mode.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Fatal error state: interaction is suspended until an external fix
    // triggers a successful reload. Only quitting works.
    if app.error.is_some() {
        if is_quit(&key) {
            app.should_quit = true;
        }
        return;
    }

    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    if app.editing.is_some() {
        handle_edit_key(app, key);
        return;
    }

    if is_quit(&key) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            if app.cursor + 1 < app.flat.len() {
                app.cursor += 1;
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Enter => toggle_collapse(app),
        KeyCode::Char('x') => toggle_state(app, TodoState::Completed),
        KeyCode::Char('-') => toggle_state(app, TodoState::Cancelled),
        KeyCode::Char('>') => toggle_state(app, TodoState::Pushed),
        KeyCode::Char(' ') => {
            if let Some(cur) = app.current() {
                ops::set_state(&mut app.forest, cur, TodoState::Incomplete);
                app.push_save();
            }
        }
        KeyCode::Char('*') => toggle_highlight(app),
        KeyCode::Char('e') => {
            if let Some(cur) = app.current() {
                app.editing = Some(app.forest.todo(cur).text.clone());
            }
        }
        KeyCode::Char('a') => add_sibling_at_cursor(app),
        KeyCode::Char('A') => add_child_at_cursor(app),
        KeyCode::Char('d') => delete_at_cursor(app),
        KeyCode::Char('?') => app.show_help = true,
        _ => {}
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn handle_edit_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            let text = app.editing.take().unwrap_or_default();
            if let Some(cur) = app.current() {
                ops::edit_text(&mut app.forest, cur, text);
                app.push_save();
            }
        }
        KeyCode::Esc => {
            app.editing = None;
        }
        KeyCode::Backspace => {
            if let Some(buffer) = app.editing.as_mut() {
                buffer.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(buffer) = app.editing.as_mut() {
                buffer.push(c);
            }
        }
        _ => {}
    }
}

fn toggle_collapse(app: &mut App) {
    if let Some(cur) = app.current() {
        if app.forest.has_children(cur) {
            let id = app.forest.todo(cur).id;
            if !app.collapsed.remove(&id) {
                app.collapsed.insert(id);
            }
            // Display-only: never triggers a write-back.
            app.refresh();
        }
    }
}

fn toggle_state(app: &mut App, state: TodoState) {
    if let Some(cur) = app.current() {
        ops::toggle_state(&mut app.forest, cur, state);
        app.push_save();
    }
}

fn toggle_highlight(app: &mut App) {
    if let Some(cur) = app.current() {
        let todo = app.forest.todo(cur);
        if todo.state == TodoState::Incomplete {
            let on = !todo.highlighted;
            ops::set_highlight(&mut app.forest, cur, on);
            app.push_save();
        }
    }
}

fn add_sibling_at_cursor(app: &mut App) {
    let id = app.take_next_id();
    let todo = Todo::new(id, "New todo");
    match app.current() {
        Some(cur) => {
            ops::add_sibling(&mut app.forest, cur, todo);
            app.push_save();
        }
        None => {
            app.todos.push(todo);
            app.refresh();
            app.push_save();
        }
    }
    app.focus_todo(id);
}

fn add_child_at_cursor(app: &mut App) {
    if let Some(cur) = app.current() {
        let id = app.take_next_id();
        ops::add_child(&mut app.forest, cur, Todo::new(id, "New child todo"));
        app.push_save();
        app.focus_todo(id);
    }
}

fn delete_at_cursor(app: &mut App) {
    if let Some(cur) = app.current() {
        let todo_id = app.forest.todo(cur).id;
        app.collapsed.remove(&todo_id);
        ops::delete_node(&mut app.forest, cur);
        app.push_save();
    }
}

use crate::model::todo::{Todo, TodoState};
use crate::model::tree::{NodeId, TodoForest};

// ---------------------------------------------------------------------------
// State transitions
// ---------------------------------------------------------------------------

/// Set a node's state. Leaving `Incomplete` forcibly clears the highlight,
/// keeping the `highlighted ⇒ incomplete` invariant at every mutation site.
pub fn set_state(forest: &mut TodoForest, node: NodeId, new_state: TodoState) {
    let todo = forest.todo_mut(node);
    todo.state = new_state;
    if new_state != TodoState::Incomplete {
        todo.highlighted = false;
    }
}

/// Toggle between `state` and `Incomplete` (the TUI's x/-/> keys).
pub fn toggle_state(forest: &mut TodoForest, node: NodeId, state: TodoState) {
    if forest.todo(node).state == state {
        set_state(forest, node, TodoState::Incomplete);
    } else {
        set_state(forest, node, state);
    }
}

/// Set the highlight flag. A no-op on anything but an incomplete record.
pub fn set_highlight(forest: &mut TodoForest, node: NodeId, on: bool) {
    let todo = forest.todo_mut(node);
    if todo.state == TodoState::Incomplete {
        todo.highlighted = on;
    }
}

/// Replace a node's display text.
pub fn edit_text(forest: &mut TodoForest, node: NodeId, text: String) {
    forest.todo_mut(node).text = text;
}

// ---------------------------------------------------------------------------
// Structural edits
// ---------------------------------------------------------------------------

/// Insert `todo` as the next sibling of `after` (same parent, same depth).
/// In display order the new node lands after `after`'s last descendant, so
/// it never absorbs `after`'s children.
pub fn add_sibling(forest: &mut TodoForest, after: NodeId, todo: Todo) -> NodeId {
    let parent = forest.node(after).parent;
    let id = forest.alloc(todo, parent);
    forest.link_after(after, id);
    id
}

/// Append `todo` to the end of `parent`'s child list.
pub fn add_child(forest: &mut TodoForest, parent: NodeId, todo: Todo) -> NodeId {
    let id = forest.alloc(todo, Some(parent));
    forest.link_child(parent, id);
    id
}

/// Remove the child at `index` of `parent` (or the root at `index` when
/// `parent` is `None`). The removed node's subtree is discarded, never
/// reattached. Out-of-range index is a no-op.
pub fn delete_child(forest: &mut TodoForest, parent: Option<NodeId>, index: usize) {
    forest.unlink_at(parent, index);
}

/// Remove `node` from its parent's child list (or the root list), discarding
/// its whole subtree.
pub fn delete_node(forest: &mut TodoForest, node: NodeId) {
    let parent = forest.node(node).parent;
    let siblings: &[NodeId] = match parent {
        Some(p) => &forest.node(p).children,
        None => forest.roots(),
    };
    if let Some(index) = siblings.iter().position(|&n| n == node) {
        delete_child(forest, parent, index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forest(indents: &[usize]) -> TodoForest {
        let flat: Vec<Todo> = indents
            .iter()
            .enumerate()
            .map(|(i, &indent)| {
                let mut t = Todo::new(i + 1, format!("item {}", i + 1));
                t.indent_level = indent;
                t
            })
            .collect();
        TodoForest::build(&flat)
    }

    fn texts_in_order(forest: &TodoForest) -> Vec<String> {
        forest
            .flatten_for_save()
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn completing_a_highlighted_todo_clears_highlight() {
        let mut f = forest(&[0]);
        let root = f.roots()[0];
        set_highlight(&mut f, root, true);
        assert!(f.todo(root).highlighted);

        set_state(&mut f, root, TodoState::Completed);
        assert_eq!(f.todo(root).state, TodoState::Completed);
        assert!(!f.todo(root).highlighted);
    }

    #[test]
    fn highlighting_a_completed_todo_is_a_no_op() {
        let mut f = forest(&[0]);
        let root = f.roots()[0];
        set_state(&mut f, root, TodoState::Completed);
        set_highlight(&mut f, root, true);
        assert!(!f.todo(root).highlighted);
    }

    #[test]
    fn toggle_state_round_trips_through_incomplete() {
        let mut f = forest(&[0]);
        let root = f.roots()[0];
        toggle_state(&mut f, root, TodoState::Pushed);
        assert_eq!(f.todo(root).state, TodoState::Pushed);
        toggle_state(&mut f, root, TodoState::Pushed);
        assert_eq!(f.todo(root).state, TodoState::Incomplete);
    }

    #[test]
    fn sibling_insertion_preserves_subtree() {
        // Root A with children [B, C]; inserting after A yields roots
        // [A, New] with A's children untouched.
        let mut f = forest(&[0, 2, 2]);
        let a = f.roots()[0];
        add_sibling(&mut f, a, Todo::new(10, "New"));

        assert_eq!(f.roots().len(), 2);
        assert_eq!(f.node(a).children.len(), 2);
        assert_eq!(
            texts_in_order(&f),
            vec!["item 1", "item 2", "item 3", "New"]
        );
    }

    #[test]
    fn sibling_insertion_in_the_middle() {
        let mut f = forest(&[0, 2, 0]);
        let first = f.roots()[0];
        add_sibling(&mut f, first, Todo::new(10, "New"));
        assert_eq!(
            texts_in_order(&f),
            vec!["item 1", "item 2", "New", "item 3"]
        );
    }

    #[test]
    fn nested_sibling_shares_the_parent() {
        let mut f = forest(&[0, 2]);
        let root = f.roots()[0];
        let child = f.node(root).children[0];
        let new = add_sibling(&mut f, child, Todo::new(10, "New"));
        assert_eq!(f.node(new).parent, Some(root));
        assert_eq!(f.node(root).children.len(), 2);
    }

    #[test]
    fn add_child_appends() {
        let mut f = forest(&[0, 2]);
        let root = f.roots()[0];
        add_child(&mut f, root, Todo::new(10, "Last"));
        assert_eq!(f.node(root).children.len(), 2);
        assert_eq!(texts_in_order(&f), vec!["item 1", "item 2", "Last"]);
    }

    #[test]
    fn deleting_a_parent_discards_its_subtree() {
        let mut f = forest(&[0, 2, 4, 0]);
        delete_child(&mut f, None, 0);
        assert_eq!(texts_in_order(&f), vec!["item 4"]);
    }

    #[test]
    fn delete_out_of_range_is_a_no_op() {
        let mut f = forest(&[0, 2]);
        let root = f.roots()[0];
        delete_child(&mut f, None, 5);
        delete_child(&mut f, Some(root), 1);
        assert_eq!(texts_in_order(&f).len(), 2);
    }

    #[test]
    fn delete_node_finds_its_own_slot() {
        let mut f = forest(&[0, 2, 2]);
        let root = f.roots()[0];
        let second_child = f.node(root).children[1];
        delete_node(&mut f, second_child);
        assert_eq!(texts_in_order(&f), vec!["item 1", "item 2"]);
    }
}

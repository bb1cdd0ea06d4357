use std::sync::OnceLock;

use regex::Regex;

use crate::model::todo::{Todo, TodoState};

/// Sentinel line (trimmed) that opens and closes a managed block.
pub const BLOCK_MARKER: &str = ":td";

fn todo_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*)- \[( |x|\-|>)\] (.*)$").unwrap())
}

/// Decode one line into a record, or `None` if the line is not a todo.
///
/// The returned record has `id` and `line_number` zeroed; [`parse_blocks`]
/// assigns both from the line position. A trailing `*` token is stripped from
/// the text, but the highlight flag is only set when the decoded state is
/// incomplete, so parsed records always satisfy the highlight invariant.
pub fn decode_line(line: &str) -> Option<Todo> {
    let caps = todo_re().captures(line)?;
    let indent = caps[1].len();
    let state = TodoState::from_checkbox_char(caps[2].chars().next()?)?;
    let mut text = caps[3].to_string();
    let mut highlighted = false;
    let trimmed = text.trim();
    if trimmed.ends_with('*') {
        text = trimmed
            .strip_suffix('*')
            .unwrap_or(trimmed)
            .trim()
            .to_string();
        highlighted = state == TodoState::Incomplete;
    }
    Some(Todo {
        id: 0,
        text,
        state,
        indent_level: indent,
        highlighted,
        line_number: 0,
    })
}

/// Extract all complete `:td` blocks from the file's lines, in file order.
///
/// A marker line toggles "inside a block"; marker lines are never content.
/// A file ending while still inside a block discards that partial block with
/// one warning. Zero blocks is a valid result.
pub fn extract_blocks(lines: &[String]) -> (Vec<Vec<String>>, Vec<String>) {
    let mut blocks = Vec::new();
    let mut warnings = Vec::new();
    let mut block: Vec<String> = Vec::new();
    let mut in_block = false;
    for line in lines {
        if line.trim() == BLOCK_MARKER {
            if in_block {
                blocks.push(std::mem::take(&mut block));
                in_block = false;
            } else {
                in_block = true;
                block.clear();
            }
        } else if in_block {
            block.push(line.clone());
        }
    }
    if in_block {
        warnings.push(format!(
            "unmatched {} marker at end of file; partial block ignored",
            BLOCK_MARKER
        ));
    }
    (blocks, warnings)
}

/// Parse extracted blocks into a flat record sequence.
///
/// Blocks are logically concatenated in file order. Ids and line numbers come
/// from a running counter over content lines, so every content line (todo or
/// not) advances it. Malformed non-blank lines are skipped with one warning
/// each; blank lines are skipped silently.
pub fn parse_blocks(blocks: &[Vec<String>]) -> (Vec<Todo>, Vec<String>) {
    let mut todos = Vec::new();
    let mut warnings = Vec::new();
    let mut line_num = 0;
    for (block_idx, block) in blocks.iter().enumerate() {
        for line in block {
            line_num += 1;
            match decode_line(line) {
                Some(mut todo) => {
                    todo.id = line_num;
                    todo.line_number = line_num;
                    todos.push(todo);
                }
                None => {
                    if !line.trim().is_empty() {
                        warnings.push(format!(
                            "malformed todo in block {}, line {}: '{}'",
                            block_idx + 1,
                            line_num,
                            line
                        ));
                    }
                }
            }
        }
    }
    (todos, warnings)
}

/// Extract and parse a whole file's content in one step, merging warnings.
pub fn parse_content(content: &str) -> (Vec<Todo>, Vec<String>) {
    let lines: Vec<String> = content.lines().map(|l| l.to_string()).collect();
    let (blocks, mut warnings) = extract_blocks(&lines);
    let (todos, parse_warnings) = parse_blocks(&blocks);
    warnings.extend(parse_warnings);
    (todos, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(s: &str) -> Vec<String> {
        s.lines().map(|l| l.to_string()).collect()
    }

    #[test]
    fn decode_all_states() {
        for (ch, expected) in [
            (' ', TodoState::Incomplete),
            ('x', TodoState::Completed),
            ('-', TodoState::Cancelled),
            ('>', TodoState::Pushed),
        ] {
            let todo = decode_line(&format!("- [{}] Test item", ch)).unwrap();
            assert_eq!(todo.state, expected);
            assert_eq!(todo.text, "Test item");
        }
    }

    #[test]
    fn decode_counts_indent() {
        let todo = decode_line("    - [ ] Nested").unwrap();
        assert_eq!(todo.indent_level, 4);
        assert_eq!(decode_line("- [ ] Top").unwrap().indent_level, 0);
    }

    #[test]
    fn decode_rejects_non_todo_lines() {
        assert!(decode_line("").is_none());
        assert!(decode_line("plain prose").is_none());
        assert!(decode_line("- [?] unknown marker").is_none());
        assert!(decode_line("-[ ] missing space").is_none());
    }

    #[test]
    fn decode_strips_highlight_suffix() {
        let todo = decode_line("- [ ] Call the bank *").unwrap();
        assert!(todo.highlighted);
        assert_eq!(todo.text, "Call the bank");

        // Attached suffix is stripped too.
        let todo = decode_line("- [ ] Call the bank*").unwrap();
        assert!(todo.highlighted);
        assert_eq!(todo.text, "Call the bank");
    }

    #[test]
    fn highlight_flag_ignored_on_non_incomplete() {
        let todo = decode_line("- [x] Shipped it *").unwrap();
        assert_eq!(todo.state, TodoState::Completed);
        assert_eq!(todo.text, "Shipped it");
        assert!(!todo.highlighted);
    }

    #[test]
    fn extract_single_block() {
        let input = lines("notes above\n:td\n- [ ] One\n- [ ] Two\n:td\nnotes below");
        let (blocks, warnings) = extract_blocks(&input);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0], vec!["- [ ] One", "- [ ] Two"]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn extract_multiple_blocks_in_order() {
        let input = lines(":td\n- [ ] A\n:td\nmiddle\n:td\n- [ ] B\n:td");
        let (blocks, _) = extract_blocks(&input);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], vec!["- [ ] A"]);
        assert_eq!(blocks[1], vec!["- [ ] B"]);
    }

    #[test]
    fn extract_marker_with_surrounding_whitespace() {
        let input = lines("  :td  \n- [ ] A\n\t:td");
        let (blocks, warnings) = extract_blocks(&input);
        assert_eq!(blocks.len(), 1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn extract_discards_dangling_block_with_warning() {
        let input = lines("intro\n:td\n- [ ] lost todo");
        let (blocks, warnings) = extract_blocks(&input);
        assert!(blocks.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn extract_zero_blocks_is_not_an_error() {
        let (blocks, warnings) = extract_blocks(&lines("just prose\nno markers"));
        assert!(blocks.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn parse_assigns_ids_by_position_across_blocks() {
        let blocks = vec![
            vec!["- [ ] First".to_string(), "- [ ] Second".to_string()],
            vec!["- [ ] Third".to_string()],
        ];
        let (todos, warnings) = parse_blocks(&blocks);
        assert!(warnings.is_empty());
        let ids: Vec<usize> = todos.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(todos[2].line_number, 3);
    }

    #[test]
    fn parse_warns_on_malformed_lines_and_keeps_counting() {
        let blocks = vec![vec![
            "- [ ] Good".to_string(),
            "not a todo".to_string(),
            "".to_string(),
            "- [x] Also good".to_string(),
        ]];
        let (todos, warnings) = parse_blocks(&blocks);
        assert_eq!(todos.len(), 2);
        // One warning for the prose line, none for the blank one.
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("not a todo"));
        // The counter advanced over the skipped lines.
        assert_eq!(todos[1].id, 4);
    }

    #[test]
    fn parse_content_merges_warnings() {
        let content = ":td\n- [ ] Ok\ngarbage\n:td\nafter\n:td\n- [ ] dangling";
        let (todos, warnings) = parse_content(content);
        assert_eq!(todos.len(), 1);
        assert_eq!(warnings.len(), 2);
    }
}

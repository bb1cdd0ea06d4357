use crate::model::todo::Todo;
use crate::parse::todo_parser::{BLOCK_MARKER, decode_line};

/// Encode a record as a todo line (inverse of `decode_line`).
pub fn encode_line(todo: &Todo) -> String {
    let indent = " ".repeat(todo.indent_level);
    let text = if todo.highlighted {
        format!("{} *", todo.text.trim())
    } else {
        todo.text.clone()
    };
    format!("{}- [{}] {}", indent, todo.state.checkbox_char(), text)
}

/// Encode a flat record sequence, one line per record, in order.
pub fn serialize_todos(todos: &[Todo]) -> Vec<String> {
    todos.iter().map(encode_line).collect()
}

/// Rewrite the managed blocks of `content` with `todos`, leaving every other
/// line byte-for-byte untouched (including a trailing newline, preserved by
/// splitting and re-joining on `\n`).
///
/// Partitioning across blocks: each complete block except the last receives
/// as many records as it originally held decodable todo lines; the last block
/// absorbs all remaining records. With a single block this means the block
/// receives the whole snapshot. Mismatched counts never fail: surplus
/// capacity goes unused, surplus records land in the last block. A dangling
/// opening marker and anything after it are preserved verbatim.
pub fn splice_blocks(content: &str, todos: &[Todo]) -> String {
    let lines: Vec<&str> = content.split('\n').collect();
    let capacities = block_capacities(&lines);
    let blocks_total = capacities.len();

    let mut out: Vec<String> = Vec::new();
    let mut cur = 0usize;
    let mut block_idx = 0usize;
    let mut i = 0usize;
    while i < lines.len() {
        let line = lines[i];
        if line.trim() == BLOCK_MARKER && block_idx < blocks_total {
            // Opening marker of a complete block: emit the marker, then this
            // block's share of the snapshot, then skip the original content
            // up to (not including) the closing marker.
            out.push(line.to_string());
            let remaining = todos.len() - cur;
            let take = if block_idx + 1 == blocks_total {
                remaining
            } else {
                remaining.min(capacities[block_idx])
            };
            for todo in &todos[cur..cur + take] {
                out.push(encode_line(todo));
            }
            cur += take;
            block_idx += 1;
            while i + 1 < lines.len() && lines[i + 1].trim() != BLOCK_MARKER {
                i += 1;
            }
            if i + 1 < lines.len() {
                // Closing marker.
                out.push(lines[i + 1].to_string());
                i += 1;
            }
        } else {
            out.push(line.to_string());
        }
        i += 1;
    }
    out.join("\n")
}

/// Count the decodable todo lines in each complete block. A dangling partial
/// block contributes nothing.
fn block_capacities(lines: &[&str]) -> Vec<usize> {
    let mut caps = Vec::new();
    let mut in_block = false;
    let mut count = 0usize;
    for line in lines {
        if line.trim() == BLOCK_MARKER {
            if in_block {
                caps.push(count);
                in_block = false;
            } else {
                in_block = true;
                count = 0;
            }
        } else if in_block && decode_line(line).is_some() {
            count += 1;
        }
    }
    caps
}

pub mod todo_parser;
pub mod todo_serializer;

pub use todo_parser::{BLOCK_MARKER, decode_line, extract_blocks, parse_blocks, parse_content};
pub use todo_serializer::{encode_line, serialize_todos, splice_blocks};

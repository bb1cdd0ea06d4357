use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;

use crate::model::todo::Todo;
use crate::parse::serialize_todos;

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Path of the recovery log kept next to the todo file.
pub fn recovery_log_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "todo".to_string());
    target.with_file_name(format!(".{}.recovery.log", name))
}

/// Append a failed snapshot to the recovery log so a save failure never
/// silently loses data. Best-effort: the save loop must stay alive, so
/// errors here are swallowed.
pub fn log_write_failure(target: &Path, error: &io::Error, snapshot: &[Todo]) {
    let mut entry = String::new();
    entry.push_str(&format!(
        "## {} — write failed: {}\n",
        Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        error
    ));
    for line in serialize_todos(snapshot) {
        entry.push_str(&line);
        entry.push('\n');
    }
    entry.push('\n');

    let _ = OpenOptions::new()
        .create(true)
        .append(true)
        .open(recovery_log_path(target))
        .and_then(|mut f| f.write_all(entry.as_bytes()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_replaces_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.md");
        fs::write(&path, "old").unwrap();

        atomic_write(&path, b"new content").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new content");
    }

    #[test]
    fn recovery_log_is_a_hidden_sibling() {
        let path = recovery_log_path(Path::new("/notes/todos.md"));
        assert_eq!(path, Path::new("/notes/.todos.md.recovery.log"));
    }

    #[test]
    fn write_failure_appends_snapshot_lines() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("todos.md");
        let snapshot = vec![Todo::new(1, "Lost update")];
        let error = io::Error::other("disk full");

        log_write_failure(&target, &error, &snapshot);
        log_write_failure(&target, &error, &snapshot);

        let log = fs::read_to_string(recovery_log_path(&target)).unwrap();
        assert_eq!(log.matches("write failed: disk full").count(), 2);
        assert!(log.contains("- [ ] Lost update"));
    }
}

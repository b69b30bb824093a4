//! File editor tool: view, create, and edit workspace files.
//!
//! One command-dispatch tool rather than separate read/write tools, so the
//! model sees a single editing surface:
//! - `view` - read a file, optionally a line range, with line numbers
//! - `create` - write a new file (or overwrite), creating parent directories
//! - `str_replace` - replace one unique occurrence of a string
//! - `insert` - insert text after a given line

use std::path::Path;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{resolve_path, Tool};

/// View and edit files in the workspace.
pub struct FileEditor;

impl FileEditor {
    async fn view(&self, args: &Value, workspace: &Path) -> anyhow::Result<String> {
        let path = required_str(args, "path")?;
        let resolved = resolve_path(path, workspace);

        if !resolved.exists() {
            return Err(anyhow::anyhow!(
                "File not found: {} (resolved to: {})",
                path,
                resolved.display()
            ));
        }

        let content = tokio::fs::read_to_string(&resolved).await?;
        let lines: Vec<&str> = content.lines().collect();
        let total_lines = lines.len();

        let (start, end) = match args.get("view_range").and_then(Value::as_array) {
            Some(range) => {
                let start = range
                    .first()
                    .and_then(Value::as_u64)
                    .unwrap_or(1)
                    .max(1) as usize;
                let end = range
                    .get(1)
                    .and_then(Value::as_u64)
                    .map(|n| n as usize)
                    .unwrap_or(total_lines)
                    .min(total_lines);
                (start.saturating_sub(1).min(total_lines), end)
            }
            None => (0, total_lines),
        };

        if start >= end {
            return Ok(format!("File has {} lines, requested range is empty", total_lines));
        }

        let numbered: Vec<String> = lines[start..end]
            .iter()
            .enumerate()
            .map(|(i, line)| format!("{:4}| {}", start + i + 1, line))
            .collect();

        Ok(numbered.join("\n"))
    }

    async fn create(&self, args: &Value, workspace: &Path) -> anyhow::Result<String> {
        let path = required_str(args, "path")?;
        let file_text = required_str(args, "file_text")?;
        let resolved = resolve_path(path, workspace);

        if let Some(parent) = resolved.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&resolved, file_text).await?;

        Ok(format!(
            "Successfully wrote {} bytes to {}",
            file_text.len(),
            resolved.display()
        ))
    }

    async fn str_replace(&self, args: &Value, workspace: &Path) -> anyhow::Result<String> {
        let path = required_str(args, "path")?;
        let old_str = required_str(args, "old_str")?;
        let new_str = args["new_str"].as_str().unwrap_or("");
        let resolved = resolve_path(path, workspace);

        let content = tokio::fs::read_to_string(&resolved).await.map_err(|e| {
            anyhow::anyhow!("Cannot read {}: {}", resolved.display(), e)
        })?;

        let matches = content.matches(old_str).count();
        if matches == 0 {
            return Err(anyhow::anyhow!(
                "old_str not found in {}",
                resolved.display()
            ));
        }
        if matches > 1 {
            return Err(anyhow::anyhow!(
                "old_str occurs {} times in {}; provide a unique string",
                matches,
                resolved.display()
            ));
        }

        let updated = content.replacen(old_str, new_str, 1);
        tokio::fs::write(&resolved, updated).await?;

        Ok(format!("Replaced 1 occurrence in {}", resolved.display()))
    }

    async fn insert(&self, args: &Value, workspace: &Path) -> anyhow::Result<String> {
        let path = required_str(args, "path")?;
        let insert_line = args["insert_line"]
            .as_u64()
            .ok_or_else(|| anyhow::anyhow!("Missing 'insert_line' argument"))?
            as usize;
        let new_str = required_str(args, "new_str")?;
        let resolved = resolve_path(path, workspace);

        let content = tokio::fs::read_to_string(&resolved).await.map_err(|e| {
            anyhow::anyhow!("Cannot read {}: {}", resolved.display(), e)
        })?;

        let mut lines: Vec<&str> = content.lines().collect();
        if insert_line > lines.len() {
            return Err(anyhow::anyhow!(
                "insert_line {} is beyond end of file ({} lines)",
                insert_line,
                lines.len()
            ));
        }

        // insert_line 0 means "before the first line"
        let new_lines: Vec<&str> = new_str.lines().collect();
        lines.splice(insert_line..insert_line, new_lines);

        let mut updated = lines.join("\n");
        if content.ends_with('\n') {
            updated.push('\n');
        }
        tokio::fs::write(&resolved, updated).await?;

        Ok(format!(
            "Inserted {} line(s) after line {} in {}",
            new_str.lines().count(),
            insert_line,
            resolved.display()
        ))
    }
}

fn required_str<'a>(args: &'a Value, key: &str) -> anyhow::Result<&'a str> {
    args[key]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' argument", key))
}

#[async_trait]
impl Tool for FileEditor {
    fn name(&self) -> &str {
        "file_editor"
    }

    fn description(&self) -> &str {
        "View, create, and edit files. Commands: 'view' (read with line numbers), 'create' (write a file), 'str_replace' (replace a unique string), 'insert' (insert after a line)."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "enum": ["view", "create", "str_replace", "insert"],
                    "description": "The edit operation to perform"
                },
                "path": {
                    "type": "string",
                    "description": "File path. Relative paths resolve from the workspace."
                },
                "file_text": {
                    "type": "string",
                    "description": "For 'create': the full file content"
                },
                "old_str": {
                    "type": "string",
                    "description": "For 'str_replace': the exact string to replace; must occur exactly once"
                },
                "new_str": {
                    "type": "string",
                    "description": "For 'str_replace'/'insert': the replacement or inserted text"
                },
                "insert_line": {
                    "type": "integer",
                    "description": "For 'insert': insert after this line number (0 = start of file)"
                },
                "view_range": {
                    "type": "array",
                    "items": { "type": "integer" },
                    "description": "For 'view': [start_line, end_line], 1-indexed inclusive"
                }
            },
            "required": ["command", "path"]
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> anyhow::Result<String> {
        let command = required_str(&args, "command")?;

        match command {
            "view" => self.view(&args, workspace).await,
            "create" => self.create(&args, workspace).await,
            "str_replace" => self.str_replace(&args, workspace).await,
            "insert" => self.insert(&args, workspace).await,
            other => Err(anyhow::anyhow!("Unknown file_editor command: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_view() {
        let dir = tempfile::tempdir().unwrap();

        let result = FileEditor
            .execute(
                json!({"command": "create", "path": "out/notes.txt", "file_text": "one\ntwo\nthree\n"}),
                dir.path(),
            )
            .await
            .unwrap();
        assert!(result.contains("14 bytes"));

        let view = FileEditor
            .execute(json!({"command": "view", "path": "out/notes.txt"}), dir.path())
            .await
            .unwrap();
        assert!(view.contains("   1| one"));
        assert!(view.contains("   3| three"));
    }

    #[tokio::test]
    async fn view_supports_line_ranges() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f.txt"), "a\nb\nc\nd\n").unwrap();

        let view = FileEditor
            .execute(
                json!({"command": "view", "path": "f.txt", "view_range": [2, 3]}),
                dir.path(),
            )
            .await
            .unwrap();
        assert!(view.contains("   2| b"));
        assert!(view.contains("   3| c"));
        assert!(!view.contains("   1| a"));
        assert!(!view.contains("   4| d"));
    }

    #[tokio::test]
    async fn str_replace_requires_unique_match() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f.txt"), "foo bar foo\n").unwrap();

        let err = FileEditor
            .execute(
                json!({"command": "str_replace", "path": "f.txt", "old_str": "foo", "new_str": "baz"}),
                dir.path(),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("2 times"));

        FileEditor
            .execute(
                json!({"command": "str_replace", "path": "f.txt", "old_str": "bar", "new_str": "baz"}),
                dir.path(),
            )
            .await
            .unwrap();
        let content = std::fs::read_to_string(dir.path().join("f.txt")).unwrap();
        assert_eq!(content, "foo baz foo\n");
    }

    #[tokio::test]
    async fn str_replace_missing_string_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f.txt"), "content\n").unwrap();

        let err = FileEditor
            .execute(
                json!({"command": "str_replace", "path": "f.txt", "old_str": "absent"}),
                dir.path(),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn insert_after_line() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f.txt"), "a\nc\n").unwrap();

        FileEditor
            .execute(
                json!({"command": "insert", "path": "f.txt", "insert_line": 1, "new_str": "b"}),
                dir.path(),
            )
            .await
            .unwrap();
        let content = std::fs::read_to_string(dir.path().join("f.txt")).unwrap();
        assert_eq!(content, "a\nb\nc\n");
    }

    #[tokio::test]
    async fn unknown_command_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileEditor
            .execute(json!({"command": "rename", "path": "f.txt"}), dir.path())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unknown file_editor command"));
    }
}

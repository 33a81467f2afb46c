use crate::context::SharedContext;
use crate::mermaid::validate_markdown;
use crate::tool::{Tool, ToolResult};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// A stateful file editor patterned after Anthropic's `str_replace_editor`
/// tool (spec.md §4.4). `view` works anywhere under the repository root;
/// every other command is restricted to the documentation output
/// directory (the "Scope invariant" security contract).
pub struct StrReplaceEditorTool;

#[async_trait::async_trait]
impl Tool for StrReplaceEditorTool {
    fn name(&self) -> &str {
        "str_replace_editor"
    }

    fn description(&self) -> &str {
        "View, create, and edit files. `view` is permitted anywhere under the repository root; \
         `create`, `str_replace`, `insert`, and `undo_edit` are permitted only under the \
         documentation output directory."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "enum": ["view", "create", "str_replace", "insert", "undo_edit"]
                },
                "path": { "type": "string", "description": "Absolute path" },
                "file_text": { "type": "string", "description": "Content for `create`" },
                "old_str": { "type": "string", "description": "Exact substring to replace for `str_replace`" },
                "new_str": { "type": "string", "description": "Replacement text for `str_replace` or `insert`" },
                "insert_line": { "type": "integer", "description": "Line number after which `insert` places new_str (0 = start of file)" },
                "view_range": {
                    "type": "array",
                    "items": { "type": "integer" },
                    "description": "[start, end] 1-indexed inclusive line range for `view`"
                }
            },
            "required": ["command", "path"]
        })
    }

    async fn execute(&self, args: Value, ctx: &SharedContext) -> ToolResult {
        let Some(command) = args.get("command").and_then(|v| v.as_str()) else {
            return ToolResult::error("Missing required parameter: command");
        };
        let Some(path_arg) = args.get("path").and_then(|v| v.as_str()) else {
            return ToolResult::error("Missing required parameter: path");
        };
        let path = Path::new(path_arg);
        if !path.is_absolute() {
            return ToolResult::error("path must be absolute");
        }

        let scope = match check_scope(path, ctx) {
            Ok(scope) => scope,
            Err(e) => return ToolResult::error(e),
        };

        if command != "view" && scope != Scope::DocDir {
            return ToolResult::error(
                "Scope invariant violation: only `view` is permitted under the repository root",
            );
        }

        match command {
            "view" => view(path, &args).await,
            "create" => create(path, &args, ctx).await,
            "str_replace" => str_replace(path, &args, ctx).await,
            "insert" => insert(path, &args, ctx).await,
            "undo_edit" => undo_edit(path, ctx).await,
            other => ToolResult::error(format!("Unknown command: {other}")),
        }
    }
}

#[derive(PartialEq, Eq)]
enum Scope {
    DocDir,
    RepoRoot,
}

/// Resolves `path` against the canonical doc/repo roots and rejects
/// anything that lands outside both (path traversal, symlink escapes).
///
/// `path` may name a file (or nested directories) that don't exist yet, as
/// with `create`, so resolution climbs to the nearest existing ancestor,
/// canonicalizes it (defeating symlink tricks), and rejoins the
/// not-yet-existing suffix.
fn check_scope(path: &Path, ctx: &SharedContext) -> Result<Scope, String> {
    let doc_dir = ctx
        .doc_dir
        .canonicalize()
        .map_err(|e| format!("cannot resolve documentation directory: {e}"))?;
    let repo_root = ctx
        .repo_root
        .canonicalize()
        .map_err(|e| format!("cannot resolve repository root: {e}"))?;

    let candidate = resolve_candidate(path)?;

    if candidate.starts_with(&doc_dir) {
        Ok(Scope::DocDir)
    } else if candidate.starts_with(&repo_root) {
        Ok(Scope::RepoRoot)
    } else {
        Err(format!(
            "path {} escapes both permitted roots",
            path.display()
        ))
    }
}

fn resolve_candidate(path: &Path) -> Result<PathBuf, String> {
    let mut suffix: Vec<std::ffi::OsString> = Vec::new();
    let mut current = path.to_path_buf();
    loop {
        if let Ok(canonical_ancestor) = current.canonicalize() {
            let mut resolved = canonical_ancestor;
            for part in suffix.iter().rev() {
                resolved = resolved.join(part);
            }
            return Ok(resolved);
        }
        let file_name = current.file_name().map(|n| n.to_os_string());
        let Some(parent) = current.parent() else {
            return Err(format!("cannot resolve path: {}", path.display()));
        };
        if parent == current {
            return Err(format!("cannot resolve path: {}", path.display()));
        }
        if let Some(name) = file_name {
            suffix.push(name);
        }
        current = parent.to_path_buf();
    }
}

async fn view(path: &Path, args: &Value) -> ToolResult {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(m) => m,
        Err(e) => return ToolResult::error(format!("cannot stat {}: {e}", path.display())),
    };

    if metadata.is_dir() {
        let mut entries = match tokio::fs::read_dir(path).await {
            Ok(rd) => rd,
            Err(e) => return ToolResult::error(format!("cannot list {}: {e}", path.display())),
        };
        let mut names = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => names.push(entry.file_name().to_string_lossy().into_owned()),
                Ok(None) => break,
                Err(e) => return ToolResult::error(format!("cannot list {}: {e}", path.display())),
            }
        }
        names.sort();
        return ToolResult::text(names.join("\n"));
    }

    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) => return ToolResult::error(format!("cannot read {}: {e}", path.display())),
    };
    let lines: Vec<&str> = content.lines().collect();

    let (start, end) = match args.get("view_range").and_then(|v| v.as_array()) {
        Some(range) if range.len() == 2 => {
            let start = range[0].as_u64().unwrap_or(1).max(1) as usize;
            let end = range[1].as_u64().unwrap_or(lines.len() as u64) as usize;
            (start, end.min(lines.len()))
        }
        _ => (1, lines.len()),
    };
    if start > end || start == 0 {
        return ToolResult::error("invalid view_range");
    }

    let numbered: Vec<String> = lines[start - 1..end]
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>6}\t{}", start + i, line))
        .collect();
    ToolResult::text(numbered.join("\n"))
}

async fn create(path: &Path, args: &Value, ctx: &SharedContext) -> ToolResult {
    let Some(content) = args.get("file_text").and_then(|v| v.as_str()) else {
        return ToolResult::error("Missing required parameter: file_text");
    };
    if tokio::fs::metadata(path).await.is_ok() {
        return ToolResult::error(format!("file already exists: {}", path.display()));
    }
    if let Some(parent) = path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            return ToolResult::error(format!("cannot create parent directory: {e}"));
        }
    }
    if let Err(e) = tokio::fs::write(path, content).await {
        return ToolResult::error(format!("cannot write {}: {e}", path.display()));
    }
    post_edit_result(path, content, ctx, format!("created {}", path.display()))
}

async fn str_replace(path: &Path, args: &Value, ctx: &SharedContext) -> ToolResult {
    let Some(old) = args.get("old_str").and_then(|v| v.as_str()) else {
        return ToolResult::error("Missing required parameter: old_str");
    };
    let new = args.get("new_str").and_then(|v| v.as_str()).unwrap_or("");

    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) => return ToolResult::error(format!("cannot read {}: {e}", path.display())),
    };

    let occurrences = content.matches(old).count();

    match occurrences {
        0 => ToolResult::error(format!("old_str not found in {}", path.display())),
        1 => {
            let new_content = content.replacen(old, new, 1);
            ctx.edit_history.push(path, content);
            if let Err(e) = tokio::fs::write(path, &new_content).await {
                return ToolResult::error(format!("cannot write {}: {e}", path.display()));
            }
            post_edit_result(path, &new_content, ctx, format!("replaced text in {}", path.display()))
        }
        n => ToolResult::error(format!(
            "old_str occurs {n} times in {}; it must match exactly one occurrence",
            path.display()
        )),
    }
}

async fn insert(path: &Path, args: &Value, ctx: &SharedContext) -> ToolResult {
    let Some(insert_line) = args.get("insert_line").and_then(|v| v.as_u64()) else {
        return ToolResult::error("Missing required parameter: insert_line");
    };
    let Some(new_str) = args.get("new_str").and_then(|v| v.as_str()) else {
        return ToolResult::error("Missing required parameter: new_str");
    };

    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) => return ToolResult::error(format!("cannot read {}: {e}", path.display())),
    };
    let mut lines: Vec<&str> = content.lines().collect();
    let at = (insert_line as usize).min(lines.len());
    let insertion: Vec<&str> = new_str.lines().collect();
    for (offset, line) in insertion.into_iter().enumerate() {
        lines.insert(at + offset, line);
    }
    let mut new_content = lines.join("\n");
    if content.ends_with('\n') {
        new_content.push('\n');
    }

    ctx.edit_history.push(path, content);
    if let Err(e) = tokio::fs::write(path, &new_content).await {
        return ToolResult::error(format!("cannot write {}: {e}", path.display()));
    }
    post_edit_result(path, &new_content, ctx, format!("inserted text into {}", path.display()))
}

async fn undo_edit(path: &Path, ctx: &SharedContext) -> ToolResult {
    match ctx.edit_history.pop(path) {
        Some(previous) => match tokio::fs::write(path, &previous).await {
            Ok(()) => ToolResult::text(format!("undid last edit to {}", path.display())),
            Err(e) => ToolResult::error(format!("cannot write {}: {e}", path.display())),
        },
        None => ToolResult::error(format!("no edit history for {}", path.display())),
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("md")
}

fn post_edit_result(path: &Path, content: &str, _ctx: &SharedContext, ok_message: String) -> ToolResult {
    if !is_markdown(path) {
        return ToolResult::text(ok_message);
    }
    let diagnostics = validate_markdown(content);
    if diagnostics.is_empty() {
        return ToolResult::text(ok_message);
    }
    let detail: Vec<String> = diagnostics
        .iter()
        .map(|d| format!("diagram {} (line {}): {}", d.diagram_index, d.line, d.message))
        .collect();
    ToolResult::error(format!(
        "{ok_message}, but {} Mermaid diagram(s) failed to parse:\n{}",
        diagnostics.len(),
        detail.join("\n")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docwright_core::{ComponentRegistry, EditHistory, ModuleNode, TokenBudgets};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn ctx(doc_dir: PathBuf, repo_root: PathBuf) -> SharedContext {
        SharedContext {
            doc_dir,
            repo_root,
            edit_history: Arc::new(EditHistory::new()),
            registry: Arc::new(ComponentRegistry::new()),
            navigation_path: "root".into(),
            module_tree: Arc::new(ModuleNode::leaf("root", "root", vec![])),
            depth: 0,
            max_depth: 4,
            budgets: TokenBudgets::default(),
            doc_type: docwright_core::DocType::default(),
            custom_instructions: None,
        }
    }

    #[tokio::test]
    async fn create_then_str_replace_then_undo_round_trips() {
        let doc_dir = tempdir().unwrap();
        let repo_root = tempdir().unwrap();
        let ctx = ctx(doc_dir.path().to_path_buf(), repo_root.path().to_path_buf());
        let tool = StrReplaceEditorTool;
        let file = doc_dir.path().join("a.md");

        let created = tool
            .execute(
                json!({ "command": "create", "path": file.to_str().unwrap(), "file_text": "# Hello\n" }),
                &ctx,
            )
            .await;
        assert!(!created.is_error());

        let replaced = tool
            .execute(
                json!({
                    "command": "str_replace",
                    "path": file.to_str().unwrap(),
                    "old_str": "Hello",
                    "new_str": "World"
                }),
                &ctx,
            )
            .await;
        assert!(!replaced.is_error());
        assert_eq!(tokio::fs::read_to_string(&file).await.unwrap(), "# World\n");

        let undone = tool.execute(json!({ "command": "undo_edit", "path": file.to_str().unwrap() }), &ctx).await;
        assert!(!undone.is_error());
        assert_eq!(tokio::fs::read_to_string(&file).await.unwrap(), "# Hello\n");
    }

    #[tokio::test]
    async fn non_view_command_under_repo_root_is_rejected() {
        let doc_dir = tempdir().unwrap();
        let repo_root = tempdir().unwrap();
        let ctx = ctx(doc_dir.path().to_path_buf(), repo_root.path().to_path_buf());
        let tool = StrReplaceEditorTool;
        let file = repo_root.path().join("a.md");

        let result = tool
            .execute(
                json!({ "command": "create", "path": file.to_str().unwrap(), "file_text": "# Hello\n" }),
                &ctx,
            )
            .await;
        assert!(result.is_error());
        assert!(result.to_content_string().contains("Scope invariant"));
    }

    #[tokio::test]
    async fn str_replace_ambiguous_match_across_lines_is_rejected() {
        let doc_dir = tempdir().unwrap();
        let repo_root = tempdir().unwrap();
        let ctx = ctx(doc_dir.path().to_path_buf(), repo_root.path().to_path_buf());
        let tool = StrReplaceEditorTool;
        let file = doc_dir.path().join("a.md");
        tokio::fs::write(&file, "foo\nfoo\n").await.unwrap();

        let result = tool
            .execute(
                json!({ "command": "str_replace", "path": file.to_str().unwrap(), "old_str": "foo", "new_str": "bar" }),
                &ctx,
            )
            .await;
        assert!(result.is_error());
        assert!(result.to_content_string().contains("occurs 2 times"));
    }

    #[tokio::test]
    async fn str_replace_ambiguous_match_on_one_line_is_rejected() {
        let doc_dir = tempdir().unwrap();
        let repo_root = tempdir().unwrap();
        let ctx = ctx(doc_dir.path().to_path_buf(), repo_root.path().to_path_buf());
        let tool = StrReplaceEditorTool;
        let file = doc_dir.path().join("a.md");
        tokio::fs::write(&file, "foo foo\n").await.unwrap();

        let result = tool
            .execute(
                json!({ "command": "str_replace", "path": file.to_str().unwrap(), "old_str": "foo", "new_str": "bar" }),
                &ctx,
            )
            .await;
        assert!(result.is_error());
        assert!(result.to_content_string().contains("occurs 2 times"));
    }

    #[tokio::test]
    async fn str_replace_supports_multi_line_old_str() {
        let doc_dir = tempdir().unwrap();
        let repo_root = tempdir().unwrap();
        let ctx = ctx(doc_dir.path().to_path_buf(), repo_root.path().to_path_buf());
        let tool = StrReplaceEditorTool;
        let file = doc_dir.path().join("a.md");
        tokio::fs::write(&file, "# Title\n\nold first line\nold second line\n").await.unwrap();

        let result = tool
            .execute(
                json!({
                    "command": "str_replace",
                    "path": file.to_str().unwrap(),
                    "old_str": "old first line\nold second line",
                    "new_str": "new line"
                }),
                &ctx,
            )
            .await;
        assert!(!result.is_error());
        assert_eq!(
            tokio::fs::read_to_string(&file).await.unwrap(),
            "# Title\n\nnew line\n"
        );
    }

    #[tokio::test]
    async fn invalid_mermaid_diagram_is_reported_after_write() {
        let doc_dir = tempdir().unwrap();
        let repo_root = tempdir().unwrap();
        let ctx = ctx(doc_dir.path().to_path_buf(), repo_root.path().to_path_buf());
        let tool = StrReplaceEditorTool;
        let file = doc_dir.path().join("a.md");

        let result = tool
            .execute(
                json!({
                    "command": "create",
                    "path": file.to_str().unwrap(),
                    "file_text": "```mermaid\nnotadiagram\n```\n"
                }),
                &ctx,
            )
            .await;
        assert!(result.is_error());
        assert!(result.to_content_string().contains("Mermaid diagram"));
        assert!(tokio::fs::metadata(&file).await.is_ok());
    }
}

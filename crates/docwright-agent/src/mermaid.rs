use once_cell::sync::Lazy;
use regex::Regex;

static MERMAID_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```mermaid\s*\n(.*?)```").unwrap());

const DIAGRAM_KEYWORDS: &[&str] = &[
    "graph",
    "flowchart",
    "sequenceDiagram",
    "classDiagram",
    "stateDiagram",
    "stateDiagram-v2",
    "erDiagram",
    "gantt",
    "pie",
    "journey",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MermaidDiagnostic {
    pub diagram_index: usize,
    pub line: usize,
    pub message: String,
}

/// Extracts every fenced `mermaid` block in `content` and validates it with
/// a primary parser, falling back to a looser secondary parser on failure.
/// Only a block both parsers reject is reported (spec.md §4.4 "Post-edit
/// validation"). Diagram numbers and line numbers are 1-indexed and
/// relative to `content`, so the agent can locate the offending block.
pub fn validate_markdown(content: &str) -> Vec<MermaidDiagnostic> {
    let mut diagnostics = Vec::new();
    for (diagram_index, mat) in MERMAID_BLOCK.captures_iter(content).enumerate() {
        let whole = mat.get(0).unwrap();
        let body = mat.get(1).unwrap().as_str();
        let block_start_line = content[..whole.start()].matches('\n').count() + 1;

        if let Err(primary_err) = parse_primary(body) {
            if let Err(secondary_err) = parse_secondary(body) {
                let message = format!("{primary_err} (secondary parser also failed: {secondary_err})");
                diagnostics.push(MermaidDiagnostic {
                    diagram_index: diagram_index + 1,
                    line: block_start_line + primary_err.line,
                    message,
                });
            }
        }
    }
    diagnostics
}

struct LineError {
    line: usize,
    message: String,
}

impl std::fmt::Display for LineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Strict pass: first non-blank line must name a known diagram type, and
/// every subsequent non-blank line must have balanced brackets/parens.
fn parse_primary(body: &str) -> Result<(), LineError> {
    let mut lines = body.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

    let (header_idx, header) = lines.next().ok_or_else(|| LineError { line: 1, message: "diagram body is empty".into() })?;
    let head_word = header.trim().split_whitespace().next().unwrap_or("");
    if !DIAGRAM_KEYWORDS.iter().any(|kw| head_word.eq_ignore_ascii_case(kw)) {
        return Err(LineError {
            line: header_idx + 1,
            message: format!("unrecognized diagram type: {head_word:?}"),
        });
    }

    for (idx, line) in lines {
        check_balanced(line).map_err(|message| LineError { line: idx + 1, message })?;
    }
    Ok(())
}

/// Loose pass: still requires a recognized diagram type on the first
/// non-blank line (that invariant is never ambiguous), but checks bracket
/// balance across the whole body rather than line by line, so it accepts
/// multi-line node labels and edge syntax the strict pass rejects.
fn parse_secondary(body: &str) -> Result<(), LineError> {
    let mut lines = body.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
    let (header_idx, header) = lines.next().ok_or_else(|| LineError { line: 1, message: "diagram body is empty".into() })?;
    let head_word = header.trim().split_whitespace().next().unwrap_or("");
    if !DIAGRAM_KEYWORDS.iter().any(|kw| head_word.eq_ignore_ascii_case(kw)) {
        return Err(LineError {
            line: header_idx + 1,
            message: format!("unrecognized diagram type: {head_word:?}"),
        });
    }
    check_balanced(body).map_err(|message| LineError { line: 1, message })
}

fn check_balanced(text: &str) -> Result<(), String> {
    let mut stack = Vec::new();
    for ch in text.chars() {
        match ch {
            '(' | '[' | '{' => stack.push(ch),
            ')' => {
                if stack.pop() != Some('(') {
                    return Err("unbalanced ')'".into());
                }
            }
            ']' => {
                if stack.pop() != Some('[') {
                    return Err("unbalanced ']'".into());
                }
            }
            '}' => {
                if stack.pop() != Some('{') {
                    return Err("unbalanced '}'".into());
                }
            }
            _ => {}
        }
    }
    if stack.is_empty() {
        Ok(())
    } else {
        Err(format!("unclosed {:?}", stack.last().unwrap()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_flowchart_has_no_diagnostics() {
        let md = "# Title\n\n```mermaid\ngraph TD\nA[Start] --> B[End]\n```\n";
        assert!(validate_markdown(md).is_empty());
    }

    #[test]
    fn unrecognized_diagram_type_is_reported() {
        let md = "```mermaid\nnotADiagram\nA --> B\n```\n";
        let diags = validate_markdown(md);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].diagram_index, 1);
    }

    #[test]
    fn unbalanced_brackets_are_reported() {
        let md = "```mermaid\ngraph TD\nA[Start --> B[End]\n```\n";
        let diags = validate_markdown(md);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn multiple_blocks_are_numbered_independently() {
        let md = "```mermaid\ngraph TD\nA --> B\n```\n\ntext\n\n```mermaid\nbadtype\n```\n";
        let diags = validate_markdown(md);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].diagram_index, 2);
    }
}

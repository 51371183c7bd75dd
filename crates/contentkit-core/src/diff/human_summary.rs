//! Plain-text rendering of change lists for terminal output

use crate::diff::engine::CONTENT_PATH;
use crate::model::{ChangeOperation, ContentChange};
use serde_json::Value;

const MAX_VALUE_CHARS: usize = 60;

/// Render one line per change: `+` add, `~` update, `-` delete
///
/// Whole-document changes are summarized rather than printed in full.
pub fn render_human_summary(changes: &[ContentChange]) -> String {
    if changes.is_empty() {
        return "no changes\n".to_string();
    }

    let mut out = String::new();
    for change in changes {
        let line = match change.operation {
            ChangeOperation::Add if change.path == CONTENT_PATH => {
                "+ content (new document)".to_string()
            }
            ChangeOperation::Add => format!(
                "+ {}: {}",
                change.path,
                preview(change.new_value.as_ref())
            ),
            ChangeOperation::Update if change.path == CONTENT_PATH => {
                "~ content (document replaced)".to_string()
            }
            ChangeOperation::Update => format!(
                "~ {}: {} -> {}",
                change.path,
                preview(change.old_value.as_ref()),
                preview(change.new_value.as_ref())
            ),
            ChangeOperation::Delete => format!(
                "- {}: {}",
                change.path,
                preview(change.old_value.as_ref())
            ),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn preview(value: Option<&Value>) -> String {
    let rendered = match value {
        Some(v) => v.to_string(),
        None => "null".to_string(),
    };
    if rendered.chars().count() > MAX_VALUE_CHARS {
        let truncated: String = rendered.chars().take(MAX_VALUE_CHARS).collect();
        format!("{}...", truncated)
    } else {
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_list() {
        assert_eq!(render_human_summary(&[]), "no changes\n");
    }

    #[test]
    fn test_lines_per_operation() {
        let changes = vec![
            ContentChange::update("version", json!("1.0.0"), json!("1.1.0")),
            ContentChange::update("content", json!({}), json!({})),
            ContentChange::add("hero.cta", json!("Go")),
            ContentChange::delete("hero.subtitle", json!("old")),
        ];
        let text = render_human_summary(&changes);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "~ version: \"1.0.0\" -> \"1.1.0\"");
        assert_eq!(lines[1], "~ content (document replaced)");
        assert_eq!(lines[2], "+ hero.cta: \"Go\"");
        assert_eq!(lines[3], "- hero.subtitle: \"old\"");
    }

    #[test]
    fn test_long_values_are_truncated() {
        let long = "x".repeat(200);
        let text = render_human_summary(&[ContentChange::add("body", json!(long))]);
        assert!(text.trim_end().ends_with("..."));
        assert!(text.len() < 100);
    }
}

//! Release notes rendering for the release pull request body and its update comments.

use similar::{ChangeTag, TextDiff};

const SECTION_END_MARKERS: [&str; 2] = ["## New Contributors", "**Full Changelog**"];
const HEADER_LINES: usize = 2;

/// Trim platform-generated release notes into a pull request body.
///
/// Drops the two header lines and everything from the first "New Contributors"
/// or "Full Changelog" line on. Input shorter than two lines is returned as is.
pub fn create_release_pull_request_body(release_notes: &str) -> String {
    let lines: Vec<&str> = release_notes.split('\n').collect();
    if lines.len() < HEADER_LINES {
        return release_notes.to_string();
    }

    let end = lines
        .iter()
        .position(|line| SECTION_END_MARKERS.iter().any(|marker| line.starts_with(marker)))
        .filter(|&index| index > 0)
        .unwrap_or(lines.len());
    let start = HEADER_LINES.min(end);

    lines[start..end].join("\n")
}

/// Render the line changes between two bodies as a fenced `diff` block.
///
/// Trailing whitespace is ignored on both sides and a blank body counts as
/// having no lines. Unchanged lines are omitted, removed lines are prefixed
/// with `-  ` and added lines with `+  `. Returns `None` when nothing changed.
pub fn get_diff_markdown(old_content: &str, new_content: &str) -> Option<String> {
    let old_normalized = normalize(old_content);
    let new_normalized = normalize(new_content);
    if old_normalized == new_normalized {
        return None;
    }

    let diff = TextDiff::from_lines(&old_normalized, &new_normalized);
    let rendered: Vec<String> = diff
        .iter_all_changes()
        .filter_map(|change| {
            let line = change.value().trim_end_matches('\n');
            match change.tag() {
                ChangeTag::Delete => Some(format!("-  {}", line)),
                ChangeTag::Insert => Some(format!("+  {}", line)),
                ChangeTag::Equal => None,
            }
        })
        .collect();

    if rendered.is_empty() {
        return None;
    }

    Some(format!("```diff\n{}\n```", rendered.join("\n")))
}

fn normalize(content: &str) -> String {
    let trimmed = content.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}\n", trimmed)
    }
}

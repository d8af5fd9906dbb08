//! Pure formatting functions for run annotations and step outputs.
//!
//! Nothing here performs I/O; `ui` decides where the formatted text goes.

use console::style;

/// Severity of a run annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationLevel {
    Notice,
    Warning,
    Error,
}

impl AnnotationLevel {
    fn command(&self) -> &'static str {
        match self {
            AnnotationLevel::Notice => "notice",
            AnnotationLevel::Warning => "warning",
            AnnotationLevel::Error => "error",
        }
    }
}

/// Human-facing message about the run, with an optional short title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub level: AnnotationLevel,
    pub title: Option<String>,
    pub message: String,
}

impl Annotation {
    pub fn notice(title: impl Into<String>, message: impl Into<String>) -> Self {
        Annotation {
            level: AnnotationLevel::Notice,
            title: Some(title.into()),
            message: message.into(),
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Annotation {
            level: AnnotationLevel::Warning,
            title: Some(title.into()),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Annotation {
            level: AnnotationLevel::Error,
            title: None,
            message: message.into(),
        }
    }
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// Workflow command understood by the CI runner.
///
/// Example: `::notice title=Next Version::Next version is 1.2.4.`
pub fn format_workflow_command(annotation: &Annotation) -> String {
    let properties = annotation
        .title
        .as_deref()
        .map(|title| format!(" title={}", escape_property(title)))
        .unwrap_or_default();

    format!(
        "::{}{}::{}",
        annotation.level.command(),
        properties,
        escape_data(&annotation.message)
    )
}

/// Coloured single-line rendering for a terminal
pub fn format_console(annotation: &Annotation) -> String {
    let label = match annotation.level {
        AnnotationLevel::Notice => style("→").yellow(),
        AnnotationLevel::Warning => style("⚠ WARNING:").yellow(),
        AnnotationLevel::Error => style("ERROR:").red(),
    };

    match &annotation.title {
        Some(title) => format!("{} {} {}", label, style(title).bold(), annotation.message),
        None => format!("{} {}", label, annotation.message),
    }
}

pub fn format_group_start(name: &str) -> String {
    format!("::group::{}", escape_data(name))
}

pub fn format_group_end() -> String {
    "::endgroup::".to_string()
}

/// `name=value` line appended to the step output file
pub fn format_output_line(name: &str, value: &str) -> String {
    format!("{}={}", name, escape_data(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_command() {
        let annotation = Annotation::notice("Next Version", "Next version is 1.2.4.");
        assert_eq!(
            format_workflow_command(&annotation),
            "::notice title=Next Version::Next version is 1.2.4."
        );
    }

    #[test]
    fn test_command_escaping() {
        let annotation = Annotation::warning("a: b, c", "50%\ndone");
        assert_eq!(
            format_workflow_command(&annotation),
            "::warning title=a%3A b%2C c::50%25%0Adone"
        );
    }

    #[test]
    fn test_error_without_title() {
        assert_eq!(
            format_workflow_command(&Annotation::error("Error while reading package.json.")),
            "::error::Error while reading package.json."
        );
    }

    #[test]
    fn test_console_contains_message() {
        console::set_colors_enabled(false);
        let rendered = format_console(&Annotation::notice("No Changes", "No changes since last release."));
        assert_eq!(rendered, "→ No Changes No changes since last release.");
    }

    #[test]
    fn test_group_and_output_lines() {
        assert_eq!(format_group_start("Setup"), "::group::Setup");
        assert_eq!(format_group_end(), "::endgroup::");
        assert_eq!(format_output_line("next-version", "1.2.4"), "next-version=1.2.4");
        assert_eq!(format_output_line("release-pr", ""), "release-pr=");
    }
}

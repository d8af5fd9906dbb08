//! User interface module - run annotations and step outputs.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Choosing the destination (CI runner or terminal)

use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};

pub mod formatter;

pub use formatter::{Annotation, AnnotationLevel};

use formatter::{
    format_console, format_group_end, format_group_start, format_output_line,
    format_workflow_command,
};

/// Whether the process runs inside a CI runner that understands workflow commands
pub fn is_ci() -> bool {
    env::var("GITHUB_ACTIONS").is_ok_and(|value| value == "true")
}

/// Print an annotation as a workflow command in CI, in colour otherwise
pub fn emit(annotation: &Annotation) {
    if is_ci() {
        println!("{}", format_workflow_command(annotation));
    } else if annotation.level == AnnotationLevel::Notice {
        println!("{}", format_console(annotation));
    } else {
        eprintln!("{}", format_console(annotation));
    }
}

/// Open a collapsible log group (CI only)
pub fn start_group(name: &str) {
    if is_ci() {
        println!("{}", format_group_start(name));
    } else {
        println!("{}", console::style(name).bold());
    }
}

pub fn end_group() {
    if is_ci() {
        println!("{}", format_group_end());
    }
}

/// Report step outputs.
///
/// Lines are appended to the file named by `GITHUB_OUTPUT` when it is set,
/// and printed to stdout otherwise.
pub fn write_outputs(outputs: &[(&str, String)]) -> io::Result<()> {
    let lines: Vec<String> = outputs
        .iter()
        .map(|(name, value)| format_output_line(name, value))
        .collect();

    match env::var("GITHUB_OUTPUT") {
        Ok(path) if !path.is_empty() => {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            for line in &lines {
                writeln!(file, "{}", line)?;
            }
        }
        _ => {
            for line in &lines {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

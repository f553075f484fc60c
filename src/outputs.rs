//! Named outputs for the invoking CI job
//!
//! When `GITHUB_OUTPUT` points at a file, outputs are appended there in
//! the workflow-native `name=value` form (multiline values use a heredoc
//! block). Without it, the legacy `::set-output` workflow command is
//! printed with percent-escaped data. These outputs are the run's only
//! durable artifacts.

use std::env;
use std::fs::OpenOptions;
use std::io::Write;

use crate::error::Result;

/// Environment variable naming the outputs file
pub const OUTPUT_FILE_ENV: &str = "GITHUB_OUTPUT";

/// Publish one named output for the CI job
pub fn set_output(name: &str, value: &str) -> Result<()> {
    match env::var(OUTPUT_FILE_ENV) {
        Ok(path) if !path.is_empty() => {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            file.write_all(file_entry(name, value).as_bytes())?;
            Ok(())
        }
        _ => {
            println!("{}", legacy_command(name, value));
            Ok(())
        }
    }
}

/// Render the outputs-file entry for a name/value pair
///
/// Multiline values (the changelog body) use a heredoc block; the
/// delimiter is extended until no value line collides with it.
pub fn file_entry(name: &str, value: &str) -> String {
    if value.contains('\n') || value.contains('\r') {
        let delimiter = heredoc_delimiter(value);
        format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
    } else {
        format!("{}={}\n", name, value)
    }
}

/// Render the legacy `::set-output` workflow command
pub fn legacy_command(name: &str, value: &str) -> String {
    format!("::set-output name={}::{}", name, escape_data(value))
}

fn heredoc_delimiter(value: &str) -> String {
    let mut delimiter = String::from("EOF");
    while value.lines().any(|line| line == delimiter) {
        delimiter.push('_');
    }
    delimiter
}

// Escape order matters: '%' first, or the escapes themselves get escaped.
fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

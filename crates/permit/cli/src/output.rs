//! Output formatting utilities

use crate::error::CliResult;
use colored::*;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Print a vector of rows in the specified format
pub fn print_output<T: Serialize + Tabled>(data: Vec<T>, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                println!("{}", "No results".dimmed());
            } else {
                println!("{}", Table::new(data));
            }
        }
        OutputFormat::Json | OutputFormat::Yaml => print_single(&data, format)?,
    }
    Ok(())
}

/// Print a single item as JSON or YAML (tables fall back to JSON)
pub fn print_single<T: Serialize + ?Sized>(data: &T, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table | OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(data)?);
        }
    }
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_output_format_parse() {
        use clap::ValueEnum;
        assert_eq!(
            OutputFormat::from_str("yaml", true).unwrap(),
            OutputFormat::Yaml
        );
        assert!(OutputFormat::from_str("xml", true).is_err());
    }
}

//! Shared output formatting for CLI commands
//!
//! Every command renders as JSON, YAML, or a table. Status values are
//! coloured in tables the way the storefront badges them.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::domain::{BookingStatus, PaymentStatus};
use crate::forms::ValidationResult;
use crate::pagination::{visible_range, PageWindow, Pagination};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    #[default]
    Table,
}

/// Print data as JSON or YAML. Tables are rendered per command.
pub fn print_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(data),
        OutputFormat::Yaml => print_yaml(data),
        OutputFormat::Table => {
            anyhow::bail!("Table format requires custom implementation per data type")
        }
    }
}

/// Print data as JSON
pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}

/// Print data as YAML
pub fn print_yaml<T: Serialize>(data: &T) -> Result<()> {
    let yaml = serde_yaml::to_string(data).context("Failed to serialize to YAML")?;
    println!("{}", yaml);
    Ok(())
}

/// Print a horizontal separator line
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Print a table header
pub fn print_table_header(columns: &[(&str, usize)]) {
    println!();
    let mut header = String::new();
    for (name, width) in columns {
        header.push_str(&format!("{:<width$} ", name, width = width));
    }
    println!("{}", header.trim_end());

    let total_width: usize = columns.iter().map(|(_, w)| w + 1).sum();
    print_separator(total_width.saturating_sub(1));
}

/// Pad before colouring so escape codes do not break column alignment
pub fn booking_status_cell(status: BookingStatus, width: usize) -> String {
    let text = format!("{:<width$}", status.as_str(), width = width);
    match status {
        BookingStatus::Pending => text.yellow().to_string(),
        BookingStatus::Confirmed => text.green().to_string(),
        BookingStatus::Cancelled => text.red().to_string(),
        BookingStatus::Completed => text.blue().to_string(),
    }
}

pub fn payment_status_cell(status: PaymentStatus, width: usize) -> String {
    let text = format!("{:<width$}", status.as_str(), width = width);
    match status {
        PaymentStatus::Paid => text.green().to_string(),
        PaymentStatus::Pending => text.yellow().to_string(),
        PaymentStatus::Failed => text.red().to_string(),
        PaymentStatus::Refunded => text.cyan().to_string(),
    }
}

/// Page indicator under a listing: `Showing 10-18 of 40   < 1 [2] 3 4 5 >`
pub fn print_pagination(pagination: &Pagination, limit: u32) {
    let window = PageWindow::from_pagination(pagination);
    if !window.is_needed() {
        return;
    }
    println!("{}", pagination_line(pagination, &window, limit));
}

pub fn pagination_line(pagination: &Pagination, window: &PageWindow, limit: u32) -> String {
    let mut parts = Vec::new();
    if let Some((first, last)) =
        visible_range(pagination.current_page, limit, pagination.total_items())
    {
        parts.push(format!("Showing {}-{} of {}", first, last, pagination.total_items()));
    }

    let mut pager = String::new();
    pager.push_str(if window.has_prev { "<" } else { " " });
    for page in &window.pages {
        if *page == window.current_page {
            pager.push_str(&format!(" [{}]", page));
        } else {
            pager.push_str(&format!(" {}", page));
        }
    }
    pager.push(' ');
    pager.push_str(if window.has_next { ">" } else { " " });
    parts.push(pager.trim_end().to_string());

    parts.join("   ")
}

/// Print field errors from a rejected form, one per line
pub fn print_form_errors(result: &ValidationResult) {
    eprintln!("{}", "Please fix the following fields:".red().bold());
    for (path, message) in &result.errors {
        eprintln!("  {:<32} {}", path.to_string(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_print_json_and_yaml() {
        let data = TestData { name: "test".to_string(), value: 42 };
        assert!(print_output(&data, OutputFormat::Json).is_ok());
        assert!(print_output(&data, OutputFormat::Yaml).is_ok());
        assert!(print_output(&data, OutputFormat::Table).is_err());
    }

    #[test]
    fn test_status_cells_keep_padding() {
        let cell = booking_status_cell(BookingStatus::Pending, 12);
        assert!(cell.contains("pending     "));
        let cell = payment_status_cell(PaymentStatus::Paid, 6);
        assert!(cell.contains("paid  "));
    }

    #[test]
    fn test_pagination_line() {
        let pagination = Pagination {
            current_page: 2,
            total_pages: 4,
            has_prev: true,
            has_next: true,
            total_packages: Some(31),
            total_bookings: None,
        };
        let window = PageWindow::from_pagination(&pagination);
        assert_eq!(
            pagination_line(&pagination, &window, 9),
            "Showing 10-18 of 31   < 1 [2] 3 4 >"
        );
    }
}

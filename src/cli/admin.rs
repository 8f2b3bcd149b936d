//! Administrator console commands
//!
//! Package inventory, the booking lifecycle, and the dashboard. Every
//! command requires a signed-in administrator.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Subcommand;
use owo_colors::OwoColorize;
use tracing::warn;

use super::bookings::{print_booking_detail, print_bookings_table};
use super::output::{self, OutputFormat};
use super::packages::print_packages_table;
use super::{confirm, report, signed_in_admin};
use crate::api::{BookingQuery, PackageQuery, ADMIN_PAGE_SIZE, ALL_BOOKINGS_PAGE_SIZE};
use crate::domain::{BookingId, BookingStatus, PackageId, PaymentStatus};
use crate::forms::{Form, PackageForm};
use crate::session::Session;
use crate::stats::{admin_actions, AdminDashboardStats, BookingSummary};
use crate::utils::format_currency;

/// Bookings shown under "Recent bookings" on the dashboard
const RECENT_BOOKINGS: u32 = 5;

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Totals for packages, bookings and revenue
    Dashboard {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Package inventory management
    Packages {
        #[command(subcommand)]
        command: AdminPackageCommands,
    },

    /// Booking lifecycle management
    Bookings {
        #[command(subcommand)]
        command: AdminBookingCommands,
    },
}

#[derive(Subcommand)]
pub enum AdminPackageCommands {
    /// List the package inventory
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Create a package from a JSON or YAML file of form fields
    #[command(
        after_help = "EXAMPLES:\n    travelbook admin packages create --file bali.yaml\n\nThe file uses the package form's camelCase field names, e.g.\n    title: Bali Retreat\n    price: 1299\n    availability:\n      startDate: 2030-03-01\n      endDate: 2030-11-30\n      availableSlots: 40"
    )]
    Create {
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },

    /// Update a package; fields missing from the file keep their values
    Update {
        #[arg(value_name = "ID")]
        id: String,

        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },

    /// Delete a package
    Delete {
        #[arg(value_name = "ID")]
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum AdminBookingCommands {
    /// List all bookings
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long)]
        status: Option<BookingStatus>,

        #[arg(long)]
        payment_status: Option<PaymentStatus>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Move a booking to a new status
    Status {
        #[arg(value_name = "ID")]
        id: String,

        /// confirmed, cancelled or completed
        #[arg(value_name = "STATUS")]
        status: BookingStatus,
    },
}

/// Handle admin commands
pub async fn handle_admin_command(command: AdminCommands, session: &mut Session) -> Result<()> {
    signed_in_admin(session).await?;

    match command {
        AdminCommands::Dashboard { output } => dashboard(session, output).await?,
        AdminCommands::Packages { command } => handle_package_command(command, session).await?,
        AdminCommands::Bookings { command } => handle_booking_command(command, session).await?,
    }

    Ok(())
}

async fn dashboard(session: &Session, output: OutputFormat) -> Result<()> {
    let client = session.client();
    let packages = client
        .list_packages(&PackageQuery { page: Some(1), limit: Some(1), ..PackageQuery::default() })
        .await
        .map_err(report)?;

    let booking_stats = match client.booking_stats().await {
        Ok(stats) => Some(stats),
        Err(e) if e.requires_login() => return Err(report(e)),
        Err(e) => {
            warn!(error = %e, "Booking statistics unavailable");
            None
        }
    };
    let stats = AdminDashboardStats::derive(&packages.pagination, booking_stats.as_ref());

    let recent = client
        .list_all_bookings(&BookingQuery::page(1, RECENT_BOOKINGS))
        .await
        .map_err(report)?;

    match output {
        OutputFormat::Table => {
            println!("\n{}\n", "Admin dashboard".bold());
            println!("{:<18} {}", "Total packages", stats.total_packages);
            println!("{:<18} {}", "Total bookings", stats.total_bookings);
            println!("{:<18} {}", "Total revenue", format_currency(stats.total_revenue).green());
            println!("{:<18} {}", "Pending bookings", stats.pending_bookings.yellow());
            println!("\n{}", "Recent bookings".bold());
            print_bookings_table(&recent.bookings);
        }
        format => output::print_output(&stats, format)?,
    }

    Ok(())
}

async fn handle_package_command(command: AdminPackageCommands, session: &Session) -> Result<()> {
    let client = session.client();
    let today = Utc::now().date_naive();

    match command {
        AdminPackageCommands::List { page, output } => {
            let query = PackageQuery { limit: Some(ADMIN_PAGE_SIZE), ..PackageQuery::listing(page) };
            let list = client.list_packages(&query).await.map_err(report)?;
            match output {
                OutputFormat::Table => {
                    print_packages_table(&list.packages);
                    output::print_pagination(&list.pagination, ADMIN_PAGE_SIZE);
                }
                format => output::print_output(&list, format)?,
            }
        }
        AdminPackageCommands::Create { file } => {
            let mut form = PackageForm::create(today);
            form.merge_json(&read_document(&file)?).map_err(report)?;

            let request = form.submit().map_err(report)?;
            let package = client.create_package(&request).await.map_err(report)?;
            println!("{} {} ({})", "Package created:".green(), package.title, package.id);
        }
        AdminPackageCommands::Update { id, file } => {
            let id = PackageId::from(id);
            let existing = client.get_package(&id).await.map_err(report)?;

            let mut form = PackageForm::edit(&existing, today);
            form.merge_json(&read_document(&file)?).map_err(report)?;

            let request = form.submit().map_err(report)?;
            let package = client.update_package(&id, &request).await.map_err(report)?;
            println!("{} {}", "Package updated:".green(), package.title);
        }
        AdminPackageCommands::Delete { id, yes } => {
            let id = PackageId::from(id);
            if !yes && !confirm(&format!("Are you sure you want to delete package '{}'?", id))? {
                println!("Aborted");
                return Ok(());
            }
            client.delete_package(&id).await.map_err(report)?;
            println!("{}", format!("Package '{}' deleted successfully", id).green());
        }
    }

    Ok(())
}

async fn handle_booking_command(command: AdminBookingCommands, session: &Session) -> Result<()> {
    let client = session.client();

    match command {
        AdminBookingCommands::List { page, status, payment_status, output } => {
            let query = BookingQuery {
                status,
                payment_status,
                ..BookingQuery::page(page, ALL_BOOKINGS_PAGE_SIZE)
            };
            let list = client.list_all_bookings(&query).await.map_err(report)?;
            match output {
                OutputFormat::Table => {
                    let summary = BookingSummary::derive(&list.bookings);
                    println!(
                        "\nThis page: {} pending, {} confirmed, {} completed, {} paid revenue",
                        summary.pending,
                        summary.confirmed,
                        summary.completed,
                        format_currency(summary.revenue)
                    );
                    print_bookings_table(&list.bookings);
                    output::print_pagination(&list.pagination, ALL_BOOKINGS_PAGE_SIZE);
                }
                format => output::print_output(&list, format)?,
            }
        }
        AdminBookingCommands::Status { id, status } => {
            let id = BookingId::from(id);
            let booking = client.get_booking(&id).await.map_err(report)?;

            let allowed = admin_actions(&booking);
            if !allowed.contains(&status) {
                let options: Vec<&str> = allowed.iter().map(BookingStatus::as_str).collect();
                anyhow::bail!(
                    "Cannot move booking {} from {} to {} (allowed: {})",
                    booking.reference(),
                    booking.status,
                    status,
                    if options.is_empty() { "none".to_string() } else { options.join(", ") }
                );
            }

            let updated = client.update_booking_status(&id, status).await.map_err(report)?;
            println!("{}", format!("Booking status updated to {}", status).green());
            print_booking_detail(&updated);
        }
    }

    Ok(())
}

/// Read a JSON or YAML document of form fields
fn read_document(path: &Path) -> Result<serde_json::Value> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse JSON or YAML from file: {}", path.display()))
}

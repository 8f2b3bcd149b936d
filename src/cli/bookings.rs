//! Customer booking commands

use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;
use owo_colors::OwoColorize;

use super::output::{self, OutputFormat};
use super::{confirm, report, signed_in};
use crate::api::{BookingQuery, CUSTOMER_CANCEL_REASON, MY_BOOKINGS_PAGE_SIZE};
use crate::domain::{Booking, BookingId, PackageId, PaymentMethod};
use crate::forms::{BookingForm, Form, TravelerForm};
use crate::session::Session;
use crate::stats::{can_cancel, CustomerStats};
use crate::utils::{format_currency, format_date, truncate_text};

#[derive(Subcommand)]
pub enum BookingCommands {
    /// List your bookings
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Show one of your bookings
    Show {
        #[arg(value_name = "ID")]
        id: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Book a package
    #[command(
        after_help = "EXAMPLES:\n    # Two travelers, paying by PayPal\n    travelbook bookings create 64f1c2 --date 2030-06-01 --people 2 \\\n        --traveler 'Ada Lovelace:36:female' --traveler 'Charles Babbage:41' \\\n        --payment-method paypal"
    )]
    Create {
        /// Package id
        #[arg(value_name = "PACKAGE_ID")]
        package: String,

        /// Travel date, YYYY-MM-DD. Defaults to the first bookable day.
        #[arg(long)]
        date: Option<String>,

        #[arg(long, default_value_t = 1)]
        people: u32,

        /// NAME:AGE[:GENDER[:PASSPORT[:NATIONALITY]]], once per traveler
        #[arg(long = "traveler", value_parser = parse_traveler)]
        travelers: Vec<TravelerForm>,

        /// Contact phone; defaults to the profile phone
        #[arg(long)]
        phone: Option<String>,

        /// Contact email; defaults to the account email
        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        emergency_name: Option<String>,

        #[arg(long)]
        emergency_phone: Option<String>,

        #[arg(long)]
        emergency_relationship: Option<String>,

        #[arg(long)]
        payment_method: Option<PaymentMethod>,

        #[arg(long)]
        special_requests: Option<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Cancel a pending or confirmed booking before travel
    Cancel {
        #[arg(value_name = "ID")]
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Your trip statistics
    Dashboard {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
}

/// Parse `NAME:AGE[:GENDER[:PASSPORT[:NATIONALITY]]]`
pub fn parse_traveler(value: &str) -> std::result::Result<TravelerForm, String> {
    let mut parts = value.splitn(5, ':').map(str::trim);
    let name = parts.next().unwrap_or_default();
    let age = parts
        .next()
        .ok_or_else(|| format!("expected NAME:AGE, got '{}'", value))?;
    Ok(TravelerForm {
        name: name.to_string(),
        age: age.to_string(),
        gender: parts.next().unwrap_or_default().to_string(),
        passport_number: parts.next().unwrap_or_default().to_string(),
        nationality: parts.next().unwrap_or_default().to_string(),
    })
}

/// Handle booking commands
pub async fn handle_booking_command(command: BookingCommands, session: &mut Session) -> Result<()> {
    signed_in(session).await?;

    match command {
        BookingCommands::List { page, output } => {
            let query = BookingQuery::page(page, MY_BOOKINGS_PAGE_SIZE);
            let list = session.client().list_my_bookings(&query).await.map_err(report)?;
            match output {
                OutputFormat::Table => {
                    print_bookings_table(&list.bookings);
                    output::print_pagination(&list.pagination, MY_BOOKINGS_PAGE_SIZE);
                }
                format => output::print_output(&list, format)?,
            }
        }
        BookingCommands::Show { id, output } => {
            let booking =
                session.client().get_booking(&BookingId::from(id)).await.map_err(report)?;
            match output {
                OutputFormat::Table => print_booking_detail(&booking),
                format => output::print_output(&booking, format)?,
            }
        }
        BookingCommands::Create {
            package,
            date,
            people,
            travelers,
            phone,
            email,
            emergency_name,
            emergency_phone,
            emergency_relationship,
            payment_method,
            special_requests,
            output,
        } => {
            let package =
                session.client().get_package(&PackageId::from(package)).await.map_err(report)?;

            let mut form =
                BookingForm::for_package(&package, session.user(), Utc::now().date_naive());
            if let Some(date) = date {
                form.travel_date = date;
            }
            form.set_number_of_people(people);
            for (slot, traveler) in form.traveler_details.iter_mut().zip(travelers) {
                *slot = traveler;
            }

            let contact = &mut form.contact_info;
            let overrides = [
                (phone, &mut contact.phone),
                (email, &mut contact.email),
                (emergency_name, &mut contact.emergency_contact.name),
                (emergency_phone, &mut contact.emergency_contact.phone),
                (emergency_relationship, &mut contact.emergency_contact.relationship),
            ];
            for (value, slot) in overrides {
                if let Some(value) = value {
                    *slot = value;
                }
            }
            if let Some(method) = payment_method {
                form.payment_method = method;
            }
            if let Some(requests) = special_requests {
                form.special_requests = requests;
            }

            let request = form.submit().map_err(report)?;
            let booking = session.client().create_booking(&request).await.map_err(report)?;

            match output {
                OutputFormat::Table => {
                    println!("{}", "Booking created successfully!".green());
                    print_booking_detail(&booking);
                }
                format => output::print_output(&booking, format)?,
            }
        }
        BookingCommands::Cancel { id, yes } => {
            let id = BookingId::from(id);
            let booking = session.client().get_booking(&id).await.map_err(report)?;
            if !can_cancel(&booking, Utc::now()) {
                anyhow::bail!(
                    "Booking {} is {} and can no longer be cancelled",
                    booking.reference(),
                    booking.status
                );
            }

            if !yes
                && !confirm(&format!(
                    "Cancel booking {} for {}?",
                    booking.reference(),
                    booking.package.title()
                ))?
            {
                println!("Aborted");
                return Ok(());
            }

            session
                .client()
                .cancel_booking(&id, CUSTOMER_CANCEL_REASON)
                .await
                .map_err(report)?;
            println!("{}", "Booking cancelled successfully".green());
        }
        BookingCommands::Dashboard { output } => {
            let query = BookingQuery::page(1, MY_BOOKINGS_PAGE_SIZE);
            let list = session.client().list_my_bookings(&query).await.map_err(report)?;
            let stats = CustomerStats::derive(&list.bookings, &list.pagination, Utc::now());
            match output {
                OutputFormat::Table => {
                    let name = session.user().map(|u| u.name.as_str()).unwrap_or("traveler");
                    println!("\nWelcome back, {}!\n", name.bold());
                    println!("{:<16} {}", "Total bookings", stats.total_bookings);
                    println!("{:<16} {}", "Upcoming trips", stats.upcoming_trips);
                    println!("{:<16} {}", "Completed trips", stats.completed_trips);
                    println!("{:<16} {}", "Total spent", format_currency(stats.total_spent));
                    if !list.bookings.is_empty() {
                        println!("\n{}", "Recent bookings".bold());
                        print_bookings_table(&list.bookings);
                    }
                }
                format => output::print_output(&stats, format)?,
            }
        }
    }

    Ok(())
}

pub(crate) fn print_bookings_table(bookings: &[Booking]) {
    if bookings.is_empty() {
        println!("No bookings found");
        return;
    }

    output::print_table_header(&[
        ("ID", 26),
        ("Reference", 20),
        ("Package", 28),
        ("Travel date", 18),
        ("People", 6),
        ("Total", 10),
        ("Status", 10),
        ("Payment", 8),
    ]);

    for booking in bookings {
        println!(
            "{:<26} {:<20} {:<28} {:<18} {:<6} {:<10} {} {}",
            truncate_text(booking.id.as_str(), 26),
            truncate_text(booking.reference(), 20),
            truncate_text(booking.package.title(), 28),
            format_date(booking.travel_date.date_naive()),
            booking.number_of_people,
            format_currency(booking.total_amount),
            output::booking_status_cell(booking.status, 10),
            output::payment_status_cell(booking.payment_status, 8),
        );
    }
    println!();
}

pub(crate) fn print_booking_detail(booking: &Booking) {
    println!();
    println!("{:<16} {}", "Reference", booking.reference().bold());
    println!("{:<16} {}", "Package", booking.package.title());
    println!("{:<16} {}", "Travel date", format_date(booking.travel_date.date_naive()));
    println!("{:<16} {}", "Travelers", booking.number_of_people);
    println!("{:<16} {}", "Total", format_currency(booking.total_amount));
    println!("{:<16} {}", "Status", output::booking_status_cell(booking.status, 0));
    println!("{:<16} {}", "Payment", output::payment_status_cell(booking.payment_status, 0));
    println!("{:<16} {}", "Method", booking.payment_method);
    println!(
        "{:<16} {} / {}",
        "Contact", booking.contact_info.email, booking.contact_info.phone
    );
    if let Some(reason) = &booking.cancellation_reason {
        println!("{:<16} {}", "Cancelled", reason);
    }
    if !booking.traveler_details.is_empty() {
        println!("\n{}", "Travelers".bold());
        for (index, traveler) in booking.traveler_details.iter().enumerate() {
            println!("  {}. {} ({})", index + 1, traveler.name, traveler.age);
        }
    }
    if let Some(requests) = booking.special_requests.as_deref().filter(|r| !r.is_empty()) {
        println!("\nSpecial requests: {}", requests);
    }
    println!();
}

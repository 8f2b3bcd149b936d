//! Package browsing commands

use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;
use owo_colors::OwoColorize;

use super::output::{self, OutputFormat};
use super::report;
use crate::api::{PackageQuery, SortOrder, PACKAGES_PAGE_SIZE};
use crate::domain::{Category, Difficulty, Package, PackageId};
use crate::session::Session;
use crate::utils::{format_currency, format_date, format_rating, truncate_text};

#[derive(Subcommand)]
pub enum PackageCommands {
    /// List packages, newest first
    #[command(
        after_help = "EXAMPLES:\n    # Second page of beach packages under $2,000\n    travelbook packages list --page 2 --category beach --max-price 2000"
    )]
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long)]
        category: Option<Category>,

        #[arg(long)]
        destination: Option<String>,

        #[arg(long)]
        difficulty: Option<Difficulty>,

        #[arg(long)]
        min_price: Option<f64>,

        #[arg(long)]
        max_price: Option<f64>,

        /// Minimum length in days
        #[arg(long)]
        min_duration: Option<u32>,

        #[arg(long)]
        max_duration: Option<u32>,

        #[arg(long, default_value = "createdAt")]
        sort_by: String,

        #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
        sort_order: SortOrder,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Show one package with its itinerary
    Show {
        #[arg(value_name = "ID")]
        id: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Free-text search over titles, destinations and descriptions
    Search {
        term: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
}

/// Handle package commands
pub async fn handle_package_command(command: PackageCommands, session: &mut Session) -> Result<()> {
    let client = session.client();
    match command {
        PackageCommands::List {
            page,
            category,
            destination,
            difficulty,
            min_price,
            max_price,
            min_duration,
            max_duration,
            sort_by,
            sort_order,
            output,
        } => {
            let query = PackageQuery {
                category,
                difficulty,
                min_price,
                max_price,
                min_duration,
                max_duration,
                sort_by: Some(sort_by),
                sort_order: Some(sort_order),
                ..PackageQuery::listing(page)
            }
            .with_destination(destination);

            let list = client.list_packages(&query).await.map_err(report)?;
            match output {
                OutputFormat::Table => {
                    print_packages_table(&list.packages);
                    output::print_pagination(&list.pagination, PACKAGES_PAGE_SIZE);
                }
                format => output::print_output(&list, format)?,
            }
        }
        PackageCommands::Show { id, output } => {
            let package = client.get_package(&PackageId::from(id)).await.map_err(report)?;
            match output {
                OutputFormat::Table => print_package_detail(&package),
                format => output::print_output(&package, format)?,
            }
        }
        PackageCommands::Search { term, output } => {
            if term.trim().is_empty() {
                anyhow::bail!("Search term must not be empty");
            }
            let packages = client.search_packages(&term).await.map_err(report)?;
            match output {
                OutputFormat::Table => print_packages_table(&packages),
                format => output::print_output(&packages, format)?,
            }
        }
    }

    Ok(())
}

pub(crate) fn print_packages_table(packages: &[Package]) {
    if packages.is_empty() {
        println!("No packages found");
        return;
    }

    output::print_table_header(&[
        ("ID", 26),
        ("Title", 32),
        ("Destination", 20),
        ("Days", 5),
        ("Price", 10),
        ("Rating", 8),
        ("Slots", 6),
    ]);

    for package in packages {
        let slots = if package.is_sold_out() {
            format!("{:<6}", "full").red().to_string()
        } else {
            format!("{:<6}", package.availability.available_slots)
        };
        println!(
            "{:<26} {:<32} {:<20} {:<5} {:<10} {:<8} {}",
            truncate_text(package.id.as_str(), 26),
            truncate_text(&package.title, 32),
            truncate_text(&package.destination, 20),
            package.duration,
            format_currency(package.price),
            format!("{:.1}", package.rating.average),
            slots
        );
    }
    println!();
}

fn print_list(label: &str, items: &[String]) {
    let items: Vec<&String> = items.iter().filter(|item| !item.trim().is_empty()).collect();
    if items.is_empty() {
        return;
    }
    println!("\n{}", label.bold());
    for item in items {
        println!("  - {}", item);
    }
}

fn print_package_detail(package: &Package) {
    println!();
    println!("{}", package.title.bold());
    println!("{}", package.destination);
    println!();
    println!(
        "{:<14} {} per person",
        "Price",
        format_currency(package.price).green()
    );
    println!("{:<14} {} days", "Duration", package.duration);
    println!("{:<14} {} / {}", "Type", package.category, package.difficulty);
    println!("{:<14} up to {} people", "Group size", package.max_group_size);
    println!(
        "{:<14} {} to {}",
        "Available",
        format_date(package.availability.start_date.date_naive()),
        format_date(package.availability.end_date.date_naive())
    );
    println!("{:<14} {}", "Slots left", package.availability.available_slots);
    println!(
        "{:<14} {}",
        "Rating",
        format_rating(package.rating.average, Some(package.rating.count))
    );

    if !package.description.is_empty() {
        println!("\n{}", package.description);
    }

    print_list("Highlights", &package.highlights);
    print_list("Included", &package.inclusions);
    print_list("Not included", &package.exclusions);

    if !package.itinerary.is_empty() {
        println!("\n{}", "Itinerary".bold());
        for day in &package.itinerary {
            let meals: Vec<&str> = [
                (day.meals.breakfast, "breakfast"),
                (day.meals.lunch, "lunch"),
                (day.meals.dinner, "dinner"),
            ]
            .into_iter()
            .filter_map(|(included, name)| included.then_some(name))
            .collect();
            println!("  Day {}: {}", day.day, day.title);
            if !day.description.is_empty() {
                println!("    {}", day.description);
            }
            if !meals.is_empty() {
                println!("    Meals: {}", meals.join(", "));
            }
        }
    }

    if package.availability.contains(Utc::now()) && !package.is_sold_out() {
        println!(
            "\nBook it with: travelbook bookings create {} --people <n>",
            package.id
        );
    }
    println!();
}

use chrono::{Local, NaiveDate, Utc};
use clap::{Args, Subcommand};
use lacto_core::format::{
    format_date, format_date_time, format_number, format_percent, format_quantity,
};
use lacto_core::ledger::{Breakpoint, FermentRow};
use lacto_core::reminder::{reminder_for, upcoming_reminders};
use lacto_core::salt::{spoon_measure, DEFAULT_BRINE};
use lacto_core::share::share_summary;
use lacto_core::time::DateRangePreset;
use lacto_core::{
    Column, ColumnVisibility, FermentDraft, FermentEntry, FermentLedger, FileStore, PageSize,
    SortKey, SortingState, Unit,
};
use serde::Serialize;
use std::collections::BTreeMap;

use super::{confirm, resolve_dates, OutputFormat};
use crate::config::{parse_status_filter, Config};

/// Longest notes excerpt shown in a table cell.
const NOTES_CELL_LEN: usize = 30;

#[derive(Args)]
pub struct FermentCommand {
    #[command(subcommand)]
    pub command: FermentSubcommand,
}

#[derive(Subcommand)]
pub enum FermentSubcommand {
    /// Log a new ferment
    Add {
        /// Combined weight of food and water
        #[arg(long, short)]
        weight: f64,

        /// Unit the weight is measured in
        #[arg(long, short, default_value = "grams")]
        unit: Unit,

        /// Brine strength in percent
        #[arg(long, short, default_value_t = DEFAULT_BRINE.percentage)]
        brine: f64,

        /// Name; a random one like K417 is picked when omitted
        #[arg(long, short)]
        name: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// Add a tag (can be repeated)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "preset")]
        end: Option<String>,

        /// Date range preset (one-week, two-weeks, one-month)
        #[arg(long)]
        preset: Option<DateRangePreset>,

        /// Remind me when the ferment is done
        #[arg(long)]
        notify: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List ferments
    List {
        /// Search text matched against every field
        #[arg(long, short)]
        search: Option<String>,

        /// Status to show (planned, active, complete or all)
        #[arg(long)]
        status: Option<String>,

        /// Sort by COLUMN[:asc|desc] (can be repeated)
        #[arg(long = "sort", value_name = "COLUMN")]
        sort: Vec<SortKey>,

        /// Page number, starting at 1
        #[arg(long, short, default_value_t = 1)]
        page: usize,

        /// Rows per page (10, 20, 30, 40 or 50)
        #[arg(long)]
        page_size: Option<PageSize>,

        /// Layout width; narrower layouts show fewer columns
        #[arg(long, default_value_t = 1600)]
        width: u32,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show one ferment
    Show {
        /// Ferment ID or a unique prefix of it
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a ferment
    Delete {
        /// Ferment ID or a unique prefix of it
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Print a shareable summary of a ferment
    Share {
        /// Ferment ID or a unique prefix of it
        id: String,

        /// Link appended to the attribution line
        #[arg(long)]
        url: Option<String>,
    },

    /// List completion reminders that are still due
    Reminders {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Serialize)]
struct ListOutput<'a> {
    ferments: Vec<&'a FermentEntry>,
    total_rows: usize,
    filtered_rows: usize,
    page: usize,
    page_count: usize,
    columns: BTreeMap<&'static str, bool>,
}

impl FermentCommand {
    pub fn run(
        &self,
        ledger: &mut FermentLedger<FileStore>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let today = Local::now().date_naive();

        match &self.command {
            FermentSubcommand::Add {
                weight,
                unit,
                brine,
                name,
                notes,
                tags,
                start,
                end,
                preset,
                notify,
                format,
            } => {
                let dates = resolve_dates(start.as_deref(), end.as_deref(), *preset)?;
                if *notify && dates.is_none() {
                    return Err("--notify needs a start and end date".into());
                }

                let (date_start, date_end) = dates.unzip();
                let draft = FermentDraft {
                    ferment_name: name.clone(),
                    notes: notes.clone(),
                    tags: tags.clone(),
                    date_start,
                    date_end,
                    send_notification: *notify,
                    ..FermentDraft::new(*weight, unit.clone(), *brine)
                };

                let mut rng = rand::rng();
                let created = ledger.create(draft, today, Utc::now(), &mut rng)?;

                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(created)?),
                    OutputFormat::Text => {
                        println!("Logged ferment '{}':", created.display_name());
                        println!();
                        print_entry_details(created, today);
                    }
                }
                Ok(())
            }

            FermentSubcommand::List {
                search,
                status,
                sort,
                page,
                page_size,
                width,
                format,
            } => {
                let mut query = ledger.default_query();
                if let Some(search) = search {
                    query.filter.query = search.clone();
                }
                if let Some(status) = status {
                    query.filter.status = parse_status_filter(status)?;
                }
                if !sort.is_empty() {
                    query.sorting = sort.iter().copied().collect::<SortingState>();
                }
                if let Some(size) = page_size {
                    query.pagination.set_page_size(*size);
                }
                query.pagination.page_index = page.saturating_sub(1);

                let result = ledger.query(&query, today);
                let visibility = ColumnVisibility::for_width(*width);

                match format {
                    OutputFormat::Json => {
                        let output = ListOutput {
                            ferments: result.rows.iter().map(|r| r.entry).collect(),
                            total_rows: result.total_rows,
                            filtered_rows: result.filtered_rows,
                            page: result.page_index + 1,
                            page_count: result.page_count,
                            columns: visibility.to_map(),
                        };
                        println!("{}", serde_json::to_string_pretty(&output)?);
                    }
                    OutputFormat::Text => {
                        if result.filtered_rows == 0 {
                            println!("No ferments found.");
                            return Ok(());
                        }
                        if result.is_empty() {
                            println!(
                                "Page {} is past the end; there are {} page(s).",
                                result.page_index + 1,
                                result.page_count
                            );
                            return Ok(());
                        }

                        if Breakpoint::for_width(*width) == Breakpoint::Narrow {
                            print_narrow(&result.rows, today);
                        } else {
                            print_table(&result.rows, &visibility, today);
                        }

                        println!();
                        println!(
                            "Showing {} of {} rows",
                            result.rows.len(),
                            result.filtered_rows
                        );
                        println!("Page {} of {}", result.page_index + 1, result.page_count);
                    }
                }
                Ok(())
            }

            FermentSubcommand::Show { id, format } => {
                let entry = find_entry(ledger.entries(), id)?;
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(entry)?),
                    OutputFormat::Text => print_entry_details(entry, today),
                }
                Ok(())
            }

            FermentSubcommand::Delete { id, force } => {
                let entry = find_entry(ledger.entries(), id)?;
                let id = entry.id.clone();
                let name = entry.display_name().to_string();

                if !*force && !confirm(&format!("Delete ferment '{}'?", name))? {
                    println!("Cancelled.");
                    return Ok(());
                }

                if ledger.delete(&id)? {
                    println!("Deleted ferment: {}", name);
                }
                Ok(())
            }

            FermentSubcommand::Share { id, url } => {
                let entry = find_entry(ledger.entries(), id)?;
                let site_url = url.as_deref().or(config.share_url.as_deref());
                let summary = share_summary(entry, site_url);
                println!("{}", summary.title);
                println!();
                print!("{}", summary.text);
                Ok(())
            }

            FermentSubcommand::Reminders { format } => {
                let reminders = upcoming_reminders(ledger.entries(), Local::now().naive_local());
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&reminders)?)
                    }
                    OutputFormat::Text => {
                        if reminders.is_empty() {
                            println!("No reminders scheduled.");
                            return Ok(());
                        }
                        for reminder in &reminders {
                            println!("{}  {}", format_date_time(reminder.fire_at), reminder.title);
                            println!("  {}", reminder.body);
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

/// Finds an entry by exact id, or by a prefix that matches exactly one.
fn find_entry<'a>(entries: &'a [FermentEntry], id: &str) -> Result<&'a FermentEntry, String> {
    if let Some(entry) = entries.iter().find(|e| e.id == id) {
        return Ok(entry);
    }
    if id.is_empty() {
        return Err("Ferment ID cannot be empty".to_string());
    }

    let mut matches = entries.iter().filter(|e| e.id.starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(entry), None) => Ok(entry),
        (Some(_), Some(_)) => Err(format!("Ferment ID '{}' is ambiguous", id)),
        (None, _) => Err(format!("Ferment not found: {}", id)),
    }
}

fn print_entry_details(entry: &FermentEntry, today: NaiveDate) {
    println!("{}", entry);
    if let Some(remaining) = entry.remaining(today) {
        println!("  Remaining: {}", remaining);
    }
    if let Some(spoons) = spoon_measure(entry.salt_required, &entry.unit) {
        println!(
            "  About {} tsp or {} tbsp of salt",
            format_number(spoons.teaspoons, 1),
            format_number(spoons.tablespoons, 1)
        );
    }
    if let Some(reminder) = reminder_for(entry) {
        println!("  Reminder: {}", format_date_time(reminder.fire_at));
    }
    println!();
    println!("Ferment ID: {}", entry.id);
}

fn print_narrow(rows: &[FermentRow<'_>], today: NaiveDate) {
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            println!("{}", "-".repeat(40));
        }
        let summary = row.summary(today);
        let status = summary.status.map(|s| s.as_str()).unwrap_or("-");
        println!(
            "{} [{}]",
            summary.name.as_deref().unwrap_or(row.entry.display_name()),
            status
        );
        if let Some(dates) = &summary.dates {
            println!("  {}", dates);
        }
        if let Some(remaining) = &summary.remaining {
            println!("  {} left", remaining);
        }
        println!(
            "  {} brine, {} weight, {} salt",
            summary.brine, summary.weight, summary.salt
        );
        if let Some(notes) = &summary.notes {
            println!("  {}", notes);
        }
        if !summary.tags.is_empty() {
            println!("  #{}", summary.tags.join(" #"));
        }
        println!("  {}", short_id(&row.entry.id));
    }
}

fn print_table(rows: &[FermentRow<'_>], visibility: &ColumnVisibility, today: NaiveDate) {
    let columns: Vec<Column> = visibility
        .visible()
        .filter(|c| *c != Column::NarrowView)
        .collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|c| cell(*c, row, today)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(header(*c).len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let headers: Vec<&str> = columns.iter().map(|c| header(*c)).collect();
    print_row(&headers, &widths);
    let rule = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    println!("{}", "-".repeat(rule));
    for row in &cells {
        let values: Vec<&str> = row.iter().map(String::as_str).collect();
        print_row(&values, &widths);
    }
}

fn print_row(values: &[&str], widths: &[usize]) {
    let padded: Vec<String> = values
        .iter()
        .zip(widths)
        .map(|(v, w)| format!("{:<width$}", v, width = w))
        .collect();
    println!("{}", padded.join("  ").trim_end());
}

/// The actions column carries the id the other subcommands take.
fn header(column: Column) -> &'static str {
    match column {
        Column::Actions => "ID",
        _ => column.header(),
    }
}

fn cell(column: Column, row: &FermentRow<'_>, today: NaiveDate) -> String {
    let entry = row.entry;
    match column {
        Column::NarrowView => String::new(),
        Column::Status => row.status.map(|s| s.as_str()).unwrap_or("").to_string(),
        Column::DateCreated => entry
            .date_created
            .map(|at| format_date_time(at.with_timezone(&Local).naive_local()))
            .unwrap_or_default(),
        Column::FermentName => entry.display_name().to_string(),
        Column::BrinePercentage => format_percent(entry.brine_percentage),
        Column::Weight => format_quantity(entry.weight, &entry.unit),
        Column::SaltRequired => format_quantity(entry.salt_required, &entry.unit),
        Column::DateStart => entry.date_start.map(format_date).unwrap_or_default(),
        Column::DateEnd => entry.date_end.map(format_date).unwrap_or_default(),
        Column::TotalDuration => entry.duration().unwrap_or_default(),
        Column::RemainingDuration => entry.remaining(today).unwrap_or_default(),
        Column::Notes => entry.notes.as_deref().map(excerpt).unwrap_or_default(),
        Column::Tags => entry.tags.iter().collect::<Vec<_>>().join(", "),
        Column::Actions => short_id(&entry.id).to_string(),
    }
}

fn excerpt(notes: &str) -> String {
    if notes.chars().count() <= NOTES_CELL_LEN {
        return notes.to_string();
    }
    let cut: String = notes.chars().take(NOTES_CELL_LEN - 3).collect();
    format!("{}...", cut.trim_end())
}

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

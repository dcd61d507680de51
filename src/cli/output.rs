//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::auth::User;
use crate::cli::OutputFormat;
use crate::fleet::{
    CngExpense, Complaint, DriverDashboard, DriverSummary, OdLog, PaymentLedger, ReportRow,
    ReportType, Trip,
};
use crate::format::{format_currency, format_date_str};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Spinner shown while a request is in flight
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print as JSON or YAML; returns false when the caller should draw a table
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<bool> {
    match format {
        OutputFormat::Table => Ok(false),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(true)
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(value)?);
            Ok(true)
        }
    }
}

/// Color a record status the way the app's badges do
pub fn format_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "approved" | "resolved" | "active" | "completed" => status.green().to_string(),
        "rejected" | "inactive" => status.red().to_string(),
        "pending" | "in progress" => status.yellow().to_string(),
        _ => status.to_string(),
    }
}

fn status_color(status: &str) -> Color {
    match status.to_lowercase().as_str() {
        "approved" | "resolved" | "active" | "completed" => Color::Green,
        "rejected" | "inactive" => Color::Red,
        _ => Color::Yellow,
    }
}

fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    table
}

fn money(amount: Option<f64>) -> String {
    amount.map(format_currency).unwrap_or_else(|| "-".to_string())
}

fn date(value: Option<&str>) -> String {
    value.map(format_date_str).unwrap_or_else(|| "-".to_string())
}

fn text(value: Option<&str>) -> &str {
    value.filter(|s| !s.is_empty()).unwrap_or("-")
}

fn status_cell(status: Option<&str>) -> Cell {
    let status = status.unwrap_or("pending");
    Cell::new(status).fg(status_color(status))
}

/// Render a loosely typed cell from the endpoint
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn print_user(user: &User) {
    println!("{}", "Signed in".bold().underline());
    println!();
    println!("  {} {}", "Name:".bold(), user.name);
    println!("  {} {}", "Role:".bold(), user.role.to_string().cyan());
    if let Some(email) = &user.email {
        println!("  {} {}", "Email:".bold(), email);
    }
}

pub fn print_trip_table(trips: &[Trip]) {
    if trips.is_empty() {
        info("No trips yet. Add one with 'fleetdesk trips add'");
        return;
    }

    let mut t = table(&["Date", "Amount", "KM", "Payment", "Status"]);
    for trip in trips {
        t.add_row(vec![
            Cell::new(date(trip.date.as_deref())),
            Cell::new(money(trip.amount)),
            Cell::new(trip.km.map(|k| format!("{} km", k)).unwrap_or_else(|| "-".into())),
            Cell::new(text(trip.payment_type.as_deref())),
            status_cell(trip.status.as_deref()),
        ]);
    }
    println!("{t}");
}

pub fn print_expense_table(expenses: &[CngExpense]) {
    if expenses.is_empty() {
        info("No CNG expenses recorded");
        return;
    }

    let mut t = table(&["Date", "Amount", "Paid By", "Receipt", "Status"]);
    for expense in expenses {
        t.add_row(vec![
            Cell::new(date(expense.date.as_deref())),
            Cell::new(money(expense.amount)),
            Cell::new(text(expense.paid_by.as_deref())),
            Cell::new(text(expense.receipt.as_deref())),
            status_cell(expense.status.as_deref()),
        ]);
    }
    println!("{t}");
}

pub fn print_complaint_table(complaints: &[Complaint]) {
    if complaints.is_empty() {
        info("No complaints filed");
        return;
    }

    let mut t = table(&["Date", "Against", "Type", "Description", "Status"]);
    for complaint in complaints {
        t.add_row(vec![
            Cell::new(date(complaint.date.as_deref())),
            Cell::new(text(complaint.against.as_deref())),
            Cell::new(text(complaint.kind.as_deref())),
            Cell::new(text(complaint.description.as_deref())),
            status_cell(complaint.status.as_deref()),
        ]);
    }
    println!("{t}");
}

pub fn print_payment_ledger(ledger: &PaymentLedger) {
    if let Some(balance) = ledger.balance {
        println!("  {} {}", "Advance balance:".bold(), format_currency(balance));
        println!();
    }
    if ledger.payments.is_empty() {
        info("No payments recorded");
        return;
    }

    let mut t = table(&["Date", "Type", "Amount", "Description", "Status"]);
    for payment in &ledger.payments {
        t.add_row(vec![
            Cell::new(date(payment.date.as_deref())),
            Cell::new(text(payment.kind.as_deref()).replace('_', " ")),
            Cell::new(money(payment.amount)),
            Cell::new(text(payment.description.as_deref())),
            status_cell(payment.status.as_deref()),
        ]);
    }
    println!("{t}");
}

pub fn print_od_log(log: Option<&OdLog>) {
    let Some(log) = log else {
        info("No OD readings recorded for this day");
        return;
    };
    println!("{}", "OD Log".bold().underline());
    println!();
    let reading = |r: Option<u64>| r.map(|r| r.to_string()).unwrap_or_else(|| "-".into());
    println!("  {} {}", "Start OD:".bold(), reading(log.start_od));
    println!("  {} {}", "End OD:".bold(), reading(log.end_od));
    if let Some(distance) = log.distance() {
        println!("  {} {} km", "Distance:".bold(), distance);
    }
}

pub fn print_driver_dashboard(dashboard: &DriverDashboard) {
    let stats = &dashboard.stats;
    println!("{}", "Dashboard".bold().underline());
    println!();
    println!("  {} {}", "Total earnings:".bold(), money(stats.total_earnings));
    println!("  {} {}", "Total expenses:".bold(), money(stats.total_expenses));
    println!("  {} {}", "Cash collected:".bold(), money(stats.cash_collected));
    println!("  {} {}", "Online payments:".bold(), money(stats.online_payments));
    let km = |v: Option<f64>| v.map(|k| format!("{} km", k)).unwrap_or_else(|| "-".into());
    println!("  {} {}", "Total driven:".bold(), km(stats.total_driven));
    println!("  {} {}", "In trip:".bold(), km(stats.in_trip_km));
    println!("  {} {}", "Burning:".bold(), km(stats.burning_km));
}

/// Admin stats come back as an open map
pub fn print_stat_map(title: &str, stats: &Map<String, Value>) {
    println!("{}", title.bold().underline());
    println!();
    for (key, value) in stats {
        println!("  {} {}", format!("{}:", key).bold(), cell_text(Some(value)));
    }
}

pub fn print_driver_table(drivers: &[DriverSummary]) {
    if drivers.is_empty() {
        info("No drivers found");
        return;
    }

    let mut t = table(&["ID", "Name", "Email", "Trips", "Earnings", "Last Active", "Status"]);
    for driver in drivers {
        t.add_row(vec![
            Cell::new(cell_text(driver.id.as_ref())),
            Cell::new(text(driver.name.as_deref())),
            Cell::new(text(driver.email.as_deref())),
            Cell::new(driver.total_trips.map(|n| n.to_string()).unwrap_or_else(|| "-".into())),
            Cell::new(money(driver.total_earnings)),
            Cell::new(date(driver.last_active.as_deref())),
            status_cell(driver.status.as_deref()),
        ]);
    }
    println!("{t}");
}

/// Print rows whose columns come from the first row
pub fn print_rows(rows: &[Map<String, Value>]) {
    let Some(first) = rows.first() else {
        info("No data");
        return;
    };
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let mut t = table(&headers);
    for row in rows {
        t.add_row(
            headers
                .iter()
                .map(|h| Cell::new(cell_text(row.get(*h))))
                .collect::<Vec<_>>(),
        );
    }
    println!("{t}");
}

pub fn print_report(report_type: ReportType, rows: &[ReportRow]) {
    if rows.is_empty() {
        info("No data for the selected filters");
        return;
    }

    let columns = report_type.columns();
    let mut t = table(&columns.iter().map(|(_, h)| *h).collect::<Vec<_>>());
    for row in rows {
        t.add_row(
            columns
                .iter()
                .map(|(key, _)| match row.get(*key) {
                    Some(Value::String(s)) if *key == "date" => Cell::new(format_date_str(s)),
                    value => Cell::new(cell_text(value)),
                })
                .collect::<Vec<_>>(),
        );
    }
    println!("{t}");
}

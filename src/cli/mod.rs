//! CLI interface for Fleetdesk

pub mod commands;
mod output;

pub use output::*;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::fleet::{PaymentKind, PaymentType, ReportType, TimeFrame};

#[derive(Parser)]
#[command(name = "fleetdesk")]
#[command(author = "Krakaw")]
#[command(version = "0.3.0")]
#[command(about = "Driver and fleet management from the terminal", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Path to fleetdesk.toml (searched upward from the current directory by default)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the endpoint URL from the config file
    #[arg(long, global = true, env = "FLEETDESK_API_URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new fleetdesk.toml configuration file
    Init,

    /// Sign in and store the session token
    Login {
        /// Username (prompted when omitted)
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Create a new driver account
    Register {
        #[arg(long)]
        name: String,

        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        phone: Option<String>,
    },

    /// Sign out and forget the stored token
    Logout,

    /// Show the signed-in user
    Whoami {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Resolve a page path the way the app's router would
    Open {
        /// Page path, e.g. /driver/trips
        path: String,
    },

    /// Trip entries
    Trips {
        #[command(subcommand)]
        action: TripsAction,
    },

    /// CNG expenses
    Expenses {
        #[command(subcommand)]
        action: ExpensesAction,
    },

    /// Complaints
    Complaints {
        #[command(subcommand)]
        action: ComplaintsAction,
    },

    /// Advance payments
    Payments {
        #[command(subcommand)]
        action: PaymentsAction,
    },

    /// Odometer log
    Od {
        #[command(subcommand)]
        action: OdAction,
    },

    /// Dashboard figures for the signed-in user
    Dashboard {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Driver management (admin)
    Drivers {
        #[command(subcommand)]
        action: DriversAction,
    },

    /// Generate or export a report (admin)
    Report {
        #[arg(short = 't', long = "type", value_enum)]
        report_type: ReportType,

        #[arg(long, value_enum, default_value = "daily")]
        time_frame: TimeFrame,

        /// Driver id, or `all`
        #[arg(short, long, default_value = "all")]
        driver: String,

        /// Start date for custom ranges (YYYY-MM-DD)
        #[arg(long)]
        start: Option<chrono::NaiveDate>,

        /// End date for custom ranges (YYYY-MM-DD)
        #[arg(long)]
        end: Option<chrono::NaiveDate>,

        /// Write the spreadsheet export instead of printing rows
        #[arg(long)]
        export: Option<Option<PathBuf>>,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum TripsAction {
    List {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
    Add {
        /// Fare in rupees
        #[arg(short, long)]
        amount: f64,

        /// Distance in km
        #[arg(short, long)]
        km: f64,

        #[arg(short, long, value_enum, default_value = "cash")]
        payment: PaymentType,

        #[arg(long)]
        toll: Option<f64>,

        #[arg(long)]
        cash_collected: Option<f64>,
    },
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    List {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
    Add {
        #[arg(short, long)]
        amount: f64,

        #[arg(short, long, value_enum, default_value = "cash")]
        paid_by: PaymentType,

        /// Receipt image (JPEG or PNG)
        #[arg(short, long)]
        receipt: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum ComplaintsAction {
    List {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
    Add {
        /// Who the complaint is about
        #[arg(short, long)]
        against: String,

        /// Complaint category
        #[arg(short = 't', long = "type")]
        kind: String,

        #[arg(short, long)]
        description: String,

        /// Supporting image
        #[arg(short, long)]
        image: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum PaymentsAction {
    List {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
    Add {
        #[arg(short, long)]
        amount: f64,

        #[arg(short = 't', long = "type", value_enum)]
        kind: PaymentKind,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Payment proof image
        #[arg(short, long)]
        image: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum OdAction {
    /// Show the OD log for a day (today by default)
    Show {
        #[arg(short, long)]
        date: Option<chrono::NaiveDate>,
    },
    /// Record the start-of-day reading
    Start {
        reading: u64,

        /// Odometer photo
        #[arg(short, long)]
        image: PathBuf,
    },
    /// Record the end-of-day reading
    End {
        reading: u64,

        /// Odometer photo
        #[arg(short, long)]
        image: PathBuf,
    },
    /// Check whether today's start reading has been submitted
    Check,
}

#[derive(Subcommand)]
pub enum DriversAction {
    List {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
    Show {
        id: String,
    },
    Performance {
        id: String,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_trip_add() {
        let cli = Cli::try_parse_from([
            "fleetdesk", "trips", "add", "--amount", "250", "--km", "12", "--payment", "online",
        ])
        .unwrap();
        match cli.command {
            Commands::Trips {
                action: TripsAction::Add { amount, km, payment, .. },
            } => {
                assert_eq!(amount, 250.0);
                assert_eq!(km, 12.0);
                assert_eq!(payment, PaymentType::Online);
            }
            _ => panic!("expected trips add"),
        }
    }

    #[test]
    fn test_parse_report_export_without_path() {
        let cli = Cli::try_parse_from([
            "fleetdesk", "report", "--type", "earnings", "--time-frame", "weekly", "--export",
        ])
        .unwrap();
        match cli.command {
            Commands::Report { export, time_frame, .. } => {
                assert_eq!(export, Some(None));
                assert_eq!(time_frame, TimeFrame::Weekly);
            }
            _ => panic!("expected report"),
        }
    }
}

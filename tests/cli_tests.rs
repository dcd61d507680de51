//! CLI interface tests
//!
//! Run with: cargo test --test cli_tests

use clap::Parser;
use fleetdesk::cli::{Cli, Commands, DriversAction, OdAction, OutputFormat, PaymentsAction};
use fleetdesk::config::loader::{default_config_content, parse_config};
use fleetdesk::fleet::{PaymentKind, ReportType};

#[test]
fn test_example_config_is_valid_toml() {
    let content = include_str!("../fleetdesk.toml.example");
    match toml::from_str::<toml::Value>(content) {
        Ok(table) => {
            assert!(table.is_table());
            println!("✓ Example config is valid TOML");
        }
        Err(e) => panic!("Example config parsing failed: {}", e),
    }
}

#[test]
fn test_example_config_required_sections() {
    let config: toml::Value =
        toml::from_str(include_str!("../fleetdesk.toml.example")).expect("Failed to parse");
    for section in ["api", "session", "upload", "validation"] {
        assert!(
            config.get(section).is_some(),
            "Section '{}' should exist in config",
            section
        );
    }
    println!("✓ Example config has all required sections");
}

#[test]
fn test_example_config_matches_init_template() {
    let example = parse_config(include_str!("../fleetdesk.toml.example")).unwrap();
    let template = parse_config(default_config_content()).unwrap();
    assert_eq!(example.api.timeout_ms, template.api.timeout_ms);
    assert_eq!(example.upload.max_size, template.upload.max_size);
    assert_eq!(
        example.validation.password.min_length,
        template.validation.password.min_length
    );
    println!("✓ `init` writes the same settings as the example file");
}

#[test]
fn test_global_options_after_subcommand() {
    let cli = Cli::try_parse_from([
        "fleetdesk",
        "whoami",
        "--api-url",
        "http://127.0.0.1:9/exec",
        "--format",
        "json",
    ])
    .unwrap();
    assert_eq!(cli.global.api_url.as_deref(), Some("http://127.0.0.1:9/exec"));
    assert!(matches!(
        cli.command,
        Commands::Whoami {
            format: OutputFormat::Json
        }
    ));
    println!("✓ Global --api-url accepted after the subcommand");
}

#[test]
fn test_login_username_is_optional() {
    let cli = Cli::try_parse_from(["fleetdesk", "login"]).unwrap();
    assert!(matches!(cli.command, Commands::Login { username: None }));

    let cli = Cli::try_parse_from(["fleetdesk", "login", "-u", "ravi"]).unwrap();
    match cli.command {
        Commands::Login { username } => assert_eq!(username.as_deref(), Some("ravi")),
        _ => panic!("expected login"),
    }
    println!("✓ Login prompts when no username is given");
}

#[test]
fn test_register_requires_identity_fields() {
    assert!(Cli::try_parse_from(["fleetdesk", "register", "--name", "Ravi"]).is_err());
    let cli = Cli::try_parse_from([
        "fleetdesk",
        "register",
        "--name",
        "Ravi Kumar",
        "--username",
        "ravi",
        "--email",
        "ravi@example.com",
    ])
    .unwrap();
    assert!(matches!(cli.command, Commands::Register { phone: None, .. }));
    println!("✓ Register requires name, username and email");
}

#[test]
fn test_od_subcommands() {
    let cli = Cli::try_parse_from(["fleetdesk", "od", "start", "12000", "--image", "od.jpg"]).unwrap();
    match cli.command {
        Commands::Od {
            action: OdAction::Start { reading, image },
        } => {
            assert_eq!(reading, 12000);
            assert_eq!(image.to_str(), Some("od.jpg"));
        }
        _ => panic!("expected od start"),
    }

    let cli = Cli::try_parse_from(["fleetdesk", "od", "show", "--date", "2024-03-05"]).unwrap();
    match cli.command {
        Commands::Od {
            action: OdAction::Show { date },
        } => assert_eq!(date.map(|d| d.to_string()).as_deref(), Some("2024-03-05")),
        _ => panic!("expected od show"),
    }

    // The photo is mandatory for a reading
    assert!(Cli::try_parse_from(["fleetdesk", "od", "end", "12100"]).is_err());
    println!("✓ OD subcommands parse");
}

#[test]
fn test_payment_kind_values() {
    let cli = Cli::try_parse_from([
        "fleetdesk", "payments", "add", "--amount", "500", "--type", "advance-received",
    ])
    .unwrap();
    match cli.command {
        Commands::Payments {
            action: PaymentsAction::Add { kind, amount, .. },
        } => {
            assert_eq!(kind, PaymentKind::AdvanceReceived);
            assert_eq!(amount, 500.0);
        }
        _ => panic!("expected payments add"),
    }
    assert!(Cli::try_parse_from([
        "fleetdesk", "payments", "add", "--amount", "500", "--type", "bonus",
    ])
    .is_err());
}

#[test]
fn test_report_type_values() {
    for (arg, expected) in [
        ("earnings", ReportType::Earnings),
        ("expenses", ReportType::Expenses),
        ("trips", ReportType::Trips),
        ("complaints", ReportType::Complaints),
        ("performance", ReportType::Performance),
    ] {
        let cli = Cli::try_parse_from(["fleetdesk", "report", "-t", arg]).unwrap();
        match cli.command {
            Commands::Report {
                report_type,
                driver,
                export,
                ..
            } => {
                assert_eq!(report_type, expected);
                assert_eq!(driver, "all");
                assert!(export.is_none());
            }
            _ => panic!("expected report"),
        }
        println!("✓ Report type: {}", arg);
    }
}

#[test]
fn test_drivers_performance_takes_id() {
    let cli = Cli::try_parse_from(["fleetdesk", "drivers", "performance", "D-17"]).unwrap();
    match cli.command {
        Commands::Drivers {
            action: DriversAction::Performance { id, format },
        } => {
            assert_eq!(id, "D-17");
            assert!(matches!(format, OutputFormat::Table));
        }
        _ => panic!("expected drivers performance"),
    }
}

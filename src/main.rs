use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleetdesk::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleetdesk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        commands::report_error(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Init = cli.command {
        return commands::init().await;
    }

    let ctx = commands::Context::new(&cli.global)?;

    match cli.command {
        Commands::Init => Ok(()),
        Commands::Login { username } => commands::login(&ctx, username).await,
        Commands::Register {
            name,
            username,
            email,
            phone,
        } => commands::register(&ctx, name, username, email, phone).await,
        Commands::Logout => commands::logout(&ctx).await,
        Commands::Whoami { format } => commands::whoami(&ctx, format).await,
        Commands::Open { path } => commands::open(&ctx, &path).await,
        Commands::Trips { action } => commands::trips(&ctx, action).await,
        Commands::Expenses { action } => commands::expenses(&ctx, action).await,
        Commands::Complaints { action } => commands::complaints(&ctx, action).await,
        Commands::Payments { action } => commands::payments(&ctx, action).await,
        Commands::Od { action } => commands::od(&ctx, action).await,
        Commands::Dashboard { format } => commands::dashboard(&ctx, format).await,
        Commands::Drivers { action } => commands::drivers(&ctx, action).await,
        Commands::Report {
            report_type,
            time_frame,
            driver,
            start,
            end,
            export,
            format,
        } => {
            commands::report(
                &ctx,
                report_type,
                time_frame,
                driver,
                start,
                end,
                export,
                format,
            )
            .await
        }
    }
}

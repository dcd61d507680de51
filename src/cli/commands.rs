//! CLI command implementations

use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use dialoguer::{theme::ColorfulTheme, Input, Password};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::{ApiClient, Attachment};
use crate::auth::{AuthOutcome, Credentials, FileTokenStore, Registration, SessionManager, User};
use crate::cli::{
    error, info, print_complaint_table, print_driver_dashboard, print_driver_table,
    print_expense_table, print_od_log, print_payment_ledger, print_report, print_rows,
    print_stat_map, print_structured, print_trip_table, print_user, spinner, success, warn,
    ComplaintsAction, DriversAction, ExpensesAction, GlobalOpts, OdAction, OutputFormat,
    PaymentsAction, TripsAction,
};
use crate::config::{self, Config};
use crate::error::Error;
use crate::fleet::{FleetClient, NewTrip, OdMark, ReportQuery, ReportType, TimeFrame};
use crate::routes::{navigate, AdminPage, Decision, DriverPage, Route};

/// Everything a command needs: config plus the session it acts under
pub struct Context {
    pub config: Config,
    pub session: SessionManager,
}

impl Context {
    pub fn new(global: &GlobalOpts) -> Result<Self> {
        let config = load_config(global)?;
        let api = ApiClient::from_config(&config.api)?;
        let tokens = Arc::new(FileTokenStore::new(config.session.token_path.clone()));
        let session = SessionManager::new(api, tokens, config.api.retry_policy())
            .with_password_rules(config.validation.password.clone());
        Ok(Self { config, session })
    }

    fn fleet(&self) -> FleetClient {
        FleetClient::new(
            self.session.clone(),
            self.config.validation.clone(),
            self.config.upload.clone(),
        )
    }

    /// Resolve the stored session and return the signed-in user
    async fn resume(&self) -> Result<User> {
        let pb = spinner("Checking session...");
        let session = self.session.bootstrap().await;
        pb.finish_and_clear();
        session.user().cloned().ok_or_else(|| Error::NotAuthenticated.into())
    }

    /// Resolve the session and apply the route guard for a page
    async fn enter(&self, route: Route) -> Result<User> {
        let pb = spinner("Checking session...");
        let session = self.session.bootstrap().await;
        pb.finish_and_clear();

        match navigate(&session, route.path()) {
            Decision::Render => session.user().cloned().ok_or_else(|| Error::NotAuthenticated.into()),
            Decision::Redirect(Route::Login) => Err(Error::NotAuthenticated.into()),
            Decision::Redirect(home) => {
                let role = session.user().map(|u| u.role.to_string()).unwrap_or_default();
                bail!(
                    "{} is not available to {} accounts (your home page is {})",
                    route,
                    role,
                    home
                )
            }
            Decision::Pending => bail!("Session is still loading"),
        }
    }
}

fn load_config(global: &GlobalOpts) -> Result<Config> {
    let mut config = match &global.config {
        Some(path) => config::load_config_from_path(path)?,
        None => match config::load_config() {
            Ok(config) => config,
            Err(Error::ConfigNotFound) => {
                tracing::debug!("No fleetdesk.toml found, using defaults");
                Config::default()
            }
            Err(e) => return Err(e.into()),
        },
    };
    if let Some(url) = &global.api_url {
        config.api.url = url.clone();
    }
    Ok(config)
}

fn attachment(path: &Path) -> Result<Attachment> {
    Ok(Attachment::from_path(path)?)
}

/// Initialize a new fleetdesk.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = Path::new(config::loader::CONFIG_FILENAME);

    if config_path.exists() {
        warn("fleetdesk.toml already exists");
        return Ok(());
    }

    fs::write(config_path, config::loader::default_config_content())?;

    success("Created fleetdesk.toml");
    info("Set the endpoint URL, then run 'fleetdesk login'");

    Ok(())
}

pub async fn login(ctx: &Context, username: Option<String>) -> Result<()> {
    let theme = ColorfulTheme::default();
    let username = match username {
        Some(username) => username,
        None => Input::<String>::with_theme(&theme)
            .with_prompt("Username")
            .interact_text()?,
    };
    let password = Password::with_theme(&theme)
        .with_prompt("Password")
        .interact()?;

    let pb = spinner("Signing in...");
    let outcome = ctx.session.login(&Credentials::new(username, password)).await;
    pb.finish_and_clear();

    match outcome {
        AuthOutcome::Success { redirect } => {
            if let Some(user) = ctx.session.session().await.user() {
                success(&format!("Logged in as {} ({})", user.name, user.role));
            }
            if let Some(route) = redirect {
                info(&format!("Home page: {}", route.path()));
            }
            Ok(())
        }
        AuthOutcome::Failure { error } => bail!(error),
    }
}

pub async fn register(
    ctx: &Context,
    name: String,
    username: String,
    email: String,
    phone: Option<String>,
) -> Result<()> {
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let registration = Registration {
        name,
        username,
        email,
        phone,
        password,
    };

    let pb = spinner("Creating account...");
    let outcome = ctx.session.register(&registration).await;
    pb.finish_and_clear();

    match outcome {
        AuthOutcome::Success { .. } => {
            success(&format!("Created account '{}'", registration.username));
            info("Log in with 'fleetdesk login'");
            Ok(())
        }
        AuthOutcome::Failure { error } => bail!(error),
    }
}

pub async fn logout(ctx: &Context) -> Result<()> {
    let route = ctx.session.logout().await;
    success("Logged out");
    info(&format!("Returning to {}", route.path()));
    Ok(())
}

pub async fn whoami(ctx: &Context, format: OutputFormat) -> Result<()> {
    let user = ctx.resume().await?;
    if !print_structured(&user, format)? {
        print_user(&user);
    }
    Ok(())
}

/// Show where the router sends the current session for a path
pub async fn open(ctx: &Context, path: &str) -> Result<()> {
    let session = ctx.session.bootstrap().await;
    match navigate(&session, path) {
        Decision::Render => success(&format!("{} renders", path)),
        Decision::Redirect(route) => info(&format!("{} redirects to {}", path, route.path())),
        Decision::Pending => warn("Session is still loading"),
    }
    Ok(())
}

pub async fn trips(ctx: &Context, action: TripsAction) -> Result<()> {
    ctx.enter(Route::Driver(DriverPage::Trips)).await?;
    let fleet = ctx.fleet();

    match action {
        TripsAction::List { format } => {
            let trips = fleet.trips().await?;
            if !print_structured(&trips, format)? {
                print_trip_table(&trips);
            }
        }
        TripsAction::Add {
            amount,
            km,
            payment,
            toll,
            cash_collected,
        } => {
            let trip = NewTrip {
                amount,
                km,
                payment_type: payment,
                toll,
                cash_collected,
            };
            fleet.add_trip(&trip).await?;
            success("Trip added successfully");
        }
    }

    Ok(())
}

pub async fn expenses(ctx: &Context, action: ExpensesAction) -> Result<()> {
    ctx.enter(Route::Driver(DriverPage::Expenses)).await?;
    let fleet = ctx.fleet();

    match action {
        ExpensesAction::List { format } => {
            let expenses = fleet.cng_expenses().await?;
            if !print_structured(&expenses, format)? {
                print_expense_table(&expenses);
            }
        }
        ExpensesAction::Add {
            amount,
            paid_by,
            receipt,
        } => {
            let pb = spinner("Uploading receipt...");
            let result = fleet
                .add_cng_expense(amount, paid_by, attachment(&receipt)?)
                .await;
            pb.finish_and_clear();
            result?;
            success("CNG expense added successfully");
        }
    }

    Ok(())
}

pub async fn complaints(ctx: &Context, action: ComplaintsAction) -> Result<()> {
    ctx.enter(Route::Driver(DriverPage::Complaints)).await?;
    let fleet = ctx.fleet();

    match action {
        ComplaintsAction::List { format } => {
            let complaints = fleet.complaints().await?;
            if !print_structured(&complaints, format)? {
                print_complaint_table(&complaints);
            }
        }
        ComplaintsAction::Add {
            against,
            kind,
            description,
            image,
        } => {
            let image = image.as_deref().map(attachment).transpose()?;
            fleet
                .add_complaint(&against, &kind, &description, image)
                .await?;
            success("Complaint submitted");
        }
    }

    Ok(())
}

pub async fn payments(ctx: &Context, action: PaymentsAction) -> Result<()> {
    ctx.enter(Route::Driver(DriverPage::Payments)).await?;
    let fleet = ctx.fleet();

    match action {
        PaymentsAction::List { format } => {
            let ledger = fleet.payments().await?;
            if !print_structured(&ledger, format)? {
                print_payment_ledger(&ledger);
            }
        }
        PaymentsAction::Add {
            amount,
            kind,
            description,
            image,
        } => {
            let image = image.as_deref().map(attachment).transpose()?;
            fleet.add_payment(amount, kind, &description, image).await?;
            success("Payment recorded");
        }
    }

    Ok(())
}

pub async fn od(ctx: &Context, action: OdAction) -> Result<()> {
    let route = match action {
        OdAction::Check => Route::Driver(DriverPage::Dashboard),
        _ => Route::Driver(DriverPage::OdLog),
    };
    ctx.enter(route).await?;
    let fleet = ctx.fleet();
    let today = Local::now().date_naive();

    match action {
        OdAction::Show { date } => {
            let log = fleet.od_log(date.unwrap_or(today)).await?;
            print_od_log(log.as_ref());
        }
        OdAction::Start { reading, image } => {
            record_od(&fleet, today, OdMark::Start, reading, &image).await?;
            success(&format!("Start OD recorded: {}", reading));
        }
        OdAction::End { reading, image } => {
            record_od(&fleet, today, OdMark::End, reading, &image).await?;
            success(&format!("End OD recorded: {}", reading));
        }
        OdAction::Check => {
            if fleet.has_od_reading().await? {
                success("Today's start OD reading has been submitted");
            } else {
                warn("Start OD reading not submitted yet. Run 'fleetdesk od start <reading> --image <photo>'");
            }
        }
    }

    Ok(())
}

async fn record_od(
    fleet: &FleetClient,
    date: NaiveDate,
    mark: OdMark,
    reading: u64,
    image: &Path,
) -> Result<()> {
    let image = attachment(image)?;
    let pb = spinner("Uploading odometer photo...");
    let result = fleet.update_od_log(date, mark, reading, image).await;
    pb.finish_and_clear();
    Ok(result?)
}

pub async fn dashboard(ctx: &Context, format: OutputFormat) -> Result<()> {
    let user = ctx.resume().await?;
    let fleet = ctx.fleet();

    if user.is_admin() {
        let dashboard = fleet.admin_dashboard().await?;
        if !print_structured(&dashboard, format)? {
            print_stat_map("Fleet Dashboard", &dashboard.stats);
            if !dashboard.earnings_data.is_empty() {
                println!();
                print_rows(&dashboard.earnings_data);
            }
        }
    } else {
        let dashboard = fleet.driver_dashboard().await?;
        if !print_structured(&dashboard, format)? {
            print_driver_dashboard(&dashboard);
        }
    }

    Ok(())
}

pub async fn drivers(ctx: &Context, action: DriversAction) -> Result<()> {
    ctx.enter(Route::Admin(AdminPage::Drivers)).await?;
    let fleet = ctx.fleet();

    match action {
        DriversAction::List { format } => {
            let drivers = fleet.all_drivers().await?;
            if !print_structured(&drivers, format)? {
                print_driver_table(&drivers);
            }
        }
        DriversAction::Show { id } => {
            let details = fleet.driver_details(&id).await?;
            print_stat_map("Driver Details", &details);
        }
        DriversAction::Performance { id, format } => {
            let rows = fleet.driver_performance(&id).await?;
            if !print_structured(&rows, format)? {
                print_rows(&rows);
            }
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn report(
    ctx: &Context,
    report_type: ReportType,
    time_frame: TimeFrame,
    driver: String,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    export: Option<Option<PathBuf>>,
    format: OutputFormat,
) -> Result<()> {
    ctx.enter(Route::Admin(AdminPage::Reports)).await?;
    let fleet = ctx.fleet();

    let mut query = ReportQuery::new(report_type, time_frame);
    query.driver_id = driver;
    query.start_date = start;
    query.end_date = end;

    match export {
        Some(path) => {
            let path = path.unwrap_or_else(|| PathBuf::from(query.export_file_name()));
            let pb = spinner("Exporting report...");
            let result = fleet.export_report(query).await;
            pb.finish_and_clear();
            fs::write(&path, result?)?;
            success(&format!("Report exported to {}", path.display()));
        }
        None => {
            let rows = fleet.generate_report(query).await?;
            if !print_structured(&rows, format)? {
                print_report(report_type, &rows);
            }
        }
    }

    Ok(())
}

/// Print a command failure; a rejected session gets a login hint
pub fn report_error(err: &anyhow::Error) {
    error(&err.to_string());
    if let Some(Error::Api(api)) = err.downcast_ref::<Error>() {
        if *api == crate::api::ApiError::Unauthorized {
            info("Run 'fleetdesk login' to sign in again");
        }
    }
}

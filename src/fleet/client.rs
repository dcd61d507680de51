//! Typed wrappers around the fleet endpoint's domain actions

use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::models::*;
use crate::api::{Action, ApiError, ApiRequest, Attachment};
use crate::auth::SessionManager;
use crate::config::{UploadConfig, ValidationConfig};
use crate::error::{Error, Result};
use crate::validation;

/// Domain operations for the signed-in user
#[derive(Clone)]
pub struct FleetClient {
    session: SessionManager,
    rules: ValidationConfig,
    upload: UploadConfig,
}

#[derive(Deserialize)]
struct TripsReply {
    #[serde(default)]
    trips: Vec<Trip>,
}

#[derive(Deserialize)]
struct ExpensesReply {
    #[serde(default)]
    expenses: Vec<CngExpense>,
}

#[derive(Deserialize)]
struct ComplaintsReply {
    #[serde(default)]
    complaints: Vec<Complaint>,
}

#[derive(Deserialize)]
struct OdLogReply {
    #[serde(default)]
    data: Option<OdLog>,
}

#[derive(Deserialize)]
struct OdCheckReply {
    #[serde(default, rename = "hasODReading")]
    has_od_reading: bool,
}

#[derive(Deserialize)]
struct DriversReply {
    #[serde(default)]
    drivers: Vec<DriverSummary>,
}

#[derive(Deserialize)]
struct DetailsReply {
    #[serde(default)]
    details: serde_json::Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PerformanceReply {
    #[serde(default)]
    performance_data: Vec<serde_json::Map<String, Value>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportReply {
    #[serde(default)]
    report_data: Vec<ReportRow>,
}

impl FleetClient {
    pub fn new(session: SessionManager, rules: ValidationConfig, upload: UploadConfig) -> Self {
        Self {
            session,
            rules,
            upload,
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Start a request carrying the stored token
    fn request(&self, action: Action) -> Result<ApiRequest> {
        let token = self.session.token().ok_or(Error::NotAuthenticated)?;
        Ok(ApiRequest::new(action).with_token(Some(token)))
    }

    async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let action = request.action;
        match self.session.api().call_as::<T>(request).await {
            Ok(value) => Ok(value),
            Err(err) => Err(self.fail(action, err).await),
        }
    }

    async fn fail(&self, action: Action, err: ApiError) -> Error {
        if err == ApiError::Unauthorized {
            self.session.invalidate().await;
        }
        tracing::warn!(%action, "{}", err);
        Error::Api(err)
    }

    /// The name the endpoint files records under
    async fn driver_name(&self) -> Result<String> {
        self.session
            .session()
            .await
            .user()
            .map(|u| u.name.clone())
            .ok_or(Error::NotAuthenticated)
    }

    fn attachment(&self, attachment: &Attachment) -> Result<()> {
        validation::validate_attachment(&self.upload, attachment)?;
        Ok(())
    }

    pub async fn trips(&self) -> Result<Vec<Trip>> {
        let reply: TripsReply = self.call(self.request(Action::GetTrips)?).await?;
        Ok(reply.trips)
    }

    pub async fn add_trip(&self, trip: &NewTrip) -> Result<()> {
        validation::validate_trip(&self.rules.trip, trip.amount, trip.km)?;
        let request = self
            .request(Action::AddTrip)?
            .fields(trip)?
            .field("date", Utc::now().to_rfc3339());
        self.call::<Value>(request).await?;
        tracing::info!(amount = trip.amount, km = trip.km, "Trip added");
        Ok(())
    }

    pub async fn cng_expenses(&self) -> Result<Vec<CngExpense>> {
        let driver = self.driver_name().await?;
        let request = self.request(Action::GetCngExpenses)?.field("driver", driver);
        let reply: ExpensesReply = self.call(request).await?;
        Ok(reply.expenses)
    }

    pub async fn add_cng_expense(
        &self,
        amount: f64,
        paid_by: PaymentType,
        receipt: Attachment,
    ) -> Result<()> {
        validation::validate_amount(amount)?;
        self.attachment(&receipt)?;
        let driver = self.driver_name().await?;
        let request = self
            .request(Action::AddCngExpense)?
            .field("driver", driver)
            .field("amount", amount)
            .field("paidBy", paid_by.to_string())
            .field("date", Utc::now().to_rfc3339())
            .file("receipt", receipt);
        self.call::<Value>(request).await?;
        Ok(())
    }

    pub async fn complaints(&self) -> Result<Vec<Complaint>> {
        let reply: ComplaintsReply = self.call(self.request(Action::GetComplaints)?).await?;
        Ok(reply.complaints)
    }

    pub async fn add_complaint(
        &self,
        against: &str,
        kind: &str,
        description: &str,
        image: Option<Attachment>,
    ) -> Result<()> {
        validation::require_field(against, "against")?;
        validation::require_field(kind, "type")?;
        validation::require_field(description, "description")?;

        let mut request = self
            .request(Action::AddComplaint)?
            .field("against", against)
            .field("type", kind)
            .field("description", description)
            .field("date", Utc::now().to_rfc3339());
        if let Some(image) = image {
            self.attachment(&image)?;
            request = request.file("image", image);
        }
        self.call::<Value>(request).await?;
        Ok(())
    }

    pub async fn payments(&self) -> Result<PaymentLedger> {
        self.call(self.request(Action::GetPayments)?).await
    }

    pub async fn add_payment(
        &self,
        amount: f64,
        kind: PaymentKind,
        description: &str,
        image: Option<Attachment>,
    ) -> Result<()> {
        validation::validate_amount(amount)?;
        let mut request = self
            .request(Action::AddPayment)?
            .field("amount", amount)
            .field("type", kind.to_string())
            .field("description", description)
            .field("date", Utc::now().to_rfc3339());
        if let Some(image) = image {
            self.attachment(&image)?;
            request = request.file("image", image);
        }
        self.call::<Value>(request).await?;
        Ok(())
    }

    /// OD log for a day; `None` when nothing has been recorded yet
    pub async fn od_log(&self, date: NaiveDate) -> Result<Option<OdLog>> {
        let driver = self.driver_name().await?;
        let request = self
            .request(Action::GetOdLog)?
            .field("date", date.format("%Y-%m-%d").to_string())
            .field("driver", driver);
        let reply: OdLogReply = self.call(request).await?;
        Ok(reply.data)
    }

    /// Record a start or end odometer reading for a day
    pub async fn update_od_log(
        &self,
        date: NaiveDate,
        mark: OdMark,
        reading: u64,
        image: Attachment,
    ) -> Result<()> {
        match mark {
            OdMark::Start => validation::validate_od_reading(&self.rules.od_reading, reading)?,
            OdMark::End => {
                let start = self.od_log(date).await?.and_then(|log| log.start_od);
                validation::validate_od_end(&self.rules.od_reading, start, reading)?;
            }
        }
        self.attachment(&image)?;

        let driver = self.driver_name().await?;
        let request = self
            .request(Action::UpdateOdLog)?
            .field("driver", driver)
            .field("date", date.format("%Y-%m-%d").to_string())
            .field(mark.reading_field(), reading)
            .file(mark.image_field(), image);
        self.call::<Value>(request).await?;
        tracing::info!(reading, ?mark, "OD log updated");
        Ok(())
    }

    /// Start-of-shift reading prompted from the dashboard
    pub async fn submit_od_reading(&self, start_od: u64, image: Option<Attachment>) -> Result<()> {
        validation::validate_od_reading(&self.rules.od_reading, start_od)?;
        let mut request = self
            .request(Action::SubmitOdReading)?
            .field("startOD", start_od)
            .field("timestamp", Utc::now().to_rfc3339());
        if let Some(image) = image {
            self.attachment(&image)?;
            request = request.file("image", image);
        }
        self.call::<Value>(request).await?;
        Ok(())
    }

    /// Whether today's start reading has been submitted
    pub async fn has_od_reading(&self) -> Result<bool> {
        let request = self.request(Action::CheckOdReading)?;
        // This action may answer with a bare flag rather than a success envelope
        let body = match self.session.api().fetch_bytes(request).await {
            Ok(body) => body,
            Err(err) => return Err(self.fail(Action::CheckOdReading, err).await),
        };
        let reply: OdCheckReply = serde_json::from_slice(&body)?;
        Ok(reply.has_od_reading)
    }

    pub async fn driver_dashboard(&self) -> Result<DriverDashboard> {
        self.call(self.request(Action::GetDashboardData)?).await
    }

    pub async fn admin_dashboard(&self) -> Result<AdminDashboard> {
        self.call(self.request(Action::GetAdminDashboardData)?).await
    }

    /// Drivers for the dashboard selector
    pub async fn drivers_list(&self) -> Result<Vec<DriverSummary>> {
        let reply: DriversReply = self.call(self.request(Action::GetDriversList)?).await?;
        Ok(reply.drivers)
    }

    /// Full driver table with totals
    pub async fn all_drivers(&self) -> Result<Vec<DriverSummary>> {
        let reply: DriversReply = self.call(self.request(Action::GetAllDrivers)?).await?;
        Ok(reply.drivers)
    }

    pub async fn driver_details(&self, driver_id: &str) -> Result<serde_json::Map<String, Value>> {
        validation::require_field(driver_id, "driver id")?;
        let request = self
            .request(Action::GetDriverDetails)?
            .field("driverId", driver_id);
        let reply: DetailsReply = self.call(request).await?;
        Ok(reply.details)
    }

    pub async fn driver_performance(
        &self,
        driver_id: &str,
    ) -> Result<Vec<serde_json::Map<String, Value>>> {
        validation::require_field(driver_id, "driver id")?;
        let request = self
            .request(Action::GetDriverPerformance)?
            .field("driverId", driver_id);
        let reply: PerformanceReply = self.call(request).await?;
        Ok(reply.performance_data)
    }

    pub async fn generate_report(&self, query: ReportQuery) -> Result<Vec<ReportRow>> {
        let query = query.normalized()?;
        let request = self.request(Action::GenerateReport)?.fields(&query)?;
        let reply: ReportReply = self.call(request).await?;
        Ok(reply.report_data)
    }

    /// Spreadsheet export of a report, as raw bytes
    pub async fn export_report(&self, query: ReportQuery) -> Result<Vec<u8>> {
        let query = query.normalized()?;
        let request = self.request(Action::ExportReport)?.fields(&query)?;
        match self.session.api().fetch_bytes(request).await {
            Ok(bytes) => Ok(bytes),
            Err(err) => Err(self.fail(Action::ExportReport, err).await),
        }
    }
}

//! Records exchanged with the fleet endpoint

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{Error, Result};

/// Spreadsheet cells come back as numbers or numeric strings
fn number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn od<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(number(deserializer)?.filter(|n| *n >= 0.0).map(|n| n as u64))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Cash,
    Online,
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentType::Cash => write!(f, "cash"),
            PaymentType::Online => write!(f, "online"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "number", rename = "tripAmount")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "number", rename = "tripKM")]
    pub km: Option<f64>,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default, deserialize_with = "number")]
    pub toll: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub cash_collected: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrip {
    #[serde(rename = "tripAmount")]
    pub amount: f64,
    #[serde(rename = "tripKM")]
    pub km: f64,
    pub payment_type: PaymentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toll: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_collected: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CngExpense {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "number")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub paid_by: Option<String>,
    /// Link to the uploaded receipt
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub against: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub proof: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    AdvanceReturn,
    AdvanceReceived,
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentKind::AdvanceReturn => write!(f, "advance_return"),
            PaymentKind::AdvanceReceived => write!(f, "advance_received"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "number")]
    pub amount: Option<f64>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub proof: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Payments plus the running advance balance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentLedger {
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default, deserialize_with = "number")]
    pub balance: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OdLog {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, rename = "startOD", deserialize_with = "od")]
    pub start_od: Option<u64>,
    #[serde(default, rename = "endOD", deserialize_with = "od")]
    pub end_od: Option<u64>,
    #[serde(default)]
    pub start_image: Option<String>,
    #[serde(default)]
    pub end_image: Option<String>,
}

impl OdLog {
    pub fn distance(&self) -> Option<u64> {
        match (self.start_od, self.end_od) {
            (Some(start), Some(end)) if end >= start => Some(end - start),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OdMark {
    Start,
    End,
}

impl OdMark {
    pub fn reading_field(self) -> &'static str {
        match self {
            OdMark::Start => "startOD",
            OdMark::End => "endOD",
        }
    }

    pub fn image_field(self) -> &'static str {
        match self {
            OdMark::Start => "startImage",
            OdMark::End => "endImage",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverStats {
    #[serde(default, deserialize_with = "number")]
    pub total_earnings: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub total_expenses: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub cash_collected: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub online_payments: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub total_driven: Option<f64>,
    #[serde(default, rename = "inTripKM", deserialize_with = "number")]
    pub in_trip_km: Option<f64>,
    #[serde(default, rename = "burningKM", deserialize_with = "number")]
    pub burning_km: Option<f64>,
}

/// Headline figures plus chart series (kept as raw rows)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard<S> {
    #[serde(default)]
    pub stats: S,
    #[serde(default)]
    pub earnings_data: Vec<Map<String, Value>>,
}

pub type DriverDashboard = Dashboard<DriverStats>;
pub type AdminDashboard = Dashboard<Map<String, Value>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverSummary {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "number")]
    pub total_trips: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub total_earnings: Option<f64>,
    #[serde(default)]
    pub last_active: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Earnings,
    Expenses,
    Trips,
    Complaints,
    Performance,
}

impl ReportType {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportType::Earnings => "earnings",
            ReportType::Expenses => "expenses",
            ReportType::Trips => "trips",
            ReportType::Complaints => "complaints",
            ReportType::Performance => "performance",
        }
    }

    /// Column keys and headings shown for each report
    pub fn columns(self) -> &'static [(&'static str, &'static str)] {
        match self {
            ReportType::Earnings => &[
                ("date", "Date"),
                ("driverName", "Driver"),
                ("trips", "Total Trips"),
                ("earnings", "Total Earnings"),
                ("cashCollected", "Cash Collected"),
                ("onlinePayments", "Online Payments"),
            ],
            ReportType::Expenses => &[
                ("date", "Date"),
                ("driverName", "Driver"),
                ("cngAmount", "CNG Amount"),
                ("tollCharges", "Toll Charges"),
                ("otherExpenses", "Other Expenses"),
                ("total", "Total Expenses"),
            ],
            ReportType::Trips => &[
                ("date", "Date"),
                ("driverName", "Driver"),
                ("startOD", "Start OD"),
                ("endOD", "End OD"),
                ("totalKM", "Total KM"),
                ("burningKM", "Burning KM"),
            ],
            ReportType::Complaints => &[
                ("date", "Date"),
                ("from", "From"),
                ("against", "Against"),
                ("type", "Type"),
                ("status", "Status"),
            ],
            ReportType::Performance => &[
                ("date", "Date"),
                ("driverName", "Driver"),
                ("totalTrips", "Total Trips"),
                ("workingHours", "Working Hours"),
                ("efficiency", "Efficiency"),
                ("complaints", "Complaints"),
            ],
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub report_type: ReportType,
    pub time_frame: TimeFrame,
    /// Driver id, or `all`
    pub driver_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<chrono::NaiveDate>,
}

impl ReportQuery {
    pub fn new(report_type: ReportType, time_frame: TimeFrame) -> Self {
        Self {
            report_type,
            time_frame,
            driver_id: "all".to_string(),
            start_date: None,
            end_date: None,
        }
    }

    /// Dates are only sent for custom ranges, and then both are required
    pub fn normalized(mut self) -> Result<Self> {
        use crate::validation::ValidationError;

        if self.time_frame != TimeFrame::Custom {
            self.start_date = None;
            self.end_date = None;
            return Ok(self);
        }
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => {
                Err(Error::Validation(ValidationError::InvertedDateRange))
            }
            (Some(_), Some(_)) => Ok(self),
            _ => Err(Error::Validation(ValidationError::MissingDateRange)),
        }
    }

    pub fn export_file_name(&self) -> String {
        format!("{}_report.xlsx", self.report_type)
    }
}

/// One row of a generated report
pub type ReportRow = Map<String, Value>;

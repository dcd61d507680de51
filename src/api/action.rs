//! Action names understood by the remote endpoint

use serde::{Deserialize, Serialize};
use std::fmt;

/// The `action` field that selects server-side behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "checkAuth")]
    CheckAuth,
    #[serde(rename = "login")]
    Login,
    #[serde(rename = "register")]
    Register,
    #[serde(rename = "logout")]
    Logout,
    #[serde(rename = "getTrips")]
    GetTrips,
    #[serde(rename = "addTrip")]
    AddTrip,
    #[serde(rename = "getCNGExpenses")]
    GetCngExpenses,
    #[serde(rename = "addCNGExpense")]
    AddCngExpense,
    #[serde(rename = "getComplaints")]
    GetComplaints,
    #[serde(rename = "addComplaint")]
    AddComplaint,
    #[serde(rename = "getPayments")]
    GetPayments,
    #[serde(rename = "addPayment")]
    AddPayment,
    #[serde(rename = "getODLog")]
    GetOdLog,
    #[serde(rename = "updateODLog")]
    UpdateOdLog,
    #[serde(rename = "submitODReading")]
    SubmitOdReading,
    #[serde(rename = "checkODReading")]
    CheckOdReading,
    #[serde(rename = "getDashboardData")]
    GetDashboardData,
    #[serde(rename = "getAdminDashboardData")]
    GetAdminDashboardData,
    #[serde(rename = "getDriversList")]
    GetDriversList,
    #[serde(rename = "getAllDrivers")]
    GetAllDrivers,
    #[serde(rename = "getDriverDetails")]
    GetDriverDetails,
    #[serde(rename = "getDriverPerformance")]
    GetDriverPerformance,
    #[serde(rename = "generateReport")]
    GenerateReport,
    #[serde(rename = "exportReport")]
    ExportReport,
}

impl Action {
    /// Wire name sent in the `action` field
    pub fn as_str(self) -> &'static str {
        match self {
            Action::CheckAuth => "checkAuth",
            Action::Login => "login",
            Action::Register => "register",
            Action::Logout => "logout",
            Action::GetTrips => "getTrips",
            Action::AddTrip => "addTrip",
            Action::GetCngExpenses => "getCNGExpenses",
            Action::AddCngExpense => "addCNGExpense",
            Action::GetComplaints => "getComplaints",
            Action::AddComplaint => "addComplaint",
            Action::GetPayments => "getPayments",
            Action::AddPayment => "addPayment",
            Action::GetOdLog => "getODLog",
            Action::UpdateOdLog => "updateODLog",
            Action::SubmitOdReading => "submitODReading",
            Action::CheckOdReading => "checkODReading",
            Action::GetDashboardData => "getDashboardData",
            Action::GetAdminDashboardData => "getAdminDashboardData",
            Action::GetDriversList => "getDriversList",
            Action::GetAllDrivers => "getAllDrivers",
            Action::GetDriverDetails => "getDriverDetails",
            Action::GetDriverPerformance => "getDriverPerformance",
            Action::GenerateReport => "generateReport",
            Action::ExportReport => "exportReport",
        }
    }

    /// Human label used to phrase error messages ("Login failed", ...)
    pub fn label(self) -> &'static str {
        match self {
            Action::CheckAuth => "Session check",
            Action::Login => "Login",
            Action::Register => "Registration",
            Action::Logout => "Logout",
            Action::GetTrips | Action::AddTrip => "Trip request",
            Action::GetCngExpenses | Action::AddCngExpense => "Expense request",
            Action::GetComplaints | Action::AddComplaint => "Complaint request",
            Action::GetPayments | Action::AddPayment => "Payment request",
            Action::GetOdLog
            | Action::UpdateOdLog
            | Action::SubmitOdReading
            | Action::CheckOdReading => "OD log request",
            Action::GetDashboardData | Action::GetAdminDashboardData => "Dashboard request",
            Action::GetDriversList
            | Action::GetAllDrivers
            | Action::GetDriverDetails
            | Action::GetDriverPerformance => "Driver request",
            Action::GenerateReport | Action::ExportReport => "Report request",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Route table and role-gated navigation

mod guard;

pub use guard::{decide, navigate, Decision};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::auth::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminPage {
    Dashboard,
    Drivers,
    Reports,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverPage {
    Dashboard,
    Trips,
    Expenses,
    OdLog,
    Complaints,
    Payments,
}

/// Every navigable screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Login,
    Register,
    Admin(AdminPage),
    Driver(DriverPage),
}

const ADMIN_ONLY: &[Role] = &[Role::Admin];
const DRIVER_ONLY: &[Role] = &[Role::Driver];

impl Route {
    /// Landing route for a role
    pub fn home_for(role: Role) -> Route {
        match role {
            Role::Admin => Route::Admin(AdminPage::Dashboard),
            Role::Driver => Route::Driver(DriverPage::Dashboard),
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Admin(AdminPage::Dashboard) => "/admin",
            Route::Admin(AdminPage::Drivers) => "/admin/drivers",
            Route::Admin(AdminPage::Reports) => "/admin/reports",
            Route::Driver(DriverPage::Dashboard) => "/driver",
            Route::Driver(DriverPage::Trips) => "/driver/trips",
            Route::Driver(DriverPage::Expenses) => "/driver/expenses",
            Route::Driver(DriverPage::OdLog) => "/driver/odlog",
            Route::Driver(DriverPage::Complaints) => "/driver/complaints",
            Route::Driver(DriverPage::Payments) => "/driver/payments",
        }
    }

    /// Resolve a path; trailing slashes are ignored
    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        let route = match normalized {
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/admin" => Route::Admin(AdminPage::Dashboard),
            "/admin/drivers" => Route::Admin(AdminPage::Drivers),
            "/admin/reports" => Route::Admin(AdminPage::Reports),
            "/driver" => Route::Driver(DriverPage::Dashboard),
            "/driver/trips" => Route::Driver(DriverPage::Trips),
            "/driver/expenses" => Route::Driver(DriverPage::Expenses),
            "/driver/odlog" => Route::Driver(DriverPage::OdLog),
            "/driver/complaints" => Route::Driver(DriverPage::Complaints),
            "/driver/payments" => Route::Driver(DriverPage::Payments),
            _ => return None,
        };
        Some(route)
    }

    /// Roles allowed to see this route; `None` for public routes
    pub fn required_roles(self) -> Option<&'static [Role]> {
        match self {
            Route::Login | Route::Register => None,
            Route::Admin(_) => Some(ADMIN_ONLY),
            Route::Driver(_) => Some(DRIVER_ONLY),
        }
    }

    pub fn all() -> [Route; 11] {
        [
            Route::Login,
            Route::Register,
            Route::Admin(AdminPage::Dashboard),
            Route::Admin(AdminPage::Drivers),
            Route::Admin(AdminPage::Reports),
            Route::Driver(DriverPage::Dashboard),
            Route::Driver(DriverPage::Trips),
            Route::Driver(DriverPage::Expenses),
            Route::Driver(DriverPage::OdLog),
            Route::Driver(DriverPage::Complaints),
            Route::Driver(DriverPage::Payments),
        ]
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        for route in Route::all() {
            assert_eq!(Route::parse(route.path()), Some(route));
        }
    }

    #[test]
    fn test_parse_normalizes_trailing_slash() {
        assert_eq!(Route::parse("/driver/trips/"), Some(Route::Driver(DriverPage::Trips)));
        assert_eq!(Route::parse("/nowhere"), None);
        assert_eq!(Route::parse("/"), None);
    }

    #[test]
    fn test_role_homes() {
        assert_eq!(Route::home_for(Role::Admin).path(), "/admin");
        assert_eq!(Route::home_for(Role::Driver).path(), "/driver");
    }

    #[test]
    fn test_required_roles() {
        assert_eq!(Route::Login.required_roles(), None);
        assert_eq!(
            Route::Admin(AdminPage::Reports).required_roles(),
            Some(&[Role::Admin][..])
        );
        assert_eq!(
            Route::Driver(DriverPage::OdLog).required_roles(),
            Some(&[Role::Driver][..])
        );
    }
}

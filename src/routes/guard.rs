//! Route guard

use crate::auth::{Role, Session};

use super::Route;

/// What to do with a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Session still resolving; render nothing yet
    Pending,
    Render,
    Redirect(Route),
}

/// Decide whether protected content may render for this session.
///
/// A signed-in user who lacks the role goes to their own home, never to
/// the login page.
pub fn decide(session: &Session, required: Option<&[Role]>) -> Decision {
    if session.is_loading() {
        return Decision::Pending;
    }

    let Some(user) = session.user() else {
        return Decision::Redirect(Route::Login);
    };

    match required {
        Some(roles) if !roles.contains(&user.role) => Decision::Redirect(Route::home_for(user.role)),
        _ => Decision::Render,
    }
}

/// Resolve a path and apply the guard. Unknown paths go to the login page.
pub fn navigate(session: &Session, path: &str) -> Decision {
    match Route::parse(path) {
        Some(route) => match route.required_roles() {
            None if session.is_loading() => Decision::Pending,
            None => Decision::Render,
            roles => decide(session, roles),
        },
        None if session.is_loading() => Decision::Pending,
        None => Decision::Redirect(Route::Login),
    }
}

//! Session management
//!
//! [`SessionManager`] owns the one in-memory [`Session`] and mediates every
//! identity-bearing call to the endpoint. Every public operation converts
//! failures into an [`AuthOutcome`]; nothing is propagated as an error.
//!
//! Mutations are ordered by a generation counter. Bootstrap, login, logout
//! and invalidate each take a new generation; a response is applied only if
//! no newer operation has started, so a slow login cannot resurrect a
//! session that a later logout cleared.

use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::{Action, ApiClient, ApiError, ApiRequest};
use crate::auth::models::{AuthOutcome, Credentials, Registration, User};
use crate::auth::retry::RetryPolicy;
use crate::auth::token_store::TokenStore;
use crate::config::PasswordRules;
use crate::routes::Route;
use crate::validation;

/// Client-side record of the current identity
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    user: Option<User>,
    loading: bool,
}

/// Where a session sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Anonymous,
    Authenticated,
}

impl Session {
    /// State at process start, before the session check has resolved
    pub fn initializing() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            user: None,
            loading: false,
        }
    }

    pub fn authenticated(user: User) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.user, self.loading) {
            (Some(_), _) => SessionPhase::Authenticated,
            (None, true) => SessionPhase::Uninitialized,
            (None, false) => SessionPhase::Anonymous,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::initializing()
    }
}

#[derive(Debug, Deserialize)]
struct CheckAuthReply {
    user: User,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginReply {
    user: User,
    session_token: String,
}

/// Owner of the session and the token slot
#[derive(Clone)]
pub struct SessionManager {
    api: ApiClient,
    tokens: Arc<dyn TokenStore>,
    retry: RetryPolicy,
    password_rules: PasswordRules,
    state: Arc<RwLock<Session>>,
    generation: Arc<AtomicU64>,
}

impl SessionManager {
    pub fn new(api: ApiClient, tokens: Arc<dyn TokenStore>, retry: RetryPolicy) -> Self {
        Self {
            api,
            tokens,
            retry,
            password_rules: PasswordRules::default(),
            state: Arc::new(RwLock::new(Session::initializing())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Override the password rules applied before `register`
    pub fn with_password_rules(mut self, rules: PasswordRules) -> Self {
        self.password_rules = rules;
        self
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Snapshot of the current session
    pub async fn session(&self) -> Session {
        self.state.read().await.clone()
    }

    /// The stored session token, if any
    pub fn token(&self) -> Option<String> {
        match self.tokens.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Failed to read session token: {}", e);
                None
            }
        }
    }

    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn clear_token(&self) {
        if let Err(e) = self.tokens.clear() {
            tracing::warn!("Failed to clear session token: {}", e);
        }
    }

    /// Resolve the session from the stored token. Ends with `loading == false`
    /// on every path.
    pub async fn bootstrap(&self) -> Session {
        let generation = self.begin();
        let token = self.token();
        let had_token = token.is_some();

        let request = ApiRequest::new(Action::CheckAuth).with_token(token);
        let result = self.api.call_as::<CheckAuthReply>(request).await;

        let mut state = self.state.write().await;
        if !self.is_current(generation) {
            tracing::debug!("Discarding stale session check");
            return state.clone();
        }

        *state = match result {
            Ok(reply) => {
                tracing::info!(user = %reply.user.name, role = %reply.user.role, "Session restored");
                Session::authenticated(reply.user)
            }
            Err(e) => {
                if had_token {
                    tracing::info!("Stored session is no longer valid: {}", e);
                }
                self.clear_token();
                Session::anonymous()
            }
        };
        state.clone()
    }

    async fn set_loading(&self, generation: u64, loading: bool) {
        let mut state = self.state.write().await;
        if self.is_current(generation) {
            state.loading = loading;
        }
    }

    /// Log in. Transport failures are retried immediately up to the policy's
    /// retry count; HTTP errors, timeouts and rejections are not.
    pub async fn login(&self, credentials: &Credentials) -> AuthOutcome {
        let generation = self.begin();
        self.set_loading(generation, true).await;

        let mut attempt = 0;
        let result = loop {
            let request = ApiRequest::new(Action::Login)
                .field("username", credentials.username.as_str())
                .field("password", credentials.password.as_str());

            match self.api.call_as::<LoginReply>(request).await {
                Err(ApiError::Connect(reason)) if attempt < self.retry.max_retries => {
                    attempt += 1;
                    tracing::warn!(attempt, "Login attempt failed, retrying: {}", reason);
                }
                other => break other,
            }
        };

        let mut state = self.state.write().await;
        if !self.is_current(generation) {
            tracing::warn!("Discarding login response superseded by a newer session operation");
            return AuthOutcome::failure("Login was cancelled.");
        }
        state.loading = false;

        match result {
            Ok(reply) => {
                if let Err(e) = self.tokens.save(&reply.session_token) {
                    tracing::warn!("Failed to persist session token: {}", e);
                }
                let home = Route::home_for(reply.user.role);
                tracing::info!(user = %reply.user.name, role = %reply.user.role, "Logged in");
                *state = Session::authenticated(reply.user);
                AuthOutcome::Success {
                    redirect: Some(home),
                }
            }
            Err(e) => {
                tracing::warn!("Login failed: {}", e);
                AuthOutcome::failure(e.user_message(Action::Login))
            }
        }
    }

    /// Create an account. Only transient failures are retried, with
    /// exponential backoff. `loading` is set while the call is in flight;
    /// the user and token are left untouched.
    pub async fn register(&self, registration: &Registration) -> AuthOutcome {
        if let Err(e) = validation::validate_registration(&self.password_rules, registration) {
            return AuthOutcome::failure(e.to_string());
        }

        let request = match ApiRequest::new(Action::Register).fields(registration) {
            Ok(request) => request,
            Err(e) => return AuthOutcome::failure(format!("Registration failed: {}", e)),
        };

        // Register does not take a generation; a newer operation owns `loading`.
        // Before bootstrap the session is already loading and stays that way.
        let generation = self.generation.load(Ordering::SeqCst);
        let resolved = self.state.read().await.phase() != SessionPhase::Uninitialized;
        if resolved {
            self.set_loading(generation, true).await;
        }
        let outcome = self.register_with_retry(registration, request).await;
        if resolved {
            self.set_loading(generation, false).await;
        }
        outcome
    }

    async fn register_with_retry(
        &self,
        registration: &Registration,
        request: ApiRequest,
    ) -> AuthOutcome {
        let mut attempt = 0;
        loop {
            match self.api.call(request.clone()).await {
                Ok(_) => {
                    tracing::info!(username = %registration.username, "Registered account");
                    return AuthOutcome::Success { redirect: None };
                }
                Err(e) if e.is_transient() => {
                    tracing::warn!(attempt = attempt + 1, "Registration attempt failed: {}", e);
                    if attempt >= self.retry.max_retries {
                        return AuthOutcome::failure(format!(
                            "Unable to reach the server after {} attempts. Please check your internet connection.",
                            attempt + 1
                        ));
                    }
                    tokio::time::sleep(self.retry.delay_for_attempt(attempt)).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::warn!("Registration failed: {}", e);
                    return AuthOutcome::failure(e.user_message(Action::Register));
                }
            }
        }
    }

    /// Log out. Local state is cleared before the endpoint is notified, so
    /// the cleanup happens regardless of what the notification does.
    pub async fn logout(&self) -> Route {
        let token = self.reset().await;

        let request = ApiRequest::new(Action::Logout).with_token(token);
        if let Err(e) = self.api.call(request).await {
            tracing::warn!("Logout notification failed: {}", e);
        }

        tracing::info!("Logged out");
        Route::Login
    }

    /// Drop the session after the endpoint rejected the token
    pub async fn invalidate(&self) {
        tracing::info!("Session rejected by server, clearing");
        self.reset().await;
    }

    /// Clear the token and session under the session lock, returning the
    /// token that was stored. A login commits under the same lock, so it
    /// either lands before this and is cleared, or sees a newer generation.
    async fn reset(&self) -> Option<String> {
        let mut state = self.state.write().await;
        self.begin();
        let token = self.token();
        self.clear_token();
        *state = Session::anonymous();
        token
    }
}

//! Shared test helpers: a scripted transport and session wiring

#![allow(dead_code)]

use async_trait::async_trait;
use fleetdesk::api::{Action, ApiClient, ApiError, ApiRequest, RawResponse, Transport};
use fleetdesk::auth::{MemoryTokenStore, RetryPolicy, SessionManager, TokenStore};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// What the mock does with one request
#[derive(Debug, Clone)]
pub enum Reply {
    Respond(RawResponse),
    Fail(ApiError),
    /// Answer after a delay
    Delayed(Duration, RawResponse),
    /// Never answer
    Hang,
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Reply::Respond(RawResponse::json(200, &body))
    }

    pub fn status(status: u16) -> Self {
        Reply::Respond(RawResponse::json(status, &json!({ "success": false })))
    }
}

/// A request as the mock saw it
#[derive(Debug, Clone)]
pub struct Sent {
    pub request: ApiRequest,
    pub at: Instant,
}

/// Transport answering from per-action scripts. When a script runs dry its
/// last reply repeats; unscripted actions get HTTP 404.
#[derive(Default)]
pub struct MockTransport {
    scripts: Mutex<HashMap<Action, VecDeque<Reply>>>,
    last: Mutex<HashMap<Action, Reply>>,
    sent: Mutex<Vec<Sent>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, action: Action, replies: Vec<Reply>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(action)
            .or_default()
            .extend(replies);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_for(&self, action: Action) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| s.request.action == action)
            .collect()
    }

    pub fn count(&self, action: Action) -> usize {
        self.sent_for(action).len()
    }

    fn next_reply(&self, action: Action) -> Reply {
        let next = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&action)
            .and_then(VecDeque::pop_front);
        let mut last = self.last.lock().unwrap();
        match next {
            Some(reply) => {
                last.insert(action, reply.clone());
                reply
            }
            None => last.get(&action).cloned().unwrap_or_else(|| Reply::status(404)),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        self.sent.lock().unwrap().push(Sent {
            request: request.clone(),
            at: Instant::now(),
        });

        match self.next_reply(request.action) {
            Reply::Respond(response) => Ok(response),
            Reply::Fail(err) => Err(err),
            Reply::Delayed(delay, response) => {
                tokio::time::sleep(delay).await;
                Ok(response)
            }
            Reply::Hang => std::future::pending().await,
        }
    }
}

pub const TIMEOUT: Duration = Duration::from_secs(30);

pub fn retry_policy() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(1_000),
        max_delay: Duration::from_millis(5_000),
    }
}

/// Session manager over the mock with an in-memory token slot
pub fn manager(
    transport: &Arc<MockTransport>,
    token: Option<&str>,
) -> (SessionManager, Arc<MemoryTokenStore>) {
    let tokens = Arc::new(match token {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::new(),
    });
    let api = ApiClient::new(transport.clone(), TIMEOUT);
    let store: Arc<dyn TokenStore> = tokens.clone();
    (SessionManager::new(api, store, retry_policy()), tokens)
}

pub fn driver_json(name: &str) -> Value {
    json!({ "name": name, "role": "driver", "email": format!("{}@example.com", name.to_lowercase()) })
}

pub fn admin_json(name: &str) -> Value {
    json!({ "name": name, "role": "admin" })
}

pub fn login_ok(user: Value, token: &str) -> Reply {
    Reply::ok(json!({ "success": true, "user": user, "sessionToken": token }))
}

pub fn check_auth_ok(user: Value) -> Reply {
    Reply::ok(json!({ "success": true, "user": user }))
}

//! Test doubles for the control plane

use crate::lifecycle::{
    ControlPlane, EXTENSION_ID_HEADER, EXTENSION_NAME_HEADER, Event, EventType, InitHook,
    InitOutcome, LifecycleError, Registration, Result,
};
use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

struct PlaneState {
    extension_id: String,
    register_status: StatusCode,
    events: Mutex<VecDeque<Value>>,
    registered_name: Mutex<Option<String>>,
    registered_body: Mutex<Option<Value>>,
    registrations: AtomicUsize,
    polls: AtomicUsize,
    rejected_polls: AtomicUsize,
}

/// An in-process HTTP control plane served by axum
///
/// Queued event bodies are handed out one per poll. Once the queue is empty
/// the poll is held open forever, like a real long poll with no event.
pub struct FakeControlPlane {
    address: SocketAddr,
    state: Arc<PlaneState>,
}

impl FakeControlPlane {
    pub async fn start(events: Vec<Value>) -> Self {
        Self::start_with_register_status(StatusCode::OK, events).await
    }

    pub async fn start_with_register_status(register_status: StatusCode, events: Vec<Value>) -> Self {
        let state = Arc::new(PlaneState {
            extension_id: uuid::Uuid::new_v4().to_string(),
            register_status,
            events: Mutex::new(events.into()),
            registered_name: Mutex::new(None),
            registered_body: Mutex::new(None),
            registrations: AtomicUsize::new(0),
            polls: AtomicUsize::new(0),
            rejected_polls: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/2020-01-01/extension/register", post(register))
            .route("/2020-01-01/extension/event/next", get(next_event))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { address, state }
    }

    /// `host:port` in the form the platform hands to the extension
    pub fn address(&self) -> String {
        self.address.to_string()
    }

    pub fn extension_id(&self) -> &str {
        &self.state.extension_id
    }

    pub fn registered_name(&self) -> Option<String> {
        self.state.registered_name.lock().unwrap().clone()
    }

    pub fn registered_body(&self) -> Option<Value> {
        self.state.registered_body.lock().unwrap().clone()
    }

    pub fn registrations(&self) -> usize {
        self.state.registrations.load(Ordering::SeqCst)
    }

    pub fn polls(&self) -> usize {
        self.state.polls.load(Ordering::SeqCst)
    }

    /// Polls that arrived without the identifier handed out at registration
    pub fn rejected_polls(&self) -> usize {
        self.state.rejected_polls.load(Ordering::SeqCst)
    }
}

async fn register(
    State(state): State<Arc<PlaneState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.registrations.fetch_add(1, Ordering::SeqCst);
    *state.registered_name.lock().unwrap() = headers
        .get(EXTENSION_NAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    *state.registered_body.lock().unwrap() = Some(body);

    if !state.register_status.is_success() {
        return (state.register_status, "registration refused").into_response();
    }

    (
        state.register_status,
        [(EXTENSION_ID_HEADER, state.extension_id.clone())],
        Json(json!({
            "functionName": "test-function",
            "functionVersion": "$LATEST",
            "handler": "index.handler",
        })),
    )
        .into_response()
}

async fn next_event(State(state): State<Arc<PlaneState>>, headers: HeaderMap) -> Response {
    let identifier = headers.get(EXTENSION_ID_HEADER).and_then(|v| v.to_str().ok());
    if identifier != Some(state.extension_id.as_str()) {
        state.rejected_polls.fetch_add(1, Ordering::SeqCst);
        return (StatusCode::FORBIDDEN, "unknown extension").into_response();
    }

    state.polls.fetch_add(1, Ordering::SeqCst);
    let next = state.events.lock().unwrap().pop_front();
    match next {
        Some(body) => Json(body).into_response(),
        None => std::future::pending().await,
    }
}

/// How a scripted poll should answer
pub enum Scripted {
    Event(EventType),
    Fail,
    /// Cancel the caller's token, then answer like a cancelled call
    CancelDuringPoll,
}

/// An in-memory control plane that replays a script and counts calls
pub struct ScriptedControlPlane {
    fail_registration: bool,
    script: Mutex<VecDeque<Scripted>>,
    registrations: AtomicUsize,
    polls: AtomicUsize,
}

impl ScriptedControlPlane {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            fail_registration: false,
            script: Mutex::new(script.into()),
            registrations: AtomicUsize::new(0),
            polls: AtomicUsize::new(0),
        }
    }

    pub fn failing_registration() -> Self {
        Self {
            fail_registration: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ControlPlane for ScriptedControlPlane {
    async fn register(&self, cancel: &CancellationToken, _name: &str) -> Result<Registration> {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        if cancel.is_cancelled() {
            return Err(LifecycleError::Cancelled);
        }
        if self.fail_registration {
            return Err(LifecycleError::registration("control plane returned 500"));
        }
        Ok(Registration {
            extension_id: "scripted".to_string(),
            ..Registration::default()
        })
    }

    async fn next_event(&self, cancel: &CancellationToken) -> Result<Event> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Event(event_type)) => Ok(Event::new(event_type)),
            Some(Scripted::Fail) => Err(LifecycleError::poll("control plane returned 500")),
            Some(Scripted::CancelDuringPoll) => {
                cancel.cancel();
                Err(LifecycleError::Cancelled)
            }
            None => {
                cancel.cancelled().await;
                Err(LifecycleError::Cancelled)
            }
        }
    }
}

/// An init hook that counts its calls and returns a fixed answer
pub struct CountingInit {
    fail: bool,
    calls: AtomicUsize,
}

impl CountingInit {
    pub fn succeeding() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InitHook for CountingInit {
    async fn initialize(&self) -> Result<InitOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(LifecycleError::init_failed("render failed"))
        } else {
            Ok(InitOutcome::Rendered { templates: 1 })
        }
    }
}

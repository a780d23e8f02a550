//! Extension lifecycle driver
//!
//! Drives the extension through its phases as an explicit state machine:
//!
//! ```text
//! Unregistered --register--> Registered --initialize--> Idle
//!                                                        |  ^
//!                                                   poll |  | INVOKE / other
//!                                                        v  |
//!                                  Terminated(Shutdown | Cancelled)
//! ```
//!
//! Every transition is a single call to [`Extension::step`], so each one can
//! be exercised on its own against a fake control plane.

use super::{
    ControlPlane, InitHook, InitOutcome, LifecycleError, Registration, Result, SkipInit,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Where the extension currently is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Nothing has been sent to the control plane yet
    Unregistered,
    /// Registration succeeded; initialization has not run
    Registered(Registration),
    /// Initialized and ready to poll for the next event
    Idle,
    /// Terminal; no further control-plane call is made
    Terminated(Termination),
}

/// Why the lifecycle ended cleanly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The control plane delivered a shutdown event
    Shutdown,
    /// The process was asked to stop (signal or internal cancellation)
    Cancelled,
}

/// An extension bound to a control plane and an initialization hook
///
/// # Example
///
/// ```rust,ignore
/// use template_lambda_extension::lifecycle::{Client, Extension, SignalWatcher};
/// use tokio_util::sync::CancellationToken;
///
/// let cancel = CancellationToken::new();
/// SignalWatcher::new(cancel.clone()).spawn();
///
/// let extension = Extension::builder(Client::new(&runtime_api)?)
///     .name("template-lambda-extension")
///     .init_hook(hook)
///     .cancellation(cancel)
///     .build();
///
/// let termination = extension.run().await?;
/// ```
pub struct Extension<C: ControlPlane> {
    control_plane: C,
    init_hook: Arc<dyn InitHook>,
    name: String,
    cancel: CancellationToken,
}

impl<C: ControlPlane> Extension<C> {
    /// Create a new extension builder
    pub fn builder(control_plane: C) -> ExtensionBuilder<C> {
        ExtensionBuilder::new(control_plane)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn control_plane(&self) -> &C {
        &self.control_plane
    }

    /// The token every blocking call of this extension observes
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Perform exactly one lifecycle transition
    ///
    /// `Terminated` is a fixed point. Errors are fatal: the caller is
    /// expected to stop driving the extension.
    pub async fn step(&self, phase: Phase) -> Result<Phase> {
        match phase {
            Phase::Unregistered => self.register().await,
            Phase::Registered(_) => self.initialize().await,
            Phase::Idle => self.poll().await,
            Phase::Terminated(termination) => Ok(Phase::Terminated(termination)),
        }
    }

    /// Drive the extension from registration until it terminates
    pub async fn run(&self) -> Result<Termination> {
        let mut phase = Phase::Unregistered;
        loop {
            phase = self.step(phase).await?;
            if let Phase::Terminated(termination) = phase {
                tracing::info!(?termination, "extension lifecycle finished");
                return Ok(termination);
            }
        }
    }

    async fn register(&self) -> Result<Phase> {
        tracing::info!(name = %self.name, "registering extension");
        match self.control_plane.register(&self.cancel, &self.name).await {
            Ok(registration) => {
                tracing::info!(
                    extension_id = %registration.extension_id,
                    function = registration.function_name.as_deref().unwrap_or("-"),
                    "extension registered"
                );
                Ok(Phase::Registered(registration))
            }
            Err(LifecycleError::Cancelled) => {
                tracing::info!("cancelled during registration");
                Ok(Phase::Terminated(Termination::Cancelled))
            }
            Err(e) => Err(e),
        }
    }

    async fn initialize(&self) -> Result<Phase> {
        match self.init_hook.initialize().await? {
            InitOutcome::Rendered { templates } => {
                tracing::info!(templates, "initialization successful");
            }
            InitOutcome::Skipped => {
                tracing::info!("initialization skipped: no templates configured");
            }
        }
        Ok(Phase::Idle)
    }

    async fn poll(&self) -> Result<Phase> {
        if self.cancel.is_cancelled() {
            return Ok(Phase::Terminated(Termination::Cancelled));
        }

        match self.control_plane.next_event(&self.cancel).await {
            Ok(event) if event.event_type.is_shutdown() => {
                tracing::info!(
                    reason = event.shutdown_reason.as_deref().unwrap_or("-"),
                    "received shutdown event"
                );
                Ok(Phase::Terminated(Termination::Shutdown))
            }
            Ok(event) => {
                tracing::debug!(
                    event_type = %event.event_type,
                    request_id = event.request_id.as_deref().unwrap_or("-"),
                    "received event"
                );
                Ok(Phase::Idle)
            }
            Err(LifecycleError::Cancelled) => Ok(Phase::Terminated(Termination::Cancelled)),
            Err(e) => Err(e),
        }
    }
}

/// Builder for [`Extension`]
pub struct ExtensionBuilder<C: ControlPlane> {
    control_plane: C,
    init_hook: Arc<dyn InitHook>,
    name: String,
    cancel: CancellationToken,
}

impl<C: ControlPlane> ExtensionBuilder<C> {
    /// Create a builder with a skipping init hook and a fresh token
    pub fn new(control_plane: C) -> Self {
        Self {
            control_plane,
            init_hook: Arc::new(SkipInit),
            name: env!("CARGO_PKG_NAME").to_string(),
            cancel: CancellationToken::new(),
        }
    }

    /// Set the name announced at registration
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the hook run once between registration and the first poll
    pub fn init_hook<H>(mut self, hook: H) -> Self
    where
        H: InitHook + 'static,
    {
        self.init_hook = Arc::new(hook);
        self
    }

    /// Share an existing cancellation token (e.g. one fed by a [`SignalWatcher`](super::SignalWatcher))
    pub fn cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn build(self) -> Extension<C> {
        Extension {
            control_plane: self.control_plane,
            init_hook: self.init_hook,
            name: self.name,
            cancel: self.cancel,
        }
    }
}

//! Lifecycle seams
//!
//! These traits define the collaborators the lifecycle driver talks to: the
//! control plane it registers with and polls, and the one-time
//! initialization hook that runs between registration and polling.

use super::{Event, Registration, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// The control plane an extension registers with and polls for events
///
/// Both calls must observe `cancel`: once it fires, an outstanding call
/// returns [`LifecycleError::Cancelled`](super::LifecycleError::Cancelled)
/// instead of waiting for the control plane.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Announce the extension and subscribe to invoke and shutdown events
    async fn register(&self, cancel: &CancellationToken, name: &str) -> Result<Registration>;

    /// Block until the control plane delivers the next lifecycle event
    async fn next_event(&self, cancel: &CancellationToken) -> Result<Event>;
}

/// What the initialization hook ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// Templates were rendered
    Rendered { templates: usize },
    /// Nothing was configured
    Skipped,
}

/// Runs exactly once after registration and before the first poll
///
/// # Example
///
/// ```rust,ignore
/// use template_lambda_extension::lifecycle::{InitHook, InitOutcome, Result};
/// use async_trait::async_trait;
///
/// struct Noop;
///
/// #[async_trait]
/// impl InitHook for Noop {
///     async fn initialize(&self) -> Result<InitOutcome> {
///         Ok(InitOutcome::Skipped)
///     }
/// }
/// ```
#[async_trait]
pub trait InitHook: Send + Sync {
    async fn initialize(&self) -> Result<InitOutcome>;
}

/// Hook used when no initialization work is wired in
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipInit;

#[async_trait]
impl InitHook for SkipInit {
    async fn initialize(&self) -> Result<InitOutcome> {
        Ok(InitOutcome::Skipped)
    }
}

#[async_trait]
impl<T: ControlPlane + ?Sized> ControlPlane for Arc<T> {
    async fn register(&self, cancel: &CancellationToken, name: &str) -> Result<Registration> {
        (**self).register(cancel, name).await
    }

    async fn next_event(&self, cancel: &CancellationToken) -> Result<Event> {
        (**self).next_event(cancel).await
    }
}

#[async_trait]
impl<T: InitHook + ?Sized> InitHook for Arc<T> {
    async fn initialize(&self) -> Result<InitOutcome> {
        (**self).initialize().await
    }
}

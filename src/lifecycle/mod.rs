//! Extension Lifecycle Module
//!
//! Registers the extension with the platform's control plane, runs the
//! one-time initialization hook, then long-polls for lifecycle events until a
//! shutdown event arrives or the process is cancelled.
//!
//! # Lifecycle Phases
//!
//! ```text
//! 1. Settings Loading
//!    ↓
//! 2. Register (POST /extension/register)   ← fatal on failure
//!    ↓
//! 3. InitHook (render templates once)      ← fatal on failure
//!    ↓
//! 4. Poll (GET /extension/event/next)      ← fatal on failure
//!    ↓            ↑
//!    INVOKE / other event
//!    ↓
//! 5. SHUTDOWN event or SIGTERM/SIGINT
//!    ↓
//! 6. Exit 0
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use template_lambda_extension::lifecycle::{Client, Extension, SignalWatcher};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() {
//!     let cancel = CancellationToken::new();
//!     SignalWatcher::new(cancel.clone()).spawn();
//!
//!     let client = Client::new("127.0.0.1:9001").unwrap();
//!     let extension = Extension::builder(client).cancellation(cancel).build();
//!     extension.run().await.unwrap();
//! }
//! ```

mod application;
mod client;
mod error;
mod event;
mod shutdown;
mod traits;

pub use application::{Extension, ExtensionBuilder, Phase, Termination};
pub use client::{Client, EXTENSION_ID_HEADER, EXTENSION_NAME_HEADER};
pub use error::{LifecycleError, Result};
pub use event::{Event, EventType, Registration};
pub use shutdown::{SignalWatcher, shutdown_signal};
pub use traits::{ControlPlane, InitHook, InitOutcome, SkipInit};

// wiredctl-api: Async Rust client for the Catalyst Center wired Layer-2 API

pub mod auth;
pub mod client;
pub mod error;
pub mod task;
pub mod transport;
pub mod types;

pub use auth::Credentials;
pub use client::CatalystClient;
pub use error::Error;
pub use task::{PollConfig, TaskOutcome, TaskPoller};
pub use transport::{TlsMode, TransportConfig};
pub use types::{ConfigStage, NetworkDevice, TaskId, TaskStatus};

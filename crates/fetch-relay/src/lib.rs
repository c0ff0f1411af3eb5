//! fetch-relay: fetch the URL named in `?url=` and hand its body back as text.

pub mod config;
pub mod error;
pub mod relay;
pub mod server;

pub use config::RelayConfig;
pub use error::{RelayError, RelayResult};
pub use server::{build_router, AppState};

//! Portal logic shared by the browser app and the CLI: gateway DTOs and
//! client, panel state, chaos fault orchestration, and display derivations.

pub mod chaos;
pub mod claims;
pub mod config;
pub mod dto;
pub mod error;
pub mod format;
pub mod gateway;
pub mod loadable;
pub mod overview;
pub mod poller;
pub mod policy;
pub mod portfolio;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use config::PortalConfig;
pub use error::{ClaimFormError, ConfigError, GatewayError};
pub use gateway::Gateway;
pub use loadable::Loadable;

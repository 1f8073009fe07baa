//! `turso-platform-http` is an async HTTP client for the Turso platform API.
//!
//! One [`TursoClient`] owns the configuration and connection pool; resource
//! clients borrow it:
//! - [`TursoClient::databases`]
//! - [`TursoClient::groups`]
//! - [`TursoClient::organizations`]
//!
//! Every response goes through the same classification, so a 403 inside an
//! organization is always [`TursoError::NotOrganizationMember`], a 404 is
//! always [`TursoError::NotFound`], and so on.

mod classify;
mod client;
mod decode;
mod error;
mod options;
mod request;
pub mod resources;
mod scope;
mod transport;
mod upload;

pub use classify::{classify, Call};
pub use client::{TursoClient, TursoClientBuilder};
pub use error::{ConfigError, Resource, TransportError, TursoError};
pub use options::{ClientOptions, DEFAULT_BASE_URL};
pub use resources::{PermissionsClaim, TokenOptions};
pub use scope::scoped_path;

pub type Result<T> = std::result::Result<T, TursoError>;

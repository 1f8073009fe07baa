//! Per-resource clients. Each borrows the shared transport and maps one
//! method onto one request.

mod api_tokens;
mod databases;
mod feedback;
mod groups;
mod instances;
mod invoices;
mod locations;
mod organizations;
mod plans;
mod subscriptions;
mod tokens;
mod users;

use serde::{Deserialize, Serialize};

pub use api_tokens::{ApiToken, ApiTokens, CreatedApiToken};
pub use databases::{
    CreateDatabase, CreatedDatabase, Database, DatabaseConfig, DatabaseSeed, DatabaseUsage,
    Databases, InstanceUsage, QueryStats, Stats, Usage,
};
pub use feedback::Feedback;
pub use groups::{Group, Groups};
pub use instances::{Instance, Instances};
pub use invoices::{Invoice, Invoices};
pub use locations::{Location, LocationDetails, Locations};
pub use organizations::{
    Invite, Member, Organization, OrganizationTotals, OrganizationUsage, Organizations,
};
pub use plans::{Plan, PlanQuotas, Plans};
pub use subscriptions::{Subscription, Subscriptions};
pub use tokens::Tokens;
pub use users::{User, Users};

/// Databases a token may `ATTACH` while reading.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    #[serde(rename = "databases", default, skip_serializing_if = "Vec::is_empty")]
    pub database_names: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionsClaim {
    pub read_attach: Entities,
}

/// Options for minting a database or group auth token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenOptions {
    /// Lifetime such as `"2w"` or `"never"`; empty leaves the server default.
    pub expiration: String,
    pub read_only: bool,
    pub permissions: Option<PermissionsClaim>,
}

impl TokenOptions {
    pub fn new(expiration: impl Into<String>) -> Self {
        Self {
            expiration: expiration.into(),
            ..Self::default()
        }
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn permissions(mut self, permissions: PermissionsClaim) -> Self {
        self.permissions = Some(permissions);
        self
    }

    fn query(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("expiration", &self.expiration);
        if self.read_only {
            query.append_pair("authorization", "read-only");
        }
        query.finish()
    }

    fn body(&self) -> TokenRequest<'_> {
        TokenRequest {
            permissions: self.permissions.as_ref(),
        }
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    permissions: Option<&'a PermissionsClaim>,
}

#[derive(Deserialize)]
struct JwtResponse {
    jwt: String,
}

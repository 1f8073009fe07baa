use std::fmt;

use reqwest::StatusCode;

/// Kind of platform resource an operation acts on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Resource {
    ApiToken,
    Database,
    Group,
    Instance,
    Invite,
    Invoice,
    Location,
    Member,
    Organization,
    Plan,
    Subscription,
    Token,
    User,
    Feedback,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ApiToken => "api token",
            Self::Database => "database",
            Self::Group => "group",
            Self::Instance => "instance",
            Self::Invite => "invite",
            Self::Invoice => "invoice",
            Self::Location => "location",
            Self::Member => "member",
            Self::Organization => "organization",
            Self::Plan => "plan",
            Self::Subscription => "subscription",
            Self::Token => "token",
            Self::User => "user",
            Self::Feedback => "feedback",
        };
        f.write_str(name)
    }
}

/// Invalid client configuration, reported when the client is constructed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no API token set")]
    MissingToken,
    #[error("no base URL set")]
    MissingBaseUrl,
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("could not build HTTP client: {0}")]
    HttpClient(reqwest::Error),
    #[error("missing {0} environment variable")]
    MissingEnv(&'static str),
}

/// Network or I/O layer cause of a failed round trip.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("could not encode request body: {0}")]
    Encode(serde_json::Error),
    #[error("invalid request URL '{path}': {source}")]
    Url {
        path: String,
        #[source]
        source: url::ParseError,
    },
}

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum TursoError {
    /// Client construction failed.
    #[error("invalid client configuration: {0}")]
    Config(#[from] ConfigError),
    /// The request never produced a response (DNS, TLS, timeout, file read...).
    #[error("failed to {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: TransportError,
    },
    /// The response body did not match the expected shape.
    #[error("failed to {operation}: could not decode response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// 403 while an organization scope is configured.
    #[error("failed to {operation}: not a member of organization {organization}")]
    NotOrganizationMember {
        operation: &'static str,
        organization: String,
    },
    #[error("failed to {operation}: {resource}{} not found", display_name(.name))]
    NotFound {
        operation: &'static str,
        resource: Resource,
        name: Option<String>,
    },
    #[error("failed to {operation}: {resource} name{} is not available", display_quoted(.name))]
    NameUnavailable {
        operation: &'static str,
        resource: Resource,
        name: Option<String>,
    },
    #[error("failed to {operation}: payment required, upgrade your plan")]
    PaymentRequired { operation: &'static str },
    /// Any other non-200 response, with the server message when it sent one.
    #[error("failed to {operation}: {status}: {message}")]
    Api {
        operation: &'static str,
        status: StatusCode,
        message: String,
    },
    /// The operation only exists inside an organization and none is configured.
    #[error("failed to {operation}: no organization configured")]
    MissingOrganization { operation: &'static str },
}

impl TursoError {
    /// HTTP status received from the platform, if the request got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::NotOrganizationMember { .. } => Some(StatusCode::FORBIDDEN),
            Self::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            Self::NameUnavailable { .. } => Some(StatusCode::UNPROCESSABLE_ENTITY),
            Self::PaymentRequired { .. } => Some(StatusCode::PAYMENT_REQUIRED),
            Self::Api { status, .. } => Some(*status),
            Self::Transport {
                source: TransportError::Http(err),
                ..
            } => err.status(),
            _ => None,
        }
    }

    /// Returns `true` when the request was aborted by the configured timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                source: TransportError::Http(err),
                ..
            } if err.is_timeout()
        )
    }

    pub(crate) fn transport(operation: &'static str, source: impl Into<TransportError>) -> Self {
        Self::Transport {
            operation,
            source: source.into(),
        }
    }
}

fn display_name(name: &Option<String>) -> String {
    name.as_deref()
        .map(|name| format!(" {name}"))
        .unwrap_or_default()
}

fn display_quoted(name: &Option<String>) -> String {
    name.as_deref()
        .map(|name| format!(" '{name}'"))
        .unwrap_or_default()
}

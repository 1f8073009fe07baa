use reqwest::StatusCode;
use serde::Deserialize;

use crate::{Resource, TursoError};

/// Describes the operation a response belongs to, so a failure can name it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub operation: &'static str,
    pub resource: Resource,
    pub name: Option<String>,
}

impl Call {
    pub fn new(operation: &'static str, resource: Resource) -> Self {
        Self {
            operation,
            resource,
            name: None,
        }
    }

    /// Attaches the identifier the caller asked for.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorField,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Message(String),
    Nested { message: String },
}

/// Maps a completed exchange onto the crate's error taxonomy.
///
/// Order matters: the membership check must precede the generic status
/// ladder because a bare 403 cannot tell "wrong organization" from
/// "insufficient role".
pub fn classify(
    call: &Call,
    organization: Option<&str>,
    status: StatusCode,
    body: &[u8],
) -> Result<(), TursoError> {
    let operation = call.operation;
    let err = match status {
        StatusCode::OK => return Ok(()),
        StatusCode::FORBIDDEN if organization.is_some_and(|org| !org.is_empty()) => {
            TursoError::NotOrganizationMember {
                operation,
                organization: organization.unwrap_or_default().to_owned(),
            }
        }
        StatusCode::NOT_FOUND => TursoError::NotFound {
            operation,
            resource: call.resource,
            name: call.name.clone(),
        },
        StatusCode::UNPROCESSABLE_ENTITY => TursoError::NameUnavailable {
            operation,
            resource: call.resource,
            name: call.name.clone(),
        },
        StatusCode::PAYMENT_REQUIRED => TursoError::PaymentRequired { operation },
        _ => TursoError::Api {
            operation,
            status,
            message: error_message(status, body),
        },
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(
        operation,
        status = status.as_u16(),
        "request rejected: {err}"
    );

    Err(err)
}

fn error_message(status: StatusCode, body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: ErrorField::Message(message) | ErrorField::Nested { message },
        }) if !message.is_empty() => message,
        _ => status
            .canonical_reason()
            .map(str::to_owned)
            .unwrap_or_else(|| status.as_str().to_owned()),
    }
}

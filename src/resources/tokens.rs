use serde::Deserialize;

use crate::{classify::Call, decode::decode_body, transport::Transport, Resource, Result};

/// Client for the caller's own session tokens.
pub struct Tokens<'a> {
    transport: &'a Transport,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Checks the configured token and returns its expiry as a Unix timestamp.
    pub async fn validate(&self) -> Result<i64> {
        #[derive(Deserialize)]
        struct Response {
            exp: i64,
        }

        let call = Call::new("validate token", Resource::Token);
        let body = self.transport.get(&call, "/v1/auth/validate").await?;
        decode_body::<Response>(call.operation, &body).map(|response| response.exp)
    }

    /// Invalidates every session token issued before now and returns the
    /// Unix timestamp new tokens are valid from.
    pub async fn invalidate(&self) -> Result<i64> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(rename = "validFrom", alias = "valid_from")]
            valid_from: i64,
        }

        let call = Call::new("invalidate sessions", Resource::Token);
        let body = self.transport.post(&call, "/v1/auth/invalidate").await?;
        decode_body::<Response>(call.operation, &body).map(|response| response.valid_from)
    }
}

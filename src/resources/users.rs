use serde::{Deserialize, Serialize};

use crate::{classify::Call, decode::decode_field, transport::Transport, Resource, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub username: String,
    pub plan: String,
}

pub struct Users<'a> {
    transport: &'a Transport,
}

impl<'a> Users<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// The user owning the configured token.
    pub async fn current(&self) -> Result<User> {
        let call = Call::new("get current user", Resource::User);
        let body = self.transport.get(&call, "/v1/current-user").await?;
        decode_field(call.operation, &body, "user")
    }
}

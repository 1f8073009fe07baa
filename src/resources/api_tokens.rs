use serde::{Deserialize, Serialize};

use crate::{classify::Call, decode::decode_field, transport::Transport, Resource, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiToken {
    #[serde(alias = "dbId")]
    pub id: String,
    #[serde(alias = "Name")]
    pub name: String,
    /// Numeric id of the user owning the token.
    #[serde(rename = "Owner", alias = "owner")]
    pub owner: u64,
    /// Public half of the signing key; base64 on the wire.
    #[serde(rename = "PubKey", alias = "pubKey", with = "base64_bytes")]
    pub pub_key: Vec<u8>,
}

/// A freshly minted token. `value` is only ever returned once.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CreatedApiToken {
    pub name: String,
    pub id: String,
    pub value: String,
}

/// Client for platform API tokens (`/auth/api-tokens`).
pub struct ApiTokens<'a> {
    transport: &'a Transport,
}

impl<'a> ApiTokens<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Lists tokens without their secret values.
    pub async fn list(&self) -> Result<Vec<ApiToken>> {
        let call = Call::new("list api tokens", Resource::ApiToken);
        let body = self.transport.get(&call, "/v1/auth/api-tokens").await?;
        decode_field(call.operation, &body, "tokens")
    }

    /// Mints token `name`.
    pub async fn create(&self, name: &str) -> Result<CreatedApiToken> {
        let call = Call::new("create api token", Resource::ApiToken).named(name);
        let body = self
            .transport
            .post(&call, &format!("/v2/auth/api-tokens/{name}"))
            .await?;
        decode_field(call.operation, &body, "token")
    }

    /// Revokes token `name`. It stops working immediately.
    pub async fn revoke(&self, name: &str) -> Result<()> {
        let call = Call::new("revoke api token", Resource::ApiToken).named(name);
        self.transport
            .delete(&call, &format!("/v1/auth/api-tokens/{name}"))
            .await?;
        Ok(())
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<u8>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(encoded) => STANDARD.decode(encoded).map_err(D::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}

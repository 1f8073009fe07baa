use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    classify::Call,
    decode::{decode_body, decode_field},
    transport::Transport,
    Resource, Result,
};

/// Geo-routing endpoint that reports the region nearest to the caller.
const CLOSEST_REGION_URL: &str = "https://region.turso.io";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDetails {
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub closest: Vec<Location>,
}

pub struct Locations<'a> {
    transport: &'a Transport,
}

impl<'a> Locations<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Location codes mapped to their descriptions.
    pub async fn list(&self) -> Result<BTreeMap<String, String>> {
        let call = Call::new("list locations", Resource::Location);
        let body = self.transport.get(&call, "/v1/locations").await?;
        decode_field(call.operation, &body, "locations")
    }

    /// Details of location `code`.
    pub async fn get(&self, code: &str) -> Result<LocationDetails> {
        let call = Call::new("get location", Resource::Location).named(code);
        let body = self
            .transport
            .get(&call, &format!("/v1/locations/{code}"))
            .await?;
        decode_field(call.operation, &body, "location")
    }

    /// Code of the location closest to this machine.
    pub async fn closest(&self) -> Result<String> {
        #[derive(Deserialize)]
        struct Response {
            server: String,
        }

        let call = Call::new("get closest location", Resource::Location);
        let body = self.transport.get(&call, CLOSEST_REGION_URL).await?;
        decode_body::<Response>(call.operation, &body).map(|response| response.server)
    }
}

use serde::{Deserialize, Serialize};

use crate::{classify::Call, decode::decode_field, transport::Transport, Resource, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanQuotas {
    pub rows_read: u64,
    pub rows_written: u64,
    pub databases: u64,
    pub bytes_synced: u64,
    pub locations: u64,
    pub storage: u64,
    pub groups: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plan {
    pub name: String,
    pub price: String,
    pub quotas: PlanQuotas,
}

pub struct Plans<'a> {
    transport: &'a Transport,
}

impl<'a> Plans<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Lists the plans available to subscribe to.
    pub async fn list(&self) -> Result<Vec<Plan>> {
        let call = Call::new("list plans", Resource::Plan);
        let body = self.transport.get(&call, "/v1/plans").await?;
        decode_field(call.operation, &body, "plans")
    }
}

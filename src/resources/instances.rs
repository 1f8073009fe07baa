use serde::{Deserialize, Serialize};

use crate::{classify::Call, decode::decode_field, transport::Transport, Resource, Result};

/// A replica of a database in one location.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Instance {
    pub uuid: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub region: String,
    pub hostname: String,
}

/// Client for `/databases/{db}/instances`.
pub struct Instances<'a> {
    transport: &'a Transport,
}

impl<'a> Instances<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    fn path(&self, database: &str, suffix: &str) -> String {
        self.transport
            .scoped(&format!("/databases/{database}/instances{suffix}"))
    }

    /// Lists the replicas of `database`.
    pub async fn list(&self, database: &str) -> Result<Vec<Instance>> {
        let call = Call::new("list instances", Resource::Database).named(database);
        let body = self.transport.get(&call, &self.path(database, "")).await?;
        decode_field(call.operation, &body, "instances")
    }

    /// Adds a replica of `database` in `location`.
    pub async fn create(&self, database: &str, location: &str) -> Result<Instance> {
        #[derive(Serialize)]
        struct Body<'a> {
            location: &'a str,
        }

        let call = Call::new("create instance", Resource::Database).named(database);
        let body = self
            .transport
            .post_json(&call, &self.path(database, ""), &Body { location })
            .await?;
        decode_field(call.operation, &body, "instance")
    }

    /// Removes one replica.
    pub async fn delete(&self, database: &str, instance: &str) -> Result<()> {
        let call = Call::new("delete instance", Resource::Instance).named(instance);
        self.transport
            .delete(&call, &self.path(database, &format!("/{instance}")))
            .await?;
        Ok(())
    }

    /// Waits until `instance` is ready to serve requests.
    pub async fn wait(&self, database: &str, instance: &str) -> Result<()> {
        let call = Call::new("wait for instance", Resource::Instance).named(instance);
        self.transport
            .get(&call, &self.path(database, &format!("/{instance}/wait")))
            .await?;
        Ok(())
    }
}

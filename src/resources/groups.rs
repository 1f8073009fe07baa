use serde::{Deserialize, Serialize};

use super::{JwtResponse, TokenOptions};
use crate::{
    classify::Call,
    decode::{decode_body, decode_field},
    transport::Transport,
    Resource, Result,
};

/// Set of databases replicated to the same locations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub primary: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub version: String,
}

/// Client for `/groups`, scoped to the configured organization.
pub struct Groups<'a> {
    transport: &'a Transport,
}

impl<'a> Groups<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    fn path(&self, suffix: &str) -> String {
        self.transport.scoped(&format!("/groups{suffix}"))
    }

    /// Lists groups in the configured organization.
    pub async fn list(&self) -> Result<Vec<Group>> {
        let call = Call::new("list groups", Resource::Group);
        let body = self.transport.get(&call, &self.path("")).await?;
        decode_field(call.operation, &body, "groups")
    }

    pub async fn get(&self, name: &str) -> Result<Group> {
        let call = Call::new("get group", Resource::Group).named(name);
        let body = self
            .transport
            .get(&call, &self.path(&format!("/{name}")))
            .await?;
        decode_field(call.operation, &body, "group")
    }

    /// Creates group `name` with its primary in `location`. An empty
    /// `version` leaves the server default.
    pub async fn create(&self, name: &str, location: &str, version: &str) -> Result<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
            location: &'a str,
            #[serde(skip_serializing_if = "str::is_empty")]
            version: &'a str,
        }

        let call = Call::new("create group", Resource::Group).named(name);
        let payload = Body {
            name,
            location,
            version,
        };
        self.transport
            .post_json(&call, &self.path(""), &payload)
            .await?;
        Ok(())
    }

    /// Deletes group `name` along with its databases.
    pub async fn delete(&self, name: &str) -> Result<()> {
        let call = Call::new("delete group", Resource::Group).named(name);
        self.transport
            .delete(&call, &self.path(&format!("/{name}")))
            .await?;
        Ok(())
    }

    /// Brings an archived group back online.
    pub async fn unarchive(&self, name: &str) -> Result<()> {
        let call = Call::new("unarchive group", Resource::Group).named(name);
        self.transport
            .post(&call, &self.path(&format!("/{name}/unarchive")))
            .await?;
        Ok(())
    }

    /// Adds a replica location to group `name`.
    pub async fn add_location(&self, name: &str, location: &str) -> Result<()> {
        let call = Call::new("add group location", Resource::Group).named(name);
        self.transport
            .post(&call, &self.path(&format!("/{name}/locations/{location}")))
            .await?;
        Ok(())
    }

    pub async fn remove_location(&self, name: &str, location: &str) -> Result<()> {
        let call = Call::new("remove group location", Resource::Group).named(name);
        self.transport
            .delete(&call, &self.path(&format!("/{name}/locations/{location}")))
            .await?;
        Ok(())
    }

    /// Blocks server-side until `location` has caught up with the primary.
    pub async fn wait_location(&self, name: &str, location: &str) -> Result<()> {
        let call = Call::new("wait for group location", Resource::Group).named(name);
        self.transport
            .get(
                &call,
                &self.path(&format!("/{name}/locations/{location}/wait")),
            )
            .await?;
        Ok(())
    }

    /// Mints an auth token valid for every database in group `name`.
    pub async fn token(&self, name: &str, options: &TokenOptions) -> Result<String> {
        let call = Call::new("create group token", Resource::Group).named(name);
        let path = self.path(&format!("/{name}/auth/tokens?{}", options.query()));
        let body = self
            .transport
            .post_json(&call, &path, &options.body())
            .await?;
        decode_body::<JwtResponse>(call.operation, &body).map(|token| token.jwt)
    }

    /// Invalidates every token issued for group `name`.
    pub async fn rotate(&self, name: &str) -> Result<()> {
        let call = Call::new("rotate group keys", Resource::Group).named(name);
        self.transport
            .post(&call, &self.path(&format!("/{name}/auth/rotate")))
            .await?;
        Ok(())
    }

    /// Upgrades the group to `version`. Empty arguments are left unchanged.
    pub async fn update(&self, name: &str, version: &str, extensions: &str) -> Result<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            #[serde(skip_serializing_if = "str::is_empty")]
            version: &'a str,
            #[serde(skip_serializing_if = "str::is_empty")]
            extensions: &'a str,
        }

        let call = Call::new("update group", Resource::Group).named(name);
        let payload = Body {
            version,
            extensions,
        };
        self.transport
            .post_json(&call, &self.path(&format!("/{name}/update")), &payload)
            .await?;
        Ok(())
    }

    /// Moves group `name` to organization `to`.
    pub async fn transfer(&self, name: &str, to: &str) -> Result<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            organization: &'a str,
        }

        let call = Call::new("transfer group", Resource::Group).named(name);
        self.transport
            .post_json(
                &call,
                &self.path(&format!("/{name}/transfer")),
                &Body { organization: to },
            )
            .await?;
        Ok(())
    }
}

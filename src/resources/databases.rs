use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncRead;

use super::{JwtResponse, TokenOptions};
use crate::{
    classify::Call,
    decode::{decode_body, decode_field},
    transport::Transport,
    Resource, Result,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    #[serde(rename = "dbId", alias = "DbId")]
    pub id: String,
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(rename = "primaryRegion", default)]
    pub primary_region: String,
    #[serde(rename = "Hostname", alias = "hostname", default)]
    pub hostname: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub sleeping: bool,
}

/// Initial content for a new database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DatabaseSeed {
    /// `"database"`, `"dump"` or `"database_upload"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Source database name when copying.
    #[serde(rename = "value", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// RFC 3339 point in time to branch from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CreateDatabase {
    pub name: String,
    pub location: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub extensions: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<DatabaseSeed>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub schema: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_schema: bool,
}

impl CreateDatabase {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            ..Self::default()
        }
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn seed(mut self, seed: DatabaseSeed) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CreatedDatabase {
    pub database: Database,
    #[serde(default)]
    pub username: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct QueryStats {
    pub query: String,
    pub rows_read: i64,
    pub rows_written: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub top_queries: Vec<QueryStats>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub rows_read: u64,
    pub rows_written: u64,
    #[serde(rename = "storage_bytes")]
    pub storage_bytes_used: u64,
    pub bytes_synced: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct InstanceUsage {
    #[serde(default)]
    pub uuid: String,
    pub usage: Usage,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct DatabaseUsage {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub instances: Vec<InstanceUsage>,
    pub usage: Usage,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub allow_attach: bool,
}

/// Client for `/databases`, scoped to the configured organization.
pub struct Databases<'a> {
    transport: &'a Transport,
}

impl<'a> Databases<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    fn path(&self, suffix: &str) -> String {
        self.transport.scoped(&format!("/databases{suffix}"))
    }

    /// Lists databases in the configured organization.
    pub async fn list(&self) -> Result<Vec<Database>> {
        let call = Call::new("list databases", Resource::Database);
        let body = self.transport.get(&call, &self.path("")).await?;
        decode_field(call.operation, &body, "databases")
    }

    /// Creates a database; a taken name yields [`crate::TursoError::NameUnavailable`].
    pub async fn create(&self, request: &CreateDatabase) -> Result<CreatedDatabase> {
        let call = Call::new("create database", Resource::Database).named(&request.name);
        let body = self
            .transport
            .post_json(&call, &self.path(""), request)
            .await?;
        decode_body(call.operation, &body)
    }

    /// Destroys database `name` and all of its instances.
    pub async fn delete(&self, name: &str) -> Result<()> {
        let call = Call::new("delete database", Resource::Database).named(name);
        self.transport
            .delete(&call, &self.path(&format!("/{name}")))
            .await?;
        Ok(())
    }

    /// Uploads a SQLite file as the content of database `name`.
    pub async fn seed(&self, name: &str, file: impl AsRef<Path>) -> Result<()> {
        let call = Call::new("seed database", Resource::Database).named(name);
        self.transport
            .upload(&call, &self.path(&format!("/{name}/seed")), file.as_ref())
            .await?;
        Ok(())
    }

    /// Uploads a SQL dump and returns the URL to pass as a dump seed.
    pub async fn upload_dump(&self, file: impl AsRef<Path>) -> Result<String> {
        let call = Call::new("upload database dump", Resource::Database);
        let body = self
            .transport
            .upload(&call, &self.path("/dumps"), file.as_ref())
            .await?;
        dump_url(call.operation, &body)
    }

    /// Like [`Databases::upload_dump`] but streams from any reader.
    pub async fn upload_dump_reader<R>(&self, reader: R, filename: &str) -> Result<String>
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        let call = Call::new("upload database dump", Resource::Database);
        let body = self
            .transport
            .upload_reader(&call, &self.path("/dumps"), reader, filename)
            .await?;
        dump_url(call.operation, &body)
    }

    /// Mints an auth token for database `name`.
    pub async fn token(&self, name: &str, options: &TokenOptions) -> Result<String> {
        let call = Call::new("create database token", Resource::Database).named(name);
        let path = self.path(&format!("/{name}/auth/tokens?{}", options.query()));
        let body = self
            .transport
            .post_json(&call, &path, &options.body())
            .await?;
        decode_body::<JwtResponse>(call.operation, &body).map(|token| token.jwt)
    }

    /// Invalidates every token issued for database `name`.
    pub async fn rotate(&self, name: &str) -> Result<()> {
        let call = Call::new("rotate database keys", Resource::Database).named(name);
        self.transport
            .post(&call, &self.path(&format!("/{name}/auth/rotate")))
            .await?;
        Ok(())
    }

    /// Upgrades the database to the latest server version.
    pub async fn update(&self, name: &str, group: bool) -> Result<()> {
        let call = Call::new("update database", Resource::Database).named(name);
        let mut path = self.path(&format!("/{name}/update"));
        if group {
            path.push_str("?group=true");
        }
        self.transport.post(&call, &path).await?;
        Ok(())
    }

    /// Most expensive recent queries of database `name`.
    pub async fn stats(&self, name: &str) -> Result<Stats> {
        let call = Call::new("get database stats", Resource::Database).named(name);
        let body = self
            .transport
            .get(&call, &self.path(&format!("/{name}/stats")))
            .await?;
        decode_body(call.operation, &body)
    }

    /// Moves database `name` to organization `to`.
    pub async fn transfer(&self, name: &str, to: &str) -> Result<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            org: &'a str,
        }

        let call = Call::new("transfer database", Resource::Database).named(name);
        self.transport
            .post_json(
                &call,
                &self.path(&format!("/{name}/transfer")),
                &Body { org: to },
            )
            .await?;
        Ok(())
    }

    /// Resumes a database that was put to sleep for inactivity.
    pub async fn wakeup(&self, name: &str) -> Result<()> {
        let call = Call::new("wake up database", Resource::Database).named(name);
        self.transport
            .post(&call, &self.path(&format!("/{name}/wakeup")))
            .await?;
        Ok(())
    }

    /// Row and storage usage, per instance and in total.
    pub async fn usage(&self, name: &str) -> Result<DatabaseUsage> {
        let call = Call::new("get database usage", Resource::Database).named(name);
        let body = self
            .transport
            .get(&call, &self.path(&format!("/{name}/usage")))
            .await?;
        decode_field(call.operation, &body, "database")
    }

    pub async fn config(&self, name: &str) -> Result<DatabaseConfig> {
        let call = Call::new("get database config", Resource::Database).named(name);
        let body = self
            .transport
            .get(&call, &self.path(&format!("/{name}/configuration")))
            .await?;
        decode_body(call.operation, &body)
    }

    /// Replaces the configuration of database `name`.
    pub async fn update_config(&self, name: &str, config: &DatabaseConfig) -> Result<()> {
        let call = Call::new("update database config", Resource::Database).named(name);
        self.transport
            .patch_json(&call, &self.path(&format!("/{name}/configuration")), config)
            .await?;
        Ok(())
    }
}

fn dump_url(operation: &'static str, body: &[u8]) -> Result<String> {
    decode_field(operation, body, "dump_url")
}

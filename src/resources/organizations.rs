use serde::{Deserialize, Serialize};

use super::DatabaseUsage;
use crate::{
    classify::Call, decode::decode_field, transport::Transport, Resource, Result, TursoError,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stripe_id: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub overages: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OrganizationTotals {
    pub rows_read: u64,
    pub rows_written: u64,
    #[serde(rename = "storage_bytes")]
    pub storage_bytes_used: u64,
    pub bytes_synced: u64,
    pub databases: u64,
    pub locations: u64,
    pub groups: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OrganizationUsage {
    pub uuid: String,
    pub usage: OrganizationTotals,
    pub databases: Vec<DatabaseUsage>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Member {
    #[serde(rename = "username")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub role: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invite {
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub role: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub accepted: bool,
}

/// Client for organization management, membership and invites.
pub struct Organizations<'a> {
    transport: &'a Transport,
}

impl<'a> Organizations<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Path under the configured organization. Membership endpoints have no
    /// unscoped form, so a missing organization fails before any request.
    fn member_path(&self, operation: &'static str, suffix: &str) -> Result<String> {
        let org = self
            .transport
            .organization()
            .ok_or(TursoError::MissingOrganization { operation })?;
        Ok(format!("/v1/organizations/{org}{suffix}"))
    }

    /// Lists every organization the token's user belongs to.
    pub async fn list(&self) -> Result<Vec<Organization>> {
        let call = Call::new("list organizations", Resource::Organization);
        let body = self.transport.get(&call, "/v2/organizations").await?;
        decode_field(call.operation, &body, "organizations")
    }

    /// Creates organization `name`; `dry_run` only validates the request.
    pub async fn create(
        &self,
        name: &str,
        stripe_id: Option<&str>,
        dry_run: bool,
    ) -> Result<Organization> {
        let call = Call::new("create organization", Resource::Organization).named(name);
        let payload = Organization {
            name: name.to_owned(),
            stripe_id: stripe_id.unwrap_or_default().to_owned(),
            ..Organization::default()
        };
        let body = self
            .transport
            .post_json(
                &call,
                &format!("/v1/organizations?dry_run={dry_run}"),
                &payload,
            )
            .await?;
        decode_field(call.operation, &body, "org")
    }

    /// Deletes organization `slug`.
    pub async fn delete(&self, slug: &str) -> Result<()> {
        let call = Call::new("delete organization", Resource::Organization).named(slug);
        self.transport
            .delete(&call, &format!("/v1/organizations/{slug}"))
            .await?;
        Ok(())
    }

    /// Usage totals for the configured organization (or the personal account).
    pub async fn usage(&self) -> Result<OrganizationUsage> {
        let call = Call::new("get organization usage", Resource::Organization);
        let body = self
            .transport
            .get(&call, &self.transport.scoped("/usage"))
            .await?;
        decode_field(call.operation, &body, "organization")
    }

    /// Allows or forbids usage beyond the plan quota.
    pub async fn set_overages(&self, slug: &str, enabled: bool) -> Result<()> {
        #[derive(Serialize)]
        struct Body {
            overages: bool,
        }

        let call = Call::new("set overages", Resource::Organization).named(slug);
        self.transport
            .patch_json(
                &call,
                &format!("/v1/organizations/{slug}"),
                &Body { overages: enabled },
            )
            .await?;
        Ok(())
    }

    /// Lists members of the configured organization.
    pub async fn members(&self) -> Result<Vec<Member>> {
        let call = Call::new("list members", Resource::Member);
        let path = self.member_path(call.operation, "/members")?;
        let body = self.transport.get(&call, &path).await?;
        decode_field(call.operation, &body, "members")
    }

    /// Adds `username` with `role` (`"admin"` or `"member"`).
    pub async fn add_member(&self, username: &str, role: &str) -> Result<()> {
        let call = Call::new("add member", Resource::Member).named(username);
        let path = self.member_path(call.operation, "/members")?;
        let payload = Member {
            name: username.to_owned(),
            role: role.to_owned(),
        };
        self.transport.post_json(&call, &path, &payload).await?;
        Ok(())
    }

    pub async fn remove_member(&self, username: &str) -> Result<()> {
        let call = Call::new("remove member", Resource::Member).named(username);
        let path = self.member_path(call.operation, &format!("/members/{username}"))?;
        self.transport.delete(&call, &path).await?;
        Ok(())
    }

    /// Sends an invite email to `email`.
    pub async fn invite(&self, email: &str, role: &str) -> Result<()> {
        let call = Call::new("invite member", Resource::Invite).named(email);
        let path = self.member_path(call.operation, "/invite")?;
        let payload = Invite {
            email: email.to_owned(),
            role: role.to_owned(),
            accepted: false,
        };
        self.transport.post_json(&call, &path, &payload).await?;
        Ok(())
    }

    pub async fn invites(&self) -> Result<Vec<Invite>> {
        let call = Call::new("list invites", Resource::Invite);
        let path = self.member_path(call.operation, "/invites")?;
        let body = self.transport.get(&call, &path).await?;
        decode_field(call.operation, &body, "invites")
    }

    /// Withdraws a pending invite.
    pub async fn delete_invite(&self, email: &str) -> Result<()> {
        let call = Call::new("delete invite", Resource::Invite).named(email);
        let path = self.member_path(call.operation, &format!("/invites/{email}"))?;
        self.transport.delete(&call, &path).await?;
        Ok(())
    }
}

use serde::{Deserialize, Serialize};

use crate::{classify::Call, decode::decode_field, transport::Transport, Resource, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subscription {
    pub plan: String,
    pub timeline: String,
    pub overages: bool,
}

/// Client for the billing subscription of the configured organization.
pub struct Subscriptions<'a> {
    transport: &'a Transport,
}

impl<'a> Subscriptions<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Current plan and billing cycle.
    pub async fn get(&self) -> Result<Subscription> {
        let call = Call::new("get subscription", Resource::Subscription);
        let body = self
            .transport
            .get(&call, &self.transport.scoped("/subscription"))
            .await?;
        decode_field(call.operation, &body, "subscription")
    }

    /// Switches to `plan`. Fails with [`crate::TursoError::PaymentRequired`]
    /// when no payment method is on file.
    pub async fn update(
        &self,
        plan: &str,
        timeline: Option<&str>,
        overages: Option<bool>,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            plan: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            timeline: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            overages: Option<bool>,
        }

        let call = Call::new("update subscription", Resource::Subscription).named(plan);
        let payload = Body {
            plan,
            timeline,
            overages,
        };
        self.transport
            .post_json(&call, &self.transport.scoped("/subscription"), &payload)
            .await?;
        Ok(())
    }
}

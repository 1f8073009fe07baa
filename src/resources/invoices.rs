use serde::{Deserialize, Serialize};

use crate::{classify::Call, decode::decode_field, transport::Transport, Resource, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invoice {
    #[serde(rename = "invoice_number")]
    pub number: String,
    #[serde(rename = "amount_due")]
    pub amount: String,
    pub due_date: String,
    pub paid_at: String,
    pub payment_failed_at: String,
    #[serde(rename = "invoice_pdf")]
    pub pdf_url: String,
}

/// Client for `/invoices`, scoped to the configured organization.
pub struct Invoices<'a> {
    transport: &'a Transport,
}

impl<'a> Invoices<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Lists invoices of the configured organization.
    pub async fn list(&self) -> Result<Vec<Invoice>> {
        let call = Call::new("list invoices", Resource::Invoice);
        let body = self
            .transport
            .get(&call, &self.transport.scoped("/invoices"))
            .await?;
        decode_field(call.operation, &body, "invoices")
    }
}

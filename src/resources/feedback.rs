use serde::Serialize;

use crate::{classify::Call, transport::Transport, Resource, Result};

pub struct Feedback<'a> {
    transport: &'a Transport,
}

impl<'a> Feedback<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Sends product feedback to the platform team.
    pub async fn submit(&self, summary: &str, feedback: &str) -> Result<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            summary: &'a str,
            feedback: &'a str,
        }

        let call = Call::new("submit feedback", Resource::Feedback);
        self.transport
            .post_json(&call, "/v1/feedback", &Body { summary, feedback })
            .await?;
        Ok(())
    }
}

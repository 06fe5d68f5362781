//! Reply draft composition.

use crate::config::DraftTemplate;
use crate::transport::{MailItem, MailTransport, Result};

/// Builds and saves the reply draft for an eligible message.
///
/// Saving twice creates two drafts; callers guarantee at most one call per message.
#[derive(Debug, Clone, Default)]
pub struct DraftComposer {
    template: DraftTemplate,
}

impl DraftComposer {
    pub fn new(template: DraftTemplate) -> Self {
        Self { template }
    }

    /// Greeting and instruction paragraph addressed to `sender_name`.
    pub fn generated_text(&self, sender_name: Option<&str>) -> String {
        let sender = sender_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.template.fallback_sender.as_str());
        let greeting = self.template.greeting.replace("{sender}", sender);

        format!("{}\n\n{}\n\n", greeting, self.template.instruction)
    }

    pub async fn compose(&self, transport: &mut dyn MailTransport, item: &MailItem) -> Result<()> {
        let mut reply = transport.reply_template(item).await?;
        let generated = self.generated_text(item.sender_name.as_deref());
        reply.body = format!("{}\n\n{}", generated, reply.body);
        transport.save_draft(reply).await
    }
}

//! [`ReplyDraft`] to an RFC 5322 message ready for APPEND.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::{Address, Message};

use crate::transport::error::{Result, TransportError};
use crate::transport::ReplyDraft;

pub fn render_draft(draft: &ReplyDraft, from: &str) -> Result<Vec<u8>> {
    let from: Mailbox = from
        .parse()
        .map_err(|e| TransportError::DraftFailed(format!("invalid from address: {}", e)))?;

    let to_address = draft.to_address.as_deref().ok_or_else(|| {
        TransportError::DraftFailed("original message has no sender address".to_string())
    })?;
    let to_address: Address = to_address
        .parse()
        .map_err(|e| TransportError::DraftFailed(format!("invalid recipient address: {}", e)))?;
    let to = Mailbox::new(draft.to_name.clone(), to_address);

    let mut builder = Message::builder()
        .from(from)
        .to(to)
        .subject(draft.subject.clone());

    if let Some(id) = draft.in_reply_to.as_deref() {
        let id = format!("<{}>", id.trim_start_matches('<').trim_end_matches('>'));
        builder = builder.in_reply_to(id.clone()).references(id);
    }

    let message = builder
        .header(ContentType::TEXT_PLAIN)
        .body(draft.body.clone())
        .map_err(|e| TransportError::DraftFailed(e.to_string()))?;

    Ok(message.formatted())
}

//! Raw RFC 5322 message to [`MailItem`].

use chrono::DateTime;
use log::debug;
use mail_parser::{Message, MessageParser, MimeHeaders};

use crate::transport::error::{Result, TransportError};
use crate::transport::{ItemKind, MailItem};

/// Parses a fetched message.
///
/// The Message-ID becomes the entry id and `store_id` the store. Read state,
/// reply state and receipt time come from the server and are set by the caller;
/// the Date header is only a fallback for the receipt time.
pub fn parse_mail_item(uid: u32, raw: &[u8], store_id: &str) -> Result<MailItem> {
    let message = MessageParser::default()
        .parse(raw)
        .ok_or_else(|| TransportError::ParseError(format!("UID {} is not a message", uid)))?;

    let from = message.from().and_then(|address| address.first());

    let mut item = MailItem::mail(uid as u64).with_store_id(store_id);
    item.kind = item_kind(&message);
    item.entry_id = message
        .message_id()
        .filter(|id| !id.is_empty())
        .map(str::to_string);
    item.subject = message.subject().map(str::to_string);
    item.body = message.body_text(0).map(|text| text.into_owned());
    item.sender_name = from.and_then(|addr| addr.name()).map(str::to_string);
    item.sender_address = from.and_then(|addr| addr.address()).map(str::to_string);
    item.received_at = message
        .date()
        .and_then(|date| DateTime::from_timestamp(date.to_timestamp(), 0));

    debug!(
        "Parsed UID={} kind={:?} subject={:?}",
        uid,
        item.kind,
        item.subject.as_deref().unwrap_or("(no subject)")
    );

    Ok(item)
}

/// Invitations carry a `text/calendar` part with `METHOD:REQUEST`.
fn item_kind(message: &Message<'_>) -> ItemKind {
    for part in message.parts.iter() {
        let Some(content_type) = part.content_type() else {
            continue;
        };
        let is_calendar = content_type.ctype().eq_ignore_ascii_case("text")
            && content_type
                .subtype()
                .is_some_and(|sub| sub.eq_ignore_ascii_case("calendar"));
        if !is_calendar {
            continue;
        }

        let method_is_request = content_type
            .attribute("method")
            .is_some_and(|m| m.eq_ignore_ascii_case("REQUEST"))
            || part
                .text_contents()
                .is_some_and(|text| text.contains("METHOD:REQUEST"));

        return if method_is_request {
            ItemKind::MeetingRequest
        } else {
            ItemKind::Other("calendar".to_string())
        };
    }
    ItemKind::Mail
}

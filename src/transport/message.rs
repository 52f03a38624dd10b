use chrono::DateTime;
use serde::Deserialize;
use tracing::warn;

use crate::domain::{
    Direction, Message, MessageResponse, MessageStatus, PhoneNumber, Sender, Sid,
};
use crate::transport::TransportError;

#[derive(Debug, Clone, Deserialize)]
struct MessageJsonResponse {
    sid: String,
    date_created: String,
    date_updated: String,
    status: String,
    from: String,
    to: String,
    body: String,
    uri: String,
    direction: String,
    api_version: String,
    num_segments: u32,
}

/// Encode a message into the `From`/`To`/`Body` form fields the SMS API
/// expects.
pub fn encode_message_form(message: &Message) -> Vec<(String, String)> {
    vec![
        (Sender::FIELD.to_owned(), message.sender().as_str().to_owned()),
        (
            PhoneNumber::FIELD.to_owned(),
            message.recipient().number().to_owned(),
        ),
        (Message::BODY_FIELD.to_owned(), message.body().to_owned()),
    ]
}

/// Decode the JSON body the SMS API returns for a sent message or a status
/// query.
///
/// Timestamps are RFC 2822. Unknown status or direction labels become
/// `None` with a warning; a disagreement between the API's segment count
/// and the local computation is warned about but kept as reported.
pub fn decode_message_json_response(json: &str) -> Result<MessageResponse, TransportError> {
    let parsed: MessageJsonResponse = serde_json::from_str(json)?;

    let date_created =
        DateTime::parse_from_rfc2822(&parsed.date_created).map_err(|source| {
            TransportError::Timestamp {
                field: "date_created",
                source,
            }
        })?;
    let date_updated =
        DateTime::parse_from_rfc2822(&parsed.date_updated).map_err(|source| {
            TransportError::Timestamp {
                field: "date_updated",
                source,
            }
        })?;

    let status = MessageStatus::from_label(&parsed.status);
    if status.is_none() {
        warn!(label = %parsed.status, "unknown message status label in response");
    }
    let direction = Direction::from_label(&parsed.direction);
    if direction.is_none() {
        warn!(label = %parsed.direction, "unknown direction label in response");
    }

    let message = Message::new(
        Sender::new(parsed.from)?,
        PhoneNumber::new(parsed.to)?,
        parsed.body,
    );
    if parsed.num_segments != message.number_of_segments() {
        warn!(
            api = parsed.num_segments,
            local = message.number_of_segments(),
            "API split the message differently than computed locally"
        );
    }

    Ok(MessageResponse {
        sid: Sid::new(parsed.sid)?,
        date_created,
        date_updated,
        status,
        message,
        uri: parsed.uri,
        direction,
        api_version: parsed.api_version,
        num_segments: parsed.num_segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"
    {
      "sid": "6eEt011000079571f4",
      "date_created": "Thu, 22 Dec 2022 17:22:03 +0000",
      "date_updated": "Thu, 22 Dec 2022 17:22:05 +0000",
      "status": "accepted",
      "from": "+491755555555",
      "to": "+491755555556",
      "body": "hello",
      "uri": "/service/sms/v1/messages/6eEt011000079571f4",
      "direction": "outbound-api",
      "api_version": "1.1.5",
      "num_segments": 1
    }
    "#;

    #[test]
    fn encode_form_carries_from_to_body() {
        let message = Message::new(
            Sender::new("MYBRAND").unwrap(),
            PhoneNumber::new("+491755555555").unwrap(),
            "hello",
        );
        assert_eq!(
            encode_message_form(&message),
            vec![
                ("From".to_owned(), "MYBRAND".to_owned()),
                ("To".to_owned(), "+491755555555".to_owned()),
                ("Body".to_owned(), "hello".to_owned()),
            ]
        );
    }

    #[test]
    fn decode_full_response() {
        let response = decode_message_json_response(RESPONSE).unwrap();
        assert_eq!(response.sid.as_str(), "6eEt011000079571f4");
        assert_eq!(response.status, Some(MessageStatus::Accepted));
        assert_eq!(response.direction, Some(Direction::OutboundApi));
        assert_eq!(response.message.body(), "hello");
        assert_eq!(response.message.recipient().number(), "+491755555556");
        assert_eq!(response.num_segments, 1);
        assert_eq!(response.api_version, "1.1.5");
        assert_eq!(
            response.uri,
            "/service/sms/v1/messages/6eEt011000079571f4"
        );
        assert_eq!(response.date_created.timestamp(), 1_671_729_723);
        assert!(response.date_updated > response.date_created);
    }

    #[test]
    fn unknown_labels_decode_to_none() {
        let json = RESPONSE
            .replace("accepted", "lost")
            .replace("outbound-api", "inbound");
        let response = decode_message_json_response(&json).unwrap();
        assert_eq!(response.status, None);
        assert_eq!(response.direction, None);
    }

    #[test]
    fn malformed_timestamp_is_an_error() {
        let json = RESPONSE.replace("Thu, 22 Dec 2022 17:22:03 +0000", "2022-12-22T17:22:03Z");
        assert!(matches!(
            decode_message_json_response(&json),
            Err(TransportError::Timestamp {
                field: "date_created",
                ..
            })
        ));
    }

    #[test]
    fn invalid_recipient_is_an_error() {
        let json = RESPONSE.replace("+491755555556", "not-a-number");
        assert!(matches!(
            decode_message_json_response(&json),
            Err(TransportError::Validation(_))
        ));
    }
}

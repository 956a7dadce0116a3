//! Wire codec: a leading ASCII digit command tag followed by a UTF-8 payload.
//!
//! Frames are decoded once at this boundary into a typed [`Command`]; the
//! digit tags exist only on the wire.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Tag for get-current-value requests, value responses, and broadcasts.
pub const TAG_GET: char = '0';

/// Tag for set-current-value requests.
pub const TAG_SET: char = '1';

/// The complete set acknowledgement frame: the set tag alone, no payload.
pub const SET_ACK: &str = "1";

/// JSON body carried by set requests, value responses, and broadcasts.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// A decoded inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Request the current shared value.
    Get,
    /// Replace the shared value with the carried string.
    Set(String),
    /// Any frame without a recognized tag; retransmitted verbatim.
    Echo,
}

/// Strip trailing NUL padding from an inbound payload. Clients that read
/// into fixed-size buffers pad their frames with NULs.
pub fn trim_padding(payload: &str) -> &str {
    payload.trim_end_matches('\0')
}

/// Decode one inbound text frame into a command.
///
/// An empty frame, or any unrecognized leading byte, decodes to
/// [`Command::Echo`] — never an error. Only a set frame can fail, when its
/// body is not the expected JSON shape.
pub fn decode(payload: &str) -> Result<Command, ProtocolError> {
    let mut chars = payload.chars();
    match chars.next() {
        Some(TAG_GET) => Ok(Command::Get),
        Some(TAG_SET) => {
            let body: MessageBody =
                serde_json::from_str(chars.as_str()).map_err(ProtocolError::MalformedPayload)?;
            Ok(Command::Set(body.message))
        }
        _ => Ok(Command::Echo),
    }
}

/// Encode a value frame: the get tag followed by the JSON body. Sent as the
/// get response and as the broadcast after every set.
pub fn encode_value(value: &str) -> String {
    let body = MessageBody {
        message: value.to_string(),
    };
    format!("{TAG_GET}{}", serde_json::to_string(&body).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_get() {
        assert_eq!(decode("0").unwrap(), Command::Get);
    }

    #[test]
    fn decode_get_ignores_trailing_payload() {
        // The reference behavior dispatches on the tag alone.
        assert_eq!(decode("0whatever").unwrap(), Command::Get);
    }

    #[test]
    fn decode_set() {
        let cmd = decode(r#"1{"message":"hello"}"#).unwrap();
        assert_eq!(cmd, Command::Set("hello".to_string()));
    }

    #[test]
    fn decode_set_rejects_bad_json() {
        assert!(matches!(
            decode("1not-json"),
            Err(ProtocolError::MalformedPayload(_))
        ));
        assert!(matches!(
            decode(r#"1{"wrong":"field"}"#),
            Err(ProtocolError::MalformedPayload(_))
        ));
        // A bare tag with no body at all is malformed too.
        assert!(matches!(
            decode("1"),
            Err(ProtocolError::MalformedPayload(_))
        ));
    }

    #[test]
    fn decode_unknown_tag_is_echo() {
        assert_eq!(decode("9hello").unwrap(), Command::Echo);
        assert_eq!(decode("hello").unwrap(), Command::Echo);
    }

    #[test]
    fn decode_empty_frame_is_echo() {
        assert_eq!(decode("").unwrap(), Command::Echo);
    }

    #[test]
    fn decode_multibyte_leading_char_is_echo() {
        assert_eq!(decode("écho").unwrap(), Command::Echo);
    }

    #[test]
    fn trim_padding_strips_trailing_nuls_only() {
        assert_eq!(trim_padding("0\0\0\0"), "0");
        assert_eq!(trim_padding("a\0b\0"), "a\0b");
        assert_eq!(trim_padding("plain"), "plain");
    }

    #[test]
    fn encode_value_format() {
        assert_eq!(encode_value("hello"), r#"0{"message":"hello"}"#);
    }

    #[test]
    fn set_round_trip_preserves_tricky_strings() {
        for value in [
            "plain",
            r#"he said "hi""#,
            "{braces} and [brackets]",
            "ünïcødé ✓ 本",
            "",
        ] {
            let body = MessageBody {
                message: value.to_string(),
            };
            let frame = format!("{TAG_SET}{}", serde_json::to_string(&body).unwrap());
            assert_eq!(decode(&frame).unwrap(), Command::Set(value.to_string()));
        }
    }
}

//! Length-prefixed framing for the TCP channel: one request frame per
//! record, one ack frame back.

use bytes::{BufMut, Bytes, BytesMut};

pub const ACK_OK: u8 = 0;

/// Request frame: u32-LE payload length, then the payload.
pub fn frame_record(payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(4 + payload.len());
    buf.put_u32_le(payload.len() as u32);
    buf.extend_from_slice(payload);
    buf.freeze()
}

/// Ack frame: u32-LE body length, then a status byte and a UTF-8 message.
/// Status 0 is success; anything else is an application-level rejection.
pub fn encode_ack(status: u8, message: &str) -> Bytes {
    let body_len = 1 + message.len();
    let mut buf = BytesMut::with_capacity(4 + body_len);
    buf.put_u32_le(body_len as u32);
    buf.put_u8(status);
    buf.extend_from_slice(message.as_bytes());
    buf.freeze()
}

/// Parses an ack frame body (length prefix already stripped).
pub fn parse_ack(body: &[u8]) -> Option<(u8, String)> {
    let (&status, rest) = body.split_first()?;
    let message = String::from_utf8(rest.to_vec()).ok()?;
    Some((status, message))
}

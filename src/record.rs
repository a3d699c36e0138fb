use bytes::Bytes;
use std::borrow::Cow;
use std::sync::Arc;

/// One non-empty line read from a record source.
#[derive(Debug, Clone)]
pub struct Record {
    pub source: Arc<str>,
    /// 1-based physical line number in the source.
    pub line: u64,
    pub payload: String,
}

/// Typed request submitted over the channel, 1:1 with a record.
#[derive(Debug, Clone)]
pub struct RecordRequest {
    pub payload: Bytes,
}

impl RecordRequest {
    pub fn payload_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}

/// Acknowledgment returned by the remote node on successful receipt.
#[derive(Debug, Clone, Copy)]
pub struct Ack;

/// Pass-through encoding: the line is the payload. Kept as an explicit
/// step so richer encodings can slot in without touching dispatch.
pub fn encode(record: &Record) -> RecordRequest {
    RecordRequest {
        payload: Bytes::copy_from_slice(record.payload.as_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_wraps_payload_bytes() {
        let record = Record {
            source: Arc::from("client1_data.txt"),
            line: 1,
            payload: "userID:001,event:login".to_string(),
        };
        let request = encode(&record);
        assert_eq!(request.payload_str(), "userID:001,event:login");
    }
}

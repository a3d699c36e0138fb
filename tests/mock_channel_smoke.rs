#![cfg(feature = "channel-mock")]
use bytes::Bytes;
use ingest_feeder::channel::{Channel as _, ChannelBuilder, ChannelOptions, Engine};
use ingest_feeder::record::RecordRequest;

fn request(payload: &str) -> RecordRequest {
    RecordRequest {
        payload: Bytes::copy_from_slice(payload.as_bytes()),
    }
}

fn opts(pairs: &[(&str, &str)]) -> ChannelOptions {
    let mut opts = ChannelOptions::default();
    for (k, v) in pairs {
        opts.params.insert(k.to_string(), v.to_string());
    }
    opts
}

#[tokio::test]
async fn send_ack_mock_smoke() {
    let channel = ChannelBuilder::open(Engine::Mock, "localhost:50051", ChannelOptions::default())
        .await
        .expect("open");
    channel.send(request("userID:001,event:login")).await.expect("send");
    channel.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn fail_every_nth_is_deterministic() {
    let channel = ChannelBuilder::open(
        Engine::Mock,
        "localhost:50051",
        opts(&[("fail_every", "2")]),
    )
    .await
    .expect("open");

    let mut failed = 0;
    for i in 0..6 {
        if channel.send(request(&format!("record {i}"))).await.is_err() {
            failed += 1;
        }
    }
    assert_eq!(failed, 3);
}

#[tokio::test]
async fn fail_contains_carries_the_configured_kind() {
    let channel = ChannelBuilder::open(
        Engine::Mock,
        "localhost:50051",
        opts(&[("fail_contains", "delete"), ("fail_kind", "rejected")]),
    )
    .await
    .expect("open");

    channel.send(request("userID:001,event:login")).await.expect("clean payload");
    let err = channel
        .send(request("userID:002,event:delete"))
        .await
        .err()
        .expect("must fail");
    assert_eq!(err.kind(), "rejected");
}

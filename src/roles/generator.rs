//! Generator variant: synthetic `userID:NNN,event:X` records for one-off
//! runs against a live node, no source files involved.

use crate::channel::Channel;
use crate::rate::Pacer;
use crate::record::RecordRequest;
use bytes::Bytes;
use rand::seq::SliceRandom;
use std::sync::Arc;
use tracing::warn;

const EVENTS: &[&str] = &[
    "login",
    "purchase",
    "signup",
    "logout",
    "update",
    "delete",
    "reset_password",
    "view",
    "click",
    "add_to_cart",
];

pub struct GeneratorConfig {
    pub count: u64,
    /// Messages per second; unlimited when `None`.
    pub rate: Option<f64>,
    /// First synthetic user id.
    pub user_base: u64,
}

#[derive(Debug, Default)]
pub struct GeneratorReport {
    pub sent: u64,
    pub errors: u64,
}

/// Sends `count` synthetic records over the shared channel. Per-send
/// failures are counted and logged, never fatal.
pub async fn run_generator(config: GeneratorConfig, channel: Arc<dyn Channel>) -> GeneratorReport {
    let mut pacer = config.rate.map(Pacer::per_second);
    let mut report = GeneratorReport::default();

    for i in 0..config.count {
        if let Some(pacer) = &mut pacer {
            pacer.wait_for_next().await;
        }

        let event = {
            let mut rng = rand::thread_rng();
            EVENTS.choose(&mut rng).copied().unwrap_or("login")
        };
        let payload = format!("userID:{:03},event:{}", config.user_base + i, event);
        let request = RecordRequest {
            payload: Bytes::from(payload.clone()),
        };

        match channel.send(request).await {
            Ok(_ack) => {
                report.sent += 1;
                println!("Sent: {}", payload);
            }
            Err(err) => {
                report.errors += 1;
                warn!(%err, %payload, "send failed");
            }
        }
    }

    report
}

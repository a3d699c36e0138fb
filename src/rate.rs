use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Open-loop pacing between sends.
pub struct Pacer {
    interval: Duration,
    last_send: Option<Instant>,
}

impl Pacer {
    pub fn per_second(msgs_per_second: f64) -> Self {
        Self::every(Duration::from_nanos(
            (1_000_000_000.0 / msgs_per_second) as u64,
        ))
    }

    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            last_send: None,
        }
    }

    /// Wait until it's time for the next send.
    pub async fn wait_for_next(&mut self) {
        let now = Instant::now();
        if let Some(last) = self.last_send {
            let elapsed = now.duration_since(last);
            if elapsed < self.interval {
                sleep(self.interval - elapsed).await;
            }
        }
        self.last_send = Some(Instant::now());
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_second_maps_to_interval() {
        assert_eq!(Pacer::per_second(5.0).interval(), Duration::from_millis(200));
    }

    #[tokio::test]
    async fn first_send_is_not_delayed() {
        let mut pacer = Pacer::per_second(1.0);
        let started = Instant::now();
        pacer.wait_for_next().await;
        assert!(started.elapsed() < Duration::from_millis(100));
    }
}

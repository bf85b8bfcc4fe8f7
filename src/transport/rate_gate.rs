//! Host-scoped sliding-window rate gate
//!
//! Each host keeps one timestamp queue per configured window. A call is
//! admitted only when every window has room; otherwise the caller sleeps
//! until the oldest entry of the saturated window expires.

use rand::Rng;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Never re-check a saturated window sooner than this
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// At most `limit` calls in any trailing `period`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    pub limit: usize,
    pub period: Duration,
}

impl RateWindow {
    pub fn new(limit: usize, period: Duration) -> Self {
        Self { limit, period }
    }
}

pub struct RateGate {
    windows: Vec<RateWindow>,
    hosts: Mutex<HashMap<String, Vec<VecDeque<Instant>>>>,
    jitter: Duration,
}

impl RateGate {
    /// Window limits below 1 are clamped to 1 so the gate can always admit.
    pub fn new(windows: Vec<RateWindow>) -> Self {
        let windows = windows
            .into_iter()
            .map(|w| RateWindow::new(w.limit.max(1), w.period))
            .collect();

        Self {
            windows,
            hosts: Mutex::new(HashMap::new()),
            jitter: Duration::ZERO,
        }
    }

    /// Random extra delay of up to `jitter` after each admission
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn windows(&self) -> &[RateWindow] {
        &self.windows
    }

    /// Wait until a call to `host` fits every window, record it, and return
    /// the instant it was admitted.
    pub async fn acquire(&self, host: &str) -> Instant {
        let admitted = loop {
            let wait = {
                let mut hosts = self.hosts.lock().await;
                let stamps = hosts
                    .entry(host.to_string())
                    .or_insert_with(|| vec![VecDeque::new(); self.windows.len()]);

                let now = Instant::now();
                let wait = self.required_wait(stamps, now);

                if wait.is_zero() {
                    for queue in stamps.iter_mut() {
                        queue.push_back(now);
                    }
                    break now;
                }
                wait.max(MIN_POLL_INTERVAL)
            };

            log::debug!("Rate gate saturated for {}, waiting {:?}", host, wait);
            sleep(wait).await;
        };

        if !self.jitter.is_zero() {
            let jitter_ms = rand::thread_rng().gen_range(0..=self.jitter.as_millis() as u64);
            if jitter_ms > 0 {
                sleep(Duration::from_millis(jitter_ms)).await;
            }
        }

        admitted
    }

    /// Evict expired entries and return how long until every window has room
    fn required_wait(&self, stamps: &mut [VecDeque<Instant>], now: Instant) -> Duration {
        let mut wait = Duration::ZERO;

        for (window, queue) in self.windows.iter().zip(stamps.iter_mut()) {
            while let Some(oldest) = queue.front() {
                if now.duration_since(*oldest) >= window.period {
                    queue.pop_front();
                } else {
                    break;
                }
            }

            if queue.len() >= window.limit {
                if let Some(oldest) = queue.front() {
                    wait = wait.max((*oldest + window.period).saturating_duration_since(now));
                }
            }
        }

        wait
    }
}

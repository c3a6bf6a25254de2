//! Client-side request budget for the Yahoo endpoints.
//!
//! Yahoo publishes no quota for `chart` and `quoteSummary`; it answers bursts
//! with 429s. Every request this client sends (chart and quote summary alike)
//! draws from one rolling budget so a scan stays under the configured
//! requests per minute before Yahoo has to push back.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Clone)]
pub struct RateLimiter {
    sent: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            sent: Arc::new(Mutex::new(VecDeque::new())),
            max_requests: max_requests.max(1),
            window,
        }
    }

    /// Budget of `requests` per rolling minute, the unit `YAHOO_RATE_LIMIT` is given in.
    pub fn per_minute(requests: usize) -> Self {
        Self::new(requests, Duration::from_secs(60))
    }

    /// When the next request may go out, given the send times still inside
    /// the window. `None` means the budget has room now.
    fn next_opening(&self, sent: &mut VecDeque<Instant>, now: Instant) -> Option<Instant> {
        while sent
            .front()
            .is_some_and(|&t| now.saturating_duration_since(t) >= self.window)
        {
            sent.pop_front();
        }
        if sent.len() < self.max_requests {
            None
        } else {
            sent.front().map(|&oldest| oldest + self.window)
        }
    }

    /// Wait for room in the budget and record the request as sent.
    pub async fn acquire(&self) {
        loop {
            let opening = {
                let mut sent = self.sent.lock().await;
                let now = Instant::now();
                match self.next_opening(&mut sent, now) {
                    None => {
                        sent.push_back(now);
                        return;
                    }
                    Some(at) => at,
                }
            };
            tracing::debug!(
                "Yahoo budget of {} requests spent, next opening in {:.1}s",
                self.max_requests,
                opening.saturating_duration_since(Instant::now()).as_secs_f64()
            );
            tokio::time::sleep_until(opening).await;
        }
    }
}

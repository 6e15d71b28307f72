//! Pacing of outbound explorer requests.
//!
//! A limiter is shared by every request the process makes, so concurrent
//! inbound requests together stay under the explorer's rate limit.
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[async_trait]
pub trait RateLimiter: Send + Sync {
	/// Waits until the caller may issue one request.
	async fn acquire(&self);
}

/// No pacing at all.
pub struct Unlimited;

#[async_trait]
impl RateLimiter for Unlimited {
	async fn acquire(&self) {}
}

/// Starts consecutive requests at least `delay` apart.
pub struct FixedDelay {
	delay: Duration,
	next: Mutex<Option<Instant>>,
}

impl FixedDelay {
	pub fn new(delay: Duration) -> Self {
		Self { delay, next: Mutex::new(None) }
	}
}

#[async_trait]
impl RateLimiter for FixedDelay {
	async fn acquire(&self) {
		let start = {
			let mut next = self.next.lock().await;
			let now = Instant::now();
			let start = next.map_or(now, |at| at.max(now));
			*next = Some(start + self.delay);
			start
		};
		tokio::time::sleep_until(start).await;
	}
}

/// Token bucket holding up to `burst` tokens, refilled at `per_second`.
///
/// Tracked as the theoretical arrival time of the next request, so no
/// background refill task is needed.
pub struct TokenBucket {
	interval: Duration,
	tolerance: Duration,
	tat: Mutex<Option<Instant>>,
}

impl TokenBucket {
	pub fn new(per_second: u32, burst: u32) -> Self {
		let per_second = per_second.max(1);
		let interval = Duration::from_secs(1) / per_second;
		Self {
			interval,
			tolerance: interval * burst.max(1).saturating_sub(1),
			tat: Mutex::new(None),
		}
	}
}

#[async_trait]
impl RateLimiter for TokenBucket {
	async fn acquire(&self) {
		let start = {
			let mut tat = self.tat.lock().await;
			let now = Instant::now();
			let arrival = tat.map_or(now, |at| at.max(now));
			let start = arrival.checked_sub(self.tolerance).map_or(now, |at| at.max(now));
			*tat = Some(arrival + self.interval);
			start
		};
		tokio::time::sleep_until(start).await;
	}
}

/// Which limiter to build, as read from the configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Throttle {
	None,
	FixedDelay(Duration),
	TokenBucket { per_second: u32, burst: u32 },
}

impl Throttle {
	pub fn build(self) -> Arc<dyn RateLimiter> {
		match self {
			Self::None => Arc::new(Unlimited),
			Self::FixedDelay(delay) => Arc::new(FixedDelay::new(delay)),
			Self::TokenBucket { per_second, burst } => Arc::new(TokenBucket::new(per_second, burst)),
		}
	}
}

impl std::fmt::Display for Throttle {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::None => write!(f, "none"),
			Self::FixedDelay(delay) => write!(f, "fixed-delay {}ms", delay.as_millis()),
			Self::TokenBucket { per_second, burst } => {
				write!(f, "token-bucket {per_second}/s burst {burst}")
			},
		}
	}
}

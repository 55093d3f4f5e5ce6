//! Time sources used to stamp and expire cache entries.

// std
use std::time::Instant;
// self
use crate::_prelude::*;

/// Source of "now" for expiry checks.
pub trait Clock
where
	Self: Debug + Send + Sync,
{
	/// Returns the current instant.
	fn now(&self) -> OffsetDateTime;
}

/// Monotonic clock anchored to the wall time at construction.
///
/// Readings advance with [`Instant`] rather than the system clock, so NTP steps or manual clock
/// changes cannot stretch or shorten a TTL. Long-lived readings drift from the wall time by
/// whatever adjustments the host made since the anchor was taken.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
	wall: OffsetDateTime,
	mono: Instant,
}
impl SystemClock {
	/// Anchors a new clock at the current wall time.
	pub fn new() -> Self {
		Self { wall: OffsetDateTime::now_utc(), mono: Instant::now() }
	}
}
impl Default for SystemClock {
	fn default() -> Self {
		Self::new()
	}
}
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		let elapsed = Duration::try_from(self.mono.elapsed()).unwrap_or(Duration::MAX);

		self.wall.saturating_add(elapsed)
	}
}

/// Manually driven clock for tests and simulations.
#[derive(Clone, Debug)]
pub struct ManualClock(Arc<Mutex<OffsetDateTime>>);
impl ManualClock {
	/// Creates a clock frozen at `start`.
	pub fn new(start: OffsetDateTime) -> Self {
		Self(Arc::new(Mutex::new(start)))
	}

	/// Moves the clock forward (or backward for negative values).
	pub fn advance(&self, by: Duration) {
		*self.0.lock() += by;
	}

	/// Pins the clock to `instant`.
	pub fn set(&self, instant: OffsetDateTime) {
		*self.0.lock() = instant;
	}
}
impl Clock for ManualClock {
	fn now(&self) -> OffsetDateTime {
		*self.0.lock()
	}
}

//! Thread-safe in-memory [`ResponseCache`] implementation.

// self
use crate::{
	_prelude::*,
	cache::{CacheError, CacheFuture, CacheKey, Clock, ResponseCache, SystemClock},
};

type CacheMap = Arc<RwLock<CacheState>>;

#[derive(Debug, Default)]
struct CacheState {
	entries: HashMap<CacheKey, CacheEntry>,
	next_sweep_at: Option<OffsetDateTime>,
}
impl CacheState {
	fn sweep(&mut self, now: OffsetDateTime) -> usize {
		let before = self.entries.len();

		self.entries.retain(|_, entry| entry.is_live_at(now));
		self.next_sweep_at = now.checked_add(MemoryCache::SWEEP_INTERVAL);

		before - self.entries.len()
	}
}

#[derive(Clone, Debug)]
struct CacheEntry {
	value: Value,
	expires_at: OffsetDateTime,
}
impl CacheEntry {
	fn is_live_at(&self, now: OffsetDateTime) -> bool {
		now < self.expires_at
	}
}

/// Process-local cache that keeps entries until their TTL lapses.
///
/// Clones share the same map, so one instance can back any number of clients. Expired entries
/// are dropped when read, and writes sweep the whole map at most once per
/// [`SWEEP_INTERVAL`](Self::SWEEP_INTERVAL) so keys that are never read again do not pile up.
#[derive(Clone, Debug)]
pub struct MemoryCache {
	map: CacheMap,
	clock: Arc<dyn Clock>,
}
impl MemoryCache {
	/// Minimum time between two sweeps triggered by writes.
	pub const SWEEP_INTERVAL: Duration = Duration::seconds(60);

	/// Creates an empty cache driven by the system clock.
	pub fn new() -> Self {
		Self::with_clock(Arc::new(SystemClock::new()))
	}

	/// Creates an empty cache driven by `clock`.
	pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
		Self { map: Default::default(), clock }
	}

	/// Returns the number of stored entries, including expired ones not yet purged.
	pub fn len(&self) -> usize {
		self.map.read().entries.len()
	}

	/// Returns `true` when nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.map.read().entries.is_empty()
	}

	/// Drops every expired entry and returns how many were removed.
	pub fn purge_expired(&self) -> usize {
		let now = self.clock.now();

		self.map.write().sweep(now)
	}

	fn get_now(&self, key: &CacheKey) -> Option<Value> {
		let now = self.clock.now();

		{
			let guard = self.map.read();

			match guard.entries.get(key) {
				Some(entry) if entry.is_live_at(now) => return Some(entry.value.clone()),
				Some(_) => {},
				None => return None,
			}
		}

		let mut guard = self.map.write();

		// Another writer may have refreshed the entry between the two locks.
		match guard.entries.get(key) {
			Some(entry) if entry.is_live_at(now) => Some(entry.value.clone()),
			Some(_) => {
				guard.entries.remove(key);

				None
			},
			None => None,
		}
	}

	fn set_now(&self, key: CacheKey, value: Value, ttl: Duration) -> Result<(), CacheError> {
		let now = self.clock.now();
		let expires_at = now.checked_add(ttl).ok_or_else(|| CacheError::Backend {
			message: format!("TTL of {ttl} overflows the clock range"),
		})?;
		let mut guard = self.map.write();
		let next_sweep_at = guard.next_sweep_at;

		match next_sweep_at {
			Some(due) if now >= due => {
				guard.sweep(now);
			},
			Some(_) => {},
			None => guard.next_sweep_at = now.checked_add(Self::SWEEP_INTERVAL),
		}

		guard.entries.insert(key, CacheEntry { value, expires_at });

		Ok(())
	}
}
impl Default for MemoryCache {
	fn default() -> Self {
		Self::new()
	}
}
impl ResponseCache for MemoryCache {
	fn get<'a>(&'a self, key: &'a CacheKey) -> CacheFuture<'a, Option<Value>> {
		Box::pin(async move { Ok(self.get_now(key)) })
	}

	fn set(&self, key: CacheKey, value: Value, ttl: Duration) -> CacheFuture<'_, ()> {
		Box::pin(async move { self.set_now(key, value, ttl) })
	}
}

//! Anti-forgery tokens and per-session memory.
//!
//! Tokens are short keyed hashes over the session and a time tick, so they
//! need no server-side storage. A tick is half the token lifetime and a
//! token verifies during its own tick and the next one.

use chrono::Utc;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::domain::VehicleId;
use crate::infrastructure::config::SessionConfig;

/// Hex characters kept from the digest.
const TOKEN_LEN: usize = 10;

/// Issues and verifies anti-forgery tokens.
pub struct NonceGuard {
    secret: String,
    lifetime_secs: u64,
}

impl std::fmt::Debug for NonceGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceGuard")
            .field("secret", &"<redacted>")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish()
    }
}

impl NonceGuard {
    pub fn new(secret: impl Into<String>, lifetime_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            lifetime_secs: lifetime_secs.max(2),
        }
    }

    /// Build a guard from configuration, reading the secret from the
    /// environment.
    ///
    /// Without a configured secret a random one is generated, so tokens do
    /// not survive a restart.
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        let secret = SessionConfig::secret_from_env().unwrap_or_else(|| {
            warn!("No token secret configured; using a per-process random secret");
            uuid::Uuid::new_v4().to_string()
        });
        Self::new(secret, config.nonce_lifetime_secs)
    }

    /// Token lifetime in seconds.
    #[must_use]
    pub fn lifetime_secs(&self) -> u64 {
        self.lifetime_secs
    }

    /// Issue a token for `session` valid from now.
    #[must_use]
    pub fn issue(&self, session: &str) -> String {
        self.issue_at(session, now_secs())
    }

    /// Issue a token as of `now` (seconds since the Unix epoch).
    #[must_use]
    pub fn issue_at(&self, session: &str, now: u64) -> String {
        self.token_for(session, self.tick(now))
    }

    /// Check a token for `session` against the current time.
    #[must_use]
    pub fn verify(&self, session: &str, token: &str) -> bool {
        self.verify_at(session, token, now_secs())
    }

    /// Check a token as of `now`. Accepts the current and the previous tick.
    #[must_use]
    pub fn verify_at(&self, session: &str, token: &str, now: u64) -> bool {
        let token = token.trim();
        if token.len() != TOKEN_LEN {
            return false;
        }
        let tick = self.tick(now);
        let valid = [Some(tick), tick.checked_sub(1)]
            .into_iter()
            .flatten()
            .any(|t| constant_time_eq(token.as_bytes(), self.token_for(session, t).as_bytes()));
        if !valid {
            debug!(session = %session, "Token rejected");
        }
        valid
    }

    fn tick(&self, now: u64) -> u64 {
        now.div_ceil(self.lifetime_secs / 2)
    }

    fn token_for(&self, session: &str, tick: u64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b"|");
        hasher.update(tick.to_string().as_bytes());
        hasher.update(b"|");
        hasher.update(session.as_bytes());
        let digest = hex::encode(hasher.finalize());
        digest[..TOKEN_LEN].to_string()
    }
}

fn now_secs() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0_u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Sessions kept before a sweep is forced.
const DEFAULT_SESSION_CAPACITY: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Remembered {
    vehicle_id: VehicleId,
    at: u64,
}

/// Last resolved vehicle per session.
///
/// Advisory only: a convenience for restoring a returning visitor's
/// selection. Nothing reads it implicitly. Entries expire after `ttl_secs`
/// and the map never holds more than `capacity` sessions; past that the
/// oldest entries are dropped.
#[derive(Debug)]
pub struct SessionMemory {
    entries: DashMap<String, Remembered>,
    ttl_secs: u64,
    capacity: usize,
}

impl SessionMemory {
    #[must_use]
    pub fn new(ttl_secs: u64) -> Self {
        Self::with_capacity(ttl_secs, DEFAULT_SESSION_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(ttl_secs: u64, capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl_secs: ttl_secs.max(1),
            capacity: capacity.max(1),
        }
    }

    pub fn remember(&self, session: &str, vehicle_id: VehicleId) {
        self.remember_at(session, vehicle_id, now_secs());
    }

    pub fn remember_at(&self, session: &str, vehicle_id: VehicleId, now: u64) {
        self.entries
            .insert(session.to_string(), Remembered { vehicle_id, at: now });
        if self.entries.len() > self.capacity {
            self.evict(now);
        }
    }

    #[must_use]
    pub fn last_vehicle(&self, session: &str) -> Option<VehicleId> {
        self.last_vehicle_at(session, now_secs())
    }

    #[must_use]
    pub fn last_vehicle_at(&self, session: &str, now: u64) -> Option<VehicleId> {
        let entry = self.entries.get(session).map(|entry| *entry.value())?;
        if self.is_expired(entry, now) {
            self.entries.remove(session);
            return None;
        }
        Some(entry.vehicle_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop expired sessions, then the oldest ones until within capacity.
    pub fn evict(&self, now: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !self.is_expired(*entry, now));

        let excess = self.entries.len().saturating_sub(self.capacity);
        if excess > 0 {
            let mut by_age: Vec<(u64, String)> = self
                .entries
                .iter()
                .map(|entry| (entry.value().at, entry.key().clone()))
                .collect();
            by_age.sort_unstable();
            for (_, session) in by_age.into_iter().take(excess) {
                self.entries.remove(&session);
            }
        }

        let evicted = before.saturating_sub(self.entries.len());
        debug!(evicted, remaining = self.entries.len(), "Swept session memory");
        evicted
    }

    fn is_expired(&self, entry: Remembered, now: u64) -> bool {
        now.saturating_sub(entry.at) >= self.ttl_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 86_400;
    const NOW: u64 = 1_760_000_000;

    fn guard() -> NonceGuard {
        NonceGuard::new("test-secret", DAY)
    }

    #[test]
    fn token_is_ten_hex_chars() {
        let token = guard().issue_at("s1", NOW);
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn verifies_within_current_and_next_tick() {
        let guard = guard();
        let token = guard.issue_at("s1", NOW);
        assert!(guard.verify_at("s1", &token, NOW));
        assert!(guard.verify_at("s1", &token, NOW + DAY / 2));
    }

    #[test]
    fn expires_after_two_ticks() {
        let guard = guard();
        let token = guard.issue_at("s1", NOW);
        assert!(!guard.verify_at("s1", &token, NOW + DAY + DAY / 2));
    }

    #[test]
    fn rejects_other_session_and_garbage() {
        let guard = guard();
        let token = guard.issue_at("s1", NOW);
        assert!(!guard.verify_at("s2", &token, NOW));
        assert!(!guard.verify_at("s1", "", NOW));
        assert!(!guard.verify_at("s1", "0123456789", NOW));
        assert!(!guard.verify_at("s1", &format!("{token}00"), NOW));
    }

    #[test]
    fn different_secrets_issue_different_tokens() {
        let other = NonceGuard::new("another-secret", DAY);
        let token = guard().issue_at("s1", NOW);
        assert!(!other.verify_at("s1", &token, NOW));
    }

    #[test]
    fn debug_redacts_secret() {
        assert!(!format!("{:?}", guard()).contains("test-secret"));
    }

    #[test]
    fn session_memory_tracks_last_vehicle() {
        let memory = SessionMemory::new(DAY);
        assert_eq!(memory.last_vehicle_at("s1", NOW), None);
        memory.remember_at("s1", VehicleId::new(3), NOW);
        memory.remember_at("s1", VehicleId::new(4), NOW);
        assert_eq!(memory.last_vehicle_at("s1", NOW), Some(VehicleId::new(4)));
        assert_eq!(memory.last_vehicle_at("s2", NOW), None);
    }

    #[test]
    fn session_memory_forgets_after_ttl() {
        let memory = SessionMemory::new(DAY);
        memory.remember_at("s1", VehicleId::new(3), NOW);
        assert_eq!(
            memory.last_vehicle_at("s1", NOW + DAY - 1),
            Some(VehicleId::new(3))
        );
        assert_eq!(memory.last_vehicle_at("s1", NOW + DAY), None);
        assert!(memory.is_empty());
    }

    #[test]
    fn session_memory_stays_within_capacity() {
        let memory = SessionMemory::with_capacity(DAY, 2);
        memory.remember_at("s1", VehicleId::new(1), NOW);
        memory.remember_at("s2", VehicleId::new(2), NOW + 1);
        memory.remember_at("s3", VehicleId::new(3), NOW + 2);

        assert_eq!(memory.len(), 2);
        assert_eq!(memory.last_vehicle_at("s1", NOW + 2), None);
        assert_eq!(memory.last_vehicle_at("s3", NOW + 2), Some(VehicleId::new(3)));
    }

    #[test]
    fn overflow_sweeps_expired_sessions_first() {
        let memory = SessionMemory::with_capacity(DAY, 2);
        memory.remember_at("old-1", VehicleId::new(1), NOW);
        memory.remember_at("old-2", VehicleId::new(2), NOW);
        memory.remember_at("fresh", VehicleId::new(3), NOW + DAY);

        assert_eq!(memory.len(), 1);
        assert_eq!(memory.last_vehicle_at("fresh", NOW + DAY), Some(VehicleId::new(3)));
    }

    #[test]
    fn unbounded_session_minting_is_capped() {
        let memory = SessionMemory::with_capacity(DAY, 100);
        for i in 0..1_000 {
            memory.remember_at(&format!("minted-{i}"), VehicleId::new(i), NOW);
        }
        assert!(memory.len() <= 100);
    }
}

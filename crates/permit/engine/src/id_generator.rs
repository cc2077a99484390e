//! Request identifier generation
//!
//! Generated ids look like `REQ-LX3K9A2B-4F7QZP`: the millisecond clock in
//! base 36 followed by six random base-36 characters, all uppercase.
//! Uniqueness is probabilistic; the controller re-rolls on collision.

use chrono::Utc;
use permit_types::{RequestId, REQUEST_ID_PREFIX};
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

const BASE36_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of the random suffix
pub const RANDOM_SUFFIX_LEN: usize = 6;

/// Source of fresh request identifiers
pub trait RequestIdGenerator: Send + Sync {
    fn generate(&self) -> RequestId;
}

/// Time-derived plus random identifiers
#[derive(Clone, Copy, Debug, Default)]
pub struct TimestampIdGenerator;

impl TimestampIdGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl RequestIdGenerator for TimestampIdGenerator {
    fn generate(&self) -> RequestId {
        let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let mut rng = rand::thread_rng();
        let suffix: String = (0..RANDOM_SUFFIX_LEN)
            .map(|_| BASE36_DIGITS[rng.gen_range(0..BASE36_DIGITS.len())] as char)
            .collect();
        let id = RequestId::new(format!("{}{}-{}", REQUEST_ID_PREFIX, to_base36(millis), suffix));
        tracing::trace!(request_id = %id, "Request id generated");
        id
    }
}

/// Counter-based identifiers (`REQ-001`, `REQ-002`, ...) for reproducible runs
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestIdGenerator for SequentialIdGenerator {
    fn generate(&self) -> RequestId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        RequestId::new(format!("{}{:03}", REQUEST_ID_PREFIX, n))
    }
}

/// Uppercase base-36 rendering of `n`
pub fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36_DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_710_028_800_000), "LTKQZUO0");
    }

    #[test]
    fn test_timestamp_id_shape() {
        let id = TimestampIdGenerator::new().generate();
        let s = id.as_str();
        assert!(id.has_request_prefix());
        assert_eq!(s, s.to_uppercase());

        let parts: Vec<&str> = s.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert!(!parts[1].is_empty());
        assert_eq!(parts[2].len(), RANDOM_SUFFIX_LEN);
        assert!(parts[1..]
            .iter()
            .all(|p| p.bytes().all(|b| BASE36_DIGITS.contains(&b))));
    }

    #[test]
    fn test_timestamp_ids_differ() {
        let generator = TimestampIdGenerator::new();
        let a = generator.generate();
        let b = generator.generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sequential_ids() {
        let generator = SequentialIdGenerator::new();
        assert_eq!(generator.generate(), RequestId::new("REQ-001"));
        assert_eq!(generator.generate(), RequestId::new("REQ-002"));

        let generator = SequentialIdGenerator::starting_at(1000);
        assert_eq!(generator.generate(), RequestId::new("REQ-1000"));
    }
}

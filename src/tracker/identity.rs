//! Visitor and session identity
//!
//! Ids look like `v_k3j9x0a2m_lx4q2b1c`: a prefix, nine random base36
//! characters and the creation time in base36 milliseconds.

use chrono::Utc;
use uuid::Uuid;

use super::storage::Storage;

/// Storage key of the visitor id (persistent storage)
pub const VISITOR_KEY: &str = "_vid";
/// Storage key of the session id (session storage)
pub const SESSION_KEY: &str = "_sid";

const RANDOM_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Lowercase base36 rendering of a number
pub fn to_base36(mut n: u128) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// Fresh id with the given prefix (`v` or `s`)
pub fn generate_id(prefix: &str) -> String {
    let mut random = Uuid::new_v4().as_u128();
    let mut chars = String::with_capacity(RANDOM_LEN);
    for _ in 0..RANDOM_LEN {
        chars.push(BASE36[(random % 36) as usize] as char);
        random /= 36;
    }
    let millis = Utc::now().timestamp_millis().max(0) as u128;
    format!("{}_{}_{}", prefix, chars, to_base36(millis))
}

/// Read `key` from storage, creating and storing a new id when absent
///
/// A failed write still returns the fresh id; it just won't be stable.
pub fn get_or_create(storage: &dyn Storage, key: &str, prefix: &str) -> String {
    if let Some(id) = storage.get(key).filter(|id| !id.is_empty()) {
        return id;
    }

    let id = generate_id(prefix);
    if let Err(e) = storage.set(key, &id) {
        tracing::warn!("Failed to persist {}: {}", key, e);
    }
    id
}

/// Visitor id from persistent storage
pub fn visitor_id(storage: &dyn Storage) -> String {
    get_or_create(storage, VISITOR_KEY, "v")
}

/// Session id from session storage
pub fn session_id(storage: &dyn Storage) -> String {
    get_or_create(storage, SESSION_KEY, "s")
}

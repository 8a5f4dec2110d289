//! Log hygiene shared by the whole workspace.
//!
//! Every crate logs through `tracing`. Anything that might identify an actor or
//! reveal a shuffle seed is passed through this module first: secrets are redacted
//! outright, identifiers are replaced by a short SHA-256 fingerprint so log lines
//! about the same actor can still be correlated. Client-facing metadata drops the
//! fingerprints too.

use serde_json::Value;
use sha2::{Digest, Sha256};

pub const REDACTED: &str = "[REDACTED]";

/// Length of the hex fingerprint emitted in logs.
pub const FINGERPRINT_LEN: usize = 12;

const SECRET_MARKERS: [&str; 4] = ["password", "secret", "key", "seed"];
const IDENTITY_SEGMENTS: [&str; 6] = ["actor", "player", "user", "device", "ip", "playerid"];

/// Full lowercase hex SHA-256 digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Short, stable, non-reversible tag for an identifier.
pub fn fingerprint(data: &str) -> String {
    let mut hex = sha256_hex(data.as_bytes());
    hex.truncate(FINGERPRINT_LEN);
    hex
}

fn is_secret_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    SECRET_MARKERS.iter().any(|m| lower.contains(m))
}

fn is_identity_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    lower
        .split(|c: char| c == '_' || c == '-' || c == '.')
        .any(|seg| IDENTITY_SEGMENTS.contains(&seg))
}

/// Recursively sanitize a metadata value for logs.
///
/// Object keys that look like secrets (`*seed*`, `*secret*`, ...) are replaced by
/// [`REDACTED`]; keys that name an actor, user, device or ip have their scalar value
/// replaced by [`fingerprint`].
pub fn sanitize_metadata(value: Value) -> Value {
    scrub(value, hash_identity)
}

/// Like [`sanitize_metadata`], but identities are redacted as well. Use this for
/// anything a client may see, where even a fingerprint links requests to an actor.
pub fn redact_metadata(value: Value) -> Value {
    scrub(value, |v| match v {
        Value::Null => Value::Null,
        _ => Value::String(REDACTED.to_string()),
    })
}

fn scrub(value: Value, identity: fn(Value) -> Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| {
                    let clean = if is_secret_key(&k) {
                        Value::String(REDACTED.to_string())
                    } else if is_identity_key(&k) {
                        identity(v)
                    } else {
                        scrub(v, identity)
                    };
                    (k, clean)
                })
                .collect(),
        ),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|v| scrub(v, identity)).collect())
        }
        other => other,
    }
}

fn hash_identity(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(fingerprint(&s)),
        Value::Number(n) => Value::String(fingerprint(&n.to_string())),
        Value::Array(items) => Value::Array(items.into_iter().map(hash_identity).collect()),
        Value::Null => Value::Null,
        other => sanitize_metadata(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fingerprint_is_stable_and_short() {
        assert_eq!(fingerprint("alice"), fingerprint("alice"));
        assert_ne!(fingerprint("alice"), fingerprint("bob"));
        assert_eq!(fingerprint("alice").len(), FINGERPRINT_LEN);
    }

    #[test]
    fn sha256_matches_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sanitizes_nested_metadata() {
        let raw = json!({
            "shuffle_seed": "00ff",
            "api_key": "k",
            "player_id": "alice",
            "device_id": "dev-1",
            "deck_size": 3,
            "nested": { "secret_token": "s", "stage": "flop" }
        });
        let clean = sanitize_metadata(raw);
        assert_eq!(clean["shuffle_seed"], REDACTED);
        assert_eq!(clean["api_key"], REDACTED);
        assert_eq!(clean["player_id"], fingerprint("alice"));
        assert_eq!(clean["device_id"], fingerprint("dev-1"));
        assert_eq!(clean["deck_size"], 3);
        assert_eq!(clean["nested"]["secret_token"], REDACTED);
        assert_eq!(clean["nested"]["stage"], "flop");
    }

    #[test]
    fn redaction_hides_identities_entirely() {
        let clean = redact_metadata(json!({
            "actor_id": "alice",
            "ips": { "user_ip": "203.0.113.7" },
            "game_seed": "00ff",
            "stage": "turn"
        }));
        assert_eq!(clean["actor_id"], REDACTED);
        assert_eq!(clean["ips"]["user_ip"], REDACTED);
        assert_eq!(clean["game_seed"], REDACTED);
        assert_eq!(clean["stage"], "turn");
    }

    #[test]
    fn unrelated_keys_containing_letters_ip_are_kept() {
        let clean = sanitize_metadata(json!({ "description": "x", "players_count": 4 }));
        assert_eq!(clean["description"], "x");
        assert_eq!(clean["players_count"], 4);
    }
}

use std::collections::HashMap;

use ante_engine::logger::fingerprint;

/// IP and device ownership, keyed by fingerprints so raw values are never held.
///
/// Each key remembers the order in which actors first appeared on it; only actors
/// after the first owner are considered duplicates.
#[derive(Debug, Default)]
pub struct AccountRegistry {
    by_ip: HashMap<String, Vec<String>>,
    by_device: HashMap<String, Vec<String>>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `actor_id` on `ip` and `device_id`. Returns `true` when the actor is the
    /// first owner of both.
    pub fn register(&mut self, actor_id: &str, ip: &str, device_id: &str) -> bool {
        let ip_owner = claim(&mut self.by_ip, fingerprint(ip), actor_id);
        let device_owner = claim(&mut self.by_device, fingerprint(device_id), actor_id);
        ip_owner && device_owner
    }

    pub fn accounts_on_ip(&self, ip: &str) -> usize {
        self.by_ip.get(&fingerprint(ip)).map_or(0, Vec::len)
    }

    pub fn accounts_on_device(&self, device_id: &str) -> usize {
        self.by_device.get(&fingerprint(device_id)).map_or(0, Vec::len)
    }
}

fn claim(map: &mut HashMap<String, Vec<String>>, key: String, actor_id: &str) -> bool {
    let owners = map.entry(key).or_default();
    if !owners.iter().any(|o| o == actor_id) {
        owners.push(actor_id.to_string());
    }
    owners.first().is_some_and(|first| first == actor_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_owner_stays_clean() {
        let mut r = AccountRegistry::new();
        assert!(r.register("alice", "10.0.0.1", "dev-a"));
        assert!(!r.register("mallory", "10.0.0.1", "dev-m"));
        // alice coming back is still the owner
        assert!(r.register("alice", "10.0.0.1", "dev-a"));
        assert_eq!(r.accounts_on_ip("10.0.0.1"), 2);
        assert_eq!(r.accounts_on_device("dev-m"), 1);
    }

    #[test]
    fn shared_device_flags_newcomer() {
        let mut r = AccountRegistry::new();
        assert!(r.register("alice", "1.1.1.1", "phone"));
        assert!(!r.register("bob", "2.2.2.2", "phone"));
    }
}

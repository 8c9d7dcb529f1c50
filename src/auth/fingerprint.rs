use sha2::{Digest, Sha256};

/// Derive a stable client-identifying string from request attributes.
///
/// Used to deduplicate ratings without requiring login. Clients may send
/// their own fingerprint; this is the server-side fallback when they don't.
/// The digest is truncated to 16 hex characters, plenty for dedup purposes.
pub fn derive_fingerprint(ip_address: &str, user_agent: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ip_address.as_bytes());
    hasher.update(b"|");
    hasher.update(user_agent.unwrap_or("").as_bytes());
    let hash = format!("{:x}", hasher.finalize());

    format!("fp_{}", &hash[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_same_fingerprint() {
        let a = derive_fingerprint("1.2.3.4", Some("Mozilla/5.0"));
        let b = derive_fingerprint("1.2.3.4", Some("Mozilla/5.0"));
        assert_eq!(a, b);
        assert!(a.starts_with("fp_"));
        assert_eq!(a.len(), 3 + 16);
    }

    #[test]
    fn different_clients_differ() {
        let a = derive_fingerprint("1.2.3.4", Some("Mozilla/5.0"));
        let b = derive_fingerprint("5.6.7.8", Some("Mozilla/5.0"));
        let c = derive_fingerprint("1.2.3.4", None);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}

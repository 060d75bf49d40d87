use sha2::{Digest, Sha256};

use crate::models::VisitorFingerprint;

// Keeps fingerprints from colliding with other digests built from the same inputs
const FINGERPRINT_DOMAIN: &[u8] = b"article-voting/fingerprint/v1";

// 16 bytes, rendered as 32 hex characters
const FINGERPRINT_BYTES: usize = 16;

/// Derive the anonymous fingerprint for a visitor.
///
/// Both inputs are trimmed. If either is missing or blank the result is
/// `VisitorFingerprint::Unknown`. Visitors sharing an address and user agent
/// (NAT, proxies) get the same fingerprint.
pub fn fingerprint(remote_address: Option<&str>, user_agent: Option<&str>) -> VisitorFingerprint {
    let address = remote_address.map(str::trim).filter(|s| !s.is_empty());
    let agent = user_agent.map(str::trim).filter(|s| !s.is_empty());

    let (Some(address), Some(agent)) = (address, agent) else {
        return VisitorFingerprint::Unknown;
    };

    let mut hasher = Sha256::new();
    hasher.update(FINGERPRINT_DOMAIN);
    hasher.update(address.as_bytes());
    hasher.update([0u8]);
    hasher.update(agent.as_bytes());
    let digest = hasher.finalize();

    VisitorFingerprint::Known(hex::encode(&digest[..FINGERPRINT_BYTES]))
}

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

use crate::error::{ConfigError, VoteError};
use crate::models::ItemId;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_ACTION: &[u8] = b"article_voting";
const TOKEN_BYTES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues and checks the anti-forgery tokens embedded in rendered widgets.
///
/// Time is cut into ticks of half the lifetime. A token is bound to the
/// item and to the tick it was issued in, and verifies during that tick and
/// the next one, so it lives between `lifetime / 2` and `lifetime`.
pub struct TokenIssuer {
    // Keyed once, cloned per token
    mac: HmacSha256,
    tick_secs: i64,
}

impl TokenIssuer {
    pub fn new(secret: impl AsRef<[u8]>, lifetime: Duration) -> Result<Self, ConfigError> {
        let mac = HmacSha256::new_from_slice(secret.as_ref()).map_err(|e| ConfigError::Invalid {
            key: "VOTE_TOKEN_SECRET",
            reason: e.to_string(),
        })?;

        Ok(Self {
            mac,
            tick_secs: (lifetime.num_seconds() / 2).max(1),
        })
    }

    pub fn issue(&self, item_id: ItemId) -> AuthToken {
        self.issue_at(item_id, Utc::now())
    }

    pub fn issue_at(&self, item_id: ItemId, now: DateTime<Utc>) -> AuthToken {
        let tag = self.keyed(item_id, self.tick(now)).finalize().into_bytes();
        AuthToken(hex::encode(&tag[..TOKEN_BYTES]))
    }

    pub fn verify(&self, item_id: ItemId, token: &str) -> Result<(), VoteError> {
        self.verify_at(item_id, token, Utc::now())
    }

    pub fn verify_at(&self, item_id: ItemId, token: &str, now: DateTime<Utc>) -> Result<(), VoteError> {
        let presented = match hex::decode(token.trim()) {
            Ok(bytes) if bytes.len() == TOKEN_BYTES => bytes,
            _ => return Err(VoteError::AuthTokenInvalid),
        };

        // Check both ticks regardless of the first result, in constant time
        let tick = self.tick(now);
        let current = self.keyed(item_id, tick).verify_truncated_left(&presented).is_ok();
        let previous = self.keyed(item_id, tick - 1).verify_truncated_left(&presented).is_ok();

        if current | previous {
            Ok(())
        } else {
            Err(VoteError::AuthTokenInvalid)
        }
    }

    fn tick(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp().div_euclid(self.tick_secs)
    }

    fn keyed(&self, item_id: ItemId, tick: i64) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(TOKEN_ACTION);
        mac.update(&item_id.to_le_bytes());
        mac.update(&tick.to_le_bytes());
        mac
    }
}

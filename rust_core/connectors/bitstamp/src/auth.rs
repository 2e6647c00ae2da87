//! Request signing for Bitstamp private endpoints.
//!
//! `signature = UPPER(HEX(HMAC_SHA256(secret, nonce + customer_id + api_key)))`,
//! sent together with the key and nonce as the `key`, `signature` and `nonce`
//! parameters of the request.

use chrono::Utc;
use connectors_common::{ConnectorError, Result};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

type HmacSha256 = Hmac<Sha256>;

/// Source of Unix time in seconds.
pub trait Clock: Send + Sync {
    fn unix_seconds(&self) -> Result<i64>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_seconds(&self) -> Result<i64> {
        let now = Utc::now().timestamp();
        if now < 0 {
            return Err(ConnectorError::Clock(format!("system clock before unix epoch: {}", now)));
        }
        Ok(now)
    }
}

/// Clock pinned to a settable instant. Useful for reproducible signatures.
#[derive(Debug, Default)]
pub struct FixedClock(AtomicI64);

impl FixedClock {
    pub fn new(unix_seconds: i64) -> Self {
        FixedClock(AtomicI64::new(unix_seconds))
    }

    pub fn set(&self, unix_seconds: i64) {
        self.0.store(unix_seconds, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn unix_seconds(&self) -> Result<i64> {
        Ok(self.0.load(Ordering::SeqCst))
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub customer_id: String,
}

impl Credentials {
    pub fn new(api_key: &str, api_secret: &str, customer_id: &str) -> Self {
        Credentials {
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            customer_id: customer_id.to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("customer_id", &self.customer_id)
            .finish()
    }
}

/// Parameters authenticating exactly one private request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthParameters {
    pub key: String,
    pub signature: String,
    pub nonce: String,
}

impl AuthParameters {
    /// `(name, value)` pairs ready for a form or query encoder.
    pub fn to_pairs(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("key", self.key.as_str()),
            ("signature", self.signature.as_str()),
            ("nonce", self.nonce.as_str()),
        ]
    }
}

/// Uppercase hex HMAC-SHA256 of `nonce + customer_id + api_key`.
pub fn sign(credentials: &Credentials, nonce: &str) -> Result<String> {
    if credentials.api_secret.is_empty() {
        return Err(ConnectorError::Config("bitstamp api secret is empty".to_string()));
    }
    let message = format!("{}{}{}", nonce, credentials.customer_id, credentials.api_key);

    let mut mac = HmacSha256::new_from_slice(credentials.api_secret.as_bytes())
        .map_err(|e| ConnectorError::Other(format!("hmac init: {}", e)))?;
    mac.update(message.as_bytes());
    Ok(hex::encode_upper(mac.finalize().into_bytes()))
}

/// Signs private requests for one credential set.
///
/// Nonces are the clock's Unix seconds, bumped to `previous + 1` whenever the
/// clock has not moved past the last nonce handed out, so they strictly
/// increase even when several requests are signed within one second or from
/// several threads.
pub struct Signer {
    credentials: Credentials,
    clock: Box<dyn Clock>,
    last_nonce: AtomicI64,
}

impl Signer {
    pub fn new(credentials: Credentials) -> Self {
        Signer::with_clock(credentials, SystemClock)
    }

    pub fn with_clock(credentials: Credentials, clock: impl Clock + 'static) -> Self {
        Signer {
            credentials,
            clock: Box::new(clock),
            last_nonce: AtomicI64::new(0),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn compute_auth(&self) -> Result<AuthParameters> {
        let nonce = self.next_nonce()?.to_string();
        let signature = sign(&self.credentials, &nonce)?;
        Ok(AuthParameters {
            key: self.credentials.api_key.clone(),
            signature,
            nonce,
        })
    }

    fn next_nonce(&self) -> Result<i64> {
        let now = self.clock.unix_seconds()?;
        let prev = match self
            .last_nonce
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
        {
            Ok(prev) | Err(prev) => prev,
        };
        Ok(now.max(prev + 1))
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("credentials", &self.credentials)
            .field("last_nonce", &self.last_nonce.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    const GOLDEN: &str = "DCBA5179D2771922C8E85A279B77F8AAA2B285D17C9C881CE6EC0E9867FA5848";

    fn creds() -> Credentials {
        Credentials::new("KEY", "SECRET", "CID")
    }

    struct BrokenClock;

    impl Clock for BrokenClock {
        fn unix_seconds(&self) -> Result<i64> {
            Err(ConnectorError::Clock("no time source".to_string()))
        }
    }

    #[test]
    fn golden_signature() {
        assert_eq!(sign(&creds(), "1609459200").unwrap(), GOLDEN);

        let signer = Signer::with_clock(creds(), FixedClock::new(1_609_459_200));
        let auth = signer.compute_auth().unwrap();
        assert_eq!(
            auth,
            AuthParameters {
                key: "KEY".to_string(),
                signature: GOLDEN.to_string(),
                nonce: "1609459200".to_string(),
            }
        );
    }

    #[test]
    fn signature_is_64_uppercase_hex() {
        for (secret, nonce) in [("s", "1"), ("a much longer secret value", "1700000000"), ("ß€", "42")] {
            let c = Credentials::new("key", secret, "123456");
            let sig = sign(&c, nonce).unwrap();
            assert_eq!(sig.len(), 64);
            assert!(sig.chars().all(|ch| ch.is_ascii_digit() || ('A'..='F').contains(&ch)), "{}", sig);
        }
    }

    #[test]
    fn same_inputs_same_signature() {
        let a = Signer::with_clock(creds(), FixedClock::new(1_700_000_000)).compute_auth().unwrap();
        let b = Signer::with_clock(creds(), FixedClock::new(1_700_000_000)).compute_auth().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn message_order_matters() {
        let swapped = Credentials::new("CID", "SECRET", "KEY");
        assert_ne!(sign(&swapped, "1609459200").unwrap(), GOLDEN);
    }

    #[test]
    fn empty_secret_is_rejected() {
        let c = Credentials::new("KEY", "", "CID");
        assert!(matches!(sign(&c, "1"), Err(ConnectorError::Config(_))));
    }

    #[test]
    fn empty_key_still_signs() {
        let c = Credentials::new("", "SECRET", "CID");
        assert_eq!(sign(&c, "1").unwrap().len(), 64);
    }

    #[test]
    fn clock_failure_fails_the_call() {
        let signer = Signer::with_clock(creds(), BrokenClock);
        assert!(matches!(signer.compute_auth(), Err(ConnectorError::Clock(_))));
    }

    #[test]
    fn nonces_increase_within_one_second() {
        let signer = Signer::with_clock(creds(), FixedClock::new(1_609_459_200));
        let nonces: Vec<i64> = (0..3)
            .map(|_| signer.compute_auth().unwrap().nonce.parse().unwrap())
            .collect();
        assert_eq!(nonces, vec![1_609_459_200, 1_609_459_201, 1_609_459_202]);
    }

    #[test]
    fn nonce_follows_clock_once_it_catches_up() {
        let clock = Arc::new(FixedClock::new(100));
        let signer = Signer::with_clock(creds(), SharedClock(Arc::clone(&clock)));
        assert_eq!(signer.compute_auth().unwrap().nonce, "100");
        assert_eq!(signer.compute_auth().unwrap().nonce, "101");
        clock.set(500);
        assert_eq!(signer.compute_auth().unwrap().nonce, "500");
        // clock stepping backwards never reuses a nonce
        clock.set(50);
        assert_eq!(signer.compute_auth().unwrap().nonce, "501");
    }

    #[test]
    fn concurrent_signing_never_repeats_a_nonce() {
        let signer = Arc::new(Signer::with_clock(creds(), FixedClock::new(1_000)));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let signer = Arc::clone(&signer);
                thread::spawn(move || {
                    (0..50)
                        .map(|_| signer.compute_auth().unwrap().nonce)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for h in handles {
            for nonce in h.join().unwrap() {
                assert!(seen.insert(nonce.clone()), "duplicate nonce {}", nonce);
            }
        }
        assert_eq!(seen.len(), 400);
    }

    #[test]
    fn pairs_and_debug() {
        let auth = Signer::with_clock(creds(), FixedClock::new(1_609_459_200)).compute_auth().unwrap();
        assert_eq!(
            auth.to_pairs(),
            vec![("key", "KEY"), ("signature", GOLDEN), ("nonce", "1609459200")]
        );
        let dbg = format!("{:?}", creds());
        assert!(!dbg.contains("SECRET"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn system_clock_is_after_epoch() {
        assert!(SystemClock.unix_seconds().unwrap() > 1_600_000_000);
    }

    struct SharedClock(Arc<FixedClock>);

    impl Clock for SharedClock {
        fn unix_seconds(&self) -> Result<i64> {
            self.0.unix_seconds()
        }
    }
}

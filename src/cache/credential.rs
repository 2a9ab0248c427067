use crate::helpers::time::now_u64;

/// Bearer token with its absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub expires_at_unix_ts: u64, // UNIX TIMESTAMP
}

impl Credential {
    pub fn new(token: String, expires_at_unix_ts: u64) -> Self {
        Self { token, expires_at_unix_ts }
    }

    /// Credential issued at `issued_at` with a reported lifetime.
    pub fn issued(token: String, issued_at_unix_ts: u64, lifetime_seconds: u64) -> Self {
        Self::new(token, issued_at_unix_ts.saturating_add(lifetime_seconds))
    }

    /// Instant from which the token must no longer be handed out
    pub fn refresh_at(&self, buffer_seconds: u64) -> u64 {
        self.expires_at_unix_ts.saturating_sub(buffer_seconds)
    }

    pub fn is_usable_at(&self, now_unix_ts: u64, buffer_seconds: u64) -> bool {
        !self.token.is_empty() && now_unix_ts < self.refresh_at(buffer_seconds)
    }

    pub fn is_usable(&self, buffer_seconds: u64) -> bool {
        self.is_usable_at(now_u64(), buffer_seconds)
    }

    pub fn seconds_until_expiry(&self) -> u64 {
        self.expires_at_unix_ts.saturating_sub(now_u64())
    }
}

#[cfg(test)]
mod tests {
    use super::Credential;

    #[test]
    fn usable_strictly_before_buffer_window() {
        let credential = Credential::issued("abc".into(), 1_000, 3_600);
        assert_eq!(credential.expires_at_unix_ts, 4_600);

        assert!(credential.is_usable_at(4_539, 60));
        assert!(!credential.is_usable_at(4_540, 60));
        assert!(!credential.is_usable_at(4_600, 60));
    }

    #[test]
    fn zero_lifetime_is_never_usable() {
        let credential = Credential::issued("abc".into(), 1_000, 0);
        assert!(!credential.is_usable_at(1_000, 60));
        assert!(!credential.is_usable_at(1_000, 0));
    }

    #[test]
    fn empty_token_is_never_usable() {
        let credential = Credential::new(String::new(), u64::MAX);
        assert!(!credential.is_usable_at(0, 60));
    }
}

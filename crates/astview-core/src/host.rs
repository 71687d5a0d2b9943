//! Local host identity.
//!
//! Every per-host view name and filter predicate is keyed on the machine
//! hostname. The hostname is resolved once at startup and treated as
//! immutable for the process lifetime.

use thiserror::Error;

/// Substring that marks a host as serving the external ("upstream") context.
const UPSTREAM_MARKER: &str = "upstream";

/// Errors raised while resolving the local hostname.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to read system hostname: {0}")]
    Lookup(#[from] std::io::Error),

    #[error("system hostname is not valid UTF-8: {0:?}")]
    NotUtf8(std::ffi::OsString),
}

/// The local machine's hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    name: String,
}

impl HostIdentity {
    /// Resolves the identity from the operating system.
    ///
    /// A hostname that is not valid UTF-8 is rejected rather than mangled:
    /// a lossy conversion would silently derive view names that no other
    /// tool looking at the same host could reproduce.
    pub fn detect() -> Result<Self, HostError> {
        let raw = hostname::get()?;
        let name = raw.into_string().map_err(HostError::NotUtf8)?;
        Ok(Self::from_name(name))
    }

    /// Builds an identity from an explicit name. Used by tests and tooling.
    #[must_use]
    pub fn from_name(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The raw hostname string.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowercase 32-character hex MD5 digest of the hostname.
    ///
    /// The digest only mangles the hostname into a bounded, identifier-safe
    /// fragment for view names; it carries no security weight. It must stay
    /// MD5: databases provisioned by earlier deployments already hold views
    /// named from this exact digest.
    #[must_use]
    pub fn digest(&self) -> String {
        format!("{:x}", md5::compute(self.name.as_bytes()))
    }

    /// True when this host serves the external context.
    ///
    /// Matching is case-sensitive, on the raw hostname.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        self.name.contains(UPSTREAM_MARKER)
    }
}

impl std::fmt::Display for HostIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_returns_nonempty_name() {
        let host = HostIdentity::detect().expect("hostname lookup failed");
        assert!(!host.name().is_empty());
    }

    #[test]
    fn test_digest_is_deterministic() {
        let a = HostIdentity::from_name("upstream-01");
        let b = HostIdentity::from_name("upstream-01");
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn test_digest_known_vectors() {
        // Standard MD5 test vectors.
        assert_eq!(
            HostIdentity::from_name("").digest(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(
            HostIdentity::from_name("abc").digest(),
            "900150983cd24fb0d6963f7d28e17f72"
        );
    }

    #[test]
    fn test_digest_differs_across_hosts() {
        let a = HostIdentity::from_name("upstream-01");
        let b = HostIdentity::from_name("upstream-02");
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn test_digest_shape() {
        let digest = HostIdentity::from_name("pbx-internal-02").digest();
        assert_eq!(digest.len(), 32);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, digest.to_lowercase());
    }

    #[test]
    fn test_upstream_gate() {
        assert!(HostIdentity::from_name("upstream-01").is_upstream());
        assert!(HostIdentity::from_name("sip-upstream-eu").is_upstream());
        assert!(!HostIdentity::from_name("pbx-internal-02").is_upstream());
        // The marker is matched case-sensitively.
        assert!(!HostIdentity::from_name("UPSTREAM-01").is_upstream());
    }
}

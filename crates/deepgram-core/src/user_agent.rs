//! Identity string sent with every request.

use std::fmt;

use crate::{CoreError, Result};

/// Version of this library, fixed at compile time.
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");

const LIBRARY_NAME: &str = "deepgram";
const PLATFORM_NAME: &str = "rust";
const UNKNOWN: &str = "unknown";

/// Placeholder vergen writes when it could not query rustc.
const VERGEN_PLACEHOLDER: &str = "VERGEN_IDEMPOTENT_OUTPUT";

/// Characters stripped from the platform version so it stays one token.
const STRIPPED: &[char] = &[' ', '/', ':', ';', '_', '(', ')'];

/// Version of the compiler this crate was built with, or `"unknown"`.
pub fn platform_version() -> String {
    let raw = option_env!("VERGEN_RUSTC_SEMVER")
        .filter(|v| *v != VERGEN_PLACEHOLDER)
        .unwrap_or(UNKNOWN);
    sanitize(raw)
}

/// The `deepgram/{version} rust/{version}` identity string.
pub fn user_agent() -> String {
    UserAgent {
        library_version: LIBRARY_VERSION.to_string(),
        platform_version: platform_version(),
    }
    .to_string()
}

fn sanitize(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| !STRIPPED.contains(c)).collect();
    if cleaned.is_empty() {
        UNKNOWN.to_string()
    } else {
        cleaned
    }
}

/// Identity string built from explicit version parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgent {
    library_version: String,
    platform_version: String,
}

impl UserAgent {
    /// Fails with [`CoreError::MetadataMissing`] when `library_version` is
    /// blank. Whitespace inside it is removed; the platform version is
    /// sanitized like the built-in one.
    pub fn new(library_version: &str, platform_version: &str) -> Result<Self> {
        let library_version: String = library_version
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if library_version.is_empty() {
            return Err(CoreError::MetadataMissing);
        }
        Ok(Self {
            library_version,
            platform_version: sanitize(platform_version),
        })
    }

    pub fn library_version(&self) -> &str {
        &self.library_version
    }

    pub fn platform_version(&self) -> &str {
        &self.platform_version
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} {}/{}",
            LIBRARY_NAME, self.library_version, PLATFORM_NAME, self.platform_version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two space-separated `name/version` tokens without extra spaces.
    fn assert_identity_shape(agent: &str) {
        let tokens: Vec<&str> = agent.split(' ').collect();
        assert_eq!(tokens.len(), 2, "unexpected shape: {agent}");
        for token in tokens {
            let (name, version) = token.split_once('/').expect("missing slash");
            assert!(!name.is_empty(), "empty name in {agent}");
            assert!(!version.is_empty(), "empty version in {agent}");
        }
    }

    #[test]
    fn test_user_agent_shape() {
        let agent = user_agent();
        assert!(agent.starts_with(&format!("deepgram/{} rust/", LIBRARY_VERSION)));
        assert_identity_shape(&agent);
    }

    #[test]
    fn test_platform_version_is_one_token() {
        let version = platform_version();
        assert!(!version.is_empty());
        assert!(!version.contains(STRIPPED));
    }

    #[test]
    fn test_sanitize_strips_separators() {
        assert_eq!(sanitize(".NET Core 3.1.0"), ".NETCore3.1.0");
        assert_eq!(sanitize("1.80.0 (x86_64; linux/gnu: abc)"), "1.80.0x8664linuxgnuabc");
        assert_eq!(sanitize(" ()"), "unknown");
    }

    #[test]
    fn test_explicit_parts() {
        let agent = UserAgent::new("1.2.3", "1.89.0 (stable)").unwrap();
        assert_eq!(agent.to_string(), "deepgram/1.2.3 rust/1.89.0stable");
        assert_identity_shape(&agent.to_string());
    }

    #[test]
    fn test_missing_library_version() {
        assert!(matches!(
            UserAgent::new("  ", "1.89.0"),
            Err(CoreError::MetadataMissing)
        ));
    }
}

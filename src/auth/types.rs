//! Auth configuration types
//!
//! Chargebee authenticates every API call with HTTP Basic auth: the API key is
//! the username and the password is empty.

/// Authentication configuration
#[derive(Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// HTTP Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },
}

impl AuthConfig {
    /// Basic auth with the API key as username and an empty password
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::Basic {
            username: key.into(),
            password: String::new(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthConfig::None => f.write_str("None"),
            AuthConfig::Basic { .. } => f
                .debug_struct("Basic")
                .field("username", &"<redacted>")
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

#[cfg(test)]
mod type_tests {
    use super::*;

    #[test]
    fn test_auth_config_default() {
        let config = AuthConfig::default();
        assert!(matches!(config, AuthConfig::None));
    }

    #[test]
    fn test_api_key_has_empty_password() {
        assert_eq!(
            AuthConfig::api_key("test_key"),
            AuthConfig::Basic {
                username: "test_key".to_string(),
                password: String::new(),
            }
        );
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let debug = format!("{:?}", AuthConfig::api_key("live_secret"));
        assert!(!debug.contains("live_secret"));
        assert!(debug.contains("Basic"));
    }
}

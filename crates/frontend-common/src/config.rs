//! Frontend configuration

/// Authentication configuration
pub struct AuthConfig;

impl AuthConfig {
    /// Durable storage key holding the serialized current user
    pub const USER_KEY: &'static str = "UserInfo";

    /// Durable storage key holding the bearer token
    pub const TOKEN_KEY: &'static str = subtuber_core::TOKEN_KEY;

    /// Name of the session cookie expired on logout
    pub const SESSION_COOKIE: &'static str = subtuber_core::TOKEN_KEY;

    /// Path the session cookie is always set at. Expiry targets this fixed
    /// path rather than the current page path, so logout from a nested page
    /// still clears it.
    pub const COOKIE_PATH: &'static str = "/";
}

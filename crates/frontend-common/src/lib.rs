//! Session state, auth flows and display helpers shared by subtuber frontends

pub mod auth;
pub mod config;
pub mod format;
pub mod services;

pub use auth::{
    AuthSession, CookieJar, CookieScope, LogoutHandle, LogoutReport, NotifyStatus, User,
};
pub use config::AuthConfig;
pub use services::{AuthFlowError, AuthService, SignedIn};

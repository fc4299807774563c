pub mod auth;

pub use auth::{AuthFlowError, AuthService, SignedIn};

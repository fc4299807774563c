//! Authentication module

pub mod cookies;
pub mod logout;
pub mod session;
pub mod user;

// Re-export commonly used items
pub use cookies::{CookieJar, CookieScope};
#[cfg(target_arch = "wasm32")]
pub use cookies::DocumentCookies;
#[cfg(not(target_arch = "wasm32"))]
pub use cookies::JarCookies;
pub use logout::{LogoutHandle, LogoutReport, NotifyStatus};
pub use session::AuthSession;
pub use user::User;

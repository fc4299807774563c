//! Session cookie expiry across host and parent-domain scopes

use std::net::IpAddr;
use subtuber_core::StorageError;

/// Where a cookie lives: an optional `Domain` attribute and a `Path`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookieScope {
    /// `None` targets the host-only cookie
    pub domain: Option<String>,
    pub path: String,
}

impl CookieScope {
    pub fn host_only(path: impl Into<String>) -> Self {
        Self {
            domain: None,
            path: path.into(),
        }
    }

    pub fn domain(domain: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            path: path.into(),
        }
    }

    /// `Set-Cookie` / `document.cookie` string that expires `name` in this scope
    pub fn expiry_cookie(&self, name: &str) -> String {
        let mut cookie = format!(
            "{name}=; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Path={}",
            self.path
        );
        if let Some(domain) = &self.domain {
            cookie.push_str("; Domain=");
            cookie.push_str(domain);
        }
        cookie
    }
}

/// Cookie storage the session can expire cookies in
#[cfg_attr(test, mockall::automock)]
pub trait CookieJar: Send + Sync {
    /// Host of the current origin, when known
    fn host(&self) -> Option<String>;

    /// Expire `name` within `scope`
    fn expire(&self, name: &str, scope: &CookieScope) -> Result<(), StorageError>;
}

/// Domain left after dropping the leftmost label.
///
/// IP addresses and two-label hosts have no registrable parent.
pub fn parent_domain(host: &str) -> Option<String> {
    let host = host.trim_end_matches('.');
    if host.parse::<IpAddr>().is_ok() || host.starts_with('[') {
        return None;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 3 || labels.iter().any(|label| label.is_empty()) {
        return None;
    }
    Some(labels[1..].join("."))
}

/// Scopes to expire on logout: host-only, the host as domain, and its parent
pub fn expiry_scopes(host: Option<&str>, path: &str) -> Vec<CookieScope> {
    let mut scopes = vec![CookieScope::host_only(path)];
    if let Some(host) = host.filter(|h| !h.is_empty()) {
        scopes.push(CookieScope::domain(host, path));
        if let Some(parent) = parent_domain(host) {
            scopes.push(CookieScope::domain(parent, path));
        }
    }
    scopes
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::JarCookies;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::{CookieJar, CookieScope};
    use std::sync::Arc;
    use subtuber_core::StorageError;
    use url::Url;

    /// Cookie jar shared with the native `reqwest` client
    #[derive(Clone, Debug)]
    pub struct JarCookies {
        jar: Arc<reqwest::cookie::Jar>,
        origin: Url,
    }

    impl JarCookies {
        pub fn new(jar: Arc<reqwest::cookie::Jar>, origin: Url) -> Self {
            Self { jar, origin }
        }
    }

    impl CookieJar for JarCookies {
        fn host(&self) -> Option<String> {
            self.origin.host_str().map(str::to_owned)
        }

        fn expire(&self, name: &str, scope: &CookieScope) -> Result<(), StorageError> {
            if self.origin.cannot_be_a_base() {
                return Err(StorageError::unavailable(format!(
                    "origin {} cannot hold cookies",
                    self.origin
                )));
            }
            let mut url = self.origin.clone();
            url.set_path(&scope.path);
            self.jar.add_cookie_str(&scope.expiry_cookie(name), &url);
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::DocumentCookies;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{CookieJar, CookieScope};
    use subtuber_core::StorageError;
    use wasm_bindgen::JsCast;
    use web_sys::HtmlDocument;

    /// `document.cookie` of the current page
    #[derive(Clone, Copy, Debug, Default)]
    pub struct DocumentCookies;

    impl CookieJar for DocumentCookies {
        fn host(&self) -> Option<String> {
            web_sys::window()?.location().hostname().ok()
        }

        fn expire(&self, name: &str, scope: &CookieScope) -> Result<(), StorageError> {
            let document = web_sys::window()
                .and_then(|w| w.document())
                .ok_or_else(|| StorageError::unavailable("no document"))?;
            let document: HtmlDocument = document
                .dyn_into()
                .map_err(|_| StorageError::unavailable("document is not an HTML document"))?;
            document
                .set_cookie(&scope.expiry_cookie(name))
                .map_err(|e| StorageError::unavailable(format!("{e:?}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_domain() {
        assert_eq!(
            parent_domain("app.example.com").as_deref(),
            Some("example.com")
        );
        assert_eq!(
            parent_domain("a.b.example.co.uk").as_deref(),
            Some("b.example.co.uk")
        );
        assert_eq!(parent_domain("example.com"), None);
        assert_eq!(parent_domain("localhost"), None);
        assert_eq!(parent_domain("127.0.0.1"), None);
    }

    #[test]
    fn test_expiry_scopes() {
        assert_eq!(
            expiry_scopes(Some("app.example.com"), "/"),
            vec![
                CookieScope::host_only("/"),
                CookieScope::domain("app.example.com", "/"),
                CookieScope::domain("example.com", "/"),
            ]
        );
        assert_eq!(
            expiry_scopes(Some("localhost"), "/"),
            vec![
                CookieScope::host_only("/"),
                CookieScope::domain("localhost", "/"),
            ]
        );
        assert_eq!(expiry_scopes(None, "/"), vec![CookieScope::host_only("/")]);
    }

    #[test]
    fn test_expiry_cookie_string() {
        assert_eq!(
            CookieScope::domain("example.com", "/").expiry_cookie("subtuber_token"),
            "subtuber_token=; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Path=/; Domain=example.com"
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_jar_cookies_expire_every_scope() {
        use reqwest::cookie::{CookieStore, Jar};
        use std::sync::Arc;
        use url::Url;

        let origin = Url::parse("http://app.example.com/").unwrap();
        let jar = Arc::new(Jar::default());
        jar.add_cookie_str("subtuber_token=host; Path=/", &origin);
        jar.add_cookie_str("subtuber_token=parent; Path=/; Domain=example.com", &origin);
        assert!(jar.cookies(&origin).is_some());

        let cookies = JarCookies::new(jar.clone(), origin.clone());
        for scope in expiry_scopes(cookies.host().as_deref(), "/") {
            cookies.expire("subtuber_token", &scope).unwrap();
        }

        assert!(jar.cookies(&origin).is_none());
    }
}

//! Integration tests for the auth session and sign-in flows

use reqwest::cookie::{CookieStore, Jar};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use subtuber_core::{KeyValueStore, MemoryStore, SharedStore, StorageError, StorageStatus, TokenStore};
use subtuber_frontend_common::auth::JarCookies;
use subtuber_frontend_common::{
    AuthConfig, AuthFlowError, AuthService, AuthSession, NotifyStatus, User,
};
use subtuber_http::ApiClient;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Store whose backend is never reachable
struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::unavailable("storage disabled"))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::unavailable("storage disabled"))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::unavailable("storage disabled"))
    }
}

struct Harness {
    store: SharedStore,
    jar: Arc<Jar>,
    api: String,
    /// Origin of the page holding the cookies
    origin: Url,
}

impl Harness {
    fn new(origin: &str) -> Self {
        Self::with_store(origin, Arc::new(MemoryStore::new()))
    }

    fn with_store(origin: &str, store: SharedStore) -> Self {
        Self {
            store,
            jar: Arc::new(Jar::default()),
            api: origin.to_string(),
            origin: Url::parse(origin).unwrap(),
        }
    }

    fn with_site(mut self, origin: &str) -> Self {
        self.origin = Url::parse(origin).unwrap();
        self
    }

    /// A fresh session over the same storage, as after a reload
    fn session(&self) -> AuthSession {
        let client = ApiClient::builder()
            .origin(self.api.as_str())
            .token_store(TokenStore::new(self.store.clone()))
            .cookie_jar(self.jar.clone())
            .build()
            .unwrap();
        let cookies = JarCookies::new(self.jar.clone(), self.origin.clone());
        AuthSession::restore(self.store.clone(), client, Arc::new(cookies))
    }
}

#[tokio::test]
async fn test_set_user_then_get_user() {
    let harness = Harness::new("http://127.0.0.1:9");
    let mut session = harness.session();
    assert!(!session.is_logged_in());
    assert_eq!(session.user(), None);

    let alice = User::new().with("name", "alice");
    assert!(session.set_user(Some(alice.clone())).is_ok());
    assert_eq!(session.user(), Some(&alice));
    assert!(session.is_logged_in());

    assert!(session.set_user(None).is_ok());
    assert_eq!(session.user(), None);
    assert!(!session.is_logged_in());
}

#[tokio::test]
async fn test_user_survives_reload() {
    let harness = Harness::new("http://127.0.0.1:9");
    let user = User::new().with("name", "alice").with("id", 42);
    harness.session().set_user(Some(user.clone()));

    let reloaded = harness.session();
    assert_eq!(reloaded.user(), Some(&user));
    assert!(reloaded.restore_status().is_ok());
}

#[tokio::test]
async fn test_restore_persisted_alice() {
    let store: SharedStore = Arc::new(MemoryStore::with_entries([(
        AuthConfig::USER_KEY,
        r#"{"name":"alice"}"#,
    )]));
    let session = Harness::with_store("http://127.0.0.1:9", store).session();

    assert_eq!(session.user().unwrap().get("name"), Some(&json!("alice")));
    assert!(session.is_logged_in());
}

#[tokio::test]
async fn test_corrupt_user_record_starts_anonymous() {
    let store: SharedStore = Arc::new(MemoryStore::with_entries([(
        AuthConfig::USER_KEY,
        "{not json",
    )]));
    let session = Harness::with_store("http://127.0.0.1:9", store).session();

    assert!(!session.is_logged_in());
    assert!(matches!(session.restore_status(), StorageStatus::Corrupt(_)));
}

#[tokio::test]
async fn test_unavailable_storage_keeps_memory_state() {
    let harness = Harness::with_store("http://127.0.0.1:9", Arc::new(UnavailableStore));
    let mut session = harness.session();
    assert!(matches!(
        session.restore_status(),
        StorageStatus::Unavailable(_)
    ));

    let user = User::new().with("name", "bob");
    let status = session.set_user(Some(user.clone()));

    assert_eq!(status, StorageStatus::Unavailable("storage disabled".to_string()));
    assert_eq!(session.user(), Some(&user));
    assert!(session.is_logged_in());
    assert_eq!(session.tokens().get(), None);
}

#[tokio::test]
async fn test_logout_with_unavailable_storage() {
    let harness = Harness::with_store("http://127.0.0.1:9", Arc::new(UnavailableStore));
    let mut session = harness.session();
    session.set_user(Some(User::new().with("name", "bob")));
    assert!(session.is_logged_in());

    let report = session.logout();

    assert_eq!(session.user(), None);
    assert!(!session.is_logged_in());
    assert!(matches!(report.user, StorageStatus::Unavailable(_)));
    assert!(matches!(report.token, StorageStatus::Unavailable(_)));
    assert!(report.cookies.iter().all(StorageStatus::is_ok));
    assert!(!report.local_state_cleared());
}

#[tokio::test]
async fn test_logout_clears_state_when_backend_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let harness = Harness::new(&mock_server.uri());
    let mut session = harness.session();
    session.tokens().set(Some("tok"));
    session.set_user(Some(User::new().with("name", "alice")));

    let report = session.logout();

    assert_eq!(session.user(), None);
    assert!(!session.is_logged_in());
    assert_eq!(session.tokens().get(), None);
    assert!(report.local_state_cleared());
    assert_eq!(harness.session().user(), None);

    let status = tokio::time::timeout(Duration::from_secs(5), report.notification.wait())
        .await
        .unwrap();
    assert!(matches!(status, NotifyStatus::Failed(_)));
}

#[tokio::test]
async fn test_logout_notifies_backend_with_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let harness = Harness::new(&mock_server.uri());
    let mut session = harness.session();
    session.tokens().set(Some("tok"));

    let report = session.logout();
    assert_eq!(session.tokens().get(), None);

    let status = tokio::time::timeout(Duration::from_secs(5), report.notification.wait())
        .await
        .unwrap();
    assert_eq!(status, NotifyStatus::Completed);
}

#[tokio::test]
async fn test_logout_with_unreachable_backend() {
    let harness = Harness::new("http://127.0.0.1:9");
    let mut session = harness.session();
    session.tokens().set(Some("tok"));
    session.set_user(Some(User::new().with("name", "alice")));

    let report = session.logout();

    assert_eq!(session.user(), None);
    assert_eq!(session.tokens().get(), None);

    let status = tokio::time::timeout(Duration::from_secs(15), report.notification.wait())
        .await
        .unwrap();
    assert!(matches!(status, NotifyStatus::Failed(_)));
}

#[tokio::test]
async fn test_logout_expires_session_cookies() {
    let harness = Harness::new("http://127.0.0.1:9").with_site("http://app.example.com/");
    harness
        .jar
        .add_cookie_str("subtuber_token=abc; Path=/", &harness.origin);
    harness.jar.add_cookie_str(
        "subtuber_token=abc; Path=/; Domain=example.com",
        &harness.origin,
    );
    assert!(harness.jar.cookies(&harness.origin).is_some());

    let mut session = harness.session();
    let report = session.logout();

    assert_eq!(report.cookies.len(), 3);
    assert!(report.cookies.iter().all(StorageStatus::is_ok));
    assert!(harness.jar.cookies(&harness.origin).is_none());
}

#[tokio::test]
async fn test_login_establishes_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({"username": "alice", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-1",
            "user": {"name": "Alice", "id": 1}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let harness = Harness::new(&mock_server.uri());
    let mut session = harness.session();

    let signed_in = AuthService::new()
        .login(&mut session, "alice", "pw")
        .await
        .unwrap();

    assert_eq!(signed_in.user.display_name(), Some("Alice"));
    assert!(signed_in.token.is_ok());
    assert!(signed_in.user_record.is_ok());
    assert_eq!(session.tokens().get().as_deref(), Some("tok-1"));
    assert_eq!(harness.session().user(), Some(&signed_in.user));
}

#[tokio::test]
async fn test_login_without_token_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {"name": "x"}})))
        .mount(&mock_server)
        .await;

    let harness = Harness::new(&mock_server.uri());
    let mut session = harness.session();

    let err = AuthService::new()
        .login(&mut session, "alice", "pw")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthFlowError::MissingToken("login")));
    assert!(!session.is_logged_in());
    assert_eq!(session.tokens().get(), None);
}

#[tokio::test]
async fn test_login_server_error_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "bad credentials"})),
        )
        .mount(&mock_server)
        .await;

    let harness = Harness::new(&mock_server.uri());
    let mut session = harness.session();

    let err = AuthService::new()
        .login(&mut session, "alice", "wrong")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "bad credentials");
    assert!(!session.is_logged_in());
}

#[tokio::test]
async fn test_verify_code_falls_back_to_email_user() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/verify"))
        .and(body_json(json!({"email": "a@example.com", "code": "123456"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-2"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let harness = Harness::new(&mock_server.uri());
    let mut session = harness.session();

    let signed_in = AuthService::new()
        .verify_code(&mut session, "a@example.com", "123456")
        .await
        .unwrap();

    assert_eq!(signed_in.user, User::new().with("email", "a@example.com"));
    assert!(session.is_logged_in());
    assert_eq!(session.tokens().get().as_deref(), Some("tok-2"));
}

#[tokio::test]
async fn test_send_code_requires_email() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let harness = Harness::new(&mock_server.uri());
    let session = harness.session();

    let err = AuthService::new().send_code(&session, "").await.unwrap_err();
    assert_eq!(err.to_string(), "email required");
}

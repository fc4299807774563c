//! Detached backend notification for logout

use std::future::Future;
use subtuber_core::StorageStatus;
use subtuber_http::ApiClient;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Progress of the backend logout notification
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotifyStatus {
    Pending,
    Completed,
    Failed(String),
}

impl NotifyStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Handle on a notification running on a detached task.
///
/// Dropping the handle does not cancel the task.
#[derive(Clone, Debug)]
pub struct LogoutHandle {
    status: watch::Receiver<NotifyStatus>,
}

impl LogoutHandle {
    /// Send `request` on a detached task
    pub(crate) fn spawn(client: ApiClient, request: reqwest::RequestBuilder) -> Self {
        let (tx, rx) = watch::channel(NotifyStatus::Pending);
        let task = async move {
            let status = match client.send(request).await {
                Ok(()) => {
                    debug!("Backend session terminated");
                    NotifyStatus::Completed
                }
                Err(err) => {
                    warn!("Logout notification failed: {err}");
                    NotifyStatus::Failed(err.to_string())
                }
            };
            tx.send_replace(status);
        };

        if spawn_detached(task) {
            Self { status: rx }
        } else {
            warn!("No async runtime available, skipping logout notification");
            Self::finished(NotifyStatus::Failed("no async runtime".to_string()))
        }
    }

    /// Handle whose notification already has a final status
    pub fn finished(status: NotifyStatus) -> Self {
        let (_tx, rx) = watch::channel(status);
        Self { status: rx }
    }

    /// Current status, without waiting
    pub fn status(&self) -> NotifyStatus {
        self.status.borrow().clone()
    }

    /// Wait until the notification completes or fails
    pub async fn wait(mut self) -> NotifyStatus {
        let waited = self
            .status
            .wait_for(|status| !status.is_pending())
            .await
            .map(|status| status.clone());

        match waited {
            Ok(status) => status,
            Err(_) => {
                let last = self.status();
                if last.is_pending() {
                    NotifyStatus::Failed("logout notification task dropped".to_string())
                } else {
                    last
                }
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_detached<F>(task: F) -> bool
where
    F: Future<Output = ()> + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            drop(handle.spawn(task));
            true
        }
        Err(_) => false,
    }
}

#[cfg(target_arch = "wasm32")]
fn spawn_detached<F>(task: F) -> bool
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(task);
    true
}

/// What happened to each side channel during logout
#[derive(Debug)]
pub struct LogoutReport {
    /// Backend notification, still running when the report is returned
    pub notification: LogoutHandle,
    /// Removal of the durable user record
    pub user: StorageStatus,
    /// Removal of the session token
    pub token: StorageStatus,
    /// One entry per cookie scope, in expiry order
    pub cookies: Vec<StorageStatus>,
}

impl LogoutReport {
    /// Whether every local clear succeeded; the notification is not considered
    pub fn local_state_cleared(&self) -> bool {
        self.user.is_ok() && self.token.is_ok() && self.cookies.iter().all(StorageStatus::is_ok)
    }
}

//! CLI commands

use anyhow::{Context, Result};
use clap::Subcommand;
use reqwest::cookie::Jar;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use subtuber_core::{FileStore, SharedStore, StateDir, StorageStatus, TokenStore};
use subtuber_frontend_common::auth::JarCookies;
use subtuber_frontend_common::{AuthService, AuthSession, NotifyStatus};
use subtuber_http::ApiClient;
use subtuber_http::types::{AnalysisParams, SummaryParams};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Settings;
use crate::output;

/// How long `logout` waits for the backend before exiting
const LOGOUT_WAIT: Duration = Duration::from_secs(5);

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with a username and password
    Login {
        #[arg(long)]
        username: String,

        #[arg(long, env = "SUBTUBER_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Email a one-time login code
    SendCode {
        #[arg(long)]
        email: String,
    },

    /// Log in with an emailed code
    Verify {
        #[arg(long)]
        email: String,

        #[arg(long)]
        code: String,
    },

    /// End the current session
    Logout,

    /// Show the current user
    Whoami,

    /// Monitored streamers
    Streamers {
        #[command(subcommand)]
        command: StreamerCommands,
    },

    /// Live status of all streamers, or of one
    Status { id: Option<String> },

    /// Analysis result of a recording
    Analysis {
        video_id: String,

        #[arg(long)]
        windows_len: Option<u32>,

        #[arg(long)]
        thr: Option<f64>,

        #[arg(long)]
        search_range: Option<u32>,
    },

    /// Analysis summary
    Summary {
        #[arg(long)]
        video_id: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        offset_seconds: Option<i64>,
    },

    /// Backend clock
    Time,

    /// Bench list
    Benchlist,

    /// Known streamer names
    Names,

    /// Search Twitch channels
    Search { query: String },
}

#[derive(Subcommand)]
pub enum StreamerCommands {
    /// List monitored streamers
    List {
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Recordings of one streamer
    Vods { id: String },

    /// Start monitoring a streamer
    Subscribe {
        /// Request body as JSON, e.g. '{"name":"alice","platform":"twitch"}'
        #[arg(long)]
        json: String,
    },
}

/// Composition root owning the session and its collaborators
pub struct App {
    session: AuthSession,
    auth: AuthService,
}

impl App {
    /// Wire storage, token store, cookie jar, client and session together
    pub fn build(settings: &Settings, state_dir: &StateDir) -> Result<Self> {
        let storage_path = settings
            .storage
            .dir
            .as_ref()
            .map_or_else(|| state_dir.storage_path(), |dir| dir.join("storage.json"));
        debug!("Using storage file {}", storage_path.display());

        let store: SharedStore = Arc::new(FileStore::new(storage_path));
        let tokens = TokenStore::new(store.clone());
        let jar = Arc::new(Jar::default());

        let client = ApiClient::builder()
            .origin(settings.api.origin.as_str())
            .base_path(settings.api.base_path.as_str())
            .timeout(settings.api.timeout())
            .token_store(tokens)
            .cookie_jar(jar.clone())
            .build()
            .context("Failed to build API client")?;

        let origin = Url::parse(client.base_url())
            .with_context(|| format!("Invalid API URL: {}", client.base_url()))?;
        let cookies = JarCookies::new(jar, origin);

        let session = AuthSession::restore(store, client, Arc::new(cookies));
        if !session.restore_status().is_ok() {
            warn!(status = ?session.restore_status(), "Stored session could not be restored");
        }

        Ok(Self {
            session,
            auth: AuthService::new(),
        })
    }

    fn client(&self) -> &ApiClient {
        self.session.client()
    }
}

impl Commands {
    pub async fn execute(self, app: &mut App) -> Result<()> {
        match self {
            Self::Login { username, password } => {
                let signed_in = app
                    .auth
                    .login(&mut app.session, &username, &password)
                    .await?;
                report_persistence(&signed_in.token, &signed_in.user_record);
                println!("Logged in as {}", signed_in.user.display_name().unwrap_or(&username));
            }
            Self::SendCode { email } => {
                app.auth.send_code(&app.session, &email).await?;
                println!("Verification code sent to {email}");
            }
            Self::Verify { email, code } => {
                let signed_in = app.auth.verify_code(&mut app.session, &email, &code).await?;
                report_persistence(&signed_in.token, &signed_in.user_record);
                println!("Logged in as {}", signed_in.user.display_name().unwrap_or(&email));
            }
            Self::Logout => logout(app).await?,
            Self::Whoami => match app.session.user() {
                Some(user) => println!("{}", output::json(user)?),
                None => println!("Not logged in"),
            },
            Self::Streamers { command } => command.execute(app.client()).await?,
            Self::Status { id } => {
                let status = app.client().get_twitch_status(id.as_deref()).await?;
                println!("{}", output::json(&status)?);
            }
            Self::Analysis {
                video_id,
                windows_len,
                thr,
                search_range,
            } => {
                let params = AnalysisParams {
                    windows_len,
                    thr,
                    search_range,
                };
                print_optional(app.client().get_analysis(&video_id, &params).await?)?;
            }
            Self::Summary {
                video_id,
                offset_seconds,
            } => {
                let params = SummaryParams {
                    video_id,
                    offset_seconds,
                };
                print_optional(app.client().get_analysis_summary(&params).await?)?;
            }
            Self::Time => println!("{}", output::json(&app.client().get_time().await?)?),
            Self::Benchlist => println!("{}", output::json(&app.client().get_benchlist().await?)?),
            Self::Names => println!("{}", output::json(&app.client().get_names().await?)?),
            Self::Search { query } => {
                println!("{}", output::json(&app.client().search_twitch(&query).await?)?);
            }
        }
        Ok(())
    }
}

impl StreamerCommands {
    async fn execute(self, client: &ApiClient) -> Result<()> {
        match self {
            Self::List { json } => {
                let streamers = client.get_streamers().await?;
                if json {
                    println!("{}", output::json(&streamers)?);
                } else {
                    println!("{}", output::streamer_table(&streamers));
                }
            }
            Self::Vods { id } => {
                let vods = client.get_streamer_vods(&id).await?;
                println!("{}", output::json(&vods)?);
            }
            Self::Subscribe { json } => {
                let body: Value =
                    serde_json::from_str(&json).context("--json is not valid JSON")?;
                let created = client.subscribe_streamer(&body).await?;
                println!("{}", output::json(&created)?);
            }
        }
        Ok(())
    }
}

async fn logout(app: &mut App) -> Result<()> {
    if !app.session.is_logged_in() {
        info!("No user in session, clearing local state anyway");
    }

    let report = app.session.logout();
    if !report.local_state_cleared() {
        warn!(?report, "Some local session state could not be cleared");
    }

    match tokio::time::timeout(LOGOUT_WAIT, report.notification.wait()).await {
        Ok(NotifyStatus::Completed) => debug!("Backend acknowledged logout"),
        Ok(status) => warn!(?status, "Backend was not notified of logout"),
        Err(_) => warn!("Backend logout still pending after {LOGOUT_WAIT:?}"),
    }

    println!("Logged out");
    Ok(())
}

fn report_persistence(token: &StorageStatus, user: &StorageStatus) {
    if !token.is_ok() || !user.is_ok() {
        warn!(?token, ?user, "Session will not survive a restart");
    }
}

fn print_optional(value: Option<Value>) -> Result<()> {
    match value {
        Some(value) => println!("{}", output::json(&value)?),
        None => println!("No result"),
    }
    Ok(())
}

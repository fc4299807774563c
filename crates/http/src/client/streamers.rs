//! Monitored streamer endpoints

use super::ApiClient;
use crate::error::{ApiError, Result, require};
use crate::types::list_field;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

impl ApiClient {
    /// List monitored streamers
    pub async fn get_streamers(&self) -> Result<Vec<Value>> {
        let endpoint = self.endpoint("/streamers");
        let request = self.request(Method::GET, "/streamers");
        let payload: Value = self
            .execute(request)
            .await
            .map_err(|e| ApiError::fetch_failed(endpoint, e))?;
        Ok(list_field(&payload, "streamers"))
    }

    /// Recordings of one streamer
    pub async fn get_streamer_vods(&self, streamer_id: &str) -> Result<Vec<Value>> {
        require("streamerId", streamer_id)?;

        let endpoint = self.endpoint(&format!("/streamers/{streamer_id}"));
        let request = self.request_at(Method::GET, &["streamers", streamer_id]);
        let payload: Value = self
            .execute(request)
            .await
            .map_err(|e| ApiError::fetch_failed(endpoint, e))?;
        Ok(list_field(&payload, "vods"))
    }

    /// Register a new streamer to monitor
    pub async fn subscribe_streamer<B>(&self, streamer: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let endpoint = self.endpoint("/streamers/subscribe");
        let request = self
            .request(Method::POST, "/streamers/subscribe")
            .json(streamer);
        self.execute(request)
            .await
            .map_err(|e| ApiError::failed(endpoint, "subscribe streamer failed", e))
    }
}

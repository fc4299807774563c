//! Twitch live-status and analysis endpoints

use super::ApiClient;
use crate::error::{ApiError, Result, require};
use crate::types::{AnalysisParams, SummaryParams, optional_field};
use reqwest::Method;
use serde_json::{Value, json};

impl ApiClient {
    /// Live status of all streamers, or of one when `streamer_id` is given
    pub async fn get_twitch_status(&self, streamer_id: Option<&str>) -> Result<Value> {
        let (endpoint, request) = match streamer_id.filter(|id| !id.is_empty()) {
            Some(id) => (
                self.endpoint(&format!("/twitch/status/{id}")),
                self.request_at(Method::GET, &["twitch", "status", id]),
            ),
            None => (
                self.endpoint("/twitch/status"),
                self.request(Method::GET, "/twitch/status"),
            ),
        };

        let payload: Value = self
            .execute(request)
            .await
            .map_err(|e| ApiError::fetch_failed(endpoint, e))?;
        Ok(if payload.is_null() { json!({}) } else { payload })
    }

    /// Analysis result of one video; only the parameters that are set are sent
    pub async fn get_analysis(
        &self,
        video_id: &str,
        params: &AnalysisParams,
    ) -> Result<Option<Value>> {
        require("videoId", video_id)?;

        let endpoint = self.endpoint(&format!("/twitch/analysis/{video_id}"));
        let request = self
            .request_at(Method::GET, &["twitch", "analysis", video_id])
            .query(params);
        let payload: Value = self
            .execute(request)
            .await
            .map_err(|e| ApiError::fetch_failed(endpoint, e))?;
        Ok((!payload.is_null()).then_some(payload))
    }

    /// Analysis summary, extracted from the `summary` field
    pub async fn get_analysis_summary(&self, params: &SummaryParams) -> Result<Option<Value>> {
        let endpoint = self.endpoint("/twitch/analysis-summary");
        let request = self
            .request(Method::GET, "/twitch/analysis-summary")
            .query(params);
        let payload: Value = self
            .execute(request)
            .await
            .map_err(|e| ApiError::fetch_failed(endpoint, e))?;
        Ok(optional_field(&payload, "summary"))
    }
}

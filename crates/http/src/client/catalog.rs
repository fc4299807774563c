//! Catalog endpoints; payloads are returned as sent

use super::ApiClient;
use crate::error::{ApiError, Result};
use reqwest::Method;
use serde_json::Value;

impl ApiClient {
    /// Server time
    pub async fn get_time(&self) -> Result<Value> {
        self.get_raw("/time").await
    }

    /// Streamer bench list
    pub async fn get_benchlist(&self) -> Result<Value> {
        self.get_raw("/benchlist").await
    }

    /// Streamer display names
    pub async fn get_names(&self) -> Result<Value> {
        self.get_raw("/names").await
    }

    /// Search Twitch channels
    pub async fn search_twitch(&self, query: &str) -> Result<Value> {
        let endpoint = self.endpoint("/search/twitch");
        let request = self
            .request(Method::GET, "/search/twitch")
            .query(&[("q", query)]);
        self.execute(request)
            .await
            .map_err(|e| ApiError::fetch_failed(endpoint, e))
    }

    async fn get_raw(&self, path: &str) -> Result<Value> {
        let endpoint = self.endpoint(path);
        let request = self.request(Method::GET, path);
        self.execute(request)
            .await
            .map_err(|e| ApiError::fetch_failed(endpoint, e))
    }
}

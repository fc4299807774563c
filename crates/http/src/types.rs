//! Request and response types for the subtuber backend

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Username/password login body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /auth/send-code`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCodeRequest {
    pub email: String,
}

/// Body of `POST /auth/verify`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

/// Response of the credential exchanges (`/login`, `/auth/verify`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Map<String, Value>>,
    /// Any other fields the backend returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Optional tuning parameters of `GET /twitch/analysis/{id}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AnalysisParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows_len: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_range: Option<u32>,
}

impl AnalysisParams {
    pub fn new(windows_len: u32, thr: f64, search_range: u32) -> Self {
        Self {
            windows_len: Some(windows_len),
            thr: Some(thr),
            search_range: Some(search_range),
        }
    }
}

/// Query of `GET /twitch/analysis-summary`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryParams {
    #[serde(skip_serializing_if = "is_blank")]
    pub video_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_seconds: Option<i64>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

/// Array under `field`, empty when the payload or field is missing
pub(crate) fn list_field(payload: &Value, field: &str) -> Vec<Value> {
    payload
        .get(field)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Non-null value under `field`
pub(crate) fn optional_field(payload: &Value, field: &str) -> Option<Value> {
    payload.get(field).filter(|value| !value.is_null()).cloned()
}

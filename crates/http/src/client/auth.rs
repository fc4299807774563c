//! Authentication API client methods

use super::{ApiClient, ClientError};
use crate::error::{ApiError, Result, require};
use crate::types::{LoginRequest, SendCodeRequest, TokenResponse, VerifyCodeRequest};
use reqwest::{Method, RequestBuilder};
use serde_json::Value;

impl ApiClient {
    /// Exchange username and password for a token
    pub async fn login(&self, credentials: &LoginRequest) -> Result<TokenResponse> {
        let endpoint = self.endpoint("/login");
        let request = self.request(Method::POST, "/login").json(credentials);
        let response: Option<TokenResponse> = self
            .execute(request)
            .await
            .map_err(|e| ApiError::failed(endpoint, "login failed", e))?;
        Ok(response.unwrap_or_default())
    }

    /// Ask the backend to email a verification code
    pub async fn send_code(&self, email: &str) -> Result<Value> {
        require("email", email)?;

        let endpoint = self.endpoint("/auth/send-code");
        let request = self
            .request(Method::POST, "/auth/send-code")
            .json(&SendCodeRequest {
                email: email.to_string(),
            });
        self.execute(request)
            .await
            .map_err(|e| ApiError::failed(endpoint, "send code failed", e))
    }

    /// Exchange an emailed code for a token
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<TokenResponse> {
        require("email", email)?;
        require("code", code)?;

        let endpoint = self.endpoint("/auth/verify");
        let request = self
            .request(Method::POST, "/auth/verify")
            .json(&VerifyCodeRequest {
                email: email.to_string(),
                code: code.to_string(),
            });
        let response: Option<TokenResponse> = self
            .execute(request)
            .await
            .map_err(|e| ApiError::failed(endpoint, "verify code failed", e))?;
        Ok(response.unwrap_or_default())
    }

    /// Build the session-termination request.
    ///
    /// The bearer token is captured now, so the request stays authenticated
    /// even if the token is cleared before it is sent.
    pub fn logout_request(&self) -> RequestBuilder {
        self.request(Method::POST, "/auth/logout")
    }

    /// Terminate the server session
    pub async fn logout(&self) -> std::result::Result<(), ClientError> {
        self.send(self.logout_request()).await
    }
}

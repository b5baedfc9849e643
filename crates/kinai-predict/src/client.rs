//! HTTP client for the prediction API.

use std::future::Future;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};

use crate::config::ApiConfig;
use crate::error::{PredictError, Result};
use crate::types::{PredictionModel, PredictionRequest, PredictionResponse};

/// User agent string for API requests.
const USER_AGENT_VALUE: &str = concat!("kinai/", env!("CARGO_PKG_VERSION"));

/// Anything that can score a prediction request.
///
/// [`PredictionClient`] is the HTTP implementation; sessions accept any
/// implementor so they can run without a server.
pub trait Predictor {
    fn predict(
        &self,
        model: PredictionModel,
        request: &PredictionRequest<'_>,
    ) -> impl Future<Output = Result<PredictionResponse>> + Send;
}

/// Prediction API client.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl PredictionClient {
    /// Creates a client for the configured API.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| PredictError::ClientBuild(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Full URL of a model's endpoint.
    pub fn endpoint(&self, model: PredictionModel) -> String {
        match model {
            PredictionModel::Fast => self.config.url(&self.config.fast_endpoint),
            PredictionModel::Deep => self.config.url(&self.config.deep_endpoint),
        }
    }

    /// Sends a prediction request.
    pub async fn send(
        &self,
        model: PredictionModel,
        request: &PredictionRequest<'_>,
    ) -> Result<PredictionResponse> {
        let url = self.endpoint(model);

        tracing::debug!(
            %model,
            url = %url,
            mappings = request.mappings.len(),
            rows = request.csv_data.total_rows(),
            "sending prediction request"
        );

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let result = interpret_response(status, &body);
        if let Err(e) = &result {
            tracing::warn!(%model, status, error = %e, "prediction request rejected");
        }
        result
    }

    /// Returns true when the API answers `GET /` with a status below 500.
    pub async fn health_check(&self) -> bool {
        let url = self.config.url("");
        match self.client.get(&url).send().await {
            Ok(response) => {
                let status = response.status();
                tracing::debug!(url = %url, status = status.as_u16(), "health check response");
                status.as_u16() < 500
            }
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "health check failed");
                false
            }
        }
    }
}

impl Predictor for PredictionClient {
    async fn predict(
        &self,
        model: PredictionModel,
        request: &PredictionRequest<'_>,
    ) -> Result<PredictionResponse> {
        self.send(model, request).await
    }
}

/// Interprets a status code and body as returned by the prediction API.
///
/// A non-success status yields [`PredictError::Status`] carrying the body's
/// `error` member when there is one, else `HTTP error! status: <code>`.
pub fn interpret_response(status: u16, body: &str) -> Result<PredictionResponse> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| value.get("error")?.as_str().map(str::to_string))
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| format!("HTTP error! status: {status}"));
        return Err(PredictError::Status { status, message });
    }

    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(PredictError::InvalidResponse(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }

    Ok(serde_json::from_value(value)?)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

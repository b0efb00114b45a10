use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use url::Url;

use crate::backend::GenerationBackend;
use crate::client_logger::ClientLogger;
use crate::credential::{API_KEY_VAR, resolve_api_key};
use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_CANDIDATE_TOKENS, CLIENT_PROMPT_TOKENS, CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS,
    CLIENT_REQUESTS,
};
use crate::types::{
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, Model, Turn,
};

/// The public Gemini endpoint.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
/// How long a single request may take before it is abandoned.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Gemini `generateContent` API.
#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
    model: Model,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl Gemini {
    /// Create a new Gemini client.
    ///
    /// The API key can be provided directly or read from the GEMINI_API_KEY
    /// environment variable (or a `.env` file in the working directory).
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
        model: Option<Model>,
    ) -> Result<Self> {
        let api_key = match api_key.or_else(resolve_api_key) {
            Some(key) if !key.trim().is_empty() => key.trim().to_string(),
            _ => {
                return Err(Error::configuration(format!(
                    "API key not provided and {API_KEY_VAR} environment variable not set"
                )));
            }
        };
        HeaderValue::from_str(&api_key)
            .map_err(|_| Error::configuration("API key contains invalid characters"))?;

        let base_url = parse_base_url(base_url.as_deref().unwrap_or(DEFAULT_API_URL))?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            api_key,
            client,
            base_url,
            timeout,
            model: model.unwrap_or_default(),
            logger: None,
        })
    }

    /// Attach a logger that sees every request and response.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The model this client talks to.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The URL requests for this client's model are sent to.
    pub fn endpoint(&self) -> Result<Url> {
        let model = self.model.to_string();
        // Tuned models carry their own collection prefix.
        let resource = if model.contains('/') {
            model
        } else {
            format!("models/{model}")
        };
        Ok(self.base_url.join(&format!("{resource}:generateContent"))?)
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| Error::configuration("API key contains invalid characters"))?;
        headers.insert("x-goog-api-key", key);
        Ok(headers)
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(Deserialize)]
        struct ErrorDetail {
            message: Option<String>,
            status: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let detail = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.error);
        let status = detail.as_ref().and_then(|d| d.status.clone());
        let message = detail
            .and_then(|d| d.message)
            .unwrap_or_else(|| error_body.clone());

        match status_code {
            400 => Error::bad_request(message),
            401 => Error::authentication(message),
            403 => Error::permission(message),
            404 => Error::not_found(message),
            408 => Error::timeout(message, None),
            429 => Error::rate_limit(message, retry_after),
            500 => Error::internal_server(message),
            502..=504 => Error::service_unavailable(message, retry_after),
            _ => Error::api(status_code, status, message),
        }
    }

    /// Send a request to the API and get a non-streaming response.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = self.generate_content_inner(request).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        match &result {
            Ok(response) => {
                if let Some(usage) = &response.usage_metadata {
                    CLIENT_PROMPT_TOKENS.count(usage.prompt_token_count);
                    CLIENT_CANDIDATE_TOKENS.count(usage.candidates_token_count);
                }
            }
            Err(_) => CLIENT_REQUEST_ERRORS.click(),
        }
        result
    }

    async fn generate_content_inner(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = self.endpoint()?;
        if let Some(logger) = &self.logger {
            logger.log_request(request);
        }

        let response = self
            .client
            .post(url)
            .headers(self.default_headers()?)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        let body = response.bytes().await.map_err(|e| self.map_transport_error(e))?;
        let response: GenerateContentResponse = serde_json::from_slice(&body).map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })?;

        if let Some(logger) = &self.logger {
            logger.log_response(&response);
        }
        Ok(response)
    }

    fn map_transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }
}

#[async_trait::async_trait]
impl GenerationBackend for Gemini {
    async fn generate(&self, turns: &[Turn], config: &GenerationConfig) -> Result<String> {
        let request = GenerateContentRequest::new(turns, config);
        let response = self.generate_content(&request).await?;
        reply_text(response)
    }
}

/// Extracts the reply from the first candidate of a response.
pub fn reply_text(response: GenerateContentResponse) -> Result<String> {
    let Some(candidate) = response.candidates.first() else {
        if let Some(reason) = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
        {
            return Err(Error::blocked(reason));
        }
        return Err(Error::empty_response("no candidates returned"));
    };
    candidate.text().ok_or_else(|| {
        let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
        Error::empty_response(format!("candidate has no text (finish reason: {reason})"))
    })
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    if url.cannot_be_a_base() {
        return Err(Error::configuration(format!(
            "base URL cannot be used as a base: {base_url}"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

impl fmt::Debug for Gemini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gemini")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("model", &self.model)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Candidate, Content, KnownModel, Part, PromptFeedback};

    #[test]
    fn client_creation() {
        let client = Gemini::new(Some("test-key".to_string())).unwrap();
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url.as_str(), DEFAULT_API_URL);
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);
        assert_eq!(client.model, Model::Known(KnownModel::Gemini15Flash));

        let client = Gemini::with_options(
            Some("test-key".to_string()),
            Some("http://localhost:8080/v1".to_string()),
            Some(Duration::from_secs(5)),
            Some(Model::Known(KnownModel::Gemini25Pro)),
        )
        .unwrap();
        assert_eq!(client.base_url.as_str(), "http://localhost:8080/v1/");
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(
            client.endpoint().unwrap().as_str(),
            "http://localhost:8080/v1/models/gemini-2.5-pro:generateContent"
        );
    }

    #[test]
    fn default_endpoint() {
        let client = Gemini::new(Some("k".to_string())).unwrap();
        assert_eq!(
            client.endpoint().unwrap().as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn tuned_model_endpoint() {
        let client = Gemini::with_options(
            Some("k".to_string()),
            None,
            None,
            Some(Model::Custom("tunedModels/mine".to_string())),
        )
        .unwrap();
        assert!(
            client
                .endpoint()
                .unwrap()
                .as_str()
                .ends_with("/v1beta/tunedModels/mine:generateContent")
        );
    }

    #[test]
    fn blank_key_is_configuration_error() {
        let err = Gemini::new(Some("   ".to_string())).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn bad_base_url_is_configuration_error() {
        let err = Gemini::with_options(Some("k".to_string()), Some("::".to_string()), None, None)
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn debug_redacts_key() {
        let client = Gemini::new(Some("super-secret".to_string())).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn reply_text_variants() {
        let ok = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: None,
                    parts: vec![Part::text("a"), Part::text("b")],
                }),
                finish_reason: None,
            }],
            prompt_feedback: None,
            usage_metadata: None,
        };
        assert_eq!(reply_text(ok).unwrap(), "ab");

        let blocked = GenerateContentResponse {
            candidates: vec![],
            prompt_feedback: Some(PromptFeedback {
                block_reason: Some("SAFETY".to_string()),
            }),
            usage_metadata: None,
        };
        assert!(matches!(reply_text(blocked), Err(Error::Blocked { .. })));

        let empty = GenerateContentResponse {
            candidates: vec![],
            prompt_feedback: None,
            usage_metadata: None,
        };
        assert!(matches!(reply_text(empty), Err(Error::EmptyResponse { .. })));
    }
}

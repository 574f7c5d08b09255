//! Jolokia agent client.

use crate::api::{GarbageCollectorApi, MemoryApi, OperatingSystemApi, RuntimeApi};
use crate::config::{Credentials, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use vitals_core::{Result, VitalsError};

/// Client for a Jolokia agent attached to a JVM.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct JolokiaClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    base_url: String,
    timeout: Duration,
    credentials: Option<Credentials>,
}

/// A single Jolokia request
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum JolokiaRequest<'a> {
    Read {
        mbean: &'a str,
        attribute: &'a str,
    },
    Search {
        mbean: &'a str,
    },
}

impl JolokiaRequest<'_> {
    fn mbean(&self) -> &str {
        match self {
            Self::Read { mbean, .. } | Self::Search { mbean } => mbean,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JolokiaResponse {
    status: u16,
    #[serde(default)]
    value: Option<Value>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_type: Option<String>,
}

impl JolokiaClient {
    /// Create a client for the agent at `base_url` using default settings
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        JolokiaClientBuilder::new().base_url(base_url).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> JolokiaClientBuilder {
        JolokiaClientBuilder::new()
    }

    /// Agent endpoint this client talks to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// `java.lang:type=OperatingSystem` attributes
    #[must_use]
    pub fn operating_system(&self) -> OperatingSystemApi<'_> {
        OperatingSystemApi::new(self)
    }

    /// `java.lang:type=Runtime` attributes
    #[must_use]
    pub fn runtime(&self) -> RuntimeApi<'_> {
        RuntimeApi::new(self)
    }

    /// `java.lang:type=Memory` attributes
    #[must_use]
    pub fn memory(&self) -> MemoryApi<'_> {
        MemoryApi::new(self)
    }

    /// `java.lang:type=GarbageCollector,*` beans
    #[must_use]
    pub fn gc(&self) -> GarbageCollectorApi<'_> {
        GarbageCollectorApi::new(self)
    }

    /// Read one attribute of one bean
    pub(crate) async fn read(&self, mbean: &str, attribute: &str) -> Result<Value> {
        self.execute(&JolokiaRequest::Read { mbean, attribute })
            .await
    }

    /// List the object names matching `pattern`
    pub(crate) async fn search(&self, pattern: &str) -> Result<Vec<String>> {
        let value = self
            .execute(&JolokiaRequest::Search { mbean: pattern })
            .await?;
        serde_json::from_value(value).map_err(VitalsError::Json)
    }

    /// POST a request and unwrap the `value` of a successful response
    async fn execute(&self, request: &JolokiaRequest<'_>) -> Result<Value> {
        debug!(url = %self.inner.base_url, request = ?request, "POST request");

        let mut builder = self.inner.http.post(&self.inner.base_url).json(request);
        if let Some(creds) = &self.inner.credentials {
            builder = builder.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = builder.send().await.map_err(|e| self.transport_error(&e))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 401 || status.as_u16() == 403 {
                warn!(status = status.as_u16(), "agent rejected credentials");
            }
            return Err(VitalsError::Remote {
                status: status.as_u16(),
                error_type: None,
                message: body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e))?;
        let parsed: JolokiaResponse = serde_json::from_str(&body)?;
        Self::unwrap_value(request, parsed)
    }

    fn unwrap_value(request: &JolokiaRequest<'_>, response: JolokiaResponse) -> Result<Value> {
        if response.status == 200 {
            return Ok(response.value.unwrap_or(Value::Null));
        }

        let error_type = response.error_type;
        let message = response.error.unwrap_or_default();

        let instance_missing = error_type
            .as_deref()
            .is_some_and(|t| t.contains("InstanceNotFoundException"));
        let attribute_missing = error_type
            .as_deref()
            .map_or(response.status == 404, |t| {
                t.contains("AttributeNotFoundException")
            });

        match request {
            JolokiaRequest::Read { mbean, attribute } if attribute_missing && !instance_missing => {
                Err(VitalsError::AttributeNotFound {
                    mbean: (*mbean).to_string(),
                    attribute: (*attribute).to_string(),
                })
            }
            _ => Err(VitalsError::Remote {
                status: response.status,
                error_type,
                message: if message.is_empty() {
                    format!("request for {} failed", request.mbean())
                } else {
                    message
                },
            }),
        }
    }

    fn transport_error(&self, err: &reqwest::Error) -> VitalsError {
        if err.is_timeout() {
            VitalsError::Timeout(self.inner.timeout.as_secs())
        } else {
            VitalsError::SourceUnavailable(err.to_string())
        }
    }
}

/// Builder for configuring a [`JolokiaClient`]
pub struct JolokiaClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: String,
    credentials: Option<Credentials>,
}

impl Default for JolokiaClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl JolokiaClientBuilder {
    /// Create a builder pointing at the default agent URL
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("vitals/{}", env!("CARGO_PKG_VERSION")),
            credentials: None,
        }
    }

    /// Set the agent URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Authenticate with HTTP basic credentials
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<JolokiaClient> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| VitalsError::Config(format!("invalid agent URL {}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(VitalsError::Config(format!(
                "agent URL must be http or https, got {}",
                url.scheme()
            )));
        }

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| VitalsError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(JolokiaClient {
            inner: Arc::new(ClientInner {
                http,
                base_url: self.base_url,
                timeout: self.timeout,
                credentials: self.credentials,
            }),
        })
    }
}

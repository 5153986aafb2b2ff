use crate::request::BuildRequest;
use anyhow::{Context, Result};
use log::debug;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    StatusCode,
};
use serde::Deserialize;
use std::fmt;
use url::Url;

const BUILD_QUEUE_ENDPOINT: &str = "httpAuth/app/rest/buildQueue";

#[derive(Clone)]
/// Authentication information
pub struct Auth {
    /// Username
    username: String,
    /// Password or access token
    password: String,
}

impl Auth {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of a response TeamCity did not accept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Json(value) => write!(f, "{:#}", value),
            ResponseBody::Text(text) => f.write_str(text),
        }
    }
}

/// Result of asking TeamCity to queue a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueOutcome {
    Queued { web_url: String },
    Rejected { status: StatusCode, body: ResponseBody },
}

impl QueueOutcome {
    fn from_response(status: StatusCode, text: &str) -> Self {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct QueuedBuild {
            web_url: String,
        }

        let body = match serde_json::from_str(text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text.to_owned()),
        };
        if status.is_success() {
            if let ResponseBody::Json(value) = &body {
                if let Ok(build) = QueuedBuild::deserialize(value) {
                    return QueueOutcome::Queued {
                        web_url: build.web_url,
                    };
                }
            }
        }
        QueueOutcome::Rejected { status, body }
    }

    pub fn is_queued(&self) -> bool {
        matches!(self, QueueOutcome::Queued { .. })
    }

    /// Process exit status to report this outcome with
    pub fn exit_code(&self) -> u8 {
        if self.is_queued() {
            0
        } else {
            1
        }
    }
}

impl fmt::Display for QueueOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueOutcome::Queued { web_url } => {
                write!(f, "Build started. View status at\n{}", web_url)
            }
            QueueOutcome::Rejected { status, body } => {
                write!(f, "Could not start build:\n{}\n{}", status.as_u16(), body)
            }
        }
    }
}

/// Join the build queue endpoint onto `base_url`, keeping any path the server is mounted under
fn queue_url(base_url: &Url) -> Result<Url> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(BUILD_QUEUE_ENDPOINT)
        .with_context(|| format!("Invalid TeamCity URL: {}", base_url))
}

#[derive(Debug, Clone)]
/// A TeamCity REST API client
pub struct Client {
    queue_url: Url,
    credentials: Auth,
    http_client: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &Url, credentials: Auth) -> Result<Self> {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/xml"));
        Ok(Self {
            queue_url: queue_url(base_url)?,
            credentials,
            http_client: reqwest::Client::builder()
                .default_headers(headers)
                .http1_title_case_headers()
                .build()?,
        })
    }

    pub fn queue_url(&self) -> &Url {
        &self.queue_url
    }

    /// Submit `request` to the build queue
    ///
    /// Only failing to talk to the server is an error. Responses TeamCity sends back, including
    /// rejections, are returned as a [`QueueOutcome`].
    pub async fn queue_build(&self, request: &BuildRequest) -> Result<QueueOutcome> {
        let body = request.to_xml()?;
        debug!(
            "Queueing {} as {} at {}",
            request.build_type().id(),
            self.credentials.username,
            self.queue_url
        );
        let response = self
            .http_client
            .post(self.queue_url.clone())
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .body(body)
            .send()
            .await
            .with_context(|| format!("Could not reach TeamCity at {}", self.queue_url))?;
        let status = response.status();
        debug!("TeamCity responded with {}", status);
        let text = response
            .text()
            .await
            .context("Could not read TeamCity response")?;
        Ok(QueueOutcome::from_response(status, &text))
    }
}

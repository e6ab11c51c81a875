// src/remote.rs

//! Pass-through client for the remote code execution API (glot.io style).

use std::time::Duration;

use axum::body::Bytes;
use reqwest::header::{self, HeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote execution API token is not configured")]
    NotConfigured,

    #[error("unsupported language '{0}'")]
    UnsupportedLanguage(String),

    #[error("remote execution request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Languages the proxy knows a file name for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
    JavaScript,
    Cpp,
    Java,
}

impl Language {
    pub fn parse(raw: &str) -> Result<Self, RemoteError> {
        match raw.to_ascii_lowercase().as_str() {
            "python" => Ok(Language::Python),
            "javascript" => Ok(Language::JavaScript),
            "cpp" => Ok(Language::Cpp),
            "java" => Ok(Language::Java),
            _ => Err(RemoteError::UnsupportedLanguage(raw.to_string())),
        }
    }

    /// Path segment used by the remote API.
    pub fn slug(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Cpp => "cpp",
            Language::Java => "java",
        }
    }

    fn file_name(self) -> &'static str {
        match self {
            Language::Python => "app.py",
            Language::JavaScript => "main.js",
            Language::Cpp => "main.cpp",
            Language::Java => "Main.java",
        }
    }
}

/// Body accepted by the proxy endpoint.
#[derive(Debug, Deserialize)]
pub struct RunRequest {
    #[serde(rename = "sourceText", alias = "source_text")]
    pub source_text: String,
}

#[derive(Debug, Serialize)]
struct RunFile<'a> {
    name: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct RemoteRunBody<'a> {
    files: [RunFile<'a>; 1],
}

/// Upstream answer, relayed as-is.
#[derive(Debug)]
pub struct RemoteReply {
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

#[derive(Debug, Clone)]
pub struct RemoteExecutor {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RemoteExecutor {
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, RemoteError> {
        Self::new(
            config.execution_api_url.clone(),
            config.execution_api_token.clone(),
            Duration::from_secs(config.execution_api_timeout_secs),
        )
    }

    /// Sends `source` as a single-file run and returns the upstream body and
    /// content type untouched. Non-2xx upstream answers are errors, as are
    /// transport failures.
    pub async fn run(&self, language: Language, source: &str) -> Result<RemoteReply, RemoteError> {
        let token = self.token.as_deref().ok_or(RemoteError::NotConfigured)?;

        let url = format!("{}/{}/latest", self.base_url.trim_end_matches('/'), language.slug());
        let body = RemoteRunBody {
            files: [RunFile {
                name: language.file_name(),
                content: source,
            }],
        };

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Token {}", token))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.bytes().await?;

        Ok(RemoteReply { content_type, body })
    }
}

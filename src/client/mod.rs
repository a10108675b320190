//! HTTP client for the external analyzer.
//!
//! The analyzer exposes two groups of endpoints:
//! - `{base}/analyze` for the lexical stage (tokens and lexical errors)
//! - `{base}/syntax/*` for parsing, semantic checks and the symbol table
//!
//! A full analysis run calls both and assembles one [`ResultModel`].

mod wire;

pub use wire::{
    AnalysisRequest, AstResponse, RemoteAstSummary, StructureType, StructureValidation,
    StructureValidationRequest, SymbolTableResponse,
};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::AnalyzerConfig;
use crate::model::{LexicalAnalysis, ResultModel, SyntaxAnalysis};

/// Errors that can occur while talking to the analyzer.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("analyzer returned HTTP {0}")]
    Status(u16),
    #[error("malformed analyzer response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no source code to analyze")]
    EmptySource,
}

/// Analyzer services with their own health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Lexical,
    Syntax,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Lexical => "lexical",
            Service::Syntax => "syntax",
        }
    }

    fn health_path(&self) -> &'static str {
        match self {
            Service::Lexical => "health",
            Service::Syntax => "syntax/health",
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Client for one analyzer instance.
pub struct AnalyzerClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl AnalyzerClient {
    /// Create a client from the analyzer section of the config.
    pub fn new(config: &AnalyzerConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("astlens/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            timeout: config.timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of an endpoint below the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Run the lexical and syntax stages for `code` and combine them.
    ///
    /// Both requests are in flight at the same time; either failing fails
    /// the whole run.
    pub async fn analyze(&self, code: &str) -> Result<ResultModel, ClientError> {
        ensure_source(code)?;
        let (lexical, syntax) =
            futures::future::try_join(self.analyze_lexical(code), self.analyze_syntax(code))
                .await?;
        Ok(ResultModel::assemble(lexical, syntax))
    }

    /// Tokens and lexical errors.
    pub async fn analyze_lexical(&self, code: &str) -> Result<LexicalAnalysis, ClientError> {
        ensure_source(code)?;
        self.post("analyze", &AnalysisRequest { code }).await
    }

    /// Syntax tree, both error streams and the symbol table.
    pub async fn analyze_syntax(&self, code: &str) -> Result<SyntaxAnalysis, ClientError> {
        ensure_source(code)?;
        self.post("syntax/analyze", &AnalysisRequest { code }).await
    }

    /// Syntax tree only.
    pub async fn ast(&self, code: &str) -> Result<AstResponse, ClientError> {
        ensure_source(code)?;
        let resp: AstResponse = self.post("syntax/ast", &AnalysisRequest { code }).await?;
        if let Some(summary) = &resp.summary {
            log::debug!(
                "analyzer summary: root {} with {} children, depth {}",
                summary.node_type,
                summary.child_count,
                summary.depth
            );
        }
        Ok(resp)
    }

    /// Symbol table only.
    pub async fn symbols(&self, code: &str) -> Result<SymbolTableResponse, ClientError> {
        ensure_source(code)?;
        self.post("syntax/symbols", &AnalysisRequest { code }).await
    }

    /// Validate `code` as one specific construct.
    pub async fn validate_structure(
        &self,
        code: &str,
        structure_type: StructureType,
    ) -> Result<StructureValidation, ClientError> {
        ensure_source(code)?;
        let body = StructureValidationRequest {
            code,
            structure_type,
        };
        self.post("syntax/validate", &body).await
    }

    /// Whether a service answers its health endpoint with a success status.
    /// Failures of any kind count as unhealthy.
    pub async fn check_health(&self, service: Service) -> bool {
        let url = self.endpoint(service.health_path());
        match self.http.get(&url).timeout(self.timeout).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                log::debug!("{} health check failed: {}", service, e);
                false
            }
        }
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let started = Instant::now();
        log::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("POST {} returned HTTP {}", url, status.as_u16());
            return Err(ClientError::Status(status.as_u16()));
        }

        let text = response.text().await.map_err(map_send_error)?;
        log::debug!(
            "POST {} -> {} bytes in {:?}",
            url,
            text.len(),
            started.elapsed()
        );

        Ok(serde_json::from_str(&text)?)
    }
}

fn map_send_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Network(e)
    }
}

fn ensure_source(code: &str) -> Result<(), ClientError> {
    if code.trim().is_empty() {
        return Err(ClientError::EmptySource);
    }
    Ok(())
}

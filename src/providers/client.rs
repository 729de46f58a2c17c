use crate::config::DataSource;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DataClient {
    client: reqwest::Client,
}

impl DataClient {
    pub fn new(timeout: Duration) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LoadError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Read a dataset as text from a URL or a local file
    pub async fn fetch_text(&self, source: &DataSource) -> Result<String, LoadError> {
        match source {
            DataSource::Url(url) => self.fetch_url(url).await,
            DataSource::Path(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| LoadError::ReadError(format!("{}: {}", path.display(), e))),
        }
    }

    async fn fetch_url(&self, url: &str) -> Result<String, LoadError> {
        tracing::debug!(url = %url, "Fetching dataset");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::NetworkError(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LoadError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            tracing::error!(url = %url, status = %status, body_preview = %text.chars().take(200).collect::<String>(), "Dataset request failed");
            return Err(LoadError::HttpStatus(status.as_u16()));
        }

        Ok(text)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("HTTP {0}")]
    HttpStatus(u16),
    #[error("Failed to read file: {0}")]
    ReadError(String),
    #[error("Failed to parse {dataset}: {message}")]
    ParseError { dataset: &'static str, message: String },
    #[error("{dataset} is missing required column {column}")]
    MissingColumn { dataset: &'static str, column: &'static str },
}

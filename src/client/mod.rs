//! REST client for the ledger network backend

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::error::ApiError;
use crate::models::{
    BlockchainBlockData, BlockchainConfig, BlockchainNodeData, ConfigUpdate, PageRequest,
    StatusUpdate,
};

pub const CONFIG_PATH: &str = "/blockchain/config";
pub const STATUS_PATH: &str = "/blockchain/status";
pub const BLOCKS_PATH: &str = "/blockchain/blocks";
pub const NODE_PATH: &str = "/blockchain/node";

#[derive(Clone)]
pub struct ChainClient {
    pub url: String,
    client: Client,
    api_token: Option<String>,
}

impl ChainClient {
    pub fn new(url: &str, api_token: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::new(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client,
            api_token,
        })
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.api_token {
            Some(ref token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError> {
        tracing::debug!("GET {}{}", self.url, path);
        let req = self.client.get(format!("{}{}", self.url, path)).query(query);
        let resp = self.authorize(req).send().await?;
        Self::decode(path, resp).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        tracing::debug!("POST {}{}", self.url, path);
        let req = self.client.post(format!("{}{}", self.url, path)).json(body);
        let resp = self.authorize(req).send().await?;
        Self::decode(path, resp).await
    }

    async fn decode<T: DeserializeOwned>(path: &str, resp: reqwest::Response) -> Result<T, ApiError> {
        let status = resp.status();
        let text = resp.text().await?;

        if status != StatusCode::OK {
            let detail = error_message(&text).unwrap_or_else(|| status.to_string());
            return Err(ApiError::with_status(
                status,
                format!("{} returned {}: {}", path, status.as_u16(), detail),
            ));
        }

        serde_json::from_str(&text).map_err(|e| {
            ApiError::new(format!(
                "Failed to parse {} response: {}. Response: {}",
                path,
                e,
                text.chars().take(500).collect::<String>()
            ))
        })
    }

    pub async fn fetch_config(&self) -> Result<BlockchainConfig, ApiError> {
        self.get(CONFIG_PATH, &[]).await
    }

    pub async fn update_config(&self, body: &ConfigUpdate) -> Result<BlockchainConfig, ApiError> {
        self.post(CONFIG_PATH, body).await
    }

    pub async fn update_status(&self, enabled: bool) -> Result<BlockchainConfig, ApiError> {
        self.post(STATUS_PATH, &StatusUpdate { blockchain_enable: enabled }).await
    }

    pub async fn fetch_block_list(&self, page: PageRequest) -> Result<BlockchainBlockData, ApiError> {
        self.get(
            BLOCKS_PATH,
            &[
                ("pagesize", page.page_size.to_string()),
                ("pagenum", page.page_num.to_string()),
            ],
        )
        .await
    }

    /// The node endpoint answers with either one record or a list of them.
    pub async fn fetch_node_list(&self) -> Result<Vec<BlockchainNodeData>, ApiError> {
        let value: serde_json::Value = self.get(NODE_PATH, &[]).await?;
        let parsed = match value {
            serde_json::Value::Array(_) => serde_json::from_value(value),
            other => serde_json::from_value(other).map(|one| vec![one]),
        };
        parsed.map_err(|e| ApiError::new(format!("Failed to parse {} response: {}", NODE_PATH, e)))
    }
}

/// Pulls `message` out of the backend's JSON error body
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("message")?.as_str().map(str::to_string)
}

use std::time::Duration;

use reqwest::blocking::Client;

use crate::domain::Paper;
use crate::error::ScivaultError;

pub trait GatewayClient: Send + Sync {
    fn fetch_paper(&self, id: &str) -> Result<Paper, ScivaultError>;
}

#[derive(Clone)]
pub struct IrysGatewayClient {
    client: Client,
    base_url: String,
}

impl IrysGatewayClient {
    pub fn new(base_url: &str) -> Result<Self, ScivaultError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!("scivault/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ScivaultError::GatewayHttp(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }
}

impl GatewayClient for IrysGatewayClient {
    fn fetch_paper(&self, id: &str) -> Result<Paper, ScivaultError> {
        let url = document_url(&self.base_url, id);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| ScivaultError::GatewayHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "gateway request failed".to_string());
            return Err(ScivaultError::GatewayStatus { status, message });
        }
        response
            .json()
            .map_err(|err| ScivaultError::MalformedDocument(err.to_string()))
    }
}

pub fn document_url(base_url: &str, id: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), id)
}

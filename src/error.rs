use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ScivaultError {
    #[error("invalid search field: {0}")]
    InvalidSearchField(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("GraphQL request failed: {0}")]
    GraphqlHttp(String),

    #[error("GraphQL endpoint returned status {status}: {message}")]
    GraphqlStatus { status: u16, message: String },

    #[error("gateway request failed: {0}")]
    GatewayHttp(String),

    #[error("gateway returned status {status}: {message}")]
    GatewayStatus { status: u16, message: String },

    #[error("malformed metadata document: {0}")]
    MalformedDocument(String),

    #[error("failed to read chunk file: {0}")]
    ChunkRead(String),

    #[error("upload failed: {0}")]
    UploadFailed(String),

    #[error("required tool not found: {0}")]
    MissingTool(String),

    #[error("wallet private key not set (SCIVAULT_PRIVATE_KEY or PRIVATE_KEY)")]
    MissingPrivateKey,

    #[error("filesystem error: {0}")]
    Filesystem(String),
}

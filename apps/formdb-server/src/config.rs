//! Server configuration.
//!
//! Loads and validates configuration from a YAML file or environment
//! variables.

use formdb_gateway::GatewayConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Server configuration.
///
/// Example YAML:
/// ```yaml
/// listen_addr: "0.0.0.0:8080"
/// api:
///   version_prefix: "/v1"
///   grpc_prefix: "/grpc"
///   grpc_service: "formdb.v1.FormDB"
/// auth:
///   required: true
///   token: "s3cret"
/// limits:
///   max_body_bytes: 10485760
///   max_message_bytes: 4194304
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address for the shared REST + gRPC listener.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// API surface configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Request size limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// REST version prefix.
    #[serde(default = "default_version_prefix")]
    pub version_prefix: String,

    /// Path prefix for the gRPC surface.
    #[serde(default = "default_grpc_prefix")]
    pub grpc_prefix: String,

    /// Fully-qualified gRPC service name.
    #[serde(default = "default_grpc_service")]
    pub grpc_service: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            version_prefix: default_version_prefix(),
            grpc_prefix: default_grpc_prefix(),
            grpc_service: default_grpc_service(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Whether the REST auth gate is enforced.
    #[serde(default)]
    pub required: bool,

    /// Static bearer token accepted by the validator.
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Request body cap in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// gRPC message payload cap in bytes.
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: default_max_body_bytes(),
            max_message_bytes: default_max_message_bytes(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_version_prefix() -> String {
    "/v1".to_string()
}

fn default_grpc_prefix() -> String {
    "/grpc".to_string()
}

fn default_grpc_service() -> String {
    "formdb.v1.FormDB".to_string()
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_max_message_bytes() -> usize {
    4 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            api: ApiConfig::default(),
            auth: AuthConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file.
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("failed to read config file: {e}")))?;

        let config: ServerConfig = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("failed to parse YAML: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Supported variables:
    /// - FORMDB_LISTEN_ADDR
    /// - FORMDB_GRPC_SERVICE
    /// - FORMDB_AUTH_TOKEN (setting it enables the auth gate)
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let mut config = ServerConfig::default();

        if let Ok(addr) = std::env::var("FORMDB_LISTEN_ADDR") {
            config.listen_addr = addr;
        }
        if let Ok(service) = std::env::var("FORMDB_GRPC_SERVICE") {
            config.api.grpc_service = service;
        }
        if let Ok(token) = std::env::var("FORMDB_AUTH_TOKEN") {
            config.auth.required = true;
            config.auth.token = Some(token);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.listen_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidField(format!("invalid listen_addr: {e}")))?;

        if !self.api.version_prefix.starts_with('/') {
            return Err(ConfigError::InvalidField(
                "version_prefix must start with '/'".to_string(),
            ));
        }
        if !self.api.grpc_prefix.starts_with('/') {
            return Err(ConfigError::InvalidField(
                "grpc_prefix must start with '/'".to_string(),
            ));
        }
        if self.api.grpc_service.is_empty() {
            return Err(ConfigError::InvalidField(
                "grpc_service cannot be empty".to_string(),
            ));
        }

        if self.auth.required && self.auth.token.as_deref().unwrap_or("").is_empty() {
            return Err(ConfigError::InvalidField(
                "auth.required is set but auth.token is empty".to_string(),
            ));
        }

        if self.limits.max_body_bytes == 0 {
            return Err(ConfigError::InvalidField(
                "max_body_bytes must be > 0".to_string(),
            ));
        }
        if self.limits.max_message_bytes == 0 {
            return Err(ConfigError::InvalidField(
                "max_message_bytes must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Derive the gateway configuration.
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            version_prefix: self.api.version_prefix.clone(),
            grpc_prefix: self.api.grpc_prefix.clone(),
            grpc_service: self.api.grpc_service.clone(),
            max_body_bytes: self.limits.max_body_bytes,
            max_message_bytes: self.limits.max_message_bytes,
            auth_required: self.auth.required,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("invalid field: {0}")]
    InvalidField(String),
}

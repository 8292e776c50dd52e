use crate::inference::InferenceSettings;
use crate::persistence::DEFAULT_HISTORY_KEY;
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Inference endpoint questions are posted to
    #[arg(long, env = "API_URL")]
    pub api_url: Option<String>,

    /// Directory holding the persisted chat history
    #[arg(long, env = "STORAGE_DIR")]
    pub storage_dir: Option<String>,

    /// Storage backend: `file` or `memory`
    #[arg(long, env = "STORAGE_BACKEND")]
    pub storage_backend: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub inference: InferenceConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InferenceConfig {
    pub endpoint: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub dir: String,
    pub key: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("server.port", 3000)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("inference.endpoint", "")?
            .set_default("storage.backend", "file")?
            .set_default("storage.dir", "data")?
            .set_default("storage.key", DEFAULT_HISTORY_KEY)?;

        // 2. Config file: explicit path must exist, ./config.* is optional
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        // 3. Environment variables prefixed with HEYA_, e.g. HEYA_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("HEYA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (and their plain env vars) win over everything else
        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(url) = cli.api_url {
            builder = builder.set_override("inference.endpoint", url)?;
        }
        if let Some(dir) = cli.storage_dir {
            builder = builder.set_override("storage.dir", dir)?;
        }
        if let Some(backend) = cli.storage_backend {
            builder = builder.set_override("storage.backend", backend.to_lowercase())?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check values the deserializer cannot.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let endpoint = self.inference.endpoint.trim();
        if endpoint.is_empty() {
            return Err(config::ConfigError::Message(
                "inference.endpoint is required (set API_URL or HEYA_INFERENCE__ENDPOINT)"
                    .to_string(),
            ));
        }

        let url = url::Url::parse(endpoint).map_err(|e| {
            config::ConfigError::Message(format!("inference.endpoint is not a valid URL: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(config::ConfigError::Message(format!(
                "inference.endpoint must use http or https, got {}",
                url.scheme()
            )));
        }

        if self.storage.key.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "storage.key cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Settings for the inference client.
    pub fn inference_settings(&self) -> InferenceSettings {
        InferenceSettings {
            endpoint: self.inference.endpoint.trim().to_string(),
        }
    }

    /// Address to bind the HTTP server to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}


use clap::{Parser, builder::BoolishValueParser};
use outlook_core::client::{
    DEFAULT_GRAPH_BASE_URL, DEFAULT_UPLOAD_CHUNK_BYTES, UPLOAD_CHUNK_ALIGNMENT,
};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Parser)]
#[command(name = "outlook-mcpd", version, about = "Outlook Mail MCP daemon.")]
#[allow(clippy::struct_excessive_bools)]
struct CliArgs {
    #[arg(long, env = "OUTLOOK_GRAPH_BASE_URL", default_value = DEFAULT_GRAPH_BASE_URL)]
    graph_base_url: String,

    /// Token used when a request carries none (always the case over stdio).
    #[arg(long, env = "OUTLOOK_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    #[arg(
        long,
        env = "OUTLOOK_REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS
    )]
    request_timeout_secs: u64,

    #[arg(
        long,
        env = "OUTLOOK_UPLOAD_CHUNK_BYTES",
        default_value_t = DEFAULT_UPLOAD_CHUNK_BYTES
    )]
    upload_chunk_bytes: u64,

    #[arg(
        long = "stdio",
        env = "OUTLOOK_ENABLE_STDIO",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(
        long,
        env = "OUTLOOK_MCP_SERVE",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    mcp_serve: bool,

    #[arg(long, env = "OUTLOOK_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,

    #[arg(
        long,
        env = "OUTLOOK_MCP_STATELESS",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    stateless: bool,

    #[arg(long, env = "OUTLOOK_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct OutlookConfig {
    pub graph_base_url: String,
    pub access_token: Option<String>,
    pub request_timeout: Duration,
    pub upload_chunk_bytes: u64,
    pub enable_stdio: bool,
    pub mcp_serve: bool,
    pub mcp_http_addr: SocketAddr,
    pub stateless: bool,
    pub log_level: String,
}

impl fmt::Debug for OutlookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutlookConfig")
            .field("graph_base_url", &self.graph_base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("request_timeout", &self.request_timeout)
            .field("upload_chunk_bytes", &self.upload_chunk_bytes)
            .field("enable_stdio", &self.enable_stdio)
            .field("mcp_serve", &self.mcp_serve)
            .field("mcp_http_addr", &self.mcp_http_addr)
            .field("stateless", &self.stateless)
            .field("log_level", &self.log_level)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl OutlookConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for OutlookConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let graph_base_url = args.graph_base_url.trim().trim_end_matches('/').to_string();
        if graph_base_url.is_empty() {
            return Err(ConfigError::MissingSetting("OUTLOOK_GRAPH_BASE_URL"));
        }
        if !graph_base_url.starts_with("https://") && !graph_base_url.starts_with("http://") {
            return Err(ConfigError::InvalidSetting {
                name: "OUTLOOK_GRAPH_BASE_URL",
                value: args.graph_base_url,
            });
        }

        if args.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "OUTLOOK_REQUEST_TIMEOUT_SECS",
                value: args.request_timeout_secs.to_string(),
            });
        }

        if args.upload_chunk_bytes == 0 || args.upload_chunk_bytes % UPLOAD_CHUNK_ALIGNMENT != 0 {
            return Err(ConfigError::InvalidSetting {
                name: "OUTLOOK_UPLOAD_CHUNK_BYTES",
                value: args.upload_chunk_bytes.to_string(),
            });
        }

        if !args.enable_stdio && !args.mcp_serve {
            return Err(ConfigError::InvalidSetting {
                name: "OUTLOOK_MCP_SERVE",
                value: "no transport enabled (set --stdio or --mcp-serve)".to_string(),
            });
        }

        let log_level = args.log_level.trim().to_string();
        if EnvFilter::try_new(&log_level).is_err() {
            return Err(ConfigError::InvalidSetting {
                name: "OUTLOOK_LOG_LEVEL",
                value: args.log_level,
            });
        }

        let access_token = args.access_token.filter(|value| !value.trim().is_empty());

        Ok(Self {
            graph_base_url,
            access_token,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            upload_chunk_bytes: args.upload_chunk_bytes,
            enable_stdio: args.enable_stdio,
            mcp_serve: args.mcp_serve,
            mcp_http_addr: args.mcp_http_addr,
            stateless: args.stateless,
            log_level,
        })
    }
}

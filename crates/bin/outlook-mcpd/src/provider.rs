use outlook_core::client::GraphConfig;
use outlook_core::error::GraphResult;
use outlook_core::services::GraphClientProvider;

use crate::config::OutlookConfig;

/// Builds the shared Graph client provider from daemon configuration.
pub fn build_provider(config: &OutlookConfig) -> GraphResult<GraphClientProvider> {
    let graph = GraphConfig::new(config.graph_base_url.clone())
        .with_request_timeout(config.request_timeout)
        .with_upload_chunk_bytes(config.upload_chunk_bytes);
    Ok(GraphClientProvider::new(graph)?.with_default_token(config.access_token.clone()))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn provider_carries_configured_settings() {
        let config = OutlookConfig {
            graph_base_url: "http://localhost:9000/v1.0".to_string(),
            access_token: Some("token".to_string()),
            request_timeout: Duration::from_secs(5),
            upload_chunk_bytes: 655_360,
            enable_stdio: true,
            mcp_serve: false,
            mcp_http_addr: "127.0.0.1:5000".parse().expect("addr"),
            stateless: true,
            log_level: "debug".to_string(),
        };

        let provider = build_provider(&config).expect("provider");

        assert_eq!(provider.config().base_url, "http://localhost:9000/v1.0");
        assert_eq!(provider.config().request_timeout, Duration::from_secs(5));
        assert_eq!(provider.config().upload_chunk_bytes, 655_360);
        assert!(provider.has_default_token());
    }
}

use reqwest::Client;

use crate::config::DispatchConfig;

/// Builds the shared HTTP client used for webhook calls.
///
/// # Configuration
/// - **Connect timeout**: from `dispatch.connect_timeout`
/// - **Connection pooling**: idle connections are kept for `dispatch.pool_idle_timeout`
/// - **User-Agent**: from `dispatch.user_agent`
/// - **Security**: Rustls for TLS, no OpenSSL dependency
///
/// No total request timeout is applied; only the TCP/TLS connect phase is
/// bounded. A slow upstream keeps the dispatch in flight until it answers.
///
/// The client keeps its connection pool behind an `Arc`, so clones are cheap
/// and share connections.
pub fn build_http_client(config: &DispatchConfig) -> reqwest::Result<Client> {
    Client::builder()
        .connect_timeout(config.connect_timeout())
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(config.pool_idle_timeout())
        .http2_adaptive_window(true)
        .https_only(false)
        .user_agent(config.user_agent.as_str())
        .build()
}

//! signet-identity - 身份认证服务入口

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Duration;
use secrecy::ExposeSecret;
use signet_adapter_email::EmailClient;
use signet_auth_core::TokenService;
use signet_config::AppConfig;
use signet_telemetry::{init_tracing, init_tracing_json};
use tracing::{debug, info};

use signet_identity::api::{self, AppState};
use signet_identity::application::login::LoginService;
use signet_identity::application::verification::VerificationService;
use signet_identity::domain::verification::VerificationStore;
use signet_identity::infrastructure::directory::InMemoryUserDirectory;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载配置
    let config = AppConfig::load("config")?;

    // 初始化 tracing
    if config.is_production() {
        init_tracing_json(&config.telemetry.log_level);
    } else {
        init_tracing(&config.telemetry.log_level);
    }

    info!(app = %config.app_name, env = %config.app_env, "Starting identity service");

    // 组装依赖
    let tokens = Arc::new(TokenService::new(
        config.jwt.secret.expose_secret(),
        config.jwt.expires_in,
        config.jwt.refresh_expires_in,
    ));
    let directory = Arc::new(InMemoryUserDirectory::from_seed(&config.users));
    let store = Arc::new(VerificationStore::with_window(Duration::minutes(
        config.verification.code_ttl_minutes,
    )));
    let mailer = Arc::new(EmailClient::new(config.email.clone()));

    let state = AppState {
        tokens: tokens.clone(),
        login: Arc::new(LoginService::new(directory, tokens)),
        verification: Arc::new(VerificationService::new(store.clone(), mailer)),
    };

    // 周期清扫被遗弃的过期验证码
    let sweep_interval = config.verification.sweep_interval_secs;
    tokio::spawn(async move {
        let mut ticker =
            tokio::time::interval(std::time::Duration::from_secs(sweep_interval));
        loop {
            ticker.tick().await;
            let removed = store.evict_expired();
            if removed > 0 {
                debug!(removed, "Evicted expired verification entries");
            }
        }
    });

    let app = api::router(state);

    // 启动服务器
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!(%addr, "Starting identity service listener");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

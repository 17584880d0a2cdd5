//! `TeamTempo` Gateway - HTTP API for the planning backend
//!
//! This is the main entry point for the gateway service. Configuration is
//! read from `TEAMTEMPO_*` environment variables; see [`GatewayConfig`].
//!
//! Startup fails before binding if the signing secret is missing, is not
//! valid base64, or decodes to fewer than 32 bytes.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use teamtempo_auth::{
    AuthenticationGate, BcryptPasswordEncoder, CredentialAuthenticator, PasswordEncoder,
    RuleTable, SigningKey, TokenCodec,
};
use teamtempo_gateway::{create_router, GatewayConfig, GatewayState};
use teamtempo_planning::{PlanningService, StoreDirectory};
use teamtempo_store::RocksStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,teamtempo=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting TeamTempo Gateway");

    let config = GatewayConfig::from_env()?;
    let ttl = config.token_ttl()?;
    tracing::info!(
        listen_addr = %config.listen_addr,
        data_dir = %config.data_dir.display(),
        token_ttl_seconds = config.token_ttl_seconds,
        cors_origins = ?config.cors_origins,
        "Gateway configuration loaded"
    );

    // Signing key is fatal if unusable
    let key = SigningKey::from_base64(&config.jwt_secret)?;
    tracing::info!(algorithm = ?key.algorithm(), "Signing key loaded");
    let codec = Arc::new(TokenCodec::new(&key));

    // Initialize RocksDB store
    tracing::info!(path = %config.data_dir.display(), "Opening RocksDB store");
    let store = Arc::new(RocksStore::open(&config.data_dir)?);

    let passwords: Arc<dyn PasswordEncoder> = Arc::new(BcryptPasswordEncoder::new());
    let directory = Arc::new(StoreDirectory::new(Arc::clone(&store)));
    let planning = Arc::new(PlanningService::new(store, Arc::clone(&passwords)));

    let authenticator = Arc::new(CredentialAuthenticator::new(
        Arc::clone(&directory),
        passwords,
        Arc::clone(&codec),
        ttl,
    ));
    let gate = Arc::new(AuthenticationGate::new(codec, directory));

    let listen_addr = config.listen_addr.clone();
    let state = GatewayState::new(planning, authenticator, gate, RuleTable::default(), config);

    // Create the full router with all API endpoints
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

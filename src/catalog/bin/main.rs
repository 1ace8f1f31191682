include!("../../lib.rs");
use std::net::SocketAddr;
use lambda_http::{run, Error};
use tracing::info;
use crate::catalog::controller::build_router;
use crate::catalog::factory::create_catalog_service;
use crate::core::controller::AppState;
use crate::core::domain::Configuration;
use crate::utils::logs::setup_tracing;

// See https://docs.aws.amazon.com/lambda/latest/dg/lambda-rust.html
// https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Configuration::from_env("catalog")?;
    setup_tracing(config.log_level.as_str());

    let catalog = create_catalog_service(&config).await?;
    let state = AppState::new(config.clone(), catalog);

    if std::env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        info!(store = %config.store, "serving catalog through the lambda runtime");
        return run(build_router::<lambda_http::Body>(state)).await;
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(store = %config.store, %addr, "serving catalog");
    let app = build_router::<axum::body::Body>(state);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

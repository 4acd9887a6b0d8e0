use lambda_http::{run, service_fn, tracing, Error, Request};
use std::sync::Arc;
use users_shared::{config::Config, AppState};

mod http_handler;

const DEFAULT_TABLE: &str = "lambda-users";

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    // Build the store client once per cold start
    let config = Config::from_env(DEFAULT_TABLE)?;
    let state = AppState::new(config.build_store().await);

    run(service_fn(move |event: Request| {
        let state = Arc::clone(&state);
        async move { http_handler::function_handler(event, state).await }
    }))
    .await
}

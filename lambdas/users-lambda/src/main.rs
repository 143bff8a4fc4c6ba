use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{run, service_fn, tracing, Error, Request};
use std::sync::Arc;
use users_shared::{config::Config, AppState};

mod http_handler;

use http_handler::Routes;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    // Initialize AWS clients once at startup
    let aws_config = aws_config::load_from_env().await;
    let config = Config::from_env();
    tracing::info!("Serving users from table {}", config.table_name);

    let state = AppState::new(Arc::new(DynamoClient::new(&aws_config)), config.table_name);
    let routes = Arc::new(Routes::new(&state));

    run(service_fn(move |event: Request| {
        let routes = Arc::clone(&routes);
        async move { http_handler::function_handler(event, &routes).await }
    }))
    .await
}

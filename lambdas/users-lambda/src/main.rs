use api_users_shared::{config::Config, store::DynamoStore, AppState};
use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{run, service_fn, tracing, Error, Request};
use std::sync::Arc;

mod http_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = Config::from_env();

    // Initialize AWS clients once at startup
    let aws_config = aws_config::load_from_env().await;

    // Local DynamoDB (optional endpoint)
    let dynamo_client = match &config.endpoint_url {
        Some(endpoint) => {
            let dynamo_config = aws_sdk_dynamodb::config::Builder::from(&aws_config)
                .endpoint_url(endpoint)
                .build();
            DynamoClient::from_conf(dynamo_config)
        }
        None => DynamoClient::new(&aws_config),
    };

    tracing::info!(
        "Users Lambda starting - Table: {} Collection: {}",
        config.table_name,
        config.collection
    );

    let store = Arc::new(DynamoStore::new(dynamo_client, config.table_name.clone()));
    let state = AppState::new(&config, store);

    run(service_fn(move |event: Request| {
        let state = Arc::clone(&state);
        async move { http_handler::function_handler(event, state).await }
    }))
    .await
}

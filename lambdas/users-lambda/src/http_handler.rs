use api_users_shared::types::{HandlerRequest, HandlerResponse};
use api_users_shared::AppState;
use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, RequestExt, Response,
};
use serde_json::Value;
use std::sync::Arc;

/// Main Lambda handler - translates the HTTP event for the users handler
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = event.uri().path();
    tracing::info!("Users Lambda invoked - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if method == Method::OPTIONS {
        return Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET,POST,DELETE,OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type,Authorization")
            .body(Body::Empty)
            .map_err(Box::new)?);
    }

    let request = handler_request(&event);
    let response = state.users.handle(request).await;

    json_response(response)
}

fn handler_request(event: &Request) -> HandlerRequest {
    let mut request = HandlerRequest::new(event.method().clone());

    let body: &[u8] = event.body();
    if !body.is_empty() {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => request = request.with_json_body(value),
            Err(e) => tracing::warn!("Ignoring unparseable request body: {}", e),
        }
    }

    // First value wins for repeated parameters
    if let Some(params) = event.query_string_parameters_ref() {
        for (key, value) in params.iter() {
            request
                .query
                .entry(key.to_string())
                .or_insert_with(|| value.to_string());
        }
    }

    request
}

fn json_response(response: HandlerResponse) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(response.status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(&response.payload)?.into())
        .map_err(Box::new)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_users_shared::{config::Config, store::MemoryStore};
    use serde_json::json;
    use std::collections::HashMap;

    fn state() -> Arc<AppState> {
        AppState::new(&Config::default(), Arc::new(MemoryStore::new()))
    }

    fn post(body: Value) -> Request {
        lambda_http::http::Request::builder()
            .method(Method::POST)
            .uri("/api-users")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn with_query(method: Method, key: &str, value: &str) -> Request {
        let mut query_string_parameters: HashMap<String, String> = HashMap::new();
        query_string_parameters.insert(key.into(), value.into());

        let mut request = Request::default().with_query_string_parameters(query_string_parameters);
        *request.method_mut() = method;
        request
    }

    fn json_body(response: &Response<Body>) -> Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch_user() {
        let state = state();

        let response = function_handler(
            post(json!({"username": "test-user", "email": "test-user@gmail.com"})),
            state.clone(),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(json_body(&response), json!({"data": "OK"}));
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "application/json"
        );

        let response = function_handler(with_query(Method::GET, "id", "test-user"), state)
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let body = json_body(&response);
        assert_eq!(body["data"]["username"], "test-user");
        assert_eq!(body["data"]["email"], "test-user@gmail.com");
    }

    #[tokio::test]
    async fn test_generic_request_has_no_id() {
        let response = function_handler(Request::default(), state()).await.unwrap();
        assert_eq!(response.status(), 404);
        assert_eq!(
            json_body(&response),
            json!({"err": "No ID is present to query."})
        );
    }

    #[tokio::test]
    async fn test_unparseable_body_is_treated_as_empty() {
        let request = lambda_http::http::Request::builder()
            .method(Method::POST)
            .body(Body::from("username=test-user"))
            .unwrap();

        let response = function_handler(request, state()).await.unwrap();
        assert_eq!(response.status(), 404);
        assert_eq!(json_body(&response), json!({"err": "Username required."}));
    }

    #[tokio::test]
    async fn test_delete_with_query_string() {
        let response = function_handler(with_query(Method::DELETE, "username", "test-user"), state())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(json_body(&response), json!({"data": "OK"}));

        let response = function_handler(with_query(Method::DELETE, "user", "test-user"), state())
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
        assert_eq!(json_body(&response), json!({"err": "Username is empty."}));
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let request = lambda_http::http::Request::builder()
            .method(Method::OPTIONS)
            .body(Body::Empty)
            .unwrap();

        let response = function_handler(request, state()).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );
    }
}

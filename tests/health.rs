mod common;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use storefront_api::routes::app;
use tower::ServiceExt;

#[tokio::test]
async fn health_check_returns_ok() -> anyhow::Result<()> {
    let state = common::test_state().await?;

    let response = app(state)
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body: serde_json::Value = serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await?)?;
    assert_eq!(body["message"], "Health check");
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}

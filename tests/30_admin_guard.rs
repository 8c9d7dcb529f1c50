mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn admin_routes_require_a_bearer_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/admin/bases", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert!(body.get("error").is_some(), "error body expected: {}", body);
    assert!(body.get("code").is_some(), "error code expected: {}", body);

    Ok(())
}

#[tokio::test]
async fn garbage_token_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/admin/security/attempts", server.base_url))
        .bearer_auth("not-a-jwt")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn csv_import_is_gated_too() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!(
            "{}/api/admin/bases/import?hall_type=TH&hall_level=10&base_type=WAR",
            server.base_url
        ))
        .body("name,image_path,layout_link\nA,img,link\n")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

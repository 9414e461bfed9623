mod common;

use anyhow::Result;
use common::{LOGIN_TOKEN, PASSWORD, REFRESHED_TOKEN, USERNAME};
use mediahub_client::services::{AuthApi, ResourceApi};
use mediahub_client::types::ResourceFilter;
use mediahub_client::ClientError;

#[tokio::test]
async fn login_stores_token_and_user() -> Result<()> {
    let (mock, ctx) = common::start(vec![]).await?;

    let user = ctx.auth.login(USERNAME, PASSWORD).await?;
    assert_eq!(user.username, USERNAME);

    let request = mock.last_request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/auth/login");
    assert_eq!(request.body.as_ref().map(|b| b["username"].clone()), Some(USERNAME.into()));
    assert_eq!(request.authorization, None);

    assert_eq!(ctx.session.token().as_deref(), Some(LOGIN_TOKEN));
    assert_eq!(ctx.auth.current_user().map(|u| u.email), Some("admin@example.com".to_string()));
    assert!(ctx.auth.is_logged_in());
    Ok(())
}

#[tokio::test]
async fn failed_login_leaves_session_untouched() -> Result<()> {
    let (_mock, ctx) = common::start(vec![]).await?;

    let err = ctx.auth.login(USERNAME, "wrong").await.unwrap_err();
    assert!(err.is_unauthorized(), "unexpected error: {err:?}");
    assert!(matches!(&err, ClientError::HttpStatus { message, .. } if message == "Invalid credentials"));

    assert_eq!(ctx.session.token(), None);
    assert_eq!(ctx.session.user(), None);
    Ok(())
}

#[tokio::test]
async fn failed_login_keeps_existing_session() -> Result<()> {
    let (_mock, ctx) = common::start(vec![]).await?;
    ctx.auth.login(USERNAME, PASSWORD).await?;

    let err = ctx.auth.login(USERNAME, "wrong").await.unwrap_err();
    assert!(err.is_unauthorized(), "unexpected error: {err:?}");

    assert_eq!(ctx.session.token().as_deref(), Some(LOGIN_TOKEN));
    assert_eq!(ctx.session.user().map(|u| u.username), Some(USERNAME.to_string()));
    assert!(ctx.auth.is_logged_in());
    Ok(())
}

#[tokio::test]
async fn bearer_header_follows_the_session() -> Result<()> {
    let (mock, ctx) = common::start(vec![]).await?;

    ctx.resources.list(&ResourceFilter::new()).await?;
    assert_eq!(mock.last_request().authorization, None);

    ctx.auth.login(USERNAME, PASSWORD).await?;
    ctx.resources.list(&ResourceFilter::new()).await?;
    assert_eq!(
        mock.last_request().authorization.as_deref(),
        Some(format!("Bearer {LOGIN_TOKEN}").as_str())
    );

    ctx.auth.logout()?;
    ctx.resources.list(&ResourceFilter::new()).await?;
    assert_eq!(mock.last_request().authorization, None);
    Ok(())
}

#[tokio::test]
async fn refresh_swaps_the_token_and_keeps_the_user() -> Result<()> {
    let (mock, ctx) = common::start(vec![]).await?;
    ctx.auth.login(USERNAME, PASSWORD).await?;

    let token = ctx.auth.refresh_token().await?;
    assert_eq!(token, REFRESHED_TOKEN);

    let request = mock.last_request();
    assert_eq!(request.path, "/api/auth/refresh");
    assert_eq!(request.authorization.as_deref(), Some(format!("Bearer {LOGIN_TOKEN}").as_str()));

    assert_eq!(ctx.session.token().as_deref(), Some(REFRESHED_TOKEN));
    assert_eq!(ctx.session.user().map(|u| u.username), Some(USERNAME.to_string()));
    Ok(())
}

#[tokio::test]
async fn failed_refresh_clears_token_and_user() -> Result<()> {
    let (mock, ctx) = common::start(vec![]).await?;
    ctx.auth.login(USERNAME, PASSWORD).await?;
    mock.set_refresh_fails(true);

    let err = ctx.auth.refresh_token().await.unwrap_err();
    assert_eq!(err.status_code(), Some(401));

    assert_eq!(ctx.session.token(), None);
    assert_eq!(ctx.session.user(), None);
    assert!(!ctx.auth.is_logged_in());
    Ok(())
}

#[tokio::test]
async fn register_returns_user_without_logging_in() -> Result<()> {
    let (mock, ctx) = common::start(vec![]).await?;

    let user = ctx.auth.register("newbie", "newbie@example.com", "pw").await?;
    assert_eq!(user.username, "newbie");
    assert_eq!(mock.last_request().path, "/api/auth/register");
    assert!(!ctx.auth.is_logged_in());
    Ok(())
}

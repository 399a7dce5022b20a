mod common;

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use common::TestContext;
use inventpro_api::auth::{AuthConfig, AuthError, AuthService};

fn auth_service(ctx: &TestContext) -> AuthService {
    let cfg = AuthConfig::new(
        "test_secret_key_for_testing_purposes_only_32chars".to_string(),
        "inventpro-auth".to_string(),
        "inventpro-api".to_string(),
        Duration::from_secs(3600),
        Duration::from_secs(86_400),
    );
    AuthService::new(cfg, Arc::clone(&ctx.db))
}

#[tokio::test]
async fn login_issues_tokens_with_role_permissions() {
    let ctx = TestContext::new().await;
    let user_id = ctx.seed_user("vendedor").await;
    let auth = auth_service(&ctx);

    let account = ctx
        .services
        .users
        .get_user(&user_id)
        .await
        .unwrap()
        .unwrap();

    let verified = auth
        .authenticate(&account.email, "super-secret-password")
        .await
        .expect("credentials should verify");
    assert_eq!(verified.id, user_id);

    let pair = auth.generate_token(&verified).await.expect("tokens");
    assert_eq!(pair.token_type, "Bearer");

    let claims = auth
        .validate_access_token(&pair.access_token)
        .await
        .expect("access token validates");
    assert_eq!(claims.sub, user_id.to_string());
    assert!(claims.roles.contains(&"vendedor".to_string()));
    assert!(claims.permissions.contains(&"orders:create".to_string()));
    assert!(!claims.permissions.contains(&"inventory:adjust".to_string()));
}

#[tokio::test]
async fn wrong_password_and_inactive_users_are_rejected() {
    let ctx = TestContext::new().await;
    let user_id = ctx.seed_user("user").await;
    let auth = auth_service(&ctx);

    let account = ctx
        .services
        .users
        .get_user(&user_id)
        .await
        .unwrap()
        .unwrap();

    assert_matches!(
        auth.authenticate(&account.email, "wrong-password").await,
        Err(AuthError::InvalidCredentials)
    );

    ctx.services
        .users
        .deactivate_user(user_id)
        .await
        .expect("deactivate");

    assert_matches!(
        auth.authenticate(&account.email, "super-secret-password")
            .await,
        Err(AuthError::InvalidCredentials)
    );
}

#[tokio::test]
async fn refresh_rotates_and_invalidates_the_old_token() {
    let ctx = TestContext::new().await;
    let user_id = ctx.seed_user("admin").await;
    let auth = auth_service(&ctx);

    let account = ctx
        .services
        .users
        .get_user(&user_id)
        .await
        .unwrap()
        .unwrap();
    let pair = auth.generate_token(&account).await.expect("tokens");

    // A refresh token cannot authorize requests.
    assert_matches!(
        auth.validate_access_token(&pair.refresh_token).await,
        Err(AuthError::InvalidToken)
    );

    let rotated = auth
        .refresh_token(&pair.refresh_token)
        .await
        .expect("refresh succeeds");
    assert!(auth
        .validate_access_token(&rotated.access_token)
        .await
        .is_ok());

    // The original refresh token is single-use.
    assert_matches!(
        auth.refresh_token(&pair.refresh_token).await,
        Err(AuthError::RevokedToken)
    );
}

#[tokio::test]
async fn an_access_token_is_not_a_refresh_token() {
    let ctx = TestContext::new().await;
    let user_id = ctx.seed_user("user").await;
    let auth = auth_service(&ctx);

    let account = ctx
        .services
        .users
        .get_user(&user_id)
        .await
        .unwrap()
        .unwrap();
    let pair = auth.generate_token(&account).await.expect("tokens");

    assert_matches!(
        auth.refresh_token(&pair.access_token).await,
        Err(AuthError::InvalidToken)
    );
}

#[tokio::test]
async fn revoked_tokens_stop_validating() {
    let ctx = TestContext::new().await;
    let user_id = ctx.seed_user("user").await;
    let auth = auth_service(&ctx);

    let account = ctx
        .services
        .users
        .get_user(&user_id)
        .await
        .unwrap()
        .unwrap();
    let pair = auth.generate_token(&account).await.expect("tokens");

    auth.revoke_token(&pair.access_token).await.expect("revoke");

    assert_matches!(
        auth.validate_access_token(&pair.access_token).await,
        Err(AuthError::RevokedToken)
    );
}

mod common;

use axum::{Json, extract::State};
use common::{MockRepo, USER_ID, sample_user, test_state, test_state_with_email};
use jsonwebtoken::{DecodingKey, Validation, decode};
use ratehub::{
    auth::Claims,
    email::MockEmailService,
    error::ApiError,
    handlers,
    models::{Role, SignupRequest, TokenRequest},
};
use std::sync::Arc;
use uuid::Uuid;

fn signup_payload() -> SignupRequest {
    SignupRequest {
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
    }
}

// --- Signup ---

#[tokio::test]
async fn signup_stores_code_and_emails_it() {
    let email = Arc::new(MockEmailService::new());
    let repo = MockRepo::default();
    let state = test_state_with_email(repo, email.clone());

    let Json(echo) = handlers::signup(State(state.clone()), Json(signup_payload()))
        .await
        .unwrap();
    assert_eq!(echo.username, "alice");

    // The emailed code is exactly the stored one.
    let sent = email.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@example.com");
    assert!(!sent[0].code.is_empty());
}

#[tokio::test]
async fn signup_code_matches_persisted_code() {
    let email = Arc::new(MockEmailService::new());
    let repo = Arc::new(MockRepo::default());
    let state = ratehub::AppState {
        repo: repo.clone(),
        email: email.clone(),
        config: ratehub::AppConfig::default(),
    };

    handlers::signup(State(state), Json(signup_payload()))
        .await
        .unwrap();

    let stored = repo.stored_codes.lock().unwrap();
    let sent = email.sent.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].1, sent[0].code);
    assert_eq!(stored[0].0, Uuid::from_u128(42));
}

#[tokio::test]
async fn duplicate_username_is_rejected_and_no_email_sent() {
    let email = Arc::new(MockEmailService::new());
    let state = test_state_with_email(
        MockRepo {
            user_by_username: Some(sample_user(USER_ID, "alice", Role::User)),
            ..MockRepo::default()
        },
        email.clone(),
    );

    let result = handlers::signup(State(state), Json(signup_payload())).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
    assert!(email.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let state = test_state(MockRepo {
        user_by_email: Some(sample_user(USER_ID, "someone", Role::User)),
        ..MockRepo::default()
    });

    let result = handlers::signup(State(state), Json(signup_payload())).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn reserved_username_me_is_rejected() {
    let state = test_state(MockRepo::default());
    let payload = SignupRequest {
        username: "me".to_string(),
        email: "me@example.com".to_string(),
    };

    let result = handlers::signup(State(state), Json(payload)).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn email_channel_failure_propagates() {
    let email = Arc::new(MockEmailService::new_failing());
    let state = test_state_with_email(MockRepo::default(), email);

    let result = handlers::signup(State(state), Json(signup_payload())).await;
    assert!(matches!(result, Err(ApiError::EmailDelivery(_))));
}

// --- Token exchange ---

#[tokio::test]
async fn token_exchange_unknown_username_is_not_found() {
    let state = test_state(MockRepo::default());
    let payload = TokenRequest {
        username: "ghost".to_string(),
        confirmation_code: "whatever".to_string(),
    };

    let result = handlers::obtain_token(State(state), Json(payload)).await;
    assert!(matches!(result, Err(ApiError::NotFound)));
}

#[tokio::test]
async fn token_exchange_wrong_code_is_rejected() {
    let state = test_state(MockRepo {
        user_by_username: Some(sample_user(USER_ID, "alice", Role::User)),
        stored_code: Some("right-code".to_string()),
        ..MockRepo::default()
    });
    let payload = TokenRequest {
        username: "alice".to_string(),
        confirmation_code: "wrong-code".to_string(),
    };

    let result = handlers::obtain_token(State(state), Json(payload)).await;
    assert!(matches!(result, Err(ApiError::InvalidConfirmationCode)));
}

#[tokio::test]
async fn token_exchange_without_any_stored_code_is_rejected() {
    let state = test_state(MockRepo {
        user_by_username: Some(sample_user(USER_ID, "alice", Role::User)),
        ..MockRepo::default()
    });
    let payload = TokenRequest {
        username: "alice".to_string(),
        confirmation_code: "anything".to_string(),
    };

    let result = handlers::obtain_token(State(state), Json(payload)).await;
    assert!(matches!(result, Err(ApiError::InvalidConfirmationCode)));
}

#[tokio::test]
async fn token_exchange_with_correct_code_issues_valid_token_and_confirms() {
    let repo = Arc::new(MockRepo {
        user_by_username: Some(sample_user(USER_ID, "alice", Role::User)),
        stored_code: Some("right-code".to_string()),
        ..MockRepo::default()
    });
    let config = ratehub::AppConfig::default();
    let secret = config.jwt_secret.clone();
    let state = ratehub::AppState {
        repo: repo.clone(),
        email: Arc::new(MockEmailService::new()),
        config,
    };

    let payload = TokenRequest {
        username: "alice".to_string(),
        confirmation_code: "right-code".to_string(),
    };

    let Json(response) = handlers::obtain_token(State(state), Json(payload))
        .await
        .unwrap();

    // The token decodes with the configured secret and binds the identity.
    let data = decode::<Claims>(
        &response.token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .expect("issued token must decode");
    assert_eq!(data.claims.sub, USER_ID);

    // The account is marked confirmed.
    assert_eq!(repo.confirmed.lock().unwrap().clone(), vec![USER_ID]);
}

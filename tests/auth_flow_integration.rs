//! Integration tests for the auth gateway and the onboarding flow.
//!
//! Each test spins up an Axum stub of the GEDEON auth API on a random port
//! and exercises the real HTTP contract: status codes, error payloads, the
//! session cookie, and the flow's reactions to them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::time::timeout;

use gedeon_onboarding::api::{ApiClient, AuthApi, HttpAuthGateway};
use gedeon_onboarding::error::ApiError;
use gedeon_onboarding::onboarding::actions::ProfileAction;
use gedeon_onboarding::onboarding::auth::{messages, AuthMode};
use gedeon_onboarding::onboarding::storage_keys;
use gedeon_onboarding::onboarding::{OnboardingFlow, Screen};
use gedeon_onboarding::store::{LibSqlStore, LocalStore};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
struct StubUser {
    pseudo: String,
    password: String,
    confirmed: bool,
}

/// Shared state of the stub backend.
#[derive(Default)]
struct StubState {
    users: Mutex<HashMap<String, StubUser>>,
    synced: Mutex<Vec<Value>>,
    /// When set, /api/auth/forgot-password answers 500.
    fail_forgot: Mutex<bool>,
    /// When set, /api/profile/onboarding answers 404.
    disable_sync: Mutex<bool>,
}

impl StubState {
    fn confirm(&self, email: &str) {
        if let Some(user) = self.users.lock().unwrap().get_mut(email) {
            user.confirmed = true;
        }
    }
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|c| c.contains("gedeon_session="))
}

async fn check(State(_state): State<Arc<StubState>>, headers: HeaderMap) -> impl IntoResponse {
    if has_session(&headers) {
        Json(json!({"status": "success", "logged_in": true, "username": "stub_user"}))
    } else {
        Json(json!({"status": "success", "logged_in": false}))
    }
}

async fn register(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let email = body["email"].as_str().unwrap_or_default().to_string();

    // Non-JSON failure body, to exercise payload swallowing.
    if email == "broken@x.com" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
    }

    let mut users = state.users.lock().unwrap();
    if let Some(existing) = users.get(&email) {
        if !existing.confirmed {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "status": "error",
                    "message": "Cet email est en attente de confirmation. Vérifiez vos emails."
                })),
            )
                .into_response();
        }
        return (
            StatusCode::CONFLICT,
            Json(json!({"status": "error", "message": "Cet email est déjà utilisé"})),
        )
            .into_response();
    }

    users.insert(
        email,
        StubUser {
            pseudo: body["pseudo"].as_str().unwrap_or_default().to_string(),
            password: body["password"].as_str().unwrap_or_default().to_string(),
            confirmed: false,
        },
    );
    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "message": "Compte créé ! Vérifiez votre email pour confirmer."
        })),
    )
        .into_response()
}

async fn login(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let users = state.users.lock().unwrap();
    let Some(user) = users.get(email).filter(|u| u.password == password) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"status": "error", "message": "Email ou mot de passe incorrect"})),
        )
            .into_response();
    };

    if !user.confirmed {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "status": "error",
                "message": "Email non confirmé. Vérifiez votre boîte mail.",
                "code": "EMAIL_NOT_CONFIRMED"
            })),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [(header::SET_COOKIE, "gedeon_session=stub; Path=/")],
        Json(json!({
            "status": "success",
            "message": "Connexion réussie",
            "username": format!("{}_1", user.pseudo)
        })),
    )
        .into_response()
}

async fn resend(State(_state): State<Arc<StubState>>) -> impl IntoResponse {
    Json(json!({"status": "success", "message": "Email de confirmation renvoyé"}))
}

async fn forgot(State(state): State<Arc<StubState>>) -> impl IntoResponse {
    if *state.fail_forgot.lock().unwrap() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"status": "error", "message": "boom"})),
        )
            .into_response();
    }
    Json(json!({
        "status": "success",
        "message": "Si cet email existe, un lien a été envoyé"
    }))
    .into_response()
}

async fn sync_profile(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if *state.disable_sync.lock().unwrap() {
        return StatusCode::NOT_FOUND.into_response();
    }
    state.synced.lock().unwrap().push(body);
    Json(json!({"status": "success"})).into_response()
}

/// Start the stub backend on a random port.
async fn start_server() -> (u16, Arc<StubState>) {
    let state = Arc::new(StubState::default());
    let app = Router::new()
        .route("/api/auth/check", get(check))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/resend-confirmation", post(resend))
        .route("/api/auth/forgot-password", post(forgot))
        .route("/api/profile/onboarding", post(sync_profile))
        .with_state(Arc::clone(&state));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (port, state)
}

fn gateway(port: u16) -> Arc<HttpAuthGateway> {
    Arc::new(HttpAuthGateway::new(ApiClient::new(format!(
        "http://127.0.0.1:{port}"
    ))))
}

async fn flow(port: u16) -> (OnboardingFlow, Arc<LibSqlStore>) {
    let store = Arc::new(LibSqlStore::new_memory().await.unwrap());
    let flow = OnboardingFlow::new(
        gateway(port),
        Arc::clone(&store) as Arc<dyn LocalStore>,
        Duration::from_millis(1),
    );
    (flow, store)
}

fn fill_register_form(flow: &mut OnboardingFlow, email: &str) {
    let auth = flow.auth_mut();
    auth.mode = AuthMode::Register;
    auth.form.email = email.into();
    auth.form.pseudo = "marie".into();
    auth.form.set_password("s3cret");
    auth.form.set_password2("s3cret");
}

#[tokio::test]
async fn register_then_confirm_then_login() {
    timeout(TEST_TIMEOUT, async {
        let (port, state) = start_server().await;
        let (mut flow, _store) = flow(port).await;
        flow.bootstrap().await;
        assert_eq!(flow.screen(), Screen::Welcome);

        flow.advance().await;
        flow.advance().await;
        assert_eq!(flow.screen(), Screen::AuthCredentials);
        fill_register_form(&mut flow, "Marie@Example.com ");

        // Register: stays on credentials, pending confirmation.
        flow.submit_auth().await;
        assert_eq!(flow.screen(), Screen::AuthCredentials);
        assert!(flow.auth().pending_confirm);
        assert!(flow.auth().info.as_deref().unwrap().contains("Compte créé"));
        // The gateway normalized the email on the way out.
        assert!(state.users.lock().unwrap().contains_key("marie@example.com"));

        // "J'ai confirmé" before the link was clicked: dedicated state.
        flow.confirm_and_login().await;
        assert_eq!(flow.screen(), Screen::AuthCredentials);
        assert!(flow.auth().pending_confirm);
        assert_eq!(flow.auth().error.as_deref(), Some(messages::NOT_CONFIRMED));

        // Click the link, then retry.
        state.confirm("marie@example.com");
        flow.confirm_and_login().await;
        assert_eq!(flow.screen(), Screen::Identity);
        assert_eq!(flow.auth().info.as_deref(), Some("Connexion réussie"));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn session_cookie_survives_into_the_probe() {
    timeout(TEST_TIMEOUT, async {
        let (port, state) = start_server().await;
        state.users.lock().unwrap().insert(
            "a@b.com".into(),
            StubUser {
                pseudo: "jo".into(),
                password: "1234".into(),
                confirmed: true,
            },
        );

        // One gateway = one cookie jar, like one browser session.
        let api = gateway(port);
        let store = Arc::new(LibSqlStore::new_memory().await.unwrap());
        let mut flow = OnboardingFlow::new(
            Arc::clone(&api) as Arc<dyn AuthApi>,
            store as Arc<dyn LocalStore>,
            Duration::from_millis(1),
        );
        flow.auth_mut().mode = AuthMode::Login;
        flow.auth_mut().form.email = "a@b.com".into();
        flow.auth_mut().form.set_password("1234");
        flow.submit_auth().await;
        assert_eq!(flow.screen(), Screen::Identity);

        // A fresh flow over the same gateway skips auth on bootstrap.
        let store = Arc::new(LibSqlStore::new_memory().await.unwrap());
        let mut second = OnboardingFlow::new(
            api as Arc<dyn AuthApi>,
            store as Arc<dyn LocalStore>,
            Duration::from_millis(1),
        );
        second.bootstrap().await;
        assert_eq!(second.screen(), Screen::Identity);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn wrong_password_surfaces_backend_message() {
    timeout(TEST_TIMEOUT, async {
        let (port, state) = start_server().await;
        state.users.lock().unwrap().insert(
            "a@b.com".into(),
            StubUser {
                pseudo: "jo".into(),
                password: "1234".into(),
                confirmed: true,
            },
        );
        let (mut flow, _store) = flow(port).await;
        flow.auth_mut().mode = AuthMode::Login;
        flow.auth_mut().form.email = "a@b.com".into();
        flow.auth_mut().form.set_password("nope");

        flow.submit_auth().await;

        assert_eq!(
            flow.auth().error.as_deref(),
            Some("Email ou mot de passe incorrect")
        );
        assert!(!flow.auth().pending_confirm);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unparseable_error_body_is_an_absent_payload() {
    timeout(TEST_TIMEOUT, async {
        let (port, _state) = start_server().await;
        let api = gateway(port);

        let err = api
            .register("broken@x.com", "jo", &"1234".to_string().into())
            .await
            .unwrap_err();

        match err {
            ApiError::Status { status, ref payload } => {
                assert_eq!(status, 500);
                assert!(payload.is_none());
            }
            other => panic!("expected Status error, got {other:?}"),
        }
        assert_eq!(err.user_message(), "Erreur HTTP 500");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn forgot_password_is_uniform_even_on_server_errors() {
    timeout(TEST_TIMEOUT, async {
        let (port, state) = start_server().await;
        let (mut flow, _store) = flow(port).await;
        flow.auth_mut().form.email = "a@b.com".into();

        flow.forgot_password().await;
        let healthy = flow.auth().forgot_info.clone();

        *state.fail_forgot.lock().unwrap() = true;
        flow.auth_mut().forgot_info = None;
        flow.forgot_password().await;
        let failing = flow.auth().forgot_info.clone();

        assert_eq!(healthy.as_deref(), Some(messages::FORGOT_UNIFORM));
        assert_eq!(healthy, failing);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn finalize_syncs_the_snapshot_upstream() {
    timeout(TEST_TIMEOUT, async {
        let (port, state) = start_server().await;
        let (mut flow, store) = flow(port).await;
        flow.dispatch(ProfileAction::SetFirstName("Marie".into()));
        flow.dispatch(ProfileAction::SetLastName("Lorio".into()));
        for id in ["sport", "musique", "arts"] {
            flow.dispatch(ProfileAction::ToggleInterest(id.into()));
        }
        flow.dispatch(ProfileAction::SetNotifChoice(true));
        flow.skip_questions();
        assert_eq!(flow.screen(), Screen::Notifications);

        flow.finalize().await.unwrap();
        assert_eq!(flow.screen(), Screen::Done);

        // Local keys written.
        assert_eq!(
            store.get(storage_keys::ONBOARDED_FLAG).await.unwrap().as_deref(),
            Some("true")
        );
        let payload = store
            .get(storage_keys::ONBOARDING_PAYLOAD)
            .await
            .unwrap()
            .unwrap();
        let local: Value = serde_json::from_str(&payload).unwrap();

        // Remote received the same camelCase shape.
        let synced = state.synced.lock().unwrap();
        assert_eq!(synced.len(), 1);
        assert_eq!(synced[0]["firstName"], "Marie");
        assert_eq!(synced[0]["notifChoice"], true);
        assert_eq!(synced[0]["profile"]["interests"], local["profile"]["interests"]);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn finalize_still_advances_when_the_sync_endpoint_is_missing() {
    timeout(TEST_TIMEOUT, async {
        let (port, state) = start_server().await;
        *state.disable_sync.lock().unwrap() = true;

        let (mut flow, store) = flow(port).await;
        flow.dispatch(ProfileAction::SetNotifChoice(false));
        flow.skip_questions();

        flow.finalize().await.unwrap();

        assert_eq!(flow.screen(), Screen::Done);
        assert!(state.synced.lock().unwrap().is_empty());
        assert_eq!(
            store.get(storage_keys::ONBOARDED_FLAG).await.unwrap().as_deref(),
            Some("true")
        );
    })
    .await
    .expect("test timed out");
}

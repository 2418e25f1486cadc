//! Portal Entry Point
//!
//! Terminal front end for the academy auth layer. Wires the identity
//! sources, stores, and session state together, runs the boot-time logout
//! sweep check, then dispatches a single command. Uses `anyhow` for
//! startup errors; application-level errors stay inside `AuthResponse`.

use std::env;
use std::sync::Arc;

use anyhow::Context;
use auth::application::reset_password::ResetPasswordUseCase;
use auth::application::session_store::SessionStore;
use auth::application::sign_in::SignInUseCase;
use auth::application::sign_out::{LogoutTrigger, SignOutUseCase, detect_trigger};
use auth::application::sign_up::SignUpUseCase;
use auth::config::AuthConfig;
use auth::domain::entity::user::User;
use auth::domain::policy::SpecialCasePolicy;
use auth::domain::provider::IdentityBackend;
use auth::infra::{FirebaseRest, RestBackend};
use auth::presentation::dto::{LoginForm, RegisterForm};
use chrono::Utc;
use platform::cache::QueryCache;
use platform::cookie::CookieJar;
use platform::http::ApiClient;
use platform::storage::{FileStore, KeyStore, MemoryStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portal=info,auth=info,platform=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(AuthConfig {
        api_base_url: env::var("ACADEMY_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string()),
        firebase_api_key: env::var("FIREBASE_API_KEY").unwrap_or_default(),
        ..AuthConfig::development()
    });

    let state_dir = env::var("PORTAL_STATE_DIR").unwrap_or_else(|_| ".portal".to_string());

    // Shared infrastructure
    let jar = Arc::new(CookieJar::new());
    let api = ApiClient::new(&config.api_base_url, config.request_timeout)?.with_jar(jar.clone());

    let backend = Arc::new(RestBackend::new(api.clone()));
    let provider = Arc::new(FirebaseRest::new(
        config.firebase_api_key.clone(),
        config.request_timeout,
    )?);
    let policy = Arc::new(SpecialCasePolicy::default());

    let local: Arc<dyn KeyStore> =
        Arc::new(FileStore::open(format!("{state_dir}/state.json"))?);
    let ephemeral: Arc<dyn KeyStore> = Arc::new(MemoryStore::new());
    let cache = Arc::new(QueryCache::default());
    let session = Arc::new(SessionStore::new(
        local.clone(),
        config.user_storage_key.clone(),
    ));

    let sign_out = SignOutUseCase::new(
        backend.clone(),
        session.clone(),
        local.clone(),
        ephemeral.clone(),
        jar.clone(),
        cache.clone(),
        config.clone(),
    );

    // Boot-time sweep check: pending logout flags run before anything else
    if let Some(trigger) = detect_trigger(local.as_ref(), "") {
        let report = sign_out.sweep(&trigger, "/", api.host()).await;
        tracing::info!(
            cookies_expired = report.cookies_expired,
            "Pending logout processed at startup"
        );
    }

    // Restore the session: backend probe first, stored user as fallback
    {
        let backend = backend.clone();
        let cache = cache.clone();
        session
            .init_once_with(move || async move {
                if let Some(cached) = cache.get("/api/user") {
                    if let Ok(user) = serde_json::from_value::<User>(cached) {
                        return Ok(Some(user));
                    }
                }

                let user = backend.current_user().await.map_err(|e| e.to_app_error())?;
                if let Some(user) = &user {
                    cache.set("/api/user", serde_json::to_value(user)?);
                }
                Ok(user)
            })
            .await;
    }

    let command = env::args().nth(1).unwrap_or_else(|| "status".to_string());

    match command.as_str() {
        "login" => {
            let form = LoginForm {
                username: env::var("PORTAL_USERNAME").ok(),
                email: env::var("PORTAL_EMAIL").ok(),
                password: env::var("PORTAL_PASSWORD").unwrap_or_default(),
            };

            let use_case = SignInUseCase::new(backend.clone(), provider.clone(), policy.clone());
            let response = use_case.execute(form.into_login_data()).await;

            if response.is_success() {
                // response を出力でも使うため user はクローンして退避
                session.set_user(response.data.clone());
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        "register" => {
            let mut form = RegisterForm {
                username: env::var("PORTAL_USERNAME").unwrap_or_default(),
                password: env::var("PORTAL_PASSWORD").unwrap_or_default(),
                email: env::var("PORTAL_EMAIL").unwrap_or_default(),
                full_name: env::var("PORTAL_FULL_NAME").unwrap_or_default(),
                phone: env::var("PORTAL_PHONE").ok(),
                role: env::var("PORTAL_ROLE")
                    .ok()
                    .and_then(|r| auth::models::UserRole::from_code(&r))
                    .unwrap_or_default(),
                academy_id: None,
            };

            // Invitation links land here as ?token=/?invite= values
            if let Ok(invite) = env::var("PORTAL_INVITE") {
                form.apply_invitation(&invite, Utc::now().timestamp_millis())
                    .context("Invitation token rejected")?;
            }

            let use_case = SignUpUseCase::new(backend.clone(), provider.clone(), policy.clone());
            let response = use_case.execute(form.into_register_data()).await;

            if response.is_success() {
                session.set_user(response.data.clone());
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        "status" => {
            let snapshot = session.snapshot();
            let body = serde_json::json!({
                "ready": snapshot.ready,
                "authenticated": snapshot.is_authenticated(),
                "role": snapshot.role.map(|r| r.code()),
                "user": snapshot.user,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }

        "logout" => {
            let report = sign_out.sweep(&LogoutTrigger::Manual, "/", api.host()).await;
            let body = serde_json::json!({
                "cookiesExpired": report.cookies_expired,
                "showToast": report.show_toast,
                "redirect": report.redirect,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }

        "reset-password" => {
            let email = env::var("PORTAL_EMAIL").unwrap_or_default();
            let use_case =
                ResetPasswordUseCase::new(backend.clone(), provider.clone(), policy.clone());
            let response = use_case.execute(&email).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        other => {
            eprintln!("Unknown command: {other}");
            eprintln!("Usage: portal [login|register|status|logout|reset-password]");
            eprintln!("Credentials come from PORTAL_* environment variables.");
        }
    }

    Ok(())
}

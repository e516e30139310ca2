//! This crate contains all shared fullstack server functions.
#[cfg(feature = "server")]
mod auth;
#[cfg(feature = "server")]
mod cli;
#[cfg(feature = "server")]
mod jokes;
#[cfg(feature = "server")]
mod models;
#[cfg(feature = "server")]
mod rss;

pub mod auth_api;
pub mod jokes_api;
pub mod loader;

#[cfg(feature = "server")]
use dioxus::logger::tracing::{error, info};
#[cfg(feature = "server")]
use dioxus::prelude::ServerFnError;
#[cfg(feature = "server")]
use jokes_shared::datatypes::Secret;
#[cfg(feature = "server")]
use std::sync::LazyLock;
#[cfg(feature = "server")]
use tokio::sync::OnceCell;

#[cfg(feature = "server")]
static DB: LazyLock<OnceCell<sqlx::SqlitePool>> = LazyLock::new(OnceCell::new);

#[cfg(feature = "server")]
pub(crate) async fn get_db() -> Result<sqlx::SqlitePool, ServerFnError> {
    DB.get()
        .cloned()
        .ok_or_else(|| ServerFnError::new("The database is not connected"))
}

#[cfg(feature = "server")]
async fn init_db(db_url: &str) -> Result<(), ServerFnError> {
    DB.get_or_try_init(|| sqlx::SqlitePool::connect(db_url))
        .await?;
    info!("Connected to Database");
    Ok(())
}

#[cfg(feature = "server")]
static SECRET: LazyLock<once_cell::sync::OnceCell<Secret>> =
    LazyLock::new(once_cell::sync::OnceCell::new);

#[cfg(feature = "server")]
pub(crate) fn get_secret() -> Result<Secret, ServerFnError> {
    SECRET
        .get()
        .cloned()
        .ok_or_else(|| ServerFnError::new("Secret not initialized"))
}

#[cfg(feature = "server")]
pub(crate) fn init_secret(secret: Secret) {
    if SECRET.set(secret).is_err() {
        info!("The secret was already initialized");
    }
}

#[cfg(feature = "server")]
static PUBLIC_URL: LazyLock<once_cell::sync::OnceCell<String>> =
    LazyLock::new(once_cell::sync::OnceCell::new);

#[cfg(feature = "server")]
pub(crate) fn get_public_url() -> String {
    PUBLIC_URL
        .get()
        .cloned()
        .unwrap_or_else(|| "http://localhost:8080".to_owned())
}

#[cfg(feature = "server")]
pub(crate) fn init_public_url(url: String) {
    PUBLIC_URL.set(url).ok();
}

#[cfg(feature = "server")]
pub fn launch_jokes(app: fn() -> dioxus::prelude::Element) {
    if let Err(e) = dioxus::logger::init(dioxus::logger::tracing::Level::INFO) {
        eprintln!("Failed to initialize the logger: {e}");
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start the async runtime: {e}");
            std::process::exit(1);
        }
    };

    runtime.block_on(async move {
        match cli::setup().await {
            Ok(Some(server_config)) => {
                info!("Starting the server");
                let listen = format!("{}:{}", server_config.internal_ip, server_config.port);
                info!(
                    "Jokes server started:\n\tRead jokes at: {}/jokes",
                    server_config.public_url
                );
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        info!("Received Ctrl+C, shutting down server...");
                    }
                    result = launch_server(app, listen) => {
                        if let Err(e) = result {
                            error!("The server failed: {e}");
                            std::process::exit(1);
                        }
                        info!("Server stopped");
                    }
                }
            }
            Ok(None) => {
                std::thread::sleep(std::time::Duration::from_millis(100));
                std::process::exit(0);
            }
            Err(e) => {
                eprintln!("\nError: {e}");
                std::thread::sleep(std::time::Duration::from_millis(100));
                std::process::exit(1);
            }
        }
    });
}

#[cfg(feature = "server")]
async fn launch_server(
    app: fn() -> dioxus::prelude::Element,
    listen: String,
) -> Result<(), ServerFnError> {
    use axum::Router;
    use axum::routing::get;
    use axum_session::{SessionConfig, SessionLayer, SessionStore};
    use axum_session_auth::{AuthConfig, AuthSessionLayer};
    use axum_session_sqlx::SessionSqlitePool;
    use dioxus::prelude::DioxusRouterExt;
    use dioxus_fullstack::ServeConfigBuilder;

    let pool = get_db().await?;

    let session_config = SessionConfig::default().with_table_name("sessions");
    let auth_config = AuthConfig::<i64>::default().with_anonymous_user_id(Some(0));
    let session_store =
        SessionStore::<SessionSqlitePool>::new(Some(pool.clone().into()), session_config).await?;

    let serve_config = ServeConfigBuilder::default()
        .build()
        .map_err(|e| ServerFnError::new(format!("Failed to build the serve config: {e:?}")))?;

    // The feed and the logout are plain documents, everything else is rendered by the app.
    let router = Router::new()
        .route("/jokes-rss", get(rss::jokes_rss))
        .route(
            "/logout",
            get(auth::logout_redirect).post(auth::logout_redirect),
        )
        .serve_dioxus_application(serve_config, app)
        .layer(
            AuthSessionLayer::<auth::AuthAccount, i64, SessionSqlitePool, sqlx::SqlitePool>::new(
                Some(pool),
            )
            .with_config(auth_config),
        )
        .layer(SessionLayer::new(session_store));
    info!("Server configured");

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    info!("Listening on {listen}");
    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}

//! Reference host wiring exception handling into an Actix server.
//!
//! Run with `EXCEPTION_HANDLING_ENABLED=true` to receive JSON error bodies;
//! without it the routes fall back to Actix's default error rendering.

use actix_web::{App, HttpResponse, HttpServer, web};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use validator::Validate;

use exception_handler::{
    ExceptionHandlingSettings, FailureSignal, HandlerRegistry, Registration, UpstreamRelayFailure,
    configure,
};

#[derive(Debug, Deserialize, Validate)]
struct NewUser {
    #[validate(length(min = 3, max = 32, message = "size must be between 3 and 32"))]
    username: String,
    #[validate(email(message = "must be a well-formed email address"))]
    email: String,
}

async fn show_user(path: web::Path<u64>) -> Result<HttpResponse, FailureSignal> {
    let id = path.into_inner();
    if id == 0 {
        return Err(FailureSignal::invalid_argument("id must be positive"));
    }
    Err(FailureSignal::not_found(format!("User with id={id} not found")))
}

async fn create_user(body: web::Json<NewUser>) -> Result<HttpResponse, FailureSignal> {
    let user = body.into_inner();
    user.validate()?;
    if user.username == "admin" {
        return Err(FailureSignal::unique_constraint(format!(
            "username {} is already taken",
            user.username
        )));
    }
    Ok(HttpResponse::Created().json(serde_json::json!({ "username": user.username })))
}

async fn admin_panel() -> Result<HttpResponse, FailureSignal> {
    Err(FailureSignal::access_denied("role=GUEST"))
}

async fn news_feed() -> Result<HttpResponse, FailureSignal> {
    let remote = br#"{"exception":"EntityNotFoundException","error_message":"News with id=3 not found","error_code":"404 NOT_FOUND"}"#;
    Err(UpstreamRelayFailure::decode(404, remote)?.into())
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ExceptionHandlingSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let mut registry = HandlerRegistry::new();
    if configure(&settings, &mut registry) == Registration::Disabled {
        info!("serving with default error rendering");
    }

    HttpServer::new(move || {
        App::new()
            .wrap(registry.middleware())
            .route("/users/{id}", web::get().to(show_user))
            .route("/users", web::post().to(create_user))
            .route("/admin", web::get().to(admin_panel))
            .route("/news", web::get().to(news_feed))
    })
    .bind(("0.0.0.0", 8080))?
    .run()
    .await
}

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State, WebSocketUpgrade},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use duel_api::auth::{self, AppState, AppStateInner};
use duel_api::middleware::require_auth;
use duel_api::storage::Storage;
use duel_api::{challenges, images, profiles, proofs};
use duel_gateway::connection;
use duel_gateway::dispatcher::Dispatcher;

/// Body cap: image uploads top out at 10 MB, leave headroom for the rest.
const BODY_LIMIT: usize = 11 * 1024 * 1024;

#[derive(Clone)]
struct ServerState {
    dispatcher: Dispatcher,
    jwt_secret: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "duel=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("DUEL_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("DUEL_DB_PATH").unwrap_or_else(|_| "duel.db".into());
    let upload_dir = std::env::var("DUEL_UPLOAD_DIR").unwrap_or_else(|_| "uploads".into());
    let host = std::env::var("DUEL_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("DUEL_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    // Base of the public URLs handed out for uploaded images
    let public_url =
        std::env::var("DUEL_PUBLIC_URL").unwrap_or_else(|_| format!("http://localhost:{}", port));

    // Init database and image store
    let db = duel_db::Database::open(&PathBuf::from(&db_path))?;
    let storage = Storage::new(PathBuf::from(&upload_dir), public_url).await?;

    // Shared state
    let dispatcher = Dispatcher::new();
    let app_state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret: jwt_secret.clone(),
        dispatcher: dispatcher.clone(),
        storage,
    });

    let server_state = ServerState {
        dispatcher,
        jwt_secret,
    };

    // Routes
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/images/{id}", get(images::serve))
        .with_state(app_state.clone());

    let protected_routes = Router::new()
        .route("/profiles", get(profiles::directory))
        .route("/profiles/me", get(profiles::get_me))
        .route("/profiles/me", put(profiles::save_me))
        .route("/profiles/{user_id}", get(profiles::get_by_id))
        .route("/challenges", post(challenges::send))
        .route("/challenges/incoming", get(challenges::incoming))
        .route("/challenges/outgoing", get(challenges::outgoing))
        .route("/challenges/active", get(challenges::active))
        .route("/challenges/{id}", get(challenges::detail))
        .route("/challenges/{id}/respond", post(challenges::respond))
        .route("/challenges/{id}/proofs/{day}", post(proofs::upload))
        .route("/images", post(images::upload))
        .layer(middleware::from_fn(require_auth))
        .with_state(app_state);

    let ws_route = Router::new()
        .route("/gateway", get(ws_upgrade))
        .with_state(server_state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(ws_route)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("FounderDuel server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn ws_upgrade(State(state): State<ServerState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| {
        connection::handle_connection(socket, state.dispatcher, state.jwt_secret)
    })
}

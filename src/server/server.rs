use anyhow::{anyhow, Context, Result};
use std::{
    net::SocketAddr,
    time::{Duration, Instant},
};

use tracing::{debug, error, info};

use crate::album::{Album, AlbumId, NewAlbum, UploadPayload};

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;

use super::{log_requests, state::*, ApiError, IndentedJson, ServerConfig};

#[derive(Serialize)]
struct AlbumCounts {
    pub memory: usize,
    pub db: usize,
}

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: &'static str,
    pub albums: AlbumCounts,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION"),
        albums: AlbumCounts {
            memory: state.memory_store.get_albums_count(),
            db: state.db_store.get_albums_count(),
        },
    };
    IndentedJson(stats)
}

/// Any integer is a well formed id. Negative ones can't match an album and
/// come back as `None`.
fn parse_album_id(id: &str) -> Result<Option<AlbumId>, ApiError> {
    let raw_id = id
        .parse::<i64>()
        .map_err(|_| ApiError::InvalidId(id.to_owned()))?;
    Ok(AlbumId::try_from(raw_id).ok())
}

async fn get_all_albums(State(store): State<GuardedAlbumStore>) -> Result<Response, ApiError> {
    let albums = store
        .get_all_albums()
        .map_err(|err| ApiError::storage("Could not read albums", err))?;
    Ok(IndentedJson(albums).into_response())
}

async fn get_album(
    State(store): State<GuardedAlbumStore>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let Some(album_id) = parse_album_id(&id)? else {
        return Err(ApiError::NotFound(id));
    };
    match store
        .get_album(album_id)
        .map_err(|err| ApiError::storage("Could not read album", err))?
    {
        Some(album) => Ok(IndentedJson(album).into_response()),
        None => Err(ApiError::NotFound(id)),
    }
}

fn store_albums(store: &GuardedAlbumStore, albums: Vec<NewAlbum>) -> Result<Vec<Album>, ApiError> {
    let stored = store
        .insert_albums(albums)
        .map_err(|err| ApiError::storage("Could not insert albums", err))?;
    info!(
        "Stored {} album(s) in {} store",
        stored.len(),
        store.backend_name()
    );
    Ok(stored)
}

/// Accepts either one album or a list of albums, assigns ids and stores
/// them, answering with what was stored.
async fn upload_albums(
    State(store): State<GuardedAlbumStore>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let payload = UploadPayload::parse(&body).map_err(|err| {
        debug!("Rejected upload body: {}", err);
        ApiError::MalformedPayload(err)
    })?;
    payload.validate()?;
    debug!("Upload of {} album(s) accepted", payload.len());

    let response = match payload {
        UploadPayload::One(album) => {
            let album = store_albums(&store, vec![album])?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    ApiError::storage(
                        "Could not insert albums",
                        anyhow!("store returned no album for a single upload"),
                    )
                })?;
            IndentedJson(album).into_response()
        }
        UploadPayload::Many(albums) => IndentedJson(store_albums(&store, albums)?).into_response(),
    };
    Ok((StatusCode::CREATED, response).into_response())
}

struct AlbumRoutes {
    list: &'static str,
    item: &'static str,
    upload: &'static str,
}

const MEMORY_ROUTES: AlbumRoutes = AlbumRoutes {
    list: "/albums",
    item: "/albums/{id}",
    upload: "/upload",
};

const DB_ROUTES: AlbumRoutes = AlbumRoutes {
    list: "/db",
    item: "/db/{id}",
    upload: "/db/upload",
};

fn make_album_routes(paths: &AlbumRoutes, store: GuardedAlbumStore) -> Router {
    Router::new()
        .route(paths.list, get(get_all_albums))
        .route(paths.item, get(get_album))
        .route(paths.upload, post(upload_albums))
        .with_state(store)
}

pub fn make_app(
    config: ServerConfig,
    memory_store: GuardedAlbumStore,
    db_store: GuardedAlbumStore,
) -> Router {
    let max_body_bytes = config.max_body_bytes;
    let state = ServerState {
        config,
        start_time: Instant::now(),
        memory_store: memory_store.clone(),
        db_store: db_store.clone(),
    };

    let home_router: Router = Router::new()
        .route("/", get(home))
        .with_state(state.clone());

    home_router
        .merge(make_album_routes(&MEMORY_ROUTES, memory_store))
        .merge(make_album_routes(&DB_ROUTES, db_store))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(middleware::from_fn_with_state(state, log_requests))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Could not listen for the shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}

pub async fn run_server(
    config: ServerConfig,
    memory_store: GuardedAlbumStore,
    db_store: GuardedAlbumStore,
) -> Result<()> {
    let address = SocketAddr::new(config.bind_address, config.port);
    let app = make_app(config, memory_store, db_store);

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .with_context(|| format!("Could not listen on {}", address))?;
    info!("Currently listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

//! AuditScout Gateway: the dashboard at 127.0.0.1:8000 by default.
//! Starts scans, streams their progress over SSE, and publishes the register to GitHub.

use auditscout_core::{
    gemini_api_key, ContentStore, GeminiClient, GenerationService, GitHubClient, PublishConfig,
    PublishResult, Publisher, ReportGenerator, ScanProfile, ScanSession, ScanSnapshot,
    ScoutConfig, ScoutError, SettingsStore,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type DynGenerator = ReportGenerator<Arc<dyn GenerationService>>;
type DynPublisher = Publisher<Arc<dyn ContentStore>>;

/// Shown in place of a saved token; sending it back leaves the stored token unchanged.
const TOKEN_MASK: &str = "********";

#[derive(Clone)]
struct AppState {
    session: Arc<ScanSession>,
    settings: Arc<SettingsStore>,
    /// `None` when no Gemini key is configured; scans are then refused.
    generator: Option<Arc<DynGenerator>>,
    publisher: Arc<DynPublisher>,
    publish_lock: Arc<tokio::sync::Mutex<()>>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[auditscout] no .env loaded: {}", e);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "gateway stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ScoutError> {
    let config = ScoutConfig::load()?;
    let settings = SettingsStore::open(Some(config.storage_path.as_str()))?;

    let profile = match config.prompt_template() {
        Some(template) => ScanProfile::dashboard().with_template(template),
        None => ScanProfile::dashboard(),
    };
    let generator = match gemini_api_key() {
        Some(key) => {
            let client = GeminiClient::new(key)?.with_base_url(&config.gemini_api_base);
            let service: Arc<dyn GenerationService> = Arc::new(client);
            Some(Arc::new(ReportGenerator::new(service, profile)))
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set; scans will be refused until it is configured");
            None
        }
    };
    let store: Arc<dyn ContentStore> =
        Arc::new(GitHubClient::new().with_api_base(&config.github_api_base));

    let state = AppState {
        session: ScanSession::new(),
        settings: Arc::new(settings),
        generator,
        publisher: Arc::new(Publisher::new(store)),
        publish_lock: Arc::new(tokio::sync::Mutex::new(())),
    };

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        app = %config.app_name,
        addr = %addr,
        template = profile.template.name,
        model = profile.model,
        "dashboard listening"
    );
    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_dashboard))
        .route("/health", get(health))
        .route("/api/v1/scan", get(scan_snapshot).post(start_scan))
        .route("/api/v1/scan/events", get(scan_events))
        .route("/api/v1/publish", post(publish))
        .route(
            "/api/v1/settings/github",
            get(read_github_settings).put(save_github_settings),
        )
        .with_state(state)
}

/// Error body `{"error": "..."}` with a status derived from the error kind.
struct ApiError(ScoutError);

impl From<ScoutError> for ApiError {
    fn from(e: ScoutError) -> Self {
        Self(e)
    }
}

fn status_for(e: &ScoutError) -> StatusCode {
    match e {
        ScoutError::MissingCredential(_) | ScoutError::NothingToPublish => StatusCode::BAD_REQUEST,
        ScoutError::ScanInProgress => StatusCode::CONFLICT,
        ScoutError::Publish(_) | ScoutError::Generation(_) | ScoutError::Http(_) => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn serve_dashboard() -> Html<&'static str> {
    const INDEX: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/index.html"));
    Html(INDEX)
}

async fn scan_snapshot(State(state): State<AppState>) -> Json<ScanSnapshot> {
    Json(state.session.snapshot())
}

/// POST /api/v1/scan: claim the session and run the scan on a background task.
async fn start_scan(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ScanSnapshot>), ApiError> {
    let generator = state
        .generator
        .clone()
        .ok_or(ScoutError::MissingCredential("API Key"))?;
    let run = state.session.try_start()?;
    let today = chrono::Local::now().date_naive();

    tokio::spawn(async move {
        run.execute(generator.as_ref(), today).await;
    });

    Ok((StatusCode::ACCEPTED, Json(state.session.snapshot())))
}

/// GET /api/v1/scan/events: the current snapshot, then one event per transition.
async fn scan_events(
    State(state): State<AppState>,
) -> Sse<impl futures_util::Stream<Item = Result<Event, Infallible>> + Send + 'static> {
    let mut rx = state.session.subscribe();
    let stream = async_stream::stream! {
        let current = rx.borrow_and_update().clone();
        yield Ok(snapshot_event(&current));
        while rx.changed().await.is_ok() {
            let next = rx.borrow_and_update().clone();
            yield Ok(snapshot_event(&next));
        }
    };
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive"),
    )
}

fn snapshot_event(snapshot: &ScanSnapshot) -> Event {
    Event::default()
        .event("snapshot")
        .json_data(snapshot)
        .unwrap_or_else(|_| Event::default().data("{}"))
}

/// POST /api/v1/publish: upsert the completed reports using the saved settings.
async fn publish(State(state): State<AppState>) -> Response {
    let _serialized = state.publish_lock.lock().await;

    let outcome = match state.settings.load_publish_config() {
        Ok(saved) => {
            let items = state.session.snapshot().reports.completed();
            state
                .publisher
                .publish(&saved.unwrap_or_default(), &items)
                .await
        }
        Err(e) => Err(e),
    };

    let result = PublishResult::from(&outcome);
    state.session.record_publish(result.clone());
    let status = match &outcome {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "publish failed");
            status_for(e)
        }
    };
    (status, Json(result)).into_response()
}

#[derive(Serialize)]
struct GithubSettingsView {
    #[serde(flatten)]
    config: PublishConfig,
    saved: bool,
}

async fn read_github_settings(
    State(state): State<AppState>,
) -> Result<Json<GithubSettingsView>, ApiError> {
    let view = match state.settings.load_publish_config()? {
        Some(mut config) => {
            if !config.token.is_empty() {
                config.token = TOKEN_MASK.to_string();
            }
            GithubSettingsView { config, saved: true }
        }
        None => GithubSettingsView {
            config: PublishConfig {
                path: PublishConfig::DEFAULT_PATH.to_string(),
                ..Default::default()
            },
            saved: false,
        },
    };
    Ok(Json(view))
}

/// PUT /api/v1/settings/github: overwrite the saved config. A blank or masked token
/// keeps the stored one.
async fn save_github_settings(
    State(state): State<AppState>,
    Json(mut incoming): Json<PublishConfig>,
) -> Result<StatusCode, ApiError> {
    let token = incoming.token.trim();
    if token.is_empty() || token == TOKEN_MASK {
        incoming.token = state
            .settings
            .load_publish_config()?
            .map(|c| c.token)
            .unwrap_or_default();
    }
    if incoming.path.trim().is_empty() {
        incoming.path = PublishConfig::DEFAULT_PATH.to_string();
    }
    state.settings.save_publish_config(&incoming)?;
    Ok(StatusCode::NO_CONTENT)
}

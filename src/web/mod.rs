//! Web front end for orrery.
//!
//! One HTML page per task plus a JSON body listing. Tasks are CPU-bound
//! and run on the blocking pool.
//!
//! This module is only available with the `web` feature.

pub mod pages;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::{error, info, warn};

use crate::error::{OrreryError, OrreryResult};
use crate::orbit::body::{Body, BodyRegistry};
use crate::tasks::{
    parse_names, AnimationRequest, OrbitRequest, Orrery, RelativeOrbitRequest,
    SpirographRequest,
};
use pages::{Choice, Field, Graphic};

/// Shared state: the task entry points.
pub type AppState = Arc<Orrery>;

/// Body shown on the angle-vs-time page when none is chosen.
pub const DEFAULT_ANGLE_BODY: &str = "Pluto";

/// Error response: status plus message body.
#[derive(Debug)]
pub struct WebError {
    status: StatusCode,
    message: String,
}

impl WebError {
    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<OrreryError> for WebError {
    fn from(err: OrreryError) -> Self {
        if err.is_client_error() {
            warn!(error = %err, "Rejected request");
            Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            }
        } else {
            error!(error = %err, "Task failed");
            Self::internal(err.to_string())
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

/// Build the router over shared task state.
pub fn router(orrery: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/bodies", get(bodies_handler))
        .route("/task/:number", get(task_handler))
        .with_state(orrery)
}

/// Bind `address` and serve until the process exits.
///
/// # Errors
///
/// Returns error if the listener cannot be bound or the server fails.
pub async fn serve(orrery: AppState, address: &str) -> OrreryResult<()> {
    let listener = tokio::net::TcpListener::bind(address).await?;
    info!(address = %listener.local_addr()?, "Starting server");
    axum::serve(listener, router(orrery)).await?;
    Ok(())
}

/// Query string shared by every task page. Unused keys are ignored.
///
/// Bodies arrive as repeated `bodies` values (one per checkbox), as a
/// comma-separated `bodies` list, or as `<name>=on` pairs.
#[derive(Debug, Default)]
pub struct TaskQuery {
    pub bodies: Vec<String>,
    pub switched_on: Vec<String>,
    pub body: Option<String>,
    pub center: Option<String>,
    pub three_d: Option<String>,
}

impl TaskQuery {
    /// Collect the query from its raw pairs, in order.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "bodies" => query.bodies.push(value),
                "body" => query.body = Some(value),
                "center" => query.center = Some(value),
                "three_d" => query.three_d = Some(value),
                _ if value == "on" => query.switched_on.push(key),
                _ => {}
            }
        }
        query
    }

    /// Selected body names: `bodies` values first, then `<name>=on` keys
    /// that name a registry body.
    fn names(&self, registry: &BodyRegistry) -> Vec<String> {
        let mut names: Vec<String> = self.bodies.iter().flat_map(|v| parse_names(v)).collect();
        names.extend(
            self.switched_on
                .iter()
                .filter(|k| registry.get(k).is_ok())
                .cloned(),
        );
        names
    }

    fn three_d(&self) -> bool {
        matches!(
            self.three_d.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("true" | "on" | "1" | "yes")
        )
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T, WebError>
where
    T: Send + 'static,
    F: FnOnce() -> OrreryResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| WebError::internal(format!("task panicked: {e}")))?
        .map_err(WebError::from)
}

async fn index_handler(State(orrery): State<AppState>) -> Html<String> {
    let names: Vec<&str> = orrery.registry().names().collect();
    Html(pages::index(names.as_slice()))
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn bodies_handler(State(orrery): State<AppState>) -> Json<Vec<Body>> {
    Json(orrery.registry().all().to_vec())
}

async fn task_handler(
    State(orrery): State<AppState>,
    Path(number): Path<u8>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Html<String>, WebError> {
    let info = pages::task(number).ok_or_else(|| WebError::not_found(format!("no task {number}")))?;
    let query = TaskQuery::from_pairs(pairs);
    let names = query.names(orrery.registry());
    let three_d = query.three_d();
    let choices = Choice::for_bodies(orrery.registry().all(), &names);

    let (fields, graphic) = match number {
        1 => {
            let svg = run_blocking(move || Ok(orrery.kepler_law())).await?;
            (Vec::new(), Some(Graphic::Svg(svg)))
        }
        2 => {
            let fields = vec![Field::Bodies(choices), Field::ThreeD(three_d)];
            let graphic = if names.is_empty() {
                None
            } else {
                let request = OrbitRequest { bodies: names, three_d };
                Some(Graphic::Svg(run_blocking(move || orrery.orbits(&request)).await?))
            };
            (fields, graphic)
        }
        3 | 4 => {
            let fields = vec![Field::Bodies(choices)];
            let graphic = if names.is_empty() {
                None
            } else {
                let request = AnimationRequest {
                    bodies: names,
                    three_d: number == 4,
                };
                Some(Graphic::Gif(run_blocking(move || orrery.animate(&request)).await?))
            };
            (fields, graphic)
        }
        5 => {
            let body = query
                .body
                .clone()
                .filter(|b| !b.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ANGLE_BODY.to_string());
            let fields = vec![Field::Body(body.clone())];
            let svg = run_blocking(move || orrery.angle_vs_time(&body)).await?;
            (fields, Some(Graphic::Svg(svg)))
        }
        6 => {
            let fields = vec![Field::Bodies(choices)];
            let graphic = if names.is_empty() {
                None
            } else {
                let request = SpirographRequest { bodies: names };
                Some(Graphic::Svg(run_blocking(move || orrery.spirograph(&request)).await?))
            };
            (fields, graphic)
        }
        _ => {
            let center = query
                .center
                .clone()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| RelativeOrbitRequest::default().center);
            let fields = vec![
                Field::Center(center.clone()),
                Field::Bodies(choices),
                Field::ThreeD(three_d),
            ];
            let graphic = if names.is_empty() {
                None
            } else {
                let request = RelativeOrbitRequest {
                    center,
                    bodies: names,
                    three_d,
                };
                Some(Graphic::Svg(
                    run_blocking(move || orrery.relative_orbits(&request)).await?,
                ))
            };
            (fields, graphic)
        }
    };

    Ok(Html(pages::task_page(info, &fields, graphic.as_ref())))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::cache::{MemoryStore, RenderCache};
    use crate::config::OrreryConfig;
    use crate::orbit::body::BodyRegistry;
    use crate::render::gif::GifRenderer;
    use axum::body::{to_bytes, Body as HttpBody};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        let config = OrreryConfig::builder().animation_size(100).build();
        let orrery = Orrery::with_parts(
            BodyRegistry::solar_system(),
            RenderCache::new(MemoryStore::new()),
            GifRenderer::new(),
            config,
        )
        .unwrap();
        router(Arc::new(orrery))
    }

    async fn get(uri: &str) -> (StatusCode, String) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(HttpBody::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn test_query_collects_every_body_form() {
        let registry = BodyRegistry::solar_system();
        let query = TaskQuery::from_pairs(pairs(&[
            ("bodies", "Earth"),
            ("bodies", "venus,mars"),
            ("jupiter", "on"),
            ("vulcan", "on"),
            ("three_d", "on"),
        ]));
        assert_eq!(query.names(&registry), vec!["Earth", "venus", "mars", "jupiter"]);
        assert!(query.three_d());
    }

    #[test]
    fn test_query_three_d_flag() {
        let mut query = TaskQuery::default();
        assert!(!query.three_d());
        for value in ["true", "on", "1", "YES"] {
            query.three_d = Some(value.to_string());
            assert!(query.three_d(), "{value}");
        }
        query.three_d = Some("false".to_string());
        assert!(!query.three_d());
    }

    #[test]
    fn test_error_status_mapping() {
        let client: WebError = OrreryError::UnknownBody("x".to_string()).into();
        assert_eq!(client.status, StatusCode::BAD_REQUEST);
        let server: WebError = OrreryError::render("boom").into();
        assert_eq!(server.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"status\":\"ok\""));
    }

    #[tokio::test]
    async fn test_index() {
        let (status, body) = get("/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/task/7"));
        assert!(body.contains("Pluto"));
    }

    #[tokio::test]
    async fn test_bodies_json() {
        let (status, body) = get("/api/bodies").await;
        assert_eq!(status, StatusCode::OK);
        let bodies: Vec<Body> = serde_json::from_str(&body).unwrap();
        assert_eq!(bodies.len(), 9);
        assert_eq!(bodies[2].name, "Earth");
    }

    #[tokio::test]
    async fn test_task_1_renders_svg() {
        let (status, body) = get("/task/1").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<svg"));
    }

    #[tokio::test]
    async fn test_task_2_without_bodies_shows_form_only() {
        let (status, body) = get("/task/2").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<form"));
        assert!(!body.contains("<svg"));
    }

    #[tokio::test]
    async fn test_task_2_with_bodies() {
        let (status, body) = get("/task/2?bodies=earth,mars&three_d=on").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<svg"));
        assert!(body.contains("3D Planet Orbits"));
    }

    #[tokio::test]
    async fn test_task_2_repeated_checkboxes() {
        let (status, body) = get("/task/2?bodies=Earth&bodies=Mars").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<svg"));
        assert!(body.contains("value=\"Earth\" checked"));
        assert!(body.contains("value=\"Mars\" checked"));
        assert!(body.contains("value=\"Venus\">"));
    }

    #[tokio::test]
    async fn test_task_2_on_pairs() {
        let (status, body) = get("/task/2?mercury=on&venus=on").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<svg"));
        assert!(body.contains("value=\"Mercury\" checked"));
    }

    #[tokio::test]
    async fn test_task_3_embeds_gif() {
        let (status, body) = get("/task/3?bodies=mercury").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("data:image/gif;base64,R0lGODlh"));
    }

    #[tokio::test]
    async fn test_task_5_defaults_to_pluto() {
        let (status, body) = get("/task/5").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("name=\"body\" value=\"Pluto\""));
        assert!(body.contains("<svg"));
    }

    #[tokio::test]
    async fn test_task_6_wrong_count_is_bad_request() {
        let (status, body) = get("/task/6?bodies=earth").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("exactly 2"));
    }

    #[tokio::test]
    async fn test_task_7_defaults_center() {
        let (status, body) = get("/task/7?bodies=venus").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("name=\"center\" value=\"Earth\""));
        assert!(body.contains(">Venus<"));
    }

    #[tokio::test]
    async fn test_unknown_body_is_bad_request() {
        let (status, body) = get("/task/2?bodies=vulcan").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("vulcan"));
    }

    #[tokio::test]
    async fn test_unknown_task_is_not_found() {
        let (status, _) = get("/task/9").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

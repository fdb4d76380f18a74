//! HTTP route definitions and handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use heroes_core::serialize::Node;
use heroes_core::{
    to_payload, Graph, NewHero, NewPower, PowerUpdate, SerializeOptions, SqliteRosterService,
};
use log::{error, info, warn};
use serde_json::{json, Value};
use tower_http::limit::RequestBodyLimitLayer;

use super::error::ApiError;
use super::extract::Fields;
use crate::context::AppContext;

/// Default request body size limit (1MB).
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

const HERO_FIELDS: &[&str] = &["id", "name", "super_name"];
const POWER_FIELDS: &[&str] = &["id", "name", "description"];
const CREATED_LINK_RULES: &[&str] = &["-hero_id", "-power_id"];

type SharedContext = Arc<AppContext>;

fn api_routes() -> Router<SharedContext> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/heroes", get(list_heroes).post(create_hero))
        .route("/heroes/:id", get(get_hero).delete(delete_hero))
        .route("/powers", get(list_powers).post(create_power))
        .route(
            "/powers/:id",
            get(get_power).patch(update_power).delete(delete_power),
        )
        .route("/hero_powers", post(create_hero_power))
}

/// Creates the HTTP router with the default body size limit.
pub fn create_router(ctx: SharedContext) -> Router {
    create_router_with_body_limit(ctx, DEFAULT_BODY_LIMIT)
}

/// Creates the HTTP router with a custom body size limit.
pub fn create_router_with_body_limit(ctx: SharedContext, body_limit: usize) -> Router {
    api_routes()
        .with_state(ctx)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(middleware::from_fn(log_requests))
}

async fn log_requests(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    let status = response.status();
    let duration_ms = started_at.elapsed().as_millis();
    if status.is_server_error() {
        error!(
            "event=http_request module=api status=error method={method} path={path} code={} duration_ms={duration_ms}",
            status.as_u16()
        );
    } else if status.is_client_error() {
        warn!(
            "event=http_request module=api status=rejected method={method} path={path} code={} duration_ms={duration_ms}",
            status.as_u16()
        );
    } else {
        info!(
            "event=http_request module=api status=ok method={method} path={path} code={} duration_ms={duration_ms}",
            status.as_u16()
        );
    }
    response
}

async fn index() -> Html<&'static str> {
    Html("<h1>Welcome to my API</h1>")
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// ============================================================
// Heroes
// ============================================================

async fn list_heroes(State(ctx): State<SharedContext>) -> Result<Json<Value>, ApiError> {
    let heroes = store(&ctx, |roster| roster.list_heroes()).await?;
    let graph = Graph::from_heroes(heroes);
    Ok(Json(render_all(graph.heroes(), HERO_FIELDS)?))
}

async fn create_hero(
    State(ctx): State<SharedContext>,
    mut body: Fields,
) -> Result<impl IntoResponse, ApiError> {
    let new_hero = NewHero::new(body.require_str("name")?, body.require_str("super_name")?);
    body.finish()?;

    let hero = store(&ctx, move |roster| roster.create_hero(&new_hero)).await?;
    let id = hero.id;
    let graph = Graph::from_heroes([hero]);
    let payload = render(graph.hero(id), &SerializeOptions::only(HERO_FIELDS), "Hero")?;
    Ok((StatusCode::CREATED, payload))
}

async fn get_hero(
    State(ctx): State<SharedContext>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&raw_id, "Hero")?;
    let graph = store(&ctx, move |roster| roster.get_hero_graph(id)).await?;
    render(graph.hero(id), &SerializeOptions::default(), "Hero")
}

async fn delete_hero(
    State(ctx): State<SharedContext>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id, "Hero")?;
    store(&ctx, move |roster| roster.delete_hero(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================
// Powers
// ============================================================

async fn list_powers(State(ctx): State<SharedContext>) -> Result<Json<Value>, ApiError> {
    let powers = store(&ctx, |roster| roster.list_powers()).await?;
    let graph = Graph::from_powers(powers);
    Ok(Json(render_all(graph.powers(), POWER_FIELDS)?))
}

async fn create_power(
    State(ctx): State<SharedContext>,
    mut body: Fields,
) -> Result<impl IntoResponse, ApiError> {
    let name = body.require_str("name")?;
    let description = body.require_str("description")?;
    body.finish()?;
    let new_power = NewPower::new(name, description)?;

    let power = store(&ctx, move |roster| roster.create_power(&new_power)).await?;
    let id = power.id;
    let graph = Graph::from_powers([power]);
    let payload = render(graph.power(id), &SerializeOptions::only(POWER_FIELDS), "Power")?;
    Ok((StatusCode::CREATED, payload))
}

async fn get_power(
    State(ctx): State<SharedContext>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&raw_id, "Power")?;
    let power = store(&ctx, move |roster| roster.get_power(id)).await?;
    let graph = Graph::from_powers([power]);
    render(graph.power(id), &SerializeOptions::only(POWER_FIELDS), "Power")
}

/// Partially updates a power.
///
/// A missing power is reported before the body is inspected, matching the
/// order a client would observe for `GET`.
async fn update_power(
    State(ctx): State<SharedContext>,
    Path(raw_id): Path<String>,
    mut body: Fields,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&raw_id, "Power")?;
    store(&ctx, move |roster| roster.get_power(id)).await?;

    let update = PowerUpdate {
        description: body.optional_str("description")?,
    };
    body.finish()?;
    if update.is_empty() {
        return Err(ApiError::malformed(format!(
            "expected at least one of: {}",
            PowerUpdate::FIELDS.join(", ")
        )));
    }

    let power = store(&ctx, move |roster| roster.update_power(id, update)).await?;
    let graph = Graph::from_powers([power]);
    render(graph.power(id), &SerializeOptions::only(POWER_FIELDS), "Power")
}

async fn delete_power(
    State(ctx): State<SharedContext>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id, "Power")?;
    store(&ctx, move |roster| roster.delete_power(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================
// Hero powers
// ============================================================

async fn create_hero_power(
    State(ctx): State<SharedContext>,
    mut body: Fields,
) -> Result<impl IntoResponse, ApiError> {
    let strength = body.require_str("strength")?;
    let hero_id = body.require_id("hero_id")?;
    let power_id = body.require_id("power_id")?;
    body.finish()?;

    let (link, graph) =
        store(&ctx, move |roster| roster.create_hero_power(&strength, hero_id, power_id)).await?;
    let payload = render(
        graph.link(link.id),
        &SerializeOptions::rules(CREATED_LINK_RULES),
        "HeroPower",
    )?;
    Ok((StatusCode::CREATED, payload))
}

// ============================================================
// Helpers
// ============================================================

/// Runs store work off the async workers and maps its outcome.
async fn store<T, E, F>(ctx: &SharedContext, work: F) -> Result<T, ApiError>
where
    F: FnOnce(&SqliteRosterService<'_>) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    match ctx.spawn_roster(work).await {
        Ok(outcome) => outcome.map_err(Into::into),
        Err(err) => {
            error!("event=store_task module=api status=error error={err}");
            Err(ApiError::Internal)
        }
    }
}

/// Path ids that are not integers cannot name an existing row.
fn parse_id(raw: &str, entity: &'static str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound(entity))
}

fn render(
    node: Option<Node<'_>>,
    options: &SerializeOptions<'_>,
    entity: &'static str,
) -> Result<Json<Value>, ApiError> {
    let node = node.ok_or(ApiError::NotFound(entity))?;
    Ok(Json(Value::Object(to_payload(node, options)?)))
}

fn render_all<'g>(
    nodes: impl Iterator<Item = Node<'g>>,
    fields: &[&str],
) -> Result<Value, ApiError> {
    let options = SerializeOptions::only(fields);
    let items = nodes
        .map(|node| to_payload(node, &options).map(Value::Object))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array(items))
}

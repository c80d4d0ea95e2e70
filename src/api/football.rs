//! Football data API endpoints
//!
//! Every route answers 200. When API-Football fails, array routes send
//! `[]` and object routes send `{}`; browsers cannot tell "no matches"
//! from "upstream down".

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::middleware::{AppState, CACHE_CONTROL_FIXTURES, CACHE_CONTROL_LIVE};
use crate::services::football::empty_team_profile;
use crate::upstream::UpstreamError;

/// Build football routes, mounted under `/api`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/leagues", get(leagues))
        .route("/teams", get(teams))
        .route("/teams/search", get(search_teams))
        .route("/teams/{id}/info", get(team_info))
        .route("/teams/{id}/fixtures", get(team_fixtures))
        .route("/teams/{id}/standings", get(team_standings))
        .route("/teams/{id}/players", get(team_players))
        .route("/teams/verify-ids", get(verify_team_ids))
        .route("/players/search", get(search_players))
        .route("/standings", get(standings))
        .route("/top-scorers", get(top_scorers))
        .route("/fixtures", get(fixtures))
        .route("/live", get(live))
        .route("/fixture-detail", get(fixture_detail))
        .route("/fixture-events", get(fixture_events))
        .route("/h2h", get(head_to_head))
}

/// Query parameters accepted by the football routes
///
/// All optional; blank values count as missing.
#[derive(Debug, Default, Deserialize)]
pub struct FootballQuery {
    pub league: Option<String>,
    pub season: Option<String>,
    pub date: Option<String>,
    pub id: Option<String>,
    pub h2h: Option<String>,
    pub name: Option<String>,
    pub ids: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn log_failure(route: &str, err: &UpstreamError) {
    match err {
        UpstreamError::MissingKey => tracing::debug!("{}: {}", route, err),
        _ => tracing::error!("{} error: {}", route, err),
    }
}

/// The upstream array, or `[]` on failure
fn array_or_empty(route: &str, result: Result<Vec<Value>, UpstreamError>) -> Json<Vec<Value>> {
    match result {
        Ok(items) => Json(items),
        Err(e) => {
            log_failure(route, &e);
            Json(Vec::new())
        }
    }
}

/// Like [`array_or_empty`] but successful responses carry `cache_control`
fn cached_array_or_empty(
    route: &str,
    cache_control: &'static str,
    result: Result<Vec<Value>, UpstreamError>,
) -> Response {
    match result {
        Ok(items) => ([(header::CACHE_CONTROL, cache_control)], Json(items)).into_response(),
        Err(e) => {
            log_failure(route, &e);
            Json(Vec::<Value>::new()).into_response()
        }
    }
}

/// GET /api/leagues
async fn leagues(State(state): State<AppState>) -> Json<Vec<Value>> {
    array_or_empty("leagues", state.football.leagues().await)
}

/// GET /api/teams?league=&season=
async fn teams(State(state): State<AppState>, Query(q): Query<FootballQuery>) -> Json<Vec<Value>> {
    let (Some(league), Some(season)) = (present(&q.league), present(&q.season)) else {
        return Json(Vec::new());
    };
    array_or_empty("teams", state.football.teams(league, season).await)
}

/// GET /api/standings?league=&season=
async fn standings(State(state): State<AppState>, Query(q): Query<FootballQuery>) -> Json<Vec<Value>> {
    let (Some(league), Some(season)) = (present(&q.league), present(&q.season)) else {
        return Json(Vec::new());
    };
    array_or_empty("standings", state.football.standings(league, season).await)
}

/// GET /api/top-scorers?league=&season=
async fn top_scorers(State(state): State<AppState>, Query(q): Query<FootballQuery>) -> Json<Vec<Value>> {
    let (Some(league), Some(season)) = (present(&q.league), present(&q.season)) else {
        return Json(Vec::new());
    };
    array_or_empty("top-scorers", state.football.top_scorers(league, season).await)
}

/// GET /api/fixtures?date=[&league=]
async fn fixtures(State(state): State<AppState>, Query(q): Query<FootballQuery>) -> Response {
    let Some(date) = present(&q.date) else {
        return Json(Vec::<Value>::new()).into_response();
    };
    cached_array_or_empty(
        "fixtures",
        CACHE_CONTROL_FIXTURES,
        state.football.fixtures(date, present(&q.league)).await,
    )
}

/// GET /api/live
async fn live(State(state): State<AppState>) -> Response {
    cached_array_or_empty("live", CACHE_CONTROL_LIVE, state.football.live().await)
}

/// GET /api/fixture-detail?id=
async fn fixture_detail(State(state): State<AppState>, Query(q): Query<FootballQuery>) -> Json<Value> {
    let Some(id) = present(&q.id) else {
        return Json(json!({}));
    };
    match state.football.fixture_detail(id).await {
        Ok(body) => Json(body),
        Err(e) => {
            log_failure("fixture-detail", &e);
            Json(json!({}))
        }
    }
}

/// GET /api/fixture-events?id=
async fn fixture_events(State(state): State<AppState>, Query(q): Query<FootballQuery>) -> Json<Vec<Value>> {
    let Some(id) = present(&q.id) else {
        return Json(Vec::new());
    };
    array_or_empty("fixture-events", state.football.fixture_events(id).await)
}

/// GET /api/h2h?h2h={home}-{away}
async fn head_to_head(State(state): State<AppState>, Query(q): Query<FootballQuery>) -> Json<Vec<Value>> {
    let Some(h2h) = present(&q.h2h) else {
        return Json(Vec::new());
    };
    array_or_empty("h2h", state.football.head_to_head(h2h).await)
}

/// GET /api/teams/search?name=
async fn search_teams(State(state): State<AppState>, Query(q): Query<FootballQuery>) -> Json<Vec<Value>> {
    let Some(name) = present(&q.name) else {
        return Json(Vec::new());
    };
    array_or_empty("teams search", state.football.search_teams(name).await)
}

/// GET /api/teams/{id}/info
async fn team_info(State(state): State<AppState>, Path(id): Path<String>) -> Json<Value> {
    let Ok(id) = id.trim().parse::<i64>() else {
        return Json(empty_team_profile("none"));
    };
    match state.football.team_info(id).await {
        Ok(profile) => Json(profile),
        Err(e) => {
            log_failure("team info", &e);
            Json(empty_team_profile("error"))
        }
    }
}

/// GET /api/teams/{id}/fixtures
async fn team_fixtures(State(state): State<AppState>, Path(id): Path<String>) -> Json<Value> {
    let fixtures = match id.trim().parse::<i64>() {
        Ok(id) => array_or_empty("team fixtures", state.football.team_fixtures(id).await).0,
        Err(_) => Vec::new(),
    };
    Json(json!({ "fixtures": fixtures }))
}

/// GET /api/teams/{id}/standings
async fn team_standings(State(state): State<AppState>, Path(id): Path<String>) -> Json<Value> {
    let standings = match id.trim().parse::<i64>() {
        Ok(id) => array_or_empty("team standings", state.football.team_standings(id).await).0,
        Err(_) => Vec::new(),
    };
    Json(json!({ "standings": standings }))
}

/// GET /api/teams/{id}/players[?season=]
///
/// A season that is not a year is ignored.
async fn team_players(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<FootballQuery>,
) -> Json<Value> {
    let empty = || Json(json!({ "players": [], "coach": null }));
    let Ok(id) = id.trim().parse::<i64>() else {
        return empty();
    };
    let season = present(&q.season).and_then(|s| s.parse::<i32>().ok());
    match state.football.team_players(id, season).await {
        Ok(squad) => Json(squad),
        Err(e) => {
            log_failure("team players", &e);
            empty()
        }
    }
}

/// GET /api/players/search?id=|name=
async fn search_players(State(state): State<AppState>, Query(q): Query<FootballQuery>) -> Json<Value> {
    let (id, name) = (present(&q.id), present(&q.name));
    if id.is_none() && name.is_none() {
        return Json(json!({ "players": [] }));
    }
    match state.football.search_players(id, name).await {
        Ok(players) => Json(json!({ "players": players, "source": "api-football" })),
        Err(e) => {
            log_failure("player search", &e);
            Json(json!({ "players": [] }))
        }
    }
}

/// GET /api/teams/verify-ids?ids=33,40,529
async fn verify_team_ids(State(state): State<AppState>, Query(q): Query<FootballQuery>) -> Json<Value> {
    let ids: Vec<&str> = q
        .ids
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect();
    if ids.is_empty() {
        return Json(json!({ "error": "No team IDs provided. Use ?ids=33,40,529" }));
    }

    let results = state.football.verify_team_ids(&ids).await;
    Json(json!({ "total": results.len(), "results": results }))
}

//! Football data service
//!
//! Cache-aside access to API-Football plus the few reshaping rules the
//! site relies on:
//! - live matches are filtered to ones actually in play
//! - fixtures by date carry a season derived from the date
//! - known stale team ids are remapped before reaching upstream

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{cache_key, MemoryCache, Resource};
use crate::config::CacheTtlConfig;
use crate::upstream::{response_array, FootballClient, UpstreamError};

/// Status codes that mean a match is in progress
const LIVE_STATUSES: &[&str] = &["1H", "2H", "HT", "ET", "BT", "P"];

/// Matches whose kickoff is further than this from now are not live
const LIVE_WINDOW_HOURS: i64 = 3;

/// Season requested for team fixtures, standings and squads
const CURRENT_SEASON: i32 = 2025;

/// Squad season tried when the current one is nearly empty
const PREVIOUS_SEASON: i32 = 2024;

/// Squads smaller than this trigger the previous-season lookup
const MIN_SQUAD_SIZE: usize = 5;

/// Pause between upstream lookups when verifying a list of team ids
const VERIFY_DELAY: Duration = Duration::from_millis(100);

/// Number of recent matches used when the season has none
const TEAM_FIXTURES_FALLBACK_LAST: u32 = 50;

/// Number of head-to-head meetings requested
const H2H_LAST: u32 = 10;

/// Old team ids still linked from the site, mapped to their current ids
const TEAM_ID_MAPPING: &[(i64, i64)] = &[
    (9568, 239_235), // Inter Miami CF
    (2931, 7011),    // Al-Hilal
];

/// Current id for a team, following the stale-id mapping
pub fn correct_team_id(id: i64) -> i64 {
    TEAM_ID_MAPPING
        .iter()
        .find(|(old, _)| *old == id)
        .map(|(_, new)| *new)
        .unwrap_or(id)
}

/// Season a fixture date belongs to: seasons start in July
pub fn season_for_date(date: NaiveDate) -> i32 {
    if date.month() >= 7 {
        date.year()
    } else {
        date.year() - 1
    }
}

/// Whether an upstream "live" fixture is really being played
///
/// Kickoff must be within three hours of `now`, and the clock must be
/// running or the status must be an in-play code.
pub fn is_really_live(fixture: &Value, now: DateTime<Utc>) -> bool {
    let info = &fixture["fixture"];
    let kickoff = match info["date"]
        .as_str()
        .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
    {
        Some(k) => k.with_timezone(&Utc),
        None => return false,
    };

    if (now - kickoff).num_seconds().abs() > LIVE_WINDOW_HOURS * 3600 {
        return false;
    }

    let status = &info["status"];
    !status["elapsed"].is_null()
        || status["short"]
            .as_str()
            .is_some_and(|s| LIVE_STATUSES.contains(&s))
}

/// Reshape an API-Football `/teams?id=` entry into the team profile
pub fn team_profile(entry: &Value) -> Value {
    let team = &entry["team"];
    let venue = &entry["venue"];
    let national = team["national"].as_bool().unwrap_or(false);
    let text = |v: &Value| v.as_str().unwrap_or_default().to_string();

    json!({
        "team": {
            "id": team["id"],
            "name": team["name"],
            "code": team["code"],
            "country": team["country"],
            "founded": team["founded"],
            "logo": team["logo"],
            "national": national,
            "type": if national { "national" } else { "domestic" },
        },
        "venue": {
            "id": venue["id"],
            "name": text(&venue["name"]),
            "address": text(&venue["address"]),
            "city": text(&venue["city"]),
            "capacity": venue["capacity"],
            "surface": text(&venue["surface"]),
            "image": text(&venue["image"]),
        },
        "source": "api-football",
    })
}

/// Team profile placeholder; `source` says why it is empty
pub fn empty_team_profile(source: &str) -> Value {
    json!({ "team": {}, "venue": {}, "source": source })
}

/// Summary of one `/teams?id=` lookup for the id verification report
pub fn verified_team(id: &str, entry: &Value) -> Value {
    let team = &entry["team"];
    let venue = &entry["venue"];
    let text_or = |value: &Value, fallback: &str| match value {
        Value::Null => Value::from(fallback),
        Value::String(s) if s.is_empty() => Value::from(fallback),
        other => other.clone(),
    };
    json!({
        "id": id,
        "name": text_or(&team["name"], "Unknown"),
        "country": text_or(&team["country"], "Unknown"),
        "logo": text_or(&team["logo"], ""),
        "founded": text_or(&team["founded"], "N/A"),
        "venue": text_or(&venue["name"], "N/A"),
        "city": text_or(&venue["city"], "N/A"),
    })
}

/// Football data service
pub struct FootballService {
    client: FootballClient,
    cache: Arc<MemoryCache>,
    ttl: CacheTtlConfig,
}

impl FootballService {
    pub fn new(client: FootballClient, cache: Arc<MemoryCache>, ttl: CacheTtlConfig) -> Self {
        Self { client, cache, ttl }
    }

    pub fn has_key(&self) -> bool {
        self.client.has_key()
    }

    /// Serve from cache, or fetch and store on success
    ///
    /// Failures are returned without being cached.
    async fn cached<T, P, F, Fut>(
        &self,
        prefix: &str,
        params: &P,
        resource: Resource,
        fetch: F,
    ) -> Result<T, UpstreamError>
    where
        T: Serialize + DeserializeOwned,
        P: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, UpstreamError>>,
    {
        let key = cache_key(prefix, params);
        if let Some(hit) = self.cache.get::<T>(&key).await.ok().flatten() {
            tracing::debug!("Cache hit: {}", key);
            return Ok(hit);
        }

        let value = fetch().await?;
        let _ = self
            .cache
            .set(&key, &value, self.ttl.for_resource(resource))
            .await;
        Ok(value)
    }

    /// All leagues
    pub async fn leagues(&self) -> Result<Vec<Value>, UpstreamError> {
        self.cached("leagues", &json!({}), Resource::Leagues, || {
            self.client.get_response("/leagues", &[])
        })
        .await
    }

    /// Teams of a league season
    pub async fn teams(&self, league: &str, season: &str) -> Result<Vec<Value>, UpstreamError> {
        let params = [("league", league.to_string()), ("season", season.to_string())];
        self.cached(
            "teams-by-league",
            &json!({ "league": league, "season": season }),
            Resource::Teams,
            || self.client.get_response("/teams", &params),
        )
        .await
    }

    /// League table
    pub async fn standings(&self, league: &str, season: &str) -> Result<Vec<Value>, UpstreamError> {
        let params = [("league", league.to_string()), ("season", season.to_string())];
        self.cached(
            "standings",
            &json!({ "league": league, "season": season }),
            Resource::Standings,
            || self.client.get_response("/standings", &params),
        )
        .await
    }

    /// Top scorers, never cached
    pub async fn top_scorers(&self, league: &str, season: &str) -> Result<Vec<Value>, UpstreamError> {
        self.client
            .get_response(
                "/players/topscorers",
                &[("league", league.to_string()), ("season", season.to_string())],
            )
            .await
    }

    /// Fixtures on a date, optionally for one league
    ///
    /// The season parameter is derived from the date; an unparseable
    /// date is forwarded without one.
    pub async fn fixtures(&self, date: &str, league: Option<&str>) -> Result<Vec<Value>, UpstreamError> {
        let mut params = vec![("date", date.to_string())];
        if let Some(league) = league {
            params.push(("league", league.to_string()));
        }
        if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            params.push(("season", season_for_date(parsed).to_string()));
        }

        self.cached(
            "fixtures",
            &json!({ "date": date, "league": league }),
            Resource::Fixtures,
            || self.client.get_response("/fixtures", &params),
        )
        .await
    }

    /// Matches in play right now
    pub async fn live(&self) -> Result<Vec<Value>, UpstreamError> {
        self.cached("live", &json!({}), Resource::Live, || async {
            let matches = self
                .client
                .get_response("/fixtures", &[("live", "all".to_string())])
                .await?;
            let now = Utc::now();
            let total = matches.len();
            let live: Vec<Value> = matches
                .into_iter()
                .filter(|m| is_really_live(m, now))
                .collect();
            tracing::info!("Live fixtures: {} total, {} really live", total, live.len());
            Ok::<_, UpstreamError>(live)
        })
        .await
    }

    /// Whole upstream body for one fixture
    pub async fn fixture_detail(&self, id: &str) -> Result<Value, UpstreamError> {
        self.client.get("/fixtures", &[("id", id.to_string())]).await
    }

    /// Events (goals, cards, substitutions) of one fixture
    pub async fn fixture_events(&self, id: &str) -> Result<Vec<Value>, UpstreamError> {
        self.client
            .get_response("/fixtures/events", &[("fixture", id.to_string())])
            .await
    }

    /// Last meetings between two teams, `h2h` being `"{id}-{id}"`
    pub async fn head_to_head(&self, h2h: &str) -> Result<Vec<Value>, UpstreamError> {
        self.client
            .get_response(
                "/fixtures/headtohead",
                &[("h2h", h2h.to_string()), ("last", H2H_LAST.to_string())],
            )
            .await
    }

    /// Teams matching a name, keeping only those with a country
    pub async fn search_teams(&self, name: &str) -> Result<Vec<Value>, UpstreamError> {
        self.cached("team-search", &json!({ "name": name }), Resource::Teams, || async {
            let teams = self
                .client
                .get_response("/teams", &[("search", name.to_string())])
                .await?;
            Ok::<_, UpstreamError>(
                teams
                    .into_iter()
                    .filter(|t| t["team"]["country"].as_str().is_some_and(|c| !c.is_empty()))
                    .collect::<Vec<Value>>(),
            )
        })
        .await
    }

    /// Team profile with venue
    pub async fn team_info(&self, id: i64) -> Result<Value, UpstreamError> {
        let id = correct_team_id(id);
        let key = cache_key("team-info", &json!({ "id": id }));
        if let Some(hit) = self.cache.get::<Value>(&key).await.ok().flatten() {
            return Ok(hit);
        }

        let body = self.client.get("/teams", &[("id", id.to_string())]).await?;
        let Some(entry) = response_array(&body).into_iter().next() else {
            return Ok(empty_team_profile("none"));
        };

        let profile = team_profile(&entry);
        let _ = self
            .cache
            .set(&key, &profile, self.ttl.for_resource(Resource::Teams))
            .await;
        Ok(profile)
    }

    /// A team's fixtures for the current season, or its most recent ones
    pub async fn team_fixtures(&self, id: i64) -> Result<Vec<Value>, UpstreamError> {
        let id = correct_team_id(id);
        let fixtures = self
            .client
            .get_response(
                "/fixtures",
                &[("team", id.to_string()), ("season", CURRENT_SEASON.to_string())],
            )
            .await?;
        if !fixtures.is_empty() {
            return Ok(fixtures);
        }

        tracing::info!(
            "No fixtures for team {} in season {}, using last {}",
            id,
            CURRENT_SEASON,
            TEAM_FIXTURES_FALLBACK_LAST
        );
        self.client
            .get_response(
                "/fixtures",
                &[("team", id.to_string()), ("last", TEAM_FIXTURES_FALLBACK_LAST.to_string())],
            )
            .await
    }

    /// Full tables of every league a team plays in
    ///
    /// The team's leagues come from the current season, or from whatever
    /// season upstream considers current when that is empty. Each table is
    /// then read through the league standings cache; leagues whose table
    /// cannot be fetched are skipped.
    pub async fn team_standings(&self, id: i64) -> Result<Vec<Value>, UpstreamError> {
        let id = correct_team_id(id);
        self.cached("team-standings", &json!({ "id": id }), Resource::Standings, || async {
            let mut entries = self
                .client
                .get_response(
                    "/standings",
                    &[("team", id.to_string()), ("season", CURRENT_SEASON.to_string())],
                )
                .await?;
            if entries.is_empty() {
                tracing::info!("No standings for team {} in season {}, trying current", id, CURRENT_SEASON);
                entries = self
                    .client
                    .get_response("/standings", &[("team", id.to_string())])
                    .await?;
            }

            let mut tables = Vec::new();
            for entry in &entries {
                let league = &entry["league"];
                let (Some(league_id), Some(season)) = (json_text(&league["id"]), json_text(&league["season"])) else {
                    continue;
                };
                match self.standings(&league_id, &season).await {
                    Ok(table) => tables.extend(table.into_iter().next()),
                    Err(e) => tracing::warn!("Standings for league {} season {} failed: {}", league_id, season, e),
                }
            }
            tracing::debug!("Team {} appears in {} league tables", id, tables.len());
            Ok::<_, UpstreamError>(tables)
        })
        .await
    }

    /// A team's squad as `{players, coach, season, source}`
    ///
    /// Without an explicit season the current one is tried first, and the
    /// previous season is used when it has more players than a nearly empty
    /// current squad.
    pub async fn team_players(&self, id: i64, season: Option<i32>) -> Result<Value, UpstreamError> {
        let id = correct_team_id(id);
        let explicit = season.is_some();
        let requested = season.unwrap_or(CURRENT_SEASON);
        self.cached(
            "team-players",
            &json!({ "id": id, "season": requested }),
            Resource::Teams,
            || async {
                let mut season = requested;
                let mut players = self.squad(id, season).await?;

                if players.len() < MIN_SQUAD_SIZE && !explicit {
                    match self.squad(id, PREVIOUS_SEASON).await {
                        Ok(previous) if previous.len() > players.len() => {
                            tracing::info!(
                                "Using season {} squad for team {} ({} players)",
                                PREVIOUS_SEASON,
                                id,
                                previous.len()
                            );
                            players = previous;
                            season = PREVIOUS_SEASON;
                        }
                        Ok(_) => {}
                        Err(e) => tracing::warn!("Season {} squad for team {} failed: {}", PREVIOUS_SEASON, id, e),
                    }
                }

                Ok::<_, UpstreamError>(json!({
                    "players": players,
                    "coach": Value::Null,
                    "season": season,
                    "source": "api-football",
                }))
            },
        )
        .await
    }

    async fn squad(&self, team: i64, season: i32) -> Result<Vec<Value>, UpstreamError> {
        self.client
            .get_response("/players", &[("team", team.to_string()), ("season", season.to_string())])
            .await
    }

    /// Players by upstream id or by name
    pub async fn search_players(&self, id: Option<&str>, name: Option<&str>) -> Result<Vec<Value>, UpstreamError> {
        let mut params = Vec::new();
        if let Some(id) = id {
            params.push(("id", id.to_string()));
        }
        if let Some(name) = name {
            params.push(("search", name.to_string()));
        }
        self.cached(
            "player-search",
            &json!({ "id": id, "name": name }),
            Resource::Teams,
            || self.client.get_response("/players", &params),
        )
        .await
    }

    /// Look up each team id and report what upstream knows about it
    ///
    /// Ids are checked as given, one at a time; a failed lookup is
    /// reported in its entry rather than failing the whole report.
    pub async fn verify_team_ids(&self, ids: &[&str]) -> Vec<Value> {
        let mut results = Vec::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(VERIFY_DELAY).await;
            }
            let entry = match self.client.get_response("/teams", &[("id", id.to_string())]).await {
                Ok(teams) => match teams.first() {
                    Some(team) => verified_team(id, team),
                    None => json!({ "id": id, "error": "Team not found" }),
                },
                Err(e) => json!({ "id": id, "error": e.to_string() }),
            };
            results.push(entry);
        }
        results
    }
}

/// A JSON string or number as text, for forwarding as a query parameter
fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

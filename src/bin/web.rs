//! Single binary web server: REST API for tournaments, teams, and schedules.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Instant;
use turf_scheduler::config::ServerConfig;
use turf_scheduler::{
    add_match, add_roster_player, advance_group, clear_schedule, delete_match, generate_schedule,
    randomize_teams, record_winner, regenerate_schedule, register_team, schedule_rows,
    set_team_status, update_settings, validate_settings, write_schedule_csv, InMemoryStore,
    LinkId, ManualFixture, MatchId, RegistrationError, RosterPlayer, ScheduleError, ScheduleStore,
    Side, StoreError, TeamId, TeamStatus, Tournament, TournamentId, TournamentSettings, UserId,
};

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// Tournaments plus the record store. Every mutating request holds the write guard for the
/// whole operation, so schedule writes for one tournament never interleave.
#[derive(Default)]
struct AppData {
    tournaments: HashMap<TournamentId, TournamentEntry>,
    store: InMemoryStore,
}

type AppState = Data<RwLock<AppData>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(flatten)]
    settings: TournamentSettings,
}

#[derive(Deserialize)]
struct PlayerBody {
    display_name: String,
    #[serde(default)]
    user_id: Option<UserId>,
}

impl From<PlayerBody> for RosterPlayer {
    fn from(body: PlayerBody) -> Self {
        RosterPlayer::new(body.display_name, body.user_id)
    }
}

#[derive(Deserialize)]
struct RegisterTeamBody {
    name: String,
    #[serde(default)]
    players: Vec<PlayerBody>,
}

#[derive(Deserialize)]
struct TeamStatusBody {
    status: TeamStatus,
}

#[derive(Deserialize, Default)]
struct GenerateBody {
    /// Delete an existing schedule first instead of refusing.
    #[serde(default)]
    replace: bool,
}

#[derive(Deserialize)]
struct WinnerBody {
    side: Side,
}

#[derive(Deserialize)]
struct AdvanceGroupBody {
    group_name: String,
    /// Finishers, best first.
    team_ids: Vec<TeamId>,
}

#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct TournamentTeamPath {
    id: TournamentId,
    team_id: TeamId,
}

#[derive(Deserialize)]
struct TournamentLinkPath {
    id: TournamentId,
    link_id: LinkId,
}

#[derive(Deserialize)]
struct MatchPath {
    match_id: MatchId,
}

fn error_json(message: impl ToString) -> serde_json::Value {
    serde_json::json!({ "error": message.to_string() })
}

fn store_error_response(e: &StoreError) -> HttpResponse {
    match e {
        StoreError::NotFound { .. } => HttpResponse::NotFound().json(error_json(e)),
        StoreError::Unavailable(_) => HttpResponse::InternalServerError().json(error_json(e)),
    }
}

fn schedule_error_response(e: ScheduleError) -> HttpResponse {
    match &e {
        ScheduleError::Store(inner) => store_error_response(inner),
        ScheduleError::PartialWriteFailure { .. } => {
            log::error!("{}", e);
            HttpResponse::InternalServerError().json(error_json(&e))
        }
        _ => HttpResponse::BadRequest().json(error_json(&e)),
    }
}

fn registration_error_response(e: RegistrationError) -> HttpResponse {
    match &e {
        RegistrationError::Store(inner) => store_error_response(inner),
        _ => HttpResponse::BadRequest().json(error_json(&e)),
    }
}

/// Look up a tournament, refresh its activity time, and run `f` with it and the store.
fn with_tournament<F>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament, &mut InMemoryStore) -> HttpResponse,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let AppData { tournaments, store } = &mut *g;
    let entry = match tournaments.get_mut(&id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(error_json("No tournament")),
    };
    entry.last_activity = Instant::now();
    f(&mut entry.tournament, store)
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "turf-scheduler",
    })
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    if body.name.trim().is_empty() {
        return HttpResponse::BadRequest().json(error_json("Tournament name must not be empty"));
    }
    if let Err(e) = validate_settings(&body.settings) {
        return registration_error_response(e);
    }
    let tournament = Tournament::new(body.name.trim(), body.settings);
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    log::info!("Created tournament {} ({})", tournament.name, tournament.id);
    let response = HttpResponse::Ok().json(&tournament);
    g.tournaments.insert(
        tournament.id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    response
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t, _| HttpResponse::Ok().json(t))
}

/// Change format, team count, roster limits (refused once a schedule exists).
#[put("/api/tournaments/{id}/settings")]
async fn api_update_settings(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<TournamentSettings>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t, store| {
        match update_settings(store, t, body.into_inner()) {
            Ok(()) => HttpResponse::Ok().json(t),
            Err(e) => registration_error_response(e),
        }
    })
}

#[get("/api/tournaments/{id}/teams")]
async fn api_list_teams(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t, store| match store.list_teams(t.id) {
        Ok(teams) => HttpResponse::Ok().json(teams),
        Err(e) => store_error_response(&e),
    })
}

#[post("/api/tournaments/{id}/teams")]
async fn api_register_team(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<RegisterTeamBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let roster: Vec<RosterPlayer> = body.players.into_iter().map(RosterPlayer::from).collect();
    with_tournament(&state, path.id, |t, store| {
        match register_team(store, t, &body.name, roster) {
            Ok(team) => HttpResponse::Ok().json(team),
            Err(e) => registration_error_response(e),
        }
    })
}

#[post("/api/tournaments/{id}/teams/{team_id}/players")]
async fn api_add_roster_player(
    state: AppState,
    path: Path<TournamentTeamPath>,
    body: Json<PlayerBody>,
) -> HttpResponse {
    let player = RosterPlayer::from(body.into_inner());
    with_tournament(&state, path.id, |t, store| {
        match add_roster_player(store, t, path.team_id, player) {
            Ok(team) => HttpResponse::Ok().json(team),
            Err(e) => registration_error_response(e),
        }
    })
}

/// Move a team through registration (approve, reject, ...).
#[put("/api/tournaments/{id}/teams/{team_id}/status")]
async fn api_set_team_status(
    state: AppState,
    path: Path<TournamentTeamPath>,
    body: Json<TeamStatusBody>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t, store| {
        match set_team_status(store, t, path.team_id, body.status) {
            Ok(team) => HttpResponse::Ok().json(team),
            Err(e) => registration_error_response(e),
        }
    })
}

#[get("/api/tournaments/{id}/schedule")]
async fn api_get_schedule(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t, store| match schedule_rows(store, t.id) {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => store_error_response(&e),
    })
}

/// Delete the whole schedule (links and their matches).
#[delete("/api/tournaments/{id}/schedule")]
async fn api_delete_schedule(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t, store| match clear_schedule(store, t.id) {
        Ok(removed) => HttpResponse::Ok().json(serde_json::json!({ "removed": removed })),
        Err(e) => schedule_error_response(e),
    })
}

/// Generate the schedule. With `{"replace": true}` an existing schedule is deleted first.
#[post("/api/tournaments/{id}/schedule/generate")]
async fn api_generate_schedule(
    state: AppState,
    path: Path<TournamentPath>,
    body: Option<Json<GenerateBody>>,
) -> HttpResponse {
    let replace = body.map(|b| b.replace).unwrap_or_default();
    with_tournament(&state, path.id, |t, store| {
        let result = if replace {
            regenerate_schedule(store, t)
        } else {
            generate_schedule(store, t)
        };
        match result {
            Ok(links) => HttpResponse::Ok().json(links),
            Err(e) => schedule_error_response(e),
        }
    })
}

/// Draw approved teams onto the bracket.
#[post("/api/tournaments/{id}/schedule/randomize")]
async fn api_randomize_teams(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t, store| match randomize_teams(store, t) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => schedule_error_response(e),
    })
}

#[get("/api/tournaments/{id}/schedule/export")]
async fn api_export_schedule(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t, store| {
        let rows = match schedule_rows(store, t.id) {
            Ok(rows) => rows,
            Err(e) => return store_error_response(&e),
        };
        let mut out = Vec::new();
        if let Err(e) = write_schedule_csv(&rows, &mut out) {
            log::error!("CSV export for tournament {} failed: {}", t.id, e);
            return HttpResponse::InternalServerError().json(error_json(&e));
        }
        HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(out)
    })
}

/// Add one fixture by hand.
#[post("/api/tournaments/{id}/schedule/matches")]
async fn api_add_match(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<ManualFixture>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t, store| {
        match add_match(store, t.id, body.into_inner()) {
            Ok(link) => HttpResponse::Ok().json(link),
            Err(e) => schedule_error_response(e),
        }
    })
}

#[delete("/api/tournaments/{id}/schedule/matches/{link_id}")]
async fn api_delete_match(state: AppState, path: Path<TournamentLinkPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t, store| {
        match delete_match(store, t.id, path.link_id) {
            Ok(link) => HttpResponse::Ok().json(link),
            Err(e) => schedule_error_response(e),
        }
    })
}

/// Record the winner of a fixture; knockout winners move on to the next round.
#[put("/api/tournaments/{id}/schedule/matches/{link_id}/winner")]
async fn api_record_winner(
    state: AppState,
    path: Path<TournamentLinkPath>,
    body: Json<WinnerBody>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t, store| {
        match record_winner(store, t.id, path.link_id, body.side) {
            Ok(advancement) => HttpResponse::Ok().json(advancement),
            Err(e) => schedule_error_response(e),
        }
    })
}

/// Bind a group's final standings onto the knockout fixtures.
#[post("/api/tournaments/{id}/schedule/groups/advance")]
async fn api_advance_group(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AdvanceGroupBody>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t, store| {
        match advance_group(store, t.id, &body.group_name, &body.team_ids) {
            Ok(bound) => HttpResponse::Ok().json(serde_json::json!({ "bound_links": bound })),
            Err(e) => schedule_error_response(e),
        }
    })
}

#[get("/api/matches/{match_id}")]
async fn api_get_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.store.get_match(path.match_id) {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(e) => store_error_response(&e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state: AppState = Data::new(RwLock::new(AppData::default()));

    // Background task: evict tournaments (and their schedules) idle for too long
    let state_cleanup = state.clone();
    let idle_timeout = config.idle_timeout;
    let cleanup_interval = config.cleanup_interval;
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let AppData { tournaments, store } = &mut *g;
            let stale: Vec<TournamentId> = tournaments
                .iter()
                .filter(|(_, entry)| entry.last_activity.elapsed() >= idle_timeout)
                .map(|(id, _)| *id)
                .collect();
            for id in &stale {
                tournaments.remove(id);
                store.purge_tournament(*id);
            }
            if !stale.is_empty() {
                log::info!("Cleaned up {} inactive tournament(s)", stale.len());
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_update_settings)
            .service(api_list_teams)
            .service(api_register_team)
            .service(api_add_roster_player)
            .service(api_set_team_status)
            .service(api_get_schedule)
            .service(api_delete_schedule)
            .service(api_generate_schedule)
            .service(api_randomize_teams)
            .service(api_export_schedule)
            .service(api_add_match)
            .service(api_delete_match)
            .service(api_record_winner)
            .service(api_advance_group)
            .service(api_get_match)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

//! Single binary web server: REST API over the ski tournament engine.
//! Run with: cargo run --bin web
//! Configured through env: HOST, PORT, RESULTS_PATH, INACTIVITY_HOURS (see `config`).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use ski_tournament::config::ServerConfig;
use ski_tournament::storage::{CsvResultSink, ResultSink, TestMetadata, TestSubmission};
use ski_tournament::{
    apply_swap, clear_duel_result, final_ranking, go_back, record_duel_result, shuffle_seeding,
    start_tournament, submit_round, Competitor, MatchId, SwapOperation, Tournament,
    TournamentError, TournamentId,
};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Per-tournament entry: working state + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

struct Shared {
    tournaments: RwLock<HashMap<TournamentId, TournamentEntry>>,
    sink: Arc<dyn ResultSink>,
}

type AppState = Data<Shared>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    competitors: Vec<Competitor>,
    #[serde(default)]
    shuffle: bool,
}

#[derive(Deserialize)]
struct DuelResultBody {
    winner_id: String,
    #[serde(default)]
    diff: Option<f64>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and duel id (e.g. /api/tournaments/{id}/duels/{match_id})
#[derive(Deserialize)]
struct DuelPath {
    id: TournamentId,
    match_id: MatchId,
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn error_response(e: &TournamentError) -> HttpResponse {
    match e {
        TournamentError::IncompleteRound { missing } => HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": e.to_string(), "missing": missing })),
        _ => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Run `f` against one tournament and answer with its new state.
fn update<F>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> Result<(), TournamentError>,
{
    let mut g = match state.tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match f(&mut entry.tournament) {
        Ok(()) => HttpResponse::Ok().json(&entry.tournament),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "ski-tournament",
    })
}

/// Create and start a tournament from the selected skis (returns it with id).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let CreateTournamentBody { mut competitors, shuffle } = body.into_inner();
    if shuffle {
        shuffle_seeding(&mut competitors, &mut rand::thread_rng());
    }
    let mut tournament = Tournament::new();
    if let Err(e) = start_tournament(&mut tournament, competitors) {
        return error_response(&e);
    }
    insert(&state, tournament)
}

/// Resume a tournament from a previously exported working state.
#[post("/api/tournaments/import")]
async fn api_import_tournament(state: AppState, body: Json<Tournament>) -> HttpResponse {
    let tournament = body.into_inner();
    if let Err(e) = tournament.validate() {
        log::warn!("Rejected import of tournament {}: {}", tournament.id, e);
        return error_response(&e);
    }
    log::info!("Resuming tournament {} at round {}", tournament.id, tournament.round_number);
    insert(&state, tournament)
}

fn insert(state: &AppState, tournament: Tournament) -> HttpResponse {
    let id = tournament.id;
    let mut g = match state.tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let fresh = TournamentEntry {
        tournament,
        last_activity: Instant::now(),
    };
    // An import replaces whatever was held under the same id.
    let entry = match g.entry(id) {
        Entry::Occupied(mut slot) => {
            slot.insert(fresh);
            slot.into_mut()
        }
        Entry::Vacant(slot) => slot.insert(fresh),
    };
    HttpResponse::Ok().json(&entry.tournament)
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update(&state, path.id, |_| Ok(()))
}

/// Record the winner (and margin) of one duel in the current round.
#[put("/api/tournaments/{id}/duels/{match_id}/result")]
async fn api_record_result(state: AppState, path: Path<DuelPath>, body: Json<DuelResultBody>) -> HttpResponse {
    update(&state, path.id, |t| {
        record_duel_result(t, path.match_id, &body.winner_id, body.diff)
    })
}

/// Clear the result of one duel.
#[delete("/api/tournaments/{id}/duels/{match_id}/result")]
async fn api_clear_result(state: AppState, path: Path<DuelPath>) -> HttpResponse {
    update(&state, path.id, |t| clear_duel_result(t, path.match_id))
}

/// Submit the current round (advances, or completes the tournament).
#[post("/api/tournaments/{id}/rounds/submit")]
async fn api_submit_round(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update(&state, path.id, |t| {
        let outcome = submit_round(t)?;
        log::info!("Tournament {}: {:?}", t.id, outcome);
        Ok(())
    })
}

/// Go back to the previous round.
#[post("/api/tournaments/{id}/rounds/back")]
async fn api_go_back(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update(&state, path.id, go_back)
}

/// Drag-and-drop reseeding of the current round.
#[post("/api/tournaments/{id}/swap")]
async fn api_swap(state: AppState, path: Path<TournamentPath>, body: Json<SwapOperation>) -> HttpResponse {
    let op = body.into_inner();
    update(&state, path.id, |t| apply_swap(t, op))
}

/// Final ranking of a completed tournament.
#[get("/api/tournaments/{id}/ranking")]
async fn api_ranking(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.tournaments.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get(&path.id) {
        Some(entry) => match final_ranking(&entry.tournament) {
            Ok(ranking) => HttpResponse::Ok().json(ranking),
            Err(e) => error_response(&e),
        },
        None => not_found(),
    }
}

/// Hand the final ranking to the result sink and discard the working state.
/// The write happens in the background; failures are logged, not retried.
#[post("/api/tournaments/{id}/results")]
async fn api_submit_results(state: AppState, path: Path<TournamentPath>, body: Json<TestMetadata>) -> HttpResponse {
    let mut g = match state.tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let rankings = match g.get(&path.id).map(|entry| final_ranking(&entry.tournament)) {
        Some(Ok(r)) => r,
        Some(Err(e)) => return error_response(&e),
        None => return not_found(),
    };
    g.remove(&path.id);
    drop(g);

    let submission = TestSubmission {
        tournament_id: path.id,
        rankings,
        metadata: body.into_inner(),
    };
    let sink = Arc::clone(&state.sink);
    let background = submission.clone();
    tokio::task::spawn_blocking(move || {
        if let Err(e) = sink.submit(&background) {
            log::error!("Failed to store results of tournament {}: {}", background.tournament_id, e);
        }
    });
    HttpResponse::Accepted().json(submission)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    log::info!("Results are appended to {}", config.results_path.display());

    let state = Data::new(Shared {
        tournaments: RwLock::new(HashMap::new()),
        sink: Arc::new(CsvResultSink::new(config.results_path.clone())),
    });

    // Background task: every 30 minutes, remove tournaments past the inactivity timeout
    let state_cleanup = state.clone();
    let timeout = config.inactivity_timeout;
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.tournaments.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < timeout);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_import_tournament)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_record_result)
            .service(api_clear_result)
            .service(api_submit_round)
            .service(api_go_back)
            .service(api_swap)
            .service(api_ranking)
            .service(api_submit_results)
    })
    .bind(bind)?
    .run()
    .await
}

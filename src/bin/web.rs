//! Single binary web server: the orchestrator around the scheduling library.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, DATA_DIR, STAGE_TTL_HOURS.

use actix_web::{
    get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use grumble_scheduler::{
    attach_tournament_codes, generate_round_robin_matches, parse_signups, record_game_result,
    resolve_code_metadata, resolve_document, resolve_from_store, ByeRule, CodeMetadataReport,
    Config, DocumentStore, Group, JsonDirStore, Match, MatchId, MatchStatus, Side, Standings,
    StandingsError, StoreError, TournamentCode, MATCHES_FIELD, WINS_NEEDED_FOR_MATCH,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Collection the resolved code metadata is saved to.
const CODE_METADATA_COLLECTION: &str = "code_metadata";

/// A generated group stage, kept in memory while codes are attached and games are played.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Stage {
    id: Uuid,
    created_at: DateTime<Utc>,
    groups: Vec<Group>,
    byes: ByeRule,
    wins_needed: u32,
    matches: Vec<Match>,
    standings: Standings,
}

/// Per-stage entry: stage data + last activity time (for auto-cleanup).
struct StageEntry {
    stage: Stage,
    last_activity: Instant,
}

/// In-memory state: stages by ID. Entries are removed after the configured inactivity period.
type AppState = Data<RwLock<HashMap<Uuid, StageEntry>>>;

type Store = Data<JsonDirStore>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct GenerateBody {
    groups: Vec<Group>,
    #[serde(default)]
    byes: ByeRule,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateStageBody {
    groups: Vec<Group>,
    #[serde(default)]
    byes: ByeRule,
    #[serde(default = "default_wins_needed")]
    wins_needed: u32,
}

fn default_wins_needed() -> u32 {
    WINS_NEEDED_FOR_MATCH
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameResultBody {
    code: String,
    winning_side: Side,
}

#[derive(Deserialize)]
struct AttachCodesBody {
    codes: Vec<TournamentCode>,
}

#[derive(Serialize)]
struct AttachCodesResponse<'a> {
    stage: &'a Stage,
    unmatched: Vec<TournamentCode>,
}

#[derive(Deserialize)]
struct SetStatusBody {
    status: MatchStatus,
}

#[derive(Deserialize)]
struct SaveQuery {
    save_as: Option<String>,
}

/// Path segment: stage id (e.g. /api/stages/{id})
#[derive(Deserialize)]
struct StagePath {
    id: Uuid,
}

/// Path segments: stage id and match id (e.g. /api/stages/{id}/matches/{match_id})
#[derive(Deserialize)]
struct StageMatchPath {
    id: Uuid,
    match_id: MatchId,
}

/// Path segments: stage id and target document (e.g. /api/stages/{id}/export/{collection}/{doc_id})
#[derive(Deserialize)]
struct StageExportPath {
    id: Uuid,
    collection: String,
    doc_id: String,
}

/// Path segments: collection and document id (e.g. /api/documents/{collection}/{id})
#[derive(Deserialize)]
struct DocumentPath {
    collection: String,
    id: String,
}

/// Log everything the resolver left out, the way an operator wants to see it.
fn log_report(source: &str, report: &CodeMetadataReport) {
    if let Some(e) = &report.input_error {
        log::error!("{}: {}", source, e);
        return;
    }
    for skipped in &report.skipped {
        log::warn!(
            "{}: skipping match entry {} (id {:?}): {}",
            source,
            skipped.index,
            skipped.match_id,
            skipped.reason
        );
    }
    for dup in &report.duplicates {
        log::warn!(
            "{}: tournament code {} from match entry {} replaced entry {}",
            source,
            dup.code,
            dup.match_index,
            dup.previous_match_index
        );
    }
    log::info!(
        "{}: processed {} tournament codes",
        source,
        report.metadata.len()
    );
}

/// Bad keys are the caller's fault; anything else is ours.
fn store_error_response(e: &StoreError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        StoreError::InvalidKey(_) => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "grumble-scheduler",
    })
}

/// Generate the match list for the given groups without keeping it.
#[post("/api/matches/generate")]
async fn api_generate_matches(body: Json<GenerateBody>) -> HttpResponse {
    let matches = generate_round_robin_matches(&body.groups, &body.byes);
    HttpResponse::Ok().json(matches)
}

/// Resolve code metadata from a posted document (`{ "matches": [...] }`).
#[post("/api/code-metadata")]
async fn api_resolve_code_metadata(body: Json<serde_json::Value>) -> HttpResponse {
    let report = resolve_document(Some(&*body));
    log_report("posted document", &report);
    HttpResponse::Ok().json(report)
}

/// Create a stage: generate its matches and keep them (returns it with id).
#[post("/api/stages")]
async fn api_create_stage(state: AppState, body: Json<CreateStageBody>) -> HttpResponse {
    let CreateStageBody {
        groups,
        byes,
        wins_needed,
    } = body.into_inner();
    let matches = generate_round_robin_matches(&groups, &byes);
    let standings = Standings::for_groups(&groups);
    let stage = Stage {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        groups,
        byes,
        wins_needed,
        matches,
        standings,
    };
    log::info!(
        "Created stage {} with {} matches",
        stage.id,
        stage.matches.len()
    );
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let response = HttpResponse::Ok().json(&stage);
    g.insert(
        stage.id,
        StageEntry {
            stage,
            last_activity: Instant::now(),
        },
    );
    response
}

/// Get a stage by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/stages/{id}")]
async fn api_get_stage(state: AppState, path: Path<StagePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.stage)
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No stage" })),
    }
}

/// Attach issued tournament codes to the stage's matches.
#[post("/api/stages/{id}/codes")]
async fn api_attach_codes(
    state: AppState,
    path: Path<StagePath>,
    body: Json<AttachCodesBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No stage" })),
    };
    entry.last_activity = Instant::now();
    let unmatched = attach_tournament_codes(&mut entry.stage.matches, &body.codes);
    for code in &unmatched {
        log::warn!(
            "Stage {}: no match {} for code {}",
            path.id,
            code.match_id,
            code.code
        );
    }
    HttpResponse::Ok().json(AttachCodesResponse {
        stage: &entry.stage,
        unmatched,
    })
}

/// Set the status of one match.
#[put("/api/stages/{id}/matches/{match_id}/status")]
async fn api_set_match_status(
    state: AppState,
    path: Path<StageMatchPath>,
    body: Json<SetStatusBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No stage" })),
    };
    entry.last_activity = Instant::now();
    let stage = &mut entry.stage;
    match stage.matches.iter_mut().find(|m| m.id == path.match_id) {
        Some(m) => m.status = body.status,
        None => {
            return HttpResponse::NotFound().json(serde_json::json!({ "error": "No match" }))
        }
    }
    HttpResponse::Ok().json(&*stage)
}

/// Record a played game: the side that won the game under `code`. Updates standings.
#[post("/api/stages/{id}/results")]
async fn api_record_result(
    state: AppState,
    path: Path<StagePath>,
    body: Json<GameResultBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No stage" })),
    };
    entry.last_activity = Instant::now();
    let stage = &mut entry.stage;
    let report = resolve_code_metadata(&stage.matches);
    let result = record_game_result(
        &mut stage.matches,
        &mut stage.standings,
        &report.metadata,
        &body.code,
        body.winning_side,
        stage.wins_needed,
    );
    match result {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => {
            log::warn!("Stage {}: rejected result for {}: {}", path.id, body.code, e);
            let error = serde_json::json!({ "error": e.to_string() });
            match e {
                StandingsError::UnknownCode(_) | StandingsError::MatchNotFound(_) => {
                    HttpResponse::NotFound().json(error)
                }
                StandingsError::GameAlreadyRecorded(_)
                | StandingsError::MatchAlreadyCompleted(_) => HttpResponse::Conflict().json(error),
                StandingsError::TeamNotFound(_) => HttpResponse::BadRequest().json(error),
            }
        }
    }
}

/// Current standings of a stage.
#[get("/api/stages/{id}/standings")]
async fn api_stage_standings(state: AppState, path: Path<StagePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.stage.standings)
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No stage" })),
    }
}

/// Resolve code metadata for the stage's matches.
#[get("/api/stages/{id}/code-metadata")]
async fn api_stage_code_metadata(state: AppState, path: Path<StagePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No stage" })),
    };
    entry.last_activity = Instant::now();
    let report = resolve_code_metadata(&entry.stage.matches);
    log_report(&format!("stage {}", path.id), &report);
    HttpResponse::Ok().json(report)
}

/// Save the stage's matches as a `{ "matches": [...] }` document.
#[put("/api/stages/{id}/export/{collection}/{doc_id}")]
async fn api_export_stage(
    state: AppState,
    store: Store,
    path: Path<StageExportPath>,
) -> HttpResponse {
    let document = {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => return HttpResponse::InternalServerError().body("lock error"),
        };
        let entry = match g.get_mut(&path.id) {
            Some(e) => e,
            None => {
                return HttpResponse::NotFound().json(serde_json::json!({ "error": "No stage" }))
            }
        };
        entry.last_activity = Instant::now();
        serde_json::json!({ MATCHES_FIELD: entry.stage.matches })
    };
    match store.save(&path.collection, &path.doc_id, &document) {
        Ok(()) => {
            log::info!("Exported stage {} to {}/{}", path.id, path.collection, path.doc_id);
            HttpResponse::Ok().json(document)
        }
        Err(e) => {
            log::error!("Exporting stage {}: {}", path.id, e);
            store_error_response(&e)
        }
    }
}

/// Fetch a stored document as JSON (404 if not found).
#[get("/api/documents/{collection}/{id}")]
async fn api_get_document(store: Store, path: Path<DocumentPath>) -> HttpResponse {
    match store.fetch(&path.collection, &path.id) {
        Ok(Some(document)) => HttpResponse::Ok().json(document),
        Ok(None) => {
            log::error!("Document '{}' not found in '{}'", path.id, path.collection);
            HttpResponse::NotFound().json(serde_json::json!({ "error": "No document" }))
        }
        Err(e) => {
            log::error!("Fetching {}/{}: {}", path.collection, path.id, e);
            store_error_response(&e)
        }
    }
}

/// Create or replace a stored document.
#[put("/api/documents/{collection}/{id}")]
async fn api_put_document(
    store: Store,
    path: Path<DocumentPath>,
    body: Json<serde_json::Value>,
) -> HttpResponse {
    match store.save(&path.collection, &path.id, &body) {
        Ok(()) => HttpResponse::Ok().json(body.into_inner()),
        Err(e) => {
            log::error!("Saving {}/{}: {}", path.collection, path.id, e);
            store_error_response(&e)
        }
    }
}

/// Resolve code metadata for a stored match document; `?save_as=` also stores the mapping.
#[get("/api/documents/{collection}/{id}/code-metadata")]
async fn api_document_code_metadata(
    store: Store,
    path: Path<DocumentPath>,
    query: Query<SaveQuery>,
) -> HttpResponse {
    log::info!("Fetching documents from '{}'...", path.collection);
    let report = match resolve_from_store(store.get_ref(), &path.collection, &path.id) {
        Ok(report) => report,
        Err(e) => {
            log::error!("Fetching {}/{}: {}", path.collection, path.id, e);
            return store_error_response(&e);
        }
    };
    log_report(&format!("{}/{}", path.collection, path.id), &report);

    if let Some(save_as) = &query.save_as {
        if report.metadata.is_empty() {
            log::warn!("Not saving empty code metadata as {}", save_as);
        } else {
            let saved = serde_json::to_value(&report.metadata)
                .map_err(StoreError::Json)
                .and_then(|doc| store.save(CODE_METADATA_COLLECTION, save_as, &doc));
            if let Err(e) = saved {
                log::error!("Saving code metadata as {}: {}", save_as, e);
                return store_error_response(&e);
            }
            log::info!("Code metadata saved to {}/{}", CODE_METADATA_COLLECTION, save_as);
        }
    }
    HttpResponse::Ok().json(report)
}

/// Import a sign-up CSV export (body is the CSV text).
#[post("/api/signups")]
async fn api_import_signups(body: String) -> HttpResponse {
    match parse_signups(body.as_bytes()) {
        Ok(signups) => HttpResponse::Ok().json(signups),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    let state = Data::new(RwLock::new(HashMap::<Uuid, StageEntry>::new()));
    let store = Data::new(JsonDirStore::new(config.data_dir.clone()));
    log::info!("Document store at {}", store.root().display());

    // Background task: every 30 minutes, remove stages inactive for the configured period
    let state_cleanup = state.clone();
    let stage_ttl = config.stage_ttl;
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < stage_ttl);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive stage(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(store.clone())
            .service(api_health)
            .service(api_generate_matches)
            .service(api_resolve_code_metadata)
            .service(api_create_stage)
            .service(api_get_stage)
            .service(api_attach_codes)
            .service(api_set_match_status)
            .service(api_stage_code_metadata)
            .service(api_record_result)
            .service(api_stage_standings)
            .service(api_export_stage)
            .service(api_get_document)
            .service(api_put_document)
            .service(api_document_code_metadata)
            .service(api_import_signups)
    })
    .bind(bind)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    fn stage_state() -> AppState {
        Data::new(RwLock::new(HashMap::new()))
    }

    macro_rules! stage_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state.clone())
                    .service(api_create_stage)
                    .service(api_attach_codes)
                    .service(api_set_match_status)
                    .service(api_record_result)
                    .service(api_stage_standings),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn unknown_match_in_known_stage_is_not_found() {
        let state = stage_state();
        let app = stage_app!(state);
        let req = test::TestRequest::post()
            .uri("/api/stages")
            .set_json(json!({ "groups": [{ "name": "A", "teamIds": [1, 2] }] }))
            .to_request();
        let stage: Value = test::call_and_read_body_json(&app, req).await;
        let id = stage["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/api/stages/{}/matches/99/status", id))
            .set_json(json!({ "status": "completed" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::put()
            .uri(&format!("/api/stages/{}/matches/1/status", id))
            .set_json(json!({ "status": "completed" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn results_route_completes_match_after_two_game_wins() {
        let state = stage_state();
        let app = stage_app!(state);
        let req = test::TestRequest::post()
            .uri("/api/stages")
            .set_json(json!({ "groups": [{ "name": "A", "teamIds": [1, 2] }] }))
            .to_request();
        let stage: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stage["winsNeeded"], 2);
        let id = stage["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/api/stages/{}/codes", id))
            .set_json(json!({ "codes": [
                { "matchId": 1, "code": "NA1" },
                { "matchId": 1, "code": "NA2" },
                { "matchId": 1, "code": "NA3" },
            ] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let result = |code: &str, side: &str| {
            test::TestRequest::post()
                .uri(&format!("/api/stages/{}/results", id))
                .set_json(json!({ "code": code, "winningSide": side }))
                .to_request()
        };

        // Game 1: team 1 is Blue.
        let outcome: Value = test::call_and_read_body_json(&app, result("NA1", "Blue")).await;
        assert_eq!(outcome["winnerId"], 1);
        assert_eq!(outcome["matchStatus"], "upcoming");

        // Game 2: team 1 is Red.
        let outcome: Value = test::call_and_read_body_json(&app, result("NA2", "Red")).await;
        assert_eq!(outcome["winnerId"], 1);
        assert_eq!(outcome["matchStatus"], "completed");
        assert_eq!(outcome["matchWinnerId"], 1);
        assert_eq!(outcome["winner"]["record"], "1-0");
        assert_eq!(outcome["loser"]["gameRecord"], "0-2");

        let resp = test::call_service(&app, result("NA2", "Blue")).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let resp = test::call_service(&app, result("NA3", "Blue")).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let resp = test::call_service(&app, result("NOPE", "Blue")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri(&format!("/api/stages/{}/standings", id))
            .to_request();
        let standings: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(standings["teams"][0]["record"], "1-0");
        assert_eq!(standings["teams"][1]["record"], "0-1");
    }
}

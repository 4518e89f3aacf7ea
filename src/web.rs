use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;

use actix_files::Files;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use serde::Serialize;

use crate::code::RandomCodeGenerator;
use crate::config::Config;
use crate::errors::AppError;
use crate::form::{CreateMeetingRequest, VoteRequest};
use crate::schedule::{BestSlot, Meeting};
use crate::service::{MeetingService, ServiceSettings};
use crate::store::{JsonDirStore, MeetingStore, MemoryStore};

// Handlers run the service on actix's blocking pool: stores may hit the disk
// and writers wait on per-code locks.

/// Largest accepted JSON body
const JSON_LIMIT: usize = 256 * 1024;

pub struct AppState {
    pub service: MeetingService,
    pub expose_index: bool,
}

/// A meeting with its current best slots folded in, as returned after a vote
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MeetingWithBestSlots<'a> {
    #[serde(flatten)]
    meeting: &'a Meeting,
    best_slots: &'a [BestSlot],
}

#[derive(Serialize)]
struct VoteResponse<'a> {
    success: bool,
    meeting: MeetingWithBestSlots<'a>,
}

// Create a new meeting
async fn create_meeting(
    body: web::Json<CreateMeetingRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let created = web::block(move || state.service.create_meeting(req)).await??;
    Ok(HttpResponse::Ok().json(created))
}

// Get meeting by code
async fn get_meeting(
    code: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let meeting = web::block(move || state.service.get_meeting(&code)).await??;
    Ok(HttpResponse::Ok().json(meeting))
}

// Submit participant availability
async fn submit_vote(
    code: web::Path<String>,
    body: web::Json<VoteRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let outcome = web::block(move || state.service.submit_vote(&code, req)).await??;
    Ok(HttpResponse::Ok().json(VoteResponse {
        success: true,
        meeting: MeetingWithBestSlots {
            meeting: &outcome.meeting,
            best_slots: &outcome.best_slots,
        },
    }))
}

// Get meeting results
async fn get_results(
    code: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let results = web::block(move || state.service.get_results(&code)).await??;
    Ok(HttpResponse::Ok().json(results))
}

// Results as a CSV download
async fn export_results(
    code: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let filename = format!("{}-results.csv", crate::code::normalize_code(&code));
    let csv = web::block(move || state.service.export_results(&code)).await??;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(csv))
}

// All meetings keyed by code, only when explicitly enabled
async fn list_meetings(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    if !state.expose_index {
        return Err(AppError::NotFound);
    }
    let meetings: BTreeMap<String, Meeting> = web::block(move || state.service.list_meetings())
        .await??
        .into_iter()
        .map(|m| (m.code.clone(), m))
        .collect();
    Ok(HttpResponse::Ok().json(meetings))
}

/// Malformed JSON bodies get the same `{"error": ...}` shape as other failures
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| AppError::validation("body", format!("Invalid request body: {err}")).into())
}

/// Registers the `/api` routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/api/meetings")
            .route("", web::post().to(create_meeting))
            .route("", web::get().to(list_meetings))
            .route("/{code}", web::get().to(get_meeting))
            .route("/{code}/vote", web::post().to(submit_vote))
            .route("/{code}/results", web::get().to(get_results))
            .route("/{code}/results.csv", web::get().to(export_results)),
    );
}

/// Picks the store the configuration asks for
pub fn build_store(config: &Config) -> io::Result<Arc<dyn MeetingStore>> {
    match &config.data_dir {
        Some(dir) => {
            let store = JsonDirStore::open(dir).map_err(io::Error::other)?;
            log::info!("Persisting meetings under {}", store.dir().display());
            Ok(Arc::new(store))
        }
        None => {
            log::info!("Keeping meetings in memory; they are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

pub fn build_state(config: &Config) -> io::Result<AppState> {
    let store = build_store(config)?;
    let service = MeetingService::new(
        store,
        Box::new(RandomCodeGenerator::new(config.code_length)),
        ServiceSettings::from(config),
    );
    Ok(AppState {
        service,
        expose_index: config.expose_index,
    })
}

pub async fn start_server(config: Config) -> io::Result<()> {
    let app_state = web::Data::new(build_state(&config)?);
    let static_dir = config.static_dir.clone();

    log::info!(
        "MeetSync listening on http://{}:{} (slot timezone {})",
        config.host,
        config.port,
        config.timezone.name()
    );

    HttpServer::new(move || {
        let app = App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure);
        match &static_dir {
            Some(dir) => app.service(Files::new("/", dir).index_file("index.html")),
            None => app,
        }
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

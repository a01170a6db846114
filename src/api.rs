//! Web API Module
//!
//! Exposes RESTful endpoints for the ATS dashboard frontend.
//! All endpoints return JSON and require no authentication (prototype mode).

use crate::pipeline::{
    import::import_candidates,
    machine::{self, PipelineError},
    notify::{NotificationKind, Notifier},
    roster,
    timeline::{self, TimelineStore},
    types::{
        Candidate, CandidateStatus, FeedbackDecision, FeedbackRecord, InterviewType, Panelist,
        PanelistStatus, Round, UserRole, Vacancy,
    },
};
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ============================================================
// APPLICATION STATE
// ============================================================

/// Shared application state
pub struct AppState {
    pub candidates: Mutex<HashMap<String, Candidate>>,
    pub panelists: Mutex<HashMap<String, Panelist>>,
    pub vacancies: Mutex<HashMap<String, Vacancy>>,
    pub timeline: TimelineStore,
    pub notifier: Notifier,
}

impl AppState {
    pub fn new() -> Result<Self, rusqlite::Error> {
        let mut panelists = HashMap::new();
        for panelist in default_panel_roster() {
            panelists.insert(panelist.id.clone(), panelist);
        }
        Ok(Self {
            candidates: Mutex::new(HashMap::new()),
            panelists: Mutex::new(panelists),
            vacancies: Mutex::new(HashMap::new()),
            timeline: TimelineStore::in_memory()?,
            notifier: Notifier::default(),
        })
    }
}

/// Default panel roster for demo
fn default_panel_roster() -> Vec<Panelist> {
    vec![
        Panelist::new("Asha Rao", "asha.rao@example.com", UserRole::PanelMember)
            .with_skills(vec!["React".to_string(), "Node".to_string()]),
        Panelist::new("Dev Iyer", "dev.iyer@example.com", UserRole::PanelMember)
            .with_skills(vec!["Python".to_string(), "Django".to_string()]),
        Panelist::new("Sana Kulkarni", "sana.k@example.com", UserRole::PanelMember)
            .with_skills(vec!["Java".to_string(), "Spring".to_string()]),
        Panelist::new("Karan Mehta", "karan.mehta@example.com", UserRole::TpmTem)
            .with_skills(vec!["System Design".to_string()]),
        Panelist::new("Lena Dsouza", "lena.dsouza@example.com", UserRole::Manager),
    ]
}

// ============================================================
// API REQUEST/RESPONSE TYPES
// ============================================================

#[derive(Deserialize)]
pub struct CreateCandidateRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub skills: Option<Vec<String>>,
    pub years_experience: Option<u32>,
    pub source: Option<String>,
    pub vacancy_id: Option<String>,
    pub interview_type: Option<String>,
}

#[derive(Deserialize)]
pub struct BulkImportRequest {
    /// Raw CSV text (the client reads the file; upload transport is out of scope)
    pub csv: String,
}

#[derive(Serialize)]
pub struct BulkImportResponse {
    pub imported: usize,
    pub candidates: Vec<Candidate>,
    pub errors: Vec<String>,
    /// First 5 errors verbatim, then a remainder count
    pub error_summary: Option<String>,
}

#[derive(Deserialize)]
pub struct ScheduleRequest {
    pub round: String,
    pub panelist_id: String,
}

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub round: String,
    pub decision: String,
    pub ratings: Option<HashMap<String, u8>>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct PanelistStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct CreatePanelistRequest {
    pub name: String,
    pub email: String,
    pub role: String,
    pub skills: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct CreateVacancyRequest {
    pub title: String,
    pub department: String,
    pub location: Option<String>,
    pub interview_type: Option<String>,
}

#[derive(Deserialize)]
pub struct EligibleQuery {
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct CandidateListQuery {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct PipelineSummary {
    pub total_candidates: usize,
    pub by_status: HashMap<String, usize>,
    pub hired: usize,
    pub rejected: usize,
    pub in_pipeline: usize,
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: &str) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.to_string()),
        }
    }
}

/// What the state machine refuses is a conflict with current state,
/// not a malformed request.
fn conflict(err: &PipelineError) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::<()>::error(&err.to_string()))
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::<()>::error(message))
}

fn not_found(message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::<()>::error(message))
}

// ============================================================
// CANDIDATE HANDLERS
// ============================================================

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "ATS Pipeline API",
        "version": "0.1.0"
    }))
}

/// Create a candidate (manual intake form)
async fn create_candidate(
    data: web::Data<Arc<AppState>>,
    req: web::Json<CreateCandidateRequest>,
) -> impl Responder {
    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return bad_request("Name and email are required");
    }
    let interview_type = match &req.interview_type {
        Some(s) => match InterviewType::parse(s) {
            Some(t) => t,
            None => return bad_request(&format!("Unknown interview type: {}", s)),
        },
        None => InterviewType::default(),
    };

    let mut candidate = Candidate::new(req.name.trim(), req.email.trim());
    candidate.phone = req.phone.clone().unwrap_or_default();
    candidate.skills = req.skills.clone().unwrap_or_default();
    candidate.years_experience = req.years_experience;
    candidate.source = req.source.clone().unwrap_or_else(|| "manual".to_string());
    candidate.vacancy_id = req.vacancy_id.clone();
    candidate.interview_type = interview_type;

    let _ = timeline::record_candidate_created(&data.timeline, &candidate.id, &candidate.name);

    let mut candidates = data.candidates.lock().unwrap();
    candidates.insert(candidate.id.clone(), candidate.clone());

    HttpResponse::Ok().json(ApiResponse::success(candidate))
}

/// List candidates, optionally filtered by status
async fn list_candidates(
    data: web::Data<Arc<AppState>>,
    query: web::Query<CandidateListQuery>,
) -> impl Responder {
    let filter = match &query.status {
        Some(s) => match CandidateStatus::parse(s) {
            Some(status) => Some(status),
            None => return bad_request(&format!("Unknown status: {}", s)),
        },
        None => None,
    };

    let candidates = data.candidates.lock().unwrap();
    let mut list: Vec<Candidate> = candidates
        .values()
        .filter(|c| filter.map_or(true, |f| c.status == f))
        .cloned()
        .collect();
    list.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    HttpResponse::Ok().json(ApiResponse::success(list))
}

/// Get a single candidate
async fn get_candidate(data: web::Data<Arc<AppState>>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let candidates = data.candidates.lock().unwrap();
    match candidates.get(&id) {
        Some(candidate) => HttpResponse::Ok().json(ApiResponse::success(candidate.clone())),
        None => not_found("Candidate not found"),
    }
}

/// Bulk candidate import from CSV text
async fn bulk_import(
    data: web::Data<Arc<AppState>>,
    req: web::Json<BulkImportRequest>,
) -> impl Responder {
    let report = import_candidates(&req.csv);
    let error_summary = report.error_summary();

    {
        let mut candidates = data.candidates.lock().unwrap();
        for candidate in &report.accepted {
            let _ =
                timeline::record_bulk_imported(&data.timeline, &candidate.id, &candidate.source);
            candidates.insert(candidate.id.clone(), candidate.clone());
        }
    }

    log::info!(
        "bulk import: {} accepted, {} rejected",
        report.accepted.len(),
        report.errors.len()
    );

    HttpResponse::Ok().json(ApiResponse::success(BulkImportResponse {
        imported: report.accepted.len(),
        candidates: report.accepted,
        errors: report.errors,
        error_summary,
    }))
}

// ============================================================
// INTERVIEW LIFECYCLE HANDLERS
// ============================================================

/// Schedule a round: assign an eligible, free panelist
async fn schedule_interview(
    data: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    req: web::Json<ScheduleRequest>,
) -> impl Responder {
    let candidate_id = path.into_inner();
    let round = match Round::parse(&req.round) {
        Some(r) => r,
        None => return bad_request(&format!("Unknown round: {}", req.round)),
    };

    let mut candidates = data.candidates.lock().unwrap();
    let mut panelists = data.panelists.lock().unwrap();

    let candidate = match candidates.get_mut(&candidate_id) {
        Some(c) => c,
        None => return not_found("Candidate not found"),
    };
    let (panelist_name, panelist_role, panelist_status) = match panelists.get(&req.panelist_id) {
        Some(p) => (p.name.clone(), p.role, p.current_status),
        None => return not_found("Panelist not found"),
    };

    if let Err(e) =
        machine::check_assignable(&req.panelist_id, panelist_role, panelist_status, round)
    {
        return conflict(&e);
    }
    let next_status = match machine::schedule_target(candidate.status, round) {
        Ok(s) => s,
        Err(e) => return conflict(&e),
    };

    // Re-assignment within the same round releases the previous panelist
    if let Some(prev_id) = candidate.assigned_panelist_id.take() {
        if let Some(prev) = panelists.get_mut(&prev_id) {
            prev.current_status = PanelistStatus::Free;
            prev.assigned_candidate_id = None;
        }
    }
    if let Some(panelist) = panelists.get_mut(&req.panelist_id) {
        panelist.current_status = PanelistStatus::InterviewAssigned;
        panelist.assigned_candidate_id = Some(candidate.id.clone());
    }

    candidate.status = next_status;
    candidate.current_round = round;
    candidate.assigned_panelist_id = Some(req.panelist_id.clone());
    candidate.assigned_panelist = Some(panelist_name.clone());

    let _ = timeline::record_round_scheduled(
        &data.timeline,
        &candidate.id,
        round.as_str(),
        &panelist_name,
    );
    data.notifier.send(
        NotificationKind::CandidateAssigned,
        &candidate.id,
        &candidate.name,
        &format!("{} with {}", round, panelist_name),
    );

    HttpResponse::Ok().json(ApiResponse::success(candidate.clone()))
}

/// Start the scheduled interview
async fn start_interview(data: web::Data<Arc<AppState>>, path: web::Path<String>) -> impl Responder {
    let candidate_id = path.into_inner();

    let mut candidates = data.candidates.lock().unwrap();
    let mut panelists = data.panelists.lock().unwrap();

    let candidate = match candidates.get_mut(&candidate_id) {
        Some(c) => c,
        None => return not_found("Candidate not found"),
    };
    let next_status = match machine::start_target(candidate.status) {
        Ok(s) => s,
        Err(e) => return conflict(&e),
    };

    candidate.status = next_status;
    if let Some(panelist_id) = &candidate.assigned_panelist_id {
        if let Some(panelist) = panelists.get_mut(panelist_id) {
            panelist.current_status = PanelistStatus::InInterview;
        }
    }

    let _ = timeline::record_interview_started(
        &data.timeline,
        &candidate.id,
        candidate.current_round.as_str(),
    );

    HttpResponse::Ok().json(ApiResponse::success(candidate.clone()))
}

/// Submit feedback for the current round; the state machine decides what
/// happens next
async fn submit_feedback(
    data: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    req: web::Json<FeedbackRequest>,
) -> impl Responder {
    let candidate_id = path.into_inner();
    let round = match Round::parse(&req.round) {
        Some(r) => r,
        None => return bad_request(&format!("Unknown round: {}", req.round)),
    };
    let decision = match FeedbackDecision::parse(&req.decision) {
        Some(d) => d,
        None => return bad_request(&format!("Unknown decision: {}", req.decision)),
    };

    let mut candidates = data.candidates.lock().unwrap();
    let mut panelists = data.panelists.lock().unwrap();

    let candidate = match candidates.get_mut(&candidate_id) {
        Some(c) => c,
        None => return not_found("Candidate not found"),
    };

    let transition = match machine::advance_on_feedback(candidate.status, round, decision) {
        Ok(t) => t,
        Err(e) => return conflict(&e),
    };

    let mut record = FeedbackRecord::new(
        round,
        candidate.assigned_panelist_id.as_deref().unwrap_or(""),
        candidate.assigned_panelist.as_deref().unwrap_or(""),
        decision,
    );
    if let Some(ratings) = &req.ratings {
        record.ratings = ratings.clone();
    }
    if let Some(notes) = &req.notes {
        record.notes = notes.clone();
    }
    candidate.feedback.push(record);

    // The panelist is released regardless of decision
    if transition.clears_assignment {
        if let Some(panelist_id) = candidate.assigned_panelist_id.take() {
            if let Some(panelist) = panelists.get_mut(&panelist_id) {
                panelist.current_status = transition.panelist_after;
                panelist.assigned_candidate_id = None;
            }
        }
        candidate.assigned_panelist = None;
    }

    candidate.status = transition.next_status;
    if let Some(next_round) = transition.next_round {
        candidate.current_round = next_round;
    }

    let _ = timeline::record_feedback_submitted(
        &data.timeline,
        &candidate.id,
        round.as_str(),
        decision.as_str(),
    );
    if transition.next_status.is_terminal() {
        let _ = timeline::record_terminal(
            &data.timeline,
            &candidate.id,
            transition.next_status == CandidateStatus::Hired,
        );
    }
    data.notifier.send(
        NotificationKind::FeedbackSubmitted,
        &candidate.id,
        &candidate.name,
        &format!("{}: {}", round, decision),
    );

    HttpResponse::Ok().json(ApiResponse::success(candidate.clone()))
}

// ============================================================
// PANELIST HANDLERS
// ============================================================

/// List the full panel roster
async fn list_panelists(data: web::Data<Arc<AppState>>) -> impl Responder {
    let panelists = data.panelists.lock().unwrap();
    let mut list: Vec<Panelist> = panelists.values().cloned().collect();
    list.sort_by(|a, b| a.name.cmp(&b.name));
    HttpResponse::Ok().json(ApiResponse::success(list))
}

/// Panelists eligible for a round, optionally narrowed by a search query
async fn eligible_panelists(
    data: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    query: web::Query<EligibleQuery>,
) -> impl Responder {
    let round = match Round::parse(&path.into_inner()) {
        Some(r) => r,
        None => return bad_request("Unknown round"),
    };

    let panelists = data.panelists.lock().unwrap();
    let roster: Vec<Panelist> = panelists.values().cloned().collect();
    let mut eligible: Vec<Panelist> = roster::eligible_panelists(&roster, round, query.q.as_deref())
        .into_iter()
        .cloned()
        .collect();
    eligible.sort_by(|a, b| a.name.cmp(&b.name));

    HttpResponse::Ok().json(ApiResponse::success(eligible))
}

/// Register a panelist
async fn create_panelist(
    data: web::Data<Arc<AppState>>,
    req: web::Json<CreatePanelistRequest>,
) -> impl Responder {
    let role = match UserRole::parse(&req.role) {
        Some(r) => r,
        None => return bad_request(&format!("Unknown role: {}", req.role)),
    };
    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return bad_request("Name and email are required");
    }

    let panelist = Panelist::new(req.name.trim(), req.email.trim(), role)
        .with_skills(req.skills.clone().unwrap_or_default());

    let mut panelists = data.panelists.lock().unwrap();
    panelists.insert(panelist.id.clone(), panelist.clone());

    HttpResponse::Ok().json(ApiResponse::success(panelist))
}

/// Manually set a panelist's availability (free/break/unavailable).
/// Interview-coupled statuses are machine-driven and cannot be set here.
async fn update_panelist_status(
    data: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    req: web::Json<PanelistStatusRequest>,
) -> impl Responder {
    let panelist_id = path.into_inner();
    let status = match PanelistStatus::parse(&req.status) {
        Some(s) => s,
        None => return bad_request(&format!("Unknown status: {}", req.status)),
    };
    if matches!(
        status,
        PanelistStatus::InInterview | PanelistStatus::InterviewAssigned
    ) {
        return bad_request("Interview statuses are set by scheduling, not manually");
    }

    let mut panelists = data.panelists.lock().unwrap();
    let panelist = match panelists.get_mut(&panelist_id) {
        Some(p) => p,
        None => return not_found("Panelist not found"),
    };
    if panelist.assigned_candidate_id.is_some() {
        return conflict(&PipelineError::PanelistUnavailable {
            id: panelist.id.clone(),
            status: panelist.current_status,
        });
    }

    let previous = panelist.current_status;
    panelist.current_status = status;
    let _ = timeline::record_panelist_status_changed(
        &data.timeline,
        &panelist.id,
        previous.as_str(),
        status.as_str(),
    );

    HttpResponse::Ok().json(ApiResponse::success(panelist.clone()))
}

// ============================================================
// VACANCY / DASHBOARD HANDLERS
// ============================================================

/// Create a vacancy
async fn create_vacancy(
    data: web::Data<Arc<AppState>>,
    req: web::Json<CreateVacancyRequest>,
) -> impl Responder {
    if req.title.trim().is_empty() {
        return bad_request("Title is required");
    }
    let interview_type = match &req.interview_type {
        Some(s) => match InterviewType::parse(s) {
            Some(t) => t,
            None => return bad_request(&format!("Unknown interview type: {}", s)),
        },
        None => InterviewType::default(),
    };

    let mut vacancy = Vacancy::new(req.title.trim(), req.department.trim());
    vacancy.location = req.location.clone().unwrap_or_default();
    vacancy.interview_type = interview_type;

    let mut vacancies = data.vacancies.lock().unwrap();
    vacancies.insert(vacancy.id.clone(), vacancy.clone());

    HttpResponse::Ok().json(ApiResponse::success(vacancy))
}

/// List vacancies
async fn list_vacancies(data: web::Data<Arc<AppState>>) -> impl Responder {
    let vacancies = data.vacancies.lock().unwrap();
    let mut list: Vec<Vacancy> = vacancies.values().cloned().collect();
    list.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    HttpResponse::Ok().json(ApiResponse::success(list))
}

/// Get a candidate's pipeline timeline
async fn get_timeline(data: web::Data<Arc<AppState>>, path: web::Path<String>) -> impl Responder {
    let candidate_id = path.into_inner();
    {
        let candidates = data.candidates.lock().unwrap();
        if !candidates.contains_key(&candidate_id) {
            return not_found("Candidate not found");
        }
    }
    match data.timeline.get_timeline(&candidate_id) {
        Ok(timeline) => HttpResponse::Ok().json(ApiResponse::success(timeline)),
        Err(e) => HttpResponse::InternalServerError()
            .json(ApiResponse::<()>::error(&format!("Database error: {}", e))),
    }
}

/// Status-count summary for the dashboard
async fn pipeline_summary(data: web::Data<Arc<AppState>>) -> impl Responder {
    let candidates = data.candidates.lock().unwrap();
    let mut by_status: HashMap<String, usize> = HashMap::new();
    let mut hired = 0;
    let mut rejected = 0;
    for candidate in candidates.values() {
        *by_status
            .entry(candidate.status.as_str().to_string())
            .or_insert(0) += 1;
        match candidate.status {
            CandidateStatus::Hired | CandidateStatus::Selected => hired += 1,
            CandidateStatus::Rejected => rejected += 1,
            _ => {}
        }
    }
    let total = candidates.len();
    let summary = PipelineSummary {
        total_candidates: total,
        by_status,
        hired,
        rejected,
        in_pipeline: total - hired - rejected,
    };
    HttpResponse::Ok().json(ApiResponse::success(summary))
}

/// Recent outbound notifications
async fn recent_notifications(data: web::Data<Arc<AppState>>) -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success(data.notifier.recent()))
}

// ============================================================
// SERVER CONFIGURATION
// ============================================================

/// Register all routes on an actix App (shared between server and tests)
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/api/candidates", web::post().to(create_candidate))
        .route("/api/candidates", web::get().to(list_candidates))
        .route("/api/candidates/bulk", web::post().to(bulk_import))
        .route("/api/candidates/{id}", web::get().to(get_candidate))
        .route(
            "/api/candidates/{id}/schedule",
            web::post().to(schedule_interview),
        )
        .route("/api/candidates/{id}/start", web::post().to(start_interview))
        .route(
            "/api/candidates/{id}/feedback",
            web::post().to(submit_feedback),
        )
        .route("/api/candidates/{id}/timeline", web::get().to(get_timeline))
        .route("/api/panelists", web::get().to(list_panelists))
        .route("/api/panelists", web::post().to(create_panelist))
        .route(
            "/api/panelists/eligible/{round}",
            web::get().to(eligible_panelists),
        )
        .route(
            "/api/panelists/{id}/status",
            web::post().to(update_panelist_status),
        )
        .route("/api/vacancies", web::post().to(create_vacancy))
        .route("/api/vacancies", web::get().to(list_vacancies))
        .route("/api/analytics/summary", web::get().to(pipeline_summary))
        .route("/api/notifications", web::get().to(recent_notifications));
}

/// Configure and run the API server
pub async fn run_server(host: &str, port: u16) -> std::io::Result<()> {
    let state = Arc::new(
        AppState::new().map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?,
    );

    log::info!("ATS Pipeline API starting at http://{}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes)
    })
    .bind((host, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new().unwrap())
    }

    fn free_panel_member_id(state: &AppState) -> String {
        let panelists = state.panelists.lock().unwrap();
        panelists
            .values()
            .find(|p| p.role == UserRole::PanelMember)
            .unwrap()
            .id
            .clone()
    }

    macro_rules! create_candidate {
        ($app:expr, $name:expr, $email:expr) => {{
            let req = test::TestRequest::post()
                .uri("/api/candidates")
                .set_json(serde_json::json!({"name": $name, "email": $email}))
                .to_request();
            let body: serde_json::Value = test::call_and_read_body_json(&$app, req).await;
            assert_eq!(body["success"], true);
            body["data"]["id"].as_str().unwrap().to_string()
        }};
    }

    #[actix_rt::test]
    async fn test_create_and_get_candidate() {
        let state = state();
        let app = test_app!(state);

        let id = create_candidate!(app, "Priya Nair", "priya@example.com");

        let req = test::TestRequest::get()
            .uri(&format!("/api/candidates/{}", id))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["status"], "unassigned");
        assert_eq!(body["data"]["current_round"], "r1");
    }

    #[actix_rt::test]
    async fn test_schedule_start_feedback_flow() {
        let state = state();
        let panelist_id = free_panel_member_id(&state);
        let app = test_app!(state);
        let id = create_candidate!(app, "Priya Nair", "priya@example.com");

        // schedule r1
        let req = test::TestRequest::post()
            .uri(&format!("/api/candidates/{}/schedule", id))
            .set_json(serde_json::json!({"round": "r1", "panelist_id": panelist_id}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["status"], "r1-scheduled");
        {
            let panelists = state.panelists.lock().unwrap();
            assert_eq!(
                panelists[&panelist_id].current_status,
                PanelistStatus::InterviewAssigned
            );
        }

        // start
        let req = test::TestRequest::post()
            .uri(&format!("/api/candidates/{}/start", id))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["status"], "r1-in-progress");
        {
            let panelists = state.panelists.lock().unwrap();
            assert_eq!(
                panelists[&panelist_id].current_status,
                PanelistStatus::InInterview
            );
        }

        // selected feedback advances to r2 and frees the panelist
        let req = test::TestRequest::post()
            .uri(&format!("/api/candidates/{}/feedback", id))
            .set_json(serde_json::json!({"round": "r1", "decision": "selected"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["status"], "r2-scheduled");
        assert_eq!(body["data"]["current_round"], "r2");
        assert_eq!(body["data"]["feedback"].as_array().unwrap().len(), 1);
        assert!(body["data"]["assigned_panelist_id"].is_null());
        {
            let panelists = state.panelists.lock().unwrap();
            assert_eq!(panelists[&panelist_id].current_status, PanelistStatus::Free);
        }

        // timeline recorded intake, schedule, start, feedback
        let req = test::TestRequest::get()
            .uri(&format!("/api/candidates/{}/timeline", id))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["events"].as_array().unwrap().len(), 4);
    }

    #[actix_rt::test]
    async fn test_out_of_order_feedback_is_conflict() {
        let state = state();
        let app = test_app!(state);
        let id = create_candidate!(app, "Priya Nair", "priya@example.com");

        let req = test::TestRequest::post()
            .uri(&format!("/api/candidates/{}/feedback", id))
            .set_json(serde_json::json!({"round": "r3", "decision": "selected"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_rt::test]
    async fn test_busy_panelist_cannot_be_scheduled_twice() {
        let state = state();
        let panelist_id = free_panel_member_id(&state);
        let app = test_app!(state);
        let first = create_candidate!(app, "Priya Nair", "priya@example.com");
        let second = create_candidate!(app, "Rohan Das", "rohan@example.com");

        let req = test::TestRequest::post()
            .uri(&format!("/api/candidates/{}/schedule", first))
            .set_json(serde_json::json!({"round": "r1", "panelist_id": panelist_id}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri(&format!("/api/candidates/{}/schedule", second))
            .set_json(serde_json::json!({"round": "r1", "panelist_id": panelist_id}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_rt::test]
    async fn test_bulk_import_endpoint() {
        let state = state();
        let app = test_app!(state);

        let csv = "Name,Email,Skills\nA,a@x.com,\"React,Node\"\n,missing@x.com,Rust\n";
        let req = test::TestRequest::post()
            .uri("/api/candidates/bulk")
            .set_json(serde_json::json!({"csv": csv}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["imported"], 1);
        assert_eq!(body["data"]["errors"].as_array().unwrap().len(), 1);
        assert_eq!(
            body["data"]["candidates"][0]["skills"],
            serde_json::json!(["React", "Node"])
        );
    }

    #[actix_rt::test]
    async fn test_eligible_panelists_endpoint() {
        let state = state();
        let app = test_app!(state);

        let req = test::TestRequest::get()
            .uri("/api/panelists/eligible/r3")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let eligible = body["data"].as_array().unwrap();
        assert_eq!(eligible.len(), 2);
        for p in eligible {
            assert_ne!(p["role"], "panel_member");
            assert_eq!(p["current_status"], "free");
        }
    }

    #[actix_rt::test]
    async fn test_manual_panelist_status_rules() {
        let state = state();
        let panelist_id = free_panel_member_id(&state);
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri(&format!("/api/panelists/{}/status", panelist_id))
            .set_json(serde_json::json!({"status": "break"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["current_status"], "break");

        // machine-driven statuses cannot be set by hand
        let req = test::TestRequest::post()
            .uri(&format!("/api/panelists/{}/status", panelist_id))
            .set_json(serde_json::json!({"status": "in_interview"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_full_pipeline_to_hired() {
        let state = state();
        let app = test_app!(state);
        let id = create_candidate!(app, "Priya Nair", "priya@example.com");

        for round in ["r1", "r2", "r3"] {
            let panelist_id = {
                let panelists = state.panelists.lock().unwrap();
                let all: Vec<Panelist> = panelists.values().cloned().collect();
                roster::eligible_panelists(&all, Round::parse(round).unwrap(), None)[0]
                    .id
                    .clone()
            };
            let req = test::TestRequest::post()
                .uri(&format!("/api/candidates/{}/schedule", id))
                .set_json(serde_json::json!({"round": round, "panelist_id": panelist_id}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "schedule {}", round);

            let req = test::TestRequest::post()
                .uri(&format!("/api/candidates/{}/feedback", id))
                .set_json(serde_json::json!({"round": round, "decision": "selected"}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "feedback {}", round);
        }

        let req = test::TestRequest::get()
            .uri(&format!("/api/candidates/{}", id))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["status"], "hired");
        assert_eq!(body["data"]["feedback"].as_array().unwrap().len(), 3);

        // further feedback is refused
        let req = test::TestRequest::post()
            .uri(&format!("/api/candidates/{}/feedback", id))
            .set_json(serde_json::json!({"round": "r3", "decision": "selected"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_rt::test]
    async fn test_summary_and_notifications() {
        let state = state();
        let panelist_id = free_panel_member_id(&state);
        let app = test_app!(state);
        let id = create_candidate!(app, "Priya Nair", "priya@example.com");

        let req = test::TestRequest::post()
            .uri(&format!("/api/candidates/{}/schedule", id))
            .set_json(serde_json::json!({"round": "r1", "panelist_id": panelist_id}))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri("/api/analytics/summary")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["total_candidates"], 1);
        assert_eq!(body["data"]["by_status"]["r1-scheduled"], 1);
        assert_eq!(body["data"]["in_pipeline"], 1);

        let req = test::TestRequest::get().uri("/api/notifications").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let notifications = body["data"].as_array().unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0]["kind"], "candidateAssigned");
    }
}

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    Actor, ActorRole, ApplicationId, JobId, JobPosting, NotificationId, SeekerSnapshot, UserId,
};
use super::engine::{EngineError, LifecycleEngine};
use super::store::{MarketplaceStore, ProfileDirectory};

/// Router builder exposing the lifecycle operations over HTTP. The
/// upstream gateway owns authentication; requests carry the verified
/// actor identity it injects.
pub fn marketplace_router<S, P>(engine: Arc<LifecycleEngine<S, P>>) -> Router
where
    S: MarketplaceStore + 'static,
    P: ProfileDirectory + 'static,
{
    Router::new()
        .route("/api/v1/jobs", post(create_job_handler::<S, P>))
        .route("/api/v1/jobs/:job_id", get(job_handler::<S, P>))
        .route(
            "/api/v1/jobs/:job_id/applications",
            post(apply_handler::<S, P>),
        )
        .route(
            "/api/v1/jobs/:job_id/applications/list",
            post(job_applications_handler::<S, P>),
        )
        .route(
            "/api/v1/jobs/:job_id/applications/:application_id/select",
            put(select_handler::<S, P>),
        )
        .route("/api/v1/jobs/:job_id/complete", put(complete_handler::<S, P>))
        .route(
            "/api/v1/users/:user_id/notifications",
            get(notifications_handler::<S, P>),
        )
        .route(
            "/api/v1/users/:user_id/notifications/read-all",
            put(read_all_handler::<S, P>),
        )
        .route(
            "/api/v1/notifications/:notification_id/read",
            put(read_handler::<S, P>),
        )
        .with_state(engine)
}

/// Verified identity injected by the authenticating gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct ActorPayload {
    pub id: String,
    pub role: ActorRole,
    pub name: String,
}

impl ActorPayload {
    fn into_actor(self) -> Actor {
        Actor {
            id: UserId(self.id),
            role: self.role,
            name: self.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub actor: ActorPayload,
    #[serde(flatten)]
    pub posting: JobPosting,
}

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub actor: ActorPayload,
    pub profile: SeekerSnapshot,
}

#[derive(Debug, Deserialize)]
pub struct ActorRequest {
    pub actor: ActorPayload,
}

#[derive(Debug, Deserialize)]
pub struct CompleteJobRequest {
    pub actor: ActorPayload,
    pub rating: u8,
    pub feedback: String,
}

fn error_response(err: EngineError) -> Response {
    let status = match &err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::InvalidState(_) | EngineError::InvalidRating(_) => StatusCode::BAD_REQUEST,
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

pub(crate) async fn create_job_handler<S, P>(
    State(engine): State<Arc<LifecycleEngine<S, P>>>,
    Json(request): Json<CreateJobRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    P: ProfileDirectory + 'static,
{
    match engine.create_job(&request.actor.into_actor(), request.posting) {
        Ok(job) => (StatusCode::CREATED, Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn job_handler<S, P>(
    State(engine): State<Arc<LifecycleEngine<S, P>>>,
    Path(job_id): Path<String>,
) -> Response
where
    S: MarketplaceStore + 'static,
    P: ProfileDirectory + 'static,
{
    match engine.job(&JobId(job_id)) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn apply_handler<S, P>(
    State(engine): State<Arc<LifecycleEngine<S, P>>>,
    Path(job_id): Path<String>,
    Json(request): Json<ApplyRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    P: ProfileDirectory + 'static,
{
    match engine.apply(
        &JobId(job_id),
        &request.actor.into_actor(),
        request.profile,
    ) {
        Ok(application) => (StatusCode::CREATED, Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn job_applications_handler<S, P>(
    State(engine): State<Arc<LifecycleEngine<S, P>>>,
    Path(job_id): Path<String>,
    Json(request): Json<ActorRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    P: ProfileDirectory + 'static,
{
    match engine.applications_for_job(&JobId(job_id), &request.actor.into_actor()) {
        Ok(applications) => (StatusCode::OK, Json(applications)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn select_handler<S, P>(
    State(engine): State<Arc<LifecycleEngine<S, P>>>,
    Path((job_id, application_id)): Path<(String, String)>,
    Json(request): Json<ActorRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    P: ProfileDirectory + 'static,
{
    match engine.select(
        &JobId(job_id),
        &ApplicationId(application_id),
        &request.actor.into_actor(),
    ) {
        Ok(application) => (StatusCode::OK, Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn complete_handler<S, P>(
    State(engine): State<Arc<LifecycleEngine<S, P>>>,
    Path(job_id): Path<String>,
    Json(request): Json<CompleteJobRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    P: ProfileDirectory + 'static,
{
    match engine.complete(
        &JobId(job_id),
        &request.actor.into_actor(),
        request.rating,
        &request.feedback,
    ) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn notifications_handler<S, P>(
    State(engine): State<Arc<LifecycleEngine<S, P>>>,
    Path(user_id): Path<String>,
) -> Response
where
    S: MarketplaceStore + 'static,
    P: ProfileDirectory + 'static,
{
    match engine.notifications(&UserId(user_id)) {
        Ok(notifications) => (StatusCode::OK, Json(notifications)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn read_handler<S, P>(
    State(engine): State<Arc<LifecycleEngine<S, P>>>,
    Path(notification_id): Path<String>,
    Json(request): Json<ActorRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    P: ProfileDirectory + 'static,
{
    match engine.mark_notification_read(
        &NotificationId(notification_id),
        &request.actor.into_actor(),
    ) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "notification marked as read" })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn read_all_handler<S, P>(
    State(engine): State<Arc<LifecycleEngine<S, P>>>,
    Path(user_id): Path<String>,
    Json(request): Json<ActorRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    P: ProfileDirectory + 'static,
{
    let actor = request.actor.into_actor();
    if actor.id != UserId(user_id) {
        return error_response(EngineError::Forbidden(
            "you can only mark your own notifications as read",
        ));
    }
    match engine.mark_all_notifications_read(&actor) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "all notifications marked as read" })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

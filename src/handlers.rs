use crate::client::{ClientState, DraftForm};
use crate::errors::AppError;
use crate::models::{CreatedResponse, HealthResponse, LogEntry, NewLogEntry, SuccessResponse};
use crate::state::AppState;
use crate::ui::render_page;
use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection, PathRejection},
        Path, State,
    },
    response::{Html, Redirect},
    Form, Json,
};
use chrono::Utc;
use tracing::{error, info};

const FETCH_FAILED: &str = "Failed to fetch logs";
const ADD_FAILED: &str = "Failed to add log";
const DELETE_FAILED: &str = "Failed to delete log";

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn list_logs(State(state): State<AppState>) -> Result<Json<Vec<LogEntry>>, AppError> {
    let logs = state.store.list().await.map_err(|err| {
        error!("error fetching logs: {err}");
        AppError::internal(FETCH_FAILED)
    })?;
    Ok(Json(logs))
}

pub async fn add_log(
    State(state): State<AppState>,
    payload: Result<Json<NewLogEntry>, JsonRejection>,
) -> Result<Json<CreatedResponse>, AppError> {
    let Json(entry) = payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let id = insert(&state, &entry).await?;
    Ok(Json(CreatedResponse { success: true, id }))
}

pub async fn delete_log(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let Path(id) = id.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    remove(&state, id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let mut view = ClientState::new();
    match state.store.list().await {
        Ok(logs) => view.logs_loaded(logs),
        Err(err) => {
            error!("error fetching logs: {err}");
            view.load_failed();
        }
    }
    Html(render_page(&view))
}

pub async fn new_log_page() -> Html<String> {
    let mut view = ClientState::new();
    view.open_form(Utc::now());
    Html(render_page(&view))
}

pub async fn submit_form(
    State(state): State<AppState>,
    form: Result<Form<DraftForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    insert(&state, &form.into_entry()).await?;
    Ok(Redirect::to("/"))
}

pub async fn delete_form(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Redirect, AppError> {
    remove(&state, id).await?;
    Ok(Redirect::to("/"))
}

async fn insert(state: &AppState, entry: &NewLogEntry) -> Result<i64, AppError> {
    entry.validate()?;
    let id = state.store.add(entry).await.map_err(|err| {
        error!("error adding log: {err}");
        AppError::internal(ADD_FAILED)
    })?;
    info!(id, "log entry added");
    Ok(id)
}

async fn remove(state: &AppState, id: i64) -> Result<(), AppError> {
    let removed = state.store.remove(id).await.map_err(|err| {
        error!(id, "error deleting log: {err}");
        AppError::internal(DELETE_FAILED)
    })?;
    if removed {
        info!(id, "log entry deleted");
    }
    Ok(())
}

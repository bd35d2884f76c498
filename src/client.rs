//! Client-side state for the dashboard and entry form, plus a typed HTTP
//! client for the JSON API.

use crate::models::{CreatedResponse, HealthResponse, LogEntry, NewLogEntry, SuccessResponse};
use crate::stats::{self, DashboardStats, DayGroup};
use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },
}

/// The two screens of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    NewLog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    Create,
    Cancel,
    Saved,
}

impl View {
    pub fn apply(self, action: ViewAction) -> View {
        match (self, action) {
            (View::Dashboard, ViewAction::Create) => View::NewLog,
            (View::NewLog, ViewAction::Cancel | ViewAction::Saved) => View::Dashboard,
            (view, _) => view,
        }
    }
}

/// A fresh form draft with the default selections.
pub fn new_draft(now: DateTime<Utc>) -> NewLogEntry {
    NewLogEntry {
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        bristol_score: 4,
        color: "Brown".to_string(),
        quantity: "Medium".to_string(),
        urgency: "Normal".to_string(),
        pain_level: 0,
        notes: String::new(),
        has_blood: false,
        has_mucus: false,
        is_floating: false,
        smell: "Normal".to_string(),
    }
}

/// Ephemeral UI state. Nothing here is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientState {
    pub view: View,
    pub logs: Vec<LogEntry>,
    pub loading: bool,
    pub draft: Option<NewLogEntry>,
    pub pending_delete: Option<i64>,
}

impl Default for ClientState {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientState {
    pub fn new() -> Self {
        Self {
            view: View::Dashboard,
            logs: Vec::new(),
            loading: true,
            draft: None,
            pending_delete: None,
        }
    }

    pub fn open_form(&mut self, now: DateTime<Utc>) {
        let next = self.view.apply(ViewAction::Create);
        if next != self.view {
            self.view = next;
            self.draft = Some(new_draft(now));
        }
    }

    pub fn cancel_form(&mut self) {
        self.view = self.view.apply(ViewAction::Cancel);
        self.draft = None;
    }

    pub fn draft_mut(&mut self) -> Option<&mut NewLogEntry> {
        self.draft.as_mut()
    }

    pub fn logs_loaded(&mut self, logs: Vec<LogEntry>) {
        self.logs = logs;
        self.loading = false;
    }

    /// Keeps whatever was loaded before.
    pub fn load_failed(&mut self) {
        self.loading = false;
    }

    pub fn request_delete(&mut self, id: i64) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn dashboard(&self) -> DashboardStats {
        stats::build_dashboard(&self.logs)
    }

    pub fn history(&self) -> Vec<DayGroup<'_>> {
        stats::group_by_day(&self.logs)
    }

    pub async fn refresh(&mut self, api: &ApiClient) {
        match api.list_logs().await {
            Ok(logs) => self.logs_loaded(logs),
            Err(err) => {
                warn!("failed to fetch logs: {err}");
                self.load_failed();
            }
        }
    }

    /// Sends the draft, reloads the list and returns to the dashboard.
    /// On failure the form stays open with the draft intact. Unlike a bare
    /// `fetch`, a non-2xx response (such as a rejected score) counts as a
    /// failure here, so the entry is never silently dropped.
    pub async fn submit_draft(&mut self, api: &ApiClient) -> Result<Option<i64>, ClientError> {
        let Some(draft) = self.draft.as_ref() else {
            return Ok(None);
        };

        let id = match api.add_log(draft).await {
            Ok(id) => id,
            Err(err) => {
                warn!("failed to save log: {err}");
                return Err(err);
            }
        };

        self.refresh(api).await;
        self.view = self.view.apply(ViewAction::Saved);
        self.draft = None;
        Ok(Some(id))
    }

    /// Deletes the entry awaiting confirmation, if any.
    pub async fn confirm_delete(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(());
        };

        if let Err(err) = api.delete_log(id).await {
            warn!(id, "failed to delete log: {err}");
            return Err(err);
        }

        self.refresh(api).await;
        Ok(())
    }
}

/// Thin wrapper over the JSON endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let resp = self.http.get(format!("{}/api/health", self.base_url)).send().await?;
        read_json(resp).await
    }

    pub async fn list_logs(&self) -> Result<Vec<LogEntry>, ClientError> {
        let resp = self.http.get(format!("{}/api/logs", self.base_url)).send().await?;
        read_json(resp).await
    }

    pub async fn add_log(&self, entry: &NewLogEntry) -> Result<i64, ClientError> {
        let resp = self
            .http
            .post(format!("{}/api/logs", self.base_url))
            .json(entry)
            .send()
            .await?;
        let created: CreatedResponse = read_json(resp).await?;
        Ok(created.id)
    }

    pub async fn delete_log(&self, id: i64) -> Result<(), ClientError> {
        let resp = self
            .http
            .delete(format!("{}/api/logs/{id}", self.base_url))
            .send()
            .await?;
        let _: SuccessResponse = read_json(resp).await?;
        Ok(())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

async fn read_json<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_default();
        return Err(ClientError::Status { status, message });
    }
    Ok(resp.json().await?)
}

/// Urlencoded body posted by the HTML entry form.
///
/// Checkboxes are only sent when ticked, so the flags arrive as optional strings.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftForm {
    pub timestamp: String,
    pub bristol_score: i64,
    pub color: String,
    pub quantity: String,
    pub urgency: String,
    pub pain_level: i64,
    #[serde(default)]
    pub notes: String,
    pub has_blood: Option<String>,
    pub has_mucus: Option<String>,
    pub is_floating: Option<String>,
    pub smell: String,
}

impl DraftForm {
    pub fn into_entry(self) -> NewLogEntry {
        self.into_entry_in(&Local)
    }

    /// `datetime-local` values carry no offset; they are read as wall-clock
    /// time in `tz` and stored as UTC.
    pub fn into_entry_in<Tz: TimeZone>(self, tz: &Tz) -> NewLogEntry {
        let timestamp = NaiveDateTime::parse_from_str(self.timestamp.trim(), "%Y-%m-%dT%H:%M")
            .ok()
            .and_then(|naive| tz.from_local_datetime(&naive).earliest())
            .map(|local| {
                local
                    .with_timezone(&Utc)
                    .to_rfc3339_opts(SecondsFormat::Millis, true)
            })
            .unwrap_or(self.timestamp);

        NewLogEntry {
            timestamp,
            bristol_score: self.bristol_score,
            color: self.color,
            quantity: self.quantity,
            urgency: self.urgency,
            pain_level: self.pain_level,
            notes: self.notes,
            has_blood: self.has_blood.is_some(),
            has_mucus: self.has_mucus.is_some(),
            is_floating: self.is_floating.is_some(),
            smell: self.smell,
        }
    }
}

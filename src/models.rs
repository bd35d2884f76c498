use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted log entry as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: String,
    pub bristol_score: i64,
    pub color: String,
    pub quantity: String,
    pub urgency: String,
    pub pain_level: i64,
    pub notes: String,
    pub has_blood: bool,
    pub has_mucus: bool,
    pub is_floating: bool,
    pub smell: String,
}

impl LogEntry {
    pub fn without_id(&self) -> NewLogEntry {
        NewLogEntry {
            timestamp: self.timestamp.clone(),
            bristol_score: self.bristol_score,
            color: self.color.clone(),
            quantity: self.quantity.clone(),
            urgency: self.urgency.clone(),
            pain_level: self.pain_level,
            notes: self.notes.clone(),
            has_blood: self.has_blood,
            has_mucus: self.has_mucus,
            is_floating: self.is_floating,
            smell: self.smell.clone(),
        }
    }
}

/// Request body for creating an entry. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLogEntry {
    pub timestamp: String,
    pub bristol_score: i64,
    pub color: String,
    pub quantity: String,
    pub urgency: String,
    pub pain_level: i64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub has_blood: bool,
    #[serde(default)]
    pub has_mucus: bool,
    #[serde(default)]
    pub is_floating: bool,
    pub smell: String,
}

impl NewLogEntry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timestamp.trim().is_empty() {
            return Err(ValidationError::EmptyTimestamp);
        }
        if !(1..=7).contains(&self.bristol_score) {
            return Err(ValidationError::BristolScoreOutOfRange(self.bristol_score));
        }
        if !(0..=10).contains(&self.pain_level) {
            return Err(ValidationError::PainLevelOutOfRange(self.pain_level));
        }
        Ok(())
    }
}

/// Raw `logs` row. Flags are stored as 0/1 and optional text columns may be NULL.
#[derive(Debug, FromRow)]
pub struct LogRow {
    pub id: i64,
    pub timestamp: String,
    pub bristol_score: i64,
    pub color: String,
    pub quantity: Option<String>,
    pub urgency: Option<String>,
    pub pain_level: Option<i64>,
    pub notes: Option<String>,
    pub has_blood: i64,
    pub has_mucus: i64,
    pub is_floating: i64,
    pub smell: Option<String>,
}

impl From<LogRow> for LogEntry {
    fn from(row: LogRow) -> Self {
        Self {
            id: row.id,
            timestamp: row.timestamp,
            bristol_score: row.bristol_score,
            color: row.color,
            quantity: row.quantity.unwrap_or_default(),
            urgency: row.urgency.unwrap_or_default(),
            pain_level: row.pain_level.unwrap_or_default(),
            notes: row.notes.unwrap_or_default(),
            has_blood: row.has_blood != 0,
            has_mucus: row.has_mucus != 0,
            is_floating: row.is_floating != 0,
            smell: row.smell.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct BristolType {
    pub score: i64,
    pub label: &'static str,
    pub description: &'static str,
}

pub const BRISTOL_SCALE: [BristolType; 7] = [
    BristolType { score: 1, label: "Type 1", description: "Separate hard lumps, like nuts (hard to pass)" },
    BristolType { score: 2, label: "Type 2", description: "Sausage-shaped, but lumpy" },
    BristolType { score: 3, label: "Type 3", description: "Like a sausage but with cracks on surface" },
    BristolType { score: 4, label: "Type 4", description: "Like a sausage or snake, smooth and soft" },
    BristolType { score: 5, label: "Type 5", description: "Soft blobs with clear cut edges (passed easily)" },
    BristolType { score: 6, label: "Type 6", description: "Fluffy pieces with ragged edges, a mushy stool" },
    BristolType { score: 7, label: "Type 7", description: "Watery, no solid pieces, entirely liquid" },
];

pub const COLORS: [&str; 6] = ["Brown", "Green", "Yellow", "Black", "Red", "Pale/Clay"];
pub const QUANTITIES: [&str; 3] = ["Small", "Medium", "Large"];
pub const URGENCIES: [&str; 3] = ["Normal", "Urgent", "Emergency"];
pub const SMELLS: [&str; 3] = ["Normal", "Strong", "Foul"];

pub fn bristol_type(score: i64) -> Option<&'static BristolType> {
    BRISTOL_SCALE.iter().find(|kind| kind.score == score)
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity bands mapped from the CVSS base score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
}

/// A normalized vulnerability record ready for the dashboard feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatData {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    #[serde(default)]
    pub cve_id: Option<String>,
    pub summary: String,
    pub details: String,
    pub location: GeoPoint,
    pub confidence: u8,
    #[serde(default)]
    pub apt_group: Option<String>,
}

/// Forecast attached to a group at extraction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AptForecast {
    pub confidence: u8,
    pub target_sector: String,
    pub attack_vector: String,
    pub timeframe: String,
}

/// Profile of a tracked intrusion set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AptGroup {
    pub id: String,
    pub name: String,
    pub attribution: String,
    pub active_since: String,
    pub targets: Vec<String>,
    pub techniques: Vec<String>,
    pub tools: Vec<String>,
    pub recent_campaigns: Vec<String>,
    pub prediction: AptForecast,
    pub mitre_techniques: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeightedEntry {
    pub name: String,
    pub probability: u32,
}

/// Synthesized attack outlook for one group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub apt_group: String,
    pub confidence: u8,
    pub target_sectors: Vec<WeightedEntry>,
    pub attack_vectors: Vec<WeightedEntry>,
    pub timeframe: String,
    pub indicators: Vec<String>,
    pub model_factors: Vec<String>,
    pub mitre_techniques: Vec<String>,
    pub cve_ids: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub event: String,
    pub details: String,
    pub severity: String,
    #[serde(default)]
    pub apt_group: Option<String>,
    #[serde(default)]
    pub cve_id: Option<String>,
    #[serde(default)]
    pub mitre_technique: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusLog {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// Aggregate health summary; field names follow the dashboard wire contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub model_accuracy: f64,
    pub threat_level: u8,
    pub api_status: String,
    pub last_update: DateTime<Utc>,
    pub data_sources_online: usize,
    pub total_data_sources: usize,
    pub logs: Vec<StatusLog>,
}

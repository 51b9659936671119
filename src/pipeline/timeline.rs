use chrono::Duration;

use crate::core::time::now_utc;
use crate::core::types::{ThreatData, TimelineEvent};

const MAX_EVENTS: usize = 8;

/// Fixed tag pool for the timeline's technique column.
const TECHNIQUE_POOL: [&str; 8] = [
    "T1566 - Phishing",
    "T1190 - Exploit Public-Facing Application",
    "T1133 - External Remote Services",
    "T1078 - Valid Accounts",
    "T1003 - OS Credential Dumping",
    "T1041 - Exfiltration Over C2 Channel",
    "T1021 - Remote Services",
    "T1595 - Active Scanning",
];

/// Lay the first eight threats onto a synthetic timeline, one event every
/// three hours counting back from now, oldest first.
pub fn build_timeline(threats: &[ThreatData]) -> Vec<TimelineEvent> {
    let now = now_utc();
    let mut events: Vec<TimelineEvent> = threats
        .iter()
        .take(MAX_EVENTS)
        .enumerate()
        .map(|(index, threat)| TimelineEvent {
            id: format!("timeline-threat-{index}"),
            timestamp: now - Duration::hours(3 * index as i64),
            event: format!("{} detected", threat.kind),
            details: if threat.summary.is_empty() {
                format!("{} from {}", threat.kind, threat.source)
            } else {
                threat.summary.clone()
            },
            severity: threat.severity.as_str().to_string(),
            apt_group: threat.apt_group.clone(),
            cve_id: threat.cve_id.clone(),
            mitre_technique: Some(technique_for(&threat.id).to_string()),
        })
        .collect();

    events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    events
}

/// Deterministic tag: the sum of the id's character codes indexes the fixed
/// pool, so the same threat id maps to the same technique on every call.
pub fn technique_for(id: &str) -> &'static str {
    let hash: u32 = id.chars().map(|c| c as u32).sum();
    TECHNIQUE_POOL[(hash % TECHNIQUE_POOL.len() as u32) as usize]
}

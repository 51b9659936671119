use chrono::Duration;
use rand::Rng;

use crate::config::AppConfig;
use crate::core::time::now_utc;
use crate::core::types::{Severity, StatusLog, SystemStatus, ThreatData};

/// Summarize the current threat set into the status panel record.
///
/// The threat level weights severities 25/10/5/1, scales by 10 and
/// saturates at 100. Source counts come from the configured feed tables,
/// with one source always reported offline.
pub fn build_status(
    threats: &[ThreatData],
    config: &AppConfig,
    rng: &mut impl Rng,
) -> SystemStatus {
    let mut critical = 0u32;
    let mut high = 0u32;
    let mut medium = 0u32;
    let mut low = 0u32;
    for threat in threats {
        match threat.severity {
            Severity::Critical => critical += 1,
            Severity::High => high += 1,
            Severity::Medium => medium += 1,
            Severity::Low => low += 1,
        }
    }

    let weighted = 25 * critical + 10 * high + 5 * medium + low;
    let scaled = (weighted as f64 / threats.len().max(1) as f64 * 10.0).round();
    let threat_level = scaled.min(100.0) as u8;

    let now = now_utc();
    let logs = vec![
        log_entry(now, Duration::seconds(30), "ML model prediction updated"),
        log_entry(now, Duration::minutes(2), "New threat data ingested from NVD"),
        log_entry(now, Duration::minutes(5), "APT attribution model recalibrated"),
        log_entry(now, Duration::minutes(10), "System health check completed"),
    ];

    let total_data_sources = config.rss_feeds.len() + config.api_sources.len();
    SystemStatus {
        model_accuracy: 94.7 + rng.gen_range(-0.3..0.3),
        threat_level,
        api_status: "Operational".to_string(),
        last_update: now,
        data_sources_online: total_data_sources.saturating_sub(1),
        total_data_sources,
        logs,
    }
}

fn log_entry(now: chrono::DateTime<chrono::Utc>, age: Duration, message: &str) -> StatusLog {
    StatusLog {
        timestamp: now - age,
        message: message.to_string(),
    }
}

use chrono::{DateTime, NaiveDateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::time::now_utc;
use crate::core::types::{GeoPoint, Severity, ThreatData};
use crate::sources::nvd::CveListing;

/// Countries for the synthesized map pins. The coordinates are uniform
/// random filler for the dashboard map, not a geolocation lookup.
const COUNTRIES: [&str; 10] = [
    "United States",
    "Russia",
    "China",
    "North Korea",
    "Iran",
    "Ukraine",
    "Germany",
    "United Kingdom",
    "Brazil",
    "India",
];

/// Convert a raw NVD listing into display-ready threats, newest first.
/// A listing with no vulnerabilities yields an empty vec, never an error.
pub fn normalize_threats(listing: &CveListing, rng: &mut impl Rng) -> Vec<ThreatData> {
    let mut threats: Vec<ThreatData> = listing
        .vulnerabilities
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let cve = &item.cve;
            let cvss = cve.cvss();
            let base_score = cvss.map(|c| c.base_score).unwrap_or(0.0);
            let attack_vector = cvss
                .map(|c| c.attack_vector.as_str())
                .filter(|v| !v.is_empty());

            let id = if cve.id.is_empty() {
                format!("nvd-{index}")
            } else {
                cve.id.clone()
            };
            let summary = cve
                .descriptions
                .first()
                .map(|d| d.value.clone())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "No description available".to_string());

            ThreatData {
                id,
                timestamp: cve
                    .published
                    .as_deref()
                    .and_then(parse_timestamp)
                    .unwrap_or_else(now_utc),
                source: "NVD".to_string(),
                kind: attack_vector.unwrap_or("Vulnerability").to_string(),
                severity: classify_severity(base_score),
                cve_id: (!cve.id.is_empty()).then(|| cve.id.clone()),
                summary,
                details: format!(
                    "Base Score: {}, Attack Vector: {}",
                    base_score,
                    attack_vector.unwrap_or("Unknown")
                ),
                location: random_location(rng),
                confidence: (base_score * 10.0).round().clamp(0.0, 100.0) as u8,
                apt_group: None,
            }
        })
        .collect();

    threats.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    threats
}

/// Threshold bands over the CVSS base score, highest first.
pub fn classify_severity(base_score: f64) -> Severity {
    if base_score >= 9.0 {
        Severity::Critical
    } else if base_score >= 7.0 {
        Severity::High
    } else if base_score >= 4.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn random_location(rng: &mut impl Rng) -> GeoPoint {
    GeoPoint {
        latitude: rng.gen_range(-90.0..=90.0),
        longitude: rng.gen_range(-180.0..=180.0),
        country: COUNTRIES
            .choose(rng)
            .copied()
            .unwrap_or("United States")
            .to_string(),
    }
}

/// NVD publishes both RFC 3339 and zone-less ISO timestamps.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sources::nvd::{Cve, CveDescription, CveItem, CveMetrics, CvssData, CvssMetric};

    fn item(id: &str, published: &str, score: f64) -> CveItem {
        CveItem {
            cve: Cve {
                id: id.to_string(),
                published: Some(published.to_string()),
                descriptions: vec![CveDescription {
                    lang: "en".to_string(),
                    value: format!("issue in {id}"),
                }],
                metrics: CveMetrics {
                    cvss_metric_v31: vec![CvssMetric {
                        cvss_data: CvssData {
                            base_score: score,
                            attack_vector: "NETWORK".to_string(),
                        },
                    }],
                    cvss_metric_v30: vec![],
                },
            },
        }
    }

    #[test]
    fn severity_boundaries_are_exact() {
        assert_eq!(classify_severity(9.0), Severity::Critical);
        assert_eq!(classify_severity(8.999), Severity::High);
        assert_eq!(classify_severity(7.0), Severity::High);
        assert_eq!(classify_severity(6.999), Severity::Medium);
        assert_eq!(classify_severity(4.0), Severity::Medium);
        assert_eq!(classify_severity(3.999), Severity::Low);
        assert_eq!(classify_severity(0.0), Severity::Low);
    }

    #[test]
    fn severity_is_monotonic_in_score() {
        let scores = [0.0, 3.999, 4.0, 6.999, 7.0, 8.999, 9.0, 10.0];
        let bands: Vec<Severity> = scores.iter().map(|s| classify_severity(*s)).collect();
        assert!(bands.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn confidence_is_score_times_ten_rounded() {
        let mut rng = StdRng::seed_from_u64(1);
        let listing = CveListing {
            vulnerabilities: [0.0, 4.0, 7.0, 9.0, 10.0]
                .iter()
                .enumerate()
                .map(|(i, s)| item(&format!("CVE-2024-{i}"), "2024-03-01T00:00:00Z", *s))
                .collect(),
        };
        let mut confidences: Vec<u8> = normalize_threats(&listing, &mut rng)
            .iter()
            .map(|t| t.confidence)
            .collect();
        confidences.sort_unstable();
        assert_eq!(confidences, vec![0, 40, 70, 90, 100]);
    }

    #[test]
    fn output_is_sorted_newest_first() {
        let mut rng = StdRng::seed_from_u64(2);
        let listing = CveListing {
            vulnerabilities: vec![
                item("CVE-2024-1", "2024-01-05T10:00:00Z", 5.0),
                item("CVE-2024-2", "2024-02-05T10:00:00Z", 5.0),
                item("CVE-2024-3", "2024-01-20T10:00:00Z", 5.0),
            ],
        };
        let threats = normalize_threats(&listing, &mut rng);
        assert!(threats.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        assert_eq!(threats[0].id, "CVE-2024-2");
    }

    #[test]
    fn empty_listing_yields_empty_output() {
        let mut rng = StdRng::seed_from_u64(3);
        let threats = normalize_threats(&CveListing::default(), &mut rng);
        assert!(threats.is_empty());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let mut rng = StdRng::seed_from_u64(4);
        let listing = CveListing {
            vulnerabilities: vec![CveItem::default()],
        };
        let threats = normalize_threats(&listing, &mut rng);
        assert_eq!(threats.len(), 1);
        let threat = &threats[0];
        assert_eq!(threat.id, "nvd-0");
        assert_eq!(threat.kind, "Vulnerability");
        assert_eq!(threat.severity, Severity::Low);
        assert_eq!(threat.confidence, 0);
        assert_eq!(threat.summary, "No description available");
        assert!(threat.cve_id.is_none());
    }

    #[test]
    fn synthesized_location_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let loc = random_location(&mut rng);
            assert!((-90.0..=90.0).contains(&loc.latitude));
            assert!((-180.0..=180.0).contains(&loc.longitude));
            assert!(COUNTRIES.contains(&loc.country.as_str()));
        }
    }

    #[test]
    fn zoneless_nvd_timestamps_parse() {
        let parsed = parse_timestamp("2024-03-01T12:30:00.000").expect("naive timestamp");
        assert_eq!(parsed.to_rfc3339(), "2024-03-01T12:30:00+00:00");
    }
}

use std::{fs, path::Path};

use serde::Deserialize;

use crate::core::error::IntelError;

/// A named upstream feed. RSS feeds and auxiliary APIs are enumerated for
/// the status panel's source counts; only the NVD and ATT&CK URLs are
/// fetched by the pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub timeout_ms: u64,
    pub user_agent: String,
    pub nvd_api_url: String,
    pub mitre_attack_url: String,
    /// Reserved base URL for an external ML backend; accepted but not called.
    #[serde(default)]
    pub ml_api_endpoint: Option<String>,
    pub poll_interval_secs: u64,
    pub status_interval_secs: u64,
    pub rss_feeds: Vec<SourceConfig>,
    pub api_sources: Vec<SourceConfig>,
}

pub fn load_config(path: Option<&str>) -> Result<AppConfig, IntelError> {
    let default_path = Path::new("config/vigil.toml");
    let path = path.map(Path::new).unwrap_or(default_path);

    let mut cfg = if path.exists() {
        let content = fs::read_to_string(path).map_err(|e| IntelError::Config(e.to_string()))?;
        toml::from_str(&content).map_err(|e| IntelError::Config(e.to_string()))?
    } else {
        default_config()
    };

    if let Ok(endpoint) = std::env::var("VIGIL_ML_API_ENDPOINT") {
        if !endpoint.is_empty() {
            cfg.ml_api_endpoint = Some(endpoint);
        }
    }
    Ok(cfg)
}

pub fn default_config() -> AppConfig {
    AppConfig {
        timeout_ms: 10_000,
        user_agent: "vigil/0.4 (feed aggregation)".to_string(),
        nvd_api_url: "https://services.nvd.nist.gov/rest/json/cves/2.0?resultsPerPage=20"
            .to_string(),
        mitre_attack_url:
            "https://raw.githubusercontent.com/mitre/cti/master/enterprise-attack/enterprise-attack.json"
                .to_string(),
        ml_api_endpoint: None,
        poll_interval_secs: 300,
        status_interval_secs: 30,
        rss_feeds: vec![
            source("us-cert", "https://www.cisa.gov/uscert/ncas/alerts.xml"),
            source("sans-isc", "https://isc.sans.edu/rssfeed.xml"),
            source("krebs", "https://krebsonsecurity.com/feed/"),
            source("hacker-news", "https://feeds.feedburner.com/TheHackersNews"),
            source(
                "ms-security",
                "https://www.microsoft.com/en-us/security/blog/feed/?tag=security-intelligence",
            ),
            source("mandiant", "https://www.mandiant.com/resources/blog/rss.xml"),
            source(
                "project-zero",
                "https://googleprojectzero.blogspot.com/feeds/posts/default",
            ),
        ],
        api_sources: vec![
            source(
                "cisa-kev",
                "https://services.nvd.nist.gov/rest/json/cves/2.0?keywordSearch=known_exploited_vulnerabilities",
            ),
            source(
                "nvd",
                "https://services.nvd.nist.gov/rest/json/cves/2.0?resultsPerPage=20",
            ),
            source("github-advisories", "https://api.github.com/advisories"),
            source("malware-bazaar", "https://mb-api.abuse.ch/api/v1/"),
        ],
    }
}

fn source(name: &str, url: &str) -> SourceConfig {
    SourceConfig {
        name: name.to_string(),
        url: url.to_string(),
    }
}

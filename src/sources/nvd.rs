use serde::Deserialize;

/// Raw shapes for the NVD CVE listing endpoint. Every field defaults so a
/// partial or malformed record parses and downstream defaulting applies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CveListing {
    #[serde(default)]
    pub vulnerabilities: Vec<CveItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CveItem {
    #[serde(default)]
    pub cve: Cve,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Cve {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub descriptions: Vec<CveDescription>,
    #[serde(default)]
    pub metrics: CveMetrics,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CveDescription {
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CveMetrics {
    #[serde(default, rename = "cvssMetricV31")]
    pub cvss_metric_v31: Vec<CvssMetric>,
    #[serde(default, rename = "cvssMetricV30")]
    pub cvss_metric_v30: Vec<CvssMetric>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CvssMetric {
    #[serde(default, rename = "cvssData")]
    pub cvss_data: CvssData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CvssData {
    #[serde(default, rename = "baseScore")]
    pub base_score: f64,
    #[serde(default, rename = "attackVector")]
    pub attack_vector: String,
}

impl Cve {
    /// Preferred CVSS data block: v3.1 first, then v3.0.
    pub fn cvss(&self) -> Option<&CvssData> {
        self.metrics
            .cvss_metric_v31
            .first()
            .or_else(|| self.metrics.cvss_metric_v30.first())
            .map(|m| &m.cvss_data)
    }
}

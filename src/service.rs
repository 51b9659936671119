use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;

use crate::config::AppConfig;
use crate::core::error::IntelError;
use crate::core::types::{AptGroup, Prediction, SystemStatus, ThreatData, TimelineEvent};
use crate::pipeline::{apt, normalizer, predictor, status, timeline};
use crate::sources::client::FeedClient;
use crate::sources::mitre::AttackBundle;
use crate::sources::nvd::CveListing;
use crate::sources::FailurePolicy;

/// The five dashboard sections served by [`IntelService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Threats,
    AptGroups,
    Predictions,
    Timeline,
    Status,
}

/// Query boundary for the dashboard. Every call refetches upstream and
/// recomputes its records from scratch; nothing is cached between calls.
pub struct IntelService {
    config: AppConfig,
    client: FeedClient,
    seed: Option<u64>,
}

impl IntelService {
    pub fn new(config: AppConfig) -> Result<Self, IntelError> {
        let client = FeedClient::new(&config)?;
        Ok(Self {
            config,
            client,
            seed: None,
        })
    }

    /// Pin the random source so repeated calls produce identical filler.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The failure mode each section is contracted to. Threats and its
    /// derived views degrade to empty; APT extraction and predictions
    /// propagate so callers can tell an outage from an empty result.
    pub fn failure_policy(section: Section) -> FailurePolicy {
        match section {
            Section::Threats | Section::Timeline | Section::Status => {
                FailurePolicy::DegradeToEmpty
            }
            Section::AptGroups | Section::Predictions => FailurePolicy::Propagate,
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Normalized threat feed, newest first. An NVD outage is logged and
    /// served as an empty set so the feed stays renderable.
    pub async fn threats(&self) -> Result<Vec<ThreatData>, IntelError> {
        let listing: Result<CveListing, IntelError> =
            self.client.fetch_json(&self.config.nvd_api_url).await;
        match listing {
            Ok(listing) => Ok(normalizer::normalize_threats(&listing, &mut self.rng())),
            Err(err) => {
                warn!("threat feed unavailable, serving empty set: {err}");
                Ok(Vec::new())
            }
        }
    }

    /// Group profiles from the ATT&CK bundle. A fetch failure propagates.
    pub async fn apt_groups(&self) -> Result<Vec<AptGroup>, IntelError> {
        let bundle: AttackBundle = self.client.fetch_json(&self.config.mitre_attack_url).await?;
        Ok(apt::extract_apt_groups(&bundle, &mut self.rng()))
    }

    /// Synthesized outlooks, one per group. Depends on [`Self::apt_groups`]
    /// completing first and shares its failure mode.
    pub async fn predictions(&self) -> Result<Vec<Prediction>, IntelError> {
        let groups = self.apt_groups().await?;
        Ok(predictor::synthesize_predictions(&groups, &mut self.rng()))
    }

    pub async fn timeline(&self) -> Result<Vec<TimelineEvent>, IntelError> {
        let threats = self.threats().await?;
        Ok(timeline::build_timeline(&threats))
    }

    pub async fn status(&self) -> Result<SystemStatus, IntelError> {
        let threats = self.threats().await?;
        Ok(status::build_status(&threats, &self.config, &mut self.rng()))
    }
}

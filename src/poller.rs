use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::core::time::now_utc;
use crate::core::types::{AptGroup, Prediction, SystemStatus, ThreatData, TimelineEvent};
use crate::service::IntelService;

/// Latest successful view of every section. Sections are replaced
/// independently; a failed cycle leaves the previous value in place, so a
/// stale-but-valid section is preferred over an empty error state.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub threats: Vec<ThreatData>,
    pub apt_groups: Vec<AptGroup>,
    pub predictions: Vec<Prediction>,
    pub timeline: Vec<TimelineEvent>,
    pub status: Option<SystemStatus>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Timer-driven refresh: a dashboard tick refetches the four data views and
/// a faster tick refreshes status only. In-flight fetches are never
/// cancelled when a new tick starts; the last completed write wins. Both
/// tasks are aborted when the poller is dropped.
pub struct Poller {
    rx: watch::Receiver<DashboardSnapshot>,
    dashboard_task: JoinHandle<()>,
    status_task: JoinHandle<()>,
}

impl Poller {
    pub fn spawn(service: Arc<IntelService>) -> Self {
        let (tx, rx) = watch::channel(DashboardSnapshot::default());
        let tx = Arc::new(tx);
        let dashboard_task = tokio::spawn(dashboard_loop(Arc::clone(&service), Arc::clone(&tx)));
        let status_task = tokio::spawn(status_loop(service, tx));
        Self {
            rx,
            dashboard_task,
            status_task,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.rx.clone()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.dashboard_task.abort();
        self.status_task.abort();
    }
}

async fn dashboard_loop(service: Arc<IntelService>, tx: Arc<watch::Sender<DashboardSnapshot>>) {
    let mut tick = tokio::time::interval(Duration::from_secs(
        service.config().poll_interval_secs.max(1),
    ));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tick.tick().await;
        refresh_dashboard(&service, &tx).await;
    }
}

async fn status_loop(service: Arc<IntelService>, tx: Arc<watch::Sender<DashboardSnapshot>>) {
    let mut tick = tokio::time::interval(Duration::from_secs(
        service.config().status_interval_secs.max(1),
    ));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tick.tick().await;
        match service.status().await {
            Ok(status) => tx.send_modify(|snap| snap.status = Some(status)),
            Err(err) => warn!("status refresh failed, keeping previous value: {err}"),
        }
    }
}

/// One dashboard cycle: the four views fetch concurrently, then each
/// section is applied on its own. Propagate-mode sections are caught here,
/// at the caller, so one section's outage never blocks the others.
async fn refresh_dashboard(service: &IntelService, tx: &watch::Sender<DashboardSnapshot>) {
    let (threats, apt_groups, predictions, timeline) = tokio::join!(
        service.threats(),
        service.apt_groups(),
        service.predictions(),
        service.timeline(),
    );

    match threats {
        Ok(threats) => tx.send_modify(|snap| snap.threats = threats),
        Err(err) => warn!("threat refresh failed: {err}"),
    }
    match apt_groups {
        Ok(groups) => tx.send_modify(|snap| snap.apt_groups = groups),
        Err(err) => warn!("APT refresh failed, keeping previous groups: {err}"),
    }
    match predictions {
        Ok(predictions) => tx.send_modify(|snap| snap.predictions = predictions),
        Err(err) => warn!("prediction refresh failed, keeping previous set: {err}"),
    }
    match timeline {
        Ok(timeline) => tx.send_modify(|snap| snap.timeline = timeline),
        Err(err) => warn!("timeline refresh failed: {err}"),
    }

    tx.send_modify(|snap| snap.refreshed_at = Some(now_utc()));
    debug!("dashboard snapshot refreshed");
}

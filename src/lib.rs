//! Threat-intelligence feed aggregation for the vigil dashboard.
//!
//! Raw records flow one way: the feed client pulls the NVD listing and the
//! ATT&CK bundle, the pipeline normalizes them into display-ready records,
//! and [`service::IntelService`] exposes the five dashboard queries. The
//! optional [`poller::Poller`] re-runs the whole thing on two timers.

pub mod config;
pub mod core;
pub mod pipeline;
pub mod poller;
pub mod service;
pub mod sources;

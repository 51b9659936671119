pub mod client;
pub mod mitre;
pub mod nvd;

/// How a fetch failure crosses the service boundary.
///
/// Threat normalization and its derived views (timeline, status) degrade to
/// an empty result so the dashboard stays renderable under partial outages.
/// APT extraction and prediction synthesis surface the failure so callers
/// can distinguish "no groups found" from "fetch failed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    DegradeToEmpty,
    Propagate,
}

#![forbid(unsafe_code)]

//! Render-decision engine: is a re-render warranted?
//!
//! Every candidate update passes through [`render_decision`] before the view
//! is asked to redraw. Suppression is the point: rapid remote updates that
//! produce byte-identical snapshots must not thrash the view layer. All
//! comparisons are structural: remote payloads are freshly deserialized on
//! every callback, so identity comparison would always report "changed".

use crate::config::BindingConfig;
use crate::state::BindingState;

/// The rule that warranted a re-render, in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderReason {
    /// The subscription path changed.
    PathChanged,
    /// The query spec changed structurally.
    QueryChanged,
    /// Loading status moved away from `Pending`.
    LeftPending,
    /// A pass-through property changed structurally.
    PropsChanged,
    /// The data snapshot changed structurally.
    DataChanged,
}

impl std::fmt::Display for RenderReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::PathChanged => "path changed",
            Self::QueryChanged => "query changed",
            Self::LeftPending => "left pending",
            Self::PropsChanged => "props changed",
            Self::DataChanged => "data changed",
        };
        f.write_str(label)
    }
}

/// Decide whether the transition from (`prev_config`, `prev_state`) to
/// (`next_config`, `next_state`) warrants a re-render.
///
/// Rules are checked in priority order, first match wins: path, query,
/// status leaving `Pending`, pass-through props, data. `None` means the view
/// layer is left alone.
#[must_use]
pub fn render_decision(
    prev_config: &BindingConfig,
    next_config: &BindingConfig,
    prev_state: &BindingState,
    next_state: &BindingState,
) -> Option<RenderReason> {
    if prev_config.path != next_config.path {
        return Some(RenderReason::PathChanged);
    }
    if prev_config.query != next_config.query {
        return Some(RenderReason::QueryChanged);
    }
    if prev_state.status().is_pending() && !next_state.status().is_pending() {
        return Some(RenderReason::LeftPending);
    }
    if prev_config.props != next_config.props {
        return Some(RenderReason::PropsChanged);
    }
    if prev_state.data() != next_state.data() {
        return Some(RenderReason::DataChanged);
    }
    None
}

/// [`render_decision`] collapsed to a bool.
#[must_use]
pub fn should_render(
    prev_config: &BindingConfig,
    next_config: &BindingConfig,
    prev_state: &BindingState,
    next_state: &BindingState,
) -> bool {
    render_decision(prev_config, next_config, prev_state, next_state).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use treebind_core::{QuerySpec, Snapshot};

    fn live_state(value: serde_json::Value) -> BindingState {
        let mut state = BindingState::pending();
        state.apply_live(Snapshot::from_remote(Some(value)));
        state
    }

    #[test]
    fn unchanged_everything_suppresses() {
        let config = BindingConfig::new("p").prop("k", json!(1));
        let state = live_state(json!({"a": 1}));
        // Distinct clones: equality must be structural, not identity.
        assert_eq!(
            render_decision(&config, &config.clone(), &state, &state.clone()),
            None
        );
    }

    #[test]
    fn path_change_fires_first() {
        let prev = BindingConfig::new("a").prop("k", json!(1));
        let next = BindingConfig::new("b").prop("k", json!(2));
        let state = BindingState::pending();
        assert_eq!(
            render_decision(&prev, &next, &state, &state),
            Some(RenderReason::PathChanged)
        );
    }

    #[test]
    fn query_change_fires_before_state_rules() {
        let prev = BindingConfig::new("a");
        let next = BindingConfig::new("a").query(QuerySpec::new().order_by_value());
        assert_eq!(
            render_decision(
                &prev,
                &next,
                &BindingState::pending(),
                &live_state(json!({}))
            ),
            Some(RenderReason::QueryChanged)
        );
    }

    #[test]
    fn leaving_pending_warrants_render_even_with_equal_data() {
        let config = BindingConfig::new("a");
        // Pending with no data vs Live with empty data.
        assert_eq!(
            render_decision(
                &config,
                &config,
                &BindingState::pending(),
                &live_state(json!({}))
            ),
            Some(RenderReason::LeftPending)
        );
    }

    #[test]
    fn prop_change_warrants_render() {
        let prev = BindingConfig::new("a").prop("color", json!("red"));
        let next = BindingConfig::new("a").prop("color", json!("blue"));
        let state = live_state(json!({"a": 1}));
        assert_eq!(
            render_decision(&prev, &next, &state, &state),
            Some(RenderReason::PropsChanged)
        );
    }

    #[test]
    fn data_change_warrants_render() {
        let config = BindingConfig::new("a");
        assert_eq!(
            render_decision(
                &config,
                &config,
                &live_state(json!({"a": 1})),
                &live_state(json!({"a": 2}))
            ),
            Some(RenderReason::DataChanged)
        );
    }

    #[test]
    fn identical_live_payloads_suppress() {
        let config = BindingConfig::new("a");
        assert_eq!(
            render_decision(
                &config,
                &config,
                &live_state(json!({"a": 1})),
                &live_state(json!({"a": 1}))
            ),
            None
        );
    }

    #[test]
    fn cache_to_live_with_equal_data_suppresses() {
        // FromCache -> Live is not "leaving Pending" and data is unchanged.
        let config = BindingConfig::new("a");
        let mut cached = BindingState::pending();
        cached.apply_cache_hit(Snapshot::from_remote(Some(json!({"a": 1}))));
        let live = live_state(json!({"a": 1}));
        assert_eq!(render_decision(&config, &config, &cached, &live), None);
    }
}

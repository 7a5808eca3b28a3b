#![forbid(unsafe_code)]

//! The view seam: what a binding renders into.
//!
//! The rendering framework is opaque to the engine. A [`View`] receives an
//! immutable property bag and produces whatever output type the host's
//! framework wants; the engine never inspects it.

use std::collections::BTreeMap;

use serde_json::Value;
use treebind_core::Snapshot;

/// Pass-through property bag, keyed by property name.
pub type Props = BTreeMap<String, Value>;

/// Properties handed to the wrapped view once data is available: the current
/// snapshot plus every pass-through property from the binding config.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewProps {
    pub data: Snapshot,
    pub props: Props,
}

/// An opaque renderable component.
pub trait View {
    type Output;

    /// Produce output for the given properties.
    fn render(&self, props: &ViewProps) -> Self::Output;
}

/// Rendered in place of the wrapped view while the binding is `Pending`.
/// Receives only the pass-through props; there is no data yet.
pub type Loader<O> = Box<dyn Fn(&Props) -> O>;

impl<O, F> View for F
where
    F: Fn(&ViewProps) -> O,
{
    type Output = O;

    fn render(&self, props: &ViewProps) -> O {
        self(props)
    }
}

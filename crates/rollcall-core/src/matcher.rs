//! Probe-to-registry matching.

use crate::registry::Registry;
use crate::types::Embedding;

/// Default Euclidean distance tolerance for a positive match.
///
/// Shared by the matcher and the approximate-membership caches; a single
/// knob, configurable at the daemon level.
pub const DEFAULT_TOLERANCE: f32 = 0.6;

/// Strategy for resolving a probe embedding against the registry.
pub trait Matcher {
    /// Returns the matched name, or `None` when the probe is unknown.
    fn resolve<'a>(&self, probe: &Embedding, registry: &'a Registry, tolerance: f32)
        -> Option<&'a str>;
}

/// First-match-wins Euclidean matcher.
///
/// Scans the registry in insertion order and returns the first name whose
/// embedding lies within `tolerance`. Later, possibly closer, entries are
/// ignored. This is a deliberate simplicity/cost trade-off, preserved as
/// given behavior; it is not a globally-closest-match search.
pub struct FirstMatch;

impl Matcher for FirstMatch {
    fn resolve<'a>(
        &self,
        probe: &Embedding,
        registry: &'a Registry,
        tolerance: f32,
    ) -> Option<&'a str> {
        registry
            .iter()
            .find(|(_, embedding)| probe.within(embedding, tolerance))
            .map(|(name, _)| name)
    }
}

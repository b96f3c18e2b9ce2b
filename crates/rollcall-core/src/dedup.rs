//! Three differently-scoped membership caches that keep one physical face
//! from being prompted or logged more than once.
//!
//! `SessionSeen` and `PromptSuppression` test membership by approximate
//! equality (an O(n) distance scan), because probe embeddings are never
//! bit-identical across frames. `LogCooldown` keys on names, which are
//! categorical, so it gets an exact O(1) lookup.

use crate::types::Embedding;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// How long a prompt suppresses re-prompting for the same face.
pub const PROMPT_TTL: Duration = Duration::from_secs(5);

/// Rolling window in which a name gets at most one ledger write.
pub const LOG_COOLDOWN_WINDOW: Duration = Duration::from_secs(300);

/// Embeddings already resolved to a name in this run.
///
/// Entries never expire and never shrink; membership is terminal for the
/// process lifetime.
#[derive(Debug)]
pub struct SessionSeen {
    tolerance: f32,
    seen: Vec<Embedding>,
}

impl SessionSeen {
    pub fn new(tolerance: f32) -> Self {
        Self {
            tolerance,
            seen: Vec::new(),
        }
    }

    pub fn contains(&self, probe: &Embedding) -> bool {
        self.seen.iter().any(|e| probe.within(e, self.tolerance))
    }

    pub fn add(&mut self, embedding: Embedding) {
        self.seen.push(embedding);
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Faces with an outstanding (or recently resolved) registration prompt.
///
/// While an entry is live no new prompt is issued for an approximately
/// equal embedding, even if detection repeats every frame. Expired entries
/// are pruned on each access.
#[derive(Debug)]
pub struct PromptSuppression {
    tolerance: f32,
    ttl: Duration,
    entries: Vec<(Embedding, Instant)>,
}

impl PromptSuppression {
    pub fn new(tolerance: f32, ttl: Duration) -> Self {
        Self {
            tolerance,
            ttl,
            entries: Vec::new(),
        }
    }

    pub fn contains(&mut self, probe: &Embedding, now: Instant) -> bool {
        self.prune(now);
        self.entries
            .iter()
            .any(|(e, _)| probe.within(e, self.tolerance))
    }

    pub fn record(&mut self, embedding: Embedding, now: Instant) {
        self.prune(now);
        self.entries.push((embedding, now));
    }

    fn prune(&mut self, now: Instant) {
        self.entries
            .retain(|(_, at)| now.duration_since(*at) < self.ttl);
    }
}

/// Per-name attendance write cooldown.
#[derive(Debug)]
pub struct LogCooldown {
    window: Duration,
    last: HashMap<String, Instant>,
}

impl LogCooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last: HashMap::new(),
        }
    }

    /// True while the name's last write is still inside the window.
    pub fn contains(&self, name: &str, now: Instant) -> bool {
        self.last
            .get(name)
            .is_some_and(|at| now.duration_since(*at) < self.window)
    }

    pub fn record(&mut self, name: &str, now: Instant) {
        self.last.insert(name.to_string(), now);
    }
}

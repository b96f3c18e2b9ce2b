//! rollcall-core — Face-recognition attendance pipeline.
//!
//! Sits between raw per-frame face detections and durable attendance
//! records: matches probe embeddings against the known-face registry,
//! suppresses duplicate prompts and duplicate ledger writes through three
//! differently-scoped caches, and drives learn-on-the-fly registration of
//! unknown faces.
//!
//! Capture, detection/encoding, prompting and rendering are external
//! collaborators, reached only through the traits in [`collaborators`].

pub mod collaborators;
pub mod dedup;
pub mod ledger;
pub mod matcher;
pub mod pipeline;
pub mod registry;
pub mod types;

pub use collaborators::{CaptureError, EncoderError, FaceEncoder, FrameSource, Prompter, Renderer};
pub use dedup::{LogCooldown, PromptSuppression, SessionSeen};
pub use ledger::AttendanceLedger;
pub use matcher::{FirstMatch, Matcher, DEFAULT_TOLERANCE};
pub use pipeline::{Controller, ControlMsg, PipelineConfig, SharedState, Worker};
pub use registry::{Registry, RegistryError};
pub use types::{Detection, Embedding, Frame, Region};

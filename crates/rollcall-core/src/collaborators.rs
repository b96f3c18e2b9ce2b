//! Boundary traits for the external collaborators: frame capture,
//! detection/encoding, the interactive prompt and the renderer.
//!
//! The core treats all four as opaque. Zero detections from the encoder is
//! a normal outcome, not an error; a declined prompt is `None`.

use crate::types::{Detection, Embedding, Frame, Region};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("device not found: {0}")]
    DeviceNotFound(String),
    #[error("device busy")]
    DeviceBusy,
    #[error("capture failed: {0}")]
    CaptureFailed(String),
}

#[derive(Error, Debug)]
pub enum EncoderError {
    #[error("encoder unavailable: {0}")]
    Unavailable(String),
    #[error("encode failed: {0}")]
    Failed(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of frames. Release of the underlying device happens on drop, so
/// cleanup is guaranteed on every exit path of the capture loop.
pub trait FrameSource {
    /// Next frame, or `None` at end of stream.
    fn read(&mut self) -> Result<Option<Frame>, CaptureError>;
}

/// External face detector/encoder.
pub trait FaceEncoder {
    /// Detect every face in a frame and encode each to an embedding.
    fn detect_and_encode(&mut self, frame: &Frame) -> Result<Vec<Detection>, EncoderError>;

    /// Encode a single still image; `None` when no face is found.
    fn encode(&mut self, frame: &Frame) -> Result<Option<Embedding>, EncoderError>;
}

/// Interactive name prompt. Only ever invoked from the controller context;
/// `None` means the user declined.
pub trait Prompter {
    fn ask(&mut self, prompt: &str) -> Option<String>;
}

/// Presentation sink. `label` is `None` for faces rendered region-only
/// (already resolved or currently being prompted).
pub trait Renderer {
    fn draw(&mut self, frame: &Frame, region: &Region, label: Option<&str>);
    fn display(&mut self, frame: &Frame);
}

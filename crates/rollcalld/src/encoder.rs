//! Client for the external face detection/encoding service.
//!
//! Feature extraction is heavyweight and model-dependent, so it runs out
//! of process; the daemon talks to it over a Unix socket with
//! length-prefixed bincode messages, one request per response.

use rollcall_core::{Detection, Embedding, EncoderError, FaceEncoder, Frame};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;

#[derive(Serialize, Deserialize)]
enum EncodeRequest {
    /// Every face in a live frame.
    DetectAll {
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    },
    /// At most one face from a still image.
    EncodeOne {
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    },
}

#[derive(Serialize, Deserialize)]
enum EncodeResponse {
    Faces(Vec<Detection>),
    Face(Option<Embedding>),
    Error(String),
}

#[derive(Debug)]
pub struct EncoderClient {
    stream: UnixStream,
}

impl EncoderClient {
    pub fn connect(socket_path: &Path) -> Result<Self, EncoderError> {
        let stream = UnixStream::connect(socket_path).map_err(|e| {
            EncoderError::Unavailable(format!("{}: {e}", socket_path.display()))
        })?;
        tracing::info!(socket = %socket_path.display(), "connected to encoder service");
        Ok(Self { stream })
    }

    fn round_trip(&mut self, request: &EncodeRequest) -> Result<EncodeResponse, EncoderError> {
        let payload =
            bincode::serialize(request).map_err(|e| EncoderError::Failed(e.to_string()))?;
        self.stream
            .write_all(&(payload.len() as u32).to_le_bytes())?;
        self.stream.write_all(&payload)?;

        let mut len_buf = [0u8; 4];
        self.stream.read_exact(&mut len_buf)?;
        let mut reply = vec![0u8; u32::from_le_bytes(len_buf) as usize];
        self.stream.read_exact(&mut reply)?;
        bincode::deserialize(&reply).map_err(|e| EncoderError::Failed(e.to_string()))
    }
}

impl FaceEncoder for EncoderClient {
    fn detect_and_encode(&mut self, frame: &Frame) -> Result<Vec<Detection>, EncoderError> {
        let request = EncodeRequest::DetectAll {
            width: frame.width,
            height: frame.height,
            pixels: frame.data.clone(),
        };
        match self.round_trip(&request)? {
            EncodeResponse::Faces(faces) => Ok(faces),
            EncodeResponse::Error(msg) => Err(EncoderError::Failed(msg)),
            EncodeResponse::Face(_) => Err(EncoderError::Failed("unexpected response".into())),
        }
    }

    fn encode(&mut self, frame: &Frame) -> Result<Option<Embedding>, EncoderError> {
        let request = EncodeRequest::EncodeOne {
            width: frame.width,
            height: frame.height,
            pixels: frame.data.clone(),
        };
        match self.round_trip(&request)? {
            EncodeResponse::Face(embedding) => Ok(embedding),
            EncodeResponse::Error(msg) => Err(EncoderError::Failed(msg)),
            EncodeResponse::Faces(_) => Err(EncoderError::Failed("unexpected response".into())),
        }
    }
}

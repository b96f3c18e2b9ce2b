use serde::{Deserialize, Serialize};

/// Pixel-coordinate region of a detected face within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Face embedding vector produced by the external encoder.
///
/// Opaque apart from distance comparison: two embeddings of the same
/// physical face are never bit-identical across frames, so equality is
/// always approximate (Euclidean distance within a tolerance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub values: Vec<f32>,
}

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Euclidean distance to another embedding.
    pub fn euclidean_distance(&self, other: &Embedding) -> f32 {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f32>()
            .sqrt()
    }

    /// Approximate equality: distance within `tolerance`.
    ///
    /// The tolerance is taken as given, never validated; extreme values
    /// degrade to everything-matches or nothing-matches.
    pub fn within(&self, other: &Embedding, tolerance: f32) -> bool {
        self.euclidean_distance(other) <= tolerance
    }
}

/// A captured grayscale frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Grayscale pixel data (width * height bytes).
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// One detected face: where it sits in the frame and what it encodes to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub region: Region,
    pub embedding: Embedding,
}

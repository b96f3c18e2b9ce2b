//! rollcall-hw — V4L2 camera capture for the attendance pipeline.
//!
//! Implements the core's capture collaborator: open a device, read frames
//! as grayscale, release on drop.

pub mod camera;
pub mod convert;

pub use camera::{Camera, PixelFormat};

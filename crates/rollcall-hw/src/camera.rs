//! V4L2 camera device handling via the `v4l` crate.

use crate::convert;
use rollcall_core::{CaptureError, Frame, FrameSource};
use std::path::Path;
use v4l::buffer::Type as BufType;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::FourCC;

/// Negotiated pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// YUYV 4:2:2 packed, 2 bytes per pixel.
    Yuyv,
    /// Native 8-bit grayscale.
    Grey,
}

/// An open V4L2 capture device. The device is released when the camera
/// drops, which covers every exit path of the worker loop.
pub struct Camera {
    device: Device,
    pub width: u32,
    pub height: u32,
    pub device_path: String,
    pixel_format: PixelFormat,
}

impl Camera {
    /// Open a camera by device path (e.g. "/dev/video0") and negotiate a
    /// YUYV or GREY format at 640x480.
    pub fn open(device_path: &str) -> Result<Self, CaptureError> {
        if !Path::new(device_path).exists() {
            return Err(CaptureError::DeviceNotFound(device_path.to_string()));
        }

        let device = Device::with_path(device_path).map_err(|e| {
            if e.to_string().contains("busy") || e.to_string().contains("EBUSY") {
                CaptureError::DeviceBusy
            } else {
                CaptureError::DeviceNotFound(format!("{device_path}: {e}"))
            }
        })?;

        let caps = device
            .query_caps()
            .map_err(|e| CaptureError::CaptureFailed(format!("query capabilities: {e}")))?;
        if !caps
            .capabilities
            .contains(v4l::capability::Flags::VIDEO_CAPTURE)
        {
            return Err(CaptureError::CaptureFailed(
                "device does not support video capture".into(),
            ));
        }

        let mut fmt = device
            .format()
            .map_err(|e| CaptureError::CaptureFailed(format!("get format: {e}")))?;
        fmt.fourcc = FourCC::new(b"YUYV");
        fmt.width = 640;
        fmt.height = 480;

        let negotiated = device
            .set_format(&fmt)
            .map_err(|e| CaptureError::CaptureFailed(format!("set format: {e}")))?;

        let pixel_format = if negotiated.fourcc == FourCC::new(b"YUYV") {
            PixelFormat::Yuyv
        } else if negotiated.fourcc == FourCC::new(b"GREY") {
            PixelFormat::Grey
        } else {
            return Err(CaptureError::CaptureFailed(format!(
                "unsupported pixel format {:?} (need YUYV or GREY)",
                negotiated.fourcc
            )));
        };

        tracing::info!(
            device = device_path,
            driver = %caps.driver,
            card = %caps.card,
            width = negotiated.width,
            height = negotiated.height,
            format = ?pixel_format,
            "camera opened"
        );

        Ok(Self {
            device,
            width: negotiated.width,
            height: negotiated.height,
            device_path: device_path.to_string(),
            pixel_format,
        })
    }

    fn grab(&mut self) -> Result<Frame, CaptureError> {
        let mut stream = MmapStream::with_buffers(&self.device, BufType::VideoCapture, 4)
            .map_err(|e| CaptureError::CaptureFailed(format!("create mmap stream: {e}")))?;

        let (buf, _meta) = stream
            .next()
            .map_err(|e| CaptureError::CaptureFailed(format!("dequeue buffer: {e}")))?;

        let pixels = (self.width * self.height) as usize;
        let data = match self.pixel_format {
            PixelFormat::Grey => {
                if buf.len() < pixels {
                    return Err(CaptureError::CaptureFailed(format!(
                        "GREY buffer too short: expected {pixels}, got {}",
                        buf.len()
                    )));
                }
                buf[..pixels].to_vec()
            }
            PixelFormat::Yuyv => convert::yuyv_to_grayscale(buf, self.width, self.height)?,
        };

        Ok(Frame {
            data,
            width: self.width,
            height: self.height,
        })
    }
}

impl FrameSource for Camera {
    /// A webcam never signals end-of-stream; read failures surface as
    /// errors and end the capture loop.
    fn read(&mut self) -> Result<Option<Frame>, CaptureError> {
        self.grab().map(Some)
    }
}

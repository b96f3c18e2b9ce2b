//! Pixel format conversion.

use rollcall_core::CaptureError;

/// Convert packed YUYV (4:2:2) to grayscale by extracting the Y channel.
///
/// YUYV packs two pixels per 4 bytes: [Y0, U, Y1, V]; grayscale is every
/// even-indexed byte.
pub fn yuyv_to_grayscale(yuyv: &[u8], width: u32, height: u32) -> Result<Vec<u8>, CaptureError> {
    let expected = (width * height * 2) as usize;
    if yuyv.len() < expected {
        return Err(CaptureError::CaptureFailed(format!(
            "YUYV buffer too short: expected {expected}, got {}",
            yuyv.len()
        )));
    }
    Ok(yuyv[..expected].iter().step_by(2).copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yuyv_extracts_y_channel() {
        // 2x1 image: [Y0=50, U, Y1=200, V]
        let yuyv = [50, 128, 200, 128];
        assert_eq!(yuyv_to_grayscale(&yuyv, 2, 1).unwrap(), vec![50, 200]);
    }

    #[test]
    fn test_yuyv_ignores_trailing_bytes() {
        let yuyv = [50, 128, 200, 128, 9, 9];
        assert_eq!(yuyv_to_grayscale(&yuyv, 2, 1).unwrap(), vec![50, 200]);
    }

    #[test]
    fn test_yuyv_short_buffer_is_error() {
        assert!(yuyv_to_grayscale(&[50, 128], 2, 1).is_err());
    }
}

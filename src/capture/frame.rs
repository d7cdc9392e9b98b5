//! Camera frames and frame sources

use std::time::Instant;

use crate::error::Result;

/// Camera frame data
#[derive(Clone, Debug)]
pub struct CaptureFrame {
    /// RGBA pixel data
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Frame number
    pub frame_number: u64,
    /// Capture timestamp
    pub timestamp: Instant,
}

impl CaptureFrame {
    /// Create a downscaled copy of the frame for inference
    pub fn downscale(&self, target_width: u32, target_height: u32) -> Vec<u8> {
        if self.width == target_width && self.height == target_height {
            return self.data.clone();
        }

        let mut output = vec![0u8; (target_width * target_height * 4) as usize];
        if target_width == 0 || target_height == 0 {
            return output;
        }
        let x_ratio = self.width as f32 / target_width as f32;
        let y_ratio = self.height as f32 / target_height as f32;

        for y in 0..target_height {
            for x in 0..target_width {
                let src_x = (x as f32 * x_ratio) as u32;
                let src_y = (y as f32 * y_ratio) as u32;
                let src_idx = ((src_y * self.width + src_x) * 4) as usize;
                let dst_idx = ((y * target_width + x) * 4) as usize;

                if src_idx + 3 < self.data.len() {
                    output[dst_idx..dst_idx + 4].copy_from_slice(&self.data[src_idx..src_idx + 4]);
                }
            }
        }

        output
    }
}

/// Something that yields camera frames on demand
///
/// Implementations own the capture device. `open` may fail (no device,
/// permission denied); the pipeline then degrades to "no hand".
pub trait FrameSource {
    /// Acquire the device
    fn open(&mut self) -> Result<()>;

    /// Most recent frame, if a new one is available
    fn latest_frame(&mut self) -> Option<CaptureFrame>;

    /// Release the device. Must tolerate repeated calls.
    fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downscale_samples_nearest() {
        // 2x2 frame, one distinct color per pixel
        let frame = CaptureFrame {
            data: vec![
                1, 1, 1, 255, 2, 2, 2, 255, //
                3, 3, 3, 255, 4, 4, 4, 255,
            ],
            width: 2,
            height: 2,
            frame_number: 0,
            timestamp: Instant::now(),
        };
        let small = frame.downscale(1, 1);
        assert_eq!(small, vec![1, 1, 1, 255]);
        assert_eq!(frame.downscale(2, 2), frame.data);
    }
}

//! Synthetic video source
//!
//! Generates deterministic flat-shade frames in-process, so the player can
//! run headless (dry runs, demos) and tests can exercise end-of-stream
//! looping without any media files on disk.

use crate::video::{Frame, SourceFactory, VideoSource};
use crate::utils::error::Result;
use std::path::Path;

const FRAME_WIDTH: u32 = 32;
const FRAME_HEIGHT: u32 = 18;

/// A finite sequence of generated frames at a fixed frame rate
pub struct SyntheticSource {
    fps: f64,
    frame_count: u32,
    cursor: u32,
    shade: u8,
}

impl SyntheticSource {
    /// Create a source producing `frame_count` frames at `fps`, shaded by a
    /// per-source base value so frames from different sources differ
    pub fn new(fps: f64, frame_count: u32, shade: u8) -> Self {
        Self {
            fps,
            frame_count,
            cursor: 0,
            shade,
        }
    }
}

impl VideoSource for SyntheticSource {
    fn frame_rate(&self) -> f64 {
        self.fps
    }

    fn read_next_frame(&mut self) -> Result<Option<Frame>> {
        if self.cursor >= self.frame_count {
            return Ok(None);
        }

        let value = self.shade.wrapping_add((self.cursor % 251) as u8);
        let data = vec![value; (FRAME_WIDTH * FRAME_HEIGHT * 3) as usize];
        self.cursor += 1;

        Ok(Some(Frame::new(FRAME_WIDTH, FRAME_HEIGHT, data)))
    }

    fn restart(&mut self) -> Result<()> {
        self.cursor = 0;
        Ok(())
    }
}

/// Factory handing out [`SyntheticSource`]s regardless of the path content
pub struct SyntheticFactory {
    fps: f64,
    frame_count: u32,
}

impl SyntheticFactory {
    pub fn new(fps: f64, frame_count: u32) -> Self {
        Self { fps, frame_count }
    }
}

impl Default for SyntheticFactory {
    fn default() -> Self {
        // A couple of seconds of frames; short sources exercise looping
        Self::new(30.0, 60)
    }
}

impl SourceFactory for SyntheticFactory {
    fn open(&self, path: &Path) -> Result<Box<dyn VideoSource>> {
        // Derive the shade from the path so each exercise looks distinct
        let shade = path
            .as_os_str()
            .as_encoded_bytes()
            .iter()
            .fold(0u8, |acc, b| acc.wrapping_add(*b));

        Ok(Box::new(SyntheticSource::new(
            self.fps,
            self.frame_count,
            shade,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_is_finite_and_restartable() {
        let mut source = SyntheticSource::new(30.0, 2, 7);

        assert!(source.read_next_frame().unwrap().is_some());
        assert!(source.read_next_frame().unwrap().is_some());
        assert!(source.read_next_frame().unwrap().is_none());

        source.restart().unwrap();
        assert!(source.read_next_frame().unwrap().is_some());
    }

    #[test]
    fn test_frames_vary_within_a_source() {
        let mut source = SyntheticSource::new(30.0, 2, 0);
        let a = source.read_next_frame().unwrap().unwrap();
        let b = source.read_next_frame().unwrap().unwrap();
        assert_ne!(a.data[0], b.data[0]);
    }

    #[test]
    fn test_factory_reports_configured_rate() {
        let factory = SyntheticFactory::new(24.0, 10);
        let source = factory.open(Path::new("squats.mp4")).unwrap();
        assert_eq!(source.frame_rate(), 24.0);
    }
}

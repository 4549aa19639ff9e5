//! Video source contracts for fitplayer
//!
//! Decoding itself is delegated to whatever capability sits behind the
//! [`VideoSource`] trait. The playback engine only ever asks for the next
//! frame, a restart from the beginning, and the source's frame rate; a
//! source is released by dropping it.

mod synthetic;

pub use synthetic::{SyntheticFactory, SyntheticSource};

use crate::utils::error::Result;
use std::path::Path;

/// One decoded video frame, tightly packed RGB8
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame width in pixels
    pub width: u32,

    /// Frame height in pixels
    pub height: u32,

    /// Pixel data, `width * height * 3` bytes, row-major RGB
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width * height * 3) as usize);
        Self {
            width,
            height,
            data,
        }
    }
}

/// Sequential frame access over one open video file
///
/// The handle is exclusively owned by the segment worker while a segment is
/// in progress; releasing it is `Drop`.
pub trait VideoSource: Send {
    /// Frames per second the source reports, or 0.0 if unknown
    fn frame_rate(&self) -> f64;

    /// Read the next frame; `Ok(None)` signals end of stream
    fn read_next_frame(&mut self) -> Result<Option<Frame>>;

    /// Rewind to the first frame
    fn restart(&mut self) -> Result<()>;
}

/// Opens video sources for the engine, one per exercise
pub trait SourceFactory: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn VideoSource>>;
}

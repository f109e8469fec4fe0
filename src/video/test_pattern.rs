use crate::{
    error::{Result, SourceError},
    video::source::{SourceReadiness, VideoSource},
    video::types::{Frame, CHANNELS},
};

/// Synthetic animated source: scrolling color gradient over checkerboard bars
///
/// Stands in for a camera when none is attached. It can be scripted to warm up
/// slowly, switch resolution and drop out, which is how camera quirks show up
/// to the render loop.
#[derive(Debug, Clone)]
pub struct TestPatternSource {
    width: u32,
    height: u32,
    frames_drawn: u64,
    polls: u64,
    warmup_polls: u64,
    resize: Option<(u64, u32, u32)>,
    loss_after: Option<u64>,
}

impl TestPatternSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frames_drawn: 0,
            polls: 0,
            warmup_polls: 0,
            resize: None,
            loss_after: None,
        }
    }

    /// Report not-ready for the first `polls` readiness checks
    pub fn with_warmup(mut self, polls: u64) -> Self {
        self.warmup_polls = polls;
        self
    }

    /// Switch native resolution once `frames` frames have been drawn
    pub fn with_resize_after(mut self, frames: u64, width: u32, height: u32) -> Self {
        self.resize = Some((frames, width, height));
        self
    }

    /// Report the source as lost once `frames` frames have been drawn
    pub fn with_loss_after(mut self, frames: u64) -> Self {
        self.loss_after = Some(frames);
        self
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    fn is_lost(&self) -> bool {
        self.loss_after.is_some_and(|after| self.frames_drawn >= after)
    }
}

impl VideoSource for TestPatternSource {
    fn readiness(&mut self) -> SourceReadiness {
        self.polls += 1;
        if self.is_lost() {
            SourceReadiness::Lost
        } else if self.polls <= self.warmup_polls {
            SourceReadiness::NotReady
        } else {
            SourceReadiness::Ready
        }
    }

    fn native_dimensions(&self) -> Option<(u32, u32)> {
        match self.resize {
            Some((after, width, height)) if self.frames_drawn >= after => Some((width, height)),
            _ => Some((self.width, self.height)),
        }
    }

    fn draw_into(&mut self, frame: &mut Frame) -> Result<()> {
        if self.is_lost() {
            return Err(SourceError::Lost {
                reason: "test pattern ended".to_string(),
            }
            .into());
        }

        let (width, height) = frame.dimensions();
        let row_bytes = frame.row_bytes();
        let shift = (self.frames_drawn * 3) as u32;

        for (y, row) in frame.pixels_mut().chunks_exact_mut(row_bytes).enumerate() {
            let y = y as u32;
            let green = (y * 255 / height.max(2).saturating_sub(1)) as u8;
            for (x, pixel) in row.chunks_exact_mut(CHANNELS).enumerate() {
                let x = x as u32;
                let red = ((x * 255 / width.max(2).saturating_sub(1)).wrapping_add(shift) % 256) as u8;
                let bar = ((x + shift) / 16 + y / 16) % 2 == 0;
                pixel[0] = red;
                pixel[1] = green;
                pixel[2] = if bar { 220 } else { 40 };
                pixel[3] = 255;
            }
        }

        self.frames_drawn += 1;
        Ok(())
    }
}

use crate::ppu::buffer::FrameBuffer;
use crate::ppu::misc::Shade;

/// Receives the finished raster, once per frame at V-blank entry. The sink
/// must not hold on to the buffer across calls; the PPU starts composing
/// the next frame into it as soon as `present` returns.
pub trait FrameSink {
    fn present(&mut self, frame: &FrameBuffer);
}

/// A sink that drops every frame. Useful for tests and headless runs.
#[derive(Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _frame: &FrameBuffer) {}
}

/// Owns the raster buffer and hands it to the host sink at V-blank.
pub struct Display {
    buffer: FrameBuffer,
    sink: Box<dyn FrameSink>,
    frames: u64,
}

impl Display {
    pub fn new(sink: Box<dyn FrameSink>) -> Self {
        Self {
            buffer: FrameBuffer::new(),
            sink,
            frames: 0,
        }
    }

    /// Writes a pixel at the given screen coordinates.
    #[inline]
    pub fn write_pixel(&mut self, x: u8, y: u8, shade: Shade) {
        self.buffer.write_pixel(x, y, shade);
    }

    /// Presents the finished frame to the host.
    pub fn send_frame(&mut self) {
        self.frames += 1;
        self.sink.present(&self.buffer);
    }

    /// Frames presented since power-on.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The current raster contents.
    #[inline]
    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }
}

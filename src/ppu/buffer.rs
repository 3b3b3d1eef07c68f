use crate::ppu::misc::Shade;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Size of one finished frame in bytes.
pub const FRAME_SIZE: usize =
    SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize * BYTES_PER_PIXEL;

/// The 160x144 raster the PPU composes into: row-major, top-left origin,
/// eight bits per channel, alpha always 255.
#[derive(Clone)]
pub struct FrameBuffer {
    data: Vec<u8>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            data: vec![0xFF; FRAME_SIZE],
        }
    }

    /// Writes one pixel. All channels carry the same grayscale intensity.
    #[inline]
    pub fn write_pixel(&mut self, x: u8, y: u8, shade: Shade) {
        let offset = (usize::from(y) * usize::from(SCREEN_WIDTH) + usize::from(x)) * BYTES_PER_PIXEL;
        let intensity = shade.intensity();
        self.data[offset..offset + BYTES_PER_PIXEL]
            .copy_from_slice(&[intensity, intensity, intensity, 0xFF]);
    }

    /// Returns the RGBA channels of one pixel.
    #[inline]
    pub fn pixel(&self, x: u8, y: u8) -> [u8; BYTES_PER_PIXEL] {
        let offset = (usize::from(y) * usize::from(SCREEN_WIDTH) + usize::from(x)) * BYTES_PER_PIXEL;
        let mut pixel = [0; BYTES_PER_PIXEL];
        pixel.copy_from_slice(&self.data[offset..offset + BYTES_PER_PIXEL]);
        pixel
    }

    /// The raw raster bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

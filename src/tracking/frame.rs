/// One captured video frame, tightly packed RGB8
///
/// Frames are read-only to the estimator and dropped after a single pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RawFrame {
    pub const CHANNELS: usize = 3;

    /// Wrap an RGB buffer; returns None when the buffer is shorter than width * height * 3
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() < Self::byte_len(width, height) {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from BGR bytes as delivered by most capture APIs
    pub fn from_bgr(width: u32, height: u32, bgr: &[u8]) -> Option<Self> {
        let len = Self::byte_len(width, height);
        if bgr.len() < len {
            return None;
        }
        let pixels = bgr[..len]
            .chunks_exact(Self::CHANNELS)
            .flat_map(|px| [px[2], px[1], px[0]])
            .collect();
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Single-color frame, mostly useful for tests and benchmarks
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = rgb
            .iter()
            .copied()
            .cycle()
            .take(Self::byte_len(width, height))
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// RGB triple at (x, y); None outside the frame
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// Tightly packed RGB bytes, row by row
    pub fn pixels(&self) -> &[u8] {
        &self.pixels[..Self::byte_len(self.width, self.height)]
    }

    /// Left-right flipped copy, as the user sees themselves in a mirror
    pub fn mirrored(&self) -> RawFrame {
        let row_len = self.width as usize * Self::CHANNELS;
        let pixels = if row_len == 0 {
            Vec::new()
        } else {
            self.pixels()
                .chunks_exact(row_len)
                .flat_map(|row| row.chunks_exact(Self::CHANNELS).rev().flatten().copied())
                .collect()
        };
        RawFrame {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    /// Paint an axis-aligned rectangle, clipped to the frame
    pub fn fill_rect(&mut self, x0: u32, y0: u32, w: u32, h: u32, rgb: [u8; 3]) {
        let x1 = x0.saturating_add(w).min(self.width);
        let y1 = y0.saturating_add(h).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let i = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
                self.pixels[i..i + Self::CHANNELS].copy_from_slice(&rgb);
            }
        }
    }

    fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * Self::CHANNELS
    }
}

//! RGBA8 render target with a depth buffer.

#[derive(Debug, Clone, PartialEq)]
pub struct IdTarget {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    depth: Vec<f64>,
}

impl IdTarget {
    pub fn new(width: u32, height: u32) -> Self {
        let count = (width as usize) * (height as usize);
        let mut target = Self {
            width,
            height,
            pixels: vec![0; count * 4],
            depth: vec![0.0; count],
        };
        target.clear();
        target
    }

    /// Reset to the ocean id (0) and maximum depth.
    pub fn clear(&mut self) {
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[0, 0, 0, 255]);
        }
        self.depth.fill(f64::INFINITY);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    pub fn depth_at(&self, x: u32, y: u32) -> f64 {
        self.depth[self.index(x, y)]
    }

    /// Write a pixel if it passes the depth test.
    pub fn write_if_nearer(&mut self, x: u32, y: u32, depth: f64, rgba: [u8; 4]) -> bool {
        let i = self.index(x, y);
        if depth < self.depth[i] {
            self.depth[i] = depth;
            self.pixels[i * 4..i * 4 + 4].copy_from_slice(&rgba);
            true
        } else {
            false
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y as usize) * (self.width as usize) + (x as usize)
    }
}

//! Background canvas sizing
//!
//! Backgrounds are allocated in blocks of 256 pixels. Graphics layers are
//! stacked vertically in a single canvas.

/// Allocation granularity of background dimensions, in pixels
pub const BLOCK_SIZE: u32 = 256;

/// Round a size up to the next multiple of [`BLOCK_SIZE`]
pub fn round_to_block(size: u32) -> u32 {
    if size % BLOCK_SIZE == 0 {
        size
    } else {
        (size / BLOCK_SIZE + 1) * BLOCK_SIZE
    }
}

/// Size of the background canvas of a map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    /// Height of a single graphics layer
    pub layer_height: u32,
    /// Number of stacked graphics layers
    pub layers: u32,
}

impl CanvasSize {
    /// Canvas for a map of the given pixel size with `layers` graphics layers
    pub fn for_map(width: u32, height: u32, layers: u32) -> Self {
        Self {
            width: round_to_block(width),
            layer_height: round_to_block(height),
            layers,
        }
    }

    /// Total height of the stacked canvas
    pub fn height(&self) -> u32 {
        self.layer_height * self.layers
    }

    /// Vertical offset of a graphics layer in the canvas
    pub fn layer_offset(&self, layer: u32) -> u32 {
        layer * self.layer_height
    }
}

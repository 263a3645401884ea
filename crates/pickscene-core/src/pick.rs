//! Picking readback types.

/// One texel of the picking target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct PixelInfo {
    /// Object id tag of the closest fragment, 0 where nothing was drawn.
    pub object_id: u32,
    /// 1-based position of the drawing request within its flush.
    pub draw_id: u32,
    /// Reserved, written as 0.
    pub primitive_id: u32,
}

impl PixelInfo {
    /// A background texel.
    pub const BACKGROUND: PixelInfo = PixelInfo {
        object_id: 0,
        draw_id: 0,
        primitive_id: 0,
    };

    /// Returns true if no object covered this texel.
    pub fn is_background(&self) -> bool {
        self.object_id == 0
    }
}

/// Something that can answer "what is at this pixel".
///
/// Coordinates have their origin at the bottom-left of the framebuffer.
pub trait PickSource {
    /// Error produced by a failed readback.
    type Error;

    /// Reads the texel at `(x, y)`.
    fn pick(&mut self, x: u32, y: u32) -> Result<PixelInfo, Self::Error>;
}

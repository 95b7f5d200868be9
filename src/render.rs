/// Premultiplied RGBA8 compositing helpers.
pub mod composite;
/// Presentation transform applied on top of the shredded surface.
pub mod present;
/// The shredder frame algorithm.
pub mod shred;
/// Pixel buffers, the output surface and rendered frames.
pub mod surface;

/// Backend-agnostic settings.
#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// If set, the surface is cleared to this premultiplied RGBA8 color before drawing.
    /// `None` clears to transparent.
    pub clear_rgba: Option<[u8; 4]>,
}

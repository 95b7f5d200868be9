/// Image decoding into premultiplied RGBA8.
pub mod decode;
/// Sheet preparation: background plus fitted user image.
pub mod load;

use std::sync::Arc;

/// A decoded image ready for compositing.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

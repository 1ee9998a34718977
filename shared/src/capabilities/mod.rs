//! Shell-side collaborators, one capability each.

mod media;
mod navigator;
mod sharing;
mod uploader;

pub use self::media::{
    AspectRatio, Media, MediaError, MediaOperation, MediaOutput, MediaResult, PickConfig,
};
pub use self::navigator::{Navigator, NavigatorOperation};
pub use self::sharing::{ShareError, ShareOperation, ShareOutput, ShareResult, Sharing};
pub use self::uploader::{Upload, UploadOperation, UploadReceipt, UploadRequest, UploadResult};

// Crux's built-in Render covers view updates; no wrapper needed.
pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub media: Media<Event>,
    pub upload: Upload<Event>,
    pub navigator: Navigator<Event>,
    pub sharing: Sharing<Event>,
}

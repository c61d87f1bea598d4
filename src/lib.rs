pub mod card;
pub mod error;
pub mod format;
pub mod media;
pub mod preview;
pub mod sidecar_api;
pub mod transform;

pub use card::{CardRender, DownloadHandler, VideoCard};
pub use media::MediaRecord;

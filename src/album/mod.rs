mod models;
mod payload;
mod validation;

pub use models::{demo_albums, Album, AlbumId, NewAlbum};
pub use payload::UploadPayload;
pub use validation::{validate_album, validate_albums, ValidationError, ValidationResult};

//! Validation for uploaded albums.
//!
//! Runs before anything reaches a store, so a rejected upload never
//! leaves partial data behind.

use super::models::NewAlbum;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Field '{field}' is required but was empty")]
    EmptyField { field: &'static str },

    #[error("Field 'price' must be a non-negative number, got {0}")]
    InvalidPrice(f64),

    #[error("Record at position {position}: {source}")]
    InRecord {
        position: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

pub fn validate_album(album: &NewAlbum) -> ValidationResult<()> {
    if album.title.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "title" });
    }
    if album.artist.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "artist" });
    }
    if !album.price.is_finite() || album.price < 0.0 {
        return Err(ValidationError::InvalidPrice(album.price));
    }
    Ok(())
}

impl NewAlbum {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_album(self)
    }
}

/// Validates every album in a batch, reporting the first offending position.
pub fn validate_albums(albums: &[NewAlbum]) -> ValidationResult<()> {
    for (position, album) in albums.iter().enumerate() {
        album.validate().map_err(|source| ValidationError::InRecord {
            position,
            source: Box::new(source),
        })?;
    }
    Ok(())
}

use super::models::NewAlbum;
use super::validation::{validate_album, validate_albums, ValidationResult};

/// Body of an upload request: either a single album or a list of them.
#[derive(Debug, PartialEq)]
pub enum UploadPayload {
    One(NewAlbum),
    Many(Vec<NewAlbum>),
}

impl UploadPayload {
    /// Tries the body as a single album first, then as a list.
    ///
    /// When neither shape fits, the error from the list attempt is returned.
    pub fn parse(body: &[u8]) -> Result<UploadPayload, String> {
        if let Ok(album) = serde_json::from_slice::<NewAlbum>(body) {
            return Ok(UploadPayload::One(album));
        }
        serde_json::from_slice::<Vec<NewAlbum>>(body)
            .map(UploadPayload::Many)
            .map_err(|err| err.to_string())
    }

    pub fn validate(&self) -> ValidationResult<()> {
        match self {
            UploadPayload::One(album) => validate_album(album),
            UploadPayload::Many(albums) => validate_albums(albums),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            UploadPayload::One(_) => 1,
            UploadPayload::Many(albums) => albums.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_album() {
        let payload =
            UploadPayload::parse(br#"{"title": "Blue Train", "artist": "John Coltrane", "price": 56.99}"#)
                .unwrap();
        assert_eq!(
            payload,
            UploadPayload::One(NewAlbum::new("Blue Train", "John Coltrane", 56.99))
        );
        assert_eq!(payload.len(), 1);
    }

    #[test]
    fn parses_list_of_albums() {
        let payload = UploadPayload::parse(
            br#"[{"title": "A", "artist": "X", "price": 1}, {"title": "B", "artist": "Y", "price": 2.5}]"#,
        )
        .unwrap();
        assert_eq!(
            payload,
            UploadPayload::Many(vec![NewAlbum::new("A", "X", 1.0), NewAlbum::new("B", "Y", 2.5)])
        );
    }

    #[test]
    fn empty_list_is_a_valid_upload() {
        let payload = UploadPayload::parse(b"[]").unwrap();
        assert_eq!(payload, UploadPayload::Many(vec![]));
        assert!(payload.is_empty());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn reports_the_list_attempt_error() {
        // An object that doesn't fit the album shape falls through to the
        // list attempt, which is the error the client gets back.
        let err = UploadPayload::parse(br#"{"title": "Missing fields"}"#).unwrap_err();
        assert!(err.contains("expected a sequence"), "got: {}", err);

        let err = UploadPayload::parse(b"not json").unwrap_err();
        assert!(err.contains("expected ident"), "got: {}", err);
    }

    #[test]
    fn positional_array_is_not_an_album() {
        let err = UploadPayload::parse(br#"["Blue Train", "John Coltrane", 5]"#).unwrap_err();
        assert!(err.contains("expected a map"), "got: {}", err);

        let err = UploadPayload::parse(br#"[["Blue Train", "John Coltrane", 5]]"#).unwrap_err();
        assert!(err.contains("expected a map"), "got: {}", err);

        let err = UploadPayload::parse(b"[1, 2, 3]").unwrap_err();
        assert!(err.contains("expected a map"), "got: {}", err);
    }

    #[test]
    fn rejects_list_with_malformed_record() {
        let err = UploadPayload::parse(br#"[{"title": "A", "artist": "X", "price": "free"}]"#)
            .unwrap_err();
        assert!(err.contains("invalid type"), "got: {}", err);
    }
}

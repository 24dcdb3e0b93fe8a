use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};

/// Multipart form for file upload.
///
/// Every field is optional at the extractor level so a missing field is
/// reported through the same checks, in the same order, as a malformed one.
#[derive(MultipartForm)]
pub struct UploadForm {
    /// The file being uploaded
    pub file: Option<TempFile>,

    /// Client id, only used with a key file
    pub id: Option<Text<String>>,

    /// Decimal Unix timestamp in seconds
    pub ts: Option<Text<String>>,

    /// Hex-encoded HMAC-SHA1 of `ts`
    pub sig: Option<Text<String>>,
}

impl UploadForm {
    pub fn client_id(&self) -> Option<&str> {
        self.id.as_ref().map(|text| text.as_str())
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.ts.as_ref().map(|text| text.as_str())
    }

    pub fn signature(&self) -> Option<&str> {
        self.sig.as_ref().map(|text| text.as_str())
    }
}

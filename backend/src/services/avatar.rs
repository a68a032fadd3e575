//! Avatar images are stored inline as `data:` URLs.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use speakerdrive_shared::profile::validate_avatar;

/// A checked avatar upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    mime: mime::Mime,
    bytes: Vec<u8>,
}

impl Avatar {
    /// Validate size and type. `content_type` may carry parameters
    /// (`image/png; charset=binary`); only the essence is checked.
    pub fn new(bytes: Vec<u8>, content_type: &str) -> Result<Self, String> {
        let mime: mime::Mime = content_type
            .parse()
            .map_err(|_| "File must be an image (JPEG, PNG, or GIF)".to_string())?;
        validate_avatar(bytes.len(), mime.essence_str())?;
        Ok(Self { mime, bytes })
    }

    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime.essence_str(),
            STANDARD.encode(&self.bytes)
        )
    }
}

//! Work item definitions.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::QueueError;

/// Image media types the target page accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Jpeg,
    Png,
}

impl MediaType {
    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "jpg",
            MediaType::Png => "png",
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(MediaType::Jpeg),
            "image/png" => Some(MediaType::Png),
            _ => None,
        }
    }

    /// Media type declared by a file name's extension.
    pub fn from_filename(name: &str) -> Option<Self> {
        let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(MediaType::Jpeg),
            "png" => Some(MediaType::Png),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime())
    }
}

/// Encoded image bytes plus their declared media type.
///
/// Serialized as a `data:<mime>;base64,<payload>` URL so it survives the
/// JSON store, and validated on every read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImagePayload {
    media_type: MediaType,
    data: Vec<u8>,
}

impl ImagePayload {
    pub fn new(media_type: MediaType, data: Vec<u8>) -> Self {
        Self { media_type, data }
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type.mime(), STANDARD.encode(&self.data))
    }

    /// Parse a base64 data URL, rejecting media types outside [`MediaType`].
    pub fn from_data_url(url: &str) -> Result<Self, QueueError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| QueueError::InvalidPayload("missing data: prefix".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| QueueError::InvalidPayload("missing payload separator".to_string()))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| QueueError::InvalidPayload("payload is not base64".to_string()))?;

        let media_type = MediaType::from_mime(mime)
            .ok_or_else(|| QueueError::UnsupportedFormat(mime.to_string()))?;
        let data = STANDARD
            .decode(payload)
            .map_err(|e| QueueError::InvalidPayload(e.to_string()))?;

        Ok(Self { media_type, data })
    }
}

impl TryFrom<String> for ImagePayload {
    type Error = QueueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_data_url(&value)
    }
}

impl From<ImagePayload> for String {
    fn from(payload: ImagePayload) -> Self {
        payload.to_data_url()
    }
}

/// One unit of pending automation work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub image: ImagePayload,
    pub description: String,
    #[serde(default)]
    pub negative_description: String,
}

impl WorkItem {
    pub fn new(image: ImagePayload, description: impl Into<String>) -> Self {
        Self {
            image,
            description: description.into(),
            negative_description: String::new(),
        }
    }

    pub fn with_negative(mut self, negative: impl Into<String>) -> Self {
        self.negative_description = negative.into();
        self
    }

    pub fn has_negative(&self) -> bool {
        !self.negative_description.trim().is_empty()
    }
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::{TIME_FORMAT, TOKEN_BYTES};

/// Media kind derived from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Image media (png, jpg, jpeg, gif).
    Image,

    /// Audio media (mp3, ogg).
    Audio,

    /// Video media (mp4, webm).
    Video,

    /// Plain text or HTML media.
    Text,

    /// Document media (pdf, zip).
    Document,
}

impl MediaKind {
    /// Classify a file extension, lowercased and without the leading dot.
    ///
    /// Returns `None` for extensions outside the allowed upload set.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "png" | "jpg" | "jpeg" | "gif" => Some(Self::Image),
            "mp3" | "ogg" => Some(Self::Audio),
            "mp4" | "webm" => Some(Self::Video),
            "txt" | "html" => Some(Self::Text),
            "pdf" | "zip" => Some(Self::Document),
            _ => None,
        }
    }

    /// Build the data-URI prefix stored in an attachment's `type` field.
    pub fn data_uri_prefix(ext: &str) -> Option<String> {
        let prefix = match ext {
            "png" | "jpg" | "jpeg" | "gif" => format!("data:image/{};base64", ext),
            "mp3" | "ogg" => format!("data:audio/{};base64", ext),
            "mp4" | "webm" => format!("data:video/{};base64", ext),
            "html" => "data:text/html;base64".to_string(),
            "txt" => "data:text/plain;base64".to_string(),
            "pdf" | "zip" => format!("data:application/{};base64", ext),
            _ => return None,
        };
        Some(prefix)
    }

    /// Classify an attachment by its stored data-URI prefix.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.starts_with("data:image/") {
            Self::Image
        } else if content_type.starts_with("data:audio/") {
            Self::Audio
        } else if content_type.starts_with("data:video/") {
            Self::Video
        } else if content_type.starts_with("data:text/") {
            Self::Text
        } else {
            Self::Document
        }
    }
}

/// A media item embedded in a message.
///
/// The payload is carried inline as base64; there is no content-addressed
/// media storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAttachment {
    /// Random hex token identifying the attachment inside its message.
    pub id: String,

    /// Data-URI prefix, e.g. `data:image/png;base64`.
    #[serde(rename = "type")]
    pub content_type: String,

    /// Base64-encoded payload.
    pub data: String,

    /// User-supplied caption, usually the original filename.
    #[serde(default)]
    pub description: String,
}

impl MediaAttachment {
    /// Create an attachment with a fresh id.
    pub fn new(
        content_type: impl Into<String>,
        data: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: hex_token(),
            content_type: content_type.into(),
            data: data.into(),
            description: description.into(),
        }
    }

    /// Assemble the full data URI for rendering.
    pub fn data_uri(&self) -> String {
        format!("{}, {}", self.content_type, self.data)
    }

    /// Media kind derived from the stored content type.
    pub fn kind(&self) -> MediaKind {
        MediaKind::from_content_type(&self.content_type)
    }
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Random hex token identifying the message.
    pub id: String,

    /// Message text.
    pub text: String,

    /// Embedded media, in attachment order.
    #[serde(with = "crate::wire::attachment_map")]
    pub media: Vec<MediaAttachment>,

    /// Author display name.
    pub author: String,

    /// Local wall-clock timestamp, `%Y.%m.%d %H:%M:%S`.
    pub time: String,

    /// Content hash over text and media payloads.
    pub hash: String,
}

impl Message {
    /// Create an empty message with a fresh id and the current timestamp.
    pub fn new() -> Self {
        Self {
            id: hex_token(),
            text: String::new(),
            media: Vec::new(),
            author: String::new(),
            time: now_stamp(),
            hash: String::new(),
        }
    }

    /// Fill in the message content and rehash.
    pub fn write(
        &mut self,
        text: impl Into<String>,
        media: Vec<MediaAttachment>,
        author: impl Into<String>,
    ) {
        self.text = text.into();
        self.media = media;
        self.author = author.into();
        self.update_hash();
    }

    /// Recompute the content hash from the current text and media payloads.
    pub fn update_hash(&mut self) {
        self.hash = content_hash(&self.text, &self.media);
    }

    /// Message identity: two messages are the same iff id and hash match.
    pub fn same_as(&self, other: &Message) -> bool {
        self.id == other.id && self.hash == other.hash
    }

    /// Identity key used for set-difference membership tests.
    pub fn identity(&self) -> (String, String) {
        (self.id.clone(), self.hash.clone())
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

/// Chat document properties carried in the file next to the messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatProperties {
    /// Advisory lock flag; stored and reset but never enforced.
    pub locked: bool,

    /// Last modification timestamp.
    pub modified: String,

    /// Hash over all message hashes in list order.
    pub hash: String,
}

impl Default for ChatProperties {
    fn default() -> Self {
        Self {
            locked: false,
            modified: now_stamp(),
            hash: String::new(),
        }
    }
}

/// Generate a random lowercase hex token.
pub fn hex_token() -> String {
    let mut buf = [0u8; TOKEN_BYTES];
    for byte in &mut buf {
        *byte = fastrand::u8(..);
    }
    hex::encode(buf)
}

/// Current local time in the canonical timestamp format.
pub fn now_stamp() -> String {
    chrono::Local::now().format(TIME_FORMAT).to_string()
}

/// Content hash of a message: text followed by every media payload in
/// attachment order.
pub fn content_hash(text: &str, media: &[MediaAttachment]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    for item in media {
        hasher.update(item.data.as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_token_is_32_lowercase_hex_chars() {
        let token = hex_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(token, hex_token());
    }

    #[test]
    fn content_hash_covers_media_payloads() {
        let text_only = content_hash("hello", &[]);
        let with_media = content_hash(
            "hello",
            &[MediaAttachment::new("data:image/png;base64", "AAAA", "a.png")],
        );
        assert_ne!(text_only, with_media);

        // Same text and payload always hashes the same, regardless of ids.
        let again = content_hash(
            "hello",
            &[MediaAttachment::new("data:image/png;base64", "AAAA", "other.png")],
        );
        assert_eq!(with_media, again);
    }

    #[test]
    fn message_identity_requires_both_id_and_hash() {
        let mut a = Message::new();
        a.write("hi", Vec::new(), "alice");
        let mut b = a.clone();
        assert!(a.same_as(&b));

        b.write("edited", Vec::new(), "alice");
        assert!(!a.same_as(&b));

        let mut c = Message::new();
        c.write("hi", Vec::new(), "alice");
        assert!(!a.same_as(&c));
    }

    #[test]
    fn every_allowed_extension_has_a_data_uri_prefix() {
        for ext in crate::constants::ALLOWED_EXTENSIONS {
            assert!(MediaKind::from_extension(ext).is_some(), "extension {}", ext);
            assert!(MediaKind::data_uri_prefix(ext).is_some(), "extension {}", ext);
        }
    }

    #[test]
    fn media_kind_mapping_matches_allowed_set() {
        assert_eq!(MediaKind::from_extension("png"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_extension("ogg"), Some(MediaKind::Audio));
        assert_eq!(MediaKind::from_extension("webm"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_extension("exe"), None);

        assert_eq!(
            MediaKind::data_uri_prefix("jpg").as_deref(),
            Some("data:image/jpg;base64")
        );
        assert_eq!(
            MediaKind::data_uri_prefix("txt").as_deref(),
            Some("data:text/plain;base64")
        );
        assert_eq!(
            MediaKind::data_uri_prefix("zip").as_deref(),
            Some("data:application/zip;base64")
        );
        assert_eq!(MediaKind::data_uri_prefix("exe"), None);
    }
}

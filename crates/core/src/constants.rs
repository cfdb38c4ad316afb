//! Application constants and configuration defaults.

/// Default HTTP server port.
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Default HTTP server host.
pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";

/// Maximum size for an uploaded media file (10 MB).
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Maximum HTTP request body size (16 MB, leaves room for base64 overhead).
pub const MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

/// Timestamp format used for message times and chat modification stamps.
pub const TIME_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

/// Extension of per-chat document files.
pub const CHAT_FILE_EXT: &str = "json";

/// File extensions accepted by the media upload endpoint.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "mp3", "ogg", "mp4", "webm", "txt", "html", "pdf", "zip",
];

/// Byte length of random id tokens (rendered as twice as many hex chars).
pub const TOKEN_BYTES: usize = 16;

//! On-disk JSON document for a chat.
//!
//! The file stores messages and media as JSON objects keyed by id, and the
//! encounter order of those objects IS the message order. Plain `HashMap`
//! round-trips would scramble it, so both maps go through custom visitors
//! that keep entries in a `Vec`.

use serde::{Deserialize, Serialize};

use crate::types::{ChatProperties, Message};

/// A full per-chat document as written to `<chat_id>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatDocument {
    /// Messages keyed by id, in append order.
    #[serde(with = "message_map")]
    pub messages: Vec<Message>,

    /// Document properties.
    pub properties: ChatProperties,
}

impl ChatDocument {
    /// Empty document with fresh properties; used to seed missing chat files
    /// when no template is configured.
    pub fn empty() -> Self {
        Self {
            messages: Vec::new(),
            properties: ChatProperties::default(),
        }
    }
}

impl Default for ChatDocument {
    fn default() -> Self {
        Self::empty()
    }
}

/// Serde adapter: `Vec<MediaAttachment>` as an id-keyed, order-preserving
/// JSON object.
pub mod attachment_map {
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;

    use crate::types::MediaAttachment;

    #[derive(Serialize)]
    struct BodyRef<'a> {
        #[serde(rename = "type")]
        content_type: &'a str,
        data: &'a str,
        description: &'a str,
    }

    #[derive(Deserialize)]
    struct Body {
        #[serde(rename = "type")]
        content_type: String,
        data: String,
        #[serde(default)]
        description: String,
    }

    pub fn serialize<S>(items: &[MediaAttachment], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(items.len()))?;
        for item in items {
            map.serialize_entry(
                &item.id,
                &BodyRef {
                    content_type: &item.content_type,
                    data: &item.data,
                    description: &item.description,
                },
            )?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<MediaAttachment>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MapVisitor;

        impl<'de> Visitor<'de> for MapVisitor {
            type Value = Vec<MediaAttachment>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of media attachments keyed by id")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut items = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((id, body)) = access.next_entry::<String, Body>()? {
                    items.push(MediaAttachment {
                        id,
                        content_type: body.content_type,
                        data: body.data,
                        description: body.description,
                    });
                }
                Ok(items)
            }
        }

        deserializer.deserialize_map(MapVisitor)
    }
}

/// Serde adapter: `Vec<Message>` as an id-keyed, order-preserving JSON
/// object of message bodies.
pub mod message_map {
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;

    use crate::types::{MediaAttachment, Message};

    #[derive(Serialize)]
    struct BodyRef<'a> {
        text: &'a str,
        #[serde(with = "super::attachment_map")]
        media: &'a [MediaAttachment],
        author: &'a str,
        time: &'a str,
        hash: &'a str,
    }

    #[derive(Deserialize)]
    struct Body {
        #[serde(default)]
        text: String,
        #[serde(default, with = "super::attachment_map")]
        media: Vec<MediaAttachment>,
        #[serde(default)]
        author: String,
        #[serde(default)]
        time: String,
        #[serde(default)]
        hash: String,
    }

    pub fn serialize<S>(items: &[Message], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(items.len()))?;
        for item in items {
            map.serialize_entry(
                &item.id,
                &BodyRef {
                    text: &item.text,
                    media: &item.media,
                    author: &item.author,
                    time: &item.time,
                    hash: &item.hash,
                },
            )?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Message>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MapVisitor;

        impl<'de> Visitor<'de> for MapVisitor {
            type Value = Vec<Message>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of messages keyed by id")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut items = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((id, body)) = access.next_entry::<String, Body>()? {
                    items.push(Message {
                        id,
                        text: body.text,
                        media: body.media,
                        author: body.author,
                        time: body.time,
                        hash: body.hash,
                    });
                }
                Ok(items)
            }
        }

        deserializer.deserialize_map(MapVisitor)
    }
}

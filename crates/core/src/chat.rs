//! In-memory chat state and the inbox synchronization primitive.
//!
//! A [`Chat`] tracks the messages this session already knows about. Syncing
//! against the on-disk document is a set difference keyed by message
//! identity (id + content hash): whatever the file has that the session does
//! not is new inbound traffic and gets absorbed exactly once.

use std::collections::HashSet;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::types::{hex_token, now_stamp, ChatProperties, MediaAttachment, Message};

/// New traffic observed since the last report was taken.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Messages that arrived from the file.
    pub inbox: Vec<Message>,

    /// Messages this session queued for writing.
    pub outbox: Vec<Message>,
}

impl SyncReport {
    /// True when neither direction saw traffic.
    pub fn is_empty(&self) -> bool {
        self.inbox.is_empty() && self.outbox.is_empty()
    }
}

/// A chat session state: known messages, the draft under composition, and
/// the unreported inbound/outbound deltas.
#[derive(Debug, Clone)]
pub struct Chat {
    /// Chat id; doubles as the document file stem.
    pub id: String,

    /// Human-readable chat name.
    pub name: String,

    /// Author name stamped on outbound messages.
    pub author: String,

    /// All messages known to this session, in order.
    pub msgs: Vec<Message>,

    /// The message currently being composed.
    pub draft: Message,

    /// Properties mirrored from the document.
    pub properties: ChatProperties,

    new_inbox: Vec<Message>,
    new_outbox: Vec<Message>,
}

impl Chat {
    /// Create a chat with a fresh random id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(hex_token(), name)
    }

    /// Create a chat bound to an existing id.
    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        let chat = Self {
            id: id.into(),
            name: name.into(),
            author: String::new(),
            msgs: Vec::new(),
            draft: Message::new(),
            properties: ChatProperties::default(),
            new_inbox: Vec::new(),
            new_outbox: Vec::new(),
        };
        debug!(chat = %chat.id, name = %chat.name, "chat initialized");
        chat
    }

    /// Append incoming messages this session has not seen yet.
    ///
    /// Known messages (same id and hash) are skipped; new ones land in both
    /// the message list and the unreported inbox. Returns how many were new.
    pub fn absorb(&mut self, incoming: Vec<Message>) -> usize {
        let mut known: HashSet<(String, String)> =
            self.msgs.iter().map(Message::identity).collect();

        let mut added = 0;
        for msg in incoming {
            if !known.insert(msg.identity()) {
                debug!(chat = %self.id, msg = %msg.id, "message passed");
                continue;
            }
            debug!(chat = %self.id, msg = %msg.id, "message absorbed");
            self.new_inbox.push(msg.clone());
            self.msgs.push(msg);
            added += 1;
        }
        added
    }

    /// Append an outbound message authored by this session.
    pub fn queue(&mut self, msg: Message) {
        debug!(chat = %self.id, msg = %msg.id, text = %msg.text, "message queued");
        self.new_outbox.push(msg.clone());
        self.msgs.push(msg);
    }

    /// Fill the draft with composed content and rehash it.
    pub fn compose(
        &mut self,
        text: impl Into<String>,
        media: Vec<MediaAttachment>,
        author: impl Into<String>,
    ) -> &Message {
        self.draft.write(text, media, author);
        &self.draft
    }

    /// Take the draft for sending, leaving a fresh one in its place.
    pub fn take_draft(&mut self) -> Message {
        std::mem::replace(&mut self.draft, Message::new())
    }

    /// Reset the lock flag, recompute the chat hash, stamp the modification
    /// time.
    pub fn refresh_properties(&mut self) {
        self.properties.locked = false;
        self.properties.hash = chain_hash(&self.msgs);
        self.properties.modified = now_stamp();
        debug!(chat = %self.id, hash = %self.properties.hash, "properties refreshed");
    }

    /// Drain the unreported inbound/outbound deltas.
    ///
    /// Callers render or log the report; once taken, the same traffic is
    /// never reported again.
    pub fn take_report(&mut self) -> SyncReport {
        SyncReport {
            inbox: std::mem::take(&mut self.new_inbox),
            outbox: std::mem::take(&mut self.new_outbox),
        }
    }

    /// Number of inbound messages not yet reported.
    pub fn pending_inbox(&self) -> usize {
        self.new_inbox.len()
    }
}

impl PartialEq for Chat {
    /// Chats compare by property hash, i.e. by message history content.
    fn eq(&self, other: &Self) -> bool {
        self.properties.hash == other.properties.hash
    }
}

/// Messages of `ours` that are missing from `theirs` under (id, hash)
/// identity.
pub fn diff_messages(ours: &[Message], theirs: &[Message]) -> Vec<Message> {
    let known: HashSet<(String, String)> = theirs.iter().map(Message::identity).collect();
    ours.iter()
        .filter(|msg| !known.contains(&msg.identity()))
        .cloned()
        .collect()
}

/// Chat-level hash: digest of every message hash in list order.
pub fn chain_hash(msgs: &[Message]) -> String {
    let mut hasher = Sha256::new();
    for msg in msgs {
        hasher.update(msg.hash.as_bytes());
    }
    hex::encode(hasher.finalize())
}

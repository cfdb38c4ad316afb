//! Per-chat JSON file store.
//!
//! One document file per chat, read and fully rewritten on every save.
//! There is no locking and no transactionality; concurrent writers are
//! reconciled only by merging the file back in before each rewrite
//! (last-write-wins beyond that).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::chat::{diff_messages, Chat};
use crate::constants::CHAT_FILE_EXT;
use crate::error::{Error, Result};
use crate::wire::ChatDocument;

/// File store rooted at a data directory, one `<chat_id>.json` per chat.
#[derive(Debug, Clone)]
pub struct ChatStore {
    root: PathBuf,
    template: Option<PathBuf>,
}

impl ChatStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            template: None,
        }
    }

    /// Use a template document to seed missing chat files instead of the
    /// synthesized empty document.
    pub fn with_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Document path for a chat id.
    pub fn path_for(&self, chat_id: &str) -> Result<PathBuf> {
        validate_chat_id(chat_id)?;
        Ok(self
            .root
            .join(format!("{}.{}", chat_id, CHAT_FILE_EXT)))
    }

    /// Chat ids present in the store, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(CHAT_FILE_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Load the chat's document, seeding a missing file first.
    ///
    /// Every file message is rehashed, unseen ones are absorbed into the
    /// chat, and the chat adopts the document properties. Returns the number
    /// of new inbound messages.
    pub fn load(&self, chat: &mut Chat) -> Result<usize> {
        let path = self.path_for(&chat.id)?;
        if self.seed_if_missing(&path)? {
            info!(chat = %chat.id, "chat file did not exist: created");
        }

        let doc = self.read_document(&path)?;
        let added = chat.absorb(rehashed(doc.messages));
        chat.properties = doc.properties;
        debug!(chat = %chat.id, added, total = chat.msgs.len(), "chat loaded");
        Ok(added)
    }

    /// Poll the document for messages appended by other writers.
    ///
    /// A missing file means nothing to merge. Returns the number of new
    /// inbound messages absorbed into the chat.
    pub fn sync(&self, chat: &mut Chat) -> Result<usize> {
        let path = self.path_for(&chat.id)?;
        if !path.is_file() {
            return Ok(0);
        }

        let doc = self.read_document(&path)?;
        let fresh = diff_messages(&rehashed(doc.messages), &chat.msgs);
        let added = chat.absorb(fresh);
        debug!(chat = %chat.id, added, "chat synced");
        Ok(added)
    }

    /// Persist the chat, merging concurrent appends first.
    ///
    /// Refreshes the chat properties, pulls in anything other writers added
    /// since the last sync, then rewrites the whole document. Returns the
    /// number of inbound messages picked up during the merge.
    pub fn save(&self, chat: &mut Chat) -> Result<usize> {
        chat.refresh_properties();
        let merged = self.sync(chat)?;
        if merged > 0 {
            // The merge changed the history, so the hash must move too.
            chat.refresh_properties();
        }

        let path = self.path_for(&chat.id)?;
        self.write_document(&path, &self.document_for(chat))?;
        debug!(chat = %chat.id, merged, total = chat.msgs.len(), "chat saved");
        Ok(merged)
    }

    /// Reset the chat file to the template and reload.
    pub fn erase(&self, chat: &mut Chat) -> Result<()> {
        let path = self.path_for(&chat.id)?;
        if path.is_file() {
            fs::remove_file(&path)
                .map_err(|e| Error::storage(format!("remove {}: {}", path.display(), e)))?;
        }

        chat.msgs.clear();
        chat.take_report();
        chat.properties = Default::default();

        self.seed_if_missing(&path)?;
        self.load(chat)?;
        self.save(chat)?;
        info!(chat = %chat.id, "chat erased");
        Ok(())
    }

    /// Snapshot the chat as a document.
    pub fn document_for(&self, chat: &Chat) -> ChatDocument {
        ChatDocument {
            messages: chat.msgs.clone(),
            properties: chat.properties.clone(),
        }
    }

    fn seed_if_missing(&self, path: &Path) -> Result<bool> {
        if path.is_file() {
            return Ok(false);
        }
        fs::create_dir_all(&self.root)
            .map_err(|e| Error::storage(format!("create {}: {}", self.root.display(), e)))?;

        match self.template.as_deref() {
            Some(template) if template.is_file() => {
                fs::copy(template, path).map_err(|e| {
                    Error::storage(format!("copy template {}: {}", template.display(), e))
                })?;
            }
            _ => {
                self.write_document(path, &ChatDocument::empty())?;
            }
        }
        Ok(true)
    }

    fn read_document(&self, path: &Path) -> Result<ChatDocument> {
        let raw = fs::read_to_string(path)
            .map_err(|e| Error::storage(format!("read {}: {}", path.display(), e)))?;
        let doc = serde_json::from_str(&raw)
            .map_err(|e| Error::Parse(format!("parse {}: {}", path.display(), e)))?;
        Ok(doc)
    }

    fn write_document(&self, path: &Path, doc: &ChatDocument) -> Result<()> {
        let raw = serde_json::to_string_pretty(doc)?;
        fs::write(path, raw)
            .map_err(|e| Error::storage(format!("write {}: {}", path.display(), e)))?;
        Ok(())
    }
}

/// Recompute every message hash; stored hashes are advisory only.
fn rehashed(mut msgs: Vec<crate::types::Message>) -> Vec<crate::types::Message> {
    for msg in &mut msgs {
        msg.update_hash();
    }
    msgs
}

/// Chat ids become file stems, so they are restricted to a safe charset.
fn validate_chat_id(chat_id: &str) -> Result<()> {
    let ok = !chat_id.is_empty()
        && chat_id.len() <= 64
        && chat_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(Error::validation(format!("invalid chat id: {:?}", chat_id)))
    }
}

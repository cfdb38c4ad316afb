//! The single active chat session.
//!
//! Parley is a single-process, single-user tool: exactly one chat is open at
//! a time, held in a process-wide global. The two preview flags mirror what
//! the front end still has to repaint; they are set by state changes and
//! cleared when the corresponding endpoint hands the content out.

use once_cell::sync::Lazy;
use tokio::sync::Mutex;
use tracing::{debug, info};

use parley_core::{Chat, ChatStore, MediaAttachment, Message, SyncReport};

use crate::ApiError;

static ACTIVE_SESSION: Lazy<Mutex<Option<SessionState>>> = Lazy::new(|| Mutex::new(None));

/// State of the one active session: the store, the open chat, and the
/// repaint flags.
#[derive(Debug)]
pub struct SessionState {
    store: ChatStore,
    chat: Option<Chat>,
    preview_history: bool,
    preview_media: bool,
}

impl SessionState {
    /// Open (or switch to) a chat, loading its document from disk.
    pub fn open(&mut self, chat_id: &str, author: &str) -> Result<(), ApiError> {
        let mut chat = Chat::with_id(chat_id, chat_id);
        chat.author = author.to_string();
        self.store.load(&mut chat)?;
        let id = chat.id.clone();
        log_report(&id, chat.take_report());

        info!(chat = %chat.id, author = %chat.author, "chat opened");
        self.chat = Some(chat);
        self.preview_history = true;
        self.preview_media = true;
        Ok(())
    }

    /// Reset the open chat's file to the template.
    pub fn erase(&mut self) -> Result<(), ApiError> {
        let store = self.store.clone();
        let chat = self.require_chat()?;
        store.erase(chat)?;
        let id = chat.id.clone();
        log_report(&id, chat.take_report());
        self.preview_history = true;
        Ok(())
    }

    /// Send the composed text: fill the draft with the staged media and the
    /// session author, queue it, and persist the chat.
    pub fn send(&mut self, text: &str) -> Result<Message, ApiError> {
        let store = self.store.clone();
        let chat = self.require_chat()?;

        let media = std::mem::take(&mut chat.draft.media);
        let author = chat.author.clone();
        chat.compose(text, media, author);

        let msg = chat.take_draft();
        chat.queue(msg.clone());
        store.save(chat)?;
        let id = chat.id.clone();
        log_report(&id, chat.take_report());

        self.preview_history = true;
        Ok(msg)
    }

    /// Poll the document for new inbound messages; flags a repaint when any
    /// arrived.
    pub fn poll(&mut self) -> Result<usize, ApiError> {
        let store = self.store.clone();
        let chat = self.require_chat()?;
        let added = store.sync(chat)?;
        let id = chat.id.clone();
        log_report(&id, chat.take_report());

        if added > 0 {
            self.preview_history = true;
        }
        Ok(added)
    }

    /// Message history when a repaint is due, `None` otherwise.
    pub fn history(&mut self) -> Result<Option<Vec<Message>>, ApiError> {
        let repaint = self.preview_history;
        let chat = self.require_chat()?;
        if !repaint {
            return Ok(None);
        }
        let msgs = chat.msgs.clone();
        self.preview_history = false;
        Ok(Some(msgs))
    }

    /// Stage an uploaded attachment on the draft.
    pub fn stage_media(&mut self, attachment: MediaAttachment) -> Result<(), ApiError> {
        let chat = self.require_chat()?;
        debug!(chat = %chat.id, media = %attachment.id, "attachment staged on draft");
        chat.draft.media.push(attachment);
        self.preview_media = true;
        Ok(())
    }

    /// Staged draft attachments when a repaint is due, `None` otherwise.
    pub fn draft_media(&mut self) -> Result<Option<Vec<MediaAttachment>>, ApiError> {
        let repaint = self.preview_media;
        let chat = self.require_chat()?;
        if !repaint {
            return Ok(None);
        }
        let media = chat.draft.media.clone();
        self.preview_media = false;
        Ok(Some(media))
    }

    /// The open chat, or an error when none is.
    pub fn require_chat(&mut self) -> Result<&mut Chat, ApiError> {
        self.chat
            .as_mut()
            .ok_or_else(|| ApiError::InvalidState("no chat is open".to_string()))
    }

    /// Store backing this session.
    pub fn store(&self) -> &ChatStore {
        &self.store
    }
}

/// Install the session store, replacing any previous session.
pub async fn init_session(store: ChatStore) {
    let mut guard = ACTIVE_SESSION.lock().await;
    *guard = Some(SessionState {
        store,
        chat: None,
        preview_history: false,
        preview_media: false,
    });
}

/// Run a closure against the active session.
pub async fn with_session<F, R>(f: F) -> Result<R, ApiError>
where
    F: FnOnce(&mut SessionState) -> Result<R, ApiError>,
{
    let mut guard = ACTIVE_SESSION.lock().await;
    let state = guard
        .as_mut()
        .ok_or_else(|| ApiError::Internal("session not initialized".to_string()))?;
    f(state)
}

fn log_report(chat_id: &str, report: SyncReport) {
    for msg in &report.inbox {
        debug!(chat = %chat_id, msg = %msg.id, text = %msg.text, "new inbound message");
    }
    for msg in &report.outbox {
        debug!(chat = %chat_id, msg = %msg.id, text = %msg.text, "new outbound message");
    }
    if !report.is_empty() {
        info!(
            chat = %chat_id,
            inbox = report.inbox.len(),
            outbox = report.outbox.len(),
            "chat traffic"
        );
    }
}

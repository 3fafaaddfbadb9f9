//! # Chat Store
//!
//! The single owner of the in-memory chat-room document. Every operator
//! action - creating rooms, scripting messages, bulk edits from the admin
//! panel - goes through here, and every mutation triggers a save.
//!
//! ## Save pipeline
//!
//! 1. Unless skipped, re-fetch the server document and compare its
//!    canonical serialization byte-for-byte against the snapshot taken at
//!    the last sync. A difference means someone else wrote in between:
//!    the save stops with `SaveOutcome::Conflict` and the operator picks
//!    `Overwrite` or `ReloadFromServer`. Without a snapshot (the last
//!    load fell back to the cache), a non-empty server document that does
//!    not match the in-memory state is treated as a conflict too. Never a
//!    silent overwrite when the conflict is detectable.
//! 2. Always write an emergency backup immediately before the POST.
//! 3. POST; on success mirror the document into the local cache, on
//!    failure keep a cache-only copy and report `SavedLocalOnly`.
//!
//! ## Concurrency
//!
//! One advisory flag, `is_editing`, suppresses background resyncs while
//! the admin panel is open. It is a flag, not a lock - two clients can
//! still race, and the conflict check above is the only guard.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::client::api::{self, RemoteApi};
use crate::client::backup::BackupManager;
use crate::client::cache::LocalCache;
use crate::client::error::ClientError;
use crate::shared::config::ClientConfig;
use crate::shared::model::LOCAL_USER_NAME;
use crate::shared::{ChatRoom, ChatRoomDocument, Message, RoomPatch, SharedError};

/// How a save ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Persisted on the server and mirrored into the cache
    Saved,
    /// Server unreachable or rejecting; the document lives in the local
    /// cache only and is not durable
    SavedLocalOnly,
    /// The server document changed since the last sync; nothing was
    /// written, the operator must resolve
    Conflict,
    /// Conflict resolved by reloading the server document
    Reloaded,
    /// Nothing to save (empty document on a background flush)
    Skipped,
}

/// Operator decision after a conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    /// Proceed and overwrite the server document
    Overwrite,
    /// Abandon the save and reload from the server
    ReloadFromServer,
}

/// Owner of the in-memory chat-room document
pub struct ChatStore {
    api: RemoteApi,
    cache: LocalCache,
    backups: BackupManager,
    rooms: ChatRoomDocument,
    current_room_id: Option<String>,
    /// Canonical serialization of the document as last seen on the server
    baseline: Option<String>,
    is_loading: bool,
    is_editing: bool,
    last_error: Option<String>,
    autosave_interval: Duration,
}

impl ChatStore {
    /// Construct a store from configuration; does not load yet
    pub async fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            api: RemoteApi::new(&config.server_url),
            cache: LocalCache::new(config.cache_path()),
            backups: BackupManager::new(&config).await?,
            rooms: Vec::new(),
            current_room_id: None,
            baseline: None,
            is_loading: true,
            is_editing: false,
            last_error: None,
            autosave_interval: config.autosave_interval,
        })
    }

    // --- accessors -------------------------------------------------------

    pub fn rooms(&self) -> &[ChatRoom] {
        &self.rooms
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn current_room_id(&self) -> Option<&str> {
        self.current_room_id.as_deref()
    }

    /// The currently open room, if any
    pub fn current_room(&self) -> Option<&ChatRoom> {
        let id = self.current_room_id.as_deref()?;
        self.rooms.iter().find(|room| room.id == id)
    }

    /// Open (or close, with `None`) a room
    pub fn set_current_room(&mut self, room_id: Option<String>) {
        self.current_room_id = room_id;
    }

    /// Toggle the admin-panel editing guard
    pub fn set_editing(&mut self, editing: bool) {
        self.is_editing = editing;
    }

    /// The backup manager, for backup browsing UIs
    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    // --- load / sync -----------------------------------------------------

    /// Load the document: server first, local cache as fallback, explicit
    /// empty state when both fail. No synthetic defaults - an earlier
    /// revision reseeded sample data over real documents and that path is
    /// gone for good.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.is_loading = true;

        match self.api.fetch_with_canonical().await {
            Ok((mut document, canonical)) => {
                revive(&mut document);
                self.rooms = document;
                self.baseline = Some(canonical);
                self.last_error = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load chat data from server, trying cache");
                match self.cache.read().await {
                    Some(mut document) => {
                        revive(&mut document);
                        self.rooms = document;
                        self.last_error = None;
                    }
                    None => {
                        self.rooms = Vec::new();
                        self.last_error = Some(err.to_string());
                    }
                }
                self.baseline = None;
            }
        }

        self.is_loading = false;
        Ok(())
    }

    /// Background re-read from the server, skipped while editing
    pub async fn resync(&mut self) -> Result<bool, ClientError> {
        if self.is_editing {
            tracing::debug!("resync suppressed while editing");
            return Ok(false);
        }
        self.load().await?;
        Ok(true)
    }

    // --- save ------------------------------------------------------------

    /// Persist the in-memory document. See the module docs for the
    /// conflict-check / backup / fallback pipeline.
    pub async fn save(&mut self, skip_conflict_check: bool) -> Result<SaveOutcome, ClientError> {
        if !skip_conflict_check {
            match self.api.fetch_with_canonical().await {
                Ok((remote_document, remote)) => match &self.baseline {
                    Some(baseline) if &remote != baseline => {
                        tracing::warn!("server document changed since last sync");
                        return Ok(SaveOutcome::Conflict);
                    }
                    Some(_) => {}
                    // No baseline means the last load never saw the server.
                    // A non-empty server document this client does not
                    // already hold is someone else's data; overwriting it
                    // needs an explicit operator decision.
                    None => {
                        if !remote_document.is_empty() && remote != api::canonical(&self.rooms)? {
                            tracing::warn!("server holds a document this client never loaded");
                            return Ok(SaveOutcome::Conflict);
                        }
                    }
                },
                // an unreachable server fails the POST below anyway
                Err(err) => {
                    tracing::warn!(error = %err, "conflict pre-check fetch failed")
                }
            }
        }

        self.backups.create_backup(&self.rooms).await;

        match self.api.push_document(&self.rooms).await {
            Ok(()) => {
                if let Err(err) = self.cache.write(&self.rooms).await {
                    tracing::warn!(error = %err, "failed to mirror document into cache");
                }
                self.baseline = Some(api::canonical(&self.rooms)?);
                self.last_error = None;
                Ok(SaveOutcome::Saved)
            }
            Err(err) => {
                tracing::warn!(error = %err, "server save failed, falling back to local cache");
                match self.cache.write(&self.rooms).await {
                    Ok(()) => {
                        self.last_error = Some(err.to_string());
                        Ok(SaveOutcome::SavedLocalOnly)
                    }
                    Err(cache_err) => {
                        tracing::error!(error = %cache_err, "local cache save failed too");
                        Err(ClientError::SaveFailedEverywhere)
                    }
                }
            }
        }
    }

    /// Apply the operator's decision after `SaveOutcome::Conflict`
    pub async fn resolve_conflict(
        &mut self,
        choice: ConflictChoice,
    ) -> Result<SaveOutcome, ClientError> {
        match choice {
            ConflictChoice::Overwrite => self.save(true).await,
            ConflictChoice::ReloadFromServer => {
                self.load().await?;
                Ok(SaveOutcome::Reloaded)
            }
        }
    }

    /// Save for teardown paths, skipping the conflict check. An empty
    /// document is not flushed: teardown must never wipe the server with
    /// a state that was cleared locally moments before.
    pub async fn flush(&mut self) -> Result<SaveOutcome, ClientError> {
        if self.rooms.is_empty() {
            return Ok(SaveOutcome::Skipped);
        }
        self.save(true).await
    }

    // --- mutations -------------------------------------------------------

    /// Create a room, save, and return its id with the save outcome
    pub async fn create_chat_room(
        &mut self,
        name: &str,
        is_group: bool,
    ) -> Result<(String, SaveOutcome), ClientError> {
        let room = ChatRoom::new(name, is_group);
        let room_id = room.id.clone();
        self.rooms.push(room);
        let outcome = self.save(false).await?;
        Ok((room_id, outcome))
    }

    /// Delete a room; clears the current-room selection if it was open.
    /// Deleting an unknown id is a no-op (the save still runs).
    pub async fn delete_chat_room(&mut self, room_id: &str) -> Result<SaveOutcome, ClientError> {
        self.rooms.retain(|room| room.id != room_id);
        if self.current_room_id.as_deref() == Some(room_id) {
            self.current_room_id = None;
        }
        self.save(false).await
    }

    /// Append a text message to a room. Sender name and avatar come from
    /// the room's participants; the counterpart's messages bump the
    /// unread badge.
    pub async fn add_message(
        &mut self,
        room_id: &str,
        text: &str,
        is_user: bool,
    ) -> Result<SaveOutcome, ClientError> {
        let room = self.room_mut(room_id)?;
        let (user_name, avatar) = sender_identity(room, is_user);
        room.push_message(Message::text(text, is_user, Some(user_name), avatar));
        self.save(false).await
    }

    /// Append an image message to a room
    pub async fn add_image_message(
        &mut self,
        room_id: &str,
        image_url: &str,
        is_user: bool,
        is_stamp: bool,
    ) -> Result<SaveOutcome, ClientError> {
        let room = self.room_mut(room_id)?;
        let (user_name, _) = sender_identity(room, is_user);
        let message = if is_stamp {
            Message::stamp(image_url, is_user, Some(user_name))
        } else {
            Message::image(image_url, is_user, Some(user_name))
        };
        room.push_message(message);
        self.save(false).await
    }

    /// Insert a date separator at the end of a room's message list.
    /// Separators carry no sender and never touch the unread count or the
    /// room preview.
    pub async fn add_date_separator(
        &mut self,
        room_id: &str,
        label: &str,
    ) -> Result<SaveOutcome, ClientError> {
        let room = self.room_mut(room_id)?;
        room.messages
            .push(Message::date_separator(label, chrono::Utc::now()));
        self.save(false).await
    }

    /// Bulk update from the admin editor: replace the message list and
    /// apply an optional participant patch
    pub async fn update_chat_room(
        &mut self,
        room_id: &str,
        messages: Vec<Message>,
        patch: Option<RoomPatch>,
    ) -> Result<SaveOutcome, ClientError> {
        if let Some(patch) = &patch {
            patch.validate()?;
        }
        let room = self.room_mut(room_id)?;
        room.apply_update(messages, patch);
        self.save(false).await
    }

    /// Clear the unread badge of a room (when the operator opens it)
    pub async fn reset_unread_count(&mut self, room_id: &str) -> Result<SaveOutcome, ClientError> {
        let room = self.room_mut(room_id)?;
        room.unread_count = 0;
        self.save(false).await
    }

    /// Back-fill read receipts on every own message of a room
    pub async fn mark_all_own_messages_read(
        &mut self,
        room_id: &str,
    ) -> Result<SaveOutcome, ClientError> {
        let room = self.room_mut(room_id)?;
        for message in &mut room.messages {
            if message.is_user {
                message.is_read = Some(true);
            }
        }
        self.save(false).await
    }

    /// Drop the cache and reset to the explicit empty state. Does not
    /// touch the server document.
    pub async fn clear_all_data(&mut self) -> Result<(), ClientError> {
        self.cache.clear().await?;
        self.rooms = Vec::new();
        self.current_room_id = None;
        self.baseline = None;
        Ok(())
    }

    // --- emergency restore -----------------------------------------------

    /// Overwrite the in-memory document with the newest emergency backup
    /// and persist it. The pre-restore state is snapshotted first so the
    /// restore itself can be undone. Returns `false` when no backup
    /// exists.
    pub async fn restore_from_emergency_backup(&mut self) -> Result<bool, ClientError> {
        let Some(latest) = self.backups.latest_backup().await else {
            tracing::warn!("no emergency backup to restore");
            return Ok(false);
        };

        self.backups.create_backup(&self.rooms).await;

        let mut document = latest.data;
        revive(&mut document);
        self.rooms = document;
        self.save(true).await?;
        Ok(true)
    }

    // --- background tasks -------------------------------------------------

    /// Spawn the periodic autosave task. A conflict found by the
    /// background save is left for the operator; the task never
    /// overwrites on its own.
    pub fn spawn_autosave(store: Arc<RwLock<ChatStore>>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let interval = store.read().await.autosave_interval;
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // the first tick fires immediately
            loop {
                ticker.tick().await;
                let mut guard = store.write().await;
                if guard.is_editing() || guard.rooms().is_empty() {
                    continue;
                }
                match guard.save(false).await {
                    Ok(SaveOutcome::Conflict) => {
                        tracing::warn!("autosave deferred: server document changed")
                    }
                    Ok(_) => tracing::debug!("autosaved chat data"),
                    Err(err) => tracing::warn!(error = %err, "autosave failed"),
                }
            }
        })
    }

    // --- internals --------------------------------------------------------

    fn room_mut(&mut self, room_id: &str) -> Result<&mut ChatRoom, SharedError> {
        self.rooms
            .iter_mut()
            .find(|room| room.id == room_id)
            .ok_or_else(|| SharedError::document(format!("unknown room '{}'", room_id)))
    }
}

/// Resolve the display name and avatar of a message sender from the
/// room's participant list
fn sender_identity(room: &ChatRoom, is_user: bool) -> (String, Option<crate::shared::AvatarSettings>) {
    if is_user {
        (
            LOCAL_USER_NAME.to_string(),
            room.participants
                .first()
                .and_then(|p| p.avatar_settings.clone()),
        )
    } else {
        (
            room.other_name(),
            room.participants
                .get(1)
                .and_then(|p| p.avatar_settings.clone()),
        )
    }
}

/// Post-load fixups on a freshly parsed document: own messages written by
/// revisions that predate read receipts get them back-filled
fn revive(document: &mut ChatRoomDocument) {
    for room in document {
        for message in &mut room.messages {
            if message.is_user && message.is_read.is_none() {
                message.is_read = Some(true);
            }
        }
    }
}

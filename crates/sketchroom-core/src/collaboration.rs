//! Sync bridge between the local element store and the replicated document.
//!
//! Local commits write whole element values into the replicated map and
//! broadcast the document; every observed remote change re-materializes the
//! entire local collection. The bridge also owns presence publication, the
//! debounced sticky-note text commits, and the connection lifecycle.

use crate::crdt::ReplicatedDocument;
use crate::editor::EditorEffect;
use crate::elements::{Element, ElementId, ScreenShare};
use crate::presence::{Member, PresenceRegistry};
use crate::store::ElementStore;
use crate::sync::{
    encode_payload, room_url, AwarenessState, ClientMessage, ConnectionState, SyncEvent,
    SyncSocket, SyncError,
};
use kurbo::Point;
use loro::LoroResult;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Inactivity window before a buffered text edit is committed remotely.
pub const TEXT_COMMIT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Buffers sticky-note text edits and releases them after an inactivity
/// window, bounding remote write frequency. Queueing supersedes the pending
/// deadline for the same note; switching notes flushes the previous edit
/// immediately.
#[derive(Debug, Default)]
pub struct TextCommitQueue {
    pending: Option<PendingText>,
}

#[derive(Debug)]
struct PendingText {
    id: ElementId,
    text: String,
    deadline: Instant,
}

impl TextCommitQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer a text edit at time `now`. Returns a superseded edit for a
    /// *different* note, which the caller must commit immediately.
    pub fn queue(
        &mut self,
        id: ElementId,
        text: &str,
        now: Instant,
    ) -> Option<(ElementId, String)> {
        let supersedes_other = self.pending.as_ref().is_some_and(|p| p.id != id);
        let superseded = if supersedes_other { self.take() } else { None };
        self.pending = Some(PendingText {
            id,
            text: text.to_string(),
            deadline: now + TEXT_COMMIT_DEBOUNCE,
        });
        superseded
    }

    /// Release the pending edit if its window elapsed by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<(ElementId, String)> {
        if self.pending.as_ref()?.deadline <= now {
            self.take()
        } else {
            None
        }
    }

    /// Force the pending edit out regardless of its deadline.
    pub fn take(&mut self) -> Option<(ElementId, String)> {
        self.pending.take().map(|p| (p.id, p.text))
    }

    /// Whether an edit is waiting on its window.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Bridges local element mutations to the replicated document and back.
pub struct SyncBridge {
    doc: ReplicatedDocument,
    socket: SyncSocket,
    session_id: Uuid,
    nickname: String,
    color: String,
    room: Option<String>,
    awareness: AwarenessState,
    presence: PresenceRegistry,
    text_queue: TextCommitQueue,
    outgoing: Vec<String>,
    screen_share: Option<ElementId>,
}

impl SyncBridge {
    /// Create a bridge for a session identified by a fresh session id.
    pub fn new(nickname: impl Into<String>, color: impl Into<String>) -> Self {
        let nickname = nickname.into();
        let color = color.into();
        let awareness = AwarenessState {
            nickname: Some(nickname.clone()),
            color: Some(color.clone()),
            cursor: None,
            peer_ready: None,
        };
        Self {
            doc: ReplicatedDocument::new(),
            socket: SyncSocket::new(),
            session_id: Uuid::new_v4(),
            nickname,
            color,
            room: None,
            awareness,
            presence: PresenceRegistry::new(),
            text_queue: TextCommitQueue::new(),
            outgoing: Vec::new(),
            screen_share: None,
        }
    }

    /// This session's identity key.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The published nickname.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// The assigned user color.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// The room joined or being joined, if any.
    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    /// Current transport state, reflected to the UI as non-fatal
    /// connectivity.
    pub fn connection_state(&self) -> ConnectionState {
        self.socket.state()
    }

    /// Whether the transport is connected.
    pub fn is_connected(&self) -> bool {
        self.socket.is_connected()
    }

    /// The replicated document.
    pub fn document(&self) -> &ReplicatedDocument {
        &self.doc
    }

    // --- Connection lifecycle ---

    /// Open the document/connection pair for a room.
    ///
    /// Idempotent: overlapping lifecycle triggers while a connection is
    /// already open or opening are a no-op, so at most one connection exists
    /// per bridge.
    pub fn connect(&mut self, server_url: &str, room: &str) -> Result<(), SyncError> {
        match self.socket.state() {
            ConnectionState::Connected | ConnectionState::Connecting => {
                log::debug!("connect ignored: already {:?}", self.socket.state());
                return Ok(());
            }
            _ => {}
        }

        // Clear any dead socket thread from a previous attempt.
        self.socket.disconnect();
        self.socket.connect(&room_url(server_url, room))?;
        self.room = Some(room.to_string());

        self.queue_message(&ClientMessage::Join {
            room: room.to_string(),
        });
        self.queue_awareness();
        Ok(())
    }

    /// Leave the room and close the connection. Local state (the element
    /// store, the replicated document) is kept: it remains the best-effort
    /// view until reconciliation resumes.
    pub fn disconnect(&mut self) {
        if self.socket.is_connected() {
            // Best effort: clear our presence for peers, then leave.
            let clear = ClientMessage::Awareness {
                session_id: self.session_id,
                state: AwarenessState::default(),
            };
            if let Ok(json) = serde_json::to_string(&clear) {
                let _ = self.socket.send(&json);
            }
            if let Ok(json) = serde_json::to_string(&ClientMessage::Leave) {
                let _ = self.socket.send(&json);
            }
        }
        self.socket.disconnect();
        self.presence.clear();
        self.room = None;
        self.outgoing.clear();
    }

    // --- Local -> remote ---

    /// Write a committed element into the replicated map and broadcast.
    pub fn commit_element(&mut self, element: &Element) -> LoroResult<()> {
        self.doc.set_element(element)?;
        self.broadcast_sync();
        Ok(())
    }

    /// Mirror an element update.
    ///
    /// This is a whole-value replace: concurrent edits to the same element
    /// from two sessions clobber each other at element granularity
    /// (last-writer-wins). Only element-level adds and removes are safely
    /// merged by the underlying engine.
    pub fn update_element(&mut self, element: &Element) -> LoroResult<()> {
        self.commit_element(element)
    }

    /// Delete an element from the replicated map and broadcast.
    pub fn remove_element(&mut self, id: ElementId) -> LoroResult<()> {
        self.doc.remove_element(id)?;
        if self.screen_share == Some(id) {
            self.screen_share = None;
        }
        self.broadcast_sync();
        Ok(())
    }

    /// Mirror an editor effect into the replicated document.
    pub fn mirror(&mut self, effect: &EditorEffect) -> LoroResult<()> {
        match effect {
            EditorEffect::Commit(element) => self.commit_element(element),
            EditorEffect::Remove(id) => self.remove_element(*id),
            EditorEffect::EditingStarted(_) => Ok(()),
            EditorEffect::EditingEnded(_) => {
                self.flush_text();
                Ok(())
            }
        }
    }

    // --- Remote -> local ---

    /// Replace the local collection with the replicated map's current
    /// values. Idempotent, so the echo of our own writes is harmless.
    pub fn apply_remote(&self, store: &mut ElementStore) {
        store.replace_all(self.doc.elements());
    }

    /// Import remote document bytes and re-materialize the store. Returns
    /// true when the import applied.
    pub fn import_remote(&mut self, bytes: &[u8], store: &mut ElementStore) -> bool {
        match self.doc.import(bytes) {
            Ok(()) => {
                self.apply_remote(store);
                true
            }
            Err(e) => {
                log::warn!("discarding unimportable remote update: {}", e);
                false
            }
        }
    }

    /// Drain transport events, applying document and presence changes.
    /// Returns the events for UI-level reactions (connectivity badges,
    /// member list refresh).
    pub fn poll(&mut self, store: &mut ElementStore) -> Vec<SyncEvent> {
        let events = self.socket.poll_events();

        for event in &events {
            match event {
                SyncEvent::JoinedRoom {
                    room, initial_sync, ..
                } => {
                    self.room = Some(room.clone());
                    if let Some(bytes) = initial_sync {
                        self.import_remote(bytes, store);
                    }
                    // Late joiners and offline edits: push our state too.
                    self.broadcast_sync();
                }
                SyncEvent::SyncReceived { data, .. } => {
                    self.import_remote(data, store);
                }
                SyncEvent::AwarenessReceived { from, state } => {
                    if *from != self.session_id {
                        self.presence.apply(*from, state);
                    }
                }
                SyncEvent::PeerLeft { session_id } => {
                    self.presence.remove(*session_id);
                }
                SyncEvent::Disconnected => {
                    // Peers are unknown while disconnected; the element
                    // store is left alone.
                    self.presence.clear();
                }
                _ => {}
            }
        }

        if let Some((id, text)) = self.text_queue.poll(Instant::now()) {
            self.commit_note_text(id, &text);
        }

        self.flush_outgoing();
        events
    }

    // --- Debounced text commits ---

    /// Buffer a sticky-note text edit for debounced remote commit. The
    /// local store must already hold the new text (optimistic rendering);
    /// only the remote write is delayed.
    pub fn queue_note_text(&mut self, id: ElementId, text: &str) {
        if let Some((superseded_id, superseded_text)) =
            self.text_queue.queue(id, text, Instant::now())
        {
            self.commit_note_text(superseded_id, &superseded_text);
        }
    }

    /// Commit any pending text edit immediately (edit mode ended or
    /// switched notes).
    pub fn flush_text(&mut self) {
        if let Some((id, text)) = self.text_queue.take() {
            self.commit_note_text(id, &text);
        }
    }

    /// Read-modify-write of one note's text against the replicated value.
    /// The window between read and write is not atomic across sessions; see
    /// [`SyncBridge::update_element`].
    fn commit_note_text(&mut self, id: ElementId, text: &str) {
        match self.doc.get_element(id) {
            Some(Element::StickyNote(mut note)) => {
                note.text = text.to_string();
                if let Err(e) = self.commit_element(&Element::StickyNote(note)) {
                    log::warn!("failed to commit note text: {}", e);
                }
            }
            _ => {
                // The note was deleted (or never committed); nothing to do.
                log::debug!("dropping text commit for missing note {}", id);
            }
        }
    }

    // --- Presence ---

    /// Publish the local cursor position. Fire-and-forget and unthrottled;
    /// throttling, if any, belongs to the input-event source.
    pub fn set_cursor(&mut self, position: Point) {
        self.awareness.cursor = Some(position);
        self.queue_awareness();
    }

    /// Clear the local cursor (pointer left the canvas).
    pub fn clear_cursor(&mut self) {
        self.awareness.cursor = None;
        self.queue_awareness();
    }

    /// Update the published identity (nickname and color).
    pub fn set_identity(&mut self, nickname: impl Into<String>, color: impl Into<String>) {
        self.nickname = nickname.into();
        self.color = color.into();
        self.awareness.nickname = Some(self.nickname.clone());
        self.awareness.color = Some(self.color.clone());
        self.queue_awareness();
    }

    /// Publish whether this session's media peer can answer share calls.
    pub fn set_peer_ready(&mut self, ready: bool) {
        self.awareness.peer_ready = Some(ready);
        self.queue_awareness();
    }

    /// The local awareness state as published.
    pub fn awareness(&self) -> &AwarenessState {
        &self.awareness
    }

    /// Other sessions in the room, deduplicated by session id.
    pub fn members(&self) -> Vec<Member> {
        self.presence.members()
    }

    // --- Screen share ---

    /// Place this session's screen share on the canvas and replicate it.
    /// A previous share from this session is replaced.
    pub fn publish_screen_share(
        &mut self,
        store: &mut ElementStore,
        stream_id: impl Into<String>,
    ) -> LoroResult<ElementId> {
        if let Some(previous) = self.screen_share.take() {
            store.remove(previous);
            self.remove_element(previous)?;
        }

        let element = Element::ScreenShare(ScreenShare::new(stream_id, self.session_id));
        let id = element.id();
        store.add(element.clone());
        self.commit_element(&element)?;
        self.screen_share = Some(id);
        Ok(id)
    }

    /// Remove this session's screen share everywhere.
    pub fn stop_screen_share(&mut self, store: &mut ElementStore) -> LoroResult<Option<ElementId>> {
        let Some(id) = self.screen_share.take() else {
            return Ok(None);
        };
        store.remove(id);
        self.doc.remove_element(id)?;
        self.broadcast_sync();
        Ok(Some(id))
    }

    /// The id of this session's live screen-share element, if sharing.
    pub fn screen_share_id(&self) -> Option<ElementId> {
        self.screen_share
    }

    // --- Outgoing queue ---

    /// Whether frames are waiting for the connection to open.
    pub fn has_pending_outgoing(&self) -> bool {
        !self.outgoing.is_empty()
    }

    fn broadcast_sync(&mut self) {
        if self.room.is_some() {
            let data = encode_payload(&self.doc.export_snapshot());
            self.queue_message(&ClientMessage::Sync { data });
        }
    }

    fn queue_awareness(&mut self) {
        if self.room.is_some() {
            let msg = ClientMessage::Awareness {
                session_id: self.session_id,
                state: self.awareness.clone(),
            };
            self.queue_message(&msg);
        }
    }

    fn queue_message(&mut self, msg: &ClientMessage) {
        if let Ok(json) = serde_json::to_string(msg) {
            self.outgoing.push(json);
        }
        self.flush_outgoing();
    }

    fn flush_outgoing(&mut self) {
        if !self.socket.is_connected() {
            return;
        }
        for json in self.outgoing.drain(..) {
            if let Err(e) = self.socket.send(&json) {
                log::warn!("dropping outgoing frame: {}", e);
            }
        }
    }
}

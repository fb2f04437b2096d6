//! Session state store.
//!
//! `Session` is the full mutable conversational state of one chat widget.
//! All transitions that touch the transcript or the busy flag live here so
//! the invariants are enforced in one place; the engine in
//! `charla-application` only adds locking and async scheduling around them.

use super::app_mode::ConversationMode;
use super::message::{AttachmentRef, Turn, TurnId, TurnRole};
use crate::error::{ChatError, Result};
use crate::topic::Starter;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Conversational state of a single widget instance.
///
/// A session contains:
/// - The transcript, in conversation order
/// - The selected interaction mode
/// - The topic proposed by the opening message
/// - An attachment waiting to be sent with the next submission
/// - The busy flag guarding the single in-flight request
/// - A generation counter that changes on every reset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Ordered transcript
    pub transcript: Vec<Turn>,
    /// Current interaction mode
    pub mode: ConversationMode,
    /// Topic proposed by the opening message, used for continuation context
    pub last_topic: Option<String>,
    /// Attachment that the next submission will consume
    pub pending_attachment: Option<AttachmentRef>,
    /// True from request issue until the reply is fully revealed or failed
    pub busy: bool,
    /// Staleness token; async results tagged with an older value are dropped
    pub generation: u64,
    #[serde(default)]
    next_turn_id: u64,
}

impl Session {
    /// Creates a fresh session whose transcript holds only the opening message.
    pub fn new(mode: ConversationMode, starter: Starter) -> Self {
        Self::with_generation(mode, starter, 0)
    }

    fn with_generation(mode: ConversationMode, starter: Starter, generation: u64) -> Self {
        let mut session = Self {
            id: Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            transcript: Vec::new(),
            mode,
            last_topic: Some(starter.topic),
            pending_attachment: None,
            busy: false,
            generation,
            next_turn_id: 0,
        };
        session.push_turn(TurnRole::Assistant, starter.opening_text, None);
        session
    }

    /// Builds the replacement session for a reset.
    ///
    /// The mode carries over; transcript, pending attachment and busy flag
    /// start fresh, and the generation moves past this session's.
    pub fn reseeded(&self, starter: Starter) -> Self {
        Self::with_generation(self.mode, starter, self.generation.wrapping_add(1))
    }

    /// Appends a turn and returns its handle.
    pub fn push_turn(
        &mut self,
        role: TurnRole,
        text: impl Into<String>,
        attachment: Option<AttachmentRef>,
    ) -> TurnId {
        let id = TurnId(self.next_turn_id);
        self.next_turn_id += 1;
        self.transcript.push(Turn {
            id,
            role,
            text: text.into(),
            attachment,
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
        id
    }

    pub fn turn(&self, id: TurnId) -> Option<&Turn> {
        self.transcript.iter().rev().find(|turn| turn.id == id)
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.transcript.last()
    }

    /// Overwrites the text of an assistant turn.
    ///
    /// Returns false when the turn does not exist or is a user turn; user
    /// turns are immutable once appended.
    pub fn set_assistant_text(&mut self, id: TurnId, text: &str) -> bool {
        match self.transcript.iter_mut().rev().find(|turn| turn.id == id) {
            Some(turn) if turn.role == TurnRole::Assistant => {
                turn.text.clear();
                turn.text.push_str(text);
                true
            }
            _ => false,
        }
    }

    /// Replaces the pending attachment.
    pub fn attach(&mut self, attachment: AttachmentRef) {
        self.pending_attachment = Some(attachment);
    }

    /// Clears the pending attachment, returning it.
    pub fn detach(&mut self) -> Option<AttachmentRef> {
        self.pending_attachment.take()
    }

    /// Starts a request: appends the user turn, consumes the pending
    /// attachment and raises `busy`.
    ///
    /// An explicit `attachment` wins over the pending one; the pending slot
    /// is cleared either way. Fails with `Busy` without touching state if a
    /// request is already in flight, and with `EmptyInput` for blank text.
    pub fn begin_request(
        &mut self,
        user_text: &str,
        attachment: Option<AttachmentRef>,
    ) -> Result<PendingRequest> {
        if self.busy {
            return Err(ChatError::Busy);
        }
        let text = user_text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyInput);
        }

        let pending = self.pending_attachment.take();
        let attachment = attachment.or(pending);
        let user_turn = self.push_turn(TurnRole::User, text, attachment.clone());
        self.busy = true;

        Ok(PendingRequest {
            generation: self.generation,
            user_turn,
            user_text: text.to_string(),
            attachment,
        })
    }

    /// Appends the fixed fallback reply and releases `busy`.
    pub fn fail_request(&mut self, fallback_reply: &str) -> TurnId {
        let id = self.push_turn(TurnRole::Assistant, fallback_reply, None);
        self.busy = false;
        id
    }

    /// Appends the empty assistant turn a reveal will fill in.
    /// `busy` stays raised until `finish_reveal`.
    pub fn open_reply(&mut self) -> TurnId {
        self.push_turn(TurnRole::Assistant, String::new(), None)
    }

    /// Releases `busy` once the reveal has written the full reply.
    pub fn finish_reveal(&mut self) {
        self.busy = false;
    }
}

/// What a caller needs from `begin_request` to go on and issue the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    /// Generation the request belongs to
    pub generation: u64,
    /// Handle of the appended user turn
    pub user_turn: TurnId,
    /// Trimmed user text
    pub user_text: String,
    /// Attachment consumed by this request
    pub attachment: Option<AttachmentRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starter(topic: &str) -> Starter {
        Starter {
            opening_text: format!("¡Hola! Hablemos de {topic}."),
            topic: topic.to_string(),
        }
    }

    #[test]
    fn test_new_session_holds_opening_message() {
        let session = Session::new(ConversationMode::Supportive, starter("ESP32"));

        assert_eq!(session.transcript.len(), 1);
        assert_eq!(session.transcript[0].role, TurnRole::Assistant);
        assert_eq!(session.transcript[0].text, "¡Hola! Hablemos de ESP32.");
        assert_eq!(session.last_topic.as_deref(), Some("ESP32"));
        assert!(!session.busy);
        assert_eq!(session.generation, 0);
    }

    #[test]
    fn test_begin_request_appends_user_turn_and_consumes_pending() {
        let mut session = Session::new(ConversationMode::Supportive, starter("Git"));
        session.attach(AttachmentRef::new("foto.png", "data:image/png;base64,AAAA"));

        let pending = session.begin_request("  hola  ", None).unwrap();

        assert!(session.busy);
        assert!(session.pending_attachment.is_none());
        assert_eq!(pending.user_text, "hola");
        assert_eq!(pending.attachment.as_ref().unwrap().name, "foto.png");

        let turn = session.turn(pending.user_turn).unwrap();
        assert_eq!(turn.role, TurnRole::User);
        assert_eq!(turn.text, "hola");
        assert_eq!(turn.attachment.as_ref().unwrap().name, "foto.png");
    }

    #[test]
    fn test_explicit_attachment_wins_and_pending_still_cleared() {
        let mut session = Session::new(ConversationMode::Supportive, starter("Git"));
        session.attach(AttachmentRef::new("old.png", "a"));

        let pending = session
            .begin_request("mira", Some(AttachmentRef::new("new.png", "b")))
            .unwrap();

        assert_eq!(pending.attachment.unwrap().name, "new.png");
        assert!(session.pending_attachment.is_none());
    }

    #[test]
    fn test_begin_request_rejects_when_busy_without_mutation() {
        let mut session = Session::new(ConversationMode::Supportive, starter("SQL"));
        session.begin_request("uno", None).unwrap();
        let before = session.clone();

        let err = session.begin_request("dos", None).unwrap_err();

        assert!(err.is_busy());
        assert_eq!(session, before);
    }

    #[test]
    fn test_begin_request_rejects_blank_input() {
        let mut session = Session::new(ConversationMode::Supportive, starter("SQL"));
        let err = session.begin_request("   \n", None).unwrap_err();

        assert_eq!(err, ChatError::EmptyInput);
        assert_eq!(session.transcript.len(), 1);
        assert!(!session.busy);
    }

    #[test]
    fn test_fail_request_appends_fallback_and_releases_busy() {
        let mut session = Session::new(ConversationMode::Instructive, starter("SQL"));
        session.begin_request("hola", None).unwrap();

        session.fail_request("sin conexión");

        assert!(!session.busy);
        assert_eq!(session.transcript.len(), 3);
        assert_eq!(session.last_turn().unwrap().text, "sin conexión");
    }

    #[test]
    fn test_set_assistant_text_refuses_user_turns() {
        let mut session = Session::new(ConversationMode::Supportive, starter("SQL"));
        let pending = session.begin_request("hola", None).unwrap();
        let reply = session.open_reply();

        assert!(!session.set_assistant_text(pending.user_turn, "hacked"));
        assert!(session.set_assistant_text(reply, "Hol"));
        assert_eq!(session.turn(reply).unwrap().text, "Hol");
        assert!(!session.set_assistant_text(TurnId(99), "x"));
    }

    #[test]
    fn test_reseeded_preserves_mode_and_bumps_generation() {
        let mut session = Session::new(ConversationMode::Instructive, starter("Arduino"));
        session.begin_request("hola", None).unwrap();
        session.attach(AttachmentRef::new("x.png", "x"));

        let fresh = session.reseeded(starter("física"));

        assert_eq!(fresh.mode, ConversationMode::Instructive);
        assert_eq!(fresh.generation, session.generation + 1);
        assert_eq!(fresh.transcript.len(), 1);
        assert_eq!(fresh.last_topic.as_deref(), Some("física"));
        assert!(fresh.pending_attachment.is_none());
        assert!(!fresh.busy);
        assert_ne!(fresh.id, session.id);
    }

    #[test]
    fn test_turn_ids_are_unique_and_ordered() {
        let mut session = Session::new(ConversationMode::Supportive, starter("Git"));
        let a = session.push_turn(TurnRole::User, "a", None);
        let b = session.push_turn(TurnRole::Assistant, "b", None);
        assert!(a < b);

        let ids: std::collections::HashSet<_> = session.transcript.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), session.transcript.len());
    }
}

use std::collections::HashMap;

use shared_types::{SessionId, VerificationRequestId};

use super::dto::{ReviewSession, SessionState};

/// Token of one in-flight backend call. Issued in increasing order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub(crate) struct Ticket(u64);

#[derive(Debug)]
struct SessionEntry {
    record_id: VerificationRequestId,
    state: SessionState,
    ticket: Option<Ticket>,
}

/// Decides whether a completing backend call may still apply its effects.
///
/// Two levels are tracked. Per record id only the newest status submission is current,
/// whether it came from a quick action or a detail session. Per session only the newest
/// operation of an open session is current. Closed sessions are forgotten.
#[derive(Debug, Default)]
pub(crate) struct SessionRegistry {
    last_ticket: u64,
    last_session: u64,
    current: HashMap<VerificationRequestId, Ticket>,
    sessions: HashMap<SessionId, SessionEntry>,
}

impl SessionRegistry {
    pub fn open(&mut self, record_id: VerificationRequestId) -> ReviewSession {
        self.last_session += 1;
        let session_id = SessionId::from(self.last_session);
        self.sessions.insert(
            session_id,
            SessionEntry {
                record_id,
                state: SessionState::Idle,
                ticket: None,
            },
        );

        ReviewSession {
            session_id,
            record_id,
        }
    }

    pub fn state(&self, session_id: SessionId) -> Option<&SessionState> {
        self.sessions.get(&session_id).map(|entry| &entry.state)
    }

    fn next_ticket(&mut self) -> Ticket {
        self.last_ticket += 1;
        Ticket(self.last_ticket)
    }

    /// Makes the returned ticket the only one allowed to resolve a submission for `record_id`.
    pub fn issue(&mut self, record_id: VerificationRequestId) -> Ticket {
        let ticket = self.next_ticket();
        self.current.insert(record_id, ticket);
        ticket
    }

    pub fn is_current(&self, record_id: VerificationRequestId, ticket: Ticket) -> bool {
        self.current.get(&record_id) == Some(&ticket)
    }

    pub fn release(&mut self, record_id: VerificationRequestId, ticket: Ticket) {
        if self.is_current(record_id, ticket) {
            self.current.remove(&record_id);
        }
    }

    /// Starts an operation of an open session and moves it into `state`.
    pub fn begin(
        &mut self,
        session_id: SessionId,
        ticket: Ticket,
        state: SessionState,
    ) -> bool {
        match self.sessions.get_mut(&session_id) {
            Some(entry) => {
                entry.ticket = Some(ticket);
                entry.state = state;
                true
            }
            None => false,
        }
    }

    /// Ticket for a session operation that does not submit anything.
    pub fn issue_for_session(&mut self, session_id: SessionId, state: SessionState) -> Option<Ticket> {
        let ticket = self.next_ticket();
        self.begin(session_id, ticket, state).then_some(ticket)
    }

    pub fn is_session_current(&self, session_id: SessionId, ticket: Ticket) -> bool {
        self.sessions
            .get(&session_id)
            .is_some_and(|entry| entry.ticket == Some(ticket))
    }

    /// Updates the state of an open session; ignored once the session is closed.
    pub fn set_state(&mut self, session_id: SessionId, state: SessionState) {
        if let Some(entry) = self.sessions.get_mut(&session_id) {
            entry.state = state;
        }
    }

    /// Ends the current operation of a session, if `ticket` is still the current one.
    pub fn finish(&mut self, session_id: SessionId, ticket: Ticket, state: SessionState) -> bool {
        if !self.is_session_current(session_id, ticket) {
            return false;
        }

        if let Some(entry) = self.sessions.get_mut(&session_id) {
            entry.ticket = None;
            entry.state = state;
        }
        true
    }

    /// Forgets a session and returns the state it was in.
    ///
    /// A submission still in flight loses its claim on the record.
    pub fn close(&mut self, session_id: SessionId) -> Option<SessionState> {
        let entry = self.sessions.remove(&session_id)?;

        if let Some(ticket) = entry.ticket {
            self.release(entry.record_id, ticket);
        }

        Some(entry.state)
    }

    #[cfg(test)]
    pub fn open_sessions(&self) -> usize {
        self.sessions.len()
    }

    #[cfg(test)]
    pub fn pending_submissions(&self) -> usize {
        self.current.len()
    }
}

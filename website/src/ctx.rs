use crate::services::session::SessionData;

/// Per-request view of the browser session.
#[derive(Clone)]
pub struct Ctx {
    pub session_id: String,
    pub session: SessionData,
}

impl Ctx {
    pub fn new(session_id: String, session: SessionData) -> Self {
        Ctx {
            session_id,
            session,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}

use crate::model::SearchParams;

/// Ambient session context. One instance is created at app start, shared
/// through the app state, mutated only through the setters below and torn
/// down never: it lives for the process.
#[derive(Debug, Default)]
pub struct Session {
    current_user: Option<String>,
    last_search: Option<SearchParams>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` drops back to an anonymous session.
    pub fn set_user(&mut self, user_id: Option<String>) {
        self.current_user = user_id.filter(|id| !id.trim().is_empty());
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    pub fn set_last_search(&mut self, params: SearchParams) {
        self.last_search = Some(params);
    }

    pub fn last_search(&self) -> Option<&SearchParams> {
        self.last_search.as_ref()
    }
}

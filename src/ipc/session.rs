use crate::model::Id;

/// Per-connection authentication state. Starts anonymous; only a successful
/// login moves it to `Authenticated`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated { teacher_id: Id, name: String },
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn teacher_name(&self) -> Option<&str> {
        match self {
            Session::Authenticated { name, .. } => Some(name),
            Session::Anonymous => None,
        }
    }

    pub fn teacher_id(&self) -> Option<Id> {
        match self {
            Session::Authenticated { teacher_id, .. } => Some(*teacher_id),
            Session::Anonymous => None,
        }
    }

    pub fn login(&mut self, teacher_id: Id, name: impl Into<String>) {
        *self = Session::Authenticated {
            teacher_id,
            name: name.into(),
        };
    }

    /// Returns the name of the teacher who was logged in, if any.
    pub fn logout(&mut self) -> Option<String> {
        match std::mem::take(self) {
            Session::Authenticated { name, .. } => Some(name),
            Session::Anonymous => None,
        }
    }
}

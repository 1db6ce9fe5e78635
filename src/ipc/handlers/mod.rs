pub mod activities;
pub mod auth;
pub mod classes;
pub mod reports;
pub mod students;
pub mod teachers;

use crate::ipc::session::Session;
use crate::ipc::types::AppState;
use crate::model::{same_registration, Id};

/// The logged-in teacher's current name. Edits made after login show up
/// here; a teacher removed mid-session keeps the name cached at login.
fn teacher_display_name(state: &AppState, session: &Session) -> String {
    let stored = session
        .teacher_id()
        .and_then(|id| state.store.read(|r| r.teachers.get(id).map(|t| t.name.clone())));
    stored
        .or_else(|| session.teacher_name().map(str::to_string))
        .unwrap_or_default()
}

/// True when another entity (not `except`) already uses `registration`.
fn registration_taken<'a, I>(existing: I, registration: &str, except: Option<Id>) -> bool
where
    I: IntoIterator<Item = (Id, &'a str)>,
{
    existing
        .into_iter()
        .any(|(id, reg)| Some(id) != except && same_registration(reg, registration))
}

/// Empty edit fields keep the current value.
fn apply_edit(field: &mut String, new_value: &str) {
    if !new_value.is_empty() {
        *field = new_value.to_string();
    }
}

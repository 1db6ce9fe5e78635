use super::{registration_taken, teacher_display_name};
use crate::ipc::error::CommandError;
use crate::ipc::session::Session;
use crate::ipc::types::{success, AppState, Payload, Reply};
use crate::model::{hash_password, Teacher};

pub fn register_teacher(state: &AppState, name: &str, registration: &str, password: &str) -> Reply {
    let password_hash = hash_password(password);
    state.store.write(|r| -> Reply {
        let existing = r.teachers.iter().map(|t| (t.id, t.registration.as_str()));
        if registration_taken(existing, registration, None) {
            return Err(CommandError::DuplicateRegistration);
        }
        let id = r.teachers.next_id();
        r.teachers.insert(Teacher {
            id,
            name: name.to_string(),
            registration: registration.to_string(),
            password_hash,
        });
        tracing::info!(teacher_id = id, "teacher registered");
        success("Professor cadastrado.")
    })
}

/// Unknown registration and wrong password produce the same error.
pub fn login(state: &AppState, session: &mut Session, registration: &str, password: &str) -> Reply {
    let password_hash = hash_password(password);
    let found = state.store.read(|r| {
        r.teachers
            .iter()
            .find(|t| t.registration == registration && t.password_hash == password_hash)
            .map(|t| (t.id, t.name.clone()))
    });

    match found {
        Some((id, name)) => {
            tracing::info!(teacher_id = id, registration, "login succeeded");
            session.login(id, name.clone());
            Ok(Payload::LoggedIn { name })
        }
        None => {
            tracing::warn!(registration, "login failed");
            Err(CommandError::BadCredentials)
        }
    }
}

pub fn logout(state: &AppState, session: &mut Session) -> Reply {
    let teacher_id = session.teacher_id();
    let name = teacher_display_name(state, session);
    match session.logout() {
        Some(_) => {
            tracing::info!(teacher_id, teacher = %name, "logout");
            Ok(Payload::LoggedOut { name })
        }
        None => Err(CommandError::NotLoggedIn),
    }
}

use super::{apply_edit, registration_taken};
use crate::ipc::command::IdArg;
use crate::ipc::error::CommandError;
use crate::ipc::types::{notice, records, success, AppState, Reply};
use crate::model::Student;
use serde_json::json;

fn row(s: &Student) -> serde_json::Value {
    json!({ "id": s.id, "nome": s.name, "matricula": s.registration })
}

pub fn list(state: &AppState) -> Reply {
    records(state.store.read(|r| r.students.iter().map(row).collect()))
}

pub fn create(state: &AppState, name: &str, registration: &str) -> Reply {
    state.store.write(|r| -> Reply {
        let existing = r.students.iter().map(|s| (s.id, s.registration.as_str()));
        if registration_taken(existing, registration, None) {
            return Err(CommandError::DuplicateRegistration);
        }
        let id = r.students.next_id();
        r.students.insert(Student {
            id,
            name: name.to_string(),
            registration: registration.to_string(),
        });
        tracing::info!(student_id = id, "student registered");
        success("Aluno cadastrado.")
    })
}

pub fn edit(state: &AppState, id: IdArg, name: &str, registration: &str) -> Reply {
    state.store.write(|r| -> Reply {
        let id = id
            .filter(|id| r.students.contains(*id))
            .ok_or(CommandError::StudentNotFound)?;
        if !registration.is_empty() {
            let existing = r.students.iter().map(|s| (s.id, s.registration.as_str()));
            if registration_taken(existing, registration, Some(id)) {
                return Err(CommandError::DuplicateRegistration);
            }
        }
        let s = r
            .students
            .get_mut(id)
            .ok_or(CommandError::StudentNotFound)?;
        apply_edit(&mut s.name, name);
        apply_edit(&mut s.registration, registration);
        tracing::info!(student_id = id, "student updated");
        success("Aluno atualizado.")
    })
}

/// Drops the student from every class and every grade map, then deletes it.
/// All three collections are rewritten in the same locked write.
pub fn remove(state: &AppState, id: IdArg) -> Reply {
    state.store.write(|r| -> Reply {
        let id = id
            .filter(|id| r.students.contains(*id))
            .ok_or(CommandError::StudentNotFound)?;

        let mut unenrolled = 0;
        for class in r.classes.iter_mut() {
            let before = class.students.len();
            class.students.retain(|sid| *sid != id);
            unenrolled += before - class.students.len();
        }
        let mut grades_dropped = 0;
        for activity in r.activities.iter_mut() {
            if activity.grades.shift_remove(&id).is_some() {
                grades_dropped += 1;
            }
        }
        r.students.remove(id);

        tracing::info!(student_id = id, unenrolled, grades_dropped, "student removed");
        success("Aluno removido.")
    })
}

/// Case-insensitive substring match on name or registration number.
pub fn search(state: &AppState, query: &str) -> Reply {
    let needle = query.to_lowercase();
    let rows = state.store.read(|r| {
        r.students
            .iter()
            .filter(|s| {
                s.name.to_lowercase().contains(&needle)
                    || s.registration.to_lowercase().contains(&needle)
            })
            .map(row)
            .collect()
    });
    records(rows)
}

pub fn classes_of(state: &AppState, id: IdArg) -> Reply {
    state.store.read(|r| -> Reply {
        let id = id
            .filter(|id| r.students.contains(*id))
            .ok_or(CommandError::StudentNotFound)?;
        let rows: Vec<serde_json::Value> = r
            .classes
            .iter()
            .filter(|c| c.is_enrolled(id))
            .map(|c| json!({ "id": c.id, "nome": c.name }))
            .collect();
        if rows.is_empty() {
            return notice("Aluno não está matriculado em nenhuma turma.");
        }
        records(rows)
    })
}

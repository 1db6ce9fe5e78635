use super::apply_edit;
use crate::ipc::command::IdArg;
use crate::ipc::error::CommandError;
use crate::ipc::types::{notice, records, success, AppState, Reply};
use crate::model::ClassGroup;
use serde_json::json;

/// Includes student and activity counts per class.
pub fn list(state: &AppState) -> Reply {
    let rows = state.store.read(|r| {
        r.classes
            .iter()
            .map(|c| {
                json!({
                    "id": c.id,
                    "nome": c.name,
                    "alunos": c.students.len(),
                    "atividades": c.activities.len(),
                })
            })
            .collect()
    });
    records(rows)
}

pub fn create(state: &AppState, name: &str) -> Reply {
    state.store.write(|r| {
        let id = r.classes.next_id();
        r.classes.insert(ClassGroup {
            id,
            name: name.to_string(),
            students: Vec::new(),
            activities: Vec::new(),
        });
        tracing::info!(class_id = id, "class registered");
        success("Turma cadastrada.")
    })
}

pub fn edit(state: &AppState, id: IdArg, name: &str) -> Reply {
    state.store.write(|r| -> Reply {
        let class = id
            .and_then(|id| r.classes.get_mut(id))
            .ok_or(CommandError::ClassNotFound)?;
        apply_edit(&mut class.name, name);
        tracing::info!(class_id = class.id, "class updated");
        success("Turma atualizada.")
    })
}

/// Deletes the class together with every activity it owns.
pub fn remove(state: &AppState, id: IdArg) -> Reply {
    state.store.write(|r| -> Reply {
        let class = id
            .and_then(|id| r.classes.remove(id))
            .ok_or(CommandError::ClassNotFound)?;
        let activities_removed = r.activities.retain(|a| a.class_id != class.id);
        tracing::info!(class_id = class.id, activities_removed, "class removed");
        success("Turma e atividades associadas removidas.")
    })
}

pub fn students_of(state: &AppState, id: IdArg) -> Reply {
    state.store.read(|r| -> Reply {
        let class = id
            .and_then(|id| r.classes.get(id))
            .ok_or(CommandError::ClassNotFound)?;
        if class.students.is_empty() {
            return notice("Nenhum aluno matriculado nesta turma.");
        }
        let rows = class
            .students
            .iter()
            .filter_map(|sid| r.students.get(*sid))
            .map(|s| json!({ "id": s.id, "matricula": s.registration, "nome": s.name }))
            .collect();
        records(rows)
    })
}

pub fn activities_of(state: &AppState, id: IdArg) -> Reply {
    state.store.read(|r| -> Reply {
        let class = id
            .and_then(|id| r.classes.get(id))
            .ok_or(CommandError::ClassNotFound)?;
        if class.activities.is_empty() {
            return notice("Nenhuma atividade nesta turma.");
        }
        let rows = class
            .activities
            .iter()
            .filter_map(|aid| r.activities.get(*aid))
            .map(|a| json!({ "id": a.id, "nome": a.name, "descricao": a.description }))
            .collect();
        records(rows)
    })
}

/// Enrolling twice is a no-op notice, not an error.
pub fn enroll(state: &AppState, student_id: IdArg, class_id: IdArg) -> Reply {
    state.store.write(|r| -> Reply {
        let student_id = student_id
            .filter(|id| r.students.contains(*id))
            .ok_or(CommandError::StudentNotFound)?;
        let class_id = class_id
            .filter(|id| r.classes.contains(*id))
            .ok_or(CommandError::ClassNotFound)?;
        if r.classes.get(class_id).is_some_and(|c| c.is_enrolled(student_id)) {
            return notice("Aluno já matriculado.");
        }
        if let Some(class) = r.classes.get_mut(class_id) {
            class.students.push(student_id);
        }
        tracing::info!(student_id, class_id, "student enrolled");
        success("Matriculado com sucesso.")
    })
}

/// Also drops the student's grades in the class's activities.
pub fn unenroll(state: &AppState, class_id: IdArg, student_id: IdArg) -> Reply {
    state.store.write(|r| -> Reply {
        let class_id = class_id
            .filter(|id| r.classes.contains(*id))
            .ok_or(CommandError::ClassNotFound)?;
        let student_id = student_id
            .filter(|id| r.students.contains(*id))
            .ok_or(CommandError::StudentNotFound)?;
        let owned = match r.classes.get(class_id) {
            Some(c) if c.is_enrolled(student_id) => c.activities.clone(),
            _ => return Err(CommandError::NotEnrolled),
        };

        if let Some(class) = r.classes.get_mut(class_id) {
            class.students.retain(|sid| *sid != student_id);
        }
        for aid in owned {
            if let Some(a) = r.activities.get_mut(aid) {
                a.grades.shift_remove(&student_id);
            }
        }
        tracing::info!(student_id, class_id, "student unenrolled");
        success("Desmatriculado.")
    })
}

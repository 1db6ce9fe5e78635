use super::apply_edit;
use crate::ipc::command::IdArg;
use crate::ipc::error::CommandError;
use crate::ipc::types::{notice, records, success, AppState, Reply};
use crate::model::{Activity, MAX_GRADE, MIN_GRADE};
use serde_json::json;

/// Accepts `.` or `,` as the decimal separator. Distinguishes input that is
/// not a number from a number outside `[0, 10]`.
pub fn parse_grade(raw: &str) -> Result<f64, CommandError> {
    let v: f64 = raw
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| CommandError::GradeNotNumber)?;
    if (MIN_GRADE..=MAX_GRADE).contains(&v) {
        Ok(v)
    } else {
        Err(CommandError::GradeOutOfRange)
    }
}

pub fn list(state: &AppState) -> Reply {
    let rows = state.store.read(|r| {
        r.activities
            .iter()
            .map(|a| {
                let class_name = r
                    .classes
                    .get(a.class_id)
                    .map(|c| c.name.as_str())
                    .unwrap_or("N/D");
                json!({
                    "id": a.id,
                    "nome": a.name,
                    "turma_id": a.class_id,
                    "turma_nome": class_name,
                    "descricao": a.description,
                })
            })
            .collect()
    });
    records(rows)
}

pub fn create(state: &AppState, class_id: IdArg, name: &str, description: &str) -> Reply {
    state.store.write(|r| -> Reply {
        let class_id = class_id
            .filter(|id| r.classes.contains(*id))
            .ok_or(CommandError::ClassNotFound)?;
        let id = r.activities.next_id();
        r.activities.insert(Activity {
            id,
            name: name.to_string(),
            description: description.to_string(),
            class_id,
            grades: Default::default(),
        });
        if let Some(class) = r.classes.get_mut(class_id) {
            class.activities.push(id);
        }
        tracing::info!(activity_id = id, class_id, "activity registered");
        success("Atividade cadastrada.")
    })
}

pub fn edit(state: &AppState, id: IdArg, name: &str, description: &str) -> Reply {
    state.store.write(|r| -> Reply {
        let a = id
            .and_then(|id| r.activities.get_mut(id))
            .ok_or(CommandError::ActivityNotFound)?;
        apply_edit(&mut a.name, name);
        apply_edit(&mut a.description, description);
        tracing::info!(activity_id = a.id, "activity updated");
        success("Atividade atualizada.")
    })
}

/// Also unlinks the activity from its class.
pub fn remove(state: &AppState, id: IdArg) -> Reply {
    state.store.write(|r| -> Reply {
        let a = id
            .and_then(|id| r.activities.remove(id))
            .ok_or(CommandError::ActivityNotFound)?;
        if let Some(class) = r.classes.get_mut(a.class_id) {
            class.activities.retain(|aid| *aid != a.id);
        }
        tracing::info!(activity_id = a.id, class_id = a.class_id, "activity removed");
        success("Atividade removida.")
    })
}

pub fn grades_of(state: &AppState, id: IdArg) -> Reply {
    state.store.read(|r| -> Reply {
        let a = id
            .and_then(|id| r.activities.get(id))
            .ok_or(CommandError::ActivityNotFound)?;
        if a.grades.is_empty() {
            return notice("Sem notas registradas.");
        }
        let rows = a
            .grades
            .iter()
            .map(|(sid, grade)| {
                let name = r
                    .students
                    .get(*sid)
                    .map(|s| s.name.as_str())
                    .unwrap_or("Aluno Removido");
                json!({ "id_aluno": sid.to_string(), "nome": name, "nota": grade })
            })
            .collect();
        records(rows)
    })
}

/// Creates or overwrites a grade. The student must be enrolled in the
/// activity's class; nothing changes on any failure.
pub fn set_grade(state: &AppState, activity_id: IdArg, student_id: IdArg, raw: &str) -> Reply {
    state.store.write(|r| -> Reply {
        let activity = activity_id
            .and_then(|id| r.activities.get(id))
            .ok_or(CommandError::ActivityNotFound)?;
        let student_id = student_id
            .filter(|id| r.students.contains(*id))
            .ok_or(CommandError::StudentNotFound)?;
        let grade = parse_grade(raw)?;
        let class = r
            .classes
            .get(activity.class_id)
            .ok_or(CommandError::ActivityClassMissing)?;
        if !class.is_enrolled(student_id) {
            return Err(CommandError::NotInActivityClass);
        }

        let activity_id = activity.id;
        if let Some(a) = r.activities.get_mut(activity_id) {
            a.grades.insert(student_id, grade);
        }
        tracing::info!(activity_id, student_id, grade, "grade recorded");
        success("Nota registrada/atualizada.")
    })
}

pub fn remove_grade(state: &AppState, activity_id: IdArg, student_id: IdArg) -> Reply {
    state.store.write(|r| -> Reply {
        let activity_id = activity_id
            .filter(|id| r.activities.contains(*id))
            .ok_or(CommandError::ActivityNotFound)?;
        let student_id = student_id
            .filter(|sid| {
                r.activities
                    .get(activity_id)
                    .is_some_and(|a| a.grades.contains_key(sid))
            })
            .ok_or(CommandError::GradeNotFound)?;
        if let Some(a) = r.activities.get_mut(activity_id) {
            a.grades.shift_remove(&student_id);
        }
        tracing::info!(activity_id, student_id, "grade removed");
        success("Nota removida.")
    })
}

use super::{apply_edit, registration_taken};
use crate::ipc::command::IdArg;
use crate::ipc::error::CommandError;
use crate::ipc::types::{records, success, AppState, Reply};
use crate::model::hash_password;
use serde_json::json;

/// The credential hash is never listed.
pub fn list(state: &AppState) -> Reply {
    let rows = state.store.read(|r| {
        r.teachers
            .iter()
            .map(|t| json!({ "id": t.id, "nome": t.name, "matricula": t.registration }))
            .collect()
    });
    records(rows)
}

pub fn edit(state: &AppState, id: IdArg, name: &str, registration: &str, password: &str) -> Reply {
    let password_hash = (!password.is_empty()).then(|| hash_password(password));
    state.store.write(|r| -> Reply {
        let id = id
            .filter(|id| r.teachers.contains(*id))
            .ok_or(CommandError::TeacherNotFound)?;
        if !registration.is_empty() {
            let existing = r.teachers.iter().map(|t| (t.id, t.registration.as_str()));
            if registration_taken(existing, registration, Some(id)) {
                return Err(CommandError::DuplicateRegistration);
            }
        }
        let t = r
            .teachers
            .get_mut(id)
            .ok_or(CommandError::TeacherNotFound)?;
        apply_edit(&mut t.name, name);
        apply_edit(&mut t.registration, registration);
        if let Some(hash) = password_hash {
            t.password_hash = hash;
        }
        tracing::info!(teacher_id = id, "teacher updated");
        success("Professor atualizado.")
    })
}

pub fn remove(state: &AppState, id: IdArg) -> Reply {
    state.store.write(|r| -> Reply {
        let removed = id
            .and_then(|id| r.teachers.remove(id))
            .ok_or(CommandError::TeacherNotFound)?;
        tracing::info!(teacher_id = removed.id, "teacher removed");
        success("Professor removido.")
    })
}

#[cfg(test)]
mod tests {
    use crate::ipc::handlers::testing::Harness;
    use serde_json::json;

    #[test]
    fn listing_hides_credentials() {
        let mut h = Harness::logged_in();
        let list = h.json("listar_professores");
        assert_eq!(list, json!([{ "id": 1, "nome": "Ana", "matricula": "T1" }]));
    }

    #[test]
    fn edit_keeps_blank_fields_and_rehashes_password() {
        let mut h = Harness::logged_in();
        assert_eq!(h.send("editar_professor;1;Ana Maria;;novo"), "✅ Professor atualizado.");
        let list = h.json("listar_professores");
        assert_eq!(list[0]["nome"], "Ana Maria");
        assert_eq!(list[0]["matricula"], "T1");

        h.send("logout");
        assert_eq!(h.send("login_professor;T1;novo"), "SUCESSO_LOGIN:Ana Maria");
    }

    #[test]
    fn edit_rejects_registration_owned_by_someone_else() {
        let mut h = Harness::logged_in();
        h.send("cadastrar_professor;Bia;T2;pw");
        assert_eq!(
            h.send("editar_professor;2;;t1;"),
            "❌ ERRO: Matrícula já cadastrada."
        );
        // Changing only the case of one's own number is fine.
        assert_eq!(h.send("editar_professor;1;;t1;"), "✅ Professor atualizado.");
    }

    #[test]
    fn missing_teacher_is_reported() {
        let mut h = Harness::logged_in();
        assert_eq!(h.send("remover_professor;9"), "❌ ERRO: Professor não encontrado.");
        assert_eq!(h.send("editar_professor;x;a;b;c"), "❌ ERRO: Professor não encontrado.");
        assert_eq!(h.send("remover_professor;1"), "✅ Professor removido.");
        assert_eq!(h.json("listar_professores"), json!([]));
    }
}

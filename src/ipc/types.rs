use crate::ipc::error::CommandError;
use crate::render::ReportRenderer;
use crate::store::Store;
use std::sync::Arc;

/// State shared by every connection handler.
pub struct AppState {
    pub store: Arc<Store>,
    pub renderer: Arc<dyn ReportRenderer>,
    pub pass_mark: f64,
}

/// Successful command outcomes, before wire encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Status line shown with the success marker.
    Success(String),
    /// Informational text sent as-is (reports, "already enrolled", empty views).
    Notice(String),
    /// List and query results, sent as a JSON array.
    Records(serde_json::Value),
    LoggedIn { name: String },
    LoggedOut { name: String },
}

pub type Reply = Result<Payload, CommandError>;

pub fn success(msg: impl Into<String>) -> Reply {
    Ok(Payload::Success(msg.into()))
}

pub fn notice(msg: impl Into<String>) -> Reply {
    Ok(Payload::Notice(msg.into()))
}

pub fn records(rows: Vec<serde_json::Value>) -> Reply {
    Ok(Payload::Records(serde_json::Value::Array(rows)))
}

/// The text sent back to the client for a reply.
pub fn to_wire(reply: &Reply) -> String {
    match reply {
        Ok(Payload::Success(msg)) => format!("✅ {msg}"),
        Ok(Payload::Notice(text)) => text.clone(),
        Ok(Payload::Records(v)) => v.to_string(),
        Ok(Payload::LoggedIn { name }) => format!("SUCESSO_LOGIN:{name}"),
        Ok(Payload::LoggedOut { name }) => {
            format!("✅ SUCESSO_LOGOUT:Até logo, Prof. {name}.")
        }
        Err(e) => e.to_wire(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_forms() {
        assert_eq!(to_wire(&success("Aluno cadastrado.")), "✅ Aluno cadastrado.");
        assert_eq!(to_wire(&notice("Sem notas registradas.")), "Sem notas registradas.");
        assert_eq!(
            to_wire(&Ok(Payload::LoggedIn { name: "Ana".into() })),
            "SUCESSO_LOGIN:Ana"
        );
        assert_eq!(
            to_wire(&Ok(Payload::LoggedOut { name: "Ana".into() })),
            "✅ SUCESSO_LOGOUT:Até logo, Prof. Ana."
        );
        assert_eq!(
            to_wire(&Err(CommandError::StudentNotFound)),
            "❌ ERRO: Aluno não encontrado."
        );
    }

    #[test]
    fn record_lists_are_bracket_delimited() {
        let wire = to_wire(&records(vec![json!({ "id": 1, "nome": "Bob" })]));
        assert!(wire.starts_with('[') && wire.ends_with(']'));
        assert_eq!(to_wire(&records(Vec::new())), "[]");
    }
}

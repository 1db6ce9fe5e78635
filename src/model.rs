use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use indexmap::IndexMap;

pub type Id = u32;

/// Field names follow the persisted record layout, which predates this server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: Id,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "matricula")]
    pub registration: String,
    #[serde(rename = "senha")]
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: Id,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "matricula")]
    pub registration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassGroup {
    pub id: Id,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "alunos", default)]
    pub students: Vec<Id>,
    #[serde(rename = "atividades", default)]
    pub activities: Vec<Id>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: Id,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "turma_id")]
    pub class_id: Id,
    /// Student id -> grade. serde_json writes the keys as decimal strings.
    #[serde(rename = "notas", default)]
    pub grades: IndexMap<Id, f64>,
}

impl ClassGroup {
    pub fn is_enrolled(&self, student_id: Id) -> bool {
        self.students.contains(&student_id)
    }
}

pub const MIN_GRADE: f64 = 0.0;
pub const MAX_GRADE: f64 = 10.0;

/// Lowercase hex SHA-256, the format stored in `senha`.
pub fn hash_password(plain: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plain.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Case-insensitive comparison used for registration numbers.
pub fn same_registration(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Integral grades keep one decimal (`10.0`); everything else uses the
/// shortest round-trip form (`7.5`).
pub fn format_grade(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

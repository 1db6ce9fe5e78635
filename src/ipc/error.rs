use thiserror::Error;

/// Which layer rejected a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Protocol,
    Authorization,
    Domain,
    Render,
}

/// Every failure a command can produce. The display text is the exact
/// message clients show after the error marker.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("Comando inválido ou não reconhecido.")]
    InvalidCommand,
    #[error("Você precisa estar logado para executar esta ação.")]
    NotLoggedIn,
    #[error("Matrícula ou senha inválida.")]
    BadCredentials,

    #[error("Matrícula já cadastrada.")]
    DuplicateRegistration,
    #[error("Professor não encontrado.")]
    TeacherNotFound,
    #[error("Aluno não encontrado.")]
    StudentNotFound,
    #[error("Turma não encontrada.")]
    ClassNotFound,
    #[error("Atividade não encontrada.")]
    ActivityNotFound,
    #[error("Turma da atividade não encontrada.")]
    ActivityClassMissing,
    #[error("Aluno não está matriculado nessa turma.")]
    NotEnrolled,
    #[error("Aluno não pertence a esta turma.")]
    NotInActivityClass,
    #[error("Nota deve ser um número.")]
    GradeNotNumber,
    #[error("Nota deve ser entre 0 e 10.")]
    GradeOutOfRange,
    #[error("Nenhuma nota encontrada para esse aluno nesta atividade.")]
    GradeNotFound,
    #[error("Não há alunos cadastrados.")]
    NoStudents,

    #[error("Falha ao gerar documento: {0}")]
    Render(String),
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::InvalidCommand => ErrorKind::Protocol,
            CommandError::NotLoggedIn => ErrorKind::Authorization,
            CommandError::Render(_) => ErrorKind::Render,
            _ => ErrorKind::Domain,
        }
    }

    pub fn to_wire(&self) -> String {
        format!("❌ ERRO: {self}")
    }
}

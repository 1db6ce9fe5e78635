use crate::ipc::error::CommandError;
use crate::model::Id;

/// An id argument. `None` when the field is not a positive integer; such an id
/// never resolves, so the command fails with the entity's "not found" error.
pub type IdArg = Option<Id>;

/// One request, decoded from `action;arg1;arg2...`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    RegisterTeacher { name: String, registration: String, password: String },
    Login { registration: String, password: String },
    ListTeachers,
    EditTeacher { id: IdArg, name: String, registration: String, password: String },
    RemoveTeacher { id: IdArg },

    ListStudents,
    RegisterStudent { name: String, registration: String },
    EditStudent { id: IdArg, name: String, registration: String },
    RemoveStudent { id: IdArg },
    SearchStudents { query: String },
    StudentClasses { id: IdArg },

    ListClasses,
    RegisterClass { name: String },
    EditClass { id: IdArg, name: String },
    RemoveClass { id: IdArg },
    ClassStudents { id: IdArg },
    ClassActivities { id: IdArg },
    Enroll { student_id: IdArg, class_id: IdArg },
    Unenroll { class_id: IdArg, student_id: IdArg },

    ListActivities,
    RegisterActivity { class_id: IdArg, name: String, description: String },
    EditActivity { id: IdArg, name: String, description: String },
    RemoveActivity { id: IdArg },
    ActivityGrades { id: IdArg },
    SetGrade { activity_id: IdArg, student_id: IdArg, grade: String },
    RemoveGrade { activity_id: IdArg, student_id: IdArg },

    ClassTextReport { class_id: IdArg },
    ClassDocument { class_id: IdArg },
    Transcripts,
    ClassInsights,
    BestAndWorst { class_id: IdArg },
    Logout,
}

/// Action name and number of arguments after it.
const ACTIONS: &[(&str, usize)] = &[
    ("cadastrar_professor", 3),
    ("login_professor", 2),
    ("listar_professores", 0),
    ("editar_professor", 4),
    ("remover_professor", 1),
    ("listar_alunos", 0),
    ("cadastrar_aluno", 2),
    ("editar_aluno", 3),
    ("remover_aluno", 1),
    ("buscar_aluno", 1),
    ("ver_turmas_do_aluno", 1),
    ("listar_turmas", 0),
    ("cadastrar_turma", 1),
    ("editar_turma", 2),
    ("remover_turma", 1),
    ("ver_alunos_da_turma", 1),
    ("ver_atividades_da_turma", 1),
    ("matricular_aluno_em_turma", 2),
    ("desmatricular_aluno", 2),
    ("listar_atividades", 0),
    ("cadastrar_atividade", 3),
    ("editar_atividade", 3),
    ("remover_atividade", 1),
    ("ver_notas_atividade", 1),
    ("adicionar_editar_nota", 3),
    ("remover_nota", 2),
    ("gerar_relatorio_texto", 1),
    ("gerar_relatorios_pdf_turma", 1),
    ("gerar_boletins_pdf", 0),
    ("gerar_relatorio_inteligente", 0),
    ("melhor_pior_aluno_turma", 1),
    ("logout", 0),
];

/// Actions allowed before login.
pub const PUBLIC_ACTIONS: &[&str] = &["cadastrar_professor", "login_professor"];

pub fn action_name(payload: &str) -> &str {
    payload.split(';').next().unwrap_or_default()
}

pub fn is_public(action: &str) -> bool {
    PUBLIC_ACTIONS.contains(&action)
}

pub fn arity(action: &str) -> Option<usize> {
    ACTIONS
        .iter()
        .find(|(name, _)| *name == action)
        .map(|(_, n)| *n)
}

fn parse_id(raw: &str) -> IdArg {
    raw.trim().parse::<Id>().ok().filter(|id| *id > 0)
}

impl Command {
    /// Unknown actions and wrong argument counts are both `InvalidCommand`.
    pub fn parse(payload: &str) -> Result<Command, CommandError> {
        let mut fields = payload.split(';');
        let action = fields.next().unwrap_or_default();
        let args: Vec<&str> = fields.collect();
        if arity(action) != Some(args.len()) {
            return Err(CommandError::InvalidCommand);
        }
        let s = |i: usize| args[i].to_string();
        let id = |i: usize| parse_id(args[i]);

        let cmd = match action {
            "cadastrar_professor" => Command::RegisterTeacher {
                name: s(0),
                registration: s(1),
                password: s(2),
            },
            "login_professor" => Command::Login {
                registration: s(0),
                password: s(1),
            },
            "listar_professores" => Command::ListTeachers,
            "editar_professor" => Command::EditTeacher {
                id: id(0),
                name: s(1),
                registration: s(2),
                password: s(3),
            },
            "remover_professor" => Command::RemoveTeacher { id: id(0) },

            "listar_alunos" => Command::ListStudents,
            "cadastrar_aluno" => Command::RegisterStudent {
                name: s(0),
                registration: s(1),
            },
            "editar_aluno" => Command::EditStudent {
                id: id(0),
                name: s(1),
                registration: s(2),
            },
            "remover_aluno" => Command::RemoveStudent { id: id(0) },
            "buscar_aluno" => Command::SearchStudents { query: s(0) },
            "ver_turmas_do_aluno" => Command::StudentClasses { id: id(0) },

            "listar_turmas" => Command::ListClasses,
            "cadastrar_turma" => Command::RegisterClass { name: s(0) },
            "editar_turma" => Command::EditClass {
                id: id(0),
                name: s(1),
            },
            "remover_turma" => Command::RemoveClass { id: id(0) },
            "ver_alunos_da_turma" => Command::ClassStudents { id: id(0) },
            "ver_atividades_da_turma" => Command::ClassActivities { id: id(0) },
            "matricular_aluno_em_turma" => Command::Enroll {
                student_id: id(0),
                class_id: id(1),
            },
            "desmatricular_aluno" => Command::Unenroll {
                class_id: id(0),
                student_id: id(1),
            },

            "listar_atividades" => Command::ListActivities,
            "cadastrar_atividade" => Command::RegisterActivity {
                class_id: id(0),
                name: s(1),
                description: s(2),
            },
            "editar_atividade" => Command::EditActivity {
                id: id(0),
                name: s(1),
                description: s(2),
            },
            "remover_atividade" => Command::RemoveActivity { id: id(0) },
            "ver_notas_atividade" => Command::ActivityGrades { id: id(0) },
            "adicionar_editar_nota" => Command::SetGrade {
                activity_id: id(0),
                student_id: id(1),
                grade: s(2),
            },
            "remover_nota" => Command::RemoveGrade {
                activity_id: id(0),
                student_id: id(1),
            },

            "gerar_relatorio_texto" => Command::ClassTextReport { class_id: id(0) },
            "gerar_relatorios_pdf_turma" => Command::ClassDocument { class_id: id(0) },
            "gerar_boletins_pdf" => Command::Transcripts,
            "gerar_relatorio_inteligente" => Command::ClassInsights,
            "melhor_pior_aluno_turma" => Command::BestAndWorst { class_id: id(0) },
            "logout" => Command::Logout,
            _ => return Err(CommandError::InvalidCommand),
        };
        Ok(cmd)
    }

    /// Wire action name, for logging.
    pub fn action(&self) -> &'static str {
        match self {
            Command::RegisterTeacher { .. } => "cadastrar_professor",
            Command::Login { .. } => "login_professor",
            Command::ListTeachers => "listar_professores",
            Command::EditTeacher { .. } => "editar_professor",
            Command::RemoveTeacher { .. } => "remover_professor",
            Command::ListStudents => "listar_alunos",
            Command::RegisterStudent { .. } => "cadastrar_aluno",
            Command::EditStudent { .. } => "editar_aluno",
            Command::RemoveStudent { .. } => "remover_aluno",
            Command::SearchStudents { .. } => "buscar_aluno",
            Command::StudentClasses { .. } => "ver_turmas_do_aluno",
            Command::ListClasses => "listar_turmas",
            Command::RegisterClass { .. } => "cadastrar_turma",
            Command::EditClass { .. } => "editar_turma",
            Command::RemoveClass { .. } => "remover_turma",
            Command::ClassStudents { .. } => "ver_alunos_da_turma",
            Command::ClassActivities { .. } => "ver_atividades_da_turma",
            Command::Enroll { .. } => "matricular_aluno_em_turma",
            Command::Unenroll { .. } => "desmatricular_aluno",
            Command::ListActivities => "listar_atividades",
            Command::RegisterActivity { .. } => "cadastrar_atividade",
            Command::EditActivity { .. } => "editar_atividade",
            Command::RemoveActivity { .. } => "remover_atividade",
            Command::ActivityGrades { .. } => "ver_notas_atividade",
            Command::SetGrade { .. } => "adicionar_editar_nota",
            Command::RemoveGrade { .. } => "remover_nota",
            Command::ClassTextReport { .. } => "gerar_relatorio_texto",
            Command::ClassDocument { .. } => "gerar_relatorios_pdf_turma",
            Command::Transcripts => "gerar_boletins_pdf",
            Command::ClassInsights => "gerar_relatorio_inteligente",
            Command::BestAndWorst { .. } => "melhor_pior_aluno_turma",
            Command::Logout => "logout",
        }
    }
}

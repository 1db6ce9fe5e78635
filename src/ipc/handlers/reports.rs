use super::teacher_display_name;
use crate::calc;
use crate::ipc::command::IdArg;
use crate::ipc::error::CommandError;
use crate::ipc::session::Session;
use crate::ipc::types::{notice, success, AppState, Reply};
use crate::model::format_grade;
use std::path::Path;

/// One line per enrolled student: `reg - name -> Activity: grade | ...`.
pub fn class_text(state: &AppState, class_id: IdArg) -> Reply {
    let report = state.store.read(|r| {
        class_id
            .and_then(|id| r.classes.get(id))
            .map(|c| calc::class_report(r, c))
    });
    let report = report.ok_or(CommandError::ClassNotFound)?;

    let mut lines = vec![format!("Relatório da Turma {}", report.class_name)];
    if report.rows.is_empty() {
        lines.push("Sem alunos matriculados.".to_string());
    }
    for row in &report.rows {
        let grades = if row.grades.is_empty() {
            "Sem notas".to_string()
        } else {
            row.grades
                .iter()
                .map(|(activity, g)| format!("{activity}: {}", format_grade(*g)))
                .collect::<Vec<_>>()
                .join(" | ")
        };
        lines.push(format!("{} - {} -> {}", row.registration, row.name, grades));
    }
    tracing::info!(class_id = report.class_id, "class text report generated");
    notice(lines.join("\n"))
}

/// Data is gathered under the store lock; the document is written after it
/// is released.
pub fn class_document(state: &AppState, session: &Session, class_id: IdArg) -> Reply {
    let report = state.store.read(|r| {
        class_id
            .and_then(|id| r.classes.get(id))
            .map(|c| calc::class_report(r, c))
    });
    let report = report.ok_or(CommandError::ClassNotFound)?;
    let teacher = teacher_display_name(state, session);

    let path = state
        .renderer
        .render_class_report(&report, &teacher)
        .map_err(|e| {
            tracing::error!(error = %format!("{e:#}"), "class document failed");
            CommandError::Render(e.to_string())
        })?;
    tracing::info!(class_id = report.class_id, path = %path.display(), "class document written");
    success(format!(
        "SUCESSO: Documento '{}' gerado na máquina do servidor.",
        display_name(&path)
    ))
}

/// One transcript per registered student, pass/fail against the configured mark.
pub fn transcripts(state: &AppState, session: &Session) -> Reply {
    let pass_mark = state.pass_mark;
    let transcripts = state.store.read(|r| -> Result<Vec<calc::Transcript>, CommandError> {
        if r.students.is_empty() {
            return Err(CommandError::NoStudents);
        }
        Ok(r.students
            .iter()
            .map(|s| calc::transcript(r, s, pass_mark))
            .collect())
    })?;
    let teacher = teacher_display_name(state, session);

    let folder = state
        .renderer
        .render_transcripts(&transcripts, &teacher)
        .map_err(|e| {
            tracing::error!(error = %format!("{e:#}"), "transcripts failed");
            CommandError::Render(e.to_string())
        })?;
    tracing::info!(count = transcripts.len(), folder = %folder.display(), "transcripts written");
    success(format!(
        "SUCESSO: {} boletins gerados na pasta '{}' no servidor.",
        transcripts.len(),
        display_name(&folder)
    ))
}

/// Replies name the document, not where the server keeps it.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Flat mean per class with a qualitative label.
pub fn insights(state: &AppState) -> Reply {
    let mut lines = vec!["=== Relatório Inteligente ===".to_string()];
    let per_class: Vec<(String, f64)> = state.store.read(|r| {
        r.classes
            .iter()
            .map(|c| (c.name.clone(), calc::class_flat_mean(r, c)))
            .collect()
    });
    if per_class.is_empty() {
        lines.push("\nNenhuma turma cadastrada para análise.".to_string());
    }
    for (name, mean) in per_class {
        let label = calc::Performance::classify(mean).label();
        lines.push(format!("\nTurma {name} - Média: {mean:.2} -> {label}"));
    }
    notice(lines.join("\n"))
}

pub fn best_and_worst(state: &AppState, class_id: IdArg) -> Reply {
    let ranked = state.store.read(|r| {
        class_id
            .and_then(|id| r.classes.get(id))
            .map(|c| calc::best_and_worst(r, c))
    });
    match ranked.ok_or(CommandError::ClassNotFound)? {
        None => notice("Nenhum aluno com notas nesta turma."),
        Some((best, worst)) => notice(format!(
            "Melhor: {} - Média: {:.2}\nPior: {} - Média: {:.2}",
            best.name, best.mean, worst.name, worst.mean
        )),
    }
}

#[cfg(test)]
mod tests {
    use crate::ipc::handlers::testing::Harness;

    #[test]
    fn text_report_lists_grades_or_marker() {
        let mut h = Harness::logged_in();
        h.send("cadastrar_turma;Math");
        h.send("cadastrar_aluno;Bob;S1");
        h.send("cadastrar_aluno;Eve;S2");
        h.send("matricular_aluno_em_turma;1;1");
        h.send("matricular_aluno_em_turma;2;1");
        h.send("cadastrar_atividade;1;Quiz;");
        h.send("cadastrar_atividade;1;Test;");
        h.send("adicionar_editar_nota;1;1;7.5");
        h.send("adicionar_editar_nota;2;1;10");

        assert_eq!(
            h.send("gerar_relatorio_texto;1"),
            "Relatório da Turma Math\nS1 - Bob -> Quiz: 7.5 | Test: 10.0\nS2 - Eve -> Sem notas"
        );
        assert_eq!(h.send("gerar_relatorio_texto;2"), "❌ ERRO: Turma não encontrada.");
    }

    #[test]
    fn text_report_for_empty_class() {
        let mut h = Harness::logged_in();
        h.send("cadastrar_turma;Math");
        assert_eq!(
            h.send("gerar_relatorio_texto;1"),
            "Relatório da Turma Math\nSem alunos matriculados."
        );
    }

    #[test]
    fn insights_use_flat_mean_and_labels() {
        let mut h = Harness::logged_in();
        assert_eq!(
            h.send("gerar_relatorio_inteligente"),
            "=== Relatório Inteligente ===\n\nNenhuma turma cadastrada para análise."
        );

        h.send("cadastrar_turma;Math");
        h.send("cadastrar_turma;Art");
        h.send("cadastrar_aluno;Bob;S1");
        h.send("matricular_aluno_em_turma;1;1");
        h.send("cadastrar_atividade;1;Quiz;");
        h.send("adicionar_editar_nota;1;1;9");
        assert_eq!(
            h.send("gerar_relatorio_inteligente"),
            "=== Relatório Inteligente ===\n\
             \nTurma Math - Média: 9.00 -> Excelente desempenho\n\
             \nTurma Art - Média: 0.00 -> Desempenho abaixo do esperado"
        );
    }

    #[test]
    fn best_and_worst_ignores_ungraded_students() {
        let mut h = Harness::logged_in();
        h.send("cadastrar_turma;Math");
        h.send("cadastrar_aluno;Bob;S1");
        h.send("cadastrar_aluno;Eve;S2");
        h.send("matricular_aluno_em_turma;1;1");
        h.send("matricular_aluno_em_turma;2;1");
        assert_eq!(h.send("melhor_pior_aluno_turma;1"), "Nenhum aluno com notas nesta turma.");

        h.send("cadastrar_atividade;1;Quiz;");
        h.send("cadastrar_atividade;1;Test;");
        h.send("adicionar_editar_nota;1;1;10");
        h.send("adicionar_editar_nota;2;1;6");
        assert_eq!(
            h.send("melhor_pior_aluno_turma;1"),
            "Melhor: Bob - Média: 8.00\nPior: Bob - Média: 8.00"
        );
    }

    #[test]
    fn documents_are_rendered_to_the_reports_dir() {
        let mut h = Harness::logged_in();
        assert_eq!(h.send("gerar_boletins_pdf"), "❌ ERRO: Não há alunos cadastrados.");

        h.send("cadastrar_turma;Math");
        h.send("cadastrar_aluno;Bob;S1");
        h.send("cadastrar_aluno;Eve;S2");
        h.send("matricular_aluno_em_turma;1;1");
        h.send("cadastrar_atividade;1;Quiz;");
        h.send("adicionar_editar_nota;1;1;5");

        let reports = h.dir.path().join("reports");
        assert_eq!(
            h.send("gerar_relatorios_pdf_turma;1"),
            "✅ SUCESSO: Documento 'relatorio_turma_1.txt' gerado na máquina do servidor."
        );
        assert!(reports.join("relatorio_turma_1.txt").is_file());

        assert_eq!(
            h.send("gerar_boletins_pdf"),
            "✅ SUCESSO: 2 boletins gerados na pasta 'boletins_alunos' no servidor."
        );
        let bob = std::fs::read_to_string(reports.join("boletins_alunos/boletim_S1_1.txt"))
            .expect("bob transcript");
        assert!(bob.contains("Situação: REPROVADO"), "{bob}");
        assert!(bob.contains("Emitido por: Prof. Ana"));
    }

    #[test]
    fn documents_are_signed_with_the_current_teacher_name() {
        let mut h = Harness::logged_in();
        h.send("cadastrar_turma;Math");
        h.send("cadastrar_aluno;Bob;S1");
        h.send("editar_professor;1;Ana Maria;;");

        h.send("gerar_relatorios_pdf_turma;1");
        h.send("gerar_boletins_pdf");
        let reports = h.dir.path().join("reports");
        let class_doc =
            std::fs::read_to_string(reports.join("relatorio_turma_1.txt")).expect("class doc");
        assert!(class_doc.contains("Gerado por: Prof. Ana Maria em"), "{class_doc}");
        let bob = std::fs::read_to_string(reports.join("boletins_alunos/boletim_S1_1.txt"))
            .expect("bob transcript");
        assert!(bob.contains("Emitido por: Prof. Ana Maria em"), "{bob}");
    }
}

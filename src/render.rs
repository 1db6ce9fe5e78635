use crate::calc::{ClassReport, Transcript};
use crate::model::format_grade;
use anyhow::Context;
use std::path::{Path, PathBuf};

pub const TRANSCRIPTS_DIR: &str = "boletins_alunos";

/// Turns prepared report data into documents on the server's disk.
pub trait ReportRenderer: Send + Sync {
    /// Returns the path of the written document.
    fn render_class_report(&self, report: &ClassReport, teacher: &str) -> anyhow::Result<PathBuf>;

    /// Writes one document per transcript and returns the folder holding them.
    fn render_transcripts(&self, transcripts: &[Transcript], teacher: &str)
        -> anyhow::Result<PathBuf>;
}

/// Plain UTF-8 text documents.
pub struct TextDocumentRenderer {
    out_dir: PathBuf,
}

impl TextDocumentRenderer {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }
}

fn stamp() -> String {
    chrono::Local::now().format("%d/%m/%Y %H:%M").to_string()
}

fn write_doc(path: &Path, body: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))
}

/// One line per entry, newline-terminated.
fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn class_report_document(report: &ClassReport, teacher: &str) -> String {
    let mut lines = vec![
        format!("Relatório - Turma {}", report.class_name),
        format!("Gerado por: Prof. {teacher} em {}", stamp()),
        String::new(),
    ];
    if report.rows.is_empty() {
        lines.push("Sem alunos matriculados.".to_string());
        return finish(lines);
    }
    for row in &report.rows {
        lines.push(format!("{} - {}", row.registration, row.name));
        lines.extend(
            row.grades
                .iter()
                .map(|(activity, grade)| format!("    {activity}: {}", format_grade(*grade))),
        );
        lines.push(String::new());
    }
    finish(lines)
}

pub fn transcript_document(t: &Transcript, teacher: &str) -> String {
    let mut lines = vec![
        "Boletim Escolar".to_string(),
        format!("Aluno: {}", t.student_name),
        format!("Matrícula: {}  |  ID: {}", t.registration, t.student_id),
        format!("Emitido por: Prof. {teacher} em {}", stamp()),
        "-".repeat(60),
    ];

    if t.classes.is_empty() {
        lines.push("Aluno não está matriculado em nenhuma turma.".to_string());
        return finish(lines);
    }

    for c in &t.classes {
        lines.push(format!("Turma: {}", c.class_name));
        if c.lines.is_empty() {
            lines.push("  Nenhuma atividade cadastrada nesta turma.".to_string());
        }
        for l in &c.lines {
            let grade = l.grade.map(format_grade).unwrap_or_else(|| "—".to_string());
            lines.push(format!("  {:<30} {:<55} {grade}", l.activity, l.description));
        }
        if let Some(avg) = c.average {
            lines.push(format!("Média da turma {}: {avg:.2}", c.class_name));
        }
        lines.push(String::new());
    }

    if let (Some(overall), Some(standing)) = (t.overall, t.standing) {
        lines.push(format!(
            "Média geral: {overall:.2}   |   Situação: {}",
            standing.label()
        ));
    }
    finish(lines)
}

impl ReportRenderer for TextDocumentRenderer {
    fn render_class_report(&self, report: &ClassReport, teacher: &str) -> anyhow::Result<PathBuf> {
        let path = self
            .out_dir
            .join(format!("relatorio_turma_{}.txt", report.class_id));
        write_doc(&path, &class_report_document(report, teacher))?;
        Ok(path)
    }

    fn render_transcripts(
        &self,
        transcripts: &[Transcript],
        teacher: &str,
    ) -> anyhow::Result<PathBuf> {
        let dir = self.out_dir.join(TRANSCRIPTS_DIR);
        for t in transcripts {
            // Registration numbers are free text; keep the file name portable.
            let reg: String = t
                .registration
                .chars()
                .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
                .collect();
            let path = dir.join(format!("boletim_{reg}_{}.txt", t.student_id));
            write_doc(&path, &transcript_document(t, teacher))?;
        }
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{ClassReportRow, Standing, TranscriptClass, TranscriptLine};

    fn report() -> ClassReport {
        ClassReport {
            class_id: 4,
            class_name: "Math".into(),
            rows: vec![ClassReportRow {
                registration: "S1".into(),
                name: "Bob".into(),
                grades: vec![("Quiz".into(), 10.0)],
            }],
        }
    }

    #[test]
    fn class_report_is_written_under_out_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let r = TextDocumentRenderer::new(dir.path());
        let path = r.render_class_report(&report(), "Ana").expect("render");
        assert_eq!(path, dir.path().join("relatorio_turma_4.txt"));

        let text = std::fs::read_to_string(path).expect("read");
        assert!(text.starts_with("Relatório - Turma Math\n"));
        assert!(text.contains("Gerado por: Prof. Ana"));
        assert!(text.contains("S1 - Bob\n    Quiz: 10.0\n"));
    }

    #[test]
    fn empty_class_document_ends_with_the_notice() {
        let empty = ClassReport {
            rows: Vec::new(),
            ..report()
        };
        let text = class_report_document(&empty, "Ana");
        assert!(text.ends_with("\n\nSem alunos matriculados.\n"), "{text}");
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn transcripts_land_in_their_own_folder() {
        let dir = tempfile::tempdir().expect("tempdir");
        let r = TextDocumentRenderer::new(dir.path());
        let transcripts = vec![
            Transcript {
                student_id: 1,
                student_name: "Bob".into(),
                registration: "S/1".into(),
                classes: vec![TranscriptClass {
                    class_name: "Math".into(),
                    lines: vec![TranscriptLine {
                        activity: "Quiz".into(),
                        description: "cap. 1".into(),
                        grade: Some(7.5),
                    }],
                    average: Some(7.5),
                }],
                overall: Some(7.5),
                standing: Some(Standing::Approved),
            },
            Transcript {
                student_id: 2,
                student_name: "Eve".into(),
                registration: "S2".into(),
                classes: Vec::new(),
                overall: None,
                standing: None,
            },
        ];
        let folder = r.render_transcripts(&transcripts, "Ana").expect("render");
        assert_eq!(folder, dir.path().join(TRANSCRIPTS_DIR));

        let bob = std::fs::read_to_string(folder.join("boletim_S_1_1.txt")).expect("bob");
        assert!(bob.contains("Média da turma Math: 7.50"));
        assert!(bob.contains("Média geral: 7.50   |   Situação: APROVADO"));

        let eve = std::fs::read_to_string(folder.join("boletim_S2_2.txt")).expect("eve");
        assert!(eve.contains("Aluno não está matriculado em nenhuma turma."));
        assert!(!eve.contains("Média geral"));
    }
}

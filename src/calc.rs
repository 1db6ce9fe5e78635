use crate::model::{Activity, ClassGroup, Id, Student};
use crate::store::Roster;

pub const DEFAULT_PASS_MARK: f64 = 6.0;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// The class's activities in class order, skipping ids that no longer resolve.
pub fn class_activities<'a>(
    roster: &'a Roster,
    class: &'a ClassGroup,
) -> impl Iterator<Item = &'a Activity> + 'a {
    class
        .activities
        .iter()
        .filter_map(move |id| roster.activities.get(*id))
}

/// Recorded grades of one student across a class's activities. Activities
/// without a grade for the student are skipped, never counted as zero.
pub fn student_grades<'a>(
    roster: &'a Roster,
    class: &'a ClassGroup,
    student_id: Id,
) -> Vec<(&'a Activity, f64)> {
    class_activities(roster, class)
        .filter_map(|a| a.grades.get(&student_id).map(|g| (a, *g)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performance {
    Excellent,
    Good,
    Average,
    BelowExpectations,
}

impl Performance {
    pub fn classify(mean: f64) -> Self {
        if mean >= 8.5 {
            Performance::Excellent
        } else if mean >= 7.0 {
            Performance::Good
        } else if mean >= 5.0 {
            Performance::Average
        } else {
            Performance::BelowExpectations
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Performance::Excellent => "Excelente desempenho",
            Performance::Good => "Bom desempenho",
            Performance::Average => "Desempenho mediano",
            Performance::BelowExpectations => "Desempenho abaixo do esperado",
        }
    }
}

/// Flat mean over every grade of every activity the class owns. Unlike the
/// transcript, each grade weighs the same regardless of student. An
/// ungraded class averages 0.
pub fn class_flat_mean(roster: &Roster, class: &ClassGroup) -> f64 {
    let all: Vec<f64> = class_activities(roster, class)
        .flat_map(|a| a.grades.values().copied())
        .collect();
    mean(&all).unwrap_or(0.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedStudent {
    pub student_id: Id,
    pub name: String,
    pub mean: f64,
}

/// Best and worst by per-student mean. Students without grades are left out;
/// ties go to whoever comes first in enrollment order.
pub fn best_and_worst(roster: &Roster, class: &ClassGroup) -> Option<(RankedStudent, RankedStudent)> {
    let ranked: Vec<RankedStudent> = class
        .students
        .iter()
        .filter_map(|sid| {
            let grades: Vec<f64> = student_grades(roster, class, *sid)
                .into_iter()
                .map(|(_, g)| g)
                .collect();
            let m = mean(&grades)?;
            let name = roster
                .students
                .get(*sid)
                .map(|s| s.name.clone())
                .unwrap_or_default();
            Some(RankedStudent {
                student_id: *sid,
                name,
                mean: m,
            })
        })
        .collect();

    let mut iter = ranked.into_iter();
    let first = iter.next()?;
    let (mut best, mut worst) = (first.clone(), first);
    for r in iter {
        if r.mean > best.mean {
            best = r.clone();
        }
        if r.mean < worst.mean {
            worst = r;
        }
    }
    Some((best, worst))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassReportRow {
    pub registration: String,
    pub name: String,
    /// (activity name, grade) for activities that graded this student.
    pub grades: Vec<(String, f64)>,
}

/// Prepared data for the per-class report, both as text and as a document.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassReport {
    pub class_id: Id,
    pub class_name: String,
    pub rows: Vec<ClassReportRow>,
}

pub fn class_report(roster: &Roster, class: &ClassGroup) -> ClassReport {
    let rows = class
        .students
        .iter()
        .filter_map(|sid| roster.students.get(*sid))
        .map(|s| ClassReportRow {
            registration: s.registration.clone(),
            name: s.name.clone(),
            grades: student_grades(roster, class, s.id)
                .into_iter()
                .map(|(a, g)| (a.name.clone(), g))
                .collect(),
        })
        .collect();
    ClassReport {
        class_id: class.id,
        class_name: class.name.clone(),
        rows,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    Approved,
    Failed,
}

impl Standing {
    pub fn label(self) -> &'static str {
        match self {
            Standing::Approved => "APROVADO",
            Standing::Failed => "REPROVADO",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptLine {
    pub activity: String,
    pub description: String,
    pub grade: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptClass {
    pub class_name: String,
    pub lines: Vec<TranscriptLine>,
    /// Mean of the recorded grades in this class, if any.
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub student_id: Id,
    pub student_name: String,
    pub registration: String,
    /// Empty when the student is not enrolled anywhere.
    pub classes: Vec<TranscriptClass>,
    /// Mean of the per-class means; classes without grades do not count.
    pub overall: Option<f64>,
    pub standing: Option<Standing>,
}

pub fn transcript(roster: &Roster, student: &Student, pass_mark: f64) -> Transcript {
    let classes: Vec<TranscriptClass> = roster
        .classes
        .iter()
        .filter(|c| c.is_enrolled(student.id))
        .map(|c| {
            let lines: Vec<TranscriptLine> = class_activities(roster, c)
                .map(|a| TranscriptLine {
                    activity: a.name.clone(),
                    description: a.description.clone(),
                    grade: a.grades.get(&student.id).copied(),
                })
                .collect();
            let recorded: Vec<f64> = lines.iter().filter_map(|l| l.grade).collect();
            TranscriptClass {
                class_name: c.name.clone(),
                average: mean(&recorded),
                lines,
            }
        })
        .collect();

    let class_means: Vec<f64> = classes.iter().filter_map(|c| c.average).collect();
    let overall = mean(&class_means);
    let standing = overall.map(|m| {
        if m >= pass_mark {
            Standing::Approved
        } else {
            Standing::Failed
        }
    });

    Transcript {
        student_id: student.id,
        student_name: student.name.clone(),
        registration: student.registration.clone(),
        classes,
        overall,
        standing,
    }
}

use super::command::{self, Command};
use super::error::CommandError;
use super::handlers::{activities, auth, classes, reports, students, teachers};
use super::session::Session;
use super::types::{AppState, Reply};

/// Decodes one request payload and runs it against the store.
///
/// While anonymous, anything but registration and login is refused before it
/// is parsed; a public action with the wrong field count is still an invalid
/// command. Protocol and authorization errors never touch the session.
pub fn handle_command(state: &AppState, session: &mut Session, payload: &str) -> Reply {
    let action = command::action_name(payload);
    if !session.is_authenticated() && !command::is_public(action) {
        tracing::debug!(action, "refused: not logged in");
        return Err(CommandError::NotLoggedIn);
    }

    let cmd = match Command::parse(payload) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(action, "invalid command");
            return Err(e);
        }
    };
    let action = cmd.action();
    tracing::debug!(action, "dispatch");
    let reply = dispatch(state, session, cmd);
    if let Err(e) = &reply {
        tracing::debug!(action, kind = ?e.kind(), error = %e, "command rejected");
    }
    reply
}

fn dispatch(state: &AppState, session: &mut Session, cmd: Command) -> Reply {
    match cmd {
        Command::RegisterTeacher {
            name,
            registration,
            password,
        } => auth::register_teacher(state, &name, &registration, &password),
        Command::Login {
            registration,
            password,
        } => auth::login(state, session, &registration, &password),
        Command::Logout => auth::logout(state, session),

        Command::ListTeachers => teachers::list(state),
        Command::EditTeacher {
            id,
            name,
            registration,
            password,
        } => teachers::edit(state, id, &name, &registration, &password),
        Command::RemoveTeacher { id } => teachers::remove(state, id),

        Command::ListStudents => students::list(state),
        Command::RegisterStudent { name, registration } => {
            students::create(state, &name, &registration)
        }
        Command::EditStudent {
            id,
            name,
            registration,
        } => students::edit(state, id, &name, &registration),
        Command::RemoveStudent { id } => students::remove(state, id),
        Command::SearchStudents { query } => students::search(state, &query),
        Command::StudentClasses { id } => students::classes_of(state, id),

        Command::ListClasses => classes::list(state),
        Command::RegisterClass { name } => classes::create(state, &name),
        Command::EditClass { id, name } => classes::edit(state, id, &name),
        Command::RemoveClass { id } => classes::remove(state, id),
        Command::ClassStudents { id } => classes::students_of(state, id),
        Command::ClassActivities { id } => classes::activities_of(state, id),
        Command::Enroll {
            student_id,
            class_id,
        } => classes::enroll(state, student_id, class_id),
        Command::Unenroll {
            class_id,
            student_id,
        } => classes::unenroll(state, class_id, student_id),

        Command::ListActivities => activities::list(state),
        Command::RegisterActivity {
            class_id,
            name,
            description,
        } => activities::create(state, class_id, &name, &description),
        Command::EditActivity {
            id,
            name,
            description,
        } => activities::edit(state, id, &name, &description),
        Command::RemoveActivity { id } => activities::remove(state, id),
        Command::ActivityGrades { id } => activities::grades_of(state, id),
        Command::SetGrade {
            activity_id,
            student_id,
            grade,
        } => activities::set_grade(state, activity_id, student_id, &grade),
        Command::RemoveGrade {
            activity_id,
            student_id,
        } => activities::remove_grade(state, activity_id, student_id),

        Command::ClassTextReport { class_id } => reports::class_text(state, class_id),
        Command::ClassDocument { class_id } => reports::class_document(state, session, class_id),
        Command::Transcripts => reports::transcripts(state, session),
        Command::ClassInsights => reports::insights(state),
        Command::BestAndWorst { class_id } => reports::best_and_worst(state, class_id),
    }
}

use crate::model::{Activity, ClassGroup, Id, Student, Teacher};
use crate::persist::RecordFile;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub const TEACHERS_FILE: &str = "professores.json";
pub const STUDENTS_FILE: &str = "alunos.json";
pub const CLASSES_FILE: &str = "turmas.json";
pub const ACTIVITIES_FILE: &str = "atividades.json";

pub trait Entity {
    fn id(&self) -> Id;
}

impl Entity for Teacher {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for Student {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for ClassGroup {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for Activity {
    fn id(&self) -> Id {
        self.id
    }
}

/// Insertion-ordered collection that remembers whether it was touched since
/// the last flush. Every mutable accessor marks it dirty.
#[derive(Debug)]
pub struct Collection<T> {
    items: Vec<T>,
    dirty: bool,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            dirty: false,
        }
    }
}

impl<T: Entity> Collection<T> {
    fn from_items(items: Vec<T>) -> Self {
        Self {
            items,
            dirty: false,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Id) -> Option<&T> {
        self.items.iter().find(|x| x.id() == id)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.get(id).is_some()
    }

    pub fn get_mut(&mut self, id: Id) -> Option<&mut T> {
        let item = self.items.iter_mut().find(|x| x.id() == id)?;
        self.dirty = true;
        Some(item)
    }

    /// Highest existing id + 1, so deleting the newest entity frees its id
    /// for the next insert.
    pub fn next_id(&self) -> Id {
        self.items.iter().map(Entity::id).max().unwrap_or(0) + 1
    }

    pub fn insert(&mut self, item: T) {
        self.items.push(item);
        self.dirty = true;
    }

    pub fn remove(&mut self, id: Id) -> Option<T> {
        let pos = self.items.iter().position(|x| x.id() == id)?;
        self.dirty = true;
        Some(self.items.remove(pos))
    }

    /// Mutable pass over every item; used by cascades.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.dirty = true;
        self.items.iter_mut()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|x| keep(x));
        let removed = before - self.items.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }
}

#[derive(Debug, Default)]
pub struct Roster {
    pub teachers: Collection<Teacher>,
    pub students: Collection<Student>,
    pub classes: Collection<ClassGroup>,
    pub activities: Collection<Activity>,
}

impl Roster {
    fn mark_all_dirty(&mut self) {
        self.teachers.dirty = true;
        self.students.dirty = true;
        self.classes.dirty = true;
        self.activities.dirty = true;
    }
}

struct RecordFiles {
    teachers: RecordFile,
    students: RecordFile,
    classes: RecordFile,
    activities: RecordFile,
}

/// The single authoritative copy of the roster. All access goes through
/// [`Store::read`] / [`Store::write`], which hold one mutex for the whole
/// closure and, for writes, for the persistence of whatever it touched.
pub struct Store {
    roster: Mutex<Roster>,
    files: RecordFiles,
}

impl Store {
    /// Loads the four collections and immediately writes them all back, which
    /// checks that the data directory is writable and creates missing records.
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let files = RecordFiles {
            teachers: RecordFile::new(data_dir, TEACHERS_FILE),
            students: RecordFile::new(data_dir, STUDENTS_FILE),
            classes: RecordFile::new(data_dir, CLASSES_FILE),
            activities: RecordFile::new(data_dir, ACTIVITIES_FILE),
        };

        let mut roster = Roster {
            teachers: load_collection(&files.teachers),
            students: load_collection(&files.students),
            classes: load_collection(&files.classes),
            activities: load_collection(&files.activities),
        };

        roster.mark_all_dirty();
        persist_dirty(&files, &mut roster)?;

        Ok(Self {
            roster: Mutex::new(roster),
            files,
        })
    }

    pub fn read<R>(&self, f: impl FnOnce(&Roster) -> R) -> R {
        let guard = self.lock();
        f(&guard)
    }

    /// Runs `f` and persists every collection it touched before releasing the
    /// lock. A failed write is logged; memory stays authoritative and the
    /// next successful write of that collection catches the record up.
    pub fn write<R>(&self, f: impl FnOnce(&mut Roster) -> R) -> R {
        let mut guard = self.lock();
        let out = f(&mut guard);
        if let Err(e) = persist_dirty(&self.files, &mut guard) {
            tracing::error!(error = %format!("{e:#}"), "failed to persist roster changes");
        }
        out
    }

    fn lock(&self) -> MutexGuard<'_, Roster> {
        // Operations validate before mutating, so a panicked holder cannot
        // have left a half-applied change behind.
        self.roster.lock().unwrap_or_else(|p| p.into_inner())
    }
}

fn load_collection<T: Entity + DeserializeOwned>(file: &RecordFile) -> Collection<T> {
    let items: Vec<T> = file.load();
    tracing::info!(path = %file.path().display(), count = items.len(), "loaded records");
    Collection::from_items(items)
}

fn flush<T: Serialize>(file: &RecordFile, c: &mut Collection<T>) -> anyhow::Result<()> {
    if !c.dirty {
        return Ok(());
    }
    file.save(&c.items)?;
    c.dirty = false;
    Ok(())
}

/// Attempts every dirty collection even when an earlier one fails, and
/// reports the first failure.
fn persist_dirty(files: &RecordFiles, roster: &mut Roster) -> anyhow::Result<()> {
    let results = [
        flush(&files.teachers, &mut roster.teachers),
        flush(&files.students, &mut roster.students),
        flush(&files.classes, &mut roster.classes),
        flush(&files.activities, &mut roster.activities),
    ];
    results.into_iter().collect::<anyhow::Result<Vec<()>>>()?;
    Ok(())
}

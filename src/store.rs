use rand::Rng;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::document::{Document, RootShape};
use crate::error::{AuthOutcome, StoreError};
use crate::ids::{canonical_subject_id, generate_student_id, generate_subject_id};
use crate::model::{Student, Subject, MAX_SUBJECTS};

const TARGET_STORE: &str = "enrolmentd::store";

/// Marks for new enrolments are drawn from this range.
pub const MIN_NEW_MARK: i64 = 25;
pub const MAX_NEW_MARK: i64 = 100;

const TEMP_SUFFIX: &str = ".writing";

/// File-backed student records.
///
/// Every operation reads the whole file, mutates in memory and writes the
/// whole file back. There is no locking: two processes sharing a path race
/// and the last writer wins.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    /// Last root shape seen on disk; reused when the file cannot be parsed.
    shape: Option<RootShape>,
    writes: u64,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            shape: None,
            writes: 0,
        }
    }

    /// `new` followed by `ensure_file`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let mut store = Self::new(path);
        store.ensure_file()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn shape(&self) -> Option<RootShape> {
        self.shape
    }

    /// Number of times this instance has written the file.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    /// Create an empty list-root file when none exists (or the existing one is
    /// blank). A non-empty file is never touched, even if it is not valid JSON.
    pub fn ensure_file(&mut self) -> Result<(), StoreError> {
        if self.path.exists() {
            let text = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
                action: "read",
                path: self.path.clone(),
                source,
            })?;
            if !text.trim().is_empty() {
                return Ok(());
            }
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                action: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }
        info!(target: TARGET_STORE, path = %self.path.display(), "creating empty students file");
        self.persist(&Document::empty(RootShape::List))
    }

    fn load(&mut self) -> Result<Document, StoreError> {
        self.ensure_file()?;
        let text = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            action: "read",
            path: self.path.clone(),
            source,
        })?;
        let doc = Document::decode(&text, self.shape.unwrap_or(RootShape::List))?;
        self.shape = Some(doc.shape);
        Ok(doc)
    }

    fn persist(&mut self, doc: &Document) -> Result<(), StoreError> {
        let text = doc.encode()?;
        let tmp = temp_path(&self.path);
        std::fs::write(&tmp, text).map_err(|source| StoreError::Io {
            action: "write",
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            action: "replace",
            path: self.path.clone(),
            source,
        })?;
        self.writes += 1;
        self.shape = Some(doc.shape);
        debug!(
            target: TARGET_STORE,
            path = %self.path.display(),
            students = doc.students.len(),
            shape = ?doc.shape,
            "wrote students file"
        );
        Ok(())
    }

    /// All students in file order.
    pub fn students(&mut self) -> Result<Vec<Student>, StoreError> {
        Ok(self.load()?.students)
    }

    pub fn authenticate(&mut self, email: &str, password: &str) -> Result<AuthOutcome, StoreError> {
        let email = email.trim();
        let password = password.trim();
        if email.is_empty() || password.is_empty() {
            return Ok(AuthOutcome::Empty);
        }
        let doc = self.load()?;
        let Some(idx) = doc.position(email) else {
            return Ok(AuthOutcome::NoSuchStudent);
        };
        if doc.students[idx].password != password {
            return Ok(AuthOutcome::BadPassword);
        }
        Ok(AuthOutcome::Ok)
    }

    /// Look a student up by email. If the record carried legacy subject ids
    /// they are rewritten and the file is saved before returning.
    pub fn get(&mut self, email: &str) -> Result<Student, StoreError> {
        let mut doc = self.load()?;
        let Some(idx) = doc.position(email) else {
            return Err(StoreError::NotFound {
                email: email.to_string(),
            });
        };
        if doc.migrated.contains(&idx) {
            info!(target: TARGET_STORE, email, "persisting normalized subject ids");
            self.persist(&doc)?;
        }
        Ok(doc.students.swap_remove(idx))
    }

    /// Replace the student with the same email, or append a new one.
    ///
    /// Subject ids are rewritten to canonical form. A record holding more than
    /// `MAX_SUBJECTS` subjects, or the same canonical id twice, is refused.
    pub fn upsert(&mut self, student: &Student) -> Result<(), StoreError> {
        let student = checked_record(student)?;
        self.put(student)
    }

    /// Unchecked replace-or-append for records built from a loaded student.
    /// Callers only shrink the subject list or leave it alone.
    fn put(&mut self, student: Student) -> Result<(), StoreError> {
        let mut doc = self.load()?;
        match doc.position(&student.email) {
            Some(idx) => doc.students[idx] = student,
            None => doc.students.push(student),
        }
        self.persist(&doc)
    }

    /// Add a student with a fresh six-digit id and no subjects.
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<Student, StoreError> {
        self.register_with(name, email, password, &mut rand::thread_rng())
    }

    pub fn register_with<R: Rng + ?Sized>(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        rng: &mut R,
    ) -> Result<Student, StoreError> {
        let email = email.trim();
        let mut doc = self.load()?;
        if doc.position(email).is_some() {
            return Err(StoreError::AlreadyExists {
                email: email.to_string(),
            });
        }
        let id = generate_student_id(&doc.student_ids(), rng);
        let name = Some(name.trim().to_string()).filter(|n| !n.is_empty());
        let student = Student::new(Some(id), name, email, password);
        doc.students.push(student.clone());
        self.persist(&doc)?;
        info!(target: TARGET_STORE, email, id = ?student.id, "registered student");
        Ok(student)
    }

    pub fn change_password(&mut self, email: &str, new_password: &str) -> Result<(), StoreError> {
        let mut student = self.get(email)?;
        student.password = new_password.to_string();
        self.put(student)
    }

    /// Enrol the student in a new subject with a random mark.
    pub fn enrol_subject(&mut self, email: &str) -> Result<Subject, StoreError> {
        self.enrol_subject_with(email, &mut rand::thread_rng())
    }

    pub fn enrol_subject_with<R: Rng + ?Sized>(
        &mut self,
        email: &str,
        rng: &mut R,
    ) -> Result<Subject, StoreError> {
        let mut student = self.get(email)?;
        if !student.can_enrol_more() {
            return Err(StoreError::LimitReached {
                email: email.to_string(),
            });
        }
        let id = generate_subject_id(&student.subject_ids(), rng);
        let subject = Subject::new(id, rng.gen_range(MIN_NEW_MARK..=MAX_NEW_MARK));
        student.subjects.push(subject.clone());
        self.put(student)?;
        debug!(target: TARGET_STORE, email, subject = %subject.id, mark = subject.mark, "enrolled subject");
        Ok(subject)
    }

    /// Remove the subject with the given id (any accepted encoding). Returns
    /// false, without writing, when nothing matched.
    pub fn delete_subject(&mut self, email: &str, subject_id: &str) -> Result<bool, StoreError> {
        let mut student = self.get(email)?;
        if !student.remove_subject(subject_id) {
            return Ok(false);
        }
        self.put(student)?;
        Ok(true)
    }

    /// Administrative removal by student id. Returns false when no such id.
    pub fn remove_student(&mut self, student_id: &str) -> Result<bool, StoreError> {
        let student_id = student_id.trim();
        let mut doc = self.load()?;
        let Some(idx) = doc
            .students
            .iter()
            .position(|s| s.id.as_deref() == Some(student_id))
        else {
            return Ok(false);
        };
        let removed = doc.students.remove(idx);
        self.persist(&doc)?;
        warn!(target: TARGET_STORE, id = student_id, email = %removed.email, "removed student");
        Ok(true)
    }

    /// Drop every student. Root shape and dict-root metadata survive.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        let mut doc = self.load()?;
        let count = doc.students.len();
        doc.students.clear();
        self.persist(&doc)?;
        warn!(target: TARGET_STORE, count, "cleared students");
        Ok(())
    }
}

fn checked_record(student: &Student) -> Result<Student, StoreError> {
    if student.subjects.len() > MAX_SUBJECTS {
        return Err(StoreError::LimitReached {
            email: student.email.clone(),
        });
    }
    let mut student = student.clone();
    let mut seen = HashSet::with_capacity(student.subjects.len());
    for subject in student.subjects.iter_mut() {
        subject.id = canonical_subject_id(&subject.id);
        if !seen.insert(subject.id.clone()) {
            return Err(StoreError::DuplicateSubject {
                email: student.email.clone(),
                id: subject.id.clone(),
            });
        }
    }
    Ok(student)
}

/// `<file>.<pid>.writing`, so sidecars sharing one file never share a temp file.
fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}{}", std::process::id(), TEMP_SUFFIX));
    path.with_file_name(name)
}

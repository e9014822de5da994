use crate::error::{Error, Result};
use crate::model::{Marks, NewStudent, Signatures, SignatureKind, Student, StudentPatch};
use anyhow::Context;
use std::time::Duration;
use uuid::Uuid;

pub const DEFAULT_STORAGE_KEY: &str = "mentor_system_data";

/// Key/value medium holding the serialized record set. The SQLite workspace
/// is the production medium; anything that can load and save a string under
/// a key can stand in for it.
pub trait BlobStore {
    fn load(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

pub fn seed_students() -> Vec<Student> {
    let seed = |id: &str, name: &str, roll: &str, year: &str, section: &str, att, w, m| Student {
        id: id.to_string(),
        name: name.to_string(),
        roll_number: roll.to_string(),
        year: year.to_string(),
        section: section.to_string(),
        attendance: att,
        marks: Marks { weekend: w, mid: m },
        signatures: Signatures::default(),
    };
    vec![
        seed("1", "Sai Krishna", "2024001", "2nd Year", "A", 85, 85, 78),
        seed("2", "Anjali Devi", "2024002", "3rd Year", "B", 92, 92, 88),
        seed("3", "Rajesh Kumar", "2024003", "1st Year", "A", 65, 45, 50),
    ]
}

/// Student records mirrored in memory; every mutation rewrites the whole
/// blob. Single writer only: concurrent mutations are last-write-wins.
pub struct RecordStore {
    blobs: Box<dyn BlobStore>,
    key: String,
    students: Vec<Student>,
    latency: Duration,
}

impl RecordStore {
    /// Loads the blob under `key`, seeding the sample set when none exists.
    pub fn open(blobs: Box<dyn BlobStore>, key: &str) -> Result<Self> {
        let mut store = RecordStore {
            blobs,
            key: key.to_string(),
            students: Vec::new(),
            latency: Duration::ZERO,
        };
        store.initialize()?;
        Ok(store)
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn initialize(&mut self) -> Result<()> {
        match self.blobs.load(&self.key)? {
            Some(raw) => {
                self.students = serde_json::from_str(&raw)?;
                log::debug!("loaded {} student records", self.students.len());
            }
            None => {
                let seeded = seed_students();
                self.persist(&seeded)?;
                self.students = seeded;
                log::info!(
                    "seeded {} sample student records under '{}'",
                    self.students.len(),
                    self.key
                );
            }
        }
        Ok(())
    }

    pub fn list(&self) -> Vec<Student> {
        self.pause();
        self.students.clone()
    }

    pub fn get_by_id(&self, id: &str) -> Result<Student> {
        self.pause();
        self.students
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Exact match only; a partial roll number never resolves.
    pub fn get_by_roll_number(&self, roll_number: &str) -> Result<Student> {
        self.pause();
        self.students
            .iter()
            .find(|s| s.roll_number == roll_number)
            .cloned()
            .ok_or_else(|| Error::NotFound(roll_number.to_string()))
    }

    pub fn add(&mut self, data: NewStudent) -> Result<Student> {
        self.pause();
        let student = data.into_student(Uuid::new_v4().to_string());
        let mut next = self.students.clone();
        next.push(student.clone());
        self.commit(next)?;
        Ok(student)
    }

    pub fn update(&mut self, id: &str, patch: StudentPatch) -> Result<Student> {
        self.pause();
        let Some(idx) = self.students.iter().position(|s| s.id == id) else {
            return Err(Error::NotFound(id.to_string()));
        };
        let mut next = self.students.clone();
        patch.apply(&mut next[idx]);
        let updated = next[idx].clone();
        self.commit(next)?;
        Ok(updated)
    }

    /// Sets one signature slot, keeping the other. An empty payload clears it.
    pub fn set_signature(
        &mut self,
        id: &str,
        kind: SignatureKind,
        payload: Option<&str>,
    ) -> Result<Student> {
        let mut signatures = self.get_by_id(id)?.signatures;
        *signatures.slot_mut(kind) = payload
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        self.update(
            id,
            StudentPatch {
                signatures: Some(signatures),
                ..StudentPatch::default()
            },
        )
    }

    /// Absent ids are not an error.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        self.pause();
        let next = self
            .students
            .iter()
            .filter(|s| s.id != id)
            .cloned()
            .collect();
        self.commit(next)
    }

    pub fn replace_all(&mut self, students: Vec<Student>) -> Result<()> {
        self.pause();
        self.commit(students)
    }

    /// The mirror only changes once the blob write succeeded.
    fn commit(&mut self, next: Vec<Student>) -> Result<()> {
        self.persist(&next)?;
        self.students = next;
        Ok(())
    }

    fn persist(&mut self, students: &[Student]) -> Result<()> {
        let raw = serde_json::to_string(students)?;
        self.blobs
            .save(&self.key, &raw)
            .with_context(|| format!("failed to save records under '{}'", self.key))?;
        Ok(())
    }

    fn pause(&self) {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
    }
}

/// Process-local medium for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    entries: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl BlobStore for MemoryBlobStore {
    fn load(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

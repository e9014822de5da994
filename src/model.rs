use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marks {
    pub weekend: i64,
    pub mid: i64,
}

/// Inline image payloads (data URIs). A missing key means "not signed";
/// it is never stored as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signatures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureKind {
    Mentor,
    Principal,
}

impl SignatureKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mentor" => Some(SignatureKind::Mentor),
            "principal" => Some(SignatureKind::Principal),
            _ => None,
        }
    }
}

impl Signatures {
    /// Drops blank payloads so an empty string never reads as "signed".
    pub fn normalized(self) -> Self {
        let keep = |p: Option<String>| p.filter(|v| !v.trim().is_empty());
        Signatures {
            mentor: keep(self.mentor),
            principal: keep(self.principal),
        }
    }

    pub fn slot_mut(&mut self, kind: SignatureKind) -> &mut Option<String> {
        match kind {
            SignatureKind::Mentor => &mut self.mentor,
            SignatureKind::Principal => &mut self.principal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub roll_number: String,
    pub year: String,
    pub section: String,
    /// Percentage; nominally 0..=100 but not enforced here.
    pub attendance: i64,
    pub marks: Marks,
    #[serde(default)]
    pub signatures: Signatures,
}

/// Fields a mentor supplies when creating a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub name: String,
    pub roll_number: String,
    pub year: String,
    pub section: String,
    pub attendance: i64,
    pub marks: Marks,
}

impl NewStudent {
    pub fn into_student(self, id: String) -> Student {
        Student {
            id,
            name: self.name,
            roll_number: self.roll_number,
            year: self.year,
            section: self.section,
            attendance: self.attendance,
            marks: self.marks,
            signatures: Signatures::default(),
        }
    }
}

/// Partial update. `marks` and `signatures` replace the stored values
/// wholesale when present. There is no `id` field: unknown keys (including
/// `id`) are dropped on deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    pub name: Option<String>,
    pub roll_number: Option<String>,
    pub year: Option<String>,
    pub section: Option<String>,
    pub attendance: Option<i64>,
    pub marks: Option<Marks>,
    pub signatures: Option<Signatures>,
}

impl StudentPatch {
    pub fn apply(self, s: &mut Student) {
        if let Some(v) = self.name {
            s.name = v;
        }
        if let Some(v) = self.roll_number {
            s.roll_number = v;
        }
        if let Some(v) = self.year {
            s.year = v;
        }
        if let Some(v) = self.section {
            s.section = v;
        }
        if let Some(v) = self.attendance {
            s.attendance = v;
        }
        if let Some(v) = self.marks {
            s.marks = v;
        }
        if let Some(v) = self.signatures {
            s.signatures = v.normalized();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Mentor,
    /// Read-only viewer of a single record, reached by roll number.
    Parent,
}

/// In-memory proof of a successful login. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub username: String,
    pub role: Role,
    pub token: String,
}

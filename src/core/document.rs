use crate::domain::model::{Member, PersonId};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// On-disk shape of a saved university.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversityDocument {
    pub name: String,
    pub students: Vec<PersonRecord>,
    pub teachers: Vec<PersonRecord>,
    pub courses: Vec<CourseRecord>,
}

/// Students and teachers are written with every attribute they carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub first_name: String,
    pub last_name: String,
    pub id_number: PersonId,
    #[serde(default)]
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub name: String,
    pub description: String,
    pub course_id: String,
    // 必須存在，但可以是 null
    #[serde(deserialize_with = "Option::deserialize")]
    pub teacher_id: Option<PersonId>,
    pub student_ids: Vec<PersonId>,
}

impl PersonRecord {
    pub fn from_member<M: Member>(member: &M) -> Self {
        let person = member.person();
        Self {
            first_name: person.first_name().to_string(),
            last_name: person.last_name().to_string(),
            id_number: person.id(),
            courses: member.get_courses().to_vec(),
        }
    }
}

impl UniversityDocument {
    /// 以四個空白縮排輸出 JSON
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        Ok(buf)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

use crate::adapters::storage::LocalStorage;
use crate::core::document::{CourseRecord, PersonRecord, UniversityDocument};
use crate::domain::model::{
    Course, CourseRef, Member, PersonId, RegistryId, Student, StudentRef, Teacher, TeacherRef,
};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_DATA_FILE: &str = "university_data.json";

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

fn next_registry_id() -> RegistryId {
    RegistryId(NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed))
}

/// In-memory registry of students, teachers and courses.
///
/// Entities are moved in with `add_*` and addressed afterwards through the
/// returned handles. A handle only resolves against the registry generation
/// that issued it, so handles from another university, or from before a
/// [`load`](University::load), are treated as unregistered.
#[derive(Debug)]
pub struct University {
    id: RegistryId,
    name: String,
    students: Vec<Student>,
    teachers: Vec<Teacher>,
    courses: Vec<Course>,
}

impl University {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: next_registry_id(),
            name: name.into(),
            students: Vec::new(),
            teachers: Vec::new(),
            courses: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_student(&mut self, student: Student) -> StudentRef {
        tracing::debug!("Adding student {}", student);
        self.students.push(student);
        StudentRef::new(self.id, self.students.len() - 1)
    }

    pub fn add_teacher(&mut self, teacher: Teacher) -> TeacherRef {
        tracing::debug!("Adding teacher {}", teacher);
        self.teachers.push(teacher);
        TeacherRef::new(self.id, self.teachers.len() - 1)
    }

    /// Enrollments carried by `course` are dropped; students join it only
    /// through [`register_student_to_course`](University::register_student_to_course).
    pub fn add_course(&mut self, mut course: Course) -> CourseRef {
        tracing::debug!("Adding course {} ({})", course.course_id(), course.name());
        course.clear_students();
        self.courses.push(course);
        CourseRef::new(self.id, self.courses.len() - 1)
    }

    pub fn student(&self, student_ref: StudentRef) -> Option<&Student> {
        if student_ref.registry != self.id {
            return None;
        }
        self.students.get(student_ref.index)
    }

    pub fn teacher(&self, teacher_ref: TeacherRef) -> Option<&Teacher> {
        if teacher_ref.registry != self.id {
            return None;
        }
        self.teachers.get(teacher_ref.index)
    }

    pub fn course(&self, course_ref: CourseRef) -> Option<&Course> {
        if course_ref.registry != self.id {
            return None;
        }
        self.courses.get(course_ref.index)
    }

    pub fn students(&self) -> impl Iterator<Item = (StudentRef, &Student)> + '_ {
        self.students
            .iter()
            .enumerate()
            .map(move |(i, s)| (StudentRef::new(self.id, i), s))
    }

    pub fn teachers(&self) -> impl Iterator<Item = (TeacherRef, &Teacher)> + '_ {
        self.teachers
            .iter()
            .enumerate()
            .map(move |(i, t)| (TeacherRef::new(self.id, i), t))
    }

    pub fn courses(&self) -> impl Iterator<Item = (CourseRef, &Course)> + '_ {
        self.courses
            .iter()
            .enumerate()
            .map(move |(i, c)| (CourseRef::new(self.id, i), c))
    }

    /// First student with `id`, in insertion order.
    pub fn find_student(&self, id: PersonId) -> Option<StudentRef> {
        first_with_id(&self.students, id).map(|i| StudentRef::new(self.id, i))
    }

    pub fn find_teacher(&self, id: PersonId) -> Option<TeacherRef> {
        first_with_id(&self.teachers, id).map(|i| TeacherRef::new(self.id, i))
    }

    pub fn find_course(&self, course_id: &str) -> Option<CourseRef> {
        self.courses
            .iter()
            .position(|c| c.course_id() == course_id)
            .map(|i| CourseRef::new(self.id, i))
    }

    pub fn course_teacher(&self, course_ref: CourseRef) -> Option<&Teacher> {
        self.course(course_ref)
            .and_then(|c| c.teacher())
            .and_then(|t| self.teacher(t))
    }

    /// Enrolls the student when both handles belong to this registry; anything
    /// else is ignored. Returns `true` only when a new enrollment was recorded.
    pub fn register_student_to_course(&mut self, student_ref: StudentRef, course_ref: CourseRef) -> bool {
        if self.student(student_ref).is_none() || self.course(course_ref).is_none() {
            tracing::debug!(
                "Ignoring enrollment of {:?} into {:?}: not registered with {}",
                student_ref,
                course_ref,
                self.name
            );
            return false;
        }

        let course = &mut self.courses[course_ref.index];
        let student = &mut self.students[student_ref.index];
        let enrolled = course.add_student(student_ref, student);
        if enrolled {
            tracing::debug!("Enrolled {} in {}", student, course.course_id());
        }
        enrolled
    }

    /// Roster of a course as `get_info` strings, in enrollment order.
    pub fn get_students(&self, course_ref: CourseRef) -> impl Iterator<Item = String> + '_ {
        self.course(course_ref)
            .into_iter()
            .flat_map(move |course| {
                course
                    .students()
                    .iter()
                    .filter_map(move |s| self.student(*s))
                    .map(|s| s.get_info())
            })
    }

    pub fn to_document(&self) -> UniversityDocument {
        UniversityDocument {
            name: self.name.clone(),
            students: self.students.iter().map(PersonRecord::from_member).collect(),
            teachers: self.teachers.iter().map(PersonRecord::from_member).collect(),
            courses: self
                .courses
                .iter()
                .map(|course| CourseRecord {
                    name: course.name().to_string(),
                    description: course.description().to_string(),
                    course_id: course.course_id().to_string(),
                    teacher_id: course
                        .teacher()
                        .and_then(|t| self.teacher(t))
                        .map(|t| t.id()),
                    student_ids: course
                        .students()
                        .iter()
                        .filter_map(|s| self.student(*s))
                        .map(|s| s.id())
                        .collect(),
                })
                .collect(),
        }
    }

    /// Rebuilds a registry from a saved document.
    ///
    /// People come back with empty course lists; student lists are then rebuilt
    /// from course enrollments. Course references to ids that are not in the
    /// document are dropped.
    pub fn from_document(doc: UniversityDocument) -> Self {
        let id = next_registry_id();

        let mut students: Vec<Student> = doc
            .students
            .iter()
            .map(|s| Student::new(s.id_number, &s.first_name, &s.last_name))
            .collect();
        let teachers: Vec<Teacher> = doc
            .teachers
            .iter()
            .map(|t| Teacher::new(t.id_number, &t.first_name, &t.last_name))
            .collect();

        // 重複 id 時以最後一筆為準
        let student_index: HashMap<PersonId, usize> =
            students.iter().enumerate().map(|(i, s)| (s.id(), i)).collect();
        let teacher_index: HashMap<PersonId, usize> =
            teachers.iter().enumerate().map(|(i, t)| (t.id(), i)).collect();

        let mut courses = Vec::with_capacity(doc.courses.len());
        for record in doc.courses {
            let teacher = record
                .teacher_id
                .and_then(|tid| teacher_index.get(&tid))
                .map(|&i| TeacherRef::new(id, i));
            if let (Some(tid), None) = (record.teacher_id, teacher) {
                tracing::warn!("Course {}: teacher {} not found, leaving it unassigned", record.course_id, tid);
            }

            let mut course = Course::new(record.course_id, record.name, record.description, teacher);
            for sid in &record.student_ids {
                match student_index.get(sid) {
                    Some(&i) => {
                        course.add_student(StudentRef::new(id, i), &mut students[i]);
                    }
                    None => {
                        tracing::warn!("Course {}: student {} not found, skipping", course.course_id(), sid);
                    }
                }
            }
            courses.push(course);
        }

        Self {
            id,
            name: doc.name,
            students,
            teachers,
            courses,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        let bytes = self.to_document().to_json_bytes()?;
        String::from_utf8(bytes).map_err(|e| {
            serde_json::Error::io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)).into()
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        UniversityDocument::from_json_slice(json.as_bytes()).map(Self::from_document)
    }

    /// Writes the registry through `storage`, replacing whatever is at `path`.
    pub fn save<S: Storage>(&self, storage: &S, path: &str) -> Result<()> {
        let bytes = self.to_document().to_json_bytes()?;
        storage.write_file(path, &bytes)?;
        tracing::info!("✅ Data saved to {}", path);
        Ok(())
    }

    /// Replaces this registry's whole state with the document at `path`.
    /// On error the registry is left as it was.
    pub fn load<S: Storage>(&mut self, storage: &S, path: &str) -> Result<()> {
        let bytes = storage.read_file(path)?;
        let doc = UniversityDocument::from_json_slice(&bytes)?;
        *self = Self::from_document(doc);
        tracing::info!(
            "📁 Loaded {} from {} ({} students, {} teachers, {} courses)",
            self.name,
            path,
            self.students.len(),
            self.teachers.len(),
            self.courses.len()
        );
        Ok(())
    }

    pub fn save_to_file(&self, filename: &str) -> Result<()> {
        self.save(&LocalStorage::current_dir(), filename)
    }

    pub fn load_from_file(&mut self, filename: &str) -> Result<()> {
        self.load(&LocalStorage::current_dir(), filename)
    }
}

fn first_with_id<M: Member>(members: &[M], id: PersonId) -> Option<usize> {
    members.iter().position(|m| m.id() == id)
}

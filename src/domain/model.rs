use std::fmt;

pub type PersonId = u32;

/// Identity of one generation of a [`University`](crate::core::university::University).
/// Every registry, and every load into an existing registry, gets a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistryId(pub(crate) u64);

macro_rules! entity_ref {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            pub(crate) registry: RegistryId,
            pub(crate) index: usize,
        }

        impl $name {
            pub(crate) fn new(registry: RegistryId, index: usize) -> Self {
                Self { registry, index }
            }
        }
    };
}

entity_ref!(
    /// Handle to a student owned by a university registry.
    StudentRef
);
entity_ref!(
    /// Handle to a teacher owned by a university registry.
    TeacherRef
);
entity_ref!(
    /// Handle to a course owned by a university registry.
    CourseRef
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    id: PersonId,
    first_name: String,
    last_name: String,
}

impl Person {
    pub fn new(id: PersonId, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    pub fn id(&self) -> PersonId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn get_info(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (ID: {})", self.first_name, self.last_name, self.id)
    }
}

/// Shared behaviour of people registered with a university.
pub trait Member {
    fn person(&self) -> &Person;

    /// Course names in the order they were added.
    fn get_courses(&self) -> &[String];

    fn id(&self) -> PersonId {
        self.person().id()
    }

    fn get_info(&self) -> String {
        self.person().get_info()
    }
}

fn push_unique(courses: &mut Vec<String>, course_name: &str) -> bool {
    if courses.iter().any(|c| c == course_name) {
        return false;
    }
    courses.push(course_name.to_string());
    true
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    person: Person,
    courses: Vec<String>,
}

impl Student {
    pub fn new(id: PersonId, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            person: Person::new(id, first_name, last_name),
            courses: Vec::new(),
        }
    }

    /// Adds the course name unless it is already listed. Returns whether the list changed.
    pub fn add_course(&mut self, course_name: &str) -> bool {
        push_unique(&mut self.courses, course_name)
    }
}

impl Member for Student {
    fn person(&self) -> &Person {
        &self.person
    }

    fn get_courses(&self) -> &[String] {
        &self.courses
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.person, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teacher {
    person: Person,
    courses: Vec<String>,
}

impl Teacher {
    pub fn new(id: PersonId, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            person: Person::new(id, first_name, last_name),
            courses: Vec::new(),
        }
    }

    /// Same uniqueness rule as [`Student::add_course`].
    pub fn assign_course(&mut self, course_name: &str) -> bool {
        push_unique(&mut self.courses, course_name)
    }
}

impl Member for Teacher {
    fn person(&self) -> &Person {
        &self.person
    }

    fn get_courses(&self) -> &[String] {
        &self.courses
    }
}

impl fmt::Display for Teacher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.person, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    course_id: String,
    name: String,
    description: String,
    teacher: Option<TeacherRef>,
    students: Vec<StudentRef>,
}

impl Course {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        teacher: Option<TeacherRef>,
    ) -> Self {
        Self {
            course_id: code.into(),
            name: name.into(),
            description: description.into(),
            teacher,
            students: Vec::new(),
        }
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn teacher(&self) -> Option<TeacherRef> {
        self.teacher
    }

    /// Enrolled students in enrollment order.
    pub fn students(&self) -> &[StudentRef] {
        &self.students
    }

    pub fn is_enrolled(&self, student_ref: StudentRef) -> bool {
        self.students.contains(&student_ref)
    }

    /// Enrolls `student` under `student_ref` and records this course's name on the
    /// student. Both sides change together or not at all; the teacher is never touched.
    /// Only the registry calls this, so the handle always names `student`.
    pub(crate) fn add_student(&mut self, student_ref: StudentRef, student: &mut Student) -> bool {
        if self.is_enrolled(student_ref) {
            return false;
        }
        self.students.push(student_ref);
        student.add_course(&self.name);
        true
    }

    pub(crate) fn clear_students(&mut self) {
        self.students.clear();
    }
}

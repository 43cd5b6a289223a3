use anyhow::Result;
use std::collections::BTreeSet;
use tempfile::TempDir;
use uni_registry::{
    Course, LocalStorage, Member, MemoryStorage, PersonId, RegistryError, Storage, Student, Teacher,
    University,
};

fn tech_university() -> University {
    let mut uni = University::new("Tech University");

    let t1 = uni.add_teacher(Teacher::new(111, "Meryl", "Brown"));
    let t2 = uni.add_teacher(Teacher::new(112, "John", "Smith"));
    let s1 = uni.add_student(Student::new(101, "Adam", "Miller"));
    let s2 = uni.add_student(Student::new(102, "Emma", "O'Neil"));
    let c1 = uni.add_course(Course::new("CS125", "Intro to Python", "KN", Some(t1)));
    let c2 = uni.add_course(Course::new("CS111", "OOP", "IPZ", Some(t2)));

    uni.register_student_to_course(s1, c1);
    uni.register_student_to_course(s2, c1);
    uni.register_student_to_course(s2, c2);
    uni
}

fn student_ids(uni: &University) -> BTreeSet<PersonId> {
    uni.students().map(|(_, s)| s.id()).collect()
}

fn teacher_ids(uni: &University) -> BTreeSet<PersonId> {
    uni.teachers().map(|(_, t)| t.id()).collect()
}

fn enrollment(uni: &University) -> Vec<(String, BTreeSet<PersonId>)> {
    uni.courses()
        .map(|(_, c)| {
            let ids = c
                .students()
                .iter()
                .filter_map(|s| uni.student(*s))
                .map(|s| s.id())
                .collect();
            (c.course_id().to_string(), ids)
        })
        .collect()
}

/// 存檔後再載入，id 與選課關係應保持一致
#[test]
fn test_save_then_load_round_trip() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("university_data.json");
    let path = path.to_str().unwrap();

    let original = tech_university();
    original.save_to_file(path)?;

    let mut reloaded = University::new("DRAHO");
    reloaded.load_from_file(path)?;

    assert_eq!(reloaded.name(), "Tech University");
    assert_eq!(student_ids(&reloaded), student_ids(&original));
    assert_eq!(teacher_ids(&reloaded), teacher_ids(&original));
    assert_eq!(enrollment(&reloaded), enrollment(&original));

    let cs125 = reloaded.find_course("CS125").unwrap();
    assert_eq!(
        reloaded.get_students(cs125).collect::<Vec<_>>(),
        ["Adam Miller (ID: 101)", "Emma O'Neil (ID: 102)"]
    );
    assert_eq!(reloaded.course_teacher(cs125).unwrap().get_info(), "Meryl Brown (ID: 111)");

    let emma = reloaded.find_student(102).unwrap();
    assert_eq!(reloaded.student(emma).unwrap().get_courses(), ["Intro to Python", "OOP"]);

    Ok(())
}

#[test]
fn test_saved_document_matches_schema() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap());

    tech_university().save(&storage, "university_data.json")?;

    let raw = std::fs::read_to_string(temp_dir.path().join("university_data.json"))?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;

    assert_eq!(value["name"], "Tech University");
    assert_eq!(
        value["students"][0],
        serde_json::json!({
            "first_name": "Adam",
            "last_name": "Miller",
            "id_number": 101,
            "courses": ["Intro to Python"]
        })
    );
    assert_eq!(value["teachers"][1]["courses"], serde_json::json!([]));
    assert_eq!(
        value["courses"][0],
        serde_json::json!({
            "name": "Intro to Python",
            "description": "KN",
            "course_id": "CS125",
            "teacher_id": 111,
            "student_ids": [101, 102]
        })
    );
    assert!(raw.starts_with("{\n    \"name\""));

    Ok(())
}

#[test]
fn test_save_overwrites_existing_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("university_data.json");
    std::fs::write(&path, "stale content that is much longer than nothing")?;

    University::new("Empty").save_to_file(path.to_str().unwrap())?;

    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(value["name"], "Empty");
    assert_eq!(value["courses"], serde_json::json!([]));
    Ok(())
}

#[test]
fn test_load_missing_file_leaves_registry_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("does_not_exist.json");

    let mut uni = tech_university();
    let err = uni.load_from_file(path.to_str().unwrap()).unwrap_err();

    assert!(matches!(err, RegistryError::IoError(_)));
    assert_eq!(uni.name(), "Tech University");
    assert_eq!(uni.students().count(), 2);
}

#[test]
fn test_load_malformed_json_is_error() {
    let storage = MemoryStorage::new();
    storage.write_file("broken.json", b"{\"name\": \"Tech University\", \"students\": [").unwrap();

    let mut uni = University::new("Before");
    let err = uni.load(&storage, "broken.json").unwrap_err();

    assert!(matches!(err, RegistryError::SerializationError(_)));
    assert_eq!(uni.name(), "Before");
}

#[test]
fn test_load_missing_key_is_error() {
    let storage = MemoryStorage::new();
    storage.write_file("no_courses.json", br#"{"name": "U", "students": [], "teachers": []}"#).unwrap();

    let mut uni = University::new("Before");
    assert!(matches!(
        uni.load(&storage, "no_courses.json"),
        Err(RegistryError::SerializationError(_))
    ));
}

#[test]
fn test_load_skips_dangling_references() -> Result<()> {
    let json = r#"{
        "name": "Partial",
        "students": [{"first_name": "Adam", "last_name": "Miller", "id_number": 101, "courses": []}],
        "teachers": [],
        "courses": [
            {"name": "Intro to Python", "description": "KN", "course_id": "CS125",
             "teacher_id": 111, "student_ids": [101, 102]},
            {"name": "OOP", "description": "IPZ", "course_id": "CS111",
             "teacher_id": null, "student_ids": [102]}
        ]
    }"#;

    let uni = University::from_json(json)?;

    let cs125 = uni.find_course("CS125").unwrap();
    let cs111 = uni.find_course("CS111").unwrap();
    assert!(uni.course_teacher(cs125).is_none());
    assert_eq!(uni.get_students(cs125).collect::<Vec<_>>(), ["Adam Miller (ID: 101)"]);
    assert_eq!(uni.get_students(cs111).count(), 0);

    let saved: serde_json::Value = serde_json::from_str(&uni.to_json()?)?;
    assert_eq!(saved["courses"][0]["teacher_id"], serde_json::Value::Null);
    assert_eq!(saved["courses"][0]["student_ids"], serde_json::json!([101]));
    Ok(())
}

#[test]
fn test_teacher_courses_start_empty_after_reload() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("university_data.json");
    let path = path.to_str().unwrap();

    let mut uni = tech_university();
    let mut teacher = Teacher::new(113, "Ada", "Byron");
    teacher.assign_course("Unrelated");
    uni.add_teacher(teacher);
    uni.save_to_file(path)?;

    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    assert_eq!(saved["teachers"][2]["courses"], serde_json::json!(["Unrelated"]));

    let mut reloaded = University::new("DRAHO");
    reloaded.load_from_file(path)?;
    for (_, teacher) in reloaded.teachers() {
        assert!(teacher.get_courses().is_empty(), "{} kept courses", teacher);
    }
    Ok(())
}

use clap::Parser;
use uni_registry::utils::error::ErrorSeverity;
use uni_registry::utils::{logger, validation::Validate};
use uni_registry::{
    CliConfig, Command, Course, LocalStorage, Member, RegistryConfig, RegistryError, Student, Teacher,
    University,
};

fn main() {
    let cli = CliConfig::parse();

    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level());
    }
    tracing::debug!("CLI config: {:?}", cli);
    tracing::debug!("Registry config: {:?}", config);

    if let Err(e) = run(&cli.command, &config) {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

fn run(command: &Command, config: &RegistryConfig) -> Result<(), RegistryError> {
    let storage = LocalStorage::new(config.storage.data_dir.clone());
    let data_file = config.storage.data_file.as_str();

    match command {
        Command::Demo => {
            let uni = build_demo(&config.university.name);
            uni.save(&storage, data_file)?;
            println!("✅ Data saved to {}", config.data_path().display());

            let mut reloaded = University::new("DRAHO");
            reloaded.load(&storage, data_file)?;
            print_rosters(&reloaded);
        }
        Command::Show => {
            let uni = load(&storage, data_file)?;
            println!("{}", uni.name());
            print_rosters(&uni);
        }
        Command::FindStudent { id } => {
            let uni = load(&storage, data_file)?;
            match uni.find_student(*id).and_then(|s| uni.student(s)) {
                Some(student) => println!("{} courses: {:?}", student.get_info(), student.get_courses()),
                None => println!("No student with ID {}", id),
            }
        }
        Command::FindTeacher { id } => {
            let uni = load(&storage, data_file)?;
            match uni.find_teacher(*id).and_then(|t| uni.teacher(t)) {
                Some(teacher) => println!("{} courses: {:?}", teacher.get_info(), teacher.get_courses()),
                None => println!("No teacher with ID {}", id),
            }
        }
        Command::FindCourse { code } => {
            let uni = load(&storage, data_file)?;
            match uni.find_course(code) {
                Some(course_ref) => print_course(&uni, course_ref),
                None => println!("No course with code {}", code),
            }
        }
    }

    Ok(())
}

fn load(storage: &LocalStorage, data_file: &str) -> Result<University, RegistryError> {
    let mut uni = University::new("");
    uni.load(storage, data_file)?;
    Ok(uni)
}

fn build_demo(name: &str) -> University {
    let mut uni = University::new(name);

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

fn print_rosters(uni: &University) {
    for (course_ref, _) in uni.courses() {
        print_course(uni, course_ref);
    }
}

fn print_course(uni: &University, course_ref: uni_registry::CourseRef) {
    let Some(course) = uni.course(course_ref) else {
        return;
    };
    println!("Course: {}", course.name());
    if let Some(teacher) = uni.course_teacher(course_ref) {
        println!("Teacher: {}", teacher.get_info());
    }
    println!("Students: {:?}", uni.get_students(course_ref).collect::<Vec<_>>());
}

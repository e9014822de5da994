use crate::model::Student;

/// Free-text match: name or year case-insensitively, roll number as a plain
/// substring. Any field matching is enough.
pub fn matches(student: &Student, query: &str) -> bool {
    let q = query.to_lowercase();
    student.name.to_lowercase().contains(&q)
        || student.roll_number.contains(query)
        || student.year.to_lowercase().contains(&q)
}

/// Keeps store order. An empty query returns everything.
pub fn search(students: Vec<Student>, query: &str) -> Vec<Student> {
    students.into_iter().filter(|s| matches(s, query)).collect()
}

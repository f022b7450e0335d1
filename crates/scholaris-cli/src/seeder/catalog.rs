//! Grades, subjects and classes.

use scholaris_models::{ClassId, GradeId, SubjectId, TeacherId};
use sqlx::PgPool;
use std::time::Instant;

use super::models::ClassSeed;
use super::{SeedResult, values_clause};

pub const SUBJECTS: [&str; 8] = [
    "Mathematics",
    "Romanian Language",
    "English",
    "Physics",
    "Chemistry",
    "Biology",
    "History",
    "Geography",
];

const MAX_GRADE: usize = 12;

/// Ensures grades `1..=count` exist (capped at 12) and returns their ids in level order.
pub async fn seed_grades(db: &PgPool, count: usize) -> SeedResult<Vec<GradeId>> {
    let levels: Vec<i32> = (1..=count.min(MAX_GRADE) as i32).collect();

    // The no-op update makes RETURNING yield rows that already existed.
    let ids = sqlx::query_scalar::<_, GradeId>(
        "INSERT INTO grades (level)
         SELECT * FROM UNNEST($1::int[])
         ON CONFLICT (level) DO UPDATE SET level = EXCLUDED.level
         RETURNING id",
    )
    .bind(&levels)
    .fetch_all(db)
    .await?;

    println!("📚 Ensured {} grades", ids.len());
    Ok(ids)
}

pub async fn seed_subjects(db: &PgPool) -> SeedResult<Vec<(SubjectId, String)>> {
    let names: Vec<String> = SUBJECTS.iter().map(|s| s.to_string()).collect();

    let rows = sqlx::query_as::<_, (SubjectId, String)>(
        "INSERT INTO subjects (name)
         SELECT * FROM UNNEST($1::text[])
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
         RETURNING id, name",
    )
    .bind(&names)
    .fetch_all(db)
    .await?;

    println!("📖 Ensured {} subjects", rows.len());
    Ok(rows)
}

/// Teacher `i` teaches subjects `i` and `i + 1` (wrapping), so every
/// subject ends up with a teacher once there are enough teachers.
pub fn subject_links(
    subjects: &[(SubjectId, String)],
    teachers: &[TeacherId],
) -> Vec<(SubjectId, TeacherId)> {
    if subjects.is_empty() {
        return Vec::new();
    }

    let mut links: Vec<(SubjectId, TeacherId)> = teachers
        .iter()
        .enumerate()
        .flat_map(|(idx, &teacher_id)| {
            [idx, idx + 1]
                .into_iter()
                .map(move |s| (subjects[s % subjects.len()].0, teacher_id))
        })
        .collect();
    links.dedup();
    links
}

pub async fn link_subject_teachers(
    db: &PgPool,
    subjects: &[(SubjectId, String)],
    teachers: &[TeacherId],
) -> SeedResult<()> {
    let links = subject_links(subjects, teachers);
    let (subject_ids, teacher_ids): (Vec<SubjectId>, Vec<TeacherId>) =
        links.into_iter().unzip();

    let inserted = sqlx::query(
        "INSERT INTO subject_teachers (subject_id, teacher_id)
         SELECT * FROM UNNEST($1::uuid[], $2::uuid[])
         ON CONFLICT DO NOTHING",
    )
    .bind(&subject_ids)
    .bind(&teacher_ids)
    .execute(db)
    .await?
    .rows_affected();

    println!("   ✓ Linked {} subject teachers", inserted);
    Ok(())
}

/// Class `i` sits in grade `i % grades`, named by level and a section letter
/// ("5A", "5B", ...). Capacity leaves a little headroom over the roster.
pub fn generate_classes(
    count: usize,
    students_per_class: usize,
    grade_ids: &[GradeId],
    teacher_ids: &[TeacherId],
) -> Vec<ClassSeed> {
    if grade_ids.is_empty() {
        return Vec::new();
    }

    (0..count)
        .map(|idx| {
            let grade_idx = idx % grade_ids.len();
            let section = (b'A' + ((idx / grade_ids.len()) % 26) as u8) as char;
            ClassSeed {
                name: format!("{}{}", grade_idx + 1, section),
                capacity: (students_per_class + 5) as i32,
                grade_id: grade_ids[grade_idx],
                supervisor_id: (!teacher_ids.is_empty())
                    .then(|| teacher_ids[idx % teacher_ids.len()]),
            }
        })
        .collect()
}

/// Returns `(id, name, grade)` for each inserted class.
pub async fn seed_classes(
    db: &PgPool,
    count: usize,
    students_per_class: usize,
    grade_ids: &[GradeId],
    teacher_ids: &[TeacherId],
) -> SeedResult<Vec<(ClassId, String, GradeId)>> {
    let start_time = Instant::now();
    println!("🏫 Seeding {} classes...", count);

    let classes = generate_classes(count, students_per_class, grade_ids, teacher_ids);
    if classes.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "INSERT INTO classes (name, capacity, grade_id, supervisor_id) VALUES {} RETURNING id",
        values_clause(classes.len(), 4)
    );
    let mut q = sqlx::query_scalar::<_, ClassId>(&query);
    for class in &classes {
        q = q
            .bind(&class.name)
            .bind(class.capacity)
            .bind(class.grade_id)
            .bind(class.supervisor_id);
    }
    let ids = q.fetch_all(db).await?;

    println!(
        "   ✓ Inserted {} classes in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids
        .into_iter()
        .zip(classes)
        .map(|(id, class)| (id, class.name, class.grade_id))
        .collect())
}

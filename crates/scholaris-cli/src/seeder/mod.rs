//! Fake data for local development.
//!
//! Seeding runs in dependency order: catalog (grades, subjects), people
//! (teachers, parents), classes, students, then one academic module whose
//! weekly lessons are expanded by `scholaris-scheduling`.

mod calendar;
mod catalog;
mod models;
mod people;

pub use calendar::{LessonPlan, plan_lessons};
pub use models::{ClassSeed, LessonSeed, PersonSeed, SeedConfig, StudentSeed};

use scholaris_core::hash_password;
use sqlx::PgPool;
use std::time::Instant;

pub type SeedResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Password given to every seeded account.
pub const SEED_PASSWORD: &str = "password123";

/// Builds `($1, $2), ($3, $4), ...` for a multi-row insert.
pub(crate) fn values_clause(rows: usize, columns: usize) -> String {
    (0..rows)
        .map(|row| {
            let params: Vec<String> = (1..=columns)
                .map(|col| format!("${}", row * columns + col))
                .collect();
            format!("({})", params.join(", "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Runs a full seed.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> SeedResult<()> {
    config.validate()?;

    let start_time = Instant::now();
    println!("🌱 Seeding database...");
    println!(
        "   {} teachers, {} parents, {} classes x {} students, {} week module",
        config.teachers,
        config.parents,
        config.classes,
        config.students_per_class,
        config.module_weeks
    );

    let password_hash =
        hash_password(SEED_PASSWORD).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let grade_ids = catalog::seed_grades(db, config.classes.max(1)).await?;
    let subject_ids = catalog::seed_subjects(db).await?;

    let teacher_ids = people::seed_teachers(db, config.teachers, &password_hash).await?;
    catalog::link_subject_teachers(db, &subject_ids, &teacher_ids).await?;
    let parent_ids = people::seed_parents(db, config.parents, &password_hash).await?;

    let classes = catalog::seed_classes(
        db,
        config.classes,
        config.students_per_class,
        &grade_ids,
        &teacher_ids,
    )
    .await?;
    people::seed_students(
        db,
        &classes,
        &parent_ids,
        config.students_per_class,
        &password_hash,
    )
    .await?;

    let (range, holidays) = calendar::seed_module(db, config.module_weeks).await?;
    let plan = LessonPlan {
        classes: classes.iter().map(|(id, name, _)| (*id, name.clone())).collect(),
        teachers: teacher_ids,
        subjects: subject_ids,
    };
    calendar::seed_lessons(db, &plan, &range, &holidays).await?;

    println!("\n✅ Seeding complete in {:?}", start_time.elapsed());
    println!("   Every seeded account uses the password '{}'", SEED_PASSWORD);
    Ok(())
}

/// Deletes everything except admin accounts.
pub async fn clear_all(db: &PgPool) -> SeedResult<()> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded data...");

    let mut tx = db.begin().await?;

    // Children before parents; lessons cascade to exams, assignments,
    // results and attendance.
    for statement in [
        "DELETE FROM announcements",
        "DELETE FROM events",
        "DELETE FROM lessons",
        "DELETE FROM users WHERE role = 'student'",
        "DELETE FROM classes",
        "DELETE FROM users WHERE role IN ('teacher', 'parent')",
        "DELETE FROM subjects",
        "DELETE FROM grades",
        "DELETE FROM academic_modules",
    ] {
        let affected = sqlx::query(statement).execute(&mut *tx).await?.rows_affected();
        println!("   ✓ {} ({} rows)", statement, affected);
    }

    tx.commit().await?;

    println!("\n✅ Cleared in {:?}", start_time.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_clause_numbers_params_row_major() {
        assert_eq!(values_clause(2, 3), "($1, $2, $3), ($4, $5, $6)");
        assert_eq!(values_clause(1, 1), "($1)");
        assert_eq!(values_clause(0, 4), "");
    }
}

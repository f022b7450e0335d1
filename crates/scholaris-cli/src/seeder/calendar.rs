//! One academic module with holidays, and the weekly lessons inside it.

use std::collections::HashMap;
use std::time::Instant;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime};
use rayon::prelude::*;
use scholaris_models::{ClassId, SubjectId, TeacherId};
use scholaris_scheduling::{
    DateRange, HolidayCalendar, Occurrence, SchoolDay, TeachingHours, WeeklyTemplate,
    conflicting_occurrences, occurrence_name, occurrences,
};
use sqlx::PgPool;

use super::models::LessonSeed;
use super::{SeedResult, values_clause};

const LESSON_MINUTES: i64 = 50;
const BATCH_SIZE: usize = 1000;

/// Who and what the lesson generator draws from.
pub struct LessonPlan {
    pub classes: Vec<(ClassId, String)>,
    pub teachers: Vec<TeacherId>,
    pub subjects: Vec<(SubjectId, String)>,
}

/// The Monday on or after `today`.
fn next_monday(today: NaiveDate) -> NaiveDate {
    let days_ahead = (7 - today.weekday().num_days_from_monday()) % 7;
    today + Duration::days(days_ahead as i64)
}

/// A module of `weeks` school weeks (Monday to Friday) with a holiday on
/// the Wednesday of every fourth week.
pub fn module_calendar(
    today: NaiveDate,
    weeks: u32,
) -> SeedResult<(DateRange, Vec<(String, NaiveDate)>)> {
    let start = next_monday(today);
    let end = start + Duration::days(i64::from(weeks.max(1)) * 7 - 3);
    let range = DateRange::new(start, end)?;

    let holidays = (1..weeks)
        .step_by(4)
        .enumerate()
        .map(|(n, week)| {
            (
                format!("Holiday {}", n + 1),
                start + Duration::days(i64::from(week) * 7 + 2),
            )
        })
        .collect();

    Ok((range, holidays))
}

pub async fn seed_module(db: &PgPool, weeks: u32) -> SeedResult<(DateRange, HolidayCalendar)> {
    let now = Local::now().naive_local();
    let (range, holidays) = module_calendar(now.date(), weeks)?;
    let name = format!("Seed module {}", now.format("%Y-%m-%d %H:%M:%S"));

    let mut tx = db.begin().await?;

    let module_id = sqlx::query_scalar::<_, uuid::Uuid>(
        "INSERT INTO academic_modules (name, start_date, end_date) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&name)
    .bind(range.start())
    .bind(range.end())
    .fetch_one(&mut *tx)
    .await?;

    if !holidays.is_empty() {
        let query = format!(
            "INSERT INTO holidays (module_id, name, date) VALUES {}",
            values_clause(holidays.len(), 3)
        );
        let mut q = sqlx::query(&query);
        for (holiday_name, date) in &holidays {
            q = q.bind(module_id).bind(holiday_name).bind(date);
        }
        q.execute(&mut *tx).await?;
    }

    tx.commit().await?;

    println!(
        "📅 Created '{}' ({} to {}, {} holidays)",
        name,
        range.start(),
        range.end(),
        holidays.len()
    );

    Ok((range, holidays.into_iter().map(|(_, date)| date).collect()))
}

/// Expands one weekly lesson per class and school day over `range`.
///
/// Class `c` on day `d` is taught by teacher `(c + d) % teachers` in one of
/// that teacher's subjects, starting at `8 + c % 7` o'clock. Templates whose
/// occurrences would double-book a teacher are dropped whole; the second
/// value counts them.
pub fn plan_lessons(
    plan: &LessonPlan,
    range: &DateRange,
    holidays: &HolidayCalendar,
) -> (Vec<LessonSeed>, usize) {
    if plan.teachers.is_empty() || plan.subjects.is_empty() {
        return (Vec::new(), 0);
    }

    let hours = TeachingHours::default();

    let templates: Vec<(usize, usize, WeeklyTemplate)> = plan
        .classes
        .iter()
        .enumerate()
        .flat_map(|(class_idx, _)| {
            SchoolDay::ALL.into_iter().enumerate().filter_map(move |(day_idx, day)| {
                let start = NaiveTime::from_hms_opt(8 + (class_idx % 7) as u32, 0, 0)?;
                let end = start + Duration::minutes(LESSON_MINUTES);
                Some((class_idx, day_idx, WeeklyTemplate::new(day, start, end)))
            })
        })
        .collect();

    let expanded: Vec<Vec<Occurrence>> = templates
        .par_iter()
        .map(|(_, _, template)| occurrences(template, range, holidays))
        .collect();

    let mut booked: HashMap<TeacherId, Vec<Occurrence>> = HashMap::new();
    let mut lessons = Vec::new();
    let mut skipped = 0;

    for ((class_idx, day_idx, _), occs) in templates.iter().zip(expanded) {
        let teacher_idx = (class_idx + day_idx) % plan.teachers.len();
        let teacher_id = plan.teachers[teacher_idx];
        let (subject_id, subject_name) = &plan.subjects[teacher_idx % plan.subjects.len()];
        let (class_id, class_name) = &plan.classes[*class_idx];

        let existing = booked.entry(teacher_id).or_default();
        let out_of_hours = occs
            .iter()
            .any(|o| hours.check_lesson(o.day, &o.start, &o.end).is_err());
        if out_of_hours || !conflicting_occurrences(&occs, existing.as_slice()).is_empty() {
            skipped += 1;
            continue;
        }

        let base = format!("{} {}", subject_name, class_name);
        lessons.extend(occs.iter().map(|o| LessonSeed {
            name: occurrence_name(&base, o.date),
            day: o.day,
            start_time: o.start,
            end_time: o.end,
            subject_id: *subject_id,
            class_id: *class_id,
            teacher_id,
        }));
        existing.extend(occs);
    }

    (lessons, skipped)
}

pub async fn seed_lessons(
    db: &PgPool,
    plan: &LessonPlan,
    range: &DateRange,
    holidays: &HolidayCalendar,
) -> SeedResult<usize> {
    let start_time = Instant::now();
    println!("🗓️  Generating weekly lessons for {} classes...", plan.classes.len());

    let (lessons, skipped) = plan_lessons(plan, range, holidays);
    if skipped > 0 {
        println!("   ! Skipped {} weekly lessons that double-booked a teacher", skipped);
    }

    let mut tx = db.begin().await?;
    for chunk in lessons.chunks(BATCH_SIZE) {
        let query = format!(
            "INSERT INTO lessons (name, day, start_time, end_time, subject_id, class_id, teacher_id) VALUES {}",
            values_clause(chunk.len(), 7)
        );
        let mut q = sqlx::query(&query);
        for lesson in chunk {
            q = q
                .bind(&lesson.name)
                .bind(lesson.day)
                .bind(lesson.start_time)
                .bind(lesson.end_time)
                .bind(lesson.subject_id)
                .bind(lesson.class_id)
                .bind(lesson.teacher_id);
        }
        q.execute(&mut *tx).await?;
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} lessons in {:?}",
        lessons.len(),
        start_time.elapsed()
    );
    Ok(lessons.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn plan(classes: usize, teachers: usize) -> LessonPlan {
        LessonPlan {
            classes: (0..classes)
                .map(|i| (ClassId::new(), format!("{}A", i + 1)))
                .collect(),
            teachers: (0..teachers).map(|_| TeacherId::new()).collect(),
            subjects: vec![
                (SubjectId::new(), "Mathematics".to_string()),
                (SubjectId::new(), "History".to_string()),
            ],
        }
    }

    #[test]
    fn module_starts_on_monday_and_ends_on_friday() {
        // 2026-10-14 is a Wednesday.
        let (range, holidays) = module_calendar(date(2026, 10, 14), 5).unwrap();
        assert_eq!(range.start(), date(2026, 10, 19));
        assert_eq!(range.end(), date(2026, 11, 20));
        assert_eq!(
            holidays,
            vec![("Holiday 1".to_string(), date(2026, 10, 28))]
        );
    }

    #[test]
    fn monday_is_its_own_next_monday() {
        assert_eq!(next_monday(date(2026, 10, 19)), date(2026, 10, 19));
    }

    #[test]
    fn one_lesson_per_class_and_school_day_each_week() {
        let (range, _) = module_calendar(date(2026, 10, 19), 2).unwrap();
        let (lessons, skipped) = plan_lessons(&plan(2, 5), &range, &HolidayCalendar::default());

        assert_eq!(skipped, 0);
        assert_eq!(lessons.len(), 2 * 5 * 2);
        assert!(lessons[0].name.starts_with("Mathematics 1A - "));
    }

    #[test]
    fn holidays_are_skipped() {
        let (range, holidays) = module_calendar(date(2026, 10, 19), 2).unwrap();
        let calendar: HolidayCalendar = holidays.into_iter().map(|(_, d)| d).collect();
        let (lessons, _) = plan_lessons(&plan(1, 5), &range, &calendar);

        assert_eq!(lessons.len(), 9);
        assert!(lessons.iter().all(|l| l.start_time.date() != date(2026, 10, 28)));
    }

    #[test]
    fn double_booked_templates_are_dropped() {
        // With one teacher, classes 0 and 7 share the 08:00 slot every day.
        let (range, _) = module_calendar(date(2026, 10, 19), 1).unwrap();
        let (lessons, skipped) = plan_lessons(&plan(8, 1), &range, &HolidayCalendar::default());

        assert_eq!(skipped, 5);
        assert_eq!(lessons.len(), 7 * 5);
    }
}

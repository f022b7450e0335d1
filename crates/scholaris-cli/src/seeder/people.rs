//! Teachers, parents and students, each backed by a `users` row.

use chrono::NaiveDate;
use fake::Fake;
use fake::faker::address::en::{CityName, StreetName};
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use scholaris_models::auth::Role;
use scholaris_models::common::BLOOD_TYPES;
use scholaris_models::{ClassId, Gender, GradeId, ParentId, TeacherId};
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use uuid::Uuid;

use super::models::{PersonSeed, StudentSeed};
use super::{SeedResult, values_clause};

// Postgres caps a statement at 65535 bind parameters.
const BATCH_SIZE: usize = 500;

/// Short per-run tag keeping usernames, emails and phones unique across runs.
fn run_tag() -> String {
    format!("{:04}", Uuid::new_v4().as_u128() % 10_000)
}

fn generate_person(prefix: &str, tag: &str, idx: usize, birth_year: i32) -> PersonSeed {
    let name: String = FirstName().fake();
    let surname: String = LastName().fake();
    let street: String = StreetName().fake();
    let city: String = CityName().fake();

    let gender = if idx % 2 == 0 {
        Gender::Female
    } else {
        Gender::Male
    };
    let birthday = NaiveDate::from_ymd_opt(
        birth_year - (idx % 4) as i32,
        (idx % 12) as u32 + 1,
        (idx % 28) as u32 + 1,
    )
    .unwrap_or(NaiveDate::MIN);

    PersonSeed {
        username: format!("{}{}{}", prefix, tag, idx),
        email: format!(
            "{}.{}.{}{}@example.com",
            name.to_lowercase(),
            surname.to_lowercase(),
            tag,
            idx
        ),
        phone: format!("07{}{:06}", tag, idx),
        address: format!("{} {}, {}", (idx % 200) + 1, street, city),
        blood_type: BLOOD_TYPES[idx % BLOOD_TYPES.len()],
        name,
        surname,
        gender,
        birthday,
    }
}

pub fn generate_people(prefix: &str, count: usize, birth_year: i32) -> Vec<PersonSeed> {
    let tag = run_tag();
    (0..count)
        .into_par_iter()
        .map(|idx| generate_person(prefix, &tag, idx, birth_year))
        .collect()
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    people: &[&PersonSeed],
    role: Role,
    password_hash: &str,
) -> SeedResult<Vec<Uuid>> {
    if people.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "INSERT INTO users (username, password, role) VALUES {} RETURNING id",
        values_clause(people.len(), 3)
    );
    let mut q = sqlx::query_scalar::<_, Uuid>(&query);
    for person in people {
        q = q.bind(&person.username).bind(password_hash).bind(role);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

pub async fn seed_teachers(
    db: &PgPool,
    count: usize,
    password_hash: &str,
) -> SeedResult<Vec<TeacherId>> {
    let start_time = Instant::now();
    println!("👩‍🏫 Seeding {} teachers...", count);

    let people = generate_people("t", count, 1985);
    let mut tx = db.begin().await?;
    let mut all_ids = Vec::with_capacity(people.len());

    for chunk in people.chunks(BATCH_SIZE) {
        let people: Vec<&PersonSeed> = chunk.iter().collect();
        let ids = insert_users_chunk(&mut tx, &people, Role::Teacher, password_hash).await?;

        let query = format!(
            "INSERT INTO teachers (id, name, surname, email, phone, address, blood_type, gender, birthday) VALUES {}",
            values_clause(chunk.len(), 9)
        );
        let mut q = sqlx::query(&query);
        for (id, person) in ids.iter().zip(chunk) {
            q = q
                .bind(id)
                .bind(&person.name)
                .bind(&person.surname)
                .bind(&person.email)
                .bind(&person.phone)
                .bind(&person.address)
                .bind(person.blood_type)
                .bind(person.gender)
                .bind(person.birthday);
        }
        q.execute(&mut *tx).await?;

        all_ids.extend(ids.into_iter().map(TeacherId::from));
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} teachers in {:?}",
        all_ids.len(),
        start_time.elapsed()
    );
    Ok(all_ids)
}

pub async fn seed_parents(
    db: &PgPool,
    count: usize,
    password_hash: &str,
) -> SeedResult<Vec<ParentId>> {
    let start_time = Instant::now();
    println!("👪 Seeding {} parents...", count);

    let people = generate_people("p", count, 1980);
    let mut tx = db.begin().await?;
    let mut all_ids = Vec::with_capacity(people.len());

    for chunk in people.chunks(BATCH_SIZE) {
        let people: Vec<&PersonSeed> = chunk.iter().collect();
        let ids = insert_users_chunk(&mut tx, &people, Role::Parent, password_hash).await?;

        let query = format!(
            "INSERT INTO parents (id, name, surname, email, phone, address) VALUES {}",
            values_clause(chunk.len(), 6)
        );
        let mut q = sqlx::query(&query);
        for (id, person) in ids.iter().zip(chunk) {
            q = q
                .bind(id)
                .bind(&person.name)
                .bind(&person.surname)
                .bind(&person.email)
                .bind(&person.phone)
                .bind(&person.address);
        }
        q.execute(&mut *tx).await?;

        all_ids.extend(ids.into_iter().map(ParentId::from));
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} parents in {:?}",
        all_ids.len(),
        start_time.elapsed()
    );
    Ok(all_ids)
}

/// Fills every class with `per_class` students. Parents are handed out
/// round-robin, so siblings share a parent once students outnumber parents.
pub fn generate_students(
    classes: &[(ClassId, String, GradeId)],
    parent_ids: &[ParentId],
    per_class: usize,
) -> Vec<StudentSeed> {
    if parent_ids.is_empty() {
        return Vec::new();
    }

    let tag = run_tag();
    classes
        .par_iter()
        .enumerate()
        .flat_map(|(class_idx, (class_id, _, grade_id))| {
            (0..per_class)
                .map(|student_idx| {
                    let idx = class_idx * per_class + student_idx;
                    StudentSeed {
                        person: generate_person("s", &tag, idx, 2012),
                        grade_id: *grade_id,
                        class_id: *class_id,
                        parent_id: parent_ids[idx % parent_ids.len()],
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_students(
    db: &PgPool,
    classes: &[(ClassId, String, GradeId)],
    parent_ids: &[ParentId],
    per_class: usize,
    password_hash: &str,
) -> SeedResult<usize> {
    let start_time = Instant::now();
    println!(
        "🎓 Seeding {} students ({} per class)...",
        classes.len() * per_class,
        per_class
    );

    let students = generate_students(classes, parent_ids, per_class);
    let mut tx = db.begin().await?;

    for chunk in students.chunks(BATCH_SIZE) {
        let people: Vec<&PersonSeed> = chunk.iter().map(|s| &s.person).collect();
        let ids = insert_users_chunk(&mut tx, &people, Role::Student, password_hash).await?;

        let query = format!(
            "INSERT INTO students (id, name, surname, email, address, blood_type, gender, birthday, grade_id, class_id, parent_id) VALUES {}",
            values_clause(chunk.len(), 11)
        );
        let mut q = sqlx::query(&query);
        for (id, student) in ids.iter().zip(chunk) {
            let person = &student.person;
            q = q
                .bind(id)
                .bind(&person.name)
                .bind(&person.surname)
                .bind(&person.email)
                .bind(&person.address)
                .bind(person.blood_type)
                .bind(person.gender)
                .bind(person.birthday)
                .bind(student.grade_id)
                .bind(student.class_id)
                .bind(student.parent_id);
        }
        q.execute(&mut *tx).await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} students in {:?}",
        students.len(),
        start_time.elapsed()
    );
    Ok(students.len())
}

//! Seed rows and the knobs that size a seeding run.

use chrono::{NaiveDate, NaiveDateTime};
use scholaris_models::{ClassId, Gender, GradeId, ParentId, SubjectId, TeacherId};
use scholaris_scheduling::SchoolDay;

/// Fields shared by every person profile.
pub struct PersonSeed {
    pub username: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub blood_type: &'static str,
    pub gender: Gender,
    pub birthday: NaiveDate,
}

pub struct StudentSeed {
    pub person: PersonSeed,
    pub grade_id: GradeId,
    pub class_id: ClassId,
    pub parent_id: ParentId,
}

pub struct ClassSeed {
    pub name: String,
    pub capacity: i32,
    pub grade_id: GradeId,
    pub supervisor_id: Option<TeacherId>,
}

/// One materialised lesson of a weekly template.
pub struct LessonSeed {
    pub name: String,
    pub day: SchoolDay,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub subject_id: SubjectId,
    pub class_id: ClassId,
    pub teacher_id: TeacherId,
}

/// Complete configuration for database seeding.
#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub teachers: usize,
    pub parents: usize,
    pub classes: usize,
    pub students_per_class: usize,
    /// Length of the generated academic module.
    pub module_weeks: u32,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            teachers: 10,
            parents: 40,
            classes: 6,
            students_per_class: 20,
            module_weeks: 8,
        }
    }
}

impl SeedConfig {
    pub fn with_teachers(mut self, teachers: usize) -> Self {
        self.teachers = teachers;
        self
    }

    pub fn with_parents(mut self, parents: usize) -> Self {
        self.parents = parents;
        self
    }

    pub fn with_classes(mut self, classes: usize) -> Self {
        self.classes = classes;
        self
    }

    pub fn with_students_per_class(mut self, students: usize) -> Self {
        self.students_per_class = students;
        self
    }

    pub fn with_module_weeks(mut self, weeks: u32) -> Self {
        self.module_weeks = weeks;
        self
    }

    pub fn total_students(&self) -> usize {
        self.classes * self.students_per_class
    }

    /// Students need a parent and classes need a teacher for their lessons.
    pub fn validate(&self) -> Result<(), String> {
        if self.teachers == 0 {
            return Err("At least one teacher is required".to_string());
        }
        if self.students_per_class > 0 && self.parents == 0 {
            return Err("Students need at least one parent".to_string());
        }
        if self.module_weeks == 0 {
            return Err("The module must last at least one week".to_string());
        }
        Ok(())
    }
}

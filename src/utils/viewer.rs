//! The authenticated caller, reduced to what role-scoped queries need.
//!
//! Lists bind the viewer's role and id into a single SQL predicate, for
//! example
//!
//! ```sql
//! ($1::user_role = 'admin'
//!  OR ($1 = 'teacher' AND l.teacher_id = $2)
//!  OR ($1 = 'student' AND s.id = $2)
//!  OR ($1 = 'parent' AND s.parent_id = $2))
//! ```
//!
//! so one statement serves every role.

use scholaris_auth::Role;
use scholaris_core::AppError;
use scholaris_models::TeacherId;
use uuid::Uuid;

/// Rows tied to a lesson `l`: teachers see their lessons, students their
/// class, parents their children's classes. Binds role as `$1`, id as `$2`.
pub const LESSON_SCOPE: &str = r#"($1::user_role = 'admin'
    OR ($1 = 'teacher' AND l.teacher_id = $2)
    OR ($1 = 'student' AND EXISTS (
            SELECT 1 FROM students vs WHERE vs.id = $2 AND vs.class_id = l.class_id))
    OR ($1 = 'parent' AND EXISTS (
            SELECT 1 FROM students vs WHERE vs.parent_id = $2 AND vs.class_id = l.class_id)))"#;

/// The timetable itself: staff see every lesson, students their class and
/// parents their children's classes. Binds role as `$1`, id as `$2`.
pub const TIMETABLE_SCOPE: &str = r#"($1::user_role IN ('admin', 'teacher')
    OR ($1 = 'student' AND EXISTS (
            SELECT 1 FROM students vs WHERE vs.id = $2 AND vs.class_id = l.class_id))
    OR ($1 = 'parent' AND EXISTS (
            SELECT 1 FROM students vs WHERE vs.parent_id = $2 AND vs.class_id = l.class_id)))"#;

/// Rows tied to a student `st` and a lesson `l`: teachers see their
/// lessons, students themselves, parents their children.
pub const STUDENT_SCOPE: &str = r#"($1::user_role = 'admin'
    OR ($1 = 'teacher' AND l.teacher_id = $2)
    OR ($1 = 'student' AND st.id = $2)
    OR ($1 = 'parent' AND st.parent_id = $2))"#;

/// Notices with an optional class `class_id` column on alias `n`.
/// School-wide notices (no class) are visible to everyone.
pub const NOTICE_SCOPE: &str = r#"($1::user_role = 'admin'
    OR n.class_id IS NULL
    OR ($1 = 'teacher' AND EXISTS (
            SELECT 1 FROM lessons vl WHERE vl.teacher_id = $2 AND vl.class_id = n.class_id))
    OR ($1 = 'student' AND EXISTS (
            SELECT 1 FROM students vs WHERE vs.id = $2 AND vs.class_id = n.class_id))
    OR ($1 = 'parent' AND EXISTS (
            SELECT 1 FROM students vs WHERE vs.parent_id = $2 AND vs.class_id = n.class_id)))"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    pub id: Uuid,
    pub role: Role,
}

impl Viewer {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn admin(id: Uuid) -> Self {
        Self::new(id, Role::Admin)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The viewer's teacher profile, when they are a teacher.
    pub fn teacher_id(&self) -> Option<TeacherId> {
        (self.role == Role::Teacher).then_some(TeacherId::from(self.id))
    }

    /// Teachers may only act for themselves; admins for anyone.
    pub fn ensure_acts_for(&self, teacher_id: TeacherId) -> Result<(), AppError> {
        match self.role {
            Role::Admin => Ok(()),
            Role::Teacher if self.id == teacher_id.into_inner() => Ok(()),
            Role::Teacher => Err(AppError::forbidden(anyhow::anyhow!(
                "Teachers can only manage their own lessons"
            ))),
            Role::Student | Role::Parent => {
                Err(AppError::forbidden(anyhow::anyhow!("Access denied")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teacher_acts_only_for_self() {
        let id = Uuid::new_v4();
        let teacher = Viewer::new(id, Role::Teacher);

        assert_eq!(teacher.teacher_id(), Some(TeacherId::from(id)));
        assert!(teacher.ensure_acts_for(TeacherId::from(id)).is_ok());

        let err = teacher.ensure_acts_for(TeacherId::new()).unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
    }

    #[test]
    fn admin_acts_for_anyone() {
        let admin = Viewer::admin(Uuid::new_v4());
        assert!(admin.is_admin());
        assert!(admin.teacher_id().is_none());
        assert!(admin.ensure_acts_for(TeacherId::new()).is_ok());
    }

    #[test]
    fn students_cannot_act() {
        let student = Viewer::new(Uuid::new_v4(), Role::Student);
        assert!(student.ensure_acts_for(TeacherId::new()).is_err());
    }
}

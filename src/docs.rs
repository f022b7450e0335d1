use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use scholaris_core::{PaginationMeta, PaginationParams};
use scholaris_models::academic_modules::{
    AcademicModule, CreateHolidayDto, CreateModuleDto, Holiday, ModuleWithHolidays,
    UpdateModuleDto,
};
use scholaris_models::assignments::{
    Assignment, CreateAssignmentDto, PaginatedAssignmentsResponse, UpdateAssignmentDto,
};
use scholaris_models::attendance::{
    Attendance, CreateAttendanceDto, PaginatedAttendanceResponse, UpdateAttendanceDto,
};
use scholaris_models::auth::{LoginRequest, LoginResponse, UserInfo};
use scholaris_models::classes::{Class, CreateClassDto, PaginatedClassesResponse, UpdateClassDto};
use scholaris_models::documents::{AbsenceReportRequest, CertificateRequest, TranscriptRequest};
use scholaris_models::events::{
    Announcement, CreateAnnouncementDto, CreateEventDto, Event, PaginatedAnnouncementsResponse,
    PaginatedEventsResponse, UpdateAnnouncementDto, UpdateEventDto,
};
use scholaris_models::exams::{CreateExamDto, Exam, PaginatedExamsResponse, UpdateExamDto};
use scholaris_models::grades::{CreateGradeDto, Grade};
use scholaris_models::lessons::{
    AvailabilityResponse, CreateLessonDto, CreateRecurringLessonsDto, Lesson,
    PaginatedLessonsResponse, RecurringLessonsResponse, UpdateLessonDto,
};
use scholaris_models::parents::{
    CreateParentDto, PaginatedParentsResponse, Parent, UpdateParentDto,
};
use scholaris_models::results::{
    CreateResultDto, ExportFormat, PaginatedResultsResponse, ResultEntry, ResultSort,
    ResultSummaryResponse, ScoreSummary, UpdateResultDto,
};
use scholaris_models::students::{
    CreateStudentDto, PaginatedStudentsResponse, Student, UpdateStudentDto,
};
use scholaris_models::subjects::{
    CreateSubjectDto, PaginatedSubjectsResponse, Subject, SubjectWithTeachers, UpdateSubjectDto,
};
use scholaris_models::teachers::{
    CreateTeacherDto, PaginatedTeachersResponse, Teacher, TeacherWithRelations, UpdateTeacherDto,
};
use scholaris_models::{Gender, MessageResponse};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_me,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::parents::controller::create_parent,
        crate::modules::parents::controller::get_parents,
        crate::modules::parents::controller::get_parent,
        crate::modules::parents::controller::update_parent,
        crate::modules::parents::controller::delete_parent,
        crate::modules::grades::controller::create_grade,
        crate::modules::grades::controller::get_grades,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::get_classes,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::subjects::controller::create_subject,
        crate::modules::subjects::controller::get_subjects,
        crate::modules::subjects::controller::get_subject,
        crate::modules::subjects::controller::update_subject,
        crate::modules::subjects::controller::delete_subject,
        crate::modules::academic_modules::controller::create_module,
        crate::modules::academic_modules::controller::get_modules,
        crate::modules::academic_modules::controller::get_module,
        crate::modules::academic_modules::controller::update_module,
        crate::modules::academic_modules::controller::delete_module,
        crate::modules::academic_modules::controller::get_holidays,
        crate::modules::academic_modules::controller::create_holiday,
        crate::modules::academic_modules::controller::delete_holiday,
        crate::modules::lessons::controller::create_lesson,
        crate::modules::lessons::controller::create_recurring_lessons,
        crate::modules::lessons::controller::check_availability,
        crate::modules::lessons::controller::get_lessons,
        crate::modules::lessons::controller::get_lesson,
        crate::modules::lessons::controller::update_lesson,
        crate::modules::lessons::controller::delete_lesson,
        crate::modules::exams::controller::create_exam,
        crate::modules::exams::controller::get_exams,
        crate::modules::exams::controller::get_exam,
        crate::modules::exams::controller::update_exam,
        crate::modules::exams::controller::delete_exam,
        crate::modules::assignments::controller::create_assignment,
        crate::modules::assignments::controller::get_assignments,
        crate::modules::assignments::controller::get_assignment,
        crate::modules::assignments::controller::update_assignment,
        crate::modules::assignments::controller::delete_assignment,
        crate::modules::results::controller::create_result,
        crate::modules::results::controller::get_results,
        crate::modules::results::controller::get_summary,
        crate::modules::results::controller::export_results,
        crate::modules::results::controller::get_result,
        crate::modules::results::controller::update_result,
        crate::modules::results::controller::delete_result,
        crate::modules::attendance::controller::create_attendance,
        crate::modules::attendance::controller::get_attendances,
        crate::modules::attendance::controller::get_attendance,
        crate::modules::attendance::controller::update_attendance,
        crate::modules::attendance::controller::delete_attendance,
        crate::modules::events::controller::create_event,
        crate::modules::events::controller::get_events,
        crate::modules::events::controller::get_event,
        crate::modules::events::controller::update_event,
        crate::modules::events::controller::delete_event,
        crate::modules::announcements::controller::create_announcement,
        crate::modules::announcements::controller::get_announcements,
        crate::modules::announcements::controller::get_announcement,
        crate::modules::announcements::controller::update_announcement,
        crate::modules::announcements::controller::delete_announcement,
        crate::modules::documents::controller::generate_certificate,
        crate::modules::documents::controller::generate_transcript,
        crate::modules::documents::controller::generate_absence_report,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            PaginationMeta,
            PaginationParams,
            Gender,
            LoginRequest,
            LoginResponse,
            UserInfo,
            Teacher,
            TeacherWithRelations,
            CreateTeacherDto,
            UpdateTeacherDto,
            PaginatedTeachersResponse,
            Student,
            CreateStudentDto,
            UpdateStudentDto,
            PaginatedStudentsResponse,
            Parent,
            CreateParentDto,
            UpdateParentDto,
            PaginatedParentsResponse,
            Grade,
            CreateGradeDto,
            Class,
            CreateClassDto,
            UpdateClassDto,
            PaginatedClassesResponse,
            Subject,
            SubjectWithTeachers,
            CreateSubjectDto,
            UpdateSubjectDto,
            PaginatedSubjectsResponse,
            AcademicModule,
            ModuleWithHolidays,
            CreateModuleDto,
            UpdateModuleDto,
            Holiday,
            CreateHolidayDto,
            Lesson,
            CreateLessonDto,
            UpdateLessonDto,
            CreateRecurringLessonsDto,
            RecurringLessonsResponse,
            AvailabilityResponse,
            PaginatedLessonsResponse,
            Exam,
            CreateExamDto,
            UpdateExamDto,
            PaginatedExamsResponse,
            Assignment,
            CreateAssignmentDto,
            UpdateAssignmentDto,
            PaginatedAssignmentsResponse,
            ResultEntry,
            CreateResultDto,
            UpdateResultDto,
            ResultSort,
            ExportFormat,
            ScoreSummary,
            ResultSummaryResponse,
            PaginatedResultsResponse,
            Attendance,
            CreateAttendanceDto,
            UpdateAttendanceDto,
            PaginatedAttendanceResponse,
            Event,
            CreateEventDto,
            UpdateEventDto,
            PaginatedEventsResponse,
            Announcement,
            CreateAnnouncementDto,
            UpdateAnnouncementDto,
            PaginatedAnnouncementsResponse,
            CertificateRequest,
            TranscriptRequest,
            AbsenceReportRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and current user"),
        (name = "Teachers", description = "Teacher accounts and their subjects"),
        (name = "Students", description = "Student accounts and class enrolment"),
        (name = "Parents", description = "Parent accounts"),
        (name = "Grades", description = "Grade levels"),
        (name = "Classes", description = "Classes, supervisors and capacity"),
        (name = "Subjects", description = "Subjects and the teachers who teach them"),
        (name = "Academic modules", description = "Teaching periods and their holidays"),
        (name = "Lessons", description = "Timetable, recurring lessons and teacher availability"),
        (name = "Exams", description = "Exams scheduled on lessons"),
        (name = "Assignments", description = "Assignments set on lessons"),
        (name = "Results", description = "Scores, summaries and exports"),
        (name = "Attendance", description = "Lesson attendance"),
        (name = "Events", description = "School and class events"),
        (name = "Announcements", description = "School and class announcements"),
        (name = "Documents", description = "Generated student paperwork")
    ),
    info(
        title = "Scholaris API",
        version = "0.1.0",
        description = "School management REST API built with Rust, Axum and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

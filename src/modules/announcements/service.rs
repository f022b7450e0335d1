use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::{info, instrument};

use scholaris_core::{AppError, PaginationMeta};
use scholaris_models::AnnouncementId;

use crate::modules::announcements::model::{
    Announcement, CreateAnnouncementDto, NoticeFilterParams, PaginatedAnnouncementsResponse,
    UpdateAnnouncementDto,
};
use crate::modules::events::service::{ensure_may_address, ensure_may_manage};
use crate::utils::viewer::NOTICE_SCOPE;
use crate::utils::{Viewer, map_db_error, school_today};

const ANNOUNCEMENT_SELECT: &str = r#"SELECT n.id, n.title, n.description, n.date,
       n.class_id, c.name AS class_name, n.created_at
FROM announcements n
LEFT JOIN classes c ON c.id = n.class_id"#;

fn check_announcement_date(date: NaiveDate, today: NaiveDate) -> Result<(), AppError> {
    if date < today {
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "Announcement date cannot be in the past"
        )));
    }
    Ok(())
}

pub struct AnnouncementService;

impl AnnouncementService {
    #[instrument(skip(db))]
    pub async fn create_announcement(
        db: &PgPool,
        viewer: Viewer,
        dto: CreateAnnouncementDto,
    ) -> Result<Announcement, AppError> {
        check_announcement_date(dto.date, school_today())?;
        ensure_may_address(db, viewer, dto.class_id).await?;

        let announcement_id = sqlx::query_scalar::<_, AnnouncementId>(
            r#"INSERT INTO announcements (title, description, date, class_id)
               VALUES ($1, $2, $3, $4)
               RETURNING id"#,
        )
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(dto.date)
        .bind(dto.class_id)
        .fetch_one(db)
        .await
        .map_err(map_db_error)?;

        info!(announcement_id = %announcement_id, "announcement published");

        Self::get_announcement(db, viewer, announcement_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_announcements(
        db: &PgPool,
        viewer: Viewer,
        filters: NoticeFilterParams,
    ) -> Result<PaginatedAnnouncementsResponse, AppError> {
        let where_clause = format!(
            r#"WHERE {}
                 AND ($3::uuid IS NULL OR n.class_id = $3)
                 AND ($4::text IS NULL OR n.title ILIKE '%' || $4 || '%')"#,
            NOTICE_SCOPE
        );

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM announcements n {}",
            where_clause
        ))
        .bind(viewer.role)
        .bind(viewer.id)
        .bind(filters.class_id)
        .bind(&filters.search)
        .fetch_one(db)
        .await?;

        let announcements = sqlx::query_as::<_, Announcement>(&format!(
            "{} {} ORDER BY n.date DESC, n.created_at DESC LIMIT $5 OFFSET $6",
            ANNOUNCEMENT_SELECT, where_clause
        ))
        .bind(viewer.role)
        .bind(viewer.id)
        .bind(filters.class_id)
        .bind(&filters.search)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedAnnouncementsResponse {
            data: announcements,
            meta: PaginationMeta::from_params(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_announcement(
        db: &PgPool,
        viewer: Viewer,
        announcement_id: AnnouncementId,
    ) -> Result<Announcement, AppError> {
        sqlx::query_as::<_, Announcement>(&format!(
            "{} WHERE {} AND n.id = $3",
            ANNOUNCEMENT_SELECT, NOTICE_SCOPE
        ))
        .bind(viewer.role)
        .bind(viewer.id)
        .bind(announcement_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Announcement not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_announcement(
        db: &PgPool,
        viewer: Viewer,
        announcement_id: AnnouncementId,
        dto: UpdateAnnouncementDto,
    ) -> Result<Announcement, AppError> {
        let existing = Self::get_announcement(db, viewer, announcement_id).await?;
        ensure_may_manage(db, viewer, existing.class_id).await?;

        if let Some(date) = dto.date {
            check_announcement_date(date, school_today())?;
        }

        let class_id = dto.class_id.unwrap_or(existing.class_id);
        if class_id != existing.class_id {
            ensure_may_address(db, viewer, class_id).await?;
        }

        sqlx::query(
            r#"UPDATE announcements
               SET title = $1, description = $2, date = $3, class_id = $4
               WHERE id = $5"#,
        )
        .bind(dto.title.as_deref().map(str::trim).unwrap_or(&existing.title))
        .bind(dto.description.unwrap_or(existing.description))
        .bind(dto.date.unwrap_or(existing.date))
        .bind(class_id)
        .bind(announcement_id)
        .execute(db)
        .await
        .map_err(map_db_error)?;

        Self::get_announcement(db, viewer, announcement_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_announcement(
        db: &PgPool,
        viewer: Viewer,
        announcement_id: AnnouncementId,
    ) -> Result<(), AppError> {
        let existing = Self::get_announcement(db, viewer, announcement_id).await?;
        ensure_may_manage(db, viewer, existing.class_id).await?;

        sqlx::query("DELETE FROM announcements WHERE id = $1")
            .bind(announcement_id)
            .execute(db)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn today_is_allowed_but_yesterday_is_not() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 10).unwrap();
        assert!(check_announcement_date(today, today).is_ok());
        assert!(check_announcement_date(today.pred_opt().unwrap(), today).is_err());
    }
}

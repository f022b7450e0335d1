pub use scholaris_models::events::{
    Announcement, CreateAnnouncementDto, NoticeFilterParams, PaginatedAnnouncementsResponse,
    UpdateAnnouncementDto,
};

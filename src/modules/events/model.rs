pub use scholaris_models::events::{
    CreateEventDto, Event, MIN_EVENT_MINUTES, NoticeFilterParams, PaginatedEventsResponse,
    UpdateEventDto,
};

use crate::calendar::{DayCell, DayDetail, DayDetailEntry, DragPayload, DropRequest, MonthGrid, PostAction};
use crate::generation::{GeneratedContent, GenerationResponse, IngestRequest};
use crate::list::ReorderRequest;
use crate::models::{CreationType, Engagement, Platform, Post, PostStatus, PostType};
use crate::platforms::PlatformDescriptor;
use crate::transitions::{ReschedulePolicy, Transition};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::list_platforms,
        crate::routes::list_transitions,
        crate::routes::list_posts,
        crate::routes::set_posts,
        crate::routes::add_post,
        crate::routes::get_post,
        crate::routes::update_post,
        crate::routes::delete_post,
        crate::routes::schedule_post,
        crate::routes::reorder_posts,
        crate::routes::ingest_generated,
        crate::routes::month_grid,
        crate::routes::day_detail,
        crate::routes::drop_on_day,
    ),
    components(schemas(
        Post, Platform, PostStatus, PostType, CreationType, Engagement,
        PlatformDescriptor, Transition, ReschedulePolicy,
        MonthGrid, DayCell, DayDetail, DayDetailEntry, DragPayload, PostAction, DropRequest,
        ReorderRequest, IngestRequest, GenerationResponse, GeneratedContent,
        crate::routes::ScheduleRequest,
    )),
    tags(
        (name = "posts", description = "Post collection and list order"),
        (name = "calendar", description = "Month grid, day detail and drops"),
    )
)]
pub struct ApiDoc;

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::calendar::{self, DayDetail, DropRequest, MonthGrid};
use crate::error::ApiError;
use crate::generation::IngestRequest;
use crate::list::{PlatformFilter, PostFilter, ReorderRequest};
use crate::models::*;
use crate::platforms::{self, PlatformDescriptor};
use crate::repo::PostRepo;
use crate::transitions::{self, Transition};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(web::resource("/platforms").route(web::get().to(list_platforms)))
            .service(web::resource("/transitions").route(web::get().to(list_transitions)))
            .service(
                web::resource("/posts")
                    .route(web::get().to(list_posts))
                    .route(web::post().to(add_post))
                    .route(web::put().to(set_posts)),
            )
            // fixed segments before /posts/{id}
            .service(web::resource("/posts/reorder").route(web::post().to(reorder_posts)))
            .service(web::resource("/posts/generated").route(web::post().to(ingest_generated)))
            .service(
                web::resource("/posts/{id}")
                    .route(web::get().to(get_post))
                    .route(web::put().to(update_post))
                    .route(web::delete().to(delete_post)),
            )
            .service(web::resource("/posts/{id}/schedule").route(web::post().to(schedule_post)))
            .service(web::resource("/calendar").route(web::get().to(month_grid)))
            .service(web::resource("/calendar/day/{date}").route(web::get().to(day_detail)))
            .service(web::resource("/calendar/drop").route(web::post().to(drop_on_day))),
    );
}

#[derive(Clone)]
pub struct AppState { pub repo: Arc<dyn PostRepo> }

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilterQuery {
    /// `all` or a platform id, case-insensitive
    pub platform: Option<String>,
    /// Case-insensitive substring of the post content
    pub q: Option<String>,
}

impl FilterQuery {
    fn to_filter(&self) -> Result<PostFilter, ApiError> {
        let platform: PlatformFilter = self.platform.as_deref().unwrap_or("all").parse()?;
        Ok(PostFilter::new(platform, self.q.as_deref().unwrap_or("")))
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    /// Whole months to move from `year`/`month` (previous/next buttons)
    pub shift: Option<i32>,
    /// Viewer UTC offset in minutes east of UTC
    pub tz: Option<i32>,
    pub platform: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DayQuery {
    /// Viewer UTC offset in minutes east of UTC
    pub tz: Option<i32>,
    pub platform: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScheduleRequest {
    #[schema(value_type = String, example = "2024-08-01T10:00:00.000Z")]
    pub date: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/api/v1/platforms",
    responses((status = 200, description = "Platform descriptors", body = [PlatformDescriptor]))
)]
pub async fn list_platforms() -> HttpResponse {
    HttpResponse::Ok().json(platforms::all_descriptors())
}

#[utoipa::path(
    get,
    path = "/api/v1/transitions",
    responses((status = 200, description = "Status transitions allowed by the configured policy", body = [Transition]))
)]
pub async fn list_transitions(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(transitions::table(data.repo.policy()))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(FilterQuery),
    responses(
        (status = 200, description = "Filtered posts in list order", body = [Post]),
        (status = 400, description = "Unknown platform")
    )
)]
pub async fn list_posts(data: web::Data<AppState>, query: web::Query<FilterQuery>) -> Result<HttpResponse, ApiError> {
    let filter = query.to_filter()?;
    let posts = data.repo.list_posts().await?;
    Ok(HttpResponse::Ok().json(filter.apply(&posts)))
}

#[utoipa::path(
    put,
    path = "/api/v1/posts",
    request_body = [Post],
    responses((status = 200, description = "Collection replaced", body = [Post]))
)]
pub async fn set_posts(data: web::Data<AppState>, payload: web::Json<Vec<Post>>) -> Result<HttpResponse, ApiError> {
    let posts = payload.into_inner();
    data.repo.set_posts(posts.clone()).await?;
    Ok(HttpResponse::Ok().json(posts))
}

#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = Post,
    responses(
        (status = 201, description = "Post appended", body = Post),
        (status = 409, description = "A post with this id already exists")
    )
)]
pub async fn add_post(data: web::Data<AppState>, payload: web::Json<Post>) -> Result<HttpResponse, ApiError> {
    let post = data.repo.add_post(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(post))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = Id, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post", body = Post),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_post(data: web::Data<AppState>, path: web::Path<Id>) -> Result<HttpResponse, ApiError> {
    let post = data.repo.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}",
    request_body = Post,
    params(("id" = Id, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post replaced", body = Post),
        (status = 400, description = "Body id differs from path id"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn update_post(
    data: web::Data<AppState>,
    path: web::Path<Id>,
    payload: web::Json<Post>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let updated = payload.into_inner();
    if updated.id != id {
        return Err(ApiError::BadRequest(format!("body id {} does not match path id {id}", updated.id)));
    }
    let post = data.repo.update_post(updated).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(("id" = Id, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post removed"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn delete_post(data: web::Data<AppState>, path: web::Path<Id>) -> Result<HttpResponse, ApiError> {
    data.repo.delete_post(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/schedule",
    request_body = ScheduleRequest,
    params(("id" = Id, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post rescheduled", body = Post),
        (status = 404, description = "Post not found"),
        (status = 422, description = "Policy forbids rescheduling from the current status")
    )
)]
pub async fn schedule_post(
    data: web::Data<AppState>,
    path: web::Path<Id>,
    payload: web::Json<ScheduleRequest>,
) -> Result<HttpResponse, ApiError> {
    let post = data.repo.update_post_schedule_date(path.into_inner(), payload.date).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[utoipa::path(
    post,
    path = "/api/v1/posts/reorder",
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Posts in their new order", body = [Post]),
        (status = 400, description = "Index out of range")
    )
)]
pub async fn reorder_posts(data: web::Data<AppState>, payload: web::Json<ReorderRequest>) -> Result<HttpResponse, ApiError> {
    data.repo.move_post(payload.from, payload.to).await?;
    Ok(HttpResponse::Ok().json(data.repo.list_posts().await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/posts/generated",
    request_body = IngestRequest,
    responses(
        (status = 201, description = "Generated posts appended", body = [Post]),
        (status = 422, description = "Response does not fit the platform descriptors, or no ids are left")
    )
)]
pub async fn ingest_generated(data: web::Data<AppState>, payload: web::Json<IngestRequest>) -> Result<HttpResponse, ApiError> {
    let added = data.repo.add_generated(payload.into_inner()).await?;
    tracing::info!(count = added.len(), first_id = added.first().map(|p| p.id), "ingested generated posts");
    Ok(HttpResponse::Created().json(added))
}

fn viewer_tz(minutes: Option<i32>) -> Result<chrono::FixedOffset, ApiError> {
    Ok(calendar::offset_from_minutes(minutes.unwrap_or(0))?)
}

#[utoipa::path(
    get,
    path = "/api/v1/calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Month grid; defaults to the current month", body = MonthGrid),
        (status = 400, description = "Invalid month, offset or platform")
    )
)]
pub async fn month_grid(data: web::Data<AppState>, query: web::Query<CalendarQuery>) -> Result<HttpResponse, ApiError> {
    let tz = viewer_tz(query.tz)?;
    let today = Utc::now().with_timezone(&tz).date_naive();
    let mut reference = match (query.year, query.month) {
        (Some(year), Some(month)) => calendar::first_of_month(year, month)?,
        (None, None) => today,
        _ => return Err(ApiError::BadRequest("year and month go together".into())),
    };
    if let Some(shift) = query.shift {
        reference = calendar::change_month(reference, shift)
            .ok_or_else(|| ApiError::BadRequest(format!("cannot shift by {shift} months")))?;
    }
    let filter = FilterQuery { platform: query.platform.clone(), q: query.q.clone() }.to_filter()?;
    let posts = filter.apply(&data.repo.list_posts().await?);
    let grid = MonthGrid::build(&posts, reference, tz)?;
    Ok(HttpResponse::Ok().json(grid))
}

#[utoipa::path(
    get,
    path = "/api/v1/calendar/day/{date}",
    params(("date" = String, Path, description = "Calendar date, YYYY-MM-DD"), DayQuery),
    responses(
        (status = 200, description = "Posts scheduled that day", body = DayDetail),
        (status = 204, description = "Nothing scheduled that day")
    )
)]
pub async fn day_detail(
    data: web::Data<AppState>,
    path: web::Path<NaiveDate>,
    query: web::Query<DayQuery>,
) -> Result<HttpResponse, ApiError> {
    let date = path.into_inner();
    let tz = viewer_tz(query.tz)?;
    let filter = FilterQuery { platform: query.platform.clone(), q: query.q.clone() }.to_filter()?;
    let posts = filter.apply(&data.repo.list_posts().await?);
    let grid = MonthGrid::build(&posts, date, tz)?;
    match grid.open_day(date) {
        Some(detail) => Ok(HttpResponse::Ok().json(detail)),
        None => Ok(HttpResponse::NoContent().finish()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/calendar/drop",
    request_body = DropRequest,
    responses(
        (status = 200, description = "Post rescheduled onto the day", body = Post),
        (status = 404, description = "Post not found"),
        (status = 422, description = "Day outside the displayed month, or policy forbids rescheduling")
    )
)]
pub async fn drop_on_day(data: web::Data<AppState>, payload: web::Json<DropRequest>) -> Result<HttpResponse, ApiError> {
    let drop = payload.into_inner();
    let tz = viewer_tz(Some(drop.tz_offset_minutes))?;
    let reference = calendar::first_of_month(drop.year, drop.month)?;
    let grid = MonthGrid::build(std::iter::empty(), reference, tz)?;
    let instant = grid.drop_target(drop.date)?;
    let post = data.repo.update_post_schedule_date(drop.post_id, instant).await?;
    Ok(HttpResponse::Ok().json(post))
}

//! Month-grid projection of the post collection.
//!
//! The grid always has a multiple of seven cells and starts on a Sunday.
//! Cells outside the reference month are display-only: they carry no
//! posts and refuse drops. Posts are bucketed by the calendar date of
//! their `schedule_date` in the viewer's timezone; time of day is ignored.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Id, Post, PostStatus};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("{0} is not a droppable day in this month")]
    NotDroppable(NaiveDate),
    #[error("invalid utc offset of {0} minutes")]
    InvalidOffset(i32),
}

/// Viewer timezone from an offset in minutes east of UTC.
pub fn offset_from_minutes(minutes: i32) -> Result<FixedOffset, CalendarError> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or(CalendarError::InvalidOffset(minutes))
}

pub fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, CalendarError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::InvalidMonth { year, month })
}

/// Move by whole months, always landing on the 1st so that e.g. Jan 31
/// plus one month is Feb 1 rather than an overflowed March date.
pub fn change_month(current: NaiveDate, offset: i32) -> Option<NaiveDate> {
    let first = current.with_day(1)?;
    let months = Months::new(offset.unsigned_abs());
    if offset >= 0 {
        first.checked_add_months(months)
    } else {
        first.checked_sub_months(months)
    }
}

/// Calendar date of `instant` as seen in `tz`.
pub fn local_date(instant: &DateTime<Utc>, tz: &FixedOffset) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// The instant a cell stands for: local midnight of `date` in `tz`.
pub fn cell_instant(date: NaiveDate, tz: &FixedOffset) -> Option<DateTime<Utc>> {
    date.and_time(NaiveTime::MIN)
        .and_local_timezone(*tz)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub posts: Vec<Post>,
}

impl DayCell {
    fn outside(date: NaiveDate) -> Self {
        Self { date, in_month: false, posts: Vec::new() }
    }

    pub fn droppable(&self) -> bool {
        self.in_month
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub tz_offset_minutes: i32,
    pub cells: Vec<DayCell>,
    #[serde(skip)]
    tz: FixedOffset,
}

impl MonthGrid {
    pub fn build<'a, I>(posts: I, reference: NaiveDate, tz: FixedOffset) -> Result<Self, CalendarError>
    where
        I: IntoIterator<Item = &'a Post>,
    {
        let (year, month) = (reference.year(), reference.month());
        let first = first_of_month(year, month)?;
        let next_first = change_month(first, 1).ok_or(CalendarError::InvalidMonth { year, month })?;
        let days_in_month = (next_first - first).num_days();
        let start_day_of_week = i64::from(first.weekday().num_days_from_sunday());

        let mut cells: Vec<DayCell> = (1..=start_day_of_week)
            .rev()
            .map(|back| DayCell::outside(first - Duration::days(back)))
            .collect();

        let mut in_month: Vec<DayCell> = (0..days_in_month)
            .map(|d| DayCell { date: first + Duration::days(d), in_month: true, posts: Vec::new() })
            .collect();
        for post in posts {
            let Some(instant) = post.schedule_date else { continue };
            let day = local_date(&instant, &tz);
            if day.year() == year && day.month() == month {
                in_month[day.day0() as usize].posts.push(post.clone());
            }
        }
        cells.append(&mut in_month);

        let mut trailing = next_first;
        while cells.len() % 7 != 0 {
            cells.push(DayCell::outside(trailing));
            trailing = trailing.succ_opt().unwrap_or(trailing);
        }

        Ok(Self { year, month, tz_offset_minutes: tz.local_minus_utc() / 60, cells, tz })
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell> {
        self.cells.iter().find(|c| c.date == date)
    }

    /// Instant a drop onto `date` reschedules to. Only in-month cells accept drops.
    pub fn drop_target(&self, date: NaiveDate) -> Result<DateTime<Utc>, CalendarError> {
        match self.cell(date) {
            Some(cell) if cell.droppable() => {
                cell_instant(date, &self.tz).ok_or(CalendarError::NotDroppable(date))
            }
            _ => Err(CalendarError::NotDroppable(date)),
        }
    }

    /// Clicking a day: detail for a day with posts, nothing for an empty one.
    pub fn open_day(&self, date: NaiveDate) -> Option<DayDetail> {
        let cell = self.cell(date).filter(|c| c.in_month && !c.posts.is_empty())?;
        Some(DayDetail::new(date, cell.posts.clone()))
    }
}

/// What a post dragged out of the day-detail view carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DragPayload {
    pub id: Id,
    pub original_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostAction {
    Edit,
    Pause,
    Schedule,
    Delete,
}

impl PostAction {
    pub fn for_status(status: PostStatus) -> Vec<PostAction> {
        let toggle = if status == PostStatus::Scheduled { PostAction::Pause } else { PostAction::Schedule };
        vec![PostAction::Edit, toggle, PostAction::Delete]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DayDetailEntry {
    pub post: Post,
    pub drag: DragPayload,
    pub actions: Vec<PostAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DayDetail {
    pub date: NaiveDate,
    pub entries: Vec<DayDetailEntry>,
}

impl DayDetail {
    pub fn new(date: NaiveDate, posts: Vec<Post>) -> Self {
        let entries = posts
            .into_iter()
            .map(|post| DayDetailEntry {
                drag: DragPayload { id: post.id, original_date: date },
                actions: PostAction::for_status(post.status),
                post,
            })
            .collect();
        Self { date, entries }
    }

    /// Instant a post dropped onto the open detail view reschedules to.
    pub fn drop_target(&self, tz: &FixedOffset) -> Result<DateTime<Utc>, CalendarError> {
        cell_instant(self.date, tz).ok_or(CalendarError::NotDroppable(self.date))
    }
}

/// Body of a calendar drop: which post, onto which day of which displayed month.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DropRequest {
    pub post_id: Id,
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub tz_offset_minutes: i32,
}

//! Reorderable list view: filtering, the splice-based reorder, and the
//! midpoint rule that decides when a hovering drag should reorder.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Platform, Post, UnknownPlatform};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("index {index} out of range for {len} items")]
pub struct OutOfRange {
    pub index: usize,
    pub len: usize,
}

/// Remove the item at `drag_index` and reinsert it at `hover_index`.
pub fn move_post<T>(items: &mut Vec<T>, drag_index: usize, hover_index: usize) -> Result<(), OutOfRange> {
    let len = items.len();
    for index in [drag_index, hover_index] {
        if index >= len {
            return Err(OutOfRange { index, len });
        }
    }
    let dragged = items.remove(drag_index);
    items.insert(hover_index, dragged);
    Ok(())
}

/// Vertical extent of a rendered row, in the same units as the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBounds {
    pub top: f64,
    pub bottom: f64,
}

impl RowBounds {
    pub fn midpoint(&self) -> f64 {
        (self.bottom - self.top) / 2.0 + self.top
    }
}

/// An in-progress list drag. Tracks where the dragged item currently sits
/// so repeated hover events over the same row do not reorder twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListDrag {
    pub index: usize,
}

impl ListDrag {
    pub fn start(index: usize) -> Self {
        Self { index }
    }

    /// Returns the `(from, to)` move to apply, if the pointer has crossed
    /// the hovered row's midpoint in the direction of travel.
    pub fn hover(&mut self, hover_index: usize, pointer_y: f64, row: RowBounds) -> Option<(usize, usize)> {
        let drag_index = self.index;
        if drag_index == hover_index {
            return None;
        }
        let middle = row.midpoint();
        // dragging down: wait until below the middle
        if drag_index < hover_index && pointer_y < middle {
            return None;
        }
        // dragging up: wait until above the middle
        if drag_index > hover_index && pointer_y > middle {
            return None;
        }
        self.index = hover_index;
        Some((drag_index, hover_index))
    }
}

/// Platform side of the shared filter: everything, or one network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformFilter {
    #[default]
    All,
    Only(Platform),
}

impl std::str::FromStr for PlatformFilter {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() || s.trim().eq_ignore_ascii_case("all") {
            Ok(PlatformFilter::All)
        } else {
            s.parse().map(PlatformFilter::Only)
        }
    }
}

/// Filter shared by the calendar and list views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub platform: PlatformFilter,
    query: String,
}

impl PostFilter {
    pub fn new(platform: PlatformFilter, query: &str) -> Self {
        Self { platform, query: query.to_lowercase() }
    }

    pub fn platform(platform: PlatformFilter) -> Self {
        Self::new(platform, "")
    }

    pub fn search(query: &str) -> Self {
        Self::new(PlatformFilter::All, query)
    }

    pub fn matches(&self, post: &Post) -> bool {
        let platform_ok = match self.platform {
            PlatformFilter::All => true,
            PlatformFilter::Only(p) => post.platform == p,
        };
        platform_ok && post.content.to_lowercase().contains(&self.query)
    }

    pub fn apply<'a, I>(&self, posts: I) -> Vec<Post>
    where
        I: IntoIterator<Item = &'a Post>,
    {
        posts.into_iter().filter(|p| self.matches(p)).cloned().collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreationType, Engagement, PostStatus};

    fn post(id: i64, platform: Platform, content: &str) -> Post {
        Post {
            id,
            topic: None,
            platform,
            content: content.into(),
            status: PostStatus::Draft,
            schedule_date: None,
            creation_type: CreationType::Single,
            engagement: Engagement::default(),
            target_id: None,
        }
    }

    #[test]
    fn move_first_to_last() {
        let mut v = vec!['A', 'B', 'C'];
        move_post(&mut v, 0, 2).unwrap();
        assert_eq!(v, vec!['B', 'C', 'A']);
    }

    #[test]
    fn move_is_reversible() {
        let original = vec![1, 2, 3, 4, 5];
        for i in 0..5 {
            for j in 0..5 {
                if i == j { continue; }
                let mut v = original.clone();
                move_post(&mut v, i, j).unwrap();
                move_post(&mut v, j, i).unwrap();
                assert_eq!(v, original, "move({i},{j}) then move({j},{i})");
            }
        }
    }

    #[test]
    fn move_out_of_range_leaves_list_alone() {
        let mut v = vec![1, 2];
        assert_eq!(move_post(&mut v, 0, 2), Err(OutOfRange { index: 2, len: 2 }));
        assert_eq!(v, vec![1, 2]);
    }

    #[test]
    fn downward_drag_waits_for_midpoint() {
        let row = RowBounds { top: 100.0, bottom: 140.0 };
        let mut drag = ListDrag::start(0);
        assert_eq!(drag.hover(1, 110.0, row), None);
        assert_eq!(drag.index, 0);
        assert_eq!(drag.hover(1, 125.0, row), Some((0, 1)));
        assert_eq!(drag.index, 1);
        // same row again is now a no-op
        assert_eq!(drag.hover(1, 130.0, row), None);
    }

    #[test]
    fn upward_drag_waits_for_midpoint() {
        let row = RowBounds { top: 0.0, bottom: 40.0 };
        let mut drag = ListDrag::start(2);
        assert_eq!(drag.hover(1, 30.0, row), None);
        assert_eq!(drag.hover(1, 10.0, row), Some((2, 1)));
        assert_eq!(drag.index, 1);
    }

    #[test]
    fn filter_matches_platform_and_text() {
        let posts = vec![
            post(1, Platform::Twitter, "Launch Day!"),
            post(2, Platform::LinkedIn, "launch recap"),
            post(3, Platform::Twitter, "hiring"),
        ];
        let f = PostFilter::new("twitter".parse().unwrap(), "LAUNCH");
        let ids: Vec<_> = f.apply(&posts).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(PostFilter::default().apply(&posts).len(), 3);
    }

    #[test]
    fn filters_commute() {
        let posts = vec![
            post(1, Platform::Twitter, "Launch Day!"),
            post(2, Platform::LinkedIn, "launch recap"),
            post(3, Platform::Twitter, "hiring"),
            post(4, Platform::TikTok, "behind the scenes launch"),
        ];
        let by_platform = PostFilter::platform(PlatformFilter::Only(Platform::Twitter));
        let by_text = PostFilter::search("launch");
        let a = by_text.apply(&by_platform.apply(&posts));
        let b = by_platform.apply(&by_text.apply(&posts));
        assert_eq!(a, b);
    }

    #[test]
    fn platform_filter_parsing() {
        assert_eq!("all".parse::<PlatformFilter>().unwrap(), PlatformFilter::All);
        assert_eq!("".parse::<PlatformFilter>().unwrap(), PlatformFilter::All);
        assert_eq!("Pinterest".parse::<PlatformFilter>().unwrap(), PlatformFilter::Only(Platform::Pinterest));
        assert!("friendster".parse::<PlatformFilter>().is_err());
    }
}

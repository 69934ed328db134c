use chrono::{DateTime, Duration, Utc};

use crate::models::{iso_millis, CreationType, Engagement, Platform, Post, PostStatus};

fn post(
    id: i64,
    platform: Platform,
    topic: &str,
    content: &str,
    status: PostStatus,
    schedule_date: Option<DateTime<Utc>>,
) -> Post {
    Post {
        id,
        topic: Some(topic.to_string()),
        platform,
        content: content.to_string(),
        status,
        schedule_date,
        creation_type: CreationType::Single,
        engagement: Engagement::default(),
        target_id: None,
    }
}

/// Demo collection for a fresh dashboard, dated around `now`: published
/// posts with engagement, upcoming scheduled ones (a bulk batch among
/// them), a draft and a failed send.
pub fn demo_posts(now: DateTime<Utc>) -> Vec<Post> {
    let now = iso_millis::truncate(now);
    let at = |days: i64, hours: i64| Some(now + Duration::days(days) + Duration::hours(hours));

    let mut posts = vec![
        post(1, Platform::Twitter, "Product launch", "We just shipped the new planner. Try it today!", PostStatus::Published, at(-6, 0)),
        post(2, Platform::LinkedIn, "Hiring", "We are hiring two backend engineers. Remote friendly.", PostStatus::Published, at(-3, 2)),
        post(3, Platform::YouTube, "Tutorial", "How to plan a month of content in ten minutes.", PostStatus::Scheduled, at(1, 3)),
        post(4, Platform::TikTok, "Tutorial", "Plan a month of posts in ten minutes, sped up.", PostStatus::Scheduled, at(1, 7)),
        post(5, Platform::Facebook, "Tutorial", "Share your best scheduling tip in the comments.", PostStatus::Scheduled, at(4, 0)),
        post(6, Platform::Pinterest, "Moodboard", "Autumn palette ideas for your feed.", PostStatus::Draft, None),
        post(7, Platform::Twitter, "Maintenance", "Scheduled maintenance tonight from 22:00 UTC.", PostStatus::Failed, at(-1, 0)),
    ];
    posts[0].engagement = Engagement { likes: 128, comments: 14, shares: 31 };
    posts[1].engagement = Engagement { likes: 76, comments: 9, shares: 12 };
    for p in &mut posts[2..5] {
        p.creation_type = CreationType::Bulk;
    }
    posts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn demo_posts_are_consistent() {
        let now = Utc::now();
        let posts = demo_posts(now);
        let ids: HashSet<_> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), posts.len());
        for p in &posts {
            match p.status {
                PostStatus::Draft => assert!(p.schedule_date.is_none()),
                PostStatus::Scheduled => assert!(p.schedule_date.unwrap() > now),
                PostStatus::Published => assert!(p.schedule_date.unwrap() < now),
                PostStatus::Failed => {}
            }
        }
    }
}

//! Mapping from a content-generation service response to post records.
//!
//! The service itself lives elsewhere; this module only owns the shape of
//! what it returns and how that becomes posts in the store.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::models::{iso_millis, CreationType, Engagement, Id, Platform, Post, PostStatus, PostType};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("{post_type:?} posts are not supported on {platform}")]
    UnsupportedPostType { platform: Platform, post_type: PostType },
    #[error("scheduling entry for {0} has no generated content")]
    OrphanSchedule(Platform),
    #[error("no post ids left after {0}")]
    IdsExhausted(Id),
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub text: String,
    #[serde(default)]
    pub post_type: Option<PostType>,
}

/// Response body of the generation service. Keys are platform ids and
/// are matched case-insensitively.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenerationResponse {
    #[schema(value_type = Object)]
    pub content: BTreeMap<Platform, GeneratedContent>,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub scheduling: Option<BTreeMap<Platform, DateTime<Utc>>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub target_id: Option<String>,
    pub response: GenerationResponse,
}

/// First id after the highest one in `posts`, or 1 for an empty collection.
pub fn next_id(posts: &[Post]) -> Result<Id, GenerationError> {
    match posts.iter().map(|p| p.id).max() {
        Some(max) => max.checked_add(1).ok_or(GenerationError::IdsExhausted(max)),
        None => Ok(1),
    }
}

/// One post per platform in the response, ids allocated from `first_id`
/// upward in platform order.
pub fn posts_from_generation(req: IngestRequest, first_id: Id) -> Result<Vec<Post>, GenerationError> {
    let IngestRequest { topic, target_id, response } = req;
    let extra = Id::try_from(response.content.len().saturating_sub(1)).unwrap_or(Id::MAX);
    if first_id.checked_add(extra).is_none() {
        return Err(GenerationError::IdsExhausted(first_id));
    }
    let scheduling = response.scheduling.unwrap_or_default();
    if let Some(orphan) = scheduling.keys().find(|p| !response.content.contains_key(p)) {
        return Err(GenerationError::OrphanSchedule(*orphan));
    }

    let creation_type = if response.content.len() > 1 { CreationType::Bulk } else { CreationType::Single };
    let mut posts = Vec::with_capacity(response.content.len());
    for (offset, (platform, generated)) in (0..=extra).zip(response.content) {
        let id = first_id + offset;
        let descriptor = platform.descriptor();
        if let Some(post_type) = generated.post_type {
            if !descriptor.allows(post_type) {
                return Err(GenerationError::UnsupportedPostType { platform, post_type });
            }
        }
        if !descriptor.fits(&generated.text) {
            warn!(%platform, limit = descriptor.limit, "generated content exceeds platform limit");
        }
        let schedule_date = scheduling.get(&platform).copied().map(iso_millis::truncate);
        posts.push(Post {
            id,
            topic: topic.clone(),
            platform,
            content: generated.text,
            status: if schedule_date.is_some() { PostStatus::Scheduled } else { PostStatus::Draft },
            schedule_date,
            creation_type,
            engagement: Engagement::default(),
            target_id: target_id.clone(),
        });
    }
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingest(v: serde_json::Value) -> IngestRequest {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn scheduled_and_draft_posts() {
        let req = ingest(serde_json::json!({
            "topic": "Autumn sale",
            "response": {
                "content": {
                    "Twitter": { "text": "Sale starts now", "postType": "post" },
                    "linkedin": { "text": "Our autumn sale" }
                },
                "scheduling": { "twitter": "2024-09-01T09:00:00Z" }
            }
        }));
        let posts = posts_from_generation(req, 10).unwrap();
        assert_eq!(posts.len(), 2);
        // BTreeMap order follows the enum: Twitter before LinkedIn
        assert_eq!(posts[0].id, 10);
        assert_eq!(posts[0].platform, Platform::Twitter);
        assert_eq!(posts[0].status, PostStatus::Scheduled);
        assert_eq!(iso_millis::format(&posts[0].schedule_date.unwrap()), "2024-09-01T09:00:00.000Z");
        assert_eq!(posts[1].id, 11);
        assert_eq!(posts[1].status, PostStatus::Draft);
        assert!(posts[1].schedule_date.is_none());
        assert!(posts.iter().all(|p| p.creation_type == CreationType::Bulk));
        assert!(posts.iter().all(|p| p.topic.as_deref() == Some("Autumn sale")));
    }

    #[test]
    fn single_platform_is_single() {
        let req = ingest(serde_json::json!({
            "response": { "content": { "tiktok": { "text": "clip" } } }
        }));
        let posts = posts_from_generation(req, 1).unwrap();
        assert_eq!(posts[0].creation_type, CreationType::Single);
    }

    #[test]
    fn rejects_post_type_the_platform_lacks() {
        let req = ingest(serde_json::json!({
            "response": { "content": { "pinterest": { "text": "x", "postType": "thread" } } }
        }));
        assert_eq!(
            posts_from_generation(req, 1),
            Err(GenerationError::UnsupportedPostType { platform: Platform::Pinterest, post_type: PostType::Thread })
        );
    }

    #[test]
    fn rejects_schedule_without_content() {
        let req = ingest(serde_json::json!({
            "response": {
                "content": { "twitter": { "text": "x" } },
                "scheduling": { "youtube": "2024-09-01T09:00:00Z" }
            }
        }));
        assert_eq!(posts_from_generation(req, 1), Err(GenerationError::OrphanSchedule(Platform::YouTube)));
    }

    #[test]
    fn id_allocation_stops_at_i64_max() {
        let two = || ingest(serde_json::json!({
            "response": { "content": { "twitter": { "text": "a" }, "tiktok": { "text": "b" } } }
        }));
        assert_eq!(posts_from_generation(two(), Id::MAX), Err(GenerationError::IdsExhausted(Id::MAX)));
        let posts = posts_from_generation(two(), Id::MAX - 1).unwrap();
        assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![Id::MAX - 1, Id::MAX]);
    }

    #[test]
    fn next_id_follows_highest() {
        let req = ingest(serde_json::json!({
            "response": { "content": { "twitter": { "text": "a" } } }
        }));
        let mut posts = posts_from_generation(req, 7).unwrap();
        assert_eq!(next_id(&[]), Ok(1));
        assert_eq!(next_id(&posts), Ok(8));
        posts[0].id = Id::MAX;
        assert_eq!(next_id(&posts), Err(GenerationError::IdsExhausted(Id::MAX)));
    }
}

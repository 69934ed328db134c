use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

pub type Id = i64;

/// Social network a post is destined for.
///
/// Parsing is case-insensitive so that `"Twitter"`, `"twitter"` and
/// `"TWITTER"` all normalize to the same variant at ingestion. The
/// serialized form is always the lowercase id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    LinkedIn,
    Facebook,
    YouTube,
    TikTok,
    Pinterest,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Twitter,
        Platform::LinkedIn,
        Platform::Facebook,
        Platform::YouTube,
        Platform::TikTok,
        Platform::Pinterest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::LinkedIn => "linkedin",
            Platform::Facebook => "facebook",
            Platform::YouTube => "youtube",
            Platform::TikTok => "tiktok",
            Platform::Pinterest => "pinterest",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown platform '{0}'")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Platform {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Scheduled,
    Published,
    Failed,
}

impl PostStatus {
    pub const ALL: [PostStatus; 4] = [
        PostStatus::Draft,
        PostStatus::Scheduled,
        PostStatus::Published,
        PostStatus::Failed,
    ];
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PostStatus::Draft => "draft",
            PostStatus::Scheduled => "scheduled",
            PostStatus::Published => "published",
            PostStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Provenance tag; informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CreationType {
    #[default]
    Single,
    Bulk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Post,
    Thread,
    Poll,
    Article,
    Story,
    Reel,
    Video,
    Short,
    Community,
    Pin,
    Idea,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct Engagement {
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub shares: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Id,
    #[serde(default)]
    pub topic: Option<String>,
    pub platform: Platform,
    #[serde(default)]
    pub content: String,
    pub status: PostStatus,
    #[serde(default, with = "iso_millis::option")]
    #[schema(value_type = Option<String>, example = "2024-08-01T10:00:00.000Z")]
    pub schedule_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub creation_type: CreationType,
    #[serde(flatten)]
    pub engagement: Engagement,
    #[serde(default)]
    pub target_id: Option<String>, // None = personal profile
}

/// Millisecond-precision ISO-8601 timestamps (`2024-08-01T10:00:00.000Z`),
/// the format the dashboard front end produces and compares against.
pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Timelike, Utc};

    pub fn format(instant: &DateTime<Utc>) -> String {
        instant.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Drop sub-millisecond precision so stored values round-trip exactly.
    pub fn truncate(instant: DateTime<Utc>) -> DateTime<Utc> {
        let nanos = instant.nanosecond() / 1_000_000 * 1_000_000;
        instant.with_nanosecond(nanos).unwrap_or(instant)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(instant) => serializer.serialize_str(&super::format(instant)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            match raw {
                None => Ok(None),
                Some(s) => DateTime::parse_from_rfc3339(&s)
                    .map(|dt| Some(super::truncate(dt.with_timezone(&Utc))))
                    .map_err(serde::de::Error::custom),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn platform_parsing_ignores_case() {
        assert_eq!("Twitter".parse::<Platform>().unwrap(), Platform::Twitter);
        assert_eq!("LINKEDIN".parse::<Platform>().unwrap(), Platform::LinkedIn);
        assert_eq!(" tiktok ".parse::<Platform>().unwrap(), Platform::TikTok);
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn post_json_shape() {
        let post: Post = serde_json::from_value(serde_json::json!({
            "id": 7,
            "platform": "YouTube",
            "content": "launch video",
            "status": "published",
            "scheduleDate": "2024-08-01T10:00:00Z",
            "likes": 12
        }))
        .unwrap();
        assert_eq!(post.platform, Platform::YouTube);
        assert_eq!(post.engagement.likes, 12);
        assert_eq!(post.creation_type, CreationType::Single);
        assert!(post.target_id.is_none());

        let v = serde_json::to_value(&post).unwrap();
        assert_eq!(v["platform"], "youtube");
        assert_eq!(v["scheduleDate"], "2024-08-01T10:00:00.000Z");
        assert_eq!(v["creationType"], "single");
        assert_eq!(v["shares"], 0);
    }

    #[test]
    fn truncate_drops_sub_millisecond_precision() {
        let t = Utc.with_ymd_and_hms(2024, 8, 1, 10, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(1_234_567);
        assert_eq!(iso_millis::format(&iso_millis::truncate(t)), "2024-08-01T10:00:00.001Z");
    }
}

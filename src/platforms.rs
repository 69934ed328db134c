use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Platform, PostType};

/// Static reference data for one social network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDescriptor {
    pub id: Platform,
    #[schema(value_type = String)]
    pub name: &'static str,
    #[schema(value_type = String)]
    pub color: &'static str,
    /// Maximum post length in characters.
    pub limit: usize,
    #[schema(value_type = Vec<PostType>)]
    pub post_types: &'static [PostType],
}

impl PlatformDescriptor {
    pub fn allows(&self, post_type: PostType) -> bool {
        self.post_types.contains(&post_type)
    }

    /// Character count, not bytes.
    pub fn fits(&self, content: &str) -> bool {
        content.chars().count() <= self.limit
    }
}

static DESCRIPTORS: [PlatformDescriptor; 6] = [
    PlatformDescriptor {
        id: Platform::Twitter,
        name: "Twitter",
        color: "sky",
        limit: 280,
        post_types: &[PostType::Post, PostType::Thread, PostType::Poll],
    },
    PlatformDescriptor {
        id: Platform::LinkedIn,
        name: "LinkedIn",
        color: "blue",
        limit: 3000,
        post_types: &[PostType::Post, PostType::Article, PostType::Poll],
    },
    PlatformDescriptor {
        id: Platform::Facebook,
        name: "Facebook",
        color: "indigo",
        limit: 63206,
        post_types: &[PostType::Post, PostType::Story, PostType::Reel],
    },
    PlatformDescriptor {
        id: Platform::YouTube,
        name: "YouTube",
        color: "red",
        limit: 5000,
        post_types: &[PostType::Video, PostType::Short, PostType::Community],
    },
    PlatformDescriptor {
        id: Platform::TikTok,
        name: "TikTok",
        color: "slate",
        limit: 2200,
        post_types: &[PostType::Video, PostType::Story],
    },
    PlatformDescriptor {
        id: Platform::Pinterest,
        name: "Pinterest",
        color: "rose",
        limit: 500,
        post_types: &[PostType::Pin, PostType::Idea],
    },
];

pub fn all_descriptors() -> &'static [PlatformDescriptor] {
    &DESCRIPTORS
}

pub fn descriptor(platform: Platform) -> &'static PlatformDescriptor {
    // table order matches Platform::ALL
    &DESCRIPTORS[Platform::ALL.iter().position(|p| *p == platform).unwrap_or(0)]
}

impl Platform {
    pub fn descriptor(&self) -> &'static PlatformDescriptor {
        descriptor(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_platform_has_its_own_descriptor() {
        for p in Platform::ALL {
            assert_eq!(descriptor(p).id, p);
        }
        assert_eq!(all_descriptors().len(), Platform::ALL.len());
    }

    #[test]
    fn twitter_limits() {
        let d = Platform::Twitter.descriptor();
        assert!(d.allows(PostType::Thread));
        assert!(!d.allows(PostType::Video));
        assert!(d.fits(&"é".repeat(280)));
        assert!(!d.fits(&"x".repeat(281)));
    }
}

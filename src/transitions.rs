use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::PostStatus;

/// Which prior statuses may be moved back into `scheduled`.
///
/// `Permissive` lets any post be rescheduled, including published ones.
/// `Strict` refuses to un-publish a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReschedulePolicy {
    #[default]
    Permissive,
    Strict,
}

impl ReschedulePolicy {
    pub fn allows(&self, from: PostStatus) -> bool {
        match self {
            ReschedulePolicy::Permissive => true,
            ReschedulePolicy::Strict => !matches!(from, PostStatus::Published),
        }
    }
}

impl fmt::Display for ReschedulePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReschedulePolicy::Permissive => f.write_str("permissive"),
            ReschedulePolicy::Strict => f.write_str("strict"),
        }
    }
}

impl FromStr for ReschedulePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "permissive" => Ok(ReschedulePolicy::Permissive),
            "strict" => Ok(ReschedulePolicy::Strict),
            other => Err(format!("unknown reschedule policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Transition {
    pub from: PostStatus,
    pub to: PostStatus,
}

/// Every transition the core can perform under `policy`.
///
/// Only `* -> scheduled` exists here; moves into `published` or `failed`
/// belong to whatever delivers posts and are never made by this crate.
pub fn table(policy: ReschedulePolicy) -> Vec<Transition> {
    PostStatus::ALL
        .into_iter()
        .filter(|from| policy.allows(*from))
        .map(|from| Transition { from, to: PostStatus::Scheduled })
        .collect()
}

pub fn is_allowed(policy: ReschedulePolicy, from: PostStatus, to: PostStatus) -> bool {
    table(policy).contains(&Transition { from, to })
}

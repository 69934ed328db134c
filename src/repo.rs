use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::generation::{self, GenerationError, IngestRequest};
use crate::list::{self, OutOfRange};
use crate::models::*;
use crate::transitions::ReschedulePolicy;

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("not found")] NotFound,
    #[error("conflict")] Conflict,
    #[error(transparent)] OutOfRange(#[from] OutOfRange),
    #[error("cannot reschedule a {from} post")] InvalidTransition { from: PostStatus },
    #[error(transparent)] Generation(#[from] GenerationError),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Mutation API over the post collection. Order of the collection is
/// meaningful: it is the order the list view shows.
#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn list_posts(&self) -> RepoResult<Vec<Post>>;
    async fn get_post(&self, id: Id) -> RepoResult<Post>;
    /// Replace the whole collection. No validation.
    async fn set_posts(&self, posts: Vec<Post>) -> RepoResult<()>;
    async fn add_post(&self, new: Post) -> RepoResult<Post>;
    /// Append several posts; on any id clash nothing is appended.
    async fn add_posts(&self, new: Vec<Post>) -> RepoResult<Vec<Post>>;
    /// Append generated posts with ids allocated after the current highest one.
    async fn add_generated(&self, req: IngestRequest) -> RepoResult<Vec<Post>>;
    async fn update_post(&self, updated: Post) -> RepoResult<Post>;
    async fn update_post_schedule_date(&self, id: Id, date: DateTime<Utc>) -> RepoResult<Post>;
    async fn delete_post(&self, id: Id) -> RepoResult<()>;
    async fn move_post(&self, from: usize, to: usize) -> RepoResult<()>;
    fn policy(&self) -> ReschedulePolicy;
}

pub mod inmem {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::path::{Path, PathBuf};
    use tracing::{debug, info, warn};

    #[derive(Default, Serialize, Deserialize)]
    struct State {
        posts: Vec<Post>,
    }

    /// Process-local post store. Cloning yields another handle onto the
    /// same collection.
    #[derive(Clone, Default)]
    pub struct InMemPostStore {
        state: Arc<RwLock<State>>,
        snapshot_path: Option<Arc<PathBuf>>,
        // held from the end of a mutation until its snapshot is on disk
        persist_lock: Arc<Mutex<()>>,
        policy: ReschedulePolicy,
    }

    impl InMemPostStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_posts(posts: Vec<Post>) -> Self {
            Self { state: Arc::new(RwLock::new(State { posts })), ..Self::default() }
        }

        pub fn with_policy(mut self, policy: ReschedulePolicy) -> Self {
            self.policy = policy;
            self
        }

        /// Load the snapshot at `path` (if any) and rewrite it after every mutation.
        pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
            let path = path.into();
            if let Some(state) = Self::load_state_from(&path) {
                self.state = Arc::new(RwLock::new(state));
            }
            self.snapshot_path = Some(Arc::new(path));
            self
        }

        fn load_state_from(path: &Path) -> Option<State> {
            match std::fs::read(path) {
                Ok(bytes) => match serde_json::from_slice::<State>(&bytes) {
                    Ok(s) => {
                        info!(path = %path.display(), posts = s.posts.len(), "loaded post snapshot");
                        Some(s)
                    }
                    Err(e) => {
                        warn!(path = %path.display(), "failed to parse post snapshot: {e}; starting empty");
                        None
                    }
                },
                Err(e) => {
                    info!(path = %path.display(), "no post snapshot ({e}); starting empty");
                    None
                }
            }
        }

        /// Release `guard` and write the state it protected to the snapshot.
        /// Snapshots hit the disk in the same order the mutations happened.
        fn commit(&self, guard: RwLockWriteGuard<'_, State>) {
            let Some(path) = self.snapshot_path.as_deref() else { return };
            let bytes = serde_json::to_vec_pretty(&*guard);
            let _order = self.persist_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            drop(guard);
            let bytes = match bytes {
                Ok(b) => b,
                Err(e) => {
                    warn!("failed to serialize post snapshot: {e}");
                    return;
                }
            };
            if let Some(dir) = path.parent() {
                let _ = std::fs::create_dir_all(dir);
            }
            if let Err(e) = std::fs::write(path, bytes) {
                warn!(path = %path.display(), "failed to write post snapshot: {e}");
            }
        }

        fn read(&self) -> RwLockReadGuard<'_, State> {
            self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
        }

        fn write(&self) -> RwLockWriteGuard<'_, State> {
            self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    #[async_trait]
    impl PostRepo for InMemPostStore {
        async fn list_posts(&self) -> RepoResult<Vec<Post>> {
            Ok(self.read().posts.clone())
        }

        async fn get_post(&self, id: Id) -> RepoResult<Post> {
            self.read().posts.iter().find(|p| p.id == id).cloned().ok_or(RepoError::NotFound)
        }

        async fn set_posts(&self, posts: Vec<Post>) -> RepoResult<()> {
            let mut s = self.write();
            debug!(count = posts.len(), "replacing post collection");
            s.posts = posts;
            self.commit(s);
            Ok(())
        }

        async fn add_post(&self, new: Post) -> RepoResult<Post> {
            let mut s = self.write();
            if s.posts.iter().any(|p| p.id == new.id) {
                return Err(RepoError::Conflict);
            }
            s.posts.push(new.clone());
            self.commit(s);
            Ok(new)
        }

        async fn add_posts(&self, new: Vec<Post>) -> RepoResult<Vec<Post>> {
            let mut s = self.write();
            let clash = new.iter().enumerate().any(|(i, n)| {
                s.posts.iter().any(|p| p.id == n.id) || new[..i].iter().any(|earlier| earlier.id == n.id)
            });
            if clash {
                return Err(RepoError::Conflict);
            }
            s.posts.extend(new.iter().cloned());
            self.commit(s);
            Ok(new)
        }

        async fn add_generated(&self, req: IngestRequest) -> RepoResult<Vec<Post>> {
            let mut s = self.write();
            let first_id = generation::next_id(&s.posts)?;
            let new = generation::posts_from_generation(req, first_id)?;
            s.posts.extend(new.iter().cloned());
            self.commit(s);
            debug!(count = new.len(), first_id, "appended generated posts");
            Ok(new)
        }

        async fn update_post(&self, updated: Post) -> RepoResult<Post> {
            let mut s = self.write();
            let slot = s.posts.iter_mut().find(|p| p.id == updated.id).ok_or(RepoError::NotFound)?;
            *slot = updated.clone();
            self.commit(s);
            Ok(updated)
        }

        async fn update_post_schedule_date(&self, id: Id, date: DateTime<Utc>) -> RepoResult<Post> {
            let mut s = self.write();
            let post = s.posts.iter_mut().find(|p| p.id == id).ok_or(RepoError::NotFound)?;
            if !self.policy.allows(post.status) {
                return Err(RepoError::InvalidTransition { from: post.status });
            }
            post.schedule_date = Some(iso_millis::truncate(date));
            post.status = PostStatus::Scheduled;
            let rescheduled = post.clone();
            self.commit(s);
            debug!(id, date = %iso_millis::format(&date), "post rescheduled");
            Ok(rescheduled)
        }

        async fn delete_post(&self, id: Id) -> RepoResult<()> {
            let mut s = self.write();
            let idx = s.posts.iter().position(|p| p.id == id).ok_or(RepoError::NotFound)?;
            s.posts.remove(idx);
            self.commit(s);
            Ok(())
        }

        async fn move_post(&self, from: usize, to: usize) -> RepoResult<()> {
            let mut s = self.write();
            list::move_post(&mut s.posts, from, to)?;
            self.commit(s);
            Ok(())
        }

        fn policy(&self) -> ReschedulePolicy {
            self.policy
        }
    }
}

//! In-process store used by the test suite in place of Postgres.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    blogs::{
        repo::BlogRepo,
        repo_types::{Blog, NewBlog},
    },
    error::{StoreError, StoreResult},
    users::{repo::UserRepo, repo_types::User},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    blogs: Vec<Blog>,
}

/// Both tables behind one lock, so linked writes are all-or-nothing.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn lock(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("memory store poisoned")))
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.lock()?.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.lock()?.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, name: &str, email: &str, password_hash: &str) -> StoreResult<User> {
        let mut t = self.lock()?;
        if t.users.iter().any(|u| u.email == email) {
            return Err(StoreError::Duplicate("users_email_key".into()));
        }
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            blogs: Vec::new(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        Ok(self.lock()?.users.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut t = self.lock()?;
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        Ok(t.users.len() != before)
    }
}

#[async_trait]
impl BlogRepo for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Blog>> {
        Ok(self.lock()?.blogs.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Blog>> {
        Ok(self.lock()?.blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn create_linked(&self, new: NewBlog) -> StoreResult<Option<Blog>> {
        let mut t = self.lock()?;
        let blog = Blog {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            image: new.image,
            date: new.date,
            user: new.user,
        };
        let Some(owner) = t.users.iter_mut().find(|u| u.id == blog.user) else {
            return Ok(None);
        };
        owner.blogs.push(blog.id);
        t.blogs.push(blog.clone());
        Ok(Some(blog))
    }

    async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
    ) -> StoreResult<Option<Blog>> {
        let mut t = self.lock()?;
        let Some(blog) = t.blogs.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        if let Some(title) = title {
            blog.title = Some(title.to_string());
        }
        if let Some(description) = description {
            blog.description = Some(description.to_string());
        }
        Ok(Some(blog.clone()))
    }

    async fn delete_linked(&self, id: Uuid) -> StoreResult<Option<Blog>> {
        let mut t = self.lock()?;
        let Some(pos) = t.blogs.iter().position(|b| b.id == id) else {
            return Ok(None);
        };
        let blog = t.blogs.remove(pos);
        if let Some(owner) = t.users.iter_mut().find(|u| u.id == blog.user) {
            owner.blogs.retain(|b| *b != blog.id);
        }
        Ok(Some(blog))
    }

    async fn list_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Blog>> {
        let t = self.lock()?;
        Ok(ids
            .iter()
            .filter_map(|id| t.blogs.iter().find(|b| b.id == *id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(owner: Uuid) -> NewBlog {
        NewBlog {
            title: Some("T".into()),
            description: None,
            image: None,
            date: OffsetDateTime::now_utc(),
            user: owner,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_like_a_unique_index() {
        let store = MemoryStore::default();
        store.create("Ann", "ann@x.com", "h").await.unwrap();
        let err = store.create("Ann 2", "ann@x.com", "h").await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[tokio::test]
    async fn create_linked_without_owner_leaves_no_blog() {
        let store = MemoryStore::default();
        let res = store.create_linked(draft(Uuid::new_v4())).await.unwrap();
        assert!(res.is_none());
        assert!(BlogRepo::list(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_by_ids_keeps_order_and_skips_dangling() {
        let store = MemoryStore::default();
        let owner = store.create("Ann", "ann@x.com", "h").await.unwrap();
        let a = store.create_linked(draft(owner.id)).await.unwrap().unwrap();
        let b = store.create_linked(draft(owner.id)).await.unwrap().unwrap();

        let got = store.list_by_ids(&[b.id, Uuid::new_v4(), a.id]).await.unwrap();
        let ids: Vec<Uuid> = got.iter().map(|blog| blog.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }
}

//! In-memory repositories.
//!
//! These behave like the MongoDB ones (store-assigned ids, unique emails,
//! insertion order as natural order). The service is wired with them in
//! tests.

use std::collections::HashMap;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::model::team::Team;
use crate::model::user::{User, UserStatus};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use crate::repository::team_repo::TeamRepository;
use crate::repository::user_repo::UserRepository;

#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored document for `email`, password hash included. Test helper.
    pub async fn raw(&self, email: &str) -> Option<User> {
        self.users.read().await.iter().find(|u| u.email == email).cloned()
    }

    async fn modify<F>(&self, email: &str, f: F) -> RepositoryResult<Option<User>>
    where
        F: FnOnce(&mut User) + Send,
    {
        let mut users = self.users.write().await;
        Ok(users.iter_mut().find(|u| u.email == email).map(|user| {
            f(user);
            user.clone()
        }))
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::already_exists(format!("Duplicate key: email {}", user.email)));
        }
        user.id = Some(ObjectId::new());
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self.raw(email).await)
    }

    async fn find_active(&self) -> RepositoryResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| u.status == UserStatus::Active).cloned().collect())
    }

    async fn find_active_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| u.status == UserStatus::Active)
            .filter(|u| u.id.map_or(false, |id| ids.contains(&id)))
            .cloned()
            .collect())
    }

    async fn set_status(&self, email: &str, status: UserStatus) -> RepositoryResult<Option<User>> {
        self.modify(email, |user| user.status = status).await
    }

    async fn update_profile(&self, email: &str, name: &str, photo: &str) -> RepositoryResult<Option<User>> {
        let (name, photo) = (name.to_string(), photo.to_string());
        self.modify(email, move |user| {
            user.name = name;
            user.photo = Some(photo);
        })
        .await
    }

    async fn increment_file_count(&self, email: &str) -> RepositoryResult<Option<User>> {
        self.modify(email, |user| user.file_count = Some(user.file_count() + 1)).await
    }
}

#[derive(Debug, Default)]
pub struct MemoryTeamRepository {
    teams: RwLock<HashMap<String, Team>>,
}

impl MemoryTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a team. Teams are managed outside the service, so
    /// this only exists to seed data.
    pub async fn put(&self, team: Team) {
        self.teams.write().await.insert(team.team_name.clone(), team);
    }
}

#[async_trait]
impl TeamRepository for MemoryTeamRepository {
    async fn find_by_name(&self, team_name: &str) -> RepositoryResult<Option<Team>> {
        Ok(self.teams.read().await.get(team_name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User {
            id: None,
            name: "Test".to_string(),
            email: email.to_string(),
            password: "hash".to_string(),
            role: None,
            status: UserStatus::Active,
            photo: None,
            team_name: None,
            file_count: None,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_rejects_duplicate_email() {
        let repo = MemoryUserRepository::new();
        let inserted = repo.insert(user("a@x.com")).await.unwrap();
        assert!(inserted.id.is_some());

        let err = repo.insert(user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_updates_on_unknown_email_return_none() {
        let repo = MemoryUserRepository::new();
        assert!(repo.set_status("nobody@x.com", UserStatus::Blocked).await.unwrap().is_none());
        assert!(repo.increment_file_count("nobody@x.com").await.unwrap().is_none());
        assert!(repo.update_profile("nobody@x.com", "n", "p").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_active_by_ids_keeps_store_order() {
        let repo = MemoryUserRepository::new();
        let a = repo.insert(user("a@x.com")).await.unwrap();
        let b = repo.insert(user("b@x.com")).await.unwrap();
        let c = repo.insert(user("c@x.com")).await.unwrap();
        repo.set_status("b@x.com", UserStatus::Blocked).await.unwrap();

        let ids = [c.id.unwrap(), b.id.unwrap(), a.id.unwrap()];
        let found: Vec<String> = repo
            .find_active_by_ids(&ids)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(found, vec!["a@x.com", "c@x.com"]);
    }
}

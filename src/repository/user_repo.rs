use crate::config::mongo_conf::MongoConfig;
use crate::model::user::{User, UserStatus};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::TryStreamExt;
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, Database, IndexModel};
use tracing::{error, info, instrument, warn};

/// Access to the `users` collection.
///
/// The update methods are single-document atomic updates. They return the
/// document as it is after the update, or `None` when no user matches `email`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> RepositoryResult<User>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    async fn find_active(&self) -> RepositoryResult<Vec<User>>;
    async fn find_active_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<User>>;
    async fn set_status(&self, email: &str, status: UserStatus) -> RepositoryResult<Option<User>>;
    async fn update_profile(&self, email: &str, name: &str, photo: &str) -> RepositoryResult<Option<User>>;
    async fn increment_file_count(&self, email: &str) -> RepositoryResult<Option<User>>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub async fn new(db: &Database, config: &MongoConfig) -> Self {
        let repo = MongoUserRepository {
            collection: db.collection::<User>(&config.user_collection),
        };
        repo.ensure_indexes().await;
        repo
    }

    /// Unique index on `email`. A failure is logged and tolerated: the
    /// lookup before insert still rejects duplicates.
    async fn ensure_indexes(&self) {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        match self.collection.create_index(index, None).await {
            Ok(result) => info!(index = %result.index_name, "User email index ready"),
            Err(e) => warn!("Failed to create unique email index: {}", e),
        }
    }

    async fn update_one_by_email(&self, email: &str, update: Document) -> RepositoryResult<Option<User>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        self.collection
            .find_one_and_update(doc! { "email": email }, update, options)
            .await
            .map_err(|e| {
                error!("Failed to update user {}: {}", email, e);
                RepositoryError::from(e)
            })
    }

    async fn find_many(&self, filter: Document) -> RepositoryResult<Vec<User>> {
        let cursor = self.collection.find(filter, None).await.map_err(|e| {
            error!("Failed to query users: {}", e);
            RepositoryError::from(e)
        })?;
        let users: Vec<User> = cursor.try_collect().await.map_err(|e| {
            error!("Failed to read user cursor: {}", e);
            RepositoryError::from(e)
        })?;
        info!("Fetched {} users", users.len());
        Ok(users)
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        user.id = Some(ObjectId::new());
        match self.collection.insert_one(user.clone(), None).await {
            Ok(_) => {
                info!("User inserted");
                Ok(user)
            }
            Err(e) => {
                error!("Failed to insert user: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let filter = doc! { "email": email };
        let user = self.collection.find_one(filter, None).await.map_err(|e| {
            error!("Failed to find user by email: {}", e);
            RepositoryError::from(e)
        })?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_active(&self) -> RepositoryResult<Vec<User>> {
        self.find_many(doc! { "status": UserStatus::Active.as_str() }).await
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_active_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<User>> {
        self.find_many(doc! {
            "_id": { "$in": ids.to_vec() },
            "status": UserStatus::Active.as_str(),
        })
        .await
    }

    #[instrument(skip(self, status), fields(status = %status))]
    async fn set_status(&self, email: &str, status: UserStatus) -> RepositoryResult<Option<User>> {
        self.update_one_by_email(email, doc! { "$set": { "status": status.as_str() } }).await
    }

    #[instrument(skip(self, photo))]
    async fn update_profile(&self, email: &str, name: &str, photo: &str) -> RepositoryResult<Option<User>> {
        self.update_one_by_email(email, doc! { "$set": { "name": name, "photo": photo } }).await
    }

    #[instrument(skip(self))]
    async fn increment_file_count(&self, email: &str) -> RepositoryResult<Option<User>> {
        self.update_one_by_email(email, doc! { "$inc": { "fileCount": 1_i64 } }).await
    }
}

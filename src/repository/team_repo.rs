use crate::config::mongo_conf::MongoConfig;
use crate::model::team::Team;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::doc;
use mongodb::{Collection, Database};
use tracing::error;

/// Read access to the `teams` collection. Teams are written elsewhere.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn find_by_name(&self, team_name: &str) -> RepositoryResult<Option<Team>>;
}

pub struct MongoTeamRepository {
    collection: Collection<Team>,
}

impl MongoTeamRepository {
    pub fn new(db: &Database, config: &MongoConfig) -> Self {
        MongoTeamRepository {
            collection: db.collection::<Team>(&config.team_collection),
        }
    }
}

#[async_trait]
impl TeamRepository for MongoTeamRepository {
    #[tracing::instrument(skip(self))]
    async fn find_by_name(&self, team_name: &str) -> RepositoryResult<Option<Team>> {
        self.collection
            .find_one(doc! { "teamName": team_name }, None)
            .await
            .map_err(|e| {
                error!("Failed to find team {}: {}", team_name, e);
                RepositoryError::from(e)
            })
    }
}

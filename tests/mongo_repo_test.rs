use account_backend::config::mongo_conf::MongoConfig;
use account_backend::model::team::{MemberRef, Team};
use account_backend::model::user::{User, UserStatus};
use account_backend::repository::connect;
use account_backend::repository::repository_error::RepositoryError;
use account_backend::repository::team_repo::{MongoTeamRepository, TeamRepository};
use account_backend::repository::user_repo::{MongoUserRepository, UserRepository};
use bson::{doc, oid::ObjectId};
use mongodb::Database;

async fn setup() -> (Database, MongoConfig) {
    // Load environment variables from .env file
    let _ = dotenv::dotenv();
    let config = MongoConfig::from_env().expect("Failed to load MongoConfig");
    let db = connect(&config).await.expect("Failed to connect to MongoDB");
    (db, config)
}

fn user(email: &str) -> User {
    User {
        id: None,
        name: "Repo Test".to_string(),
        email: email.to_string(),
        password: "$argon2id$placeholder".to_string(),
        role: Some("member".to_string()),
        status: UserStatus::Active,
        photo: None,
        team_name: None,
        file_count: None,
    }
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_user_repository_workflow() {
    let (db, config) = setup().await;
    let repo = MongoUserRepository::new(&db, &config).await;
    let email = format!("repo-{}@example.com", ObjectId::new().to_hex());

    let inserted = repo.insert(user(&email)).await.expect("Failed to insert user");
    assert!(inserted.id.is_some());

    let dup = repo.insert(user(&email)).await;
    assert!(matches!(dup, Err(RepositoryError::AlreadyExists(_))));

    let found = repo.find_by_email(&email).await.unwrap().expect("user missing");
    assert_eq!(found.id, inserted.id);
    assert_eq!(found.file_count(), 0);

    for expected in 1..=3 {
        let updated = repo.increment_file_count(&email).await.unwrap().unwrap();
        assert_eq!(updated.file_count(), expected);
    }

    let updated = repo.update_profile(&email, "Renamed", "https://img/r.png").await.unwrap().unwrap();
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.photo.as_deref(), Some("https://img/r.png"));

    let blocked = repo.set_status(&email, UserStatus::Blocked).await.unwrap().unwrap();
    assert_eq!(blocked.status, UserStatus::Blocked);
    assert!(!repo.find_active().await.unwrap().iter().any(|u| u.email == email));

    repo.set_status(&email, UserStatus::Active).await.unwrap();
    let id = inserted.id.unwrap();
    let active = repo.find_active_by_ids(&[id, ObjectId::new()]).await.unwrap();
    assert_eq!(active.len(), 1);

    assert!(repo.set_status("ghost@example.com", UserStatus::Blocked).await.unwrap().is_none());

    db.collection::<User>(&config.user_collection)
        .delete_one(doc! { "_id": id }, None)
        .await
        .expect("Failed to clean up user");
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_team_repository_find_by_name() {
    let (db, config) = setup().await;
    let repo = MongoTeamRepository::new(&db, &config);
    let name = format!("team-{}", ObjectId::new().to_hex());
    let member = ObjectId::new();

    let teams = db.collection::<Team>(&config.team_collection);
    let result = teams
        .insert_one(
            Team {
                id: None,
                team_name: name.clone(),
                team_members: vec![MemberRef::Id(member), MemberRef::Hex(member.to_hex())],
            },
            None,
        )
        .await
        .expect("Failed to insert team");

    let team = repo.find_by_name(&name).await.unwrap().expect("team missing");
    assert_eq!(team.member_ids(), vec![member, member]);
    assert!(repo.find_by_name("no-such-team").await.unwrap().is_none());

    teams
        .delete_one(doc! { "_id": result.inserted_id }, None)
        .await
        .expect("Failed to clean up team");
}

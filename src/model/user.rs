use bson::{oid::ObjectId, Bson};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account state. Only these two values are ever stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Blocked,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "blocked" => Ok(UserStatus::Blocked),
            other => Err(format!("Unknown user status: {}", other)),
        }
    }
}

/// A document of the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub email: String,
    /// Argon2 PHC string, or a bcrypt hash on older accounts
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: UserStatus,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "numeric_count")]
    pub file_count: Option<i64>,
}

// Older documents hold `null` where a value is expected.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Hand-seeded documents may store the count as int32 or double.
fn numeric_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Bson>::deserialize(deserializer)? {
        None | Some(Bson::Null) => Ok(None),
        Some(Bson::Int32(n)) => Ok(Some(i64::from(n))),
        Some(Bson::Int64(n)) => Ok(Some(n)),
        Some(Bson::Double(n)) if n.is_finite() => Ok(Some(n as i64)),
        Some(other) => Err(D::Error::custom(format!("invalid fileCount: {}", other))),
    }
}

impl User {
    pub fn file_count(&self) -> i64 {
        self.file_count.unwrap_or(0)
    }
}

/// What callers get to see of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub status: UserStatus,
    pub photo: Option<String>,
    pub team_name: Option<String>,
    pub file_count: i64,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        let file_count = user.file_count();
        PublicUser {
            id: user.id.map(|id| id.to_hex()),
            name: user.name,
            email: user.email,
            role: user.role,
            status: user.status,
            photo: user.photo,
            team_name: user.team_name,
            file_count,
        }
    }
}

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A team member reference. Older documents store the hex string rather
/// than the ObjectId itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemberRef {
    Id(ObjectId),
    Hex(String),
}

impl MemberRef {
    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            MemberRef::Id(id) => Some(*id),
            MemberRef::Hex(hex) => ObjectId::parse_str(hex).ok(),
        }
    }
}

/// A document of the `teams` collection. Read-only for this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub team_name: String,
    #[serde(default)]
    pub team_members: Vec<MemberRef>,
}

impl Team {
    /// Member ids in stored order; references that are not valid ObjectIds are dropped.
    pub fn member_ids(&self) -> Vec<ObjectId> {
        self.team_members
            .iter()
            .filter_map(|member| {
                let id = member.object_id();
                if id.is_none() {
                    warn!(team = %self.team_name, member = ?member, "Skipping invalid team member reference");
                }
                id
            })
            .collect()
    }
}

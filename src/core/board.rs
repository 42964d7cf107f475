//! Board data model: a named collection of tasks with an owner and
//! a set of members with roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Unique identifier for a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(pub Uuid);

impl BoardId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Return first 8 characters of the UUID for display.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for BoardId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BoardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for BoardId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// What a member may do on a board. The owner is not listed as a member
/// and always has full control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read only.
    #[default]
    Viewer,
    /// Can create, edit, move and delete tasks.
    Editor,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Viewer => write!(f, "viewer"),
            Role::Editor => write!(f, "editor"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "viewer" => Ok(Role::Viewer),
            "editor" => Ok(Role::Editor),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// A user invited to a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Member identity (email address in practice).
    pub uid: String,
    /// Granted role.
    pub role: Role,
}

impl Member {
    pub fn new(uid: &str, role: Role) -> Self {
        Self {
            uid: uid.to_string(),
            role,
        }
    }
}

/// A named collection of tasks with an owner and invited members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// Unique identifier for this board.
    pub id: BoardId,
    /// Board title.
    pub title: String,
    /// Longer description, may be empty.
    pub description: String,
    /// Identity of the board owner.
    pub owner: String,
    /// Invited members (never includes the owner).
    pub members: Vec<Member>,
    /// When the board was created.
    pub created_at: DateTime<Utc>,
}

impl Board {
    /// Create a new board owned by the given user, with no members.
    pub fn create(title: &str, description: &str, owner: &str) -> Self {
        Self {
            id: BoardId::new(),
            title: title.to_string(),
            description: description.to_string(),
            owner: owner.to_string(),
            members: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_owner(&self, uid: &str) -> bool {
        self.owner == uid
    }

    /// Look up a member by identity.
    pub fn member(&self, uid: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.uid == uid)
    }

    /// Whether the user may mutate tasks: the owner, or an editor member.
    pub fn can_edit(&self, uid: &str) -> bool {
        self.is_owner(uid) || matches!(self.member(uid), Some(m) if m.role == Role::Editor)
    }

    /// Whether the user may see the board at all.
    pub fn can_view(&self, uid: &str) -> bool {
        self.is_owner(uid) || self.member(uid).is_some()
    }

    /// Invite a user. The owner cannot be added, and inviting an
    /// existing member is an error.
    pub fn add_member(&mut self, member: Member) -> Result<()> {
        if self.is_owner(&member.uid) || self.member(&member.uid).is_some() {
            return Err(Error::MemberExists(member.uid));
        }
        self.members.push(member);
        Ok(())
    }

    /// Remove an invited member.
    pub fn remove_member(&mut self, uid: &str) -> Result<()> {
        let before = self.members.len();
        self.members.retain(|m| m.uid != uid);
        if self.members.len() == before {
            return Err(Error::MemberNotFound(uid.to_string()));
        }
        Ok(())
    }
}

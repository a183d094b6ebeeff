use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::fmt;

/// Users keyed by username, with a secondary id index.
pub struct MemoryUserRepo {
    by_username: DashMap<String, UserRecord>,
    usernames: DashMap<UserId, String>,
    teams: DashMap<TeamId, String>,
}

impl fmt::Debug for MemoryUserRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryUserRepo")
            .field("users", &self.by_username.len())
            .field("teams", &self.teams.len())
            .finish()
    }
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        MemoryUserRepo {
            by_username: DashMap::new(),
            usernames: DashMap::new(),
            teams: DashMap::new(),
        }
    }

    pub fn add_team(&self, name: &str) -> TeamId {
        let id = TeamId(uuid::Uuid::new_v4());
        self.teams.insert(id, name.to_string());
        id
    }

    /// Drops a user outright; live credentials for it stop resolving.
    pub fn remove(&self, user_id: UserId) -> bool {
        match self.usernames.remove(&user_id) {
            Some((_, username)) => self.by_username.remove(&username).is_some(),
            None => false,
        }
    }

    pub fn set_active(&self, user_id: UserId, is_active: bool) -> bool {
        let Some(username) = self.usernames.get(&user_id).map(|name| name.clone()) else {
            return false;
        };
        match self.by_username.get_mut(&username) {
            Some(mut rec) => {
                rec.is_active = is_active;
                true
            }
            None => false,
        }
    }
}

impl Default for MemoryUserRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl UserRepo for MemoryUserRepo {
    async fn create(&self, record: UserRecord) -> Result<(), CreateUserError> {
        if let Some(team) = record.team {
            if !self.teams.contains_key(&team) {
                return Err(CreateUserError::UnknownTeam);
            }
        }

        match self.by_username.entry(record.username.clone()) {
            Entry::Occupied(_) => Err(CreateUserError::UsernameTaken),
            Entry::Vacant(slot) => {
                self.usernames.insert(record.user_id, record.username.clone());
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>, AuthError> {
        Ok(self.by_username.get(username).map(|r| r.value().clone()))
    }

    async fn get_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>, AuthError> {
        let Some(username) = self.usernames.get(&user_id).map(|u| u.value().clone()) else {
            return Ok(None);
        };
        Ok(self.by_username.get(&username).map(|r| r.value().clone()))
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self.by_username.contains_key(username))
    }

    async fn team_exists(&self, team_id: TeamId) -> Result<bool, AuthError> {
        Ok(self.teams.contains_key(&team_id))
    }
}

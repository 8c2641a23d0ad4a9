use crate::client::local_store::KeyValueStore;
use crate::error::LocalStoreError;
use crate::models::user::is_valid_user_id;
use serde::{Deserialize, Serialize};

pub const TOKEN_KEY: &str = "token";
pub const USER_ID_KEY: &str = "userId";
pub const USER_NAME_KEY: &str = "userName";

/// Who the scores of this browser session belong to.
///
/// Engines receive it explicitly; without one the games still play but
/// nothing is posted.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionIdentity {
    pub user_id: String,
    pub user_name: String,
    pub token: Option<String>,
}

/// Login reply of the identity provider.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Deserialize)]
pub struct LoginUser {
    #[serde(alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

impl SessionIdentity {
    pub fn new(user_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        SessionIdentity {
            user_id: user_id.into(),
            user_name: user_name.into(),
            token: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        is_valid_user_id(&self.user_id)
    }

    /// Builds the identity from a login reply; `None` when no user id came back.
    pub fn from_login_response(response: LoginResponse) -> Option<Self> {
        let user_id = response.user.id.filter(|id| !id.is_empty())?;
        Some(SessionIdentity {
            user_id,
            user_name: response.user.name,
            token: Some(response.token),
        })
    }

    pub fn load(store: &impl KeyValueStore) -> Option<Self> {
        let user_id = store.get(USER_ID_KEY).filter(|id| !id.is_empty())?;
        Some(SessionIdentity {
            user_id,
            user_name: store.get(USER_NAME_KEY).unwrap_or_default(),
            token: store.get(TOKEN_KEY),
        })
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), LocalStoreError> {
        match &self.token {
            Some(token) => store.set(TOKEN_KEY, token)?,
            None => store.remove(TOKEN_KEY)?,
        }
        store.set(USER_ID_KEY, &self.user_id)?;
        store.set(USER_NAME_KEY, &self.user_name)
    }

    /// Logs out.
    pub fn clear(store: &mut impl KeyValueStore) -> Result<(), LocalStoreError> {
        store.remove(TOKEN_KEY)?;
        store.remove(USER_ID_KEY)?;
        store.remove(USER_NAME_KEY)
    }
}

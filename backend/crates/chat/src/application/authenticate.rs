//! Caller identification shared by the chat use cases

use crate::error::{ChatError, ChatResult};
use platform::hosted::{AuthUser, UserStore};

/// Authenticated caller; the token is reused for row-level-secured queries.
#[derive(Debug, Clone)]
pub struct Caller {
    pub access_token: String,
    pub user: AuthUser,
}

/// Resolve the access token, failing with 401 when it is absent or unknown.
pub async fn require_caller<U>(users: &U, access_token: Option<String>) -> ChatResult<Caller>
where
    U: UserStore,
{
    let access_token = access_token.ok_or(ChatError::AuthRequired)?;
    let user = users
        .user_for_token(&access_token)
        .await?
        .ok_or(ChatError::InvalidToken)?;
    Ok(Caller { access_token, user })
}

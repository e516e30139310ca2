use axum::response::Redirect;
use dioxus::{
    logger::tracing::info,
    prelude::{ServerFnError, extract},
};
use jokes_shared::datatypes::User;

use crate::loader::CurrentUserSource;
use crate::models::UserDbOperations as _;

#[derive(Debug, Clone)]
pub(crate) struct AuthAccount {
    user: Option<User>,
}

impl AuthAccount {
    pub fn get_user(&self) -> Option<User> {
        self.user.clone()
    }
}

#[async_trait::async_trait]
impl axum_session_auth::Authentication<AuthAccount, i64, sqlx::SqlitePool> for AuthAccount {
    async fn load_user(
        userid: i64,
        pool: Option<&sqlx::SqlitePool>,
    ) -> Result<AuthAccount, anyhow::Error> {
        let Some(pool) = pool else {
            return Ok(Self { user: None });
        };
        let user = User::get_user(pool, userid)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to load user {userid}: {e}"))?;
        Ok(Self { user })
    }

    fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    fn is_active(&self) -> bool {
        self.user.is_some()
    }

    fn is_anonymous(&self) -> bool {
        self.user.is_none()
    }
}

pub type Session = axum_session_auth::AuthSession<
    AuthAccount,
    i64,
    axum_session_sqlx::SessionSqlitePool,
    sqlx::SqlitePool,
>;

pub async fn get_session() -> Result<Session, ServerFnError> {
    extract::<_, _>()
        .await
        .map_err(|_| ServerFnError::new("AuthSessionLayer was not found"))
}

/// The logged in user of a session, `None` for anonymous visitors.
pub(crate) fn session_user(session: &Session) -> Option<User> {
    session
        .current_user
        .as_ref()
        .and_then(AuthAccount::get_user)
}

impl CurrentUserSource for Session {
    async fn current_user(&self) -> Result<Option<User>, ServerFnError> {
        Ok(session_user(self))
    }
}

/// `/logout` works for links and for forms alike.
pub(crate) async fn logout_redirect(auth: Session) -> Redirect {
    if let Some(user) = session_user(&auth) {
        info!("Logging out {}", user.username);
    }
    auth.logout_user();
    Redirect::to("/jokes")
}

#[cfg(feature = "server")]
use crate::models::{UserDbOperations as _, verify_password};
#[cfg(feature = "server")]
use dioxus::logger::tracing::info;
use dioxus::prelude::{ServerFnError, server, server_fn};
#[cfg(feature = "server")]
use jokes_shared::apirequests::users::LoginUser;
use jokes_shared::datatypes::User;

#[server(Login, endpoint = "login")]
pub async fn login(username: String, password: String) -> Result<User, ServerFnError> {
    let auth = crate::auth::get_session().await?;
    let credentials = LoginUser { username, password };
    if !credentials.is_plausible() {
        return Err(ServerFnError::new("Username or password invalid"));
    }
    info!("Login attempt for user: {}", credentials.username);

    let db = crate::get_db().await?;
    let secret = crate::get_secret()?;
    match User::get_user_by_name(&db, &credentials.username).await? {
        Some(user) if verify_password(&user, &credentials.password, &secret)? => {
            auth.login_user(user.id);
            Ok(user)
        }
        Some(user) => {
            info!("Failed to verify password for {}", &user.username);
            Err(ServerFnError::new("Unauthorized"))
        }
        None => {
            info!("No user named {}", &credentials.username);
            Err(ServerFnError::new("Unauthorized"))
        }
    }
}

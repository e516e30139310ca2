//! The data loader of the jokes layout.
//!
//! The loader only knows two capabilities: something that lists joke teasers and
//! something that knows who sent the request. The server wires them to sqlite and
//! the axum session, the tests wire them to plain vectors.

use dioxus::prelude::ServerFnError;
use jokes_shared::{
    JOKE_TEASER_LIMIT,
    datatypes::{JokeTeaser, PageData, User},
};

/// Read access to the teasers of the stored jokes.
#[allow(async_fn_in_trait)]
pub trait JokeTeaserSource {
    /// Return at most `limit` teasers in the order the source considers natural.
    async fn find_teasers(&self, limit: usize) -> Result<Vec<JokeTeaser>, ServerFnError>;
}

/// Resolves the user of the current request.
#[allow(async_fn_in_trait)]
pub trait CurrentUserSource {
    async fn current_user(&self) -> Result<Option<User>, ServerFnError>;
}

/// Load the data of the jokes layout.
///
/// # Errors
/// Failures of either source are passed on unchanged.
pub async fn load_jokes_page(
    jokes: &impl JokeTeaserSource,
    users: &impl CurrentUserSource,
) -> Result<PageData, ServerFnError> {
    let mut joke_list_items = jokes.find_teasers(JOKE_TEASER_LIMIT).await?;
    joke_list_items.truncate(JOKE_TEASER_LIMIT);
    let user = users.current_user().await?;

    Ok(PageData {
        user,
        joke_list_items,
    })
}

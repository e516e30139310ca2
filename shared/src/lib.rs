//! Types that travel between the jokes server and its client.

pub mod apirequests;
pub mod datatypes;

/// The maximum number of teasers the jokes layout lists.
pub const JOKE_TEASER_LIMIT: usize = 5;

//! The RSS feed of the newest jokes.

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use dioxus::logger::tracing::{error, info};
use jokes_shared::datatypes::Joke;

use crate::models::JokeDbOperations as _;

const FEED_LENGTH: i64 = 100;

pub(crate) async fn jokes_rss() -> Response {
    let jokes = match crate::get_db().await {
        Ok(db) => Joke::get_recent_jokes(&db, FEED_LENGTH).await,
        Err(e) => Err(e),
    };
    match jokes {
        Ok(jokes) => {
            info!("Serving the feed with {} jokes", jokes.len());
            let body = render_feed(&crate::get_public_url(), &jokes);
            (
                [
                    (header::CONTENT_TYPE, "application/xml"),
                    (header::CACHE_CONTROL, "public, max-age=2419200"),
                ],
                body,
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to load the jokes for the feed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load the jokes").into_response()
        }
    }
}

/// Render an RSS 2.0 document, `public_url` is the origin the links point to.
pub(crate) fn render_feed(public_url: &str, jokes: &[Joke]) -> String {
    let base = public_url.trim_end_matches('/');
    let jokes_url = format!("{base}/jokes");
    let items: String = jokes
        .iter()
        .map(|joke| {
            let link = format!("{jokes_url}/{}", joke.id);
            let published = joke.created_at.and_utc().to_rfc2822();
            format!(
                r#"
      <item>
        <title><![CDATA[{}]]></title>
        <description><![CDATA[A funny joke called {}]]></description>
        <pubDate>{}</pubDate>
        <link>{}</link>
        <guid>{}</guid>
      </item>"#,
                cdata(&joke.name),
                cdata(&joke.name),
                published,
                escape(&link),
                escape(&link)
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss xmlns:blogChannel="{jokes_url}" version="2.0">
  <channel>
    <title>Remix Jokes</title>
    <link>{jokes_url}</link>
    <description>Some funny jokes</description>
    <language>en-us</language>
    <generator>Kody the Koala</generator>
    <ttl>40</ttl>{items}
  </channel>
</rss>"#,
        jokes_url = escape(&jokes_url),
    )
}

/// Escape the five XML special characters.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// A CDATA section cannot contain its own terminator, split it.
fn cdata(text: &str) -> String {
    text.replace("]]>", "]]]]><![CDATA[>")
}

use crate::config::toml_config::{NewsConfig, NewsFeedConfig};
use crate::domain::model::NewsArticle;
use crate::domain::ports::NewsProvider;
use crate::utils::error::{CondoTvError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::sync::LazyLock;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<]+?>").expect("HTML tag pattern is valid"));

#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    items: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    link: String,
    #[serde(default, rename = "pubDate")]
    pub_date: String,
    #[serde(default)]
    thumbnail: String,
    #[serde(default)]
    enclosure: Option<FeedEnclosure>,
}

#[derive(Debug, Deserialize)]
struct FeedEnclosure {
    #[serde(default)]
    link: Option<String>,
}

/// Pulls headlines from rss2json-style JSON feeds, in configured order.
pub struct FeedNewsProvider {
    client: Client,
    feeds: Vec<NewsFeedConfig>,
    max_age: Duration,
    description_max_chars: usize,
}

impl FeedNewsProvider {
    pub fn new(config: &NewsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            feeds: config.feeds.clone(),
            max_age: Duration::hours(config.max_age_hours as i64),
            description_max_chars: config.description_max_chars,
        })
    }

    async fn fetch_feed(&self, feed: &NewsFeedConfig, limit: usize) -> Result<Vec<FeedItem>> {
        tracing::debug!("Fetching news feed '{}' from {}", feed.name, feed.url);
        let response = self
            .client
            .get(&feed.url)
            .query(&[("count", (limit * 2).to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CondoTvError::NewsProviderError {
                source_name: feed.name.clone(),
                message: format!("unexpected status {}", response.status()),
            });
        }

        let body: FeedResponse = response.json().await?;
        Ok(body.items)
    }

    fn to_article(&self, feed: &NewsFeedConfig, item: FeedItem) -> Option<NewsArticle> {
        let title = item.title.trim().to_string();
        if title.is_empty() {
            return None;
        }

        let image_url = if item.thumbnail.is_empty() {
            item.enclosure.and_then(|e| e.link).filter(|l| !l.is_empty())
        } else {
            Some(item.thumbnail)
        };
        let description = clean_description(&item.description, self.description_max_chars);

        Some(NewsArticle {
            title,
            description: (!description.is_empty()).then_some(description),
            url: item.link,
            image_url,
            published_at: item.pub_date,
            source: feed.name.clone(),
        })
    }
}

#[async_trait]
impl NewsProvider for FeedNewsProvider {
    async fn latest(&self, limit: usize) -> Result<Vec<NewsArticle>> {
        let mut articles = Vec::new();
        if limit == 0 {
            return Ok(articles);
        }

        let oldest = Utc::now() - self.max_age;

        for feed in &self.feeds {
            let items = match self.fetch_feed(feed, limit).await {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!("News feed '{}' failed: {}", feed.name, e);
                    continue;
                }
            };

            for item in items {
                if !is_recent(&item.pub_date, oldest) {
                    continue;
                }
                if let Some(article) = self.to_article(feed, item) {
                    articles.push(article);
                }
                if articles.len() >= limit {
                    return Ok(articles);
                }
            }
        }

        tracing::debug!("Collected {} news articles (limit {})", articles.len(), limit);
        Ok(articles)
    }
}

/// Removes markup and cuts to `max_chars` characters, marking the cut with "...".
pub fn clean_description(raw: &str, max_chars: usize) -> String {
    let text = HTML_TAG.replace_all(raw, "");
    let text = text.trim();
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

/// Dates that cannot be parsed count as recent.
fn is_recent(pub_date: &str, oldest: DateTime<Utc>) -> bool {
    match parse_pub_date(pub_date) {
        Some(published) => published >= oldest,
        None => true,
    }
}

fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_description_strips_tags_and_truncates() {
        assert_eq!(
            clean_description("  <p>Rain <b>today</b></p> ", 200),
            "Rain today"
        );
        assert_eq!(clean_description("abcdef", 3), "abc...");
        assert_eq!(clean_description("ação", 4), "ação");
    }

    #[test]
    fn test_parse_pub_date_formats() {
        assert!(parse_pub_date("2025-10-31 12:30:00").is_some());
        assert!(parse_pub_date("2025-10-31T12:30:00Z").is_some());
        assert!(parse_pub_date("Fri, 31 Oct 2025 12:30:00 +0000").is_some());
        assert!(parse_pub_date("yesterday").is_none());
    }

    #[test]
    fn test_unparseable_dates_are_recent() {
        let oldest = Utc::now() - Duration::hours(24);
        assert!(is_recent("not a date", oldest));
        assert!(!is_recent("2001-01-01 00:00:00", oldest));
    }
}

//! RSS news feed

use serde::{Deserialize, Serialize};

use super::{build_http_client, UpstreamError, DEFAULT_TIMEOUT};

/// News headline as served by `/api/news`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(rename = "pubDate", skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<String>,
}

/// Parse an RSS document into headlines, in feed order
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<NewsItem>, rss::Error> {
    let channel = rss::Channel::read_from(bytes)?;
    Ok(channel
        .items()
        .iter()
        .map(|item| NewsItem {
            title: item.title().map(str::to_string),
            link: item.link().map(str::to_string),
            pub_date: item.pub_date().map(str::to_string),
        })
        .collect())
}

#[derive(Debug, Clone)]
pub struct NewsFeed {
    http: reqwest::Client,
    feed_url: String,
}

impl NewsFeed {
    pub fn new(feed_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: build_http_client(DEFAULT_TIMEOUT)?,
            feed_url: feed_url.into(),
        })
    }

    /// Download and parse the whole feed
    pub async fn fetch(&self) -> Result<Vec<NewsItem>, UpstreamError> {
        let endpoint = self.feed_url.as_str();
        let response = self
            .http
            .get(endpoint)
            .send()
            .await
            .map_err(|e| UpstreamError::http(endpoint, e))?;

        if !response.status().is_success() {
            return Err(UpstreamError::Status {
                endpoint: endpoint.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::http(endpoint, e))?;
        parse_feed(&bytes).map_err(|e| UpstreamError::decode(endpoint, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Thể thao</title>
    <link>https://vnexpress.net/the-thao</link>
    <description>Tin thể thao</description>
    <item>
      <title>Arsenal thắng derby</title>
      <link>https://vnexpress.net/a-1.html</link>
      <pubDate>Sat, 01 Mar 2025 10:00:00 +0700</pubDate>
    </item>
    <item>
      <title>Không có ngày</title>
      <link>https://vnexpress.net/a-2.html</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_feed() {
        let items = parse_feed(FEED.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title.as_deref(), Some("Arsenal thắng derby"));
        assert_eq!(
            items[0].pub_date.as_deref(),
            Some("Sat, 01 Mar 2025 10:00:00 +0700")
        );
        assert!(items[1].pub_date.is_none());
    }

    #[test]
    fn test_news_item_json_uses_pub_date_key() {
        let items = parse_feed(FEED.as_bytes()).unwrap();
        let value = serde_json::to_value(&items).unwrap();
        assert_eq!(value[0]["pubDate"], "Sat, 01 Mar 2025 10:00:00 +0700");
        assert!(value[1].get("pubDate").is_none());
    }

    #[test]
    fn test_parse_feed_rejects_garbage() {
        assert!(parse_feed(b"<html>not rss</html>").is_err());
    }
}

use crate::core::playlist::PlaylistBuilder;
use crate::domain::model::{Ad, ContentProportion, Id, NewsArticle, Notice, Playlist, Tv};
use crate::domain::ports::{ContentStore, NewsProvider};
use crate::utils::error::{CondoTvError, Result};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TvSummary {
    pub id: Id,
    pub name: String,
    pub connection_code: String,
    pub template: Option<String>,
}

impl From<&Tv> for TvSummary {
    fn from(tv: &Tv) -> Self {
        Self {
            id: tv.id,
            name: tv.name.clone(),
            connection_code: tv.connection_code.clone(),
            template: tv.template.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProportionSummary {
    #[serde(flatten)]
    pub proportion: ContentProportion,
    pub description: String,
}

/// Interleaved content for one TV, ready to be sent to the screen.
#[derive(Debug, Clone, Serialize)]
pub struct TvContent {
    pub tv: TvSummary,
    pub config: ProportionSummary,
    #[serde(flatten)]
    pub playlist: Playlist,
}

/// Non-interleaved content of a condominium, used by the mobile app.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CondominiumContent {
    pub ads: Vec<Ad>,
    pub notices: Vec<Notice>,
    pub news: Vec<NewsArticle>,
    pub total_ads: usize,
    pub total_notices: usize,
    pub total_news: usize,
}

pub struct TvContentService<S: ContentStore, N: NewsProvider> {
    store: S,
    news: N,
    builder: PlaylistBuilder,
}

impl<S: ContentStore, N: NewsProvider> TvContentService<S, N> {
    pub fn new(store: S, news: N) -> Self {
        Self {
            store,
            news,
            builder: PlaylistBuilder::default(),
        }
    }

    pub fn with_builder(mut self, builder: PlaylistBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn content_for_tv(&self, connection_code: &str) -> Result<TvContent> {
        let tv = self
            .store
            .tv_by_connection_code(connection_code)
            .await?
            .ok_or_else(|| CondoTvError::not_found("TV", connection_code))?;

        tracing::debug!(
            "Resolved TV '{}' (code {}) for condominium {}",
            tv.name,
            tv.connection_code,
            tv.condominium_id
        );

        let config = tv.config();
        let notices = self
            .store
            .active_notices_for_condo(config.condominium_id)
            .await?;
        let ads = self.store.active_ads_for_condo(config.condominium_id).await?;
        let news = if config.proportion.news_ratio > 0 {
            self.fetch_news(config.proportion.news_ratio as usize).await
        } else {
            Vec::new()
        };

        let playlist = self
            .builder
            .build(config.proportion, &notices, &ads, &news);

        tracing::info!(
            "📺 TV '{}': {} items ({} notices, {} ads, {} news)",
            tv.name,
            playlist.len(),
            playlist.stats().notices,
            playlist.stats().ads,
            playlist.stats().news
        );

        Ok(TvContent {
            tv: TvSummary::from(&tv),
            config: ProportionSummary {
                proportion: config.proportion,
                description: config.proportion.describe(),
            },
            playlist,
        })
    }

    pub async fn content_for_condominium(
        &self,
        condominium_id: Id,
        include_news: bool,
        news_limit: usize,
    ) -> Result<CondominiumContent> {
        let ads = self.store.active_ads_for_condo(condominium_id).await?;
        let notices = self.store.active_notices_for_condo(condominium_id).await?;
        let news = if include_news {
            self.fetch_news(news_limit).await
        } else {
            Vec::new()
        };

        Ok(CondominiumContent {
            total_ads: ads.len(),
            total_notices: notices.len(),
            total_news: news.len(),
            ads,
            notices,
            news,
        })
    }

    /// News is best effort: provider failures become an empty list.
    async fn fetch_news(&self, limit: usize) -> Vec<NewsArticle> {
        match self.news.latest(limit).await {
            Ok(mut articles) => {
                articles.truncate(limit);
                articles
            }
            Err(e) => {
                tracing::warn!("News unavailable, continuing without it: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ContentStatus, TvStatus};
    use async_trait::async_trait;

    struct FixedStore {
        tv: Tv,
        notices: Vec<Notice>,
    }

    #[async_trait]
    impl ContentStore for FixedStore {
        async fn tv_by_connection_code(&self, code: &str) -> Result<Option<Tv>> {
            Ok((self.tv.connection_code == code).then(|| self.tv.clone()))
        }

        async fn active_notices_for_condo(&self, condominium_id: Id) -> Result<Vec<Notice>> {
            Ok(self
                .notices
                .iter()
                .filter(|n| n.targets(condominium_id))
                .cloned()
                .collect())
        }

        async fn active_ads_for_condo(&self, _condominium_id: Id) -> Result<Vec<Ad>> {
            Ok(Vec::new())
        }
    }

    struct FailingNews;

    #[async_trait]
    impl NewsProvider for FailingNews {
        async fn latest(&self, _limit: usize) -> Result<Vec<NewsArticle>> {
            Err(CondoTvError::NewsProviderError {
                source_name: "test".to_string(),
                message: "down".to_string(),
            })
        }
    }

    fn store() -> FixedStore {
        FixedStore {
            tv: Tv {
                id: 7,
                name: "Lobby".to_string(),
                condominium_id: 3,
                connection_code: "55555".to_string(),
                status: TvStatus::Offline,
                template: Some("layout1".to_string()),
                last_ping: None,
                proportion: ContentProportion::new(1, 1, 1),
            },
            notices: vec![Notice {
                id: 1,
                name: "Pool closed".to_string(),
                condominium_ids: vec![3],
                manager_ids: vec![],
                advertiser_name: None,
                advertiser_number: None,
                status: ContentStatus::Active,
                expires_at: None,
                media_url: None,
                message: None,
            }],
        }
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found() {
        let service = TvContentService::new(store(), FailingNews);
        let err = service.content_for_tv("00000").await.unwrap_err();
        assert!(matches!(err, CondoTvError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_news_failure_degrades_to_empty() {
        let service = TvContentService::new(store(), FailingNews);
        let content = service.content_for_tv("55555").await.unwrap();

        assert_eq!(content.playlist.stats().news, 0);
        assert_eq!(content.playlist.len(), 30);
        assert_eq!(content.config.description, "1 aviso(s) : 1 anúncio(s) : 1 notícia(s)");

        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["tv"]["connection_code"], "55555");
        assert_eq!(json["config"]["notice_ratio"], 1);
        assert_eq!(json["stats"]["total_items"], 30);
        assert_eq!(json["content"][0]["type"], "aviso");
    }
}

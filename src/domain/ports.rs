use crate::domain::model::{Ad, Id, NewsArticle, Notice, Tv, TvStatus};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Read side used when assembling TV content.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn tv_by_connection_code(&self, code: &str) -> Result<Option<Tv>>;

    /// Active notices whose condominium list contains `condominium_id`, in id order.
    async fn active_notices_for_condo(&self, condominium_id: Id) -> Result<Vec<Notice>>;

    /// Active ads whose condominium list contains `condominium_id`, in id order.
    async fn active_ads_for_condo(&self, condominium_id: Id) -> Result<Vec<Ad>>;
}

/// Scans and updates needed by the heartbeat and expiration checks.
#[async_trait]
pub trait MonitorStore: Send + Sync {
    async fn tvs_with_status(&self, status: TvStatus) -> Result<Vec<Tv>>;
    async fn set_tv_status(
        &self,
        tv_id: Id,
        status: TvStatus,
        last_ping: Option<DateTime<Utc>>,
    ) -> Result<()>;
    async fn tv_by_connection_code(&self, code: &str) -> Result<Option<Tv>>;

    async fn active_notices(&self) -> Result<Vec<Notice>>;
    async fn active_ads(&self) -> Result<Vec<Ad>>;
    async fn deactivate_notice(&self, notice_id: Id) -> Result<()>;
    async fn deactivate_ad(&self, ad_id: Id) -> Result<()>;
}

#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Up to `limit` recent articles. May return fewer, or fail; callers decide how to degrade.
    async fn latest(&self, limit: usize) -> Result<Vec<NewsArticle>>;
}

use crate::domain::model::{Tv, TvStatus};
use crate::domain::ports::MonitorStore;
use crate::utils::error::{CondoTvError, Result};
use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_OFFLINE_AFTER_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpirationReport {
    pub notices_deactivated: usize,
    pub ads_deactivated: usize,
}

impl ExpirationReport {
    pub fn total(&self) -> usize {
        self.notices_deactivated + self.ads_deactivated
    }
}

/// Heartbeat and expiration checks. Callers decide when to run them.
pub struct ContentMonitor<S: MonitorStore> {
    store: S,
    offline_after: Duration,
}

impl<S: MonitorStore> ContentMonitor<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            offline_after: Duration::minutes(DEFAULT_OFFLINE_AFTER_MINUTES),
        }
    }

    pub fn with_offline_after(mut self, offline_after: Duration) -> Self {
        self.offline_after = offline_after;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn record_heartbeat(&self, connection_code: &str, now: DateTime<Utc>) -> Result<Tv> {
        let mut tv = self
            .store
            .tv_by_connection_code(connection_code)
            .await?
            .ok_or_else(|| CondoTvError::not_found("TV", connection_code))?;

        self.store
            .set_tv_status(tv.id, TvStatus::Online, Some(now))
            .await?;
        tv.status = TvStatus::Online;
        tv.last_ping = Some(now);

        tracing::debug!("💓 Heartbeat from TV '{}' ({})", tv.name, tv.connection_code);
        Ok(tv)
    }

    /// Marks online TVs without a recent ping as offline. TVs that never pinged are left alone.
    pub async fn check_offline_tvs(&self, now: DateTime<Utc>) -> Result<usize> {
        let threshold = now - self.offline_after;
        let mut changed = 0;

        for tv in self.store.tvs_with_status(TvStatus::Online).await? {
            if !tv.is_stale(threshold) {
                continue;
            }

            self.store
                .set_tv_status(tv.id, TvStatus::Offline, tv.last_ping)
                .await?;
            changed += 1;

            let silent_minutes = tv
                .last_ping
                .map(|ping| (now - ping).num_seconds() as f64 / 60.0)
                .unwrap_or_default();
            tracing::warn!(
                "📺 TV '{}' (code: {}) marked offline, no ping for {:.1} minutes",
                tv.name,
                tv.connection_code,
                silent_minutes
            );
        }

        if changed > 0 {
            tracing::info!("✅ {} TV(s) marked offline", changed);
        } else {
            tracing::info!("✅ All online TVs are responding");
        }
        Ok(changed)
    }

    pub async fn check_expired_content(&self, now: DateTime<Utc>) -> Result<ExpirationReport> {
        let mut report = ExpirationReport::default();

        for notice in self.store.active_notices().await? {
            if notice.is_expired(now) {
                self.store.deactivate_notice(notice.id).await?;
                report.notices_deactivated += 1;
                tracing::info!("📋 Notice {} ('{}') expired and deactivated", notice.id, notice.name);
            }
        }

        for ad in self.store.active_ads().await? {
            if ad.is_expired(now) {
                self.store.deactivate_ad(ad.id).await?;
                report.ads_deactivated += 1;
                tracing::info!("📢 Ad {} ('{}') expired and deactivated", ad.id, ad.name);
            }
        }

        tracing::info!(
            "✅ Expiration check done: {} notices and {} ads deactivated",
            report.notices_deactivated,
            report.ads_deactivated
        );
        Ok(report)
    }
}

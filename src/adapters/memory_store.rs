use crate::domain::model::{
    Ad, Condominium, ContentProportion, ContentStatus, Id, Notice, ProportionUpdate, Tv, TvStatus,
    User,
};
use crate::domain::ports::{ContentStore, MonitorStore};
use crate::utils::error::{CondoTvError, Result};
use crate::utils::validation::validate_range;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

const CODE_ATTEMPTS: usize = 100;

/// Everything the store holds, in the shape of the JSON snapshot file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub condominiums: Vec<Condominium>,
    #[serde(default)]
    pub tvs: Vec<Tv>,
    #[serde(default)]
    pub notices: Vec<Notice>,
    #[serde(default)]
    pub ads: Vec<Ad>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreSnapshot>>,
}

impl InMemoryStore {
    pub fn new(snapshot: StoreSnapshot) -> Self {
        Self {
            state: Arc::new(RwLock::new(snapshot)),
        }
    }

    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        let snapshot: StoreSnapshot = serde_json::from_str(&content)?;
        tracing::debug!(
            "Loaded snapshot: {} condominiums, {} TVs, {} notices, {} ads",
            snapshot.condominiums.len(),
            snapshot.tvs.len(),
            snapshot.notices.len(),
            snapshot.ads.len()
        );
        Ok(Self::new(snapshot))
    }

    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = {
            let state = self.state.read().await;
            serde_json::to_string_pretty(&*state)?
        };
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.read().await.clone()
    }

    /// Creates an offline TV with a fresh five-digit connection code.
    pub async fn register_tv(
        &self,
        name: &str,
        condominium_id: Id,
        template: Option<String>,
    ) -> Result<Tv> {
        let mut state = self.state.write().await;
        if !state.condominiums.iter().any(|c| c.id == condominium_id) {
            return Err(CondoTvError::not_found("Condominium", condominium_id));
        }

        let taken: HashSet<&str> = state
            .tvs
            .iter()
            .map(|tv| tv.connection_code.as_str())
            .collect();
        let mut rng = rand::rng();
        let connection_code = (0..CODE_ATTEMPTS)
            .map(|_| rng.random_range(10000..=99999).to_string())
            .find(|code| !taken.contains(code.as_str()))
            .ok_or_else(|| CondoTvError::ValidationError {
                message: "Could not allocate a free connection code".to_string(),
            })?;

        let tv = Tv {
            id: state.tvs.iter().map(|tv| tv.id).max().unwrap_or(0) + 1,
            name: name.to_string(),
            condominium_id,
            connection_code,
            status: TvStatus::Offline,
            template,
            last_ping: None,
            proportion: ContentProportion::default(),
        };
        state.tvs.push(tv.clone());

        tracing::info!("📺 Registered TV '{}' with code {}", tv.name, tv.connection_code);
        Ok(tv)
    }

    pub async fn update_tv_proportion(&self, tv_id: Id, update: ProportionUpdate) -> Result<Tv> {
        let mut state = self.state.write().await;
        let tv = state
            .tvs
            .iter_mut()
            .find(|tv| tv.id == tv_id)
            .ok_or_else(|| CondoTvError::not_found("TV", tv_id))?;
        update.apply_to(&mut tv.proportion);
        Ok(tv.clone())
    }

    /// Stores a notice under a new id, enforcing each responsible manager's notice limit.
    pub async fn add_notice(&self, mut notice: Notice) -> Result<Notice> {
        let mut state = self.state.write().await;

        let mut managers = Vec::new();
        for condominium_id in &notice.condominium_ids {
            let condominium = state
                .condominiums
                .iter()
                .find(|c| c.id == *condominium_id)
                .ok_or_else(|| CondoTvError::not_found("Condominium", condominium_id))?;
            if !managers.contains(&condominium.manager_id) {
                managers.push(condominium.manager_id);
            }
        }

        for manager_id in managers {
            let Some(manager) = state.users.iter().find(|u| u.id == manager_id) else {
                continue;
            };
            let managed: HashSet<Id> = state
                .condominiums
                .iter()
                .filter(|c| c.manager_id == manager_id)
                .map(|c| c.id)
                .collect();
            let current = state
                .notices
                .iter()
                .filter(|n| n.condominium_ids.iter().any(|id| managed.contains(id)))
                .count();

            if current >= manager.notice_limit {
                return Err(CondoTvError::QuotaExceeded {
                    manager: manager.name.clone(),
                    limit: manager.notice_limit,
                    current,
                });
            }
        }

        notice.id = state.notices.iter().map(|n| n.id).max().unwrap_or(0) + 1;
        state.notices.push(notice.clone());
        Ok(notice)
    }

    pub async fn add_ad(&self, mut ad: Ad) -> Result<Ad> {
        validate_range("display_seconds", ad.display_seconds, 1, 300).map_err(|e| {
            CondoTvError::ValidationError {
                message: e.to_string(),
            }
        })?;

        let mut state = self.state.write().await;
        ad.id = state.ads.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        state.ads.push(ad.clone());
        Ok(ad)
    }
}

#[async_trait]
impl ContentStore for InMemoryStore {
    async fn tv_by_connection_code(&self, code: &str) -> Result<Option<Tv>> {
        let state = self.state.read().await;
        Ok(state
            .tvs
            .iter()
            .find(|tv| tv.connection_code == code)
            .cloned())
    }

    async fn active_notices_for_condo(&self, condominium_id: Id) -> Result<Vec<Notice>> {
        let state = self.state.read().await;
        let mut notices: Vec<Notice> = state
            .notices
            .iter()
            .filter(|n| n.is_active() && n.targets(condominium_id))
            .cloned()
            .collect();
        notices.sort_by_key(|n| n.id);
        Ok(notices)
    }

    async fn active_ads_for_condo(&self, condominium_id: Id) -> Result<Vec<Ad>> {
        let state = self.state.read().await;
        let mut ads: Vec<Ad> = state
            .ads
            .iter()
            .filter(|a| a.is_active() && a.targets(condominium_id))
            .cloned()
            .collect();
        ads.sort_by_key(|a| a.id);
        Ok(ads)
    }
}

#[async_trait]
impl MonitorStore for InMemoryStore {
    async fn tvs_with_status(&self, status: TvStatus) -> Result<Vec<Tv>> {
        let state = self.state.read().await;
        Ok(state
            .tvs
            .iter()
            .filter(|tv| tv.status == status)
            .cloned()
            .collect())
    }

    async fn set_tv_status(
        &self,
        tv_id: Id,
        status: TvStatus,
        last_ping: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let tv = state
            .tvs
            .iter_mut()
            .find(|tv| tv.id == tv_id)
            .ok_or_else(|| CondoTvError::not_found("TV", tv_id))?;
        tv.status = status;
        tv.last_ping = last_ping;
        Ok(())
    }

    async fn tv_by_connection_code(&self, code: &str) -> Result<Option<Tv>> {
        ContentStore::tv_by_connection_code(self, code).await
    }

    async fn active_notices(&self) -> Result<Vec<Notice>> {
        let state = self.state.read().await;
        Ok(state
            .notices
            .iter()
            .filter(|n| n.is_active())
            .cloned()
            .collect())
    }

    async fn active_ads(&self) -> Result<Vec<Ad>> {
        let state = self.state.read().await;
        Ok(state.ads.iter().filter(|a| a.is_active()).cloned().collect())
    }

    async fn deactivate_notice(&self, notice_id: Id) -> Result<()> {
        let mut state = self.state.write().await;
        let notice = state
            .notices
            .iter_mut()
            .find(|n| n.id == notice_id)
            .ok_or_else(|| CondoTvError::not_found("Notice", notice_id))?;
        notice.status = ContentStatus::Inactive;
        Ok(())
    }

    async fn deactivate_ad(&self, ad_id: Id) -> Result<()> {
        let mut state = self.state.write().await;
        let ad = state
            .ads
            .iter_mut()
            .find(|a| a.id == ad_id)
            .ok_or_else(|| CondoTvError::not_found("Ad", ad_id))?;
        ad.status = ContentStatus::Inactive;
        Ok(())
    }
}

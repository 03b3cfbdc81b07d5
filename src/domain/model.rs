use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub type Id = i64;

pub const DEFAULT_NOTICE_LIMIT: usize = 10;
pub const DEFAULT_DISPLAY_SECONDS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserKind {
    #[serde(rename = "ADM")]
    Admin,
    #[serde(rename = "SINDICO")]
    Manager,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub kind: UserKind,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_notice_limit")]
    pub notice_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condominium {
    pub id: Id,
    pub name: String,
    pub manager_id: Id,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TvStatus {
    Online,
    Offline,
}

/// How many items of each kind a TV shows per display cycle.
///
/// Defaults to 1 notice : 5 ads : 3 news, which is what new TVs are created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentProportion {
    pub notice_ratio: u32,
    pub ad_ratio: u32,
    pub news_ratio: u32,
}

impl ContentProportion {
    pub fn new(notice_ratio: u32, ad_ratio: u32, news_ratio: u32) -> Self {
        Self {
            notice_ratio,
            ad_ratio,
            news_ratio,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.notice_ratio == 0 && self.ad_ratio == 0 && self.news_ratio == 0
    }

    pub fn ratio_of(&self, kind: ContentKind) -> u32 {
        match kind {
            ContentKind::Notice => self.notice_ratio,
            ContentKind::Ad => self.ad_ratio,
            ContentKind::News => self.news_ratio,
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "{} aviso(s) : {} anúncio(s) : {} notícia(s)",
            self.notice_ratio, self.ad_ratio, self.news_ratio
        )
    }
}

impl Default for ContentProportion {
    fn default() -> Self {
        Self::new(1, 5, 3)
    }
}

/// Partial proportion update; `None` leaves the current ratio untouched.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProportionUpdate {
    pub notice_ratio: Option<u32>,
    pub ad_ratio: Option<u32>,
    pub news_ratio: Option<u32>,
}

impl ProportionUpdate {
    pub fn apply_to(&self, proportion: &mut ContentProportion) {
        if let Some(ratio) = self.notice_ratio {
            proportion.notice_ratio = ratio;
        }
        if let Some(ratio) = self.ad_ratio {
            proportion.ad_ratio = ratio;
        }
        if let Some(ratio) = self.news_ratio {
            proportion.news_ratio = ratio;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tv {
    pub id: Id,
    pub name: String,
    pub condominium_id: Id,
    pub connection_code: String,
    pub status: TvStatus,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub last_ping: Option<DateTime<Utc>>,
    #[serde(default)]
    pub proportion: ContentProportion,
}

impl Tv {
    pub fn config(&self) -> TvConfig {
        TvConfig {
            tv_id: self.id,
            condominium_id: self.condominium_id,
            proportion: self.proportion,
        }
    }

    /// True when the TV is online but has not pinged since `threshold`.
    pub fn is_stale(&self, threshold: DateTime<Utc>) -> bool {
        self.status == TvStatus::Online && self.last_ping.is_some_and(|ping| ping < threshold)
    }
}

/// Read-only view of the settings the playlist builder needs from a TV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TvConfig {
    pub tv_id: Id,
    pub condominium_id: Id,
    pub proportion: ContentProportion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum ContentStatus {
    #[serde(rename = "Ativo")]
    Active,
    #[serde(rename = "Inativo")]
    Inactive,
}

impl TryFrom<String> for ContentStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "ativo" | "active" => Ok(Self::Active),
            "inativo" | "inactive" => Ok(Self::Inactive),
            other => Err(format!("unknown content status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub id: Id,
    pub name: String,
    #[serde(deserialize_with = "deserialize_id_list")]
    pub condominium_ids: Vec<Id>,
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub manager_ids: Vec<Id>,
    #[serde(default)]
    pub advertiser_name: Option<String>,
    #[serde(default)]
    pub advertiser_number: Option<String>,
    pub status: ContentStatus,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Notice {
    pub fn is_active(&self) -> bool {
        self.status == ContentStatus::Active
    }

    pub fn targets(&self, condominium_id: Id) -> bool {
        self.condominium_ids.contains(&condominium_id)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ad {
    pub id: Id,
    pub name: String,
    #[serde(deserialize_with = "deserialize_id_list")]
    pub condominium_ids: Vec<Id>,
    #[serde(default)]
    pub advertiser_name: Option<String>,
    #[serde(default)]
    pub advertiser_number: Option<String>,
    pub status: ContentStatus,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub media_url: Option<String>,
    /// Seconds the ad stays on screen.
    #[serde(default = "default_display_seconds")]
    pub display_seconds: u32,
}

impl Ad {
    pub fn is_active(&self) -> bool {
        self.status == ContentStatus::Active
    }

    pub fn targets(&self, condominium_id: Id) -> bool {
        self.condominium_ids.contains(&condominium_id)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub published_at: String,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Notice,
    Ad,
    News,
}

/// One playlist entry, tagged the way TV clients expect (`{"type": "aviso", "data": {...}}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ContentItem {
    #[serde(rename = "aviso")]
    Notice(Notice),
    #[serde(rename = "anuncio")]
    Ad(Ad),
    #[serde(rename = "noticia")]
    News(NewsArticle),
}

impl ContentItem {
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Notice(_) => ContentKind::Notice,
            Self::Ad(_) => ContentKind::Ad,
            Self::News(_) => ContentKind::News,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlaylistStats {
    pub total_items: usize,
    #[serde(rename = "avisos")]
    pub notices: usize,
    #[serde(rename = "anuncios")]
    pub ads: usize,
    #[serde(rename = "noticias")]
    pub news: usize,
}

/// Ordered display sequence for one TV. Built per request and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Playlist {
    #[serde(rename = "content")]
    items: Vec<ContentItem>,
    stats: PlaylistStats,
}

impl Playlist {
    pub fn new(items: Vec<ContentItem>) -> Self {
        let mut stats = PlaylistStats {
            total_items: items.len(),
            ..PlaylistStats::default()
        };
        for item in &items {
            match item.kind() {
                ContentKind::Notice => stats.notices += 1,
                ContentKind::Ad => stats.ads += 1,
                ContentKind::News => stats.news += 1,
            }
        }
        Self { items, stats }
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn stats(&self) -> PlaylistStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn kinds(&self) -> Vec<ContentKind> {
        self.items.iter().map(ContentItem::kind).collect()
    }
}

/// Parses the legacy "1,2,3" form; fragments that are not numbers are dropped.
pub fn parse_id_list(raw: &str) -> Vec<Id> {
    raw.split(',')
        .filter_map(|part| part.trim().parse::<Id>().ok())
        .collect()
}

fn deserialize_id_list<'de, D>(deserializer: D) -> std::result::Result<Vec<Id>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdList {
        List(Vec<Id>),
        Csv(String),
    }

    Ok(match IdList::deserialize(deserializer)? {
        IdList::List(ids) => ids,
        IdList::Csv(raw) => parse_id_list(&raw),
    })
}

fn default_notice_limit() -> usize {
    DEFAULT_NOTICE_LIMIT
}

fn default_display_seconds() -> u32 {
    DEFAULT_DISPLAY_SECONDS
}

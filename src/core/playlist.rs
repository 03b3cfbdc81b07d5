//! Interleaves notices, ads and news into a TV playlist.
//!
//! The proportion is expanded once into a cycle template (`[Notice; n] ++ [Ad; a] ++ [News; w]`)
//! which is replayed until the playlist reaches its target size. Every kind keeps a circular
//! cursor into its source slice, so small pools wrap around instead of running dry.
//!
//! Notices and ads whose pool holds a single item are never appended twice in a row by a
//! guarded pass. When a guarded pass appends nothing, a forced pass without that guard runs
//! so the playlist keeps growing; if even the forced pass appends nothing, building stops.

use crate::domain::model::{
    Ad, ContentItem, ContentKind, ContentProportion, NewsArticle, Notice, Playlist,
};

/// Minimum playlist length, so TVs with little content still rotate smoothly.
pub const DEFAULT_MIN_TARGET_SIZE: usize = 30;

const KIND_ORDER: [ContentKind; 3] = [ContentKind::Notice, ContentKind::Ad, ContentKind::News];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassMode {
    Guarded,
    Forced,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cursors {
    notice: usize,
    ad: usize,
    news: usize,
}

impl Cursors {
    fn get(&self, kind: ContentKind) -> usize {
        match kind {
            ContentKind::Notice => self.notice,
            ContentKind::Ad => self.ad,
            ContentKind::News => self.news,
        }
    }

    /// `len` must be the non-zero length of that kind's source.
    fn advance(&mut self, kind: ContentKind, len: usize) {
        let cursor = match kind {
            ContentKind::Notice => &mut self.notice,
            ContentKind::Ad => &mut self.ad,
            ContentKind::News => &mut self.news,
        };
        *cursor = (*cursor + 1) % len;
    }
}

struct Sources<'a> {
    notices: &'a [Notice],
    ads: &'a [Ad],
    news: &'a [NewsArticle],
}

impl Sources<'_> {
    fn len_of(&self, kind: ContentKind) -> usize {
        match kind {
            ContentKind::Notice => self.notices.len(),
            ContentKind::Ad => self.ads.len(),
            ContentKind::News => self.news.len(),
        }
    }

    fn total(&self) -> usize {
        self.notices.len() + self.ads.len() + self.news.len()
    }

    fn item_at(&self, kind: ContentKind, index: usize) -> ContentItem {
        match kind {
            ContentKind::Notice => ContentItem::Notice(self.notices[index].clone()),
            ContentKind::Ad => ContentItem::Ad(self.ads[index].clone()),
            ContentKind::News => ContentItem::News(self.news[index].clone()),
        }
    }

    fn concatenated(&self) -> Vec<ContentItem> {
        self.notices
            .iter()
            .cloned()
            .map(ContentItem::Notice)
            .chain(self.ads.iter().cloned().map(ContentItem::Ad))
            .chain(self.news.iter().cloned().map(ContentItem::News))
            .collect()
    }
}

struct PassOutcome {
    items: Vec<ContentItem>,
    cursors: Cursors,
}

impl PassOutcome {
    fn made_progress(&self) -> bool {
        !self.items.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaylistBuilder {
    min_target_size: usize,
}

impl Default for PlaylistBuilder {
    fn default() -> Self {
        Self {
            min_target_size: DEFAULT_MIN_TARGET_SIZE,
        }
    }
}

impl PlaylistBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_target_size(min_target_size: usize) -> Self {
        Self { min_target_size }
    }

    pub fn min_target_size(&self) -> usize {
        self.min_target_size
    }

    pub fn target_size(&self, natural_count: usize) -> usize {
        natural_count.max(self.min_target_size)
    }

    pub fn build(
        &self,
        proportion: ContentProportion,
        notices: &[Notice],
        ads: &[Ad],
        news: &[NewsArticle],
    ) -> Playlist {
        let sources = Sources {
            notices,
            ads,
            news,
        };

        if sources.total() == 0 {
            tracing::debug!("No content available, returning empty playlist");
            return Playlist::default();
        }

        if proportion.is_zero() {
            tracing::debug!("Proportion is 0:0:0, concatenating {} items", sources.total());
            return Playlist::new(sources.concatenated());
        }

        let target = self.target_size(sources.total());
        let template = cycle_template(proportion, target);
        let mut cursors = Cursors::default();
        let mut items: Vec<ContentItem> = Vec::with_capacity(target);
        let mut forced_passes = 0usize;

        while items.len() < target {
            let budget = target - items.len();
            let last_kind = items.last().map(ContentItem::kind);

            let mut outcome = run_pass(
                &template,
                &sources,
                cursors,
                budget,
                last_kind,
                PassMode::Guarded,
            );
            if !outcome.made_progress() {
                outcome = run_pass(
                    &template,
                    &sources,
                    cursors,
                    budget,
                    last_kind,
                    PassMode::Forced,
                );
                if !outcome.made_progress() {
                    // every kind the template references is empty
                    break;
                }
                forced_passes += 1;
            }

            cursors = outcome.cursors;
            items.extend(outcome.items);
        }

        let playlist = Playlist::new(items);
        tracing::debug!(
            "Built playlist of {} items (target {}, {}, forced passes: {})",
            playlist.len(),
            target,
            proportion.describe(),
            forced_passes
        );
        playlist
    }
}

/// Builds a playlist with the default minimum target size.
pub fn build_playlist(
    proportion: ContentProportion,
    notices: &[Notice],
    ads: &[Ad],
    news: &[NewsArticle],
) -> Playlist {
    PlaylistBuilder::default().build(proportion, notices, ads, news)
}

/// Expands a proportion into its repeating kind pattern.
///
/// Runs longer than `max_run` are cut to `max_run`: a pass never appends more than its budget,
/// and once a run starts skipping it skips to its end, so the extra slots cannot change output.
pub fn cycle_template(proportion: ContentProportion, max_run: usize) -> Vec<ContentKind> {
    KIND_ORDER
        .iter()
        .flat_map(|&kind| {
            let run = (proportion.ratio_of(kind) as usize).min(max_run);
            std::iter::repeat(kind).take(run)
        })
        .collect()
}

fn run_pass(
    template: &[ContentKind],
    sources: &Sources<'_>,
    mut cursors: Cursors,
    budget: usize,
    mut last_kind: Option<ContentKind>,
    mode: PassMode,
) -> PassOutcome {
    let mut items = Vec::new();

    for &kind in template {
        if items.len() >= budget {
            break;
        }

        let len = sources.len_of(kind);
        if len == 0 {
            continue;
        }

        // A single-item pool of the same kind as the last entry would show the same record twice.
        let repeats_singleton = kind != ContentKind::News && len == 1 && last_kind == Some(kind);
        if mode == PassMode::Guarded && repeats_singleton {
            continue;
        }

        items.push(sources.item_at(kind, cursors.get(kind)));
        cursors.advance(kind, len);
        last_kind = Some(kind);
    }

    PassOutcome { items, cursors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ContentStatus;

    fn notice(id: i64) -> Notice {
        Notice {
            id,
            name: format!("Notice {}", id),
            condominium_ids: vec![1],
            manager_ids: vec![],
            advertiser_name: None,
            advertiser_number: None,
            status: ContentStatus::Active,
            expires_at: None,
            media_url: None,
            message: None,
        }
    }

    fn ad(id: i64) -> Ad {
        Ad {
            id,
            name: format!("Ad {}", id),
            condominium_ids: vec![1],
            advertiser_name: None,
            advertiser_number: None,
            status: ContentStatus::Active,
            expires_at: None,
            media_url: None,
            display_seconds: 10,
        }
    }

    #[test]
    fn test_cycle_template_groups_kinds_in_order() {
        let template = cycle_template(ContentProportion::new(1, 2, 1), 30);
        assert_eq!(
            template,
            vec![
                ContentKind::Notice,
                ContentKind::Ad,
                ContentKind::Ad,
                ContentKind::News
            ]
        );
        assert!(cycle_template(ContentProportion::new(0, 0, 0), 30).is_empty());
    }

    #[test]
    fn test_cycle_template_caps_runs() {
        let template = cycle_template(ContentProportion::new(u32::MAX, 1, 0), 30);
        assert_eq!(template.len(), 31);
    }

    #[test]
    fn test_guarded_pass_skips_singleton_repeat() {
        let notices = [notice(1)];
        let sources = Sources {
            notices: &notices,
            ads: &[],
            news: &[],
        };
        let template = cycle_template(ContentProportion::new(2, 0, 0), 30);

        let first = run_pass(
            &template,
            &sources,
            Cursors::default(),
            30,
            None,
            PassMode::Guarded,
        );
        assert_eq!(first.items.len(), 1);

        let second = run_pass(
            &template,
            &sources,
            first.cursors,
            29,
            Some(ContentKind::Notice),
            PassMode::Guarded,
        );
        assert!(!second.made_progress());

        let forced = run_pass(
            &template,
            &sources,
            first.cursors,
            29,
            Some(ContentKind::Notice),
            PassMode::Forced,
        );
        assert_eq!(forced.items.len(), 2);
    }

    #[test]
    fn test_pass_respects_budget_and_wraps_cursor() {
        let ads = [ad(1), ad(2)];
        let sources = Sources {
            notices: &[],
            ads: &ads,
            news: &[],
        };
        let template = cycle_template(ContentProportion::new(0, 3, 0), 30);

        let outcome = run_pass(
            &template,
            &sources,
            Cursors::default(),
            2,
            None,
            PassMode::Guarded,
        );
        assert_eq!(outcome.items.len(), 2);
        assert_eq!(outcome.cursors.get(ContentKind::Ad), 0);

        let outcome = run_pass(
            &template,
            &sources,
            Cursors::default(),
            30,
            None,
            PassMode::Guarded,
        );
        let ids: Vec<i64> = outcome
            .items
            .iter()
            .map(|item| match item {
                ContentItem::Ad(ad) => ad.id,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(ids, vec![1, 2, 1]);
        assert_eq!(outcome.cursors.get(ContentKind::Ad), 1);
    }
}

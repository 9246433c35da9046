use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{OutfitCandidate, RecommendationCriteria, WardrobeItem},
};

pub mod scoring;
pub mod slots;

use scoring::{score_outfit, PreparedCriteria};
use slots::{CombinationSpace, Slots};

/// Tunables for the recommendation engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Upper bound on combinations scored per request
    pub max_combinations: usize,
    /// Outfits returned when the caller gives no limit
    pub default_limit: usize,
    /// Largest limit a caller may ask for
    pub max_limit: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_combinations: 200,
            default_limit: 5,
            max_limit: 20,
        }
    }
}

impl EngineSettings {
    /// Resolves a requested limit against the defaults
    pub fn resolve_limit(&self, requested: Option<usize>) -> AppResult<usize> {
        match requested {
            None => Ok(self.default_limit),
            Some(0) => Err(AppError::InvalidInput(
                "limit must be at least 1".to_string(),
            )),
            Some(limit) => Ok(limit.min(self.max_limit)),
        }
    }
}

/// A scored outfit plus what the sort needs to break ties
struct Scored {
    candidate: OutfitCandidate,
    newest: (DateTime<Utc>, Uuid),
}

impl Scored {
    /// Total order: score desc, fewer items, then most recently added item
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .candidate
            .score
            .partial_cmp(&self.candidate.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                self.candidate
                    .item_ids
                    .len()
                    .cmp(&other.candidate.item_ids.len())
            })
            .then_with(|| other.newest.cmp(&self.newest))
    }

    /// Order-independent identity of the outfit
    ///
    /// Distinct combination indices always decode to distinct item sets, so
    /// this only collapses outfits when the wardrobe holds duplicate ids.
    fn signature(&self) -> Vec<Uuid> {
        let mut ids = self.candidate.item_ids.clone();
        ids.sort_unstable();
        ids
    }
}

/// Builds ranked outfit suggestions from a wardrobe snapshot
///
/// The engine is pure: it owns no state beyond its settings and performs no
/// I/O, so one instance can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct OutfitEngine {
    settings: EngineSettings,
}

impl OutfitEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Recommends up to `limit` outfits from `items`
    ///
    /// Fails with [`AppError::EmptyWardrobe`] when `items` is empty. A
    /// wardrobe that cannot produce an outfit (no top and bottom pairing, no
    /// dress with a partner item) yields `Ok` with an empty list.
    pub fn recommend(
        &self,
        items: &[WardrobeItem],
        criteria: &RecommendationCriteria,
        limit: usize,
    ) -> AppResult<Vec<OutfitCandidate>> {
        if items.is_empty() {
            return Err(AppError::EmptyWardrobe);
        }

        let slots = Slots::partition(items);
        let space = CombinationSpace::new(&slots);
        let prepared = PreparedCriteria::new(criteria);

        let outfits = space.outfits(self.settings.max_combinations);

        tracing::debug!(
            items = items.len(),
            skipped = slots.skipped,
            combinations = %space.len(),
            considered = outfits.len(),
            cap = self.settings.max_combinations,
            "Enumerated outfit combinations"
        );

        let mut scored: Vec<Scored> = outfits
            .into_iter()
            .map(|outfit| {
                let breakdown = score_outfit(&outfit, &prepared);
                let newest = outfit
                    .iter()
                    .map(|item| (item.created_at, item.id))
                    .max()
                    .unwrap_or((DateTime::<Utc>::MIN_UTC, Uuid::nil()));

                Scored {
                    candidate: OutfitCandidate {
                        item_ids: outfit.iter().map(|item| item.id).collect(),
                        score: breakdown.total(),
                        matched_criteria: breakdown.matched,
                    },
                    newest,
                }
            })
            .collect();

        scored.sort_by(Scored::rank_cmp);

        let mut seen = HashSet::new();
        let candidates: Vec<OutfitCandidate> = scored
            .into_iter()
            .filter(|s| seen.insert(s.signature()))
            .take(limit)
            .map(|s| s.candidate)
            .collect();

        tracing::info!(
            candidates = candidates.len(),
            top_score = candidates.first().map(|c| c.score),
            "Outfit recommendation completed"
        );

        Ok(candidates)
    }
}

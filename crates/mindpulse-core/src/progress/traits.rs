//! Trait XP: how often each self-reported tag has been used.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::repository::ScoreRepository;

/// Tag -> cumulative count. Never pruned.
pub type TraitXp = BTreeMap<String, u64>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitCount {
    pub tag: String,
    pub count: u64,
}

fn try_add_trait_xp<R: ScoreRepository + ?Sized>(repo: &R, tags: &BTreeSet<String>) -> Result<TraitXp> {
    let mut traits = repo.trait_xp()?;
    if tags.is_empty() {
        return Ok(traits);
    }
    for tag in tags {
        *traits.entry(tag.clone()).or_insert(0) += 1;
    }
    repo.set_trait_xp(&traits)?;
    Ok(traits)
}

/// Increment the counter of every tag on a check-in.
pub fn add_trait_xp<R: ScoreRepository + ?Sized>(repo: &R, tags: &BTreeSet<String>) -> Option<TraitXp> {
    match try_add_trait_xp(repo, tags) {
        Ok(traits) => Some(traits),
        Err(e) => {
            tracing::warn!(error = %e, "trait xp update failed");
            None
        }
    }
}

/// Tags ordered by count (highest first), ties broken by name.
pub fn ranked(traits: &TraitXp) -> Vec<TraitCount> {
    let mut ranked: Vec<TraitCount> = traits
        .iter()
        .map(|(tag, count)| TraitCount {
            tag: tag.clone(),
            count: *count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    ranked
}

/// Stored trait XP for read-only views.
pub fn current_trait_xp<R: ScoreRepository + ?Sized>(repo: &R) -> TraitXp {
    repo.trait_xp().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to read trait xp");
        TraitXp::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::StoreRepository;
    use crate::storage::MemoryStore;

    fn tags(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn counts_accumulate() {
        let repo = StoreRepository::new(MemoryStore::new());
        add_trait_xp(&repo, &tags(&["calm", "focused"])).unwrap();
        add_trait_xp(&repo, &tags(&["calm"])).unwrap();
        let traits = add_trait_xp(&repo, &tags(&[])).unwrap();

        assert_eq!(traits.get("calm"), Some(&2));
        assert_eq!(traits.get("focused"), Some(&1));
    }

    #[test]
    fn ranking_breaks_ties_by_name() {
        let traits: TraitXp = [("tired", 3), ("anxious", 1), ("calm", 3)]
            .into_iter()
            .map(|(t, c)| (t.to_string(), c))
            .collect();
        let order: Vec<_> = ranked(&traits).into_iter().map(|t| t.tag).collect();
        assert_eq!(order, vec!["calm", "tired", "anxious"]);
    }
}

//! Frequency ranking of occurrence names.
//!
//! Turns the raw `name` of every occurrence record into a deduplicated list
//! of canonical `Genus species` names ordered by how often they were
//! observed. Subspecies (three-word names) are folded into their parent
//! species. Ranking runs in two passes: raw names are counted and ranked
//! first, then each ranked entry is shortened to its canonical form and the
//! counts are merged and ranked again.
//!
//! Ties are always broken by first-seen order, so the output is fully
//! determined by the input sequence.

use std::collections::BTreeMap;

use species_map_occurrence_models::OccurrenceRecord;

/// Reduces a raw occurrence name to its canonical two-word form.
///
/// Two-word names pass through unchanged; three-word (subspecies) names
/// keep their first two words. Any other word count returns `None`.
///
/// Single-word names (a bare genus) are dropped here. That matches the
/// behavior of the service this replaced and is kept until someone decides
/// genus-only records should be ranked.
#[must_use]
pub fn canonical_name(name: &str) -> Option<String> {
    let words: Vec<&str> = name.split_whitespace().collect();
    match words.len() {
        2 => Some(name.to_owned()),
        3 => Some(words[..2].join(" ")),
        _ => None,
    }
}

/// Sums counts per name, preserving the order in which names first appear.
fn tally(entries: impl IntoIterator<Item = (String, u64)>) -> Vec<(String, u64)> {
    let mut positions: BTreeMap<String, usize> = BTreeMap::new();
    let mut counts: Vec<(String, u64)> = Vec::new();

    for (name, count) in entries {
        if let Some(&idx) = positions.get(&name) {
            counts[idx].1 += count;
        } else {
            positions.insert(name.clone(), counts.len());
            counts.push((name, count));
        }
    }

    counts
}

/// Orders by descending count. `sort_by` is stable, so equal counts keep
/// their first-seen order.
fn by_descending_count(mut counts: Vec<(String, u64)>) -> Vec<(String, u64)> {
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Ranks canonical species names and returns them with their merged
/// occurrence counts, most frequent first.
#[must_use]
pub fn rank_species_with_counts(records: &[OccurrenceRecord]) -> Vec<(String, u64)> {
    let raw = by_descending_count(tally(records.iter().map(|r| (r.name.clone(), 1))));

    let canonical = raw.into_iter().filter_map(|(name, count)| {
        let canonical = canonical_name(&name);
        if canonical.is_none() {
            log::trace!("Dropping malformed occurrence name {name:?} ({count} records)");
        }
        canonical.map(|c| (c, count))
    });

    by_descending_count(tally(canonical))
}

/// Ranks canonical species names, most frequently observed first.
#[must_use]
pub fn rank_species(records: &[OccurrenceRecord]) -> Vec<String> {
    rank_species_with_counts(records)
        .into_iter()
        .map(|(name, _)| name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(names: &[&str]) -> Vec<OccurrenceRecord> {
        names.iter().copied().map(OccurrenceRecord::named).collect()
    }

    #[test]
    fn canonical_name_handles_word_counts() {
        assert_eq!(canonical_name("Corvus corax").as_deref(), Some("Corvus corax"));
        assert_eq!(
            canonical_name("Corvus corax principalis").as_deref(),
            Some("Corvus corax")
        );
        assert_eq!(canonical_name("Corvus"), None);
        assert_eq!(canonical_name(""), None);
        assert_eq!(canonical_name("Junco hyemalis oreganus thurberi"), None);
    }

    #[test]
    fn ranks_by_descending_frequency() {
        let ranked = rank_species(&records(&[
            "Junco hyemalis",
            "Sitta carolinensis",
            "Sitta carolinensis",
            "Poecile gambeli",
            "Sitta carolinensis",
            "Poecile gambeli",
        ]));
        assert_eq!(
            ranked,
            vec!["Sitta carolinensis", "Poecile gambeli", "Junco hyemalis"]
        );
    }

    #[test]
    fn collapses_subspecies_into_species() {
        let ranked = rank_species_with_counts(&records(&[
            "Corvus corax",
            "Corvus corax principalis",
            "Corvus corax principalis",
            "Corvus corax",
        ]));
        assert_eq!(ranked, vec![("Corvus corax".to_owned(), 4)]);
    }

    #[test]
    fn merged_subspecies_counts_decide_rank() {
        let ranked = rank_species(&records(&[
            "Junco hyemalis",
            "Junco hyemalis",
            "Junco hyemalis",
            "Sitta carolinensis",
            "Sitta carolinensis aculeata",
            "Sitta carolinensis nelsoni",
            "Sitta carolinensis",
        ]));
        assert_eq!(ranked, vec!["Sitta carolinensis", "Junco hyemalis"]);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let ranked = rank_species(&records(&[
            "Sialia mexicana",
            "Junco hyemalis",
            "Junco hyemalis",
            "Sialia mexicana",
            "Aphelocoma californica",
        ]));
        assert_eq!(
            ranked,
            vec!["Sialia mexicana", "Junco hyemalis", "Aphelocoma californica"]
        );
    }

    #[test]
    fn merged_ties_follow_first_pass_order() {
        // First pass: "Corvus corax" (2), "Junco hyemalis oreganus" (1),
        // "Junco hyemalis" (1). After collapsing, both species have 2 and
        // "Corvus corax" was seen first in the ranked first pass.
        let ranked = rank_species_with_counts(&records(&[
            "Junco hyemalis oreganus",
            "Corvus corax",
            "Corvus corax",
            "Junco hyemalis",
        ]));
        assert_eq!(
            ranked,
            vec![
                ("Corvus corax".to_owned(), 2),
                ("Junco hyemalis".to_owned(), 2)
            ]
        );
    }

    #[test]
    fn single_word_names_are_dropped() {
        assert!(rank_species(&records(&["Corvus"])).is_empty());
        assert_eq!(
            rank_species(&records(&["Corvus", "Corvus", "Corvus corax"])),
            vec!["Corvus corax"]
        );
    }

    #[test]
    fn ranking_is_deterministic() {
        let input = records(&[
            "Gymnogyps californianus",
            "Aphelocoma californica",
            "Gymnogyps californianus",
            "Aphelocoma californica woodhouseii",
            "Poecile gambeli",
        ]);
        let first = rank_species(&input);
        for _ in 0..10 {
            assert_eq!(rank_species(&input), first);
        }
    }

    #[test]
    fn empty_input_ranks_nothing() {
        assert!(rank_species(&[]).is_empty());
    }
}

use std::collections::BTreeSet;

use crate::config::ScoringConfig;
use crate::model::NameSignal;

/// A counterparty name reduced to its distinguishing tokens: lowercase,
/// whitespace-split, trailing punctuation stripped, legal-entity suffixes
/// and the reconciling company's own tokens removed. Order-insensitive.
///
/// An empty set means the name is absent for scoring purposes, never
/// "equal to another empty name".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName(BTreeSet<String>);

impl NormalizedName {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tokens(&self) -> &BTreeSet<String> {
        &self.0
    }
}

/// Tokenize one name per the normalization rules.
pub fn normalize_name(name: &str, config: &ScoringConfig) -> NormalizedName {
    let self_tokens = config
        .self_name
        .as_deref()
        .map(|own| raw_tokens(own, config))
        .unwrap_or_default();

    let tokens = raw_tokens(name, config)
        .into_iter()
        .filter(|t| !self_tokens.contains(t))
        .collect();

    NormalizedName(tokens)
}

fn raw_tokens(name: &str, config: &ScoringConfig) -> BTreeSet<String> {
    name.to_lowercase()
        .split_whitespace()
        .map(|t| t.trim_end_matches(['.', ',', ';', ':']).to_string())
        .filter(|t| !t.is_empty())
        .filter(|t| !config.suffixes.iter().any(|s| s == t))
        .collect()
}

/// Token-set overlap in [0, 1]: |A ∩ B| / |A ∪ B|. Symmetric; identical
/// sets score 1.0, disjoint sets 0.0. `None` when either set is empty.
///
/// Token overlap is used instead of character edit distance on purpose:
/// orthographically close but distinct entities (two different surnames)
/// must not be conflated, while suffix/case/order variation still matches.
pub fn similarity(a: &NormalizedName, b: &NormalizedName) -> Option<f64> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    if a == b {
        return Some(1.0);
    }
    let intersection = a.0.intersection(&b.0).count();
    let union = a.0.union(&b.0).count();
    Some(intersection as f64 / union as f64)
}

/// Classify the name axis for a candidate pair. The carried value is the
/// weighted contribution; anything under `name_floor` is a hard reject.
pub fn score_names(a: Option<&str>, b: Option<&str>, config: &ScoringConfig) -> NameSignal {
    let (Some(a), Some(b)) = (a, b) else {
        return NameSignal::Absent;
    };

    let left = normalize_name(a, config);
    let right = normalize_name(b, config);

    let Some(overlap) = similarity(&left, &right) else {
        return NameSignal::Absent;
    };

    let weights = &config.weights;
    let contribution = if overlap >= 0.8 {
        weights.name_exact
    } else if overlap >= 0.6 {
        weights.name_good
    } else if overlap >= 0.4 {
        weights.name_fair
    } else {
        0.0
    };

    if contribution < config.name_floor {
        NameSignal::TooWeak(contribution)
    } else {
        NameSignal::Score(contribution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ScoringConfig {
        ScoringConfig {
            self_name: Some("Example Company Oy".into()),
            ..ScoringConfig::default()
        }
    }

    fn tokens(name: &str) -> Vec<String> {
        normalize_name(name, &config())
            .tokens()
            .iter()
            .cloned()
            .collect()
    }

    #[test]
    fn lowercases_and_splits() {
        assert_eq!(tokens("Matti Meikäläinen"), vec!["matti", "meikäläinen"]);
    }

    #[test]
    fn strips_suffixes_and_punctuation() {
        assert_eq!(tokens("Acme Oy"), vec!["acme"]);
        assert_eq!(tokens("Acme Ltd."), vec!["acme"]);
        assert_eq!(tokens("Meikäläinen Tmi,"), vec!["meikäläinen"]);
    }

    #[test]
    fn self_identity_is_filtered_out() {
        assert!(normalize_name("Example Company Oy", &config()).is_empty());
        assert!(normalize_name("  EXAMPLE company OY ", &config()).is_empty());
    }

    #[test]
    fn empty_sets_are_absent_not_equal() {
        let a = normalize_name("Oy", &config());
        let b = normalize_name("Ltd", &config());
        assert!(a.is_empty() && b.is_empty());
        assert_eq!(similarity(&a, &b), None);
    }

    #[test]
    fn identical_sets_score_one() {
        let a = normalize_name("Matti Meikäläinen", &config());
        let b = normalize_name("Meikäläinen Matti Tmi", &config());
        assert_eq!(similarity(&a, &b), Some(1.0));
    }

    #[test]
    fn disjoint_sets_score_zero() {
        let a = normalize_name("Pohjolan Sähkö", &config());
        let b = normalize_name("Acme Tools", &config());
        assert_eq!(similarity(&a, &b), Some(0.0));
    }

    #[test]
    fn word_order_is_irrelevant() {
        let signal = score_names(Some("Meikäläinen Matti"), Some("Matti Meikäläinen"), &config());
        assert_eq!(signal, NameSignal::Score(config().weights.name_exact));
    }

    #[test]
    fn suffix_variation_still_exact() {
        let signal = score_names(
            Some("Matti Meikäläinen"),
            Some("Matti Meikäläinen Tmi"),
            &config(),
        );
        assert_eq!(signal, NameSignal::Score(config().weights.name_exact));
    }

    #[test]
    fn partial_overlap_maps_to_tiers() {
        // {acme, trading, house} vs {acme, trading, group}: 2/4 = 0.5 → fair
        let weak = score_names(Some("Acme Trading House"), Some("Acme Trading Group"), &config());
        assert_eq!(weak, NameSignal::Score(config().weights.name_fair));

        // {acme, trading} vs {acme, trading, house}: 2/3 ≈ 0.67 → good
        let good = score_names(Some("Acme Trading"), Some("Acme Trading House"), &config());
        assert_eq!(good, NameSignal::Score(config().weights.name_good));
    }

    #[test]
    fn near_surnames_are_rejected_not_conflated() {
        // {matti, meikäläinen} vs {matti, meittiläinen}: 1/3 < 0.4 → hard reject
        let signal = score_names(
            Some("Matti Meikäläinen"),
            Some("Matti Meittiläinen"),
            &config(),
        );
        assert_eq!(signal, NameSignal::TooWeak(0.0));
    }

    #[test]
    fn orthographically_close_first_names_rejected() {
        let signal = score_names(Some("Jon Snow"), Some("John Snow"), &config());
        assert_eq!(signal, NameSignal::TooWeak(0.0));
    }

    #[test]
    fn missing_side_is_absent() {
        assert_eq!(score_names(None, Some("Acme"), &config()), NameSignal::Absent);
        assert_eq!(score_names(Some("Acme"), None, &config()), NameSignal::Absent);
    }

    #[test]
    fn fully_filtered_side_is_absent() {
        let signal = score_names(Some("Example Company Oy"), Some("Acme"), &config());
        assert_eq!(signal, NameSignal::Absent);
    }
}

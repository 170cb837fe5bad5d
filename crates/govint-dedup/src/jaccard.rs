//! Jaccard similarity over normalized token sets (§4.7's fuzzy-text
//! rule), the same "pure function over two comparable inputs" shape as
//! cosine similarity over embeddings.

use std::collections::BTreeSet;

pub fn jaccard_similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sets_are_fully_similar() {
        let a: BTreeSet<String> = ["fuel", "prices", "rise"].iter().map(|s| s.to_string()).collect();
        assert_eq!(jaccard_similarity(&a, &a), 1.0);
    }

    #[test]
    fn disjoint_sets_have_zero_similarity() {
        let a: BTreeSet<String> = ["fuel", "prices"].iter().map(|s| s.to_string()).collect();
        let b: BTreeSet<String> = ["school", "fees"].iter().map(|s| s.to_string()).collect();
        assert_eq!(jaccard_similarity(&a, &b), 0.0);
    }

    #[test]
    fn partial_overlap_is_between_zero_and_one() {
        let a: BTreeSet<String> = ["fuel", "prices", "rise"].iter().map(|s| s.to_string()).collect();
        let b: BTreeSet<String> = ["fuel", "prices", "fall"].iter().map(|s| s.to_string()).collect();
        let sim = jaccard_similarity(&a, &b);
        assert!(sim > 0.0 && sim < 1.0);
    }
}

//! Coverage gaps: concepts on either side that no mapping touches.

use crate::concepts::{SourceConcepts, TargetConcepts};
use crate::matcher::join_limited;
use std::collections::HashSet;
use taxomap_core::report::{Mapping, UnmappedSource, UnmappedTarget};

/// Unmapped source and target concepts, each in IRI order.
pub fn identify_gaps(
    source: &SourceConcepts,
    target: &TargetConcepts,
    mappings: &[Mapping],
    max_parents: usize,
) -> (Vec<UnmappedSource>, Vec<UnmappedTarget>) {
    let mapped_source: HashSet<&str> = mappings.iter().map(|m| m.source_uri.as_str()).collect();
    let mapped_target: HashSet<&str> = mappings.iter().map(|m| m.target_uri.as_str()).collect();

    let unmapped_source = source
        .values()
        .filter(|c| !mapped_source.contains(c.uri.as_str()))
        .map(|c| UnmappedSource {
            uri: c.uri.clone(),
            label: c.primary_label().to_string(),
            all_labels: c.labels.join("; "),
            parents: join_limited(&c.parents, max_parents),
        })
        .collect();

    let unmapped_target = target
        .values()
        .filter(|c| !mapped_target.contains(c.uri.as_str()))
        .map(|c| UnmappedTarget {
            uri: c.uri.clone(),
            label: c.primary_label().to_string(),
            all_labels: c.labels.join("; "),
        })
        .collect();

    (unmapped_source, unmapped_target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concepts::{SourceConcept, TargetConcept};
    use std::collections::BTreeMap;

    #[test]
    fn test_gaps_both_directions() {
        let source: SourceConcepts = ["s:1", "s:2"]
            .into_iter()
            .map(|uri| {
                (
                    uri.to_string(),
                    SourceConcept {
                        uri: uri.to_string(),
                        labels: vec!["A".into(), "B".into()],
                        parents: vec!["p:1".into()],
                    },
                )
            })
            .collect();
        let target: TargetConcepts = BTreeMap::from([(
            "t:1".to_string(),
            TargetConcept {
                uri: "t:1".to_string(),
                labels: vec!["Only".into()],
                related: vec![],
                broader: vec![],
                narrower: vec![],
            },
        )]);
        let mapping = Mapping {
            source_uri: "s:1".into(),
            source_label: "A".into(),
            source_label_matched: "A".into(),
            target_uri: "t:other".into(),
            target_label: "A".into(),
            similarity_score: 0.9,
            source_parents: String::new(),
        };

        let (src_gaps, tgt_gaps) = identify_gaps(&source, &target, &[mapping], 3);
        assert_eq!(src_gaps.len(), 1);
        assert_eq!(src_gaps[0].uri, "s:2");
        assert_eq!(src_gaps[0].all_labels, "A; B");
        assert_eq!(src_gaps[0].parents, "p:1");
        assert_eq!(tgt_gaps.len(), 1);
        assert_eq!(tgt_gaps[0].label, "Only");
    }

    #[test]
    fn test_no_mappings_everything_unmapped() {
        let (s, t) = identify_gaps(&SourceConcepts::new(), &TargetConcepts::new(), &[], 3);
        assert!(s.is_empty() && t.is_empty());
    }
}

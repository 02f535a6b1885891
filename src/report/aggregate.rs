//! Normalizer / Aggregator
//!
//! Flattens per-file records into one ordered sequence. Tallies are always
//! recomputed from that sequence on demand, so they cannot drift from it.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::analyzer::extract::Strategy;
use crate::types::{InterfaceKind, InterfaceRecord, UnitExtraction};

/// One record paired with the file it came from
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub file: String,
    #[serde(flatten)]
    pub record: InterfaceRecord,
}

impl ReportEntry {
    /// Aggregation key for the entry's namespace
    pub fn namespace_label(&self) -> String {
        self.record.namespace.display_or_global()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Engine that produced the records
    pub strategy: Strategy,
    pub entries: Vec<ReportEntry>,
}

impl AnalysisReport {
    /// Merge units in the order given; records keep their in-file order
    pub fn from_units(units: Vec<UnitExtraction>, strategy: Strategy) -> Self {
        let entries = units
            .into_iter()
            .flat_map(|extraction| {
                let file = extraction.unit.path;
                extraction.records.into_iter().map(move |record| ReportEntry {
                    file: file.clone(),
                    record,
                })
            })
            .collect();

        Self { strategy, entries }
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn counts_by_kind(&self) -> BTreeMap<InterfaceKind, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.record.kind).or_insert(0) += 1;
        }
        counts
    }

    pub fn counts_by_namespace(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.namespace_label()).or_insert(0) += 1;
        }
        counts
    }

    /// Whether public method counts are heuristic upper bounds
    pub fn counts_are_approximate(&self) -> bool {
        self.strategy.is_approximate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::extract::Strategy as Engine;
    use crate::types::{NamespacePath, SourceSpan, SourceUnit};
    use proptest::prelude::*;
    use proptest::strategy::Strategy;

    fn record(name: &str, kind: InterfaceKind, ns: &str) -> InterfaceRecord {
        InterfaceRecord::new(name, kind, NamespacePath::parse(ns), SourceSpan::new(0, 1))
    }

    fn unit(path: &str, records: Vec<InterfaceRecord>) -> UnitExtraction {
        UnitExtraction {
            unit: SourceUnit::new(path, ""),
            records,
        }
    }

    #[test]
    fn test_flatten_preserves_order() {
        let report = AnalysisReport::from_units(
            vec![
                unit(
                    "b.h",
                    vec![
                        record("Z", InterfaceKind::Class, "hal"),
                        record("A", InterfaceKind::Struct, ""),
                    ],
                ),
                unit("a.h", vec![record("M", InterfaceKind::Class, "hal::io")]),
            ],
            Engine::Heuristic,
        );

        let order: Vec<_> = report
            .entries
            .iter()
            .map(|e| (e.file.as_str(), e.record.name.as_str()))
            .collect();
        assert_eq!(order, vec![("b.h", "Z"), ("b.h", "A"), ("a.h", "M")]);
    }

    #[test]
    fn test_counts() {
        let report = AnalysisReport::from_units(
            vec![unit(
                "x.h",
                vec![
                    record("A", InterfaceKind::Class, "hal"),
                    record("B", InterfaceKind::Class, ""),
                    record("C", InterfaceKind::Struct, "hal"),
                ],
            )],
            Engine::Structural,
        );

        let kinds = report.counts_by_kind();
        assert_eq!(kinds[&InterfaceKind::Class], 2);
        assert_eq!(kinds[&InterfaceKind::Struct], 1);

        let namespaces = report.counts_by_namespace();
        assert_eq!(namespaces["hal"], 2);
        assert_eq!(namespaces["global"], 1);
        assert!(!report.counts_are_approximate());
    }

    #[test]
    fn test_empty_report() {
        let report = AnalysisReport::from_units(Vec::new(), Engine::Heuristic);
        assert!(report.is_empty());
        assert!(report.counts_by_kind().is_empty());
        assert!(report.counts_are_approximate());
    }

    fn arb_record() -> impl Strategy<Value = InterfaceRecord> {
        (
            "[A-Z][a-z]{0,6}",
            prop::bool::ANY,
            prop::sample::select(vec!["", "a", "a::b", "hal"]),
        )
            .prop_map(|(name, is_class, ns)| {
                let kind = if is_class {
                    InterfaceKind::Class
                } else {
                    InterfaceKind::Struct
                };
                record(&name, kind, ns)
            })
    }

    proptest! {
        #[test]
        fn prop_tallies_sum_to_total(
            files in prop::collection::vec(prop::collection::vec(arb_record(), 0..5), 0..6)
        ) {
            let units = files
                .into_iter()
                .enumerate()
                .map(|(i, records)| unit(&format!("f{}.h", i), records))
                .collect();
            let report = AnalysisReport::from_units(units, Engine::Heuristic);

            prop_assert_eq!(report.counts_by_kind().values().sum::<usize>(), report.total());
            prop_assert_eq!(report.counts_by_namespace().values().sum::<usize>(), report.total());
        }
    }
}

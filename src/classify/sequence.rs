use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::classifier::Classification;
use super::markers::{DocumentModel, DocumentStatus};

/// Numbers and value total observed for one (model, series).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSequence {
    /// Distinct document numbers, ascending.
    pub numbers: BTreeSet<u64>,
    /// Sum of the declared totals.
    pub total: Decimal,
}

/// Contiguous-range summary of one (model, series).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub model: DocumentModel,
    /// Series without leading zeros.
    pub series: String,
    /// Lowest number seen.
    pub first: u64,
    /// Highest number seen.
    pub last: u64,
    /// Distinct numbers seen, which is less than `last - first + 1` when
    /// there are gaps.
    pub count: usize,
    /// Sum of the declared totals.
    pub total: Decimal,
}

/// A number inside a series' observed range that was never seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingNumber {
    /// Series the gap belongs to; models sharing a series are merged.
    pub series: String,
    pub number: u64,
}

/// A run of consecutive missing numbers, bounds inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingRange {
    /// Same meaning as [`MissingNumber::series`].
    pub series: String,
    pub first: u64,
    pub last: u64,
}

impl MissingRange {
    /// Numbers in the run.
    pub fn count(&self) -> u64 {
        self.last - self.first + 1
    }

    pub fn numbers(&self) -> impl Iterator<Item = MissingNumber> + '_ {
        (self.first..=self.last).map(|number| MissingNumber {
            series: self.series.clone(),
            number,
        })
    }
}

/// Numbering audit over the taxpayer's own, non-cancelled documents.
///
/// Only owned documents with [`DocumentStatus::Normal`] and a known number
/// take part; cancelled and voided numbers therefore show up as gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceAudit {
    sequences: BTreeMap<(DocumentModel, String), SeriesSequence>,
}

impl SequenceAudit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the audit from a batch of classifications.
    pub fn from_classifications<'a>(items: impl IntoIterator<Item = &'a Classification>) -> Self {
        items.into_iter().fold(Self::new(), |mut audit, c| {
            audit.record(c);
            audit
        })
    }

    /// Add one document; returns `false` when it does not qualify.
    pub fn record(&mut self, c: &Classification) -> bool {
        let Some(number) = c.number else {
            return false;
        };
        if !c.owned || c.status != DocumentStatus::Normal {
            return false;
        }
        let seq = self
            .sequences
            .entry((c.model, c.series.clone()))
            .or_default();
        seq.numbers.insert(number);
        seq.total += c.value;
        true
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Raw sequence for one (model, series).
    pub fn sequence(&self, model: DocumentModel, series: &str) -> Option<&SeriesSequence> {
        self.sequences.get(&(model, series.to_string()))
    }

    /// One summary per (model, series), ordered by model then series.
    pub fn summaries(&self) -> Vec<SeriesSummary> {
        self.sequences
            .iter()
            .filter_map(|((model, series), seq)| {
                Some(SeriesSummary {
                    model: *model,
                    series: series.clone(),
                    first: *seq.numbers.first()?,
                    last: *seq.numbers.last()?,
                    count: seq.numbers.len(),
                    total: seq.total,
                })
            })
            .collect()
    }

    /// Gaps per series as inclusive ranges, with numbers of all models
    /// sharing a series merged.
    ///
    /// Ordered by series, then first number. Size is bounded by the number
    /// of documents seen, whatever the distance between them.
    pub fn missing_ranges(&self) -> Vec<MissingRange> {
        let mut by_series: BTreeMap<&str, BTreeSet<u64>> = BTreeMap::new();
        for ((_, series), seq) in &self.sequences {
            by_series
                .entry(series.as_str())
                .or_default()
                .extend(seq.numbers.iter().copied());
        }

        let mut ranges = Vec::new();
        for (series, numbers) in by_series {
            let sorted: Vec<u64> = numbers.into_iter().collect();
            for pair in sorted.windows(2) {
                if pair[1] - pair[0] > 1 {
                    ranges.push(MissingRange {
                        series: series.to_string(),
                        first: pair[0] + 1,
                        last: pair[1] - 1,
                    });
                }
            }
        }
        ranges
    }

    /// Every missing number, one entry each, in [`missing_ranges`] order.
    ///
    /// The output grows with the width of the gaps, not with the number of
    /// documents: a single stray number such as `999999999` next to `1`
    /// expands to about a billion entries. Prefer
    /// [`missing_ranges`] for untrusted input.
    ///
    /// [`missing_ranges`]: Self::missing_ranges
    pub fn missing_numbers(&self) -> Vec<MissingNumber> {
        self.missing_ranges()
            .iter()
            .flat_map(MissingRange::numbers)
            .collect()
    }
}

//! Aggregation over the feeder subset implied by a filter selection.
//!
//! Everything here is a pure function of the repositories and the selection;
//! callers recompute from scratch whenever the selection changes.

use crate::filter::FilterSelection;
use crate::hierarchy::{eligible_section_ids, eligible_sections};
use crate::repository::{CatalogRepository, FeederRepository};
use crate::types::{
    Dtr, Feeder, Interruption, InterruptionSummary, InterruptionType, ReliabilityIndices, Section,
    SectionType, SelectionSummary,
};
use crate::util::round2;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

// MAIFI and CAIFI are not measured in the source data. They are estimated
// as fixed multiples of SAIFI and must be read as approximations.
pub const MAIFI_PER_SAIFI: f64 = 0.55;
pub const CAIFI_PER_SAIFI: f64 = 0.32;

/// How many feeders the dashboard lists as critical.
pub const CRITICAL_FEEDER_COUNT: usize = 6;

/// Feeders whose section mapping intersects the selection's leaf set, in
/// catalog order.
pub fn resolve_feeders<'a, C, F>(catalog: &C, assets: &'a F, selection: &FilterSelection) -> Vec<&'a Feeder>
where
    C: CatalogRepository + ?Sized,
    F: FeederRepository + ?Sized,
{
    let eligible = eligible_section_ids(catalog, selection);
    let included: HashSet<&str> = assets
        .feeder_sections()
        .iter()
        .filter(|m| m.section_ids.iter().any(|s| eligible.contains(s.as_str())))
        .map(|m| m.feeder_id.as_str())
        .collect();

    let feeders: Vec<&Feeder> = assets
        .feeders()
        .iter()
        .filter(|f| included.contains(f.id.as_str()))
        .collect();
    debug!(
        "resolved {} feeders from {} eligible sections ({})",
        feeders.len(),
        eligible.len(),
        selection
    );
    feeders
}

/// Consumer-weighted reliability indices.
///
/// An empty set, or one with no consumers, yields all zeros. CAIDI is zero
/// when SAIFI is zero.
pub fn compute_indices(feeders: &[&Feeder]) -> ReliabilityIndices {
    let total_consumers: u64 = feeders.iter().map(|f| f.consumers).sum();
    if feeders.is_empty() || total_consumers == 0 {
        return ReliabilityIndices::default();
    }
    let total = total_consumers as f64;
    let saidi = feeders.iter().map(|f| f.saidi * f.consumers as f64).sum::<f64>() / total;
    let saifi = feeders.iter().map(|f| f.saifi * f.consumers as f64).sum::<f64>() / total;
    let caidi = if saifi == 0.0 { 0.0 } else { saidi / saifi };

    ReliabilityIndices {
        saidi: round2(saidi),
        saifi: round2(saifi),
        caidi: round2(caidi),
        maifi: round2(saifi * MAIFI_PER_SAIFI),
        caifi: round2(saifi * CAIFI_PER_SAIFI),
    }
}

/// Interruptions dated within `[start, end]`, both ends inclusive.
///
/// Time of day is ignored. A reversed range matches nothing.
pub fn filter_interruptions_by_date_range<'a, I>(interruptions: I, start: NaiveDate, end: NaiveDate) -> Vec<&'a Interruption>
where
    I: IntoIterator<Item = &'a Interruption>,
{
    interruptions
        .into_iter()
        .filter(|i| i.date >= start && i.date <= end)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMetric {
    Saidi,
    Saifi,
    Interruptions,
    Consumers,
    Loading,
}

impl RankMetric {
    fn value(&self, f: &Feeder) -> f64 {
        match self {
            RankMetric::Saidi => f.saidi,
            RankMetric::Saifi => f.saifi,
            RankMetric::Interruptions => f.interruptions as f64,
            RankMetric::Consumers => f.consumers as f64,
            RankMetric::Loading => f.loading,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Stable sort by one metric; equal values keep their input order.
pub fn rank_feeders<'a>(feeders: &[&'a Feeder], metric: RankMetric, order: SortOrder) -> Vec<&'a Feeder> {
    let mut ranked = feeders.to_vec();
    ranked.sort_by(|a, b| {
        let (x, y) = (metric.value(a), metric.value(b));
        let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
        match order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });
    ranked
}

/// Highest-SAIDI feeders first, at most `n`.
pub fn critical_feeders<'a>(feeders: &[&'a Feeder], n: usize) -> Vec<&'a Feeder> {
    let mut ranked = rank_feeders(feeders, RankMetric::Saidi, SortOrder::Descending);
    ranked.truncate(n);
    ranked
}

pub fn dtrs_for<'a, C, F>(catalog: &C, assets: &'a F, selection: &FilterSelection) -> Vec<&'a Dtr>
where
    C: CatalogRepository + ?Sized,
    F: FeederRepository + ?Sized,
{
    let eligible = eligible_section_ids(catalog, selection);
    assets
        .dtrs()
        .iter()
        .filter(|d| eligible.contains(d.section_id.as_str()))
        .collect()
}

pub fn interruptions_for<'a, C, F>(catalog: &C, assets: &'a F, selection: &FilterSelection) -> Vec<&'a Interruption>
where
    C: CatalogRepository + ?Sized,
    F: FeederRepository + ?Sized,
{
    let eligible = eligible_section_ids(catalog, selection);
    assets
        .interruptions()
        .iter()
        .filter(|i| eligible.contains(i.section_id.as_str()))
        .collect()
}

/// Headline counts for a selection.
pub fn summarize<C, F>(catalog: &C, assets: &F, selection: &FilterSelection) -> SelectionSummary
where
    C: CatalogRepository + ?Sized,
    F: FeederRepository + ?Sized,
{
    let feeders = resolve_feeders(catalog, assets, selection);
    SelectionSummary {
        feeders: feeders.len(),
        sections: eligible_sections(catalog, selection).len(),
        dtrs: dtrs_for(catalog, assets, selection).len(),
        interruptions: interruptions_for(catalog, assets, selection).len(),
        consumers: feeders.iter().map(|f| f.consumers).sum(),
    }
}

pub fn interruption_summary(interruptions: &[&Interruption]) -> InterruptionSummary {
    let sustained = interruptions
        .iter()
        .filter(|i| i.kind == InterruptionType::Sustained)
        .count();
    InterruptionSummary {
        total: interruptions.len(),
        sustained,
        momentary: interruptions.len() - sustained,
        affected_consumers: interruptions.iter().map(|i| i.consumers).sum(),
    }
}

/// Section count and percentage share per area type; every type is listed.
pub fn area_distribution(sections: &[&Section]) -> Vec<(SectionType, usize, f64)> {
    let total = sections.len();
    SectionType::ALL
        .iter()
        .map(|t| {
            let count = sections.iter().filter(|s| s.section_type == *t).count();
            let share = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            };
            (*t, count, round2(share))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadBand {
    Normal,
    High,
    Critical,
}

impl LoadBand {
    /// Above 90% is critical, above 75% high.
    pub fn of(loading_pct: f64) -> Self {
        if loading_pct > 90.0 {
            LoadBand::Critical
        } else if loading_pct > 75.0 {
            LoadBand::High
        } else {
            LoadBand::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoadBand::Normal => "Normal",
            LoadBand::High => "High",
            LoadBand::Critical => "Critical",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;
    use chrono::Datelike;

    fn feeder(id: &str, saidi: f64, saifi: f64, consumers: u64) -> Feeder {
        Feeder {
            id: id.to_string(),
            name: id.to_string(),
            voltage: "11kV".to_string(),
            saidi,
            saifi,
            interruptions: 0,
            consumers,
            loading: 50.0,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ids<'a>(feeders: &[&'a Feeder]) -> Vec<&'a str> {
        feeders.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn test_section_selection_yields_mapped_feeders() {
        let data = sample::dataset();
        let mut sel = FilterSelection::new();
        sel.set_section("kzk-u1");
        assert_eq!(ids(&resolve_feeders(data, data, &sel)), vec!["FDR-11KV-001"]);

        sel.set_section("kzk-u2");
        assert_eq!(
            ids(&resolve_feeders(data, data, &sel)),
            vec!["FDR-11KV-001", "FDR-11KV-002"]
        );
    }

    #[test]
    fn test_unfiltered_selection_yields_full_catalog() {
        let data = sample::dataset();
        let all = resolve_feeders(data, data, &FilterSelection::new());
        assert_eq!(all.len(), data.feeders.len());
        let expected: Vec<&str> = data.feeders.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids(&all), expected);
    }

    #[test]
    fn test_resolved_feeders_are_always_catalog_members() {
        let data = sample::dataset();
        let known: HashSet<&str> = data.feeders.iter().map(|f| f.id.as_str()).collect();
        let mut selections = vec![FilterSelection::new()];
        for r in &data.regions {
            let mut s = FilterSelection::new();
            s.set_region(r.id.as_str());
            selections.push(s);
        }
        for c in &data.circles {
            let mut s = FilterSelection::new();
            s.set_circle(c.id.as_str());
            selections.push(s);
        }
        for sec in &data.sections {
            let mut s = FilterSelection::new();
            s.set_section(sec.id.as_str());
            selections.push(s);
        }
        let mut bogus = FilterSelection::new();
        bogus.set_division("atlantis");
        selections.push(bogus);

        for sel in &selections {
            for f in resolve_feeders(data, data, sel) {
                assert!(known.contains(f.id.as_str()), "{} not in catalog", f.id);
            }
        }
    }

    #[test]
    fn test_region_selection() {
        let data = sample::dataset();
        let mut sel = FilterSelection::new();
        sel.set_region("north");
        assert_eq!(
            ids(&resolve_feeders(data, data, &sel)),
            vec!["FDR-11KV-001", "FDR-11KV-002", "FDR-11KV-003", "FDR-33KV-001", "FDR-11KV-004"]
        );
    }

    #[test]
    fn test_unserved_section_yields_no_feeders() {
        let data = sample::dataset();
        let mut sel = FilterSelection::new();
        sel.set_sub_division("mnk");
        assert!(resolve_feeders(data, data, &sel).is_empty());
    }

    #[test]
    fn test_compute_indices_empty_is_zero() {
        assert_eq!(compute_indices(&[]), ReliabilityIndices::default());
    }

    #[test]
    fn test_compute_indices_zero_consumers_is_zero() {
        let a = feeder("A", 40.0, 3.0, 0);
        assert_eq!(compute_indices(&[&a]), ReliabilityIndices::default());
    }

    #[test]
    fn test_compute_indices_is_consumer_weighted() {
        let a = feeder("A", 40.0, 2.0, 100);
        let b = feeder("B", 80.0, 4.4, 300);
        let idx = compute_indices(&[&a, &b]);
        // A simple mean would give 60.
        assert_eq!(idx.saidi, 70.0);
        assert_eq!(idx.saifi, 3.8);
        assert_eq!(idx.caidi, 18.42);
        assert_eq!(idx.maifi, 2.09);
        assert_eq!(idx.caifi, 1.22);
    }

    #[test]
    fn test_caidi_guarded_when_saifi_zero() {
        let a = feeder("A", 12.0, 0.0, 500);
        let idx = compute_indices(&[&a]);
        assert_eq!(idx.saidi, 12.0);
        assert_eq!(idx.saifi, 0.0);
        assert_eq!(idx.caidi, 0.0);
        assert!(idx.caidi.is_finite());
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let data = sample::dataset();
        let hits = filter_interruptions_by_date_range(&data.interruptions, date(2024, 3, 1), date(2024, 4, 30));
        let got: Vec<&str> = hits.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(got, vec!["INT-001", "INT-002", "INT-003", "INT-004", "INT-005"]);
        assert!(hits.iter().all(|i| i.date.month() == 3 || i.date.month() == 4));
    }

    #[test]
    fn test_date_range_empty_and_reversed() {
        let data = sample::dataset();
        assert!(filter_interruptions_by_date_range(&data.interruptions, date(2023, 1, 1), date(2023, 12, 31)).is_empty());
        assert!(filter_interruptions_by_date_range(&data.interruptions, date(2024, 6, 30), date(2024, 3, 1)).is_empty());
    }

    #[test]
    fn test_rank_feeders_is_stable() {
        let a = feeder("A", 50.0, 1.0, 1);
        let b = feeder("B", 30.0, 1.0, 1);
        let c = feeder("C", 50.0, 1.0, 1);
        let d = feeder("D", 70.0, 1.0, 1);
        let input = [&a, &b, &c, &d];

        let asc = rank_feeders(&input, RankMetric::Saidi, SortOrder::Ascending);
        assert_eq!(ids(&asc), vec!["B", "A", "C", "D"]);

        let desc = rank_feeders(&input, RankMetric::Saidi, SortOrder::Descending);
        assert_eq!(ids(&desc), vec!["D", "A", "C", "B"]);
    }

    #[test]
    fn test_critical_feeders_top_n() {
        let data = sample::dataset();
        let all = resolve_feeders(data, data, &FilterSelection::new());
        let top = critical_feeders(&all, CRITICAL_FEEDER_COUNT);
        assert_eq!(top.len(), 6);
        assert_eq!(top[0].id, "FDR-11KV-004");
        assert_eq!(top[1].id, "FDR-11KV-003");
    }

    #[test]
    fn test_interruption_summary() {
        let data = sample::dataset();
        let all: Vec<&Interruption> = data.interruptions.iter().collect();
        let s = interruption_summary(&all);
        assert_eq!(s.total, 12);
        assert_eq!(s.sustained, 8);
        assert_eq!(s.momentary, 4);
        assert_eq!(s.total, s.sustained + s.momentary);
    }

    #[test]
    fn test_summarize_sub_division() {
        let data = sample::dataset();
        let mut sel = FilterSelection::new();
        sel.set_sub_division("kzk");
        let s = summarize(data, data, &sel);
        assert_eq!(s.feeders, 2);
        assert_eq!(s.sections, 3);
        assert_eq!(s.dtrs, 4);
        assert_eq!(s.interruptions, 4);
        assert_eq!(s.consumers, 2850 + 3200);
    }

    #[test]
    fn test_area_distribution() {
        let data = sample::dataset();
        let mut sel = FilterSelection::new();
        sel.set_sub_division("clk");
        let sections = eligible_sections(data, &sel);
        let dist = area_distribution(&sections);
        assert_eq!(dist[0], (SectionType::Urban, 0, 0.0));
        assert_eq!(dist[1], (SectionType::Rural, 1, 50.0));
        assert_eq!(dist[2], (SectionType::Remote, 1, 50.0));
        assert!(area_distribution(&[]).iter().all(|(_, n, pct)| *n == 0 && *pct == 0.0));
    }

    #[test]
    fn test_load_band() {
        assert_eq!(LoadBand::of(95.0), LoadBand::Critical);
        assert_eq!(LoadBand::of(90.0), LoadBand::High);
        assert_eq!(LoadBand::of(75.0), LoadBand::Normal);
    }
}

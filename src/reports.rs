use crate::engine::{rank_feeders, LoadBand, RankMetric, SortOrder};
use crate::filter::FilterSelection;
use crate::hierarchy::eligible_sections;
use crate::repository::{CatalogRepository, FeederRepository};
use crate::types::{
    AreaRow, CatalogRow, CriticalFeederRow, Dtr, DtrRow, Feeder, FeederRankingRow, Interruption, InterruptionRow,
    InterruptionSummary, MetricRow, MonthlyTrend, QuarterIndices, QuarterlyPerformance,
    QuarterlyRow, ReliabilityIndices, ReportEntry, SectionType, SelectionSummary, TrendRow,
};
use crate::util::{average, format_int, format_number};
use std::collections::{HashMap, HashSet};

fn metric(name: &str, value: String, unit: &str) -> MetricRow {
    MetricRow {
        metric: name.to_string(),
        value,
        unit: unit.to_string(),
    }
}

pub fn index_rows(idx: &ReliabilityIndices) -> Vec<MetricRow> {
    vec![
        metric("SAIDI", format_number(idx.saidi, 2), "min/cons"),
        metric("SAIFI", format_number(idx.saifi, 2), "int/cons"),
        metric("CAIDI", format_number(idx.caidi, 2), "min/int"),
        metric("MAIFI (est.)", format_number(idx.maifi, 2), "int/cons"),
        metric("CAIFI (est.)", format_number(idx.caifi, 2), "int/cons"),
    ]
}

pub fn summary_rows(s: &SelectionSummary) -> Vec<MetricRow> {
    vec![
        metric("Feeders", format_int(s.feeders), "count"),
        metric("Sections", format_int(s.sections), "count"),
        metric("DTRs", format_int(s.dtrs), "count"),
        metric("Interruptions", format_int(s.interruptions), "count"),
        metric("Consumers", format_int(s.consumers), "count"),
    ]
}

pub fn interruption_summary_rows(s: &InterruptionSummary) -> Vec<MetricRow> {
    vec![
        metric("Total Interruptions", format_int(s.total), "count"),
        metric("Sustained (>5 min)", format_int(s.sustained), "count"),
        metric("Momentary (<=5 min)", format_int(s.momentary), "count"),
        metric("Affected Consumers", format_int(s.affected_consumers), "consumers"),
    ]
}

/// `feeders` must already be in critical order.
pub fn critical_feeder_rows(feeders: &[&Feeder]) -> Vec<CriticalFeederRow> {
    feeders
        .iter()
        .enumerate()
        .map(|(idx, f)| CriticalFeederRow {
            rank: idx + 1,
            feeder: f.id.clone(),
            name: f.name.clone(),
            saidi: format_number(f.saidi, 2),
        })
        .collect()
}

pub fn trend_rows(trends: &[MonthlyTrend]) -> Vec<TrendRow> {
    trends
        .iter()
        .map(|t| {
            let met = t.saidi <= t.target_saidi && t.saifi <= t.target_saifi;
            TrendRow {
                month: t.month.clone(),
                saidi: format_number(t.saidi, 2),
                saifi: format_number(t.saifi, 2),
                target_saidi: format_number(t.target_saidi, 2),
                target_saifi: format_number(t.target_saifi, 2),
                target_met: if met { "Yes" } else { "No" }.to_string(),
            }
        })
        .collect()
}

pub fn area_rows(dist: &[(SectionType, usize, f64)]) -> Vec<AreaRow> {
    dist.iter()
        .map(|(t, count, share)| AreaRow {
            area_type: t.label().to_string(),
            sections: *count,
            share_pct: format_number(*share, 2),
        })
        .collect()
}

fn section_names<C>(catalog: &C, ids: &[String]) -> Vec<String>
where
    C: CatalogRepository + ?Sized,
{
    ids.iter()
        .map(|id| {
            catalog
                .sections()
                .iter()
                .find(|s| &s.id == id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| id.clone())
        })
        .collect()
}

fn section_name<C>(catalog: &C, id: &str) -> String
where
    C: CatalogRepository + ?Sized,
{
    catalog
        .sections()
        .iter()
        .find(|s| s.id == id)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Best performer first (lowest SAIDI).
pub fn feeder_ranking<C, F>(catalog: &C, assets: &F, feeders: &[&Feeder]) -> Vec<FeederRankingRow>
where
    C: CatalogRepository + ?Sized,
    F: FeederRepository + ?Sized,
{
    rank_feeders(feeders, RankMetric::Saidi, SortOrder::Ascending)
        .into_iter()
        .enumerate()
        .map(|(idx, f)| {
            let sections = assets
                .feeder_sections()
                .iter()
                .find(|m| m.feeder_id == f.id)
                .map(|m| section_names(catalog, &m.section_ids))
                .unwrap_or_default();
            FeederRankingRow {
                rank: idx + 1,
                feeder: f.id.clone(),
                name: f.name.clone(),
                voltage: f.voltage.clone(),
                sections: sections.join(", "),
                saidi: format_number(f.saidi, 2),
                saifi: format_number(f.saifi, 2),
                interruptions: f.interruptions,
                consumers: format_int(f.consumers),
                loading: format_number(f.loading, 1),
                load_band: LoadBand::of(f.loading).label().to_string(),
            }
        })
        .collect()
}

pub fn dtr_rows<C>(catalog: &C, dtrs: &[&Dtr]) -> Vec<DtrRow>
where
    C: CatalogRepository + ?Sized,
{
    dtrs.iter()
        .map(|d| {
            let utilization = d.utilization();
            DtrRow {
                dtr: d.id.clone(),
                name: d.name.clone(),
                feeder: d.feeder_id.clone(),
                section: section_name(catalog, &d.section_id),
                capacity: format_number(d.capacity, 0),
                peak_load: format_number(d.peak_load, 0),
                avg_load: format_number(d.avg_load, 0),
                utilization: format_number(utilization, 1),
                consumers: format_int(d.consumers),
                interruptions: d.interruptions,
                load_band: LoadBand::of(utilization).label().to_string(),
            }
        })
        .collect()
}

pub fn interruption_rows<C>(catalog: &C, interruptions: &[&Interruption]) -> Vec<InterruptionRow>
where
    C: CatalogRepository + ?Sized,
{
    interruptions
        .iter()
        .map(|i| InterruptionRow {
            id: i.id.clone(),
            date: i.date.format("%Y-%m-%d").to_string(),
            time: i.time.clone(),
            feeder: i.feeder_id.clone(),
            section: section_name(catalog, &i.section_id),
            duration: i.duration,
            kind: i.kind.to_string(),
            cause: i.cause.clone(),
            consumers: format_int(i.consumers),
        })
        .collect()
}

fn quarterly_row(circle: String, division: String, quarters: &[QuarterIndices; 4], annual: &QuarterIndices) -> QuarterlyRow {
    let f = |v: f64| format_number(v, 1);
    QuarterlyRow {
        circle,
        division,
        q1_saidi: f(quarters[0].saidi),
        q1_saifi: f(quarters[0].saifi),
        q1_caidi: f(quarters[0].caidi),
        q2_saidi: f(quarters[1].saidi),
        q2_saifi: f(quarters[1].saifi),
        q2_caidi: f(quarters[1].caidi),
        q3_saidi: f(quarters[2].saidi),
        q3_saifi: f(quarters[2].saifi),
        q3_caidi: f(quarters[2].caidi),
        q4_saidi: f(quarters[3].saidi),
        q4_saifi: f(quarters[3].saifi),
        q4_caidi: f(quarters[3].caidi),
        annual_saidi: f(annual.saidi),
        annual_saifi: f(annual.saifi),
        annual_caidi: f(annual.caidi),
    }
}

fn mean_indices(rows: &[&QuarterlyPerformance], pick: impl Fn(&QuarterlyPerformance) -> QuarterIndices) -> QuarterIndices {
    let picked: Vec<QuarterIndices> = rows.iter().map(|r| pick(r)).collect();
    QuarterIndices {
        saidi: average(&picked.iter().map(|q| q.saidi).collect::<Vec<_>>()),
        saifi: average(&picked.iter().map(|q| q.saifi).collect::<Vec<_>>()),
        caidi: average(&picked.iter().map(|q| q.caidi).collect::<Vec<_>>()),
    }
}

/// Per-division quarterly figures inside the selection, followed by an
/// average row ("State Average" when nothing is filtered).
pub fn quarterly_report<C>(catalog: &C, performance: &[QuarterlyPerformance], selection: &FilterSelection) -> Vec<QuarterlyRow>
where
    C: CatalogRepository + ?Sized,
{
    let sub_to_division: HashMap<&str, &str> = catalog
        .sub_divisions()
        .iter()
        .map(|s| (s.id.as_str(), s.division_id.as_str()))
        .collect();
    let divisions: HashSet<&str> = eligible_sections(catalog, selection)
        .iter()
        .filter_map(|s| sub_to_division.get(s.sub_division_id.as_str()).copied())
        .collect();

    let matching: Vec<&QuarterlyPerformance> = performance
        .iter()
        .filter(|p| divisions.contains(p.division_id.as_str()))
        .collect();
    if matching.is_empty() {
        return Vec::new();
    }

    let circle_name = |id: &str| {
        catalog
            .circles()
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.trim_end_matches(" Circle").to_string())
            .unwrap_or_else(|| id.to_string())
    };
    let division_name = |id: &str| {
        catalog
            .divisions()
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.name.trim_end_matches(" Division").to_string())
            .unwrap_or_else(|| id.to_string())
    };

    let mut rows: Vec<QuarterlyRow> = matching
        .iter()
        .map(|p| quarterly_row(circle_name(&p.circle_id), division_name(&p.division_id), &p.quarters, &p.annual))
        .collect();

    let quarters = [
        mean_indices(&matching, |p| p.quarters[0]),
        mean_indices(&matching, |p| p.quarters[1]),
        mean_indices(&matching, |p| p.quarters[2]),
        mean_indices(&matching, |p| p.quarters[3]),
    ];
    let annual = mean_indices(&matching, |p| p.annual);
    let label = if selection.is_unfiltered() {
        "State Average"
    } else {
        "Average"
    };
    rows.push(quarterly_row(label.to_string(), String::new(), &quarters, &annual));
    rows
}

pub fn catalog_rows(entries: &[ReportEntry]) -> Vec<CatalogRow> {
    entries
        .iter()
        .map(|e| CatalogRow {
            title: e.title.clone(),
            description: e.description.clone(),
            status: e.status.to_string(),
            generated: e.generated.format("%d-%b-%Y").to_string(),
        })
        .collect()
}

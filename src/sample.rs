// Compiled-in sample network used when no data directory is given.
//
// Six circles across three regions, one or two sub-divisions per division,
// eight feeders and a March to June 2024 interruption log.
use crate::repository::Dataset;
use crate::types::{
    Circle, Division, Dtr, Feeder, FeederSectionMapping, Interruption, InterruptionType,
    MonthlyTrend, QuarterIndices, QuarterlyPerformance, Region, ReportEntry, ReportStatus,
    Section, SectionType, SubDivision,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;

static SAMPLE: Lazy<Dataset> = Lazy::new(build);

/// The shared, immutable sample dataset.
pub fn dataset() -> &'static Dataset {
    &SAMPLE
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

fn region(id: &str, name: &str) -> Region {
    Region { id: id.into(), name: name.into() }
}

fn circle(id: &str, name: &str, region_id: &str) -> Circle {
    Circle { id: id.into(), name: name.into(), region_id: region_id.into() }
}

fn division(id: &str, name: &str, circle_id: &str) -> Division {
    Division { id: id.into(), name: name.into(), circle_id: circle_id.into() }
}

fn sub_division(id: &str, name: &str, division_id: &str) -> SubDivision {
    SubDivision { id: id.into(), name: name.into(), division_id: division_id.into() }
}

fn section(id: &str, name: &str, sub_division_id: &str, section_type: SectionType) -> Section {
    Section {
        id: id.into(),
        name: name.into(),
        sub_division_id: sub_division_id.into(),
        section_type,
    }
}

#[allow(clippy::too_many_arguments)]
fn feeder(
    id: &str,
    name: &str,
    voltage: &str,
    saidi: f64,
    saifi: f64,
    interruptions: u32,
    consumers: u64,
    loading: f64,
) -> Feeder {
    Feeder {
        id: id.into(),
        name: name.into(),
        voltage: voltage.into(),
        saidi,
        saifi,
        interruptions,
        consumers,
        loading,
    }
}

fn mapping(feeder_id: &str, section_ids: &[&str]) -> FeederSectionMapping {
    FeederSectionMapping {
        feeder_id: feeder_id.into(),
        section_ids: section_ids.iter().map(|s| s.to_string()).collect(),
    }
}

#[allow(clippy::too_many_arguments)]
fn dtr(
    id: &str,
    feeder_id: &str,
    section_id: &str,
    capacity: f64,
    peak_load: f64,
    avg_load: f64,
    consumers: u64,
    interruptions: u32,
) -> Dtr {
    Dtr {
        id: id.into(),
        name: format!("{} Transformer", id),
        feeder_id: feeder_id.into(),
        section_id: section_id.into(),
        capacity,
        peak_load,
        avg_load,
        consumers,
        interruptions,
    }
}

#[allow(clippy::too_many_arguments)]
fn interruption(
    id: &str,
    on: NaiveDate,
    time: &str,
    feeder_id: &str,
    section_id: &str,
    duration: u32,
    kind: InterruptionType,
    cause: &str,
    consumers: u64,
) -> Interruption {
    Interruption {
        id: id.into(),
        date: on,
        time: time.into(),
        feeder_id: feeder_id.into(),
        section_id: section_id.into(),
        duration,
        kind,
        cause: cause.into(),
        consumers,
    }
}

fn q(saidi: f64, saifi: f64, caidi: f64) -> QuarterIndices {
    QuarterIndices { saidi, saifi, caidi }
}

fn trend(month: &str, saidi: f64, saifi: f64) -> MonthlyTrend {
    MonthlyTrend {
        month: month.into(),
        saidi,
        saifi,
        target_saidi: 40.0,
        target_saifi: 3.5,
    }
}

fn build() -> Dataset {
    use InterruptionType::{Momentary, Sustained};
    use SectionType::{Remote, Rural, Urban};

    let regions = vec![
        region("north", "North Region"),
        region("central", "Central Region"),
        region("south", "South Region"),
    ];

    let circles = vec![
        circle("thrissur", "Thrissur Circle", "north"),
        circle("palakkad", "Palakkad Circle", "north"),
        circle("ernakulam", "Ernakulam Circle", "central"),
        circle("kottayam", "Kottayam Circle", "central"),
        circle("trivandrum", "Trivandrum Circle", "south"),
        circle("kollam", "Kollam Circle", "south"),
    ];

    let divisions = vec![
        division("kunnamkulam", "Kunnamkulam Division", "thrissur"),
        division("chalakudy", "Chalakudy Division", "thrissur"),
        division("ottapalam", "Ottapalam Division", "palakkad"),
        division("mannarkkad", "Mannarkkad Division", "palakkad"),
        division("perumbavoor", "Perumbavoor Division", "ernakulam"),
        division("angamaly", "Angamaly Division", "ernakulam"),
        division("pala", "Pala Division", "kottayam"),
        division("changanassery", "Changanassery Division", "kottayam"),
        division("kazhakoottam", "Kazhakoottam Division", "trivandrum"),
        division("neyyattinkara", "Neyyattinkara Division", "trivandrum"),
        division("punalur", "Punalur Division", "kollam"),
        division("karunagappally", "Karunagappally Division", "kollam"),
    ];

    let sub_divisions = vec![
        sub_division("kzk", "Kunnamkulam Sub-Division", "kunnamkulam"),
        sub_division("tcr", "Thrissur Central Sub-Division", "kunnamkulam"),
        sub_division("clk", "Chalakudy Sub-Division", "chalakudy"),
        sub_division("otp", "Ottapalam Sub-Division", "ottapalam"),
        sub_division("mnk", "Mannarkkad Sub-Division", "mannarkkad"),
        sub_division("pbr", "Perumbavoor Sub-Division", "perumbavoor"),
        sub_division("ang", "Angamaly Sub-Division", "angamaly"),
        sub_division("pla", "Pala Sub-Division", "pala"),
        sub_division("cgy", "Changanassery Sub-Division", "changanassery"),
        sub_division("kzm", "Kazhakoottam Sub-Division", "kazhakoottam"),
        sub_division("nyk", "Neyyattinkara Sub-Division", "neyyattinkara"),
        sub_division("pnr", "Punalur Sub-Division", "punalur"),
        sub_division("kgp", "Karunagappally Sub-Division", "karunagappally"),
    ];

    let sections = vec![
        section("kzk-u1", "Kunnamkulam Town 1", "kzk", Urban),
        section("kzk-u2", "Kunnamkulam Town 2", "kzk", Urban),
        section("kzk-r1", "Kecheri", "kzk", Rural),
        section("tcr-u1", "Thrissur Central", "tcr", Urban),
        section("clk-r1", "Chalakudy East", "clk", Rural),
        section("clk-x1", "Athirappilly", "clk", Remote),
        section("otp-r1", "Ottapalam Rural", "otp", Rural),
        section("otp-x1", "Sreekrishnapuram", "otp", Remote),
        section("mnk-x1", "Attappadi", "mnk", Remote),
        section("pbr-u1", "Perumbavoor Town", "pbr", Urban),
        section("ang-u1", "Angamaly Town", "ang", Urban),
        section("pla-r1", "Pala Industrial", "pla", Rural),
        section("cgy-u1", "Changanassery Town", "cgy", Urban),
        section("kzm-u1", "Trivandrum North", "kzm", Urban),
        section("nyk-r1", "Neyyattinkara Rural", "nyk", Rural),
        section("pnr-x1", "Aryankavu", "pnr", Remote),
        section("kgp-r1", "Karunagappally Rural", "kgp", Rural),
    ];

    let feeders = vec![
        feeder("FDR-11KV-001", "Kunnamkulam-1", "11kV", 52.3, 4.2, 15, 2850, 85.0),
        feeder("FDR-11KV-002", "Kunnamkulam-2", "11kV", 38.7, 3.1, 11, 3200, 72.0),
        feeder("FDR-11KV-003", "Chalakudy-1", "11kV", 61.5, 5.3, 19, 1950, 91.0),
        feeder("FDR-33KV-001", "Thrissur-Central", "33kV", 45.2, 3.6, 13, 5100, 78.0),
        feeder("FDR-11KV-004", "Ottapalam-Rural", "11kV", 71.8, 6.1, 22, 1600, 95.0),
        feeder("FDR-11KV-005", "Ernakulam-City", "11kV", 33.4, 2.8, 10, 4100, 68.0),
        feeder("FDR-33KV-002", "Pala-Industrial", "33kV", 55.9, 4.7, 17, 3800, 82.0),
        feeder("FDR-11KV-006", "Trivandrum-North", "11kV", 42.1, 3.4, 12, 2950, 74.0),
    ];

    let feeder_sections = vec![
        mapping("FDR-11KV-001", &["kzk-u1", "kzk-u2"]),
        mapping("FDR-11KV-002", &["kzk-u2", "kzk-r1"]),
        mapping("FDR-11KV-003", &["clk-r1", "clk-x1"]),
        mapping("FDR-33KV-001", &["tcr-u1"]),
        mapping("FDR-11KV-004", &["otp-r1", "otp-x1"]),
        mapping("FDR-11KV-005", &["pbr-u1", "ang-u1"]),
        mapping("FDR-33KV-002", &["pla-r1"]),
        mapping("FDR-11KV-006", &["kzm-u1", "nyk-r1"]),
    ];

    let dtrs = vec![
        dtr("DTR-001", "FDR-11KV-001", "kzk-u1", 200.0, 150.0, 120.0, 410, 5),
        dtr("DTR-002", "FDR-11KV-001", "kzk-u2", 200.0, 180.0, 145.0, 465, 3),
        dtr("DTR-003", "FDR-11KV-002", "kzk-u2", 250.0, 165.0, 132.0, 520, 7),
        dtr("DTR-004", "FDR-11KV-002", "kzk-r1", 200.0, 142.0, 115.0, 380, 2),
        dtr("DTR-005", "FDR-11KV-003", "clk-r1", 200.0, 195.0, 160.0, 440, 9),
        dtr("DTR-006", "FDR-11KV-003", "clk-x1", 250.0, 175.0, 140.0, 295, 6),
    ];

    let interruptions = vec![
        interruption("INT-001", date(2024, 3, 1), "00:10", "FDR-11KV-004", "otp-r1", 75, Sustained, "Storm", 1600),
        interruption("INT-002", date(2024, 3, 12), "13:40", "FDR-11KV-001", "kzk-u1", 25, Sustained, "Tree Contact", 620),
        interruption("INT-003", date(2024, 3, 27), "07:05", "FDR-33KV-002", "pla-r1", 4, Momentary, "Lightning", 3800),
        interruption("INT-004", date(2024, 4, 9), "15:30", "FDR-11KV-003", "clk-r1", 140, Sustained, "Conductor Snapping", 1950),
        interruption("INT-005", date(2024, 4, 30), "23:50", "FDR-11KV-006", "kzm-u1", 2, Momentary, "Unknown", 2950),
        interruption("INT-006", date(2024, 5, 14), "10:00", "FDR-11KV-002", "kzk-r1", 60, Sustained, "Maintenance", 1200),
        interruption("INT-007", date(2024, 6, 15), "10:30", "FDR-11KV-001", "kzk-u2", 45, Sustained, "Tree Contact", 850),
        interruption("INT-008", date(2024, 6, 15), "14:15", "FDR-11KV-003", "clk-x1", 120, Sustained, "Equipment Failure", 1950),
        interruption("INT-009", date(2024, 6, 16), "09:00", "FDR-33KV-001", "tcr-u1", 3, Momentary, "Bird Contact", 5100),
        interruption("INT-010", date(2024, 6, 16), "16:45", "FDR-11KV-002", "kzk-u2", 30, Sustained, "Maintenance", 1200),
        interruption("INT-011", date(2024, 6, 17), "11:20", "FDR-11KV-004", "otp-x1", 90, Sustained, "Storm", 1600),
        interruption("INT-012", date(2024, 6, 17), "18:30", "FDR-11KV-005", "pbr-u1", 2, Momentary, "Unknown", 4100),
    ];

    let quarterly = vec![
        QuarterlyPerformance {
            circle_id: "thrissur".into(),
            division_id: "kunnamkulam".into(),
            quarters: [q(42.3, 3.5, 12.1), q(45.2, 3.8, 11.9), q(43.7, 3.6, 12.1), q(41.8, 3.4, 12.3)],
            annual: q(43.3, 3.6, 12.0),
        },
        QuarterlyPerformance {
            circle_id: "ernakulam".into(),
            division_id: "perumbavoor".into(),
            quarters: [q(38.5, 3.2, 12.0), q(36.7, 3.0, 12.2), q(37.2, 3.1, 12.0), q(35.9, 2.9, 12.4)],
            annual: q(37.1, 3.1, 12.0),
        },
        QuarterlyPerformance {
            circle_id: "trivandrum".into(),
            division_id: "kazhakoottam".into(),
            quarters: [q(40.2, 3.3, 12.2), q(39.8, 3.3, 12.1), q(38.5, 3.2, 12.0), q(37.1, 3.0, 12.4)],
            annual: q(38.9, 3.2, 12.2),
        },
    ];

    let trends = vec![
        trend("Jan", 48.5, 4.1),
        trend("Feb", 46.2, 3.9),
        trend("Mar", 45.8, 3.8),
        trend("Apr", 44.1, 3.7),
        trend("May", 43.5, 3.6),
        trend("Jun", 45.2, 3.8),
    ];

    let report_catalog = vec![
        ReportEntry {
            title: "Quarterly Performance Report - Q2 2024".into(),
            description: "Annexure I - Feeder-wise Reliability Indices".into(),
            status: ReportStatus::Submitted,
            generated: date(2024, 7, 1),
        },
        ReportEntry {
            title: "Area-wise Performance Summary - Q2 2024".into(),
            description: "Annexure II - Urban/Rural/Remote Areas".into(),
            status: ReportStatus::Submitted,
            generated: date(2024, 7, 1),
        },
        ReportEntry {
            title: "Interruption Heatmap Report - June 2024".into(),
            description: "Geographic distribution of power interruptions".into(),
            status: ReportStatus::Draft,
            generated: date(2024, 6, 28),
        },
        ReportEntry {
            title: "Annual Performance Report - 2023".into(),
            description: "Comprehensive reliability analysis".into(),
            status: ReportStatus::Published,
            generated: date(2024, 1, 15),
        },
    ];

    Dataset {
        regions,
        circles,
        divisions,
        sub_divisions,
        sections,
        feeders,
        feeder_sections,
        dtrs,
        interruptions,
        quarterly,
        trends,
        report_catalog,
    }
}

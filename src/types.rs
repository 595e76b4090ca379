use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub id: String,
    pub name: String,
    pub region_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Division {
    pub id: String,
    pub name: String,
    pub circle_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubDivision {
    pub id: String,
    pub name: String,
    pub division_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Urban,
    Rural,
    Remote,
}

impl SectionType {
    pub const ALL: [SectionType; 3] = [SectionType::Urban, SectionType::Rural, SectionType::Remote];

    pub fn label(&self) -> &'static str {
        match self {
            SectionType::Urban => "Urban",
            SectionType::Rural => "Rural",
            SectionType::Remote => "Remote",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub name: String,
    pub sub_division_id: String,
    #[serde(rename = "type")]
    pub section_type: SectionType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feeder {
    pub id: String,
    pub name: String,
    pub voltage: String,
    pub saidi: f64,
    pub saifi: f64,
    pub interruptions: u32,
    pub consumers: u64,
    /// Percent of rated capacity at peak.
    pub loading: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeederSectionMapping {
    pub feeder_id: String,
    pub section_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dtr {
    pub id: String,
    pub name: String,
    pub feeder_id: String,
    pub section_id: String,
    /// kVA
    pub capacity: f64,
    pub peak_load: f64,
    pub avg_load: f64,
    pub consumers: u64,
    #[serde(default)]
    pub interruptions: u32,
}

impl Dtr {
    /// Peak load as a percentage of capacity; zero for an unrated transformer.
    pub fn utilization(&self) -> f64 {
        if self.capacity <= 0.0 {
            return 0.0;
        }
        self.peak_load / self.capacity * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterruptionType {
    Sustained,
    Momentary,
}

impl fmt::Display for InterruptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterruptionType::Sustained => f.write_str("Sustained"),
            InterruptionType::Momentary => f.write_str("Momentary"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interruption {
    pub id: String,
    pub date: NaiveDate,
    /// Local time of day as `HH:MM`; informational only.
    pub time: String,
    pub feeder_id: String,
    pub section_id: String,
    /// Minutes
    pub duration: u32,
    #[serde(rename = "type")]
    pub kind: InterruptionType,
    pub cause: String,
    pub consumers: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct QuarterIndices {
    pub saidi: f64,
    pub saifi: f64,
    pub caidi: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuarterlyPerformance {
    pub circle_id: String,
    pub division_id: String,
    pub quarters: [QuarterIndices; 4],
    pub annual: QuarterIndices,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTrend {
    pub month: String,
    pub saidi: f64,
    pub saifi: f64,
    pub target_saidi: f64,
    pub target_saifi: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    Submitted,
    Draft,
    Published,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStatus::Submitted => f.write_str("Submitted"),
            ReportStatus::Draft => f.write_str("Draft"),
            ReportStatus::Published => f.write_str("Published"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub title: String,
    pub description: String,
    pub status: ReportStatus,
    pub generated: NaiveDate,
}

/// Consumer-weighted reliability indices, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ReliabilityIndices {
    pub saidi: f64,
    pub saifi: f64,
    pub caidi: f64,
    pub maifi: f64,
    pub caifi: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SelectionSummary {
    pub feeders: usize,
    pub sections: usize,
    pub dtrs: usize,
    pub interruptions: usize,
    pub consumers: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InterruptionSummary {
    pub total: usize,
    pub sustained: usize,
    pub momentary: usize,
    pub affected_consumers: u64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MetricRow {
    #[serde(rename = "Metric")]
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
    #[serde(rename = "Unit")]
    #[tabled(rename = "Unit")]
    pub unit: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CriticalFeederRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Feeder")]
    #[tabled(rename = "Feeder")]
    pub feeder: String,
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "SAIDI")]
    #[tabled(rename = "SAIDI")]
    pub saidi: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TrendRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "SAIDI")]
    #[tabled(rename = "SAIDI")]
    pub saidi: String,
    #[serde(rename = "SAIFI")]
    #[tabled(rename = "SAIFI")]
    pub saifi: String,
    #[serde(rename = "TargetSAIDI")]
    #[tabled(rename = "TargetSAIDI")]
    pub target_saidi: String,
    #[serde(rename = "TargetSAIFI")]
    #[tabled(rename = "TargetSAIFI")]
    pub target_saifi: String,
    #[serde(rename = "TargetMet")]
    #[tabled(rename = "TargetMet")]
    pub target_met: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct AreaRow {
    #[serde(rename = "AreaType")]
    #[tabled(rename = "AreaType")]
    pub area_type: String,
    #[serde(rename = "Sections")]
    #[tabled(rename = "Sections")]
    pub sections: usize,
    #[serde(rename = "SharePct")]
    #[tabled(rename = "SharePct")]
    pub share_pct: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct FeederRankingRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Feeder")]
    #[tabled(rename = "Feeder")]
    pub feeder: String,
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "Voltage")]
    #[tabled(rename = "Voltage")]
    pub voltage: String,
    #[serde(rename = "Sections")]
    #[tabled(rename = "Sections")]
    pub sections: String,
    #[serde(rename = "SAIDI")]
    #[tabled(rename = "SAIDI")]
    pub saidi: String,
    #[serde(rename = "SAIFI")]
    #[tabled(rename = "SAIFI")]
    pub saifi: String,
    #[serde(rename = "Interruptions")]
    #[tabled(rename = "Interruptions")]
    pub interruptions: u32,
    #[serde(rename = "Consumers")]
    #[tabled(rename = "Consumers")]
    pub consumers: String,
    #[serde(rename = "LoadingPct")]
    #[tabled(rename = "LoadingPct")]
    pub loading: String,
    #[serde(rename = "LoadBand")]
    #[tabled(rename = "LoadBand")]
    pub load_band: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DtrRow {
    #[serde(rename = "DTR")]
    #[tabled(rename = "DTR")]
    pub dtr: String,
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "Feeder")]
    #[tabled(rename = "Feeder")]
    pub feeder: String,
    #[serde(rename = "Section")]
    #[tabled(rename = "Section")]
    pub section: String,
    #[serde(rename = "CapacityKVA")]
    #[tabled(rename = "CapacityKVA")]
    pub capacity: String,
    #[serde(rename = "PeakLoad")]
    #[tabled(rename = "PeakLoad")]
    pub peak_load: String,
    #[serde(rename = "AvgLoad")]
    #[tabled(rename = "AvgLoad")]
    pub avg_load: String,
    #[serde(rename = "UtilizationPct")]
    #[tabled(rename = "UtilizationPct")]
    pub utilization: String,
    #[serde(rename = "Consumers")]
    #[tabled(rename = "Consumers")]
    pub consumers: String,
    #[serde(rename = "Interruptions")]
    #[tabled(rename = "Interruptions")]
    pub interruptions: u32,
    #[serde(rename = "LoadBand")]
    #[tabled(rename = "LoadBand")]
    pub load_band: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct InterruptionRow {
    #[serde(rename = "Id")]
    #[tabled(rename = "Id")]
    pub id: String,
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: String,
    #[serde(rename = "Time")]
    #[tabled(rename = "Time")]
    pub time: String,
    #[serde(rename = "Feeder")]
    #[tabled(rename = "Feeder")]
    pub feeder: String,
    #[serde(rename = "Section")]
    #[tabled(rename = "Section")]
    pub section: String,
    #[serde(rename = "DurationMin")]
    #[tabled(rename = "DurationMin")]
    pub duration: u32,
    #[serde(rename = "Type")]
    #[tabled(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Cause")]
    #[tabled(rename = "Cause")]
    pub cause: String,
    #[serde(rename = "Consumers")]
    #[tabled(rename = "Consumers")]
    pub consumers: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct QuarterlyRow {
    #[serde(rename = "Circle")]
    #[tabled(rename = "Circle")]
    pub circle: String,
    #[serde(rename = "Division")]
    #[tabled(rename = "Division")]
    pub division: String,
    #[serde(rename = "Q1_SAIDI")]
    #[tabled(rename = "Q1 SAIDI")]
    pub q1_saidi: String,
    #[serde(rename = "Q1_SAIFI")]
    #[tabled(rename = "Q1 SAIFI")]
    pub q1_saifi: String,
    #[serde(rename = "Q1_CAIDI")]
    #[tabled(rename = "Q1 CAIDI")]
    pub q1_caidi: String,
    #[serde(rename = "Q2_SAIDI")]
    #[tabled(rename = "Q2 SAIDI")]
    pub q2_saidi: String,
    #[serde(rename = "Q2_SAIFI")]
    #[tabled(rename = "Q2 SAIFI")]
    pub q2_saifi: String,
    #[serde(rename = "Q2_CAIDI")]
    #[tabled(rename = "Q2 CAIDI")]
    pub q2_caidi: String,
    #[serde(rename = "Q3_SAIDI")]
    #[tabled(rename = "Q3 SAIDI")]
    pub q3_saidi: String,
    #[serde(rename = "Q3_SAIFI")]
    #[tabled(rename = "Q3 SAIFI")]
    pub q3_saifi: String,
    #[serde(rename = "Q3_CAIDI")]
    #[tabled(rename = "Q3 CAIDI")]
    pub q3_caidi: String,
    #[serde(rename = "Q4_SAIDI")]
    #[tabled(rename = "Q4 SAIDI")]
    pub q4_saidi: String,
    #[serde(rename = "Q4_SAIFI")]
    #[tabled(rename = "Q4 SAIFI")]
    pub q4_saifi: String,
    #[serde(rename = "Q4_CAIDI")]
    #[tabled(rename = "Q4 CAIDI")]
    pub q4_caidi: String,
    #[serde(rename = "Annual_SAIDI")]
    #[tabled(rename = "Annual SAIDI")]
    pub annual_saidi: String,
    #[serde(rename = "Annual_SAIFI")]
    #[tabled(rename = "Annual SAIFI")]
    pub annual_saifi: String,
    #[serde(rename = "Annual_CAIDI")]
    #[tabled(rename = "Annual CAIDI")]
    pub annual_caidi: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CatalogRow {
    #[serde(rename = "Title")]
    #[tabled(rename = "Title")]
    pub title: String,
    #[serde(rename = "Description")]
    #[tabled(rename = "Description")]
    pub description: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
    #[serde(rename = "Generated")]
    #[tabled(rename = "Generated")]
    pub generated: String,
}

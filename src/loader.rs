//! Load a dataset from a directory of CSV files.
//!
//! One file per entity, headed with the field names (`region_id`,
//! `sub_division_id`, ...). Feeder to section mappings list section ids
//! separated by `;`. Quarterly figures, trends and the report catalog are
//! not part of the directory and come from the compiled-in sample.

use crate::error::Result;
use crate::repository::Dataset;
use crate::sample;
use crate::types::FeederSectionMapping;
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub parse_errors: usize,
    pub files: usize,
}

#[derive(Debug, Deserialize)]
struct RawMapping {
    feeder_id: String,
    section_ids: String,
}

impl From<RawMapping> for FeederSectionMapping {
    fn from(raw: RawMapping) -> Self {
        FeederSectionMapping {
            feeder_id: raw.feeder_id.trim().to_string(),
            section_ids: raw
                .section_ids
                .split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

fn read_csv<T: DeserializeOwned>(dir: &Path, file: &str, report: &mut LoadReport) -> Result<Vec<T>> {
    let path = dir.join(file);
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_path(&path)?;
    let mut rows = Vec::new();
    for (line, result) in rdr.deserialize::<T>().enumerate() {
        report.total_rows += 1;
        match result {
            Ok(r) => rows.push(r),
            Err(e) => {
                report.parse_errors += 1;
                // +2: header line and 1-based numbering
                warn!("{}: skipping row {}: {}", file, line + 2, e);
            }
        }
    }
    report.files += 1;
    debug!("{}: {} rows", file, rows.len());
    Ok(rows)
}

pub fn load_dir(dir: &Path) -> Result<(Dataset, LoadReport)> {
    let mut report = LoadReport::default();
    let defaults = sample::dataset();

    let mappings: Vec<RawMapping> = read_csv(dir, "feeder_sections.csv", &mut report)?;
    let mut data = Dataset {
        regions: read_csv(dir, "regions.csv", &mut report)?,
        circles: read_csv(dir, "circles.csv", &mut report)?,
        divisions: read_csv(dir, "divisions.csv", &mut report)?,
        sub_divisions: read_csv(dir, "sub_divisions.csv", &mut report)?,
        sections: read_csv(dir, "sections.csv", &mut report)?,
        feeders: read_csv(dir, "feeders.csv", &mut report)?,
        feeder_sections: mappings.into_iter().map(FeederSectionMapping::from).collect(),
        dtrs: read_csv(dir, "dtrs.csv", &mut report)?,
        interruptions: read_csv(dir, "interruptions.csv", &mut report)?,
        ..Dataset::default()
    };
    data.validate()?;

    // Performance figures are the sample's and do not follow the loaded catalog.
    data.quarterly = defaults.quarterly.clone();
    data.trends = defaults.trends.clone();
    data.report_catalog = defaults.report_catalog.clone();
    info!(
        "loaded {} rows from {} files in {}",
        report.total_rows - report.parse_errors,
        report.files,
        dir.display()
    );
    Ok((data, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use crate::types::{InterruptionType, SectionType};
    use std::fs;

    fn write_fixture(dir: &Path) {
        let files = [
            ("regions.csv", "id,name\nnorth,North Region\n"),
            ("circles.csv", "id,name,region_id\nthrissur,Thrissur Circle,north\n"),
            ("divisions.csv", "id,name,circle_id\nkunnamkulam,Kunnamkulam Division,thrissur\n"),
            ("sub_divisions.csv", "id,name,division_id\nkzk,Kunnamkulam Sub-Division,kunnamkulam\n"),
            (
                "sections.csv",
                "id,name,sub_division_id,type\nkzk-u1,Town 1,kzk,urban\nkzk-r1,Kecheri,kzk,rural\n",
            ),
            (
                "feeders.csv",
                "id,name,voltage,saidi,saifi,interruptions,consumers,loading\n\
                 FDR-1,Town,11kV,40,2,5,100,70\n\
                 FDR-2,Village,11kV,80,4,9,300,92\n\
                 FDR-3,Broken,11kV,not-a-number,1,1,1,1\n",
            ),
            ("feeder_sections.csv", "feeder_id,section_ids\nFDR-1,kzk-u1\nFDR-2, kzk-u1 ; kzk-r1\n"),
            (
                "dtrs.csv",
                "id,name,feeder_id,section_id,capacity,peak_load,avg_load,consumers,interruptions\n\
                 DTR-1,Market,FDR-1,kzk-u1,200,150,120,80,2\n",
            ),
            (
                "interruptions.csv",
                "id,date,time,feeder_id,section_id,duration,type,cause,consumers\n\
                 INT-1,2024-03-05,10:30,FDR-2,kzk-r1,45,Sustained,Storm,300\n",
            ),
        ];
        for (name, body) in files {
            fs::write(dir.join(name), body).unwrap();
        }
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());

        let (data, report) = load_dir(dir.path()).unwrap();
        assert_eq!(report.files, 9);
        assert_eq!(report.parse_errors, 1);
        assert_eq!(data.feeders.len(), 2);
        assert_eq!(data.sections[1].section_type, SectionType::Rural);
        assert_eq!(data.feeder_sections[1].section_ids, vec!["kzk-u1", "kzk-r1"]);
        assert_eq!(data.interruptions[0].kind, InterruptionType::Sustained);
        assert_eq!(data.dtrs[0].utilization(), 75.0);
        assert!(!data.quarterly.is_empty());
    }

    #[test]
    fn test_load_dir_rejects_dangling_parent() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());
        assert!(load_dir(dir.path()).is_ok());

        fs::write(
            dir.path().join("sections.csv"),
            "id,name,sub_division_id,type\nkzk-u1,Town 1,kzk,urban\nkzk-r1,Kecheri,nowhere,rural\n",
        )
        .unwrap();

        match load_dir(dir.path()) {
            Err(ReportError::DanglingReference {
                entity,
                id,
                target,
                missing,
            }) => {
                assert_eq!(entity, "section");
                assert_eq!(id, "kzk-r1");
                assert_eq!(target, "sub-division");
                assert_eq!(missing, "nowhere");
            }
            other => panic!("expected dangling reference, got {:?}", other.map(|(_, r)| r)),
        }
    }

    #[test]
    fn test_load_dir_with_unrelated_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let files = [
            ("regions.csv", "id,name\nwest,West Region\n"),
            ("circles.csv", "id,name,region_id\nharbour,Harbour Circle,west\n"),
            ("divisions.csv", "id,name,circle_id\ndocks,Docks Division,harbour\n"),
            ("sub_divisions.csv", "id,name,division_id\npier,Pier Sub-Division,docks\n"),
            ("sections.csv", "id,name,sub_division_id,type\npier-u1,Pier Town,pier,urban\n"),
            (
                "feeders.csv",
                "id,name,voltage,saidi,saifi,interruptions,consumers,loading\nFDR-P1,Pier,11kV,30,1.5,3,250,60\n",
            ),
            ("feeder_sections.csv", "feeder_id,section_ids\nFDR-P1,pier-u1\n"),
            (
                "dtrs.csv",
                "id,name,feeder_id,section_id,capacity,peak_load,avg_load,consumers,interruptions\n",
            ),
            (
                "interruptions.csv",
                "id,date,time,feeder_id,section_id,duration,type,cause,consumers\n",
            ),
        ];
        for (name, body) in files {
            fs::write(dir.path().join(name), body).unwrap();
        }

        let (data, report) = load_dir(dir.path()).unwrap();
        assert_eq!(report.parse_errors, 0);
        assert_eq!(data.circles.len(), 1);
        assert_eq!(data.quarterly, sample::dataset().quarterly);
        assert!(data.dtrs.is_empty());
    }

    #[test]
    fn test_load_dir_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_dir(dir.path()), Err(ReportError::Csv(_))));
    }
}

//! Read-only data access.
//!
//! Aggregation code only sees these traits, so the compiled-in sample and a
//! dataset loaded from CSV are interchangeable.

use crate::error::{ReportError, Result};
use crate::types::{
    Circle, Division, Dtr, Feeder, FeederSectionMapping, Interruption, MonthlyTrend,
    QuarterlyPerformance, Region, ReportEntry, Section, SubDivision,
};
use std::collections::HashSet;

/// The location hierarchy, region down to section.
pub trait CatalogRepository {
    fn regions(&self) -> &[Region];
    fn circles(&self) -> &[Circle];
    fn divisions(&self) -> &[Division];
    fn sub_divisions(&self) -> &[SubDivision];
    fn sections(&self) -> &[Section];
}

/// Network assets and the events recorded against them.
pub trait FeederRepository {
    fn feeders(&self) -> &[Feeder];
    fn feeder_sections(&self) -> &[FeederSectionMapping];
    fn dtrs(&self) -> &[Dtr];
    fn interruptions(&self) -> &[Interruption];
}

/// Regulator-facing figures that are reported rather than derived.
pub trait PerformanceRepository {
    fn quarterly(&self) -> &[QuarterlyPerformance];
    fn trends(&self) -> &[MonthlyTrend];
    fn report_catalog(&self) -> &[ReportEntry];
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub regions: Vec<Region>,
    pub circles: Vec<Circle>,
    pub divisions: Vec<Division>,
    pub sub_divisions: Vec<SubDivision>,
    pub sections: Vec<Section>,
    pub feeders: Vec<Feeder>,
    pub feeder_sections: Vec<FeederSectionMapping>,
    pub dtrs: Vec<Dtr>,
    pub interruptions: Vec<Interruption>,
    pub quarterly: Vec<QuarterlyPerformance>,
    pub trends: Vec<MonthlyTrend>,
    pub report_catalog: Vec<ReportEntry>,
}

impl CatalogRepository for Dataset {
    fn regions(&self) -> &[Region] {
        &self.regions
    }
    fn circles(&self) -> &[Circle] {
        &self.circles
    }
    fn divisions(&self) -> &[Division] {
        &self.divisions
    }
    fn sub_divisions(&self) -> &[SubDivision] {
        &self.sub_divisions
    }
    fn sections(&self) -> &[Section] {
        &self.sections
    }
}

impl FeederRepository for Dataset {
    fn feeders(&self) -> &[Feeder] {
        &self.feeders
    }
    fn feeder_sections(&self) -> &[FeederSectionMapping] {
        &self.feeder_sections
    }
    fn dtrs(&self) -> &[Dtr] {
        &self.dtrs
    }
    fn interruptions(&self) -> &[Interruption] {
        &self.interruptions
    }
}

impl PerformanceRepository for Dataset {
    fn quarterly(&self) -> &[QuarterlyPerformance] {
        &self.quarterly
    }
    fn trends(&self) -> &[MonthlyTrend] {
        &self.trends
    }
    fn report_catalog(&self) -> &[ReportEntry] {
        &self.report_catalog
    }
}

fn ids<'a, T>(items: &'a [T], id: impl Fn(&'a T) -> &'a str) -> HashSet<&'a str> {
    items.iter().map(id).collect()
}

fn check(
    known: &HashSet<&str>,
    entity: &'static str,
    id: &str,
    target: &'static str,
    missing: &str,
) -> Result<()> {
    if known.contains(missing) {
        return Ok(());
    }
    Err(ReportError::DanglingReference {
        entity,
        id: id.to_string(),
        target,
        missing: missing.to_string(),
    })
}

impl Dataset {
    /// Verify that every parent and asset reference resolves.
    ///
    /// Stops at the first dangling id.
    pub fn validate(&self) -> Result<()> {
        let regions = ids(&self.regions, |r| r.id.as_str());
        let circles = ids(&self.circles, |c| c.id.as_str());
        let divisions = ids(&self.divisions, |d| d.id.as_str());
        let sub_divisions = ids(&self.sub_divisions, |s| s.id.as_str());
        let sections = ids(&self.sections, |s| s.id.as_str());
        let feeders = ids(&self.feeders, |f| f.id.as_str());

        for c in &self.circles {
            check(&regions, "circle", &c.id, "region", &c.region_id)?;
        }
        for d in &self.divisions {
            check(&circles, "division", &d.id, "circle", &d.circle_id)?;
        }
        for s in &self.sub_divisions {
            check(&divisions, "sub-division", &s.id, "division", &s.division_id)?;
        }
        for s in &self.sections {
            check(&sub_divisions, "section", &s.id, "sub-division", &s.sub_division_id)?;
        }
        for m in &self.feeder_sections {
            check(&feeders, "feeder mapping", &m.feeder_id, "feeder", &m.feeder_id)?;
            for section_id in &m.section_ids {
                check(&sections, "feeder mapping", &m.feeder_id, "section", section_id)?;
            }
        }
        for d in &self.dtrs {
            check(&feeders, "DTR", &d.id, "feeder", &d.feeder_id)?;
            check(&sections, "DTR", &d.id, "section", &d.section_id)?;
        }
        for i in &self.interruptions {
            check(&feeders, "interruption", &i.id, "feeder", &i.feeder_id)?;
            check(&sections, "interruption", &i.id, "section", &i.section_id)?;
        }
        for q in &self.quarterly {
            check(&circles, "quarterly row", &q.division_id, "circle", &q.circle_id)?;
            check(&divisions, "quarterly row", &q.division_id, "division", &q.division_id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;

    #[test]
    fn test_sample_has_no_dangling_references() {
        assert!(sample::dataset().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_orphan_section() {
        let mut data = sample::dataset().clone();
        data.sections[0].sub_division_id = "nowhere".to_string();
        match data.validate() {
            Err(ReportError::DanglingReference { target, missing, .. }) => {
                assert_eq!(target, "sub-division");
                assert_eq!(missing, "nowhere");
            }
            other => panic!("expected dangling reference, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_reports_unmapped_feeder_id() {
        let mut data = sample::dataset().clone();
        data.feeder_sections.push(FeederSectionMapping {
            feeder_id: "FDR-GHOST".to_string(),
            section_ids: vec![],
        });
        assert!(matches!(
            data.validate(),
            Err(ReportError::DanglingReference { target: "feeder", .. })
        ));
    }
}

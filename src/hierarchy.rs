//! Parent to children resolution over the location hierarchy.
//!
//! Unknown ids are not an error: they simply match nothing.

use crate::filter::{FilterSelection, Level, Scope};
use crate::repository::CatalogRepository;
use crate::types::{Circle, Division, Section, SubDivision};
use std::collections::HashSet;

pub fn circles_of<'a, C>(catalog: &'a C, region: &Scope) -> Vec<&'a Circle>
where
    C: CatalogRepository + ?Sized,
{
    let region = region.as_id();
    catalog
        .circles()
        .iter()
        .filter(|c| region.map_or(true, |r| c.region_id == r))
        .collect()
}

pub fn divisions_of<'a, C>(catalog: &'a C, circle: &Scope) -> Vec<&'a Division>
where
    C: CatalogRepository + ?Sized,
{
    let circle = circle.as_id();
    catalog
        .divisions()
        .iter()
        .filter(|d| circle.map_or(true, |c| d.circle_id == c))
        .collect()
}

pub fn sub_divisions_of<'a, C>(catalog: &'a C, division: &Scope) -> Vec<&'a SubDivision>
where
    C: CatalogRepository + ?Sized,
{
    let division = division.as_id();
    catalog
        .sub_divisions()
        .iter()
        .filter(|s| division.map_or(true, |d| s.division_id == d))
        .collect()
}

pub fn sections_of<'a, C>(catalog: &'a C, sub_division: &Scope) -> Vec<&'a Section>
where
    C: CatalogRepository + ?Sized,
{
    let sub_division = sub_division.as_id();
    catalog
        .sections()
        .iter()
        .filter(|s| sub_division.map_or(true, |sd| s.sub_division_id == sd))
        .collect()
}

/// Ids of the direct children of `parent`, which sits at `level`.
fn child_ids<'a, C>(catalog: &'a C, level: Level, parent: &str) -> Vec<&'a str>
where
    C: CatalogRepository + ?Sized,
{
    match level {
        Level::Region => catalog
            .circles()
            .iter()
            .filter(|c| c.region_id == parent)
            .map(|c| c.id.as_str())
            .collect(),
        Level::Circle => catalog
            .divisions()
            .iter()
            .filter(|d| d.circle_id == parent)
            .map(|d| d.id.as_str())
            .collect(),
        Level::Division => catalog
            .sub_divisions()
            .iter()
            .filter(|s| s.division_id == parent)
            .map(|s| s.id.as_str())
            .collect(),
        Level::SubDivision => catalog
            .sections()
            .iter()
            .filter(|s| s.sub_division_id == parent)
            .map(|s| s.id.as_str())
            .collect(),
        Level::Section => Vec::new(),
    }
}

/// The leaf set implied by a selection.
///
/// A selected section stands for itself, whether or not the catalog knows it.
/// Otherwise the walk starts at the deepest selected level and descends to
/// sections; an unfiltered selection covers every section.
pub fn eligible_section_ids<'a, C>(catalog: &'a C, selection: &'a FilterSelection) -> HashSet<&'a str>
where
    C: CatalogRepository + ?Sized,
{
    let Some((level, id)) = selection.most_specific() else {
        return catalog.sections().iter().map(|s| s.id.as_str()).collect();
    };

    let mut frontier: Vec<&'a str> = vec![id];
    let mut current = level;
    while current != Level::Section {
        frontier = frontier
            .iter()
            .flat_map(|parent| child_ids(catalog, current, parent))
            .collect();
        match current.child() {
            Some(next) => current = next,
            None => break,
        }
    }
    frontier.into_iter().collect()
}

/// Catalog sections covered by a selection, in catalog order.
pub fn eligible_sections<'a, C>(catalog: &'a C, selection: &'a FilterSelection) -> Vec<&'a Section>
where
    C: CatalogRepository + ?Sized,
{
    let ids = eligible_section_ids(catalog, selection);
    catalog
        .sections()
        .iter()
        .filter(|s| ids.contains(s.id.as_str()))
        .collect()
}

/// Ids at `level` that sit under the deepest selection above it.
///
/// `None` when nothing above `level` is selected.
fn ids_under_nearest_ancestor<'a, C>(catalog: &'a C, selection: &FilterSelection, level: Level) -> Option<HashSet<&'a str>>
where
    C: CatalogRepository + ?Sized,
{
    let (ancestor, id) = Level::ALL
        .iter()
        .take_while(|l| **l != level)
        .filter_map(|l| selection.get(*l).as_id().map(|id| (*l, id)))
        .last()?;

    let mut frontier: Vec<&'a str> = child_ids(catalog, ancestor, id);
    let mut current = ancestor.child()?;
    while current != level {
        frontier = frontier
            .iter()
            .flat_map(|parent| child_ids(catalog, current, parent))
            .collect();
        current = current.child()?;
    }
    Some(frontier.into_iter().collect())
}

/// Options for one level given the selection above it, as `(id, name)`.
///
/// Skipped levels still narrow the list: with only a region selected, the
/// division options are the divisions of that region.
pub fn options_for<'a, C>(catalog: &'a C, selection: &FilterSelection, level: Level) -> Vec<(&'a str, &'a str)>
where
    C: CatalogRepository + ?Sized,
{
    let allowed = ids_under_nearest_ancestor(catalog, selection, level);
    let options: Vec<(&'a str, &'a str)> = match level {
        Level::Region => catalog
            .regions()
            .iter()
            .map(|r| (r.id.as_str(), r.name.as_str()))
            .collect(),
        Level::Circle => circles_of(catalog, &selection.region)
            .into_iter()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect(),
        Level::Division => divisions_of(catalog, &selection.circle)
            .into_iter()
            .map(|d| (d.id.as_str(), d.name.as_str()))
            .collect(),
        Level::SubDivision => sub_divisions_of(catalog, &selection.division)
            .into_iter()
            .map(|s| (s.id.as_str(), s.name.as_str()))
            .collect(),
        Level::Section => sections_of(catalog, &selection.sub_division)
            .into_iter()
            .map(|s| (s.id.as_str(), s.name.as_str()))
            .collect(),
    };
    match allowed {
        Some(ids) => options.into_iter().filter(|(id, _)| ids.contains(id)).collect(),
        None => options,
    }
}

/// Display name for an id at a level, if the catalog knows it.
pub fn name_of<'a, C>(catalog: &'a C, level: Level, id: &str) -> Option<&'a str>
where
    C: CatalogRepository + ?Sized,
{
    match level {
        Level::Region => catalog.regions().iter().find(|r| r.id == id).map(|r| r.name.as_str()),
        Level::Circle => catalog.circles().iter().find(|c| c.id == id).map(|c| c.name.as_str()),
        Level::Division => catalog.divisions().iter().find(|d| d.id == id).map(|d| d.name.as_str()),
        Level::SubDivision => catalog
            .sub_divisions()
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.as_str()),
        Level::Section => catalog.sections().iter().find(|s| s.id == id).map(|s| s.name.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;

    fn id(s: &str) -> Scope {
        Scope::from(s)
    }

    #[test]
    fn test_circles_of() {
        let data = sample::dataset();
        assert_eq!(circles_of(data, &Scope::All).len(), 6);
        let north: Vec<&str> = circles_of(data, &id("north")).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(north, vec!["thrissur", "palakkad"]);
    }

    #[test]
    fn test_children_of_unknown_parent_are_empty() {
        let data = sample::dataset();
        assert!(circles_of(data, &id("atlantis")).is_empty());
        assert!(divisions_of(data, &id("atlantis")).is_empty());
        assert!(sub_divisions_of(data, &id("atlantis")).is_empty());
        assert!(sections_of(data, &id("atlantis")).is_empty());
    }

    #[test]
    fn test_sections_of_sub_division() {
        let data = sample::dataset();
        let ids: Vec<&str> = sections_of(data, &id("kzk")).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["kzk-u1", "kzk-u2", "kzk-r1"]);
        assert_eq!(sections_of(data, &Scope::All).len(), data.sections.len());
    }

    #[test]
    fn test_eligible_sections_walk_down_from_division() {
        let data = sample::dataset();
        let mut sel = FilterSelection::new();
        sel.set_division("kunnamkulam");
        let ids: Vec<&str> = eligible_sections(data, &sel).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["kzk-u1", "kzk-u2", "kzk-r1", "tcr-u1"]);
    }

    #[test]
    fn test_eligible_sections_for_region() {
        let data = sample::dataset();
        let mut sel = FilterSelection::new();
        sel.set_region("south");
        let ids = eligible_section_ids(data, &sel);
        let expected: HashSet<&str> = ["kzm-u1", "nyk-r1", "pnr-x1", "kgp-r1"].into_iter().collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_eligible_section_is_exact_when_section_selected() {
        let data = sample::dataset();
        let mut sel = FilterSelection::new();
        sel.set_section("kzk-u1");
        let ids = eligible_section_ids(data, &sel);
        assert_eq!(ids.len(), 1);
        assert!(ids.contains("kzk-u1"));
    }

    #[test]
    fn test_unfiltered_selection_covers_every_section() {
        let data = sample::dataset();
        let sel = FilterSelection::new();
        assert_eq!(eligible_sections(data, &sel).len(), data.sections.len());
    }

    #[test]
    fn test_options_follow_parent_selection() {
        let data = sample::dataset();
        let mut sel = FilterSelection::new();
        sel.set_region("central");
        let circles: Vec<&str> = options_for(data, &sel, Level::Circle).iter().map(|(id, _)| *id).collect();
        assert_eq!(circles, vec!["ernakulam", "kottayam"]);
        assert_eq!(name_of(data, Level::Circle, "kottayam"), Some("Kottayam Circle"));
        assert_eq!(name_of(data, Level::Circle, "nowhere"), None);
    }

    #[test]
    fn test_options_narrow_through_skipped_levels() {
        let data = sample::dataset();
        let mut sel = FilterSelection::new();
        sel.set_region("north");
        let divisions: Vec<&str> = options_for(data, &sel, Level::Division).iter().map(|(id, _)| *id).collect();
        assert_eq!(divisions, vec!["kunnamkulam", "chalakudy", "ottapalam", "mannarkkad"]);

        let subs: Vec<&str> = options_for(data, &sel, Level::SubDivision).iter().map(|(id, _)| *id).collect();
        assert_eq!(subs, vec!["kzk", "tcr", "clk", "otp", "mnk"]);

        sel.set_circle("palakkad");
        let sections: Vec<&str> = options_for(data, &sel, Level::Section).iter().map(|(id, _)| *id).collect();
        assert_eq!(sections, vec!["otp-r1", "otp-x1", "mnk-x1"]);
    }

    #[test]
    fn test_region_options_ignore_selection() {
        let data = sample::dataset();
        let mut sel = FilterSelection::new();
        sel.set_region("north");
        assert_eq!(options_for(data, &sel, Level::Region).len(), data.regions.len());
    }
}

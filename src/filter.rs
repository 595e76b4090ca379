//! Cascading location filter.
//!
//! A `FilterSelection` holds one `Scope` per hierarchy level. Setting any
//! level resets every level below it to `Scope::All`, so a selection is
//! always a valid path from the top of the tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Either every entity at a level, or one entity by id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Scope {
    #[default]
    All,
    Id(String),
}

impl Scope {
    pub fn as_id(&self) -> Option<&str> {
        match self {
            Scope::All => None,
            Scope::Id(id) => Some(id.as_str()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Scope::All)
    }
}

impl From<&str> for Scope {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Scope::All
        } else {
            Scope::Id(s.to_string())
        }
    }
}

impl From<String> for Scope {
    fn from(s: String) -> Self {
        Scope::from(s.as_str())
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::All => "all".to_string(),
            Scope::Id(id) => id,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => f.write_str("all"),
            Scope::Id(id) => f.write_str(id),
        }
    }
}

/// Hierarchy levels, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Region,
    Circle,
    Division,
    SubDivision,
    Section,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Region,
        Level::Circle,
        Level::Division,
        Level::SubDivision,
        Level::Section,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Level::Region => "Region",
            Level::Circle => "Circle",
            Level::Division => "Division",
            Level::SubDivision => "Sub-Division",
            Level::Section => "Section",
        }
    }

    pub fn child(&self) -> Option<Level> {
        match self {
            Level::Region => Some(Level::Circle),
            Level::Circle => Some(Level::Division),
            Level::Division => Some(Level::SubDivision),
            Level::SubDivision => Some(Level::Section),
            Level::Section => None,
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "region" => Ok(Level::Region),
            "circle" => Ok(Level::Circle),
            "division" => Ok(Level::Division),
            "subdivision" => Ok(Level::SubDivision),
            "section" => Ok(Level::Section),
            other => Err(format!("unknown level '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    pub region: Scope,
    pub circle: Scope,
    pub division: Scope,
    pub sub_division: Scope,
    pub section: Scope,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, level: Level) -> &Scope {
        match level {
            Level::Region => &self.region,
            Level::Circle => &self.circle,
            Level::Division => &self.division,
            Level::SubDivision => &self.sub_division,
            Level::Section => &self.section,
        }
    }

    fn slot(&mut self, level: Level) -> &mut Scope {
        match level {
            Level::Region => &mut self.region,
            Level::Circle => &mut self.circle,
            Level::Division => &mut self.division,
            Level::SubDivision => &mut self.sub_division,
            Level::Section => &mut self.section,
        }
    }

    /// Set one level and reset all of its descendants to `all`.
    pub fn set(&mut self, level: Level, scope: impl Into<Scope>) {
        *self.slot(level) = scope.into();
        let mut next = level.child();
        while let Some(child) = next {
            *self.slot(child) = Scope::All;
            next = child.child();
        }
    }

    pub fn set_region(&mut self, scope: impl Into<Scope>) {
        self.set(Level::Region, scope);
    }

    pub fn set_circle(&mut self, scope: impl Into<Scope>) {
        self.set(Level::Circle, scope);
    }

    pub fn set_division(&mut self, scope: impl Into<Scope>) {
        self.set(Level::Division, scope);
    }

    pub fn set_sub_division(&mut self, scope: impl Into<Scope>) {
        self.set(Level::SubDivision, scope);
    }

    pub fn set_section(&mut self, scope: impl Into<Scope>) {
        self.set(Level::Section, scope);
    }

    /// Back to `all` everywhere.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_unfiltered(&self) -> bool {
        Level::ALL.iter().all(|l| self.get(*l).is_all())
    }

    /// The deepest level holding a specific id, with that id.
    pub fn most_specific(&self) -> Option<(Level, &str)> {
        Level::ALL
            .iter()
            .rev()
            .find_map(|l| self.get(*l).as_id().map(|id| (*l, id)))
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = Level::ALL
            .iter()
            .map(|l| format!("{}={}", l.label(), self.get(*l)))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_from_str() {
        assert_eq!(Scope::from("all"), Scope::All);
        assert_eq!(Scope::from("ALL"), Scope::All);
        assert_eq!(Scope::from(""), Scope::All);
        assert_eq!(Scope::from("north"), Scope::Id("north".to_string()));
    }

    #[test]
    fn test_region_change_resets_descendants() {
        let mut sel = FilterSelection::new();
        sel.set_region("north");
        sel.set_circle("thrissur");
        sel.set_division("kunnamkulam");
        sel.set_sub_division("kzk");
        sel.set_section("kzk-u1");

        sel.set_region("south");

        assert_eq!(sel.region, Scope::Id("south".to_string()));
        assert!(sel.circle.is_all());
        assert!(sel.division.is_all());
        assert!(sel.sub_division.is_all());
        assert!(sel.section.is_all());
    }

    #[test]
    fn test_mid_level_change_keeps_ancestors() {
        let mut sel = FilterSelection::new();
        sel.set_region("north");
        sel.set_circle("thrissur");
        sel.set_division("kunnamkulam");
        sel.set_section("kzk-u1");

        sel.set_circle("all");

        assert_eq!(sel.region, Scope::Id("north".to_string()));
        assert!(sel.circle.is_all());
        assert!(sel.division.is_all());
        assert!(sel.section.is_all());
    }

    #[test]
    fn test_most_specific() {
        let mut sel = FilterSelection::new();
        assert_eq!(sel.most_specific(), None);
        assert!(sel.is_unfiltered());

        sel.set_region("central");
        sel.set_circle("ernakulam");
        assert_eq!(sel.most_specific(), Some((Level::Circle, "ernakulam")));

        sel.set_section("pbr-u1");
        assert_eq!(sel.most_specific(), Some((Level::Section, "pbr-u1")));
    }

    #[test]
    fn test_reset() {
        let mut sel = FilterSelection::new();
        sel.set_region("north");
        sel.set_circle("palakkad");
        sel.reset();
        assert_eq!(sel, FilterSelection::default());
    }

    #[test]
    fn test_selection_serializes_as_plain_strings() {
        let mut sel = FilterSelection::new();
        sel.set_region("north");
        let json = serde_json::to_string(&sel).unwrap();
        assert!(json.contains("\"region\":\"north\""));
        assert!(json.contains("\"section\":\"all\""));

        let back: FilterSelection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sel);
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("sub-division".parse::<Level>(), Ok(Level::SubDivision));
        assert_eq!("SubDivision".parse::<Level>(), Ok(Level::SubDivision));
        assert_eq!("section".parse::<Level>(), Ok(Level::Section));
        assert!("feeder".parse::<Level>().is_err());
    }
}

//! Mock login and the role to view access policy.
//!
//! There is no credential store: any non-empty username and password with a
//! known role is accepted. A real deployment replaces `login` with a call to
//! an authentication service.

use crate::error::{ReportError, Result};
use crate::filter::FilterSelection;
use std::fmt;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Role {
    Section,
    #[value(name = "subdivision")]
    SubDivision,
    Division,
    Circle,
    Region,
    Central,
    Public,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Section,
        Role::SubDivision,
        Role::Division,
        Role::Circle,
        Role::Region,
        Role::Central,
        Role::Public,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Role::Section => "section",
            Role::SubDivision => "subdivision",
            Role::Division => "division",
            Role::Circle => "circle",
            Role::Region => "region",
            Role::Central => "central",
            Role::Public => "public",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Role::Section => "Section Officer",
            Role::SubDivision => "Subdivision Officer",
            Role::Division => "Division Officer",
            Role::Circle => "Circle Officer",
            Role::Region => "Regional Officer",
            Role::Central => "Central (DPMD/Directorate)",
            Role::Public => "Public Access",
        }
    }

    pub fn access(&self) -> &'static str {
        match self {
            Role::Section => "Section-level reports",
            Role::SubDivision => "Subdivision aggregated statistics",
            Role::Division => "Division-level reports",
            Role::Circle => "Circle summary reports",
            Role::Region => "Regional compliance reports",
            Role::Central => "Full dashboard and analytics",
            Role::Public => "Limited view - Regional summaries only",
        }
    }

    /// Views this role may not open.
    fn denied(&self) -> &'static [View] {
        match self {
            Role::Public => &[View::Feeders, View::Dtr, View::Interruptions, View::Quarterly],
            Role::Section => &[View::Quarterly],
            _ => &[],
        }
    }
}

impl FromStr for Role {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Role::ALL
            .iter()
            .copied()
            .find(|r| r.id().eq_ignore_ascii_case(s))
            .ok_or(ReportError::LoginRejected)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum View {
    Dashboard,
    Feeders,
    Dtr,
    Interruptions,
    Quarterly,
    Reports,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Dashboard,
        View::Feeders,
        View::Dtr,
        View::Interruptions,
        View::Quarterly,
        View::Reports,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Feeders => "feeders",
            View::Dtr => "dtr",
            View::Interruptions => "interruptions",
            View::Quarterly => "quarterly",
            View::Reports => "reports",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Feeders => "Feeder Ranking",
            View::Dtr => "DTR Analysis",
            View::Interruptions => "Interruption Report",
            View::Quarterly => "Quarterly/Annual Report",
            View::Reports => "Report Catalog",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

pub fn has_access(role: Role, view: View) -> bool {
    !role.denied().contains(&view)
}

/// An authenticated user and their working filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub username: String,
    pub role: Role,
    pub selection: FilterSelection,
}

impl Session {
    pub fn can_open(&self, view: View) -> bool {
        has_access(self.role, view)
    }

    /// Fail with `AccessDenied` unless the role may open `view`.
    pub fn require(&self, view: View) -> Result<()> {
        if self.can_open(view) {
            return Ok(());
        }
        Err(ReportError::AccessDenied {
            role: self.role.id().to_string(),
            view: view.id().to_string(),
        })
    }

    /// End the session; the filter goes back to its defaults with it.
    pub fn logout(mut self) -> FilterSelection {
        info!("{} logged out", self.username);
        self.selection.reset();
        self.selection
    }
}

/// Accepts any non-empty username and password with a known role id.
pub fn login(username: &str, password: &str, role: &str) -> Result<Session> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() || role.trim().is_empty() {
        return Err(ReportError::LoginRejected);
    }
    let role: Role = role.parse()?;
    info!("{} logged in as {}", username, role.name());
    Ok(Session {
        username: username.to_string(),
        role,
        selection: FilterSelection::new(),
    })
}

//! Dashboard page selection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::mount::ViewMount;
use super::provider::StoreProvider;
use super::stores::{LineupState, TeamsState};
use crate::domain::{DomainError, Lineup, RankingEntry, SessionStatus, TeamId};

/// Which dashboard view is showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivePage {
    #[default]
    #[serde(rename = "home")]
    Home,
    #[serde(rename = "your-team")]
    YourTeam,
    #[serde(rename = "streaming-optimization")]
    LineupGeneration,
}

impl ActivePage {
    pub const ALL: [ActivePage; 3] = [Self::Home, Self::YourTeam, Self::LineupGeneration];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::YourTeam => "your-team",
            Self::LineupGeneration => "streaming-optimization",
        }
    }
}

impl fmt::Display for ActivePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivePage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|page| page.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Unknown page '{}'", s)))
    }
}

/// What a page renders, read from the stores at one instant
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    Home {
        status: SessionStatus,
    },
    YourTeam {
        teams: TeamsState,
        lineups: LineupState,
    },
    LineupGeneration {
        selected_team_id: Option<TeamId>,
        active: Option<Lineup>,
        rankings: Vec<RankingEntry>,
    },
}

/// Navigation state only. Business data lives in the stores.
#[derive(Debug)]
pub struct Dashboard {
    active: ActivePage,
    mount: ViewMount,
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            active: ActivePage::default(),
            mount: ViewMount::new(),
        }
    }

    pub fn active_page(&self) -> ActivePage {
        self.active
    }

    /// Mount guard of the page currently showing
    pub fn mount(&self) -> &ViewMount {
        &self.mount
    }

    /// Switch page. The previous page is unmounted, so its pending requests
    /// can no longer write to the stores.
    pub fn select(&mut self, page: ActivePage) -> ViewMount {
        if page != self.active {
            self.mount.unmount();
            self.mount = ViewMount::new();
            self.active = page;
            debug!(page = %page, "Dashboard page selected");
        }

        self.mount.clone()
    }

    /// Switch page and load what it shows
    pub async fn open(
        &mut self,
        page: ActivePage,
        stores: &StoreProvider,
    ) -> Result<DashboardView, DomainError> {
        let mount = self.select(page);

        match page {
            ActivePage::Home => {}
            ActivePage::YourTeam => {
                stores.teams().load_teams(&mount).await?;
                stores.lineups().load_lineups(&mount).await?;
            }
            ActivePage::LineupGeneration => {
                stores.teams().load_teams(&mount).await?;
                stores.rankings().load_rankings(&mount).await?;
            }
        }

        Ok(self.view(stores))
    }

    /// Render the active page against current store state
    pub fn view(&self, stores: &StoreProvider) -> DashboardView {
        match self.active {
            ActivePage::Home => DashboardView::Home {
                status: stores.session().session().status(),
            },
            ActivePage::YourTeam => DashboardView::YourTeam {
                teams: stores.teams().snapshot(),
                lineups: stores.lineups().snapshot(),
            },
            ActivePage::LineupGeneration => DashboardView::LineupGeneration {
                selected_team_id: stores.teams().selected_team_id(),
                active: stores.lineups().active(),
                rankings: stores.rankings().entries(),
            },
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

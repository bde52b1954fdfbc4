//! Backend data service endpoints

/// HTTP verbs used against the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every call the gateway can make to the backend data service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendRoute {
    ListLineups,
    GenerateLineup,
    SaveLineup,
    ListTeams,
    ListRankings,
    CreateAccount,
    Login,
}

impl BackendRoute {
    pub const ALL: [BackendRoute; 7] = [
        Self::ListLineups,
        Self::GenerateLineup,
        Self::SaveLineup,
        Self::ListTeams,
        Self::ListRankings,
        Self::CreateAccount,
        Self::Login,
    ];

    pub fn method(&self) -> HttpMethod {
        match self {
            Self::ListLineups | Self::ListTeams | Self::ListRankings => HttpMethod::Get,
            Self::GenerateLineup | Self::CreateAccount | Self::Login => HttpMethod::Post,
            Self::SaveLineup => HttpMethod::Put,
        }
    }

    /// Path relative to the backend base URL
    pub fn path(&self) -> &'static str {
        match self {
            Self::ListLineups => "/lineups",
            Self::GenerateLineup => "/lineups/generate",
            Self::SaveLineup => "/lineups/save",
            Self::ListTeams => "/teams",
            Self::ListRankings => "/rankings",
            Self::CreateAccount => "/users/create",
            Self::Login => "/users/login",
        }
    }

    /// Whether a bearer token must accompany the call
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::CreateAccount | Self::Login)
    }

    /// Stable label for logs and metrics
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListLineups => "list_lineups",
            Self::GenerateLineup => "generate_lineup",
            Self::SaveLineup => "save_lineup",
            Self::ListTeams => "list_teams",
            Self::ListRankings => "list_rankings",
            Self::CreateAccount => "create_account",
            Self::Login => "login",
        }
    }
}

impl std::fmt::Display for BackendRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

//! Cricket endpoint catalog over the fetch layer
//!
//! Mirrors the upstream provider's resource tree and assigns each resource
//! a TTL class chosen to keep a full day of traffic under the call budget:
//! live data turns over in minutes, schedules and news are stable for a
//! day, and rankings or career stats for a week.

use std::sync::Arc;
use std::time::Duration;

use crate::config::FeedConfig;
use crate::fetch::FetchOrchestrator;
use crate::upstream::{HttpUpstream, Upstream, UpstreamError};

/// TTL for live data: scores, commentary, overs
pub const TTL_LIVE: Duration = Duration::from_secs(10 * 60);

/// TTL for data stable within a day: schedules, results, news
pub const TTL_DAILY: Duration = Duration::from_secs(24 * 60 * 60);

/// TTL for data stable within a week: rankings, rosters, career stats
pub const TTL_WEEKLY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

const DEFAULT_BASE_URL: &str = "https://cricbuzz-cricket.p.rapidapi.com";

/// High-level cricket data API
///
/// Every method resolves to one `fetch` through the quota-guarded layer and
/// returns a raw JSON body; upstream failures come back as degraded bodies,
/// never as errors.
pub struct CricketApi<U: Upstream> {
    fetcher: Arc<FetchOrchestrator<U>>,
    base_url: String,
}

impl CricketApi<HttpUpstream> {
    /// Builds the API over a real HTTP upstream
    pub fn from_config(config: &FeedConfig) -> Result<Self, UpstreamError> {
        Ok(Self::new(Arc::new(FetchOrchestrator::from_config(config)?)))
    }
}

impl<U: Upstream> CricketApi<U> {
    /// Wraps an existing orchestrator
    pub fn new(fetcher: Arc<FetchOrchestrator<U>>) -> Self {
        Self {
            fetcher,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Overrides the provider base URL (for testing)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch(&self, path: &str, ttl: Duration) -> String {
        let url = format!("{}{}", self.base_url, path);
        self.fetcher.fetch(&url, ttl).await
    }

    /// Home page index: featured matches, news, videos
    pub async fn home_index(&self) -> String {
        self.fetch("/home/v1/index", TTL_DAILY).await
    }

    /// Matches currently in play
    pub async fn live_matches(&self) -> String {
        self.fetch("/matches/v1/live", TTL_LIVE).await
    }

    /// Scheduled matches
    pub async fn upcoming_matches(&self) -> String {
        self.fetch("/matches/v1/upcoming", TTL_DAILY).await
    }

    /// Recently completed matches
    pub async fn recent_matches(&self) -> String {
        self.fetch("/matches/v1/recent", TTL_DAILY).await
    }

    /// Match center overview
    pub async fn match_info(&self, match_id: &str) -> String {
        self.fetch(&format!("/mcenter/v1/{match_id}"), TTL_LIVE).await
    }

    /// Full scorecard
    pub async fn match_scorecard(&self, match_id: &str) -> String {
        self.fetch(&format!("/mcenter/v1/{match_id}/scard"), TTL_LIVE).await
    }

    /// Ball-by-ball commentary
    pub async fn match_commentary(&self, match_id: &str) -> String {
        self.fetch(&format!("/mcenter/v1/{match_id}/comm"), TTL_LIVE).await
    }

    /// Commentary for completed innings
    pub async fn match_historical_commentary(&self, match_id: &str) -> String {
        self.fetch(&format!("/mcenter/v1/{match_id}/hcomm"), TTL_LIVE).await
    }

    /// Playing squads for both sides
    pub async fn match_squads(&self, match_id: &str) -> String {
        self.fetch(&format!("/mcenter/v1/{match_id}/teams"), TTL_DAILY).await
    }

    /// Over-by-over summary
    pub async fn match_overs(&self, match_id: &str) -> String {
        self.fetch(&format!("/mcenter/v1/{match_id}/overs"), TTL_LIVE).await
    }

    /// Match highlights
    pub async fn match_highlights(&self, match_id: &str) -> String {
        self.fetch(&format!("/mcenter/v1/{match_id}/hlights"), TTL_DAILY).await
    }

    /// Condensed "leanback" match view
    pub async fn match_leanback(&self, match_id: &str) -> String {
        self.fetch(&format!("/mcenter/v1/{match_id}/leanback"), TTL_DAILY).await
    }

    /// Condensed view for completed matches
    pub async fn match_historical_leanback(&self, match_id: &str) -> String {
        self.fetch(&format!("/mcenter/v1/{match_id}/hleanback"), TTL_DAILY).await
    }

    /// Team rankings for a format, refreshed weekly upstream
    pub async fn rankings(&self, format: &str, women: bool) -> String {
        let women = if women { "1" } else { "0" };
        self.fetch(
            &format!("/stats/v1/rankings/teams?formatType={format}&isWomen={women}"),
            TTL_WEEKLY,
        )
        .await
    }

    /// Team list for one category, or all four combined
    ///
    /// `kind` is one of `international`, `league`, `domestic`, `women`, or
    /// `all` (also the default for an empty string). The combined form
    /// fetches each category through the cache like any other resource and
    /// embeds the four bodies in one JSON object.
    pub async fn teams(&self, kind: &str) -> String {
        let kind = kind.trim().to_lowercase();
        if kind.is_empty() || kind == "all" {
            let international = self.fetch("/teams/v1/international", TTL_WEEKLY).await;
            let league = self.fetch("/teams/v1/league", TTL_WEEKLY).await;
            let domestic = self.fetch("/teams/v1/domestic", TTL_WEEKLY).await;
            let women = self.fetch("/teams/v1/women", TTL_WEEKLY).await;

            return format!(
                "{{\"international\":{},\"league\":{},\"domestic\":{},\"women\":{}}}",
                safe_json(&international),
                safe_json(&league),
                safe_json(&domestic),
                safe_json(&women)
            );
        }

        self.fetch(&format!("/teams/v1/{kind}"), TTL_WEEKLY).await
    }

    /// Upcoming fixtures for a team
    pub async fn team_schedule(&self, team_id: &str) -> String {
        self.fetch(&format!("/teams/v1/{team_id}/schedule"), TTL_DAILY).await
    }

    /// Recent results for a team
    pub async fn team_results(&self, team_id: &str) -> String {
        self.fetch(&format!("/teams/v1/{team_id}/results"), TTL_DAILY).await
    }

    /// Current roster for a team
    pub async fn team_players(&self, team_id: &str) -> String {
        self.fetch(&format!("/teams/v1/{team_id}/players"), TTL_WEEKLY).await
    }

    /// Aggregate statistics for a team
    pub async fn team_stats(&self, team_id: &str) -> String {
        self.fetch(&format!("/stats/v1/team/{team_id}"), TTL_WEEKLY).await
    }

    /// News tagged with a team
    pub async fn team_news(&self, team_id: &str) -> String {
        self.fetch(&format!("/news/v1/team/{team_id}"), TTL_DAILY).await
    }

    /// Player profile
    pub async fn player_info(&self, player_id: &str) -> String {
        self.fetch(&format!("/stats/v1/player/{player_id}"), TTL_WEEKLY).await
    }

    /// Batting record
    pub async fn player_batting(&self, player_id: &str) -> String {
        self.fetch(&format!("/stats/v1/player/{player_id}/batting"), TTL_WEEKLY).await
    }

    /// Bowling record
    pub async fn player_bowling(&self, player_id: &str) -> String {
        self.fetch(&format!("/stats/v1/player/{player_id}/bowling"), TTL_WEEKLY).await
    }

    /// Career summary
    pub async fn player_career(&self, player_id: &str) -> String {
        self.fetch(&format!("/stats/v1/player/{player_id}/career"), TTL_WEEKLY).await
    }

    /// Venue profile
    pub async fn venue_info(&self, venue_id: &str) -> String {
        self.fetch(&format!("/venues/v1/{venue_id}"), TTL_WEEKLY).await
    }

    /// Matches played at a venue
    pub async fn venue_matches(&self, venue_id: &str) -> String {
        self.fetch(&format!("/venues/v1/{venue_id}/matches"), TTL_DAILY).await
    }

    /// Aggregate statistics for a venue
    pub async fn venue_stats(&self, venue_id: &str) -> String {
        self.fetch(&format!("/stats/v1/venue/{venue_id}"), TTL_WEEKLY).await
    }

    /// News index
    pub async fn news(&self) -> String {
        self.fetch("/news/v1/index", TTL_DAILY).await
    }

    /// A single news story
    pub async fn news_detail(&self, news_id: &str) -> String {
        self.fetch(&format!("/news/v1/detail/{news_id}"), TTL_WEEKLY).await
    }
}

/// Makes a raw body safe to embed inside a JSON object
///
/// Bodies that already look like JSON are embedded as-is; anything else
/// (including synthesized plain-text failures) is wrapped and escaped, and
/// an empty body becomes an empty object.
fn safe_json(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "{}".to_string();
    }
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return trimmed.to_string();
    }
    serde_json::json!({ "raw": trimmed }).to_string()
}

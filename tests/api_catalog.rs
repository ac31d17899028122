//! Integration tests for the cricket endpoint catalog

mod common;

use std::sync::Arc;

use cricfeed::api::CricketApi;
use cricfeed::fetch::FetchOrchestrator;
use serde_json::Value;

use common::{Script, ScriptedUpstream};

const BASE: &str = "https://unit.test";

fn api(upstream: &ScriptedUpstream, limit: u32) -> CricketApi<ScriptedUpstream> {
    CricketApi::new(Arc::new(FetchOrchestrator::new(upstream.clone(), limit)))
        .with_base_url(BASE)
}

#[tokio::test]
async fn test_endpoints_resolve_through_the_cache() {
    let upstream = ScriptedUpstream::new();
    let api = api(&upstream, 100);

    let body = api.live_matches().await;
    assert!(body.contains("/matches/v1/live"), "unexpected resource: {body}");

    // Second read inside the TTL window is a cache hit.
    api.live_matches().await;
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_match_center_paths_embed_the_match_id() {
    let upstream = ScriptedUpstream::new();
    let api = api(&upstream, 100);

    let scorecard = api.match_scorecard("40381").await;
    assert!(scorecard.contains("/mcenter/v1/40381/scard"));

    let squads = api.match_squads("40381").await;
    assert!(squads.contains("/mcenter/v1/40381/teams"));
}

#[tokio::test]
async fn test_rankings_query_encodes_format_and_women_flag() {
    let upstream = ScriptedUpstream::new();
    let api = api(&upstream, 100);

    let body = api.rankings("odi", true).await;
    assert!(body.contains("formatType=odi"));
    assert!(body.contains("isWomen=1"));
}

#[tokio::test]
async fn test_teams_all_aggregates_four_categories() {
    let upstream = ScriptedUpstream::new();
    upstream.serve(&format!("{BASE}/teams/v1/international"), "{\"list\":[1]}");
    upstream.serve(&format!("{BASE}/teams/v1/league"), "{\"list\":[2]}");
    upstream.serve(&format!("{BASE}/teams/v1/domestic"), "{\"list\":[3]}");
    upstream.serve(&format!("{BASE}/teams/v1/women"), "{\"list\":[4]}");
    let api = api(&upstream, 100);

    let combined: Value =
        serde_json::from_str(&api.teams("all").await).expect("aggregate should be valid JSON");

    assert_eq!(combined["international"]["list"][0], Value::from(1));
    assert_eq!(combined["league"]["list"][0], Value::from(2));
    assert_eq!(combined["domestic"]["list"][0], Value::from(3));
    assert_eq!(combined["women"]["list"][0], Value::from(4));
    assert_eq!(upstream.calls(), 4);
}

#[tokio::test]
async fn test_teams_kind_is_normalized() {
    let upstream = ScriptedUpstream::new();
    let api = api(&upstream, 100);

    let body = api.teams("  International ").await;
    assert!(body.contains("/teams/v1/international"));

    // Empty kind means the combined view.
    let combined: Value =
        serde_json::from_str(&api.teams("").await).expect("aggregate should be valid JSON");
    assert!(combined.get("domestic").is_some());
}

#[tokio::test]
async fn test_teams_all_stays_valid_json_when_a_category_degrades() {
    let upstream = ScriptedUpstream::new();
    upstream.script(&format!("{BASE}/teams/v1/league"), Script::Down);
    let api = api(&upstream, 100);

    let combined: Value =
        serde_json::from_str(&api.teams("all").await).expect("aggregate should stay valid JSON");

    // The degraded category carries the synthesized failure payload.
    assert_eq!(combined["league"]["error"], Value::Bool(true));
    assert_eq!(combined["league"]["status"], Value::from(500));
    // The healthy categories are unaffected.
    assert!(combined["international"]["url"].as_str().is_some());
}

#[tokio::test]
async fn test_live_and_weekly_resources_share_one_budget() {
    let upstream = ScriptedUpstream::new();
    let api = api(&upstream, 2);

    api.live_matches().await;
    api.player_career("576").await;

    // Budget exhausted: a cold resource gets the 429 payload.
    let body: Value =
        serde_json::from_str(&api.news().await).expect("429 payload should be JSON");
    assert_eq!(body["status"], Value::from(429));
    assert_eq!(upstream.calls(), 2);
}

//! External video-search provider boundary.
//!
//! The reconciler only sees the [`VideoSearchProvider`] trait and a named
//! candidate-selection policy; the shipped implementation scrapes the
//! YouTube results page and walks its embedded `ytInitialData` JSON.

use std::io::Read;
use std::time::Duration;

use log::debug;
use serde_json::Value;

use crate::config::SearchConfig;
use crate::link_generators::encode_query_phrase;

const YOUTUBE_RESULTS_URL: &str = "https://www.youtube.com/results";
const INITIAL_DATA_PREFIX: &str = "var ytInitialData = ";
const INITIAL_DATA_SUFFIX: &str = ";</script>";

/// One search result; not every result exposes a playable video identifier
/// (channel and playlist results do not).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCandidate {
    pub video_id: Option<String>,
    pub title: String,
}

/// Opaque external search service consumed by the reconciler.
pub trait VideoSearchProvider {
    /// Returns the provider's ordered candidate list for a free-text query.
    /// The list may be empty; transport and response errors collapse into
    /// one failure signal per query.
    fn search(&self, query: &str) -> Result<Vec<VideoCandidate>, String>;
}

/// Policy deciding which candidate a search resolves to.
pub type CandidateSelector = fn(&[VideoCandidate]) -> Option<&VideoCandidate>;

/// Default policy: the first candidate exposing a video identifier.
/// Best-effort match; candidates without an identifier are skipped.
pub fn first_with_video_id(candidates: &[VideoCandidate]) -> Option<&VideoCandidate> {
    candidates.iter().find(|candidate| {
        candidate
            .video_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    })
}

/// YouTube results-page provider backed by `ureq`.
pub struct YoutubeSearchProvider {
    http_client: ureq::Agent,
    user_agent: String,
}

impl YoutubeSearchProvider {
    /// Creates a provider with timeouts and user agent from config.
    pub fn new(search_config: &SearchConfig) -> Self {
        let http_client = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_millis(search_config.timeout_connect_ms))
            .timeout_read(Duration::from_millis(search_config.timeout_read_ms))
            // Searches are bodyless GETs; the write side shares the read budget.
            .timeout_write(Duration::from_millis(search_config.timeout_read_ms))
            .build();
        Self {
            http_client,
            user_agent: search_config.user_agent.clone(),
        }
    }

    fn fetch_results_page(&self, query: &str) -> Result<String, String> {
        let url = format!(
            "{YOUTUBE_RESULTS_URL}?search_query={}",
            encode_query_phrase(query)
        );
        debug!("Video search request: {}", url);
        let response = self
            .http_client
            .get(&url)
            .set("User-Agent", &self.user_agent)
            .set("Accept-Language", "en-US,en;q=0.9")
            .call()
            .map_err(|err| format!("Video search request failed: {err}"))?;
        let mut body = String::new();
        response
            .into_reader()
            .read_to_string(&mut body)
            .map_err(|err| format!("Failed to read video search response: {err}"))?;
        Ok(body)
    }
}

impl VideoSearchProvider for YoutubeSearchProvider {
    fn search(&self, query: &str) -> Result<Vec<VideoCandidate>, String> {
        let body = self.fetch_results_page(query)?;
        let candidates = parse_search_candidates(&body)?;
        debug!(
            "Video search returned {} candidates for query '{}'",
            candidates.len(),
            query
        );
        Ok(candidates)
    }
}

/// Extracts the ordered candidate list from a results-page body.
pub fn parse_search_candidates(body: &str) -> Result<Vec<VideoCandidate>, String> {
    let payload = extract_initial_data(body)?;
    let sections = match payload
        .get("contents")
        .and_then(|value| value.get("twoColumnSearchResultsRenderer"))
        .and_then(|value| value.get("primaryContents"))
        .and_then(|value| value.get("sectionListRenderer"))
        .and_then(|value| value.get("contents"))
        .and_then(Value::as_array)
    {
        Some(sections) => sections,
        None => return Ok(Vec::new()),
    };

    let mut candidates = Vec::new();
    for section in sections {
        let items = match section
            .get("itemSectionRenderer")
            .and_then(|value| value.get("contents"))
            .and_then(Value::as_array)
        {
            Some(items) => items,
            None => continue,
        };
        for item in items {
            if let Some(candidate) = candidate_from_item(item) {
                candidates.push(candidate);
            }
        }
    }
    Ok(candidates)
}

fn extract_initial_data(body: &str) -> Result<Value, String> {
    let start = body
        .find(INITIAL_DATA_PREFIX)
        .ok_or_else(|| "Video search response carried no initial data".to_string())?
        + INITIAL_DATA_PREFIX.len();
    let length = body[start..]
        .find(INITIAL_DATA_SUFFIX)
        .ok_or_else(|| "Video search response initial data was unterminated".to_string())?;
    serde_json::from_str(&body[start..start + length])
        .map_err(|err| format!("Invalid video search payload: {err}"))
}

fn candidate_from_item(item: &Value) -> Option<VideoCandidate> {
    let renderer = item.as_object()?.values().next()?;
    let video_id = renderer
        .get("videoId")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned);
    let title = renderer
        .get("title")
        .map(|title| {
            title
                .get("runs")
                .and_then(Value::as_array)
                .and_then(|runs| runs.first())
                .and_then(|run| run.get("text"))
                .and_then(Value::as_str)
                .or_else(|| title.get("simpleText").and_then(Value::as_str))
                .unwrap_or_default()
                .to_string()
        })
        .unwrap_or_default();
    Some(VideoCandidate { video_id, title })
}

#[cfg(test)]
mod tests {
    use super::{first_with_video_id, parse_search_candidates, VideoCandidate};

    fn results_page(initial_data: &str) -> String {
        format!(
            "<html><script>var ytInitialData = {initial_data};</script></html>"
        )
    }

    #[test]
    fn test_selector_skips_candidates_without_identifier() {
        let candidates = vec![
            VideoCandidate {
                video_id: None,
                title: "Channel result".to_string(),
            },
            VideoCandidate {
                video_id: Some("  ".to_string()),
                title: "Blank id".to_string(),
            },
            VideoCandidate {
                video_id: Some("abc123".to_string()),
                title: "First usable".to_string(),
            },
        ];
        let selected = first_with_video_id(&candidates).expect("usable candidate exists");
        assert_eq!(selected.title, "First usable");
    }

    #[test]
    fn test_selector_returns_none_without_usable_candidates() {
        let candidates = vec![VideoCandidate {
            video_id: None,
            title: "Channel result".to_string(),
        }];
        assert!(first_with_video_id(&candidates).is_none());
    }

    #[test]
    fn test_parse_keeps_candidate_order_and_optional_ids() {
        let body = results_page(
            r#"{"contents":{"twoColumnSearchResultsRenderer":{"primaryContents":{"sectionListRenderer":{"contents":[{"itemSectionRenderer":{"contents":[{"channelRenderer":{"title":{"simpleText":"Queen Official"}}},{"videoRenderer":{"videoId":"fJ9rUzIMcZQ","title":{"runs":[{"text":"Bohemian Rhapsody"}]}}}]}}]}}}}}"#,
        );
        let candidates = parse_search_candidates(&body).expect("payload should parse");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].video_id, None);
        assert_eq!(candidates[0].title, "Queen Official");
        assert_eq!(candidates[1].video_id.as_deref(), Some("fJ9rUzIMcZQ"));
        assert_eq!(candidates[1].title, "Bohemian Rhapsody");
    }

    #[test]
    fn test_parse_tolerates_empty_result_layout() {
        let body = results_page(r#"{"contents":{}}"#);
        let candidates = parse_search_candidates(&body).expect("payload should parse");
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_parse_rejects_page_without_initial_data() {
        assert!(parse_search_candidates("<html></html>").is_err());
    }
}

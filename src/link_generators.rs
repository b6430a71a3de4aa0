//! Derived-link builders for catalog rows.
//!
//! Lyrics and chords links are deterministic search URLs built locally; the
//! video link is a YouTube watch URL built from an identifier found by the
//! external search provider (`video_search`).

const GOOGLE_SEARCH_BASE_URL: &str = "https://www.google.com/search";
const ULTIMATE_GUITAR_SEARCH_BASE_URL: &str = "https://www.ultimate-guitar.com/search.php";
const YOUTUBE_WATCH_BASE_URL: &str = "https://www.youtube.com/watch";

/// Percent-encodes a free-text phrase for a query string: each term is
/// encoded on its own and terms are joined with `+`, so spaces never appear
/// raw and reserved characters (`/`, `&`, ...) are escaped.
pub fn encode_query_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(|term| urlencoding::encode(term).into_owned())
        .collect::<Vec<_>>()
        .join("+")
}

/// Search phrase submitted to the video provider for one row.
pub fn video_search_phrase(artist: &str, title: &str) -> String {
    format!("{} {}", title.trim(), artist.trim())
}

/// Canonical watch URL for a resolved video identifier.
pub fn video_watch_url(video_id: &str) -> String {
    format!("{YOUTUBE_WATCH_BASE_URL}?v={video_id}")
}

/// Deterministic lyrics-search URL; always succeeds for a non-blank identity.
pub fn lyrics_search_url(artist: &str, title: &str) -> String {
    let phrase = format!("{} {} lyrics", title.trim(), artist.trim());
    format!("{GOOGLE_SEARCH_BASE_URL}?q={}", encode_query_phrase(&phrase))
}

/// Deterministic chords-search URL; always succeeds for a non-blank identity.
pub fn chords_search_url(artist: &str, title: &str) -> String {
    let phrase = format!("{} {}", title.trim(), artist.trim());
    format!(
        "{ULTIMATE_GUITAR_SEARCH_BASE_URL}?search_type=title&value={}",
        encode_query_phrase(&phrase)
    )
}

#[cfg(test)]
mod tests {
    use super::{
        chords_search_url, encode_query_phrase, lyrics_search_url, video_search_phrase,
        video_watch_url,
    };

    #[test]
    fn test_lyrics_url_matches_expected_layout() {
        assert_eq!(
            lyrics_search_url("Queen", "Bohemian Rhapsody"),
            "https://www.google.com/search?q=Bohemian+Rhapsody+Queen+lyrics"
        );
    }

    #[test]
    fn test_chords_url_matches_expected_layout() {
        assert_eq!(
            chords_search_url("Queen", "Bohemian Rhapsody"),
            "https://www.ultimate-guitar.com/search.php?search_type=title&value=Bohemian+Rhapsody+Queen"
        );
    }

    #[test]
    fn test_reserved_characters_are_escaped() {
        let url = chords_search_url("AC/DC", "Back in Black");
        assert_eq!(
            url,
            "https://www.ultimate-guitar.com/search.php?search_type=title&value=Back+in+Black+AC%2FDC"
        );
        assert!(!url.contains(' '));

        let lyrics = lyrics_search_url("AC/DC", "Back in Black");
        assert!(!lyrics.contains("AC/DC"));
        assert!(lyrics.contains("AC%2FDC"));
    }

    #[test]
    fn test_query_phrase_collapses_interior_whitespace() {
        assert_eq!(encode_query_phrase("  a   b  "), "a+b");
    }

    #[test]
    fn test_video_phrase_puts_title_first() {
        assert_eq!(
            video_search_phrase("Queen", "Bohemian Rhapsody"),
            "Bohemian Rhapsody Queen"
        );
    }

    #[test]
    fn test_watch_url_embeds_identifier() {
        assert_eq!(
            video_watch_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }
}

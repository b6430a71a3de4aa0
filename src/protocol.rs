//! Shared domain types exchanged between the catalog store, the link
//! reconciler, and front-ends.

/// Self-assessed playing proficiency on a fixed ordered scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Proficiency {
    None,
    Learning,
    Practicing,
    Comfortable,
    Confident,
    Mastered,
}

/// One catalog row: user-authored identity plus derived reference links.
///
/// Field order matches the persisted CSV column layout:
/// `artist,title,proficiency,link,lyrics_link,chords_link`.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SongRow {
    pub artist: String,
    pub title: String,
    pub proficiency: Option<Proficiency>,
    /// Canonical video watch URL, absent until computed.
    pub link: Option<String>,
    /// Lyrics search URL, absent until computed.
    pub lyrics_link: Option<String>,
    /// Chords search URL, absent until computed.
    pub chords_link: Option<String>,
}

impl SongRow {
    /// Creates a row with identity only; derived fields start absent.
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            proficiency: None,
            link: None,
            lyrics_link: None,
            chords_link: None,
        }
    }

    /// Case-sensitive identity key; two rows are the same song iff equal.
    pub fn identity(&self) -> (&str, &str) {
        (self.artist.as_str(), self.title.as_str())
    }

    /// Rows with a blank artist or title never have derived fields touched.
    pub fn is_enrichment_eligible(&self) -> bool {
        !self.artist.trim().is_empty() && !self.title.trim().is_empty()
    }

    /// Short label used in logs and diagnostics.
    pub fn identity_label(&self) -> String {
        format!("{} - {}", self.artist.trim(), self.title.trim())
    }

    pub fn derived_link(&self, field: LinkField) -> &Option<String> {
        match field {
            LinkField::Video => &self.link,
            LinkField::Lyrics => &self.lyrics_link,
            LinkField::Chords => &self.chords_link,
        }
    }

    pub fn set_derived_link(&mut self, field: LinkField, value: Option<String>) {
        match field {
            LinkField::Video => self.link = value,
            LinkField::Lyrics => self.lyrics_link = value,
            LinkField::Chords => self.chords_link = value,
        }
    }

    /// Clears every derived field; used when the row identity changed.
    pub fn clear_derived_links(&mut self) {
        self.link = None;
        self.lyrics_link = None;
        self.chords_link = None;
    }
}

/// Whitespace-only strings count as absent for derived fields.
pub fn is_blank(value: &Option<String>) -> bool {
    match value {
        Some(text) => text.trim().is_empty(),
        None => true,
    }
}

/// One derived link column on a [`SongRow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkField {
    Video,
    Lyrics,
    Chords,
}

impl LinkField {
    pub const ALL: [LinkField; 3] = [LinkField::Video, LinkField::Lyrics, LinkField::Chords];

    /// Column name as persisted in the CSV header.
    pub fn column_name(self) -> &'static str {
        match self {
            LinkField::Video => "link",
            LinkField::Lyrics => "lyrics_link",
            LinkField::Chords => "chords_link",
        }
    }
}

/// Why a single link computation failed; never fatal to the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkErrorKind {
    /// The provider returned results, but none exposed a video identifier,
    /// or it returned nothing at all.
    NoUsableResult,
    /// The provider call itself failed (transport, bad response).
    SearchFailed,
}

/// Non-fatal per-row, per-field enrichment failure surfaced to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkDiagnostic {
    /// Index of the affected row in the reconciled row-set.
    pub row_index: usize,
    /// Human-readable identity of the affected row.
    pub song: String,
    pub field: LinkField,
    pub kind: LinkErrorKind,
    pub message: String,
}

/// Result of one reconciliation pass: the merged row-set plus any
/// recoverable enrichment failures. The caller swaps `rows` in atomically.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    pub rows: Vec<SongRow>,
    pub diagnostics: Vec<LinkDiagnostic>,
}

#[cfg(test)]
mod tests {
    use super::{is_blank, LinkField, Proficiency, SongRow};

    #[test]
    fn test_eligibility_requires_both_identity_parts() {
        assert!(SongRow::new("Queen", "Bohemian Rhapsody").is_enrichment_eligible());
        assert!(!SongRow::new("", "Bohemian Rhapsody").is_enrichment_eligible());
        assert!(!SongRow::new("Queen", "   ").is_enrichment_eligible());
    }

    #[test]
    fn test_blank_detection_treats_whitespace_as_absent() {
        assert!(is_blank(&None));
        assert!(is_blank(&Some("   ".to_string())));
        assert!(!is_blank(&Some("https://example.com".to_string())));
    }

    #[test]
    fn test_clear_derived_links_clears_all_fields() {
        let mut row = SongRow::new("Queen", "Bohemian Rhapsody");
        for field in LinkField::ALL {
            row.set_derived_link(field, Some("https://example.com".to_string()));
        }
        row.clear_derived_links();
        for field in LinkField::ALL {
            assert!(row.derived_link(field).is_none());
        }
    }

    #[test]
    fn test_proficiency_scale_is_ordered() {
        assert!(Proficiency::None < Proficiency::Learning);
        assert!(Proficiency::Confident < Proficiency::Mastered);
    }
}

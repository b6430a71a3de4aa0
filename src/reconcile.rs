//! Save-time link reconciliation.
//!
//! One pass reconciles an edited row-set against the last persisted
//! snapshot: rows whose (artist, title) identity is no longer found in the
//! snapshot are stale and lose all derived links, then every
//! enrichment-eligible row gets its missing links (re)computed. Enrichment
//! is best-effort per field; failures become diagnostics, never aborts.

use std::collections::HashSet;

use log::{debug, warn};

use crate::link_generators::{
    chords_search_url, lyrics_search_url, video_search_phrase, video_watch_url,
};
use crate::protocol::{
    is_blank, LinkDiagnostic, LinkErrorKind, LinkField, ReconcileOutcome, SongRow,
};
use crate::video_search::{first_with_video_id, CandidateSelector, VideoSearchProvider};

/// Indices of edited rows whose identity is absent from the persisted
/// snapshot (new rows, renamed rows, rows whose identity went blank).
/// Proficiency and link edits never mark a row stale.
pub fn stale_row_indices(persisted: &[SongRow], edited: &[SongRow]) -> HashSet<usize> {
    let known_identities: HashSet<(&str, &str)> =
        persisted.iter().map(SongRow::identity).collect();
    edited
        .iter()
        .enumerate()
        .filter(|(_, row)| !known_identities.contains(&row.identity()))
        .map(|(index, _)| index)
        .collect()
}

/// Derived fields currently absent on an enrichment-eligible row. Always
/// empty for rows with a blank artist or title. Field-independent: needing
/// one link while the others stay untouched is the normal case.
pub fn missing_links(row: &SongRow) -> Vec<LinkField> {
    if !row.is_enrichment_eligible() {
        return Vec::new();
    }
    LinkField::ALL
        .into_iter()
        .filter(|field| is_blank(row.derived_link(*field)))
        .collect()
}

/// Whether a reconcile pass over `edited` would change anything: a stale
/// row to clear or re-enrich, or an unchanged row with blank eligible
/// fields. Front-ends use this to gate their save action.
pub fn pending_work(persisted: &[SongRow], edited: &[SongRow]) -> bool {
    let stale = stale_row_indices(persisted, edited);
    edited.iter().enumerate().any(|(index, row)| {
        if stale.contains(&index) {
            row.is_enrichment_eligible()
                || LinkField::ALL
                    .iter()
                    .any(|field| !is_blank(row.derived_link(*field)))
        } else {
            !missing_links(row).is_empty()
        }
    })
}

/// Save-time orchestrator owning the video-search boundary.
pub struct LinkReconciler {
    provider: Box<dyn VideoSearchProvider>,
    selector: CandidateSelector,
    video_search_enabled: bool,
}

impl LinkReconciler {
    pub fn new(provider: Box<dyn VideoSearchProvider>) -> Self {
        Self {
            provider,
            selector: first_with_video_id,
            video_search_enabled: true,
        }
    }

    /// Swaps the candidate-selection policy applied to search results.
    pub fn with_selector(mut self, selector: CandidateSelector) -> Self {
        self.selector = selector;
        self
    }

    /// When disabled, video fields are left absent without a diagnostic;
    /// the deterministic generators still run.
    pub fn with_video_search_enabled(mut self, enabled: bool) -> Self {
        self.video_search_enabled = enabled;
        self
    }

    /// Runs the two-pass reconciliation and returns the merged row-set plus
    /// recoverable enrichment failures. The inputs are not mutated; callers
    /// swap the returned rows in atomically.
    pub fn reconcile(&self, persisted: &[SongRow], edited: &[SongRow]) -> ReconcileOutcome {
        let mut rows = edited.to_vec();

        // Clearing must finish before enrichment starts: a renamed row is
        // cleared and then immediately re-enriched in the same pass.
        let stale = stale_row_indices(persisted, &rows);
        for &index in &stale {
            debug!(
                "Clearing derived links for stale row {}: {}",
                index,
                rows[index].identity_label()
            );
            rows[index].clear_derived_links();
        }

        let mut diagnostics = Vec::new();
        for index in 0..rows.len() {
            for field in missing_links(&rows[index]) {
                match self.compute_link(&rows[index], field) {
                    Ok(Some(url)) => rows[index].set_derived_link(field, Some(url)),
                    Ok(None) => {}
                    Err((kind, message)) => {
                        warn!(
                            "Link enrichment failed for '{}' ({}): {}",
                            rows[index].identity_label(),
                            field.column_name(),
                            message
                        );
                        diagnostics.push(LinkDiagnostic {
                            row_index: index,
                            song: rows[index].identity_label(),
                            field,
                            kind,
                            message,
                        });
                    }
                }
            }
        }

        ReconcileOutcome { rows, diagnostics }
    }

    fn compute_link(
        &self,
        row: &SongRow,
        field: LinkField,
    ) -> Result<Option<String>, (LinkErrorKind, String)> {
        match field {
            LinkField::Lyrics => Ok(Some(lyrics_search_url(&row.artist, &row.title))),
            LinkField::Chords => Ok(Some(chords_search_url(&row.artist, &row.title))),
            LinkField::Video => {
                if !self.video_search_enabled {
                    debug!(
                        "Video search disabled, leaving '{}' unlinked",
                        row.identity_label()
                    );
                    return Ok(None);
                }
                let phrase = video_search_phrase(&row.artist, &row.title);
                let candidates = self
                    .provider
                    .search(&phrase)
                    .map_err(|message| (LinkErrorKind::SearchFailed, message))?;
                match (self.selector)(&candidates).and_then(|c| c.video_id.as_deref()) {
                    Some(video_id) => Ok(Some(video_watch_url(video_id))),
                    None => Err((
                        LinkErrorKind::NoUsableResult,
                        format!("No usable video result for '{phrase}'"),
                    )),
                }
            }
        }
    }
}

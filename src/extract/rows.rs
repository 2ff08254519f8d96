use crate::extract::config::ExtractConfig;
use crate::models::Token;

/// A horizontal cluster of tokens forming one visual line of text.
///
/// Tokens are sorted left to right; `text` is their trimmed texts joined by
/// single spaces. Not mutated after clustering.
#[derive(Debug, Clone)]
pub struct Row {
    pub tokens: Vec<Token>,
    pub y_min: i32,
    pub y_max: i32,
    pub text: String,
    /// Token extents spilled past the acceptance window (overlapping lines)
    pub tall: bool,
}

/// Tally of rows dropped or flagged during clustering, returned to the
/// caller for threshold calibration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterStats {
    pub noise_rows: usize,
    pub tall_rows: usize,
}

/// Longest joined text still treated as a punctuation artifact.
const NOISE_MAX_CHARS: usize = 2;

/// Partition filtered tokens into visual rows with a top-to-bottom sweep.
///
/// The token with the smallest `y` seeds a row; every token whose `y` lies
/// within `row_window_height` of the seed joins it. Sorting by `y` first
/// makes each window a contiguous run of the pool. Rows come out disjoint
/// and ordered by `y_min`.
pub fn cluster_rows(mut tokens: Vec<Token>, config: &ExtractConfig) -> (Vec<Row>, ClusterStats) {
    let mut rows = Vec::new();
    let mut stats = ClusterStats::default();

    tokens.sort_by_key(|t| t.y);

    let mut i = 0;
    while i < tokens.len() {
        let seed_y = tokens[i].y;
        let window_end = seed_y + config.row_window_height;

        let mut j = i;
        while j < tokens.len() && tokens[j].y <= window_end {
            j += 1;
        }
        let mut members: Vec<Token> = tokens[i..j].to_vec();
        i = j;

        members.sort_by_key(|t| t.x);
        let text = members
            .iter()
            .map(|t| t.text.trim())
            .collect::<Vec<_>>()
            .join(" ");

        // Pure punctuation scraps carry no information. Short but real
        // titles are alphanumeric and stay in; that call belongs to the
        // classifier, not here.
        if text.chars().count() <= NOISE_MAX_CHARS && !text.chars().any(|c| c.is_alphanumeric()) {
            stats.noise_rows += 1;
            continue;
        }

        // A stray tall token must not stretch the row past its window.
        let max_extent = members
            .iter()
            .map(|t| t.y + t.height)
            .max()
            .unwrap_or(window_end);
        let tall = max_extent > window_end;
        if tall {
            stats.tall_rows += 1;
        }

        rows.push(Row {
            tokens: members,
            y_min: seed_y,
            y_max: max_extent.min(window_end),
            text,
            tall,
        });
    }

    (rows, stats)
}

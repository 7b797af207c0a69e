//! Dataset selection from the page's URL fragment.

use serde::Serialize;

/// One of the fixed search snapshots the page can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Dataset {
    #[default]
    BlackPreMove,
    BlackPostMove,
    WhitePreMove,
    WhitePostMove,
}

impl Dataset {
    /// Every dataset, in fragment order (`#1` .. `#4`).
    pub const ALL: [Dataset; 4] = [
        Dataset::BlackPreMove,
        Dataset::BlackPostMove,
        Dataset::WhitePreMove,
        Dataset::WhitePostMove,
    ];

    /// Select a dataset from a URL fragment such as `"#2"`.
    ///
    /// Anything unrecognized, including an empty fragment, selects the default.
    pub fn from_fragment(fragment: &str) -> Self {
        match fragment {
            "#1" => Dataset::BlackPreMove,
            "#2" => Dataset::BlackPostMove,
            "#3" => Dataset::WhitePreMove,
            "#4" => Dataset::WhitePostMove,
            _ => Dataset::default(),
        }
    }

    /// Path of the JSON document, relative to the page.
    pub fn path(self) -> &'static str {
        match self {
            Dataset::BlackPreMove => "graph1.json",
            Dataset::BlackPostMove => "graph2.json",
            Dataset::WhitePreMove => "graph3.json",
            Dataset::WhitePostMove => "graph4.json",
        }
    }

    /// Human readable page title.
    pub fn title(self) -> &'static str {
        match self {
            Dataset::BlackPreMove => "Black pre-move",
            Dataset::BlackPostMove => "Black post-move",
            Dataset::WhitePreMove => "White pre-move",
            Dataset::WhitePostMove => "White post-move",
        }
    }
}

/// Resolve a fragment into `(path, title)`. Never fails.
pub fn select(fragment: Option<&str>) -> (&'static str, &'static str) {
    let dataset = fragment.map(Dataset::from_fragment).unwrap_or_default();
    (dataset.path(), dataset.title())
}

//! Contacts table: client-side search and column sort.
//!
//! Both operate on the live rows of a `<table>`. Row 0 is the header and is
//! never hidden or moved. Cells are the `<td>` children of a row.

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::dom::{Document, DomError, NodeId};

static LEADING_NUMBER: LazyLock<Option<Regex>> =
    LazyLock::new(|| match Regex::new(r"^[+-]?(?:Infinity|[0-9]+(?:\.[0-9]*)?(?:[eE][+-]?[0-9]+)?|\.[0-9]+(?:[eE][+-]?[0-9]+)?)") {
        Ok(re) => Some(re),
        Err(err) => {
            tracing::error!(%err, "number pattern failed to compile");
            None
        }
    });

/// The first table in the document.
#[must_use]
pub fn find_table(doc: &Document) -> Option<NodeId> {
    doc.find_first(doc.root(), |el| el.is("table"))
}

/// Every row of `table` in document order, header first.
#[must_use]
pub fn rows(doc: &Document, table: NodeId) -> Vec<NodeId> {
    doc.find_all(table, |el| el.is("tr"))
}

/// The data cells of `row`.
#[must_use]
pub fn cells(doc: &Document, row: NodeId) -> Vec<NodeId> {
    doc.child_elements(row)
        .into_iter()
        .filter(|c| doc.element(*c).is_some_and(|el| el.is("td")))
        .collect()
}

/// Whether `row` is hidden by a search.
#[must_use]
pub fn is_hidden(doc: &Document, row: NodeId) -> bool {
    doc.element(row).is_some_and(|el| el.style("display") == Some("none"))
}

// =============================================================================
// SEARCH
// =============================================================================

/// Show the rows whose searchable text contains `query` (case-insensitive)
/// and hide the rest. The last cell holds row actions and is not searched.
/// Returns the number of rows left visible.
pub fn search(doc: &mut Document, table: NodeId, query: &str) -> usize {
    let needle = query.to_lowercase();
    let mut visible = 0;
    for row in rows(doc, table).into_iter().skip(1) {
        let row_cells = cells(doc, row);
        let searchable = row_cells.len().saturating_sub(1);
        let text: String = row_cells[..searchable].iter().map(|c| doc.text_content(*c)).collect();
        let matched = text.to_lowercase().contains(&needle);
        if matched {
            visible += 1;
        }
        if let Err(err) = doc.set_style(row, "display", if matched { "" } else { "none" }) {
            tracing::warn!(node = ?row, %err, "could not toggle row visibility");
        }
    }
    tracing::trace!(query, visible, "table searched");
    visible
}

// =============================================================================
// SORT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Result of one [`sort`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOutcome {
    /// Direction the rows ended up in.
    pub direction: SortDirection,
    /// Number of adjacent swaps performed.
    pub swaps: usize,
}

/// Comparable form of a cell.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64, String),
    Text(String),
}

impl SortKey {
    fn of(raw: &str) -> Self {
        match parse_leading_number(raw) {
            Some(n) => Self::Number(n, raw.to_lowercase()),
            None => Self::Text(raw.to_lowercase()),
        }
    }

    fn text(&self) -> &str {
        match self {
            Self::Number(_, text) | Self::Text(text) => text,
        }
    }

    /// Numbers compare numerically with each other; any other pair compares
    /// as lowercased text.
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a, _), Self::Number(b, _)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            _ => self.text().cmp(other.text()),
        }
    }
}

/// Parse the longest numeric prefix of `raw` after leading whitespace, the way
/// a browser's `parseFloat` does. `None` when there is no numeric prefix.
#[must_use]
pub fn parse_leading_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let found = LEADING_NUMBER.as_ref()?.find(trimmed)?;
    found.as_str().parse::<f64>().ok()
}

fn sort_key(doc: &Document, row: NodeId, column: usize) -> SortKey {
    let text = cells(doc, row).get(column).map(|c| doc.text_content(*c)).unwrap_or_default();
    SortKey::of(&text)
}

/// Exchange-sort the data rows of `table` by `column`.
///
/// Every pass swaps the first adjacent out-of-order pair it finds and starts
/// over. The call starts ascending; if the very first pass finds nothing to
/// swap the rows are already ascending, so the direction flips to descending
/// and sorting continues. Calling it twice on the same column therefore
/// toggles between ascending and descending order. Rows without the column
/// sort as empty text.
pub fn sort(doc: &mut Document, table: NodeId, column: usize) -> Result<SortOutcome, DomError> {
    let mut direction = SortDirection::Ascending;
    let mut swaps = 0;
    let row_count = rows(doc, table).len();
    let swap_limit = row_count.saturating_mul(row_count);

    loop {
        let current = rows(doc, table);
        let out_of_order = current.windows(2).skip(1).find(|pair| {
            let ordering = sort_key(doc, pair[0], column).compare(&sort_key(doc, pair[1], column));
            match direction {
                SortDirection::Ascending => ordering == Ordering::Greater,
                SortDirection::Descending => ordering == Ordering::Less,
            }
        });

        if let Some(pair) = out_of_order {
            let (upper, lower) = (pair[0], pair[1]);
            let parent = doc.parent(upper).ok_or(DomError::NotAChild { parent: table, child: upper })?;
            doc.insert_before(parent, lower, upper)?;
            swaps += 1;
            if swaps > swap_limit {
                tracing::warn!(column, swaps, "cell ordering is inconsistent; sort stopped early");
                break;
            }
            continue;
        }

        if swaps == 0 && direction == SortDirection::Ascending {
            direction = SortDirection::Descending;
            continue;
        }
        break;
    }

    tracing::debug!(column, swaps, ?direction, "table sorted");
    Ok(SortOutcome { direction, swaps })
}

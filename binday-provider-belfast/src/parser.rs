//! Turns the council's results page into collection entries.

use std::sync::LazyLock;

use binday_core::{BinColor, CollectionEntry};
use scraper::{ElementRef, Html, Selector};

static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("invalid selector: table"));
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("invalid selector: tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("invalid selector: td"));

/// Keyword pairs checked in order; the first pair found in the label decides the color.
const COLOR_KEYWORDS: [(&str, &str, BinColor); 5] = [
    ("black", "general", BinColor::Black),
    ("blue", "recycling", BinColor::Blue),
    ("brown", "compost", BinColor::Brown),
    ("green", "food", BinColor::Green),
    ("purple", "glass", BinColor::Purple),
];

/// Extract every table row with at least two cells, in document order.
///
/// Cell 0 is the bin label, cell 1 the collection date.
#[must_use]
pub fn parse_collections(html: &str) -> Vec<CollectionEntry> {
    let document = Html::parse_document(html);

    document
        .select(&TABLE)
        .flat_map(|table| table.select(&ROW))
        .filter_map(|row| {
            let mut cells = row.select(&CELL);
            let bin_type = cell_text(cells.next()?);
            let next_collection_date = cell_text(cells.next()?);
            Some(CollectionEntry {
                color: classify_color(&bin_type),
                bin_type,
                next_collection_date,
            })
        })
        .collect()
}

/// Guess the bin color from its label.
#[must_use]
pub fn classify_color(label: &str) -> BinColor {
    let lowered = label.to_lowercase();
    COLOR_KEYWORDS
        .iter()
        .find(|(primary, alias, _)| lowered.contains(primary) || lowered.contains(alias))
        .map_or(BinColor::Unknown, |(_, _, color)| *color)
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

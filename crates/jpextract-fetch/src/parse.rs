//! XML extract response parsing.

use jpextract_core::{CourtId, ExtractTable};
use roxmltree::{Document, Node, ParsingOptions};
use tracing::{debug, warn};

use crate::FetchError;

const ROW_TAG: &str = "Row";

/// Parse an XML extract response into a table for `court`.
///
/// The header comes from the child tags of the first `Row` under the
/// document root; every row contributes its children's text in document
/// order. A well-formed document without any `Row` is "no data" and yields
/// `None`. A body that is not well-formed XML is an error; a DOCTYPE is not.
pub fn parse_extract(body: &str, court: CourtId) -> Result<Option<ExtractTable>, FetchError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(body, options)?;
    let mut rows = doc
        .root_element()
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == ROW_TAG);

    let Some(first) = rows.next() else {
        debug!(court = %court, "no data in response");
        return Ok(None);
    };

    let mut table = ExtractTable::new(fields(first).map(|n| n.tag_name().name()));
    debug!(columns = table.num_columns(), "parsed header");

    for row in std::iter::once(first).chain(rows) {
        let values = fields(row).map(|n| n.text().map(str::to_string)).collect();
        let dropped = table.push_row(court, values);
        if dropped > 0 {
            warn!(
                court = %court,
                row = table.num_rows(),
                dropped,
                "row has more fields than the header; extra fields dropped"
            );
        }
    }

    debug!(rows = table.num_rows(), "parsed rows");
    Ok(Some(table))
}

fn fields<'a, 'input>(row: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    row.children().filter(|n| n.is_element())
}

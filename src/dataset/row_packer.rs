use crate::dataset::flat_row::FlatRow;

/// Merges fragments left to right into a single row. On a key collision the later fragment wins.
pub fn pack_fragments<I>(fragments: I) -> FlatRow
where
    I: IntoIterator<Item = FlatRow>,
{
    let mut row = FlatRow::new();
    for fragment in fragments {
        row.extend(fragment);
    }
    row
}

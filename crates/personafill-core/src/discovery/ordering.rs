//! Reading-order sort.

use personafill_protocols::CandidateField;

/// Sort fields top to bottom, then left to right within a row.
///
/// Rows are formed greedily after sorting by `top`: a field joins the current
/// row while its top is within `tolerance` of the row's first field, which
/// keeps the comparison a total order.
pub fn sort_by_position(fields: &mut Vec<CandidateField>, tolerance: f64) {
    fields.sort_by(|a, b| a.position.top.total_cmp(&b.position.top));

    let mut ordered = Vec::with_capacity(fields.len());
    let mut row: Vec<CandidateField> = Vec::new();
    for field in fields.drain(..) {
        if let Some(anchor) = row.first() {
            if field.position.top - anchor.position.top > tolerance {
                flush_row(&mut row, &mut ordered);
            }
        }
        row.push(field);
    }
    flush_row(&mut row, &mut ordered);
    *fields = ordered;
}

fn flush_row(row: &mut Vec<CandidateField>, out: &mut Vec<CandidateField>) {
    row.sort_by(|a, b| a.position.left.total_cmp(&b.position.left));
    out.append(row);
}

use crate::luna::tools::model::MasterTable;

const COLUMN_GAP: &str = "  ";

/// Renders the table as fixed-width text, header first, each column
/// right-aligned to its widest cell.
pub fn render_table(table: &MasterTable) -> String {
    let header = table.header();
    let records = table.records();

    let mut widths: Vec<usize> = header.iter().map(|cell| cell.chars().count()).collect();
    for record in &records {
        for (width, cell) in widths.iter_mut().zip(record) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(render_line(&header, &widths));
    for record in &records {
        lines.push(render_line(record, &widths));
    }
    lines.join("\n")
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:>width$}"))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::luna::tools::model::InputRow;
    use crate::luna::tools::reconcile::merge;
    use chrono::NaiveDate;

    #[test]
    fn columns_are_right_aligned() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
        let table = merge(
            MasterTable::new(),
            &[
                InputRow::new("AAA", "Alpha", 100.0),
                InputRow::new("BB", "Beta Holdings", 5.5),
            ],
            date,
        );

        let rendered = render_table(&table);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Security Symbol  Security Name  2024-01-01"
        );
        assert_eq!(
            lines[1],
            "            AAA          Alpha       100.0"
        );
        assert_eq!(
            lines[2],
            "             BB  Beta Holdings         5.5"
        );
    }
}

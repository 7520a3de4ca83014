use std::collections::HashMap;

/// Subject-level data table held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct RawDataTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    column_index: HashMap<String, usize>,
}

impl RawDataTable {
    /// Builds the column lookup; on duplicate headers the last column wins.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let column_index = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
        Self {
            headers,
            rows,
            column_index,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_index.get(name).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().enumerate().map(|(index, cells)| RowView {
            table: self,
            index,
            cells,
        })
    }

    pub fn row(&self, index: usize) -> Option<RowView<'_>> {
        self.rows.get(index).map(|cells| RowView {
            table: self,
            index,
            cells,
        })
    }
}

/// One data row with access by column name.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    table: &'a RawDataTable,
    index: usize,
    cells: &'a [String],
}

impl<'a> RowView<'a> {
    /// Zero-based data row number (the header is not counted).
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = self.table.column_index(column)?;
        Some(self.cells.get(idx).map(String::as_str).unwrap_or(""))
    }

    /// `(header, cell)` pairs in column order.
    pub fn cells(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        let headers = self.table.headers();
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(idx, cell)| {
                headers
                    .get(idx)
                    .map(|header| (header.as_str(), cell.as_str()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn row_view_reads_by_name() {
        let table = RawDataTable::new(
            strings(&["ID", "SEX", "AGE"]),
            vec![strings(&["p1", "1", "40"]), strings(&["p2", "2"])],
        );
        let second = table.row(1).unwrap();
        assert_eq!(second.get("SEX"), Some("2"));
        assert_eq!(second.get("AGE"), Some(""));
        assert_eq!(second.get("MISSING"), None);
        let cells: Vec<_> = table.row(0).unwrap().cells().collect();
        assert_eq!(cells, vec![("ID", "p1"), ("SEX", "1"), ("AGE", "40")]);
    }

    #[test]
    fn duplicate_headers_resolve_to_last_column() {
        let table = RawDataTable::new(strings(&["A", "A"]), vec![strings(&["x", "y"])]);
        assert_eq!(table.column_index("A"), Some(1));
        assert_eq!(table.row(0).unwrap().get("A"), Some("y"));
    }
}

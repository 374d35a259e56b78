/// A simple text-based table generator for console and log output
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl Table {
    /// Create a new table with the given headers
    pub fn new(headers: Vec<&str>) -> Self {
        let col_widths = headers.iter().map(|h| h.len()).collect();
        let headers = headers.iter().map(|h| h.to_string()).collect();
        Table {
            headers,
            rows: Vec::new(),
            col_widths,
        }
    }

    /// Add a row to the table; cells beyond the header count are dropped
    pub fn add_row(&mut self, row: Vec<&str>) {
        let row_strings: Vec<String> = row
            .iter()
            .take(self.headers.len())
            .map(|s| s.to_string())
            .collect();

        for (i, col) in row_strings.iter().enumerate() {
            self.col_widths[i] = self.col_widths[i].max(col.len());
        }

        self.rows.push(row_strings);
    }

    /// Render the table, numbers and text left-aligned in padded columns
    pub fn render(&self) -> String {
        let mut output = String::new();

        output.push_str(&self.render_row(&self.headers));
        output.push('\n');
        output.push_str(&self.render_separator());

        for row in &self.rows {
            output.push('\n');
            output.push_str(&self.render_row(row));
        }

        output
    }

    fn render_row(&self, row: &[String]) -> String {
        row.iter()
            .zip(&self.col_widths)
            .map(|(col, &width)| format!("{:<width$}", col, width = width))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    fn render_separator(&self) -> String {
        self.col_widths
            .iter()
            .map(|&width| "-".repeat(width))
            .collect::<Vec<_>>()
            .join("-+-")
    }
}

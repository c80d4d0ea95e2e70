//! Plain-text tables for the admin CLI

use chrono::{DateTime, Utc};

/// Column-aligned text table with a placeholder row when empty
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    empty: String,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            empty: "No data".to_string(),
        }
    }

    /// Text shown in place of rows, e.g. "No categories"
    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty = message.into();
        self
    }

    /// Add a row; short rows are padded and long rows truncated
    pub fn row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = cells.into_iter().map(Into::into).collect();
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| pad(cell, *width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = vec![line(&self.headers)];
        let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        out.push("─".repeat(rule_width));

        if self.rows.is_empty() {
            let message = &self.empty;
            let indent = rule_width.saturating_sub(message.chars().count()) / 2;
            out.push(format!("{}{}", " ".repeat(indent), message));
        } else {
            out.extend(self.rows.iter().map(|row| line(row)));
        }
        out.join("\n")
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{}{}", cell, " ".repeat(width.saturating_sub(len)))
}

/// Shorten to `max` characters, ending with `…` when cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// `0 B`, `512 B`, `1.5 KB`, `2.25 MB`
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    match bytes {
        0 => "0 B".to_string(),
        b if b < KB => format!("{} B", b),
        b if b < MB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{:.2} MB", b as f64 / MB as f64),
    }
}

/// `2025-03-01 19:30`, or `-` when absent
pub fn format_date(date: Option<&DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_render_aligns_columns() {
        let mut table = Table::new(["ID", "Name", "Slug"]);
        table.row(["1", "Premier League", "ngoai-hang-anh"]);
        table.row(["12", "V-League", "v-league"]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "ID  Name            Slug");
        assert_eq!(lines[2], "1   Premier League  ngoai-hang-anh");
        assert_eq!(lines[3], "12  V-League        v-league");
        assert!(lines[1].chars().all(|c| c == '─'));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_table_shows_placeholder() {
        let table = Table::new(["ID", "Name"]).empty_message("No categories");
        assert!(table.is_empty());
        let rendered = table.render();
        assert_eq!(rendered.lines().count(), 3);
        assert_eq!(rendered.lines().last().unwrap().trim(), "No categories");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = Table::new(["A", "B"]);
        table.row(["only"]);
        assert_eq!(table.render().lines().nth(2), Some("only"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Derby", 10), "Derby");
        assert_eq!(truncate("Manchester United", 8), "Manches…");
        assert_eq!(truncate("Hà Nội FC", 4), "Hà …");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(2_359_296), "2.25 MB");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2025, 3, 1, 19, 30, 0).unwrap();
        assert_eq!(format_date(Some(&date)), "2025-03-01 19:30");
        assert_eq!(format_date(None), "-");
    }
}

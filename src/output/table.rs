//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Format data as a table
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No scans found.".to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

/// Two-column key/value table without a header row.
pub fn format_pairs(pairs: &[(&str, String)]) -> String {
    let mut builder = tabled::builder::Builder::default();
    for (key, value) in pairs {
        builder.push_record([key.to_string(), value.clone()]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Tabled)]
    struct TestRow {
        #[tabled(rename = "SCAN ID")]
        id: String,
        #[tabled(rename = "TARGET")]
        target: String,
    }

    #[test]
    fn test_format_table_empty() {
        let items: Vec<TestRow> = vec![];
        assert_eq!(format_table(&items), "No scans found.");
    }

    #[test]
    fn test_format_table_rows() {
        let items = vec![
            TestRow {
                id: "scan-aaaaaa".to_string(),
                target: "https://a.example.com".to_string(),
            },
            TestRow {
                id: "scan-bbbbbb".to_string(),
                target: "https://b.example.com".to_string(),
            },
        ];

        let result = format_table(&items);

        assert!(result.contains("SCAN ID"));
        assert!(result.contains("TARGET"));
        assert!(result.contains("scan-aaaaaa"));
        assert!(result.contains("https://b.example.com"));
    }

    #[test]
    fn test_format_table_uses_rounded_style() {
        let items = vec![TestRow {
            id: "1".to_string(),
            target: "t".to_string(),
        }];

        let result = format_table(&items);

        // Rounded style uses ╭ for top-left corner
        assert!(result.contains("╭"));
        assert!(result.contains("╰"));
    }

    #[test]
    fn test_format_pairs() {
        let result = format_pairs(&[("Concurrency limit", "5".to_string())]);
        assert!(result.contains("Concurrency limit"));
        assert!(result.contains('5'));
    }
}

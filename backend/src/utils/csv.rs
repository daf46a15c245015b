fn needs_formula_guard(value: &str) -> bool {
    matches!(value.chars().next(), Some('=' | '+' | '-' | '@'))
}

/// Prefixes spreadsheet formula triggers so exported cells stay inert.
pub fn sanitize_cell(value: &str) -> String {
    if needs_formula_guard(value) {
        format!("'{}", value)
    } else {
        value.to_string()
    }
}

/// Serializes `header` and `rows` as CSV with every field quoted and sanitized.
pub fn write_csv(header: &[&str], rows: &[Vec<String>]) -> anyhow::Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row.iter().map(|field| sanitize_cell(field)))?;
    }
    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_cells_are_prefixed() {
        assert_eq!(sanitize_cell("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(sanitize_cell("@cmd"), "'@cmd");
        assert_eq!(sanitize_cell("plain"), "plain");
    }

    #[test]
    fn write_csv_quotes_everything() {
        let csv = write_csv(
            &["id", "reason"],
            &[vec!["1".to_string(), "said \"no\"".to_string()]],
        )
        .unwrap();
        assert_eq!(csv, "\"id\",\"reason\"\n\"1\",\"said \"\"no\"\"\"\n");
    }
}

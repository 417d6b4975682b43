//! Data-line selection for CSV iteration data.

/// Keeps the header plus rows whose first column contains any selector.
///
/// `selectors` is `;`-separated; empty selectors are ignored. Returns `None`
/// when no data row matches.
#[must_use]
pub fn filter_data_lines(content: &str, selectors: &str) -> Option<String> {
    let selectors: Vec<&str> = selectors
        .split(';')
        .map(str::trim)
        .filter(|selector| !selector.is_empty())
        .collect();

    let mut lines = content.lines();
    let header = lines.next()?;
    let rows: Vec<&str> = lines
        .filter(|line| {
            let first_column = line.split(',').next().unwrap_or_default();
            selectors
                .iter()
                .any(|selector| first_column.contains(selector))
        })
        .collect();

    if rows.is_empty() {
        return None;
    }

    let mut filtered = String::with_capacity(content.len());
    for line in std::iter::once(header).chain(rows) {
        filtered.push_str(line);
        filtered.push('\n');
    }
    Some(filtered)
}

/// Whether a data file supports data-line selection.
#[must_use]
pub fn is_csv(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(".csv")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const DATA: &str = "case,user,expected\nlogin-ok,alice,200\nlogin-bad,bob,401\nlogout,alice,204\n";

    #[rstest]
    fn keeps_header_and_matching_rows() {
        let filtered = filter_data_lines(DATA, "login").expect("rows should match");

        assert_eq!(
            filtered,
            "case,user,expected\nlogin-ok,alice,200\nlogin-bad,bob,401\n"
        );
    }

    #[rstest]
    fn any_selector_matches() {
        let filtered = filter_data_lines(DATA, "ok;logout").expect("rows should match");

        assert_eq!(filtered, "case,user,expected\nlogin-ok,alice,200\nlogout,alice,204\n");
    }

    #[rstest]
    fn only_first_column_is_matched() {
        assert_eq!(filter_data_lines(DATA, "alice"), None);
    }

    #[rstest]
    #[case::no_match("missing")]
    #[case::empty_selectors(";;")]
    fn unmatched_selectors_yield_none(#[case] selectors: &str) {
        assert_eq!(filter_data_lines(DATA, selectors), None);
    }

    #[rstest]
    fn empty_content_yields_none() {
        assert_eq!(filter_data_lines("", "login"), None);
    }

    #[rstest]
    #[case("Orders.data.csv", true)]
    #[case("Orders.data.CSV", true)]
    #[case("Orders.data.json", false)]
    fn csv_detection(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_csv(name), expected);
    }
}

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

/// Anchor hrefs we treat as tabular downloads.
static TABULAR_SELECTOR: &str =
    r#"a[href$=".csv"], a[href$=".CSV"], a[href$=".xlsx"], a[href$=".xls"]"#;

/// Scan static markup for anchors pointing at tabular files, resolved
/// against `base`. Script bodies are never evaluated, so a page that builds
/// its download link in JS comes back empty and the caller falls back to the
/// reconstructed pattern candidates.
pub fn extract_tabular_links(html: &str, base: &Url) -> Vec<Url> {
    let selector =
        Selector::parse(TABULAR_SELECTOR).expect("Invalid CSS selector for tabular links");

    let links = Html::parse_document(html)
        .select(&selector)
        .filter_map(|e| e.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .collect::<Vec<_>>();

    debug!(base = %base, count = links.len(), "extracted tabular links");
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.censtatd.gov.hk/en/web_table.html?id=HEA001").unwrap()
    }

    #[test]
    fn finds_absolute_and_relative_csv_links() {
        let html = r#"
            <html><body>
              <a href="/attachment/Table_HEA001_en.csv">Download CSV</a>
              <a href="https://example.org/other.xlsx">Excel</a>
              <a href="ignore.pdf">PDF</a>
            </body></html>
        "#;
        let links = extract_tabular_links(html, &base());
        assert_eq!(links.len(), 2);
        assert_eq!(
            links[0].as_str(),
            "https://www.censtatd.gov.hk/attachment/Table_HEA001_en.csv"
        );
        assert_eq!(links[1].as_str(), "https://example.org/other.xlsx");
    }

    #[test]
    fn script_built_links_are_invisible() {
        // The documented failure case: the real link only exists inside JS.
        let html = r#"
            <html><body>
              <script>
                var f = "Table_" + tableId + "_en.csv";
                download("/attachment/" + f);
              </script>
              <a href="/en/about.html">About</a>
            </body></html>
        "#;
        assert!(extract_tabular_links(html, &base()).is_empty());
    }

    #[test]
    fn empty_document_yields_no_links() {
        assert!(extract_tabular_links("", &base()).is_empty());
    }
}

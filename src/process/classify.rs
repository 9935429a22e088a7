use crate::process::clean::is_known_column;

/// What the fetched body actually is, decided from content alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Csv,
    Html,
    Unknown,
}

/// Classify fetched bytes as CSV, HTML, or neither.
///
/// HTML wins on a markup declaration or root tag. CSV requires the first
/// non-empty line to split into at least two delimited fields with a header
/// that plausibly names one of the expected columns; the endpoint is known to
/// return CSV text under a `text/html` content type, so transport hints are
/// ignored here.
pub fn classify(bytes: &[u8]) -> ContentKind {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    let lowered = trimmed
        .chars()
        .take(1024)
        .collect::<String>()
        .to_ascii_lowercase();

    if lowered.starts_with("<!doctype") || lowered.starts_with("<html") || lowered.contains("<html")
    {
        return ContentKind::Html;
    }

    if let Some(header) = trimmed.lines().find(|l| !l.trim().is_empty()) {
        let delimiter = if header.matches('\t').count() > header.matches(',').count() {
            '\t'
        } else {
            ','
        };
        let fields: Vec<&str> = header.split(delimiter).map(str::trim).collect();
        if fields.len() >= 2 && fields.iter().any(|f| is_known_column(f)) {
            return ContentKind::Csv;
        }
    }

    ContentKind::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doctype_and_root_tag_are_html() {
        assert_eq!(classify(b"<!DOCTYPE html><html></html>"), ContentKind::Html);
        assert_eq!(classify(b"<html lang=\"en\"><body/></html>"), ContentKind::Html);
        assert_eq!(
            classify(b"\n  <!doctype HTML>\n<head></head>"),
            ContentKind::Html
        );
    }

    #[test]
    fn plausible_header_is_csv() {
        assert_eq!(
            classify(b"AgeGroup,Sex,Height,Weight\n18-24,Male,1.75,70\n"),
            ContentKind::Csv
        );
        assert_eq!(
            classify(b"Age group\tGender\tMean BMI\n18-24\tMale\t22.1\n"),
            ContentKind::Csv
        );
    }

    #[test]
    fn bom_prefixed_csv_is_still_csv() {
        assert_eq!(
            classify("\u{feff}Age Group,Sex,BMI\n18-24,M,21.0\n".as_bytes()),
            ContentKind::Csv
        );
    }

    #[test]
    fn junk_is_unknown() {
        assert_eq!(classify(b"\x00\x01\x02\x03"), ContentKind::Unknown);
        assert_eq!(classify(b"hello world"), ContentKind::Unknown);
        assert_eq!(classify(b"a,b\n1,2\n"), ContentKind::Unknown);
        assert_eq!(classify(b""), ContentKind::Unknown);
    }
}

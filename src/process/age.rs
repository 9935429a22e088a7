use once_cell::sync::Lazy;
use regex::Regex;

/// A numeric age band parsed from a source label like `"18-24"` or `"80+"`.
/// `upper` is `None` for open-ended bands ("80 and over").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBand {
    pub lower: u32,
    pub upper: Option<u32>,
}

impl AgeBand {
    /// Whether any part of the band falls inside `[min, max]`.
    pub fn overlaps(&self, min: u32, max: u32) -> bool {
        let upper = self.upper.unwrap_or(u32::MAX);
        upper >= min && self.lower <= max
    }
}

static RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,3})\s*[-–]\s*(\d{1,3})").unwrap());
static PLUS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,3})\s*\+").unwrap());
static OVER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{1,3})\s*(?:and\s+)?(?:over|above)").unwrap());
static SINGLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,3})$").unwrap());

/// Parse the age-group labels this table uses: `"18-24"` (hyphen or en-dash),
/// `"80+"`, `"80 and over"`, or a bare single age. Returns `None` for
/// anything else ("All ages", totals rows, blanks).
pub fn parse_age_band(raw: &str) -> Option<AgeBand> {
    let s = raw.trim();

    if let Some(caps) = RANGE_RE.captures(s) {
        let lower: u32 = caps[1].parse().ok()?;
        let upper: u32 = caps[2].parse().ok()?;
        return Some(AgeBand {
            lower,
            upper: Some(upper),
        });
    }
    if let Some(caps) = PLUS_RE.captures(s).or_else(|| OVER_RE.captures(s)) {
        let lower: u32 = caps[1].parse().ok()?;
        return Some(AgeBand { lower, upper: None });
    }
    if let Some(caps) = SINGLE_RE.captures(s) {
        let age: u32 = caps[1].parse().ok()?;
        return Some(AgeBand {
            lower: age,
            upper: Some(age),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_band_shapes() {
        assert_eq!(
            parse_age_band("18-24"),
            Some(AgeBand {
                lower: 18,
                upper: Some(24)
            })
        );
        assert_eq!(
            parse_age_band("25 – 34"),
            Some(AgeBand {
                lower: 25,
                upper: Some(34)
            })
        );
        assert_eq!(parse_age_band("80+"), Some(AgeBand { lower: 80, upper: None }));
        assert_eq!(
            parse_age_band("80 and over"),
            Some(AgeBand { lower: 80, upper: None })
        );
        assert_eq!(
            parse_age_band("30"),
            Some(AgeBand {
                lower: 30,
                upper: Some(30)
            })
        );
    }

    #[test]
    fn rejects_non_numeric_labels() {
        assert_eq!(parse_age_band("All ages"), None);
        assert_eq!(parse_age_band(""), None);
        assert_eq!(parse_age_band("Total"), None);
    }

    #[test]
    fn overlap_respects_band_edges() {
        let band = parse_age_band("15-17").unwrap();
        assert!(!band.overlaps(18, 80));
        let band = parse_age_band("15-20").unwrap();
        assert!(band.overlaps(18, 80));
        let band = parse_age_band("80 and over").unwrap();
        assert!(band.overlaps(18, 80));
        let band = parse_age_band("85+").unwrap();
        assert!(!band.overlaps(18, 80));
    }
}

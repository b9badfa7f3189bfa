//! Domestic-worker wage scale page.
//!
//! The page is flattened to plain text, then the hourly and monthly amounts of
//! the care-worker category are read from a fixed window after its heading.

use regex::Regex;
use scraper::{Html, Node};

use crate::domain::WagePair;
use crate::error::AppError;

/// Heading of the category whose wages price care time.
pub const CATEGORY_HEADING: &str = "CUARTA CATEGORIA";

/// Characters scanned after the heading.
pub const SCAN_WINDOW_CHARS: usize = 1200;

const WAGE_PATTERN: &str = r"Hora:\s*\$?\s*([\d.,]+)\s*Mensual:\s*\$?\s*([\d.,]+)";

/// Visible text of an HTML page: trimmed text nodes joined with one space.
pub fn page_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let mut parts: Vec<&str> = Vec::new();

    for node in doc.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element().map(|e| matches!(e.name(), "script" | "style")))
            .unwrap_or(false);
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}

/// Hourly and monthly wage from the flattened page text.
pub fn extract_wages(text: &str) -> Result<WagePair, AppError> {
    let start = text.find(CATEGORY_HEADING).ok_or_else(|| {
        AppError::wage_text(format!("Wage page: heading '{CATEGORY_HEADING}' not found."))
    })?;

    let window = char_window(&text[start..], SCAN_WINDOW_CHARS);
    let re = Regex::new(WAGE_PATTERN)
        .map_err(|e| AppError::wage_text(format!("Invalid wage pattern: {e}")))?;

    let caps = re.captures(window).ok_or_else(|| {
        AppError::wage_text(format!(
            "Wage page: hourly/monthly amounts not found within {SCAN_WINDOW_CHARS} characters of '{CATEGORY_HEADING}'."
        ))
    })?;

    let hourly = parse_localized_amount(&caps[1])
        .ok_or_else(|| AppError::wage_text(format!("Wage page: unreadable hourly amount '{}'.", &caps[1])))?;
    let monthly = parse_localized_amount(&caps[2])
        .ok_or_else(|| AppError::wage_text(format!("Wage page: unreadable monthly amount '{}'.", &caps[2])))?;

    Ok(WagePair { hourly, monthly })
}

/// Flatten and extract in one step.
pub fn parse_wage_page(html: &str) -> Result<WagePair, AppError> {
    extract_wages(&page_text(html))
}

/// Parse an amount written with `.` thousands separators and a `,` decimal mark.
///
/// `"3.425,50"` is 3425.5 and `"412.000"` is 412000.
pub fn parse_localized_amount(s: &str) -> Option<f64> {
    let s = s.trim().trim_end_matches(['.', ',']);
    if s.is_empty() {
        return None;
    }
    let normalized = s.replace('.', "").replace(',', ".");
    let v = normalized.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

fn char_window(s: &str, chars: usize) -> &str {
    match s.char_indices().nth(chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const PAGE: &str = r#"<html><head><style>.x { color: red }</style>
<script>var CUARTA = "CATEGORIA";</script></head>
<body>
  <h2>TERCERA CATEGORIA</h2><p>Hora: $ 3.100,00 Mensual: $ 380.000,00</p>
  <h2>CUARTA CATEGORIA</h2>
  <p>Personal para tareas específicas</p>
  <table><tr><td>Hora:</td><td>$ 3.000,00</td></tr>
  <tr><td>Mensual:</td><td>$ 366.000,00</td></tr></table>
</body></html>"#;

    #[test]
    fn reads_category_wages_from_page() {
        let wages = parse_wage_page(PAGE).unwrap();
        assert_eq!(wages.hourly, 3_000.0);
        assert_eq!(wages.monthly, 366_000.0);
    }

    #[test]
    fn flattening_skips_scripts_and_styles() {
        let text = page_text(PAGE);
        assert!(!text.contains("color"));
        assert!(!text.contains("var CUARTA"));
        assert!(text.contains("CUARTA CATEGORIA Personal para tareas específicas Hora: $ 3.000,00"));
    }

    #[test]
    fn missing_heading_is_wage_text_error() {
        let err = extract_wages("TERCERA CATEGORIA Hora: 1,00 Mensual: 2,00").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WageText);
        assert!(err.message().contains(CATEGORY_HEADING));
    }

    #[test]
    fn amounts_outside_window_are_not_found() {
        let text = format!("{CATEGORY_HEADING} {} Hora: 1.000 Mensual: 2.000", "x".repeat(SCAN_WINDOW_CHARS));
        let err = extract_wages(&text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WageText);
    }

    #[test]
    fn dollar_sign_is_optional() {
        let wages = extract_wages("CUARTA CATEGORIA Hora: 2.950 Mensual:361.500,5").unwrap();
        assert_eq!(wages.hourly, 2_950.0);
        assert_eq!(wages.monthly, 361_500.5);
    }

    #[test]
    fn localized_amounts() {
        assert_eq!(parse_localized_amount("3.425,50"), Some(3_425.5));
        assert_eq!(parse_localized_amount("412.000"), Some(412_000.0));
        assert_eq!(parse_localized_amount("412.000,"), Some(412_000.0));
        assert_eq!(parse_localized_amount("0,5"), Some(0.5));
        assert_eq!(parse_localized_amount(""), None);
        assert_eq!(parse_localized_amount(".,"), None);
    }
}

//! Startup seeding of the country name/code lookups.
//!
//! The source page is a plain HTML document with a table whose rows carry the
//! country name in the second cell and the dialing code in the third. Only
//! that much structure is relied upon.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use thiserror::Error;

static TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<table\b[^>]*>(.*?)</table>").expect("valid regex"));
static THEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<thead\b[^>]*>.*?</thead>").expect("valid regex"));
static ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr>").expect("valid regex"));
static CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td\b[^>]*>(.*?)</td>").expect("valid regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("valid regex")
});

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to fetch country codes: {0}")]
    Http(#[from] reqwest::Error),
    #[error("no country code rows found in document")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryCode {
    pub name: String,
    pub code: String,
}

/// Downloads and parses the country code table
#[derive(Debug, Clone)]
pub struct CountryCodeLoader {
    client: reqwest::Client,
    url: String,
}

impl CountryCodeLoader {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, BootstrapError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch(&self) -> Result<Vec<CountryCode>, BootstrapError> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let rows = parse_country_table(&body);
        if rows.is_empty() {
            return Err(BootstrapError::Empty);
        }
        Ok(rows)
    }
}

/// Extracts `(name, code)` pairs from every body row with at least three cells.
pub fn parse_country_table(html: &str) -> Vec<CountryCode> {
    let mut codes = Vec::new();
    for table in TABLE.captures_iter(html) {
        let body = THEAD.replace_all(&table[1], "");
        for row in ROW.captures_iter(&body) {
            let cells: Vec<String> = CELL
                .captures_iter(&row[1])
                .map(|cell| cell_text(&cell[1]))
                .collect();
            if cells.len() < 3 {
                continue;
            }
            let (name, code) = (&cells[1], &cells[2]);
            if name.is_empty() || code.is_empty() {
                continue;
            }
            codes.push(CountryCode {
                name: name.clone(),
                code: code.clone(),
            });
        }
    }
    codes
}

fn cell_text(fragment: &str) -> String {
    let text = TAG.replace_all(fragment, " ");
    let text = ENTITY.replace_all(&text, |caps: &regex::Captures| {
        decode_entity(&caps[1]).map_or_else(|| caps[0].to_string(), String::from)
    });
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// Numeric references plus the few named ones seen in practice; anything else is kept verbatim.
fn decode_entity(entity: &str) -> Option<char> {
    let numeric = match entity.strip_prefix('#') {
        Some(hex) if hex.starts_with(['x', 'X']) => u32::from_str_radix(&hex[1..], 16).ok(),
        Some(dec) => dec.parse().ok(),
        None => None,
    };
    if let Some(code) = numeric {
        return char::from_u32(code);
    }
    match entity {
        "nbsp" => Some(' '),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <table class="codes">
          <thead><tr><td>#</td><td>Country</td><td>Code</td></tr></thead>
          <tbody>
            <tr><td>1</td><td><b>Belarus</b></td><td>+375</td></tr>
            <tr class="odd"><td>2</td><td>Bosnia &amp; Herzegovina</td><td> +387 </td></tr>
            <tr><td>3</td><td>Incomplete</td></tr>
            <tr><td>4</td><td>  </td><td>+000</td></tr>
            <tr>
              <td>5</td>
              <td>United
                  Kingdom</td>
              <td>+44</td>
            </tr>
          </tbody>
        </table>
        </body></html>
    "#;

    #[test]
    fn parses_body_rows_with_three_cells() {
        let codes = parse_country_table(PAGE);
        assert_eq!(
            codes,
            vec![
                CountryCode {
                    name: "Belarus".into(),
                    code: "+375".into()
                },
                CountryCode {
                    name: "Bosnia & Herzegovina".into(),
                    code: "+387".into()
                },
                CountryCode {
                    name: "United Kingdom".into(),
                    code: "+44".into()
                },
            ]
        );
    }

    #[test]
    fn rows_without_tbody_are_still_read() {
        let html = "<table><tr><td>1</td><td>Poland</td><td>+48</td></tr></table>";
        assert_eq!(parse_country_table(html).len(), 1);
    }

    #[test]
    fn numeric_references_are_decoded_once() {
        let html = "<table>\
            <tr><td>1</td><td>&#1041;&#1077;&#1083;&#1072;&#1088;&#1091;&#1089;&#1100;</td><td>&#x2B;375</td></tr>\
            <tr><td>2</td><td>Trinidad &#38;amp; Tobago</td><td>+1&#8212;868</td></tr>\
            <tr><td>3</td><td>Cura&ccedil;ao</td><td>+599</td></tr>\
            </table>";

        let codes = parse_country_table(html);

        assert_eq!(codes[0].name, "Беларусь");
        assert_eq!(codes[0].code, "+375");
        assert_eq!(codes[1].name, "Trinidad &amp; Tobago");
        assert_eq!(codes[1].code, "+1\u{2014}868");
        assert_eq!(codes[2].name, "Cura&ccedil;ao");
    }

    #[test]
    fn document_without_table_yields_nothing() {
        assert!(parse_country_table("<p>maintenance</p>").is_empty());
    }

    #[tokio::test]
    async fn unreachable_source_is_an_error() {
        let loader =
            CountryCodeLoader::new("http://127.0.0.1:9/country_code.html", Duration::from_secs(2))
                .unwrap();
        assert!(matches!(loader.fetch().await, Err(BootstrapError::Http(_))));
    }
}

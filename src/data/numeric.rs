//! Locale-aware number reading and the display formats used in hover labels.
//!
//! Source spreadsheets are exported from French and English tooling, so the
//! same column may hold `1234.5`, `1234,5` or `1 234,5`. Approximate figures
//! are marked with a leading `~`.

use serde::{Deserialize, Serialize};

/// How text cells are read as numbers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberStyle {
    /// Rust float syntax only
    Plain,
    /// Comma is the decimal separator; spaces group thousands
    #[default]
    DecimalComma,
    /// Like `DecimalComma`, and a `~` approximation marker is ignored
    Approximate,
}

/// Read `raw` under `style`, `None` when it is not a number.
pub fn parse_number(raw: &str, style: NumberStyle) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value = match style {
        NumberStyle::Plain => trimmed.parse::<f64>().ok(),
        NumberStyle::DecimalComma => normalize_decimal_comma(trimmed).parse::<f64>().ok(),
        NumberStyle::Approximate => {
            normalize_decimal_comma(&trimmed.replace('~', "")).parse::<f64>().ok()
        }
    }?;
    value.is_finite().then_some(value)
}

/// True when the raw text carries the approximation marker.
pub fn is_approximate(raw: &str) -> bool {
    raw.trim_start().starts_with('~')
}

fn normalize_decimal_comma(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect()
}

/// Format with `,` thousands separators and a fixed number of decimals,
/// the way `{:,.Nf}` does.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (formatted.clone(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (count, c) in int_part.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let mut result: String = grouped.chars().rev().collect();

    if let Some(frac) = frac_part {
        result.push('.');
        result.push_str(&frac);
    }
    let is_zero = result.chars().all(|c| matches!(c, '0' | '.' | ','));
    if value.is_sign_negative() && !is_zero {
        result.insert(0, '-');
    }
    result
}

/// Keep three or four significant figures for popup ranges.
pub fn keep_4_figures(value: f64) -> String {
    if value >= 100.0 {
        format_thousands(value, 0)
    } else if value >= 10.0 {
        format_thousands(value, 1)
    } else {
        format_thousands(value, 2)
    }
}

/// Dollar amount in millions (`$12.3M`) or billions (`$1.2B`).
pub fn format_money(dollars: f64) -> String {
    let millions = dollars / 1_000_000.0;
    if millions < 1000.0 {
        format!("${:.1}M", millions)
    } else {
        format!("${:.1}B", millions / 1000.0)
    }
}

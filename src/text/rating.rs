use crate::overlay::spec::{RatingFormat, TextContent};

/// Format a 0..10 rating for display.
pub fn format_rating(value: f64, format: RatingFormat) -> String {
    match format {
        RatingFormat::Decimal => format!("{value:.1}"),
        RatingFormat::TrimmedDecimal => {
            let s = format!("{value:.1}");
            match s.strip_suffix(".0") {
                Some(whole) => whole.to_owned(),
                None => s,
            }
        }
        RatingFormat::Percent => format!("{}%", (value * 10.0).round() as i64),
        RatingFormat::Scaled => format!("{}", (value * 10.0).round() as i64),
    }
}

/// Text to draw for `content`.
///
/// Literal text is returned as is. Rating text needs the item's rating; without one there is
/// nothing to draw.
pub fn render_text(content: &TextContent, rating: Option<f64>) -> Option<String> {
    match content {
        TextContent::Literal(s) => Some(s.clone()),
        TextContent::Rating { format, .. } => rating.map(|v| format_rating(v, *format)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/rating.rs"]
mod tests;

//! Star rating markup.

/// Highest rating; every rendering has exactly this many markers.
pub const MAX_STARS: u8 = 5;

pub const FILLED_STAR: &str = r#"<span class="glyphicon glyphicon-star"></span>"#;
pub const EMPTY_STAR: &str = r#"<span class="glyphicon glyphicon-star-empty"></span>"#;

/// Render `stars` filled markers in `color` followed by empty markers up to
/// [`MAX_STARS`]. Ratings above the maximum are clamped.
pub fn render_stars(stars: u8, color: &str) -> String {
    let filled = usize::from(stars.min(MAX_STARS));
    let empty = usize::from(MAX_STARS) - filled;

    format!(
        "<font color=\"{}\">{}</font>{}",
        super::escape_html(color),
        FILLED_STAR.repeat(filled),
        EMPTY_STAR.repeat(empty)
    )
}

//! Partial content extraction from rendered templates

use std::borrow::Cow;

/// Opening partial marker
pub const START_MARKER: &str = "<!-- HTMX_PARTIAL_START -->";
/// Closing partial marker
pub const END_MARKER: &str = "<!-- HTMX_PARTIAL_END -->";

/// Content between the partial markers, trimmed; the whole input if the
/// markers are missing
#[must_use]
pub fn extract_partial(html: &str) -> Cow<'_, str> {
    let Some(start) = html.find(START_MARKER).map(|pos| pos + START_MARKER.len()) else {
        return Cow::Borrowed(html);
    };

    html[start..]
        .find(END_MARKER)
        .map_or(Cow::Borrowed(html), |end| {
            Cow::Borrowed(html[start..start + end].trim())
        })
}

//! Text measurement, truncation, and wrapping utilities.
//!
//! Every function takes the measurement as a callback so callers can plug in
//! a real renderer; [`CharWidthEstimate`] covers the case where none exists.

/// Appended to shortened labels.
pub const ELLIPSIS: &str = "…";

/// Heuristic: estimate pixel width of text (average glyph ≈ 0.6 em).
pub fn estimate_text_width_px(text: &str, font_px: f64) -> f64 {
    ((text.chars().count() as f64) * font_px * 0.60).ceil()
}

/// Measurement based on [`estimate_text_width_px`] for a fixed font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharWidthEstimate {
    pub font_px: f64,
}

impl CharWidthEstimate {
    pub fn new(font_px: f64) -> Self {
        Self { font_px }
    }

    pub fn measure(&self, text: &str) -> f64 {
        estimate_text_width_px(text, self.font_px)
    }
}

/// Truncate to fit `max_width` and add a single ellipsis if needed.
///
/// Text that already fits is returned unchanged. Otherwise the longest prefix
/// `p` with `measure(p + "…") <= max_width` is found by binary search (`measure`
/// must grow with the prefix length). If not even a lone ellipsis fits, the
/// ellipsis is returned anyway.
pub fn truncate_to_width<F>(text: &str, max_width: f64, measure: F) -> String
where
    F: Fn(&str) -> f64,
{
    if text.is_empty() || measure(text) <= max_width {
        return text.to_string();
    }
    // bounds[k] = byte length of the k-character prefix, for k < char count
    let bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let with_ellipsis = |k: usize| format!("{}{ELLIPSIS}", &text[..bounds[k]]);
    let fits = |k: usize| measure(&with_ellipsis(k)) <= max_width;

    if !fits(0) {
        return ELLIPSIS.to_string();
    }
    let (mut lo, mut hi) = (0, bounds.len() - 1);
    while lo < hi {
        let mid = lo + (hi - lo).div_ceil(2);
        if fits(mid) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    with_ellipsis(lo)
}

/// Wrap text to fit within a maximum width, breaking on word boundaries where possible.
pub fn wrap_text_to_width<F>(text: &str, max_width: f64, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut lines: Vec<String> = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        let candidate = if cur.is_empty() {
            word.to_string()
        } else {
            format!("{cur} {word}")
        };
        if measure(&candidate) <= max_width {
            cur = candidate;
            continue;
        }
        if !cur.is_empty() {
            lines.push(std::mem::take(&mut cur));
        }
        if measure(word) <= max_width {
            cur = word.to_string();
            continue;
        }
        // Single long word: hard-break by characters
        let mut buf = String::new();
        for ch in word.chars() {
            let cand = format!("{buf}{ch}");
            if measure(&cand) > max_width && !buf.is_empty() {
                lines.push(std::mem::replace(&mut buf, ch.to_string()));
            } else {
                buf = cand;
            }
        }
        cur = buf;
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn six_px(s: &str) -> f64 {
        6.0 * s.chars().count() as f64
    }

    #[test]
    fn fitting_text_is_untouched() {
        let long = "a".repeat(200);
        assert_eq!(truncate_to_width(&long, 1e9, six_px), long);
        assert_eq!(truncate_to_width("", 0.0, six_px), "");
    }

    #[test]
    fn truncates_on_char_boundaries() {
        // 13 chars max including the ellipsis
        assert_eq!(
            truncate_to_width("Situación económica general", 80.0, six_px),
            "Situación ec…"
        );
    }

    #[test]
    fn floor_is_a_lone_ellipsis() {
        assert_eq!(truncate_to_width("Hello", 3.0, six_px), ELLIPSIS);
        assert_eq!(truncate_to_width("Hello", 6.0, six_px), ELLIPSIS);
        assert_eq!(truncate_to_width("Hello", 12.0, six_px), "H…");
    }

    #[test]
    fn estimate_matches_font_size() {
        assert_eq!(estimate_text_width_px("abcde", 10.0), 30.0);
        assert_eq!(CharWidthEstimate::new(12.0).measure("ab"), 15.0);
    }

    #[test]
    fn wrap_breaks_words_and_long_tokens() {
        let lines = wrap_text_to_width("Expectativas de la situación general", 84.0, six_px);
        assert_eq!(lines, vec!["Expectativas", "de la", "situación", "general"]);
        for l in &lines {
            assert!(six_px(l) <= 84.0);
        }

        let lines = wrap_text_to_width("abcdefghij", 24.0, six_px);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }
}

//! Helvetica glyph metrics and line wrapping.

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Advance widths of Helvetica for ASCII 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Width used for anything outside printable ASCII.
const FALLBACK_WIDTH: u16 = 556;

fn glyph_width(c: char) -> u16 {
    let code = c as u32;
    if (32..=126).contains(&code) {
        HELVETICA_WIDTHS[(code - 32) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

/// Measures text set in regular Helvetica at a given size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Helvetica {
    /// Font size in points.
    pub size_pt: f32,
}

impl Helvetica {
    #[must_use]
    pub fn new(size_pt: f32) -> Self {
        Self { size_pt }
    }

    /// Width of `text` in millimetres.
    #[must_use]
    pub fn width_mm(&self, text: &str) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(glyph_width(c))).sum();
        units as f32 / 1000.0 * self.size_pt / PT_PER_MM
    }

    /// Break `text` into lines no wider than `max_width_mm`.
    ///
    /// Explicit newlines always start a new line. Lines break between
    /// words; a single word wider than the limit is split by characters.
    /// Empty input yields no lines.
    #[must_use]
    pub fn wrap(&self, text: &str, max_width_mm: f32) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let paragraph = paragraph.trim_end_matches('\r');
            self.wrap_paragraph(paragraph, max_width_mm, &mut lines);
        }
        lines
    }

    fn wrap_paragraph(&self, paragraph: &str, max_width_mm: f32, out: &mut Vec<String>) {
        let mut current = String::new();

        for word in paragraph.split(' ') {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };

            if self.width_mm(&candidate) <= max_width_mm {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }

            if self.width_mm(word) <= max_width_mm {
                current = word.to_string();
            } else {
                let mut pieces = self.split_word(word, max_width_mm);
                // The last fragment stays open so following words can join it.
                current = pieces.pop().unwrap_or_default();
                out.extend(pieces);
            }
        }

        out.push(current);
    }

    fn split_word(&self, word: &str, max_width_mm: f32) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut piece = String::new();
        for c in word.chars() {
            piece.push(c);
            if self.width_mm(&piece) > max_width_mm && piece.chars().count() > 1 {
                piece.pop();
                pieces.push(std::mem::take(&mut piece));
                piece.push(c);
            }
        }
        pieces.push(piece);
        pieces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_scales_with_size() {
        let small = Helvetica::new(10.0).width_mm("Hello");
        let large = Helvetica::new(20.0).width_mm("Hello");
        assert!((large - 2.0 * small).abs() < 1e-4);
    }

    #[test]
    fn test_known_width() {
        // "ab" = 556 + 556 units; 12pt => 1.112 * 12 / PT_PER_MM mm
        let width = Helvetica::new(12.0).width_mm("ab");
        let expected = 1.112 * 12.0 / PT_PER_MM;
        assert!((width - expected).abs() < 1e-4);
    }

    #[test]
    fn test_short_text_is_one_line() {
        let lines = Helvetica::new(12.0).wrap("Hello there", 190.0);
        assert_eq!(lines, vec!["Hello there".to_string()]);
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(Helvetica::new(12.0).wrap("", 190.0).is_empty());
    }

    #[test]
    fn test_newlines_are_kept() {
        let lines = Helvetica::new(12.0).wrap("one\n\nthree", 190.0);
        assert_eq!(lines, vec!["one", "", "three"]);
    }

    #[test]
    fn test_wraps_between_words() {
        let font = Helvetica::new(12.0);
        let text = "word ".repeat(80);
        let lines = font.wrap(text.trim_end(), 190.0);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(font.width_mm(line) <= 190.0);
            assert!(!line.starts_with(' '));
        }
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text.trim_end());
    }

    #[test]
    fn test_long_word_is_split() {
        let font = Helvetica::new(12.0);
        let word = "x".repeat(200);
        let lines = font.wrap(&word, 50.0);

        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        assert!(lines.iter().all(|l| font.width_mm(l) <= 50.0));
    }
}

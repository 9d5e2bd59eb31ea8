use unicode_width::UnicodeWidthStr;

pub const GLYPH_HEIGHT: usize = 5;

fn glyph(c: char) -> Option<[&'static str; GLYPH_HEIGHT]> {
    let rows = match c {
        '0' => ["███", "█ █", "█ █", "█ █", "███"],
        '1' => [" █ ", "██ ", " █ ", " █ ", "███"],
        '2' => ["███", "  █", "███", "█  ", "███"],
        '3' => ["███", "  █", "███", "  █", "███"],
        '4' => ["█ █", "█ █", "███", "  █", "  █"],
        '5' => ["███", "█  ", "███", "  █", "███"],
        '6' => ["███", "█  ", "███", "█ █", "███"],
        '7' => ["███", "  █", "  █", "  █", "  █"],
        '8' => ["███", "█ █", "███", "█ █", "███"],
        '9' => ["███", "█ █", "███", "  █", "███"],
        ':' => [" ", "█", " ", "█", " "],
        _ => return None,
    };
    Some(rows)
}

/// Renders a clock string like `01:30` as five rows of block glyphs.
/// Returns None if the text contains anything other than digits and colons.
pub fn big_text(text: &str) -> Option<Vec<String>> {
    let glyphs = text.chars().map(glyph).collect::<Option<Vec<_>>>()?;
    let lines = (0..GLYPH_HEIGHT)
        .map(|row| {
            glyphs
                .iter()
                .map(|g| g[row])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    Some(lines)
}

pub fn big_text_width(lines: &[String]) -> usize {
    lines.iter().map(|l| l.width()).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_clock_as_five_equal_rows() {
        let lines = big_text("01:30").unwrap();
        assert_eq!(lines.len(), GLYPH_HEIGHT);
        // four 3-wide digits, one 1-wide colon, four gaps
        assert!(lines.iter().all(|l| l.width() == 4 * 3 + 1 + 4));
        assert_eq!(big_text_width(&lines), 17);
        assert_eq!(lines[0], "███  █    ███ ███");
    }

    #[test]
    fn rejects_unknown_characters() {
        assert!(big_text("1:0a").is_none());
    }
}

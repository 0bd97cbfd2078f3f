/// Typographic characters and the plain keyboard character they stand for.
const CANONICAL: &[(char, char)] = &[
    ('\u{2018}', '\''), // left single quote
    ('\u{2019}', '\''), // right single quote
    ('\u{201C}', '"'),
    ('\u{201D}', '"'),
    ('\u{2013}', '-'), // en dash
    ('\u{2014}', '-'), // em dash
    ('\u{00A0}', ' '), // non-breaking space
];

/// Map a typographic variant to what a keyboard produces. Anything else is
/// returned unchanged.
pub fn canonical_char(c: char) -> char {
    CANONICAL
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
        .unwrap_or(c)
}

/// Whether `typed` counts as a hit for `expected`: both sides are
/// canonicalized, then compared ignoring case.
pub fn chars_match(expected: char, typed: char) -> bool {
    let expected = canonical_char(expected);
    let typed = canonical_char(typed);

    expected == typed || expected.to_lowercase().eq(typed.to_lowercase())
}

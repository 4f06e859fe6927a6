//! Character predicates shared by the lexer and the matcher

/// `\n`, `\r`, LINE SEPARATOR and PARAGRAPH SEPARATOR
pub(crate) fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Word test for `\b`/`\B`. With both unicode and ignore-case, characters
/// that fold into the word set (`ſ`, KELVIN SIGN) count as well.
pub(crate) fn is_word_char_folded(c: char, unicode: bool, ignore_case: bool) -> bool {
    is_word_char(c) || (unicode && ignore_case && is_word_char(canonicalize(c, true)))
}

/// Simple case folds that differ from the single-character lower case
static FOLD_EXCEPTIONS: [(char, char); 13] = [
    ('\u{B5}', '\u{3BC}'),
    ('\u{17F}', 's'),
    ('\u{345}', '\u{3B9}'),
    ('\u{3C2}', '\u{3C3}'),
    ('\u{3D0}', '\u{3B2}'),
    ('\u{3D1}', '\u{3B8}'),
    ('\u{3D5}', '\u{3C6}'),
    ('\u{3D6}', '\u{3C0}'),
    ('\u{3F0}', '\u{3BA}'),
    ('\u{3F1}', '\u{3C1}'),
    ('\u{3F5}', '\u{3B5}'),
    ('\u{1E9B}', '\u{1E61}'),
    ('\u{1FBE}', '\u{3B9}'),
];

/// `\s`: white space plus line terminators, without NEL, plus the BOM
pub(crate) fn is_space(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}')
}

/// Characters that may be escaped with a backslash in unicode mode
pub(crate) fn is_syntax_char(c: char) -> bool {
    matches!(
        c,
        '^' | '$' | '\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '/'
    )
}

/// Test a `\d \D \w \W \s \S` shorthand
pub(crate) fn shorthand_matches(shorthand: char, c: char) -> bool {
    match shorthand {
        'd' => c.is_ascii_digit(),
        'D' => !c.is_ascii_digit(),
        'w' => is_word_char(c),
        'W' => !is_word_char(c),
        's' => is_space(c),
        'S' => !is_space(c),
        _ => false,
    }
}

/// Test a `\p{name}` property. `None` for names the engine does not know.
pub(crate) fn property_matches(name: &str, c: char) -> Option<bool> {
    let matched = match name {
        "Any" => true,
        "ASCII" => c.is_ascii(),
        "L" | "Letter" | "Alphabetic" | "Alpha" => c.is_alphabetic(),
        "Lu" | "Uppercase_Letter" | "Uppercase" | "Upper" => c.is_uppercase(),
        "Ll" | "Lowercase_Letter" | "Lowercase" | "Lower" => c.is_lowercase(),
        "N" | "Number" => c.is_numeric(),
        "White_Space" | "space" => c.is_whitespace(),
        "Cc" | "Control" => c.is_control(),
        "ASCII_Hex_Digit" | "AHex" => c.is_ascii_hexdigit(),
        _ => return None,
    };
    Some(matched)
}

pub(crate) fn is_known_property(name: &str) -> bool {
    property_matches(name, 'a').is_some()
}

/// Canonical form used for case-insensitive comparison.
///
/// Outside unicode mode characters map to their single-character upper case,
/// except that non-ASCII characters never map into ASCII. In unicode mode
/// characters map to their simple case fold.
pub(crate) fn canonicalize(c: char, unicode: bool) -> char {
    if unicode {
        FOLD_EXCEPTIONS
            .iter()
            .find(|(from, _)| *from == c)
            .map(|(_, to)| *to)
            .unwrap_or_else(|| single(c.to_lowercase()).unwrap_or(c))
    } else {
        match single(c.to_uppercase()) {
            Some(upper) if c.is_ascii() || !upper.is_ascii() => upper,
            _ => c,
        }
    }
}

/// Candidates that may share a canonical form with `c`: its single-character
/// cases, its fold, and the characters that fold onto the same target
pub(crate) fn case_variants(c: char, unicode: bool) -> impl Iterator<Item = char> {
    let folded = canonicalize(c, unicode);
    let partners = FOLD_EXCEPTIONS
        .iter()
        .filter(move |(_, to)| unicode && *to == folded)
        .map(|(from, _)| *from);
    [
        c,
        single(c.to_lowercase()).unwrap_or(c),
        single(c.to_uppercase()).unwrap_or(c),
        folded,
    ]
    .into_iter()
    .chain(partners)
}

fn single(mut it: impl Iterator<Item = char>) -> Option<char> {
    let first = it.next()?;
    match it.next() {
        Some(_) => None,
        None => Some(first),
    }
}

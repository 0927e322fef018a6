//! Semantic split-point search and text cleaning.

/// Rough token estimate: 1 token ~= 4 characters.
pub(crate) fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4
}

/// Find the best byte offset to split `text` near `target` (a character
/// budget already converted from tokens). Boundary patterns are tried in
/// priority order -- sentence end, paragraph break, clause break, plain
/// whitespace -- and within the first pattern that matches at all, the
/// offset closest to `target` wins. Returns `None` when the text has no
/// boundary of any kind (a single unbroken word).
pub(crate) fn find_semantic_split(text: &str, target: usize) -> Option<usize> {
    let passes: [fn(&str) -> Vec<usize>; 4] = [
        sentence_ends,
        paragraph_ends,
        clause_ends,
        whitespace_ends,
    ];
    for find in passes {
        let ends = find(text);
        if !ends.is_empty() {
            return ends.into_iter().min_by_key(|end| end.abs_diff(target));
        }
    }
    None
}

/// Offsets just past `. ` / `! ` / `? ` boundaries.
fn sentence_ends(text: &str) -> Vec<usize> {
    terminal_ends(text, &['.', '!', '?'])
}

/// Offsets just past `, ` / `; ` / `: ` boundaries.
fn clause_ends(text: &str) -> Vec<usize> {
    terminal_ends(text, &[',', ';', ':'])
}

fn terminal_ends(text: &str, terminals: &[char]) -> Vec<usize> {
    let mut ends = Vec::new();
    let mut iter = text.char_indices().peekable();
    while let Some((_, c)) = iter.next() {
        if terminals.contains(&c) {
            if let Some(&(j, next)) = iter.peek() {
                if next.is_whitespace() {
                    ends.push(j + next.len_utf8());
                }
            }
        }
    }
    ends
}

/// Offsets just past a blank line (a newline, optional whitespace, and a
/// final newline). Matches are non-overlapping, scanning left to right.
fn paragraph_ends(text: &str) -> Vec<usize> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut ends = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].1 == '\n' {
            let mut j = i + 1;
            let mut last_newline = None;
            while j < chars.len() && chars[j].1.is_whitespace() {
                if chars[j].1 == '\n' {
                    last_newline = Some(j);
                }
                j += 1;
            }
            if let Some(nl) = last_newline {
                ends.push(chars[nl].0 + 1);
                i = nl + 1;
                continue;
            }
        }
        i += 1;
    }
    ends
}

/// Offsets just past every whitespace character (last-resort boundary).
fn whitespace_ends(text: &str) -> Vec<usize> {
    text.char_indices()
        .filter(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .collect()
}

/// Walk `idx` back to the nearest char boundary at or before it.
pub(crate) fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    if idx >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Collapse whitespace runs to a single space and trim the ends.
pub(crate) fn clean_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            pending_space = true;
        } else {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }
    }
    out
}

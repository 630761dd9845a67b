// src/core/html.rs
// Low-level HTML slicing helpers. No DOM: everything works on string offsets
// into the original document, case-insensitive on ASCII tag/attribute names.
//
// Blocks are matched naively (first closing tag after the opener), which holds
// for the pool dashboard because none of the tags we slice on nest. Searches
// run on a lowercased copy with `<!-- … -->` blanked out, so commented markup
// is never matched.

use super::sanitize::{normalize_entities, normalize_ws};

/// ASCII-only lowercasing. Keeps byte offsets identical to the input.
pub fn to_lower(s: &str) -> String {
    s.to_ascii_lowercase()
}

/// Lowercased copy of `s` with every comment replaced by spaces, byte for
/// byte, so offsets found in it are valid in `s`.
fn search_view(s: &str) -> String {
    let lc = to_lower(s);
    if !lc.contains("<!--") {
        return lc;
    }
    let mut out = String::with_capacity(lc.len());
    let mut rest = lc.as_str();
    while let Some(open) = rest.find("<!--") {
        out.push_str(&rest[..open]);
        let end = rest[open..].find("-->").map_or(rest.len(), |e| open + e + 3);
        out.extend(std::iter::repeat_n(' ', end - open));
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}

/// Name of the tag a block or opening tag starts with (`<td class=x>` → `td`).
fn tag_name(open: &str) -> &str {
    let b = open.as_bytes();
    let mut i = 1;
    while i < b.len() && !b[i].is_ascii_whitespace() && b[i] != b'>' && b[i] != b'/' { i += 1; }
    open.get(1..i).unwrap_or("")
}

#[inline]
fn is_name_boundary(b: Option<u8>) -> bool {
    matches!(b, None | Some(b' ' | b'\t' | b'\r' | b'\n' | b'>' | b'/'))
}

/// Find `pat` (already lowercase, e.g. `<td` or `</td`) in `lc` at or after
/// `from`, skipping matches that are only a prefix of a longer tag name
/// (`<th` must not match `<thead`).
fn find_tag_ci(lc: &str, pat: &str, from: usize) -> Option<usize> {
    let mut at = from;
    loop {
        let i = lc.get(at..)?.find(pat)? + at;
        if is_name_boundary(lc.as_bytes().get(i + pat.len()).copied()) {
            return Some(i);
        }
        at = i + pat.len();
    }
}

/// Offset just past the `>` closing the tag that starts at `start`.
/// Quote-aware, so `onclick="a > b"` does not end the tag early.
fn tag_end(s: &str, start: usize) -> Option<usize> {
    let b = s.as_bytes();
    let (mut in_s, mut in_d) = (false, false);
    let mut i = start + 1;
    while i < b.len() {
        match b[i] {
            b'\'' if !in_d => in_s = !in_s,
            b'"' if !in_s => in_d = !in_d,
            b'>' if !in_s && !in_d => return Some(i + 1),
            _ => {}
        }
        i += 1;
    }
    None
}

/// With `implicit_close`, a block whose end tag is missing ends where the next
/// sibling opens, or at the end of `s`.
fn block_at(
    s: &str,
    lc: &str,
    open: &str,
    close: &str,
    from: usize,
    implicit_close: bool,
) -> Option<(usize, usize)> {
    let start = find_tag_ci(lc, open, from)?;
    let open_end = tag_end(s, start)?;
    let close_at = find_tag_ci(lc, close, open_end);
    if !implicit_close {
        return Some((start, tag_end(s, close_at?)?));
    }
    let end = match (close_at, find_tag_ci(lc, open, open_end)) {
        (Some(c), Some(next)) if next < c => next,
        (Some(c), _) => tag_end(s, c).unwrap_or(s.len()),
        (None, Some(next)) => next,
        (None, None) => s.len(),
    };
    Some((start, end))
}

/// Find the next complete `<tag …>…</tag>` block at or after `from`.
/// Returns byte offsets `(start_of_open_tag, end_of_close_tag)`.
pub fn next_tag_block_ci(s: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let lc = search_view(s);
    let tag = to_lower(tag);
    block_at(s, &lc, &format!("<{tag}"), &format!("</{tag}"), from, false)
}

/// First complete `<tag>…</tag>` block in `s`, open and close tags included.
pub fn first_block_ci<'a>(s: &'a str, tag: &str) -> Option<&'a str> {
    next_tag_block_ci(s, tag, 0).map(|(a, b)| &s[a..b])
}

/// Iterate every `<tag>…</tag>` block in `s`, in document order.
/// Blocks without an end tag are skipped.
pub fn tag_blocks_ci<'a>(s: &'a str, tag: &str) -> TagBlocks<'a> {
    TagBlocks::new(s, tag, false)
}

/// Like [`tag_blocks_ci`], for elements whose end tag HTML lets authors omit
/// (`tr`, `td`, `th`): an unclosed block runs up to the next sibling opener,
/// or to the end of `s`. Pass the parent's inner markup as `s`.
pub fn sibling_blocks_ci<'a>(s: &'a str, tag: &str) -> TagBlocks<'a> {
    TagBlocks::new(s, tag, true)
}

pub struct TagBlocks<'a> {
    s: &'a str,
    lc: String,
    open: String,
    close: String,
    implicit_close: bool,
    pos: usize,
}

impl<'a> TagBlocks<'a> {
    fn new(s: &'a str, tag: &str, implicit_close: bool) -> Self {
        let tag = to_lower(tag);
        TagBlocks {
            s,
            lc: search_view(s),
            open: format!("<{tag}"),
            close: format!("</{tag}"),
            implicit_close,
            pos: 0,
        }
    }
}

impl<'a> Iterator for TagBlocks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let (start, end) =
            block_at(self.s, &self.lc, &self.open, &self.close, self.pos, self.implicit_close)?;
        self.pos = end;
        Some(&self.s[start..end])
    }
}

/// First opening tag `<tag …>` in `s`, whether or not it is ever closed.
pub fn first_open_tag_ci<'a>(s: &'a str, tag: &str) -> Option<&'a str> {
    let lc = search_view(s);
    let start = find_tag_ci(&lc, &format!("<{}", to_lower(tag)), 0)?;
    let end = tag_end(s, start)?;
    Some(&s[start..end])
}

/// Given `<td …>INNER</td>`, return INNER (may still contain nested tags).
/// A block without its own end tag yields everything after the opener.
pub fn inner_after_open_tag(block: &str) -> &str {
    let Some(open_end) = tag_end(block, 0) else { return "" };
    let name = tag_name(block);
    let rest = &block[open_end..];
    match rest.rfind("</") {
        Some(i) if closes(&rest[i + 2..], name) => &rest[..i],
        _ => rest,
    }
}

/// Whether `after_slash` (text following `</`) names `tag`.
fn closes(after_slash: &str, tag: &str) -> bool {
    !tag.is_empty()
        && after_slash.get(..tag.len()).is_some_and(|t| t.eq_ignore_ascii_case(tag))
        && is_name_boundary(after_slash.as_bytes().get(tag.len()).copied())
}

/// Read attribute `name` from an opening tag. Handles `"…"`, `'…'` and bare
/// values; entities in the value are decoded. A bare attribute (`<td nowrap>`)
/// yields an empty string.
pub fn attr_ci(open_tag: &str, name: &str) -> Option<String> {
    let b = open_tag.as_bytes();
    let n = b.len();
    let mut i = 1;
    // skip tag name
    while i < n && !b[i].is_ascii_whitespace() && b[i] != b'>' && b[i] != b'/' { i += 1; }

    while i < n {
        while i < n && (b[i].is_ascii_whitespace() || b[i] == b'/') { i += 1; }
        if i >= n || b[i] == b'>' { return None; }

        let name_start = i;
        while i < n && !b[i].is_ascii_whitespace() && !matches!(b[i], b'=' | b'>' | b'/') { i += 1; }
        let attr_name = &open_tag[name_start..i];

        while i < n && b[i].is_ascii_whitespace() { i += 1; }
        let value = if i < n && b[i] == b'=' {
            i += 1;
            while i < n && b[i].is_ascii_whitespace() { i += 1; }
            if i < n && (b[i] == b'"' || b[i] == b'\'') {
                let q = b[i];
                let v_start = i + 1;
                i = v_start;
                while i < n && b[i] != q { i += 1; }
                let v = &open_tag[v_start..i.min(n)];
                i += 1;
                v
            } else {
                let v_start = i;
                while i < n && !b[i].is_ascii_whitespace() && b[i] != b'>' { i += 1; }
                &open_tag[v_start..i]
            }
        } else {
            ""
        };

        if attr_name.eq_ignore_ascii_case(name) {
            return Some(normalize_entities(value));
        }
    }
    None
}

/// Remove all tags `<...>` and comments `<!--...-->` from the string (no
/// entity or whitespace handling).
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        let tail = &rest[lt..];
        let skip = if tail.starts_with("<!--") {
            tail.find("-->").map_or(tail.len(), |e| e + 3)
        } else {
            tail.find('>').map_or(tail.len(), |e| e + 1)
        };
        rest = &tail[skip..];
    }
    out.push_str(rest);
    out
}

/// What a browser would show for this fragment: tags stripped, entities
/// decoded, whitespace collapsed and trimmed.
pub fn visible_text(fragment: &str) -> String {
    normalize_ws(&normalize_entities(&strip_tags(fragment)))
}

//! Line ending and indentation detection shared by the text updaters

pub const LF: &str = "\n";
pub const CRLF: &str = "\r\n";

/// The dominant line ending of `contents`; LF on ties and for single-line text
pub fn detect(contents: &str) -> &'static str {
    let crlf = contents.matches(CRLF).count();
    let lf = contents.matches('\n').count() - crlf;
    if crlf > lf {
        CRLF
    } else {
        LF
    }
}

/// Rewrite every line ending in `text` to `newline`
pub fn normalize(text: &str, newline: &str) -> String {
    let unified = text.replace(CRLF, LF);
    if newline == LF {
        unified
    } else {
        unified.replace(LF, newline)
    }
}

/// Leading whitespace of the first indented line; two spaces when nothing is indented
pub fn detect_indent(contents: &str) -> String {
    contents
        .lines()
        .map(|line| {
            let trimmed = line.trim_start_matches([' ', '\t']);
            &line[..line.len() - trimmed.len()]
        })
        .find(|indent| !indent.is_empty())
        .unwrap_or("  ")
        .to_string()
}

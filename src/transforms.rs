//! # Bundled Transforms Module
//!
//! Conservative minifiers for the six supported media types, plus the
//! default registry wiring:
//!
//! - exact: `text/css`, `text/html`, `application/javascript`, `image/svg+xml`
//! - family: `json` (any `*/json` or `*+json`), `xml` (any `*/xml` or `*+xml`)
//!
//! These are deliberately modest: comment stripping, whitespace collapsing
//! and JSON re-serialization. They never rename identifiers or restructure
//! markup, trading output size for safety. The pipeline itself treats every
//! transform as opaque, so callers wanting an aggressive engine for one
//! media type can register their own function instead.

use crate::registry::TransformRegistry;
use std::io::{BufRead, Write};

/// Build the registry the binary runs with.
pub fn default_registry() -> TransformRegistry {
    TransformRegistry::builder()
        .add_exact("text/css", minify_css)
        .add_exact("text/html", minify_html)
        .add_exact("application/javascript", minify_js)
        .add_exact("image/svg+xml", minify_xml)
        .add_family("json", minify_json)
        .add_family("xml", minify_xml)
        .build()
}

/// Re-serialize JSON compactly. Fails on invalid input.
pub fn minify_json(
    _media_type: &str,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> anyhow::Result<()> {
    let value: serde_json::Value = serde_json::from_reader(input)?;
    serde_json::to_writer(&mut *out, &value)?;
    Ok(())
}

/// Strip `/* */` comments and collapse whitespace in CSS.
///
/// Whitespace adjacent to `{` `}` `;` `,` is dropped entirely; everywhere
/// else runs collapse to a single space (spacing around `:` is kept, since
/// it is significant in selectors). String literals pass through verbatim.
pub fn minify_css(
    _media_type: &str,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> anyhow::Result<()> {
    let mut src = String::new();
    input.read_to_string(&mut src)?;

    let mut min = String::with_capacity(src.len());
    let mut chars = src.chars().peekable();
    let mut pending_space = false;
    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => {
                flush_css_space(&mut min, &mut pending_space);
                min.push(c);
                while let Some(sc) = chars.next() {
                    min.push(sc);
                    if sc == '\\' {
                        if let Some(esc) = chars.next() {
                            min.push(esc);
                        }
                    } else if sc == c {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev_star = false;
                for cc in chars.by_ref() {
                    if prev_star && cc == '/' {
                        break;
                    }
                    prev_star = cc == '*';
                }
                // a comment can separate two tokens
                pending_space = true;
            }
            c if c.is_whitespace() => pending_space = true,
            '{' | '}' | ';' | ',' => {
                pending_space = false;
                min.push(c);
            }
            _ => {
                flush_css_space(&mut min, &mut pending_space);
                min.push(c);
            }
        }
    }

    out.write_all(min.as_bytes())?;
    Ok(())
}

fn flush_css_space(min: &mut String, pending: &mut bool) {
    if *pending {
        if !min.is_empty() && !matches!(min.chars().last(), Some('{' | '}' | ';' | ',')) {
            min.push(' ');
        }
        *pending = false;
    }
}

/// Minify HTML: drops comments, collapses whitespace between and inside
/// tags, and leaves `pre`, `textarea`, `script` and `style` content alone.
pub fn minify_html(
    _media_type: &str,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> anyhow::Result<()> {
    let mut src = String::new();
    input.read_to_string(&mut src)?;
    let min = minify_markup(&src, &["pre", "textarea", "script", "style"]);
    out.write_all(&min)?;
    Ok(())
}

/// Minify XML (and SVG): drops comments, collapses whitespace, keeps CDATA
/// sections verbatim.
pub fn minify_xml(
    _media_type: &str,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> anyhow::Result<()> {
    let mut src = String::new();
    input.read_to_string(&mut src)?;
    let min = minify_markup(&src, &[]);
    out.write_all(&min)?;
    Ok(())
}

/// Shared markup pass for HTML/XML/SVG.
///
/// Indentation runs between two tags are dropped; any other whitespace run
/// collapses to a single space so inline spacing survives. Content of
/// `raw_elements` is copied byte for byte.
fn minify_markup(src: &str, raw_elements: &[&str]) -> Vec<u8> {
    let bytes = src.as_bytes();
    let mut min: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    let mut pending_ws = false;
    let mut pending_newline = false;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'<' {
            if bytes[i..].starts_with(b"<!--") {
                // comments vanish; surrounding whitespace still collapses
                i = match find_ci(bytes, i + 4, b"-->") {
                    Some(end) => end + 3,
                    None => bytes.len(),
                };
                continue;
            }
            if bytes[i..].starts_with(b"<![CDATA[") {
                flush_markup_ws(&mut min, &mut pending_ws, &mut pending_newline, false);
                let end = find_ci(bytes, i + 9, b"]]>")
                    .map(|e| e + 3)
                    .unwrap_or(bytes.len());
                min.extend_from_slice(&bytes[i..end]);
                i = end;
                continue;
            }

            flush_markup_ws(&mut min, &mut pending_ws, &mut pending_newline, true);

            // tag name, for raw element detection
            let mut name_end = i + 1;
            while name_end < bytes.len() && bytes[name_end].is_ascii_alphanumeric() {
                name_end += 1;
            }
            let name = src[i + 1..name_end].to_ascii_lowercase();

            // copy the tag, collapsing whitespace runs outside quotes
            min.push(b'<');
            i += 1;
            let mut quote: u8 = 0;
            while i < bytes.len() {
                let tb = bytes[i];
                if quote != 0 {
                    min.push(tb);
                    if tb == quote {
                        quote = 0;
                    }
                    i += 1;
                } else if tb == b'"' || tb == b'\'' {
                    quote = tb;
                    min.push(tb);
                    i += 1;
                } else if tb == b'>' {
                    min.push(tb);
                    i += 1;
                    break;
                } else if tb.is_ascii_whitespace() {
                    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                        i += 1;
                    }
                    if i < bytes.len() && bytes[i] != b'>' && bytes[i] != b'/' {
                        min.push(b' ');
                    }
                } else {
                    min.push(tb);
                    i += 1;
                }
            }

            let self_closing = min.ends_with(b"/>");
            if !self_closing && raw_elements.contains(&name.as_str()) {
                let closing = format!("</{}", name);
                let end = find_ci(bytes, i, closing.as_bytes()).unwrap_or(bytes.len());
                min.extend_from_slice(&bytes[i..end]);
                i = end;
            }
            continue;
        }
        if b.is_ascii_whitespace() {
            pending_ws = true;
            if b == b'\n' || b == b'\r' {
                pending_newline = true;
            }
            i += 1;
            continue;
        }
        flush_markup_ws(&mut min, &mut pending_ws, &mut pending_newline, false);
        min.push(b);
        i += 1;
    }

    min
}

fn flush_markup_ws(min: &mut Vec<u8>, pending: &mut bool, newline: &mut bool, before_tag: bool) {
    if *pending {
        let inter_tag_indentation = before_tag && *newline && min.last() == Some(&b'>');
        if !min.is_empty() && !inter_tag_indentation {
            min.push(b' ');
        }
    }
    *pending = false;
    *newline = false;
}

/// Case-insensitive byte search starting at `from`.
fn find_ci(haystack: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() || from > haystack.len() - needle.len() {
        return None;
    }
    (from..=haystack.len() - needle.len())
        .find(|&j| haystack[j..j + needle.len()].eq_ignore_ascii_case(needle))
}

/// Strip JS comments and collapse whitespace, preserving line structure.
///
/// Runs a small lexer over strings, template literals (including nested
/// `${}` interpolations) and regex literals so those pass through verbatim.
/// Whitespace runs containing a newline collapse to one newline (keeping
/// automatic-semicolon-insertion behavior intact), other runs to one space.
/// Regex detection uses the usual prefix heuristic: a `/` after an operator,
/// an opening bracket or a keyword like `return` starts a literal.
pub fn minify_js(
    _media_type: &str,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> anyhow::Result<()> {
    let mut src = String::new();
    input.read_to_string(&mut src)?;
    out.write_all(minify_js_source(&src).as_bytes())?;
    Ok(())
}

fn minify_js_source(src: &str) -> String {
    let chars: Vec<char> = src.chars().collect();
    let len = chars.len();
    let mut min = String::with_capacity(src.len());
    let mut i = 0;
    // brace depth per open `${` interpolation
    let mut interp_stack: Vec<u32> = Vec::new();
    let mut in_template = false;
    let mut pending_space = false;
    let mut pending_newline = false;

    while i < len {
        if in_template {
            let c = chars[i];
            if c == '\\' {
                min.push(c);
                i += 1;
                if i < len {
                    min.push(chars[i]);
                    i += 1;
                }
            } else if c == '`' {
                min.push(c);
                i += 1;
                in_template = false;
            } else if c == '$' && chars.get(i + 1) == Some(&'{') {
                min.push_str("${");
                i += 2;
                in_template = false;
                interp_stack.push(0);
            } else {
                min.push(c);
                i += 1;
            }
            continue;
        }

        let c = chars[i];
        match c {
            '/' if chars.get(i + 1) == Some(&'/') => {
                i += 2;
                while i < len && chars[i] != '\n' {
                    i += 1;
                }
                pending_space = true;
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                let mut spans_lines = false;
                while i < len {
                    if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                        i += 2;
                        break;
                    }
                    if chars[i] == '\n' {
                        spans_lines = true;
                    }
                    i += 1;
                }
                pending_space = true;
                if spans_lines {
                    pending_newline = true;
                }
            }
            '"' | '\'' => {
                flush_js_ws(&mut min, &mut pending_space, &mut pending_newline);
                min.push(c);
                i += 1;
                while i < len {
                    let sc = chars[i];
                    min.push(sc);
                    i += 1;
                    if sc == '\\' {
                        if i < len {
                            min.push(chars[i]);
                            i += 1;
                        }
                    } else if sc == c {
                        break;
                    }
                }
            }
            '`' => {
                flush_js_ws(&mut min, &mut pending_space, &mut pending_newline);
                min.push(c);
                i += 1;
                in_template = true;
            }
            '}' if interp_stack.last() == Some(&0) => {
                flush_js_ws(&mut min, &mut pending_space, &mut pending_newline);
                min.push('}');
                i += 1;
                interp_stack.pop();
                in_template = true;
            }
            '{' => {
                if let Some(depth) = interp_stack.last_mut() {
                    *depth += 1;
                }
                flush_js_ws(&mut min, &mut pending_space, &mut pending_newline);
                min.push('{');
                i += 1;
            }
            '}' => {
                if let Some(depth) = interp_stack.last_mut() {
                    *depth -= 1;
                }
                flush_js_ws(&mut min, &mut pending_space, &mut pending_newline);
                min.push('}');
                i += 1;
            }
            '/' if regex_follows(&min) => {
                flush_js_ws(&mut min, &mut pending_space, &mut pending_newline);
                min.push('/');
                i += 1;
                let mut in_class = false;
                while i < len {
                    let sc = chars[i];
                    min.push(sc);
                    i += 1;
                    if sc == '\\' {
                        if i < len {
                            min.push(chars[i]);
                            i += 1;
                        }
                    } else if sc == '[' {
                        in_class = true;
                    } else if sc == ']' {
                        in_class = false;
                    } else if sc == '/' && !in_class {
                        break;
                    }
                }
                while i < len && chars[i].is_ascii_alphabetic() {
                    min.push(chars[i]);
                    i += 1;
                }
            }
            c if c.is_whitespace() => {
                if c == '\n' || c == '\r' {
                    pending_newline = true;
                }
                pending_space = true;
                i += 1;
            }
            _ => {
                flush_js_ws(&mut min, &mut pending_space, &mut pending_newline);
                min.push(c);
                i += 1;
            }
        }
    }

    min
}

fn flush_js_ws(min: &mut String, space: &mut bool, newline: &mut bool) {
    if *newline {
        if !min.is_empty() && !min.ends_with('\n') {
            min.push('\n');
        }
    } else if *space && !min.is_empty() && !min.ends_with('\n') {
        min.push(' ');
    }
    *space = false;
    *newline = false;
}

/// True if a `/` at the current position starts a regex literal rather than
/// a division, judged by the preceding significant token.
fn regex_follows(min: &str) -> bool {
    let trimmed = min.trim_end();
    match trimmed.chars().last() {
        None => true,
        Some(c) if "=([{,;:!&|?+-*%^~<>".contains(c) => true,
        Some(c) if c.is_alphanumeric() || c == '_' || c == '$' => {
            let word: Vec<char> = trimmed
                .chars()
                .rev()
                .take_while(|ch| ch.is_alphanumeric() || *ch == '_' || *ch == '$')
                .collect();
            let word: String = word.into_iter().rev().collect();
            matches!(
                word.as_str(),
                "return"
                    | "typeof"
                    | "case"
                    | "in"
                    | "of"
                    | "new"
                    | "delete"
                    | "void"
                    | "instanceof"
                    | "do"
                    | "else"
                    | "yield"
                    | "await"
            )
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        transform: fn(&str, &mut dyn Write, &mut dyn BufRead) -> anyhow::Result<()>,
        media_type: &str,
        input: &str,
    ) -> String {
        let mut out = Vec::new();
        let mut reader = std::io::Cursor::new(input.as_bytes().to_vec());
        transform(media_type, &mut out, &mut reader).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_json_compacts() {
        let input = "{\n  \"a\": [1, 2, 3],\n  \"b\": \"x y\"\n}\n";
        assert_eq!(
            run(minify_json, "application/json", input),
            r#"{"a":[1,2,3],"b":"x y"}"#
        );
    }

    #[test]
    fn test_json_invalid_input_fails() {
        let mut out = Vec::new();
        let mut reader = std::io::Cursor::new(b"{not json".to_vec());
        assert!(minify_json("application/json", &mut out, &mut reader).is_err());
    }

    #[test]
    fn test_css_strips_comments_and_whitespace() {
        let input = "/* header */\nbody {\n  color: red;\n  margin: 0;\n}\n";
        assert_eq!(run(minify_css, "text/css", input), "body{color: red;margin: 0;}");
    }

    #[test]
    fn test_css_preserves_strings() {
        let input = "a::before { content: \"  /* not a comment */  \"; }";
        assert_eq!(
            run(minify_css, "text/css", input),
            "a::before{content: \"  /* not a comment */  \";}"
        );
    }

    #[test]
    fn test_css_keeps_selector_spacing() {
        let input = "ul   li > a { top: 0; }";
        assert_eq!(run(minify_css, "text/css", input), "ul li > a{top: 0;}");
    }

    #[test]
    fn test_html_collapses_indentation() {
        let input = "<html>\n  <body>\n    <p>hello <b>bold</b> world</p>\n  </body>\n</html>\n";
        assert_eq!(
            run(minify_html, "text/html", input),
            "<html><body><p>hello <b>bold</b> world</p></body></html>"
        );
    }

    #[test]
    fn test_html_drops_comments_and_keeps_pre() {
        let input = "<!-- note --><pre>\n  spaced\n</pre>";
        assert_eq!(run(minify_html, "text/html", input), "<pre>\n  spaced\n</pre>");
    }

    #[test]
    fn test_xml_keeps_cdata() {
        let input = "<doc>\n  <x><![CDATA[  raw  ]]></x>\n</doc>";
        assert_eq!(
            run(minify_xml, "text/xml", input),
            "<doc><x><![CDATA[  raw  ]]></x></doc>"
        );
    }

    #[test]
    fn test_js_strips_comments() {
        let input = "// header\nvar a = 1; /* mid */ var b = 2;\n\n\nvar c = 3;\n";
        assert_eq!(
            minify_js_source(input),
            "var a = 1; var b = 2;\nvar c = 3;"
        );
    }

    #[test]
    fn test_js_preserves_strings_and_templates() {
        let input = "var s = \"// not a comment\";\nvar t = `a\n\n${ x }b`;";
        assert_eq!(
            minify_js_source(input),
            "var s = \"// not a comment\";\nvar t = `a\n\n${ x }b`;"
        );
    }

    #[test]
    fn test_js_regex_literal_not_treated_as_comment() {
        let input = "var re = /a\\/b\"/g; var d = x / y;";
        assert_eq!(
            minify_js_source(input),
            "var re = /a\\/b\"/g; var d = x / y;"
        );
    }

    #[test]
    fn test_default_registry_covers_table_types() {
        let registry = default_registry();
        for media_type in [
            "text/css",
            "text/html",
            "application/javascript",
            "application/json",
            "image/svg+xml",
            "text/xml",
            "application/vnd.api+json",
        ] {
            assert!(registry.resolve(media_type).is_some(), "{}", media_type);
        }
        assert!(registry.resolve("application/octet-stream").is_none());
    }
}

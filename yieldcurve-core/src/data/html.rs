//! Visible-text extraction from an HTML document.
//!
//! Tags and comments are dropped without inserting separators, and the
//! contents of `script` and `style` elements are skipped. Character
//! references are decoded; `&nbsp;` becomes U+00A0, which counts as
//! whitespace for the yield pattern.

/// Elements whose contents are never visible text.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Return the concatenated text nodes of `html`.
pub fn visible_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len() / 2);
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        push_decoded(&mut out, &rest[..lt]);
        rest = &rest[lt..];

        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map_or("", |end| &after[end + 3..]);
            continue;
        }

        // A '<' that cannot open a tag is literal text.
        let opens_tag = rest[1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'));
        if !opens_tag {
            out.push('<');
            rest = &rest[1..];
            continue;
        }

        let Some(gt) = rest.find('>') else {
            // unterminated tag swallows the remainder
            rest = "";
            break;
        };
        let tag = &rest[1..gt];
        rest = &rest[gt + 1..];

        if let Some(name) = raw_text_element(tag) {
            rest = skip_past_close(rest, name);
        }
    }

    push_decoded(&mut out, rest);
    out
}

fn raw_text_element(tag: &str) -> Option<&'static str> {
    if tag.ends_with('/') {
        return None;
    }
    let name: String = tag
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    RAW_TEXT_ELEMENTS.iter().copied().find(|e| *e == name)
}

fn skip_past_close<'a>(rest: &'a str, name: &str) -> &'a str {
    let close = format!("</{name}");
    // ASCII lowercasing keeps byte offsets intact.
    let lowered = rest.to_ascii_lowercase();
    match lowered.find(&close) {
        Some(start) => {
            let tail = &rest[start..];
            tail.find('>').map_or("", |gt| &tail[gt + 1..])
        }
        None => "",
    }
}

fn push_decoded(out: &mut String, text: &str) {
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .char_indices()
            .take(12)
            .find(|&(_, c)| c == ';')
            .and_then(|(semi, _)| decode_entity(&rest[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    match name {
        "nbsp" => Some('\u{a0}'),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "percnt" => Some('%'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_without_separators() {
        assert_eq!(
            visible_text("<td>Randament (YTM)*</td><td>7,50%</td>"),
            "Randament (YTM)*7,50%"
        );
    }

    #[test]
    fn skips_script_style_and_comments() {
        let html = "<html><head><style>td{color:red}</style>\
                    <script type=\"text/javascript\">var x = '<b>7,00%</b>';</script></head>\
                    <body><!-- hidden 1,00% -->A<SCRIPT>y()</SCRIPT>B</body></html>";
        assert_eq!(visible_text(html), "AB");
    }

    #[test]
    fn decodes_entities() {
        assert_eq!(
            visible_text("a&nbsp;b &amp; c &#259;&#x21B; &bogus; & d"),
            "a\u{a0}b & c ăț &bogus; & d"
        );
    }

    #[test]
    fn bare_less_than_is_text() {
        assert_eq!(visible_text("<p>1 < 2</p>"), "1 < 2");
    }

    #[test]
    fn unterminated_tag_drops_tail() {
        assert_eq!(visible_text("keep<div class="), "keep");
    }

    #[test]
    fn self_closing_script_does_not_swallow_body() {
        assert_eq!(visible_text("<script src=\"a.js\"/>text"), "text");
    }

    #[test]
    fn handles_multibyte_text() {
        assert_eq!(visible_text("<span>Obligațiuni</span>"), "Obligațiuni");
    }
}

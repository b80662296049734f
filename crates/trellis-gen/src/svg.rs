//! SVG serialization: element tree → markup → normalized, URL-embeddable
//! data value.

use trellis_parser::SvgNode;

const XMLNS: &str = r#"xmlns="http://www.w3.org/2000/svg""#;

/// Serialize an element tree to markup.
pub fn generate(node: &SvgNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: &SvgNode, out: &mut String) {
    out.push('<');
    out.push_str(&node.name);
    for (name, value) in &node.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&value.replace('"', "&quot;"));
        out.push('"');
    }
    if node.children.is_empty() && node.text.is_none() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    if let Some(text) = &node.text {
        out.push_str(text);
    }
    for child in &node.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(&node.name);
    out.push('>');
}

/// Normalize markup into a standalone SVG document: bare fragments are
/// wrapped in an `<svg>` element and the SVG namespace is injected when
/// missing.
pub fn normalize(markup: &str) -> String {
    let markup = markup.trim();
    if !markup.contains("<svg") {
        return format!("<svg {XMLNS}>{markup}</svg>");
    }
    if markup.contains("xmlns") {
        return markup.to_string();
    }
    // inject into the first <svg> tag, before its next attribute or `>`
    match markup.find("<svg") {
        Some(at) => {
            let insert = at + "<svg".len();
            format!("{} {XMLNS}{}", &markup[..insert], &markup[insert..])
        }
        None => markup.to_string(),
    }
}

/// Package markup as a `url("data:image/svg+xml;utf8,…")` value, with an
/// optional fragment id for filter references.
pub fn to_url(markup: &str, id: Option<&str>) -> String {
    let mut encoded = encode_uri_component(markup);
    if let Some(id) = id {
        encoded.push('#');
        encoded.push_str(id);
    }
    format!("url(\"data:image/svg+xml;utf8,{encoded}\")")
}

/// Percent-encode the way `encodeURIComponent` does: unreserved marks
/// pass through, everything else escapes per UTF-8 byte.
fn encode_uri_component(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

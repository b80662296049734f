//! SVG mini-syntax parser.
//!
//! The mini-syntax describes an SVG document as nested blocks of
//! `name: value;` attributes and `tag { … }` children:
//!
//! ```text
//! viewBox: 0 0 10 10;
//! circle {
//!   cx, cy: 5;
//!   r: 4;
//!   fill: defs pattern { width: 2; height: 2; }
//! }
//! ```
//!
//! Grouped names share one value. A `content` attribute becomes element
//! text. An attribute value of the form `defs <tag> { … }` is hoisted
//! into a `<defs>` child of the root with a generated id, and the
//! attribute is rewritten to `url(#id)`.

use thiserror::Error;

/// One element of the parsed tree. Attribute order is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SvgNode {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<SvgNode>,
    pub text: Option<String>,
}

impl SvgNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// Parser options: the implicit root element for bare statement lists.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub root: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            root: "svg".to_string(),
        }
    }
}

impl ParseOptions {
    pub fn block(root: &str) -> Self {
        Self {
            root: root.to_string(),
        }
    }
}

/// Structural parse error. Callers treat any error as "not mini-syntax"
/// and fall back to using the input text unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SvgError {
    #[error("unclosed block for element '{0}'")]
    UnclosedBlock(String),
    #[error("unexpected '}}' outside any block")]
    UnexpectedClose,
}

/// Parse mini-syntax text into an element tree rooted at
/// `options.root`. When the input is exactly one block whose tag equals
/// the root name, that block becomes the root itself.
pub fn parse(text: &str, options: &ParseOptions) -> Result<SvgNode, SvgError> {
    let mut parser = Parser {
        chars: text.chars().collect(),
        pos: 0,
        defs: Vec::new(),
        next_def: 0,
    };
    let mut root = SvgNode::new(&options.root);
    parser.parse_into(&mut root, true)?;

    // `svg { … }` / `filter { … }` written out in full collapses onto
    // the implicit root.
    if root.attrs.is_empty() && root.text.is_none() && root.children.len() == 1 {
        if root.children[0].name == options.root {
            root = root.children.remove(0);
        }
    }

    if !parser.defs.is_empty() {
        let mut defs = SvgNode::new("defs");
        defs.children = std::mem::take(&mut parser.defs);
        root.children.insert(0, defs);
    }
    Ok(root)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    defs: Vec<SvgNode>,
    next_def: usize,
}

impl Parser {
    fn parse_into(&mut self, node: &mut SvgNode, top_level: bool) -> Result<(), SvgError> {
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    if top_level {
                        return Ok(());
                    }
                    return Err(SvgError::UnclosedBlock(node.name.clone()));
                }
                Some('}') => {
                    if top_level {
                        return Err(SvgError::UnexpectedClose);
                    }
                    self.pos += 1;
                    return Ok(());
                }
                Some(';') => {
                    self.pos += 1;
                }
                _ => self.parse_statement(node)?,
            }
        }
    }

    /// `names : value ;` or `tag { … }`.
    fn parse_statement(&mut self, node: &mut SvgNode) -> Result<(), SvgError> {
        let head = self.read_until(&[':', '{', ';', '}']);
        match self.peek() {
            Some(':') => {
                self.pos += 1;
                let value = self.read_value()?;
                let value = self.hoist_defs(value)?;
                for name in head.split(',') {
                    let name = name.trim();
                    if name.is_empty() {
                        continue;
                    }
                    if name == "content" {
                        node.text = Some(strip_quotes(&value));
                    } else {
                        node.attrs.push((name.to_string(), value.clone()));
                    }
                }
                Ok(())
            }
            Some('{') => {
                self.pos += 1;
                let mut child = SvgNode::new(head.trim());
                self.parse_into(&mut child, false)?;
                node.children.push(child);
                Ok(())
            }
            // a bare word before `;`/`}`/EOF carries no information
            _ => Ok(()),
        }
    }

    /// Attribute value: everything up to a top-level `;` or `}`. Braced
    /// groups inside the value (inline defs blocks) nest.
    fn read_value(&mut self) -> Result<String, SvgError> {
        let mut value = String::new();
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            match c {
                ';' | '}' if depth == 0 => break,
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
            value.push(c);
            self.pos += 1;
        }
        if depth > 0 {
            return Err(SvgError::UnclosedBlock("value".to_string()));
        }
        Ok(value.trim().to_string())
    }

    /// Rewrite `defs <tag> { … }` values into `url(#id)` references,
    /// collecting the hoisted elements for the root `<defs>`.
    fn hoist_defs(&mut self, value: String) -> Result<String, SvgError> {
        let rest = match value.strip_prefix("defs") {
            Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
            _ => return Ok(value),
        };
        let Some((tag, body)) = rest.split_once('{') else {
            return Ok(value);
        };
        let tag = tag.trim();
        let body = body.trim_end();
        let Some(body) = body.strip_suffix('}') else {
            return Ok(value);
        };

        let mut def = SvgNode::new(tag);
        let mut inner = Parser {
            chars: body.chars().collect(),
            pos: 0,
            defs: Vec::new(),
            next_def: 0,
        };
        inner.parse_into(&mut def, true)?;

        self.next_def += 1;
        let id = format!("def-{}", self.next_def);
        def.attrs.insert(0, ("id".to_string(), id.clone()));
        self.defs.push(def);
        self.defs.extend(inner.defs);
        Ok(format!("url(#{id})"))
    }

    fn read_until(&mut self, stops: &[char]) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if stops.contains(&c) {
                break;
            }
            out.push(c);
            self.pos += 1;
        }
        out
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }
}

fn strip_quotes(value: &str) -> String {
    let v = value.trim();
    for q in ['"', '\''] {
        if v.len() >= 2 && v.starts_with(q) && v.ends_with(q) {
            return v[1..v.len() - 1].to_string();
        }
    }
    v.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_and_children() {
        let node = parse("viewBox: 0 0 10 10; circle { r: 4; }", &ParseOptions::default())
            .expect("parse");
        assert_eq!(node.name, "svg");
        assert_eq!(node.attrs, vec![("viewBox".into(), "0 0 10 10".into())]);
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].name, "circle");
        assert_eq!(node.children[0].attrs, vec![("r".into(), "4".into())]);
    }

    #[test]
    fn grouped_names_share_a_value() {
        let node = parse("rect { width, height: 100%; }", &ParseOptions::default())
            .expect("parse");
        assert_eq!(
            node.children[0].attrs,
            vec![
                ("width".into(), "100%".into()),
                ("height".into(), "100%".into()),
            ]
        );
    }

    #[test]
    fn content_becomes_text() {
        let node = parse("text { content: 'hi'; }", &ParseOptions::default()).expect("parse");
        assert_eq!(node.children[0].text.as_deref(), Some("hi"));
    }

    #[test]
    fn block_option_selects_the_root() {
        let node = parse("x: -20%;", &ParseOptions::block("filter")).expect("parse");
        assert_eq!(node.name, "filter");
        let explicit = parse("filter { x: -20%; }", &ParseOptions::block("filter"))
            .expect("parse");
        assert_eq!(explicit.name, "filter");
        assert_eq!(explicit.attrs, vec![("x".into(), "-20%".into())]);
    }

    #[test]
    fn defs_values_are_hoisted() {
        let node = parse(
            "rect { fill: defs pattern { width: 2; } }",
            &ParseOptions::default(),
        )
        .expect("parse");
        assert_eq!(node.children[0].name, "defs");
        let pattern = &node.children[0].children[0];
        assert_eq!(pattern.name, "pattern");
        assert_eq!(pattern.attrs[0], ("id".into(), "def-1".into()));
        let rect = &node.children[1];
        assert_eq!(rect.attrs, vec![("fill".into(), "url(#def-1)".into())]);
    }

    #[test]
    fn unclosed_block_is_an_error() {
        assert_eq!(
            parse("circle { r: 4;", &ParseOptions::default()),
            Err(SvgError::UnclosedBlock("circle".into()))
        );
        assert_eq!(
            parse("}", &ParseOptions::default()),
            Err(SvgError::UnexpectedClose)
        );
    }
}

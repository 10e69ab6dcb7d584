//! Lenient HTML fragment parser.
//!
//! Fixtures are hand-written fragments, so the parser recovers instead of
//! failing: stray end tags are dropped, unclosed elements are closed at the end
//! of input, and `<tag/>` closes any element (markup like `<span />` is common
//! in fixtures and is meant as an empty element).

/// A parsed node, detached from any document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedNode {
    /// Element with lowercase tag, attributes in source order and children
    Element {
        /// Lowercase tag name
        tag: String,
        /// Attributes in source order, first occurrence wins
        attrs: Vec<(String, String)>,
        /// Child nodes
        children: Vec<ParsedNode>,
    },
    /// Text run with entities decoded
    Text(String),
}

/// Elements that never have children or an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Raw text elements whose content still has entities decoded.
const ESCAPABLE_RAW_TEXT_ELEMENTS: &[&str] = &["textarea", "title"];

/// Elements implicitly closed by an opening tag of the same name.
const SELF_NESTING_FORBIDDEN: &[&str] = &["li", "option", "p", "tr", "td", "th", "dt", "dd"];

/// Returns true for void elements.
#[must_use]
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Returns true for elements whose children are serialized verbatim.
#[must_use]
pub fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

/// Parse an HTML fragment into detached nodes.
#[must_use]
pub fn parse_fragment(html: &str) -> Vec<ParsedNode> {
    Parser::new(html).run()
}

struct OpenElement {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<ParsedNode>,
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    roots: Vec<ParsedNode>,
    stack: Vec<OpenElement>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            roots: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<ParsedNode> {
        while self.pos < self.src.len() {
            let rest = &self.src[self.pos..];
            if rest.starts_with("<!--") {
                self.skip_comment();
            } else if rest.starts_with("</") {
                self.end_tag();
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.skip_past('>');
            } else if rest.starts_with('<')
                && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
            {
                self.start_tag();
            } else {
                self.text();
            }
        }
        while !self.stack.is_empty() {
            self.close_top();
        }
        self.roots
    }

    fn push_node(&mut self, node: ParsedNode) {
        let siblings = match self.stack.last_mut() {
            Some(open) => &mut open.children,
            None => &mut self.roots,
        };
        // Adjacent text runs merge, as a browser tree would have one text node.
        if let (ParsedNode::Text(new), Some(ParsedNode::Text(prev))) = (&node, siblings.last_mut())
        {
            prev.push_str(new);
            return;
        }
        siblings.push(node);
    }

    fn close_top(&mut self) {
        if let Some(open) = self.stack.pop() {
            self.push_node(ParsedNode::Element {
                tag: open.tag,
                attrs: open.attrs,
                children: open.children,
            });
        }
    }

    fn skip_comment(&mut self) {
        match self.src[self.pos + 4..].find("-->") {
            Some(end) => self.pos += 4 + end + 3,
            None => self.pos = self.src.len(),
        }
    }

    fn skip_past(&mut self, c: char) {
        match self.src[self.pos..].find(c) {
            Some(end) => self.pos += end + c.len_utf8(),
            None => self.pos = self.src.len(),
        }
    }

    fn text(&mut self) {
        // A lone '<' that does not open a tag is literal text.
        let start = self.pos;
        let skip = usize::from(self.src[start..].starts_with('<'));
        let end = self.src[start + skip..]
            .find('<')
            .map_or(self.src.len(), |i| start + skip + i);
        self.pos = end;
        let decoded = decode_entities(&self.src[start..end]);
        self.push_node(ParsedNode::Text(decoded));
    }

    fn end_tag(&mut self) {
        self.pos += 2;
        let name = self.read_name();
        self.skip_past('>');
        if let Some(depth) = self.stack.iter().rposition(|open| open.tag == name) {
            while self.stack.len() > depth {
                self.close_top();
            }
        }
    }

    fn start_tag(&mut self) {
        self.pos += 1;
        let tag = self.read_name();
        let mut attrs: Vec<(String, String)> = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            let Some(c) = self.peek() else { break };
            match c {
                '>' => {
                    self.pos += 1;
                    break;
                }
                '/' => {
                    self.pos += 1;
                    self_closing = true;
                }
                _ => {
                    self_closing = false;
                    let (name, value) = self.read_attribute();
                    if !name.is_empty() && !attrs.iter().any(|(n, _)| *n == name) {
                        attrs.push((name, value));
                    }
                }
            }
        }

        if SELF_NESTING_FORBIDDEN.contains(&tag.as_str())
            && self.stack.last().is_some_and(|open| open.tag == tag)
        {
            self.close_top();
        }

        if is_void(&tag) || self_closing {
            self.push_node(ParsedNode::Element {
                tag,
                attrs,
                children: Vec::new(),
            });
            return;
        }

        if is_raw_text(&tag) || ESCAPABLE_RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
            let body = self.read_raw_text(&tag);
            let children = if body.is_empty() {
                Vec::new()
            } else if is_raw_text(&tag) {
                vec![ParsedNode::Text(body)]
            } else {
                vec![ParsedNode::Text(decode_entities(&body))]
            };
            self.push_node(ParsedNode::Element {
                tag,
                attrs,
                children,
            });
            return;
        }

        self.stack.push(OpenElement {
            tag,
            attrs,
            children: Vec::new(),
        });
    }

    fn read_raw_text(&mut self, tag: &str) -> String {
        let rest = &self.src[self.pos..];
        let lower = rest.to_ascii_lowercase();
        let close = format!("</{tag}");
        match lower.find(&close) {
            Some(end) => {
                let body = rest[..end].to_string();
                self.pos += end;
                self.skip_past('>');
                body
            }
            None => {
                self.pos = self.src.len();
                rest.to_string()
            }
        }
    }

    fn read_attribute(&mut self) -> (String, String) {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '=' || c == '>' || (c == '/' && self.pos > start) {
                break;
            }
            self.pos += c.len_utf8();
        }
        let name = self.src[start..self.pos].to_ascii_lowercase();
        if self.pos == start {
            // Unparseable character; consume it so the loop advances.
            if let Some(c) = self.peek() {
                self.pos += c.len_utf8();
            }
            return (String::new(), String::new());
        }

        self.skip_whitespace();
        if self.peek() != Some('=') {
            return (name, String::new());
        }
        self.pos += 1;
        self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                let end = self.src[start..]
                    .find(quote)
                    .map_or(self.src.len(), |i| start + i);
                self.pos = (end + 1).min(self.src.len());
                &self.src[start..end]
            }
            _ => {
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if c.is_whitespace() || c == '>' {
                        break;
                    }
                    self.pos += c.len_utf8();
                }
                &self.src[start..self.pos]
            }
        };
        (name, decode_entities(value))
    }

    fn read_name(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '-' || c == ':' || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.src[start..self.pos].to_ascii_lowercase()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }
}

/// Decode the character references fixtures realistically contain.
#[must_use]
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').filter(|&semi| semi <= 10).and_then(|semi| {
            let entity = &rest[1..semi];
            decode_entity(entity).map(|c| (c, semi + 1))
        });
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let num = entity.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

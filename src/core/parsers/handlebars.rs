//! Minimal Handlebars tree builder.
//!
//! Only the structure needed for message discovery is kept: comments,
//! mustaches with their parameters, and blocks with `program` and `inverse`
//! bodies. Text content, partials and whitespace control are skipped.

use anyhow::{Result, bail};

use crate::core::extract::template_calls::{TemplateArg, TemplateNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HbsParam {
    /// A quoted string literal, unescaped.
    String(String),
    /// Paths, numbers, hash pairs and subexpressions, kept verbatim.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HbsNode {
    Comment {
        text: String,
    },
    Mustache {
        name: String,
        params: Vec<HbsParam>,
        line: usize,
    },
    Block {
        name: String,
        params: Vec<HbsParam>,
        program: Vec<HbsNode>,
        inverse: Vec<HbsNode>,
    },
}

impl TemplateNode for HbsNode {
    fn blocks(&self) -> Vec<&[Self]> {
        match self {
            HbsNode::Block {
                program, inverse, ..
            } => vec![program.as_slice(), inverse.as_slice()],
            _ => Vec::new(),
        }
    }

    fn comment(&self) -> Option<&str> {
        match self {
            HbsNode::Comment { text } => Some(text),
            _ => None,
        }
    }

    fn is_call(&self) -> bool {
        matches!(self, HbsNode::Mustache { .. })
    }

    fn callee_name(&self) -> Option<&str> {
        match self {
            HbsNode::Mustache { name, .. } => Some(name),
            _ => None,
        }
    }

    fn arguments(&self) -> Vec<TemplateArg<'_>> {
        match self {
            HbsNode::Mustache { params, .. } => params
                .iter()
                .map(|param| match param {
                    HbsParam::String(value) => TemplateArg::Str(value),
                    HbsParam::Other(_) => TemplateArg::Other,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn line(&self) -> Option<usize> {
        match self {
            HbsNode::Mustache { line, .. } => Some(*line),
            _ => None,
        }
    }
}

struct OpenBlock {
    name: String,
    params: Vec<HbsParam>,
    program: Vec<HbsNode>,
    inverse: Vec<HbsNode>,
    in_inverse: bool,
    line: usize,
}

impl OpenBlock {
    fn push(&mut self, node: HbsNode) {
        if self.in_inverse {
            self.inverse.push(node);
        } else {
            self.program.push(node);
        }
    }
}

/// Parse template text into its top-level nodes.
pub fn parse_template(source: &str) -> Result<Vec<HbsNode>> {
    let mut root = Vec::new();
    let mut stack: Vec<OpenBlock> = Vec::new();
    let mut pos = 0;

    while let Some(found) = source[pos..].find("{{") {
        let open = pos + found;
        let line = line_at(source, open);
        let Some(tag) = read_tag(source, open) else {
            bail!("line {}: unclosed mustache", line);
        };
        pos = tag.end;

        let node = match classify(tag.body) {
            Tag::Comment(text) => Some(HbsNode::Comment {
                text: text.to_string(),
            }),
            Tag::Mustache(body) => {
                let (name, params) = split_call(body, line)?;
                Some(HbsNode::Mustache { name, params, line })
            }
            Tag::OpenBlock(body) => {
                let (name, params) = split_call(body, line)?;
                stack.push(OpenBlock {
                    name,
                    params,
                    program: Vec::new(),
                    inverse: Vec::new(),
                    in_inverse: false,
                    line,
                });
                None
            }
            Tag::Else => {
                let Some(block) = stack.last_mut() else {
                    bail!("line {}: `else` outside of a block", line);
                };
                block.in_inverse = true;
                None
            }
            Tag::CloseBlock(name) => {
                let Some(block) = stack.pop() else {
                    bail!("line {}: unexpected closing tag `{}`", line, name);
                };
                if block.name != name {
                    bail!(
                        "line {}: `{}` does not close `{}` opened on line {}",
                        line,
                        name,
                        block.name,
                        block.line
                    );
                }
                Some(HbsNode::Block {
                    name: block.name,
                    params: block.params,
                    program: block.program,
                    inverse: block.inverse,
                })
            }
            Tag::Skip => None,
        };

        if let Some(node) = node {
            match stack.last_mut() {
                Some(block) => block.push(node),
                None => root.push(node),
            }
        }
    }

    if let Some(block) = stack.last() {
        bail!(
            "line {}: block `{}` is never closed",
            block.line,
            block.name
        );
    }
    Ok(root)
}

struct RawTag<'a> {
    body: &'a str,
    end: usize,
}

enum Tag<'a> {
    Comment(&'a str),
    Mustache(&'a str),
    OpenBlock(&'a str),
    Else,
    CloseBlock(&'a str),
    Skip,
}

/// Read the tag starting at `open` (which points at `{{`).
fn read_tag(source: &str, open: usize) -> Option<RawTag<'_>> {
    let inner_start = open + 2;
    let rest = &source[inner_start..];

    let comment_body = rest.strip_prefix('~').unwrap_or(rest);
    if comment_body.starts_with("!--") {
        let close = rest.match_indices("--").map(|(i, _)| i).find(|&i| {
            let after = &rest[i + 2..];
            i > 0 && (after.starts_with("}}") || after.starts_with("~}}"))
        })?;
        let end = inner_start + close + 2 + rest[close + 2..].find("}}")? + 2;
        return Some(RawTag {
            body: &rest[..close + 2],
            end,
        });
    }
    if comment_body.starts_with('!') {
        let close = rest.find("}}")?;
        return Some(RawTag {
            body: &rest[..close],
            end: inner_start + close + 2,
        });
    }

    let mut quote = None;
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None if c == '"' || c == '\'' => quote = Some(c),
            None if rest[i..].starts_with("}}") => {
                let mut end = inner_start + i + 2;
                if rest.starts_with('{') && source[end..].starts_with('}') {
                    end += 1;
                }
                return Some(RawTag {
                    body: &rest[..i],
                    end,
                });
            }
            None => {}
        }
    }
    None
}

fn classify(body: &str) -> Tag<'_> {
    let body = body.strip_prefix('{').unwrap_or(body);
    let body = body.strip_prefix('~').unwrap_or(body);
    let body = body.strip_suffix('~').unwrap_or(body);

    if let Some(comment) = body.strip_prefix('!') {
        let comment = comment
            .strip_prefix("--")
            .and_then(|c| c.strip_suffix("--"))
            .unwrap_or(comment);
        return Tag::Comment(comment);
    }

    let body = body.trim();
    if body == "^" || body == "else" || body.starts_with("else ") {
        return Tag::Else;
    }
    match body.chars().next() {
        Some('#') => Tag::OpenBlock(body[1..].trim_start_matches(['>', '*']).trim_start()),
        Some('^') => Tag::OpenBlock(body[1..].trim_start()),
        Some('/') => Tag::CloseBlock(body[1..].trim()),
        Some('>') | None => Tag::Skip,
        Some('&') => Tag::Mustache(body[1..].trim_start()),
        Some(_) => Tag::Mustache(body),
    }
}

/// Split `name param param..` into the callee name and its parameters.
fn split_call(body: &str, line: usize) -> Result<(String, Vec<HbsParam>)> {
    let mut tokens = tokenize(body, line)?.into_iter();
    let Some(HbsParam::Other(name)) = tokens.next() else {
        bail!("line {}: expected a helper or path name", line);
    };
    Ok((name, tokens.collect()))
}

fn tokenize(body: &str, line: usize) -> Result<Vec<HbsParam>> {
    let mut tokens = Vec::new();
    let mut chars = body.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '"' || c == '\'' {
            chars.next();
            let mut value = String::new();
            let mut closed = false;
            while let Some((_, ch)) = chars.next() {
                if ch == '\\' {
                    if let Some((_, escaped)) = chars.next() {
                        value.push(escaped);
                    }
                } else if ch == c {
                    closed = true;
                    break;
                } else {
                    value.push(ch);
                }
            }
            if !closed {
                bail!("line {}: unterminated string literal", line);
            }
            tokens.push(HbsParam::String(value));
            continue;
        }

        // Paths, hash pairs and subexpressions run to the next top-level space.
        let mut depth = 0usize;
        let mut quote = None;
        let mut end = body.len();
        while let Some(&(i, ch)) = chars.peek() {
            match quote {
                Some(q) if ch == q => quote = None,
                Some(_) => {}
                None => match ch {
                    '"' | '\'' => quote = Some(ch),
                    '(' => depth += 1,
                    ')' => depth = depth.saturating_sub(1),
                    _ if ch.is_whitespace() && depth == 0 => {
                        end = i;
                        break;
                    }
                    _ => {}
                },
            }
            chars.next();
        }
        tokens.push(HbsParam::Other(body[start..end].to_string()));
    }

    Ok(tokens)
}

fn line_at(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}

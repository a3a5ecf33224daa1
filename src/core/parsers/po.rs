//! Gettext PO/POT reader and writer.

use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;

/// A single catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoEntry {
    /// `# ` comments written by translators.
    pub translator_comments: Vec<String>,
    /// `#.` comments extracted from source code.
    pub extracted_comments: Vec<String>,
    /// `#:` source references.
    pub references: Vec<String>,
    /// `#,` flags such as `fuzzy`.
    pub flags: Vec<String>,
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub msgid_plural: Option<String>,
    pub msgstr: Vec<String>,
    /// Entry was commented out with `#~`.
    pub obsolete: bool,
}

impl PoEntry {
    pub fn new(msgid: impl Into<String>) -> Self {
        Self {
            msgid: msgid.into(),
            ..Default::default()
        }
    }

    /// The singular translation, if one was written.
    pub fn translation(&self) -> Option<&str> {
        self.msgstr
            .first()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// A parsed PO or POT file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoFile {
    /// Comments above the header entry.
    pub header_comments: Vec<String>,
    /// `Name: value` pairs from the header entry, in file order.
    pub headers: IndexMap<String, String>,
    pub entries: Vec<PoEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Context,
    Id,
    IdPlural,
    Str(usize),
}

#[derive(Default)]
struct EntryBuilder {
    entry: PoEntry,
    seen_msgid: bool,
    seen_msgstr: bool,
}

pub fn load_po(path: &Path) -> Result<PoFile> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read PO file: {:?}", path))?;
    parse_po(&content).with_context(|| format!("Failed to parse PO file: {:?}", path))
}

/// Parse PO text. Errors carry the 1-based line number.
pub fn parse_po(content: &str) -> Result<PoFile> {
    let mut entries = Vec::new();
    let mut current = EntryBuilder::default();
    let mut field = Field::None;

    for (line_index, raw_line) in content.lines().enumerate() {
        let line_no = line_index + 1;
        let line = raw_line.trim();

        if line.is_empty() {
            if current.seen_msgstr {
                finish_entry(&mut current, &mut entries);
                field = Field::None;
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix("#~") {
            let rest = rest.trim_start();
            if rest.starts_with('|') {
                continue;
            }
            if starts_new_entry(rest, &current) {
                finish_entry(&mut current, &mut entries);
            }
            current.entry.obsolete = true;
            field = parse_keyword_line(rest, field, &mut current, line_no)?;
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            if current.seen_msgstr {
                finish_entry(&mut current, &mut entries);
            }
            field = Field::None;
            let entry = &mut current.entry;
            match comment.chars().next() {
                Some('.') => entry.extracted_comments.push(comment_text(&comment[1..])),
                Some(':') => entry
                    .references
                    .extend(comment[1..].split_whitespace().map(String::from)),
                Some(',') => entry.flags.extend(
                    comment[1..]
                        .split(',')
                        .map(str::trim)
                        .filter(|f| !f.is_empty())
                        .map(String::from),
                ),
                // Previous msgid of a fuzzy entry.
                Some('|') => {}
                _ => entry.translator_comments.push(comment_text(comment)),
            }
            continue;
        }

        if starts_new_entry(line, &current) {
            finish_entry(&mut current, &mut entries);
        }
        field = parse_keyword_line(line, field, &mut current, line_no)?;
    }
    finish_entry(&mut current, &mut entries);

    let mut file = PoFile {
        entries,
        ..Default::default()
    };
    if let Some(first) = file.entries.first()
        && first.msgid.is_empty()
        && first.msgctxt.is_none()
    {
        let header = file.entries.remove(0);
        file.header_comments = header.translator_comments;
        if let Some(raw) = header.msgstr.first() {
            for line in raw.lines() {
                if let Some((name, value)) = line.split_once(':') {
                    file.headers
                        .insert(name.trim().to_string(), value.trim().to_string());
                }
            }
        }
    }

    Ok(file)
}

fn comment_text(comment: &str) -> String {
    comment.strip_prefix(' ').unwrap_or(comment).to_string()
}

/// `msgctxt` or `msgid` after a finished translation opens a new entry.
fn starts_new_entry(line: &str, current: &EntryBuilder) -> bool {
    let keyword = line.split_whitespace().next().unwrap_or_default();
    match keyword {
        "msgid" => current.seen_msgstr,
        "msgctxt" => current.seen_msgstr || current.seen_msgid,
        _ => false,
    }
}

fn finish_entry(current: &mut EntryBuilder, entries: &mut Vec<PoEntry>) {
    // Comments without a message are dropped.
    let builder = std::mem::take(current);
    if builder.seen_msgid {
        entries.push(builder.entry);
    }
}

fn parse_keyword_line(
    line: &str,
    field: Field,
    current: &mut EntryBuilder,
    line_no: usize,
) -> Result<Field> {
    if line.starts_with('"') {
        let value = parse_string(line, line_no)?;
        let entry = &mut current.entry;
        match field {
            Field::None => bail!("line {}: string without a keyword", line_no),
            Field::Context => entry.msgctxt.get_or_insert_with(String::new).push_str(&value),
            Field::Id => entry.msgid.push_str(&value),
            Field::IdPlural => entry
                .msgid_plural
                .get_or_insert_with(String::new)
                .push_str(&value),
            Field::Str(index) => entry.msgstr[index].push_str(&value),
        }
        return Ok(field);
    }

    let (keyword, rest) = line
        .split_once(char::is_whitespace)
        .map(|(k, r)| (k, r.trim()))
        .unwrap_or((line, ""));
    let value = parse_string(rest, line_no)?;
    let entry = &mut current.entry;

    let next = match keyword {
        "msgctxt" => {
            entry.msgctxt = Some(value);
            Field::Context
        }
        "msgid" => {
            entry.msgid = value;
            current.seen_msgid = true;
            Field::Id
        }
        "msgid_plural" => {
            entry.msgid_plural = Some(value);
            Field::IdPlural
        }
        "msgstr" => {
            set_msgstr(entry, 0, value);
            current.seen_msgstr = true;
            Field::Str(0)
        }
        _ => {
            let Some(index) = keyword
                .strip_prefix("msgstr[")
                .and_then(|s| s.strip_suffix(']'))
                .and_then(|s| s.parse::<usize>().ok())
            else {
                bail!("line {}: unknown keyword '{}'", line_no, keyword);
            };
            set_msgstr(entry, index, value);
            current.seen_msgstr = true;
            Field::Str(index)
        }
    };
    Ok(next)
}

fn set_msgstr(entry: &mut PoEntry, index: usize, value: String) {
    if entry.msgstr.len() <= index {
        entry.msgstr.resize(index + 1, String::new());
    }
    entry.msgstr[index] = value;
}

fn parse_string(quoted: &str, line_no: usize) -> Result<String> {
    let Some(inner) = quoted
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .filter(|_| quoted.len() >= 2)
    else {
        bail!("line {}: expected a quoted string, found '{}'", line_no, quoted);
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => bail!("line {}: dangling escape at end of string", line_no),
        }
    }
    Ok(out)
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

fn write_field(out: &mut String, prefix: &str, keyword: &str, value: &str) {
    let multiline = value.trim_end_matches('\n').contains('\n');
    if !multiline {
        out.push_str(&format!("{}{} \"{}\"\n", prefix, keyword, escape(value)));
        return;
    }
    out.push_str(&format!("{}{} \"\"\n", prefix, keyword));
    for line in value.split_inclusive('\n') {
        out.push_str(&format!("{}\"{}\"\n", prefix, escape(line)));
    }
}

impl PoFile {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Serialize back to PO text.
    pub fn to_po_string(&self) -> String {
        let mut out = String::new();

        for comment in &self.header_comments {
            if comment.is_empty() {
                out.push_str("#\n");
            } else {
                out.push_str(&format!("# {}\n", comment));
            }
        }
        out.push_str("msgid \"\"\n");
        out.push_str("msgstr \"\"\n");
        for (name, value) in &self.headers {
            out.push_str(&format!("\"{}\"\n", escape(&format!("{}: {}\n", name, value))));
        }

        for entry in &self.entries {
            out.push('\n');
            write_entry(&mut out, entry);
        }
        out
    }
}

fn write_entry(out: &mut String, entry: &PoEntry) {
    for comment in &entry.translator_comments {
        out.push_str(&format!("# {}\n", comment));
    }
    for comment in &entry.extracted_comments {
        out.push_str(&format!("#. {}\n", comment));
    }
    for reference in &entry.references {
        out.push_str(&format!("#: {}\n", reference));
    }
    if !entry.flags.is_empty() {
        out.push_str(&format!("#, {}\n", entry.flags.join(", ")));
    }

    let prefix = if entry.obsolete { "#~ " } else { "" };
    if let Some(ctxt) = &entry.msgctxt {
        write_field(out, prefix, "msgctxt", ctxt);
    }
    write_field(out, prefix, "msgid", &entry.msgid);
    match &entry.msgid_plural {
        Some(plural) => {
            write_field(out, prefix, "msgid_plural", plural);
            let count = entry.msgstr.len().max(2);
            for index in 0..count {
                let value = entry.msgstr.get(index).map(String::as_str).unwrap_or("");
                write_field(out, prefix, &format!("msgstr[{}]", index), value);
            }
        }
        None => {
            let value = entry.msgstr.first().map(String::as_str).unwrap_or("");
            write_field(out, prefix, "msgstr", value);
        }
    }
}

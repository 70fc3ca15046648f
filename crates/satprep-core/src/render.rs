//! Output rendering for generated questions
//!
//! Markdown is written through unchanged. HTML output is a small line-based
//! conversion that covers what the model produces: headings, numbered and
//! bulleted lists, fenced code, paragraphs, `**bold**` and `` `code` ``.

use std::path::Path;

/// File format for a saved answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Markdown,
    Html,
}

impl OutputFormat {
    /// Pick the format from a file extension. Anything other than
    /// `.html`/`.htm` is written as Markdown.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("html") | Some("htm") => Self::Html,
            _ => Self::Markdown,
        }
    }
}

/// Render `markdown` into the bytes written for `format`
pub fn render(markdown: &str, format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Markdown => markdown.as_bytes().to_vec(),
        OutputFormat::Html => render_html_document(markdown, "SAT Math Practice Questions").into_bytes(),
    }
}

/// Wrap the converted body in a standalone HTML page
pub fn render_html_document(markdown: &str, title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        markdown_to_html(markdown)
    )
}

#[derive(PartialEq)]
enum Block {
    None,
    Paragraph,
    OrderedList,
    UnorderedList,
}

fn close_block(out: &mut String, block: &mut Block) {
    match block {
        Block::None => {}
        Block::Paragraph => out.push_str("</p>\n"),
        Block::OrderedList => out.push_str("</ol>\n"),
        Block::UnorderedList => out.push_str("</ul>\n"),
    }
    *block = Block::None;
}

/// Convert Markdown to an HTML fragment
pub fn markdown_to_html(markdown: &str) -> String {
    let mut out = String::new();
    let mut block = Block::None;
    let mut in_code_block = false;

    for raw_line in markdown.lines() {
        let trimmed = raw_line.trim_start();

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            if in_code_block {
                out.push_str("</code></pre>\n");
                in_code_block = false;
            } else {
                close_block(&mut out, &mut block);
                out.push_str("<pre><code>");
                in_code_block = true;
            }
            continue;
        }

        if in_code_block {
            out.push_str(&escape_html(raw_line));
            out.push('\n');
            continue;
        }

        if trimmed.is_empty() {
            close_block(&mut out, &mut block);
            continue;
        }

        if let Some((level, heading)) = parse_heading(trimmed) {
            close_block(&mut out, &mut block);
            out.push_str(&format!(
                "<h{level}>{}</h{level}>\n",
                render_inline(heading),
                level = level
            ));
            continue;
        }

        if let Some(item) = parse_ordered_item(trimmed) {
            if block != Block::OrderedList {
                close_block(&mut out, &mut block);
                out.push_str("<ol>\n");
                block = Block::OrderedList;
            }
            out.push_str(&format!("<li>{}</li>\n", render_inline(item)));
            continue;
        }

        if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            if block != Block::UnorderedList {
                close_block(&mut out, &mut block);
                out.push_str("<ul>\n");
                block = Block::UnorderedList;
            }
            out.push_str(&format!("<li>{}</li>\n", render_inline(item)));
            continue;
        }

        match block {
            Block::Paragraph => out.push('\n'),
            // Continuation lines of a list item stay in the list
            Block::OrderedList | Block::UnorderedList if raw_line.starts_with(' ') => {
                out.push_str(&format!("<p>{}</p>\n", render_inline(trimmed)));
                continue;
            }
            _ => {
                close_block(&mut out, &mut block);
                out.push_str("<p>");
                block = Block::Paragraph;
            }
        }
        out.push_str(&render_inline(trimmed));
    }

    if in_code_block {
        out.push_str("</code></pre>\n");
    }
    close_block(&mut out, &mut block);
    out
}

fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    line[level..].strip_prefix(' ').map(|h| (level, h.trim()))
}

fn parse_ordered_item(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    rest.strip_prefix(". ")
        .or_else(|| rest.strip_prefix(") "))
}

/// Inline `**bold**` and `` `code` `` spans, everything else escaped
fn render_inline(text: &str) -> String {
    let mut out = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '`' => {
                let mut code = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '`' {
                        closed = true;
                        break;
                    }
                    code.push(c);
                }
                if closed {
                    out.push_str(&format!("<code>{}</code>", escape_html(&code)));
                } else {
                    out.push('`');
                    out.push_str(&escape_html(&code));
                }
            }
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut bold = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    if c == '*' && chars.peek() == Some(&'*') {
                        chars.next();
                        closed = true;
                        break;
                    }
                    bold.push(c);
                }
                if closed {
                    out.push_str(&format!("<strong>{}</strong>", escape_html(&bold)));
                } else {
                    out.push_str("**");
                    out.push_str(&escape_html(&bold));
                }
            }
            c => push_escaped(&mut out, c),
        }
    }
    out
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        c => out.push(c),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        push_escaped(&mut out, c);
    }
    out
}

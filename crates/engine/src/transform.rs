//! Obsidian Markdown → Pandoc Markdown rewrites
//!
//! Four rules run in a fixed order over every note body:
//!
//! 1. YouTube embeds (`![alt](youtube-url)` or a bare URL on its own line)
//!    become a raw HTML `<iframe>`
//! 2. Image embeds `![[file.png|300]]` become `![](path){ width=300px }`
//! 3. Wiki links `[[Page#Heading|Alias]]` become `[Alias](Page.html#heading)`
//! 4. Highlights `==text==` become `<span class="highlight">text</span>`
//!
//! Fenced code blocks and inline code spans are passed through untouched.

use crate::links::{LinkIndex, relative_link};
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;

/// `![alt](url)`; the URL is checked for YouTube afterwards
static MARKDOWN_EMBED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[([^\]\n]*)\]\(\s*<?(https?://[^)\s>]+)>?\s*\)")
        .expect("Failed to compile markdown embed pattern")
});

/// A URL alone on its line
static BARE_URL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(https?://[^\s]+)[ \t]*$").expect("Failed to compile bare URL pattern")
});

/// `![[target]]` or `![[target|size-or-alt]]`
static WIKI_EMBED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[\[([^\[\]\n]+?)\]\]").expect("Failed to compile wiki embed pattern")
});

/// `[[target]]` or `[[target|alias]]`
static WIKI_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[([^\[\]\n]+?)\]\]").expect("Failed to compile wiki link pattern")
});

/// `==text==` with non-blank text touching both markers
static HIGHLIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"==([^\s=](?:[^\n]*?[^\s=])?)==").expect("Failed to compile highlight pattern")
});

/// `{ width=300px }` or `{ width=300px height=200px }` from `300` or `300x200`
static IMAGE_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)(?:\s*x\s*(\d+))?\s*$").expect("Failed to compile image size pattern")
});

/// Rewrites one note body at a time
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    resource_dir: String,
    index: LinkIndex,
}

impl Transformer {
    /// Create a transformer that looks for unresolved attachments in `resource_dir`
    ///
    /// `resource_dir` is vault-relative. An empty string leaves bare
    /// attachment names as they are.
    pub fn new(resource_dir: impl Into<String>) -> Self {
        Self {
            resource_dir: resource_dir.into().trim_matches('/').to_string(),
            index: LinkIndex::new(),
        }
    }

    /// Resolve link and embed targets against a vault index
    #[must_use]
    pub fn with_index(mut self, index: LinkIndex) -> Self {
        self.index = index;
        self
    }

    /// Rewrite a note body
    ///
    /// `note` is the vault-relative path of the note, used to build relative
    /// links.
    pub fn apply(&self, content: &str, note: &Path) -> String {
        map_prose_blocks(content, |block| {
            let block = replace_bare_youtube_lines(block);
            map_inline_prose(&block, |text| {
                let text = replace_youtube_embeds(text);
                let text = self.replace_wiki_embeds(&text, note);
                let text = self.replace_wiki_links(&text, note);
                replace_highlights(&text)
            })
        })
    }

    fn replace_wiki_embeds(&self, text: &str, note: &Path) -> String {
        WIKI_EMBED
            .replace_all(text, |caps: &Captures<'_>| {
                let (target, modifier) = split_pipe(&caps[1]);
                let (page, heading) = split_heading(target);

                if is_note_target(page) {
                    // Embedded note: there is no transclusion in HTML, link to it
                    return self.note_link(page, heading, modifier, note);
                }

                let path = self.attachment_path(page.trim(), note);
                let url = encode_url_path(&path);
                match modifier.map(|m| (m, IMAGE_SIZE.captures(m))) {
                    Some((_, Some(size))) => {
                        let mut attrs = format!("width={}px", &size[1]);
                        if let Some(height) = size.get(2) {
                            attrs.push_str(&format!(" height={}px", height.as_str()));
                        }
                        format!("![]({url}){{ {attrs} }}")
                    }
                    Some((alt, None)) => format!("![{}]({url})", alt.trim()),
                    None => format!("![]({url})"),
                }
            })
            .into_owned()
    }

    fn replace_wiki_links(&self, text: &str, note: &Path) -> String {
        WIKI_LINK
            .replace_all(text, |caps: &Captures<'_>| {
                let (target, alias) = split_pipe(&caps[1]);
                let (page, heading) = split_heading(target);
                self.note_link(page, heading, alias, note)
            })
            .into_owned()
    }

    fn note_link(&self, page: &str, heading: Option<&str>, alias: Option<&str>, note: &Path) -> String {
        let page = page.trim();
        let page = strip_md_extension(page);
        let anchor = heading.and_then(heading_anchor);

        let label = match (alias.map(str::trim).filter(|a| !a.is_empty()), heading) {
            (Some(alias), _) => alias.to_string(),
            (None, Some(heading)) if page.is_empty() => heading.trim().to_string(),
            (None, _) => page.to_string(),
        };

        let mut href = if page.is_empty() {
            String::new()
        } else {
            encode_url_path(&self.index.resolve_note(page, note))
        };
        if let Some(anchor) = anchor {
            href.push('#');
            href.push_str(&anchor);
        }

        format!("[{label}]({href})")
    }

    fn attachment_path(&self, name: &str, note: &Path) -> String {
        if name.contains('/') {
            return name.to_string();
        }
        if let Some(found) = self.index.resolve_asset(name, note) {
            return found;
        }
        if self.resource_dir.is_empty() {
            name.to_string()
        } else {
            let note_dir = note.parent().unwrap_or(Path::new(""));
            relative_link(note_dir, &Path::new(&self.resource_dir).join(name))
        }
    }
}

/// Extract the video id from a YouTube watch, short, embed or youtu.be URL
pub fn youtube_video_id(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    let rest = rest.strip_prefix("m.").unwrap_or(rest);

    let id = if let Some(path) = rest.strip_prefix("youtu.be/") {
        path.split(['?', '#', '/']).next()?
    } else if let Some(path) = rest.strip_prefix("youtube.com/") {
        if let Some(query) = path.strip_prefix("watch?") {
            query
                .split(['&', '#'])
                .find_map(|pair| pair.strip_prefix("v="))?
        } else if let Some(id) = path
            .strip_prefix("shorts/")
            .or_else(|| path.strip_prefix("embed/"))
        {
            id.split(['?', '#', '/']).next()?
        } else {
            return None;
        }
    } else {
        return None;
    };

    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid.then_some(id)
}

fn youtube_iframe(id: &str) -> String {
    format!(
        r#"<iframe width="560" height="315" src="https://www.youtube.com/embed/{id}" frameborder="0" allowfullscreen></iframe>"#
    )
}

fn replace_bare_youtube_lines(text: &str) -> String {
    BARE_URL_LINE
        .replace_all(text, |caps: &Captures<'_>| match youtube_video_id(&caps[1]) {
            Some(id) => youtube_iframe(id),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn replace_youtube_embeds(text: &str) -> String {
    MARKDOWN_EMBED
        .replace_all(text, |caps: &Captures<'_>| match youtube_video_id(&caps[2]) {
            Some(id) => youtube_iframe(id),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn replace_highlights(text: &str) -> String {
    HIGHLIGHT
        .replace_all(text, r#"<span class="highlight">$1</span>"#)
        .into_owned()
}

/// Split `target|rest` on the first pipe; `\|` (escaped in tables) counts too
fn split_pipe(inner: &str) -> (&str, Option<&str>) {
    match inner.split_once('|') {
        Some((target, rest)) => (target.strip_suffix('\\').unwrap_or(target), Some(rest)),
        None => (inner, None),
    }
}

fn split_heading(target: &str) -> (&str, Option<&str>) {
    match target.split_once('#') {
        Some((page, heading)) => (page, Some(heading)),
        None => (target, None),
    }
}

fn strip_md_extension(page: &str) -> &str {
    let len = page.len();
    if len > 3 && page.is_char_boundary(len - 3) && page[len - 3..].eq_ignore_ascii_case(".md") {
        &page[..len - 3]
    } else {
        page
    }
}

/// An embed without a file extension (or with `.md`) refers to a note
fn is_note_target(page: &str) -> bool {
    let name = page.trim().rsplit('/').next().unwrap_or("");
    match name.rsplit_once('.') {
        Some((_, ext)) => ext.eq_ignore_ascii_case("md") || ext.is_empty() || ext.contains(' '),
        None => true,
    }
}

/// Pandoc-style identifier for a heading; block references (`^id`) have none
fn heading_anchor(heading: &str) -> Option<String> {
    let heading = heading.trim();
    if heading.is_empty() || heading.starts_with('^') {
        return None;
    }

    let mut anchor = String::with_capacity(heading.len());
    for c in heading.chars() {
        if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' {
            anchor.extend(c.to_lowercase());
        } else if c.is_whitespace() {
            anchor.push('-');
        }
    }
    let anchor = anchor.trim_start_matches(|c: char| !c.is_alphabetic());
    (!anchor.is_empty()).then(|| anchor.to_string())
}

/// Percent-encode the characters that break a Markdown link destination
fn encode_url_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '%' => out.push_str("%25"),
            '#' => out.push_str("%23"),
            ' ' => out.push_str("%20"),
            '(' => out.push_str("%28"),
            ')' => out.push_str("%29"),
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            _ => out.push(c),
        }
    }
    out
}

/// Apply `f` to every run of lines outside fenced code blocks
fn map_prose_blocks(content: &str, mut f: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(content.len() + content.len() / 8);
    let mut prose_start = 0;
    let mut offset = 0;
    let mut fence: Option<(char, usize)> = None;

    for line in content.split_inclusive('\n') {
        match fence {
            Some((ch, len)) => {
                out.push_str(line);
                if is_closing_fence(line, ch, len) {
                    fence = None;
                    prose_start = offset + line.len();
                }
            }
            None => {
                if let Some(opening) = opening_fence(line) {
                    out.push_str(&f(&content[prose_start..offset]));
                    out.push_str(line);
                    fence = Some(opening);
                }
            }
        }
        offset += line.len();
    }

    match fence {
        // Unclosed fence runs to the end of the note
        Some(_) => {}
        None => out.push_str(&f(&content[prose_start..])),
    }
    out
}

fn fence_indent_ok(line: &str) -> Option<&str> {
    let stripped = line.trim_start_matches(' ');
    (line.len() - stripped.len() <= 3).then_some(stripped)
}

fn opening_fence(line: &str) -> Option<(char, usize)> {
    let stripped = fence_indent_ok(line)?;
    let ch = stripped.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = stripped.chars().take_while(|c| *c == ch).count();
    if len < 3 {
        return None;
    }
    let info = &stripped[len..];
    if ch == '`' && info.contains('`') {
        return None;
    }
    Some((ch, len))
}

fn is_closing_fence(line: &str, ch: char, len: usize) -> bool {
    let Some(stripped) = fence_indent_ok(line) else {
        return false;
    };
    let run = stripped.chars().take_while(|c| *c == ch).count();
    run >= len && stripped[run..].trim().is_empty()
}

/// Apply `f` to the text between inline code spans
fn map_inline_prose(text: &str, mut f: impl FnMut(&str) -> String) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut prose_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }

        let run = backtick_run(bytes, i);
        match find_closing_run(bytes, i + run, run) {
            Some(close) if !text[i + run..close].contains("\n\n") => {
                out.push_str(&f(&text[prose_start..i]));
                out.push_str(&text[i..close + run]);
                i = close + run;
                prose_start = i;
            }
            _ => i += run,
        }
    }

    out.push_str(&f(&text[prose_start..]));
    out
}

fn backtick_run(bytes: &[u8], start: usize) -> usize {
    bytes[start..].iter().take_while(|b| **b == b'`').count()
}

fn find_closing_run(bytes: &[u8], from: usize, len: usize) -> Option<usize> {
    let mut j = from;
    while j < bytes.len() {
        if bytes[j] == b'`' {
            let run = backtick_run(bytes, j);
            if run == len {
                return Some(j);
            }
            j += run;
        } else {
            j += 1;
        }
    }
    None
}

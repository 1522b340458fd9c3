//! Plain-text extraction and text metrics.

use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Options, Parser, TagEnd};
use regex::Regex;

/// Matches any CJK character
static CJK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\p{Han}|\p{Hangul}|\p{Hiragana}|\p{Katakana}").expect("valid CJK regex")
});

/// Shortcode delimiters: `{{< name args >}}`, `{{% /name %}}`
static SHORTCODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{[<%].*?[%>]\}\}").expect("valid shortcode regex"));

/// Words read per minute
const WORDS_PER_MINUTE: usize = 213;
const CJK_CHARS_PER_MINUTE: usize = 501;

/// Render Markdown and keep only its text.
///
/// Block boundaries become line breaks; inline HTML is tag-stripped;
/// shortcode delimiters are dropped while their inner content is kept.
pub fn markdown_to_plain(markdown: &str) -> String {
    let source = SHORTCODE.replace_all(markdown, "");
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let mut text = String::with_capacity(source.len());
    for event in Parser::new_ext(&source, options) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::Html(html) | Event::InlineHtml(html) => {
                text.push_str(&strip_tags(&html));
            }
            Event::SoftBreak => text.push(' '),
            Event::HardBreak | Event::Rule => text.push('\n'),
            Event::End(tag) if ends_block(&tag) => text.push('\n'),
            Event::End(TagEnd::TableCell) => text.push(' '),
            _ => {}
        }
    }

    collapse_whitespace(&text)
}

fn ends_block(tag: &TagEnd) -> bool {
    matches!(
        tag,
        TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::Item
            | TagEnd::CodeBlock
            | TagEnd::TableHead
            | TagEnd::TableRow
            | TagEnd::FootnoteDefinition
    )
}

/// Strip HTML to plain text, dropping `<script>` and `<style>` bodies.
pub fn strip_html(html: &str) -> String {
    let source = SHORTCODE.replace_all(html, "");
    collapse_whitespace(&strip_tags(&source))
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    let mut skip_until: Option<&'static str> = None;

    while let Some(open) = rest.find('<') {
        if skip_until.is_none() {
            out.push_str(&rest[..open]);
        }
        let tag_src = &rest[open..];
        let Some(close) = tag_src.find('>') else {
            // Unterminated tag: treat the remainder as markup
            rest = "";
            break;
        };
        let tag = tag_src[1..close].trim().to_ascii_lowercase();

        match skip_until {
            Some(end) if tag == end => skip_until = None,
            Some(_) => {}
            None if tag.starts_with("script") => skip_until = Some("/script"),
            None if tag.starts_with("style") => skip_until = Some("/style"),
            None if is_block_tag(&tag) => out.push(' '),
            None => {}
        }
        rest = &tag_src[close + 1..];
    }
    if skip_until.is_none() {
        out.push_str(rest);
    }

    decode_entities(&out)
}

fn is_block_tag(tag: &str) -> bool {
    let name = tag
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("");
    matches!(
        name,
        "p" | "br"
            | "div"
            | "li"
            | "tr"
            | "td"
            | "th"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "section"
            | "article"
            | "blockquote"
            | "pre"
    )
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Check whether text contains CJK characters
pub fn has_cjk(text: &str) -> bool {
    CJK.is_match(text)
}

/// Count words; with `cjk` set, each CJK character counts as a word.
pub fn count_words(text: &str, cjk: bool) -> usize {
    text.split_whitespace()
        .map(|word| {
            if cjk && has_cjk(word) {
                word.chars().count()
            } else {
                1
            }
        })
        .sum()
}

/// Reading time in whole minutes, rounded up
pub fn reading_time(word_count: usize, cjk: bool) -> usize {
    let rate = if cjk {
        CJK_CHARS_PER_MINUTE
    } else {
        WORDS_PER_MINUTE
    };
    word_count.div_ceil(rate)
}

//! Markdown content processing.
//!
//! Stateless, pure transformations from markdown source to rendered HTML
//! and derived metadata: excerpts, reading time, extracted links and
//! images, and content validation. Rendering is a pure function of the
//! source and the processor's option set, which is what makes caching the
//! output by content hash sound.

use crate::frontmatter::Frontmatter;
use crate::types::ArticleType;
use crate::{Result, slug};
use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};
use regex::Regex;
use sha2::{Digest, Sha256};

/// Words-per-minute rate used for reading time estimates.
const WORDS_PER_MINUTE: usize = 200;

static FENCED_CODE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(?s)```.*?```").expect("valid fence pattern")
});
static IMAGE_SYNTAX: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"!\[([^\]]*)\]\([^)]*\)").expect("valid image pattern")
});
static LINK_SYNTAX: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("valid link pattern")
});
static FIRST_H1: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("valid h1 pattern")
});
static HTML_TAG: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"<[^>]+>").expect("valid tag pattern")
});

/// Markdown-to-HTML processor with the engine's extension set.
///
/// Construction is cheap and the processor carries no per-article state;
/// the composite service holds one instance and passes it around as a
/// collaborator.
#[derive(Debug, Clone)]
pub struct ContentProcessor {
    options: Options,
}

impl Default for ContentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentProcessor {
    /// Creates a processor with GitHub-flavored extensions enabled:
    /// tables, strikethrough, task lists, definition lists, and footnotes.
    #[must_use]
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_DEFINITION_LIST);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        Self { options }
    }

    /// Render markdown to HTML.
    ///
    /// Beyond the extension set, the event stream is rewritten so that
    /// soft breaks become hard line breaks and headings without an explicit
    /// id get an auto-generated anchor derived from their text. Raw HTML in
    /// the source passes through untouched.
    pub fn process_markdown(&self, markdown: &str) -> Result<String> {
        let events: Vec<Event> = Parser::new_ext(markdown, self.options).collect();
        let events = inject_heading_anchors(events);

        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(
            &mut output,
            events.into_iter().map(|event| match event {
                Event::SoftBreak => Event::HardBreak,
                other => other,
            }),
        );
        Ok(output)
    }

    /// Derive a plain-text excerpt of at most `max_len` characters.
    ///
    /// Strips code blocks, reduces links and images to their text, drops
    /// heading lines and emphasis markers, and normalizes whitespace.
    /// Truncation backs up to the previous word boundary and appends `...`.
    #[must_use]
    pub fn generate_excerpt(&self, markdown: &str, max_len: usize) -> String {
        let text = strip_markdown(markdown);
        if text.chars().count() <= max_len {
            return text;
        }

        let truncated: String = text.chars().take(max_len).collect();
        let cut = truncated
            .rfind(char::is_whitespace)
            .unwrap_or(truncated.len());
        let mut excerpt = truncated[..cut].trim_end().to_string();
        excerpt.push_str("...");
        excerpt
    }

    /// Estimate reading time in minutes at 200 words per minute.
    ///
    /// Code blocks and link noise are excluded from the count. Non-empty
    /// content always reads as at least one minute; empty content reads as
    /// zero.
    #[must_use]
    pub fn calculate_reading_time(&self, markdown: &str) -> u32 {
        let raw_words = markdown.split_whitespace().count();
        if raw_words == 0 {
            return 0;
        }
        let words = strip_markdown(markdown).split_whitespace().count();
        let minutes = (words / WORDS_PER_MINUTE) as u32;
        minutes.max(1)
    }

    /// Remove the first `<h1>` from rendered HTML when its text equals the
    /// article title (compared case- and whitespace-insensitively).
    ///
    /// Templates render the title themselves; this keeps an authored
    /// leading heading from doubling it.
    #[must_use]
    pub fn process_duplicate_titles(&self, title: &str, html_content: &str) -> String {
        let Some(captures) = FIRST_H1.captures(html_content) else {
            return html_content.to_string();
        };
        #[allow(clippy::expect_used)] // group 0 always exists on a match
        let whole = captures.get(0).expect("match");
        let inner = captures.get(1).map_or("", |m| m.as_str());
        let heading_text = HTML_TAG.replace_all(inner, "");

        if normalize_for_compare(&heading_text) == normalize_for_compare(title) {
            let mut output = String::with_capacity(html_content.len());
            output.push_str(&html_content[..whole.start()]);
            output.push_str(html_content[whole.end()..].trim_start());
            output
        } else {
            html_content.to_string()
        }
    }

    /// Collect the destination URLs of all images in the markdown.
    #[must_use]
    pub fn extract_image_urls(&self, markdown: &str) -> Vec<String> {
        Parser::new_ext(markdown, self.options)
            .filter_map(|event| match event {
                Event::Start(Tag::Image { dest_url, .. }) => Some(dest_url.to_string()),
                _ => None,
            })
            .collect()
    }

    /// Collect the destination URLs of all links in the markdown.
    #[must_use]
    pub fn extract_links(&self, markdown: &str) -> Vec<String> {
        Parser::new_ext(markdown, self.options)
            .filter_map(|event| match event {
                Event::Start(Tag::Link { dest_url, .. }) => Some(dest_url.to_string()),
                _ => None,
            })
            .collect()
    }

    /// Report structural issues in the markdown source.
    ///
    /// An empty result means the content passed every check. Issues are
    /// advisory; nothing here blocks a load.
    #[must_use]
    pub fn validate_content(&self, markdown: &str) -> Vec<String> {
        let mut issues = Vec::new();

        if markdown.trim().is_empty() {
            issues.push("content is empty".to_string());
            return issues;
        }

        let fence_count = markdown
            .lines()
            .filter(|line| line.trim_start().starts_with("```"))
            .count();
        if fence_count % 2 != 0 {
            issues.push("unclosed fenced code block".to_string());
        }

        if markdown.contains("]()") {
            issues.push("link with empty target".to_string());
        }

        if markdown.contains("![](") {
            issues.push("image missing alt text".to_string());
        }

        issues
    }

    /// Hex SHA-256 of the markdown source; the key for the processed-content
    /// cache namespace.
    #[must_use]
    pub fn content_hash(&self, markdown: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(markdown.as_bytes());
        let digest = hasher.finalize();
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Infer the article kind from frontmatter and derived metadata.
///
/// An explicit `type` wins; a `link_url` makes a link post; an untitled
/// body under 100 words is a thought; everything else is an article.
#[must_use]
pub fn infer_article_type(frontmatter: &Frontmatter, word_count: usize) -> ArticleType {
    if let Some(explicit) = frontmatter
        .article_type
        .as_deref()
        .filter(|t| !t.trim().is_empty())
    {
        return ArticleType::parse(explicit);
    }
    if frontmatter.link_url.is_some() {
        return ArticleType::Link;
    }
    if frontmatter.title.trim().is_empty() && word_count < 100 {
        return ArticleType::Thought;
    }
    ArticleType::Article
}

/// Reduce markdown to plain text: no code blocks, no link/image syntax, no
/// emphasis markers, no heading lines, single-spaced.
fn strip_markdown(markdown: &str) -> String {
    let without_code = FENCED_CODE.replace_all(markdown, " ");
    let without_images = IMAGE_SYNTAX.replace_all(&without_code, "$1");
    let without_links = LINK_SYNTAX.replace_all(&without_images, "$1");

    let without_headings: String = without_links
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");

    let without_emphasis = without_headings.replace(['*', '_', '`'], "");

    without_emphasis
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize_for_compare(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Give every heading without an explicit id an anchor slug derived from
/// its text.
fn inject_heading_anchors(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut rewritten = Vec::with_capacity(events.len());
    let mut index = 0;

    while index < events.len() {
        match &events[index] {
            Event::Start(Tag::Heading {
                level,
                id: None,
                classes,
                attrs,
            }) => {
                let mut text = String::new();
                for event in &events[index + 1..] {
                    match event {
                        Event::Text(t) | Event::Code(t) => text.push_str(t),
                        Event::End(TagEnd::Heading(_)) => break,
                        _ => {}
                    }
                }
                let anchor = slug::slugify(&text);
                let id = if anchor.is_empty() {
                    None
                } else {
                    Some(anchor.into())
                };
                rewritten.push(Event::Start(Tag::Heading {
                    level: *level,
                    id,
                    classes: classes.clone(),
                    attrs: attrs.clone(),
                }));
            },
            other => rewritten.push(other.clone()),
        }
        index += 1;
    }

    rewritten
}

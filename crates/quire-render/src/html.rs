//! Markdown to HTML rendering.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use tracing::debug;

use crate::content_ref::{ContentRef, ContentRefResolver};
use crate::{DocumentRenderer, RenderContext};

/// Escape text for use in HTML content and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Renders markdown documents to HTML.
///
/// GFM tables, strikethrough and task lists are enabled. Raw HTML in the
/// source is escaped rather than passed through.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    /// Create a renderer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn parser_options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM
    }
}

impl DocumentRenderer for MarkdownRenderer {
    fn render(&self, document: &str, context: &RenderContext<'_>, style: &str) -> String {
        let parser = Parser::new_ext(document, Self::parser_options());
        let mut writer = HtmlWriter::new(context);
        writer.output.push_str(&format!(r#"<div class="{}">"#, escape_html(style)));
        for event in parser {
            writer.process_event(event);
        }
        writer.output.push_str("</div>");
        writer.output
    }
}

/// Link being rendered.
struct OpenLink {
    /// Whether an `<a>` element was opened for it.
    anchor: bool,
    /// Text to use if the link has none of its own.
    fallback: Option<String>,
    /// Output length when the link started.
    start: usize,
}

/// Image whose alt text is being collected.
struct PendingImage {
    src: String,
    title: String,
    alt: String,
}

struct HtmlWriter<'c> {
    output: String,
    content_refs: &'c dyn ContentRefResolver,
    lazy: bool,
    links: Vec<OpenLink>,
    image: Option<PendingImage>,
    /// Images opened inside a pending image's alt text.
    nested_images: usize,
    code: Option<String>,
    in_table_head: bool,
}

impl<'c> HtmlWriter<'c> {
    fn new(context: &RenderContext<'c>) -> Self {
        Self {
            output: String::with_capacity(1024),
            content_refs: context.content_refs,
            lazy: context.lazy,
            links: Vec::new(),
            image: None,
            nested_images: 0,
            code: None,
            in_table_head: false,
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                if let Some(image) = &mut self.image {
                    image.alt.push_str(&code);
                } else {
                    self.output
                        .push_str(&format!("<code>{}</code>", escape_html(&code)));
                }
            }
            Event::Html(html) | Event::InlineHtml(html) => self.text(&html),
            Event::SoftBreak => self.text("\n"),
            Event::HardBreak => self.output.push_str("<br />"),
            Event::Rule => self.output.push_str("<hr />"),
            Event::TaskListMarker(checked) => {
                let checked = if checked { " checked" } else { "" };
                self.output.push_str(&format!(
                    r#"<input type="checkbox" disabled{checked} /> "#
                ));
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                let level = heading_level_to_num(level);
                self.output.push_str(&format!("<h{level}>"));
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                match kind {
                    CodeBlockKind::Fenced(info) if !info.is_empty() => {
                        let lang = info.split_whitespace().next().unwrap_or_default();
                        self.output.push_str(&format!(
                            r#"<pre><code class="language-{}">"#,
                            escape_html(lang)
                        ));
                    }
                    _ => self.output.push_str("<pre><code>"),
                }
                self.code = Some(String::new());
            }
            Tag::List(Some(1)) => self.output.push_str("<ol>"),
            Tag::List(Some(start)) => self.output.push_str(&format!(r#"<ol start="{start}">"#)),
            Tag::List(None) => self.output.push_str("<ul>"),
            Tag::Item => self.output.push_str("<li>"),
            Tag::Table(_) => self.output.push_str("<table>"),
            Tag::TableHead => {
                self.in_table_head = true;
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => self.output.push_str("<tr>"),
            Tag::TableCell => {
                self.output
                    .push_str(if self.in_table_head { "<th>" } else { "<td>" });
            }
            Tag::Emphasis => self.output.push_str("<em>"),
            Tag::Strong => self.output.push_str("<strong>"),
            Tag::Strikethrough => self.output.push_str("<s>"),
            Tag::Link { dest_url, .. } => self.start_link(&dest_url),
            Tag::Image { .. } if self.image.is_some() => self.nested_images += 1,
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image = Some(PendingImage {
                    src: dest_url.into_string(),
                    title: title.into_string(),
                    alt: String::new(),
                });
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(level) => {
                let level = heading_level_to_num(level);
                self.output.push_str(&format!("</h{level}>"));
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => {
                if let Some(code) = self.code.take() {
                    self.output.push_str(&escape_html(&code));
                }
                self.output.push_str("</code></pre>");
            }
            TagEnd::List(ordered) => self.output.push_str(if ordered { "</ol>" } else { "</ul>" }),
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.in_table_head = false;
                self.output.push_str("</tr></thead><tbody>");
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output
                    .push_str(if self.in_table_head { "</th>" } else { "</td>" });
            }
            TagEnd::Emphasis => self.output.push_str("</em>"),
            TagEnd::Strong => self.output.push_str("</strong>"),
            TagEnd::Strikethrough => self.output.push_str("</s>"),
            TagEnd::Link => self.end_link(),
            TagEnd::Image if self.nested_images > 0 => self.nested_images -= 1,
            TagEnd::Image => self.end_image(),
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = &mut self.code {
            code.push_str(text);
        } else if let Some(image) = &mut self.image {
            image.alt.push_str(text);
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    /// Resolve a destination. `None` means an unresolved content reference.
    fn resolve(&self, destination: &str) -> Option<(String, Option<String>)> {
        match ContentRef::parse(destination) {
            Some(reference) => {
                let resolved = self.content_refs.resolve(&reference);
                if resolved.is_none() {
                    debug!(destination, "unresolved content reference");
                }
                resolved.map(|target| (target.href, target.text))
            }
            None => Some((destination.to_owned(), None)),
        }
    }

    fn start_link(&mut self, destination: &str) {
        let (anchor, fallback) = match self.resolve(destination) {
            Some((href, fallback)) => {
                self.output
                    .push_str(&format!(r#"<a href="{}">"#, escape_html(&href)));
                (true, fallback)
            }
            None => (false, None),
        };
        self.links.push(OpenLink {
            anchor,
            fallback,
            start: self.output.len(),
        });
    }

    fn end_link(&mut self) {
        let Some(link) = self.links.pop() else {
            return;
        };
        if self.output.len() == link.start
            && let Some(fallback) = link.fallback
        {
            self.output.push_str(&escape_html(&fallback));
        }
        if link.anchor {
            self.output.push_str("</a>");
        }
    }

    fn end_image(&mut self) {
        let Some(image) = self.image.take() else {
            return;
        };
        let Some((src, _)) = self.resolve(&image.src) else {
            return;
        };

        self.output.push_str(&format!(
            r#"<img src="{}" alt="{}""#,
            escape_html(&src),
            escape_html(&image.alt)
        ));
        if !image.title.is_empty() {
            self.output
                .push_str(&format!(r#" title="{}""#, escape_html(&image.title)));
        }
        if self.lazy {
            self.output.push_str(r#" loading="lazy""#);
        }
        self.output.push_str(" />");
    }
}

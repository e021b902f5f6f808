use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;
use url::Url;

use super::classifier::{classify, KindSignals};
use super::models::NewsEntry;

/// RSS timestamp layouts tried before the RFC 2822 and ISO-8601 fallbacks
const DATE_PATTERNS: &[&str] = &["%a, %d %b %Y %H:%M:%S %z", "%d %b %Y %H:%M:%S %z"];

/// Result of scanning one feed document
#[derive(Debug, Default)]
pub struct ParsedFeed {
    /// Entries finalized before the end of the document or the first parse error
    pub entries: Vec<NewsEntry>,
    /// Why the scan stopped early, if it did
    pub error: Option<String>,
}

/// Which accumulator character data is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextField {
    Title,
    Link,
    Source,
    Published,
    Content,
    Category,
    Ignored,
}

impl TextField {
    fn for_element(name: &str) -> Self {
        match name {
            "title" => Self::Title,
            "link" => Self::Link,
            "source" => Self::Source,
            "pubdate" | "updated" | "published" | "dc:date" => Self::Published,
            "content:encoded" | "description" | "content" | "summary" => Self::Content,
            "category" | "dc:subject" => Self::Category,
            _ => Self::Ignored,
        }
    }
}

/// Raw fields collected for the item/entry currently being scanned
#[derive(Debug, Default)]
struct EntryAccumulator {
    title: String,
    link: String,
    source: String,
    published: String,
    media_image: String,
    enclosure_image: String,
    content: String,
    categories: Vec<String>,
    category_buffer: String,
}

impl EntryAccumulator {
    fn push_text(&mut self, field: TextField, text: &str) {
        match field {
            TextField::Title => self.title.push_str(text),
            TextField::Link => self.link.push_str(text),
            TextField::Source => self.source.push_str(text),
            TextField::Published => self.published.push_str(text),
            TextField::Content => self.content.push_str(text),
            TextField::Category => self.category_buffer.push_str(text),
            TextField::Ignored => {}
        }
    }

    fn apply_attributes(&mut self, name: &str, attrs: &[(String, String)]) {
        let attr = |key: &str| {
            attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        match name {
            "media:content" | "media:thumbnail" => {
                if let Some(url) = attr("url").filter(|u| !u.is_empty()) {
                    self.media_image = url.to_string();
                }
            }
            "enclosure" => {
                let is_image = attr("type").is_some_and(|t| t.contains("image"));
                if let Some(url) = attr("url").filter(|u| is_image && !u.is_empty()) {
                    self.enclosure_image = url.to_string();
                }
            }
            "link" => {
                if let Some(href) = attr("href").filter(|h| !h.is_empty()) {
                    if attr("rel") == Some("alternate") || self.link.is_empty() {
                        self.link = href.to_string();
                    }
                }
            }
            _ => {}
        }
    }

    fn close_category(&mut self) {
        let tag = self.category_buffer.trim();
        if !tag.is_empty() {
            self.categories.push(tag.to_string());
        }
        self.category_buffer.clear();
    }

    fn finish(self) -> NewsEntry {
        let title = self.title.trim().to_string();
        let link = self.link.trim();

        let source = match self.source.trim() {
            "" => host_label(link),
            explicit => explicit.to_string(),
        };

        // media element, then image enclosure, then the first <img> in the body
        let image = [self.media_image.trim(), self.enclosure_image.trim()]
            .into_iter()
            .find(|i| !i.is_empty())
            .or_else(|| extract_first_image_url(&self.content));

        let kind = classify(&KindSignals {
            title: &title,
            source: &source,
            link,
            categories: &self.categories,
            content: &self.content,
        });

        NewsEntry::new(title, source, kind)
            .with_link(Url::parse(link).ok())
            .with_published(parse_date(&self.published))
            .with_image(image.and_then(|i| Url::parse(i.trim()).ok()))
            .with_tags(self.categories)
    }
}

#[derive(Debug)]
enum ScanState {
    Outside,
    InEntry {
        entry: EntryAccumulator,
        field: TextField,
    },
}

/// Streaming state machine over start/text/end events
#[derive(Debug)]
struct FeedStateMachine {
    state: ScanState,
    entries: Vec<NewsEntry>,
}

impl FeedStateMachine {
    fn new() -> Self {
        Self {
            state: ScanState::Outside,
            entries: Vec::new(),
        }
    }

    fn on_start(&mut self, name: &str, attrs: &[(String, String)]) {
        if is_entry_boundary(name) {
            self.state = ScanState::InEntry {
                entry: EntryAccumulator::default(),
                field: TextField::Ignored,
            };
            return;
        }

        if let ScanState::InEntry { entry, field } = &mut self.state {
            *field = TextField::for_element(name);
            if *field == TextField::Category {
                entry.category_buffer.clear();
            }
            entry.apply_attributes(name, attrs);
        }
    }

    fn on_text(&mut self, text: &str) {
        if let ScanState::InEntry { entry, field } = &mut self.state {
            entry.push_text(*field, text);
        }
    }

    fn on_end(&mut self, name: &str) {
        if is_entry_boundary(name) {
            if let ScanState::InEntry { entry, .. } = std::mem::replace(&mut self.state, ScanState::Outside) {
                self.entries.push(entry.finish());
            }
            return;
        }

        if let ScanState::InEntry { entry, field } = &mut self.state {
            if TextField::for_element(name) == TextField::Category {
                entry.close_category();
            }
            *field = TextField::Ignored;
        }
    }
}

fn is_entry_boundary(name: &str) -> bool {
    name == "item" || name == "entry"
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_lowercase()
}

fn element_attributes(e: &BytesStart<'_>) -> Vec<(String, String)> {
    e.attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_lowercase();
            let value = attr
                .unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            (key, value)
        })
        .collect()
}

fn decode_text(e: &BytesText<'_>) -> String {
    // Feeds regularly carry HTML entities XML doesn't define; keep them raw
    e.unescape()
        .map(|t| t.into_owned())
        .unwrap_or_else(|_| String::from_utf8_lossy(e).into_owned())
}

/// Parse RSS/Atom content into news entries, best effort
///
/// Never fails: a parse error stops the scan and the entries completed
/// before it are returned, with the reason recorded in [`ParsedFeed::error`].
pub fn parse_feed(content: &[u8]) -> ParsedFeed {
    let mut reader = Reader::from_reader(content);
    let mut machine = FeedStateMachine::new();
    let mut buf = Vec::new();

    let error = loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = element_name(&e);
                machine.on_start(&name, &element_attributes(&e));
            }
            Ok(Event::Empty(e)) => {
                let name = element_name(&e);
                machine.on_start(&name, &element_attributes(&e));
                machine.on_end(&name);
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_lowercase();
                machine.on_end(&name);
            }
            Ok(Event::Text(e)) => machine.on_text(&decode_text(&e)),
            Ok(Event::CData(e)) => machine.on_text(&String::from_utf8_lossy(&e)),
            Ok(Event::Eof) => break None,
            Ok(_) => {}
            Err(e) => break Some(format!("at byte {}: {}", reader.buffer_position(), e)),
        }
        buf.clear();
    };

    match &error {
        Some(reason) => tracing::warn!(
            "Feed parse stopped early ({}), keeping {} entries",
            reason,
            machine.entries.len()
        ),
        None => tracing::debug!("Parsed feed with {} entries", machine.entries.len()),
    }

    ParsedFeed {
        entries: machine.entries,
        error,
    }
}

/// Parse a feed timestamp; unparseable input yields `None`
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_PATTERNS
        .iter()
        .find_map(|pattern| DateTime::parse_from_str(raw, pattern).ok())
        .or_else(|| DateTime::parse_from_rfc2822(raw).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Source label derived from a link's host, without a leading "www."
fn host_label(link: &str) -> String {
    Url::parse(link)
        .ok()
        .and_then(|url| {
            url.host_str()
                .map(|host| host.strip_prefix("www.").unwrap_or(host).to_string())
        })
        .unwrap_or_default()
}

/// First double-quoted `src` of the first `<img` tag in an HTML fragment
fn extract_first_image_url(html: &str) -> Option<&str> {
    // ASCII lowercasing keeps byte offsets aligned with the original
    let lower = html.to_ascii_lowercase();
    let img = lower.find("<img")?;
    let src = lower[img..].find("src=\"")?;
    let start = img + src + "src=\"".len();
    let len = html[start..].find('"')?;
    Some(&html[start..start + len])
}

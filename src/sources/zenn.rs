//! Zenn trending articles.
//!
//! Reads the [Zenn RSS feed](https://zenn.dev/feed). Feed order is trend
//! order, so the first items are taken as-is with no re-sorting.
//!
//! # Item Layout
//!
//! ```xml
//! <item>
//!   <title><![CDATA[...]]></title>
//!   <link>https://zenn.dev/user/articles/slug</link>
//!   <pubDate>Tue, 06 May 2025 12:00:00 GMT</pubDate>
//!   <enclosure url="https://res.cloudinary.com/..." length="0" type="image/png"/>
//!   <dc:creator>user</dc:creator>
//! </item>
//! ```
//!
//! `dc:creator` is matched by namespace URI, so any prefix bound to the
//! Dublin Core namespace is accepted.

use super::{FetchOutcome, TREND_LIMIT, or_default};
use crate::config::ZennConfig;
use crate::models::ZennTrend;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use std::error::Error;
use tracing::{debug, info, instrument};

const DUBLIN_CORE_NS: &[u8] = b"http://purl.org/dc/elements/1.1/";
const DEFAULT_AUTHOR: &str = "Zenn User";

/// Fetch the latest Zenn trend items.
///
/// Never fails: any error is logged and reported as [`FetchOutcome::Failed`].
#[instrument(level = "info", skip_all, fields(feed_url = %config.feed_url))]
pub async fn fetch_trends(client: &reqwest::Client, config: &ZennConfig) -> FetchOutcome<ZennTrend> {
    info!("Fetching Zenn trends");
    FetchOutcome::from_result("zenn", request_trends(client, config).await)
}

async fn request_trends(
    client: &reqwest::Client,
    config: &ZennConfig,
) -> Result<Vec<ZennTrend>, Box<dyn Error>> {
    let body = client
        .get(&config.feed_url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    debug!(bytes = body.len(), "Received Zenn feed");

    parse_feed(&body)
}

/// Item children we project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    PubDate,
    Creator,
    Enclosure,
}

/// Which namespace an element name resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Unbound,
    DublinCore,
    Other,
}

impl Scope {
    fn of(ns: &ResolveResult) -> Self {
        match ns {
            ResolveResult::Unbound => Scope::Unbound,
            ResolveResult::Bound(Namespace(uri)) if *uri == DUBLIN_CORE_NS => Scope::DublinCore,
            _ => Scope::Other,
        }
    }
}

impl Field {
    fn classify(local_name: &[u8], scope: Scope) -> Option<Self> {
        match (scope, local_name) {
            (Scope::DublinCore, b"creator") => Some(Field::Creator),
            (Scope::Unbound, b"title") => Some(Field::Title),
            (Scope::Unbound, b"link") => Some(Field::Link),
            (Scope::Unbound, b"pubDate") => Some(Field::PubDate),
            (Scope::Unbound, b"enclosure") => Some(Field::Enclosure),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct PartialItem {
    title: Option<String>,
    link: Option<String>,
    pub_date: Option<String>,
    creator: Option<String>,
    image_url: Option<String>,
}

impl PartialItem {
    fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::PubDate => &mut self.pub_date,
            Field::Creator => &mut self.creator,
            Field::Enclosure => &mut self.image_url,
        };
        // first occurrence wins
        slot.get_or_insert(value);
    }

    fn finish(self) -> ZennTrend {
        ZennTrend {
            title: or_default(self.title, ""),
            url: or_default(self.link, ""),
            author: or_default(self.creator, DEFAULT_AUTHOR),
            date: or_default(self.pub_date, ""),
            image_url: or_default(self.image_url, ""),
        }
    }
}

/// Parse an RSS 2.0 document into at most [`TREND_LIMIT`] records.
///
/// Missing children fall back to defaults. The whole document must be
/// well-formed: a syntax error anywhere fails the parse, even after the
/// first items were read, and a document cut off with elements still open
/// is rejected. Element text is kept exactly as it appears in the feed.
pub fn parse_feed(xml: &str) -> Result<Vec<ZennTrend>, Box<dyn Error>> {
    let mut reader = NsReader::from_str(xml);
    let mut trends = Vec::new();
    let mut saw_root = false;
    // elements opened but not yet closed, across the whole document
    let mut open = 0usize;

    let mut item: Option<PartialItem> = None;
    // depth below the current <item>; 1 means a direct child
    let mut depth = 0usize;
    let mut field: Option<Field> = None;
    let mut text = String::new();

    loop {
        let (ns, event) = reader.read_resolved_event()?;
        let scope = Scope::of(&ns);

        match event {
            Event::Start(e) => {
                saw_root = true;
                open += 1;
                match item.as_mut() {
                    None => {
                        if is_item(e.local_name().as_ref(), scope) {
                            item = Some(PartialItem::default());
                            depth = 0;
                        }
                    }
                    Some(current) => {
                        depth += 1;
                        if depth == 1 {
                            field = Field::classify(e.local_name().as_ref(), scope);
                            text.clear();
                            if field == Some(Field::Enclosure) {
                                if let Some(url) = enclosure_url(&reader, &e)? {
                                    current.set(Field::Enclosure, url);
                                }
                                field = None;
                            }
                        }
                    }
                }
            }
            Event::Empty(e) => {
                saw_root = true;
                match item.as_mut() {
                    None => {
                        if is_item(e.local_name().as_ref(), scope) && trends.len() < TREND_LIMIT {
                            trends.push(PartialItem::default().finish());
                        }
                    }
                    Some(current) if depth == 0 => {
                        match Field::classify(e.local_name().as_ref(), scope) {
                            Some(Field::Enclosure) => {
                                if let Some(url) = enclosure_url(&reader, &e)? {
                                    current.set(Field::Enclosure, url);
                                }
                            }
                            Some(other) => current.set(other, String::new()),
                            None => {}
                        }
                    }
                    Some(_) => {}
                }
            }
            Event::Text(e) if field.is_some() => {
                text.push_str(&reader.decoder().decode(&e)?);
            }
            Event::CData(e) if field.is_some() => {
                text.push_str(&reader.decoder().decode(&e)?);
            }
            Event::GeneralRef(e) if field.is_some() => {
                let name = reader.decoder().decode(&e)?;
                text.push_str(&resolve_reference(&name)?);
            }
            Event::End(_) => {
                open = open.saturating_sub(1);
                if let Some(mut current) = item.take() {
                    if depth == 0 {
                        if trends.len() < TREND_LIMIT {
                            trends.push(current.finish());
                        }
                        continue;
                    }
                    if depth == 1 {
                        if let Some(done) = field.take() {
                            current.set(done, std::mem::take(&mut text));
                        }
                    }
                    depth -= 1;
                    item = Some(current);
                }
            }
            Event::Eof => {
                if open != 0 {
                    return Err(format!("feed ended with {open} unclosed elements").into());
                }
                break;
            }
            _ => {}
        }
    }

    if !saw_root {
        return Err("feed contains no XML elements".into());
    }
    debug!(count = trends.len(), "Parsed Zenn feed");
    Ok(trends)
}

fn is_item(local_name: &[u8], scope: Scope) -> bool {
    scope == Scope::Unbound && local_name == b"item"
}

fn enclosure_url(reader: &NsReader<&[u8]>, e: &BytesStart) -> Result<Option<String>, Box<dyn Error>> {
    match e.try_get_attribute("url")? {
        Some(attr) => Ok(Some(attr.decode_and_unescape_value(reader.decoder())?.into_owned())),
        None => Ok(None),
    }
}

/// Resolve an entity or character reference name (the part between `&` and `;`).
fn resolve_reference(name: &str) -> Result<String, Box<dyn Error>> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16)?,
            None => number.parse::<u32>()?,
        };
        return char::from_u32(code)
            .map(String::from)
            .ok_or_else(|| format!("invalid character reference &{name};").into());
    }
    resolve_predefined_entity(name)
        .map(str::to_string)
        .ok_or_else(|| format!("unknown entity &{name};").into())
}

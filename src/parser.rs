//! XML decoding for the collection and guild endpoints.
//!
//! Only the fields the pipeline consumes are modelled; everything else in the
//! payload is ignored. Besides data, the API can answer with a `<message>`
//! (usually the processing sentinel) or an `<errors>` / `<error>` document.

use anyhow::{Context, Result, bail};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;

use crate::analyzers::types::{Member, RatingEntry};
use crate::fetch::Payload;

/// Text the API puts in a `<message>` while a request is queued.
const PROCESSING_MARKER: &str = "and will be processed";

#[derive(Deserialize)]
struct Text {
    #[serde(rename = "$text", default)]
    text: String,
}

#[derive(Deserialize)]
struct ItemsXml {
    #[serde(rename = "item", default)]
    items: Vec<ItemXml>,
}

#[derive(Deserialize)]
struct ItemXml {
    #[serde(rename = "@objectid")]
    object_id: String,
    name: Option<Text>,
    stats: Option<StatsXml>,
}

#[derive(Deserialize)]
struct StatsXml {
    rating: Option<ValueXml>,
}

#[derive(Deserialize)]
struct ValueXml {
    #[serde(rename = "@value")]
    value: String,
}

#[derive(Deserialize)]
struct GuildXml {
    members: Option<MembersXml>,
    error: Option<Text>,
}

#[derive(Deserialize)]
struct MembersXml {
    #[serde(rename = "member", default)]
    members: Vec<MemberXml>,
}

#[derive(Deserialize)]
struct MemberXml {
    #[serde(rename = "@name")]
    name: String,
}

#[derive(Deserialize)]
struct ErrorsXml {
    #[serde(rename = "error", default)]
    errors: Vec<ErrorXml>,
}

#[derive(Deserialize)]
struct ErrorXml {
    message: Option<Text>,
}

/// Decodes a user's rated collection, in document order.
///
/// Items whose rating is not a number (the API writes `N/A` for unrated
/// entries) are skipped.
///
/// # Errors
///
/// Fails on malformed XML or an item missing its name, rating, or numeric
/// object id. An API error document is a [`Payload::Rejected`].
pub fn parse_collection(xml: &str) -> Result<Payload<Vec<RatingEntry>>> {
    let root = root_element(xml)?;
    if root != "items" {
        return non_data_payload(xml, &root);
    }

    let doc: ItemsXml = quick_xml::de::from_str(xml).context("malformed collection")?;
    let mut entries = Vec::with_capacity(doc.items.len());
    for item in doc.items {
        if let Some(entry) = rating_entry(item)? {
            entries.push(entry);
        }
    }
    Ok(Payload::Ready(entries))
}

fn rating_entry(item: ItemXml) -> Result<Option<RatingEntry>> {
    let item_id = item
        .object_id
        .trim()
        .parse::<u64>()
        .with_context(|| format!("invalid objectid {:?}", item.object_id))?;
    let name = item
        .name
        .with_context(|| format!("item {item_id} has no name"))?
        .text;
    let value = item
        .stats
        .and_then(|s| s.rating)
        .with_context(|| format!("item {item_id} has no rating"))?
        .value;

    Ok(value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .map(|rating| RatingEntry::new(item_id, name, rating)))
}

/// Decodes one page of a guild's member list.
///
/// A guild document without a `<members>` element is an empty page; one
/// carrying an `<error>` is a [`Payload::Rejected`].
pub fn parse_guild_page(xml: &str) -> Result<Payload<Vec<Member>>> {
    let root = root_element(xml)?;
    if root != "guild" {
        return non_data_payload(xml, &root);
    }

    let doc: GuildXml = quick_xml::de::from_str(xml).context("malformed guild page")?;
    if let Some(error) = doc.error {
        return Ok(Payload::Rejected(format!("guild error: {}", error.text.trim())));
    }

    let members = doc
        .members
        .map(|m| m.members)
        .unwrap_or_default()
        .into_iter()
        .map(|m| Member::new(m.name))
        .collect();
    Ok(Payload::Ready(members))
}

/// Handles documents that are not the expected data root.
fn non_data_payload<T>(xml: &str, root: &str) -> Result<Payload<T>> {
    match root {
        "message" => {
            let message: Text = quick_xml::de::from_str(xml).context("malformed message")?;
            if message.text.contains(PROCESSING_MARKER) {
                Ok(Payload::Processing)
            } else {
                bail!("API message: {}", message.text.trim())
            }
        }
        "errors" => {
            let doc: ErrorsXml = quick_xml::de::from_str(xml).context("malformed errors")?;
            let messages: Vec<_> = doc
                .errors
                .iter()
                .filter_map(|e| e.message.as_ref())
                .map(|m| m.text.trim())
                .collect();
            Ok(Payload::Rejected(format!("API error: {}", messages.join("; "))))
        }
        "error" => {
            let doc: ErrorXml = quick_xml::de::from_str(xml).context("malformed error")?;
            let message = doc.message.map(|m| m.text).unwrap_or_default();
            Ok(Payload::Rejected(format!("API error: {}", message.trim())))
        }
        other => bail!("unexpected root element <{other}>"),
    }
}

fn root_element(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event().context("invalid XML")? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Event::Eof => bail!("document has no root element"),
            _ => {}
        }
    }
}

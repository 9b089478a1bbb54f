//! `<aid-group>` XML 片段的讀寫。
//!
//! ```xml
//! <aid-group category="payment" description="Transit">
//!   <aid value="A0000000031010"/>
//! </aid-group>
//! ```

use std::io::{BufRead, Write};

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::config::{EmptyGroupPolicy, ParserConfig};
use crate::domain::model::AidGroup;
use crate::utils::error::{AidError, Result};

const TAG_GROUP: &[u8] = b"aid-group";
const TAG_AID: &[u8] = b"aid";

enum Scan {
    Group(AidGroup),
    Skipped,
    Exhausted,
}

#[derive(Default)]
struct PendingGroup {
    category: Option<String>,
    description: Option<String>,
    aids: Vec<String>,
}

impl PendingGroup {
    fn is_open(&self) -> bool {
        self.category.is_some()
    }

    fn open(&mut self, element: &BytesStart<'_>) -> Result<bool> {
        let category = attribute(element, "category")?;
        self.description = attribute(element, "description")?;
        match category {
            Some(category) => {
                self.category = Some(category);
                Ok(true)
            }
            None => {
                tracing::error!("<aid-group> tag without valid category");
                Ok(false)
            }
        }
    }

    fn push_aid(&mut self, element: &BytesStart<'_>) -> Result<()> {
        if !self.is_open() {
            tracing::debug!("Ignoring <aid> tag while not in group");
            return Ok(());
        }
        if let Some(aid) = attribute(element, "value")? {
            self.aids.push(aid.to_uppercase());
        }
        Ok(())
    }

    fn close(&mut self, policy: EmptyGroupPolicy) -> Result<Scan> {
        let pending = std::mem::take(self);
        let category = pending.category.unwrap_or_default();
        if !pending.aids.is_empty() {
            return Ok(Scan::Group(AidGroup::new(pending.aids, category, pending.description)));
        }

        match policy {
            EmptyGroupPolicy::Skip => {
                tracing::warn!("Skipping <aid-group category=\"{}\"> without AIDs", category);
                Ok(Scan::Skipped)
            }
            EmptyGroupPolicy::Reject => Err(AidError::EmptyGroup { category }),
        }
    }
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    match element.try_get_attribute(name)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

/// 掃描到下一個群組結束為止；`depth` 為相對於起始位置的巢狀深度，
/// 跨呼叫保留，深度歸零後再遇到結束標籤即代表外層元素已關閉。
fn scan_group<R: BufRead>(
    reader: &mut Reader<R>,
    config: &ParserConfig,
    depth: &mut usize,
) -> Result<Scan> {
    let mut buf = Vec::new();
    let mut skip_buf = Vec::new();
    let mut pending = PendingGroup::default();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(element) => {
                *depth += 1;
                match element.name().as_ref() {
                    TAG_GROUP => {
                        if !pending.open(&element)? {
                            let end = element.to_end().into_owned();
                            skip_buf.clear();
                            reader.read_to_end_into(end.name(), &mut skip_buf)?;
                            *depth -= 1;
                            return Ok(Scan::Skipped);
                        }
                    }
                    TAG_AID => pending.push_aid(&element)?,
                    other => {
                        tracing::debug!("Ignoring unexpected tag: {}", String::from_utf8_lossy(other))
                    }
                }
            }
            Event::Empty(element) => match element.name().as_ref() {
                TAG_GROUP => {
                    if !pending.open(&element)? {
                        return Ok(Scan::Skipped);
                    }
                    return pending.close(config.empty_group);
                }
                TAG_AID => pending.push_aid(&element)?,
                other => {
                    tracing::debug!("Ignoring unexpected tag: {}", String::from_utf8_lossy(other))
                }
            },
            Event::End(element) => {
                if *depth == 0 {
                    return Ok(Scan::Exhausted);
                }
                *depth -= 1;
                if element.name().as_ref() == TAG_GROUP && pending.is_open() {
                    return pending.close(config.empty_group);
                }
            }
            Event::Eof => return Ok(Scan::Exhausted),
            _ => {}
        }
    }
}

impl AidGroup {
    /// 從目前位置解析第一個完整的 `<aid-group>`，外層元素關閉時停止。
    ///
    /// 文件結束、群組缺少 `category`、或在 [`EmptyGroupPolicy::Skip`]
    /// 下群組沒有任何 AID 時回傳 `Ok(None)`。
    pub fn create_from_xml<R: BufRead>(
        reader: &mut Reader<R>,
        config: &ParserConfig,
    ) -> Result<Option<AidGroup>> {
        let mut depth = 0;
        match scan_group(reader, config, &mut depth)? {
            Scan::Group(group) => Ok(Some(group)),
            Scan::Skipped | Scan::Exhausted => Ok(None),
        }
    }

    /// 讀取外層元素內所有可用的群組，依文件順序回傳。
    pub fn read_all_from_xml<R: BufRead>(
        reader: &mut Reader<R>,
        config: &ParserConfig,
    ) -> Result<Vec<AidGroup>> {
        let mut groups = Vec::new();
        let mut depth = 0;
        loop {
            match scan_group(reader, config, &mut depth)? {
                Scan::Group(group) => groups.push(group),
                Scan::Skipped => continue,
                Scan::Exhausted => break,
            }
        }
        tracing::debug!("Read {} AID groups", groups.len());
        Ok(groups)
    }

    pub fn from_xml_str(xml: &str, config: &ParserConfig) -> Result<Option<AidGroup>> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        Self::create_from_xml(&mut reader, config)
    }

    pub fn write_as_xml<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut group = BytesStart::new("aid-group");
        group.push_attribute(("category", self.category()));
        if let Some(description) = self.description() {
            group.push_attribute(("description", description));
        }
        writer.write_event(Event::Start(group))?;

        for aid in self.aids() {
            let mut entry = BytesStart::new("aid");
            entry.push_attribute(("value", aid.as_str()));
            writer.write_event(Event::Empty(entry))?;
        }

        writer.write_event(Event::End(BytesEnd::new("aid-group")))?;
        Ok(())
    }

    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write_as_xml(&mut writer)?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }
}

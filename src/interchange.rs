//! Conversion between the outline [`Document`] and `tdoc` documents, used to
//! load and save files.
//!
//! The outline model only knows paragraphs and nested bullet lists, so
//! richer `tdoc` structure is flattened on the way in: headings and code
//! blocks become paragraphs, quotes are unwrapped, ordered lists and
//! checklists become bullet lists. Inline styling is dropped.

use std::{io::Cursor, path::Path};

use anyhow::{Context, Result, anyhow};
use tdoc::{ChecklistItem, markdown, parse, writer::Writer};

use crate::document::{Block, Document, List, ListItem, Paragraph};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    Ftml,
    Markdown,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("ftml") | Some("html") | Some("htm") => DocumentFormat::Ftml,
            _ => DocumentFormat::Markdown,
        }
    }
}

pub fn parse_document(content: String, format: DocumentFormat) -> Result<Document> {
    let parsed = match format {
        DocumentFormat::Ftml => {
            parse(Cursor::new(content)).map_err(|err| anyhow!("failed to parse FTML: {err}"))?
        }
        DocumentFormat::Markdown => markdown::parse(Cursor::new(content))
            .map_err(|err| anyhow!("failed to parse Markdown: {err}"))?,
    };
    Ok(from_tdoc(&parsed))
}

pub fn write_document(document: &Document, format: DocumentFormat) -> Result<String> {
    let converted = to_tdoc(document);
    match format {
        DocumentFormat::Ftml => Writer::new()
            .write_to_string(&converted)
            .context("failed to render FTML"),
        DocumentFormat::Markdown => {
            let mut contents = Vec::new();
            markdown::write(&mut contents, &converted).context("failed to render Markdown")?;
            String::from_utf8(contents).context("rendered Markdown is not valid UTF-8")
        }
    }
}

pub fn to_tdoc(document: &Document) -> tdoc::Document {
    let paragraphs = document
        .blocks
        .iter()
        .map(|block| match block {
            Block::Paragraph(paragraph) => text_paragraph(&paragraph.text),
            Block::List(list) => list_paragraph(list),
        })
        .collect();
    tdoc::Document::new().with_paragraphs(paragraphs)
}

fn text_paragraph(text: &str) -> tdoc::Paragraph {
    let content = if text.is_empty() {
        Vec::new()
    } else {
        vec![tdoc::Span::new_text(text)]
    };
    tdoc::Paragraph::new_text().with_content(content)
}

fn list_paragraph(list: &List) -> tdoc::Paragraph {
    let entries = list
        .items
        .iter()
        .map(|item| {
            let mut entry = vec![text_paragraph(&item.text)];
            if let Some(sublist) = &item.sublist {
                entry.push(list_paragraph(sublist));
            }
            entry
        })
        .collect();
    tdoc::Paragraph::new_unordered_list().with_entries(entries)
}

pub fn from_tdoc(source: &tdoc::Document) -> Document {
    let mut blocks = Vec::new();
    for paragraph in &source.paragraphs {
        push_blocks(paragraph, &mut blocks);
    }
    let mut document = Document::new().with_blocks(blocks);
    document.ensure_initialized();
    document
}

fn push_blocks(paragraph: &tdoc::Paragraph, blocks: &mut Vec<Block>) {
    match paragraph {
        tdoc::Paragraph::Quote { children } => {
            for child in children {
                push_blocks(child, blocks);
            }
        }
        tdoc::Paragraph::OrderedList { entries } | tdoc::Paragraph::UnorderedList { entries } => {
            let list = list_from_entries(entries);
            if !list.is_empty() {
                blocks.push(Block::List(list));
            }
        }
        tdoc::Paragraph::Checklist { items } => {
            let list = list_from_checklist(items);
            if !list.is_empty() {
                blocks.push(Block::List(list));
            }
        }
        leaf => blocks.push(Block::Paragraph(Paragraph::new(spans_text(leaf.content())))),
    }
}

fn list_from_entries(entries: &[Vec<tdoc::Paragraph>]) -> List {
    List::with_items(entries.iter().map(|entry| item_from_entry(entry)).collect())
}

/// The leaf paragraphs of an entry are joined into the item's text; every
/// nested list contributes its items to the item's sublist.
fn item_from_entry(entry: &[tdoc::Paragraph]) -> ListItem {
    let mut texts = Vec::new();
    let mut sublist = List::new();
    for paragraph in entry {
        match paragraph {
            tdoc::Paragraph::OrderedList { entries } | tdoc::Paragraph::UnorderedList { entries } => {
                sublist.items.extend(list_from_entries(entries).items);
            }
            tdoc::Paragraph::Checklist { items } => {
                sublist.items.extend(list_from_checklist(items).items);
            }
            tdoc::Paragraph::Quote { children } => {
                let nested = item_from_entry(children);
                if !nested.text.is_empty() {
                    texts.push(nested.text);
                }
                if let Some(nested_list) = nested.sublist {
                    sublist.items.extend(nested_list.items);
                }
            }
            leaf => {
                let text = spans_text(leaf.content());
                if !text.is_empty() {
                    texts.push(text);
                }
            }
        }
    }
    let item = ListItem::new(texts.join(" "));
    if sublist.is_empty() {
        item
    } else {
        item.with_sublist(sublist)
    }
}

fn list_from_checklist(items: &[ChecklistItem]) -> List {
    List::with_items(
        items
            .iter()
            .map(|checklist_item| {
                let item = ListItem::new(spans_text(&checklist_item.content));
                let children = list_from_checklist(&checklist_item.children);
                if children.is_empty() {
                    item
                } else {
                    item.with_sublist(children)
                }
            })
            .collect(),
    )
}

fn spans_text(spans: &[tdoc::Span]) -> String {
    let mut text = String::new();
    for span in spans {
        collect_span_text(span, &mut text);
    }
    text
}

fn collect_span_text(span: &tdoc::Span, out: &mut String) {
    out.push_str(&span.text);
    for child in &span.children {
        collect_span_text(child, out);
    }
}

#[cfg(test)]
#[path = "interchange_tests.rs"]
mod interchange_tests;

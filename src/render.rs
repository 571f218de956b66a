use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

use crate::document::{Block, Document, List, NodeId};
use crate::editor::Caret;
use crate::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorVisualPosition {
    pub line: usize,
    pub column: u16,
}

#[derive(Debug)]
pub struct RenderResult {
    pub lines: Vec<Line<'static>>,
    pub cursor: Option<CursorVisualPosition>,
    pub total_lines: usize,
}

/// Layout knobs for nested lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Columns added per nesting level.
    pub indent_width: usize,
    pub bullet: char,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent_width: 2,
            bullet: '•',
        }
    }
}

pub fn render_document(
    document: &Document,
    cursor: Option<&Caret>,
    width: usize,
    options: &RenderOptions,
    theme: &Theme,
) -> RenderResult {
    let mut renderer = Renderer::new(width.max(1), cursor, options, theme);
    renderer.render_document(document);
    renderer.finish()
}

struct Renderer<'a> {
    wrap_width: usize,
    caret: Option<&'a Caret>,
    options: &'a RenderOptions,
    theme: &'a Theme,
    cursor: Option<CursorVisualPosition>,
    lines: Vec<Line<'static>>,
    current_line_index: usize,
}

impl<'a> Renderer<'a> {
    fn new(
        wrap_width: usize,
        caret: Option<&'a Caret>,
        options: &'a RenderOptions,
        theme: &'a Theme,
    ) -> Self {
        Self {
            wrap_width,
            caret,
            options,
            theme,
            cursor: None,
            lines: Vec::new(),
            current_line_index: 0,
        }
    }

    fn render_document(&mut self, document: &Document) {
        for (idx, block) in document.blocks.iter().enumerate() {
            if idx > 0 {
                self.push_blank_line();
            }
            match block {
                Block::Paragraph(paragraph) => {
                    let caret = self.caret_offset(paragraph.id());
                    self.render_text(&paragraph.text, caret, ("", Style::default()), "");
                }
                Block::List(list) => self.render_list(list, 0),
            }
        }
    }

    fn render_list(&mut self, list: &List, depth: usize) {
        let indent = " ".repeat(depth * self.options.indent_width);
        let first_prefix = format!("{indent}{} ", self.options.bullet);
        let continuation_prefix = " ".repeat(visible_width(&first_prefix));
        for item in &list.items {
            let caret = self.caret_offset(item.id());
            self.render_text(
                &item.text,
                caret,
                (&first_prefix, self.theme.bullet_style()),
                &continuation_prefix,
            );
            if let Some(sublist) = &item.sublist {
                self.render_list(sublist, depth + 1);
            }
        }
    }

    fn caret_offset(&self, node: NodeId) -> Option<usize> {
        self.caret
            .filter(|caret| caret.node == node)
            .map(|caret| caret.offset)
    }

    fn render_text(
        &mut self,
        text: &str,
        caret: Option<usize>,
        first_prefix: (&str, Style),
        continuation_prefix: &str,
    ) {
        let mut fragments = Vec::new();
        tokenize_text(text, Style::default(), caret, &mut fragments);
        let lines = wrap_fragments(
            &fragments,
            first_prefix,
            continuation_prefix,
            self.wrap_width,
        );
        self.consume_lines(lines);
    }

    fn push_blank_line(&mut self) {
        self.lines.push(Line::from(""));
        self.current_line_index += 1;
    }

    fn consume_lines(&mut self, outputs: Vec<LineOutput>) {
        for output in outputs {
            let spans: Vec<Span<'static>> = output
                .spans
                .into_iter()
                .map(|segment| Span::styled(segment.text, segment.style))
                .collect();
            if let Some(column) = output.cursor {
                self.cursor = Some(CursorVisualPosition {
                    line: self.current_line_index,
                    column,
                });
            }
            self.lines.push(Line::from(spans));
            self.current_line_index += 1;
        }
    }

    fn finish(mut self) -> RenderResult {
        if self.lines.is_empty() {
            self.lines.push(Line::from(""));
        }
        let total_lines = self.lines.len();
        RenderResult {
            lines: self.lines,
            cursor: self.cursor,
            total_lines,
        }
    }
}

#[derive(Clone)]
struct LineSegment {
    text: String,
    style: Style,
}

#[derive(Clone)]
struct LineOutput {
    spans: Vec<LineSegment>,
    cursor: Option<u16>,
}

#[derive(Clone)]
struct Fragment {
    text: String,
    style: Style,
    kind: FragmentKind,
    width: usize,
    /// Display offset of the caret inside this fragment.
    cursor: Option<usize>,
}

#[derive(Clone, Copy)]
enum FragmentKind {
    Word,
    Whitespace,
}

#[derive(Clone)]
enum FragmentItem {
    Token(Fragment),
    LineBreak,
}

/// Splits `text` into word and whitespace fragments. `caret` is a char
/// offset into `text`; the fragment holding it records its display column.
fn tokenize_text(text: &str, style: Style, caret: Option<usize>, fragments: &mut Vec<FragmentItem>) {
    let mut builder: Option<TokenBuilder> = None;
    let mut pending_cursor = false;

    for (idx, ch) in text.chars().enumerate() {
        if caret == Some(idx) {
            pending_cursor = true;
        }
        if ch == '\r' {
            continue;
        }
        if ch == '\n' {
            if let Some(mut token) = builder.take() {
                token.add_cursor(&mut pending_cursor);
                fragments.push(FragmentItem::Token(token.finish()));
            } else if pending_cursor {
                fragments.push(FragmentItem::Token(Fragment::caret_only(style)));
                pending_cursor = false;
            }
            fragments.push(FragmentItem::LineBreak);
            continue;
        }

        let tab = [' '; 4];
        let single = [ch];
        let expanded: &[char] = if ch == '\t' { &tab } else { &single };
        for actual in expanded {
            let is_whitespace = actual.is_whitespace();
            let continues = builder
                .as_ref()
                .is_some_and(|existing| existing.kind_matches(is_whitespace));
            if continues {
                if let Some(current) = builder.as_mut() {
                    current.add_cursor(&mut pending_cursor);
                    current.push_char(*actual);
                }
            } else {
                if let Some(existing) = builder.take() {
                    fragments.push(FragmentItem::Token(existing.finish()));
                }
                let mut new_builder = TokenBuilder::new(style, is_whitespace);
                new_builder.add_cursor(&mut pending_cursor);
                new_builder.push_char(*actual);
                builder = Some(new_builder);
            }
        }
    }

    if caret.is_some_and(|offset| offset >= text.chars().count()) {
        pending_cursor = true;
    }
    if let Some(mut token) = builder {
        token.add_cursor(&mut pending_cursor);
        fragments.push(FragmentItem::Token(token.finish()));
    } else if pending_cursor {
        fragments.push(FragmentItem::Token(Fragment::caret_only(style)));
    }
}

impl Fragment {
    fn caret_only(style: Style) -> Self {
        Self {
            text: String::new(),
            style,
            kind: FragmentKind::Word,
            width: 0,
            cursor: Some(0),
        }
    }
}

struct TokenBuilder {
    text: String,
    style: Style,
    kind: FragmentKind,
    width: usize,
    cursor: Option<usize>,
}

impl TokenBuilder {
    fn new(style: Style, is_whitespace: bool) -> Self {
        Self {
            text: String::new(),
            style,
            kind: if is_whitespace {
                FragmentKind::Whitespace
            } else {
                FragmentKind::Word
            },
            width: 0,
            cursor: None,
        }
    }

    fn kind_matches(&self, is_whitespace: bool) -> bool {
        matches!(
            (self.kind, is_whitespace),
            (FragmentKind::Whitespace, true) | (FragmentKind::Word, false)
        )
    }

    fn add_cursor(&mut self, pending: &mut bool) {
        if std::mem::take(pending) {
            self.cursor = Some(self.width);
        }
    }

    fn push_char(&mut self, ch: char) {
        self.text.push(ch);
        self.width += UnicodeWidthChar::width(ch).unwrap_or(0);
    }

    fn finish(self) -> Fragment {
        Fragment {
            text: self.text,
            style: self.style,
            kind: self.kind,
            width: self.width,
            cursor: self.cursor,
        }
    }
}

fn wrap_fragments(
    fragments: &[FragmentItem],
    first_prefix: (&str, Style),
    continuation_prefix: &str,
    width: usize,
) -> Vec<LineOutput> {
    let (first_text, prefix_style) = first_prefix;
    let mut outputs = Vec::new();
    let mut builder = LineBuilder::new(first_text, prefix_style);
    let mut pending_whitespace: Vec<Fragment> = Vec::new();

    for fragment in fragments {
        match fragment {
            FragmentItem::LineBreak => {
                builder.consume_pending(&mut pending_whitespace);
                outputs.push(builder.build_line());
                builder = LineBuilder::new(continuation_prefix, Style::default());
            }
            FragmentItem::Token(token) => match token.kind {
                FragmentKind::Whitespace => {
                    pending_whitespace.push(token.clone());
                }
                FragmentKind::Word => {
                    let whitespace_width: usize =
                        pending_whitespace.iter().map(|item| item.width).sum();
                    if builder.current_width() > builder.prefix_width
                        && builder.current_width() + whitespace_width + token.width > width
                    {
                        builder.consume_pending(&mut pending_whitespace);
                        outputs.push(builder.build_line());
                        builder = LineBuilder::new(continuation_prefix, Style::default());
                    }

                    builder.append_with_pending(token.clone(), &mut pending_whitespace);
                }
            },
        }
    }

    builder.consume_pending(&mut pending_whitespace);
    outputs.push(builder.build_line());
    outputs
}

struct LineBuilder {
    segments: Vec<LineSegment>,
    cursor: Option<u16>,
    width: usize,
    prefix_width: usize,
}

impl LineBuilder {
    fn new(prefix: &str, prefix_style: Style) -> Self {
        let prefix_width = visible_width(prefix);
        let mut segments = Vec::new();
        if !prefix.is_empty() {
            segments.push(LineSegment {
                text: prefix.to_string(),
                style: prefix_style,
            });
        }
        Self {
            segments,
            cursor: None,
            width: prefix_width,
            prefix_width,
        }
    }

    fn current_width(&self) -> usize {
        self.width
    }

    fn append_with_pending(&mut self, token: Fragment, pending_whitespace: &mut Vec<Fragment>) {
        self.consume_pending(pending_whitespace);
        self.append_token(token);
    }

    fn consume_pending(&mut self, pending_whitespace: &mut Vec<Fragment>) {
        for fragment in pending_whitespace.drain(..) {
            self.append_token(fragment);
        }
    }

    fn append_token(&mut self, fragment: Fragment) {
        if let Some(offset) = fragment.cursor {
            self.cursor = Some(u16::try_from(self.width + offset).unwrap_or(u16::MAX));
        }
        if !fragment.text.is_empty() {
            self.width += fragment.width;
            self.segments.push(LineSegment {
                text: fragment.text,
                style: fragment.style,
            });
        }
    }

    fn build_line(mut self) -> LineOutput {
        if self.segments.is_empty() {
            self.segments.push(LineSegment {
                text: String::new(),
                style: Style::default(),
            });
        }
        LineOutput {
            spans: self.segments,
            cursor: self.cursor,
        }
    }
}

fn visible_width(text: &str) -> usize {
    text.chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

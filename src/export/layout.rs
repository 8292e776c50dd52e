//! Page layout for exported transcripts.
//!
//! Layout is a pure step: it turns a [`ChatHistory`] into a sequence of
//! [`Page`]s with every coordinate resolved, in millimetres measured from
//! the top-left corner. The PDF renderer only paints what it is given.

use super::metrics::Helvetica;
use crate::session::{ChatHistory, ChatMessage, Sender};

/// Title printed at the top of every page.
pub const PAGE_TITLE: &str = "Chat History";

/// RGB colour.
pub type Rgb = (u8, u8, u8);

/// Page dimensions and spacing, in millimetres unless noted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub line_height: f32,
    /// Extra height added to every shaded content box.
    pub box_padding: f32,
    /// Gap after each message.
    pub message_spacing: f32,
    /// Cursor position where content starts on the first page.
    pub first_page_top: f32,
    /// Cursor position where content starts on following pages.
    pub next_page_top: f32,
    pub title_size_pt: f32,
    pub body_size_pt: f32,
    pub footer_size_pt: f32,
}

impl PageGeometry {
    /// A4 portrait.
    #[must_use]
    pub fn a4() -> Self {
        let margin = 10.0;
        Self {
            width: 210.0,
            height: 297.0,
            margin,
            line_height: 8.0,
            box_padding: 4.0,
            message_spacing: 4.0,
            first_page_top: margin + 18.0,
            next_page_top: margin + 12.0,
            title_size_pt: 14.0,
            body_size_pt: 12.0,
            footer_size_pt: 10.0,
        }
    }

    /// Width available to message text.
    #[must_use]
    pub fn text_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Lowest cursor position content may reach.
    #[must_use]
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// A run of text at a baseline position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

/// A filled rectangle; `y` is the top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadedBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: Rgb,
}

/// One message placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMessage {
    /// Position of the message in the history.
    pub index: usize,
    /// `You [HH:MM]` / `Bot [HH:MM]` line.
    pub heading: TextRun,
    pub background: ShadedBox,
    pub lines: Vec<TextRun>,
}

/// One laid-out page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    pub title: TextRun,
    pub footer: TextRun,
    pub messages: Vec<PlacedMessage>,
}

/// Background shade of a sender's content box.
#[must_use]
pub fn shade(sender: Sender) -> Rgb {
    match sender {
        Sender::User => (255, 230, 230),
        Sender::Bot => (230, 240, 255),
    }
}

/// Lays out transcripts onto fixed-size pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct Paginator {
    geometry: PageGeometry,
}

impl Paginator {
    #[must_use]
    pub fn new(geometry: PageGeometry) -> Self {
        Self { geometry }
    }

    #[must_use]
    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Lay out `history` in order.
    ///
    /// A message moves to a new page when its heading and box would pass
    /// the bottom limit, so any message that fits on an empty page is kept
    /// whole. Only a message taller than an empty page is continued on the
    /// following pages. An empty history still yields one page.
    #[must_use]
    pub fn layout(&self, history: &ChatHistory) -> Vec<Page> {
        let g = &self.geometry;
        let font = Helvetica::new(g.body_size_pt);

        let mut pages = vec![self.blank_page(1)];
        let mut cursor = g.first_page_top;

        for (index, message) in history.iter().enumerate() {
            let lines = font.wrap(&message.content, g.text_width());
            let box_height = lines.len() as f32 * g.line_height + g.box_padding;
            let needed = g.line_height * 2.0 + box_height;

            let page_is_empty = pages.last().is_none_or(|p| p.messages.is_empty());
            if cursor + needed > g.bottom_limit() && !page_is_empty {
                cursor = self.push_page(&mut pages);
            }

            cursor = self.place(&mut pages, index, message, &lines, cursor);
        }

        pages
    }

    /// Place one message starting at `cursor`; returns the cursor after it.
    fn place(
        &self,
        pages: &mut Vec<Page>,
        index: usize,
        message: &ChatMessage,
        lines: &[String],
        mut cursor: f32,
    ) -> f32 {
        let g = &self.geometry;

        let heading = TextRun {
            x: g.margin,
            y: cursor,
            text: format!("{} [{}]", message.sender.label(), message.timestamp),
        };
        cursor += g.line_height;

        let mut placed = self.open_block(index, message.sender, heading, cursor, lines.len());
        for (row, line) in lines.iter().enumerate() {
            // Oversized messages continue on a fresh page.
            if cursor + g.line_height > g.bottom_limit() && !placed.lines.is_empty() {
                self.close_block(pages, placed);
                cursor = self.push_page(pages);
                let heading = TextRun {
                    x: g.margin,
                    y: cursor,
                    text: format!("{} (continued)", message.sender.label()),
                };
                cursor += g.line_height;
                placed =
                    self.open_block(index, message.sender, heading, cursor, lines.len() - row);
            }
            placed.lines.push(TextRun {
                x: g.margin,
                y: cursor,
                text: line.clone(),
            });
            cursor += g.line_height;
        }
        self.close_block(pages, placed);

        cursor + g.message_spacing
    }

    fn open_block(
        &self,
        index: usize,
        sender: Sender,
        heading: TextRun,
        cursor: f32,
        line_count: usize,
    ) -> PlacedMessage {
        let g = &self.geometry;
        PlacedMessage {
            index,
            heading,
            background: ShadedBox {
                x: g.margin - 1.0,
                y: cursor - 3.0,
                width: g.text_width() + 2.0,
                height: line_count as f32 * g.line_height + g.box_padding,
                fill: shade(sender),
            },
            lines: Vec::with_capacity(line_count),
        }
    }

    /// Fix the box height to the lines actually placed and attach the block
    /// to the current page.
    fn close_block(&self, pages: &mut [Page], mut placed: PlacedMessage) {
        let g = &self.geometry;
        placed.background.height = placed.lines.len() as f32 * g.line_height + g.box_padding;
        if let Some(page) = pages.last_mut() {
            page.messages.push(placed);
        }
    }

    /// Start a new page and return the cursor for its first content.
    fn push_page(&self, pages: &mut Vec<Page>) -> f32 {
        let number = pages.len() + 1;
        pages.push(self.blank_page(number));
        self.geometry.next_page_top
    }

    fn blank_page(&self, number: usize) -> Page {
        let g = &self.geometry;
        Page {
            number,
            title: TextRun {
                x: g.margin,
                y: g.margin + g.line_height,
                text: PAGE_TITLE.to_string(),
            },
            footer: TextRun {
                x: g.width - g.margin - 20.0,
                y: g.height - 10.0,
                text: format!("Page {number}"),
            },
            messages: Vec::new(),
        }
    }
}

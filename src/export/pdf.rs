//! PDF rendering of laid-out pages.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};

use super::layout::{Page, PageGeometry, Rgb, ShadedBox, TextRun};
use super::metrics::PT_PER_MM;
use crate::error::ExportError;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

const TITLE_COLOR: Rgb = (0, 0, 0);
const HEADING_COLOR: Rgb = (33, 33, 33);
const BODY_COLOR: Rgb = (60, 60, 60);

/// Paint `pages` into a PDF file and return its bytes.
pub fn render(pages: &[Page], geometry: &PageGeometry) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font("Helvetica"));
    let bold_id = doc.add_object(font("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR => regular_id,
            BOLD => bold_id,
        },
    });

    let painter = Painter { geometry };
    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let page_id = add_page(&mut doc, pages_id, &painter.paint(page))?;
        kids.push(page_id.into());
    }

    let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);
    let media_box: Vec<Object> = vec![
        0.into(),
        0.into(),
        (geometry.width * PT_PER_MM).into(),
        (geometry.height * PT_PER_MM).into(),
    ];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn font(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn add_page(doc: &mut Document, parent: ObjectId, content: &Content) -> Result<ObjectId, ExportError> {
    let stream = Stream::new(dictionary! {}, content.encode()?);
    let content_id = doc.add_object(stream);
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => parent,
        "Contents" => content_id,
    }))
}

/// Converts top-left millimetre coordinates into PDF drawing operations.
struct Painter<'a> {
    geometry: &'a PageGeometry,
}

impl Painter<'_> {
    fn paint(&self, page: &Page) -> Content {
        let g = self.geometry;
        let mut ops = Vec::new();

        self.text(&mut ops, &page.title, BOLD, g.title_size_pt, TITLE_COLOR);
        self.text(&mut ops, &page.footer, REGULAR, g.footer_size_pt, TITLE_COLOR);

        for placed in &page.messages {
            self.text(&mut ops, &placed.heading, BOLD, g.body_size_pt, HEADING_COLOR);
            self.fill(&mut ops, &placed.background);
            for line in &placed.lines {
                self.text(&mut ops, line, REGULAR, g.body_size_pt, BODY_COLOR);
            }
        }

        Content { operations: ops }
    }

    fn text(&self, ops: &mut Vec<Operation>, run: &TextRun, font: &str, size: f32, color: Rgb) {
        let (x, y) = self.point(run.x, run.y);
        ops.push(fill_color(color));
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
        ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(win_ansi(&run.text), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    fn fill(&self, ops: &mut Vec<Operation>, rect: &ShadedBox) {
        // PDF rectangles are anchored at their lower-left corner.
        let (x, y) = self.point(rect.x, rect.y + rect.height);
        ops.push(fill_color(rect.fill));
        ops.push(Operation::new(
            "re",
            vec![
                x.into(),
                y.into(),
                (rect.width * PT_PER_MM).into(),
                (rect.height * PT_PER_MM).into(),
            ],
        ));
        ops.push(Operation::new("f", vec![]));
    }

    fn point(&self, x_mm: f32, y_mm: f32) -> (f32, f32) {
        (x_mm * PT_PER_MM, (self.geometry.height - y_mm) * PT_PER_MM)
    }
}

fn fill_color((r, g, b): Rgb) -> Operation {
    Operation::new(
        "rg",
        vec![
            (f32::from(r) / 255.0).into(),
            (f32::from(g) / 255.0).into(),
            (f32::from(b) / 255.0).into(),
        ],
    )
}

/// Characters WinAnsiEncoding places in 0x80..=0x9F.
const WIN_ANSI_HIGH: [(char, u8); 27] = [
    ('\u{20AC}', 0x80),
    ('\u{201A}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201E}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02C6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8A),
    ('\u{2039}', 0x8B),
    ('\u{0152}', 0x8C),
    ('\u{017D}', 0x8E),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02DC}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9A),
    ('\u{203A}', 0x9B),
    ('\u{0153}', 0x9C),
    ('\u{017E}', 0x9E),
    ('\u{0178}', 0x9F),
];

/// Encode text for the standard fonts; characters WinAnsi lacks become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\t' => b' ',
        ' '..='~' | '\u{A0}'..='\u{FF}' => u8::try_from(u32::from(c)).unwrap_or(b'?'),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(ch, _)| *ch == c)
            .map_or(b'?', |&(_, byte)| byte),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_ansi_replaces_unencodable() {
        assert_eq!(win_ansi("caf\u{e9} \u{1F600}"), b"caf\xe9 ?".to_vec());
        assert_eq!(win_ansi("a\tb"), b"a b".to_vec());
        assert_eq!(win_ansi("\u{7f}\u{1}"), b"??".to_vec());
    }

    #[test]
    fn test_win_ansi_maps_typographic_characters() {
        let text = "\u{201C}Hi\u{201D} \u{2014} it\u{2019}s 5\u{20AC}";
        assert_eq!(
            win_ansi(text),
            vec![147, 72, 105, 148, 32, 151, 32, 105, 116, 146, 115, 32, 53, 128]
        );
        assert_eq!(win_ansi("\u{2026}\u{2122}\u{0178}"), vec![0x85, 0x99, 0x9F]);
    }

    #[test]
    fn test_win_ansi_rejects_c1_controls() {
        assert_eq!(win_ansi("\u{80}\u{85}\u{92}\u{9F}"), b"????".to_vec());
    }

    #[test]
    fn test_point_flips_vertical_axis() {
        let geometry = PageGeometry::a4();
        let painter = Painter {
            geometry: &geometry,
        };
        let (x, y) = painter.point(0.0, 297.0);
        assert!(x.abs() < 1e-4);
        assert!(y.abs() < 1e-3);
    }
}

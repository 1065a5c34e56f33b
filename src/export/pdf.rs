//! PDF export
//!
//! A small PDF 1.4 writer that knows exactly what a statement needs: text in
//! the two standard Helvetica faces, horizontal rules, and right-aligned
//! amounts. Standard fonts are not embedded, so text is limited to the
//! WinAnsi character set; anything else prints as `?`.

use std::io::Write;

use chrono::Utc;

use crate::error::{CashflowError, CashflowResult};
use crate::report::{LineKind, StatementReport};

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const LEFT: f32 = 72.0;
const RIGHT: f32 = 540.0;
const TOP: f32 = 740.0;
const BOTTOM: f32 = 56.0;
const FOOTER_Y: f32 = 40.0;
const ROW_HEIGHT: f32 = 13.0;
const BODY_SIZE: f32 = 10.0;
const INDENT: f32 = 18.0;

/// The two standard fonts used by reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    fn base_font(&self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
        }
    }

    /// Advance width in 1/1000 em (Adobe core font metrics)
    fn advance(&self, c: char) -> u16 {
        let code = c as u32;
        if !(32..=126).contains(&code) {
            return 556;
        }
        let index = (code - 32) as usize;
        match self {
            Font::Regular => HELVETICA_WIDTHS[index],
            Font::Bold => HELVETICA_BOLD_WIDTHS[index],
        }
    }
}

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width of a string in points
pub fn text_width(text: &str, font: Font, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| font.advance(c) as u32).sum();
    units as f32 * size / 1000.0
}

/// Map a character to its WinAnsiEncoding byte
fn win_ansi_byte(c: char) -> Option<u8> {
    match c {
        ' '..='~' => Some(c as u8),
        '\u{a0}'..='\u{ff}' => Some(c as u32 as u8),
        '€' => Some(0x80),
        '‘' => Some(0x91),
        '’' => Some(0x92),
        '“' => Some(0x93),
        '”' => Some(0x94),
        '•' => Some(0x95),
        '–' => Some(0x96),
        '—' => Some(0x97),
        _ => None,
    }
}

/// Encode text as a PDF literal string; the result is pure ASCII
fn literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('(');
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push(' '),
            c => match win_ansi_byte(c) {
                Some(b) if b.is_ascii() => out.push(b as char),
                Some(b) => out.push_str(&format!("\\{:03o}", b)),
                None => out.push('?'),
            },
        }
    }
    out.push(')');
    out
}

/// Drawing operations for one page
#[derive(Debug, Default, Clone)]
pub struct PdfPage {
    content: String,
}

impl PdfPage {
    /// Draw text with its baseline starting at (x, y)
    pub fn text(&mut self, x: f32, y: f32, font: Font, size: f32, text: &str) {
        self.content.push_str(&format!(
            "BT /{} {:.1} Tf {:.2} {:.2} Td {} Tj ET\n",
            font.resource(),
            size,
            x,
            y,
            literal(text)
        ));
    }

    /// Draw text ending at `right`
    pub fn text_right(&mut self, right: f32, y: f32, font: Font, size: f32, text: &str) {
        let x = right - text_width(text, font, size);
        self.text(x, y, font, size, text);
    }

    /// Draw text centered on `center`
    pub fn text_center(&mut self, center: f32, y: f32, font: Font, size: f32, text: &str) {
        let x = center - text_width(text, font, size) / 2.0;
        self.text(x, y, font, size, text);
    }

    /// Stroke a straight line
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32) {
        self.content.push_str(&format!(
            "{:.2} w {:.2} {:.2} m {:.2} {:.2} l S\n",
            width, x1, y1, x2, y2
        ));
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// An in-memory PDF document
#[derive(Debug, Default, Clone)]
pub struct PdfDocument {
    title: String,
    pages: Vec<PdfPage>,
}

impl PdfDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pages: Vec::new(),
        }
    }

    /// Start a new page and return it
    pub fn add_page(&mut self) -> &mut PdfPage {
        self.pages.push(PdfPage::default());
        self.current_page()
    }

    /// The last page, created if the document is empty
    pub fn current_page(&mut self) -> &mut PdfPage {
        if self.pages.is_empty() {
            self.pages.push(PdfPage::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages_mut(&mut self) -> impl Iterator<Item = &mut PdfPage> {
        self.pages.iter_mut()
    }

    /// Serialize the document
    ///
    /// Object layout: 1 catalog, 2 page tree, 3-4 fonts, 5 info, then a
    /// page object and a content stream per page.
    pub fn to_bytes(&self) -> Vec<u8> {
        let pages: Vec<PdfPage> = if self.pages.is_empty() {
            vec![PdfPage::default()]
        } else {
            self.pages.clone()
        };

        let first_page_obj = 6;
        let kids: Vec<String> = (0..pages.len())
            .map(|i| format!("{} 0 R", first_page_obj + 2 * i))
            .collect();

        let mut objects: Vec<String> = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                pages.len()
            ),
            font_object(Font::Regular),
            font_object(Font::Bold),
            format!(
                "<< /Title {} /Producer (hoa-cashflow {}) /CreationDate (D:{}Z) >>",
                literal(&self.title),
                env!("CARGO_PKG_VERSION"),
                Utc::now().format("%Y%m%d%H%M%S")
            ),
        ];

        for (i, page) in pages.iter().enumerate() {
            let content_obj = first_page_obj + 2 * i + 1;
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                PAGE_WIDTH, PAGE_HEIGHT, content_obj
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}endstream",
                page.content.len(),
                page.content
            ));
        }

        let mut out: Vec<u8> = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        let xref_offset = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in &offsets {
            xref.push_str(&format!("{:010} 00000 n \n", offset));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R /Info 5 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        ));
        out.extend_from_slice(xref.as_bytes());

        out
    }

    /// Write the serialized document
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.to_bytes())
    }
}

fn font_object(font: Font) -> String {
    format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
        font.base_font()
    )
}

/// Greedy word wrap to a maximum width
fn wrap(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if text_width(&candidate, font, size) > max_width && !current.is_empty() {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        }
        lines.push(current);
    }
    lines
}

/// Lays a report out onto pages, tracking the vertical cursor
struct ReportLayout<'a> {
    report: &'a StatementReport,
    doc: PdfDocument,
    y: f32,
}

impl<'a> ReportLayout<'a> {
    fn new(report: &'a StatementReport) -> Self {
        let title = format!("{} - {}", report.title, report.period.label());
        let mut layout = Self {
            report,
            doc: PdfDocument::new(title),
            y: TOP,
        };
        layout.doc.add_page();
        layout.title_block();
        layout.column_header();
        layout
    }

    fn page(&mut self) -> &mut PdfPage {
        self.doc.current_page()
    }

    /// Start a new page when `height` does not fit; true if one was started
    fn ensure_space(&mut self, height: f32) -> bool {
        if self.y - height < BOTTOM {
            self.doc.add_page();
            self.y = TOP;
            true
        } else {
            false
        }
    }

    fn title_block(&mut self) {
        let center = PAGE_WIDTH / 2.0;
        let report = self.report;

        let mut y = self.y;
        self.page()
            .text_center(center, y, Font::Bold, 14.0, &report.association);
        if !report.address.trim().is_empty() {
            y -= 14.0;
            self.page()
                .text_center(center, y, Font::Regular, 9.0, &report.address);
        }
        y -= 20.0;
        self.page()
            .text_center(center, y, Font::Bold, 13.0, &report.title);
        y -= 15.0;
        self.page()
            .text_center(center, y, Font::Regular, BODY_SIZE, &report.period_label);

        self.y = y - 22.0;
    }

    fn column_header(&mut self) {
        let y = self.y;
        self.page().text(LEFT, y, Font::Bold, BODY_SIZE, "Particulars");
        self.page().text_right(RIGHT, y, Font::Bold, BODY_SIZE, "Amount");
        self.page().line(LEFT, y - 5.0, RIGHT, y - 5.0, 0.8);
        self.y = y - ROW_HEIGHT - 4.0;
    }

    fn rows(&mut self) {
        let report = self.report;
        for line in &report.lines {
            if line.kind == LineKind::Spacer {
                self.y -= ROW_HEIGHT / 2.0;
                continue;
            }
            if self.ensure_space(ROW_HEIGHT) {
                self.column_header();
            }

            let y = self.y;
            let font = if line.is_emphasized() {
                Font::Bold
            } else {
                Font::Regular
            };
            let x = LEFT + INDENT * line.indent as f32;
            self.page().text(x, y, font, BODY_SIZE, &line.label);

            if let Some(amount) = line.amount {
                let text = report.format_amount(amount);
                let width = text_width(&text, font, BODY_SIZE).max(60.0);
                let page = self.page();
                page.text_right(RIGHT, y, font, BODY_SIZE, &text);

                match line.kind {
                    LineKind::Subtotal => {
                        page.line(RIGHT - width, y + 10.0, RIGHT, y + 10.0, 0.5);
                    }
                    LineKind::Total => {
                        page.line(RIGHT - width, y + 10.0, RIGHT, y + 10.0, 0.5);
                        page.line(RIGHT - width, y - 3.0, RIGHT, y - 3.0, 0.5);
                        page.line(RIGHT - width, y - 5.0, RIGHT, y - 5.0, 0.5);
                    }
                    _ => {}
                }
            }

            self.y -= ROW_HEIGHT;
        }
    }

    fn notes(&mut self) {
        let report = self.report;
        if report.notes.trim().is_empty() {
            return;
        }

        let lines = wrap(&report.notes, Font::Regular, 9.0, RIGHT - LEFT);
        self.y -= ROW_HEIGHT;
        self.ensure_space(ROW_HEIGHT * 2.0);
        let y = self.y;
        self.page().text(LEFT, y, Font::Bold, 9.0, "Notes:");
        self.y -= 12.0;

        for line in lines {
            self.ensure_space(12.0);
            let y = self.y;
            self.page().text(LEFT, y, Font::Regular, 9.0, &line);
            self.y -= 12.0;
        }
    }

    fn signatures(&mut self) {
        let report = self.report;
        let block_height = 42.0;
        self.y -= 24.0;
        self.ensure_space(block_height);

        let column_width = (RIGHT - LEFT) / report.signatories.len().max(1) as f32;
        let y = self.y;
        for (i, signatory) in report.signatories.iter().enumerate() {
            let x = LEFT + column_width * i as f32;
            let page = self.page();
            page.text(x, y, Font::Regular, 9.0, &format!("{}:", signatory.role));
            page.line(x, y - 26.0, x + column_width - 20.0, y - 26.0, 0.6);
            if !signatory.name.trim().is_empty() {
                page.text(x, y - 37.0, Font::Bold, 9.0, &signatory.name);
            }
        }
        self.y = y - block_height;
    }

    fn footers(&mut self) {
        let total = self.doc.page_count();
        let prepared = format!("Prepared on {}", self.report.prepared_on);
        for (i, page) in self.doc.pages_mut().enumerate() {
            page.text(LEFT, FOOTER_Y, Font::Regular, 8.0, &prepared);
            page.text_right(
                RIGHT,
                FOOTER_Y,
                Font::Regular,
                8.0,
                &format!("Page {} of {}", i + 1, total),
            );
        }
    }

    fn finish(mut self) -> PdfDocument {
        self.rows();
        self.notes();
        self.signatures();
        self.footers();
        self.doc
    }
}

/// Lay out a report as a PDF document
pub fn render_statement_pdf(report: &StatementReport) -> PdfDocument {
    ReportLayout::new(report).finish()
}

/// Export a statement report to PDF
pub fn export_statement_pdf<W: Write>(
    report: &StatementReport,
    writer: &mut W,
) -> CashflowResult<()> {
    render_statement_pdf(report)
        .write_to(writer)
        .map_err(|e| CashflowError::Export(format!("Failed to write PDF: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::{CashFlowStatement, FieldId, Money, ReportPeriod};

    fn report(notes: &str) -> StatementReport {
        let mut statement = CashFlowStatement::new(ReportPeriod::new(2025, 4).unwrap());
        statement
            .set(FieldId::MonthlyDues, Money::from_cents(1_250_000))
            .unwrap();
        statement
            .set(FieldId::Janitorial, Money::from_cents(300_000))
            .unwrap();
        statement.notes = notes.to_string();

        let mut settings = Settings::default();
        settings.association.name = "Willow (North) HOA".into();
        settings.signatories.prepared_by = "María Santos".into();
        StatementReport::build(&statement, &settings)
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    #[test]
    fn test_literal_escaping() {
        assert_eq!(literal("a(b)c\\"), "(a\\(b\\)c\\\\)");
        assert_eq!(literal("é"), "(\\351)");
        assert_eq!(literal("₱5"), "(?5)");
        assert_eq!(literal("a\tb"), "(a b)");
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("0", Font::Regular, 10.0), 5.56);
        assert!(text_width("WWW", Font::Bold, 10.0) > text_width("iii", Font::Bold, 10.0));
    }

    #[test]
    fn test_wrap() {
        let lines = wrap("one two three four five", Font::Regular, 10.0, 40.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.join(" "), "one two three four five");
    }

    #[test]
    fn test_document_structure() {
        let bytes = render_statement_pdf(&report("")).to_bytes();

        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert!(find(&bytes, b"(Monthly Dues)").is_some());
        assert!(find(&bytes, b"(12,500.00)").is_some());
        assert!(find(&bytes, b"(Willow \\(North\\) HOA)").is_some());
        assert!(find(&bytes, b"(Mar\\355a Santos)").is_some());
        assert!(find(&bytes, b"(Page 1 of 1)").is_some());
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let bytes = render_statement_pdf(&report("")).to_bytes();
        let text = String::from_utf8_lossy(&bytes);

        let startxref = text.rfind("startxref\n").unwrap();
        let offset: usize = text[startxref + 10..]
            .lines()
            .next()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(&bytes[offset..offset + 4], b"xref");

        let xref = std::str::from_utf8(&bytes[offset..]).unwrap();
        let entries: Vec<&str> = xref.lines().skip(3).take_while(|l| l.ends_with(" n ")).collect();
        assert!(!entries.is_empty());
        for (i, entry) in entries.iter().enumerate() {
            let pos: usize = entry[..10].parse().unwrap();
            let expected = format!("{} 0 obj", i + 1);
            assert!(bytes[pos..].starts_with(expected.as_bytes()), "object {}", i + 1);
        }
    }

    #[test]
    fn test_stream_lengths_match() {
        let doc = render_statement_pdf(&report(""));
        let bytes = doc.to_bytes();
        let text = String::from_utf8_lossy(&bytes);

        for chunk in text.split("<< /Length ").skip(1) {
            let (len, rest) = chunk.split_once(" >>\nstream\n").unwrap();
            let len: usize = len.parse().unwrap();
            assert!(rest[len..].starts_with("endstream"));
        }
    }

    #[test]
    fn test_full_statement_fits_one_page() {
        let mut statement = CashFlowStatement::new(ReportPeriod::new(2025, 6).unwrap());
        for (i, field) in FieldId::ALL.iter().enumerate() {
            statement
                .set(*field, Money::from_cents(1_234_567_890 + i as i64))
                .unwrap();
        }
        statement.notes = "Reserve fund transfer approved at the May board meeting.".into();

        let mut settings = Settings::default();
        settings.association.name = "Willow (North) HOA".into();
        settings.association.address = "12 Acacia Lane, Quezon City".into();
        settings.signatories.prepared_by = "María Santos".into();
        settings.signatories.checked_by = "Ben Cruz".into();
        settings.signatories.approved_by = "Ana Reyes".into();
        let report = StatementReport::build(&statement, &settings);

        let doc = render_statement_pdf(&report);
        assert_eq!(doc.page_count(), 1);
        let bytes = doc.to_bytes();
        assert!(find(&bytes, b"(Total Ending Balance)").is_some());
        assert!(find(&bytes, b"(Ana Reyes)").is_some());
        assert!(find(&bytes, b"(Page 1 of 1)").is_some());
    }

    #[test]
    fn test_long_notes_break_pages() {
        let notes = "Collections were lower than expected this month. ".repeat(200);
        let doc = render_statement_pdf(&report(&notes));
        assert!(doc.page_count() > 1);

        let bytes = doc.to_bytes();
        let pages = format!("(Page 2 of {})", doc.page_count());
        assert!(find(&bytes, pages.as_bytes()).is_some());

        // Continuation pages carry notes only, so no second column header
        let headers = bytes
            .windows(b"(Particulars)".len())
            .filter(|w| *w == b"(Particulars)")
            .count();
        assert_eq!(headers, 1);
    }

    #[test]
    fn test_empty_document_is_valid() {
        let bytes = PdfDocument::new("empty").to_bytes();
        assert!(find(&bytes, b"/Count 1").is_some());
    }
}

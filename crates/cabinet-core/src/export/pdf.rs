//! Minimal single-page PDF writer.
//!
//! Emits PDF 1.4 with one US-Letter page, the standard Helvetica-Bold font
//! in WinAnsi encoding, text runs and straight lines. Strings are written
//! as hex so no escaping is needed.

use super::{PlacedLine, ReportLayout};

/// US Letter, in points.
pub const PAGE_WIDTH: i32 = 612;
pub const PAGE_HEIGHT: i32 = 792;

const FONT_SIZE: u32 = 14;

/// A page being drawn.
#[derive(Debug, Default)]
pub struct PdfPage {
    content: String,
}

impl PdfPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a full report layout.
    pub fn from_layout(layout: &ReportLayout) -> Self {
        let mut page = Self::new();
        page.draw_text(&layout.title);
        let (x1, y, x2) = layout.rule;
        page.draw_line(x1, y, x2, y);
        for line in &layout.lines {
            page.draw_text(line);
        }
        page
    }

    /// Draw a string with its baseline at (x, y).
    pub fn draw_text(&mut self, line: &PlacedLine) {
        let encoded: Vec<u8> = line.text.chars().map(win_ansi).collect();
        self.content.push_str(&format!(
            "BT /F1 {} Tf {} {} Td <{}> Tj ET\n",
            FONT_SIZE,
            line.x,
            line.y,
            hex::encode_upper(encoded)
        ));
    }

    /// Stroke a straight line.
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.content
            .push_str(&format!("{} {} m {} {} l S\n", x1, y1, x2, y2));
    }

    /// Serialize the document.
    pub fn finish(self) -> Vec<u8> {
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>",
                PAGE_WIDTH, PAGE_HEIGHT
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold \
             /Encoding /WinAnsiEncoding >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{}endstream",
                self.content.len(),
                self.content
            ),
        ];

        let mut out = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
        }

        let xref_offset = out.len();
        out.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
        out.push_str("0000000000 65535 f \n");
        for offset in offsets {
            out.push_str(&format!("{:010} 00000 n \n", offset));
        }
        out.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        ));

        out.into_bytes()
    }
}

/// Map a char to its WinAnsiEncoding byte, `?` when it has none.
fn win_ansi(c: char) -> u8 {
    match c {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
        _ => b'?',
    }
}

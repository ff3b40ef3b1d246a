//! PDF 1.4 serializer
//!
//! Writes a laid-out [`DocumentCanvas`] as a standalone PDF file using only
//! the standard Type1 fonts, so no font programs are embedded. Images become
//! Flate-compressed RGB XObjects with an optional grey soft mask.
//!
//! Object numbering is fixed so identical input always produces identical
//! bytes:
//!
//! | id | object |
//! |----|--------|
//! | 1 | Catalog |
//! | 2 | Pages |
//! | 3, 4 | Helvetica, Helvetica-Bold |
//! | 5.. | images (each followed by its soft mask, if any) |
//! | .. | page / content stream pairs |
//! | last | Info dictionary |

use chrono::NaiveDate;

use super::layout::{DocumentCanvas, PageContent};
use super::metrics::{Font, escape_pdf_string};
use crate::fetch::Bitmap;

const FONTS: [Font; 2] = [Font::Helvetica, Font::HelveticaBold];

/// Document-level metadata written to the Info dictionary
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub producer: String,
    /// Stored as the creation date. Time of day is always midnight.
    pub created: NaiveDate,
}

/// Assembles PDF bytes and tracks object offsets for the xref table
#[derive(Debug, Default)]
pub struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize a finished canvas
    pub fn write(mut self, canvas: DocumentCanvas, info: &DocumentInfo) -> Vec<u8> {
        let (geometry, pages, images) = canvas.into_parts();

        // Allocate ids up front so forward references are known
        let first_image_id = 3 + FONTS.len();
        let mut image_ids = Vec::with_capacity(images.len());
        let mut next_id = first_image_id;
        for image in &images {
            image_ids.push(next_id);
            next_id += if image.alpha.is_some() { 2 } else { 1 };
        }
        let first_page_id = next_id;
        let page_ids: Vec<usize> = (0..pages.len()).map(|i| first_page_id + i * 2).collect();
        let info_id = first_page_id + pages.len() * 2;

        self.buf.extend_from_slice(b"%PDF-1.4\n");
        self.buf.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        self.object(1, b"<< /Type /Catalog /Pages 2 0 R >>");

        let kids: Vec<String> = page_ids.iter().map(|id| format!("{} 0 R", id)).collect();
        let pages_dict = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        );
        self.object(2, pages_dict.as_bytes());

        for (i, font) in FONTS.iter().enumerate() {
            let font_dict = format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.base_font()
            );
            self.object(3 + i, font_dict.as_bytes());
        }

        for (image, &id) in images.iter().zip(&image_ids) {
            self.image(id, image);
        }

        for (page, &page_id) in pages.iter().zip(&page_ids) {
            let resources = page_resources(page, &image_ids);
            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Contents {} 0 R /Resources {} >>",
                geometry.width_pt(),
                geometry.height_pt(),
                page_id + 1,
                resources
            );
            self.object(page_id, page_dict.as_bytes());
            self.stream(page_id + 1, "", page.stream.as_bytes());
        }

        let info_dict = format!(
            "<< /Title ({}) /Producer ({}) /CreationDate ({}) >>",
            escape_pdf_string(&info.title),
            escape_pdf_string(&info.producer),
            info.created.format("D:%Y%m%d000000Z")
        );
        self.object(info_id, info_dict.as_bytes());

        self.finish(info_id)
    }

    fn image(&mut self, id: usize, image: &Bitmap) {
        let smask = match image.alpha {
            Some(_) => format!(" /SMask {} 0 R", id + 1),
            None => String::new(),
        };
        let dict = format!(
            "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /FlateDecode{}",
            image.width, image.height, smask
        );
        self.stream(id, &dict, &image.rgb);

        if let Some(alpha) = &image.alpha {
            let dict = format!(
                "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceGray /BitsPerComponent 8 /Filter /FlateDecode",
                image.width, image.height
            );
            self.stream(id + 1, &dict, alpha);
        }
    }

    fn begin(&mut self, id: usize) {
        // Ids are written in ascending order, so the offset list stays dense
        debug_assert_eq!(self.offsets.len() + 1, id);
        self.offsets.push(self.buf.len());
        self.buf.extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
    }

    fn object(&mut self, id: usize, body: &[u8]) {
        self.begin(id);
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    /// Stream object; `dict_entries` are extra keys placed before `/Length`
    fn stream(&mut self, id: usize, dict_entries: &str, data: &[u8]) {
        self.begin(id);
        let separator = if dict_entries.is_empty() { "" } else { " " };
        self.buf.extend_from_slice(
            format!("<< {}{}/Length {} >>\nstream\n", dict_entries, separator, data.len()).as_bytes(),
        );
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn finish(mut self, info_id: usize) -> Vec<u8> {
        let xref_start = self.buf.len();
        let size = self.offsets.len() + 1;
        self.buf.extend_from_slice(b"xref\n");
        self.buf.extend_from_slice(format!("0 {}\n", size).as_bytes());
        self.buf.extend_from_slice(b"0000000000 65535 f \n");
        for pos in &self.offsets {
            self.buf.extend_from_slice(format!("{:010} 00000 n \n", pos).as_bytes());
        }

        self.buf.extend_from_slice(b"trailer\n");
        self.buf.extend_from_slice(
            format!("<< /Size {} /Root 1 0 R /Info {} 0 R >>\n", size, info_id).as_bytes(),
        );
        self.buf.extend_from_slice(b"startxref\n");
        self.buf.extend_from_slice(format!("{}\n", xref_start).as_bytes());
        self.buf.extend_from_slice(b"%%EOF\n");
        self.buf
    }
}

fn page_resources(page: &PageContent, image_ids: &[usize]) -> String {
    let fonts: Vec<String> = FONTS
        .iter()
        .enumerate()
        .map(|(i, font)| format!("/{} {} 0 R", font.resource_name(), 3 + i))
        .collect();
    let mut resources = format!("<< /Font << {} >>", fonts.join(" "));

    if !page.images.is_empty() {
        let xobjects: Vec<String> = page
            .images
            .iter()
            .map(|&index| format!("/Im{} {} 0 R", index + 1, image_ids[index]))
            .collect();
        resources.push_str(&format!(" /XObject << {} >>", xobjects.join(" ")));
    }

    resources.push_str(" >>");
    resources
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutSection;
    use crate::export::layout::Cursor;

    fn info() -> DocumentInfo {
        DocumentInfo {
            title: "Admission Application".to_string(),
            producer: "Admission Report SDK".to_string(),
            created: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        }
    }

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    fn find_last(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .rposition(|w| w == needle)
            .unwrap()
    }

    #[test]
    fn test_minimal_document_structure() {
        let canvas = DocumentCanvas::new(&LayoutSection::default());
        let bytes = PdfWriter::new().write(canvas, &info());
        let text = as_text(&bytes);

        assert!(text.starts_with("%PDF-1.4\n"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("/Type /Catalog"));
        assert!(text.contains("/Kids [5 0 R] /Count 1"));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
        assert!(text.contains("/MediaBox [0 0 595.28 841.89]"));
        assert!(text.contains("/CreationDate (D:20240315000000Z)"));
        // catalog, pages, two fonts, page, content, info
        assert!(text.contains("xref\n0 8\n"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let mut canvas = DocumentCanvas::new(&LayoutSection::default());
        let start = canvas.start();
        canvas.section_header(start, "Personal Information");
        let bytes = PdfWriter::new().write(canvas, &info());

        let xref = find_last(&bytes, b"\nxref\n") + 1;
        let table = as_text(&bytes[xref..]);
        let entries: Vec<usize> = table
            .lines()
            .skip(3)
            .take_while(|line| line.ends_with(" n "))
            .map(|line| line[..10].parse().unwrap())
            .collect();
        assert_eq!(entries.len(), 7);
        for (i, offset) in entries.iter().enumerate() {
            let header = format!("{} 0 obj\n", i + 1);
            assert!(bytes[*offset..].starts_with(header.as_bytes()));
        }

        let startxref: usize = table.lines().rev().nth(1).unwrap().parse().unwrap();
        assert_eq!(startxref, xref);
    }

    #[test]
    fn test_image_objects_and_soft_mask() {
        let mut canvas = DocumentCanvas::new(&LayoutSection::default());
        let start = canvas.start();
        let bitmap = Bitmap {
            width: 2,
            height: 2,
            rgb: vec![1, 2, 3],
            alpha: Some(vec![4, 5]),
        };
        let cursor = canvas.image_block(start, "Profile Photo", bitmap);
        canvas.new_page();
        let opaque = Bitmap {
            width: 1,
            height: 1,
            rgb: vec![9],
            alpha: None,
        };
        canvas.image_block(Cursor { page: 1, ..cursor }, "Signature", opaque);

        let text = as_text(&PdfWriter::new().write(canvas, &info()));
        assert!(text.contains("5 0 obj\n<< /Type /XObject /Subtype /Image /Width 2 /Height 2 /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /FlateDecode /SMask 6 0 R /Length 3 >>"));
        assert!(text.contains("6 0 obj\n<< /Type /XObject /Subtype /Image /Width 2 /Height 2 /ColorSpace /DeviceGray"));
        assert!(text.contains("/XObject << /Im1 5 0 R >>"));
        assert!(text.contains("/XObject << /Im2 7 0 R >>"));
        assert!(text.contains("/Kids [8 0 R 10 0 R] /Count 2"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let render = || {
            let mut canvas = DocumentCanvas::new(&LayoutSection::default());
            let start = canvas.start();
            canvas.field(start, "Email", Some("asha@example.com"));
            PdfWriter::new().write(canvas, &info())
        };
        assert_eq!(render(), render());
    }
}

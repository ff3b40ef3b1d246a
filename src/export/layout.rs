//! Page layout for generated reports
//!
//! A [`DocumentCanvas`] accumulates one content stream per page. Drawing
//! primitives take the current [`Cursor`] and return the advanced one; the
//! canvas never tracks a position of its own. All positions are millimetres
//! measured from the top-left corner and converted to PDF user space
//! (points, bottom-left origin) only when a content stream operator is
//! emitted.

use super::metrics::{Font, PT_PER_MM, escape_pdf_string, wrap_text};
use crate::config::LayoutSection;
use crate::fetch::Bitmap;

/// Grey level used for field values
const VALUE_GREY: f64 = 0.31;

/// Narrowest column a value is wrapped into beside its label. A label that
/// leaves less than this goes on its own lines above the value.
const MIN_VALUE_WIDTH_MM: f64 = 40.0;

/// Page size and margins, in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_mm: f64,
}

impl PageGeometry {
    pub fn from_settings(settings: &LayoutSection) -> Self {
        let (width_mm, height_mm) = settings.page_size.dimensions_mm();
        Self {
            width_mm,
            height_mm,
            margin_mm: settings.margin_mm,
        }
    }

    pub fn content_width(&self) -> f64 {
        self.width_mm - 2.0 * self.margin_mm
    }

    /// Lowest y a line or image may reach
    pub fn bottom(&self) -> f64 {
        self.height_mm - self.margin_mm
    }

    pub fn width_pt(&self) -> f64 {
        self.width_mm * PT_PER_MM
    }

    pub fn height_pt(&self) -> f64 {
        self.height_mm * PT_PER_MM
    }
}

/// Vertical write position: zero-based page index and distance from the top
/// edge in millimetres. Text is drawn with its baseline at `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub page: usize,
    pub y: f64,
}

/// Content stream of a single page plus the images it references
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub stream: String,
    /// Indices into the canvas image list
    pub images: Vec<usize>,
}

/// In-progress document
#[derive(Debug)]
pub struct DocumentCanvas {
    settings: LayoutSection,
    geometry: PageGeometry,
    pages: Vec<PageContent>,
    images: Vec<Bitmap>,
}

impl DocumentCanvas {
    /// Create a canvas holding a single empty page
    pub fn new(settings: &LayoutSection) -> Self {
        Self {
            settings: settings.clone(),
            geometry: PageGeometry::from_settings(settings),
            pages: vec![PageContent::default()],
            images: Vec::new(),
        }
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    pub fn settings(&self) -> &LayoutSection {
        &self.settings
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Cursor at the top margin of the first page
    pub fn start(&self) -> Cursor {
        Cursor {
            page: 0,
            y: self.geometry.margin_mm,
        }
    }

    /// Append a page and return a cursor at its top margin
    pub fn new_page(&mut self) -> Cursor {
        self.pages.push(PageContent::default());
        Cursor {
            page: self.pages.len() - 1,
            y: self.geometry.margin_mm,
        }
    }

    /// Start a new page when `height` millimetres below the cursor would
    /// cross the bottom margin
    pub fn ensure_space(&mut self, cursor: Cursor, height: f64) -> Cursor {
        if cursor.y + height > self.geometry.bottom() {
            self.new_page()
        } else {
            cursor
        }
    }

    /// Draw `text` centred between the margins, wrapping if needed
    pub fn centered_text(&mut self, cursor: Cursor, text: &str, font: Font, size_pt: f64) -> Cursor {
        let line_height = self.settings.line_height_mm;
        let width = self.geometry.content_width();
        let mut cursor = cursor;

        for line in wrap_text(text, font, size_pt, width) {
            cursor = self.ensure_space(cursor, 0.0);
            let x = self.geometry.margin_mm + (width - font.text_width_mm(&line, size_pt)) / 2.0;
            self.draw_text(cursor, x, &line, font, size_pt, 0.0);
            cursor.y += line_height;
        }

        cursor
    }

    /// Bold, flush-left section heading. Moves to a new page unless the
    /// first line below the heading fits as well.
    pub fn section_header(&mut self, cursor: Cursor, title: &str) -> Cursor {
        let size = self.settings.section_font_size;
        let line_height = self.settings.line_height_mm;
        let advance = line_height + self.settings.section_gap_mm;
        let mut cursor = self.ensure_space(cursor, advance + line_height);
        let x = self.geometry.margin_mm;
        self.draw_text(cursor, x, title, Font::HelveticaBold, size, 0.0);
        cursor.y += advance;
        cursor
    }

    /// `label: value` line. Absent values draw nothing and leave the cursor
    /// where it was.
    ///
    /// A value that fits beside the label is drawn exactly as given.
    /// Otherwise it wraps; continuation lines are aligned with the first
    /// value line and may spill onto a new page.
    pub fn field(&mut self, cursor: Cursor, label: &str, value: Option<&str>) -> Cursor {
        let Some(value) = value else {
            return cursor;
        };

        let size = self.settings.body_font_size;
        let line_height = self.settings.line_height_mm;
        let margin = self.geometry.margin_mm;
        let content_width = self.geometry.content_width();

        let label_text = format!("{}: ", label);
        let label_width = Font::HelveticaBold.text_width_mm(&label_text, size);

        let mut cursor = self.ensure_space(cursor, 0.0);
        let value_x = if content_width - label_width >= MIN_VALUE_WIDTH_MM {
            self.draw_text(cursor, margin, &label_text, Font::HelveticaBold, size, 0.0);
            margin + label_width
        } else {
            for line in wrap_text(&label_text, Font::HelveticaBold, size, content_width) {
                cursor = self.ensure_space(cursor, 0.0);
                self.draw_text(cursor, margin, &line, Font::HelveticaBold, size, 0.0);
                cursor.y += line_height;
            }
            margin
        };

        let value_width = margin + content_width - value_x;
        let lines = if !value.contains('\n')
            && Font::Helvetica.text_width_mm(value, size) <= value_width
        {
            vec![value.to_string()]
        } else {
            wrap_text(value, Font::Helvetica, size, value_width)
        };

        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                cursor.y += line_height;
            }
            cursor = self.ensure_space(cursor, 0.0);
            self.draw_text(cursor, value_x, line, Font::Helvetica, size, VALUE_GREY);
        }

        cursor.y += line_height + self.settings.field_gap_mm;
        cursor
    }

    /// Captioned image scaled to fit the content width and the configured
    /// maximum height
    pub fn image_block(&mut self, cursor: Cursor, label: &str, bitmap: Bitmap) -> Cursor {
        let (w, h) = fit_image(
            bitmap.width,
            bitmap.height,
            self.geometry.content_width(),
            self.settings.image_max_height_mm,
        );

        let mut cursor = self.ensure_space(cursor, h + self.settings.image_label_allowance_mm);
        let margin = self.geometry.margin_mm;
        let size = self.settings.body_font_size;
        self.draw_text(cursor, margin, label, Font::HelveticaBold, size, 0.0);
        cursor.y += self.settings.line_height_mm;

        let index = self.images.len();
        self.images.push(bitmap);
        let page_height = self.geometry.height_mm;
        let page = &mut self.pages[cursor.page];
        page.images.push(index);
        page.stream.push_str(&format!(
            "q\n{:.2} 0 0 {:.2} {:.2} {:.2} cm\n/Im{} Do\nQ\n",
            w * PT_PER_MM,
            h * PT_PER_MM,
            margin * PT_PER_MM,
            (page_height - (cursor.y + h)) * PT_PER_MM,
            index + 1
        ));

        cursor.y += h + self.settings.image_gap_mm;
        cursor
    }

    /// Hand the finished pages and images to the writer
    pub fn into_parts(self) -> (PageGeometry, Vec<PageContent>, Vec<Bitmap>) {
        (self.geometry, self.pages, self.images)
    }

    fn draw_text(&mut self, cursor: Cursor, x_mm: f64, text: &str, font: Font, size_pt: f64, grey: f64) {
        let y_pt = (self.geometry.height_mm - cursor.y) * PT_PER_MM;
        let stream = &mut self.pages[cursor.page].stream;
        stream.push_str("BT\n");
        stream.push_str(&format!("/{} {:.1} Tf\n", font.resource_name(), size_pt));
        stream.push_str(&format!("{:.2} {:.2} {:.2} rg\n", grey, grey, grey));
        stream.push_str(&format!("1 0 0 1 {:.2} {:.2} Tm\n", x_mm * PT_PER_MM, y_pt));
        stream.push_str(&format!("({}) Tj\n", escape_pdf_string(text)));
        stream.push_str("ET\n");
    }
}

/// Scale a `px_w` x `px_h` image to the largest size that fits in
/// `max_w` x `max_h`, keeping its aspect ratio
pub fn fit_image(px_w: u32, px_h: u32, max_w: f64, max_h: f64) -> (f64, f64) {
    let (w, h) = (px_w.max(1) as f64, px_h.max(1) as f64);
    let scale = (max_w / w).min(max_h / h);
    (w * scale, h * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> DocumentCanvas {
        DocumentCanvas::new(&LayoutSection::default())
    }

    fn bitmap(width: u32, height: u32) -> Bitmap {
        Bitmap {
            width,
            height,
            rgb: vec![0; 4],
            alpha: None,
        }
    }

    #[test]
    fn test_fit_image_landscape_is_width_bound() {
        let (w, h) = fit_image(1700, 850, 170.0, 80.0);
        assert!((w - 160.0).abs() < 1e-9);
        assert!((h - 80.0).abs() < 1e-9);

        let (w, h) = fit_image(3400, 850, 170.0, 80.0);
        assert!((w - 170.0).abs() < 1e-9);
        assert!((h - 42.5).abs() < 1e-9);
    }

    #[test]
    fn test_fit_image_portrait_is_height_bound() {
        let (w, h) = fit_image(600, 1200, 170.0, 80.0);
        assert!((h - 80.0).abs() < 1e-9);
        assert!((w - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_geometry_a4() {
        let geometry = canvas().geometry();
        assert_eq!(geometry.content_width(), 170.0);
        assert_eq!(geometry.bottom(), 277.0);
    }

    #[test]
    fn test_section_header_advances() {
        let mut canvas = canvas();
        let start = canvas.start();
        let next = canvas.section_header(start, "Personal Information");
        assert_eq!(next.page, 0);
        assert!((next.y - (start.y + 10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_absent_field_is_noop() {
        let mut canvas = canvas();
        let start = canvas.start();
        assert_eq!(canvas.field(start, "Email", None), start);
        let (_, pages, _) = canvas.into_parts();
        assert!(pages[0].stream.is_empty());
    }

    #[test]
    fn test_field_label_and_grey_value() {
        let mut canvas = canvas();
        let start = canvas.start();
        let next = canvas.field(start, "Email", Some("asha@example.com"));
        assert!((next.y - (start.y + 8.0)).abs() < 1e-9);

        let (_, pages, _) = canvas.into_parts();
        let stream = &pages[0].stream;
        assert!(stream.contains("(Email: ) Tj"));
        assert!(stream.contains("(asha@example.com) Tj"));
        assert!(stream.contains("0.31 0.31 0.31 rg"));
    }

    #[test]
    fn test_long_field_wraps() {
        let mut canvas = canvas();
        let start = canvas.start();
        let value = "Flat 12 Lakeview Residency Near Central Library ".repeat(6);
        let next = canvas.field(start, "Permanent Address", Some(&value));
        assert!(next.y > start.y + 2.0 * 7.0);
    }

    #[test]
    fn test_text_breaks_page_at_bottom_margin() {
        let mut canvas = canvas();
        let near_bottom = Cursor { page: 0, y: 276.0 };
        let next = canvas.section_header(near_bottom, "Program Information");
        assert_eq!(next.page, 1);
        assert_eq!(canvas.page_count(), 2);
        assert!((next.y - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_section_header_keeps_with_first_line() {
        // 265 + 7 fits, but the header and its first field need 265 + 17
        let mut canvas = canvas();
        let cursor = Cursor { page: 0, y: 265.0 };
        let next = canvas.section_header(cursor, "Address Information");
        assert_eq!(next.page, 1);
        assert!((next.y - 30.0).abs() < 1e-9);
        let (_, pages, _) = canvas.into_parts();
        assert!(pages[0].stream.is_empty());
        assert!(pages[1].stream.contains("(Address Information) Tj"));

        let mut canvas = self::canvas();
        let cursor = Cursor { page: 0, y: 260.0 };
        let next = canvas.section_header(cursor, "Address Information");
        assert_eq!(next.page, 0);
        let next = canvas.field(next, "City", Some("Pune"));
        assert_eq!(next.page, 0);
    }

    #[test]
    fn test_field_value_drawn_as_given() {
        let mut canvas = canvas();
        let start = canvas.start();
        canvas.field(start, "City", Some("  Pune  "));
        let (_, pages, _) = canvas.into_parts();
        assert!(pages[0].stream.contains("(  Pune  ) Tj"));
    }

    /// (font, x in mm, text) for every `Tj` in a content stream
    fn placed_text(stream: &str) -> Vec<(Font, f64, String)> {
        let mut font = Font::Helvetica;
        let mut x = 0.0;
        let mut placed = Vec::new();
        for line in stream.lines() {
            if line.ends_with(" Tf") {
                font = if line.starts_with("/F2") {
                    Font::HelveticaBold
                } else {
                    Font::Helvetica
                };
            } else if let Some(tm) = line.strip_prefix("1 0 0 1 ") {
                x = tm.split(' ').next().unwrap().parse::<f64>().unwrap() / PT_PER_MM;
            } else if let Some(text) = line.strip_prefix('(').and_then(|l| l.strip_suffix(") Tj")) {
                placed.push((font, x, text.to_string()));
            }
        }
        placed
    }

    #[test]
    fn test_wide_label_stays_within_margins() {
        let mut canvas = canvas();
        let start = canvas.start();
        let label = "Name and full postal address of the school, college or other institution \
                     last attended by the applicant before submitting this application";
        let next = canvas.field(start, label, Some("Lakeview Public School"));
        assert!(next.y > start.y + 2.0 * 7.0);

        let (geometry, pages, _) = canvas.into_parts();
        let right = geometry.width_mm - geometry.margin_mm;
        let placed = placed_text(&pages[0].stream);
        assert!(placed.len() >= 3);
        for (font, x, text) in &placed {
            assert!(x + font.text_width_mm(text, 10.0) <= right + 0.01, "{text} overflows");
        }

        // The value starts on its own line at the margin
        let (_, x, text) = placed.last().unwrap();
        assert_eq!(text, "Lakeview Public School");
        assert!((x - geometry.margin_mm).abs() < 0.01);
    }

    #[test]
    fn test_image_page_break_rule() {
        // 170 x 80 mm image at y = 190: 190 + 80 + 10 = 280 > 277
        let mut canvas = canvas();
        let cursor = Cursor { page: 0, y: 190.0 };
        let next = canvas.image_block(cursor, "Profile Photo", bitmap(170, 80));
        assert_eq!(next.page, 1);
        assert!((next.y - (20.0 + 7.0 + 80.0 + 5.0)).abs() < 1e-9);

        // At y = 187 it still fits
        let mut canvas = self::canvas();
        let cursor = Cursor { page: 0, y: 187.0 };
        let next = canvas.image_block(cursor, "Profile Photo", bitmap(170, 80));
        assert_eq!(next.page, 0);
    }

    #[test]
    fn test_image_registered_on_page() {
        let mut canvas = canvas();
        let start = canvas.start();
        canvas.image_block(start, "Signature", bitmap(300, 100));
        let (_, pages, images) = canvas.into_parts();
        assert_eq!(images.len(), 1);
        assert_eq!(pages[0].images, vec![0]);
        assert!(pages[0].stream.contains("/Im1 Do"));
        assert!(pages[0].stream.contains("(Signature) Tj"));
    }
}

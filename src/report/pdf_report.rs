//! PDF rendering for tabular reports.
//!
//! Layout is computed in points on an A4 landscape page and converted to
//! millimetres at the printpdf boundary.

use std::ops::Range;

use anyhow::{Result, anyhow};
use printpdf::{
    BuiltinFont, Color, Greyscale, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference,
    Point, Pt, Rect, path::PaintMode,
};

use super::{Cell, ReportTable, SIZE_COLUMN};

const PAGE_WIDTH: f32 = 842.0;
const PAGE_HEIGHT: f32 = 595.0;
const MARGIN: f32 = 20.0;
const TITLE_SIZE: f32 = 16.0;
const TITLE_GAP: f32 = 30.0;
const FONT_SIZE: f32 = 8.0;
const ROW_HEIGHT: f32 = 14.0;
const CELL_PADDING: f32 = 3.0;
/// Rough Helvetica advance width, as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.52;

/// Column widths in points. They sum to less than the printable width.
const COLUMN_WIDTHS: [f32; 8] = [75.0, 70.0, 130.0, 170.0, 60.0, 100.0, 80.0, 100.0];

const HEADER_FILL: f32 = 0.83;
const GRID_GREY: f32 = 0.6;
const GRID_THICKNESS: f32 = 0.25;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

fn grey(level: f32) -> Color {
    Color::Greyscale(Greyscale::new(level, None))
}

/// Number of body rows that fit below the header on a page whose table
/// starts at `top`.
fn rows_per_page(top: f32) -> usize {
    let slots = ((top - MARGIN) / ROW_HEIGHT).floor() as usize;
    slots.saturating_sub(1).max(1)
}

fn first_page_top() -> f32 {
    PAGE_HEIGHT - MARGIN - TITLE_GAP
}

fn continuation_top() -> f32 {
    PAGE_HEIGHT - MARGIN
}

/// Split `total` body rows into per-page ranges. The first page is shorter
/// because it carries the title.
pub(super) fn paginate(total: usize) -> Vec<Range<usize>> {
    let mut pages = Vec::new();
    let mut start = 0;
    let mut capacity = rows_per_page(first_page_top());

    while start < total {
        let end = (start + capacity).min(total);
        pages.push(start..end);
        start = end;
        capacity = rows_per_page(continuation_top());
    }

    if pages.is_empty() {
        pages.push(0..0);
    }
    pages
}

/// Cut `text` so it fits in `width` points, marking the cut with "...".
pub(super) fn fit_text(text: &str, width: f32) -> String {
    let max_chars = ((width - 2.0 * CELL_PADDING) / (FONT_SIZE * GLYPH_WIDTH)).floor() as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= 3 {
        return text.chars().take(max_chars).collect();
    }
    let mut cut: String = text.chars().take(max_chars - 3).collect();
    cut.push_str("...");
    cut
}

fn text_width(text: &str) -> f32 {
    text.chars().count() as f32 * FONT_SIZE * GLYPH_WIDTH
}

fn column_offsets() -> Vec<f32> {
    let mut x = MARGIN;
    let mut offsets = Vec::with_capacity(COLUMN_WIDTHS.len());
    for width in COLUMN_WIDTHS {
        offsets.push(x);
        x += width;
    }
    offsets
}

fn table_width() -> f32 {
    COLUMN_WIDTHS.iter().sum()
}

fn draw_row(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    cells: &[String],
    top: f32,
    offsets: &[f32],
) {
    let baseline = top - ROW_HEIGHT + (ROW_HEIGHT - FONT_SIZE) / 2.0 + 1.5;
    for (idx, text) in cells.iter().enumerate() {
        let (Some(x), Some(width)) = (offsets.get(idx), COLUMN_WIDTHS.get(idx)) else {
            continue;
        };
        let text = fit_text(text, *width);
        let x = if idx == SIZE_COLUMN {
            x + width - CELL_PADDING - text_width(&text)
        } else {
            x + CELL_PADDING
        };
        layer.use_text(text, FONT_SIZE, mm(x), mm(baseline), font);
    }
}

fn draw_line(layer: &PdfLayerReference, from: (f32, f32), to: (f32, f32)) {
    layer.add_line(Line {
        points: vec![
            (Point::new(mm(from.0), mm(from.1)), false),
            (Point::new(mm(to.0), mm(to.1)), false),
        ],
        is_closed: false,
    });
}

fn draw_grid(layer: &PdfLayerReference, top: f32, row_count: usize, offsets: &[f32]) {
    let bottom = top - ROW_HEIGHT * row_count as f32;
    let right = MARGIN + table_width();

    layer.set_outline_color(grey(GRID_GREY));
    layer.set_outline_thickness(GRID_THICKNESS);

    for i in 0..=row_count {
        let y = top - ROW_HEIGHT * i as f32;
        draw_line(layer, (MARGIN, y), (right, y));
    }

    for x in offsets.iter().copied().chain(std::iter::once(right)) {
        draw_line(layer, (x, top), (x, bottom));
    }
}

fn draw_page(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    headers: &[String],
    rows: &[Vec<String>],
    top: f32,
) {
    let offsets = column_offsets();

    layer.set_fill_color(grey(HEADER_FILL));
    layer.add_rect(
        Rect::new(
            mm(MARGIN),
            mm(top - ROW_HEIGHT),
            mm(MARGIN + table_width()),
            mm(top),
        )
        .with_mode(PaintMode::Fill),
    );

    layer.set_fill_color(grey(0.0));
    draw_row(layer, &fonts.bold, headers, top, &offsets);

    for (i, row) in rows.iter().enumerate() {
        let row_top = top - ROW_HEIGHT * (i + 1) as f32;
        draw_row(layer, &fonts.regular, row, row_top, &offsets);
    }

    draw_grid(layer, top, rows.len() + 1, &offsets);
}

pub fn render(table: &ReportTable, title: &str) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| anyhow!("Failed to load PDF font: {e}"))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| anyhow!("Failed to load PDF font: {e}"))?,
    };

    let headers: Vec<String> = table.headers.iter().map(ToString::to_string).collect();
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(Cell::display).collect())
        .collect();

    for (page_idx, range) in paginate(rows.len()).into_iter().enumerate() {
        let layer = if page_idx == 0 {
            let layer = doc.get_page(first_page).get_layer(first_layer);
            layer.set_fill_color(grey(0.0));
            layer.use_text(
                title,
                TITLE_SIZE,
                mm(MARGIN),
                mm(PAGE_HEIGHT - MARGIN - TITLE_SIZE),
                &fonts.bold,
            );
            layer
        } else {
            let (page, layer) = doc.add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };

        let top = if page_idx == 0 {
            first_page_top()
        } else {
            continuation_top()
        };

        draw_page(&layer, &fonts, &headers, &rows[range], top);
    }

    doc.save_to_bytes()
        .map_err(|e| anyhow!("Failed to write PDF: {e}"))
}

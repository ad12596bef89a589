use anyhow::Result;
use rust_xlsxwriter::{Color, Format, Workbook};

use super::{Cell, ReportTable, SHEET_NAME};

pub fn render(table: &ReportTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold().set_background_color(Color::Silver);

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in (0u16..).zip(&table.headers) {
        sheet.write_string_with_format(0, col, *header, &header_format)?;
        sheet.set_column_width(col, column_width(header))?;
    }

    for (row_idx, row) in (1u32..).zip(&table.rows) {
        for (col, cell) in (0u16..).zip(row) {
            match cell {
                Cell::Text(text) => {
                    sheet.write_string(row_idx, col, text.as_str())?;
                }
                Cell::Number(n) => {
                    sheet.write_number(row_idx, col, *n)?;
                }
                Cell::Empty => {}
            }
        }
    }

    sheet.set_freeze_panes(1, 0)?;

    Ok(workbook.save_to_buffer()?)
}

fn column_width(header: &str) -> f64 {
    match header {
        "file_name" | "full_path" => 40.0,
        "modified" | "uploaded_at" => 20.0,
        _ => 16.0,
    }
}

//! xlsx output of sheet frames.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::AnyValue;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::debug;

use crate::frames::SheetFrame;
use crate::polars_utils::{any_to_f64, any_to_string};

fn write_sheet(
    worksheet: &mut Worksheet,
    frame: &SheetFrame,
    header_format: &Format,
) -> Result<()> {
    worksheet
        .set_name(&frame.name)
        .with_context(|| format!("invalid sheet name {}", frame.name))?;

    for (col, column) in frame.data.get_columns().iter().enumerate() {
        let col16 = u16::try_from(col).context("too many columns for one sheet")?;
        worksheet.write_string_with_format(0, col16, column.name().as_str(), header_format)?;

        for row in 0..frame.data.height() {
            let row32 = u32::try_from(row + 1).context("too many rows for one sheet")?;
            let value = column.get(row).unwrap_or(AnyValue::Null);
            if let Some(number) = any_to_f64(&value) {
                worksheet.write_number(row32, col16, number)?;
                continue;
            }
            let text = any_to_string(value);
            if !text.is_empty() {
                worksheet.write_string(row32, col16, &text)?;
            }
        }
    }
    worksheet.set_freeze_panes(1, 0)?;
    worksheet.autofit();
    Ok(())
}

/// Write every frame as one worksheet, in order.
pub fn write_workbook(path: &Path, sheets: &[SheetFrame]) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    for frame in sheets {
        let worksheet = workbook.add_worksheet();
        write_sheet(worksheet, frame, &header_format)
            .with_context(|| format!("write sheet {}", frame.name))?;
        debug!(sheet = %frame.name, rows = frame.height(), "sheet written");
    }
    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;
    Ok(())
}

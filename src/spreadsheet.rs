use crate::constants::{COLUMN_PADDING, LINK_COLOR, LINK_LABEL, MAX_COLUMN_WIDTH, SHEET_NAME};
use crate::error::Result;
use crate::table::{Column, EventTable};
use rust_xlsxwriter::{Color, Format, FormatUnderline, Url, Workbook};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetCell {
    Text(String),
    /// Shows `label`, links to `url`.
    Link { url: String, label: String },
}

impl SheetCell {
    /// The text a reader sees in the cell.
    pub fn display(&self) -> &str {
        match self {
            SheetCell::Text(text) => text,
            SheetCell::Link { label, .. } => label,
        }
    }
}

/// Everything that ends up in the worksheet, before encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<SheetCell>>,
    pub column_widths: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct SpreadsheetEmitter {
    max_column_width: usize,
}

impl Default for SpreadsheetEmitter {
    fn default() -> Self {
        Self::new(MAX_COLUMN_WIDTH)
    }
}

impl SpreadsheetEmitter {
    pub fn new(max_column_width: usize) -> Self {
        Self { max_column_width }
    }

    pub fn layout(&self, table: &EventTable) -> SheetLayout {
        let header: Vec<String> = Column::ALL.iter().map(Column::header).collect();

        let rows: Vec<Vec<SheetCell>> = table
            .rows()
            .iter()
            .map(|row| {
                Column::ALL
                    .iter()
                    .map(|&column| {
                        let value = row.cell(column).to_string();
                        if !column.is_link() {
                            return SheetCell::Text(value);
                        }
                        if is_linkable(&value) {
                            SheetCell::Link {
                                url: value,
                                label: LINK_LABEL.to_string(),
                            }
                        } else {
                            warn!(
                                "Writing unlinkable registration URL {:?} as text for {}",
                                value,
                                row.cell(Column::EventName)
                            );
                            SheetCell::Text(value)
                        }
                    })
                    .collect()
            })
            .collect();

        let column_widths = (0..header.len())
            .map(|col| {
                let longest = rows
                    .iter()
                    .map(|r| r[col].display().chars().count())
                    .chain(std::iter::once(header[col].chars().count()))
                    .max()
                    .unwrap_or(0);
                (longest + COLUMN_PADDING).min(self.max_column_width)
            })
            .collect();

        SheetLayout {
            name: SHEET_NAME.to_string(),
            header,
            rows,
            column_widths,
        }
    }

    /// Renders the table as an xlsx workbook held in memory.
    pub fn render(&self, table: &EventTable) -> Result<Vec<u8>> {
        let layout = self.layout(table);
        let bytes = write_workbook(&layout)?;
        info!(
            "Rendered spreadsheet with {} rows ({} bytes)",
            layout.rows.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}

/// Only absolute http(s) URLs become hyperlinks.
fn is_linkable(value: &str) -> bool {
    url::Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

fn write_workbook(layout: &SheetLayout) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&layout.name)?;

    let link_format = Format::new()
        .set_font_color(Color::RGB(LINK_COLOR))
        .set_underline(FormatUnderline::Single);

    for (col, title) in layout.header.iter().enumerate() {
        worksheet.write_string(0, col as u16, title)?;
    }

    for (i, cells) in layout.rows.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, cell) in cells.iter().enumerate() {
            let col = col as u16;
            match cell {
                SheetCell::Text(text) => {
                    worksheet.write_string(row, col, text)?;
                }
                SheetCell::Link { url, label } => {
                    let link = Url::new(url.as_str()).set_text(label.as_str());
                    worksheet.write_url_with_format(row, col, link, &link_format)?;
                }
            }
        }
    }

    for (col, width) in layout.column_widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width as f64)?;
    }
    debug!("Column widths: {:?}", layout.column_widths);

    Ok(workbook.save_to_buffer()?)
}

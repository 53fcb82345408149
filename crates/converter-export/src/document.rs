use converter_core::{format_value, ConversionRecord, ConverterError, Result};
use printpdf::{BuiltinFont, Mm, PdfDocument};

pub const TITLE: &str = "Conversion History";

// A4 portrait, 10 mm margins, 10 mm line pitch, 20 mm bottom margin.
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const BOTTOM_MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 10.0;
const FONT_SIZE_PT: f32 = 12.0;
const PT_TO_MM: f32 = 0.3528;
// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH_EM: f32 = 0.5;

/// (297 - 10 - 20) / 10, rounded down.
pub const LINES_PER_PAGE: usize = 26;

/// `{input} {from} = {result} {to} ({category})`
pub fn document_line(record: &ConversionRecord) -> String {
    format!(
        "{} {} = {} {} ({})",
        format_value(record.input()),
        record.from(),
        format_value(record.result()),
        record.to(),
        record.category()
    )
}

/// Title followed by one line per record.
pub fn document_lines(records: &[ConversionRecord]) -> Vec<String> {
    std::iter::once(TITLE.to_string())
        .chain(records.iter().map(document_line))
        .collect()
}

/// Split lines into pages of at most [`LINES_PER_PAGE`].
pub fn paginate(lines: &[String]) -> Vec<&[String]> {
    lines.chunks(LINES_PER_PAGE).collect()
}

/// Render the history as a PDF document held in memory.
pub fn export_document(records: &[ConversionRecord]) -> Result<Vec<u8>> {
    let lines = document_lines(records);
    let pages = paginate(&lines);

    let (doc, first_page, first_layer) =
        PdfDocument::new(TITLE, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ConverterError::ExportError(format!("Failed to load font: {}", e)))?;

    let mut targets = vec![(first_page, first_layer)];
    for _ in 1..pages.len() {
        targets.push(doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1"));
    }

    for (page_number, ((page, layer), page_lines)) in targets.into_iter().zip(pages).enumerate() {
        let layer = doc.get_page(page).get_layer(layer);
        for (row, line) in page_lines.iter().enumerate() {
            let x = if page_number == 0 && row == 0 {
                centered_x(line)
            } else {
                MARGIN_MM
            };
            layer.use_text(line.as_str(), FONT_SIZE_PT, Mm(x), Mm(baseline_y(row)), &font);
        }
    }

    doc.save_to_bytes()
        .map_err(|e| ConverterError::ExportError(format!("Failed to write document: {}", e)))
}

/// PDF y runs upward from the bottom edge; text sits near the bottom of
/// its line box.
fn baseline_y(row: usize) -> f32 {
    let top = MARGIN_MM + row as f32 * LINE_HEIGHT_MM;
    PAGE_HEIGHT_MM - (top + LINE_HEIGHT_MM * 0.65)
}

fn centered_x(text: &str) -> f32 {
    let width = text.chars().count() as f32 * FONT_SIZE_PT * PT_TO_MM * AVG_GLYPH_WIDTH_EM;
    ((PAGE_WIDTH_MM - width) / 2.0).max(MARGIN_MM)
}

#[cfg(test)]
mod tests {
    use super::*;
    use converter_core::{Conversion, Currency, LengthUnit, Unit, WeightUnit};
    use lopdf::content::Content;
    use lopdf::{Document, Object};

    /// Text shown on each page of a rendered document, page by page.
    fn rendered_pages(bytes: &[u8]) -> Vec<Vec<String>> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|&page_id| {
                let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
                content
                    .operations
                    .iter()
                    .filter(|op| op.operator == "Tj" || op.operator == "TJ")
                    .map(|op| {
                        op.operands
                            .iter()
                            .flat_map(|operand| match operand {
                                Object::Array(items) => items.clone(),
                                other => vec![other.clone()],
                            })
                            .filter_map(|object| match object {
                                Object::String(bytes, _) => {
                                    Some(String::from_utf8_lossy(&bytes).into_owned())
                                }
                                _ => None,
                            })
                            .collect::<String>()
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn kg_to_lb(input: f64) -> ConversionRecord {
        ConversionRecord::new(
            Conversion::new(
                Unit::Weight(WeightUnit::Kilograms),
                Unit::Weight(WeightUnit::Pounds),
            )
            .unwrap(),
            input,
            input / 0.453592,
        )
    }

    #[test]
    fn test_document_line_format() {
        assert_eq!(document_line(&kg_to_lb(1.0)), "1.0 Kilograms = 2.2046 Pounds (Weight)");

        let currency = ConversionRecord::new(
            Conversion::new(Unit::Currency(Currency::Usd), Unit::Currency(Currency::Inr)).unwrap(),
            2.5,
            208.625,
        );
        assert_eq!(document_line(&currency), "2.5 USD = 208.625 INR (Currency)");
    }

    #[test]
    fn test_one_line_per_record_after_title() {
        let records: Vec<_> = (1..=5).map(|i| kg_to_lb(i as f64)).collect();
        let lines = document_lines(&records);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], TITLE);
        for (line, record) in lines[1..].iter().zip(&records) {
            assert_eq!(*line, document_line(record));
        }
    }

    #[test]
    fn test_long_history_spans_pages() {
        let records: Vec<_> = (0..60).map(|i| kg_to_lb(i as f64)).collect();
        let lines = document_lines(&records);
        let pages = paginate(&lines);

        assert_eq!(LINES_PER_PAGE, 26);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages.iter().map(|p| p.len()).sum::<usize>(), 61);
        assert_eq!(pages[1][0], document_line(&records[LINES_PER_PAGE - 1]));
    }

    #[test]
    fn test_baseline_stays_on_page() {
        assert!(baseline_y(0) < PAGE_HEIGHT_MM - MARGIN_MM);
        assert!(baseline_y(LINES_PER_PAGE - 1) > BOTTOM_MARGIN_MM - LINE_HEIGHT_MM);
    }

    #[test]
    fn test_rendered_document_lists_every_record() {
        let records: Vec<_> = (1..=3).map(|i| kg_to_lb(i as f64)).collect();
        let pages = rendered_pages(&export_document(&records).unwrap());

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0], document_lines(&records));
        assert_eq!(pages[0][0], TITLE);
    }

    #[test]
    fn test_rendered_document_continues_on_new_pages() {
        let records: Vec<_> = (0..60).map(|i| kg_to_lb(i as f64)).collect();
        let pages = rendered_pages(&export_document(&records).unwrap());

        assert_eq!(pages.len(), 3);
        assert!(pages.iter().all(|page| page.len() <= LINES_PER_PAGE));
        assert_eq!(pages.concat(), document_lines(&records));
    }

    #[test]
    fn test_renders_pdf_bytes() {
        let records = vec![ConversionRecord::new(
            Conversion::new(
                Unit::Length(LengthUnit::Centimeters),
                Unit::Length(LengthUnit::Meters),
            )
            .unwrap(),
            250.0,
            2.5,
        )];
        let single = export_document(&records).unwrap();
        assert!(single.starts_with(b"%PDF"));

        let many: Vec<_> = (0..40).map(|i| kg_to_lb(i as f64)).collect();
        let multi = export_document(&many).unwrap();
        assert!(multi.starts_with(b"%PDF"));
    }
}

//! Word (DOCX) export
//!
//! Writes a minimal WordprocessingML package: the statement as a two-column
//! table between the title block and the signature lines.

use std::io::{Cursor, Write};

use zip::write::{FileOptions, ZipWriter};

use crate::error::CashflowResult;
use crate::report::{LineKind, ReportLine, StatementReport};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:docDefaults>
<w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/><w:sz w:val="21"/></w:rPr></w:rPrDefault>
<w:pPrDefault><w:pPr><w:spacing w:after="0" w:line="240" w:lineRule="auto"/></w:pPr></w:pPrDefault>
</w:docDefaults>
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:pPr><w:jc w:val="center"/></w:pPr><w:rPr><w:b/><w:sz w:val="28"/></w:rPr></w:style>
<w:style w:type="table" w:styleId="StatementTable"><w:name w:val="Statement Table"/><w:tblPr><w:tblW w:w="5000" w:type="pct"/></w:tblPr></w:style>
</w:styles>"#;

/// Table width in twentieths of a point (6.5in)
const TABLE_WIDTH: u32 = 9360;
const AMOUNT_WIDTH: u32 = 2340;

/// Escape text for XML content and attribute values
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() && c != '\t' => {}
            c => out.push(c),
        }
    }
    out
}

#[derive(Default, Clone, Copy)]
struct RunStyle {
    bold: bool,
    size: Option<u32>,
}

fn run(text: &str, style: RunStyle) -> String {
    let mut props = String::new();
    if style.bold {
        props.push_str("<w:b/>");
    }
    if let Some(size) = style.size {
        props.push_str(&format!("<w:sz w:val=\"{}\"/>", size));
    }
    let props = if props.is_empty() {
        String::new()
    } else {
        format!("<w:rPr>{}</w:rPr>", props)
    };
    format!(
        "<w:r>{}<w:t xml:space=\"preserve\">{}</w:t></w:r>",
        props,
        escape_xml(text)
    )
}

fn paragraph(text: &str, align: Option<&str>, style: RunStyle) -> String {
    let ppr = align
        .map(|a| format!("<w:pPr><w:jc w:val=\"{}\"/></w:pPr>", a))
        .unwrap_or_default();
    if text.is_empty() {
        return format!("<w:p>{}</w:p>", ppr);
    }
    format!("<w:p>{}{}</w:p>", ppr, run(text, style))
}

fn cell(content: &str, width: u32, align: Option<&str>, borders: &str, style: RunStyle) -> String {
    let borders = if borders.is_empty() {
        String::new()
    } else {
        format!("<w:tcBorders>{}</w:tcBorders>", borders)
    };
    format!(
        "<w:tc><w:tcPr><w:tcW w:w=\"{}\" w:type=\"dxa\"/>{}</w:tcPr>{}</w:tc>",
        width,
        borders,
        paragraph(content, align, style)
    )
}

fn table_row(report: &StatementReport, line: &ReportLine) -> String {
    let style = RunStyle {
        bold: line.is_emphasized(),
        size: None,
    };
    let label = format!("{}{}", "    ".repeat(line.indent as usize), line.label);
    let amount = line
        .amount
        .map(|a| report.format_amount(a))
        .unwrap_or_default();

    let borders = match line.kind {
        LineKind::Subtotal => r#"<w:top w:val="single" w:sz="4" w:space="0" w:color="000000"/>"#,
        LineKind::Total => concat!(
            r#"<w:top w:val="single" w:sz="4" w:space="0" w:color="000000"/>"#,
            r#"<w:bottom w:val="double" w:sz="4" w:space="0" w:color="000000"/>"#
        ),
        _ => "",
    };

    format!(
        "<w:tr>{}{}</w:tr>",
        cell(&label, TABLE_WIDTH - AMOUNT_WIDTH, None, "", style),
        cell(&amount, AMOUNT_WIDTH, Some("right"), borders, style)
    )
}

/// One column per signatory: role, signature line, printed name
fn signatory_table(report: &StatementReport) -> String {
    let count = report.signatories.len().max(1) as u32;
    let width = TABLE_WIDTH / count;
    let line = r#"<w:bottom w:val="single" w:sz="4" w:space="0" w:color="000000"/>"#;
    let bold = RunStyle {
        bold: true,
        size: None,
    };

    let mut roles = String::new();
    let mut lines = String::new();
    let mut names = String::new();
    for signatory in &report.signatories {
        roles.push_str(&cell(
            &format!("{}:", signatory.role),
            width,
            None,
            "",
            RunStyle::default(),
        ));
        lines.push_str(&cell("", width, None, line, RunStyle::default()));
        names.push_str(&cell(&signatory.name, width, None, "", bold));
    }

    format!(
        "<w:tbl><w:tblPr><w:tblW w:w=\"{}\" w:type=\"dxa\"/></w:tblPr>\
         <w:tr>{}</w:tr><w:tr><w:trPr><w:trHeight w:val=\"720\"/></w:trPr>{}</w:tr><w:tr>{}</w:tr></w:tbl>",
        TABLE_WIDTH, roles, lines, names
    )
}

/// Build `word/document.xml` for a report
fn document_xml(report: &StatementReport) -> String {
    let bold = RunStyle {
        bold: true,
        size: None,
    };
    let plain = RunStyle::default();

    let mut body = String::new();
    body.push_str(&paragraph(
        &report.association,
        Some("center"),
        RunStyle {
            bold: true,
            size: Some(28),
        },
    ));
    if !report.address.trim().is_empty() {
        body.push_str(&paragraph(&report.address, Some("center"), plain));
    }
    body.push_str(&paragraph("", None, plain));
    body.push_str(&paragraph(
        &report.title,
        Some("center"),
        RunStyle {
            bold: true,
            size: Some(26),
        },
    ));
    body.push_str(&paragraph(&report.period_label, Some("center"), plain));
    body.push_str(&paragraph("", None, plain));

    body.push_str("<w:tbl><w:tblPr><w:tblStyle w:val=\"StatementTable\"/>");
    body.push_str(&format!(
        "<w:tblW w:w=\"{}\" w:type=\"dxa\"/></w:tblPr>",
        TABLE_WIDTH
    ));
    body.push_str(&format!(
        "<w:tblGrid><w:gridCol w:w=\"{}\"/><w:gridCol w:w=\"{}\"/></w:tblGrid>",
        TABLE_WIDTH - AMOUNT_WIDTH,
        AMOUNT_WIDTH
    ));
    body.push_str(&format!(
        "<w:tr>{}{}</w:tr>",
        cell("Particulars", TABLE_WIDTH - AMOUNT_WIDTH, None, "", bold),
        cell(
            &format!("Amount ({})", report.currency_symbol),
            AMOUNT_WIDTH,
            Some("right"),
            "",
            bold
        )
    ));
    for line in &report.lines {
        body.push_str(&table_row(report, line));
    }
    body.push_str("</w:tbl>");

    if !report.notes.trim().is_empty() {
        body.push_str(&paragraph("", None, plain));
        body.push_str(&paragraph("Notes:", None, bold));
        for line in report.notes.lines() {
            body.push_str(&paragraph(line, None, plain));
        }
    }

    body.push_str(&paragraph("", None, plain));
    body.push_str(&paragraph("", None, plain));
    body.push_str(&signatory_table(report));
    body.push_str(&paragraph("", None, plain));
    body.push_str(&paragraph(
        &format!("Prepared on {}", report.prepared_on),
        None,
        RunStyle {
            bold: false,
            size: Some(16),
        },
    ));

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
            "<w:body>{}",
            r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/>"#,
            r#"<w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#,
            "</w:body></w:document>"
        ),
        body
    )
}

/// Export a statement report to DOCX
pub fn export_statement_docx<W: Write>(
    report: &StatementReport,
    writer: &mut W,
) -> CashflowResult<()> {
    let package = {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES.to_string()),
            ("_rels/.rels", PACKAGE_RELS.to_string()),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS.to_string()),
            ("word/styles.xml", STYLES.to_string()),
            ("word/document.xml", document_xml(report)),
        ];
        for (name, content) in parts {
            zip.start_file::<_, ()>(name, FileOptions::default())?;
            zip.write_all(content.as_bytes())?;
        }

        zip.finish()?.into_inner()
    };

    tracing::debug!(bytes = package.len(), "DOCX package built");
    writer.write_all(&package)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::{CashFlowStatement, FieldId, Money, ReportPeriod};
    use std::io::Read;

    fn report() -> StatementReport {
        let mut statement = CashFlowStatement::new(ReportPeriod::new(2025, 6).unwrap());
        statement
            .set(FieldId::WaterCollections, Money::from_cents(432_100))
            .unwrap();
        statement.notes = "Pump repair <urgent> & pending".into();

        let mut settings = Settings::default();
        settings.association.name = "Oak & Elm Residents".into();
        StatementReport::build(&statement, &settings)
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
        assert_eq!(escape_xml("x\u{1}y"), "xy");
    }

    #[test]
    fn test_package_parts() {
        let mut out = Vec::new();
        export_statement_docx(&report(), &mut out).unwrap();

        let archive = zip::ZipArchive::new(Cursor::new(out.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for part in ["[Content_Types].xml", "_rels/.rels", "word/document.xml", "word/styles.xml"] {
            assert!(names.contains(&part), "missing {}", part);
        }
    }

    #[test]
    fn test_document_content() {
        let mut out = Vec::new();
        export_statement_docx(&report(), &mut out).unwrap();
        let xml = read_part(&out, "word/document.xml");

        assert!(xml.contains("Oak &amp; Elm Residents"));
        assert!(xml.contains("CASH FLOW STATEMENT"));
        assert!(xml.contains("Water Bill Collections"));
        assert!(xml.contains("4,321.00"));
        assert!(xml.contains("Pump repair &lt;urgent&gt; &amp; pending"));
        assert!(xml.contains("w:val=\"double\""));
        assert!(xml.contains("Approved by:"));
    }
}

use crate::error::ExportError;
use crate::models::EstimateDocument;
use csv::Writer;

/// 导出估价单为 CSV: 明细行 → 分类小计 → 总价
pub fn document_to_csv(doc: &EstimateDocument) -> Result<Vec<u8>, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());

    writer.write_record(["category", "item", "package", "specification", "amount"])?;

    for line in &doc.lines {
        writer.write_record(&[
            line.category.label().to_string(),
            line.item.clone(),
            line.package.label().to_string(),
            line.specification.clone(),
            line.amount.to_string(),
        ])?;
    }

    for subtotal in &doc.subtotals {
        let amount = if subtotal.included {
            subtotal.amount.to_string()
        } else {
            "Not included".to_string()
        };
        writer.write_record(&[
            subtotal.label.clone(),
            "Subtotal".to_string(),
            String::new(),
            String::new(),
            amount,
        ])?;
    }

    writer.write_record(&[
        String::new(),
        "Grand Total".to_string(),
        doc.package.label().to_string(),
        doc.bhk.label().to_string(),
        doc.grand_total.to_string(),
    ])?;

    writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))
}

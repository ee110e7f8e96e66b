//! Minimal PDF emitter for report downloads. Exports must be byte-for-byte
//! reproducible for identical input, so the document carries no creation
//! metadata and the object layout is fixed.

use crate::domain::abtest::TestSnapshot;

const PAGE_WIDTH: u32 = 612;
const PAGE_HEIGHT: u32 = 792;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\\' => out.push_str("\\\\"),
            // Base-font text is latin-1 only; anything else degrades to '?'.
            c if (c as u32) < 128 => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn content_stream(title: &str, lines: &[String]) -> String {
    let mut content = String::new();
    content.push_str("BT\n/F1 14 Tf\n72 750 Td\n16 TL\n");
    content.push_str(&format!("({}) Tj\nT*\n", escape(title)));
    content.push_str("/F1 10 Tf\n13 TL\n");
    for line in lines {
        content.push_str(&format!("({}) Tj\nT*\n", escape(line)));
    }
    content.push_str("ET\n");
    content
}

/// Single-page text report. Object order and offsets are a function of the
/// input alone.
pub fn render_report(title: &str, lines: &[String]) -> Vec<u8> {
    let content = content_stream(title, lines);

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!("<< /Length {} >>\nstream\n{}endstream", content.len(), content),
    ];

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (idx, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", idx + 1, body).as_bytes());
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );

    out
}

fn fmt_date(value: Option<chrono::DateTime<chrono::Utc>>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn test_results_pdf(snapshot: &TestSnapshot) -> Vec<u8> {
    let test = &snapshot.test;
    let mut lines = Vec::new();

    lines.push(format!("Test ID: {}", test.test_id));
    lines.push(format!("Video: {} ({})", test.video_title, test.video_id));
    lines.push(format!(
        "Type: {}   Status: {}",
        test.test_type.as_str(),
        test.status.as_str()
    ));
    lines.push(format!(
        "Start: {}   End: {}",
        fmt_date(test.start_date),
        fmt_date(test.end_date)
    ));
    lines.push(format!(
        "Duration: {}h   Rotation: every {}h   Threshold: {:.2}",
        test.duration_hours, test.rotation_frequency_hours, test.performance_threshold
    ));
    lines.push(String::new());
    lines.push("Variant      Impressions      Clicks       Views    CTR(%)  Winner".to_string());

    for variant in &snapshot.variants {
        lines.push(format!(
            "{:<12} {:>11} {:>11} {:>11} {:>9.2}  {}",
            variant.variant_name,
            variant.impressions,
            variant.clicks,
            variant.views,
            variant.ctr,
            if variant.is_winner { "yes" } else { "no" }
        ));
    }

    lines.push(String::new());
    match snapshot.variants.iter().find(|v| v.is_winner) {
        Some(winner) => lines.push(format!(
            "Winner: variant {} with CTR {:.2}%",
            winner.variant_name, winner.ctr
        )),
        None => lines.push("No winner selected yet".to_string()),
    }

    render_report("A/B Test Report", &lines)
}

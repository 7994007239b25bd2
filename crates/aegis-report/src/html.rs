//! Self-contained HTML rendering of a scan report.

use crate::Report;

/// Render the report as a single self-contained HTML document with an
/// inline summary and a findings table. Confidence is shown as a
/// percentage.
#[must_use]
pub fn render_html(report: &Report) -> String {
    let summary = &report.summary;

    let rows = report
        .findings
        .iter()
        .flat_map(|result| {
            let file_path = result.file_path.to_string_lossy().into_owned();
            result.findings.iter().map(move |finding| {
                let confidence_pct = (finding.confidence * 100.0).round() as i64;
                let confidence_class = if finding.confidence >= 0.9 {
                    "high"
                } else if finding.confidence >= 0.7 {
                    "medium"
                } else {
                    "low"
                };

                format!(
                    r#"<tr>
    <td class="path">{}</td>
    <td><span class="badge">{}</span></td>
    <td class="mono">{}</td>
    <td class="confidence {}">{}%</td>
    <td class="mono">{}</td>
</tr>"#,
                    html_escape(&file_path),
                    html_escape(&finding.kind),
                    html_escape(&finding.snippet),
                    confidence_class,
                    confidence_pct,
                    html_escape(&finding.context),
                )
            })
        })
        .collect::<Vec<_>>()
        .join("\n");

    let table_body = if rows.is_empty() {
        r#"<tr><td colspan="5" class="empty">No PII findings. Your files appear to be clean.</td></tr>"#
            .to_string()
    } else {
        rows
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>GDPR Scan Report</title>
    <style>
        :root {{
            --bg: #f8f9fa;
            --fg: #212529;
            --border: #dee2e6;
            --accent: #2563eb;
            --danger: #dc2626;
            --warn: #d97706;
            --ok: #16a34a;
        }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            background: var(--bg);
            color: var(--fg);
            margin: 0;
            padding: 2rem;
        }}
        h1 {{ margin-top: 0; }}
        .cards {{ display: flex; gap: 1rem; flex-wrap: wrap; margin-bottom: 2rem; }}
        .card {{
            background: #fff;
            border: 1px solid var(--border);
            border-radius: 8px;
            padding: 1rem 1.5rem;
            min-width: 10rem;
        }}
        .card .label {{ font-size: 0.75rem; text-transform: uppercase; color: #6c757d; }}
        .card .value {{ font-size: 1.75rem; font-weight: 700; }}
        .card.alert .value {{ color: var(--danger); }}
        table {{ width: 100%; border-collapse: collapse; background: #fff; border: 1px solid var(--border); }}
        th, td {{ padding: 0.6rem 0.8rem; text-align: left; border-bottom: 1px solid var(--border); vertical-align: top; }}
        th {{ font-size: 0.75rem; text-transform: uppercase; color: #6c757d; }}
        .path {{ color: var(--accent); word-break: break-all; }}
        .mono {{ font-family: ui-monospace, SFMono-Regular, Menlo, monospace; font-size: 0.8rem; word-break: break-all; }}
        .badge {{
            background: #e7f1ff;
            color: var(--accent);
            border-radius: 999px;
            padding: 0.15rem 0.6rem;
            font-size: 0.75rem;
        }}
        .confidence.high {{ color: var(--ok); font-weight: 600; }}
        .confidence.medium {{ color: var(--warn); font-weight: 600; }}
        .confidence.low {{ color: var(--danger); font-weight: 600; }}
        .empty {{ text-align: center; color: #6c757d; padding: 2rem; }}
        footer {{ margin-top: 2rem; font-size: 0.8rem; color: #6c757d; }}
    </style>
</head>
<body>
    <h1>GDPR Scan Report</h1>
    <p>Root: <span class="mono">{root}</span> &middot; Generated: {generated}</p>

    <div class="cards">
        <div class="card">
            <div class="label">Total Scanned</div>
            <div class="value">{total_scanned}</div>
        </div>
        <div class="card alert">
            <div class="label">Files with PII</div>
            <div class="value">{files_with_pii}</div>
        </div>
        <div class="card">
            <div class="label">Total Findings</div>
            <div class="value">{total_findings}</div>
        </div>
        <div class="card">
            <div class="label">Scan Duration</div>
            <div class="value">{duration_ms}&nbsp;ms</div>
        </div>
    </div>

    <table>
        <thead>
            <tr>
                <th>File Path</th>
                <th>Type</th>
                <th>Snippet</th>
                <th>Confidence</th>
                <th>Context</th>
            </tr>
        </thead>
        <tbody>
{table_body}
        </tbody>
    </table>

    <footer>Aegis GDPR Scanner</footer>
</body>
</html>
"#,
        root = html_escape(&summary.root_path.to_string_lossy()),
        generated = summary.end_time.to_rfc3339(),
        total_scanned = summary.total_files_scanned,
        files_with_pii = summary.total_files_with_pii,
        total_findings = summary.total_pii_found,
        duration_ms = summary.scan_duration_ms,
        table_body = table_body,
    )
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::{Finding, ScanResult};
    use std::path::PathBuf;

    #[test]
    fn test_confidence_rendered_as_percentage() {
        let mut report = Report::new(PathBuf::from("/data"));
        let mut res = ScanResult::new(PathBuf::from("/data/konto.txt"));
        res.findings.push(Finding {
            kind: "IBAN".to_string(),
            snippet: "DE89370400440532013000".to_string(),
            confidence: 0.95,
            offset: 13,
            context: "Valid German IBAN".to_string(),
        });
        report.add_result(res);
        report.finalize();

        let html = render_html(&report);
        assert!(html.contains("95%"));
        assert!(html.contains("DE89370400440532013000"));
        assert!(html.contains("Valid German IBAN"));
    }

    #[test]
    fn test_snippets_are_escaped() {
        let mut report = Report::new(PathBuf::from("/data"));
        let mut res = ScanResult::new(PathBuf::from("/data/x.txt"));
        res.findings.push(Finding {
            kind: "Email".to_string(),
            snippet: "<script>alert(1)</script>".to_string(),
            confidence: 0.5,
            offset: 0,
            context: String::new(),
        });
        report.add_result(res);

        let html = render_html(&report);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_empty_report_renders_placeholder() {
        let report = Report::new(PathBuf::from("/data"));
        let html = render_html(&report);
        assert!(html.contains("No PII findings"));
        assert!(html.contains("<!DOCTYPE html>"));
    }
}

//! HTML rendering for report and failure notifications

use super::builder::Report;
use crate::domain::DETAIL_FIELDS;
use std::borrow::Cow;
use std::fmt::Write;

const STYLE: &str = "body { font-family: Calibri, Arial, sans-serif; font-size: 11pt; }\n\
table { border-collapse: collapse; margin-bottom: 1em; }\n\
th, td { border: 1px solid #999999; padding: 2px 8px; text-align: left; }\n\
th { background-color: #dddddd; }\n\
td.number { text-align: right; }\n";

/// Escapes text for use inside HTML element content and attribute values
pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// Renders the report as a complete HTML document
///
/// An empty report renders the intro sentence only.
pub fn render_html(report: &Report) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<p>{}</p>", escape_html(&report.intro));

    if !report.is_empty() {
        body.push_str("<table>\n<tr><th>Country</th><th>Total</th></tr>\n");
        for row in &report.countries {
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td class=\"number\">{}</td></tr>",
                escape_html(&row.country),
                row.count
            );
        }
        body.push_str("</table>\n");

        body.push_str("<table>\n<tr>");
        for field in DETAIL_FIELDS {
            let _ = write!(body, "<th>{}</th>", escape_html(field.header()));
        }
        body.push_str("</tr>\n");
        for row in &report.details {
            body.push_str("<tr>");
            for cell in &row.cells {
                let _ = write!(body, "<td>{}</td>", escape_html(cell));
            }
            body.push_str("</tr>\n");
        }
        body.push_str("</table>\n");
        body.push_str("<p><i>* Check the attachment for details</i></p>\n");
    }

    document(&report.subject, &body)
}

/// Renders the admin notification for a failed run
pub fn render_failure_html(job: &str, error: &str) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<p>The job <b>{}</b> failed and no report was sent to its recipients.</p>",
        escape_html(job)
    );
    let _ = writeln!(body, "<p>Error:</p>\n<pre>{}</pre>", escape_html(error));
    document(&format!("{job} - failure"), &body)
}

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
         <style>\n{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape_html(title)
    )
}

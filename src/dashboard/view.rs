//! HTML rendering for the dashboard page

use crate::measurement::Measurement;
use std::fmt::Write;

pub struct DashboardPage<'a> {
    pub sites: &'a [String],
    pub results: &'a [Measurement],
    pub average_load_time: Option<f64>,
    pub alert_threshold: f64,
}

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn site_list(sites: &[String]) -> String {
    let mut html = String::new();
    for site in sites {
        let site = escape_html(site);
        let _ = write!(
            html,
            r#"
      <li>
        {site}
        <form class="remove-form" method="GET" action="/remove" onsubmit="return confirm('Remove this website?');">
          <input type="hidden" name="url" value="{site}">
          <button type="submit" class="remove-btn">Remove</button>
        </form>
      </li>"#
        );
    }
    html
}

fn result_rows(results: &[Measurement], alert_threshold: f64) -> String {
    if results.is_empty() {
        return r#"<tr><td colspan="3">No data yet</td></tr>"#.to_string();
    }

    let mut html = String::new();
    for result in results {
        let class = if result.exceeds(alert_threshold) { " class=\"slow\"" } else { "" };
        let _ = write!(
            html,
            r#"
      <tr{class}>
        <td>{}</td>
        <td>{:.3}</td>
        <td>{}</td>
      </tr>"#,
            escape_html(&result.url),
            result.load_time,
            escape_html(&result.timestamp),
        );
    }
    html
}

pub fn render_dashboard(page: &DashboardPage<'_>) -> String {
    let summary = page
        .average_load_time
        .map(|avg| format!("Average Load Time: <b>{:.3} s</b>", avg))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <title>Web Page Load Monitor</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
      body {{ margin: 0; min-height: 100vh; background: linear-gradient(135deg, #74ebd5 0%, #acb6e5 100%); font-family: Arial, sans-serif; }}
      .container {{ max-width: 950px; margin: 40px auto; background: #fff; border-radius: 18px; box-shadow: 0 8px 32px rgba(44, 62, 80, 0.18); padding: 36px 28px 28px; }}
      h1 {{ text-align: center; color: #2d3a4b; }}
      ul.websites {{ list-style: none; padding: 0; }}
      ul.websites li {{ margin: 6px 0; font-size: 16px; }}
      .remove-form {{ display: inline; }}
      .remove-btn {{ background: none; border: none; color: #d8000c; cursor: pointer; }}
      .add-form {{ display: flex; gap: 10px; margin-bottom: 18px; }}
      .add-form input[type="text"] {{ flex: 1; padding: 10px; font-size: 16px; }}
      .actions {{ display: flex; justify-content: center; gap: 12px; margin-bottom: 22px; }}
      .summary {{ margin: 18px 0 10px; font-size: 22px; text-align: center; color: #2d3a4b; }}
      table {{ border-collapse: collapse; width: 100%; margin-top: 18px; }}
      th, td {{ border: 1px solid #e3e6ea; padding: 14px 10px; text-align: center; }}
      th {{ background: #f3f6fa; color: #0078d4; }}
      tr.slow td {{ background: #fdecea; color: #a8071a; }}
    </style>
  </head>
  <body>
    <div class="container">
      <h1>Web Page Load Monitor</h1>
      <div class="websites-section">
        <b>Websites to Monitor:</b>
        <ul class="websites">{sites}
        </ul>
        <form class="add-form" method="POST" action="/add">
          <input type="text" name="newUrl" placeholder="Add new website URL (https://...)" required>
          <button type="submit">Add Website</button>
        </form>
      </div>
      <div class="actions">
        <form method="POST" action="/run" onsubmit="return confirm('Are you sure you want to run monitoring now?');">
          <button type="submit">Run Monitoring Now</button>
        </form>
        <a href="/download" class="download-btn">Download Latest Report (CSV)</a>
      </div>
      <div class="summary">{summary}</div>
      <h2>Latest Results</h2>
      <table>
        <tr>
          <th>URL</th>
          <th>Load Time (s)</th>
          <th>Timestamp</th>
        </tr>{rows}
      </table>
    </div>
  </body>
</html>
"#,
        sites = site_list(page.sites),
        summary = summary,
        rows = result_rows(page.results, page.alert_threshold),
    )
}

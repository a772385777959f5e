//! Standalone HTML export of a session's notes.

use chrono::{DateTime, Utc};

const DEFAULT_TITLE: &str = "Study Notes";

/// Render notes as a self-contained HTML page.
///
/// `content` is editor HTML and is embedded as-is; the title is escaped.
pub fn render_notes_html(title: &str, content: &str, downloaded_at: DateTime<Utc>) -> String {
    let title = if title.trim().is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        escape_html(title)
    };
    let downloaded = downloaded_at.format("%Y-%m-%d %H:%M:%S UTC");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <style>
    body {{
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', 'Oxygen', 'Ubuntu', 'Cantarell', sans-serif;
      max-width: 800px;
      margin: 40px auto;
      padding: 20px;
      line-height: 1.6;
      color: #333;
    }}
    h1 {{
      color: #FF6B6B;
      border-bottom: 3px solid #FF6B6B;
      padding-bottom: 10px;
    }}
    .metadata {{
      color: #6B7280;
      font-size: 14px;
      margin-bottom: 30px;
    }}
    .content {{
      background: #fff;
      padding: 20px;
      border-radius: 8px;
    }}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <div class="metadata">
    <p>Downloaded on: {downloaded}</p>
  </div>
  <div class="content">
    {content}
  </div>
</body>
</html>
"#
    )
}

/// File name for the download, safe to put inside a quoted
/// `Content-Disposition` parameter.
pub fn export_filename(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '"' | '\\' | '/'))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "notes.html".to_string()
    } else {
        format!("{cleaned}.html")
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

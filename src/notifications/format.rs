//! Rendering anomalies into notification text

use crate::models::Anomaly;

/// Title and plain-text body for an anomaly
pub fn format_alert(anomaly: &Anomaly) -> (String, String) {
    let indicator = &anomaly.indicator;
    let title = format!(
        "[{}] {}: {} ({})",
        anomaly.severity,
        anomaly.anomaly_type.label(),
        indicator.name_en,
        indicator.name_zh
    );

    let target = match indicator.target_value {
        Some(target) => format!("{} {}", indicator.comparison.symbol(), target),
        None => "none".to_string(),
    };

    let mut lines = vec![
        format!("Indicator: #{} {} ({})", indicator.id, indicator.name_en, indicator.category),
        format!("Current value: {}", indicator.current_value),
        format!("Target: {}", target),
    ];
    if let Some(details) = &anomaly.details {
        lines.push(format!("Details: {}", details));
    }
    lines.push(format!("Time: {}", anomaly.timestamp.to_rfc3339()));

    (title, lines.join("\n"))
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
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

pub fn html_body(title: &str, message: &str) -> String {
    let lines: Vec<String> = message.lines().map(escape_html).collect();
    format!(
        "<h2>{}</h2>\n<p>{}</p>",
        escape_html(title),
        lines.join("<br/>\n")
    )
}

pub fn markdown_body(title: &str, message: &str) -> String {
    let lines: Vec<String> = message.lines().map(|line| format!("> {}", line)).collect();
    format!("### {}\n\n{}", title, lines.join("\n\n"))
}

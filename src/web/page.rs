//! HTML rendering of the assessment pages

use crate::error::AssessmentError;
use crate::types::domain::Domain;
use crate::types::verdict::Assessment;
use std::collections::HashMap;

/// Disclaimer shown at the bottom of every page
pub const FOOTER_DISCLAIMER: &str = "HealthGuard - Clinical Decision Support System | For research purposes only | Consult a healthcare professional for medical advice";

const STYLE: &str = r#"
:root {
    --primary-color: #2c3e50;
    --secondary-color: #3498db;
    --background-color: #f8f9fa;
    --success-color: #27ae60;
    --danger-color: #e74c3c;
}
body { margin: 0; font-family: sans-serif; background-color: var(--background-color); display: flex; min-height: 100vh; }
.sidebar { width: 240px; background-color: var(--primary-color); padding: 20px; color: white; }
.sidebar h2 { margin-top: 0; }
.sidebar a { display: block; color: white; text-decoration: none; font-size: 16px; margin: 10px 0; padding: 10px; border-radius: 8px; }
.sidebar a.selected { background-color: var(--secondary-color); }
.main { flex: 1; padding: 30px 40px 80px; }
.title-text { color: var(--primary-color); border-bottom: 3px solid var(--secondary-color); padding-bottom: 10px; margin-bottom: 30px; }
.banner { background-color: #fdecea; color: #a12622; border-radius: 8px; padding: 12px 16px; margin-bottom: 12px; }
.grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 16px 24px; }
.field label { display: block; margin-bottom: 6px; }
.field input { width: 100%; box-sizing: border-box; border: 2px solid #dcdde1; border-radius: 8px; padding: 12px; font-size: 16px; }
.field input:focus { border-color: var(--secondary-color); outline: none; }
.field.invalid input { border-color: var(--danger-color); }
button { margin-top: 24px; background-color: var(--secondary-color); color: white; border-radius: 25px; padding: 14px 28px; font-size: 16px; font-weight: 600; border: none; width: 100%; cursor: pointer; }
button:hover { background-color: #2980b9; }
button:disabled { background-color: #95a5a6; cursor: not-allowed; }
.inline-error { color: var(--danger-color); margin-top: 16px; }
.result-card { padding: 25px; border-radius: 15px; margin: 25px 0; color: white; text-align: center; font-size: 18px; box-shadow: 0 4px 6px rgba(0,0,0,0.1); }
.footer { position: fixed; bottom: 0; left: 0; width: 100%; background-color: var(--primary-color); color: white; text-align: center; padding: 10px; font-size: 12px; }
"#;

/// What a domain tab shows below its form
#[derive(Debug)]
pub enum TabState {
    /// Nothing submitted yet
    Idle,
    /// Submission rejected; the form is shown again with an inline error
    Rejected(AssessmentError),
    /// Verdict card for a completed assessment
    Rendered(Assessment),
}

impl From<Result<Assessment, AssessmentError>> for TabState {
    fn from(outcome: Result<Assessment, AssessmentError>) -> Self {
        match outcome {
            Ok(assessment) => TabState::Rendered(assessment),
            Err(e) => TabState::Rejected(e),
        }
    }
}

/// Everything needed to render one domain page
pub struct PageView<'a> {
    pub domain: Domain,
    /// Text the user last submitted, echoed back into the inputs
    pub values: &'a HashMap<String, String>,
    pub state: &'a TabState,
    /// Startup load errors, shown on every page
    pub load_errors: &'a [&'a AssessmentError],
    pub available: bool,
}

/// Escape text for inclusion in HTML content or attribute values.
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

fn layout(selected: Option<Domain>, load_errors: &[&AssessmentError], body: &str) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str(&format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>HealthGuard - Disease Prediction System</title>\n<style>{}</style>\n</head>\n<body>\n",
        STYLE
    ));

    html.push_str("<nav class=\"sidebar\">\n<h2>\u{1F3E5} HealthGuard</h2>\n");
    for domain in Domain::ALL {
        let class = if Some(domain) == selected { " class=\"selected\"" } else { "" };
        html.push_str(&format!(
            "<a href=\"/{}\"{}>{}</a>\n",
            domain.slug(),
            class,
            escape_html(domain.display_name())
        ));
    }
    html.push_str("</nav>\n<main class=\"main\">\n");

    for error in load_errors {
        html.push_str(&format!(
            "<div class=\"banner\" role=\"alert\">{}</div>\n",
            escape_html(&error.to_string())
        ));
    }

    html.push_str(body);

    html.push_str(&format!(
        "</main>\n<div class=\"footer\"><p>{}</p></div>\n</body>\n</html>\n",
        escape_html(FOOTER_DISCLAIMER)
    ));

    html
}

fn inline_error(error: &AssessmentError) -> String {
    let text = match error {
        AssessmentError::InvalidInput { problems, .. } => format!(
            "Please enter a valid number in every field. {}",
            problems
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        ),
        other => other.to_string(),
    };

    format!(
        "<div class=\"inline-error\" role=\"alert\">{}</div>\n",
        escape_html(&text)
    )
}

fn result_card(assessment: &Assessment) -> String {
    let message = &assessment.message;
    format!(
        "<div class=\"result-card {}\" style=\"background-color: {};\">\n\
         <h3>{} {}</h3>\n<p>{}</p>\n</div>\n",
        assessment.verdict.as_str(),
        message.severity.color(),
        message.severity.icon(),
        escape_html(message.headline),
        escape_html(message.advice)
    )
}

/// Render a domain page with its form and current tab state.
pub fn render_domain_page(view: &PageView<'_>) -> String {
    let domain = view.domain;
    let invalid: Vec<&str> = match view.state {
        TabState::Rejected(e) => e.invalid_fields(),
        _ => Vec::new(),
    };

    let mut body = String::with_capacity(4 * 1024);
    body.push_str(&format!(
        "<h1 class=\"title-text\">{}</h1>\n\
         <form method=\"post\" action=\"/{}\">\n<div class=\"grid\">\n",
        escape_html(domain.page_title()),
        domain.slug()
    ));

    for field in domain.fields() {
        let value = view.values.get(field.key).map(String::as_str).unwrap_or("");
        let class = if invalid.contains(&field.key) { "field invalid" } else { "field" };
        body.push_str(&format!(
            "<div class=\"{}\"><label for=\"{key}\">{}</label>\
             <input type=\"text\" id=\"{key}\" name=\"{key}\" value=\"{}\"></div>\n",
            class,
            escape_html(field.label),
            escape_html(value),
            key = field.key
        ));
    }

    let disabled = if view.available { "" } else { " disabled" };
    body.push_str(&format!(
        "</div>\n<button type=\"submit\"{}>{}</button>\n</form>\n",
        disabled,
        escape_html(domain.submit_label())
    ));

    match view.state {
        TabState::Idle => {}
        TabState::Rejected(e) => body.push_str(&inline_error(e)),
        TabState::Rendered(assessment) => body.push_str(&result_card(assessment)),
    }

    layout(Some(domain), view.load_errors, &body)
}

/// Render the page shown for an unknown domain path.
pub fn render_not_found(path: &str, load_errors: &[&AssessmentError]) -> String {
    let body = format!(
        "<h1 class=\"title-text\">Page not found</h1>\n<p>No assessment named \"{}\". \
         Choose one from the menu.</p>\n",
        escape_html(path)
    );
    layout(None, load_errors, &body)
}

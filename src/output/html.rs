//! Server-rendered HTML pages
//!
//! Pages are plain strings built with `format!`; every value taken from a
//! scan record goes through [`escape_html`].

use crate::output::labels::Labels;
use crate::storage::ScanRecord;
use crate::summary::Lang;

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:960px;margin:0 auto;padding:24px}\
section{border:1px solid #ddd;border-radius:6px;padding:16px;margin-bottom:16px}\
table{width:100%;border-collapse:collapse;font-size:14px}\
th,td{text-align:left;padding:6px;border-top:1px solid #ddd}\
.score{font-size:20px;font-weight:600}";

/// Escapes text for use in HTML element content and attribute values
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

fn page(lang: Lang, title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        lang.as_str(),
        escape_html(title),
        STYLE,
        body
    )
}

fn optional_text(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(escape_html)
        .unwrap_or_else(|| "-".to_string())
}

fn list(tag: &str, items: &[String]) -> String {
    let items: String = items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect();
    format!("<{tag}>{items}</{tag}>")
}

/// Renders the report page for a stored scan
pub fn render_report_page(record: &ScanRecord) -> String {
    let labels = Labels::for_lang(record.lang);
    let signals = &record.signals;
    let id = escape_html(&record.id);

    let body = format!(
        "<header><h1>{report}</h1><p><a href=\"/?lang={lang}\">{new_analysis}</a></p>\
         <p>{url}</p></header>\n\
         <section><h2>{tech}</h2><ul>\
         <li>HTTPS: {https}</li><li>{viewport_label}: {viewport}</li>\
         <li>{scripts_label}: {scripts}</li><li>{images_label}: {images}</li></ul></section>\n\
         <section><h2>{content}</h2><ul>\
         <li>{title_label}: {title}</li><li>{description_label}: {description}</li>\
         <li>H1: {h1}</li></ul></section>\n\
         <section><h2>{gdpr}</h2><ul>\
         <li>{cookie_label}: {cookie}</li><li>{privacy_label}: {privacy}</li></ul></section>\n\
         <section><h2>{summary}</h2>\
         <h3>{good_label}</h3>{good}<h3>{issues_label}</h3>{issues}\
         <h3>{steps_label}</h3>{steps}</section>\n\
         <section class=\"score\">{overall}: {score}</section>\n\
         <p><a href=\"/report/{id}/report.pdf\">{download_pdf}</a> \
         <a href=\"/report/{id}/report.md\">{download}</a></p>",
        report = labels.report,
        lang = record.lang.as_str(),
        new_analysis = labels.new_analysis,
        url = escape_html(&record.url),
        tech = labels.tech,
        https = labels.yes_no(signals.has_https),
        viewport_label = labels.viewport,
        viewport = labels.yes_no(signals.has_viewport_meta),
        scripts_label = labels.scripts,
        scripts = signals.script_count,
        images_label = labels.images,
        images = signals.img_count,
        content = labels.content,
        title_label = labels.title,
        title = optional_text(&signals.title),
        description_label = labels.description,
        description = optional_text(&signals.meta_description),
        h1 = optional_text(&signals.h1),
        gdpr = escape_html(labels.gdpr),
        cookie_label = labels.cookie_hints,
        cookie = if signals.has_cookie_words {
            labels.detected
        } else {
            labels.missing
        },
        privacy_label = labels.privacy_link,
        privacy = if signals.privacy_policy_url_found {
            labels.found
        } else {
            labels.not_found
        },
        summary = labels.summary,
        good_label = escape_html(labels.good),
        good = list("ul", &record.summary.good),
        issues_label = labels.issues,
        issues = list("ul", &record.summary.issues),
        steps_label = labels.steps,
        steps = list("ol", &record.summary.steps),
        overall = labels.overall_score,
        score = record.score,
        id = id,
        download = labels.download_markdown,
        download_pdf = labels.download_pdf,
    );

    page(record.lang, labels.report, &body)
}

/// Renders the admin table of recent scans
pub fn render_admin_page(records: &[ScanRecord]) -> String {
    let rows: String = records
        .iter()
        .map(|record| {
            format!(
                "<tr><td>{}</td><td><a href=\"/report/{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                record.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                escape_html(&record.id),
                escape_html(&record.url),
                optional_text(&record.email),
                record.score,
                record.lang
            )
        })
        .collect();

    let body = format!(
        "<h1>Admin</h1>\n<table>\n<thead><tr><th>Date</th><th>URL</th><th>Email</th>\
         <th>Score</th><th>Lang</th></tr></thead>\n<tbody>\n{}</tbody>\n</table>\n\
         <p><a href=\"/admin/export.csv\">Export CSV</a></p>",
        rows
    );

    page(Lang::En, "Admin", &body)
}

/// Renders the landing page with the analysis form
pub fn render_landing_page(lang: Lang) -> String {
    let (heading, button, placeholder) = match lang {
        Lang::En => ("AI Website Assistant", "Analyze", "https://your-site.com"),
        Lang::Fi => ("AI-verkkosivuavustaja", "Analysoi", "https://sivustosi.fi"),
    };

    let body = format!(
        "<h1>{heading}</h1>\n\
         <form id=\"scan\"><input name=\"url\" required placeholder=\"{placeholder}\">\
         <select name=\"lang\"><option value=\"en\"{en}>EN</option><option value=\"fi\"{fi}>FI</option></select>\
         <input name=\"email\" type=\"email\" placeholder=\"email (optional)\">\
         <button type=\"submit\">{button}</button></form>\n<p id=\"error\"></p>\n\
         <script>document.getElementById('scan').addEventListener('submit',async e=>{{\
         e.preventDefault();const f=new FormData(e.target);const body={{url:f.get('url'),lang:f.get('lang')}};\
         if(f.get('email'))body.email=f.get('email');\
         const r=await fetch('/api/analyze',{{method:'POST',headers:{{'Content-Type':'application/json'}},body:JSON.stringify(body)}});\
         const d=await r.json();if(r.ok){{location.href='/report/'+d.id}}else{{document.getElementById('error').textContent=d.error}}}});\
         </script>",
        heading = heading,
        placeholder = placeholder,
        button = button,
        en = if lang == Lang::En { " selected" } else { "" },
        fi = if lang == Lang::Fi { " selected" } else { "" },
    );

    page(lang, heading, &body)
}

/// Renders the page shown for unknown report ids
pub fn render_not_found_page() -> String {
    page(Lang::En, "Not found", "<h1>Not found</h1>")
}

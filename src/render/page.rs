//! Bootstrap page shell shared by all services.

const HEAD: &str = r#"<meta charset="utf-8">
<meta http-equiv="X-UA-Compatible" content="IE=edge">
<meta name="viewport" content="width=device-width, initial-scale=1">
<link rel="stylesheet" href="https://maxcdn.bootstrapcdn.com/bootstrap/3.3.5/css/bootstrap.min.css">
<link rel="stylesheet" href="https://maxcdn.bootstrapcdn.com/bootstrap/3.3.5/css/bootstrap-theme.min.css">
<script src="https://ajax.googleapis.com/ajax/libs/jquery/2.1.4/jquery.min.js"></script>
<script src="https://maxcdn.bootstrapcdn.com/bootstrap/3.3.5/js/bootstrap.min.js"></script>"#;

/// Wrap `body` in a complete HTML document.
///
/// `title` is escaped, `body` is inserted verbatim.
pub fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n{}\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        HEAD,
        escape_html(title),
        body
    )
}

/// The "Hello! This is the ... service" page every leaf service serves on `/`.
pub fn service_page(service: &str, content: &str, extra: &str) -> String {
    let service = escape_html(service);
    page(
        &format!("Book {} service", service),
        &format!(
            "<p><h2>Hello! This is the book {} service. My content is</h2></p>\n<div>{}</div>\n{}",
            service, content, extra
        ),
    )
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

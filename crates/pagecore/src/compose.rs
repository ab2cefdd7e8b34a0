use lazy_static::lazy_static;
use regex::Regex;

use crate::source::{SourceKind, SourceSet};

lazy_static! {
    // Doctype, <html>/<body> wrapper tags and the entire <head> section are
    // removed before the markup is spliced into the preview's own wrapper.
    static ref PAGE_CHROME: Regex = Regex::new(
        r"(?is)<!DOCTYPE[^>]*>|<html[^>]*>|</html>|<head[^>]*>.*?</head>|<body[^>]*>|</body>"
    )
    .expect("Invalid PAGE_CHROME regex pattern");
}

/// Strips top-level document wrapper tags from the markup buffer so it can
/// be embedded in the preview document without nesting documents. Markup
/// with no wrapper tags passes through unchanged.
pub fn strip_page_chrome(html: &str) -> String {
    PAGE_CHROME.replace_all(html, "").into_owned()
}

/// Builds the renderer-ready preview document from the three buffers: a
/// style block with the verbatim CSS, the stripped markup, then a script
/// block with the verbatim JS.
///
/// This is direct textual splicing. A buffer containing a literal
/// `</style>` or `</script>` sequence will terminate its block early; that
/// is a deliberate simplicity trade-off, not something to sanitize away.
pub fn compose_preview(sources: &SourceSet) -> String {
    let body = strip_page_chrome(sources.get(SourceKind::Html));
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <style>{css}</style>\n\
         </head>\n\
         <body>\n\
         {body}\n\
         <script>{js}</script>\n\
         </body>\n\
         </html>\n",
        css = sources.get(SourceKind::Css),
        body = body,
        js = sources.get(SourceKind::Js),
    )
}

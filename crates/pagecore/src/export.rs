use crate::source::{SourceKind, SourceSet};

pub const EXPORT_FILE_NAME: &str = "project.html";
pub const EXPORT_CONTENT_TYPE: &str = "text/html";

/// The single-file serialization of a project, ready to be handed to the
/// host's save mechanism. Derived on demand, never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub file_name: &'static str,
    pub content_type: &'static str,
}

/// Serializes the three buffers into one standalone document: the raw
/// markup first, then the CSS in a style block, then the JS in a script
/// block, each section under a marker comment.
///
/// Unlike the preview composition, the markup buffer's own wrapper tags are
/// kept verbatim here. The exported file reproduces the preview in a
/// browser without the tool; a pure function, so unchanged buffers always
/// yield byte-identical artifacts.
pub fn export(sources: &SourceSet) -> ExportArtifact {
    let document = format!(
        "<!-- HTML File -->\n\
         {html}\n\
         \n\
         <!-- CSS File -->\n\
         <style>\n\
         {css}\n\
         </style>\n\
         \n\
         <!-- JavaScript File -->\n\
         <script>\n\
         {js}\n\
         </script>\n",
        html = sources.get(SourceKind::Html),
        css = sources.get(SourceKind::Css),
        js = sources.get(SourceKind::Js),
    );

    ExportArtifact {
        bytes: document.into_bytes(),
        file_name: EXPORT_FILE_NAME,
        content_type: EXPORT_CONTENT_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_is_idempotent() {
        let set = SourceSet::default();
        assert_eq!(export(&set), export(&set));
    }

    #[test]
    fn test_export_keeps_wrapper_tags() {
        let mut set = SourceSet::empty();
        set.set(SourceKind::Html, "<html><body>Y</body></html>".to_string());
        let artifact = export(&set);
        let text = String::from_utf8(artifact.bytes).unwrap();
        assert!(text.contains("<html><body>Y</body></html>"));
    }

    #[test]
    fn test_export_section_order() {
        let mut set = SourceSet::empty();
        set.set(SourceKind::Html, "<p>m</p>".to_string());
        set.set(SourceKind::Css, "p {}".to_string());
        set.set(SourceKind::Js, "1 + 1".to_string());

        let text = String::from_utf8(export(&set).bytes).unwrap();
        let markup = text.find("<p>m</p>").unwrap();
        let style = text.find("<style>").unwrap();
        let script = text.find("<script>").unwrap();
        assert!(markup < style);
        assert!(style < script);
    }

    #[test]
    fn test_export_metadata() {
        let artifact = export(&SourceSet::empty());
        assert_eq!(artifact.file_name, "project.html");
        assert_eq!(artifact.content_type, "text/html");
    }
}

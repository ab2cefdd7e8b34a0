#[cfg(test)]
mod unit_tests {
    use super::super::*;

    #[test]
    fn test_preview_strips_but_export_does_not() {
        let mut set = SourceSet::empty();
        set.set(
            SourceKind::Html,
            "<html><body>Y</body></html>".to_string(),
        );

        let preview = compose::compose_preview(&set);
        assert!(!preview.contains("<html><body>Y</body></html>"));
        assert!(preview.contains("Y"));

        let exported = String::from_utf8(export::export(&set).bytes).unwrap();
        assert!(exported.contains("<html><body>Y</body></html>"));
    }

    #[test]
    fn test_default_session_composes_cleanly() {
        let set = SourceSet::default();
        let preview = compose::compose_preview(&set);
        // The welcome page's own wrapper must not nest inside the preview's.
        assert_eq!(preview.matches("<body").count(), 1);
        assert!(preview.contains("Welcome to Triptych"));
        assert!(preview.contains("changeColor"));
        assert!(!preview.contains("<meta charset"));
    }

    #[test]
    fn test_reset_session_round_trip() {
        let mut set = SourceSet::default();
        set.reset();

        let preview = compose::compose_preview(&set);
        assert!(preview.contains(SourceKind::Html.placeholder()));
        assert!(preview.contains(SourceKind::Css.placeholder()));
        assert!(preview.contains(SourceKind::Js.placeholder()));

        let exported = String::from_utf8(export::export(&set).bytes).unwrap();
        assert!(exported.contains(SourceKind::Html.placeholder()));
    }

    #[test]
    fn test_empty_buffers_still_produce_documents() {
        let set = SourceSet::empty();
        let preview = compose::compose_preview(&set);
        assert!(preview.contains("<style></style>"));
        assert!(preview.contains("<script></script>"));

        let artifact = export::export(&set);
        assert!(!artifact.bytes.is_empty());
    }

    #[test]
    fn test_composition_reflects_latest_write_only() {
        let mut set = SourceSet::empty();
        set.set(SourceKind::Js, "first()".to_string());
        set.set(SourceKind::Js, "second()".to_string());
        let preview = compose::compose_preview(&set);
        assert!(preview.contains("second()"));
        assert!(!preview.contains("first()"));
    }
}

use serde::{Deserialize, Serialize};

/// The three kinds of source a project is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Html,
    Css,
    Js,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Html, SourceKind::Css, SourceKind::Js];

    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Html => "HTML",
            SourceKind::Css => "CSS",
            SourceKind::Js => "JS",
        }
    }

    /// File name the pane pretends to be, used to pick a syntax definition.
    pub fn file_name(&self) -> &'static str {
        match self {
            SourceKind::Html => "index.html",
            SourceKind::Css => "style.css",
            SourceKind::Js => "script.js",
        }
    }

    /// Fixed text a buffer is set to by `SourceSet::reset`.
    pub fn placeholder(&self) -> &'static str {
        match self {
            SourceKind::Html => "<!-- Start coding your HTML here -->",
            SourceKind::Css => "/* Start styling your CSS here */",
            SourceKind::Js => "// Start coding your JavaScript here",
        }
    }

    /// Built-in welcome page a fresh session starts with.
    pub fn default_text(&self) -> &'static str {
        match self {
            SourceKind::Html => DEFAULT_HTML,
            SourceKind::Css => DEFAULT_CSS,
            SourceKind::Js => DEFAULT_JS,
        }
    }
}

/// The three live buffers of a session. Exactly one buffer exists per kind
/// at all times; empty string is the empty state, never absence.
///
/// `revision` increases on every mutation so the shell can tell whether
/// anything changed since it last looked, without holding callbacks here.
#[derive(Debug, Clone)]
pub struct SourceSet {
    html: String,
    css: String,
    js: String,
    revision: u64,
}

impl SourceSet {
    /// An empty set, all three buffers blank.
    pub fn empty() -> Self {
        Self {
            html: String::new(),
            css: String::new(),
            js: String::new(),
            revision: 0,
        }
    }

    pub fn get(&self, kind: SourceKind) -> &str {
        match kind {
            SourceKind::Html => &self.html,
            SourceKind::Css => &self.css,
            SourceKind::Js => &self.js,
        }
    }

    /// Replaces a buffer's text wholesale. Content is taken as-is: malformed
    /// markup, style or script is the user's business and is only ever
    /// isolated downstream by the sandbox, never rejected here.
    pub fn set(&mut self, kind: SourceKind, text: String) {
        match kind {
            SourceKind::Html => self.html = text,
            SourceKind::Css => self.css = text,
            SourceKind::Js => self.js = text,
        }
        self.revision += 1;
    }

    /// Overwrites every buffer with its kind's placeholder. No undo.
    pub fn reset(&mut self) {
        self.html = SourceKind::Html.placeholder().to_string();
        self.css = SourceKind::Css.placeholder().to_string();
        self.js = SourceKind::Js.placeholder().to_string();
        self.revision += 1;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl Default for SourceSet {
    fn default() -> Self {
        Self {
            html: DEFAULT_HTML.to_string(),
            css: DEFAULT_CSS.to_string(),
            js: DEFAULT_JS.to_string(),
            revision: 0,
        }
    }
}

const DEFAULT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Triptych</title>
</head>
<body>
    <div class="container">
        <h1>Welcome to Triptych</h1>
        <p>Edit the code and see live results!</p>
        <button onclick="changeColor()">Change Color</button>
    </div>
</body>
</html>"#;

const DEFAULT_CSS: &str = r#"body {
    font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
    margin: 0;
    padding: 20px;
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    min-height: 100vh;
}

.container {
    max-width: 800px;
    margin: 0 auto;
    background: white;
    padding: 40px;
    border-radius: 10px;
    box-shadow: 0 10px 30px rgba(0,0,0,0.2);
    text-align: center;
}

h1 {
    color: #333;
    margin-bottom: 20px;
}

button {
    background: #667eea;
    color: white;
    border: none;
    padding: 12px 24px;
    border-radius: 5px;
    cursor: pointer;
    font-size: 16px;
    transition: background 0.3s;
}

button:hover {
    background: #5a67d8;
}"#;

const DEFAULT_JS: &str = r#"function changeColor() {
    const colors = ['#ff6b6b', '#4ecdc4', '#45b7d1', '#96ceb4', '#ffeaa7'];
    const randomColor = colors[Math.floor(Math.random() * colors.length)];
    document.querySelector('.container').style.background = randomColor;
}

document.addEventListener('DOMContentLoaded', function() {
    console.log('Triptych preview loaded');
});"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_present() {
        let set = SourceSet::default();
        for kind in SourceKind::ALL {
            assert!(!set.get(kind).is_empty());
        }
        assert_eq!(set.revision(), 0);
    }

    #[test]
    fn test_set_replaces_and_bumps_revision() {
        let mut set = SourceSet::empty();
        set.set(SourceKind::Css, "body { color: red }".to_string());
        assert_eq!(set.get(SourceKind::Css), "body { color: red }");
        assert_eq!(set.get(SourceKind::Html), "");
        assert_eq!(set.revision(), 1);

        set.set(SourceKind::Css, String::new());
        assert_eq!(set.get(SourceKind::Css), "");
        assert_eq!(set.revision(), 2);
    }

    #[test]
    fn test_malformed_content_accepted() {
        let mut set = SourceSet::empty();
        set.set(SourceKind::Html, "<div><p>unbalanced".to_string());
        set.set(SourceKind::Js, "throw new Error('boom')".to_string());
        assert_eq!(set.get(SourceKind::Html), "<div><p>unbalanced");
        assert_eq!(set.get(SourceKind::Js), "throw new Error('boom')");
    }

    #[test]
    fn test_reset_installs_placeholders() {
        let mut set = SourceSet::default();
        set.set(SourceKind::Html, "something else".to_string());
        set.reset();
        for kind in SourceKind::ALL {
            assert_eq!(set.get(kind), kind.placeholder());
        }
    }

    #[test]
    fn test_kind_serde_round_trip() {
        for kind in SourceKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            let back: SourceKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
        assert_eq!(serde_json::to_string(&SourceKind::Js).unwrap(), "\"js\"");
    }
}

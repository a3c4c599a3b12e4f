use maud::{DOCTYPE, Markup, PreEscaped, html};

use super::GalleryError;

// Client-side viewer. Expects `images` (array of names) and `thumbnails`
// (bool) to be declared before it runs.
const GALLERY_SCRIPT: &str = r#"
var current = 0;
var img = document.getElementById("img");

function show(index) {
  if (images.length === 0) { return; }
  current = index;
  img.src = "images/" + encodeURIComponent(images[current]);
}

function next() {
  if (images.length === 0) { return; }
  show((current + 1) % images.length);
}

function previous() {
  if (images.length === 0) { return; }
  show((current + images.length - 1) % images.length);
}

function thumbnailName(name) {
  var dot = name.lastIndexOf(".");
  var stem = dot > 0 ? name.slice(0, dot) : name;
  return stem + ".jpeg";
}

function buildThumbnails() {
  var table = document.getElementById("thumbs");
  var row = null;
  for (var i = 0; i < images.length; i++) {
    if (i % 5 === 0) {
      row = document.createElement("tr");
      table.appendChild(row);
    }
    var thumb = document.createElement("img");
    thumb.src = "thumbnails/" + encodeURIComponent(thumbnailName(images[i]));
    thumb.alt = images[i];
    thumb.onclick = (function (index) {
      return function () { show(index); };
    })(i);
    var cell = document.createElement("td");
    cell.appendChild(thumb);
    row.appendChild(cell);
  }
}

if (thumbnails) { buildThumbnails(); }
show(0);
"#;

/// Renders the gallery page. Built once at startup and shared by all requests.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    thumbnails: bool,
}

impl PageRenderer {
    pub fn new(thumbnails: bool) -> Self {
        Self { thumbnails }
    }

    pub fn thumbnails_enabled(&self) -> bool {
        self.thumbnails
    }

    pub fn render(&self, images: &[String]) -> Result<String, GalleryError> {
        let images_literal = script_array_literal(images)?;
        Ok(self.page(&images_literal).into_string())
    }

    fn page(&self, images_literal: &str) -> Markup {
        let globals = format!(
            "var images = {};\nvar thumbnails = {};\n",
            images_literal, self.thumbnails
        );

        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { "Images" }
                }
                body {
                    img id="img" alt="";
                    br;
                    br;
                    button type="button" onclick="previous()" { "Previous" }
                    " "
                    button type="button" onclick="next()" { "Next" }
                    @if self.thumbnails {
                        table id="thumbs" {}
                    }
                    script {
                        (PreEscaped(globals))
                        (PreEscaped(GALLERY_SCRIPT))
                    }
                }
            }
        }
    }
}

// JSON array of names, made safe to place inside a <script> element:
// characters that could end the element or break a JS string are emitted
// as \u escapes.
fn script_array_literal(images: &[String]) -> Result<String, GalleryError> {
    let json = serde_json::to_string(images).map_err(|e| GalleryError::Render(e.to_string()))?;

    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            _ => escaped.push(c),
        }
    }
    Ok(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_embeds_images_in_order() {
        let html = PageRenderer::new(true)
            .render(&names(&["a.gif", "b.gif", "c.gif"]))
            .unwrap();
        assert!(html.contains(r#"var images = ["a.gif","b.gif","c.gif"];"#));
    }

    #[test]
    fn test_page_structure() {
        let html = PageRenderer::new(true).render(&names(&["a.gif"])).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Images</title>"));
        assert!(html.contains(r#"<img id="img" alt="">"#));
        assert!(html.contains(r#"onclick="previous()""#));
        assert!(html.contains(r#"onclick="next()""#));
        assert!(html.contains(r#"<table id="thumbs"></table>"#));
        assert!(html.contains("var thumbnails = true;"));
        assert!(html.contains("i % 5 === 0"));
    }

    #[test]
    fn test_thumbnails_disabled() {
        let html = PageRenderer::new(false).render(&names(&["a.gif"])).unwrap();
        assert!(!html.contains(r#"id="thumbs""#));
        assert!(html.contains("var thumbnails = false;"));
    }

    #[test]
    fn test_empty_listing() {
        let html = PageRenderer::new(true).render(&[]).unwrap();
        assert!(html.contains("var images = [];"));
    }

    #[test]
    fn test_crafted_name_cannot_close_script() {
        let evil = "</script><script>alert(1)</script>.gif";
        let html = PageRenderer::new(true).render(&names(&[evil])).unwrap();

        assert_eq!(html.matches("</script>").count(), 1);
        assert!(!html.contains("<script>alert(1)"));
        assert!(html.contains(r"\u003c/script\u003e\u003cscript\u003ealert(1)"));
    }

    #[test]
    fn test_quotes_and_separators_are_escaped() {
        let literal = script_array_literal(&names(&["a\"b.gif", "x\u{2028}y", "c&d.gif"])).unwrap();
        assert_eq!(literal, r#"["a\"b.gif","x\u2028y","c\u0026d.gif"]"#);
    }
}

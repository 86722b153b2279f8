//! HTML page rendering.
//!
//! Templates are compiled into the binary and auto-escaped; only fruit info
//! text from the trusted metadata file is marked safe.

use axum::response::Html;
use minijinja::{context, Environment, HtmlEscape, Value};

/// Pre-parsed page templates.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("base.html", include_str!("../../templates/base.html"))?;
        env.add_template("upload.html", include_str!("../../templates/upload.html"))?;
        env.add_template("choose.html", include_str!("../../templates/choose.html"))?;
        env.add_template("data.html", include_str!("../../templates/data.html"))?;
        Ok(Self { env })
    }

    /// The upload form.
    pub fn upload(&self) -> Result<Html<String>, minijinja::Error> {
        self.render("upload.html", context! {})
    }

    /// Candidate fruits, best guess first.
    pub fn choose(&self, fruit_names: &[String]) -> Result<Html<String>, minijinja::Error> {
        self.render("choose.html", context! { fruit_names })
    }

    /// Info page for one fruit.
    pub fn fruit(&self, name: &str, info: String) -> Result<Html<String>, minijinja::Error> {
        self.render(
            "data.html",
            context! {
                name,
                info => Value::from_safe_string(info),
            },
        )
    }

    fn render(&self, name: &str, ctx: Value) -> Result<Html<String>, minijinja::Error> {
        let html = self.env.get_template(name)?.render(ctx)?;
        Ok(Html(html))
    }
}

/// Minimal standalone error page, usable without template state.
pub fn error_page(title: &str, message: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body><h1>{title}</h1><p>{message}</p><p><a href=\"/\">Back to upload</a></p></body>\n</html>\n",
        title = HtmlEscape(title),
        message = HtmlEscape(message),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_page_has_form() {
        let templates = Templates::new().unwrap();
        let Html(body) = templates.upload().unwrap();
        assert!(body.contains("enctype=\"multipart/form-data\""));
        assert!(body.contains("name=\"file\""));
    }

    #[test]
    fn test_choose_page_escapes_names() {
        let templates = Templates::new().unwrap();
        let Html(body) = templates
            .choose(&["Mango".to_string(), "<script>".to_string()])
            .unwrap();
        assert!(body.contains("/fruits/Mango"));
        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_fruit_page_keeps_info_markup() {
        let templates = Templates::new().unwrap();
        let Html(body) = templates
            .fruit("Lime", "<h3>STORE</h3>Keep cool.".to_string())
            .unwrap();
        assert!(body.contains("<h3>STORE</h3>Keep cool."));
        assert!(body.contains("<img src=\"/static/Lime.jpg\""));
    }

    #[test]
    fn test_fruit_page_image_path_with_spaces() {
        let templates = Templates::new().unwrap();
        let Html(body) = templates
            .fruit("Honeydew Melon", String::new())
            .unwrap();
        assert!(body.contains("<img src=\"/static/Honeydew Melon.jpg\""));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let Html(body) = error_page("Oops", "bad <input>");
        assert!(body.contains("bad &lt;input&gt;"));
        assert!(!body.contains("<input>"));
    }

    #[test]
    fn test_error_page_escapes_title() {
        let Html(body) = error_page("\"Not\" & Found", "gone");
        assert!(body.contains("<h1>&quot;Not&quot; &amp; Found</h1>"));
    }
}

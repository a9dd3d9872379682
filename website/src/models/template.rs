#[derive(Clone)]
pub struct TemplateData {
    pub title: String,
    pub authenticated: bool,
    pub scripts: Vec<String>,
}

impl TemplateData {
    pub fn new(title: &str, authenticated: bool) -> TemplateData {
        TemplateData {
            title: title.to_string(),
            authenticated,
            scripts: vec!["/assets/htmx.min.js".to_string()],
        }
    }

    pub fn without_scripts(mut self) -> Self {
        self.scripts.clear();
        self
    }
}

use tera::{Context, Tera};

use super::DashboardView;

const BASE_TEMPLATE: &str = include_str!("../../templates/base.html");
const DASHBOARD_TEMPLATE: &str = include_str!("../../templates/dashboard.html");
const ERROR_TEMPLATE: &str = include_str!("../../templates/error.html");

/// HTML renderer over the embedded templates.
///
/// Template names end in `.html`, so Tera autoescapes every interpolated value.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> tera::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", BASE_TEMPLATE),
            ("dashboard.html", DASHBOARD_TEMPLATE),
            ("error.html", ERROR_TEMPLATE),
        ])?;
        Ok(Self { tera })
    }

    pub fn dashboard(&self, view: &DashboardView) -> tera::Result<String> {
        let mut ctx = Context::new();
        ctx.insert("view", view);
        self.tera.render("dashboard.html", &ctx)
    }

    pub fn error(&self, message: &str) -> tera::Result<String> {
        let mut ctx = Context::new();
        ctx.insert("message", message);
        self.tera.render("error.html", &ctx)
    }
}

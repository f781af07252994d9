#![forbid(unsafe_code)]

use log::error;
use tera::{Context, Tera};

use crate::utils::errors::Errors;

// ***************************************************************************
//                                Constants
// ***************************************************************************
// Template names used by the route handlers.
pub const VIEW_HOME      : &str = "home";
pub const VIEW_INDEX     : &str = "index";
pub const VIEW_SHOW      : &str = "show";
pub const VIEW_NEW       : &str = "new";
pub const VIEW_EDIT      : &str = "edit";
pub const VIEW_NOT_FOUND : &str = "not_found";

// Templates are compiled into the binary.  The .html suffix turns on
// tera's autoescaping for every one of them.
const TEMPLATES: [(&str, &str); 7] = [
    ("layout.html",    include_str!("../../templates/layout.html")),
    ("home.html",      include_str!("../../templates/home.html")),
    ("index.html",     include_str!("../../templates/index.html")),
    ("show.html",      include_str!("../../templates/show.html")),
    ("new.html",       include_str!("../../templates/new.html")),
    ("edit.html",      include_str!("../../templates/edit.html")),
    ("not_found.html", include_str!("../../templates/not_found.html")),
];

// ---------------------------------------------------------------------------
// Views:
// ---------------------------------------------------------------------------
/** Renders a named view with a data payload into an html string. */
#[derive(Debug)]
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self, Errors> {
        let mut tera = Tera::default();
        if let Err(e) = tera.add_raw_templates(TEMPLATES.to_vec()) {
            error!("Unable to load templates: {}", e);
            return Err(Errors::TemplateError("*".to_string(), e));
        }
        Ok(Views { tera })
    }

    pub fn render(&self, view: &str, ctx: &Context) -> Result<String, Errors> {
        let name = format!("{}.html", view);
        self.tera.render(&name, ctx).map_err(|e| {
            error!("Rendering {} failed: {:?}", name, e);
            Errors::TemplateError(name, e)
        })
    }
}

#![forbid(unsafe_code)]

use std::sync::Arc;

use log::{error, info};
use poem::web::{Data, Form, Path};
use poem::{handler, IntoResponse, Request, Response, Result};

use crate::routes::{form_fields, redirect_to_list, render_not_found};
use crate::utils::errors::Errors;
use crate::utils::fruit_store::{parse_index, FruitStore};
use crate::utils::fruit_types::Fruit;
use crate::utils::fruit_utils::{debug_request, RequestDebug};
use crate::utils::views::Views;

// ***************************************************************************
//                          Request Definitions
// ***************************************************************************
pub struct ReqUpdateFruit
{
    index: String,
    fields: Vec<(String, String)>,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqUpdateFruit {
    fn get_request_info(&self) -> String {
        let mut s = String::with_capacity(255);
        s.push_str("  Request body:");
        s.push_str("\n    index: ");
        s.push_str(&self.index);
        for (key, value) in &self.fields {
            s.push_str(&format!("\n    {}: {}", key, value));
        }
        s
    }
}

// ***************************************************************************
//                                 Endpoint
// ***************************************************************************
// ---------------------------------------------------------------------------
// fruits_update:
// ---------------------------------------------------------------------------
/** Replace the record at the path's index with one built from the submitted
 * form.  An identifier that does not resolve to an existing record is
 * answered with 404 and the store is left untouched.
 */
#[handler]
pub async fn fruits_update(http_req: &Request,
                           Path(index): Path<String>,
                           form: Result<Form<Vec<(String, String)>>>,
                           store: Data<&Arc<FruitStore>>,
                           views: Data<&Arc<Views>>) -> Result<Response> {
    // Conditional logging depending on log level.
    let req = ReqUpdateFruit { index, fields: form_fields(form)? };
    debug_request(http_req, &req);

    match replace_fruit(&store, &req.index, Fruit::from_form(req.fields)) {
        Ok(()) => {
            info!("Updated fruit at index {}.", req.index);
            Ok(redirect_to_list().into_response())
        },
        Err(e) => {
            error!("{}", e);
            render_not_found(&views, e.to_string())
        },
    }
}

// ***************************************************************************
//                          Private Functions
// ***************************************************************************
fn replace_fruit(store: &FruitStore, index: &str, fruit: Fruit) -> Result<(), Errors> {
    match parse_index(index) {
        Some(i) => store.replace(i, fruit),
        None => Err(Errors::FruitNotFound(index.to_string())),
    }
}

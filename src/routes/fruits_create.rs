#![forbid(unsafe_code)]

use std::sync::Arc;

use log::{debug, info};
use poem::web::{Data, Form, Redirect};
use poem::{handler, Request, Result};

use crate::routes::{form_fields, redirect_to_list};
use crate::utils::fruit_store::FruitStore;
use crate::utils::fruit_types::Fruit;
use crate::utils::fruit_utils::{debug_request, RequestDebug};

// ***************************************************************************
//                          Request Definitions
// ***************************************************************************
pub struct ReqCreateFruit
{
    fields: Vec<(String, String)>,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqCreateFruit {
    fn get_request_info(&self) -> String {
        let mut s = String::with_capacity(255);
        s.push_str("  Request body:");
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
// fruits_create:
// ---------------------------------------------------------------------------
/** Append a record built from the submitted form.  The readyToEat checkbox
 * is normalized to a boolean; all other fields are stored as submitted.
 */
#[handler]
pub async fn fruits_create(http_req: &Request,
                           form: Result<Form<Vec<(String, String)>>>,
                           store: Data<&Arc<FruitStore>>) -> Result<Redirect> {
    // Conditional logging depending on log level.
    let req = ReqCreateFruit { fields: form_fields(form)? };
    debug_request(http_req, &req);

    let fruit = Fruit::from_form(req.fields);
    let name = fruit.name.clone();
    let index = store.append(fruit);
    info!("Created fruit '{}' at index {}, {} fruits stored.", name, index, store.len());
    debug!("Fruits: {:?}", store.list());

    Ok(redirect_to_list())
}

#![forbid(unsafe_code)]

use std::sync::Arc;

use log::debug;
use poem::web::{Data, Html};
use poem::{handler, Result};
use tera::Context;

use crate::routes::render_view;
use crate::utils::fruit_store::FruitStore;
use crate::utils::views::{Views, VIEW_INDEX};

// ***************************************************************************
//                                 Endpoint
// ***************************************************************************
// ---------------------------------------------------------------------------
// fruits_list:
// ---------------------------------------------------------------------------
/** Render every record.  The position of each record in the list is the
 * identifier the show, edit, update and delete routes expect.
 */
#[handler]
pub async fn fruits_list(store: Data<&Arc<FruitStore>>, views: Data<&Arc<Views>>) -> Result<Html<String>> {
    let fruits = store.list();
    debug!("Listing {} fruits.", fruits.len());

    let mut ctx = Context::new();
    ctx.insert("fruits", &fruits);
    render_view(&views, VIEW_INDEX, &ctx)
}

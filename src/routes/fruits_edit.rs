#![forbid(unsafe_code)]

use std::sync::Arc;

use poem::web::{Data, Html, Path};
use poem::{handler, Result};
use tera::Context;

use crate::routes::fruits_show::lookup_fruit;
use crate::routes::render_view;
use crate::utils::fruit_store::FruitStore;
use crate::utils::views::{Views, VIEW_EDIT};

// ***************************************************************************
//                                 Endpoint
// ***************************************************************************
// ---------------------------------------------------------------------------
// fruits_edit:
// ---------------------------------------------------------------------------
/** Render the edit form for one record.  The index is passed back to the
 * view so the form can address the update route.
 */
#[handler]
pub async fn fruits_edit(Path(index): Path<String>,
                         store: Data<&Arc<FruitStore>>,
                         views: Data<&Arc<Views>>) -> Result<Html<String>> {
    let fruit = lookup_fruit(&store, &index);

    let mut ctx = Context::new();
    ctx.insert("fruit", &fruit);
    ctx.insert("index", &index);
    render_view(&views, VIEW_EDIT, &ctx)
}

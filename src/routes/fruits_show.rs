#![forbid(unsafe_code)]

use std::sync::Arc;

use log::info;
use poem::web::{Data, Html, Path};
use poem::{handler, Result};
use tera::Context;

use crate::routes::render_view;
use crate::utils::fruit_store::{parse_index, FruitStore};
use crate::utils::fruit_types::Fruit;
use crate::utils::views::{Views, VIEW_SHOW};

// ***************************************************************************
//                                 Endpoint
// ***************************************************************************
// ---------------------------------------------------------------------------
// fruits_show:
// ---------------------------------------------------------------------------
/** Render one record.  An identifier that is not a number or is out of
 * range still renders the view, just without a fruit.
 */
#[handler]
pub async fn fruits_show(Path(index): Path<String>,
                         store: Data<&Arc<FruitStore>>,
                         views: Data<&Arc<Views>>) -> Result<Html<String>> {
    let fruit = lookup_fruit(&store, &index);

    let mut ctx = Context::new();
    ctx.insert("fruit", &fruit);
    render_view(&views, VIEW_SHOW, &ctx)
}

// ***************************************************************************
//                             Public Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// lookup_fruit:
// ---------------------------------------------------------------------------
/** Resolve the raw path identifier against the store. */
pub fn lookup_fruit(store: &FruitStore, index: &str) -> Option<Fruit> {
    let fruit = parse_index(index).and_then(|i| store.get(i));
    if fruit.is_none() {
        info!("No fruit at index {}.", index);
    }
    fruit
}

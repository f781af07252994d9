#![forbid(unsafe_code)]

use std::sync::Arc;

use log::info;
use poem::web::{Data, Path, Redirect};
use poem::handler;

use crate::routes::redirect_to_list;
use crate::utils::fruit_store::{parse_index, FruitStore};

// ***************************************************************************
//                                 Endpoint
// ***************************************************************************
// ---------------------------------------------------------------------------
// fruits_delete:
// ---------------------------------------------------------------------------
/** Remove one record, shifting every later record down one position.  An
 * identifier that resolves to no record deletes nothing.  Either way the
 * browser goes back to the list.
 */
#[handler]
pub async fn fruits_delete(Path(index): Path<String>, store: Data<&Arc<FruitStore>>) -> Redirect {
    match parse_index(&index).and_then(|i| store.remove_at(i)) {
        Some(fruit) => info!("Deleted fruit '{}' at index {}.", fruit.name, index),
        None => info!("No fruit at index {}, nothing deleted.", index),
    }
    redirect_to_list()
}

#![forbid(unsafe_code)]

use std::sync::Arc;

use poem::web::{Data, Html};
use poem::{handler, Result};
use tera::Context;

use crate::routes::render_view;
use crate::utils::views::{Views, VIEW_NEW};

// ***************************************************************************
//                                 Endpoint
// ***************************************************************************
// The creation form needs no data from the store.
#[handler]
pub async fn fruits_new(views: Data<&Arc<Views>>) -> Result<Html<String>> {
    render_view(&views, VIEW_NEW, &Context::new())
}

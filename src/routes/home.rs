#![forbid(unsafe_code)]

use std::sync::Arc;

use poem::web::{Data, Html};
use poem::{handler, Result};
use tera::Context;

use crate::routes::render_view;
use crate::utils::views::{Views, VIEW_HOME};

// ***************************************************************************
//                                 Endpoint
// ***************************************************************************
#[handler]
pub async fn home(views: Data<&Arc<Views>>) -> Result<Html<String>> {
    render_view(&views, VIEW_HOME, &Context::new())
}

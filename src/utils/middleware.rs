#![forbid(unsafe_code)]

use std::sync::Arc;

use log::{debug, info, warn};
use poem::http::Method;
use poem::{Endpoint, IntoResponse, Request, Response, Result};
use serde::Deserialize;

// Query parameter html forms use to tunnel PUT and DELETE through POST.
pub const METHOD_OVERRIDE_PARM: &str = "_method";

#[derive(Debug, Deserialize)]
struct MethodOverrideQuery {
    #[serde(rename = "_method")]
    method: Option<String>,
}

// ---------------------------------------------------------------------------
// method_override:
// ---------------------------------------------------------------------------
/** Rewrite a POST carrying a supported _method query parameter into the named
 * method before the request reaches the router.
 */
pub async fn method_override<E: Endpoint>(ep: Arc<E>, mut req: Request) -> Result<Response> {
    if let Some(method) = override_method(&req) {
        debug!("Overriding {} {} with method {}", req.method(), req.uri(), method);
        req.set_method(method);
    }
    Ok(ep.call(req).await?.into_response())
}

// ---------------------------------------------------------------------------
// override_method:
// ---------------------------------------------------------------------------
/** Only POST requests are eligible and only PUT, PATCH and DELETE can be
 * requested, in any letter case.
 */
pub fn override_method(req: &Request) -> Option<Method> {
    if req.method() != Method::POST {
        return None;
    }

    let query: MethodOverrideQuery = req.params().ok()?;
    let requested = query.method?.to_uppercase();
    match requested.as_str() {
        "PUT"    => Some(Method::PUT),
        "PATCH"  => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => {
            warn!("Ignoring unsupported {} value: {}", METHOD_OVERRIDE_PARM, requested);
            None
        },
    }
}

// ---------------------------------------------------------------------------
// log_request:
// ---------------------------------------------------------------------------
/** Log every request on the way in and its outcome on the way out. */
pub async fn log_request<E: Endpoint>(ep: Arc<E>, req: Request) -> Result<Response> {
    info!("{} request sent to {}", req.method(), req.uri());
    match ep.call(req).await {
        Ok(r) => {
            let resp = r.into_response();
            debug!("Response status: {}", resp.status());
            Ok(resp)
        },
        Err(e) => {
            info!("Request failed with status {}: {}", e.status(), e);
            Err(e)
        },
    }
}

#![forbid(unsafe_code)]

use std::sync::Arc;

use log::error;
use poem::error::InternalServerError;
use poem::http::StatusCode;
use poem::web::{Form, Html, Redirect};
use poem::{get, put, Endpoint, EndpointExt, IntoResponse, Response, Result, Route};
use poem_openapi::OpenApiService;
use tera::Context;

use crate::utils::config::Config;
use crate::utils::errors::Errors;
use crate::utils::fruit_store::FruitStore;
use crate::utils::middleware::{log_request, method_override};
use crate::utils::views::{Views, VIEW_NOT_FOUND};

pub mod fruits_create;
pub mod fruits_delete;
pub mod fruits_edit;
pub mod fruits_list;
pub mod fruits_new;
pub mod fruits_show;
pub mod fruits_update;
pub mod home;
pub mod version;

use version::VersionApi;

// ***************************************************************************
//                                Constants
// ***************************************************************************
// Every mutation redirects back to the list.
pub const FRUITS_PATH: &str = "/fruits";

// ---------------------------------------------------------------------------
// build_app:
// ---------------------------------------------------------------------------
/** Assemble the complete application: the fruit routes, the versioned
 * OpenAPI service and its documents, the shared store and views, and the
 * request middleware.  Method override wraps everything so the router
 * sees the effective method.
 */
pub fn build_app(store: Arc<FruitStore>, views: Arc<Views>, config: &Config) -> impl Endpoint {
    let api_service =
        OpenApiService::new(VersionApi, config.title.clone(), env!("CARGO_PKG_VERSION"))
            .server(format!("{}{}", config.base_url(), "/v1"));

    // Allow the generated openapi specs to be retrieved from the server.
    let spec = api_service.spec_endpoint();
    let spec_yaml = api_service.spec_endpoint_yaml();
    let ui = api_service.swagger_ui();

    Route::new()
        .at("/", get(home::home))
        .at(FRUITS_PATH, get(fruits_list::fruits_list).post(fruits_create::fruits_create))
        .at("/fruits/new", get(fruits_new::fruits_new))
        .at("/fruits/:index",
            get(fruits_show::fruits_show)
                .put(fruits_update::fruits_update)
                .patch(fruits_update::fruits_update)
                .delete(fruits_delete::fruits_delete))
        // Update forms may post to the index with a trailing slash.
        .at("/fruits/:index/", put(fruits_update::fruits_update))
        .at("/fruits/:index/edit", get(fruits_edit::fruits_edit))
        .nest("/v1", api_service)
        .nest("/docs", ui)
        .at("/spec", spec)
        .at("/spec_yaml", spec_yaml)
        .data(store)
        .data(views)
        .around(|ep, req| log_request(ep, req))
        .around(|ep, req| method_override(ep, req))
}

// ***************************************************************************
//                             Response Helpers
// ***************************************************************************
/// Render a view, turning template failures into a 500.
pub fn render_view(views: &Views, view: &str, ctx: &Context) -> Result<Html<String>> {
    let html = views.render(view, ctx).map_err(InternalServerError)?;
    Ok(Html(html))
}

/// Render the not found view with a 404 status.
pub fn render_not_found(views: &Views, msg: String) -> Result<Response> {
    let mut ctx = Context::new();
    ctx.insert("message", &msg);
    let html = render_view(views, VIEW_NOT_FOUND, &ctx)?;
    Ok(html.with_status(StatusCode::NOT_FOUND).into_response())
}

/// Unwrap a decoded form body, logging bodies that could not be decoded.
pub fn form_fields(form: Result<Form<Vec<(String, String)>>>) -> Result<Vec<(String, String)>> {
    match form {
        Ok(Form(fields)) => Ok(fields),
        Err(e) => {
            error!("{}", Errors::InvalidInput(e.to_string()));
            Err(e)
        },
    }
}

/// Send the browser back to the list with a GET.
pub fn redirect_to_list() -> Redirect {
    Redirect::see_other(FRUITS_PATH)
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fruit_types::Fruit;
    use poem::http::header::LOCATION;
    use poem::test::{TestClient, TestResponse};

    fn test_client(fruits: Vec<Fruit>) -> (TestClient<impl Endpoint>, Arc<FruitStore>) {
        let store = Arc::new(FruitStore::new(fruits));
        let views = Arc::new(Views::new().unwrap());
        let app = build_app(store.clone(), views, &Config::new());
        (TestClient::new(app), store)
    }

    fn apple() -> Fruit {
        Fruit::new("apple", "red", true)
    }

    fn pear() -> Fruit {
        Fruit::new("pear", "green", false)
    }

    async fn body(resp: TestResponse) -> String {
        resp.0.into_body().into_string().await.unwrap()
    }

    fn assert_redirect_to_list(resp: &TestResponse) {
        resp.assert_status(StatusCode::SEE_OTHER);
        resp.assert_header(LOCATION, FRUITS_PATH);
    }

    #[tokio::test]
    async fn home_links_to_list() {
        let (cli, _) = test_client(vec![]);
        let resp = cli.get("/").send().await;
        resp.assert_status_is_ok();
        assert!(body(resp).await.contains("href=\"/fruits\""));
    }

    #[tokio::test]
    async fn list_renders_all_fruits_in_order() {
        let (cli, _) = test_client(vec![apple(), pear()]);
        let first = body(cli.get("/fruits").send().await).await;
        let second = body(cli.get("/fruits").send().await).await;
        assert_eq!(first, second);
        let apple_at = first.find("apple").unwrap();
        let pear_at = first.find("pear").unwrap();
        assert!(apple_at < pear_at);
    }

    #[tokio::test]
    async fn new_form_is_not_a_show() {
        let (cli, _) = test_client(vec![apple()]);
        let resp = cli.get("/fruits/new").send().await;
        resp.assert_status_is_ok();
        let html = body(resp).await;
        assert!(html.contains("name=\"readyToEat\""));
        assert!(html.contains("action=\"/fruits\""));
    }

    #[tokio::test]
    async fn create_without_ready_to_eat() {
        let (cli, store) = test_client(vec![apple()]);
        let resp = cli.post("/fruits")
            .form(&[("name", "pear"), ("color", "green")])
            .send()
            .await;
        assert_redirect_to_list(&resp);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1), Some(pear()));
    }

    #[tokio::test]
    async fn create_with_ready_to_eat() {
        let (cli, store) = test_client(vec![]);
        let resp = cli.post("/fruits")
            .form(&[("name", "kiwi"), ("color", "brown"), ("readyToEat", "on")])
            .send()
            .await;
        assert_redirect_to_list(&resp);
        assert_eq!(store.get(0), Some(Fruit::new("kiwi", "brown", true)));
    }

    #[tokio::test]
    async fn create_keeps_extra_fields() {
        let (cli, store) = test_client(vec![]);
        cli.post("/fruits")
            .form(&[("name", "fig"), ("color", "purple"), ("origin", "turkey")])
            .send()
            .await;
        let fig = store.get(0).unwrap();
        assert_eq!(fig.extra.get("origin").map(String::as_str), Some("turkey"));
    }

    #[tokio::test]
    async fn create_without_form_body_is_rejected() {
        let (cli, store) = test_client(vec![apple()]);
        let resp = cli.post("/fruits").body("name=plum").send().await;
        assert!(resp.0.status().is_client_error());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn show_renders_fruit() {
        let (cli, _) = test_client(vec![apple(), pear()]);
        let resp = cli.get("/fruits/1").send().await;
        resp.assert_status_is_ok();
        let html = body(resp).await;
        assert!(html.contains("The pear is green."));
        assert!(html.contains("It is not ready to eat."));
    }

    #[tokio::test]
    async fn show_out_of_range_renders_missing_fruit() {
        let (cli, _) = test_client(vec![apple()]);
        let resp = cli.get("/fruits/7").send().await;
        resp.assert_status_is_ok();
        assert!(body(resp).await.contains("No fruit at this index"));
    }

    #[tokio::test]
    async fn show_non_numeric_renders_missing_fruit() {
        let (cli, _) = test_client(vec![apple()]);
        let resp = cli.get("/fruits/abc").send().await;
        resp.assert_status_is_ok();
        assert!(body(resp).await.contains("No fruit at this index"));
    }

    #[tokio::test]
    async fn edit_renders_form_for_index() {
        let (cli, _) = test_client(vec![apple(), pear()]);
        let resp = cli.get("/fruits/0/edit").send().await;
        resp.assert_status_is_ok();
        let html = body(resp).await;
        assert!(html.contains("/fruits/0?_method=PUT"));
        assert!(html.contains("value=\"apple\""));
        assert!(html.contains("checked"));
    }

    #[tokio::test]
    async fn edit_out_of_range_renders_missing_fruit() {
        let (cli, _) = test_client(vec![apple()]);
        let resp = cli.get("/fruits/3/edit").send().await;
        resp.assert_status_is_ok();
        assert!(body(resp).await.contains("No fruit at index 3"));
    }

    #[tokio::test]
    async fn update_replaces_record() {
        let (cli, store) = test_client(vec![apple(), pear()]);
        let resp = cli.put("/fruits/1")
            .form(&[("name", "banana"), ("color", "yellow"), ("readyToEat", "on")])
            .send()
            .await;
        assert_redirect_to_list(&resp);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1), Some(Fruit::new("banana", "yellow", true)));
    }

    #[tokio::test]
    async fn update_through_method_override() {
        let (cli, store) = test_client(vec![apple()]);
        let resp = cli.post("/fruits/0?_method=PUT")
            .form(&[("name", "apple"), ("color", "green")])
            .send()
            .await;
        assert_redirect_to_list(&resp);
        assert_eq!(store.get(0), Some(Fruit::new("apple", "green", false)));
    }

    #[tokio::test]
    async fn update_out_of_range_is_not_found() {
        let (cli, store) = test_client(vec![apple(), pear()]);
        let resp = cli.put("/fruits/2")
            .form(&[("name", "fig"), ("color", "purple")])
            .send()
            .await;
        resp.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(store.list(), vec![apple(), pear()]);
    }

    #[tokio::test]
    async fn update_non_numeric_is_not_found() {
        let (cli, store) = test_client(vec![apple()]);
        let resp = cli.put("/fruits/first")
            .form(&[("name", "fig"), ("color", "purple")])
            .send()
            .await;
        resp.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(store.list(), vec![apple()]);
    }

    #[tokio::test]
    async fn delete_shifts_later_records() {
        let (cli, store) = test_client(vec![apple(), pear()]);
        let resp = cli.delete("/fruits/0").send().await;
        assert_redirect_to_list(&resp);
        assert_eq!(store.list(), vec![pear()]);
    }

    #[tokio::test]
    async fn delete_through_method_override() {
        let (cli, store) = test_client(vec![apple(), pear()]);
        let resp = cli.post("/fruits/1?_method=DELETE").send().await;
        assert_redirect_to_list(&resp);
        assert_eq!(store.list(), vec![apple()]);
    }

    #[tokio::test]
    async fn delete_bad_index_is_noop() {
        let (cli, store) = test_client(vec![apple(), pear()]);
        assert_redirect_to_list(&cli.delete("/fruits/9").send().await);
        assert_redirect_to_list(&cli.delete("/fruits/abc").send().await);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn non_canonical_index_is_missing() {
        let (cli, store) = test_client(vec![apple(), pear()]);
        for uri in ["/fruits/+1", "/fruits/01", "/fruits/%201"] {
            let resp = cli.get(uri).send().await;
            resp.assert_status_is_ok();
            let html = body(resp).await;
            assert!(html.contains("No fruit at this index"));
            assert!(!html.contains("The pear is green."));
        }
        assert_redirect_to_list(&cli.delete("/fruits/+0").send().await);
        assert_eq!(store.list(), vec![apple(), pear()]);
    }

    #[tokio::test]
    async fn update_through_patch_override() {
        let (cli, store) = test_client(vec![apple()]);
        let resp = cli.post("/fruits/0?_method=PATCH")
            .form(&[("name", "plum"), ("color", "purple"), ("readyToEat", "on")])
            .send()
            .await;
        assert_redirect_to_list(&resp);
        assert_eq!(store.get(0), Some(Fruit::new("plum", "purple", true)));
    }

    #[tokio::test]
    async fn update_with_trailing_slash() {
        let (cli, store) = test_client(vec![apple(), pear()]);
        let resp = cli.put("/fruits/0/")
            .form(&[("name", "cherry"), ("color", "red")])
            .send()
            .await;
        assert_redirect_to_list(&resp);
        assert_eq!(store.get(0), Some(Fruit::new("cherry", "red", false)));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn version_endpoint_answers() {
        let (cli, _) = test_client(vec![]);
        let resp = cli.get("/v1/version").send().await;
        resp.assert_status_is_ok();
        let json = body(resp).await;
        assert!(json.contains(env!("CARGO_PKG_VERSION")));
        assert!(json.contains("result_code"));
    }
}

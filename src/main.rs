#![forbid(unsafe_code)]

use std::sync::Arc;

use anyhow::Result;
use lazy_static::lazy_static;
use log::info;
use poem::listener::TcpListener;

// Fruit Utilities
use crate::routes::build_app;
use crate::utils::config::{init_log, init_runtime_context, RuntimeCtx};
use crate::utils::errors::Errors;
use crate::utils::fruit_store::FruitStore;
use crate::utils::views::Views;

// Modules
mod routes;
mod utils;

// ***************************************************************************
//                                Constants
// ***************************************************************************
const SERVER_NAME : &str = "FruitServer"; // for poem logging

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Lazily initialize the parameters variable so that is has a 'static lifetime.
// We exit if we can't read our parameters.
lazy_static! {
    static ref RUNTIME_CTX: RuntimeCtx = init_runtime_context();
}

// ---------------------------------------------------------------------------
// main:
// ---------------------------------------------------------------------------
#[tokio::main]
async fn main() -> Result<()> {
    // --------------- Initialize Server --------------
    // Announce ourselves.
    println!("Starting fruit_server!");

    // Initialize the server.
    fruit_init()?;
    if RUNTIME_CTX.fruit_args.create_dirs_only {
        info!("Data directories created under {}, exiting.", RUNTIME_CTX.fruit_dirs.root_dir);
        return Ok(());
    }

    // --------------- Main Loop Set Up ---------------
    // The store lives for the life of the process and starts with the seed records.
    let store = Arc::new(FruitStore::seeded());
    info!("These are my fruits: {:?}", store.list());
    let views = Arc::new(Views::new()?);

    // Create the routes and run the server.
    let config = &RUNTIME_CTX.parms.config;
    let app = build_app(store, views, config);
    let addr = format!("{}{}", "0.0.0.0:", config.http_port);
    info!("Server running and ready for fruits on port {}.", config.http_port);

    // ------------------ Main Loop -------------------
    poem::Server::new(TcpListener::bind(addr))
        .name(SERVER_NAME)
        .run(app)
        .await?;
    Ok(())
}

// ***************************************************************************
//                             Private Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// fruit_init:
// ---------------------------------------------------------------------------
/** Initialize logging and the runtime context. */
fn fruit_init() -> Result<()> {
    // Configure our log.
    init_log()?;

    // Force the reading of input parameters and initialization of runtime context.
    info!("{}", Errors::InputParms(format!("{:#?}", *RUNTIME_CTX)));

    // Log build info.
    print_version_info();
    Ok(())
}

// ---------------------------------------------------------------------------
// print_version_info:
// ---------------------------------------------------------------------------
fn print_version_info() {
    info!("\n*** Running FRUIT_SERVER={}, BRANCH={}, COMMIT={}, DIRTY={}, SRC_TS={}, RUSTC={}.",
          option_env!("CARGO_PKG_VERSION").unwrap_or("unknown"),
          env!("GIT_BRANCH"),
          env!("GIT_COMMIT_SHORT"),
          env!("GIT_DIRTY"),
          env!("SOURCE_TIMESTAMP"),
          env!("RUSTC_VERSION"));
}

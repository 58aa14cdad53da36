//! Interactive inventory shell over the product store.

mod config;
mod menu;
mod prompt;

use stockroom_store::{JsonStore, ProductStore, SqliteStore};

use config::{Backend, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    stockroom_observability::init();

    let config = Config::from_env();
    let mut store: Box<dyn ProductStore> = match config.backend {
        Backend::Json => {
            tracing::info!(path = %config.json_path.display(), "using json backend");
            Box::new(JsonStore::open(&config.json_path))
        }
        Backend::Sqlite => match SqliteStore::connect(&config.database_url).await {
            Ok(store) => Box::new(store),
            // Unreachable database is a fatal startup condition, not a
            // recoverable error.
            Err(e) => {
                tracing::error!(error = %e, "could not connect to the product database");
                eprintln!("Error: could not connect to the product database: {e}");
                std::process::exit(1);
            }
        },
    };

    loop {
        menu::clear_screen();
        menu::show_menu();
        let Some(choice) = menu::read_choice() else {
            prompt::pause();
            continue;
        };

        let result = match choice {
            1 => menu::add_product(store.as_mut()).await,
            2 => menu::list_products(store.as_ref()).await,
            3 => menu::update_product(store.as_mut()).await,
            4 => menu::delete_product(store.as_mut()).await,
            _ => {
                println!("Leaving the inventory...");
                break;
            }
        };
        if let Err(e) = result {
            // Storage failures are reported; the session carries on with
            // the in-memory state intact.
            println!("Error: {e}");
        }
        prompt::pause();
    }

    Ok(())
}

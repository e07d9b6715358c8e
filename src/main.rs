use std::process;
use std::sync::Arc;

use charter_quote::config::Config;
use charter_quote::engine::Engine;
use charter_quote::server::serve;
use charter_quote::store::MemoryQuoteStore;

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {}", err.message);
            process::exit(1);
        }
    };

    let engine = Engine::new(Arc::new(MemoryQuoteStore::new()));

    if let Err(err) = serve(engine, config).await {
        eprintln!("server stopped: {}", err.message);
        process::exit(1);
    }
}

use std::io::{BufRead, Write};
use std::sync::Arc;

use address_engine::cache::{CachedGeoProvider, GeoCacheConfig};
use address_engine::geo::{NominatimClient, NominatimConfig};
use address_engine::recents::{RecentLocationStore, RecentStoreConfig};
use address_engine::search::{AddressResolutionEngine, SearchConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // The public instance works for light manual testing; point
    // NOMINATIM_URL at a self-hosted instance for anything heavier.
    let mut config = NominatimConfig::new("address-engine-demo/0.1");
    if let Ok(base_url) = std::env::var("NOMINATIM_URL") {
        config = config.with_base_url(base_url);
    }

    let client = NominatimClient::new(config).expect("failed to create geocoding client");
    let provider = Arc::new(CachedGeoProvider::new(
        Arc::new(client),
        &GeoCacheConfig::default(),
    ));

    let engine = AddressResolutionEngine::new(provider, SearchConfig::default());
    let recents = RecentLocationStore::open(RecentStoreConfig::default());

    println!("Address search demo. Type a partial address, empty line to quit.");
    let shown = recents.entries().await;
    if !shown.is_empty() {
        println!("Recent:");
        for entry in &shown {
            println!("  {}", entry.candidate.composed_address);
        }
    }

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush().expect("stdout");

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            break;
        }

        match engine.resolve(query).await {
            Ok(candidates) if candidates.is_empty() => {
                println!("Nenhum endereço encontrado. Tente adicionar o bairro ou cidade.");
            }
            Ok(candidates) => {
                for (i, ranked) in candidates.iter().enumerate() {
                    println!(
                        "{}. {} (score {}, {:.1} km)",
                        i + 1,
                        ranked.candidate.composed_address,
                        ranked.relevance_score,
                        ranked.distance_km
                    );
                }
                // Treat the top result as the selection for demo purposes.
                if let Some(best) = candidates.first() {
                    recents.record(best.candidate.clone()).await;
                }
            }
            Err(e) => {
                eprintln!("Erro ao buscar endereço: {e}");
            }
        }
    }
}

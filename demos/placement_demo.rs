//! Anchor persistence demonstration
//!
//! Places a few anchors through a session backed by a mock scene, restarts the
//! session to show they come back, then clears the store.
//!
//! Run with `RUST_LOG=debug` to see the store's log output.

use geo_anchor_store::{AnchorSession, AnchorStore, MockScene, StoreConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Geo Anchor Store - Placement Demo ===\n");

    let dir = std::env::temp_dir().join("geo_anchor_store_demo");
    let config = StoreConfig::in_directory(&dir).with_pretty(true);
    for warning in config.validate().warnings {
        println!("Config warning: {}", warning);
    }

    demo_placement(&config)?;
    demo_restart(&config)?;
    demo_clear(&config)?;

    println!("Placement demo completed successfully!");
    Ok(())
}

fn demo_placement(config: &StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Placement ---");

    let store = AnchorStore::from_config(config);
    store.clear()?;
    let mut session = AnchorSession::new(store, MockScene::tracking(), config.id_policy);
    session.on_frame();

    // Turin coordinates
    let placements = [
        ("23", "Mole", 45.0690, 7.6934, 240.0),
        ("24", "Duomo", 45.0730, 7.6854, 238.0),
        ("25", "Lingotto", 45.0317, 7.6660, 233.0),
    ];
    for (resource_id, name, lat, lon, alt) in placements {
        if let Some(record) = session.place(resource_id, name, lat, lon, alt, [0.0, 0.0, 0.0, 1.0])? {
            println!("Placed anchor {} '{}' at ({:.4}, {:.4})", record.id(), record.name, lat, lon);
        }
    }

    println!("Store file: {}\n", session.store().path().display());
    Ok(())
}

fn demo_restart(config: &StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Restart ---");

    let mut session = AnchorSession::new(AnchorStore::from_config(config), MockScene::not_tracking(), config.id_policy);
    session.on_frame();
    println!("Before tracking: {} live anchors", session.live_count());

    session.scene_mut().set_tracking(true);
    session.on_frame();
    println!("After tracking: {} live anchors", session.live_count());

    if let Some(record) = session.place("26", "Valentino", 45.0546, 7.6850, 239.0, [0.0, 0.0, 0.0, 1.0])? {
        println!("New anchor continues the id sequence: {}\n", record.id());
    }
    Ok(())
}

fn demo_clear(config: &StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Clear ---");

    let mut session = AnchorSession::new(AnchorStore::from_config(config), MockScene::tracking(), config.id_policy);
    session.on_frame();
    println!("Restored {} anchors", session.live_count());

    session.clear_all()?;
    println!("After clear: {} live, {} persisted\n", session.live_count(), session.store().len()?);
    Ok(())
}

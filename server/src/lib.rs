use cosweep_core::GameConfig;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::net::TcpListener;

pub use hub::*;
pub use scheduler::*;

pub mod connection;
mod hub;
pub mod logging;
mod scheduler;

/// Fixed seed for reproducible layouts, otherwise seeded from the thread RNG.
pub fn seed_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_rng(&mut rand::rng()),
    }
}

/// Accepts clients forever, all of them sharing one board.
pub async fn serve(listener: TcpListener, config: GameConfig, rng: SmallRng) -> anyhow::Result<()> {
    let hub = Hub::spawn(config, rng)?;
    log::info!(
        "Serving {}x{} board with {} mines on {}",
        config.size.0,
        config.size.1,
        config.mines,
        listener.local_addr()?
    );

    loop {
        let (stream, peer) = listener.accept().await?;
        log::info!("{} connected", peer);
        let hub = hub.clone();
        tokio::spawn(async move {
            match connection::handle(stream, hub).await {
                Ok(()) => log::info!("{} disconnected", peer),
                Err(err) => log::warn!("{} dropped: {:#}", peer, err),
            }
        });
    }
}

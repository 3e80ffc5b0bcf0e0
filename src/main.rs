use dotenv::dotenv;
use skirmbot::infra::{Arena, DefaultObserver, FileStore, RunConfig};
use skirmbot::planners::rl::{LearningConfig, QAgent, RLGameRunner, initial_weights, seeded};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("skirmbot=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let config = RunConfig::from_env();
    tracing::info!("Load weights: {}", config.load_weights);

    let learning = LearningConfig::default();
    let store = FileStore::new(config.weights_path.clone(), config.history_path.clone());

    let mut rng = seeded(config.seed);
    let weights = initial_weights(config.load_weights, &store, &mut rng);
    let agent = QAgent::new(learning.clone(), weights, rng);

    let arena = Arena::new(config.arena_config(learning.player, learning.enemy));

    let mut runner = RLGameRunner::new(arena, store, agent, DefaultObserver, config.episodes);
    runner.run().await?;

    Ok(())
}

//! Loads a JSON seed file into the storefront database

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use database::mongodb::MongoConfig;
use domain_messages::MongoMessageRepository;
use domain_products::{MongoCategoryRepository, MongoProductRepository};
use domain_reviews::MongoReviewRepository;
use eyre::WrapErr;
use storefront_api::seed::{SeedData, Seeder};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Load demo catalog, reviews and messages into MongoDB")]
struct Args {
    /// Seed file to load
    #[arg(default_value = "apps/storefront-api/seed/demo.json")]
    file: PathBuf,

    /// Skip index creation
    #[arg(long)]
    skip_indexes: bool,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();
    let args = Args::parse();

    init_tracing(&Environment::from_env());

    let raw = std::fs::read_to_string(&args.file)
        .wrap_err_with(|| format!("reading {}", args.file.display()))?;
    let data: SeedData = serde_json::from_str(&raw)
        .wrap_err_with(|| format!("parsing {}", args.file.display()))?;

    let mut config = MongoConfig::from_env()?;
    if config.app_name.is_none() {
        config = config.with_app_name("storefront-seed");
    }
    let client = database::mongodb::connect_from_config_with_retry(&config, None).await?;
    let db = client.database(config.database());

    let products = Arc::new(MongoProductRepository::new(&db));
    let categories = Arc::new(MongoCategoryRepository::new(&db));
    let reviews = Arc::new(MongoReviewRepository::new(&db));
    let messages = Arc::new(MongoMessageRepository::new(&db));

    if !args.skip_indexes {
        products.init_indexes().await?;
        categories.init_indexes().await?;
        reviews.init_indexes().await?;
        messages.init_indexes().await?;
    }

    let report = Seeder::new(products, categories, reviews, messages)
        .run(data)
        .await?;
    info!(
        file = %args.file.display(),
        categories = report.categories,
        products = report.products,
        reviews = report.reviews,
        messages = report.messages,
        ratings_refreshed = report.ratings_refreshed,
        "Seeding complete"
    );

    client.shutdown().await;
    Ok(())
}

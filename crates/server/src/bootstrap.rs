//! Idempotent startup routine.
//!
//! Applies the schema migrations, ensures the configured admin account
//! exists, and seeds the sample catalog when the product table is empty.
//! Safe to run on every start.

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

use crate::config::AppConfig;
use crate::db::{ProductRepository, RepositoryError, UserRepository};
use crate::services::auth::{self, AuthError};

/// Sample catalog seeded into an empty product table.
const SAMPLE_PRODUCTS: &[&str] = &[
    "Bolsa Floral",
    "Bolsa Girassol",
    "Bolsa Verão",
    "Bolsa Boho",
    "Bolsa Elegance",
    "Bolsa Pérola",
    "Bolsa Primavera",
    "Bolsa Mandala",
    "Bolsa Natural",
    "Bolsa Color Mix",
    "Bolsa Aurora",
    "Bolsa Sol",
    "Bolsa Areia",
    "Bolsa Romance",
    "Bolsa Jardim",
    "Bolsa Lua",
    "Bolsa Doce",
    "Bolsa Serena",
    "Bolsa Charm",
    "Bolsa Clássica",
];

const SAMPLE_DESCRIPTION: &str =
    "Bolsa artesanal em crochê. Personalize cores e tamanho sob encomenda.";

/// Errors that can occur during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("could not hash admin password: {0}")]
    Auth(#[from] AuthError),
}

/// Run migrations, ensure the admin account, and seed the catalog.
///
/// # Errors
///
/// Returns `BootstrapError` if a migration or database operation fails.
pub async fn run(pool: &PgPool, config: &AppConfig) -> Result<(), BootstrapError> {
    sqlx::migrate!("./migrations").run(pool).await?;

    ensure_admin(pool, config).await?;
    seed_catalog(pool).await?;

    Ok(())
}

/// Create the configured admin account if no user has that email yet.
async fn ensure_admin(pool: &PgPool, config: &AppConfig) -> Result<(), BootstrapError> {
    let users = UserRepository::new(pool);

    if users.get_by_email(&config.admin.email).await?.is_none() {
        let password_hash = auth::hash_password(config.admin.password.expose_secret())?;
        users.create(&config.admin.email, &password_hash).await?;
        tracing::info!(email = %config.admin.email, "created bootstrap admin account");
    }

    Ok(())
}

/// Seed the sample catalog, only when the product table is empty.
async fn seed_catalog(pool: &PgPool) -> Result<(), BootstrapError> {
    let products = ProductRepository::new(pool);

    if products.count().await? == 0 {
        let price = Decimal::new(120_00, 2);
        for name in SAMPLE_PRODUCTS {
            products
                .create(name, SAMPLE_DESCRIPTION, price, true, &[])
                .await?;
        }
        tracing::info!(count = SAMPLE_PRODUCTS.len(), "seeded sample catalog");
    }

    Ok(())
}

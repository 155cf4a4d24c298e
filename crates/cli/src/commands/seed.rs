//! Catalog seed data for local development.

use rust_decimal::Decimal;

use gala_server::db::create_pool;

use super::{CommandError, database_url};

/// Demo products: (name, slug, description, price, category, featured).
const PRODUCTS: &[(&str, &str, &str, i64, &str, bool)] = &[
    (
        "Pack décoration salle",
        "pack-decoration-salle",
        "Décoration complète de salle de réception",
        50_000,
        "decoration",
        true,
    ),
    (
        "Location sonorisation",
        "location-sonorisation",
        "Système son complet avec technicien",
        75_000,
        "materiel",
        true,
    ),
    (
        "Arche florale",
        "arche-florale",
        "Arche de cérémonie en fleurs naturelles",
        35_000,
        "decoration",
        false,
    ),
];

/// Demo services: (title, slug, description, category, featured).
const SERVICES: &[(&str, &str, &str, &str, bool)] = &[
    (
        "Organisation de mariage",
        "organisation-mariage",
        "Accompagnement complet, de la cérémonie à la réception",
        "mariage",
        true,
    ),
    (
        "Événementiel d'entreprise",
        "evenementiel-entreprise",
        "Séminaires, lancements de produit et réunions professionnelles",
        "entreprise",
        false,
    ),
];

/// Seed the catalog tables with demo rows.
///
/// Refuses to run against a non-empty products table so it can never
/// pollute a real catalog.
pub async fn run() -> Result<(), CommandError> {
    let url = database_url()?;
    let pool = create_pool(&url).await?;

    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
        .fetch_one(&pool)
        .await?;
    if existing > 0 {
        tracing::warn!("products table is not empty, skipping seed");
        return Ok(());
    }

    for (name, slug, description, price, category, featured) in PRODUCTS {
        sqlx::query(
            "INSERT INTO products (name, slug, description, price, category, featured)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(Decimal::from(*price))
        .bind(category)
        .bind(featured)
        .execute(&pool)
        .await?;
    }

    for (title, slug, description, category, featured) in SERVICES {
        sqlx::query(
            "INSERT INTO services (title, slug, description, category, featured)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(title)
        .bind(slug)
        .bind(description)
        .bind(category)
        .bind(featured)
        .execute(&pool)
        .await?;
    }

    tracing::info!(
        products = PRODUCTS.len(),
        services = SERVICES.len(),
        "catalog seeded"
    );
    Ok(())
}

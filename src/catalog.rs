use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Catalog {
    pub name: String,
    pub products: Vec<Product>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: u64,
    #[serde(default)]
    pub image: String,
    /// Season/type/brand tokens merged into one list, mirroring the
    /// space-separated `data-category` attribute on a product card.
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub size: String,
}

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("product not found: {0}")]
    ProductNotFound(String),
    #[error("duplicate product id: {0}")]
    DuplicateProduct(String),
}

/// The stock tire catalog used when no `--catalog` file is given.
pub fn builtin() -> Catalog {
    fn product(
        id: &str,
        name: &str,
        price: u64,
        categories: &[&str],
        size: &str,
    ) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            price,
            image: format!("/images/products/{}.png", id),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            size: size.to_string(),
        }
    }

    Catalog {
        name: "treadmark".to_string(),
        products: vec![
            product(
                "1",
                "Nokian Hakkapeliitta R5",
                12_490,
                &["winter", "studless", "nokian"],
                "205/55 R16",
            ),
            product(
                "2",
                "Michelin X-Ice North 4",
                13_990,
                &["winter", "studded", "michelin"],
                "225/45 R17",
            ),
            product(
                "3",
                "Bridgestone Turanza T005",
                9_790,
                &["summer", "touring", "bridgestone"],
                "205/55 R16",
            ),
            product(
                "4",
                "Continental AllSeasonContact 2",
                11_290,
                &["allseason", "touring", "continental"],
                "215/60 R17",
            ),
            product(
                "5",
                "Pirelli Ice Zero 2",
                12_450,
                &["winter", "studded", "pirelli"],
                "195/65 R15",
            ),
            product(
                "6",
                "Michelin Primacy 4",
                10_990,
                &["summer", "touring", "michelin"],
                "215/55 R17",
            ),
        ],
    }
}

pub fn load_catalog(source: Option<&Path>) -> anyhow::Result<Catalog> {
    let Some(path) = source else {
        return Ok(builtin());
    };
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn lookup<'a>(c: &'a Catalog, id: &str) -> anyhow::Result<&'a Product> {
    c.products
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| CatalogError::ProductNotFound(id.to_string()).into())
}

pub fn search<'a>(c: &'a Catalog, query: Option<&str>) -> Vec<&'a Product> {
    match query {
        None => c.products.iter().collect(),
        Some(q) => {
            let q = q.to_ascii_lowercase();
            c.products
                .iter()
                .filter(|p| {
                    p.name.to_ascii_lowercase().contains(&q)
                        || p.categories.iter().any(|c| c.to_ascii_lowercase() == q)
                })
                .collect()
        }
    }
}

pub fn validate(c: &Catalog) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for p in &c.products {
        if !seen.insert(&p.id) {
            return Err(CatalogError::DuplicateProduct(p.id.clone()).into());
        }
    }
    Ok(())
}

/// Extracts the digits from a display price ("12 490 ₽" -> 12490). Anything
/// without digits parses to 0, matching how a missing price tag behaves.
pub fn parse_price_text(text: &str) -> u64 {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

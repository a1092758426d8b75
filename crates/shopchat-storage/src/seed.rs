//! Catalog seeding with generated products.

use rand::Rng;
use tracing::info;

use shopchat_core::error::ShopchatError;

use crate::repository::ProductRepository;

/// Categories products are drawn from.
pub const CATEGORIES: &[&str] = &["Electronics", "Books", "Clothing", "Shoes", "Home"];

const MIN_PRICE: u32 = 200;
const MAX_PRICE: u32 = 5000;

static WORDS: &[&str] = &[
    "amber", "arrow", "atlas", "breeze", "cedar", "comet", "coral", "delta", "ember", "falcon",
    "fern", "glacier", "harbor", "ivory", "jade", "lumen", "maple", "meadow", "nova", "onyx",
    "orbit", "pebble", "pine", "prism", "quartz", "raven", "ridge", "sable", "sierra", "slate",
    "summit", "terra", "tidal", "vertex", "willow", "zephyr",
];

static DESCRIPTION_TEMPLATES: &[&str] = &[
    "Built for {} days and {} evenings.",
    "A {} design with a {} finish.",
    "Pairs well with anything {} or {}.",
    "Inspired by the {} and the {}.",
];

/// Insert `count` generated products using `rng`.
pub fn seed_products<R: Rng + ?Sized>(
    repo: &ProductRepository,
    count: u32,
    rng: &mut R,
) -> Result<(), ShopchatError> {
    for _ in 0..count {
        let name = format!("{} {}", capitalize(pick(WORDS, rng)), capitalize(pick(WORDS, rng)));
        let category = pick(CATEGORIES, rng);
        let price = f64::from(rng.random_range(MIN_PRICE..=MAX_PRICE));
        let description = pick(DESCRIPTION_TEMPLATES, rng)
            .replacen("{}", pick(WORDS, rng), 1)
            .replacen("{}", pick(WORDS, rng), 1);
        repo.insert(&name, category, price, &description)?;
    }
    Ok(())
}

/// Seed the catalog when it has no products. Returns the number inserted.
pub fn seed_if_empty(repo: &ProductRepository, count: u32) -> Result<u32, ShopchatError> {
    if repo.count()? > 0 {
        info!("Catalog already populated; skipping seed");
        return Ok(0);
    }
    seed_products(repo, count, &mut rand::rng())?;
    info!(count, "Catalog seeded");
    Ok(count)
}

fn pick<'a, R: Rng + ?Sized>(items: &[&'a str], rng: &mut R) -> &'a str {
    items[rng.random_range(0..items.len())]
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

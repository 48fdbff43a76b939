use crate::catalog::{Catalog, Product};
use crate::domain::constants::KEY_FILTERS;
use crate::domain::models::{FilterState, ProductCard};
use crate::services::storage::{Store, StorageError};

pub fn card_for(p: &Product) -> ProductCard {
    ProductCard {
        categories: p.categories.clone(),
        price: p.price,
        size: p.size.clone(),
    }
}

pub fn cards_for(catalog: &Catalog) -> Vec<ProductCard> {
    catalog.products.iter().map(card_for).collect()
}

fn dimension_matches(selected: &[String], categories: &[String]) -> bool {
    selected.is_empty() || selected.iter().any(|s| categories.iter().any(|c| c == s))
}

/// Computes the visibility mask for `cards` under `filters`. Pure: no
/// reordering, no side effects; the mask index matches the card index.
/// An empty selection on a dimension matches everything on that dimension,
/// and the price bounds are inclusive at both ends.
pub fn select_visible(cards: &[ProductCard], filters: &FilterState) -> Vec<bool> {
    let f = filters.normalized();
    cards
        .iter()
        .map(|card| {
            dimension_matches(&f.seasons, &card.categories)
                && dimension_matches(&f.types, &card.categories)
                && dimension_matches(&f.brands, &card.categories)
                && (f.sizes.is_empty() || f.sizes.iter().any(|s| s == &card.size))
                && card.price >= f.price_min
                && card.price <= f.price_max
        })
        .collect()
}

pub fn visible_count(mask: &[bool]) -> usize {
    mask.iter().filter(|v| **v).count()
}

pub fn load_state(store: &impl Store) -> FilterState {
    store.load(KEY_FILTERS, FilterState::default())
}

/// Persists the state normalized, so `price_min <= price_max` holds for
/// everything read back out of the store.
pub fn save_state(store: &mut impl Store, state: &FilterState) -> Result<(), StorageError> {
    store.save(KEY_FILTERS, &state.normalized())
}

#[cfg(test)]
mod tests {
    use super::{load_state, save_state, select_visible, visible_count};
    use crate::domain::models::{FilterState, ProductCard};
    use crate::services::storage::MemStore;

    fn card(price: u64, categories: &[&str], size: &str) -> ProductCard {
        ProductCard {
            categories: categories.iter().map(|c| c.to_string()).collect(),
            price,
            size: size.to_string(),
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn no_filters_shows_everything() {
        let cards = vec![
            card(5_000, &["winter"], "R16"),
            card(15_000, &["summer"], "R17"),
        ];
        let mask = select_visible(&cards, &FilterState::default());
        assert_eq!(mask, vec![true, true]);
        assert_eq!(visible_count(&mask), 2);
    }

    #[test]
    fn price_cap_hides_expensive_cards() {
        let cards = vec![
            card(5_000, &["winter"], "R16"),
            card(15_000, &["summer"], "R17"),
        ];
        let filters = FilterState {
            price_max: 10_000,
            ..Default::default()
        };
        assert_eq!(select_visible(&cards, &filters), vec![true, false]);
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let cards = vec![card(5_000, &[], ""), card(10_000, &[], ""), card(10_001, &[], "")];
        let filters = FilterState {
            price_min: 5_000,
            price_max: 10_000,
            ..Default::default()
        };
        assert_eq!(select_visible(&cards, &filters), vec![true, true, false]);
    }

    #[test]
    fn inverted_price_range_is_swapped() {
        let cards = vec![card(7_000, &[], "")];
        let filters = FilterState {
            price_min: 10_000,
            price_max: 5_000,
            ..Default::default()
        };
        assert_eq!(select_visible(&cards, &filters), vec![true]);
    }

    #[test]
    fn inverted_range_is_stored_swapped() {
        let mut store = MemStore::default();
        let state = FilterState {
            price_min: 10_000,
            price_max: 5_000,
            ..Default::default()
        };
        save_state(&mut store, &state).expect("save");
        let stored = load_state(&store);
        assert_eq!(stored.price_min, 5_000);
        assert_eq!(stored.price_max, 10_000);
    }

    #[test]
    fn all_dimensions_must_match() {
        let cards = vec![
            card(12_000, &["winter", "studded", "michelin"], "R17"),
            card(12_000, &["winter", "studless", "nokian"], "R16"),
            card(9_000, &["summer", "touring", "michelin"], "R17"),
        ];
        let filters = FilterState {
            seasons: strings(&["winter"]),
            brands: strings(&["michelin"]),
            ..Default::default()
        };
        assert_eq!(select_visible(&cards, &filters), vec![true, false, false]);
    }

    #[test]
    fn size_dimension_matches_exactly() {
        let cards = vec![card(1, &[], "205/55 R16"), card(1, &[], "225/45 R17")];
        let filters = FilterState {
            sizes: strings(&["225/45 R17"]),
            ..Default::default()
        };
        assert_eq!(select_visible(&cards, &filters), vec![false, true]);
    }

    #[test]
    fn several_values_in_one_dimension_union() {
        let cards = vec![
            card(1, &["winter"], ""),
            card(1, &["summer"], ""),
            card(1, &["allseason"], ""),
        ];
        let filters = FilterState {
            seasons: strings(&["winter", "summer"]),
            ..Default::default()
        };
        assert_eq!(select_visible(&cards, &filters), vec![true, true, false]);
    }
}

use crate::catalog::{self, Catalog};
use crate::domain::constants::KEY_FAVORITES;
use crate::domain::models::FavoriteItem;
use crate::services::storage::{now_ts, Store};

#[derive(Debug)]
pub enum FavoriteToggle {
    Added(FavoriteItem),
    Removed(String),
}

/// Toggle semantics keyed by product id: present -> removed, absent -> added.
/// An unknown id aborts without touching the stored set.
pub fn toggle(
    store: &mut impl Store,
    catalog: &Catalog,
    id: &str,
) -> anyhow::Result<FavoriteToggle> {
    let product = catalog::lookup(catalog, id)?;
    let mut favorites: Vec<FavoriteItem> = store.load(KEY_FAVORITES, Vec::new());

    let outcome = match favorites.iter().position(|f| f.product_id == id) {
        Some(idx) => {
            let removed = favorites.remove(idx);
            FavoriteToggle::Removed(removed.name)
        }
        None => {
            let item = FavoriteItem {
                product_id: product.id.clone(),
                name: product.name.clone(),
                price: product.price,
                image: product.image.clone(),
                added_at: now_ts(),
            };
            favorites.push(item.clone());
            FavoriteToggle::Added(item)
        }
    };
    store.save(KEY_FAVORITES, &favorites)?;
    Ok(outcome)
}

pub fn list(store: &impl Store) -> Vec<FavoriteItem> {
    store.load(KEY_FAVORITES, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::{list, toggle, FavoriteToggle};
    use crate::catalog::builtin;
    use crate::services::storage::MemStore;

    #[test]
    fn toggle_adds_then_removes() {
        let mut store = MemStore::default();
        let catalog = builtin();

        match toggle(&mut store, &catalog, "3").expect("toggle on") {
            FavoriteToggle::Added(item) => assert_eq!(item.name, "Bridgestone Turanza T005"),
            FavoriteToggle::Removed(_) => panic!("expected add"),
        }
        assert_eq!(list(&store).len(), 1);

        match toggle(&mut store, &catalog, "3").expect("toggle off") {
            FavoriteToggle::Removed(name) => assert_eq!(name, "Bridgestone Turanza T005"),
            FavoriteToggle::Added(_) => panic!("expected remove"),
        }
        assert!(list(&store).is_empty());
    }

    #[test]
    fn unknown_product_leaves_favorites_untouched() {
        let mut store = MemStore::default();
        let catalog = builtin();
        toggle(&mut store, &catalog, "1").expect("toggle");
        assert!(toggle(&mut store, &catalog, "404").is_err());
        assert_eq!(list(&store).len(), 1);
    }
}

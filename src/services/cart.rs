use crate::catalog::{self, Catalog};
use crate::domain::constants::{KEY_CART, KEY_LAST_ADDED};
use crate::domain::models::{CartItem, CartView, CheckoutReport, LastAdded};
use crate::services::storage::{now_ts, Store};

#[derive(thiserror::Error, Debug)]
pub enum CartError {
    #[error("cart is empty")]
    EmptyCart,
}

#[derive(Debug, PartialEq)]
pub enum QuantityOutcome {
    Updated(u64),
    Removed,
    Absent,
}

/// The cart engine: an ordered list of line items hydrated from the store,
/// persisted back after every mutation. Rendering and notification stay with
/// the caller.
pub struct CartEngine<S: Store> {
    store: S,
    items: Vec<CartItem>,
}

impl<S: Store> CartEngine<S> {
    /// Hydrates from storage; an absent or corrupt blob starts empty.
    pub fn load(store: S) -> Self {
        let items = store.load(KEY_CART, Vec::new());
        Self { store, items }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Adds one unit of `id`. An existing line gains quantity; a new line is
    /// hydrated from the catalog with a fresh `added_at`. An unknown id
    /// mutates nothing. Also writes the last-added marker for the next cart
    /// view.
    pub fn add_item(&mut self, id: &str, catalog: &Catalog) -> anyhow::Result<&CartItem> {
        let product = catalog::lookup(catalog, id)?;
        let idx = match self.items.iter().position(|i| i.product_id == id) {
            Some(idx) => {
                self.items[idx].quantity += 1;
                idx
            }
            None => {
                self.items.push(CartItem {
                    product_id: product.id.clone(),
                    name: product.name.clone(),
                    price: product.price,
                    image: product.image.clone(),
                    quantity: 1,
                    added_at: now_ts(),
                });
                self.items.len() - 1
            }
        };
        self.persist()?;
        self.store.save(
            KEY_LAST_ADDED,
            &LastAdded {
                name: product.name.clone(),
                price: product.price,
            },
        )?;
        Ok(&self.items[idx])
    }

    /// Drops the line for `id`. Absent is a no-op, not an error.
    pub fn remove_item(&mut self, id: &str) -> anyhow::Result<bool> {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != id);
        if self.items.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Applies a quantity delta. A result at or below zero removes the line;
    /// an absent id changes nothing and creates nothing.
    pub fn change_quantity(&mut self, id: &str, delta: i64) -> anyhow::Result<QuantityOutcome> {
        let Some(idx) = self.items.iter().position(|i| i.product_id == id) else {
            return Ok(QuantityOutcome::Absent);
        };
        let next = self.items[idx].quantity as i64 + delta;
        if next <= 0 {
            self.items.remove(idx);
            self.persist()?;
            return Ok(QuantityOutcome::Removed);
        }
        self.items[idx].quantity = next as u64;
        self.persist()?;
        Ok(QuantityOutcome::Updated(next as u64))
    }

    pub fn total(&self) -> u64 {
        self.items.iter().map(|i| i.price * i.quantity).sum()
    }

    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn clear(&mut self) -> anyhow::Result<()> {
        self.items.clear();
        self.persist()?;
        Ok(())
    }

    /// Confirms the order: reports the totals, then empties the cart and the
    /// last-added marker. An empty cart is rejected.
    pub fn checkout(&mut self) -> anyhow::Result<CheckoutReport> {
        if self.items.is_empty() {
            return Err(CartError::EmptyCart.into());
        }
        let report = CheckoutReport {
            order_total: self.total(),
            item_count: self.item_count(),
        };
        self.items.clear();
        self.persist()?;
        self.store.remove(KEY_LAST_ADDED);
        Ok(report)
    }

    /// Consume-once read of the last-added marker (the cart-page banner).
    pub fn take_last_added(&mut self) -> Option<LastAdded> {
        let marker: Option<LastAdded> = self.store.load(KEY_LAST_ADDED, None);
        if marker.is_some() {
            self.store.remove(KEY_LAST_ADDED);
        }
        marker
    }

    pub fn view(&self) -> CartView {
        CartView {
            items: self.items.clone(),
            total: self.total(),
            item_count: self.item_count(),
        }
    }

    fn persist(&mut self) -> anyhow::Result<()> {
        self.store.save(KEY_CART, &self.items)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CartEngine, CartError, QuantityOutcome};
    use crate::catalog::{Catalog, CatalogError, Product};
    use crate::domain::constants::KEY_CART;
    use crate::domain::models::CartItem;
    use crate::services::storage::{MemStore, Store};

    fn catalog() -> Catalog {
        Catalog {
            name: "test".to_string(),
            products: vec![
                Product {
                    id: "1".to_string(),
                    name: "X".to_string(),
                    price: 100,
                    image: String::new(),
                    categories: vec![],
                    size: String::new(),
                },
                Product {
                    id: "2".to_string(),
                    name: "Y".to_string(),
                    price: 250,
                    image: String::new(),
                    categories: vec![],
                    size: String::new(),
                },
            ],
        }
    }

    #[test]
    fn repeated_adds_accumulate_quantity() {
        let mut cart = CartEngine::load(MemStore::default());
        let c = catalog();
        for _ in 0..3 {
            cart.add_item("1", &c).expect("add");
        }
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.total(), 300);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn unknown_product_aborts_without_mutation() {
        let mut cart = CartEngine::load(MemStore::default());
        let c = catalog();
        cart.add_item("1", &c).expect("add");
        let err = cart.add_item("404", &c).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::ProductNotFound(_))
        ));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn remove_then_add_starts_a_fresh_line() {
        let mut cart = CartEngine::load(MemStore::default());
        let c = catalog();
        cart.add_item("1", &c).expect("add");
        cart.add_item("1", &c).expect("add");
        assert!(cart.remove_item("1").expect("remove"));
        let item = cart.add_item("1", &c).expect("re-add");
        assert_eq!(item.quantity, 1);
        assert_eq!(cart.total(), 100);
    }

    #[test]
    fn remove_of_absent_id_is_a_noop() {
        let mut cart = CartEngine::load(MemStore::default());
        assert!(!cart.remove_item("1").expect("remove"));
        assert_eq!(cart.total(), 0);
    }

    #[test]
    fn quantity_delta_to_zero_removes_the_line() {
        let mut cart = CartEngine::load(MemStore::default());
        let c = catalog();
        cart.add_item("1", &c).expect("add");
        cart.add_item("1", &c).expect("add");
        assert_eq!(cart.total(), 200);
        let out = cart.change_quantity("1", -2).expect("delta");
        assert_eq!(out, QuantityOutcome::Removed);
        assert!(cart.items().is_empty());
        assert_eq!(cart.total(), 0);
    }

    #[test]
    fn quantity_delta_on_absent_id_creates_nothing() {
        let mut cart = CartEngine::load(MemStore::default());
        let out = cart.change_quantity("1", 2).expect("delta");
        assert_eq!(out, QuantityOutcome::Absent);
        assert!(cart.items().is_empty());
    }

    #[test]
    fn every_mutation_persists_before_returning() {
        let mut cart = CartEngine::load(MemStore::default());
        let c = catalog();
        cart.add_item("1", &c).expect("add");
        cart.add_item("2", &c).expect("add");
        cart.change_quantity("2", 1).expect("delta");

        let persisted: Vec<CartItem> = cart.store_mut().load(KEY_CART, Vec::new());
        assert_eq!(persisted.len(), 2);
        assert_eq!(persisted[1].quantity, 2);

        let reloaded = CartEngine::load(std::mem::take(cart.store_mut()));
        assert_eq!(reloaded.total(), 100 + 500);
    }

    #[test]
    fn write_failure_keeps_in_memory_state() {
        let mut cart = CartEngine::load(MemStore::default());
        let c = catalog();
        cart.store_mut().fail_writes = true;
        assert!(cart.add_item("1", &c).is_err());
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total(), 100);
    }

    #[test]
    fn checkout_reports_totals_and_clears() {
        let mut cart = CartEngine::load(MemStore::default());
        let c = catalog();
        cart.add_item("1", &c).expect("add");
        cart.add_item("2", &c).expect("add");
        let report = cart.checkout().expect("checkout");
        assert_eq!(report.order_total, 350);
        assert_eq!(report.item_count, 2);
        assert!(cart.items().is_empty());
    }

    #[test]
    fn checkout_of_empty_cart_is_rejected() {
        let mut cart = CartEngine::load(MemStore::default());
        let err = cart.checkout().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CartError>(),
            Some(CartError::EmptyCart)
        ));
    }

    #[test]
    fn last_added_marker_is_consumed_once() {
        let mut cart = CartEngine::load(MemStore::default());
        let c = catalog();
        cart.add_item("1", &c).expect("add");
        let first = cart.take_last_added().expect("marker present");
        assert_eq!(first.name, "X");
        assert_eq!(first.price, 100);
        assert!(cart.take_last_added().is_none());
    }

    #[test]
    fn empty_cart_total_is_zero() {
        let cart = CartEngine::load(MemStore::default());
        assert_eq!(cart.total(), 0);
        assert_eq!(cart.item_count(), 0);
    }
}

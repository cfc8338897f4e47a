//! Quote cart.
//!
//! Lines keep insertion order. A line exists only while its quantity is
//! positive, and bundle-only products are always held in multiples of
//! [`BUNDLE_SIZE`].

use std::sync::{Arc, Mutex, PoisonError};

use pricebook_core::{contains_folded, Product};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::code::PriceOverrides;

pub const BUNDLE_SIZE: u32 = 5;

/// Model text that marks a product as sold only in bundles.
pub const BUNDLE_ONLY_MARKERS: &[&str] = &["doc de carga"];

#[must_use]
pub fn is_bundle_only(model: &str) -> bool {
    BUNDLE_ONLY_MARKERS
        .iter()
        .any(|marker| contains_folded(model, marker))
}

/// Reads a typed quantity the way a lenient integer parser would: leading
/// whitespace, an optional sign, then digits up to the first non-digit.
/// Anything without leading digits is `0`.
#[must_use]
pub fn parse_quantity_input(input: &str) -> i64 {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    if negative {
        -value
    } else {
        value
    }
}

fn round_up_to_bundle(quantity: u64) -> u64 {
    let size = u64::from(BUNDLE_SIZE);
    quantity.div_ceil(size).max(1) * size
}

/// `unit_price × quantity`, saturating at the `Decimal` bounds.
fn line_subtotal(unit_price: Decimal, quantity: u32) -> Decimal {
    unit_price.saturating_mul(Decimal::from(quantity))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

/// A cart line priced through [`PriceOverrides::unit_price`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLine {
    pub product: Product,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Persisted form of a cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub lines: Vec<SnapshotLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotLine {
    pub product: Product,
    pub quantity: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    #[must_use]
    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.position(product_id)
            .map_or(0, |i| self.lines[i].quantity)
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.product.id == product_id)
    }

    /// Sets a line's quantity and returns what was stored.
    ///
    /// `quantity <= 0` removes the line. Bundle-only products round up to the
    /// next multiple of [`BUNDLE_SIZE`].
    pub fn set_quantity(&mut self, product: &Product, quantity: i64) -> u32 {
        let Ok(requested) = u64::try_from(quantity) else {
            self.remove(&product.id);
            return 0;
        };
        if requested == 0 {
            self.remove(&product.id);
            return 0;
        }

        let adjusted = if is_bundle_only(&product.model) {
            round_up_to_bundle(requested)
        } else {
            requested
        };
        let stored = u32::try_from(adjusted).unwrap_or(u32::MAX);

        match self.position(&product.id) {
            Some(i) => {
                let line = &mut self.lines[i];
                line.product = product.clone();
                line.quantity = stored;
            }
            None => self.lines.push(CartLine {
                product: product.clone(),
                quantity: stored,
            }),
        }
        tracing::debug!(product_id = %product.id, requested = quantity, stored, "cart quantity set");
        stored
    }

    fn step_units(product: &Product, step: u32) -> i64 {
        let unit = if is_bundle_only(&product.model) {
            BUNDLE_SIZE
        } else {
            1
        };
        i64::from(step) * i64::from(unit)
    }

    /// Adds `step` units, or `step` bundles for bundle-only products.
    pub fn increment(&mut self, product: &Product, step: u32) -> u32 {
        let current = i64::from(self.quantity_of(&product.id));
        self.set_quantity(product, current + Self::step_units(product, step))
    }

    /// Removes `step` units, or `step` bundles for bundle-only products.
    /// Going below zero removes the line.
    pub fn decrement(&mut self, product: &Product, step: u32) -> u32 {
        let current = i64::from(self.quantity_of(&product.id));
        self.set_quantity(product, current - Self::step_units(product, step))
    }

    /// Adds to an existing line. Non-positive quantities are ignored.
    pub fn add(&mut self, product: &Product, quantity: i64) -> u32 {
        if quantity <= 0 {
            return self.quantity_of(&product.id);
        }
        let current = i64::from(self.quantity_of(&product.id));
        self.set_quantity(product, current.saturating_add(quantity))
    }

    /// Increments every listed product once.
    pub fn add_one_of_each(&mut self, products: &[Product]) {
        for product in products {
            self.increment(product, 1);
        }
    }

    /// Returns `true` if a line was removed.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product.id != product_id);
        before != self.lines.len()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Rebinds lines to freshly ingested products with the same id, picking
    /// up new prices. Lines whose product disappeared are kept unchanged.
    /// Returns the number of lines rebound.
    pub fn refresh_products(&mut self, products: &[Product]) -> usize {
        let mut rebound = 0;
        for line in &mut self.lines {
            if let Some(fresh) = products.iter().find(|p| p.id == line.product.id) {
                line.product = fresh.clone();
                rebound += 1;
            }
        }
        // Bundle status follows the model text, which may have changed.
        let snapshot = self.snapshot();
        *self = Self::restore(snapshot);
        rebound
    }

    #[must_use]
    pub fn resolved_lines(&self, overrides: &PriceOverrides) -> Vec<ResolvedLine> {
        self.lines
            .iter()
            .map(|line| {
                let unit_price = overrides.unit_price(&line.product);
                ResolvedLine {
                    product: line.product.clone(),
                    quantity: line.quantity,
                    unit_price,
                    subtotal: line_subtotal(unit_price, line.quantity),
                }
            })
            .collect()
    }

    #[must_use]
    pub fn total(&self, overrides: &PriceOverrides) -> Decimal {
        self.lines
            .iter()
            .map(|line| line_subtotal(overrides.unit_price(&line.product), line.quantity))
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self
                .lines
                .iter()
                .map(|l| SnapshotLine {
                    product: l.product.clone(),
                    quantity: i64::from(l.quantity),
                })
                .collect(),
        }
    }

    /// Rebuilds a cart through [`Cart::set_quantity`], so stored data that
    /// breaks the line invariants is repaired. A repeated product keeps its
    /// last quantity.
    #[must_use]
    pub fn restore(snapshot: CartSnapshot) -> Self {
        let mut cart = Self::new();
        for line in &snapshot.lines {
            cart.set_quantity(&line.product, line.quantity);
        }
        cart
    }
}

/// A [`Cart`] shared between threads. Each call holds the lock for the whole
/// mutation, so concurrent writes to one product resolve to the last call.
#[derive(Debug, Clone, Default)]
pub struct SharedCart {
    inner: Arc<Mutex<Cart>>,
}

impl SharedCart {
    #[must_use]
    pub fn new(cart: Cart) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cart)),
        }
    }

    /// Runs `f` with exclusive access. A lock poisoned by a panicking writer
    /// is taken over as-is.
    pub fn with<R>(&self, f: impl FnOnce(&mut Cart) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn set_quantity(&self, product: &Product, quantity: i64) -> u32 {
        self.with(|cart| cart.set_quantity(product, quantity))
    }

    pub fn increment(&self, product: &Product, step: u32) -> u32 {
        self.with(|cart| cart.increment(product, step))
    }

    pub fn decrement(&self, product: &Product, step: u32) -> u32 {
        self.with(|cart| cart.decrement(product, step))
    }

    pub fn clear(&self) {
        self.with(Cart::clear);
    }

    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.with(|cart| cart.snapshot())
    }
}

#[cfg(test)]
#[path = "cart_test.rs"]
mod tests;

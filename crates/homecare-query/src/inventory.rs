//! Stock levels. An item is low when its quantity is at or below its
//! minimum; an absent quantity or minimum counts as 0.

use homecare_core::InventoryItem;

pub fn is_low_stock(item: &InventoryItem) -> bool {
    item.qty_or_zero() <= item.min_or_zero()
}

pub fn low_stock_items(items: &[InventoryItem]) -> Vec<&InventoryItem> {
    items.iter().filter(|i| is_low_stock(i)).collect()
}

pub fn low_stock_count(items: &[InventoryItem]) -> usize {
    items.iter().filter(|i| is_low_stock(i)).count()
}

/// Total quantity across all items.
pub fn total_quantity(items: &[InventoryItem]) -> f64 {
    items.iter().map(InventoryItem::qty_or_zero).sum()
}

/// Total stock value: quantity times unit cost, summed.
pub fn total_value(items: &[InventoryItem]) -> f64 {
    items
        .iter()
        .map(|i| i.qty_or_zero() * i.cost_or_zero())
        .sum()
}

//! Sample items for seeding a fresh catalog

use super::record::ItemRecord;

/// Produce four sample grocery items, prices in cents
pub fn sample_items() -> Vec<ItemRecord> {
    vec![
        ItemRecord::new("A12T-4GH7-QPL9-3N4M", "Lettuce", 3_46),
        ItemRecord::new("E5T6-9UI3-TH15-QR88", "Peach", 2_99),
        ItemRecord::new("YRT6-72AS-K736-L4AR", "Green Pepper", 79),
        ItemRecord::new("TQ4C-VV6T-75ZX-1RMR", "Gala Apple", 3_59),
    ]
}

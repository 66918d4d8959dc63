//! Embedded fallback menu used when the catalog endpoint is unreachable.
//!
//! Authored in the same raw shape the endpoint returns and run through the
//! regular normalizer, so a degraded session looks exactly like a live one.

use serde_json::{Value, json};

use super::CatalogItem;
use super::filter::ALL_CATEGORIES;
use super::normalize;

/// Raw fallback data: three categories, five items.
fn raw() -> Value {
    json!({
        "Nasi & Lauk": [
            { "id": "m1", "menu": "Nasi Lemak Ayam Berempah", "harga": 8.50, "harga_asal": 9.50, "stok": 15, "status": "AKTIF", "gambar": "https://images.unsplash.com/photo-1571407970349-bc81e7e96d47?auto=format&fit=crop&q=80&w=400" },
            { "id": "m2", "menu": "Nasi Kerabu Keramat", "harga": 10.00, "harga_asal": 12.00, "stok": 10, "status": "AKTIF", "gambar": "https://images.unsplash.com/photo-1626082927389-6cd097cdc6ec?auto=format&fit=crop&q=80&w=400" }
        ],
        "Minuman": [
            { "id": "m3", "menu": "Teh Tarik Kaw", "harga": 2.50, "harga_asal": 3.00, "stok": 50, "status": "AKTIF", "gambar": "https://images.unsplash.com/photo-1594631252845-29fc4586c567?auto=format&fit=crop&q=80&w=400" },
            { "id": "m4", "menu": "Sirap Bandung Muar", "harga": 3.50, "harga_asal": 4.00, "stok": 30, "status": "AKTIF", "gambar": "https://images.unsplash.com/photo-1513558161293-cdaf765ed2fd?auto=format&fit=crop&q=80&w=400" }
        ],
        "Pencuci Mulut": [
            { "id": "m5", "menu": "Kuih Lapis Pelangi", "harga": 4.00, "harga_asal": 5.00, "stok": 20, "status": "AKTIF", "gambar": "https://images.unsplash.com/photo-1563729784474-d77dbb933a9e?auto=format&fit=crop&q=80&w=400" }
        ]
    })
}

/// The fallback menu as items and category tabs.
#[must_use]
pub fn menu() -> (Vec<CatalogItem>, Vec<String>) {
    let raw = raw();
    raw.as_object()
        .and_then(|data| normalize::flatten(data).ok())
        .unwrap_or_else(|| (Vec::new(), vec![ALL_CATEGORIES.to_string()]))
}

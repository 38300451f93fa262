//! Test fixtures: image bytes and canned provider payloads.

use serde_json::{json, Value};

/// Minimal bytes that pass for a JPEG upload (declared type is what
/// the validator checks; magic bytes just keep fixtures honest).
pub fn jpeg_bytes() -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.extend(std::iter::repeat(0u8).take(64));
    bytes.extend([0xFF, 0xD9]);
    bytes
}

/// Minimal PNG-flavored bytes.
pub fn png_bytes() -> Vec<u8> {
    let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend(std::iter::repeat(0u8).take(64));
    bytes
}

/// JPEG bytes of a specific size, for payload-limit tests.
pub fn jpeg_bytes_of_size(size: usize) -> Vec<u8> {
    vec![0u8; size]
}

/// One upstream result entry in the provider's shape.
pub fn plantnet_result(species: &str, score: f64) -> Value {
    json!({
        "score": score,
        "species": {
            "scientificNameWithoutAuthor": species,
            "scientificName": format!("{} L.", species),
            "commonNames": ["A common name"]
        },
        "genus": { "scientificNameWithoutAuthor": species.split(' ').next().unwrap_or(species) },
        "family": { "scientificNameWithoutAuthor": "Testaceae" },
        "images": [
            { "url": format!("https://plantnet.example/{}.jpg", species.replace(' ', "-")), "source": "plantnet" }
        ]
    })
}

/// A full provider payload with `n` descending-score results.
pub fn plantnet_payload(n: usize) -> Value {
    let results: Vec<Value> = (0..n)
        .map(|i| plantnet_result(&format!("Species number{}", i), 0.9 - (i as f64) * 0.1))
        .collect();
    json!({ "results": results })
}

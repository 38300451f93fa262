//! Upstream payload normalization.
//!
//! The identification provider's JSON is partially optional and not
//! contractually guaranteed, so the payload stays a `serde_json::Value`
//! and every field access is guarded. Absent or malformed fields
//! degrade to defaults; nothing in here returns an error.

use serde_json::Value;

use crate::limits::{MAX_RESULTS, UNKNOWN_SPECIES};
use crate::results::{IdentifyResult, ResultImage};

/// Map the raw provider payload into the stable result shape.
///
/// Takes the first [`MAX_RESULTS`] entries of `payload.results` in
/// upstream order; extras are silently dropped since the provider
/// pre-ranks by confidence.
pub fn normalize(payload: &Value) -> Vec<IdentifyResult> {
    let Some(raw_results) = payload.get("results").and_then(Value::as_array) else {
        return Vec::new();
    };

    raw_results
        .iter()
        .take(MAX_RESULTS)
        .map(normalize_entry)
        .collect()
}

fn normalize_entry(entry: &Value) -> IdentifyResult {
    let species = entry.get("species");

    let species_name = species
        .and_then(|s| non_empty_str(s.get("scientificNameWithoutAuthor")))
        .or_else(|| species.and_then(|s| non_empty_str(s.get("scientificName"))))
        .or_else(|| {
            species
                .and_then(|s| s.get("commonNames"))
                .and_then(Value::as_array)
                .and_then(|names| names.first())
                .and_then(|first| non_empty_str(Some(first)))
        })
        .unwrap_or_else(|| UNKNOWN_SPECIES.to_string());

    let score = entry.get("score").and_then(Value::as_f64).unwrap_or(0.0);

    IdentifyResult {
        species: species_name,
        score,
        genus: taxon_name(entry.get("genus")),
        family: taxon_name(entry.get("family")),
        images: normalize_images(entry.get("images")),
        image: None,
    }
}

/// Name of a nested taxon object (genus/family), preferring the
/// author-free form.
fn taxon_name(taxon: Option<&Value>) -> Option<String> {
    let taxon = taxon?;
    non_empty_str(taxon.get("scientificNameWithoutAuthor"))
        .or_else(|| non_empty_str(taxon.get("scientificName")))
}

/// Keep only image entries with a string `url`.
fn normalize_images(images: Option<&Value>) -> Vec<ResultImage> {
    let Some(images) = images.and_then(Value::as_array) else {
        return Vec::new();
    };

    images
        .iter()
        .filter_map(|image| {
            let url = image.get("url")?.as_str()?.to_string();
            let source = non_empty_str(image.get("source"));
            Some(ResultImage { url, source })
        })
        .collect()
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

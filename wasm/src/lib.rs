//! WebAssembly module for the Textile Mill Inventory Platform
//!
//! Provides client-side computation for:
//! - Program draft validation
//! - Allocation totals and tolerance checks
//! - Wastage and billing figures
//! - Offline effective-rate resolution

use rust_decimal::Decimal;
use uuid::Uuid;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    web_sys::console::debug_1(&"textile inventory wasm ready".into());
}

/// Validate a program draft. Returns the display message of the first
/// failed check, or nothing when the draft is consistent.
#[wasm_bindgen]
pub fn validate_program_draft(draft_json: &str) -> Result<Option<String>, JsValue> {
    let draft: ProgramDraft = serde_json::from_str(draft_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid draft JSON: {}", e)))?;

    Ok(validate_draft(&draft).err().map(|err| err.to_string()))
}

/// Validate a program draft, returning the stable code of the first failed
/// check for shells that branch on it
#[wasm_bindgen]
pub fn validate_program_draft_code(draft_json: &str) -> Result<Option<String>, JsValue> {
    let draft: ProgramDraft = serde_json::from_str(draft_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid draft JSON: {}", e)))?;

    Ok(validate_draft(&draft).err().map(|err| err.code().to_string()))
}

/// Sum allocated meters across allocation rows
#[wasm_bindgen]
pub fn total_allocated_meters(rows_json: &str) -> Result<f64, JsValue> {
    let rows: Vec<AllocationRow> = serde_json::from_str(rows_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid rows JSON: {}", e)))?;

    let total = total_allocated(&rows);
    Ok(total.to_string().parse().unwrap_or(0.0))
}

/// Whether an allocation total matches the input meters within tolerance
#[wasm_bindgen]
pub fn allocation_within_tolerance(allocated: f64, input: f64) -> bool {
    let allocated = Decimal::try_from(allocated).unwrap_or(Decimal::ZERO);
    let input = Decimal::try_from(input).unwrap_or(Decimal::ZERO);
    within_tolerance(allocated, input)
}

/// Calculate wastage meters from input and output
#[wasm_bindgen]
pub fn calculate_wastage(input_meters: f64, output_meters: f64) -> f64 {
    input_meters - output_meters
}

/// Calculate wastage as a percentage of input meters
#[wasm_bindgen]
pub fn calculate_wastage_percentage(input_meters: f64, wastage_meters: f64) -> f64 {
    if input_meters <= 0.0 {
        return 0.0;
    }
    (wastage_meters / input_meters) * 100.0
}

/// Whether a wastage percentage is over the review threshold
#[wasm_bindgen]
pub fn is_wastage_high(percentage: f64) -> bool {
    let percentage = Decimal::try_from(percentage).unwrap_or(Decimal::ZERO);
    percentage > default_wastage_threshold()
}

/// Calculate the billable amount for a program. Zero until a rate is known.
#[wasm_bindgen]
pub fn calculate_total_amount(output_meters: f64, rate_per_meter: f64, tax_amount: f64) -> f64 {
    let output = Decimal::try_from(output_meters).unwrap_or(Decimal::ZERO);
    let rate = Decimal::try_from(rate_per_meter).unwrap_or(Decimal::ZERO);
    let tax = Decimal::try_from(tax_amount).unwrap_or(Decimal::ZERO);

    if rate <= Decimal::ZERO {
        return 0.0;
    }
    (output * rate + tax).to_string().parse().unwrap_or(0.0)
}

/// Ids of the lots offerable in the row selectors for the given draft
#[wasm_bindgen]
pub fn selectable_lot_ids(
    draft_json: &str,
    available_json: &str,
    all_lots_json: &str,
    editing: bool,
) -> Result<js_sys::Array, JsValue> {
    let draft: ProgramDraft = serde_json::from_str(draft_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid draft JSON: {}", e)))?;
    let available: Vec<StockLot> = serde_json::from_str(available_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid lots JSON: {}", e)))?;
    let all_lots: Vec<StockLot> = serde_json::from_str(all_lots_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid lots JSON: {}", e)))?;

    Ok(selectable_lots(&draft, &available, &all_lots, editing)
        .iter()
        .map(|lot| JsValue::from_str(&lot.id.to_string()))
        .collect())
}

/// Resolve the effective rate for a (party, quality) pair from local
/// snapshots, for offline entry. Returns `{"rate": ..., "source": ...}`.
#[wasm_bindgen]
pub fn resolve_program_rate(
    party_id: &str,
    quality_id: &str,
    overrides_json: &str,
    qualities_json: &str,
) -> Result<String, JsValue> {
    let party = Uuid::parse_str(party_id)
        .map_err(|e| JsValue::from_str(&format!("Invalid party id: {}", e)))?;
    let quality = Uuid::parse_str(quality_id)
        .map_err(|e| JsValue::from_str(&format!("Invalid quality id: {}", e)))?;
    let overrides: Vec<PartyQualityRate> = serde_json::from_str(overrides_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid rates JSON: {}", e)))?;
    let qualities: Vec<QualityType> = serde_json::from_str(qualities_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid qualities JSON: {}", e)))?;

    let resolved = resolve_effective_rate(party, quality, &overrides, &qualities);
    serde_json::to_string(&resolved)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

use serde::Serialize;
use text_standardize::{StandardizeOptions, Table};
use wasm_bindgen::prelude::*;

/// Null cells come back as JS `null`, not `undefined`.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::new().serialize_missing_as_null(true))
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Standardize one string with the default rules.
#[wasm_bindgen]
pub fn standardize_text(text: &str) -> String {
    text_standardize::standardize_text(text)
}

/// Compiled URL/mention stripping rules.
#[wasm_bindgen]
pub struct TextStandardizer {
    inner: text_standardize::TextStandardizer,
}

#[wasm_bindgen]
impl TextStandardizer {
    /// Create a standardizer from a JS options object, e.g.
    /// `{ case_insensitive_http: true }`. `undefined` uses the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<TextStandardizer, JsError> {
        let options: StandardizeOptions = if options.is_undefined() || options.is_null() {
            StandardizeOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| JsError::new(&format!("Invalid options object: {}", e)))?
        };
        let inner = text_standardize::TextStandardizer::new(options)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn standardize_text(&self, text: &str) -> String {
        self.inner.standardize_text(text)
    }

    /// Returns `{ output, urls_removed, bare_http_removed, mentions_removed, at_replaced }`.
    pub fn standardize_text_with_report(&self, text: &str) -> Result<JsValue, JsError> {
        let report = self.inner.standardize_text_with_report(text);
        to_js(&report)
    }

    /// Standardize column `field` of a `{ columns: [{ name, values }] }` table.
    /// Returns the rewritten table.
    pub fn standardize_table(&self, table: JsValue, field: &str) -> Result<JsValue, JsError> {
        let table: Table = serde_wasm_bindgen::from_value(table)
            .map_err(|e| JsError::new(&format!("Invalid table object: {}", e)))?;
        let table = self
            .inner
            .standardize(table, field)
            .map_err(|e| JsError::new(&e.to_string()))?;
        to_js(&table)
    }
}

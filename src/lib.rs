#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
use pyo3::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

mod ast;
mod error;
mod parser;
mod types;

pub use ast::{
    BareText, CharacterDeclaration, Comment, Document, Label, Narrative, Node, ParamValue, Tag,
};
pub use error::{FailureReason, ParseError};
pub use parser::{parse, parse_with_options, ParseOptions};
pub use types::{ErrorReport, ParseReport};

/// Parses `source` and folds the outcome into a serializable report.
pub fn report(source: &str, options: &ParseOptions) -> ParseReport {
    parse_with_options(source, options).into()
}

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pyfunction]
fn parse_text(text: String) -> PyResult<String> {
    let output = report(&text, &ParseOptions::default());

    serde_json::to_string_pretty(&output)
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn parse_text_wasm(text: &str) -> Result<String, JsValue> {
    let output = report(text, &ParseOptions::default());

    serde_json::to_string_pretty(&output).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn parse_text_with_options_wasm(
    text: &str,
    strip_bom: bool,
    standalone_block_close: bool,
) -> Result<String, JsValue> {
    let output = report(
        text,
        &ParseOptions {
            strip_bom,
            standalone_block_close,
        },
    );

    serde_json::to_string_pretty(&output).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pymodule]
fn scenario_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(parse_text, m)?)?;
    Ok(())
}

//! Recognition profiles, one per code family.
//!
//! Option names and values are the ones the engine understands and are
//! applied in table order (`default_parameters` must come first for matrix
//! codes, since it resets every other option).

use crate::models::CodeFamily;
use serde::Serialize;
use std::fmt;

/// Value of a single engine option
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Symbolic value (`"any"`, `"true"`, ...)
    Text(&'static str),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Named engine option
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfigParam {
    /// Engine option name
    pub name: &'static str,
    /// Option value
    pub value: ParamValue,
}

const fn text(name: &'static str, value: &'static str) -> ConfigParam {
    ConfigParam {
        name,
        value: ParamValue::Text(value),
    }
}

const fn int(name: &'static str, value: i64) -> ConfigParam {
    ConfigParam {
        name,
        value: ParamValue::Int(value),
    }
}

const fn float(name: &'static str, value: f64) -> ConfigParam {
    ConfigParam {
        name,
        value: ParamValue::Float(value),
    }
}

const LINEAR_PARAMS: &[ConfigParam] = &[
    int("num_scanlines", 150),
    int("barcode_width_min", 10),
    int("barcode_width_max", 300),
    float("meas_thresh", 0.001),
    int("meas_thresh_abs", 5),
    int("orientation", -90),
    text("majority_voting", "true"),
    int("element_size_max", 64),
    text("merge_scanlines", "true"),
];

// Shared by Data Matrix ECC 200 and GS1 DataMatrix.
const DATA_MATRIX_PARAMS: &[ConfigParam] = &[
    text("default_parameters", "maximum_recognition"),
    text("polarity", "any"),
    int("module_size_min", 1),
    int("module_size_max", 100),
    text("module_gap_max", "big"),
    text("finder_pattern_tolerance", "any"),
    text("alternating_pattern_tolerance", "high"),
    text("module_grid", "any"),
    text("small_modules_robustness", "high"),
    text("strict_model", "no"),
    text("strict_quiet_zone", "no"),
    text("candidate_selection", "extensive"),
];

const QR_PARAMS: &[ConfigParam] = &[
    text("default_parameters", "maximum_recognition"),
    text("polarity", "any"),
    text("model_type", "any"),
    int("version_min", 1),
    int("version_max", 40),
    int("module_size_min", 1),
    int("module_size_max", 100),
    text("module_gap_max", "big"),
    text("contrast_tolerance", "any"),
    int("position_pattern_min", 2),
    text("small_modules_robustness", "high"),
    text("strict_model", "no"),
    text("candidate_selection", "all"),
];

/// Complete option set for one family.
///
/// Only obtainable through [`profile_for`], so a profile handed to an engine
/// is never partially specified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfigProfile {
    family: CodeFamily,
    params: &'static [ConfigParam],
}

impl ConfigProfile {
    /// Family this profile configures
    pub fn family(&self) -> CodeFamily {
        self.family
    }

    /// Options in application order
    pub fn params(&self) -> &'static [ConfigParam] {
        self.params
    }

    /// Look up an option by name
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.params.iter().find(|p| p.name == name).map(|p| p.value)
    }
}

/// Profile for `family`
pub fn profile_for(family: CodeFamily) -> ConfigProfile {
    let params = match family {
        CodeFamily::Code39 | CodeFamily::Code93 | CodeFamily::Code128 => LINEAR_PARAMS,
        CodeFamily::DataMatrixEcc200 | CodeFamily::Gs1DataMatrix => DATA_MATRIX_PARAMS,
        CodeFamily::QrCode => QR_PARAMS,
    };
    ConfigProfile { family, params }
}

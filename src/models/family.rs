use serde::Serialize;
use std::fmt;

/// Whether a family is read along scanlines or as a module grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Dimension {
    /// 1D bar code
    Linear,
    /// 2D matrix code
    Matrix,
}

/// Supported code families.
///
/// Declaration order is the dispatch order: linear families first, then
/// matrix families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CodeFamily {
    /// Code 39
    #[serde(rename = "Code 39")]
    Code39,
    /// Code 93
    #[serde(rename = "Code 93")]
    Code93,
    /// Code 128
    #[serde(rename = "Code 128")]
    Code128,
    /// Data Matrix ECC 200
    #[serde(rename = "Data Matrix ECC 200")]
    DataMatrixEcc200,
    /// QR Code
    #[serde(rename = "QR Code")]
    QrCode,
    /// GS1 DataMatrix
    #[serde(rename = "GS1 DataMatrix")]
    Gs1DataMatrix,
}

impl CodeFamily {
    /// Every family, in dispatch order
    pub const ALL: [CodeFamily; 6] = [
        CodeFamily::Code39,
        CodeFamily::Code93,
        CodeFamily::Code128,
        CodeFamily::DataMatrixEcc200,
        CodeFamily::QrCode,
        CodeFamily::Gs1DataMatrix,
    ];

    /// Linear or matrix
    pub fn dimension(&self) -> Dimension {
        match self {
            CodeFamily::Code39 | CodeFamily::Code93 | CodeFamily::Code128 => Dimension::Linear,
            CodeFamily::DataMatrixEcc200 | CodeFamily::QrCode | CodeFamily::Gs1DataMatrix => {
                Dimension::Matrix
            }
        }
    }

    /// Symbology name as understood by recognition engines.
    ///
    /// Linear families pass it as the decode sub-selector, matrix families
    /// pass it when the model is created.
    pub fn engine_name(&self) -> &'static str {
        match self {
            CodeFamily::Code39 => "Code 39",
            CodeFamily::Code93 => "Code 93",
            CodeFamily::Code128 => "Code 128",
            CodeFamily::DataMatrixEcc200 => "Data Matrix ECC 200",
            CodeFamily::QrCode => "QR Code",
            CodeFamily::Gs1DataMatrix => "GS1 DataMatrix",
        }
    }

    /// Parse a family from its engine name or identifier.
    ///
    /// Case, spaces, dashes and underscores are ignored, so `"qr code"`,
    /// `"QRCode"` and `"qr_code"` all resolve to [`CodeFamily::QrCode`].
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "code39" => Some(CodeFamily::Code39),
            "code93" => Some(CodeFamily::Code93),
            "code128" => Some(CodeFamily::Code128),
            "datamatrixecc200" | "datamatrix" => Some(CodeFamily::DataMatrixEcc200),
            "qrcode" | "qr" => Some(CodeFamily::QrCode),
            "gs1datamatrix" => Some(CodeFamily::Gs1DataMatrix),
            _ => None,
        }
    }
}

impl fmt::Display for CodeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.engine_name())
    }
}

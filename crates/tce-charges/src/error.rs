use rust_decimal::Decimal;

/// Every way a charge computation can refuse its input.
///
/// Computations either fully succeed or fail with one of these; there is no
/// partial breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeError {
    /// `price <= 0`, `quantity <= 0`, a non-finite numeric input, or a
    /// negative brokerage.
    InvalidChargeInput { field: &'static str, value: String },
    /// Text did not name one of the closed instrument categories.
    UnknownInstrumentCategory { raw: String },
    /// Text did not name a trade side.
    UnknownSide { raw: String },
    /// Manually entered non-brokerage charges must be `>= 0`.
    NegativeOverride { value: Decimal },
    /// Breakeven per unit is undefined for a zero quantity.
    ZeroQuantity,
    /// A product left the representable decimal range.
    Overflow { what: &'static str },
}

impl ChargeError {
    pub(crate) fn invalid(field: &'static str, value: impl ToString) -> Self {
        Self::InvalidChargeInput {
            field,
            value: value.to_string(),
        }
    }
}

impl std::fmt::Display for ChargeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidChargeInput { field, value } => match *field {
                "brokerage" => write!(f, "invalid charge input: brokerage must be >= 0, got {value}"),
                _ => write!(f, "invalid charge input: {field} must be > 0, got {value}"),
            },
            Self::UnknownInstrumentCategory { raw } => write!(
                f,
                "unknown instrument category '{raw}'. expected one of: \
                 options_derivative | futures_derivative | intraday_equity | delivery_equity | other"
            ),
            Self::UnknownSide { raw } => {
                write!(f, "unknown side '{raw}'. expected one of: buy | sell")
            }
            Self::NegativeOverride { value } => {
                write!(f, "override charges must be >= 0, got {value}")
            }
            Self::ZeroQuantity => write!(f, "breakeven is undefined for quantity 0"),
            Self::Overflow { what } => write!(f, "decimal overflow computing {what}"),
        }
    }
}

impl std::error::Error for ChargeError {}

// ============================================================================
// Currency
// ISO 4217 codes with their number of minor-unit digits
// ============================================================================

use crate::numeric::{NumericError, NumericResult};
use arrayvec::ArrayString;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Most minor-unit digits a currency may declare.
pub const MAX_CURRENCY_DECIMALS: u8 = 6;

/// Source of currency metadata.
///
/// The built-in `Iso4217` table answers for the common codes; a database
/// or reference-data backed provider can stand in for it.
pub trait CurrencyDataProvider {
    /// Number of minor-unit digits for `code`, or `None` if unknown.
    fn decimals(&self, code: &str) -> Option<u8>;

    /// ISO numeric code, if the provider knows it.
    fn numeric_code(&self, _code: &str) -> Option<u16> {
        None
    }
}

/// A currency: three upper-case letters and a minor-unit digit count.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "CurrencyWire"))]
pub struct Currency {
    code: ArrayString<3>,
    decimals: u8,
}

impl Currency {
    /// Create a currency from its code and number of decimals.
    ///
    /// # Errors
    /// `InvalidCurrency` if the code is not three upper-case ASCII letters
    /// or the decimals exceed six.
    pub fn new(code: &str, decimals: u8) -> NumericResult<Self> {
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(NumericError::InvalidCurrency("code must be three upper-case letters"));
        }
        if decimals > MAX_CURRENCY_DECIMALS {
            return Err(NumericError::InvalidCurrency("more than six decimals"));
        }
        let code = ArrayString::from(code)
            .map_err(|_| NumericError::InvalidCurrency("code must be three upper-case letters"))?;
        Ok(Self { code, decimals })
    }

    /// Look up `code` in `provider`.
    pub fn from_provider<P: CurrencyDataProvider + ?Sized>(code: &str, provider: &P) -> NumericResult<Self> {
        let decimals = provider
            .decimals(code)
            .ok_or(NumericError::InvalidCurrency("unknown currency code"))?;
        Self::new(code, decimals)
    }

    /// Look up `code` in the built-in ISO 4217 table.
    pub fn iso(code: &str) -> NumericResult<Self> {
        Self::from_provider(code, &Iso4217)
    }

    #[inline]
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Number of minor-unit digits, which is the scale of amounts in it.
    #[inline]
    pub fn decimals(&self) -> u8 {
        self.decimals
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({}, decimals={})", self.code, self.decimals)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl std::str::FromStr for Currency {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::iso(s.trim())
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct CurrencyWire {
    code: String,
    decimals: u8,
}

#[cfg(feature = "serde")]
impl TryFrom<CurrencyWire> for Currency {
    type Error = NumericError;

    fn try_from(wire: CurrencyWire) -> Result<Self, Self::Error> {
        Self::new(&wire.code, wire.decimals)
    }
}

// ============================================================================
// Built-in ISO 4217 table
// ============================================================================

/// Provider backed by a compiled-in subset of ISO 4217.
#[derive(Debug, Clone, Copy, Default)]
pub struct Iso4217;

/// (code, numeric code, minor-unit digits), sorted by code.
const ISO_4217: &[(&str, u16, u8)] = &[
    ("AED", 784, 2),
    ("AUD", 36, 2),
    ("BHD", 48, 3),
    ("BRL", 986, 2),
    ("CAD", 124, 2),
    ("CHF", 756, 2),
    ("CLF", 990, 4),
    ("CLP", 152, 0),
    ("CNY", 156, 2),
    ("CZK", 203, 2),
    ("DKK", 208, 2),
    ("EUR", 978, 2),
    ("GBP", 826, 2),
    ("HKD", 344, 2),
    ("HUF", 348, 2),
    ("IDR", 360, 2),
    ("ILS", 376, 2),
    ("INR", 356, 2),
    ("ISK", 352, 0),
    ("JOD", 400, 3),
    ("JPY", 392, 0),
    ("KRW", 410, 0),
    ("KWD", 414, 3),
    ("MXN", 484, 2),
    ("NOK", 578, 2),
    ("NZD", 554, 2),
    ("OMR", 512, 3),
    ("PLN", 985, 2),
    ("RUB", 643, 2),
    ("SAR", 682, 2),
    ("SEK", 752, 2),
    ("SGD", 702, 2),
    ("THB", 764, 2),
    ("TND", 788, 3),
    ("TRY", 949, 2),
    ("USD", 840, 2),
    ("UYW", 927, 4),
    ("VND", 704, 0),
    ("XAU", 959, 0),
    ("ZAR", 710, 2),
];

impl Iso4217 {
    fn entry(code: &str) -> Option<&'static (&'static str, u16, u8)> {
        ISO_4217
            .binary_search_by(|(c, _, _)| (*c).cmp(code))
            .ok()
            .map(|i| &ISO_4217[i])
    }
}

impl CurrencyDataProvider for Iso4217 {
    fn decimals(&self, code: &str) -> Option<u8> {
        Self::entry(code).map(|(_, _, decimals)| *decimals)
    }

    fn numeric_code(&self, code: &str) -> Option<u16> {
        Self::entry(code).map(|(_, numeric, _)| *numeric)
    }
}

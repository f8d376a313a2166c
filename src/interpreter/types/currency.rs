use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::ConfigError;

/// Currency symbols the lexer recognizes, with the code each one denotes.
pub const SYMBOLS: [(&str, &str); 5] = [("$", "USD"), ("€", "EUR"), ("£", "GBP"), ("¥", "JPY"), ("₹", "INR")];

/// ISO 4217 active codes, sorted for binary search.
static ISO_4217: &[&str] = &[
    "AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN", "BAM", "BBD", "BDT", "BGN", "BHD", "BIF",
    "BMD", "BND", "BOB", "BRL", "BSD", "BTN", "BWP", "BYN", "BZD", "CAD", "CDF", "CHF", "CLP", "CNY", "COP", "CRC",
    "CUP", "CVE", "CZK", "DJF", "DKK", "DOP", "DZD", "EGP", "ERN", "ETB", "EUR", "FJD", "FKP", "GBP", "GEL", "GHS",
    "GIP", "GMD", "GNF", "GTQ", "GYD", "HKD", "HNL", "HTG", "HUF", "IDR", "ILS", "INR", "IQD", "IRR", "ISK", "JMD",
    "JOD", "JPY", "KES", "KGS", "KHR", "KMF", "KPW", "KRW", "KWD", "KYD", "KZT", "LAK", "LBP", "LKR", "LRD", "LSL",
    "LYD", "MAD", "MDL", "MGA", "MKD", "MMK", "MNT", "MOP", "MRU", "MUR", "MVR", "MWK", "MXN", "MYR", "MZN", "NAD",
    "NGN", "NIO", "NOK", "NPR", "NZD", "OMR", "PAB", "PEN", "PGK", "PHP", "PKR", "PLN", "PYG", "QAR", "RON", "RSD",
    "RUB", "RWF", "SAR", "SBD", "SCR", "SDG", "SEK", "SGD", "SHP", "SLE", "SOS", "SRD", "SSP", "STN", "SVC", "SYP",
    "SZL", "THB", "TJS", "TMT", "TND", "TOP", "TRY", "TTD", "TWD", "TZS", "UAH", "UGX", "USD", "UYU", "UZS", "VES",
    "VND", "VUV", "WST", "XAF", "XAG", "XAU", "XCD", "XDR", "XOF", "XPD", "XPF", "XPT", "XTS", "XXX", "YER", "ZAR",
    "ZMW", "ZWL",
];

/// Codes ISO lists that are not money: testing, "no currency", precious
/// metals and the IMF's special drawing right. Amounts in them are plain unit
/// labels.
const RESERVED: [&str; 7] = ["XAG", "XAU", "XDR", "XPD", "XPT", "XTS", "XXX"];

/// Returns the ISO code a currency symbol stands for.
#[must_use]
pub fn code_for_symbol(symbol: &str) -> Option<&'static str> {
    SYMBOLS.iter()
           .find(|(s, _)| *s == symbol)
           .map(|(_, code)| *code)
}

/// Returns the display symbol of a currency code, if it has one.
#[must_use]
pub fn symbol_for_code(code: &str) -> Option<&'static str> {
    SYMBOLS.iter()
           .find(|(_, c)| *c == code)
           .map(|(symbol, _)| *symbol)
}

/// Whether `text` has the shape of a currency code: three uppercase ASCII
/// letters.
#[must_use]
pub fn looks_like_code(text: &str) -> bool {
    text.len() == 3 && text.bytes().all(|b| b.is_ascii_uppercase())
}

/// Whether `code` is an active, non-reserved ISO 4217 code.
///
/// # Example
/// ```
/// use calcmark::interpreter::types::currency::is_valid_code;
///
/// assert!(is_valid_code("EUR"));
/// assert!(!is_valid_code("XTS"));
/// assert!(!is_valid_code("ABC"));
/// assert!(!is_valid_code("usd"));
/// ```
#[must_use]
pub fn is_valid_code(code: &str) -> bool {
    looks_like_code(code) && !RESERVED.contains(&code) && ISO_4217.binary_search(&code).is_ok()
}

/// Normalizes a symbol or code to a code. Returns `None` for text that is
/// neither a known symbol nor a valid code.
#[must_use]
pub fn normalize(text: &str) -> Option<String> {
    code_for_symbol(text).map(str::to_string)
                         .or_else(|| is_valid_code(text).then(|| text.to_string()))
}

/// Source of exchange rates for currency arithmetic and conversion.
pub trait RateLookup {
    /// Multiplier taking an amount in `from` to an amount in `to`.
    fn rate(&self, from: &str, to: &str) -> Option<Decimal>;

    /// Whether an amount in `from` can be expressed in `to`.
    fn can_convert(&self, from: &str, to: &str) -> bool {
        from == to || self.rate(from, to).is_some()
    }
}

/// A rate table that never converts. Used when type-checking without a
/// configured environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRates;

impl RateLookup for NoRates {
    fn rate(&self, _from: &str, _to: &str) -> Option<Decimal> {
        None
    }
}

/// Configured exchange rates keyed by `(from, to)`.
///
/// Registering `USD -> EUR` also makes `EUR -> USD` available as the
/// reciprocal; an explicitly registered reverse rate always wins.
///
/// # Example
/// ```
/// use calcmark::interpreter::types::currency::{ExchangeRates, RateLookup};
/// use rust_decimal::Decimal;
///
/// let mut rates = ExchangeRates::default();
/// rates.insert("USD", "EUR", Decimal::new(5, 1));
///
/// assert_eq!(rates.rate("USD", "EUR"), Some(Decimal::new(5, 1)));
/// assert_eq!(rates.rate("EUR", "USD"), Some(Decimal::from(2)));
/// assert_eq!(rates.rate("USD", "GBP"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExchangeRates {
    rates: BTreeMap<(String, String), Decimal>,
}

impl ExchangeRates {
    /// Registers a rate. Codes are stored upper-cased.
    pub fn insert(&mut self, from: &str, to: &str, rate: Decimal) {
        self.rates
            .insert((from.to_ascii_uppercase(), to.to_ascii_uppercase()), rate);
    }

    /// Number of explicitly registered rates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Whether no rates are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Parses a `FROM/TO=RATE` pair as accepted on the command line.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when the pair is malformed, a code is not a
    /// currency, or the rate is not a positive decimal.
    ///
    /// # Example
    /// ```
    /// use calcmark::interpreter::types::currency::ExchangeRates;
    /// use rust_decimal::Decimal;
    ///
    /// let (from, to, rate) = ExchangeRates::parse_pair("USD/EUR=0.92").unwrap();
    /// assert_eq!((from.as_str(), to.as_str()), ("USD", "EUR"));
    /// assert_eq!(rate, Decimal::new(92, 2));
    ///
    /// assert!(ExchangeRates::parse_pair("USD=0.92").is_err());
    /// ```
    pub fn parse_pair(pair: &str) -> Result<(String, String, Decimal), ConfigError> {
        let malformed = || ConfigError::MalformedPair { pair: pair.to_string() };

        let (codes, rate) = pair.split_once('=').ok_or_else(malformed)?;
        let (from, to) = codes.split_once('/').ok_or_else(malformed)?;
        let from = normalize(from.trim().to_ascii_uppercase().as_str()).ok_or_else(malformed)?;
        let to = normalize(to.trim().to_ascii_uppercase().as_str()).ok_or_else(malformed)?;

        let invalid_rate = || ConfigError::InvalidRate { pair: pair.to_string(),
                                                         rate: rate.trim().to_string(), };
        let rate = rate.trim().parse::<Decimal>().map_err(|_| invalid_rate())?;
        if rate <= Decimal::ZERO {
            return Err(invalid_rate());
        }

        Ok((from, to, rate))
    }
}

impl RateLookup for ExchangeRates {
    fn rate(&self, from: &str, to: &str) -> Option<Decimal> {
        if from == to {
            return Some(Decimal::ONE);
        }
        if let Some(rate) = self.rates.get(&(from.to_string(), to.to_string())) {
            return Some(*rate);
        }
        self.rates
            .get(&(to.to_string(), from.to_string()))
            .and_then(|reverse| Decimal::ONE.checked_div(*reverse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_table_is_sorted() {
        assert!(ISO_4217.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn symbols_normalize_to_codes() {
        assert_eq!(normalize("€").as_deref(), Some("EUR"));
        assert_eq!(normalize("GBP").as_deref(), Some("GBP"));
        assert_eq!(normalize("XXX"), None);
    }

    #[test]
    fn metals_and_drawing_rights_are_not_money() {
        for code in ["XAU", "XAG", "XPD", "XPT", "XDR"] {
            assert!(!is_valid_code(code), "{code} accepted as money");
            assert_eq!(normalize(code), None);
        }
        assert!(is_valid_code("XAF"));
        assert!(is_valid_code("XOF"));
    }

    #[test]
    fn explicit_reverse_rate_wins() {
        let mut rates = ExchangeRates::default();
        rates.insert("USD", "EUR", Decimal::new(5, 1));
        rates.insert("EUR", "USD", Decimal::new(3, 0));
        assert_eq!(rates.rate("EUR", "USD"), Some(Decimal::new(3, 0)));
    }

    #[test]
    fn non_positive_rates_are_rejected() {
        assert!(matches!(ExchangeRates::parse_pair("USD/EUR=0"),
                         Err(ConfigError::InvalidRate { .. })));
        assert!(matches!(ExchangeRates::parse_pair("USD/EUR=abc"),
                         Err(ConfigError::InvalidRate { .. })));
    }
}

use serde::Serialize;

/// Rates are quoted against this currency; its own rate is implicitly 1.0.
///
/// The settlement asset is pegged 1:1 to it.
pub const REFERENCE_CURRENCY: &str = "USD";

/// A currency the checkout can display amounts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

/// Currencies selectable for local amount entry.
pub const SUPPORTED_CURRENCIES: &[CurrencyInfo] = &[
    CurrencyInfo { code: "USD", name: "US Dollar", symbol: "$" },
    CurrencyInfo { code: "EUR", name: "Euro", symbol: "€" },
    CurrencyInfo { code: "GBP", name: "British Pound", symbol: "£" },
    CurrencyInfo { code: "CAD", name: "Canadian Dollar", symbol: "C$" },
    CurrencyInfo { code: "AUD", name: "Australian Dollar", symbol: "A$" },
    CurrencyInfo { code: "ARS", name: "Argentine Peso", symbol: "$" },
    CurrencyInfo { code: "MXN", name: "Mexican Peso", symbol: "$" },
    CurrencyInfo { code: "COP", name: "Colombian Peso", symbol: "$" },
    CurrencyInfo { code: "BRL", name: "Brazilian Real", symbol: "R$" },
    CurrencyInfo { code: "NGN", name: "Nigerian Naira", symbol: "₦" },
    CurrencyInfo { code: "GTQ", name: "Guatemalan Quetzal", symbol: "Q" },
];

impl CurrencyInfo {
    /// Look up a supported currency, case-insensitively.
    pub fn lookup(code: &str) -> Option<&'static CurrencyInfo> {
        let code = code.trim();
        SUPPORTED_CURRENCIES
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    /// The reference currency's table entry.
    pub fn reference() -> &'static CurrencyInfo {
        &SUPPORTED_CURRENCIES[0]
    }

    pub fn is_reference(&self) -> bool {
        self.code == REFERENCE_CURRENCY
    }
}

/// True iff the uppercased code is in the supported table.
pub fn validate_currency(code: &str) -> bool {
    CurrencyInfo::lookup(code).is_some()
}

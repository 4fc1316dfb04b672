//! Static table of supported currencies.

/// A single supported currency. The code is the unique key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyDescriptor {
    pub code: &'static str,
    pub name: &'static str,
    /// Two-letter region code used for flag lookups.
    pub flag: &'static str,
    pub symbol: &'static str,
}

pub const CURRENCIES: [CurrencyDescriptor; 12] = [
    CurrencyDescriptor { code: "USD", name: "US Dollar", flag: "US", symbol: "$" },
    CurrencyDescriptor { code: "EUR", name: "Euro", flag: "DE", symbol: "€" },
    CurrencyDescriptor { code: "GBP", name: "British Pound", flag: "GB", symbol: "£" },
    CurrencyDescriptor { code: "INR", name: "Indian Rupee", flag: "IN", symbol: "₹" },
    CurrencyDescriptor { code: "JPY", name: "Japanese Yen", flag: "JP", symbol: "¥" },
    CurrencyDescriptor { code: "AUD", name: "Australian Dollar", flag: "AU", symbol: "A$" },
    CurrencyDescriptor { code: "CAD", name: "Canadian Dollar", flag: "CA", symbol: "C$" },
    CurrencyDescriptor { code: "CHF", name: "Swiss Franc", flag: "CH", symbol: "CHF" },
    CurrencyDescriptor { code: "CNY", name: "Chinese Yuan", flag: "CN", symbol: "¥" },
    CurrencyDescriptor { code: "NZD", name: "New Zealand Dollar", flag: "NZ", symbol: "NZ$" },
    CurrencyDescriptor { code: "SGD", name: "Singapore Dollar", flag: "SG", symbol: "S$" },
    CurrencyDescriptor { code: "BRL", name: "Brazilian Real", flag: "BR", symbol: "R$" },
];

pub const FLAG_PLACEHOLDER_URL: &str = "https://via.placeholder.com/64x64?text=?";

/// Looks up a currency by its 3-letter code, case-insensitively.
pub fn get(code: &str) -> Option<&'static CurrencyDescriptor> {
    CURRENCIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

/// Templated flag image URL for a 2-letter region code. Consumers that load
/// the image should fall back to [`FLAG_PLACEHOLDER_URL`] on failure.
pub fn flag_url(flag: &str) -> String {
    format!("https://flagsapi.com/{flag}/flat/64.png")
}

/// Regional-indicator rendering of a 2-letter region code, e.g. "US" -> 🇺🇸.
/// Unknown input falls back to the code itself.
pub fn flag_emoji(flag: &str) -> String {
    if flag.len() != 2 || !flag.bytes().all(|b| b.is_ascii_uppercase()) {
        return flag.to_string();
    }
    flag.chars()
        .filter_map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}

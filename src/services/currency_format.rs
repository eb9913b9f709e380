const NBSP: char = '\u{a0}';
const NARROW_NBSP: char = '\u{202f}';

/// Explicit money formatting settings. Amounts are rounded to whole units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub locale: String,
    pub currency: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::new("en", "USD")
    }
}

enum SymbolPlacement {
    Prefix,
    Suffix,
}

impl CurrencyFormat {
    pub fn new(locale: &str, currency: &str) -> Self {
        Self {
            locale: locale.trim().to_string(),
            currency: currency.trim().to_uppercase(),
        }
    }

    /// USD formatting in the given locale (`budgetUSD` values are always dollars)
    pub fn usd(locale: &str) -> Self {
        Self::new(locale, "USD")
    }

    fn language(&self) -> String {
        self.locale
            .split(|c| c == '-' || c == '_')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }

    fn group_separator(&self) -> char {
        match self.language().as_str() {
            "de" | "es" | "it" | "pt" | "nl" | "id" | "tr" | "da" => '.',
            "fr" => NARROW_NBSP,
            _ => ',',
        }
    }

    fn placement(&self) -> SymbolPlacement {
        match self.language().as_str() {
            "de" | "es" | "it" | "pt" | "nl" | "fr" | "tr" | "da" => SymbolPlacement::Suffix,
            _ => SymbolPlacement::Prefix,
        }
    }

    fn symbol(&self) -> String {
        match self.currency.as_str() {
            "USD" => "$".to_string(),
            "EUR" => "€".to_string(),
            "GBP" => "£".to_string(),
            "JPY" => "¥".to_string(),
            "INR" => "₹".to_string(),
            "KRW" => "₩".to_string(),
            other => other.to_string(),
        }
    }

    pub fn format(&self, amount: f64) -> String {
        let amount = if amount.is_finite() { amount } else { 0.0 };
        let rounded = amount.round();
        let digits = group_digits(rounded.abs() as u64, self.group_separator());
        let sign = if rounded < 0.0 { "-" } else { "" };
        let symbol = self.symbol();
        // Alphabetic codes always need a gap to stay readable
        let spaced = symbol.chars().all(|c| c.is_ascii_alphabetic());

        match self.placement() {
            SymbolPlacement::Prefix if spaced => format!("{}{}{}{}", sign, symbol, NBSP, digits),
            SymbolPlacement::Prefix => format!("{}{}{}", sign, symbol, digits),
            SymbolPlacement::Suffix => format!("{}{}{}{}", sign, digits, NBSP, symbol),
        }
    }
}

fn group_digits(value: u64, separator: char) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_dollars_are_prefixed_and_grouped() {
        let format = CurrencyFormat::default();
        assert_eq!(format.format(2500.0), "$2,500");
        assert_eq!(format.format(1234567.4), "$1,234,567");
        assert_eq!(format.format(999.5), "$1,000");
        assert_eq!(format.format(0.0), "$0");
    }

    #[test]
    fn test_european_locales_put_symbol_after() {
        assert_eq!(CurrencyFormat::new("de-DE", "EUR").format(2500.0), "2.500\u{a0}€");
        assert_eq!(
            CurrencyFormat::new("fr", "EUR").format(12000.0),
            "12\u{202f}000\u{a0}€"
        );
    }

    #[test]
    fn test_unknown_currency_uses_code() {
        assert_eq!(CurrencyFormat::new("en", "chf").format(50.0), "CHF\u{a0}50");
    }

    #[test]
    fn test_non_finite_amount_formats_as_zero() {
        assert_eq!(CurrencyFormat::default().format(f64::NAN), "$0");
        assert_eq!(CurrencyFormat::default().format(-1200.0), "-$1,200");
    }
}

//! Amount-in-words using the Indian numbering system (lakh, crore) with paise.

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const CRORE: u64 = 10_000_000;
const LAKH: u64 = 100_000;
const THOUSAND: u64 = 1_000;

/// Converts an amount to words, e.g. `1234567.50` becomes
/// "Twelve Lakh Thirty Four Thousand Five Hundred Sixty Seven Rupees and Fifty Paise Only".
///
/// Zero is returned as the bare word "Zero". Negative amounts are prefixed with "Minus".
pub fn amount_in_words(amount: f64) -> String {
    if !amount.is_finite() || amount == 0.0 {
        return "Zero".to_string();
    }
    if amount < 0.0 {
        return format!("Minus {}", amount_in_words(-amount));
    }

    let paise_total = (amount * 100.0).round() as u64;
    let rupees = paise_total / 100;
    let paise = paise_total % 100;

    let mut out = if rupees == 0 {
        "Zero Rupees".to_string()
    } else {
        format!("{} Rupees", integer_in_words(rupees))
    };

    if paise > 0 {
        out.push_str(" and ");
        out.push_str(&below_thousand(paise));
        out.push_str(" Paise");
    }

    out.push_str(" Only");
    out
}

/// Words for a positive integer, grouped as crore / lakh / thousand / rest.
fn integer_in_words(n: u64) -> String {
    let groups = [
        (n / CRORE, "Crore"),
        ((n % CRORE) / LAKH, "Lakh"),
        ((n % LAKH) / THOUSAND, "Thousand"),
        (n % THOUSAND, ""),
    ];

    let mut parts = Vec::new();
    for (value, unit) in groups {
        if value == 0 {
            continue;
        }
        // crores can exceed 999 and reuse the full grouping
        let words = if value >= THOUSAND {
            integer_in_words(value)
        } else {
            below_thousand(value)
        };
        parts.push(words);
        if !unit.is_empty() {
            parts.push(unit.to_string());
        }
    }

    parts.join(" ")
}

/// 0..=999; zero yields an empty string.
fn below_thousand(n: u64) -> String {
    debug_assert!(n < 1000);

    let mut parts: Vec<&str> = Vec::new();
    let hundreds = (n / 100) as usize;
    let rest = (n % 100) as usize;

    if hundreds > 0 {
        parts.push(ONES[hundreds]);
        parts.push("Hundred");
    }
    if rest >= 20 {
        parts.push(TENS[rest / 10]);
        if rest % 10 > 0 {
            parts.push(ONES[rest % 10]);
        }
    } else if rest > 0 {
        parts.push(ONES[rest]);
    }

    parts.join(" ")
}

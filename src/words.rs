//! Amount-in-words conversion for the invoice summary.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const CURRENCY_SUFFIX: &str = "Rupees only";

/// Values at or above this are printed as a plain numeral.
const WORDS_LIMIT: u64 = 100_000;

const ONES: [&str; 20] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
    "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// Write the integer part of `amount` in words, e.g. `1250.75` becomes
/// "One Thousand Two Hundred and Fifty Rupees only".
///
/// The fraction is dropped, not rounded. Negative amounts and amounts of a
/// lakh or more fall back to the numeral.
pub fn amount_in_words(amount: Decimal) -> String {
    let whole = amount.trunc();
    let spelled = match whole.to_u64() {
        Some(n) if n < WORDS_LIMIT => spell(n),
        _ => whole.normalize().to_string(),
    };
    format!("{} {}", spelled, CURRENCY_SUFFIX)
}

fn spell(n: u64) -> String {
    match n {
        0..=19 => ONES[n as usize].to_string(),
        20..=99 => {
            let tens = TENS[(n / 10) as usize];
            match n % 10 {
                0 => tens.to_string(),
                ones => format!("{} {}", tens, ONES[ones as usize]),
            }
        }
        100..=999 => {
            let head = format!("{} Hundred", ONES[(n / 100) as usize]);
            match n % 100 {
                0 => head,
                rest => format!("{} and {}", head, spell(rest)),
            }
        }
        _ => {
            let head = format!("{} Thousand", spell(n / 1000));
            match n % 1000 {
                0 => head,
                rest => format!("{} {}", head, spell(rest)),
            }
        }
    }
}

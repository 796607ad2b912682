//! Display formatting for identifiers, prices and timestamps.

use crate::model::parse_timestamp;

const ICON_BASE_URL: &str = "https://mc.nerothe.com/img/1.21.4";

/// `GOLD_INGOT` -> `Gold Ingot`
pub fn format_item_name(material: &str) -> String {
    material
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let mut formatted: String = first.to_uppercase().collect();
                    formatted.push_str(&chars.as_str().to_lowercase());
                    formatted
                }
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// German grouping with at most three fraction digits, then the currency suffix.
pub fn format_price(price: f64) -> String {
    format!("{} $", group_number(price))
}

fn group_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let scaled = (value.abs() * 1000.0).round() as u128;
    let int_part = (scaled / 1000).to_string();
    let frac_part = format!("{:03}", scaled % 1000);
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && scaled > 0 { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{},{}", sign, grouped, frac_part)
    }
}

/// Shortest decimal form of a price, as matched by the search box
/// (`10.0` -> `10`). Magnitudes from 1e21 up and below 1e-6 switch to
/// exponent form with an explicit sign (`1e+21`, `1e-7`).
pub fn price_string(price: f64) -> String {
    let magnitude = price.abs();
    if price.is_finite() && magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
        let exp = format!("{:e}", price);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
            _ => exp,
        };
    }
    price.to_string()
}

/// `dd.mm.yyyy, HH:MM`; input that is not a timestamp is passed through.
pub fn format_date(timestamp: &str) -> String {
    match parse_timestamp(timestamp) {
        Some(dt) => dt.format("%d.%m.%Y, %H:%M").to_string(),
        None => timestamp.to_string(),
    }
}

pub fn icon_url(material: &str) -> String {
    format!("{}/minecraft_{}.png", ICON_BASE_URL, material.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_names_are_title_cased() {
        assert_eq!(format_item_name("GOLD_INGOT"), "Gold Ingot");
        assert_eq!(format_item_name("diamond"), "Diamond");
        assert_eq!(format_item_name("light_BLUE_wool"), "Light Blue Wool");
    }

    #[test]
    fn prices_use_german_grouping() {
        assert_eq!(format_price(0.0), "0 $");
        assert_eq!(format_price(999.0), "999 $");
        assert_eq!(format_price(1234.5), "1.234,5 $");
        assert_eq!(format_price(1234567.0), "1.234.567 $");
        assert_eq!(format_price(0.12345), "0,123 $");
        assert_eq!(format_price(2.0004), "2 $");
    }

    #[test]
    fn price_strings_drop_integral_fraction() {
        assert_eq!(price_string(10.0), "10");
        assert_eq!(price_string(10.5), "10.5");
        assert_eq!(price_string(0.000001), "0.000001");
    }

    #[test]
    fn price_strings_use_exponents_at_the_extremes() {
        assert_eq!(price_string(1e21), "1e+21");
        assert_eq!(price_string(1.5e22), "1.5e+22");
        assert_eq!(price_string(1e-7), "1e-7");
        assert_eq!(price_string(0.0), "0");
    }

    #[test]
    fn dates_are_formatted_day_first() {
        assert_eq!(format_date("2024-01-02T13:45:00"), "02.01.2024, 13:45");
        assert_eq!(format_date("not a date"), "not a date");
    }

    #[test]
    fn icon_url_uses_lowercase_material() {
        assert_eq!(
            icon_url("GOLD_INGOT"),
            "https://mc.nerothe.com/img/1.21.4/minecraft_gold_ingot.png"
        );
    }
}

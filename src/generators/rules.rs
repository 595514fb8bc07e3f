//! Validation rules derived from column definitions.

use crate::types::Column;

const INTEGER_TYPES: &[&str] = &[
    "integer",
    "tinyInteger",
    "smallInteger",
    "mediumInteger",
    "bigInteger",
    "increments",
    "tinyIncrements",
    "smallIncrements",
    "mediumIncrements",
    "bigIncrements",
];

const UNSIGNED_INTEGER_TYPES: &[&str] = &[
    "unsignedInteger",
    "unsignedTinyInteger",
    "unsignedSmallInteger",
    "unsignedMediumInteger",
    "unsignedBigInteger",
];

const NUMERIC_TYPES: &[&str] = &["decimal", "unsignedDecimal", "double", "float"];

const STRING_TYPES: &[&str] = &["string", "char", "text", "mediumText", "longText"];

const DATE_TYPES: &[&str] = &["date", "dateTime", "dateTimeTz", "timestamp", "timestampTz"];

/// Rules for one column of `table`
pub fn for_column(column: &Column, table: &str) -> Vec<String> {
    let mut rules = Vec::new();
    let name = column.name();
    let data_type = column.data_type();

    rules.push(if column.is_nullable() { "nullable" } else { "required" }.to_string());

    if column.is_foreign_key() {
        let (foreign_table, key) = column.references();
        rules.push(
            match data_type {
                "uuid" => "uuid",
                "ulid" => "ulid",
                _ => "integer",
            }
            .to_string(),
        );
        rules.push(format!("exists:{},{}", foreign_table, key));
        return rules;
    }

    if STRING_TYPES.contains(&data_type) {
        rules.push("string".to_string());
        if name.contains("email") {
            rules.push("email".to_string());
        }
        if name == "password" {
            rules.push("password".to_string());
        }
        if matches!(data_type, "string" | "char") {
            let length = column.attributes().first().map(String::as_str).unwrap_or("255");
            rules.push(format!("max:{}", length));
        }
    } else if INTEGER_TYPES.contains(&data_type) {
        rules.push("integer".to_string());
        if column.has_modifier("unsigned") {
            rules.push("gte:0".to_string());
        }
    } else if UNSIGNED_INTEGER_TYPES.contains(&data_type) {
        rules.push("integer".to_string());
        rules.push("gte:0".to_string());
    } else if NUMERIC_TYPES.contains(&data_type) {
        rules.push("numeric".to_string());
        if let Some(between) = decimal_range(column) {
            rules.push(between);
        }
    } else if DATE_TYPES.contains(&data_type) {
        rules.push("date".to_string());
    } else {
        match data_type {
            "boolean" => rules.push("boolean".to_string()),
            "json" | "jsonb" => rules.push("json".to_string()),
            "uuid" => rules.push("uuid".to_string()),
            "ulid" => rules.push("ulid".to_string()),
            "ipAddress" => rules.push("ip".to_string()),
            "macAddress" => rules.push("mac_address".to_string()),
            "year" => {
                rules.push("integer".to_string());
                rules.push("digits:4".to_string());
            }
            "enum" | "set" => rules.push(format!("in:{}", column.attributes().join(","))),
            _ => {}
        }
    }

    if column.has_modifier("unique") {
        rules.push(format!("unique:{},{}", table, name));
    }

    rules
}

/// `between:-999999.99,999999.99` for a column with precision and scale
fn decimal_range(column: &Column) -> Option<String> {
    let precision: usize = column.attributes().first()?.trim().parse().ok()?;
    let scale: usize = column
        .attributes()
        .get(1)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    if scale > precision || precision == 0 {
        return None;
    }

    let mut max = "9".repeat(precision - scale);
    if max.is_empty() {
        max.push('0');
    }
    if scale > 0 {
        max.push('.');
        max.push_str(&"9".repeat(scale));
    }

    let unsigned = column.data_type() == "unsignedDecimal" || column.has_modifier("unsigned");
    let min = if unsigned { "0".to_string() } else { format!("-{}", max) };
    Some(format!("between:{},{}", min, max))
}

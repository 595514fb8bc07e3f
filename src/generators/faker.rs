//! Fake data expressions for factory definitions.

use crate::generators::php;
use crate::types::Column;

/// Faker calls keyed by well-known column names
const BY_NAME: &[(&str, &str)] = &[
    ("address", "fake()->streetAddress()"),
    ("city", "fake()->city()"),
    ("company", "fake()->company()"),
    ("content", "fake()->paragraphs(3, true)"),
    ("country", "fake()->country()"),
    ("description", "fake()->text()"),
    ("email", "fake()->safeEmail()"),
    ("first_name", "fake()->firstName()"),
    ("last_name", "fake()->lastName()"),
    ("name", "fake()->name()"),
    ("password", "fake()->password()"),
    ("phone", "fake()->phoneNumber()"),
    ("postcode", "fake()->postcode()"),
    ("slug", "fake()->slug()"),
    ("title", "fake()->sentence(4)"),
    ("url", "fake()->url()"),
    ("username", "fake()->userName()"),
    ("zip", "fake()->postcode()"),
];

/// Faker call for a column, by name first and data type second
pub fn for_column(column: &Column) -> String {
    if let Some((_, expression)) = BY_NAME.iter().find(|(name, _)| *name == column.name()) {
        return expression.to_string();
    }

    let attributes = column.attributes();
    match column.data_type() {
        "string" => "fake()->word()".to_string(),
        "char" => "fake()->randomLetter()".to_string(),
        "text" | "mediumText" | "longText" => "fake()->text()".to_string(),
        "integer" | "bigInteger" | "mediumInteger" => "fake()->numberBetween(-10000, 10000)".to_string(),
        "smallInteger" => "fake()->numberBetween(-1000, 1000)".to_string(),
        "tinyInteger" => "fake()->numberBetween(-8, 8)".to_string(),
        "unsignedInteger" | "unsignedBigInteger" | "unsignedMediumInteger" | "unsignedSmallInteger"
        | "unsignedTinyInteger" => "fake()->randomNumber()".to_string(),
        "decimal" | "unsignedDecimal" | "double" | "float" => {
            let scale = attributes.get(1).map(|s| s.trim()).unwrap_or("2");
            format!("fake()->randomFloat({}, 0, 999999.99)", scale)
        }
        "boolean" => "fake()->boolean()".to_string(),
        "date" => "fake()->date()".to_string(),
        "dateTime" | "dateTimeTz" | "timestamp" | "timestampTz" => "fake()->dateTime()".to_string(),
        "time" | "timeTz" => "fake()->time()".to_string(),
        "year" => "fake()->year()".to_string(),
        "uuid" => "fake()->uuid()".to_string(),
        "ulid" => "(string) str()->ulid()".to_string(),
        "json" | "jsonb" => "'{}'".to_string(),
        "enum" | "set" => format!("fake()->randomElement({})", php::quoted_list(attributes)),
        "ipAddress" => "fake()->ipv4()".to_string(),
        "macAddress" => "fake()->macAddress()".to_string(),
        "rememberToken" => "Str::random(10)".to_string(),
        _ => "fake()->word()".to_string(),
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Country {
    pub id: i32,
    pub name_en: String,
    /// ISO 3166-1 alpha-2 code, stored uppercase.
    pub iso2: String,
    /// Optional 3-letter currency code, stored uppercase.
    pub default_currency: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewCountry {
    pub name_en: String,
    pub iso2: String,
    pub default_currency: Option<String>,
}

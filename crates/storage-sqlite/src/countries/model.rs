use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use watchledger_core::countries::{Country, NewCountry};

use crate::schema::countries;

#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = countries)]
pub struct CountryDB {
    pub id: i32,
    pub name_en: String,
    pub iso2: String,
    pub default_currency: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<CountryDB> for Country {
    fn from(db: CountryDB) -> Self {
        Country {
            id: db.id,
            name_en: db.name_en,
            iso2: db.iso2,
            default_currency: db.default_currency,
            created_at: db.created_at,
        }
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = countries)]
pub struct NewCountryDB {
    pub name_en: String,
    pub iso2: String,
    pub default_currency: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<NewCountry> for NewCountryDB {
    fn from(new: NewCountry) -> Self {
        Self {
            name_en: new.name_en,
            iso2: new.iso2.to_ascii_uppercase(),
            default_currency: new
                .default_currency
                .map(|c| c.trim().to_ascii_uppercase())
                .filter(|c| !c.is_empty()),
            created_at: Utc::now().naive_utc(),
        }
    }
}

//! Country table
//!
//! The fixed set of origin countries offered by the dropdown, with ISO
//! 3166-1 alpha-2 codes used to derive regional-indicator flag emoji.

use serde::Serialize;

use crate::error::{Result, TariffError};

/// Code point of REGIONAL INDICATOR SYMBOL LETTER A
const REGIONAL_INDICATOR_A: u32 = 0x1F1E6;

/// A selectable country of origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Country {
    pub name: &'static str,
    pub code: &'static str,
}

impl Country {
    pub const fn new(name: &'static str, code: &'static str) -> Self {
        Self { name, code }
    }

    /// Flag emoji for this country's code
    pub fn flag(&self) -> String {
        // Table codes are checked by tests; fall back to the bare code anyway.
        flag_emoji(self.code).unwrap_or_else(|_| self.code.to_string())
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Build the two regional-indicator flag for an alpha-2 code.
///
/// The code is upper-cased first, so `"us"` and `"US"` give the same flag.
pub fn flag_emoji(code: &str) -> Result<String> {
    let upper = code.trim().to_ascii_uppercase();
    if upper.len() != 2 || !upper.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(TariffError::InvalidCountryCode(code.to_string()));
    }

    upper
        .bytes()
        .map(|b| {
            char::from_u32(REGIONAL_INDICATOR_A + u32::from(b - b'A'))
                .ok_or_else(|| TariffError::InvalidCountryCode(code.to_string()))
        })
        .collect()
}

/// Look up a country by name, ignoring case and surrounding whitespace
pub fn find_by_name(name: &str) -> Option<&'static Country> {
    let name = name.trim();
    COUNTRIES.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Look up a country by its alpha-2 code, ignoring case
pub fn find_by_code(code: &str) -> Option<&'static Country> {
    let code = code.trim();
    COUNTRIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

/// Resolve a dropdown label: two-letter labels are tried as codes first,
/// everything else (and unmatched codes) by name.
pub fn resolve(label: &str) -> Result<&'static Country> {
    let trimmed = label.trim();
    let looks_like_code = trimmed.len() == 2 && trimmed.bytes().all(|b| b.is_ascii_alphabetic());

    looks_like_code
        .then(|| find_by_code(trimmed))
        .flatten()
        .or_else(|| find_by_name(trimmed))
        .ok_or_else(|| TariffError::UnknownCountry(label.to_string()))
}

/// Countries whose name contains `needle` (case-insensitive)
pub fn search(needle: &str) -> impl Iterator<Item = &'static Country> + '_ {
    let needle = needle.trim().to_lowercase();
    COUNTRIES
        .iter()
        .filter(move |c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
}

/// A resolved, non-empty country selection.
///
/// Only constructible from the table, so holding one is proof that the
/// generate precondition holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection(&'static Country);

impl Selection {
    /// Resolve a label (name or code) into a selection
    pub fn parse(label: &str) -> Result<Self> {
        resolve(label).map(Selection)
    }

    pub fn country(&self) -> &'static Country {
        self.0
    }

    pub fn name(&self) -> &'static str {
        self.0.name
    }

    pub fn code(&self) -> &'static str {
        self.0.code
    }
}

impl From<&'static Country> for Selection {
    fn from(country: &'static Country) -> Self {
        Selection(country)
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.name)
    }
}

/// Every selectable country, in dropdown order
pub static COUNTRIES: &[Country] = &[
    Country::new("Afghanistan", "AF"),
    Country::new("Albania", "AL"),
    Country::new("Algeria", "DZ"),
    Country::new("Andorra", "AD"),
    Country::new("Angola", "AO"),
    Country::new("Antigua and Barbuda", "AG"),
    Country::new("Argentina", "AR"),
    Country::new("Armenia", "AM"),
    Country::new("Australia", "AU"),
    Country::new("Austria", "AT"),
    Country::new("Azerbaijan", "AZ"),
    Country::new("Bahamas", "BS"),
    Country::new("Bahrain", "BH"),
    Country::new("Bangladesh", "BD"),
    Country::new("Barbados", "BB"),
    Country::new("Belarus", "BY"),
    Country::new("Belgium", "BE"),
    Country::new("Belize", "BZ"),
    Country::new("Benin", "BJ"),
    Country::new("Bhutan", "BT"),
    Country::new("Bolivia", "BO"),
    Country::new("Bosnia and Herzegovina", "BA"),
    Country::new("Botswana", "BW"),
    Country::new("Brazil", "BR"),
    Country::new("Brunei", "BN"),
    Country::new("Bulgaria", "BG"),
    Country::new("Burkina Faso", "BF"),
    Country::new("Burundi", "BI"),
    Country::new("Cabo Verde", "CV"),
    Country::new("Cambodia", "KH"),
    Country::new("Cameroon", "CM"),
    Country::new("Canada", "CA"),
    Country::new("Central African Republic", "CF"),
    Country::new("Chad", "TD"),
    Country::new("Chile", "CL"),
    Country::new("China", "CN"),
    Country::new("Colombia", "CO"),
    Country::new("Comoros", "KM"),
    Country::new("Congo (Congo-Brazzaville)", "CG"),
    Country::new("Costa Rica", "CR"),
    Country::new("Croatia", "HR"),
    Country::new("Cuba", "CU"),
    Country::new("Cyprus", "CY"),
    Country::new("Czech Republic", "CZ"),
    Country::new("Democratic Republic of the Congo", "CD"),
    Country::new("Denmark", "DK"),
    Country::new("Djibouti", "DJ"),
    Country::new("Dominica", "DM"),
    Country::new("Dominican Republic", "DO"),
    Country::new("Ecuador", "EC"),
    Country::new("Egypt", "EG"),
    Country::new("El Salvador", "SV"),
    Country::new("Equatorial Guinea", "GQ"),
    Country::new("Eritrea", "ER"),
    Country::new("Estonia", "EE"),
    Country::new("Eswatini", "SZ"),
    Country::new("Ethiopia", "ET"),
    Country::new("Fiji", "FJ"),
    Country::new("Finland", "FI"),
    Country::new("France", "FR"),
    Country::new("Gabon", "GA"),
    Country::new("Gambia", "GM"),
    Country::new("Georgia", "GE"),
    Country::new("Germany", "DE"),
    Country::new("Ghana", "GH"),
    Country::new("Greece", "GR"),
    Country::new("Grenada", "GD"),
    Country::new("Guatemala", "GT"),
    Country::new("Guinea", "GN"),
    Country::new("Guinea-Bissau", "GW"),
    Country::new("Guyana", "GY"),
    Country::new("Haiti", "HT"),
    Country::new("Honduras", "HN"),
    Country::new("Hungary", "HU"),
    Country::new("Iceland", "IS"),
    Country::new("India", "IN"),
    Country::new("Indonesia", "ID"),
    Country::new("Iran", "IR"),
    Country::new("Iraq", "IQ"),
    Country::new("Ireland", "IE"),
    Country::new("Israel", "IL"),
    Country::new("Italy", "IT"),
    Country::new("Jamaica", "JM"),
    Country::new("Japan", "JP"),
    Country::new("Jordan", "JO"),
    Country::new("Kazakhstan", "KZ"),
    Country::new("Kenya", "KE"),
    Country::new("Kiribati", "KI"),
    Country::new("Kuwait", "KW"),
    Country::new("Kyrgyzstan", "KG"),
    Country::new("Laos", "LA"),
    Country::new("Latvia", "LV"),
    Country::new("Lebanon", "LB"),
    Country::new("Lesotho", "LS"),
    Country::new("Liberia", "LR"),
    Country::new("Libya", "LY"),
    Country::new("Liechtenstein", "LI"),
    Country::new("Lithuania", "LT"),
    Country::new("Luxembourg", "LU"),
    Country::new("Madagascar", "MG"),
    Country::new("Malawi", "MW"),
    Country::new("Malaysia", "MY"),
    Country::new("Maldives", "MV"),
    Country::new("Mali", "ML"),
    Country::new("Malta", "MT"),
    Country::new("Marshall Islands", "MH"),
    Country::new("Mauritania", "MR"),
    Country::new("Mauritius", "MU"),
    Country::new("Mexico", "MX"),
    Country::new("Micronesia", "FM"),
    Country::new("Moldova", "MD"),
    Country::new("Monaco", "MC"),
    Country::new("Mongolia", "MN"),
    Country::new("Montenegro", "ME"),
    Country::new("Morocco", "MA"),
    Country::new("Mozambique", "MZ"),
    Country::new("Myanmar", "MM"),
    Country::new("Namibia", "NA"),
    Country::new("Nauru", "NR"),
    Country::new("Nepal", "NP"),
    Country::new("Netherlands", "NL"),
    Country::new("New Zealand", "NZ"),
    Country::new("Nicaragua", "NI"),
    Country::new("Niger", "NE"),
    Country::new("Nigeria", "NG"),
    Country::new("North Korea", "KP"),
    Country::new("North Macedonia", "MK"),
    Country::new("Norway", "NO"),
    Country::new("Oman", "OM"),
    Country::new("Pakistan", "PK"),
    Country::new("Palau", "PW"),
    Country::new("Palestine State", "PS"),
    Country::new("Panama", "PA"),
    Country::new("Papua New Guinea", "PG"),
    Country::new("Paraguay", "PY"),
    Country::new("Peru", "PE"),
    Country::new("Philippines", "PH"),
    Country::new("Poland", "PL"),
    Country::new("Portugal", "PT"),
    Country::new("Qatar", "QA"),
    Country::new("Romania", "RO"),
    Country::new("Russia", "RU"),
    Country::new("Rwanda", "RW"),
    Country::new("Saint Kitts and Nevis", "KN"),
    Country::new("Saint Lucia", "LC"),
    Country::new("Saint Vincent and the Grenadines", "VC"),
    Country::new("Samoa", "WS"),
    Country::new("San Marino", "SM"),
    Country::new("Sao Tome and Principe", "ST"),
    Country::new("Saudi Arabia", "SA"),
    Country::new("Senegal", "SN"),
    Country::new("Serbia", "RS"),
    Country::new("Seychelles", "SC"),
    Country::new("Sierra Leone", "SL"),
    Country::new("Singapore", "SG"),
    Country::new("Slovakia", "SK"),
    Country::new("Slovenia", "SI"),
    Country::new("Solomon Islands", "SB"),
    Country::new("Somalia", "SO"),
    Country::new("South Africa", "ZA"),
    Country::new("South Korea", "KR"),
    Country::new("South Sudan", "SS"),
    Country::new("Spain", "ES"),
    Country::new("Sri Lanka", "LK"),
    Country::new("Sudan", "SD"),
    Country::new("Suriname", "SR"),
    Country::new("Sweden", "SE"),
    Country::new("Switzerland", "CH"),
    Country::new("Syria", "SY"),
    Country::new("Taiwan", "TW"),
    Country::new("Tajikistan", "TJ"),
    Country::new("Tanzania", "TZ"),
    Country::new("Thailand", "TH"),
    Country::new("Timor-Leste", "TL"),
    Country::new("Togo", "TG"),
    Country::new("Tonga", "TO"),
    Country::new("Trinidad and Tobago", "TT"),
    Country::new("Tunisia", "TN"),
    Country::new("Turkey", "TR"),
    Country::new("Turkmenistan", "TM"),
    Country::new("Tuvalu", "TV"),
    Country::new("Uganda", "UG"),
    Country::new("Ukraine", "UA"),
    Country::new("United Arab Emirates", "AE"),
    Country::new("United Kingdom", "GB"),
    Country::new("Uruguay", "UY"),
    Country::new("Uzbekistan", "UZ"),
    Country::new("Vanuatu", "VU"),
    Country::new("Venezuela", "VE"),
    Country::new("Vietnam", "VN"),
    Country::new("Yemen", "YE"),
    Country::new("Zambia", "ZM"),
    Country::new("Zimbabwe", "ZW"),
];

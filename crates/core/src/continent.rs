use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Continent a post was sent from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Continent {
    Africa,
    Antarctica,
    Asia,
    Europe,
    #[serde(rename = "North America")]
    NorthAmerica,
    Oceania,
    #[serde(rename = "South America")]
    SouthAmerica,
}

impl Continent {
    pub const ALL: [Continent; 7] = [
        Continent::Africa,
        Continent::Antarctica,
        Continent::Asia,
        Continent::Europe,
        Continent::NorthAmerica,
        Continent::Oceania,
        Continent::SouthAmerica,
    ];

    /// Display name, e.g. "North America"
    pub fn name(&self) -> &'static str {
        match self {
            Continent::Africa => "Africa",
            Continent::Antarctica => "Antarctica",
            Continent::Asia => "Asia",
            Continent::Europe => "Europe",
            Continent::NorthAmerica => "North America",
            Continent::Oceania => "Oceania",
            Continent::SouthAmerica => "South America",
        }
    }

    /// Two-letter continent code, e.g. "NA"
    pub fn code(&self) -> &'static str {
        match self {
            Continent::Africa => "AF",
            Continent::Antarctica => "AN",
            Continent::Asia => "AS",
            Continent::Europe => "EU",
            Continent::NorthAmerica => "NA",
            Continent::Oceania => "OC",
            Continent::SouthAmerica => "SA",
        }
    }

    /// Region key used by supranational world maps, e.g. "north_america"
    pub fn slug(&self) -> &'static str {
        match self {
            Continent::Africa => "africa",
            Continent::Antarctica => "antarctica",
            Continent::Asia => "asia",
            Continent::Europe => "europe",
            Continent::NorthAmerica => "north_america",
            Continent::Oceania => "oceania",
            Continent::SouthAmerica => "south_america",
        }
    }

    pub fn from_code(code: &str) -> Option<Continent> {
        Continent::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownContinent(pub String);

impl fmt::Display for UnknownContinent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown continent: {}", self.0)
    }
}

impl std::error::Error for UnknownContinent {}

impl FromStr for Continent {
    type Err = UnknownContinent;

    /// Accepts display names and slugs, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Continent::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted) || c.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownContinent(s.to_string()))
    }
}

/// Maps an ISO 3166-1 alpha-2 country code to its continent code.
///
/// Antarctica itself ("AQ") has no entry; callers special-case it.
pub fn continent_code_for_country(alpha2: &str) -> Option<&'static str> {
    let code = match alpha2 {
        "AO" | "BF" | "BI" | "BJ" | "BW" | "CD" | "CF" | "CG" | "CI" | "CM" | "CV" | "DJ"
        | "DZ" | "EG" | "EH" | "ER" | "ET" | "GA" | "GH" | "GM" | "GN" | "GQ" | "GW" | "KE"
        | "KM" | "LR" | "LS" | "LY" | "MA" | "MG" | "ML" | "MR" | "MU" | "MW" | "MZ" | "NA"
        | "NE" | "NG" | "RE" | "RW" | "SC" | "SD" | "SH" | "SL" | "SN" | "SO" | "SS" | "ST"
        | "SZ" | "TD" | "TG" | "TN" | "TZ" | "UG" | "YT" | "ZA" | "ZM" | "ZW" => "AF",

        "BV" | "GS" | "HM" | "TF" => "AN",

        "AE" | "AF" | "AM" | "AZ" | "BD" | "BH" | "BN" | "BT" | "CC" | "CN" | "CX" | "CY"
        | "GE" | "HK" | "ID" | "IL" | "IN" | "IO" | "IQ" | "IR" | "JO" | "JP" | "KG" | "KH"
        | "KP" | "KR" | "KW" | "KZ" | "LA" | "LB" | "LK" | "MM" | "MN" | "MO" | "MV" | "MY"
        | "NP" | "OM" | "PH" | "PK" | "PS" | "QA" | "SA" | "SG" | "SY" | "TH" | "TJ" | "TL"
        | "TM" | "TR" | "TW" | "UZ" | "VN" | "YE" => "AS",

        "AD" | "AL" | "AT" | "AX" | "BA" | "BE" | "BG" | "BY" | "CH" | "CZ" | "DE" | "DK"
        | "EE" | "ES" | "FI" | "FO" | "FR" | "GB" | "GG" | "GI" | "GR" | "HR" | "HU" | "IE"
        | "IM" | "IS" | "IT" | "JE" | "LI" | "LT" | "LU" | "LV" | "MC" | "MD" | "ME" | "MK"
        | "MT" | "NL" | "NO" | "PL" | "PT" | "RO" | "RS" | "RU" | "SE" | "SI" | "SJ" | "SK"
        | "SM" | "UA" | "VA" | "XK" => "EU",

        "AG" | "AI" | "AW" | "BB" | "BL" | "BM" | "BQ" | "BS" | "BZ" | "CA" | "CR" | "CU"
        | "CW" | "DM" | "DO" | "GD" | "GL" | "GP" | "GT" | "HN" | "HT" | "JM" | "KN" | "KY"
        | "LC" | "MF" | "MQ" | "MS" | "MX" | "NI" | "PA" | "PM" | "PR" | "SV" | "SX" | "TC"
        | "TT" | "UM" | "US" | "VC" | "VG" | "VI" => "NA",

        "AS" | "AU" | "CK" | "FJ" | "FM" | "GU" | "KI" | "MH" | "MP" | "NC" | "NF" | "NR"
        | "NU" | "NZ" | "PF" | "PG" | "PN" | "PW" | "SB" | "TK" | "TO" | "TV" | "VU" | "WF"
        | "WS" => "OC",

        "AR" | "BO" | "BR" | "CL" | "CO" | "EC" | "FK" | "GF" | "GY" | "PE" | "PY" | "SR"
        | "UY" | "VE" => "SA",

        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continent_code_for_country_known() {
        assert_eq!(continent_code_for_country("BE"), Some("EU"));
        assert_eq!(continent_code_for_country("US"), Some("NA"));
        assert_eq!(continent_code_for_country("BR"), Some("SA"));
        assert_eq!(continent_code_for_country("NZ"), Some("OC"));
        assert_eq!(continent_code_for_country("JP"), Some("AS"));
        assert_eq!(continent_code_for_country("KE"), Some("AF"));
    }

    #[test]
    fn test_continent_code_for_country_does_not_cover_antarctica() {
        assert_eq!(continent_code_for_country("AQ"), None);
    }

    #[test]
    fn test_continent_code_for_country_unknown() {
        assert_eq!(continent_code_for_country("ZZ"), None);
        assert_eq!(continent_code_for_country("us"), None);
        assert_eq!(continent_code_for_country(""), None);
    }

    #[test]
    fn test_from_code_round_trips_every_continent() {
        for continent in Continent::ALL {
            assert_eq!(Continent::from_code(continent.code()), Some(continent));
        }
        assert_eq!(Continent::from_code("XX"), None);
    }

    #[test]
    fn test_from_str_accepts_names_and_slugs() {
        assert_eq!("Europe".parse::<Continent>(), Ok(Continent::Europe));
        assert_eq!("north america".parse::<Continent>(), Ok(Continent::NorthAmerica));
        assert_eq!("south_america".parse::<Continent>(), Ok(Continent::SouthAmerica));
        assert!("Atlantis".parse::<Continent>().is_err());
    }

    #[test]
    fn test_display_uses_name() {
        assert_eq!(Continent::NorthAmerica.to_string(), "North America");
    }
}

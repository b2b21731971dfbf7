//! # Country Tiers
//!
//! Static classification of ISO 3166-1 alpha-2 country codes into tiers
//! 1 through 7. Tiers are embedded as single bytes in signed credential
//! digests (`countryOfResidence`, `countryOfIDIssuance`), so a country's
//! tier is part of every credential issued against it.

use serde::{Deserialize, Serialize};

use crate::classification::ClassificationByte;
use crate::error::ClassificationError;

/// A country's tier, 1 (lowest) through 7 (highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryTier(u8);

impl CountryTier {
    /// Look up the tier assigned to a two-letter country code.
    ///
    /// Codes are matched exactly; `"nz"` is not `"NZ"`.
    pub fn from_country(code: &str) -> Result<Self, ClassificationError> {
        TIERS
            .binary_search_by(|(c, _)| (*c).cmp(code))
            .map(|idx| Self(TIERS[idx].1))
            .map_err(|_| ClassificationError::UnsupportedCountry(code.to_string()))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// The tier as a digest byte.
    pub fn to_byte(self) -> ClassificationByte {
        ClassificationByte::from_table(self.0)
    }
}

impl std::fmt::Display for CountryTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Country code to tier, sorted by code for binary search.
const TIERS: &[(&str, u8)] = &[
    ("AD", 3),
    ("AE", 4),
    ("AF", 6),
    ("AG", 2),
    ("AI", 5),
    ("AL", 6),
    ("AM", 2),
    ("AO", 4),
    ("AQ", 5),
    ("AR", 2),
    ("AS", 7),
    ("AT", 1),
    ("AU", 2),
    ("AW", 5),
    ("AX", 3),
    ("AZ", 2),
    ("BA", 3),
    ("BB", 6),
    ("BD", 3),
    ("BE", 1),
    ("BF", 6),
    ("BG", 2),
    ("BH", 4),
    ("BI", 5),
    ("BJ", 5),
    ("BL", 5),
    ("BM", 7),
    ("BN", 5),
    ("BO", 5),
    ("BQ", 3),
    ("BR", 2),
    ("BS", 6),
    ("BT", 5),
    ("BV", 3),
    ("BW", 6),
    ("BY", 4),
    ("BZ", 4),
    ("CA", 3),
    ("CC", 4),
    ("CD", 5),
    ("CF", 5),
    ("CG", 5),
    ("CH", 1),
    ("CI", 5),
    ("CK", 5),
    ("CL", 3),
    ("CM", 5),
    ("CN", 7),
    ("CO", 3),
    ("CR", 3),
    ("CU", 5),
    ("CV", 5),
    ("CW", 5),
    ("CX", 3),
    ("CY", 3),
    ("CZ", 1),
    ("DE", 1),
    ("DJ", 5),
    ("DK", 1),
    ("DM", 5),
    ("DO", 5),
    ("DZ", 4),
    ("EC", 3),
    ("EE", 2),
    ("EG", 3),
    ("EH", 5),
    ("ER", 5),
    ("ES", 1),
    ("ET", 5),
    ("FI", 1),
    ("FJ", 5),
    ("FK", 5),
    ("FM", 5),
    ("FO", 5),
    ("FR", 1),
    ("GA", 5),
    ("GB", 2),
    ("GD", 5),
    ("GE", 3),
    ("GF", 4),
    ("GG", 5),
    ("GH", 6),
    ("GI", 3),
    ("GL", 3),
    ("GM", 5),
    ("GN", 5),
    ("GP", 3),
    ("GQ", 5),
    ("GR", 1),
    ("GS", 3),
    ("GT", 4),
    ("GU", 7),
    ("GW", 5),
    ("GY", 4),
    ("HK", 4),
    ("HM", 5),
    ("HN", 3),
    ("HR", 1),
    ("HT", 6),
    ("HU", 2),
    ("ID", 3),
    ("IE", 1),
    ("IL", 4),
    ("IM", 3),
    ("IN", 3),
    ("IO", 3),
    ("IQ", 6),
    ("IR", 6),
    ("IS", 2),
    ("IT", 1),
    ("JE", 3),
    ("JM", 6),
    ("JO", 5),
    ("JP", 1),
    ("KE", 5),
    ("KG", 4),
    ("KH", 6),
    ("KI", 5),
    ("KM", 5),
    ("KN", 5),
    ("KP", 6),
    ("KR", 3),
    ("KW", 5),
    ("KY", 6),
    ("KZ", 4),
    ("LA", 5),
    ("LB", 3),
    ("LC", 3),
    ("LI", 2),
    ("LK", 5),
    ("LR", 5),
    ("LS", 5),
    ("LT", 2),
    ("LU", 1),
    ("LV", 3),
    ("LY", 5),
    ("MA", 6),
    ("MC", 1),
    ("MD", 2),
    ("ME", 4),
    ("MF", 5),
    ("MG", 5),
    ("MH", 5),
    ("MK", 3),
    ("ML", 5),
    ("MM", 6),
    ("MN", 5),
    ("MO", 4),
    ("MP", 5),
    ("MQ", 5),
    ("MR", 5),
    ("MS", 3),
    ("MT", 6),
    ("MU", 6),
    ("MV", 5),
    ("MW", 5),
    ("MX", 2),
    ("MY", 3),
    ("MZ", 5),
    ("NA", 5),
    ("NC", 2),
    ("NE", 5),
    ("NF", 2),
    ("NG", 3),
    ("NI", 6),
    ("NL", 1),
    ("NO", 1),
    ("NP", 5),
    ("NR", 5),
    ("NU", 5),
    ("NZ", 2),
    ("OM", 5),
    ("PA", 6),
    ("PE", 3),
    ("PF", 3),
    ("PG", 5),
    ("PH", 6),
    ("PK", 6),
    ("PL", 2),
    ("PM", 5),
    ("PN", 3),
    ("PR", 7),
    ("PS", 5),
    ("PT", 1),
    ("PW", 5),
    ("PY", 3),
    ("QA", 4),
    ("RE", 2),
    ("RO", 2),
    ("RS", 2),
    ("RU", 3),
    ("RW", 5),
    ("SA", 5),
    ("SB", 5),
    ("SC", 5),
    ("SD", 5),
    ("SE", 1),
    ("SG", 2),
    ("SH", 3),
    ("SI", 2),
    ("SJ", 2),
    ("SK", 2),
    ("SL", 5),
    ("SM", 3),
    ("SN", 6),
    ("SO", 5),
    ("SR", 5),
    ("SS", 6),
    ("ST", 5),
    ("SV", 3),
    ("SX", 2),
    ("SY", 6),
    ("SZ", 5),
    ("TC", 3),
    ("TD", 5),
    ("TF", 2),
    ("TG", 5),
    ("TH", 3),
    ("TJ", 5),
    ("TK", 5),
    ("TL", 5),
    ("TM", 5),
    ("TN", 5),
    ("TO", 5),
    ("TR", 2),
    ("TT", 6),
    ("TV", 5),
    ("TW", 4),
    ("TZ", 5),
    ("UA", 4),
    ("UG", 6),
    ("UM", 7),
    ("US", 7),
    ("UY", 3),
    ("UZ", 4),
    ("VA", 3),
    ("VC", 5),
    ("VE", 5),
    ("VG", 5),
    ("VI", 7),
    ("VN", 3),
    ("VU", 6),
    ("WF", 2),
    ("WS", 5),
    ("XK", 4),
    ("YE", 6),
    ("YT", 2),
    ("ZA", 3),
    ("ZM", 5),
    ("ZW", 6),
];

use crate::error::{IbanError, Result};
use crate::pattern::Field::{Alphanumeric, Digits, Upper};
use crate::pattern::{BbanPattern, Field, IbanPattern};
use std::fmt;

/// IBAN format of one country as published in the IBAN Registry.
#[derive(Debug, PartialEq, Eq)]
pub struct CountryFormat {
    code: &'static str,
    name: &'static str,
    bban_length: usize,
    bban: BbanPattern,
}

impl CountryFormat {
    const fn new(
        code: &'static str,
        name: &'static str,
        bban_length: usize,
        prefix: &'static [Field],
        bank: &'static [Field],
        branch: &'static [Field],
        account: &'static [Field],
    ) -> Self {
        CountryFormat {
            code,
            name,
            bban_length,
            bban: BbanPattern::new(prefix, bank, branch, account),
        }
    }

    pub fn lookup(code: &str) -> Result<&'static CountryFormat> {
        lookup(code)
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn bban_length(&self) -> usize {
        self.bban_length
    }

    pub fn iban_length(&self) -> usize {
        self.bban_length + 4
    }

    pub fn bban_pattern(&self) -> &BbanPattern {
        &self.bban
    }

    pub fn iban_pattern(&self) -> IbanPattern<'_> {
        IbanPattern::new(self.code, &self.bban)
    }

    pub fn bban_prefix(&self) -> &'static [Field] {
        self.bban.prefix()
    }

    pub fn bank_identifier(&self) -> &'static [Field] {
        self.bban.bank()
    }

    pub fn branch_identifier(&self) -> &'static [Field] {
        self.bban.branch()
    }

    pub fn account_number(&self) -> &'static [Field] {
        self.bban.account()
    }

    pub fn has_bban_prefix(&self) -> bool {
        self.bban.has_prefix()
    }

    pub fn has_branch_identifier(&self) -> bool {
        self.bban.has_branch()
    }

    /// Checks a whitespace-free BBAN: length first, then structure.
    pub fn validate_bban(&self, bban: &str) -> Result<()> {
        let actual = bban.chars().count();
        if actual != self.bban_length {
            return Err(IbanError::bban(format!(
                "BBAN for country {} must have {} characters, but was {}",
                self.code, self.bban_length, actual
            )));
        }
        self.bban.check(bban).map_err(|mismatch| {
            IbanError::bban(format!(
                "BBAN [{}] does not match the required pattern {} for country code {}: {}",
                bban, self.bban, self.code, mismatch
            ))
        })
    }
}

impl fmt::Display for CountryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

/// Exact, case-sensitive match on the two-letter code.
pub fn lookup(code: &str) -> Result<&'static CountryFormat> {
    match COUNTRY_FORMATS.binary_search_by(|entry| entry.code.cmp(code)) {
        Ok(idx) => Ok(&COUNTRY_FORMATS[idx]),
        Err(_) => {
            log::debug!("no IBAN format registered for country code {:?}", code);
            Err(IbanError::unknown_country(code))
        }
    }
}

pub fn all() -> &'static [CountryFormat] {
    &COUNTRY_FORMATS
}

// Sorted by code; lookup relies on it.
static COUNTRY_FORMATS: [CountryFormat; 77] = [
    CountryFormat::new("AD", "Andorra", 20, &[], &[Digits(4)], &[Digits(4)], &[Alphanumeric(12)]),
    CountryFormat::new("AE", "United Arab Emirates", 19, &[], &[Digits(3)], &[], &[Digits(16)]),
    CountryFormat::new("AL", "Albania", 24, &[], &[Digits(8)], &[], &[Alphanumeric(16)]),
    CountryFormat::new("AT", "Austria", 16, &[], &[Digits(5)], &[], &[Digits(11)]),
    CountryFormat::new("AZ", "Azerbaijan", 24, &[], &[Upper(4)], &[], &[Alphanumeric(20)]),
    CountryFormat::new(
        "BA",
        "Bosnia and Herzegovina",
        16,
        &[],
        &[Digits(3)],
        &[Digits(3)],
        &[Digits(8), Digits(2)],
    ),
    CountryFormat::new("BE", "Belgium", 12, &[], &[Digits(3)], &[], &[Digits(7), Digits(2)]),
    CountryFormat::new(
        "BG",
        "Bulgaria",
        18,
        &[],
        &[Upper(4)],
        &[Digits(4)],
        &[Digits(2), Alphanumeric(8)],
    ),
    CountryFormat::new("BH", "Bahrain", 18, &[], &[Upper(4)], &[], &[Alphanumeric(14)]),
    CountryFormat::new(
        "BR",
        "Brazil",
        25,
        &[],
        &[Digits(8)],
        &[Digits(5)],
        &[Digits(10), Upper(1), Alphanumeric(1)],
    ),
    CountryFormat::new(
        "BY",
        "Belarus",
        24,
        &[],
        &[Alphanumeric(4)],
        &[],
        &[Digits(4), Alphanumeric(16)],
    ),
    CountryFormat::new("CH", "Switzerland", 17, &[], &[Digits(5)], &[], &[Alphanumeric(12)]),
    CountryFormat::new("CR", "Costa Rica", 18, &[], &[Digits(4)], &[], &[Digits(14)]),
    CountryFormat::new("CY", "Cyprus", 24, &[], &[Digits(3)], &[Digits(5)], &[Alphanumeric(16)]),
    CountryFormat::new(
        "CZ",
        "Czech Republic",
        20,
        &[],
        &[Digits(4)],
        &[],
        &[Digits(6), Digits(10)],
    ),
    CountryFormat::new("DE", "Germany", 18, &[], &[Digits(8)], &[], &[Digits(10)]),
    CountryFormat::new("DK", "Denmark", 14, &[], &[Digits(4)], &[], &[Digits(9), Digits(1)]),
    CountryFormat::new("DO", "Dominican Republic", 24, &[], &[Alphanumeric(4)], &[], &[Digits(20)]),
    CountryFormat::new(
        "EE",
        "Estonia",
        16,
        &[],
        &[Digits(2)],
        &[],
        &[Digits(2), Digits(11), Digits(1)],
    ),
    CountryFormat::new(
        "ES",
        "Spain",
        20,
        &[],
        &[Digits(4)],
        &[Digits(4)],
        &[Digits(1), Digits(1), Digits(10)],
    ),
    CountryFormat::new("FI", "Finland", 14, &[], &[Digits(3)], &[], &[Digits(11)]),
    CountryFormat::new("FO", "Faroe Islands", 14, &[], &[Digits(4)], &[], &[Digits(9), Digits(1)]),
    CountryFormat::new(
        "FR",
        "France",
        23,
        &[],
        &[Digits(5)],
        &[],
        &[Digits(5), Alphanumeric(11), Digits(2)],
    ),
    CountryFormat::new("GB", "United Kingdom", 18, &[], &[Upper(4)], &[Digits(6)], &[Digits(8)]),
    CountryFormat::new("GE", "Georgia", 18, &[], &[Upper(2)], &[], &[Digits(16)]),
    CountryFormat::new("GI", "Gibraltar", 19, &[], &[Upper(4)], &[], &[Alphanumeric(15)]),
    CountryFormat::new("GL", "Greenland", 14, &[], &[Digits(4)], &[], &[Digits(9), Digits(1)]),
    CountryFormat::new("GR", "Greece", 23, &[], &[Digits(3)], &[Digits(4)], &[Alphanumeric(16)]),
    CountryFormat::new("GT", "Guatemala", 24, &[], &[Alphanumeric(4)], &[], &[Alphanumeric(20)]),
    CountryFormat::new("HR", "Croatia", 17, &[], &[Digits(7)], &[], &[Digits(10)]),
    CountryFormat::new(
        "HU",
        "Hungary",
        24,
        &[],
        &[Digits(3)],
        &[Digits(4)],
        &[Digits(1), Digits(15), Digits(1)],
    ),
    CountryFormat::new("IE", "Ireland", 18, &[], &[Upper(4)], &[Digits(6)], &[Digits(8)]),
    CountryFormat::new("IL", "Israel", 19, &[], &[Digits(3)], &[Digits(3)], &[Digits(13)]),
    CountryFormat::new("IQ", "Iraq", 19, &[], &[Upper(4)], &[Digits(3)], &[Digits(12)]),
    CountryFormat::new(
        "IS",
        "Iceland",
        22,
        &[],
        &[Digits(2)],
        &[Digits(2)],
        &[Digits(2), Digits(6), Digits(10)],
    ),
    CountryFormat::new(
        "IT",
        "Italy",
        23,
        &[Upper(1)],
        &[Digits(5)],
        &[Digits(5)],
        &[Alphanumeric(12)],
    ),
    CountryFormat::new("JO", "Jordan", 26, &[], &[Upper(4)], &[], &[Digits(4), Alphanumeric(18)]),
    CountryFormat::new("KW", "Kuwait", 26, &[], &[Upper(4)], &[], &[Alphanumeric(22)]),
    CountryFormat::new("KZ", "Kazakhstan", 16, &[], &[Digits(3)], &[], &[Alphanumeric(13)]),
    CountryFormat::new("LB", "Lebanon", 24, &[], &[Digits(4)], &[], &[Alphanumeric(20)]),
    CountryFormat::new("LC", "Saint Lucia", 28, &[], &[Upper(4)], &[], &[Alphanumeric(24)]),
    CountryFormat::new("LI", "Liechtenstein", 17, &[], &[Digits(5)], &[], &[Alphanumeric(12)]),
    CountryFormat::new("LT", "Lithuania", 16, &[], &[Digits(5)], &[], &[Digits(11)]),
    CountryFormat::new("LU", "Luxembourg", 16, &[], &[Digits(3)], &[], &[Alphanumeric(13)]),
    CountryFormat::new("LV", "Latvia", 17, &[], &[Upper(4)], &[], &[Alphanumeric(13)]),
    CountryFormat::new("LY", "Libya", 21, &[], &[Digits(3)], &[Digits(3)], &[Digits(15)]),
    CountryFormat::new(
        "MC",
        "Monaco",
        23,
        &[],
        &[Digits(5)],
        &[Digits(5)],
        &[Alphanumeric(11), Digits(2)],
    ),
    CountryFormat::new("MD", "Moldova", 20, &[], &[Alphanumeric(2)], &[], &[Alphanumeric(18)]),
    CountryFormat::new("ME", "Montenegro", 18, &[], &[Digits(3)], &[], &[Digits(13), Digits(2)]),
    CountryFormat::new(
        "MK",
        "North Macedonia",
        15,
        &[],
        &[Digits(3)],
        &[],
        &[Alphanumeric(10), Digits(2)],
    ),
    CountryFormat::new(
        "MR",
        "Mauritania",
        23,
        &[],
        &[Digits(5)],
        &[Digits(5)],
        &[Digits(11), Digits(2)],
    ),
    CountryFormat::new("MT", "Malta", 27, &[], &[Upper(4)], &[Digits(5)], &[Alphanumeric(18)]),
    CountryFormat::new(
        "MU",
        "Mauritius",
        26,
        &[],
        &[Upper(4), Digits(2)],
        &[Digits(2)],
        &[Digits(12), Digits(3), Alphanumeric(3)],
    ),
    CountryFormat::new("NL", "Netherlands", 14, &[], &[Upper(4)], &[], &[Digits(10)]),
    CountryFormat::new("NO", "Norway", 11, &[], &[Digits(4)], &[], &[Digits(6), Digits(1)]),
    CountryFormat::new("PK", "Pakistan", 20, &[], &[Upper(4)], &[], &[Alphanumeric(16)]),
    CountryFormat::new("PL", "Poland", 24, &[], &[Digits(8)], &[], &[Digits(16)]),
    CountryFormat::new("PS", "Palestine", 25, &[], &[Upper(4)], &[], &[Alphanumeric(21)]),
    CountryFormat::new(
        "PT",
        "Portugal",
        21,
        &[],
        &[Digits(4)],
        &[],
        &[Digits(4), Digits(11), Digits(2)],
    ),
    CountryFormat::new("QA", "Qatar", 25, &[], &[Upper(4)], &[], &[Alphanumeric(21)]),
    CountryFormat::new("RO", "Romania", 20, &[], &[Upper(4)], &[], &[Alphanumeric(16)]),
    CountryFormat::new("RS", "Serbia", 18, &[], &[Digits(3)], &[], &[Digits(13), Digits(2)]),
    CountryFormat::new("SA", "Saudi Arabia", 20, &[], &[Digits(2)], &[], &[Alphanumeric(18)]),
    CountryFormat::new(
        "SC",
        "Seychelles",
        27,
        &[],
        &[Upper(4), Digits(2)],
        &[Digits(2)],
        &[Digits(16), Upper(3)],
    ),
    CountryFormat::new("SE", "Sweden", 20, &[], &[Digits(3)], &[], &[Digits(16), Digits(1)]),
    CountryFormat::new("SI", "Slovenia", 15, &[], &[Digits(5)], &[], &[Digits(8), Digits(2)]),
    CountryFormat::new("SK", "Slovakia", 20, &[], &[Digits(4)], &[], &[Digits(6), Digits(10)]),
    CountryFormat::new(
        "SM",
        "San Marino",
        23,
        &[Upper(1)],
        &[Digits(5)],
        &[Digits(5)],
        &[Alphanumeric(12)],
    ),
    CountryFormat::new(
        "ST",
        "Sao Tome and Principe",
        21,
        &[],
        &[Digits(4)],
        &[Digits(4)],
        &[Digits(11), Digits(2)],
    ),
    CountryFormat::new("SV", "El Salvador", 24, &[], &[Upper(4)], &[], &[Digits(20)]),
    CountryFormat::new("TL", "Timor-Leste", 19, &[], &[Digits(3)], &[], &[Digits(14), Digits(2)]),
    CountryFormat::new(
        "TN",
        "Tunisia",
        20,
        &[],
        &[Digits(2)],
        &[Digits(3)],
        &[Digits(13), Digits(2)],
    ),
    CountryFormat::new("TR", "Turkey", 22, &[], &[Digits(5)], &[], &[Digits(1), Alphanumeric(16)]),
    CountryFormat::new("UA", "Ukraine", 25, &[], &[Digits(6)], &[], &[Alphanumeric(19)]),
    CountryFormat::new("VA", "Vatican City", 18, &[], &[Digits(3)], &[], &[Digits(15)]),
    CountryFormat::new("VG", "British Virgin Islands", 20, &[], &[Upper(4)], &[], &[Digits(16)]),
    CountryFormat::new(
        "XK",
        "Kosovo",
        16,
        &[],
        &[Digits(2)],
        &[Digits(2)],
        &[Digits(10), Digits(2)],
    ),
];

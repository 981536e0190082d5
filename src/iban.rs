use crate::checksum;
use crate::country::{self, CountryFormat};
use crate::error::{IbanError, Result};
use crate::pattern::{check_fields, Field};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

const PREFIX_LENGTH: usize = 4;
const MAX_BBAN_LENGTH: usize = 30;
const GROUP_SIZE: usize = 4;

/// How much of the input is checked before the checksum and the country
/// format are consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validation {
    /// ISO 13616 envelope (`2!a2!n` plus 1 to 30 letters or digits) and
    /// canonical check digits only (`02` to `98`).
    #[default]
    Strict,
    /// Any input of at least five characters whose check digits satisfy
    /// the MOD97-10 remainder.
    Relaxed,
}

/// A validated IBAN. Equality, ordering and hashing use the canonical
/// string only.
#[derive(Debug, Clone)]
pub struct Iban {
    country: &'static CountryFormat,
    checksum: String,
    bban: String,
    canonical: String,
}

impl Iban {
    /// Parses an IBAN that may contain whitespace, e.g. `DE44 5001 0517 5407 3249 31`.
    pub fn parse(input: &str) -> Result<Self> {
        Self::parse_with(input, Validation::Strict)
    }

    pub fn parse_with(input: &str, validation: Validation) -> Result<Self> {
        Self::parse_compact(&strip_whitespace(input), validation).map_err(|err| {
            log::debug!("rejected IBAN {:?}: {}", input, err);
            err
        })
    }

    fn parse_compact(compact: &str, validation: Validation) -> Result<Self> {
        match validation {
            Validation::Strict => check_envelope(compact)?,
            Validation::Relaxed => check_minimal_shape(compact)?,
        }

        let (code, check_digits, bban) = split(compact);
        checksum::verify(code, check_digits, bban)?;

        let country = country::lookup(code)?;
        country.validate_bban(bban)?;

        if validation == Validation::Strict {
            let expected = checksum::compute(code, bban)?;
            if expected != check_digits {
                return Err(IbanError::checksum(
                    compact,
                    format!(
                        "check digits {} are outside 02..98, expected {}",
                        check_digits, expected
                    ),
                ));
            }
        }

        Ok(Self::assemble(
            country,
            check_digits.to_string(),
            bban.to_string(),
        ))
    }

    /// Builds an IBAN from a country format and a BBAN that may contain
    /// whitespace. The check digits are always computed.
    pub fn new(country: &'static CountryFormat, bban: &str) -> Result<Self> {
        let bban = strip_whitespace(bban);
        if bban.is_empty() {
            return Err(IbanError::bban(format!(
                "BBAN for country {} must not be empty",
                country.code()
            )));
        }
        country.validate_bban(&bban)?;
        let checksum = checksum::compute(country.code(), &bban)?;
        Ok(Self::assemble(country, checksum, bban))
    }

    pub fn from_country_code(code: &str, bban: &str) -> Result<Self> {
        if code.trim().is_empty() {
            return Err(IbanError::invalid_argument(
                "country code must be a valid ISO 3166-1 two-letter identifier",
            ));
        }
        Self::new(country::lookup(code)?, bban)
    }

    fn assemble(country: &'static CountryFormat, checksum: String, bban: String) -> Self {
        let canonical = format!("{}{}{}", country.code(), checksum, bban);
        Iban {
            country,
            checksum,
            bban,
            canonical,
        }
    }

    pub fn country(&self) -> &'static CountryFormat {
        self.country
    }

    pub fn country_code(&self) -> &'static str {
        self.country.code()
    }

    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn bban(&self) -> &str {
        &self.bban
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Canonical form with a blank after the check digits and after every
    /// further group of four characters.
    pub fn formatted(&self) -> String {
        let mut out = String::with_capacity(self.canonical.len() + self.bban.len() / GROUP_SIZE + 1);
        out.push_str(self.country.code());
        out.push_str(&self.checksum);
        for (idx, ch) in self.bban.chars().enumerate() {
            if idx % GROUP_SIZE == 0 {
                out.push(' ');
            }
            out.push(ch);
        }
        out
    }

    pub fn bank_identifier(&self) -> &str {
        &self.bban[self.country.bban_pattern().bank_range()]
    }

    pub fn branch_identifier(&self) -> Option<&str> {
        self.country
            .bban_pattern()
            .branch_range()
            .map(|range| &self.bban[range])
    }
}

fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|ch| !ch.is_whitespace()).collect()
}

fn check_envelope(compact: &str) -> Result<()> {
    let length = compact.chars().count();
    if length <= PREFIX_LENGTH || length > PREFIX_LENGTH + MAX_BBAN_LENGTH {
        return Err(IbanError::format(format!(
            "IBAN must have between {} and {} characters, but was {}",
            PREFIX_LENGTH + 1,
            PREFIX_LENGTH + MAX_BBAN_LENGTH,
            length
        )));
    }
    let envelope = [
        Field::Upper(2),
        Field::Digits(2),
        Field::Alphanumeric(length - PREFIX_LENGTH),
    ];
    check_fields(envelope.iter(), compact).map_err(|mismatch| {
        IbanError::format(format!(
            "[{}] is not shaped like an IBAN: {}",
            compact, mismatch
        ))
    })
}

fn check_minimal_shape(compact: &str) -> Result<()> {
    let length = compact.chars().count();
    if length <= PREFIX_LENGTH {
        return Err(IbanError::format(format!(
            "IBAN must have more than {} characters, but was {}",
            PREFIX_LENGTH, length
        )));
    }
    if !compact.chars().skip(2).take(2).all(|ch| ch.is_ascii_digit()) {
        return Err(IbanError::format(format!(
            "[{}] must carry two check digits after the country code",
            compact
        )));
    }
    Ok(())
}

// Callers have checked there are more than four characters.
fn split(compact: &str) -> (&str, &str, &str) {
    let offset = |nth: usize| {
        compact
            .char_indices()
            .nth(nth)
            .map(|(idx, _)| idx)
            .unwrap_or(compact.len())
    };
    let (code, rest) = compact.split_at(offset(2));
    let (check_digits, bban) = rest.split_at(offset(PREFIX_LENGTH) - code.len());
    (code, check_digits, bban)
}

impl fmt::Display for Iban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for Iban {
    type Err = IbanError;

    fn from_str(s: &str) -> Result<Self> {
        Iban::parse(s)
    }
}

impl PartialEq for Iban {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Iban {}

impl Hash for Iban {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl PartialOrd for Iban {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Iban {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl Serialize for Iban {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical)
    }
}

impl<'de> Deserialize<'de> for Iban {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Iban::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn parses_formatted_input() {
        let iban = Iban::parse("DE44 5001 0517 5407 3249 31").unwrap();
        assert_eq!(iban.country_code(), "DE");
        assert_eq!(iban.country().name(), "Germany");
        assert_eq!(iban.bban(), "500105175407324931");
        assert_eq!(iban.checksum(), "44");
        assert_eq!(iban.canonical(), "DE44500105175407324931");
        assert_eq!(iban.to_string(), "DE44500105175407324931");
    }

    #[test]
    fn parses_letters_in_bban() {
        let iban = Iban::parse("VG96VPVG0000012345678901").unwrap();
        assert_eq!(iban.country_code(), "VG");
        assert_eq!(iban.bban(), "VPVG0000012345678901");
        assert_eq!(iban.checksum(), "96");

        let iban = Iban::parse("MT84 MALT 0110 0001 2345 MTLC AST0 01S").unwrap();
        assert_eq!(iban.country_code(), "MT");
        assert_eq!(iban.bban(), "MALT011000012345MTLCAST001S");
        assert_eq!(iban.checksum(), "84");
    }

    #[test]
    fn formats_in_groups_of_four() {
        let iban = Iban::parse("XK051212012345678906").unwrap();
        assert_eq!(iban.formatted(), "XK05 1212 0123 4567 8906");

        let iban = Iban::from_country_code("JO", "CBJO0010000000000131000302").unwrap();
        assert_eq!(iban.formatted(), "JO94 CBJO 0010 0000 0000 0131 0003 02");

        let iban = Iban::parse("NO9386011117947").unwrap();
        assert_eq!(iban.formatted(), "NO93 8601 1117 947");
    }

    #[test]
    fn composite_construction_computes_check_digits() {
        let jordan = CountryFormat::lookup("JO").unwrap();
        let iban = Iban::new(jordan, "CBJO0010000000000131000302").unwrap();
        assert_eq!(iban.checksum(), "94");
        assert_eq!(iban.canonical(), "JO94CBJO0010000000000131000302");

        let germany = CountryFormat::lookup("DE").unwrap();
        let iban = Iban::new(germany, "5001 0517 5407 3249 31").unwrap();
        assert_eq!(iban.checksum(), "44");
        assert_eq!(iban.bban(), "500105175407324931");

        let latvia = CountryFormat::lookup("LV").unwrap();
        let iban = Iban::new(latvia, " BANK 0000 4351 9500 1 ").unwrap();
        assert_eq!(iban.checksum(), "80");
        assert_eq!(iban.bban(), "BANK0000435195001");
    }

    #[test]
    fn composite_construction_failures() {
        let germany = CountryFormat::lookup("DE").unwrap();
        assert!(matches!(
            Iban::new(germany, "5001 0517 5407 3249 310"),
            Err(IbanError::BbanValidation { .. })
        ));
        assert!(matches!(
            Iban::new(germany, "   "),
            Err(IbanError::BbanValidation { .. })
        ));
        assert!(matches!(
            Iban::from_country_code("BG", "1234567890123456 78"),
            Err(IbanError::BbanValidation { .. })
        ));
        assert!(matches!(
            Iban::from_country_code("", "500105175407324931"),
            Err(IbanError::InvalidArgument { .. })
        ));
        assert!(matches!(
            Iban::from_country_code("ZZ", "500105175407324931"),
            Err(IbanError::UnknownCountryCode { .. })
        ));
    }

    #[test]
    fn empty_input_is_a_format_error() {
        assert!(matches!(Iban::parse(""), Err(IbanError::Format { .. })));
        assert!(matches!(Iban::parse("  \t "), Err(IbanError::Format { .. })));
        assert!(matches!(
            Iban::parse_with("", Validation::Relaxed),
            Err(IbanError::Format { .. })
        ));
    }

    #[test]
    fn strict_envelope_rejects_malformed_input() {
        for input in [
            "DE445001051754073249317891237892378",
            "de44500105175407324931",
            "DEX4500105175407324931",
            "DE44",
            "DE44 5001 0517 54$7 3249 31",
        ] {
            assert!(
                matches!(Iban::parse(input), Err(IbanError::Format { .. })),
                "{input}"
            );
        }
    }

    #[test]
    fn relaxed_mode_reports_illegal_characters_from_transcoding() {
        let err = Iban::parse_with("DE44 5001 0517 54$7 3249 31", Validation::Relaxed).unwrap_err();
        assert!(matches!(err, IbanError::BbanValidation { .. }));
        assert!(err.to_string().contains("'$'"));

        let err = Iban::parse_with("DEÄ4500105175407324931", Validation::Relaxed).unwrap_err();
        assert!(matches!(err, IbanError::Format { .. }));
    }

    #[test]
    fn checksum_is_verified_before_country_and_structure() {
        assert!(matches!(
            Iban::parse("DE17 5001 0517 5407 3249 31"),
            Err(IbanError::InvalidChecksum { .. })
        ));
        assert!(matches!(
            Iban::parse("ZZ82500105175407324931789123789237"),
            Err(IbanError::UnknownCountryCode { .. })
        ));
    }

    #[test]
    fn bban_length_is_checked_after_checksum() {
        let bban = "5001051754073249310";
        let check = checksum::compute("DE", bban).unwrap();
        let err = Iban::parse(&format!("DE{}{}", check, bban)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "BBAN validation failed: BBAN for country DE must have 18 characters, but was 19"
        );
    }

    #[test]
    fn strict_mode_rejects_non_canonical_check_digits() {
        let bban = (0u64..)
            .map(|n| format!("{:018}", n))
            .find(|bban| checksum::compute("DE", bban).unwrap() == "97")
            .unwrap();
        let forged = format!("DE00{}", bban);

        let err = Iban::parse(&forged).unwrap_err();
        assert!(matches!(err, IbanError::InvalidChecksum { .. }));

        let relaxed = Iban::parse_with(&forged, Validation::Relaxed).unwrap();
        assert_eq!(relaxed.checksum(), "00");
        assert_eq!(Iban::parse(&format!("DE97{}", bban)).unwrap().checksum(), "97");
    }

    #[test]
    fn identifier_accessors() {
        let iban = Iban::parse("GB29 NWBK 6016 1331 9268 19").unwrap();
        assert_eq!(iban.bank_identifier(), "NWBK");
        assert_eq!(iban.branch_identifier(), Some("601613"));

        let iban = Iban::parse("IT60X0542811101000000123456").unwrap();
        assert_eq!(iban.bank_identifier(), "05428");
        assert_eq!(iban.branch_identifier(), Some("11101"));

        let iban = Iban::parse("DE44500105175407324931").unwrap();
        assert_eq!(iban.bank_identifier(), "50010517");
        assert_eq!(iban.branch_identifier(), None);
    }

    #[test]
    fn identity_follows_canonical_string() {
        let spaced = Iban::parse("DE44 5001 0517 5407 3249 31").unwrap();
        let compact: Iban = "DE44500105175407324931".parse().unwrap();
        assert_eq!(spaced, compact);

        let mut set = HashSet::new();
        set.insert(spaced);
        set.insert(compact);
        set.insert(Iban::parse("XK051212012345678906").unwrap());
        assert_eq!(set.len(), 2);

        let mut sorted: Vec<Iban> = set.into_iter().collect();
        sorted.sort();
        assert_eq!(sorted[0].country_code(), "DE");
    }

    #[derive(Serialize, Deserialize)]
    struct Row {
        id: String,
        iban: Iban,
    }

    #[test]
    fn serializes_as_canonical_string() {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer
            .serialize(Row {
                id: "a".to_string(),
                iban: Iban::parse("DE44 5001 0517 5407 3249 31").unwrap(),
            })
            .unwrap();
        let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(data, "id,iban\na,DE44500105175407324931\n");

        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let row: Row = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(row.iban.checksum(), "44");

        let mut reader = csv::Reader::from_reader("id,iban\nb,DE17500105175407324931\n".as_bytes());
        let result: std::result::Result<Row, csv::Error> = reader.deserialize().next().unwrap();
        assert!(result.is_err());
    }
}

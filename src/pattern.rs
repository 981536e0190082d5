use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    Digit,
    Upper,
    Alphanumeric,
}

impl CharClass {
    pub fn matches(self, ch: char) -> bool {
        match self {
            CharClass::Digit => ch.is_ascii_digit(),
            CharClass::Upper => ch.is_ascii_uppercase(),
            CharClass::Alphanumeric => ch.is_ascii_alphanumeric(),
        }
    }

    /// IBAN Registry notation: `n`, `a` or `c`.
    pub fn notation(self) -> char {
        match self {
            CharClass::Digit => 'n',
            CharClass::Upper => 'a',
            CharClass::Alphanumeric => 'c',
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            CharClass::Digit => "a digit",
            CharClass::Upper => "an upper-case letter",
            CharClass::Alphanumeric => "a letter or digit",
        }
    }
}

/// One fixed-width run of a single character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Digits(usize),
    Upper(usize),
    Alphanumeric(usize),
}

impl Field {
    pub fn class(self) -> CharClass {
        match self {
            Field::Digits(_) => CharClass::Digit,
            Field::Upper(_) => CharClass::Upper,
            Field::Alphanumeric(_) => CharClass::Alphanumeric,
        }
    }

    pub fn count(self) -> usize {
        match self {
            Field::Digits(count) | Field::Upper(count) | Field::Alphanumeric(count) => count,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.count(), self.class().notation())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    Length {
        expected: usize,
        actual: usize,
    },
    Character {
        position: usize,
        found: char,
        expected: CharClass,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Length { expected, actual } => {
                write!(f, "expected {} characters, found {}", expected, actual)
            }
            Mismatch::Character {
                position,
                found,
                expected,
            } => write!(
                f,
                "expected {} at position {}, found '{}'",
                expected.describe(),
                position + 1,
                found
            ),
        }
    }
}

/// Matches `input` against the fields in order. Every field has an exact
/// width, so the total length is checked before any character.
pub fn check_fields<'a, I>(fields: I, input: &str) -> Result<(), Mismatch>
where
    I: Iterator<Item = &'a Field> + Clone,
{
    let expected: usize = fields.clone().map(|field| field.count()).sum();
    let actual = input.chars().count();
    if expected != actual {
        return Err(Mismatch::Length { expected, actual });
    }

    let mut chars = input.chars().enumerate();
    for field in fields {
        let class = field.class();
        for _ in 0..field.count() {
            let Some((position, found)) = chars.next() else {
                return Err(Mismatch::Length { expected, actual });
            };
            if !class.matches(found) {
                return Err(Mismatch::Character {
                    position,
                    found,
                    expected: class,
                });
            }
        }
    }
    Ok(())
}

/// BBAN structure: optional prefix, bank identifier, optional branch
/// identifier and account number, concatenated in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BbanPattern {
    prefix: &'static [Field],
    bank: &'static [Field],
    branch: &'static [Field],
    account: &'static [Field],
}

impl BbanPattern {
    pub const fn new(
        prefix: &'static [Field],
        bank: &'static [Field],
        branch: &'static [Field],
        account: &'static [Field],
    ) -> Self {
        BbanPattern {
            prefix,
            bank,
            branch,
            account,
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static Field> + Clone {
        self.prefix
            .iter()
            .chain(self.bank.iter())
            .chain(self.branch.iter())
            .chain(self.account.iter())
    }

    pub fn length(&self) -> usize {
        self.fields().map(|field| field.count()).sum()
    }

    pub fn matches(&self, input: &str) -> bool {
        self.check(input).is_ok()
    }

    pub fn check(&self, input: &str) -> Result<(), Mismatch> {
        check_fields(self.fields(), input)
    }

    pub fn prefix(&self) -> &'static [Field] {
        self.prefix
    }

    pub fn bank(&self) -> &'static [Field] {
        self.bank
    }

    pub fn branch(&self) -> &'static [Field] {
        self.branch
    }

    pub fn account(&self) -> &'static [Field] {
        self.account
    }

    pub fn has_prefix(&self) -> bool {
        !self.prefix.is_empty()
    }

    pub fn has_branch(&self) -> bool {
        !self.branch.is_empty()
    }

    /// Position of the bank identifier inside a matching BBAN.
    pub fn bank_range(&self) -> Range<usize> {
        let start = width(self.prefix);
        start..start + width(self.bank)
    }

    pub fn branch_range(&self) -> Option<Range<usize>> {
        if !self.has_branch() {
            return None;
        }
        let start = self.bank_range().end;
        Some(start..start + width(self.branch))
    }
}

impl fmt::Display for BbanPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in self.fields() {
            write!(f, "{}", field)?;
        }
        Ok(())
    }
}

/// Country literal, two check digits, then the BBAN pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IbanPattern<'a> {
    code: &'a str,
    bban: &'a BbanPattern,
}

impl<'a> IbanPattern<'a> {
    pub fn new(code: &'a str, bban: &'a BbanPattern) -> Self {
        IbanPattern { code, bban }
    }

    pub fn length(&self) -> usize {
        self.code.len() + 2 + self.bban.length()
    }

    pub fn matches(&self, input: &str) -> bool {
        let Some(rest) = input.strip_prefix(self.code) else {
            return false;
        };
        let mut chars = rest.chars();
        let digits = chars
            .by_ref()
            .take(2)
            .filter(|ch| ch.is_ascii_digit())
            .count();
        digits == 2 && self.bban.matches(chars.as_str())
    }
}

impl fmt::Display for IbanPattern<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}2!n{}", self.code, self.bban)
    }
}

fn width(fields: &[Field]) -> usize {
    fields.iter().map(|field| field.count()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    static BULGARIA: BbanPattern = BbanPattern::new(
        &[],
        &[Field::Upper(4)],
        &[Field::Digits(4)],
        &[Field::Digits(2), Field::Alphanumeric(8)],
    );

    #[test]
    fn renders_registry_notation() {
        assert_eq!(BULGARIA.to_string(), "4!a4!n2!n8!c");
        assert_eq!(IbanPattern::new("BG", &BULGARIA).to_string(), "BG2!n4!a4!n2!n8!c");
    }

    #[test]
    fn matches_exact_structure() {
        assert!(BULGARIA.matches("BNBG96611020345678"));
        assert!(BULGARIA.matches("BNBG9661102034567a"));
        assert!(!BULGARIA.matches("BNBG966110203456789"));
        assert!(!BULGARIA.matches("123456789012345678"));
    }

    #[test]
    fn reports_length_before_characters() {
        assert_eq!(
            BULGARIA.check("12"),
            Err(Mismatch::Length {
                expected: 18,
                actual: 2
            })
        );
    }

    #[test]
    fn reports_first_offending_character() {
        let err = BULGARIA.check("BNBG9661102034567$").unwrap_err();
        assert_eq!(
            err,
            Mismatch::Character {
                position: 17,
                found: '$',
                expected: CharClass::Alphanumeric
            }
        );
        assert_eq!(
            err.to_string(),
            "expected a letter or digit at position 18, found '$'"
        );

        let err = BULGARIA.check("BNB196611020345678").unwrap_err();
        assert_eq!(err.to_string(), "expected an upper-case letter at position 4, found '1'");
    }

    #[test]
    fn multibyte_input_is_counted_in_characters() {
        let err = BULGARIA.check("ÄNBG96611020345678").unwrap_err();
        assert!(matches!(err, Mismatch::Character { position: 0, found: 'Ä', .. }));
    }

    #[test]
    fn identifier_ranges() {
        assert_eq!(BULGARIA.bank_range(), 0..4);
        assert_eq!(BULGARIA.branch_range(), Some(4..8));
        assert_eq!(BULGARIA.length(), 18);
        assert!(BULGARIA.has_branch());
        assert!(!BULGARIA.has_prefix());
    }

    #[test]
    fn iban_pattern_requires_literal_code_and_digits() {
        let pattern = IbanPattern::new("BG", &BULGARIA);
        assert!(pattern.matches("BG80BNBG96611020345678"));
        assert!(!pattern.matches("DE80BNBG96611020345678"));
        assert!(!pattern.matches("BG8XBNBG96611020345678"));
        assert!(!pattern.matches("BG8"));
        assert_eq!(pattern.length(), 22);
    }
}

use crate::country::CountryFormat;
use crate::error::Result;
use crate::iban::Iban;
use crate::pattern::CharClass;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DIGITS: &[u8] = b"0123456789";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub fn generate(country: &'static CountryFormat, count: usize, seed: u64) -> Result<Vec<Iban>> {
    log::debug!(
        "generating {} IBAN(s) for {} with seed {}",
        count,
        country.code(),
        seed
    );
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| generate_iban(&mut rng, country))
        .collect()
}

pub fn generate_iban<R: Rng + ?Sized>(rng: &mut R, country: &'static CountryFormat) -> Result<Iban> {
    let bban = random_bban(rng, country);
    Iban::new(country, &bban)
}

/// Random BBAN that satisfies the country's structure field by field.
pub fn random_bban<R: Rng + ?Sized>(rng: &mut R, country: &CountryFormat) -> String {
    let mut out = String::with_capacity(country.bban_length());
    for field in country.bban_pattern().fields() {
        let charset = charset(field.class());
        for _ in 0..field.count() {
            let idx = rng.gen_range(0..charset.len());
            out.push(char::from(charset[idx]));
        }
    }
    out
}

fn charset(class: CharClass) -> &'static [u8] {
    match class {
        CharClass::Digit => DIGITS,
        CharClass::Upper => UPPER,
        CharClass::Alphanumeric => ALPHANUMERIC,
    }
}

//! Scalar fake values for fields with no relational meaning.
//!
//! Factories draw every random decision through [`ValueProvider`], so a
//! seeded provider makes a whole run reproducible. [`FakeValueProvider`] is
//! the default implementation, built on the `fake` crate's English locale
//! and a ChaCha8 RNG.

use std::ops::RangeInclusive;

use chrono::{DateTime, TimeDelta, Utc};
use fake::Fake;
use fake::faker::address::raw::{BuildingNumber, CityName, SecondaryAddress, StreetName, ZipCode};
use fake::faker::company::raw::{BsNoun, Buzzword, CompanyName, Industry};
use fake::faker::internet::raw::{DomainSuffix, FreeEmailProvider, Password};
use fake::faker::lorem::raw::{Paragraph, Sentence, Word};
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::{Builder, Uuid};

use crate::error::GenerationError;

/// Anchor for "date in the past" values from seeded providers
/// (2025-01-01T00:00:00Z).
const SEEDED_ANCHOR_SECS: i64 = 1_735_689_600;

const SECONDS_PER_YEAR: i64 = 365 * 24 * 60 * 60;

/// Highest image index served by the placeholder image host.
const MAX_IMAGE_INDEX: u32 = 1084;

/// Kinds of free text a provider can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKind {
    /// Given name.
    FirstName,
    /// Family name.
    LastName,
    /// Street name.
    Street,
    /// Building number.
    BuildingNumber,
    /// Apartment or suite designation.
    SecondaryAddress,
    /// Postal code.
    PostalCode,
    /// City or locality.
    City,
    /// Catalog category name.
    CategoryName,
    /// Catalog item name.
    ProductName,
    /// Company name.
    CompanyName,
    /// Single lorem sentence.
    Sentence,
    /// Lorem paragraph.
    Paragraph,
    /// Password-like token.
    Password,
    /// Domain of a free email provider.
    EmailProvider,
    /// Web address.
    Url,
    /// Placeholder image address.
    ImageUrl,
}

/// Source of scalar fake values.
///
/// Implementations must be deterministic for a fixed seed and otherwise
/// uniform over the requested domain. Every method is fallible so that an
/// exhausted or misconfigured source aborts the run before any write.
pub trait ValueProvider {
    /// Returns a fresh record identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::GenerationUnavailable`] when the source
    /// cannot produce a value.
    fn identifier(&mut self) -> Result<Uuid, GenerationError>;

    /// Returns free text of the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::GenerationUnavailable`] when the source
    /// cannot produce a value.
    fn text(&mut self, kind: TextKind) -> Result<String, GenerationError>;

    /// Returns an integer drawn uniformly from `range`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::GenerationUnavailable`] when `range` is
    /// empty or the source cannot produce a value.
    fn integer(&mut self, range: RangeInclusive<i32>) -> Result<i32, GenerationError>;

    /// Returns a fixed-point amount in minor units drawn uniformly from
    /// `range`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::GenerationUnavailable`] when `range` is
    /// empty or the source cannot produce a value.
    fn amount_cents(&mut self, range: RangeInclusive<i64>) -> Result<i64, GenerationError>;

    /// Returns a fair coin flip.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::GenerationUnavailable`] when the source
    /// cannot produce a value.
    fn boolean(&mut self) -> Result<bool, GenerationError>;

    /// Returns an instant within the last `years` years.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::GenerationUnavailable`] when the span
    /// cannot be represented or the source cannot produce a value.
    fn date_in_past(&mut self, years: u32) -> Result<DateTime<Utc>, GenerationError>;

    /// Returns an index drawn uniformly from `0..len`.
    ///
    /// This is the "pick one of a list" primitive; callers index their own
    /// slice with the result.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::GenerationUnavailable`] when `len` is zero
    /// or the source cannot produce a value.
    fn pick_index(&mut self, len: usize) -> Result<usize, GenerationError>;
}

/// Default [`ValueProvider`] backed by `fake` and a ChaCha8 RNG.
///
/// # Example
///
/// ```
/// use storefront_data::{FakeValueProvider, TextKind, ValueProvider};
///
/// let mut first = FakeValueProvider::from_seed(42);
/// let mut second = FakeValueProvider::from_seed(42);
///
/// assert_eq!(
///     first.text(TextKind::FirstName).expect("name"),
///     second.text(TextKind::FirstName).expect("name"),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct FakeValueProvider {
    rng: ChaCha8Rng,
    anchor: DateTime<Utc>,
}

impl FakeValueProvider {
    /// Creates a deterministic provider.
    ///
    /// Dates are anchored at a fixed instant so the same seed always yields
    /// the same values.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            anchor: DateTime::from_timestamp(SEEDED_ANCHOR_SECS, 0)
                .unwrap_or_default(),
        }
    }

    /// Creates a provider seeded from operating system entropy, with dates
    /// anchored at the current time.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::GenerationUnavailable`] when the operating
    /// system cannot supply entropy.
    pub fn from_entropy() -> Result<Self, GenerationError> {
        let rng = ChaCha8Rng::try_from_os_rng()
            .map_err(|err| GenerationError::unavailable(format!("entropy source: {err}")))?;
        Ok(Self {
            rng,
            anchor: Utc::now(),
        })
    }

    /// Replaces the instant that "date in the past" values count back from.
    #[must_use]
    pub const fn with_anchor(mut self, anchor: DateTime<Utc>) -> Self {
        self.anchor = anchor;
        self
    }

    fn product_name(&mut self) -> String {
        let adjective: String = Buzzword(EN).fake_with_rng(&mut self.rng);
        let noun: String = BsNoun(EN).fake_with_rng(&mut self.rng);
        capitalise(&format!("{adjective} {noun}"))
    }

    fn url(&mut self) -> String {
        let word: String = Word(EN).fake_with_rng(&mut self.rng);
        let suffix: String = DomainSuffix(EN).fake_with_rng(&mut self.rng);
        format!("https://www.{word}.{suffix}")
    }

    fn image_url(&mut self) -> String {
        let index = self.rng.random_range(0..=MAX_IMAGE_INDEX);
        format!("https://picsum.photos/640/480/?image={index}")
    }
}

impl ValueProvider for FakeValueProvider {
    fn identifier(&mut self) -> Result<Uuid, GenerationError> {
        Ok(Builder::from_random_bytes(self.rng.random()).into_uuid())
    }

    fn text(&mut self, kind: TextKind) -> Result<String, GenerationError> {
        let value: String = match kind {
            TextKind::FirstName => FirstName(EN).fake_with_rng(&mut self.rng),
            TextKind::LastName => LastName(EN).fake_with_rng(&mut self.rng),
            TextKind::Street => StreetName(EN).fake_with_rng(&mut self.rng),
            TextKind::BuildingNumber => BuildingNumber(EN).fake_with_rng(&mut self.rng),
            TextKind::SecondaryAddress => SecondaryAddress(EN).fake_with_rng(&mut self.rng),
            TextKind::PostalCode => ZipCode(EN).fake_with_rng(&mut self.rng),
            TextKind::City => CityName(EN).fake_with_rng(&mut self.rng),
            TextKind::CategoryName => Industry(EN).fake_with_rng(&mut self.rng),
            TextKind::CompanyName => CompanyName(EN).fake_with_rng(&mut self.rng),
            TextKind::Sentence => Sentence(EN, 4..10).fake_with_rng(&mut self.rng),
            TextKind::Paragraph => Paragraph(EN, 3..6).fake_with_rng(&mut self.rng),
            TextKind::Password => Password(EN, 12..20).fake_with_rng(&mut self.rng),
            TextKind::EmailProvider => FreeEmailProvider(EN).fake_with_rng(&mut self.rng),
            TextKind::ProductName => self.product_name(),
            TextKind::Url => self.url(),
            TextKind::ImageUrl => self.image_url(),
        };
        Ok(value)
    }

    fn integer(&mut self, range: RangeInclusive<i32>) -> Result<i32, GenerationError> {
        if range.is_empty() {
            return Err(empty_range(&range));
        }
        Ok(self.rng.random_range(range))
    }

    fn amount_cents(&mut self, range: RangeInclusive<i64>) -> Result<i64, GenerationError> {
        if range.is_empty() {
            return Err(empty_range(&range));
        }
        Ok(self.rng.random_range(range))
    }

    fn boolean(&mut self) -> Result<bool, GenerationError> {
        Ok(self.rng.random_ratio(1, 2))
    }

    fn date_in_past(&mut self, years: u32) -> Result<DateTime<Utc>, GenerationError> {
        let span = SECONDS_PER_YEAR
            .checked_mul(i64::from(years))
            .ok_or_else(|| GenerationError::unavailable(format!("{years} years overflows")))?;
        let offset = self.rng.random_range(0..=span);
        let delta = TimeDelta::try_seconds(offset)
            .ok_or_else(|| GenerationError::unavailable("date offset out of range"))?;
        self.anchor
            .checked_sub_signed(delta)
            .ok_or_else(|| GenerationError::unavailable("date before representable range"))
    }

    fn pick_index(&mut self, len: usize) -> Result<usize, GenerationError> {
        if len == 0 {
            return Err(GenerationError::unavailable("cannot pick from an empty list"));
        }
        Ok(self.rng.random_range(0..len))
    }
}

fn empty_range<T: std::fmt::Debug>(range: &RangeInclusive<T>) -> GenerationError {
    GenerationError::unavailable(format!("empty range {range:?}"))
}

fn capitalise(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

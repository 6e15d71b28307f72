use crate::Error;
use num_bigint::BigUint;
use num_traits::Zero;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Number of decimals used by ERC-20 style tokens.
pub const DEFAULT_DECIMALS: u32 = 18;

/// Token quantity in smallest units.
///
/// Backed by an arbitrary precision integer, so sums of balances near
/// `10^27` and beyond stay exact.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Amount(BigUint);

impl Amount {
	pub fn zero() -> Self {
		Self(BigUint::zero())
	}

	/// Amount of `tokens` whole tokens with the given number of decimals.
	pub fn from_tokens(tokens: u64, decimals: u32) -> Self {
		Self(BigUint::from(tokens) * scale(decimals))
	}

	/// Returns `None` if `rhs` is larger than `self`.
	pub fn checked_sub(&self, rhs: &Amount) -> Option<Amount> {
		if rhs.0 > self.0 {
			return None;
		}
		Some(Self(&self.0 - &rhs.0))
	}

	/// Whole tokens, discarding the fractional remainder.
	pub fn whole_tokens(&self, decimals: u32) -> BigUint {
		&self.0 / scale(decimals)
	}
}

fn scale(decimals: u32) -> BigUint {
	BigUint::from(10u32).pow(decimals)
}

impl std::str::FromStr for Amount {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Error> {
		let digits = s.trim();
		if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
			return Err(Error::Parse { value: s.into() });
		}
		BigUint::parse_bytes(digits.as_bytes(), 10)
			.map(Self)
			.ok_or_else(|| Error::Parse { value: s.into() })
	}
}

impl std::fmt::Display for Amount {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<u64> for Amount {
	fn from(value: u64) -> Self {
		Self(BigUint::from(value))
	}
}

impl Add for Amount {
	type Output = Amount;

	fn add(self, rhs: Amount) -> Amount {
		Self(self.0 + rhs.0)
	}
}

impl<'a> Add<&'a Amount> for Amount {
	type Output = Amount;

	fn add(self, rhs: &'a Amount) -> Amount {
		Self(self.0 + &rhs.0)
	}
}

impl<'a> AddAssign<&'a Amount> for Amount {
	fn add_assign(&mut self, rhs: &'a Amount) {
		self.0 += &rhs.0;
	}
}

impl Sum for Amount {
	fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
		iter.fold(Amount::zero(), |acc, amount| acc + amount)
	}
}

impl<'a> Sum<&'a Amount> for Amount {
	fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
		iter.fold(Amount::zero(), |acc, amount| acc + amount)
	}
}

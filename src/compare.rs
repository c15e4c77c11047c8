//! Constant-time comparison of signatures.

use subtle::{Choice, ConstantTimeEq};

/// Compare a computed signature with a candidate without leaking where they differ.
///
/// Every byte of `expected` is examined, regardless of the position of the first mismatch
/// and regardless of whether the candidate has the same length.
/// The running time therefore depends only on the length of `expected`, which is a public property of the algorithm.
pub fn constant_time_eq(expected: &[u8], candidate: &[u8]) -> bool {
	let (equal, _) = fold_equal(expected, candidate);
	let same_length = (expected.len() as u64).ct_eq(&(candidate.len() as u64));
	bool::from(same_length & equal)
}

/// Fold a per-byte constant-time equality check over every byte of `expected`.
///
/// Returns the accumulated choice and the number of bytes examined.
#[inline(never)]
fn fold_equal(expected: &[u8], candidate: &[u8]) -> (Choice, usize) {
	let mut equal = Choice::from(1u8);
	let mut examined = 0usize;
	for (i, a) in expected.iter().enumerate() {
		// Missing candidate bytes are compared against the complement, so a short candidate never matches by accident.
		let b = candidate.get(i).copied().unwrap_or(!*a);
		equal &= a.ct_eq(&b);
		examined += 1;
	}
	(equal, examined)
}

//! Stable identifier hashing for coordinate-free layouts.
//!
//! The same identifier always lands on the same angle/offset, so a layout can
//! be recomputed from scratch every time the snapshot changes and entities
//! still appear where they were.

/// Folds the UTF-16 code units of `id` into a wrapping 32-bit accumulator
/// (`h * 31 + c`, written as shift-and-subtract).
pub fn stable_hash(id: &str) -> i32 {
	id.encode_utf16().fold(0i32, |hash, unit| {
		hash.wrapping_shl(5)
			.wrapping_sub(hash)
			.wrapping_add(i32::from(unit))
	})
}

/// Deterministic pair in `[-1, 1]` derived from the hash of `id`.
pub fn unit_pair(id: &str) -> (f64, f64) {
	let bits = stable_hash(id) as u32;
	let mixed = bits.wrapping_mul(0x9e37_79b9).rotate_left(13) ^ bits;
	let x = f64::from(bits & 0xffff) / f64::from(u16::MAX);
	let y = f64::from(mixed >> 16) / f64::from(u16::MAX);
	((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_string_hashes_to_zero() {
		assert_eq!(stable_hash(""), 0);
	}

	#[test]
	fn matches_polynomial_fold() {
		// 'a' = 97, 'b' = 98: 97 * 31 + 98
		assert_eq!(stable_hash("a"), 97);
		assert_eq!(stable_hash("ab"), 97 * 31 + 98);
	}

	#[test]
	fn wraps_instead_of_overflowing() {
		let long = "10.0.0.254:443/very-long-service-identifier".repeat(8);
		assert_eq!(stable_hash(&long), stable_hash(&long));
	}

	#[test]
	fn similar_ids_spread_apart() {
		assert_ne!(stable_hash("10.0.0.1"), stable_hash("10.0.0.2"));
		assert_ne!(unit_pair("10.0.0.1"), unit_pair("10.0.0.2"));
	}

	#[test]
	fn unit_pair_in_range() {
		for id in ["", "a", "gateway-01", "ä漢字"] {
			let (x, y) = unit_pair(id);
			assert!((-1.0..=1.0).contains(&x));
			assert!((-1.0..=1.0).contains(&y));
		}
	}
}

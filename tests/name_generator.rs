use std::collections::HashSet;

use durable_write::{generate, generate_alnum, random_in_range, Charset, ContractViolation};

#[test]
fn digits_only_name() {
    let name = generate(Charset::DIGITS, 16).unwrap();
    assert_eq!(name.len(), 16);
    assert!(name.bytes().all(|b| b.is_ascii_digit()), "got {name}");
}

#[test]
fn zero_length_is_a_contract_violation() {
    assert_eq!(generate(Charset::ALL, 0), Err(ContractViolation::ZeroLength));
    assert_eq!(generate_alnum(0), Err(ContractViolation::ZeroLength));
}

#[test]
fn unknown_bits_only_is_a_contract_violation() {
    let err = generate(Charset::from_bits(0x100), 8).unwrap_err();
    assert_eq!(err, ContractViolation::EmptyPool);
}

#[test]
fn zero_mask_draws_from_every_subset_pool() {
    let pool = Charset::ALL.pool();
    let name = generate(Charset::from_bits(0), 256).unwrap();
    assert!(name.bytes().all(|b| pool.contains(&b)));
}

#[test]
fn alnum_names_are_letters_and_unique_in_practice() {
    let mut seen = HashSet::new();
    for _ in 0..500 {
        let name = generate_alnum(10).unwrap();
        assert_eq!(name.len(), 10);
        assert!(name.bytes().all(|b| b.is_ascii_alphabetic()), "got {name}");
        assert!(seen.insert(name), "duplicate temp suffix");
    }
}

#[test]
fn parsed_charset_limits_output() {
    let cs: Charset = "lower,digits".parse().unwrap();
    let name = generate(cs, 64).unwrap();
    assert!(
        name.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()),
        "got {name}"
    );
}

#[test]
fn range_is_inclusive_and_order_insensitive() {
    for _ in 0..200 {
        let v = random_in_range(10, -5);
        assert!((-5..=10).contains(&v));
    }
    assert_eq!(random_in_range(7, 7), 7);
    assert!((i64::MIN..=i64::MAX).contains(&random_in_range(i64::MIN, i64::MAX)));
}

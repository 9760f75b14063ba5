// Copyright (c) Nexa Contributors
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use crate::base::{FeeRatio, NexaAddress};

#[test]
fn precompiled_range_bounds() {
    assert!(!NexaAddress::ZERO.is_precompiled());
    assert!(crate::PRECOMPILED_RANGE_FIRST_ADDRESS.is_precompiled());
    assert!(crate::PRECOMPILED_RANGE_LAST_ADDRESS.is_precompiled());
    assert!(NexaAddress::from_hex_literal("0x1").unwrap().is_precompiled());
    assert!(NexaAddress::from_hex_literal("0x2ff").unwrap().is_precompiled());
    assert!(NexaAddress::from_hex_literal("0x3ff").unwrap().is_precompiled());
    assert!(!NexaAddress::from_hex_literal("0x400").unwrap().is_precompiled());

    // A low suffix does not make a non-zero-prefixed address reserved.
    let mut bytes = [0u8; NexaAddress::LENGTH];
    bytes[0] = 1;
    bytes[NexaAddress::LENGTH - 1] = 5;
    assert!(!NexaAddress::new(bytes).is_precompiled());
}

#[test]
fn hex_literal_parsing_pads_short_input() {
    let addr = NexaAddress::from_hex_literal("0xa").unwrap();
    let mut expected = [0u8; NexaAddress::LENGTH];
    expected[NexaAddress::LENGTH - 1] = 0x0a;
    assert_eq!(addr, NexaAddress::new(expected));
    assert_eq!(addr.to_hex_literal(), "0xa");

    assert!(NexaAddress::from_hex_literal("a").is_err());
    assert!(NexaAddress::from_hex_literal("0xzz").is_err());
}

#[test]
fn display_roundtrip() {
    let addr = NexaAddress::random();
    let parsed = NexaAddress::from_str(&addr.to_hex()).unwrap();
    assert_eq!(addr, parsed);
}

#[test]
fn fee_ratio_bounds() {
    assert!(FeeRatio::new(0).is_err());
    assert!(FeeRatio::new(100).is_err());
    assert!(FeeRatio::new(255).is_err());
    assert_eq!(FeeRatio::new(1).unwrap().get(), 1);
    assert_eq!(FeeRatio::new(99).unwrap().get(), 99);
    assert_eq!(FeeRatio::try_from(30).unwrap().get(), 30);
}

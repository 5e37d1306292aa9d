use cep78_types::{
    from_bytes, from_tagged_bytes, to_bytes, to_tagged_bytes, ClType, ClValue, DecodeError, Key,
    RuntimeArgs, URef, U512,
};

#[test]
fn fixed_width_integers_are_little_endian() {
    assert_eq!(hex::encode(to_bytes(&ClValue::U8(0xab))), "ab");
    assert_eq!(hex::encode(to_bytes(&ClValue::U32(1))), "01000000");
    assert_eq!(hex::encode(to_bytes(&ClValue::U64(0x0102))), "0201000000000000");
}

#[test]
fn u512_golden_vectors() {
    assert_eq!(hex::encode(to_bytes(&ClValue::u512(1000u64))), "02e803");
    let big = U512::from_dec_str("2500000000000").unwrap();
    let bytes = to_bytes(&ClValue::U512(big));
    assert_eq!(hex::encode(&bytes), "0600a89c134602");
    assert_eq!(from_bytes(&bytes, &ClType::U512).unwrap().0, ClValue::U512(big));
}

#[test]
fn key_sub_tags() {
    let account = to_bytes(&ClValue::Key(Key::Account([0x11; 32])));
    assert_eq!(account[0], 0);
    assert_eq!(account.len(), 33);

    let hash = to_bytes(&ClValue::Key(Key::Hash([0x22; 32])));
    assert_eq!(hash[0], 1);
    assert_eq!(hash.len(), 33);

    let uref = to_bytes(&ClValue::Key(Key::URef(URef {
        addr: [0x33; 32],
        access_rights: 7,
    })));
    assert_eq!(uref[0], 2);
    assert_eq!(uref.len(), 34);
    assert_eq!(uref[33], 7);
}

#[test]
fn event_map_tagged_encoding() {
    let event = ClValue::string_map([("event_type", "Mint")]);
    let bytes = to_tagged_bytes(&event);
    let mut expected = vec![26, 0, 0, 0, 1, 0, 0, 0, 10, 0, 0, 0];
    expected.extend_from_slice(b"event_type");
    expected.extend_from_slice(&[4, 0, 0, 0]);
    expected.extend_from_slice(b"Mint");
    expected.extend_from_slice(&[17, 10, 10]);
    assert_eq!(bytes, expected);

    let (decoded, rest) = from_bytes(&bytes, &ClType::Any).unwrap();
    assert_eq!(decoded, event);
    assert!(rest.is_empty());
}

#[test]
fn dictionary_write_carries_seed_and_item_key() {
    // Dictionary values are stored as the envelope, then the dictionary seed
    // address and the item key.
    let event = ClValue::string_map([("event_type", "Burn")]);
    let mut bytes = to_tagged_bytes(&event);
    bytes.extend_from_slice(&[0x5e; 32]);
    bytes.extend_from_slice(&to_bytes(&ClValue::from("0")));

    let (decoded, rest) = from_tagged_bytes(&bytes, &ClType::Any).unwrap();
    assert_eq!(decoded, event);
    assert_eq!(rest.len(), 32 + 4 + 1);
}

#[test]
fn decoded_map_keeps_wire_order() {
    let event = ClValue::string_map([("z", "1"), ("a", "2"), ("m", "3")]);
    let (decoded, _) = from_tagged_bytes(&to_tagged_bytes(&event), &ClType::Any).unwrap();
    let keys: Vec<&str> = decoded
        .as_map()
        .unwrap()
        .iter()
        .filter_map(|(k, _)| k.as_str())
        .collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn list_of_u64_golden() {
    let list = ClValue::list(
        ClType::U64,
        vec![ClValue::U64(1), ClValue::U64(2), ClValue::U64(3)],
    );
    assert_eq!(
        hex::encode(to_tagged_bytes(&list)),
        concat!(
            "1c000000",
            "03000000010000000000000002000000000000000300000000000000",
            "0e05",
        )
    );
}

#[test]
fn static_and_tagged_forms_decode_to_same_value() {
    let value = ClValue::some(ClType::String, ClValue::from("meta"));
    let (untagged, _) = from_bytes(&to_bytes(&value), &value.cl_type()).unwrap();
    let (tagged, _) = from_tagged_bytes(&to_tagged_bytes(&value), &value.cl_type()).unwrap();
    assert_eq!(untagged, tagged);
}

#[test]
fn unknown_tag_in_generic_context() {
    // Tag 22 (PublicKey) is not a supported variant.
    assert_eq!(
        from_bytes(&[1, 0, 0, 0, 7, 22], &ClType::Any).unwrap_err(),
        DecodeError::UnknownTypeTag(22)
    );
}

#[test]
fn runtime_args_golden_bytes() {
    let mut args = RuntimeArgs::new();
    args.insert("allow_minting", true);
    args.insert("burn_mode", 1u8);
    assert_eq!(
        hex::encode(args.to_bytes()),
        concat!(
            "02000000",
            "0d000000", "616c6c6f775f6d696e74696e67", "01000000", "01", "00",
            "09000000", "6275726e5f6d6f6465", "01000000", "01", "03",
        )
    );
}

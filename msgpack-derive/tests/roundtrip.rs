use msgpack_derive::{msgpack_alias, MsgPack};

#[derive(MsgPack, Debug, PartialEq)]
struct Address {
    city: String,
    zip: u32,
}

#[derive(MsgPack, Debug, PartialEq)]
struct Fingerprint {
    bytes: [u8; 3],
}

#[test]
fn fixed_size_array_field_roundtrips() {
    let fp = Fingerprint { bytes: [1, 2, 3] };
    let mut buf = Vec::new();
    fp.encode(&mut buf);
    assert_eq!(buf.len(), fp.msgsize());
    let (decoded, rest) = Fingerprint::decode(&buf).unwrap();
    assert!(rest.is_empty());
    assert_eq!(decoded, fp);
}

#[test]
fn wrong_length_array_on_the_wire_is_rejected() {
    let mut buf = Vec::new();
    msgpack_core::codec::write::write_map_len(&mut buf, 1);
    msgpack_core::codec::write::write_str(&mut buf, "bytes");
    msgpack_core::codec::write::write_array_len(&mut buf, 2);
    msgpack_core::codec::write::write_int(&mut buf, 1);
    msgpack_core::codec::write::write_int(&mut buf, 2);
    assert!(Fingerprint::decode(&buf).is_err());
}

#[derive(MsgPack, Debug, PartialEq)]
struct Person {
    name: String,
    age: u8,
    nickname: Option<String>,
    scores: Vec<i64>,
    address: Address,
    #[msg(rename = "is_active")]
    active: bool,
    #[msg(skip)]
    cache_key: u32,
}

#[test]
fn struct_roundtrips_through_a_map() {
    let person = Person {
        name: "Ada".to_string(),
        age: 36,
        nickname: Some("Countess".to_string()),
        scores: vec![1, 2, 3],
        address: Address { city: "London".to_string(), zip: 90210 },
        active: true,
        cache_key: 0,
    };

    let mut buf = Vec::new();
    person.encode(&mut buf);
    assert_eq!(buf.len(), person.msgsize());

    let (decoded, rest) = Person::decode(&buf).unwrap();
    assert!(rest.is_empty());
    assert_eq!(decoded.name, person.name);
    assert_eq!(decoded.age, person.age);
    assert_eq!(decoded.nickname, person.nickname);
    assert_eq!(decoded.scores, person.scores);
    assert_eq!(decoded.address, person.address);
    assert_eq!(decoded.active, person.active);
    assert_eq!(decoded.cache_key, 0);
}

#[test]
fn none_option_encodes_as_nil() {
    let person = Person {
        name: "Bob".to_string(),
        age: 40,
        nickname: None,
        scores: vec![],
        address: Address { city: "Paris".to_string(), zip: 75000 },
        active: false,
        cache_key: 7,
    };
    let mut buf = Vec::new();
    person.encode(&mut buf);
    let (decoded, _) = Person::decode(&buf).unwrap();
    assert_eq!(decoded.nickname, None);
    assert!(decoded.scores.is_empty());
}

fn shim_to_millis(raw: &u64) -> u32 {
    (*raw / 1000) as u32
}

fn shim_from_millis(v: &u32) -> u64 {
    (*v as u64) * 1000
}

#[derive(MsgPack, Debug, PartialEq)]
struct Timer {
    #[msg(rename = "elapsed_ms", as = "Uint64", using = "shim_to_millis/shim_from_millis")]
    elapsed_seconds: u32,
}

#[test]
fn as_and_using_shim_converts_through_the_wire_base_type() {
    let timer = Timer { elapsed_seconds: 5 };
    let mut buf = Vec::new();
    timer.encode(&mut buf);
    assert_eq!(buf.len(), timer.msgsize());

    let (decoded, rest) = Timer::decode(&buf).unwrap();
    assert!(rest.is_empty());
    assert_eq!(decoded, timer);

    // the wire value is really 5000 (5 * 1000 via the shim), not 5 — this
    // is what tells the test apart from a no-op round trip.
    let mut expected = Vec::new();
    msgpack_core::codec::write::write_map_len(&mut expected, 1);
    msgpack_core::codec::write::write_str(&mut expected, "elapsed_ms");
    msgpack_core::codec::write::write_uint(&mut expected, 5000);
    assert_eq!(buf, expected);
}

#[derive(MsgPack, Debug, PartialEq)]
struct Envelope {
    label: String,
    payload: msgpack_core::ext::Extension,
}

#[test]
fn extension_field_roundtrips() {
    let envelope =
        Envelope { label: "blob".to_string(), payload: msgpack_core::ext::Extension { type_id: 7, data: vec![9, 8, 7] } };
    let mut buf = Vec::new();
    envelope.encode(&mut buf);
    assert_eq!(buf.len(), envelope.msgsize());
    let (decoded, rest) = Envelope::decode(&buf).unwrap();
    assert!(rest.is_empty());
    assert_eq!(decoded, envelope);
}

#[msgpack_alias]
type Kelvin = f64;

#[derive(MsgPack, Debug, PartialEq)]
struct Reading {
    temperature: Kelvin,
}

#[test]
fn field_typed_as_a_plain_alias_of_a_primitive_round_trips() {
    let reading = Reading { temperature: 310.15 };
    let mut buf = Vec::new();
    reading.encode(&mut buf);
    assert_eq!(buf.len(), reading.msgsize());
    let (decoded, rest) = Reading::decode(&buf).unwrap();
    assert!(rest.is_empty());
    assert_eq!(decoded, reading);
}

#[test]
fn unknown_map_key_is_skipped_on_decode() {
    let mut buf = Vec::new();
    msgpack_core::codec::write::write_map_len(&mut buf, 3);
    msgpack_core::codec::write::write_str(&mut buf, "city");
    msgpack_core::codec::write::write_str(&mut buf, "Berlin");
    msgpack_core::codec::write::write_str(&mut buf, "from_the_future");
    msgpack_core::codec::write::write_array_len(&mut buf, 2);
    msgpack_core::codec::write::write_int(&mut buf, 1);
    msgpack_core::codec::write::write_int(&mut buf, 2);
    msgpack_core::codec::write::write_str(&mut buf, "zip");
    msgpack_core::codec::write::write_int(&mut buf, 10115);

    let (decoded, rest) = Address::decode(&buf).unwrap();
    assert!(rest.is_empty());
    assert_eq!(decoded, Address { city: "Berlin".to_string(), zip: 10115 });
}

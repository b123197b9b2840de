use std::fs::File;
use std::io::BufWriter;
use std::time::SystemTime;

use msgpack_derive::MsgPack;
use tracing_flame::FlameLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

#[derive(MsgPack, Debug, PartialEq)]
struct Address {
    city: String,
    zip: u32,
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
}

fn setup_global_subscriber() -> impl Drop {
    let file = File::create("./trace.folded").unwrap();
    let flame_layer = FlameLayer::new(BufWriter::new(file)).with_file_and_line(false);
    let guard = flame_layer.flush_on_drop();

    let subscriber = Registry::default().with(flame_layer);

    tracing::subscriber::set_global_default(subscriber).expect("Could not set global default");
    guard
}

fn main() {
    let _guard = setup_global_subscriber();

    let people: Vec<Person> = (0..100_000)
        .map(|i| Person {
            name: format!("person-{i}"),
            age: (i % 90) as u8,
            nickname: if i % 3 == 0 { Some(format!("nick-{i}")) } else { None },
            scores: vec![i as i64, i as i64 * 2, i as i64 * 3],
            address: Address { city: format!("city-{}", i % 500), zip: 10000 + (i % 90000) as u32 },
            active: i % 2 == 0,
        })
        .collect();

    let mut start = SystemTime::now();
    let mut buf = Vec::new();
    for person in &people {
        person.encode(&mut buf);
    }
    println!("Encode time: {:?}, bytes: {}", start.elapsed().unwrap(), buf.len());

    start = SystemTime::now();
    let mut rest: &[u8] = &buf;
    let mut decoded = Vec::with_capacity(people.len());
    while !rest.is_empty() {
        let (person, tail) = Person::decode(rest).unwrap();
        decoded.push(person);
        rest = tail;
    }
    println!("Decode time: {:?}, count: {}", start.elapsed().unwrap(), decoded.len());

    assert_eq!(decoded, people);
}

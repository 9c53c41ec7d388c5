// Any copyright is dedicated to the Public Domain.
// http://creativecommons.org/publicdomain/zero/1.0/

//! A simple demo that showcases the basic usage (store/load/delete) of a
//! persistent map.
//!
//! You can test this out by running:
//!
//!     cargo run --example simple-map

use std::ops::ControlFlow;

use serde_derive::{
    Deserialize,
    Serialize,
};
use tempfile::Builder;

use persist::{
    backend::MEMORY,
    Map,
    MustValue,
};

#[derive(Debug, Serialize, Deserialize)]
struct Fruit {
    color: String,
    count: u32,
}

fn main() {
    let root = Builder::new().prefix("simple-map").tempdir().unwrap();
    let path = root.path().join("fruit.bin");

    println!("Storing data...");
    {
        let map: Map<String, Fruit> = Map::open(&path).unwrap();
        map.store(&"apple".to_string(), &Fruit { color: "red".into(), count: 3 }).unwrap();
        map.store(&"banana".to_string(), &Fruit { color: "yellow".into(), count: 6 }).unwrap();
        map.store(&"cherry".to_string(), &Fruit { color: "red".into(), count: 40 }).unwrap();
        // Closing is optional, every store is already on disk
        map.close().unwrap();
    }

    println!("Looking up keys...");
    let map: Map<String, Fruit> = Map::open(&path).unwrap();
    println!("Get apple {:?}", map.load(&"apple".to_string()).unwrap());
    println!("It should be None! ({:?})", map.load(&"durian".to_string()).unwrap());

    println!("Storing only if absent...");
    let (banana, loaded) = map.load_or_store(&"banana".to_string(), Fruit { color: "green".into(), count: 1 }).unwrap();
    println!("Got {:?}, already there: {}", banana, loaded);

    println!("Iterating...");
    map.all()
        .for_each(|name, fruit| {
            println!("{} => {:?}", name, fruit);
            ControlFlow::Continue(())
        })
        .unwrap();

    println!("Finding the first red fruit...");
    map.all()
        .for_each(|name, fruit| {
            if fruit.color == "red" {
                println!("Found {}", name);
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        })
        .unwrap();

    println!("Deleting keys...");
    println!("Removed {:?}", map.load_and_delete(&"cherry".to_string()).unwrap());
    map.delete(&"cherry".to_string()).unwrap();
    println!("Keys left {:?}", map.keys().to_vec().unwrap());

    println!("Using a single in-memory value...");
    let visits: MustValue<u64> = MustValue::open(MEMORY).unwrap();
    println!("It should be None! ({:?})", visits.load());
    visits.store(&1);
    println!("Visits {:?}", visits.load());
}

// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use std::{
    net::Ipv4Addr,
    ops::ControlFlow,
};

use tempfile::Builder;

use persist::{
    backend::{
        Driver,
        SafeMode,
        MEMORY,
    },
    BincodeEncoder,
    DisplayEncoder,
    EncoderPair,
    Map,
    StoreError,
    StrEncoder,
    Value,
    VALUE_KEY,
};

#[test]
fn test_map_operations() {
    let m: Map<String, u32> = Map::open(MEMORY).expect("opened");

    m.store(&"a".into(), &1).expect("stored");
    m.store(&"b".into(), &2).expect("stored");
    assert_eq!(m.load(&"a".into()).expect("loaded"), Some(1));

    assert_eq!(m.load_or_store(&"c".into(), 3).expect("stored"), (3, false));
    assert_eq!(m.load_or_store(&"c".into(), 4).expect("loaded"), (3, true));

    assert_eq!(m.load_and_delete(&"missing".into()).expect("nothing"), None);
    assert_eq!(m.load_and_delete(&"c".into()).expect("deleted"), Some(3));
    assert_eq!(m.load(&"c".into()).expect("loaded"), None);

    m.delete(&"b".into()).expect("deleted");
    m.delete(&"b".into()).expect("deleted again");

    assert_eq!(m.all().to_vec().expect("walked"), vec![("a".to_string(), 1)]);
    m.close().expect("closed");
}

#[test]
fn test_iteration_completeness_and_early_stop() {
    let m: Map<String, u32> = Map::open(MEMORY).expect("opened");
    m.store(&"a".into(), &1).expect("stored");
    m.store(&"b".into(), &2).expect("stored");

    let mut all = m.all().to_vec().expect("walked");
    all.sort();
    assert_eq!(all, vec![("a".to_string(), 1), ("b".to_string(), 2)]);

    let mut seen = vec![];
    let result = m.all().for_each(|k, v| {
        seen.push((k, v));
        ControlFlow::Break(())
    });
    assert!(result.is_ok());
    assert_eq!(seen.len(), 1);

    let mut keys = vec![];
    m.keys()
        .for_each(|k| {
            keys.push(k);
            ControlFlow::Continue(())
        })
        .expect("walked");
    keys.sort();
    assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn test_walk_sees_later_writes() {
    let m: Map<String, u32> = Map::open(MEMORY).expect("opened");
    let keys = m.keys();
    assert!(keys.to_vec().expect("walked").is_empty());

    m.store(&"a".into(), &1).expect("stored");
    assert_eq!(keys.to_vec().expect("walked"), vec!["a".to_string()]);
}

#[test]
fn test_custom_encoders() {
    let driver = SafeMode::open(MEMORY).expect("opened");
    let m: Map<String, Ipv4Addr, SafeMode, StrEncoder<String>, DisplayEncoder<Ipv4Addr>> =
        Map::with_encoders(driver, EncoderPair::default());

    let localhost = Ipv4Addr::new(127, 0, 0, 1);
    m.store(&"localhost".into(), &localhost).expect("stored");
    assert_eq!(m.load(&"localhost".into()).expect("loaded"), Some(localhost));

    // Both codecs are textual, so the raw bytes are readable.
    let m: Map<String, String, SafeMode, StrEncoder<String>, StrEncoder<String>> =
        Map::with_encoders(m.into_driver(), EncoderPair::default());
    assert_eq!(m.all().to_vec().expect("walked"), vec![("localhost".to_string(), "127.0.0.1".to_string())]);

    // And text that isn't an address doesn't decode as one.
    m.store(&"broken".into(), &"not an address".into()).expect("stored");
    let m: Map<String, Ipv4Addr, SafeMode, StrEncoder<String>, DisplayEncoder<Ipv4Addr>> =
        Map::with_encoders(m.into_driver(), EncoderPair::default());
    match m.load(&"broken".into()) {
        Err(e @ StoreError::ValueDecodingError(_)) => {
            assert!(e.is_decoding());
            assert!(!e.is_transaction());
        },
        other => panic!("expected a decoding error, got {:?}", other),
    }
}

#[test]
fn test_value_lives_under_constant_key() {
    let root = Builder::new().prefix("test_value_lives_under_constant_key").tempdir().expect("tempdir");
    let path = root.path().join("value.bin");

    let v: Value<String> = Value::open(&path).expect("opened");
    assert_eq!(v.load().expect("loaded"), None);
    v.store(&"hello".into()).expect("stored");
    v.close().expect("closed");

    let m: Map<u32, String> = Map::open(&path).expect("reopened as map");
    assert_eq!(m.keys().to_vec().expect("walked"), vec![VALUE_KEY]);
    assert_eq!(m.load(&VALUE_KEY).expect("loaded"), Some("hello".to_string()));
    m.close().expect("closed");

    let v: Value<String> = Value::open(&path).expect("reopened");
    assert_eq!(v.load_or_store("other".into()).expect("loaded"), ("hello".to_string(), true));
    assert_eq!(v.load_and_delete().expect("deleted"), Some("hello".to_string()));
    assert_eq!(v.load().expect("loaded"), None);
}

#[test]
fn test_value_over_custom_map() {
    let driver = SafeMode::open(MEMORY).expect("opened");
    let m: Map<String, u64, SafeMode, StrEncoder<String>, BincodeEncoder<u64>> =
        Map::with_encoders(driver, EncoderPair::default());
    let v = Value::from_map(m, "counter".to_string());

    assert_eq!(v.load_or_store(1).expect("stored"), (1, false));
    v.store(&2).expect("stored");
    assert_eq!(v.load().expect("loaded"), Some(2));
    v.delete().expect("deleted");
    assert_eq!(v.load().expect("loaded"), None);
}

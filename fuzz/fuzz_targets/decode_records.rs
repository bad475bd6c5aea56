#![no_main]

use libfuzzer_sys::fuzz_target;
use bertree::decode::{RecordReader, Value};
use bertree::resolve::Resolver;

fuzz_target!(|data: &[u8]| {
    let resolver = Resolver::schemaless();
    for record in RecordReader::new(data) {
        let value = match record {
            Ok(value) => value,
            Err(_) => break,
        };
        if let Ok(document) = resolver.resolve(&value) {
            let _ = serde_json::to_string(&document).unwrap();
        }
    }

    // A single complete value must also come out of the record reader.
    if let Ok(value) = Value::decode_slice(data) {
        let mut records = RecordReader::new(data);
        assert_eq!(records.next().unwrap().unwrap(), value);
        assert!(records.next().is_none());
    }
});

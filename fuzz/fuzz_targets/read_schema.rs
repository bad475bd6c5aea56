#![no_main]

use libfuzzer_sys::fuzz_target;
use bertree::asn1::parse_module;
use bertree::schema::{SchemaTree, TagPathIndex};

fuzz_target!(|data: &[u8]| {
    let source = match std::str::from_utf8(data) {
        Ok(source) => source,
        Err(_) => return,
    };
    let module = match parse_module(source) {
        Ok(module) => module,
        Err(_) => return,
    };
    for assignment in module.iter() {
        if let Ok(tree) = SchemaTree::compile(&module, &assignment.name) {
            let index = TagPathIndex::build(&tree);
            for (path, id) in index.iter() {
                assert_eq!(index.get(path), Some(id));
                let _ = tree.lineage(id);
            }
            let _ = tree.to_string();
        }
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use chunkstream::{
    BufferPool, ChunkSplitter, MemoryStore, NamingScheme, PoolConfig, SplitterConfig,
};

fuzz_target!(|input: (u8, Vec<u8>, Vec<u8>)| {
    let (threshold, cuts, data) = input;
    let threshold = threshold as usize % 64 + 1;

    let pool = BufferPool::new(PoolConfig::new(1, threshold).unwrap()).unwrap();
    let config = SplitterConfig::new(threshold)
        .unwrap()
        .with_naming(NamingScheme::Sequence);

    // One push per cut length, remainder in a final push
    let store = MemoryStore::new();
    let mut splitter = ChunkSplitter::new(&pool, &store, config.clone()).unwrap();
    let mut rest = &data[..];
    for cut in cuts {
        let n = (cut as usize).min(rest.len());
        splitter.push(&rest[..n]).unwrap();
        rest = &rest[n..];
    }
    splitter.push(rest).unwrap();
    let manifest = splitter.finish().unwrap();

    // Verify: reassembly reproduces input
    assert_eq!(manifest.reassemble(&store).unwrap(), data);

    // Verify: all chunks full except possibly the last
    let records = manifest.records();
    for (i, record) in records.iter().enumerate() {
        assert!(record.len > 0 && record.len <= threshold);
        if i < records.len() - 1 {
            assert_eq!(record.len, threshold);
        }
        assert!(record.id.verify(&store.get(&record.id).unwrap()));
    }

    // Verify: one-shot push yields the same boundaries
    let store2 = MemoryStore::new();
    let mut splitter2 = ChunkSplitter::new(&pool, &store2, config).unwrap();
    splitter2.push(&data).unwrap();
    let manifest2 = splitter2.finish().unwrap();
    assert_eq!(manifest2.records(), manifest.records());

    // Verify: pool is whole again
    assert_eq!(pool.available(), 1);
});

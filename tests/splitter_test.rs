// Integration tests for the ChunkSplitter streaming API
// Tests cover: push/finish semantics, determinism, naming, pool accounting, failure policy

use std::fs;
use std::io;
use std::path::PathBuf;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use chunkstream::{
    BufferPool, ChunkError, ChunkId, ChunkRecord, ChunkSplitter, ChunkStore, DirStore,
    HashAlgorithm, Manifest, MemoryStore, NamingScheme, PoolConfig, SplitterConfig,
};

fn pool(count: usize, capacity: usize) -> BufferPool {
    BufferPool::new(PoolConfig::new(count, capacity).unwrap()).unwrap()
}

fn config(threshold: usize) -> SplitterConfig {
    SplitterConfig::new(threshold)
        .unwrap()
        .with_naming(NamingScheme::Sequence)
}

fn random_bytes(rng: &mut StdRng, len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    rng.fill_bytes(&mut data);
    data
}

/// Pushes `data` in random-sized pieces and returns the chunk contents in flush order.
fn split_randomly(data: &[u8], threshold: usize, rng: &mut StdRng) -> Vec<Vec<u8>> {
    let pool = pool(2, threshold);
    let store = MemoryStore::new();
    let mut splitter = ChunkSplitter::new(&pool, &store, config(threshold)).unwrap();

    let mut rest = data;
    while !rest.is_empty() {
        let n = rng.gen_range(0..=rest.len().min(3 * threshold));
        splitter.push(&rest[..n]).unwrap();
        rest = &rest[n..];
    }

    let manifest = splitter.finish().unwrap();
    manifest
        .records()
        .iter()
        .map(|r| store.get(&r.id).unwrap())
        .collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_exact_threshold_push_emits_one_chunk() {
    let pool = pool(4, 10);
    let store = MemoryStore::new();
    let mut splitter = ChunkSplitter::new(&pool, &store, config(10)).unwrap();

    let flushed = splitter.push(b"abcdefghij").unwrap();
    assert_eq!(flushed.len(), 1, "threshold reached must flush at once");
    assert_eq!(flushed[0].len, 10);
    assert_eq!(store.get(&flushed[0].id).unwrap(), b"abcdefghij");
    assert_eq!(splitter.pending_len(), 0, "fresh buffer must be empty");
    assert_eq!(pool.in_use(), 1, "exactly one buffer checked out");

    let manifest = splitter.finish().unwrap();
    assert_eq!(manifest.len(), 1, "finish must not emit an empty chunk");
}

#[test]
fn test_push_spanning_boundary() {
    let pool = pool(4, 10);
    let store = MemoryStore::new();
    let mut splitter = ChunkSplitter::new(&pool, &store, config(10)).unwrap();

    splitter.push(b"abc").unwrap();
    splitter.push(b"defghijklmno").unwrap();
    let manifest = splitter.finish().unwrap();

    let contents: Vec<_> = manifest
        .records()
        .iter()
        .map(|r| store.get(&r.id).unwrap())
        .collect();
    assert_eq!(contents, vec![b"abcdefghij".to_vec(), b"klmno".to_vec()]);
}

#[test]
fn test_single_buffer_pool_serves_sequential_streams() {
    let pool = pool(1, 10);
    let store = MemoryStore::new();

    for stream in [b"0123456789", b"abcdefghij"] {
        let mut splitter = ChunkSplitter::new(&pool, &store, config(10)).unwrap();
        let flushed = splitter.push(stream).unwrap();
        assert_eq!(flushed.len(), 1);
        let manifest = splitter.finish().unwrap();
        assert_eq!(manifest.reassemble(&store).unwrap(), stream);
        assert_eq!(pool.available(), 1, "buffer must be back after each stream");
    }
    assert_eq!(store.len(), 2);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_boundaries_independent_of_push_sizes() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for threshold in [1, 7, 64, 1000] {
        let len = rng.gen_range(0..10 * threshold + 5);
        let data = random_bytes(&mut rng, len);

        let reference = split_randomly(&data, threshold, &mut rng);
        for _ in 0..5 {
            assert_eq!(
                split_randomly(&data, threshold, &mut rng),
                reference,
                "threshold {threshold}: boundaries moved with push sizes"
            );
        }

        assert_eq!(reference.concat(), data, "concatenation must reproduce input");
    }
}

#[test]
fn test_chunk_sizes() {
    let mut rng = StdRng::seed_from_u64(42);
    let data = random_bytes(&mut rng, 1234);
    let chunks = split_randomly(&data, 100, &mut rng);

    assert_eq!(chunks.len(), 13);
    let (last, full) = chunks.split_last().unwrap();
    assert!(full.iter().all(|c| c.len() == 100), "all but the last are full");
    assert_eq!(last.len(), 34);
}

#[test]
fn test_exact_multiple_has_no_short_tail() {
    let mut rng = StdRng::seed_from_u64(7);
    let data = random_bytes(&mut rng, 300);
    let chunks = split_randomly(&data, 100, &mut rng);
    assert_eq!(chunks.len(), 3);
    assert!(chunks.iter().all(|c| c.len() == 100));
}

#[test]
fn test_offsets_are_contiguous() {
    let pool = pool(2, 16);
    let store = MemoryStore::new();
    let mut splitter = ChunkSplitter::new(&pool, &store, config(16)).unwrap();
    splitter.push(&[0xAB; 100]).unwrap();
    let manifest = splitter.finish().unwrap();

    let mut expected_offset = 0u64;
    for record in &manifest {
        assert_eq!(record.offset, expected_offset);
        expected_offset = record.end();
    }
    assert_eq!(expected_offset, 100);
}

// ============================================================================
// Content Addressing
// ============================================================================

#[test]
fn test_persisted_chunks_match_their_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirStore::open(dir.path()).unwrap();
    let pool = pool(2, 64);
    let mut rng = StdRng::seed_from_u64(1);
    let data = random_bytes(&mut rng, 1000);

    let mut splitter = ChunkSplitter::new(&pool, &store, SplitterConfig::new(64).unwrap()).unwrap();
    splitter.push(&data).unwrap();
    let manifest = splitter.finish().unwrap();

    let mut files = 0;
    for entry in fs::read_dir(dir.path()).unwrap() {
        let name = entry.unwrap().file_name().into_string().unwrap();
        let id = ChunkId::parse(&name).expect("every file is a chunk");
        let bytes = fs::read(dir.path().join(&name)).unwrap();

        assert!(id.verify(&bytes), "digest mismatch for {name}");
        assert_eq!(id.digest().algorithm(), HashAlgorithm::Sha512);
        assert_eq!(id.extension(), "txt");
        files += 1;
    }

    // 1000 random bytes: no two chunks share a digest
    assert_eq!(files, manifest.len());
    assert_eq!(manifest.reassemble(&store).unwrap(), data);
}

#[test]
fn test_identical_content_same_digest() {
    let pool = pool(2, 4);
    let store = MemoryStore::new();
    let mut splitter = ChunkSplitter::new(&pool, &store, config(4)).unwrap();
    let flushed = splitter.push(b"abcdabcd").unwrap();

    assert_eq!(flushed[0].id.digest(), flushed[1].id.digest());
    assert_ne!(flushed[0].id, flushed[1].id, "sequence stamps keep names apart");
}

#[test]
#[cfg(feature = "hash-blake3")]
fn test_blake3_naming() {
    let pool = pool(1, 8);
    let store = MemoryStore::new();
    let config = config(8).with_hash(HashAlgorithm::Blake3).with_extension("");
    let mut splitter = ChunkSplitter::new(&pool, &store, config).unwrap();

    let flushed = splitter.push(b"12345678").unwrap();
    let name = flushed[0].id.file_name();
    assert_eq!(name, format!("{}_0", blake3::hash(b"12345678").to_hex()));
}

#[test]
fn test_manifest_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirStore::open(dir.path()).unwrap();
    let pool = pool(1, 5);

    let mut splitter = ChunkSplitter::new(&pool, &store, config(5)).unwrap();
    splitter.push(b"hello world, again").unwrap();
    let manifest = splitter.finish().unwrap();

    store.write_manifest("doc.manifest", &manifest).unwrap();
    let ids = store.read_manifest("doc.manifest").unwrap();
    let expected: Vec<_> = manifest.records().iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, expected);

    let rebuilt: Vec<u8> = ids.iter().flat_map(|id| store.get(id).unwrap()).collect();
    assert_eq!(rebuilt, b"hello world, again");
}

// ============================================================================
// Pool Accounting
// ============================================================================

#[test]
fn test_pool_count_invariant_across_streams() {
    let pool = pool(3, 8);
    let store = MemoryStore::new();

    let mut a = ChunkSplitter::new(&pool, &store, config(8)).unwrap();
    let mut b = ChunkSplitter::new(&pool, &store, config(8)).unwrap();
    assert_eq!(pool.in_use() + pool.available(), 3);

    a.push(&[1; 20]).unwrap();
    b.push(&[2; 3]).unwrap();
    assert_eq!(pool.in_use(), 2);
    assert_eq!(pool.in_use() + pool.available(), 3);

    a.finish().unwrap();
    drop(b);
    assert_eq!(pool.available(), 3);
}

#[test]
fn test_exhaustion_is_fatal_and_deterministic() {
    let pool = pool(1, 8);
    let store = MemoryStore::new();
    let _holder = ChunkSplitter::new(&pool, &store, config(8)).unwrap();

    for _ in 0..3 {
        match ChunkSplitter::new(&pool, &store, config(8)) {
            Err(err @ ChunkError::PoolExhausted { buffers: 1 }) => assert!(err.is_fatal()),
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }
}

#[test]
fn test_zero_length_push_changes_nothing() {
    let pool = pool(1, 8);
    let store = MemoryStore::new();
    let mut splitter = ChunkSplitter::new(&pool, &store, config(8)).unwrap();

    splitter.push(b"abc").unwrap();
    assert!(splitter.push(&[]).unwrap().is_empty());
    assert_eq!(splitter.pending_len(), 3);
    assert_eq!(splitter.bytes_pushed(), 3);
    assert!(store.is_empty());
}

// ============================================================================
// Failure Policy
// ============================================================================

/// Fails every other write.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    calls: Mutex<usize>,
}

impl ChunkStore for FlakyStore {
    fn put(&self, id: &ChunkId, data: &[u8]) -> io::Result<()> {
        let mut calls = self.calls.lock();
        *calls += 1;
        if *calls % 2 == 0 {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        self.inner.put(id, data)
    }

    fn get(&self, id: &ChunkId) -> io::Result<Vec<u8>> {
        self.inner.get(id)
    }

    fn locate(&self, id: &ChunkId) -> PathBuf {
        PathBuf::from("/flaky").join(id.file_name())
    }
}

#[test]
fn test_persist_failure_does_not_stop_the_stream() {
    let pool = pool(1, 4);
    let store = FlakyStore::default();
    let mut splitter = ChunkSplitter::new(&pool, &store, config(4)).unwrap();

    let flushed = splitter.push(b"aaaabbbbccccdd").unwrap();
    assert_eq!(flushed.len(), 3);
    let manifest: Manifest = splitter.finish().unwrap();

    let persisted: Vec<bool> = manifest.records().iter().map(|r| r.persisted).collect();
    assert_eq!(persisted, vec![true, false, true, false]);
    assert_eq!(manifest.failed_writes(), 2);
    assert_eq!(pool.available(), 1, "failed writes must not leak buffers");

    // Lost chunks make the stream unrecoverable
    assert!(manifest.reassemble(&store).is_err());
    let kept: Vec<&ChunkRecord> = manifest.records().iter().filter(|r| r.persisted).collect();
    assert_eq!(store.get(&kept[1].id).unwrap(), b"cccc");
}

#[test]
fn test_drop_without_finish_flushes() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirStore::open(dir.path()).unwrap();
    let pool = pool(1, 32);

    {
        let mut splitter = ChunkSplitter::new(&pool, &store, config(32)).unwrap();
        splitter.push(b"partial tail").unwrap();
    }

    let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
    assert_eq!(pool.available(), 1);
}

//! Lock-sharded map for many writers touching scattered integer keys.

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;

/// Keys that map cleanly onto an unsigned integer for bucket routing.
pub trait IntegerKey: Copy + Ord {
    fn to_u64(self) -> u64;
}

macro_rules! impl_integer_key {
    ($($t:ty),*) => {
        $(impl IntegerKey for $t {
            #[inline]
            fn to_u64(self) -> u64 { self as u64 }
        })*
    };
}

impl_integer_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Exclusive handle to one value slot; the bucket stays locked until it drops.
pub type Access<'a, V> = MappedMutexGuard<'a, V>;

pub struct ConcurrentMap<K, V> {
    buckets: Vec<Mutex<BTreeMap<K, V>>>,
}

impl<K: IntegerKey, V: Default> ConcurrentMap<K, V> {
    /// # Panics
    /// If `bucket_count` is zero.
    pub fn new(bucket_count: usize) -> Self {
        assert!(bucket_count > 0, "ConcurrentMap needs at least one bucket");
        Self { buckets: (0..bucket_count).map(|_| Mutex::new(BTreeMap::new())).collect() }
    }

    fn bucket(&self, key: K) -> &Mutex<BTreeMap<K, V>> {
        &self.buckets[(key.to_u64() % self.buckets.len() as u64) as usize]
    }

    /// Lock the key's bucket and return its value slot, default-inserting it.
    pub fn access(&self, key: K) -> Access<'_, V> {
        MutexGuard::map(self.bucket(key).lock(), |map| map.entry(key).or_default())
    }

    /// Remove `key`; returns whether it was present.
    pub fn erase(&self, key: K) -> bool { self.bucket(key).lock().remove(&key).is_some() }

    /// Drain every bucket, one lock at a time, into a single ordered map.
    ///
    /// Not an atomic snapshot: writers racing with the drain may or may not be
    /// reflected. Call it once producers are done.
    pub fn build_ordinary_map(&self) -> BTreeMap<K, V> {
        let mut result = BTreeMap::new();
        for bucket in &self.buckets {
            let mut drained = std::mem::take(&mut *bucket.lock());
            result.append(&mut drained);
        }
        result
    }
}

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::mem;

/// Exponent of the default bucket-array size (2^4 = 16 buckets).
pub const DEFAULT_BIT_SIZE: u8 = 4;

/// Largest accepted bucket-array exponent. Larger requests are clamped so
/// the bucket count `1 << bit_size` cannot overflow `usize`.
const MAX_BIT_SIZE: u8 = (usize::BITS - 1) as u8;

/// Sentinel slot index terminating bucket chains and the free list.
const NIL: usize = usize::MAX;

/// Status reported by mutating set operations.
///
/// Duplicate insertions and absent removals are ordinary, recoverable
/// outcomes; they are reported as `Err` values and never panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The value passed to a `put` already exists; nothing was mutated.
    AlreadyExists,
    /// The value passed to a `remove` is not present; nothing was mutated.
    NotFound,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::AlreadyExists => f.write_str("value already exists"),
            Error::NotFound => f.write_str("value not found"),
        }
    }
}

impl core::error::Error for Error {}

/// One arena slot: either a live entry linked into a bucket chain, or a
/// vacant slot linked into the free list for reuse.
#[derive(Clone)]
enum Slot<V> {
    Occupied { hash: u64, next: usize, value: V },
    Vacant { next_free: usize },
}

/// Result of a chain walk: the target bucket, the matching slot (or `NIL`
/// on a miss), and its predecessor in the chain (the chain tail on a miss).
struct Location {
    bucket: usize,
    index: usize,
    prev: usize,
}

/// A hash table using separate chaining over a fixed power-of-two bucket
/// array.
///
/// `HashTable<V>` stores values of type `V` and provides insertion, lookup,
/// and removal in O(1) expected time. Unlike standard hash maps, this
/// implementation requires you to provide the hash value and an equality
/// predicate for each operation, so it never constrains your key type or
/// hasher choice.
///
/// Entries live in a contiguous arena; each bucket holds the index of the
/// first entry of its chain and entries link to the next by index. The full
/// 64-bit hash is stored per entry, so re-bucketing via [`rehash`] never
/// re-invokes a hasher, and chain walks compare hashes before calling the
/// equality predicate.
///
/// The bucket count is `2^bit_size`, fixed at construction. There is no
/// load-factor-triggered resize; callers that need a bigger table call
/// [`rehash`] explicitly. Chains are tail-inserted, so iteration order is
/// deterministic for a fixed bucket count and insertion sequence.
///
/// [`rehash`]: HashTable::rehash
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use chain_hash::hash_table::Entry;
/// # use chain_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::with_bit_size(6);
/// let hash = hash_id(123);
///
/// match table.entry(hash, |p: &Person| p.id == 123) {
///     Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
///
/// assert!(table.find(hash, |p| p.id == 123).is_some());
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    /// Head slot index per bucket, `NIL` when the bucket is empty.
    buckets: Vec<usize>,
    /// Entry arena; vacant slots are threaded through `free_head`.
    slots: Vec<Slot<V>>,
    free_head: usize,
    /// `buckets.len() - 1`; bucket count is always a power of two.
    mask: usize,
    len: usize,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field("len", &self.len)
            .field("buckets", &self.buckets.len())
            .field("chain_lengths", &self.chain_lengths())
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates a table with the default bucket count
    /// (2^[`DEFAULT_BIT_SIZE`] = 16 buckets).
    pub fn new() -> Self {
        Self::with_bit_size(DEFAULT_BIT_SIZE)
    }

    /// Creates a table with `2^bit_size` buckets.
    ///
    /// `bit_size` is clamped so the bucket count cannot overflow; a
    /// `bit_size` of 0 is valid and yields a single bucket (every entry
    /// chains there).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    ///
    /// let table: HashTable<u64> = HashTable::with_bit_size(4);
    /// assert_eq!(table.bucket_count(), 16);
    /// assert_eq!(table.bit_size(), 4);
    /// ```
    pub fn with_bit_size(bit_size: u8) -> Self {
        let bucket_count = 1usize << bit_size.min(MAX_BIT_SIZE);
        Self {
            buckets: vec![NIL; bucket_count],
            slots: Vec::new(),
            free_head: NIL,
            mask: bucket_count - 1,
            len: 0,
        }
    }

    /// Returns the number of live entries in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table contains no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets (always a power of two).
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the exponent of the bucket count, i.e.
    /// `bucket_count() == 1 << bit_size()`.
    pub fn bit_size(&self) -> u8 {
        self.buckets.len().trailing_zeros() as u8
    }

    /// Removes all entries, keeping the bucket array and the arena
    /// allocation for reuse.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    /// use chain_hash::hash_table::Entry;
    ///
    /// let mut table: HashTable<u64> = HashTable::with_bit_size(4);
    /// if let Entry::Vacant(e) = table.entry(7, |v| *v == 7) {
    ///     e.insert(7);
    /// }
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.bucket_count(), 16);
    /// ```
    pub fn clear(&mut self) {
        self.buckets.fill(NIL);
        self.slots.clear();
        self.free_head = NIL;
        self.len = 0;
    }

    /// Re-buckets every entry into a bucket array of `2^bit_size` buckets.
    ///
    /// This is the only operation that changes the bucket count. Entries do
    /// not move within the arena; only the chain links change, using the
    /// hash recorded at insertion. Entries that land in the same new bucket
    /// keep their relative iteration order. A no-op if the bucket count is
    /// already `2^bit_size`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    /// use chain_hash::hash_table::Entry;
    ///
    /// let mut table: HashTable<u64> = HashTable::with_bit_size(2);
    /// for k in 0..32u64 {
    ///     if let Entry::Vacant(e) = table.entry(k, |v| *v == k) {
    ///         e.insert(k);
    ///     }
    /// }
    ///
    /// table.rehash(6);
    /// assert_eq!(table.bucket_count(), 64);
    /// assert_eq!(table.len(), 32);
    /// assert_eq!(table.find(19, |v| *v == 19), Some(&19));
    /// ```
    pub fn rehash(&mut self, bit_size: u8) {
        let bucket_count = 1usize << bit_size.min(MAX_BIT_SIZE);
        if bucket_count == self.buckets.len() {
            return;
        }

        // Snapshot the current iteration order before breaking any links.
        let mut order = Vec::with_capacity(self.len);
        for &head in &self.buckets {
            let mut index = head;
            while index != NIL {
                order.push(index);
                index = self.slot_next(index);
            }
        }

        self.buckets.clear();
        self.buckets.resize(bucket_count, NIL);
        self.mask = bucket_count - 1;

        let mut tails = vec![NIL; bucket_count];
        for index in order {
            let bucket = self.bucket_of(self.slot_hash(index));
            self.set_next(index, NIL);
            if tails[bucket] == NIL {
                self.buckets[bucket] = index;
            } else {
                self.set_next(tails[bucket], index);
            }
            tails[bucket] = index;
        }
    }

    /// Returns a reference to the value matching `hash` and `eq`, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    /// use chain_hash::hash_table::Entry;
    ///
    /// let mut table: HashTable<u64> = HashTable::new();
    /// if let Entry::Vacant(e) = table.entry(42, |v| *v == 42) {
    ///     e.insert(42);
    /// }
    ///
    /// assert_eq!(table.find(42, |v| *v == 42), Some(&42));
    /// assert_eq!(table.find(7, |v| *v == 7), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let loc = self.locate(hash, eq);
        if loc.index == NIL {
            None
        } else {
            Some(self.slot_value(loc.index))
        }
    }

    /// Returns a mutable reference to the value matching `hash` and `eq`,
    /// if any.
    ///
    /// The parts of the value that decide equality and hashing must not be
    /// changed through the returned reference, or the entry becomes
    /// unreachable.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let loc = self.locate(hash, eq);
        if loc.index == NIL {
            None
        } else {
            Some(self.slot_value_mut(loc.index))
        }
    }

    /// Removes and returns the value matching `hash` and `eq`, if any.
    ///
    /// The entry is unlinked from its chain and its slot is recycled; the
    /// bucket count never shrinks.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    /// use chain_hash::hash_table::Entry;
    ///
    /// let mut table: HashTable<u64> = HashTable::new();
    /// if let Entry::Vacant(e) = table.entry(42, |v| *v == 42) {
    ///     e.insert(42);
    /// }
    ///
    /// assert_eq!(table.remove(42, |v| *v == 42), Some(42));
    /// assert_eq!(table.remove(42, |v| *v == 42), None);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let loc = self.locate(hash, eq);
        if loc.index == NIL {
            return None;
        }
        Some(self.unlink(loc))
    }

    /// Looks up the entry matching `hash` and `eq` for in-place
    /// inspection, insertion, or removal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    /// use chain_hash::hash_table::Entry;
    ///
    /// let mut table: HashTable<(u64, &str)> = HashTable::new();
    ///
    /// table.entry(1, |(k, _)| *k == 1).or_insert((1, "one"));
    /// match table.entry(1, |(k, _)| *k == 1) {
    ///     Entry::Occupied(mut e) => e.get_mut().1 = "uno",
    ///     Entry::Vacant(_) => unreachable!(),
    /// }
    ///
    /// assert_eq!(table.find(1, |(k, _)| *k == 1), Some(&(1, "uno")));
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        let loc = self.locate(hash, eq);
        if loc.index == NIL {
            Entry::Vacant(VacantEntry {
                hash,
                bucket: loc.bucket,
                tail: loc.prev,
                table: self,
            })
        } else {
            Entry::Occupied(OccupiedEntry {
                bucket: loc.bucket,
                index: loc.index,
                prev: loc.prev,
                table: self,
            })
        }
    }

    /// Returns an iterator over the values in the table.
    ///
    /// Buckets are visited left to right and each chain front to back, so
    /// the order is deterministic for a fixed bucket count and insertion
    /// sequence. The iterator borrows the table, which rules out mutation
    /// while it is live.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            table: self,
            bucket: 0,
            index: NIL,
        }
    }

    /// Returns an iterator that removes and yields every value.
    ///
    /// If the iterator is dropped before exhaustion, the remaining entries
    /// are still removed.
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            table: self,
            bucket: 0,
        }
    }

    fn bucket_of(&self, hash: u64) -> usize {
        hash as usize & self.mask
    }

    /// Walks the chain of the bucket `hash` maps to, comparing stored
    /// hashes before invoking `eq`.
    fn locate(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Location {
        let bucket = self.bucket_of(hash);
        let mut prev = NIL;
        let mut index = self.buckets[bucket];
        while index != NIL {
            let (next, hit) = match &self.slots[index] {
                Slot::Occupied { hash: h, next, value } => (*next, *h == hash && eq(value)),
                Slot::Vacant { .. } => unreachable!("vacant slot linked into a bucket chain"),
            };
            if hit {
                return Location { bucket, index, prev };
            }
            prev = index;
            index = next;
        }
        Location {
            bucket,
            index: NIL,
            prev,
        }
    }

    /// Takes a slot from the free list, or grows the arena.
    fn allocate(&mut self, slot: Slot<V>) -> usize {
        if self.free_head == NIL {
            self.slots.push(slot);
            return self.slots.len() - 1;
        }
        let index = self.free_head;
        self.free_head = match &self.slots[index] {
            Slot::Vacant { next_free } => *next_free,
            Slot::Occupied { .. } => unreachable!("occupied slot on the free list"),
        };
        self.slots[index] = slot;
        index
    }

    /// Vacates an occupied slot, pushing it onto the free list. The caller
    /// must fix up the predecessor link.
    fn detach(&mut self, index: usize) -> (usize, V) {
        let slot = mem::replace(
            &mut self.slots[index],
            Slot::Vacant {
                next_free: self.free_head,
            },
        );
        self.free_head = index;
        self.len -= 1;
        match slot {
            Slot::Occupied { next, value, .. } => (next, value),
            Slot::Vacant { .. } => unreachable!("detached a vacant slot"),
        }
    }

    fn unlink(&mut self, loc: Location) -> V {
        let (next, value) = self.detach(loc.index);
        if loc.prev == NIL {
            self.buckets[loc.bucket] = next;
        } else {
            self.set_next(loc.prev, next);
        }
        value
    }

    fn slot_value(&self, index: usize) -> &V {
        match &self.slots[index] {
            Slot::Occupied { value, .. } => value,
            Slot::Vacant { .. } => unreachable!("vacant slot in a live chain"),
        }
    }

    fn slot_value_mut(&mut self, index: usize) -> &mut V {
        match &mut self.slots[index] {
            Slot::Occupied { value, .. } => value,
            Slot::Vacant { .. } => unreachable!("vacant slot in a live chain"),
        }
    }

    fn slot_hash(&self, index: usize) -> u64 {
        match &self.slots[index] {
            Slot::Occupied { hash, .. } => *hash,
            Slot::Vacant { .. } => unreachable!("vacant slot in a live chain"),
        }
    }

    fn slot_next(&self, index: usize) -> usize {
        match &self.slots[index] {
            Slot::Occupied { next, .. } => *next,
            Slot::Vacant { .. } => unreachable!("vacant slot in a live chain"),
        }
    }

    fn set_next(&mut self, index: usize, next: usize) {
        match &mut self.slots[index] {
            Slot::Occupied { next: n, .. } => *n = next,
            Slot::Vacant { .. } => unreachable!("vacant slot in a live chain"),
        }
    }

    fn chain_lengths(&self) -> Vec<usize> {
        self.buckets
            .iter()
            .map(|&head| {
                let mut count = 0;
                let mut index = head;
                while index != NIL {
                    count += 1;
                    index = self.slot_next(index);
                }
                count
            })
            .collect()
    }
}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = V;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            table: self,
            bucket: 0,
            index: NIL,
        }
    }
}

/// A view into a single entry of a [`HashTable`], which may be vacant or
/// occupied.
///
/// This enum is constructed by the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, V>),
    /// A vacant entry.
    Vacant(VacantEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant, then returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the value produced by `default` if the entry is vacant,
    /// then returns a mutable reference to the value.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to the value if the entry is occupied and returns a
    /// mutable reference to it, or `None` if the entry is vacant.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Option<&'a mut V> {
        match self {
            Entry::Occupied(entry) => {
                let value = entry.into_mut();
                f(&mut *value);
                Some(value)
            }
            Entry::Vacant(_) => None,
        }
    }

    /// Inserts `V::default()` if the entry is vacant, then returns a
    /// mutable reference to the value.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }
}

/// A vacant entry: the chain walk found no match, and recorded the chain
/// tail so an insertion appends in O(1).
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
    bucket: usize,
    tail: usize,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Inserts `value` at the tail of the bucket chain and returns a
    /// mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        let index = self.table.allocate(Slot::Occupied {
            hash: self.hash,
            next: NIL,
            value,
        });
        if self.tail == NIL {
            self.table.buckets[self.bucket] = index;
        } else {
            self.table.set_next(self.tail, index);
        }
        self.table.len += 1;
        self.table.slot_value_mut(index)
    }
}

/// An occupied entry, holding the matched slot and its predecessor so
/// removal can unlink in O(1).
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    bucket: usize,
    index: usize,
    prev: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Returns a reference to the value.
    pub fn get(&self) -> &V {
        self.table.slot_value(self.index)
    }

    /// Returns a mutable reference to the value.
    ///
    /// The parts of the value that decide equality and hashing must not be
    /// changed, or the entry becomes unreachable.
    pub fn get_mut(&mut self) -> &mut V {
        self.table.slot_value_mut(self.index)
    }

    /// Converts the entry into a mutable reference with the table's
    /// borrow lifetime.
    pub fn into_mut(self) -> &'a mut V {
        self.table.slot_value_mut(self.index)
    }

    /// Removes the entry, unlinking it from its chain, and returns the
    /// value.
    pub fn remove(self) -> V {
        let loc = Location {
            bucket: self.bucket,
            index: self.index,
            prev: self.prev,
        };
        self.table.unlink(loc)
    }
}

/// An iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, V> {
    table: &'a HashTable<V>,
    bucket: usize,
    index: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let table = self.table;
        loop {
            if self.index != NIL {
                match &table.slots[self.index] {
                    Slot::Occupied { next, value, .. } => {
                        self.index = *next;
                        return Some(value);
                    }
                    Slot::Vacant { .. } => unreachable!("vacant slot in a live chain"),
                }
            }
            if self.bucket >= table.buckets.len() {
                return None;
            }
            self.index = table.buckets[self.bucket];
            self.bucket += 1;
        }
    }
}

/// A draining iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`]. It
/// yields owned `V` values and empties the table as it iterates; dropping
/// it early removes the remaining entries.
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, V> {
    table: &'a mut HashTable<V>,
    bucket: usize,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        while self.bucket < self.table.buckets.len() {
            let head = self.table.buckets[self.bucket];
            if head == NIL {
                self.bucket += 1;
                continue;
            }
            let (next, value) = self.table.detach(head);
            self.table.buckets[self.bucket] = next;
            return Some(value);
        }
        None
    }
}

impl<V> Drop for Drain<'_, V> {
    fn drop(&mut self) {
        for _ in &mut *self {}
    }
}

/// A consuming iterator over the values of a [`HashTable`].
pub struct IntoIter<V> {
    table: HashTable<V>,
    bucket: usize,
    index: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.index != NIL {
                let slot = mem::replace(
                    &mut self.table.slots[self.index],
                    Slot::Vacant { next_free: NIL },
                );
                match slot {
                    Slot::Occupied { next, value, .. } => {
                        self.index = next;
                        self.table.len -= 1;
                        return Some(value);
                    }
                    Slot::Vacant { .. } => unreachable!("vacant slot in a live chain"),
                }
            }
            if self.bucket >= self.table.buckets.len() {
                return None;
            }
            self.index = self.table.buckets[self.bucket];
            self.table.buckets[self.bucket] = NIL;
            self.bucket += 1;
        }
    }
}

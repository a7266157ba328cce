//! LatestVector<T> - per-source latest-value view
//!
//! The value type carried by a [`combine`](crate::combine) cell: one slot per
//! upstream source, each holding that source's most recent publish or `None`
//! if the source has not reported yet. Slots are overwritten wholesale on
//! every upstream publish; there is no merge beyond latest-value-wins.

/// A fixed-size indexed collection of per-source latest values.
///
/// Created with every slot empty (or pre-seeded from creation-time
/// snapshots) and updated one slot at a time as the corresponding source
/// publishes. Downstream subscribers of a combined cell see the whole
/// vector after every single-slot update, intermediate states included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LatestVector<T> {
    slots: Vec<Option<T>>,
}

impl<T> LatestVector<T> {
    /// Create a vector with `len` empty slots.
    pub fn new(len: usize) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || None);
        Self { slots }
    }

    /// Number of slots (one per upstream source).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True for the zero-source vector.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Overwrite one slot with a source's latest value.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range; slot indices are fixed at creation.
    pub fn set(&mut self, slot: usize, value: T) {
        self.slots[slot] = Some(value);
    }

    /// The latest value reported for `slot`, if any.
    pub fn get(&self, slot: usize) -> Option<&T> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// True once every source has reported at least once.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Iterate over the slots in source order.
    pub fn slots(&self) -> impl Iterator<Item = Option<&T>> {
        self.slots.iter().map(Option::as_ref)
    }
}

impl<T: PartialEq> LatestVector<T> {
    /// The common value, if every source agrees.
    ///
    /// Agreement requires literal equality of the values across all slots;
    /// a value in one slot and nothing yet in another never counts. The
    /// empty vector has no common value.
    pub fn unanimous(&self) -> Option<&T> {
        let mut slots = self.slots.iter();
        let first = slots.next()?.as_ref()?;
        for slot in slots {
            if slot.as_ref() != Some(first) {
                return None;
            }
        }
        Some(first)
    }
}

#![forbid(unsafe_code)]

use log::debug;
use parking_lot::Mutex;

use crate::utils::errors::Errors;
use crate::utils::fruit_types::{seed_fruits, Fruit};

// ---------------------------------------------------------------------------
// FruitStore:
// ---------------------------------------------------------------------------
/** The ordered, in-memory collection of fruit records.  A record's identifier
 * is its current position, so removing a record shifts every later record
 * down by one.  All reads and writes go through the mutex, making each
 * operation atomic with respect to concurrent requests.  Nothing outlives
 * the process.
 */
#[derive(Debug, Default)]
pub struct FruitStore {
    fruits: Mutex<Vec<Fruit>>,
}

impl FruitStore {
    pub fn new(fruits: Vec<Fruit>) -> Self {
        FruitStore { fruits: Mutex::new(fruits) }
    }

    /// A store holding the startup records.
    pub fn seeded() -> Self {
        Self::new(seed_fruits())
    }

    /// Snapshot of all records in order.
    pub fn list(&self) -> Vec<Fruit> {
        self.fruits.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.fruits.lock().len()
    }

    /// Add a record to the end and return its index.
    pub fn append(&self, fruit: Fruit) -> usize {
        let mut fruits = self.fruits.lock();
        fruits.push(fruit);
        let index = fruits.len() - 1;
        debug!("Appended fruit at index {}: {:?}", index, fruits[index]);
        index
    }

    /// The record at index, or None when the index is out of range.
    pub fn get(&self, index: usize) -> Option<Fruit> {
        self.fruits.lock().get(index).cloned()
    }

    /** Overwrite the record at index.  Indices outside the current contiguous
     * range are rejected rather than padding the collection.
     */
    pub fn replace(&self, index: usize, fruit: Fruit) -> Result<(), Errors> {
        let mut fruits = self.fruits.lock();
        match fruits.get_mut(index) {
            Some(slot) => {
                *slot = fruit;
                Ok(())
            },
            None => Err(Errors::FruitNotFound(index.to_string())),
        }
    }

    /// Remove the record at index.  Out of range indices leave the store untouched.
    pub fn remove_at(&self, index: usize) -> Option<Fruit> {
        let mut fruits = self.fruits.lock();
        if index < fruits.len() {
            Some(fruits.remove(index))
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// parse_index:
// ---------------------------------------------------------------------------
/** Convert the raw identifier text from a url path into a position.  Only
 * canonical decimal text has a position, so signs, leading zeros and
 * whitespace all resolve to no record.
 */
pub fn parse_index(raw: &str) -> Option<usize> {
    raw.parse::<usize>().ok().filter(|i| i.to_string() == raw)
}

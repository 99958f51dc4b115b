use std::fmt;

/// Handle into a [`List`].
///
/// Erasing a slot bumps its generation, so a key to an erased element goes
/// stale instead of resolving to whatever is inserted into the slot next.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    index: u32,
    generation: u32,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Clone, Debug)]
struct Entry<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot storage with vacant slot reuse.
#[derive(Clone, Debug)]
pub struct List<T> {
    data: Vec<Entry<T>>,
    elements: usize,
    vacant: Vec<u32>,
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> List<T> {
    pub fn new() -> Self {
        Self::with_capacity(128)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            elements: 0,
            vacant: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements == 0
    }

    pub fn contains(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: Key) -> Option<&T> {
        self.data
            .get(key.index as usize)
            .filter(|entry| entry.generation == key.generation)
            .and_then(|entry| entry.value.as_ref())
    }

    pub fn get_mut(&mut self, key: Key) -> Option<&mut T> {
        self.data
            .get_mut(key.index as usize)
            .filter(|entry| entry.generation == key.generation)
            .and_then(|entry| entry.value.as_mut())
    }

    pub fn insert(&mut self, element: T) -> Key {
        self.elements += 1;
        if let Some(index) = self.vacant.pop() {
            let entry = &mut self.data[index as usize];
            debug_assert!(entry.value.is_none());
            entry.value = Some(element);
            return Key {
                index,
                generation: entry.generation,
            };
        }
        let index = self.data.len() as u32;
        self.data.push(Entry {
            generation: 0,
            value: Some(element),
        });
        Key {
            index,
            generation: 0,
        }
    }

    /// Takes the element out and retires the key. Stale keys return `None`.
    pub fn erase(&mut self, key: Key) -> Option<T> {
        let entry = self
            .data
            .get_mut(key.index as usize)
            .filter(|entry| entry.generation == key.generation)?;
        let element = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.vacant.push(key.index);
        self.elements -= 1;
        Some(element)
    }

    pub fn clear(&mut self) {
        // Bump every generation so keys handed out before the clear stay dead.
        self.vacant.clear();
        for (index, entry) in self.data.iter_mut().enumerate().rev() {
            if entry.value.take().is_some() {
                entry.generation = entry.generation.wrapping_add(1);
            }
            self.vacant.push(index as u32);
        }
        self.elements = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, &T)> + '_ {
        self.data.iter().enumerate().filter_map(|(index, entry)| {
            entry.value.as_ref().map(|value| {
                (
                    Key {
                        index: index as u32,
                        generation: entry.generation,
                    },
                    value,
                )
            })
        })
    }
}

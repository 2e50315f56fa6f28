use log::trace;

use crate::bindings::TextureIndex;

/// Which slot of a [`PingPong`] plays which role during one tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickRoles {
    pub tick: u64,
    pub read: usize,
    pub write: usize,
}

impl TickRoles {
    /// Roles while slot `read` is the input. Bind groups are built ahead of
    /// time for both parities, so `tick` is left at zero.
    pub fn reading(read: usize) -> Self {
        let read = read % 2;
        TickRoles {
            tick: 0,
            read,
            write: 1 - read,
        }
    }

    /// Slot bound to a trail texture, `None` for the non-trail textures.
    pub fn slot_for(&self, texture: TextureIndex) -> Option<usize> {
        match texture {
            TextureIndex::CurrentTrailField => Some(self.write),
            TextureIndex::PreviousTrailField => Some(self.read),
            TextureIndex::Drawable | TextureIndex::Agents => None,
        }
    }
}

/// Two trail fields used in strict alternation.
///
/// Each tick reads `previous` and writes `current`; [`PingPong::finish_tick`]
/// swaps them so this tick's output is next tick's input. Readers outside the
/// tick (the render side) only ever see [`PingPong::latest`].
#[derive(Debug)]
pub struct PingPong<T> {
    slots: [T; 2],
    read: usize,
    tick: u64,
}

impl<T> PingPong<T> {
    pub fn new(first: T, second: T) -> Self {
        PingPong {
            slots: [first, second],
            read: 0,
            tick: 0,
        }
    }

    pub fn from_fn(mut f: impl FnMut(usize) -> T) -> Self {
        Self::new(f(0), f(1))
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn roles(&self) -> TickRoles {
        TickRoles {
            tick: self.tick,
            ..TickRoles::reading(self.read)
        }
    }

    /// Input of the running tick.
    pub fn previous(&self) -> &T {
        &self.slots[self.read]
    }

    /// Output of the running tick.
    pub fn current(&self) -> &T {
        &self.slots[1 - self.read]
    }

    /// The most recently finished field. Between ticks this is the same slot
    /// the next tick will read.
    pub fn latest(&self) -> &T {
        self.previous()
    }

    /// Borrows the read side shared and the write side exclusively.
    pub fn split(&mut self) -> (&T, &mut T) {
        let read = self.read;
        let [a, b] = &mut self.slots;
        if read == 0 {
            (&*a, b)
        } else {
            (&*b, a)
        }
    }

    pub fn finish_tick(&mut self) {
        self.read = 1 - self.read;
        self.tick += 1;
        trace!("trail tick {} finished, slot {} is now latest", self.tick, self.read);
    }

    pub fn get(&self, slot: usize) -> &T {
        &self.slots[slot]
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }
}

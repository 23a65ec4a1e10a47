use crate::lang::{self, EvalError, Machine, Word};
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("no free watchpoint, all {0} are in use")]
    Exhausted(usize),
    #[error("watchpoint {0} not found")]
    NotFound(usize),
}

/// Execution driver a watchpoint check reports to.
pub trait Execution {
    /// Runs `count` instructions, or until stopped when `count` is negative.
    fn step_execution(&mut self, count: i64);
    fn signal_stop(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    Unchanged,
    Changed { id: usize, old: Word, new: Word },
}

#[derive(Debug)]
pub struct Watchpoint {
    id: usize,
    expr: String,
    last_value: Word,
    next: Option<usize>,
}

impl Watchpoint {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn set_expr<S: Into<String>>(&mut self, expr: S) {
        self.expr = expr.into();
    }

    pub fn last_value(&self) -> Word {
        self.last_value
    }

    pub fn set_last_value(&mut self, value: Word) {
        self.last_value = value;
    }
}

/// ## Fixed capacity watchpoint pool
///
/// Every record sits on exactly one of two chains threaded through the
/// arena by index: the active chain (most recently allocated first) and the
/// free chain. A record's id is its arena index.
///
/// The pool is not reentrant: evaluating a watch expression must not touch
/// the pool, and `scan` must not be called from inside another `scan`.
#[derive(Debug)]
pub struct Watchpoints {
    slots: Vec<Watchpoint>,
    head: Option<usize>,
    free: Option<usize>,
}

impl Default for Watchpoints {
    fn default() -> Watchpoints {
        Watchpoints::new(DEFAULT_CAPACITY)
    }
}

impl Watchpoints {
    pub fn new(capacity: usize) -> Watchpoints {
        let slots = (0..capacity)
            .map(|id| Watchpoint {
                id,
                expr: String::new(),
                last_value: 0,
                next: if id + 1 < capacity { Some(id + 1) } else { None },
            })
            .collect();
        Watchpoints {
            slots,
            head: None,
            free: if capacity > 0 { Some(0) } else { None },
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Takes the head of the free chain and puts it at the head of the
    /// active chain.
    pub fn allocate(&mut self) -> Result<&mut Watchpoint, PoolError> {
        let index = match self.free {
            Some(index) => index,
            None => return Err(PoolError::Exhausted(self.capacity())),
        };
        self.free = self.slots[index].next;
        self.slots[index].next = self.head;
        self.head = Some(index);
        Ok(&mut self.slots[index])
    }

    pub fn release(&mut self, id: usize) -> Result<(), PoolError> {
        let mut prev: Option<usize> = None;
        let mut cur = self.head;
        while let Some(index) = cur {
            let next = self.slots[index].next;
            if self.slots[index].id == id {
                match prev {
                    None => self.head = next,
                    Some(p) => self.slots[p].next = next,
                }
                let slot = &mut self.slots[index];
                slot.next = self.free;
                slot.expr.clear();
                slot.last_value = 0;
                self.free = Some(index);
                return Ok(());
            }
            prev = cur;
            cur = next;
        }
        Err(PoolError::NotFound(id))
    }

    /// Active watchpoint with this id.
    pub fn get(&self, id: usize) -> Option<&Watchpoint> {
        self.iter().find(|wp| wp.id == id)
    }

    /// Active watchpoints in chain order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            slots: &self.slots,
            next: self.head,
            left: self.slots.len(),
        }
    }

    /// `(id, expression)` of each active watchpoint in chain order.
    pub fn enumerate(&self) -> impl Iterator<Item = (usize, &str)> {
        self.iter().map(|wp| (wp.id, wp.expr.as_str()))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn free_len(&self) -> usize {
        Iter {
            slots: &self.slots,
            next: self.free,
            left: self.slots.len(),
        }
        .count()
    }

    /// Re-evaluates the active watchpoints in chain order and stops at the
    /// first whose value changed, recording the new value. Watchpoints after
    /// it are not evaluated. An expression that fails to evaluate ends the
    /// scan with its error.
    pub fn scan<M: Machine + ?Sized>(&mut self, machine: &M) -> Result<ScanOutcome, EvalError> {
        let mut cur = self.head;
        while let Some(index) = cur {
            let wp = &mut self.slots[index];
            let new = match lang::expr(&wp.expr, machine) {
                Ok(value) => value,
                Err(error) => {
                    warn!(id = wp.id, expr = %wp.expr, %error, "watch expression failed");
                    return Err(error);
                }
            };
            if new != wp.last_value {
                let old = wp.last_value;
                wp.last_value = new;
                info!(id = wp.id, expr = %wp.expr, old, new, "watchpoint hit");
                return Ok(ScanOutcome::Changed { id: wp.id, old, new });
            }
            cur = wp.next;
        }
        Ok(ScanOutcome::Unchanged)
    }

    /// Scans and tells `exec` to stop when a watchpoint fired or failed.
    pub fn check<M, E>(&mut self, machine: &M, exec: &mut E) -> Result<ScanOutcome, EvalError>
    where
        M: Machine + ?Sized,
        E: Execution + ?Sized,
    {
        let outcome = self.scan(machine);
        if outcome != Ok(ScanOutcome::Unchanged) {
            exec.signal_stop();
        }
        outcome
    }
}

pub struct Iter<'a> {
    slots: &'a [Watchpoint],
    next: Option<usize>,
    // Bounds the walk even if a chain were ever corrupted into a cycle.
    left: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Watchpoint;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        if self.left == 0 {
            debug_assert!(false, "watchpoint chain longer than the pool");
            return None;
        }
        self.left -= 1;
        let wp = &self.slots[index];
        self.next = wp.next;
        Some(wp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    fn chain(pool: &Watchpoints, head: Option<usize>) -> Vec<usize> {
        let mut ids = vec![];
        let mut cur = head;
        while let Some(index) = cur {
            assert!(ids.len() < pool.capacity(), "cycle in chain");
            ids.push(index);
            cur = pool.slots[index].next;
        }
        ids
    }

    fn assert_partition(pool: &Watchpoints) {
        let active = chain(pool, pool.head);
        let free = chain(pool, pool.free);
        assert_eq!(active.len() + free.len(), pool.capacity());
        let all: HashSet<usize> = active.iter().chain(free.iter()).copied().collect();
        assert_eq!(all.len(), pool.capacity(), "record on both chains");
    }

    #[test]
    fn test_initial_state() {
        let pool = Watchpoints::new(4);
        assert_eq!(chain(&pool, pool.free), vec![0, 1, 2, 3]);
        assert!(pool.is_empty());
        assert_partition(&pool);
    }

    #[test]
    fn test_zero_capacity() {
        let mut pool = Watchpoints::new(0);
        assert_eq!(pool.allocate().unwrap_err(), PoolError::Exhausted(0));
        assert_partition(&pool);
    }

    #[test]
    fn test_release_middle_of_chain() {
        let mut pool = Watchpoints::new(4);
        for _ in 0..3 {
            pool.allocate().unwrap();
        }
        assert_eq!(chain(&pool, pool.head), vec![2, 1, 0]);
        pool.release(1).unwrap();
        assert_eq!(chain(&pool, pool.head), vec![2, 0]);
        assert_eq!(chain(&pool, pool.free), vec![1, 3]);
        pool.release(0).unwrap();
        pool.release(2).unwrap();
        assert!(pool.is_empty());
        assert_partition(&pool);
    }

    #[test]
    fn test_random_churn_keeps_partition() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let capacity = 8;
        let mut pool = Watchpoints::new(capacity);
        let mut live: Vec<usize> = vec![];
        for _ in 0..2000 {
            if rng.gen_bool(0.5) {
                match pool.allocate() {
                    Ok(wp) => {
                        assert!(live.len() < capacity);
                        assert!(!live.contains(&wp.id()));
                        live.push(wp.id());
                    }
                    Err(e) => {
                        assert_eq!(live.len(), capacity);
                        assert_eq!(e, PoolError::Exhausted(capacity));
                    }
                }
            } else {
                let id = rng.gen_range(0..capacity);
                let result = pool.release(id);
                match live.iter().position(|&l| l == id) {
                    Some(pos) => {
                        assert_eq!(result, Ok(()));
                        live.remove(pos);
                    }
                    None => assert_eq!(result, Err(PoolError::NotFound(id))),
                }
            }
            assert_partition(&pool);
            assert_eq!(pool.len(), live.len());
            assert_eq!(pool.len() + pool.free_len(), capacity);
        }
    }
}

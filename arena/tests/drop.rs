use std::{cell::Cell, rc::Rc};

use slotted_arena::SlotMap;

struct Counted(Rc<Cell<usize>>);

impl Drop for Counted {
    fn drop(&mut self) { self.0.set(self.0.get() + 1) }
}

#[test]
fn teardown_drops_each_value_once() {
    let drops = Rc::new(Cell::new(0));
    let mut arena = SlotMap::new();
    let keys = (0..8).map(|_| arena.insert(Counted(drops.clone())).unwrap()).collect::<Vec<_>>();

    drop(arena.remove(keys[2]));
    drop(arena.remove(keys[5]));
    assert_eq!(drops.get(), 2);

    // a failed removal drops nothing
    assert!(arena.remove(keys[2]).is_none());
    assert_eq!(drops.get(), 2);

    drop(arena);
    assert_eq!(drops.get(), 8);
}

#[test]
fn remove_hands_back_ownership() {
    let drops = Rc::new(Cell::new(0));
    let mut arena = SlotMap::new();
    let a = arena.insert(Counted(drops.clone())).unwrap();

    let value = arena.remove(a).unwrap();
    assert_eq!(drops.get(), 0);
    drop(value);
    assert_eq!(drops.get(), 1);

    drop(arena);
    assert_eq!(drops.get(), 1);
}

#[test]
fn partial_into_iter_drops_the_rest() {
    let drops = Rc::new(Cell::new(0));
    let mut arena = SlotMap::new();
    for _ in 0..5 {
        let _ = arena.insert(Counted(drops.clone())).unwrap();
    }

    let mut iter = arena.into_iter();
    let first = iter.next();
    drop(iter);
    assert_eq!(drops.get(), 4);
    drop(first);
    assert_eq!(drops.get(), 5);
}

#[test]
fn unconsumed_drain_and_retain() {
    let drops = Rc::new(Cell::new(0));
    let mut arena = SlotMap::new();
    for i in 0..6 {
        let _ = arena.insert((i, Counted(drops.clone()))).unwrap();
    }

    arena.retain(|(i, _)| *i % 2 == 0);
    assert_eq!(drops.get(), 3);
    assert_eq!(arena.len(), 3);

    drop(arena.drain());
    assert_eq!(drops.get(), 6);
    assert!(arena.is_empty());

    drop(arena);
    assert_eq!(drops.get(), 6);
}

#[test]
fn clear_then_teardown() {
    let drops = Rc::new(Cell::new(0));
    let mut arena = SlotMap::new();
    for _ in 0..4 {
        let _ = arena.insert(Counted(drops.clone())).unwrap();
    }
    arena.clear();
    assert_eq!(drops.get(), 4);
    let _ = arena.insert(Counted(drops.clone())).unwrap();
    drop(arena);
    assert_eq!(drops.get(), 5);
}

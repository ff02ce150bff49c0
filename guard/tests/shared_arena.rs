use std::{sync::Arc, thread};

use slotted_arena::{Handle, SlotMap};
use slotted_guard::Guarded;

#[test]
fn one_lock_per_arena() {
    let arena = Arc::new(Guarded::new(SlotMap::new()));

    let workers = (0..4u64)
        .map(|worker| {
            let arena = Arc::clone(&arena);
            thread::spawn(move || {
                let mut keys = Vec::new();
                for i in 0..100 {
                    keys.push(arena.lock().insert(worker * 1000 + i).unwrap());
                }
                for key in keys.iter().step_by(2) {
                    assert_eq!(arena.with(|arena| arena.remove(*key)).map(|v| v / 1000), Some(worker));
                }
                keys
            })
        })
        .collect::<Vec<_>>();

    let keys = workers
        .into_iter()
        .flat_map(|worker| worker.join().unwrap())
        .collect::<Vec<Handle>>();

    let arena = Arc::try_unwrap(arena).ok().unwrap().into_inner();
    assert_eq!(arena.len(), 200);
    let live = keys.iter().filter(|key| arena.contains(**key)).count();
    assert_eq!(live, 200);
}

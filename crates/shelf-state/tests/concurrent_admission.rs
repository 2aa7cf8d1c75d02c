//! # Concurrent Admission
//!
//! Many threads borrowing and returning against one shared `Library`. The
//! write lock must serialize each check-then-mutate sequence so copies are
//! never over-lent and no principal ever holds two copies.

use std::sync::{Arc, Barrier};
use std::thread;

use shelf_core::{ErrorKind, Principal};
use shelf_state::Library;

fn admin() -> Principal {
    Principal::new("librarian")
}

#[test]
fn test_racing_borrowers_never_exceed_copies() {
    const COPIES: u32 = 5;
    const THREADS: usize = 32;

    let library = Arc::new(Library::new(admin()));
    let dune = library.add_item(&admin(), "Dune", COPIES, "Herbert").unwrap();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|n| {
            let library = Arc::clone(&library);
            let barrier = Arc::clone(&barrier);
            let dune = dune.clone();
            thread::spawn(move || {
                barrier.wait();
                library.borrow(&Principal::new(format!("reader-{n}")), &dune)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let granted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(granted, COPIES as usize);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.kind() == ErrorKind::ItemUnavailable));

    assert_eq!(library.get(&dune).unwrap().active_loans(), COPIES);
    assert_eq!(library.holders(&dune).len(), COPIES as usize);
    assert_eq!(library.history_for("Dune").len(), COPIES as usize);
}

#[test]
fn test_same_principal_racing_gets_one_copy() {
    const THREADS: usize = 16;

    let library = Arc::new(Library::new(admin()));
    let dune = library.add_item(&admin(), "Dune", 10, "Herbert").unwrap();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let library = Arc::clone(&library);
            let barrier = Arc::clone(&barrier);
            let dune = dune.clone();
            thread::spawn(move || {
                barrier.wait();
                library.borrow(&Principal::new("alice"), &dune)
            })
        })
        .collect();

    let granted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(Result::is_ok)
        .count();
    assert_eq!(granted, 1);
    assert_eq!(library.get(&dune).unwrap().active_loans(), 1);
}

#[test]
fn test_borrow_return_churn_settles_to_zero() {
    const THREADS: usize = 8;
    const ROUNDS: usize = 50;

    let library = Arc::new(Library::new(admin()));
    let dune = library.add_item(&admin(), "Dune", 3, "Herbert").unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|n| {
            let library = Arc::clone(&library);
            let dune = dune.clone();
            thread::spawn(move || {
                let me = Principal::new(format!("reader-{n}"));
                let mut completed = 0;
                for _ in 0..ROUNDS {
                    if library.borrow(&me, &dune).is_ok() {
                        let item = library.get(&dune).unwrap();
                        assert!(item.active_loans() <= item.copies());
                        library.return_item(&me, &dune).unwrap();
                        completed += 1;
                    }
                }
                completed
            })
        })
        .collect();

    let completed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(library.get(&dune).unwrap().active_loans(), 0);
    assert!(library.holders(&dune).is_empty());
    let history = library.history_for("Dune");
    assert_eq!(history.len(), completed);
    assert!(history.iter().all(|r| r.ended_at.is_some()));
}

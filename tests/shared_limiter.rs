use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use rate_gate_core::cores::{CooldownGate, TokenBucket};
use rate_gate_core::sync::SharedLimiter;
use rate_gate_core::{ManualClock, SimpleAcquireError};

#[test]
fn threads_share_one_budget() {
    let bucket = TokenBucket::from_ticks(8, 80, ManualClock::new(0)).unwrap();
    let shared = SharedLimiter::new(bucket);
    let granted = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            let granted = Arc::clone(&granted);
            thread::spawn(move || {
                for _ in 0..10 {
                    if shared.admit() {
                        granted.fetch_add(1, Ordering::SeqCst);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // Frozen clock: exactly the initial permits, no more
    assert_eq!(granted.load(Ordering::SeqCst), 8);
    assert_eq!(shared.with(|b| b.available_ticks()), 0);
}

#[test]
fn try_admit_reports_contention() {
    let bucket = TokenBucket::from_ticks(4, 40, ManualClock::new(0)).unwrap();
    let shared = SharedLimiter::new(bucket);
    let other = shared.clone();

    {
        let _guard = shared.lock();
        assert_eq!(other.try_admit(), Err(SimpleAcquireError::ContentionFailure));
    }

    assert_eq!(other.try_admit(), Ok(true));
}

#[test]
fn shared_gate_admits_once_per_interval() {
    let clock = ManualClock::new(0);
    let gate = CooldownGate::from_ticks(100, clock.clone());
    let shared = SharedLimiter::new(gate);

    assert!(!shared.admit_at(50));
    assert!(shared.admit_at(101));
    assert!(!shared.clone().admit_at(150));

    clock.set(202);
    assert!(shared.admit());
}

#[test]
fn with_gives_access_to_the_full_api() {
    let shared = SharedLimiter::new(TokenBucket::from_ticks(4, 100, ManualClock::new(0)).unwrap());

    assert_eq!(shared.with(|b| b.try_acquire_at(0, 3)), Ok(()));
    assert!(shared.with(|b| b.has_capacity_for_one()));
    assert_eq!(shared.with(|b| b.permits_remaining_at(0)), 1);
}

#[test]
fn poisoned_lock_is_recovered() {
    let shared = SharedLimiter::new(TokenBucket::from_ticks(2, 20, ManualClock::new(0)).unwrap());
    let poisoner = shared.clone();

    let result = thread::spawn(move || {
        poisoner.with(|_| panic!("caller panicked while holding the limiter"));
    })
    .join();
    assert!(result.is_err());

    assert!(shared.admit());
    assert_eq!(shared.try_admit(), Ok(true));
    assert_eq!(shared.try_admit(), Ok(false));
}

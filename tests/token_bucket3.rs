use rate_gate_core::cores::TokenBucket;
use rate_gate_core::{ManualClock, Uint};

fn new_token_bucket(max_permits: Uint, window: Uint) -> TokenBucket<ManualClock> {
    TokenBucket::from_ticks(max_permits, window, ManualClock::new(0)).unwrap()
}

/// Small deterministic generator so the sequences are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

#[test]
fn available_stays_within_bounds_for_arbitrary_sequences() {
    for seed in 1..=20u64 {
        let mut rng = Lcg(seed);
        let mut bucket = new_token_bucket(7, 1000);
        let capacity = bucket.capacity_ticks();
        let mut tick: Uint = 0;

        for _ in 0..500 {
            tick += rng.next(300) as Uint;
            let quantity = rng.next(10) as Uint;
            let _ = bucket.try_acquire_at(tick, quantity);
            assert!(bucket.available_ticks() <= capacity, "seed {}", seed);
        }
    }
}

#[test]
fn refill_matches_the_closed_form() {
    let mut rng = Lcg(42);
    let mut bucket = new_token_bucket(4, 60_000);
    let capacity = bucket.capacity_ticks();
    let rate = bucket.rate_ticks();
    let mut tick: Uint = 0;

    for _ in 0..1000 {
        let before = bucket.available_ticks();
        let elapsed = rng.next(20_000) as Uint;
        tick += elapsed;
        let quantity = rng.next(4) as Uint;

        let refilled = (before + elapsed).min(capacity);
        let cost = quantity * rate;
        let granted = bucket.try_acquire_at(tick, quantity).is_ok();

        assert_eq!(granted, cost <= refilled);
        let expected = if granted { refilled - cost } else { refilled };
        assert_eq!(bucket.available_ticks(), expected);
    }
}

#[test]
fn denial_only_applies_the_refill() {
    let mut bucket = new_token_bucket(4, 60_000);
    assert_eq!(bucket.try_acquire_at(0, 4), Ok(()));

    for tick in [1_000, 2_000, 7_500, 14_999] {
        assert!(bucket.try_acquire_at(tick, 1).is_err());
        assert_eq!(bucket.available_ticks(), tick);
    }
}

#[test]
fn clock_going_backwards_adds_no_credit() {
    let mut bucket = new_token_bucket(4, 60_000);
    assert_eq!(bucket.try_acquire_at(0, 4), Ok(()));

    assert_eq!(bucket.try_acquire_at(10_000, 0), Ok(()));
    assert_eq!(bucket.available_ticks(), 10_000);

    // Earlier tick: elapsed counts as zero
    assert!(bucket.try_acquire_at(5_000, 1).is_err());
    assert_eq!(bucket.available_ticks(), 10_000);

    // Refill resumes from 10_000, not from 5_000
    assert_eq!(bucket.try_acquire_at(15_000, 1), Ok(()));
    assert_eq!(bucket.available_ticks(), 0);
}

#[test]
fn manual_clock_set_backwards() {
    let clock = ManualClock::new(50_000);
    let mut bucket = TokenBucket::from_ticks(4, 60_000, clock.clone()).unwrap();
    assert_eq!(bucket.try_acquire(4), Ok(()));

    clock.set(0);
    assert!(bucket.try_acquire(1).is_err());
    assert_eq!(bucket.available_ticks(), 0);

    clock.set(65_000);
    assert_eq!(bucket.try_acquire(1), Ok(()));
}

#[test]
fn rounded_down_rate_never_catches_up() {
    // 62 / 5 = 12 ticks per permit; the remaining 2 ticks are dropped from the rate
    let mut bucket = new_token_bucket(5, 62);
    assert_eq!(bucket.rate_ticks(), 12);

    let mut admitted = 0;
    for _ in 0..5 {
        if bucket.try_acquire_at(0, 1).is_ok() {
            admitted += 1;
        }
    }
    assert_eq!(admitted, 5);
    assert_eq!(bucket.available_ticks(), 2);

    // Steady state: one permit every 12 ticks, not every 12.4
    let mut tick: Uint = 0;
    for _ in 0..100 {
        tick += 12;
        assert_eq!(bucket.try_acquire_at(tick, 1), Ok(()));
        assert!(bucket.try_acquire_at(tick, 1).is_err());
    }
    assert_eq!(bucket.available_ticks(), 2);
}

#[test]
fn long_run_throughput_uses_the_floored_rate() {
    let mut bucket = new_token_bucket(5, 62);
    let rate = bucket.rate_ticks();
    let capacity = bucket.capacity_ticks();
    let horizon: Uint = 10_000;

    // Greedy caller polling every tick
    let mut admitted: Uint = 0;
    for tick in 0..=horizon {
        while bucket.try_acquire_at(tick, 1).is_ok() {
            admitted += 1;
        }
    }

    // Initial credit plus one tick of credit per tick, spent in whole permits of `rate`
    assert_eq!(admitted, (capacity + horizon) / rate);
    assert!(admitted > 5 * (capacity + horizon) / 62);
}

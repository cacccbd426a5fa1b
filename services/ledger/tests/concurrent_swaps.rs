//! Concurrent swaps on a shared pool must serialise

use pool_ledger::{Authority, PoolLedger, SlippageGuard};
use std::sync::{Arc, Barrier};
use std::thread;
use swapline_amm::ConstantProduct;
use types::{Direction, PairKey, SwapRequest};

fn sol_usdt() -> PairKey {
    PairKey::from_strs("SOL", "USDT").unwrap()
}

fn setup(reserve_a: u64, reserve_b: u64, fee_bps: u32) -> SlippageGuard {
    let ledger = Arc::new(PoolLedger::new());
    ledger
        .create_pool(sol_usdt(), reserve_a, reserve_b, fee_bps, Authority::new("admin"))
        .unwrap();
    SlippageGuard::new(ledger)
}

/// Reserves after applying swaps one by one in the given order
fn apply_sequentially(
    mut reserve_a: u64,
    mut reserve_b: u64,
    fee_bps: u32,
    swaps: &[(Direction, u64)],
) -> (u64, u64) {
    for &(direction, amount_in) in swaps {
        let (reserve_in, reserve_out) = direction.orient(reserve_a, reserve_b);
        let out = ConstantProduct::compute_output(amount_in, reserve_in, reserve_out, fee_bps).unwrap();
        match direction {
            Direction::AToB => {
                reserve_a += amount_in;
                reserve_b -= out;
            }
            Direction::BToA => {
                reserve_b += amount_in;
                reserve_a -= out;
            }
        }
    }
    (reserve_a, reserve_b)
}

#[test]
fn two_racing_swaps_match_a_sequential_order() {
    let guard = setup(1_000_000_000_000, 50_000_000_000, 30);
    let swaps = [
        (Direction::AToB, 5_000_000_000u64),
        (Direction::BToA, 250_000_000u64),
    ];
    let barrier = Arc::new(Barrier::new(swaps.len()));

    let handles: Vec<_> = swaps
        .iter()
        .map(|&(direction, amount_in)| {
            let guard = guard.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                guard
                    .execute_swap(&SwapRequest::new(sol_usdt(), direction, amount_in, 0))
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let reserves = guard.ledger().get_reserves(&sol_usdt()).unwrap();
    let forward = apply_sequentially(1_000_000_000_000, 50_000_000_000, 30, &swaps);
    let backward = apply_sequentially(
        1_000_000_000_000,
        50_000_000_000,
        30,
        &[swaps[1], swaps[0]],
    );

    let actual = (reserves.reserve_a, reserves.reserve_b);
    assert!(
        actual == forward || actual == backward,
        "reserves {:?} match neither serial order {:?} / {:?}",
        actual,
        forward,
        backward
    );
    assert_eq!(guard.ledger().stats().swaps_committed, 2);
}

#[test]
fn many_threads_lose_no_updates() {
    const THREADS: usize = 8;
    const SWAPS_PER_THREAD: usize = 50;

    let initial_a = 10_000_000_000u64;
    let initial_b = 20_000_000_000u64;
    let guard = setup(initial_a, initial_b, 30);
    let events = guard.ledger().subscribe();
    let initial_k = initial_a as u128 * initial_b as u128;

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let guard = guard.clone();
            thread::spawn(move || {
                let direction = if t % 2 == 0 {
                    Direction::AToB
                } else {
                    Direction::BToA
                };
                (0..SWAPS_PER_THREAD)
                    .map(|i| {
                        let amount_in = 1_000_000 + (t * 1_000 + i) as u64;
                        let receipt = guard
                            .execute_swap(&SwapRequest::new(sol_usdt(), direction, amount_in, 0))
                            .unwrap();
                        (direction, receipt.amount_in, receipt.amount_out)
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut expected_a = initial_a as i128;
    let mut expected_b = initial_b as i128;
    for handle in handles {
        for (direction, amount_in, amount_out) in handle.join().unwrap() {
            match direction {
                Direction::AToB => {
                    expected_a += amount_in as i128;
                    expected_b -= amount_out as i128;
                }
                Direction::BToA => {
                    expected_b += amount_in as i128;
                    expected_a -= amount_out as i128;
                }
            }
        }
    }

    let reserves = guard.ledger().get_reserves(&sol_usdt()).unwrap();
    assert_eq!(reserves.reserve_a as i128, expected_a);
    assert_eq!(reserves.reserve_b as i128, expected_b);
    assert!(reserves.invariant() >= initial_k);

    let record = guard.ledger().pool(&sol_usdt()).unwrap();
    assert_eq!(record.swap_count, (THREADS * SWAPS_PER_THREAD) as u64);
    assert_eq!(events.try_iter().count(), THREADS * SWAPS_PER_THREAD);
}

#[test]
fn swaps_on_different_pools_are_independent() {
    let ledger = Arc::new(PoolLedger::new());
    let pairs: Vec<PairKey> = ["USDT", "USDC", "BONK", "JUP"]
        .iter()
        .map(|quote| PairKey::from_strs("SOL", quote).unwrap())
        .collect();
    for pair in &pairs {
        ledger
            .create_pool(pair.clone(), 1_000_000, 1_000_000, 30, Authority::new("admin"))
            .unwrap();
    }
    let guard = SlippageGuard::new(Arc::clone(&ledger));

    let handles: Vec<_> = pairs
        .iter()
        .cloned()
        .map(|pair| {
            let guard = guard.clone();
            thread::spawn(move || {
                for _ in 0..20 {
                    guard
                        .execute_swap(&SwapRequest::new(pair.clone(), Direction::AToB, 1_000, 0))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Every pool saw the same sequence, so all end in the same state
    let expected = apply_sequentially(1_000_000, 1_000_000, 30, &[(Direction::AToB, 1_000); 20]);
    for pair in &pairs {
        let reserves = ledger.get_reserves(pair).unwrap();
        assert_eq!((reserves.reserve_a, reserves.reserve_b), expected);
    }
}
